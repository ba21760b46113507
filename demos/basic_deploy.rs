//! Basic deployment pipeline example.
//!
//! Demonstrates deploying an npm-built web app to a VPS with
//! persistent uploads and a SQLite database surviving across
//! releases.
//!
//! ```sh
//! # One-time remote setup
//! cargo xtask init
//!
//! # Build and deploy in one go
//! cargo xtask all
//!
//! # Preview a deploy without touching the server
//! cargo xtask deploy --dry-run
//! ```

use capstan::{App, Pipeline};

fn main() -> anyhow::Result<()> {
    let app = App::new("my-app")
        .install_command("npm ci")
        .build_command("npm run build")
        .dist_dir("dist")
        .assets_dir("public")
        .shared_dir("uploads")
        .shared_file("db.sqlite");

    let pipeline = Pipeline::new(app, "app.example.com")
        .user("deploy")
        .deploy_root("/var/www/my-app")
        .keep_releases(5);

    pipeline.run()?;
    Ok(())
}
