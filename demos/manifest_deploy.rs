//! Manifest-driven deployment example.
//!
//! The whole configuration lives in `capstan.yml` next to the
//! project instead of in code:
//!
//! ```yaml
//! host: app.example.com
//! user: deploy
//! deploy_root: /var/www/my-app
//! keep_releases: 5
//! app:
//!   name: my-app
//!   build_command: npm run build
//!   dist_dir: dist
//!   shared:
//!     - name: uploads
//!       kind: directory
//!     - name: db.sqlite
//!       kind: file
//! ```

use capstan::Pipeline;

fn main() -> anyhow::Result<()> {
    Pipeline::from_file("capstan.yml")?.run()?;
    Ok(())
}
