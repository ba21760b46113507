//! Release-based deployment for web applications.
//!
//! [Repository](https://github.com/capstan-rs/capstan) |
//! [Online docs](https://docs.rs/capstan)
//!
//! Capstan builds your app locally, uploads it over SSH into a
//! timestamped release directory, links the data that must
//! survive deploys out of shared storage, and switches a
//! `current` symlink to the new release in one atomic rename.
//! Old releases are pruned beyond a retention count.
//!
//! The name is the ship's winch that hauls up the anchor: wind
//! the new release onto the server and swing over in one motion.
//!
//! # Overview
//!
//! A deployment is defined as a [`Pipeline`] wired from:
//!
//! - An [`App`] describing the application (build commands,
//!   artifact directory, static assets, shared resources)
//! - Remote settings on the pipeline itself (host, user,
//!   deploy root, retention count, environment)
//!
//! Every release directory under `releases/` is an immutable
//! snapshot. Data that must survive deploys - uploads,
//! databases, environment files - lives once under `shared/`
//! and is symlinked into each release. The running application
//! resolves everything through the `current` symlink, which is
//! only ever repointed by a rename, so a deploy becomes visible
//! at a single instant.
//!
//! # Architecture
//!
//! Four commands, dispatched by [`Pipeline::run`]:
//!
//! 1. **init** - create the remote directory layout
//!    (idempotent)
//! 2. **build** - run the app's install and build commands
//!    locally
//! 3. **deploy** - upload the artifacts as a new release,
//!    materialize symlinks, cut over, prune
//! 4. **all** - build, then deploy
//!
//! Execution is strictly sequential and fail-fast: any failing
//! step aborts the run with no retry and no rollback of
//! completed steps.
//!
//! # Examples
//!
//! ## Basic deployment
//!
//! Create an `xtask/src/main.rs` in your project:
//!
//! ```rust,no_run
//! use capstan::{App, Pipeline};
//!
//! fn main() -> anyhow::Result<()> {
//!     let app = App::new("my-service")
//!         .install_command("npm ci")
//!         .build_command("npm run build")
//!         .dist_dir("dist")
//!         .assets_dir("public")
//!         .shared_dir("uploads")
//!         .shared_file("db.sqlite");
//!
//!     let pipeline = Pipeline::new(app, "deploy.example.com")
//!         .user("deploy")
//!         .deploy_root("/var/www/my-service")
//!         .keep_releases(5);
//!
//!     pipeline.run()?;
//!     Ok(())
//! }
//! ```
//!
//! Then use `cargo xtask` subcommands:
//!
//! ```sh
//! # One-time remote setup
//! cargo xtask init
//!
//! # Build and deploy in one go
//! cargo xtask all
//!
//! # Preview what a deploy would do
//! cargo xtask deploy --dry-run
//!
//! # Deploy to staging instead of production
//! DEPLOY_ENV=staging cargo xtask deploy
//! ```
//!
//! ## Manifest instead of code
//!
//! The same configuration can live in a YAML file:
//!
//! ```yaml
//! host: deploy.example.com
//! user: deploy
//! deploy_root: /var/www/my-service
//! keep_releases: 5
//! environment: production
//! app:
//!   name: my-service
//!   build_command: npm run build
//!   dist_dir: dist
//!   assets_dir: public
//!   shared:
//!     - name: uploads
//!       kind: directory
//!     - name: db.sqlite
//!       kind: file
//! ```
//!
//! ```rust,no_run
//! use capstan::Pipeline;
//!
//! fn main() -> anyhow::Result<()> {
//!     Pipeline::from_file("capstan.yml")?.run()?;
//!     Ok(())
//! }
//! ```

// Allow noisy pedantic lints that don't add value for a
// deployment tool crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod app;
pub mod build;
pub mod cmd;
pub mod config;
pub mod deploy;
pub mod error;
pub mod init;
pub mod pipeline;
pub mod release;
pub mod remote;
pub mod ssh;
pub mod transfer;

pub use app::App;
pub use app::ResourceKind;
pub use app::SharedResource;
pub use config::Config;
pub use deploy::Summary;
pub use pipeline::Pipeline;
pub use release::ReleaseId;
pub use remote::Remote;
pub use remote::SshRemote;
pub use transfer::Rsync;
pub use transfer::Transfer;
