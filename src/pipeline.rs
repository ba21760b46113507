use clap::{Parser, Subcommand};

use crate::app::App;
use crate::build;
use crate::config::Config;
use crate::deploy;
use crate::error::DeployResult;
use crate::init;
use crate::release::ReleaseId;
use crate::remote::SshRemote;
use crate::ssh::SshSession;
use crate::transfer::Rsync;

/// Deployment pipeline: holds the configuration and dispatches
/// the `init | build | deploy | all` commands.
pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    #[must_use]
    pub fn new(app: App, host: &str) -> Self {
        Self {
            config: Config::new(app, host),
        }
    }

    /// Build a pipeline from a YAML manifest instead of the
    /// builder DSL.
    pub fn from_file(path: &str) -> DeployResult<Self> {
        Ok(Self {
            config: Config::from_file(path)?,
        })
    }

    #[must_use]
    pub fn user(mut self, user: &str) -> Self {
        self.config = self.config.user(user);
        self
    }

    #[must_use]
    pub fn identity(mut self, key_path: &str) -> Self {
        self.config = self.config.identity(key_path);
        self
    }

    #[must_use]
    pub fn deploy_root(mut self, path: &str) -> Self {
        self.config = self.config.deploy_root(path);
        self
    }

    #[must_use]
    pub fn keep_releases(mut self, count: usize) -> Self {
        self.config = self.config.keep_releases(count);
        self
    }

    #[must_use]
    pub fn environment(mut self, name: &str) -> Self {
        self.config = self.config.environment(name);
        self
    }

    /// Parse CLI arguments and dispatch the appropriate
    /// command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is rejected or
    /// the dispatched command fails.
    pub fn run(&self) -> DeployResult<()> {
        let cli = Cli::parse();

        // Environment resolution and validation happen once,
        // before any command touches a filesystem.
        let mut config = self.config.clone();
        config.environment = config.resolved_environment();
        config.validate()?;

        match cli.command {
            Command::Init => cmd_init(&config),
            Command::Build => cmd_build(&config),
            Command::Deploy { dry_run } => cmd_deploy(&config, dry_run),
            Command::All { skip_build } => {
                if !skip_build {
                    cmd_build(&config)?;
                }
                cmd_deploy(&config, false)
            }
        }
    }
}

fn cmd_init(config: &Config) -> DeployResult<()> {
    let (remote, _) = connect(config);
    init::run(config, &remote)
}

fn cmd_build(config: &Config) -> DeployResult<()> {
    build::run(&config.app)?;
    eprintln!("Next: deploy with the `deploy` command");
    Ok(())
}

fn cmd_deploy(config: &Config, dry_run: bool) -> DeployResult<()> {
    if dry_run {
        return cmd_deploy_dry_run(config);
    }

    let (remote, rsync) = connect(config);
    let summary = deploy::run(config, &remote, &rsync)?;

    eprintln!();
    eprintln!("Deployment complete!");
    eprintln!("  release:          {}", summary.release);
    eprintln!("  shared synced:    {}", summary.shared_synced);
    eprintln!(
        "  env file linked:  {}",
        if summary.env_linked { "yes" } else { "no" }
    );
    if summary.pruned.is_empty() {
        eprintln!("  pruned releases:  none");
    } else {
        eprintln!("  pruned releases:  {}", summary.pruned.join(", "));
    }
    Ok(())
}

#[allow(clippy::unnecessary_wraps)]
fn cmd_deploy_dry_run(config: &Config) -> DeployResult<()> {
    let release = ReleaseId::now();
    let release_dir = config.release_dir(release.as_str());

    eprintln!("=== Dry run: no changes will be made ===");
    eprintln!();
    eprintln!("--- Actions that would be performed ---");
    eprintln!(
        "1. Ensure {} and {} exist",
        config.releases_root(),
        config.shared_root()
    );
    eprintln!(
        "2. Upload {}/{} -> {release_dir}",
        config.app.source_dir, config.app.dist_dir
    );
    eprintln!(
        "   excluding: {}",
        deploy::artifact_excludes(&config.app).join(", ")
    );
    let mut step = 3;
    if let Some(assets) = &config.app.assets_dir {
        eprintln!("{step}. Overlay static assets from {}/{assets}", config.app.source_dir);
        step += 1;
    }
    for resource in &config.app.shared {
        eprintln!(
            "{step}. Sync {} and link {release_dir}/{} -> {}",
            resource.name,
            resource.name,
            config.shared_path(&resource.name)
        );
        step += 1;
    }
    let env_file = Config::env_file_name(&config.environment);
    eprintln!(
        "{step}. Link {release_dir}/.env -> {} (if present)",
        config.shared_path(&env_file)
    );
    eprintln!("{}. Switch {} -> {release_dir}", step + 1, config.current_link());
    eprintln!(
        "{}. Prune releases beyond the newest {}",
        step + 2,
        config.keep_releases
    );
    Ok(())
}

fn connect(config: &Config) -> (SshRemote, Rsync) {
    let mut session = SshSession::new(&config.host, &config.user);
    let mut rsync = Rsync::new(&config.host, &config.user);
    if let Some(key) = &config.identity {
        session = session.with_key(key);
        rsync = rsync.with_key(key);
    }
    (SshRemote::new(session), rsync)
}

const REMOTE_LAYOUT_HELP: &str = "\
Remote layout (under the deploy root):

  releases/
    20240131120000/              one immutable snapshot per deploy
      uploads -> <shared>/uploads
      .env    -> <shared>/.env.production
  shared/                        data persisting across releases
  current -> releases/20240131120000

The DEPLOY_ENV environment variable overrides the configured
environment name (default: production).";

#[derive(Parser)]
#[command(name = "deploy")]
#[command(about = "Release deployment automation")]
#[command(arg_required_else_help = true)]
#[command(after_help = REMOTE_LAYOUT_HELP)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the remote directory layout (idempotent)
    Init,

    /// Build the application locally
    Build,

    /// Upload the existing build artifacts as a new release and
    /// switch to it
    Deploy {
        /// Print the planned actions without executing
        #[arg(long)]
        dry_run: bool,
    },

    /// Build, then deploy
    All {
        /// Reuse existing build artifacts
        #[arg(long)]
        skip_build: bool,
    },
}
