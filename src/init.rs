use crate::config::Config;
use crate::error::DeployResult;
use crate::remote::Remote;

/// Create the base directory layout on the remote host:
/// releases root, shared root, and one subdirectory per
/// directory-kind shared resource. Idempotent; never deletes.
/// File-kind resources are created lazily by the first sync.
pub fn run(config: &Config, remote: &dyn Remote) -> DeployResult<()> {
    eprintln!(
        "Preparing remote layout on {}@{}...",
        config.user, config.host
    );

    let mut dirs = vec![config.releases_root(), config.shared_root()];
    for resource in &config.app.shared {
        if resource.is_directory() {
            dirs.push(config.shared_path(&resource.name));
        }
    }

    remote.create_dirs(&dirs)?;

    eprintln!("Remote layout ready under {}", config.deploy_root);
    Ok(())
}
