use std::path::Path;

use crate::app::App;
use crate::config::Config;
use crate::error::{DeployError, DeployResult};
use crate::release::{self, ReleaseId};
use crate::remote::Remote;
use crate::transfer::{MirrorOptions, Transfer};

/// Patterns always excluded from the artifact transfer, on top
/// of the configured shared-resource names and user excludes.
pub const BUILT_IN_EXCLUDES: [&str; 4] = [".git", "node_modules", ".cache", ".vscode"];

/// What a completed deploy did, for the final report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub release: String,
    pub shared_synced: usize,
    pub env_linked: bool,
    pub pruned: Vec<String>,
}

/// Run the release lifecycle with a fresh wall-clock release
/// identifier.
pub fn run(
    config: &Config,
    remote: &dyn Remote,
    transfer: &dyn Transfer,
) -> DeployResult<Summary> {
    run_release(config, remote, transfer, &ReleaseId::now())
}

/// Run the release lifecycle under an explicit identifier.
///
/// The pipeline is strictly linear and fail-fast: artifact
/// precondition, remote directory preparation, artifact upload,
/// static-asset overlay, shared-resource sync, symlink
/// materialization, environment-file link, atomic cut-over,
/// retention pruning. A failed step aborts the run with no
/// compensation of earlier steps.
pub fn run_release(
    config: &Config,
    remote: &dyn Remote,
    transfer: &dyn Transfer,
    release: &ReleaseId,
) -> DeployResult<Summary> {
    // Precondition: the artifact directory must exist before
    // anything touches the remote host.
    let dist = local_path(&config.app.source_dir, &config.app.dist_dir);
    if !Path::new(&dist).is_dir() {
        return Err(DeployError::MissingArtifact(format!(
            "{dist} (run the build first)"
        )));
    }

    let release_dir = config.release_dir(release.as_str());
    eprintln!(
        "Deploying release {release} to {}@{}...",
        config.user, config.host
    );

    // Remote directory preparation. Mirrors init so a deploy
    // works on a host that never saw an explicit init.
    let mut dirs = vec![config.releases_root(), config.shared_root()];
    for resource in &config.app.shared {
        if resource.is_directory() {
            dirs.push(config.shared_path(&resource.name));
        }
    }
    remote.create_dirs(&dirs)?;

    if remote.entry_exists(&release_dir)? {
        return Err(DeployError::ReleaseExists(release_dir));
    }
    remote.create_dirs(std::slice::from_ref(&release_dir))?;

    // Artifact upload.
    eprintln!("  uploading artifacts from {dist}");
    let artifact_opts = MirrorOptions {
        delete: true,
        excludes: artifact_excludes(&config.app),
    };
    transfer.mirror(&contents_of(&dist), &release_dir, &artifact_opts)?;

    // Static-asset overlay, last-writer-wins over the upload.
    if let Some(assets_dir) = &config.app.assets_dir {
        let assets = local_path(&config.app.source_dir, assets_dir);
        eprintln!("  overlaying static assets from {assets}");
        transfer.mirror(&contents_of(&assets), &release_dir, &MirrorOptions::new())?;
    }

    // Shared-resource sync. Local absence never deletes remote
    // state.
    let mut shared_synced = 0;
    for resource in &config.app.shared {
        let local = local_path(&config.app.source_dir, &resource.name);
        if Path::new(&local).exists() {
            eprintln!("  syncing shared resource {}", resource.name);
            let src = if resource.is_directory() {
                contents_of(&local)
            } else {
                local
            };
            transfer.mirror(&src, &config.shared_path(&resource.name), &MirrorOptions::new())?;
            shared_synced += 1;
        } else {
            eprintln!(
                "  {} not present locally, leaving remote copy untouched",
                resource.name
            );
        }
    }

    // Symlink materialization into shared storage.
    for resource in &config.app.shared {
        remote.symlink_replace(
            &config.shared_path(&resource.name),
            &format!("{release_dir}/{}", resource.name),
        )?;
    }

    // Environment file: sync the local copy if present, then
    // link `.env` iff a shared copy exists at all.
    let env_file = Config::env_file_name(&config.environment);
    let shared_env = config.shared_path(&env_file);
    let local_env = local_path(&config.app.source_dir, &env_file);
    if Path::new(&local_env).is_file() {
        eprintln!("  syncing {env_file}");
        transfer.mirror(&local_env, &shared_env, &MirrorOptions::new())?;
    }
    let env_linked = if remote.entry_exists(&shared_env)? {
        remote.symlink_replace(&shared_env, &format!("{release_dir}/.env"))?;
        true
    } else {
        eprintln!("  no {env_file} locally or in shared storage, skipping .env link");
        false
    };

    // Cut-over: the single user-visible moment of the deploy.
    remote.symlink_replace(&release_dir, &config.current_link())?;
    eprintln!("  current -> {release_dir}");

    // Retention pruning. The current target is re-read rather
    // than assumed, so a skewed clock can never delete the
    // live release.
    let entries = remote.list_entries(&config.releases_root())?;
    let current = remote.read_link(&config.current_link())?;
    let current_name = current
        .as_deref()
        .map_or_else(|| release.as_str().to_string(), |t| basename(t).to_string());
    let doomed = release::plan_prune(&entries, config.keep_releases, Some(&current_name));
    for name in &doomed {
        eprintln!("  pruning {name}");
        remote.remove_dir(&config.release_dir(name))?;
    }

    Ok(Summary {
        release: release.to_string(),
        shared_synced,
        env_linked,
        pruned: doomed,
    })
}

/// Exclude set for the artifact transfer: built-ins, every
/// shared-resource name (shared content must never be
/// duplicated into a release), and configured extras.
#[must_use]
pub fn artifact_excludes(app: &App) -> Vec<String> {
    let mut excludes: Vec<String> = BUILT_IN_EXCLUDES.iter().map(ToString::to_string).collect();
    excludes.extend(app.shared.iter().map(|r| r.name.clone()));
    excludes.extend(app.excludes.iter().cloned());
    excludes
}

fn local_path(source_dir: &str, entry: &str) -> String {
    format!("{}/{entry}", source_dir.trim_end_matches('/'))
}

// Trailing slash: rsync copies the directory contents, not the
// directory itself.
fn contents_of(dir: &str) -> String {
    format!("{}/", dir.trim_end_matches('/'))
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excludes_cover_shared_and_extras() {
        let app = App::new("shop")
            .shared_dir("uploads")
            .shared_file("db.sqlite")
            .exclude("*.map");

        let excludes = artifact_excludes(&app);

        for built_in in BUILT_IN_EXCLUDES {
            assert!(excludes.contains(&built_in.to_string()));
        }
        assert!(excludes.contains(&"uploads".to_string()));
        assert!(excludes.contains(&"db.sqlite".to_string()));
        assert!(excludes.contains(&"*.map".to_string()));
    }

    #[test]
    fn basename_takes_last_component() {
        assert_eq!(basename("/opt/app/releases/20240131120000"), "20240131120000");
        assert_eq!(basename("20240131120000"), "20240131120000");
    }

    #[test]
    fn contents_of_normalizes_trailing_slash() {
        assert_eq!(contents_of("dist"), "dist/");
        assert_eq!(contents_of("dist/"), "dist/");
    }
}
