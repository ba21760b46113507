use std::path::Path;

use crate::app::App;
use crate::cmd;
use crate::error::{DeployError, DeployResult};

/// Run the application's install and build commands in the
/// source directory. Either command failing aborts the run.
/// On success the artifact directory exists and a deploy can
/// follow.
pub fn run(app: &App) -> DeployResult<()> {
    let source = Path::new(&app.source_dir);

    eprintln!("Installing dependencies: {}", app.install_command);
    cmd::run_shell_in(source, &app.install_command)?;

    eprintln!("Building: {}", app.build_command);
    cmd::run_shell_in(source, &app.build_command)?;

    let dist = source.join(&app.dist_dir);
    if !dist.is_dir() {
        return Err(DeployError::MissingArtifact(format!(
            "{} (build command succeeded but produced no artifact directory)",
            dist.display()
        )));
    }

    eprintln!("Build artifacts ready in {}", dist.display());
    Ok(())
}
