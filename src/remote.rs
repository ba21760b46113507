use crate::error::{DeployError, DeployResult};
use crate::ssh::SshSession;

/// Typed interface to the remote filesystem.
///
/// Every mutation the deployment performs on the remote host
/// goes through one of these operations, built from typed path
/// arguments. Configuration values never reach the remote shell
/// as raw command text.
pub trait Remote {
    /// Create every path in `paths` as a directory, parents
    /// included. Existing directories are left untouched.
    fn create_dirs(&self, paths: &[String]) -> DeployResult<()>;

    /// Point the symlink at `link` to `target`, replacing any
    /// previous link by rename so readers never observe a
    /// missing entry.
    fn symlink_replace(&self, target: &str, link: &str) -> DeployResult<()>;

    /// Whether any entry (file, directory, or symlink) exists
    /// at `path`.
    fn entry_exists(&self, path: &str) -> DeployResult<bool>;

    /// Resolve a symlink one level, `None` if `path` is not a
    /// symlink or does not exist.
    fn read_link(&self, path: &str) -> DeployResult<Option<String>>;

    /// Names of the entries directly under `root`. Missing root
    /// yields an empty list.
    fn list_entries(&self, root: &str) -> DeployResult<Vec<String>>;

    /// Recursively delete the directory at `path`.
    fn remove_dir(&self, path: &str) -> DeployResult<()>;
}

/// [`Remote`] implementation executing over an [`SshSession`].
pub struct SshRemote {
    session: SshSession,
}

impl SshRemote {
    #[must_use]
    pub const fn new(session: SshSession) -> Self {
        Self { session }
    }
}

impl Remote for SshRemote {
    fn create_dirs(&self, paths: &[String]) -> DeployResult<()> {
        if paths.is_empty() {
            return Ok(());
        }
        self.session.exec(&mkdir_command(paths))?;
        Ok(())
    }

    fn symlink_replace(&self, target: &str, link: &str) -> DeployResult<()> {
        self.session.exec(&symlink_replace_command(target, link))?;
        Ok(())
    }

    fn entry_exists(&self, path: &str) -> DeployResult<bool> {
        let out = self.session.exec(&entry_exists_command(path))?;
        match out.trim() {
            "yes" => Ok(true),
            "no" => Ok(false),
            other => Err(DeployError::Other(format!(
                "unexpected existence probe output: {other}"
            ))),
        }
    }

    fn read_link(&self, path: &str) -> DeployResult<Option<String>> {
        let out = self.session.exec(&read_link_command(path))?;
        let target = out.trim();
        if target.is_empty() {
            Ok(None)
        } else {
            Ok(Some(target.to_string()))
        }
    }

    fn list_entries(&self, root: &str) -> DeployResult<Vec<String>> {
        let out = self.session.exec(&list_entries_command(root))?;
        Ok(out
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(ToString::to_string)
            .collect())
    }

    fn remove_dir(&self, path: &str) -> DeployResult<()> {
        self.session.exec(&remove_dir_command(path))?;
        Ok(())
    }
}

/// Quote a value for a POSIX shell: wrap in single quotes,
/// with embedded single quotes spliced as `'\''`.
#[must_use]
pub fn shell_quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for ch in value.chars() {
        if ch == '\'' {
            quoted.push_str("'\\''");
        } else {
            quoted.push(ch);
        }
    }
    quoted.push('\'');
    quoted
}

fn mkdir_command(paths: &[String]) -> String {
    let quoted: Vec<String> = paths.iter().map(|p| shell_quote(p)).collect();
    format!("mkdir -p {}", quoted.join(" "))
}

// The temp link lives next to the final link so the rename
// stays on one filesystem. `mv -T` treats the link itself as
// the destination rather than descending into its target.
fn symlink_replace_command(target: &str, link: &str) -> String {
    let tmp = format!("{link}.tmp");
    format!(
        "ln -sfn {} {} && mv -T {} {}",
        shell_quote(target),
        shell_quote(&tmp),
        shell_quote(&tmp),
        shell_quote(link)
    )
}

fn entry_exists_command(path: &str) -> String {
    format!("test -e {p} && echo yes || echo no", p = shell_quote(path))
}

fn read_link_command(path: &str) -> String {
    format!("readlink {} 2>/dev/null || true", shell_quote(path))
}

fn list_entries_command(root: &str) -> String {
    format!("ls -1 {} 2>/dev/null || true", shell_quote(root))
}

fn remove_dir_command(path: &str) -> String {
    format!("rm -rf {}", shell_quote(path))
}
