use crate::cmd;
use crate::error::DeployResult;

/// Options for one mirror operation.
#[derive(Debug, Clone, Default)]
pub struct MirrorOptions {
    /// Delete remote entries absent from the local side. Only
    /// the artifact mirror into a fresh release directory sets
    /// this; syncs into shared storage never do.
    pub delete: bool,
    /// Patterns excluded from the transfer.
    pub excludes: Vec<String>,
}

impl MirrorOptions {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delete: false,
            excludes: Vec::new(),
        }
    }

    #[must_use]
    pub const fn delete(mut self) -> Self {
        self.delete = true;
        self
    }

    #[must_use]
    pub fn exclude(mut self, pattern: &str) -> Self {
        self.excludes.push(pattern.to_string());
        self
    }
}

/// A transfer copies local trees to the remote host as a delta
/// transfer.
pub trait Transfer {
    /// Mirror `local` to the remote absolute path `remote`.
    /// A trailing `/` on `local` copies directory contents
    /// rather than the directory itself, rsync-style.
    fn mirror(&self, local: &str, remote: &str, opts: &MirrorOptions) -> DeployResult<()>;
}

/// [`Transfer`] implementation shelling out to `rsync` over SSH.
pub struct Rsync {
    host: String,
    user: String,
    key: Option<String>,
}

impl Rsync {
    #[must_use]
    pub fn new(host: &str, user: &str) -> Self {
        Self {
            host: host.to_string(),
            user: user.to_string(),
            key: None,
        }
    }

    #[must_use]
    pub fn with_key(mut self, key_path: &str) -> Self {
        self.key = Some(key_path.to_string());
        self
    }

    fn build_args(&self, local: &str, remote: &str, opts: &MirrorOptions) -> Vec<String> {
        let mut args = vec!["-az".to_string()];
        if opts.delete {
            args.push("--delete".to_string());
        }
        for pattern in &opts.excludes {
            args.push(format!("--exclude={pattern}"));
        }
        args.push("-e".to_string());
        args.push(self.ssh_transport());
        args.push(local.to_string());
        args.push(format!("{}@{}:{remote}", self.user, self.host));
        args
    }

    fn ssh_transport(&self) -> String {
        let mut transport = "ssh -o StrictHostKeyChecking=accept-new \
                             -o ConnectTimeout=10"
            .to_string();
        if let Some(key) = &self.key {
            transport.push_str(" -i ");
            transport.push_str(key);
        }
        transport
    }
}

impl Transfer for Rsync {
    fn mirror(&self, local: &str, remote: &str, opts: &MirrorOptions) -> DeployResult<()> {
        let args = self.build_args(local, remote, opts);
        let refs: Vec<&str> = args.iter().map(String::as_str).collect();
        cmd::run_interactive("rsync", &refs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_args() {
        let rsync = Rsync::new("example.com", "deploy");
        let args = rsync.build_args("dist/", "/opt/app/releases/x", &MirrorOptions::new());

        assert_eq!(args[0], "-az");
        assert!(!args.contains(&"--delete".to_string()));
        assert_eq!(args[args.len() - 2], "dist/");
        assert_eq!(args[args.len() - 1], "deploy@example.com:/opt/app/releases/x");
    }

    #[test]
    fn delete_and_excludes() {
        let rsync = Rsync::new("example.com", "deploy");
        let opts = MirrorOptions::new()
            .delete()
            .exclude(".git")
            .exclude("node_modules");
        let args = rsync.build_args("dist/", "/opt/app/releases/x", &opts);

        assert!(args.contains(&"--delete".to_string()));
        assert!(args.contains(&"--exclude=.git".to_string()));
        assert!(args.contains(&"--exclude=node_modules".to_string()));
    }

    #[test]
    fn identity_file_reaches_transport() {
        let rsync = Rsync::new("example.com", "deploy").with_key("/home/me/.ssh/deploy_ed25519");
        let args = rsync.build_args("dist/", "/opt/app", &MirrorOptions::new());

        let transport = &args[args.iter().position(|a| a == "-e").unwrap() + 1];
        assert!(transport.starts_with("ssh "));
        assert!(transport.ends_with("-i /home/me/.ssh/deploy_ed25519"));
    }
}
