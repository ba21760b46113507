use std::path::Path;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::app::App;
use crate::error::{DeployError, DeployResult};

/// Environment variable overriding the configured environment
/// name at run time.
pub const ENV_OVERRIDE_VAR: &str = "DEPLOY_ENV";

/// Everything a deployment run needs to know, assembled once
/// at startup and passed by reference into each stage.
///
/// The remote layout derived from `deploy_root`:
///
/// ```text
/// <deploy_root>/
///   releases/<YYYYMMDDHHMMSS>/   one immutable snapshot per deploy
///   shared/                      data persisting across releases
///   current -> releases/<id>     the active release
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app: App,
    pub host: String,
    #[serde(default = "default_user")]
    pub user: String,
    #[serde(default)]
    pub identity: Option<String>,
    pub deploy_root: String,
    #[serde(default = "default_keep_releases")]
    pub keep_releases: usize,
    #[serde(default = "default_environment")]
    pub environment: String,
}

impl Config {
    #[must_use]
    pub fn new(app: App, host: &str) -> Self {
        let deploy_root = format!("/opt/{}", app.name);
        Self {
            app,
            host: host.to_string(),
            user: default_user(),
            identity: None,
            deploy_root,
            keep_releases: default_keep_releases(),
            environment: default_environment(),
        }
    }

    /// Load a full configuration from a YAML manifest.
    pub fn from_file(path: &str) -> DeployResult<Self> {
        if !Path::new(path).exists() {
            return Err(DeployError::FileNotFound(path.to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    #[must_use]
    pub fn user(mut self, user: &str) -> Self {
        self.user = user.to_string();
        self
    }

    #[must_use]
    pub fn identity(mut self, key_path: &str) -> Self {
        self.identity = Some(key_path.to_string());
        self
    }

    #[must_use]
    pub fn deploy_root(mut self, path: &str) -> Self {
        self.deploy_root = path.to_string();
        self
    }

    #[must_use]
    pub fn keep_releases(mut self, count: usize) -> Self {
        self.keep_releases = count;
        self
    }

    #[must_use]
    pub fn environment(mut self, name: &str) -> Self {
        self.environment = name.to_string();
        self
    }

    /// Reject configurations that cannot deploy safely. Run
    /// once before any stage touches the filesystem.
    pub fn validate(&self) -> DeployResult<()> {
        if self.host.trim().is_empty() {
            return Err(DeployError::Config("host must not be empty".into()));
        }
        if self.user.trim().is_empty() {
            return Err(DeployError::Config("user must not be empty".into()));
        }
        if !self.deploy_root.starts_with('/') {
            return Err(DeployError::Config(format!(
                "deploy_root must be an absolute path, got '{}'",
                self.deploy_root
            )));
        }
        if self.keep_releases == 0 {
            return Err(DeployError::Config(
                "keep_releases must be at least 1".into(),
            ));
        }

        let mut seen = IndexSet::new();
        for resource in &self.app.shared {
            let name = resource.name.as_str();
            if name.is_empty() {
                return Err(DeployError::Config(
                    "shared resource name must not be empty".into(),
                ));
            }
            if name.contains('/') || name == "." || name == ".." {
                return Err(DeployError::Config(format!(
                    "shared resource name '{name}' must be a plain entry name"
                )));
            }
            if !seen.insert(name) {
                return Err(DeployError::Config(format!(
                    "duplicate shared resource '{name}'"
                )));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn releases_root(&self) -> String {
        self.rooted("releases")
    }

    #[must_use]
    pub fn shared_root(&self) -> String {
        self.rooted("shared")
    }

    #[must_use]
    pub fn current_link(&self) -> String {
        self.rooted("current")
    }

    #[must_use]
    pub fn release_dir(&self, release: &str) -> String {
        format!("{}/{release}", self.releases_root())
    }

    #[must_use]
    pub fn shared_path(&self, name: &str) -> String {
        format!("{}/{name}", self.shared_root())
    }

    /// The environment name effective for this run:
    /// `DEPLOY_ENV` when set and non-empty, the configured
    /// default otherwise.
    #[must_use]
    pub fn resolved_environment(&self) -> String {
        resolve_environment(
            &self.environment,
            std::env::var(ENV_OVERRIDE_VAR).ok().as_deref(),
        )
    }

    /// Name of the environment file in shared storage for a
    /// resolved environment, e.g. `.env.production`.
    #[must_use]
    pub fn env_file_name(environment: &str) -> String {
        format!(".env.{environment}")
    }

    fn rooted(&self, entry: &str) -> String {
        format!("{}/{entry}", self.deploy_root.trim_end_matches('/'))
    }
}

/// Pure half of [`Config::resolved_environment`], split out so
/// the precedence rule is testable without touching process
/// state.
#[must_use]
pub fn resolve_environment(configured: &str, env_override: Option<&str>) -> String {
    match env_override {
        Some(value) if !value.trim().is_empty() => value.to_string(),
        _ => configured.to_string(),
    }
}

fn default_user() -> String {
    "deploy".to_string()
}

const fn default_keep_releases() -> usize {
    5
}

fn default_environment() -> String {
    "production".to_string()
}
