use serde::{Deserialize, Serialize};

/// What kind of entry a shared resource is. Declared
/// explicitly per resource; never inferred from the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Directory,
    File,
}

/// A persistent resource living in shared storage and linked
/// into every release (uploads, databases, environment files).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedResource {
    pub name: String,
    pub kind: ResourceKind,
}

impl SharedResource {
    #[must_use]
    pub fn directory(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: ResourceKind::Directory,
        }
    }

    #[must_use]
    pub fn file(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: ResourceKind::File,
        }
    }

    #[must_use]
    pub const fn is_directory(&self) -> bool {
        matches!(self.kind, ResourceKind::Directory)
    }
}

/// Defines the application being deployed: how to build it,
/// where its artifacts land, and which resources persist
/// across releases.
///
/// # Example
///
/// ```
/// use capstan::App;
///
/// let app = App::new("my-service")
///     .build_command("npm run build")
///     .dist_dir("dist")
///     .assets_dir("public")
///     .shared_dir("uploads")
///     .shared_file("db.sqlite");
///
/// assert_eq!(app.name, "my-service");
/// assert_eq!(app.shared.len(), 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct App {
    pub name: String,
    #[serde(default = "default_source_dir")]
    pub source_dir: String,
    #[serde(default = "default_install_command")]
    pub install_command: String,
    #[serde(default = "default_build_command")]
    pub build_command: String,
    #[serde(default = "default_dist_dir")]
    pub dist_dir: String,
    #[serde(default)]
    pub assets_dir: Option<String>,
    #[serde(default)]
    pub shared: Vec<SharedResource>,
    #[serde(default)]
    pub excludes: Vec<String>,
}

impl App {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            source_dir: default_source_dir(),
            install_command: default_install_command(),
            build_command: default_build_command(),
            dist_dir: default_dist_dir(),
            assets_dir: None,
            shared: Vec::new(),
            excludes: Vec::new(),
        }
    }

    /// Local directory the app is built from. Defaults to the
    /// current directory.
    #[must_use]
    pub fn source_dir(mut self, dir: &str) -> Self {
        self.source_dir = dir.to_string();
        self
    }

    #[must_use]
    pub fn install_command(mut self, command: &str) -> Self {
        self.install_command = command.to_string();
        self
    }

    #[must_use]
    pub fn build_command(mut self, command: &str) -> Self {
        self.build_command = command.to_string();
        self
    }

    /// Directory (relative to the source dir) the build writes
    /// its artifacts into.
    #[must_use]
    pub fn dist_dir(mut self, dir: &str) -> Self {
        self.dist_dir = dir.to_string();
        self
    }

    /// Static assets overlaid onto the release after the
    /// artifact upload. Collisions are last-writer-wins.
    #[must_use]
    pub fn assets_dir(mut self, dir: &str) -> Self {
        self.assets_dir = Some(dir.to_string());
        self
    }

    /// Declare a directory-kind shared resource.
    #[must_use]
    pub fn shared_dir(mut self, name: &str) -> Self {
        self.shared.push(SharedResource::directory(name));
        self
    }

    /// Declare a file-kind shared resource.
    #[must_use]
    pub fn shared_file(mut self, name: &str) -> Self {
        self.shared.push(SharedResource::file(name));
        self
    }

    /// Extra exclude pattern for the artifact transfer, on top
    /// of the built-in ones.
    #[must_use]
    pub fn exclude(mut self, pattern: &str) -> Self {
        self.excludes.push(pattern.to_string());
        self
    }
}

fn default_source_dir() -> String {
    ".".to_string()
}

fn default_install_command() -> String {
    "npm ci".to_string()
}

fn default_build_command() -> String {
    "npm run build".to_string()
}

fn default_dist_dir() -> String {
    "dist".to_string()
}
