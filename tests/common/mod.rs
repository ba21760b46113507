#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use capstan::error::DeployResult;
use capstan::transfer::MirrorOptions;
use capstan::{Remote, Transfer};

/// In-memory stand-in for the remote filesystem. Records every
/// operation in order so tests can assert on sequencing, and
/// keeps enough state (dirs, files, links) to answer probes the
/// way a real host would.
#[derive(Default)]
pub struct FakeRemote {
    pub ops: RefCell<Vec<String>>,
    pub dirs: RefCell<BTreeSet<String>>,
    pub files: RefCell<BTreeSet<String>>,
    pub links: RefCell<BTreeMap<String, String>>,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> Vec<String> {
        self.ops.borrow().clone()
    }

    pub fn seed_dir(&self, path: &str) {
        self.dirs.borrow_mut().insert(path.to_string());
    }

    pub fn seed_file(&self, path: &str) {
        self.files.borrow_mut().insert(path.to_string());
    }

    pub fn link_target(&self, link: &str) -> Option<String> {
        self.links.borrow().get(link).cloned()
    }

    pub fn has_dir(&self, path: &str) -> bool {
        self.dirs.borrow().contains(path)
    }

    /// Index of the first recorded op containing `needle`.
    pub fn pos(&self, needle: &str) -> usize {
        self.ops
            .borrow()
            .iter()
            .position(|op| op.contains(needle))
            .unwrap_or_else(|| panic!("no op containing '{needle}'"))
    }

    fn exists(&self, path: &str) -> bool {
        self.dirs.borrow().contains(path)
            || self.files.borrow().contains(path)
            || self.links.borrow().contains_key(path)
    }

    fn record(&self, op: String) {
        self.ops.borrow_mut().push(op);
    }
}

impl Remote for FakeRemote {
    fn create_dirs(&self, paths: &[String]) -> DeployResult<()> {
        for path in paths {
            self.dirs.borrow_mut().insert(path.clone());
        }
        self.record(format!("mkdir {}", paths.join(" ")));
        Ok(())
    }

    fn symlink_replace(&self, target: &str, link: &str) -> DeployResult<()> {
        self.links
            .borrow_mut()
            .insert(link.to_string(), target.to_string());
        self.record(format!("link {link} -> {target}"));
        Ok(())
    }

    fn entry_exists(&self, path: &str) -> DeployResult<bool> {
        self.record(format!("exists {path}"));
        Ok(self.exists(path))
    }

    fn read_link(&self, path: &str) -> DeployResult<Option<String>> {
        self.record(format!("readlink {path}"));
        Ok(self.links.borrow().get(path).cloned())
    }

    fn list_entries(&self, root: &str) -> DeployResult<Vec<String>> {
        self.record(format!("list {root}"));
        let prefix = format!("{root}/");
        let names = self
            .dirs
            .borrow()
            .iter()
            .filter_map(|d| d.strip_prefix(&prefix))
            .filter(|rest| !rest.is_empty() && !rest.contains('/'))
            .map(ToString::to_string)
            .collect();
        Ok(names)
    }

    fn remove_dir(&self, path: &str) -> DeployResult<()> {
        self.dirs.borrow_mut().remove(path);
        self.record(format!("rm -rf {path}"));
        Ok(())
    }
}

/// Transfer fake that marks the destination present on the
/// paired [`FakeRemote`] and logs into the same op stream, so
/// cross-collaborator ordering is visible in one place.
pub struct FakeTransfer<'a> {
    remote: &'a FakeRemote,
}

impl<'a> FakeTransfer<'a> {
    pub fn new(remote: &'a FakeRemote) -> Self {
        Self { remote }
    }
}

impl Transfer for FakeTransfer<'_> {
    fn mirror(&self, local: &str, remote: &str, opts: &MirrorOptions) -> DeployResult<()> {
        if local.ends_with('/') {
            self.remote.dirs.borrow_mut().insert(remote.to_string());
        } else {
            self.remote.files.borrow_mut().insert(remote.to_string());
        }
        self.remote.record(format!(
            "mirror {local} -> {remote} (delete={})",
            opts.delete
        ));
        Ok(())
    }
}
