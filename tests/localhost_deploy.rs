//! Integration test: run a real deploy against localhost over
//! SSH. Requires `ssh localhost` to work without a prompt and
//! `rsync` on PATH. Skipped in normal `cargo test` runs unless
//! the `integration` feature is enabled.

#![cfg(feature = "integration")]

use std::fs;
use std::path::Path;

use capstan::ssh::SshSession;
use capstan::{App, Config, Rsync, SshRemote, deploy};

#[test]
fn deploy_to_localhost() {
    let user = std::env::var("USER").expect("USER not set");

    let local = tempfile::tempdir().expect("tempdir");
    fs::create_dir(local.path().join("dist")).unwrap();
    fs::write(local.path().join("dist/index.html"), "<html>ok</html>").unwrap();
    fs::create_dir(local.path().join("uploads")).unwrap();
    fs::write(local.path().join("uploads/a.txt"), "asset").unwrap();

    let root = tempfile::tempdir().expect("tempdir");
    let deploy_root = root.path().to_str().unwrap().to_string();

    let app = App::new("itest")
        .source_dir(local.path().to_str().unwrap())
        .shared_dir("uploads");
    let config = Config::new(app, "localhost")
        .user(&user)
        .deploy_root(&deploy_root)
        .keep_releases(2);

    let remote = SshRemote::new(SshSession::new(&config.host, &config.user));
    let rsync = Rsync::new(&config.host, &config.user);

    let summary = deploy::run(&config, &remote, &rsync).expect("deploy failed");

    let target = fs::read_link(root.path().join("current")).expect("current missing");
    assert!(target.ends_with(&summary.release));
    assert!(Path::new(&target).join("index.html").is_file());
    assert!(Path::new(&target).join("uploads").join("a.txt").is_file());
}
