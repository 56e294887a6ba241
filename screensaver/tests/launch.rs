//! Tests launching players from the command line

use std::ffi::{OsStr, OsString};
use std::os::unix::ffi::OsStrExt;

use clap::Parser;
use mpvss::cli::Cli;
use mpvss::{ConfigError, LaunchError};

mod common;

#[test]
fn single_video() {
    common::setup();
    let cache = common::cache_dir("single");
    let args = common::cli(&[
        "--config",
        "../confs/empty.conf",
        "--player",
        "true",
        "--cache-dir",
        cache.to_str().unwrap(),
        "video.mkv",
    ]);

    let instances = mpvss::launch(&args).unwrap();
    assert_eq!(instances.len(), 1);
    assert_eq!(instances[0].display, 0);
    assert_eq!(instances[0].playlist, vec!["video.mkv"]);
    assert!(instances[0].pid.is_some());
    assert!(cache.join("input.conf").is_file());
    common::finalise("single");
}

#[test]
fn default_media_list() {
    common::setup();
    let cache = common::cache_dir("defaults");
    let args = common::cli(&[
        "--config",
        "../confs/default.conf",
        "--player",
        "true",
        "--cache-dir",
        cache.to_str().unwrap(),
    ]);

    let instances = mpvss::launch(&args).unwrap();
    assert_eq!(instances.len(), 1);
    assert_eq!(instances[0].playlist, vec!["a.jpg", "b.mp3"]);
    common::finalise("defaults");
}

#[test]
fn one_instance_per_display() {
    common::setup();
    let cache = common::cache_dir("twin");
    let args = common::cli(&[
        "--config",
        "../confs/twin.conf",
        "--player",
        "true",
        "--cache-dir",
        cache.to_str().unwrap(),
        "--wait",
    ]);

    let instances = mpvss::launch(&args).unwrap();
    let displays: Vec<u32> = instances.iter().map(|instance| instance.display).collect();
    assert_eq!(displays, vec![0, 1]);
    assert!(
        instances
            .iter()
            .all(|instance| instance.playlist == vec!["a.jpg", "b.mp3"])
    );
    common::finalise("twin");
}

#[test]
fn no_media_at_all() {
    common::setup();
    let cache = common::cache_dir("empty");
    // A player that cannot exist: reaching the spawn would turn this into an execution error
    let args = common::cli(&[
        "--config",
        "../confs/empty.conf",
        "--player",
        "/nonexistent/mpv",
        "--cache-dir",
        cache.to_str().unwrap(),
    ]);

    let err = mpvss::launch(&args).unwrap_err();
    assert!(matches!(
        err,
        LaunchError::Configuration(ConfigError::NoMedia)
    ));
    assert_eq!(err.exit_code(), 2);
    assert!(!cache.exists());
}

#[test]
fn missing_player() {
    common::setup();
    let cache = common::cache_dir("missing");
    let args = common::cli(&[
        "--config",
        "../confs/empty.conf",
        "--player",
        "/nonexistent/mpv",
        "--cache-dir",
        cache.to_str().unwrap(),
        "video.mkv",
    ]);

    let err = mpvss::launch(&args).unwrap_err();
    assert_eq!(err.exit_code(), 1);
    match err {
        LaunchError::Execution { program, source } => {
            assert_eq!(program, "/nonexistent/mpv");
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("expected an execution error, got {other:?}"),
    }
    common::finalise("missing");
}

#[test]
fn unreadable_config() {
    common::setup();
    let args = common::cli(&["--config", "../confs/not-there.conf", "video.mkv"]);
    assert!(matches!(
        mpvss::launch(&args),
        Err(LaunchError::Configuration(ConfigError::Unreadable { .. }))
    ));
}

#[test]
fn non_utf8_file_name() {
    common::setup();
    let cache = common::cache_dir("latin1");
    let latin1 = OsStr::from_bytes(b"caf\xe9.mkv");
    let args = Cli::try_parse_from([
        OsStr::new("mpvss"),
        OsStr::new("--config"),
        OsStr::new("../confs/empty.conf"),
        OsStr::new("--cache-dir"),
        cache.as_os_str(),
        OsStr::new("--dry-run"),
        latin1,
    ])
    .unwrap();

    let instances = mpvss::launch(&args).unwrap();
    assert_eq!(instances[0].playlist, vec![OsString::from(latin1)]);
}
