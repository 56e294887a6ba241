//! Command-line surface, well-known locations and logging.

use clap::Parser;
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    version = "0.2.0",
    about = "Launches mpv as a fullscreen looping screensaver"
)]
pub struct Cli {
    #[arg(
        value_name = "MEDIA",
        help = "Files or URIs to play. Falls back to the configured media list if none are given."
    )]
    pub media: Vec<OsString>,

    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to the configuration file."
    )]
    pub config: Option<PathBuf>,

    #[arg(
        short = 'b',
        long = "player",
        value_name = "PATH",
        help = "Path to the mpv binary, will search in $PATH if not given."
    )]
    pub player: Option<String>,

    #[arg(
        short = 'd',
        long = "display",
        value_name = "N",
        help = "Display to cover, may be repeated. Overrides the configuration file."
    )]
    pub displays: Vec<u32>,

    #[arg(
        long = "cache-dir",
        value_name = "DIR",
        help = "Directory holding the generated mpv configuration."
    )]
    pub cache_dir: Option<PathBuf>,

    #[arg(
        long = "wait",
        help = "Stay in the foreground, and stop every player once one of them exits."
    )]
    pub wait: bool,

    #[arg(
        long = "dry-run",
        help = "Prints what would be done, but not really doing so."
    )]
    pub dry_run: bool,

    #[arg(long = "skip-missing", help = "Drop local files that do not exist.")]
    pub skip_missing: bool,

    #[arg(short = 'v', long = "verbose", help = "Print debug messages.")]
    pub verbose: bool,
}

/// Where the generated player configuration goes.
pub fn sys_cache_dir() -> PathBuf {
    if let Ok(mut value) = env::var("XDG_CACHE_HOME") {
        value.push_str("/mpvss");
        return PathBuf::from(value);
    }
    if let Ok(mut value) = env::var("HOME") {
        value.push_str("/.cache/mpvss");
        return PathBuf::from(value);
    }
    // Regenerated on every launch anyway
    PathBuf::from("/tmp/mpvss")
}

/// Where `mpvss.conf` is looked up when `--config` is not given.
pub fn sys_config_dir() -> Option<PathBuf> {
    let default;
    if let Ok(value) = env::var("XDG_CONFIG_HOME") {
        default = PathBuf::from(value + "/mpvss");
    } else if let Ok(value) = env::var("HOME") {
        default = PathBuf::from(value + "/.config/mpvss");
    } else {
        return None;
    }
    Some(default)
}

/// Sets up the global logger.
///
/// # Errors
/// Fails if a logger has already been installed.
pub fn setup_logger(verbose: bool) -> Result<(), fern::InitError> {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                message
            ));
        })
        .level(level)
        .chain(std::io::stdout())
        .apply()?;
    Ok(())
}
