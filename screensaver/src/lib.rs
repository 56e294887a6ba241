//! # mpvss
//!
//! Launches `mpv` fullscreen and looping, one instance per display, so it can be used as a
//! screensaver.
//!
//! The desktop environment runs `mpvss` on its idle timer and is responsible for terminating the
//! players on wake; the players themselves also quit on any key or button press.

pub mod backends;
pub mod cli;
pub mod config;
pub mod directives;
pub mod displays;
pub mod launcher;
pub mod notify;
pub mod playlist;

use std::process::ExitCode;

pub use config::{Config, ConfigError};
pub use launcher::{Instance, LaunchError, Launcher};

use crate::backends::Mpv;
use crate::cli::Cli;

/// Builds the [`Config`] for `args` and launches the players.
///
/// # Errors
/// See [`LaunchError`].
pub fn launch(args: &Cli) -> Result<Vec<Instance>, LaunchError> {
    let config = Config::from_cli(args)?;
    let displays = displays::resolve(&config.displays);
    let mut launcher = Launcher::new(Mpv::new(&config), displays);
    launcher
        .distribution(config.distribution)
        .notify(config.notify)
        .skip_missing(config.skip_missing)
        .dry_run(args.dry_run)
        .wait(args.wait);
    launcher.run(&args.media, &config.media)
}

/// Like [`launch`], but reports the result and turns it into an exit status.
pub fn run(args: &Cli) -> ExitCode {
    match launch(args) {
        Ok(instances) => {
            log::debug!("{} instance(s) handled", instances.len());
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
