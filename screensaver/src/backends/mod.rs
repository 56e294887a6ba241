//! General trait of a player backend.

mod mpv;

pub use mpv::{Mpv, TITLE};

use std::ffi::OsString;
use std::process::Command;

pub trait Player {
    /// The executable that is spawned.
    fn binary(&self) -> &str;

    /// Writes whatever the player needs on disk before any instance starts.
    ///
    /// # Errors
    /// Any I/O failure while doing so.
    fn prepare(&self) -> std::io::Result<()>;

    /// Gets the [`Command`] that plays `playlist` fullscreen on `display`.
    fn get_sys_command(&self, display: u32, playlist: &[OsString]) -> Command;
}

/// Renders a [`Command`] as one line for logs and dry-runs.
pub fn pretty_print(cmd: &Command) -> String {
    let mut result = cmd.get_program().to_string_lossy().into_owned();
    for arg in cmd.get_args() {
        result.push(' ');
        result.push_str(&arg.to_string_lossy());
    }
    result
}
