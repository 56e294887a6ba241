//! Builds the playlist handed to every player instance.

use std::ffi::{OsStr, OsString};
use std::path::Path;

use crate::config::ConfigError;

/// How a playlist is shared when more than one display is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Distribution {
    /// Every display plays the whole playlist.
    #[default]
    Replicate,
    /// Items are dealt to displays in turn.
    Split,
}

/// Picks the playlist: `args` if any were given, otherwise `defaults`.
///
/// # Errors
/// Returns [`ConfigError::NoMedia`] if both are empty.
pub fn resolve(args: &[OsString], defaults: &[OsString]) -> Result<Vec<OsString>, ConfigError> {
    let playlist = if args.is_empty() { defaults } else { args };
    if playlist.is_empty() {
        return Err(ConfigError::NoMedia);
    }
    Ok(playlist.to_vec())
}

/// Whether a reference names something on the local file system rather than a URI.
///
/// URIs are plain ASCII, so a reference that is not valid UTF-8 is always a local path.
pub fn is_local(reference: &OsStr) -> bool {
    let Some(reference) = reference.to_str() else {
        return true;
    };
    match reference.split_once("://") {
        Some((scheme, _)) => {
            scheme.is_empty()
                || !scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => true,
    }
}

/// Splits a playlist into references that can be played and local files that do not exist.
pub fn partition_missing(playlist: Vec<OsString>) -> (Vec<OsString>, Vec<OsString>) {
    playlist
        .into_iter()
        .partition(|reference| !is_local(reference) || Path::new(reference).exists())
}

/// Gives each of `displays` displays its own playlist.
///
/// With [`Distribution::Split`], display `j` gets every item whose index `i` satisfies
/// `i % displays == j`. A display that would end up with nothing gets item `j % len` instead.
pub fn distribute(
    playlist: &[OsString],
    displays: usize,
    distribution: Distribution,
) -> Vec<Vec<OsString>> {
    match distribution {
        Distribution::Replicate => vec![playlist.to_vec(); displays],
        Distribution::Split => (0..displays)
            .map(|display| {
                let share: Vec<OsString> = playlist
                    .iter()
                    .skip(display)
                    .step_by(displays)
                    .cloned()
                    .collect();
                if share.is_empty() && !playlist.is_empty() {
                    vec![playlist[display % playlist.len()].clone()]
                } else {
                    share
                }
            })
            .collect(),
    }
}
