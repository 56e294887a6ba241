//! Launch configuration.
//!
//! A [`Config`] is built once at start from the built-in defaults, then the configuration file,
//! then command-line overrides, and is passed to whatever needs it.

use std::collections::BTreeMap;
use std::env;
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::cli::{self, Cli};
use crate::directives::{self, Directive};
use crate::displays::DisplaySelection;
use crate::playlist::Distribution;

/// Name of the configuration file inside the configuration directory.
pub const CONFIG_FILE: &str = "mpvss.conf";

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Neither the command line nor the configuration provide anything to play.
    #[error("no media to play")]
    NoMedia,
    #[error("cannot read configuration file {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Played when no media is given on the command line.
    pub media: Vec<OsString>,
    pub displays: DisplaySelection,
    pub distribution: Distribution,
    pub player: String,
    pub image_duration: Duration,
    pub audio: bool,
    pub notify: bool,
    pub skip_missing: bool,
    /// Extra options passed to the player as `--key=value`.
    pub options: BTreeMap<String, String>,
    pub cache_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            media: Vec::new(),
            displays: DisplaySelection::default(),
            distribution: Distribution::default(),
            player: String::from("mpv"),
            image_duration: Duration::from_secs(7),
            audio: false,
            notify: true,
            skip_missing: false,
            options: BTreeMap::new(),
            cache_dir: cli::sys_cache_dir(),
        }
    }
}

impl Config {
    /// Builds the configuration for this invocation.
    ///
    /// Uses the file given with `--config`, or `mpvss.conf` in the configuration directory if it
    /// exists, then applies the command-line overrides.
    ///
    /// # Errors
    /// A file given with `--config` that cannot be read, or a default file that exists but cannot
    /// be read, results in [`ConfigError::Unreadable`].
    pub fn from_cli(args: &Cli) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = &args.config {
            Self::load(path)?
        } else if let Some(dir) = cli::sys_config_dir() {
            let path = dir.join(CONFIG_FILE);
            if path.is_file() {
                Self::load(&path)?
            } else {
                log::debug!("{} does not exist, using defaults", path.display());
                Self::default()
            }
        } else {
            log::warn!("cannot find configuration directory as $XDG_CONFIG_HOME and $HOME are not valid");
            Self::default()
        };
        config.override_with(args);
        Ok(config)
    }

    /// Reads a configuration file on top of the defaults.
    ///
    /// Lines that cannot be decoded or parsed are reported and skipped.
    ///
    /// # Errors
    /// [`ConfigError::Unreadable`] if the file cannot be opened.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::default();
        for (line_no, line) in BufReader::new(file).lines().enumerate() {
            let text = match line {
                Ok(text) => text,
                Err(err) => {
                    log::warn!(
                        "{}:{} error: {}, skipping",
                        path.to_string_lossy(),
                        line_no + 1,
                        err
                    );
                    continue;
                }
            };
            let trimmed = text.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            match directives::parse(trimmed) {
                Ok(directive) => config.apply(directive),
                Err(err) => log::warn!(
                    "{}:{} error: {}, skipping",
                    path.to_string_lossy(),
                    line_no + 1,
                    err
                ),
            }
        }
        Ok(config)
    }

    /// Applies one [`Directive`].
    pub fn apply(&mut self, directive: Directive) {
        let home = env::var("HOME").ok();
        match directive {
            Directive::Media(reference) => {
                self.media.push(expand_home(&reference, home.as_deref()).into());
            }
            Directive::Display(selection) => self.displays = selection,
            Directive::Distribution(distribution) => self.distribution = distribution,
            Directive::Player(path) => self.player = expand_home(&path, home.as_deref()),
            Directive::ImageDuration(duration) => self.image_duration = duration,
            Directive::Audio(value) => self.audio = value,
            Directive::Notify(value) => self.notify = value,
            Directive::SkipMissing(value) => self.skip_missing = value,
            Directive::Set(options) => self.options.extend(options),
        }
    }

    /// Lets command-line arguments take precedence over the file.
    pub fn override_with(&mut self, args: &Cli) {
        if let Some(player) = &args.player {
            player.clone_into(&mut self.player);
        }
        if !args.displays.is_empty() {
            self.displays = DisplaySelection::Indices(args.displays.clone());
        }
        if let Some(dir) = &args.cache_dir {
            dir.clone_into(&mut self.cache_dir);
        }
        if args.skip_missing {
            self.skip_missing = true;
        }
    }
}

/// Replaces a leading `~/` with the home directory.
fn expand_home(reference: &str, home: Option<&str>) -> String {
    match (reference.strip_prefix("~/"), home) {
        (Some(relative), Some(home)) => format!("{}/{relative}", home.trim_end_matches('/')),
        _ => reference.to_string(),
    }
}
