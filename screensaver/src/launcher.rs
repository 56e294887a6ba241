//! Starts one player instance per display.
//!
//! By default the launcher exits as soon as every instance is running; the desktop environment is
//! expected to terminate the players on wake. With `wait`, it stays around and tears all
//! instances down once one of them exits.

use std::ffi::OsString;

use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;
use smol::process::{Child, Stdio};
use thiserror::Error;

use crate::backends::{self, Player};
use crate::config::ConfigError;
use crate::notify::{Notifier, NotifySend};
use crate::playlist::{self, Distribution};

/// At most this many "File not found" notifications are sent per launch.
const MAX_MISSING_NOTIFICATIONS: usize = 3;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),
    /// The player could not be started, `source` is the OS error.
    #[error("cannot start `{program}`: {source}")]
    Execution {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl LaunchError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            LaunchError::Execution { .. } => 1,
            LaunchError::Configuration(_) => 2,
        }
    }
}

/// A player started, or planned in a dry-run, on one display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    pub display: u32,
    pub playlist: Vec<OsString>,
    /// [`None`] in a dry-run.
    pub pid: Option<u32>,
}

pub struct Launcher<P: Player> {
    player: P,
    displays: Vec<u32>,
    distribution: Distribution,
    notifier: Option<Box<dyn Notifier>>,
    skip_missing: bool,
    dry_run: bool,
    wait: bool,
}

impl<P: Player> Launcher<P> {
    /// Creates a launcher covering `displays` with `player`.
    pub fn new(player: P, displays: Vec<u32>) -> Self {
        Self {
            player,
            displays,
            distribution: Distribution::default(),
            notifier: None,
            skip_missing: false,
            dry_run: false,
            wait: false,
        }
    }

    /// Sets how the playlist is shared between displays.
    pub fn distribution(&mut self, distribution: Distribution) -> &mut Self {
        self.distribution = distribution;
        self
    }
    /// Sets whether problems are also reported as desktop notifications through `notify-send`.
    pub fn notify(&mut self, notify: bool) -> &mut Self {
        self.notifier = if notify {
            Some(Box::new(NotifySend))
        } else {
            None
        };
        self
    }
    /// Reports problems through `notifier` instead.
    pub fn notifier(&mut self, notifier: impl Notifier + 'static) -> &mut Self {
        self.notifier = Some(Box::new(notifier));
        self
    }
    /// Sets whether local files that do not exist are dropped.
    pub fn skip_missing(&mut self, skip_missing: bool) -> &mut Self {
        self.skip_missing = skip_missing;
        self
    }
    /// Sets whether commands are only printed.
    pub fn dry_run(&mut self, dry_run: bool) -> &mut Self {
        self.dry_run = dry_run;
        self
    }
    /// Sets whether to supervise the instances until one exits.
    pub fn wait(&mut self, wait: bool) -> &mut Self {
        self.wait = wait;
        self
    }

    /// Resolves the playlist from `args` and `defaults` and launches it.
    ///
    /// # Errors
    /// - [`LaunchError::Configuration`] if there is nothing to play. No process is started.
    /// - [`LaunchError::Execution`] if the player cannot be prepared or spawned. Instances started
    ///   before the failure are terminated and reaped.
    pub fn run(
        &self,
        args: &[OsString],
        defaults: &[OsString],
    ) -> Result<Vec<Instance>, LaunchError> {
        let playlist = self.playlist(args, defaults).inspect_err(|err| {
            if matches!(err, ConfigError::NoMedia) {
                self.send_notification("No videos to play", true);
            }
        })?;
        self.launch(&playlist)
    }

    fn playlist(
        &self,
        args: &[OsString],
        defaults: &[OsString],
    ) -> Result<Vec<OsString>, ConfigError> {
        let playlist = playlist::resolve(args, defaults)?;
        if !self.skip_missing {
            return Ok(playlist);
        }
        let (kept, missing) = playlist::partition_missing(playlist);
        for (count, reference) in missing.iter().enumerate() {
            let reference = reference.to_string_lossy();
            log::warn!("file not found: {reference}, skipping");
            if count < MAX_MISSING_NOTIFICATIONS {
                self.send_notification(&format!("File not found: {reference}"), false);
            }
        }
        if kept.is_empty() {
            return Err(ConfigError::NoMedia);
        }
        Ok(kept)
    }

    /// Launches `playlist` on every display.
    ///
    /// # Errors
    /// See [`Launcher::run`].
    pub fn launch(&self, playlist: &[OsString]) -> Result<Vec<Instance>, LaunchError> {
        let shares = playlist::distribute(playlist, self.displays.len(), self.distribution);
        let planned: Vec<(u32, Vec<OsString>)> =
            self.displays.iter().copied().zip(shares).collect();

        if self.dry_run {
            return Ok(planned
                .into_iter()
                .map(|(display, share)| {
                    let sys_cmd = self.player.get_sys_command(display, &share);
                    log::info!(
                        "would launch on display {display}: {}",
                        backends::pretty_print(&sys_cmd)
                    );
                    Instance {
                        display,
                        playlist: share,
                        pid: None,
                    }
                })
                .collect());
        }

        self.player.prepare().map_err(|source| LaunchError::Execution {
            program: self.player.binary().to_string(),
            source,
        })?;

        let mut instances = Vec::new();
        let mut children = Vec::new();
        for (display, share) in planned {
            let sys_cmd = self.player.get_sys_command(display, &share);
            let program = sys_cmd.get_program().to_string_lossy().into_owned();
            log::debug!("running: {}", backends::pretty_print(&sys_cmd));
            let mut cmd = smol::process::Command::from(sys_cmd);
            cmd.stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null());
            match cmd.spawn() {
                Ok(child) => {
                    log::info!(
                        "launched {program} on display {display} with {} items",
                        share.len()
                    );
                    instances.push(Instance {
                        display,
                        playlist: share,
                        pid: Some(child.id()),
                    });
                    children.push((display, child));
                }
                Err(source) => {
                    stop_all(children);
                    self.send_notification(&format!("Cannot start {program}: {source}"), true);
                    return Err(LaunchError::Execution { program, source });
                }
            }
        }

        if self.wait {
            supervise(children);
        }
        Ok(instances)
    }

    fn send_notification(&self, message: &str, urgent: bool) {
        if let Some(notifier) = &self.notifier {
            notifier.notify(message, urgent);
        }
    }
}

/// Terminates every child and waits for each to exit.
fn stop_all(children: Vec<(u32, Child)>) {
    smol::block_on(async {
        for (display, mut child) in children {
            terminate(child.id());
            match child.status().await {
                Ok(status) => log::debug!("player on display {display} stopped: {status}"),
                Err(err) => log::warn!("cannot wait for player on display {display}: {err}"),
            }
        }
    });
}

/// Waits for any child to exit, then stops the others.
fn supervise(children: Vec<(u32, Child)>) {
    smol::block_on(async {
        let (tx, rx) = smol::channel::unbounded();
        let mut running = Vec::new();
        let mut tasks = Vec::new();
        for (display, mut child) in children {
            running.push((display, child.id()));
            let tx = tx.clone();
            tasks.push(smol::spawn(async move {
                let status = child.status().await;
                // The receiver only goes away once every task is awaited
                let _ = tx.send(display).await;
                (display, status)
            }));
        }
        drop(tx);

        let Ok(first) = rx.recv().await else {
            return;
        };
        log::info!("player on display {first} exited, stopping the others");
        let mut exited = vec![first];
        while let Ok(display) = rx.try_recv() {
            exited.push(display);
        }
        for (display, pid) in &running {
            if !exited.contains(display) {
                terminate(*pid);
            }
        }

        for task in tasks {
            match task.await {
                (display, Ok(status)) => log::debug!("player on display {display}: {status}"),
                (display, Err(err)) => log::warn!("cannot wait for player on display {display}: {err}"),
            }
        }
    });
}

/// Sends `SIGTERM` to a player.
fn terminate(pid: u32) {
    let Ok(raw) = i32::try_from(pid) else {
        log::warn!("pid {pid} out of range, cannot terminate it");
        return;
    };
    if let Err(err) = kill(Pid::from_raw(raw), Signal::SIGTERM) {
        log::warn!("failed to terminate player {pid}: {err}");
    }
}
