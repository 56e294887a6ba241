//! Desktop notifications.

use std::process::Command;

use smol::process::Stdio;

use crate::backends::{TITLE, pretty_print};

/// Something that can tell the user about a problem.
///
/// Failing to notify is never an error, implementations only log it.
pub trait Notifier {
    /// Shows `message`, as a critical notification if `urgent`.
    fn notify(&self, message: &str, urgent: bool);
}

/// Notifies through `notify-send`.
pub struct NotifySend;

impl NotifySend {
    /// Gets the [`Command`] showing `message`.
    pub fn get_sys_command(message: &str, urgent: bool) -> Command {
        let urgency = if urgent { "critical" } else { "normal" };
        let mut sys_cmd = Command::new("notify-send");
        sys_cmd.args(["-a", TITLE, "-u", urgency, message]);
        sys_cmd
    }
}

impl Notifier for NotifySend {
    fn notify(&self, message: &str, urgent: bool) {
        let sys_cmd = Self::get_sys_command(message, urgent);
        log::debug!("running: {}", pretty_print(&sys_cmd));
        let mut cmd = smol::process::Command::from(sys_cmd);
        cmd.stdout(Stdio::null()).stderr(Stdio::null());
        match smol::block_on(cmd.status()) {
            Ok(status) if !status.success() => log::debug!("notify-send exited with {status}"),
            Ok(_) => {}
            Err(err) => log::debug!("cannot send notification: {err}"),
        }
    }
}
