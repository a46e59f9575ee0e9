use std::process::{Command, Stdio};
use std::time::Duration;

use tracing::debug;

use super::Notifier;

/// Sends notifications through `notify-send`.
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    app_name: String,
}

impl DesktopNotifier {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, summary: &str, body: &str, timeout: Duration) {
        let spawned = Command::new("notify-send")
            .args(["-a", &self.app_name, "-t"])
            .arg(timeout.as_millis().to_string())
            .arg(summary)
            .arg(body)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            // Reap in the background so the daemon does not collect zombies.
            Ok(mut child) => {
                std::thread::spawn(move || {
                    let _ = child.wait();
                });
            }
            Err(err) => debug!(%err, "notify-send unavailable"),
        }
    }
}

/// Drops every notification; used for `--quiet` and `notify = false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, _summary: &str, _body: &str, _timeout: Duration) {}
}
