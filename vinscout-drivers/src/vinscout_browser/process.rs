//! Lifecycle of the WebDriver helper process.
//!
//! The session spawns its own geckodriver and is the only owner of that
//! child. Teardown terminates the tracked PID alone, never other instances
//! of the helper that happen to be running.

use std::process::Stdio;
use std::time::Duration;

use sysinfo::{Pid, ProcessesToUpdate, System};
use tokio::process::{Child, Command};
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, info, warn};
use vinscout_common::{Result, VinscoutError};

const READY_POLL_INTERVAL: Duration = Duration::from_millis(200);
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// A spawned WebDriver helper, tracked by PID from launch to teardown.
pub struct DriverProcess {
    child: Child,
    pid: Option<u32>,
    binary: String,
}

impl DriverProcess {
    /// Spawn the helper listening on `port`.
    pub fn spawn(binary: &str, port: u16) -> Result<Self> {
        let child = Command::new(binary)
            .arg("--port")
            .arg(port.to_string())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                VinscoutError::DriverLaunch(format!("failed to spawn {binary}: {e}"))
            })?;

        let pid = child.id();
        info!(binary, port, pid, "spawned webdriver helper");
        Ok(Self {
            child,
            pid,
            binary: binary.to_string(),
        })
    }

    /// Poll the helper's `/status` endpoint until it reports ready.
    pub async fn wait_ready(&mut self, port: u16, limit: Duration) -> Result<()> {
        let status_url = format!("http://127.0.0.1:{port}/status");
        let deadline = Instant::now() + limit;

        loop {
            if let Some(status) = self.child.try_wait().ok().flatten() {
                return Err(VinscoutError::DriverLaunch(format!(
                    "{} exited during startup: {status}",
                    self.binary
                )));
            }

            if let Ok(resp) = reqwest::get(&status_url).await {
                if let Ok(body) = resp.json::<serde_json::Value>().await {
                    if body["value"]["ready"].as_bool().unwrap_or(false) {
                        debug!(%status_url, "webdriver helper ready");
                        return Ok(());
                    }
                }
            }

            if Instant::now() >= deadline {
                return Err(VinscoutError::DriverLaunch(format!(
                    "{status_url} never became ready"
                )));
            }
            sleep(READY_POLL_INTERVAL).await;
        }
    }

    /// Terminate the tracked child and confirm it left the process table.
    pub async fn shutdown(&mut self) {
        info!(binary = %self.binary, pid = self.pid, "terminating webdriver helper");
        if let Err(e) = self.child.start_kill() {
            debug!(error = %e, "child already finished");
        }
        if timeout(SHUTDOWN_GRACE, self.child.wait()).await.is_err() {
            warn!(pid = self.pid, "helper did not exit within grace period");
        }
        if let Some(pid) = self.pid {
            reap_pid(pid);
        }
    }
}

/// Force-kill `pid` if it is still in the process table. Targets only the
/// tracked PID so unrelated helper instances survive.
fn reap_pid(pid: u32) {
    let target = Pid::from_u32(pid);
    let mut sys = System::new();
    sys.refresh_processes(ProcessesToUpdate::Some(&[target]), true);

    if let Some(proc_) = sys.process(target) {
        let name = proc_.name().to_string_lossy().to_string();
        if proc_.kill() {
            warn!(pid, %name, "helper survived graceful shutdown; killed");
        } else {
            warn!(pid, %name, "failed to kill surviving helper process");
        }
    }
}
