//! Driver management - spawning and health checking a local WebDriver binary

use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::{info, warn};

use crate::error::{E2eError, E2eResult};

/// Configuration for spawning a driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Path to the driver binary (e.g. chromedriver). None = connect to `webdriver.url`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binary_path: Option<PathBuf>,

    /// Port to listen on (None = find free port)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Timeout for driver startup
    pub startup_timeout_secs: u64,

    /// Extra arguments passed to the driver
    pub args: Vec<String>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            binary_path: None,
            port: None,
            startup_timeout_secs: 30,
            args: Vec::new(),
        }
    }
}

/// Polls of 20ms each after SIGTERM before the driver is killed
const STOP_GRACE_POLLS: u32 = 10;

/// Handle to a running driver process
pub struct DriverHandle {
    child: Child,
    pub url: String,
    pub port: u16,
    stopped: bool,
}

impl DriverHandle {
    /// Spawn the driver binary and wait until it reports ready
    pub async fn spawn(config: &DriverConfig) -> E2eResult<Self> {
        let binary = config
            .binary_path
            .as_ref()
            .ok_or_else(|| E2eError::DriverStartup("no driver binary configured".to_string()))?;
        let port = match config.port {
            Some(port) => port,
            None => find_free_port()?,
        };
        let url = format!("http://127.0.0.1:{}", port);

        info!("Spawning {} on port {}", binary.display(), port);

        let child = Command::new(binary)
            .arg(format!("--port={}", port))
            .args(&config.args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                E2eError::DriverStartup(format!("Failed to spawn {}: {}", binary.display(), e))
            })?;

        // Constructed before the health check so Drop reaps the process on failure
        let mut handle = DriverHandle {
            child,
            url: url.clone(),
            port,
            stopped: false,
        };

        handle
            .wait_for_ready(Duration::from_secs(config.startup_timeout_secs))
            .await?;

        info!("Driver is ready at {}", url);
        Ok(handle)
    }

    /// Poll the WebDriver `/status` endpoint until `value.ready` is true.
    ///
    /// Fails early if the process exits while starting.
    async fn wait_for_ready(&mut self, timeout_duration: Duration) -> E2eResult<()> {
        let status_url = format!("{}/status", self.url);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(2))
            .build()?;

        let start = std::time::Instant::now();
        let mut attempts = 0;

        while start.elapsed() < timeout_duration {
            attempts += 1;

            if let Some(status) = self.child.try_wait()? {
                self.stopped = true;
                return Err(E2eError::DriverStartup(format!(
                    "driver exited during startup ({})",
                    status
                )));
            }

            match client.get(&status_url).send().await {
                Ok(resp) if resp.status().is_success() => {
                    let body: serde_json::Value = resp.json().await?;
                    if is_ready(&body) {
                        return Ok(());
                    }
                }
                Ok(resp) => {
                    warn!("Status check returned {}", resp.status());
                }
                Err(e) => {
                    if attempts == 1 {
                        info!("Waiting for driver to start...");
                    }
                    // Connection refused is expected while the driver is starting
                    if !e.is_connect() {
                        warn!("Status check error: {}", e);
                    }
                }
            }

            sleep(Duration::from_millis(100)).await;
        }

        Err(E2eError::DriverHealthCheck(attempts))
    }

    /// Get the endpoint URL for this driver
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Stop the driver: SIGTERM, a short grace period, then kill
    pub async fn stop(&mut self) -> E2eResult<()> {
        if self.stopped {
            return Ok(());
        }
        info!("Stopping driver (pid: {})", self.child.id());

        #[cfg(unix)]
        {
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;

            let pid = Pid::from_raw(self.child.id() as i32);
            if kill(pid, Signal::SIGTERM).is_ok() {
                for _ in 0..STOP_GRACE_POLLS {
                    if self.child.try_wait()?.is_some() {
                        self.stopped = true;
                        return Ok(());
                    }
                    sleep(Duration::from_millis(20)).await;
                }
            }
        }

        self.kill_now()
    }

    fn kill_now(&mut self) -> E2eResult<()> {
        if self.stopped {
            return Ok(());
        }
        self.stopped = true;
        let _ = self.child.kill();
        self.child.wait()?;
        Ok(())
    }
}

impl Drop for DriverHandle {
    fn drop(&mut self) {
        let _ = self.kill_now();
    }
}

fn is_ready(body: &serde_json::Value) -> bool {
    body.get("value")
        .and_then(|v| v.get("ready"))
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(false)
}

/// Find a free port to use
fn find_free_port() -> E2eResult<u16> {
    use std::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?.port())
}
