//! Test harness configuration
//!
//! Loaded from a TOML file; every section and field has a default so a
//! partial (or missing) file is valid.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::driver::DriverConfig;
use crate::error::{E2eError, E2eResult};
use crate::webdriver::Browser;

/// Default page under test
pub const DEFAULT_BASE_URL: &str = "https://practicetestautomation.com/practice-test-login/";

/// Harness configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Page under test and its fixtures
    pub target: TargetConfig,

    /// WebDriver endpoint and browser options
    pub webdriver: WebDriverConfig,

    /// Local driver process (optional)
    pub driver: DriverConfig,

    /// Runner timing
    pub runner: RunnerSettings,
}

/// The login page under test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    pub base_url: String,

    /// Element ids on the login form
    pub username_id: String,
    pub password_id: String,
    pub submit_id: String,
    pub error_id: String,

    /// CSS selector of the success marker shown after login
    pub success_selector: String,

    pub valid_username: String,
    pub valid_password: String,
    pub invalid_username: String,
    pub invalid_password: String,
    pub injection_username: String,
    pub injection_password: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            username_id: "username".to_string(),
            password_id: "password".to_string(),
            submit_id: "submit".to_string(),
            error_id: "error".to_string(),
            success_selector: ".post-title".to_string(),
            valid_username: "student".to_string(),
            valid_password: "Password123".to_string(),
            invalid_username: "invaliduser".to_string(),
            invalid_password: "wrongpassword".to_string(),
            injection_username: "admin' OR '1'='1".to_string(),
            injection_password: "' OR '1'='1".to_string(),
        }
    }
}

/// WebDriver endpoint configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebDriverConfig {
    /// Endpoint URL; replaced by the spawned driver's URL when a driver binary is set
    pub url: String,
    pub browser: Browser,
    pub headless: bool,
    pub window_width: u32,
    pub window_height: u32,

    /// Implicit element lookup wait applied to the session
    pub implicit_wait_ms: u64,

    /// Per-request HTTP timeout
    pub request_timeout_secs: u64,
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:9515".to_string(),
            browser: Browser::Chrome,
            headless: true,
            window_width: 1920,
            window_height: 1080,
            implicit_wait_ms: 5000,
            request_timeout_secs: 60,
        }
    }
}

/// Runner timing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerSettings {
    /// Standard wait for page conditions
    pub wait_timeout_ms: u64,

    /// Short wait used where a client-side validation may block submission
    pub short_wait_ms: u64,

    pub poll_interval_ms: u64,

    /// Settle pause between test cases
    pub pause_between_ms: u64,

    /// Directory for the JSON results file
    pub output_dir: PathBuf,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            wait_timeout_ms: 10_000,
            short_wait_ms: 3_000,
            poll_interval_ms: 100,
            pause_between_ms: 500,
            output_dir: PathBuf::from("test-results"),
        }
    }
}

impl RunnerSettings {
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout_ms)
    }

    pub fn short_wait(&self) -> Duration {
        Duration::from_millis(self.short_wait_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn pause_between(&self) -> Duration {
        Duration::from_millis(self.pause_between_ms)
    }
}

impl ProbeConfig {
    /// Load configuration from file, falling back to defaults when absent.
    ///
    /// Only parses; call [`ProbeConfig::validate`] once overrides are applied.
    pub fn load(path: &Path) -> E2eResult<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> E2eResult<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> E2eResult<()> {
        if self.target.base_url.trim().is_empty() {
            return Err(E2eError::InvalidConfig("target.base_url is empty".to_string()));
        }
        if self.webdriver.url.trim().is_empty() && self.driver.binary_path.is_none() {
            return Err(E2eError::InvalidConfig(
                "either webdriver.url or driver.binary_path must be set".to_string(),
            ));
        }
        if self.runner.wait_timeout_ms == 0 || self.runner.short_wait_ms == 0 {
            return Err(E2eError::InvalidConfig("wait timeouts must be non-zero".to_string()));
        }
        if self.runner.poll_interval_ms == 0 {
            return Err(E2eError::InvalidConfig("runner.poll_interval_ms must be non-zero".to_string()));
        }
        Ok(())
    }
}
