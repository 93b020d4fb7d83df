//! Session acquisition and release around a run

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::{ProbeConfig, WebDriverConfig};
use crate::driver::{DriverConfig, DriverHandle};
use crate::error::E2eResult;
use crate::session::BrowserSession;
use crate::webdriver::WebDriverSession;

/// Setup and teardown of the browser session for one run.
///
/// `open` may fail after acquiring part of its resources; `release` must
/// clean up whatever was acquired.
#[async_trait]
pub trait SessionProvider: Send {
    async fn open(&mut self) -> E2eResult<Box<dyn BrowserSession>>;

    async fn release(&mut self);
}

/// Provides sessions from a WebDriver endpoint, spawning the driver if configured
pub struct WebDriverProvider {
    webdriver: WebDriverConfig,
    driver_config: DriverConfig,
    driver: Option<DriverHandle>,
}

impl WebDriverProvider {
    pub fn new(webdriver: WebDriverConfig, driver_config: DriverConfig) -> Self {
        Self {
            webdriver,
            driver_config,
            driver: None,
        }
    }

    pub fn from_config(config: &ProbeConfig) -> Self {
        Self::new(config.webdriver.clone(), config.driver.clone())
    }
}

#[async_trait]
impl SessionProvider for WebDriverProvider {
    async fn open(&mut self) -> E2eResult<Box<dyn BrowserSession>> {
        let mut webdriver = self.webdriver.clone();

        if self.driver_config.binary_path.is_some() && self.driver.is_none() {
            let driver = DriverHandle::spawn(&self.driver_config).await?;
            webdriver.url = driver.url().to_string();
            self.driver = Some(driver);
        } else if let Some(driver) = &self.driver {
            webdriver.url = driver.url().to_string();
        }

        let session = WebDriverSession::open(&webdriver).await?;
        info!("WebDriver initialized (session {})", session.session_id());
        Ok(Box::new(session))
    }

    async fn release(&mut self) {
        if let Some(mut driver) = self.driver.take() {
            if let Err(e) = driver.stop().await {
                warn!("Failed to stop driver: {}", e);
            }
        }
        info!("WebDriver released");
    }
}
