//! Browser session abstraction
//!
//! The runner and the login cases only talk to a [`BrowserSession`]; the
//! WebDriver client in [`crate::webdriver`] is the production implementation.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::error::{E2eError, E2eResult};

/// Identifies an element on the page under test
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Id(String),
    Css(String),
}

impl Locator {
    pub fn id(id: impl Into<String>) -> Self {
        Locator::Id(id.into())
    }

    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    /// CSS selector form, as used by the WebDriver `css selector` strategy
    pub fn to_css(&self) -> String {
        match self {
            Locator::Id(id) => format!("#{}", id),
            Locator::Css(selector) => selector.clone(),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Id(id) => write!(f, "id={}", id),
            Locator::Css(selector) => write!(f, "css={}", selector),
        }
    }
}

/// Opaque handle to an element found in a session
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementRef(String);

impl ElementRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

/// Browser automation capability used by test procedures
#[async_trait]
pub trait BrowserSession: Send {
    async fn navigate(&mut self, url: &str) -> E2eResult<()>;

    /// Find a single element; fails with [`E2eError::ElementNotFound`]
    async fn find_element(&mut self, locator: &Locator) -> E2eResult<ElementRef>;

    async fn send_keys(&mut self, element: &ElementRef, text: &str) -> E2eResult<()>;

    async fn clear(&mut self, element: &ElementRef) -> E2eResult<()>;

    async fn click(&mut self, element: &ElementRef) -> E2eResult<()>;

    async fn text(&mut self, element: &ElementRef) -> E2eResult<String>;

    /// Attribute or DOM property value, `None` when unset
    async fn attribute(&mut self, element: &ElementRef, name: &str) -> E2eResult<Option<String>>;

    async fn is_displayed(&mut self, element: &ElementRef) -> E2eResult<bool>;

    async fn current_url(&mut self) -> E2eResult<String>;

    /// End the session. Further calls are errors.
    async fn close(&mut self) -> E2eResult<()>;
}

/// Bounded wait for a page condition
#[derive(Debug, Clone, Copy)]
pub struct Waiter {
    timeout: Duration,
    poll_interval: Duration,
}

impl Waiter {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            poll_interval: Duration::from_millis(100),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Wait until `locator` resolves to an element
    pub async fn until_present(
        &self,
        session: &mut dyn BrowserSession,
        locator: &Locator,
    ) -> E2eResult<ElementRef> {
        let deadline = Instant::now() + self.timeout;
        loop {
            match session.find_element(locator).await {
                Ok(element) => return Ok(element),
                Err(E2eError::ElementNotFound(_)) => {}
                Err(e) => return Err(e),
            }
            if Instant::now() >= deadline {
                return Err(E2eError::Timeout {
                    condition: format!("presence of {}", locator),
                    timeout: self.timeout,
                });
            }
            debug!("Waiting for {}", locator);
            sleep(self.poll_interval.min(self.remaining(deadline))).await;
        }
    }

    fn remaining(&self, deadline: Instant) -> Duration {
        deadline.saturating_duration_since(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Session whose element appears after a number of lookups
    struct DelayedElement {
        lookups: usize,
        appears_after: usize,
        text: String,
    }

    #[async_trait]
    impl BrowserSession for DelayedElement {
        async fn navigate(&mut self, _url: &str) -> E2eResult<()> {
            Ok(())
        }

        async fn find_element(&mut self, locator: &Locator) -> E2eResult<ElementRef> {
            self.lookups += 1;
            if self.lookups > self.appears_after {
                Ok(ElementRef::new("el-1"))
            } else {
                Err(E2eError::ElementNotFound(locator.to_string()))
            }
        }

        async fn send_keys(&mut self, _element: &ElementRef, _text: &str) -> E2eResult<()> {
            Ok(())
        }

        async fn clear(&mut self, _element: &ElementRef) -> E2eResult<()> {
            Ok(())
        }

        async fn click(&mut self, _element: &ElementRef) -> E2eResult<()> {
            Ok(())
        }

        async fn text(&mut self, _element: &ElementRef) -> E2eResult<String> {
            Ok(self.text.clone())
        }

        async fn attribute(&mut self, _element: &ElementRef, _name: &str) -> E2eResult<Option<String>> {
            Ok(None)
        }

        async fn is_displayed(&mut self, _element: &ElementRef) -> E2eResult<bool> {
            Ok(true)
        }

        async fn current_url(&mut self) -> E2eResult<String> {
            Ok("about:blank".to_string())
        }

        async fn close(&mut self) -> E2eResult<()> {
            Ok(())
        }
    }

    fn fast_waiter(timeout_ms: u64) -> Waiter {
        Waiter::new(Duration::from_millis(timeout_ms)).with_poll_interval(Duration::from_millis(5))
    }

    #[test]
    fn test_locator_css() {
        assert_eq!(Locator::id("username").to_css(), "#username");
        assert_eq!(Locator::css(".post-title").to_css(), ".post-title");
        assert_eq!(Locator::id("error").to_string(), "id=error");
    }

    #[tokio::test]
    async fn test_until_present_polls_until_found() {
        let mut session = DelayedElement {
            lookups: 0,
            appears_after: 3,
            text: String::new(),
        };
        let element = fast_waiter(1_000)
            .until_present(&mut session, &Locator::id("error"))
            .await
            .unwrap();
        assert_eq!(element.id(), "el-1");
        assert_eq!(session.lookups, 4);
    }

    #[tokio::test]
    async fn test_until_present_times_out() {
        let mut session = DelayedElement {
            lookups: 0,
            appears_after: usize::MAX,
            text: String::new(),
        };
        let err = fast_waiter(30)
            .until_present(&mut session, &Locator::id("error"))
            .await
            .unwrap_err();
        assert!(err.is_timeout());
        assert!(err.to_string().contains("id=error"));
    }
}
