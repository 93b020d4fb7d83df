//! W3C WebDriver client
//!
//! Speaks the WebDriver JSON wire protocol to chromedriver (or any compatible
//! endpoint) with `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::config::WebDriverConfig;
use crate::error::{E2eError, E2eResult};
use crate::session::{BrowserSession, ElementRef, Locator};

/// Key under which W3C drivers return element references
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

#[derive(Debug, Deserialize)]
struct WireResponse {
    value: Value,
}

#[derive(Debug, Deserialize)]
struct WireError {
    error: String,
    #[serde(default)]
    message: String,
}

/// Browser selection for the session capabilities
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    #[default]
    Chrome,
    Firefox,
}

impl Browser {
    pub fn as_str(&self) -> &'static str {
        match self {
            Browser::Chrome => "chrome",
            Browser::Firefox => "firefox",
        }
    }
}

/// Build the `capabilities` payload for a new session
pub fn capabilities(config: &WebDriverConfig) -> Value {
    let window = format!("--window-size={},{}", config.window_width, config.window_height);
    let mut args: Vec<String> = Vec::new();
    if config.headless {
        args.push("--headless".to_string());
    }

    let always_match = match config.browser {
        Browser::Chrome => {
            args.push("--no-sandbox".to_string());
            args.push("--disable-dev-shm-usage".to_string());
            args.push(window);
            json!({
                "browserName": "chrome",
                "goog:chromeOptions": { "args": args },
            })
        }
        Browser::Firefox => json!({
            "browserName": "firefox",
            "moz:firefoxOptions": { "args": args },
        }),
    };

    json!({ "capabilities": { "alwaysMatch": always_match } })
}

/// An open WebDriver session
pub struct WebDriverSession {
    client: Client,
    endpoint: String,
    session_id: String,
    closed: bool,
}

impl WebDriverSession {
    /// Create a new browser session at `config.url`
    pub async fn open(config: &WebDriverConfig) -> E2eResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        let endpoint = config.url.trim_end_matches('/').to_string();

        info!("Opening {} session at {}", config.browser.as_str(), endpoint);

        let value = send(&client, Method::POST, &format!("{}/session", endpoint), Some(capabilities(config)))
            .await
            .map_err(|e| E2eError::SessionNotCreated(e.to_string()))?;

        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| E2eError::SessionNotCreated(format!("no sessionId in response: {}", value)))?
            .to_string();

        let mut session = Self {
            client,
            endpoint,
            session_id,
            closed: false,
        };

        let implicit_ms = config.implicit_wait_ms;
        if let Err(e) = session
            .command(Method::POST, "timeouts", Some(json!({ "implicit": implicit_ms })))
            .await
        {
            // The session exists at this point, so release it before failing
            let _ = session.close().await;
            return Err(e);
        }

        debug!("WebDriver session {} ready", session.session_id);
        Ok(session)
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    async fn command(&self, method: Method, path: &str, body: Option<Value>) -> E2eResult<Value> {
        let url = format!("{}/session/{}/{}", self.endpoint, self.session_id, path);
        send(&self.client, method, &url, body).await
    }

    async fn element_command(
        &self,
        method: Method,
        element: &ElementRef,
        path: &str,
        body: Option<Value>,
    ) -> E2eResult<Value> {
        self.command(method, &format!("element/{}/{}", element.id(), path), body)
            .await
    }
}

async fn send(client: &Client, method: Method, url: &str, body: Option<Value>) -> E2eResult<Value> {
    debug!("WebDriver {} {}", method, url);
    let mut request = client.request(method, url);
    if let Some(body) = body {
        request = request.json(&body);
    }

    let response = request.send().await?;
    let status = response.status();
    let wire: WireResponse = response.json().await?;

    if !status.is_success() {
        return Err(wire_error(wire.value));
    }
    Ok(wire.value)
}

fn wire_error(value: Value) -> E2eError {
    match serde_json::from_value::<WireError>(value.clone()) {
        Ok(err) if err.error == "no such element" => E2eError::ElementNotFound(err.message),
        Ok(err) => E2eError::WebDriver {
            error: err.error,
            message: err.message,
        },
        Err(_) => E2eError::WebDriver {
            error: "unknown error".to_string(),
            message: value.to_string(),
        },
    }
}

fn parse_element(value: &Value) -> E2eResult<ElementRef> {
    value
        .get(ELEMENT_KEY)
        .and_then(Value::as_str)
        .map(ElementRef::new)
        .ok_or_else(|| E2eError::WebDriver {
            error: "invalid element reference".to_string(),
            message: value.to_string(),
        })
}

fn value_to_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl BrowserSession for WebDriverSession {
    async fn navigate(&mut self, url: &str) -> E2eResult<()> {
        self.command(Method::POST, "url", Some(json!({ "url": url }))).await?;
        Ok(())
    }

    async fn find_element(&mut self, locator: &Locator) -> E2eResult<ElementRef> {
        let body = json!({ "using": "css selector", "value": locator.to_css() });
        match self.command(Method::POST, "element", Some(body)).await {
            Ok(value) => parse_element(&value),
            Err(E2eError::ElementNotFound(_)) => Err(E2eError::ElementNotFound(locator.to_string())),
            Err(e) => Err(e),
        }
    }

    async fn send_keys(&mut self, element: &ElementRef, text: &str) -> E2eResult<()> {
        self.element_command(Method::POST, element, "value", Some(json!({ "text": text })))
            .await?;
        Ok(())
    }

    async fn clear(&mut self, element: &ElementRef) -> E2eResult<()> {
        self.element_command(Method::POST, element, "clear", Some(json!({})))
            .await?;
        Ok(())
    }

    async fn click(&mut self, element: &ElementRef) -> E2eResult<()> {
        self.element_command(Method::POST, element, "click", Some(json!({})))
            .await?;
        Ok(())
    }

    async fn text(&mut self, element: &ElementRef) -> E2eResult<String> {
        let value = self.element_command(Method::GET, element, "text", None).await?;
        Ok(value_to_string(value).unwrap_or_default())
    }

    async fn attribute(&mut self, element: &ElementRef, name: &str) -> E2eResult<Option<String>> {
        let value = self
            .element_command(Method::GET, element, &format!("attribute/{}", name), None)
            .await?;
        if let Some(attr) = value_to_string(value) {
            return Ok(Some(attr));
        }
        // Properties such as validationMessage have no attribute counterpart
        let value = self
            .element_command(Method::GET, element, &format!("property/{}", name), None)
            .await?;
        Ok(value_to_string(value))
    }

    async fn is_displayed(&mut self, element: &ElementRef) -> E2eResult<bool> {
        let value = self.element_command(Method::GET, element, "displayed", None).await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    async fn current_url(&mut self) -> E2eResult<String> {
        let value = self.command(Method::GET, "url", None).await?;
        Ok(value_to_string(value).unwrap_or_default())
    }

    async fn close(&mut self) -> E2eResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let url = format!("{}/session/{}", self.endpoint, self.session_id);
        match send(&self.client, Method::DELETE, &url, None).await {
            Ok(_) => {
                info!("WebDriver session {} closed", self.session_id);
                Ok(())
            }
            Err(e) => {
                warn!("Failed to close session {}: {}", self.session_id, e);
                Err(e)
            }
        }
    }
}
