//! In-memory stand-ins for the browser and the login page under test

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use swelab_e2e::config::{ProbeConfig, TargetConfig};
use swelab_e2e::{
    BrowserSession, E2eError, E2eResult, ElementRef, Locator, LoginPage, SessionProvider,
    TestProcedure, Waiter,
};

pub const LOGIN_URL: &str = "https://practice.test/practice-test-login/";
pub const SUCCESS_URL: &str = "https://practice.test/logged-in-successfully/";
pub const VALIDATION_MESSAGE: &str = "Please fill out this field.";

/// Knobs that change how the fake page reacts
#[derive(Debug, Clone, Copy, Default)]
pub struct Behaviour {
    /// Required-field validation blocks submission of empty fields
    pub html5_validation: bool,
    /// Injection strings log the user in
    pub vulnerable: bool,
    /// The error element exists but is hidden
    pub hide_errors: bool,
    /// The form ids no longer match the harness locators
    pub markup_changed: bool,
}

/// Simulation of the practice login page
pub struct FakeLoginPage {
    behaviour: Behaviour,
    url: String,
    logged_in: bool,
    username: String,
    password: String,
    error: Option<String>,
    invalid_field: Option<&'static str>,
    closes: Arc<AtomicUsize>,
}

impl FakeLoginPage {
    pub fn new(behaviour: Behaviour) -> Self {
        Self::with_close_counter(behaviour, Arc::new(AtomicUsize::new(0)))
    }

    pub fn with_close_counter(behaviour: Behaviour, closes: Arc<AtomicUsize>) -> Self {
        Self {
            behaviour,
            url: String::new(),
            logged_in: false,
            username: String::new(),
            password: String::new(),
            error: None,
            invalid_field: None,
            closes,
        }
    }

    fn on_form(&self) -> bool {
        !self.url.is_empty() && !self.logged_in
    }

    fn field_id(&self, name: &'static str) -> &'static str {
        if self.behaviour.markup_changed {
            match name {
                "username" => "user-name",
                "password" => "pass-word",
                "submit" => "login-button",
                other => other,
            }
        } else {
            name
        }
    }

    fn element_for(&self, locator: &Locator) -> Option<&'static str> {
        match locator {
            Locator::Id(id) => {
                for name in ["username", "password", "submit"] {
                    if id == self.field_id(name) && self.on_form() {
                        return Some(name);
                    }
                }
                if id == "error" && self.error.is_some() {
                    return Some("error");
                }
                None
            }
            Locator::Css(selector) if selector == ".post-title" && self.logged_in => Some("post-title"),
            Locator::Css(_) => None,
        }
    }

    fn submit(&mut self) {
        if self.behaviour.html5_validation {
            if self.username.is_empty() {
                self.invalid_field = Some("username");
                return;
            }
            if self.password.is_empty() {
                self.invalid_field = Some("password");
                return;
            }
        }

        let injected = self.username.contains("' OR '");
        if (self.behaviour.vulnerable && injected)
            || (self.username == "student" && self.password == "Password123")
        {
            self.logged_in = true;
            self.url = SUCCESS_URL.to_string();
            self.error = None;
        } else if self.username != "student" {
            self.error = Some("Your username is invalid!".to_string());
        } else {
            self.error = Some("Your password is invalid!".to_string());
        }
    }
}

#[async_trait]
impl BrowserSession for FakeLoginPage {
    async fn navigate(&mut self, url: &str) -> E2eResult<()> {
        self.url = url.to_string();
        self.logged_in = false;
        self.username.clear();
        self.password.clear();
        self.error = None;
        self.invalid_field = None;
        Ok(())
    }

    async fn find_element(&mut self, locator: &Locator) -> E2eResult<ElementRef> {
        self.element_for(locator)
            .map(ElementRef::new)
            .ok_or_else(|| E2eError::ElementNotFound(locator.to_string()))
    }

    async fn send_keys(&mut self, element: &ElementRef, text: &str) -> E2eResult<()> {
        match element.id() {
            "username" => self.username.push_str(text),
            "password" => self.password.push_str(text),
            other => return Err(E2eError::AssertionFailed(format!("{} is not editable", other))),
        }
        Ok(())
    }

    async fn clear(&mut self, element: &ElementRef) -> E2eResult<()> {
        match element.id() {
            "username" => self.username.clear(),
            "password" => self.password.clear(),
            _ => {}
        }
        Ok(())
    }

    async fn click(&mut self, element: &ElementRef) -> E2eResult<()> {
        if element.id() == "submit" {
            self.submit();
        }
        Ok(())
    }

    async fn text(&mut self, element: &ElementRef) -> E2eResult<String> {
        Ok(match element.id() {
            "error" => self.error.clone().unwrap_or_default(),
            "post-title" => "Logged In Successfully".to_string(),
            _ => String::new(),
        })
    }

    async fn attribute(&mut self, element: &ElementRef, name: &str) -> E2eResult<Option<String>> {
        if name != "validationMessage" {
            return Ok(None);
        }
        if self.invalid_field == Some(element.id()) {
            Ok(Some(VALIDATION_MESSAGE.to_string()))
        } else {
            Ok(Some(String::new()))
        }
    }

    async fn is_displayed(&mut self, element: &ElementRef) -> E2eResult<bool> {
        Ok(!(element.id() == "error" && self.behaviour.hide_errors))
    }

    async fn current_url(&mut self) -> E2eResult<String> {
        Ok(self.url.clone())
    }

    async fn close(&mut self) -> E2eResult<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Counts lifecycle calls and optionally fails or panics during setup
#[derive(Clone, Default)]
pub struct CountingProvider {
    pub behaviour: Behaviour,
    pub fail_open: bool,
    pub panic_open: bool,
    pub opens: Arc<AtomicUsize>,
    pub releases: Arc<AtomicUsize>,
    pub closes: Arc<AtomicUsize>,
}

impl CountingProvider {
    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionProvider for CountingProvider {
    async fn open(&mut self) -> E2eResult<Box<dyn BrowserSession>> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        if self.panic_open {
            panic!("driver crashed during setup");
        }
        if self.fail_open {
            return Err(E2eError::SessionNotCreated("chrome not reachable".to_string()));
        }
        Ok(Box::new(FakeLoginPage::with_close_counter(
            self.behaviour,
            Arc::clone(&self.closes),
        )))
    }

    async fn release(&mut self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

/// Procedure that succeeds, optionally logging its name
pub struct Succeed {
    pub name: &'static str,
    pub log: Arc<Mutex<Vec<&'static str>>>,
}

#[async_trait]
impl TestProcedure for Succeed {
    async fn execute(&self, _session: &mut dyn BrowserSession) -> E2eResult<()> {
        self.log.lock().unwrap().push(self.name);
        Ok(())
    }
}

/// Procedure that fails with an assertion message
pub struct Fail {
    pub name: &'static str,
    pub message: &'static str,
    pub log: Arc<Mutex<Vec<&'static str>>>,
}

#[async_trait]
impl TestProcedure for Fail {
    async fn execute(&self, _session: &mut dyn BrowserSession) -> E2eResult<()> {
        self.log.lock().unwrap().push(self.name);
        Err(E2eError::AssertionFailed(self.message.to_string()))
    }
}

/// Procedure that panics
pub struct Explode;

#[async_trait]
impl TestProcedure for Explode {
    async fn execute(&self, _session: &mut dyn BrowserSession) -> E2eResult<()> {
        panic!("unexpected page state");
    }
}

/// Login page wired to the fake with short waits
pub fn fast_login_page() -> LoginPage {
    let config = ProbeConfig {
        target: TargetConfig {
            base_url: LOGIN_URL.to_string(),
            ..Default::default()
        },
        ..Default::default()
    };
    let poll = Duration::from_millis(5);
    LoginPage::new(
        config.target,
        Waiter::new(Duration::from_millis(100)).with_poll_interval(poll),
        Waiter::new(Duration::from_millis(40)).with_poll_interval(poll),
    )
}
