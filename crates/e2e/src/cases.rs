//! Login page test cases
//!
//! Six independent interaction sequences against the login form. Each one
//! navigates afresh, so a failure leaves nothing behind for the next case.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::config::{ProbeConfig, TargetConfig};
use crate::error::{ensure, E2eResult};
use crate::runner::{TestCase, TestProcedure};
use crate::session::{BrowserSession, ElementRef, Locator, Waiter};

/// The page under test together with its wait policy
#[derive(Debug, Clone)]
pub struct LoginPage {
    pub target: TargetConfig,
    /// Standard wait for page conditions
    pub wait: Waiter,
    /// Short wait for the server error where client-side validation may intervene
    pub short_wait: Waiter,
}

impl LoginPage {
    pub fn new(target: TargetConfig, wait: Waiter, short_wait: Waiter) -> Self {
        Self {
            target,
            wait,
            short_wait,
        }
    }

    pub fn from_config(config: &ProbeConfig) -> Self {
        let poll = config.runner.poll_interval();
        Self::new(
            config.target.clone(),
            Waiter::new(config.runner.wait_timeout()).with_poll_interval(poll),
            Waiter::new(config.runner.short_wait()).with_poll_interval(poll),
        )
    }

    fn username(&self) -> Locator {
        Locator::id(&self.target.username_id)
    }

    fn password(&self) -> Locator {
        Locator::id(&self.target.password_id)
    }

    fn submit(&self) -> Locator {
        Locator::id(&self.target.submit_id)
    }

    fn error(&self) -> Locator {
        Locator::id(&self.target.error_id)
    }

    fn success(&self) -> Locator {
        Locator::css(&self.target.success_selector)
    }

    /// Load the page and locate the form fields
    async fn open_form(&self, session: &mut dyn BrowserSession) -> E2eResult<LoginForm> {
        session.navigate(&self.target.base_url).await?;
        let username = self.wait.until_present(session, &self.username()).await?;
        let password = session.find_element(&self.password()).await?;
        let submit = session.find_element(&self.submit()).await?;
        Ok(LoginForm {
            username,
            password,
            submit,
        })
    }
}

struct LoginForm {
    username: ElementRef,
    password: ElementRef,
    submit: ElementRef,
}

impl LoginForm {
    async fn submit_with(
        &self,
        session: &mut dyn BrowserSession,
        username: &str,
        password: &str,
        clear_first: bool,
    ) -> E2eResult<()> {
        if clear_first {
            session.clear(&self.username).await?;
        }
        session.send_keys(&self.username, username).await?;
        if clear_first {
            session.clear(&self.password).await?;
        }
        session.send_keys(&self.password, password).await?;
        session.click(&self.submit).await
    }
}

/// Which field an empty-input case leaves blank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Username,
    Password,
}

impl Field {
    fn as_str(&self) -> &'static str {
        match self {
            Field::Username => "username",
            Field::Password => "password",
        }
    }
}

/// The built-in login scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginScenario {
    ValidLogin,
    InvalidUsername,
    InvalidPassword,
    EmptyField(Field),
    SqlInjection,
}

impl LoginScenario {
    /// All scenarios in execution order
    pub const ALL: [LoginScenario; 6] = [
        LoginScenario::ValidLogin,
        LoginScenario::InvalidUsername,
        LoginScenario::InvalidPassword,
        LoginScenario::EmptyField(Field::Username),
        LoginScenario::EmptyField(Field::Password),
        LoginScenario::SqlInjection,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LoginScenario::ValidLogin => "Valid Login Credentials",
            LoginScenario::InvalidUsername => "Invalid Username",
            LoginScenario::InvalidPassword => "Invalid Password",
            LoginScenario::EmptyField(Field::Username) => "Empty Username Field",
            LoginScenario::EmptyField(Field::Password) => "Empty Password Field",
            LoginScenario::SqlInjection => "SQL Injection Attempt",
        }
    }
}

/// A scenario bound to the page it runs against
pub struct LoginCase {
    scenario: LoginScenario,
    page: Arc<LoginPage>,
}

#[async_trait]
impl TestProcedure for LoginCase {
    async fn execute(&self, session: &mut dyn BrowserSession) -> E2eResult<()> {
        let page = self.page.as_ref();
        match self.scenario {
            LoginScenario::ValidLogin => valid_login(page, session).await,
            LoginScenario::InvalidUsername => {
                let target = &page.target;
                rejected_login(page, session, &target.invalid_username, &target.valid_password, Field::Username).await
            }
            LoginScenario::InvalidPassword => {
                let target = &page.target;
                rejected_login(page, session, &target.valid_username, &target.invalid_password, Field::Password).await
            }
            LoginScenario::EmptyField(field) => empty_field(page, session, field).await,
            LoginScenario::SqlInjection => sql_injection(page, session).await,
        }
    }
}

/// The six login cases in execution order
pub fn login_suite(page: LoginPage) -> Vec<TestCase> {
    let page = Arc::new(page);
    LoginScenario::ALL
        .iter()
        .map(|&scenario| {
            TestCase::new(
                scenario.name(),
                LoginCase {
                    scenario,
                    page: Arc::clone(&page),
                },
            )
        })
        .collect()
}

async fn valid_login(page: &LoginPage, session: &mut dyn BrowserSession) -> E2eResult<()> {
    let form = page.open_form(session).await?;
    let target = &page.target;
    form.submit_with(session, &target.valid_username, &target.valid_password, true)
        .await?;

    let marker = page.wait.until_present(session, &page.success()).await?;
    let text = session.text(&marker).await?;
    ensure(
        text.to_lowercase().contains("successfully"),
        "Success message not found after valid login",
    )
}

async fn rejected_login(
    page: &LoginPage,
    session: &mut dyn BrowserSession,
    username: &str,
    password: &str,
    mentions: Field,
) -> E2eResult<()> {
    let form = page.open_form(session).await?;
    form.submit_with(session, username, password, false).await?;

    let error = page.wait.until_present(session, &page.error()).await?;
    ensure(
        session.is_displayed(&error).await?,
        format!("Error message not displayed for invalid {}", mentions.as_str()),
    )?;
    let text = session.text(&error).await?;
    ensure(
        text.to_lowercase().contains(mentions.as_str()),
        format!("Error message doesn't mention {}", mentions.as_str()),
    )
}

/// Either a server-rendered error or a client-side validation message passes
async fn empty_field(page: &LoginPage, session: &mut dyn BrowserSession, field: Field) -> E2eResult<()> {
    let form = page.open_form(session).await?;
    let target = &page.target;
    let (username, password) = match field {
        Field::Username => ("", target.valid_password.as_str()),
        Field::Password => (target.valid_username.as_str(), ""),
    };
    form.submit_with(session, username, password, false).await?;

    match page.short_wait.until_present(session, &page.error()).await {
        Ok(error) => ensure(
            session.is_displayed(&error).await?,
            format!("Error not displayed for empty {}", field.as_str()),
        ),
        Err(e) if e.is_timeout() => {
            debug!("No server error for empty {}, checking field validation", field.as_str());
            let input = match field {
                Field::Username => &form.username,
                Field::Password => &form.password,
            };
            let message = session.attribute(input, "validationMessage").await?;
            ensure(
                message.is_some_and(|m| !m.is_empty()),
                format!("No validation for empty {}", field.as_str()),
            )
        }
        Err(e) => Err(e),
    }
}

/// Injection strings must not get past authentication
async fn sql_injection(page: &LoginPage, session: &mut dyn BrowserSession) -> E2eResult<()> {
    let form = page.open_form(session).await?;
    let target = &page.target;
    form.submit_with(session, &target.injection_username, &target.injection_password, false)
        .await?;

    match page.wait.until_present(session, &page.error()).await {
        Ok(error) => ensure(
            session.is_displayed(&error).await?,
            "System vulnerable to SQL injection",
        ),
        Err(e) if e.is_timeout() => {
            let url = session.current_url().await?;
            ensure(!url.to_lowercase().contains("success"), "SQL injection succeeded!")
        }
        Err(e) => Err(e),
    }
}
