//! swelab E2E Test Framework
//!
//! This crate drives a login page through a WebDriver session and records
//! one outcome per test case:
//! - Spawns (or connects to) a W3C WebDriver endpoint
//! - Runs a fixed, ordered list of login test cases against one session
//! - Aggregates outcomes into a suite summary and renders a report
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   E2E Test Runner (Rust)                    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TestRunner                                                 │
//! │    ├── run(provider, cases) -> TestSuiteSummary             │
//! │    │     ├── provider.open() -> Box<dyn BrowserSession>     │
//! │    │     ├── run_case(session, case) -> TestOutcome         │
//! │    │     └── provider.release()   (always, exactly once)    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  BrowserSession                                             │
//! │    ├── WebDriverSession (reqwest, W3C JSON wire protocol)   │
//! │    └── Waiter { until_present }                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TestSuiteSummary                                           │
//! │    ├── add_result(outcome)                                  │
//! │    └── success_rate()                                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod cases;
pub mod config;
pub mod driver;
pub mod error;
pub mod provider;
pub mod recorder;
pub mod report;
pub mod runner;
pub mod session;
pub mod webdriver;

pub use cases::{login_suite, LoginPage, LoginScenario};
pub use config::ProbeConfig;
pub use error::{E2eError, E2eResult};
pub use provider::{SessionProvider, WebDriverProvider};
pub use recorder::{TestOutcome, TestStatus, TestSuiteSummary};
pub use runner::{RunnerConfig, TestCase, TestProcedure, TestRunner};
pub use session::{BrowserSession, ElementRef, Locator, Waiter};
