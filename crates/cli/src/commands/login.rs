//! Login Test Commands

use std::path::PathBuf;

use anyhow::{bail, Result};
use chrono::Utc;
use clap::{Args, Subcommand};
use serde::Serialize;
use tracing::info;

use swelab_e2e::report::{self, ResultsFile};
use swelab_e2e::webdriver::Browser;
use swelab_e2e::{
    login_suite, LoginPage, LoginScenario, ProbeConfig, RunnerConfig, TestOutcome, TestRunner,
    TestSuiteSummary, WebDriverProvider,
};

use crate::output::{print_list, print_success, render_table, status_marker, OutputFormat, TableDisplay};

#[derive(Subcommand)]
pub enum LoginCommands {
    /// Run the login test suite against the configured page
    Run(LoginRunArgs),

    /// List the built-in test cases in execution order
    Cases,

    /// Write a configuration file with default values
    InitConfig {
        /// Destination path
        #[arg(default_value = "swelab.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct LoginRunArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "swelab.toml", env = "SWELAB_CONFIG")]
    pub config: PathBuf,

    /// URL of the login page under test
    #[arg(long)]
    pub base_url: Option<String>,

    /// WebDriver endpoint to connect to
    #[arg(long, env = "SWELAB_WEBDRIVER_URL")]
    pub webdriver_url: Option<String>,

    /// Driver binary to spawn (e.g. chromedriver)
    #[arg(long)]
    pub driver_binary: Option<PathBuf>,

    /// Browser to use
    #[arg(long, value_enum)]
    pub browser: Option<Browser>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Pause between test cases in milliseconds
    #[arg(long)]
    pub pause_ms: Option<u64>,

    /// Output directory for results
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Skip writing test-results.json
    #[arg(long)]
    pub no_results_file: bool,
}

impl LoginRunArgs {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply(&self, config: &mut ProbeConfig) {
        if let Some(url) = &self.base_url {
            config.target.base_url = url.clone();
        }
        if let Some(url) = &self.webdriver_url {
            config.webdriver.url = url.clone();
        }
        if let Some(binary) = &self.driver_binary {
            config.driver.binary_path = Some(binary.clone());
        }
        if let Some(browser) = self.browser {
            config.webdriver.browser = browser;
        }
        if self.headed {
            config.webdriver.headless = false;
        }
        if let Some(pause) = self.pause_ms {
            config.runner.pause_between_ms = pause;
        }
        if let Some(output) = &self.output {
            config.runner.output_dir = output.clone();
        }
    }
}

/// Outcome display wrapper
#[derive(Serialize)]
pub struct OutcomeDisplay {
    pub name: String,
    pub passed: bool,
    pub duration: f64,
    pub error: String,
}

impl From<&TestOutcome> for OutcomeDisplay {
    fn from(outcome: &TestOutcome) -> Self {
        Self {
            name: outcome.name.clone(),
            passed: outcome.is_passed(),
            duration: outcome.duration,
            error: outcome.error_message.clone(),
        }
    }
}

impl TableDisplay for OutcomeDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Test", "Status", "Duration", "Error"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            format!(
                "{} {}",
                status_marker(self.passed),
                if self.passed { "PASSED" } else { "FAILED" }
            ),
            format!("{:.3}s", self.duration),
            self.error.clone(),
        ]
    }
}

/// Test case listing wrapper
#[derive(Serialize)]
pub struct CaseDisplay {
    pub order: usize,
    pub name: &'static str,
}

impl TableDisplay for CaseDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["#", "Test"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.order.to_string(), self.name.to_string()]
    }
}

/// Execute login commands; `Ok(false)` means the suite ran with failures
pub async fn execute(cmd: LoginCommands, format: OutputFormat) -> Result<bool> {
    match cmd {
        LoginCommands::Run(args) => run(args, format).await,
        LoginCommands::Cases => {
            let cases: Vec<CaseDisplay> = LoginScenario::ALL
                .iter()
                .enumerate()
                .map(|(i, scenario)| CaseDisplay {
                    order: i + 1,
                    name: scenario.name(),
                })
                .collect();
            print_list(&cases, format);
            Ok(true)
        }
        LoginCommands::InitConfig { path, force } => {
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            ProbeConfig::default().save(&path)?;
            print_success(&format!("Wrote default configuration to {}", path.display()));
            Ok(true)
        }
    }
}

async fn run(args: LoginRunArgs, format: OutputFormat) -> Result<bool> {
    let mut config = ProbeConfig::load(&args.config)?;
    args.apply(&mut config);
    config.validate()?;

    if format != OutputFormat::Json {
        println!("{}", report::render_header(&config.target.base_url, Utc::now()));
    }

    let cases = login_suite(LoginPage::from_config(&config));
    let runner = TestRunner::with_config(RunnerConfig {
        pause_between: config.runner.pause_between(),
    });
    let mut provider = WebDriverProvider::from_config(&config);

    let summary = match runner.run(&mut provider, &cases).await {
        Ok(summary) => summary,
        Err(e) => {
            if format != OutputFormat::Json {
                print!("{}", report::render_summary(&TestSuiteSummary::new()));
            }
            return Err(e.into());
        }
    };

    print_summary(&summary, format)?;

    if !args.no_results_file {
        let path = report::write_results(&summary, &config.runner.output_dir)?;
        info!("Wrote {}", path.display());
    }

    Ok(summary.all_passed())
}

fn print_summary(summary: &TestSuiteSummary, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            let rows: Vec<OutcomeDisplay> = summary.outcomes().iter().map(OutcomeDisplay::from).collect();
            println!("{}", render_table(&rows));
            print!("{}", report::render_summary(summary));
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&ResultsFile::from(summary))?);
        }
        OutputFormat::Plain => {
            print!("{}", report::render_summary(summary));
        }
    }
    Ok(())
}
