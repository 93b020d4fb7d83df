//! swelab CLI - Main Entry Point

use clap::{Parser, Subcommand};

use swelab_cli::commands::{login, sort};
use swelab_cli::output::{self, print_error};

/// swelab - login page test harness and sorting comparison
#[derive(Parser)]
#[command(name = "swelab")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Automated login page testing over WebDriver
    #[command(subcommand)]
    Login(login::LoginCommands),

    /// Library sort vs bubble sort comparison
    #[command(subcommand)]
    Sort(sort::SortCommands),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Login(cmd) => login::execute(cmd, cli.format).await,
        Commands::Sort(cmd) => sort::execute(cmd, cli.format).map(|()| true),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            print_error(&format!("{:#}", e));
            std::process::exit(2);
        }
    }
}
