//! storecheck CLI - Main Entry Point
//!
//! Runs a browser scenario against a storefront through a WebDriver server
//! and prints what happened.

use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{config, run, scenario};

/// storecheck - Browser-driven storefront checks
#[derive(Parser)]
#[command(name = "storecheck")]
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
    /// Run a scenario in a fresh browser session
    Run(run::RunArgs),

    /// Print the built-in scenario as YAML
    Scenario(scenario::ScenarioArgs),

    /// Print the effective runner configuration as TOML
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
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

    match cli.command {
        Commands::Run(args) => {
            let code = run::execute(args, cli.format).await;
            std::process::exit(code);
        }
        Commands::Scenario(args) => scenario::execute(args)?,
        Commands::Config(args) => config::execute(args)?,
    }

    Ok(())
}
