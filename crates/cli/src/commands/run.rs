//! Run a scenario

use std::path::PathBuf;

use clap::Args;
use storecheck_e2e::{
    ScenarioReport, ScenarioRunner, ScenarioSpec, WebDriverLauncher, WebDriverSession,
};
use tracing::error;

use crate::commands::config;
use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct RunArgs {
    /// Browser to use (chrome, firefox, edge)
    #[arg(short, long)]
    pub browser: Option<String>,

    /// WebDriver server URL
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Run the browser without a visible window
    #[arg(long)]
    pub headless: bool,

    /// Runner config file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Scenario file (YAML); the built-in storefront scenario when omitted
    #[arg(short, long)]
    pub scenario: Option<PathBuf>,

    /// Directory for screenshots
    #[arg(long)]
    pub screenshots: Option<PathBuf>,

    /// Output directory for the JSON report
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Returns the process exit code: 0 all steps passed, 1 a step failed, 2 the run never started
pub async fn execute(args: RunArgs, format: OutputFormat) -> i32 {
    match run(args, format).await {
        Ok(report) if report.success() => 0,
        Ok(_) => 1,
        Err(e) => {
            error!("{:#}", e);
            output::print_error(&format!("{:#}", e));
            2
        }
    }
}

async fn run(args: RunArgs, format: OutputFormat) -> anyhow::Result<ScenarioReport> {
    let mut runner_config = config::load(args.config.as_deref())?;
    if let Some(browser) = args.browser {
        runner_config.browser = browser;
    }
    if let Some(url) = args.webdriver_url {
        runner_config.webdriver_url = url;
    }
    if args.headless {
        runner_config.headless = true;
    }
    if let Some(dir) = args.screenshots {
        runner_config.screenshot_dir = dir;
    }
    if let Some(dir) = args.output {
        runner_config.output_dir = dir;
    }

    let spec = match args.scenario {
        Some(path) => ScenarioSpec::from_file(&path)?,
        None => ScenarioSpec::default(),
    };

    let launcher = WebDriverLauncher::new(runner_config.webdriver_url.clone())
        .headless(runner_config.headless)
        .startup_timeout(runner_config.startup_timeout());

    let output_dir = runner_config.output_dir.clone();
    let mut runner: ScenarioRunner<WebDriverSession> = ScenarioRunner::new(runner_config);
    let report = runner.run(&launcher, &spec).await?;

    output::print_report(&report, format);
    if let Err(e) = report.write_json(&output_dir) {
        output::print_warning(&format!("Could not write report: {}", e));
    }

    Ok(report)
}
