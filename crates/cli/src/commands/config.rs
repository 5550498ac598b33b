//! Effective configuration

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use storecheck_e2e::RunnerConfig;

#[derive(Args)]
pub struct ConfigArgs {
    /// Config file to load before applying environment overrides
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Defaults, then the config file if given, then `STORECHECK_*` env vars
pub fn load(path: Option<&Path>) -> anyhow::Result<RunnerConfig> {
    let mut config = match path {
        Some(path) => RunnerConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => RunnerConfig::default(),
    };
    config.apply_env();
    Ok(config)
}

pub fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    let config = load(args.config.as_deref())?;
    print!("{}", config.to_toml()?);
    Ok(())
}
