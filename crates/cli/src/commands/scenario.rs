//! Scenario inspection

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use storecheck_e2e::ScenarioSpec;

#[derive(Args)]
pub struct ScenarioArgs {
    /// Validate and re-print this scenario file instead of the built-in one
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

pub fn execute(args: ScenarioArgs) -> anyhow::Result<()> {
    let spec = match args.file {
        Some(path) => ScenarioSpec::from_file(&path)
            .with_context(|| format!("Invalid scenario {}", path.display()))?,
        None => ScenarioSpec::default(),
    };
    print!("{}", spec.to_yaml()?);
    Ok(())
}
