//! Step and scenario results

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::browser::BrowserKind;
use crate::error::E2eResult;
use crate::product::ProductRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Passed,
    Failed,
    Skipped,
}

/// Result of executing one scenario step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub name: String,
    pub status: StepStatus,
    pub duration_ms: u64,
    pub error: Option<String>,
    pub screenshot_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub products: Vec<ProductRecord>,
}

impl StepResult {
    pub fn passed(
        name: impl Into<String>,
        duration_ms: u64,
        screenshot_path: Option<PathBuf>,
        products: Vec<ProductRecord>,
    ) -> Self {
        Self {
            name: name.into(),
            status: StepStatus::Passed,
            duration_ms,
            error: None,
            screenshot_path,
            products,
        }
    }

    pub fn failed(
        name: impl Into<String>,
        duration_ms: u64,
        error: impl Into<String>,
        screenshot_path: Option<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            status: StepStatus::Failed,
            duration_ms,
            error: Some(error.into()),
            screenshot_path,
            products: Vec::new(),
        }
    }

    pub fn skipped(name: impl Into<String>, blocked_by: &str) -> Self {
        Self {
            name: name.into(),
            status: StepStatus::Skipped,
            duration_ms: 0,
            error: Some(format!("skipped: step '{}' did not pass", blocked_by)),
            screenshot_path: None,
            products: Vec::new(),
        }
    }
}

/// Result of running a whole scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub scenario: String,
    pub browser: Option<BrowserKind>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub duration_ms: u64,
    pub steps: Vec<StepResult>,
}

impl ScenarioReport {
    pub fn new(
        scenario: impl Into<String>,
        browser: Option<BrowserKind>,
        duration_ms: u64,
        steps: Vec<StepResult>,
    ) -> Self {
        let count = |status: StepStatus| steps.iter().filter(|s| s.status == status).count();
        Self {
            scenario: scenario.into(),
            browser,
            total: steps.len(),
            passed: count(StepStatus::Passed),
            failed: count(StepStatus::Failed),
            skipped: count(StepStatus::Skipped),
            duration_ms,
            steps,
        }
    }

    pub fn success(&self) -> bool {
        self.failed == 0 && self.skipped == 0
    }

    pub fn step(&self, name: &str) -> Option<&StepResult> {
        self.steps.iter().find(|s| s.name == name)
    }

    /// Every product extracted during the run, in rank order per step
    pub fn products(&self) -> impl Iterator<Item = &ProductRecord> {
        self.steps.iter().flat_map(|s| s.products.iter())
    }

    /// Write the report as `scenario-results.json` under `output_dir`
    pub fn write_json(&self, output_dir: &Path) -> E2eResult<PathBuf> {
        std::fs::create_dir_all(output_dir)?;

        let path = output_dir.join("scenario-results.json");
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}
