//! Runner configuration
//!
//! Defaults, optionally overlaid by a TOML file and then by `STORECHECK_*`
//! environment variables. The CLI applies its flags last.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{E2eError, E2eResult};

/// Configuration for the scenario runner
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Browser engine name, validated when the session is created
    pub browser: String,

    /// WebDriver server endpoint
    pub webdriver_url: String,

    pub headless: bool,

    /// How long to wait for the WebDriver server to report ready
    pub startup_timeout_ms: u64,

    /// Where screenshots are written
    pub screenshot_dir: PathBuf,

    /// Where the JSON report is written
    pub output_dir: PathBuf,

    pub waits: WaitConfig,
}

/// Timeouts and retry bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitConfig {
    pub explicit_timeout_ms: u64,
    pub explicit_interval_ms: u64,
    pub poll_timeout_ms: u64,
    pub poll_interval_ms: u64,
    /// Attempts per listing index before a stale element fails the step
    pub max_stale_retries: u32,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            browser: "chrome".to_string(),
            webdriver_url: "http://localhost:9515".to_string(),
            headless: false,
            startup_timeout_ms: 10_000,
            screenshot_dir: PathBuf::from("screenshots"),
            output_dir: PathBuf::from("test-results"),
            waits: WaitConfig::default(),
        }
    }
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            explicit_timeout_ms: 20_000,
            explicit_interval_ms: 500,
            poll_timeout_ms: 30_000,
            poll_interval_ms: 5_000,
            max_stale_retries: 10,
        }
    }
}

impl WaitConfig {
    pub fn explicit_timeout(&self) -> Duration {
        Duration::from_millis(self.explicit_timeout_ms)
    }

    pub fn explicit_interval(&self) -> Duration {
        Duration::from_millis(self.explicit_interval_ms)
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl RunnerConfig {
    /// Parse a config from a TOML string
    pub fn from_toml(content: &str) -> E2eResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> E2eResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn to_toml(&self) -> E2eResult<String> {
        toml::to_string_pretty(self).map_err(|e| E2eError::Config(e.to_string()))
    }

    /// Overlay `STORECHECK_*` environment variables
    pub fn apply_env(&mut self) {
        if let Ok(browser) = env::var("STORECHECK_BROWSER") {
            self.browser = browser;
        }
        if let Ok(url) = env::var("STORECHECK_WEBDRIVER_URL") {
            self.webdriver_url = url;
        }
        if let Ok(headless) = env::var("STORECHECK_HEADLESS") {
            self.headless = headless == "true" || headless == "1";
        }
    }

    pub fn startup_timeout(&self) -> Duration {
        Duration::from_millis(self.startup_timeout_ms)
    }
}
