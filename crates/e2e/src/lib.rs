//! storecheck E2E scenario runner
//!
//! This crate drives a storefront through a WebDriver browser session:
//! - Opens one session per run (Chrome, Firefox or Edge)
//! - Executes an ordered list of named steps from a YAML scenario spec
//! - Waits on element conditions with explicit waits and bounded polls
//! - Extracts and validates product data with soft assertions
//! - Captures timestamped diagnostic screenshots
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  ScenarioRunner<S: BrowserSession>          │
//! ├─────────────────────────────────────────────────────────────┤
//! │    ├── initialize_session(launcher, browser)                │
//! │    ├── run_steps(spec: ScenarioSpec) -> ScenarioReport      │
//! │    │     ├── open_homepage { url, expect_url_contains }     │
//! │    │     ├── search { query }                               │
//! │    │     ├── sort_by_popularity                             │
//! │    │     ├── filter_by_price { min, max }                   │
//! │    │     └── extract_top_products { count, min, max }       │
//! │    ├── screenshot(label) -> Option<PathBuf>                 │
//! │    └── teardown()                                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Wait (explicit / fluent)   SoftAssert   ScreenshotWriter   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  WebDriverLauncher / WebDriverSession (thirtyfour)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod browser;
pub mod config;
pub mod error;
pub mod product;
pub mod report;
pub mod runner;
pub mod screenshot;
pub mod soft_assert;
pub mod spec;
pub mod wait;
pub mod webdriver;

pub use browser::{BrowserKind, BrowserSession, Locator, SessionLauncher};
pub use config::RunnerConfig;
pub use error::{E2eError, E2eResult, TransientFault};
pub use report::{ScenarioReport, StepResult, StepStatus};
pub use runner::ScenarioRunner;
pub use spec::{ScenarioSpec, ScenarioStep, StepAction};
pub use webdriver::{WebDriverLauncher, WebDriverSession};
