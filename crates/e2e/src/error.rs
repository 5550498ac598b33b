//! Error types for scenario runs

use thiserror::Error;

/// Faults a wait or retry policy may choose to ride out.
///
/// These are matched by tag so the retry policy never depends on the
/// concrete error type of whichever WebDriver client produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransientFault {
    /// A located element was invalidated by a DOM update.
    StaleElement,
    /// The element is not (yet) in the page.
    NoSuchElement,
}

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Unsupported browser: {0}")]
    UnsupportedConfiguration(String),

    #[error("WebDriver not available at {0}")]
    DriverUnavailable(String),

    #[error("Browser session has not been initialized")]
    SessionNotInitialized,

    #[error("Timed out after {timeout_ms} ms waiting for: {condition}")]
    ConditionTimeout { condition: String, timeout_ms: u64 },

    #[error("Stale element reference: {0}")]
    StaleElement(String),

    #[error("No such element: {0}")]
    NoSuchElement(String),

    #[error("Element at index {index} still stale after {attempts} attempts")]
    StaleRetriesExhausted { index: usize, attempts: u32 },

    #[error("{} soft assertion(s) failed:\n  {}", .0.len(), .0.join("\n  "))]
    SoftAssertions(Vec<String>),

    #[error("Cannot parse price from {0:?}")]
    PriceParse(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("WebDriver error: {0}")]
    WebDriver(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type E2eResult<T> = Result<T, E2eError>;

impl E2eError {
    /// The recoverable fault this error represents, if any.
    pub fn transient_fault(&self) -> Option<TransientFault> {
        match self {
            E2eError::StaleElement(_) => Some(TransientFault::StaleElement),
            E2eError::NoSuchElement(_) => Some(TransientFault::NoSuchElement),
            _ => None,
        }
    }
}
