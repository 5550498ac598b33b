//! Soft assertions
//!
//! Failed checks are recorded and execution continues; the step decides
//! when to settle them with [`SoftAssert::assert_all`].

use tracing::warn;

use crate::error::{E2eError, E2eResult};

#[derive(Debug, Default)]
pub struct SoftAssert {
    failures: Vec<String>,
}

impl SoftAssert {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` if `condition` is false. Never fails by itself.
    pub fn check(&mut self, condition: bool, message: impl Into<String>) {
        if !condition {
            let message = message.into();
            warn!("Soft assertion failed: {}", message);
            self.failures.push(message);
        }
    }

    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    /// Drain the collector, failing with every recorded message if any.
    pub fn assert_all(&mut self) -> E2eResult<()> {
        let failures = std::mem::take(&mut self.failures);
        if failures.is_empty() {
            Ok(())
        } else {
            Err(E2eError::SoftAssertions(failures))
        }
    }
}
