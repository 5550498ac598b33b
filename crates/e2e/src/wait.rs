//! Explicit waits and bounded polls

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::browser::{BrowserSession, Locator};
use crate::error::{E2eError, E2eResult, TransientFault};

/// Poll a condition until it yields a value or the timeout elapses.
#[derive(Debug, Clone)]
pub struct Wait {
    timeout: Duration,
    interval: Duration,
    ignoring: Vec<TransientFault>,
}

impl Wait {
    /// Explicit wait: short polling interval, tolerates elements that are
    /// not there yet or were re-rendered between lookup and inspection.
    pub fn explicit(timeout: Duration) -> Self {
        Self {
            timeout,
            interval: Duration::from_millis(500),
            ignoring: vec![TransientFault::NoSuchElement, TransientFault::StaleElement],
        }
    }

    /// Bounded poll with a caller-chosen interval and no ignored faults.
    pub fn fluent(timeout: Duration, interval: Duration) -> Self {
        Self {
            timeout,
            interval,
            ignoring: Vec::new(),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn ignoring(mut self, fault: TransientFault) -> Self {
        if !self.ignoring.contains(&fault) {
            self.ignoring.push(fault);
        }
        self
    }

    fn ignores(&self, err: &E2eError) -> bool {
        err.transient_fault()
            .map(|fault| self.ignoring.contains(&fault))
            .unwrap_or(false)
    }

    /// Evaluate `condition` until it returns `Ok(Some(_))`.
    ///
    /// `Ok(None)` means "not yet". Errors whose fault is ignored count as
    /// "not yet"; any other error aborts the wait immediately.
    pub async fn until<T, F, Fut>(&self, description: &str, mut condition: F) -> E2eResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = E2eResult<Option<T>>>,
    {
        let start = Instant::now();
        let mut polls = 0u32;

        loop {
            polls += 1;
            match condition().await {
                Ok(Some(value)) => {
                    debug!("Condition met after {} poll(s): {}", polls, description);
                    return Ok(value);
                }
                Ok(None) => {}
                Err(e) if self.ignores(&e) => {
                    debug!("Ignoring transient fault while waiting for {}: {}", description, e);
                }
                Err(e) => return Err(e),
            }

            let elapsed = start.elapsed();
            if elapsed >= self.timeout {
                return Err(E2eError::ConditionTimeout {
                    condition: description.to_string(),
                    timeout_ms: self.timeout.as_millis() as u64,
                });
            }

            sleep(self.interval.min(self.timeout - elapsed)).await;
        }
    }
}

// Conditions over located elements. Each returns `Ok(None)` while unmet.

/// First element matching `locator` that is displayed.
pub async fn visible_element<S: BrowserSession>(
    session: &S,
    locator: &Locator,
) -> E2eResult<Option<S::Element>> {
    for element in session.find_all(locator).await? {
        if session.is_displayed(&element).await? {
            return Ok(Some(element));
        }
    }
    Ok(None)
}

/// First element matching `locator` that is displayed and enabled.
pub async fn clickable_element<S: BrowserSession>(
    session: &S,
    locator: &Locator,
) -> E2eResult<Option<S::Element>> {
    match visible_element(session, locator).await? {
        Some(element) if session.is_enabled(&element).await? => Ok(Some(element)),
        _ => Ok(None),
    }
}

/// Every element matching `locator`, once at least one is attached.
pub async fn present_elements<S: BrowserSession>(
    session: &S,
    locator: &Locator,
) -> E2eResult<Option<Vec<S::Element>>> {
    let elements = session.find_all(locator).await?;
    Ok(if elements.is_empty() { None } else { Some(elements) })
}

/// Every element matching `locator`, once there is at least one and all are displayed.
pub async fn all_visible_elements<S: BrowserSession>(
    session: &S,
    locator: &Locator,
) -> E2eResult<Option<Vec<S::Element>>> {
    let elements = session.find_all(locator).await?;
    if elements.is_empty() {
        return Ok(None);
    }
    for element in &elements {
        if !session.is_displayed(element).await? {
            return Ok(None);
        }
    }
    Ok(Some(elements))
}
