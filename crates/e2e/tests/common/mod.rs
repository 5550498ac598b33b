//! In-memory browser used by the scenario tests
//!
//! Models just enough of the storefront page for the runner: a search box,
//! sort controls, price inputs and a product listing whose entries can be
//! made to go stale a set number of times.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use storecheck_e2e::config::WaitConfig;
use storecheck_e2e::spec::SiteSelectors;
use storecheck_e2e::{BrowserKind, BrowserSession, E2eError, E2eResult, Locator, RunnerConfig, SessionLauncher};

pub const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

#[derive(Debug, Default)]
pub struct FakeState {
    pub url: String,
    /// URL reported after any navigation, to simulate redirects
    pub redirect: Option<String>,
    pub title: String,
    pub maximized: bool,
    pub cookies_cleared: bool,
    pub quit: bool,
    pub typed: HashMap<String, String>,
    pub clicks: Vec<String>,
    pub script_clicks: Vec<String>,
    /// (title text, price text) in document order
    pub products: Vec<(String, String)>,
    /// Locators that never match anything
    pub missing: HashSet<String>,
    /// Listing index -> number of reads that still fail as stale
    pub stale_reads: HashMap<usize, u32>,
    /// Listing index -> number of stale faults raised so far
    pub stale_raised: HashMap<usize, u32>,
    /// Locator -> number of visibility checks that still fail as stale
    pub stale_displays: HashMap<String, u32>,
    pub screenshots_taken: u32,
    pub fail_screenshots: bool,
}

#[derive(Clone, Default)]
pub struct FakeSession {
    pub state: Arc<Mutex<FakeState>>,
}

#[derive(Debug, Clone)]
pub struct FakeElement {
    locator: String,
    index: Option<usize>,
}

fn key(locator: &Locator) -> String {
    locator.to_string()
}

impl FakeSession {
    pub fn with_products(products: &[(&str, &str)]) -> Self {
        let session = Self::default();
        session.state().products = products
            .iter()
            .map(|(name, price)| (name.to_string(), price.to_string()))
            .collect();
        session.state().title = "Online Shopping Site".to_string();
        session
    }

    pub fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn typed(&self, locator: &Locator) -> Option<String> {
        self.state().typed.get(&key(locator)).cloned()
    }

    pub fn hide(&self, locator: &Locator) {
        self.state().missing.insert(key(locator));
    }

    pub fn go_stale(&self, index: usize, times: u32) {
        self.state().stale_reads.insert(index, times);
    }

    /// Make the next `times` visibility checks on `locator` hit a re-rendered element.
    pub fn stale_on_display(&self, locator: &Locator, times: u32) {
        self.state().stale_displays.insert(key(locator), times);
    }
}

#[async_trait]
impl BrowserSession for FakeSession {
    type Element = FakeElement;

    async fn navigate(&self, url: &str) -> E2eResult<()> {
        let mut state = self.state();
        state.url = state.redirect.clone().unwrap_or_else(|| url.to_string());
        Ok(())
    }

    async fn current_url(&self) -> E2eResult<String> {
        Ok(self.state().url.clone())
    }

    async fn title(&self) -> E2eResult<String> {
        Ok(self.state().title.clone())
    }

    async fn maximize_window(&self) -> E2eResult<()> {
        self.state().maximized = true;
        Ok(())
    }

    async fn delete_all_cookies(&self) -> E2eResult<()> {
        self.state().cookies_cleared = true;
        Ok(())
    }

    async fn find_all(&self, locator: &Locator) -> E2eResult<Vec<FakeElement>> {
        let state = self.state();
        let k = key(locator);
        if state.missing.contains(&k) {
            return Ok(Vec::new());
        }
        if *locator == SiteSelectors::default().product_listing {
            return Ok((0..state.products.len())
                .map(|i| FakeElement { locator: k.clone(), index: Some(i) })
                .collect());
        }
        Ok(vec![FakeElement { locator: k, index: None }])
    }

    async fn find_within(&self, parent: &FakeElement, locator: &Locator) -> E2eResult<FakeElement> {
        let mut state = self.state();
        let index = parent
            .index
            .ok_or_else(|| E2eError::NoSuchElement(key(locator)))?;

        if let Some(remaining) = state.stale_reads.get_mut(&index) {
            if *remaining > 0 {
                *remaining -= 1;
                *state.stale_raised.entry(index).or_default() += 1;
                return Err(E2eError::StaleElement(format!("listing #{}", index)));
            }
        }

        Ok(FakeElement { locator: key(locator), index: Some(index) })
    }

    async fn is_displayed(&self, element: &FakeElement) -> E2eResult<bool> {
        let mut state = self.state();
        if let Some(remaining) = state.stale_displays.get_mut(&element.locator) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(E2eError::StaleElement(element.locator.clone()));
            }
        }
        Ok(true)
    }

    async fn is_enabled(&self, _element: &FakeElement) -> E2eResult<bool> {
        Ok(true)
    }

    async fn text(&self, element: &FakeElement) -> E2eResult<String> {
        let state = self.state();
        let site = SiteSelectors::default();
        let product = element
            .index
            .and_then(|i| state.products.get(i))
            .ok_or_else(|| E2eError::NoSuchElement(element.locator.clone()))?;

        if element.locator == key(&site.product_title) {
            Ok(format!("  {}  ", product.0))
        } else if element.locator == key(&site.product_price) {
            Ok(product.1.clone())
        } else {
            Ok(String::new())
        }
    }

    async fn click(&self, element: &FakeElement) -> E2eResult<()> {
        self.state().clicks.push(element.locator.clone());
        Ok(())
    }

    async fn clear(&self, element: &FakeElement) -> E2eResult<()> {
        self.state().typed.insert(element.locator.clone(), String::new());
        Ok(())
    }

    async fn send_keys(&self, element: &FakeElement, text: &str) -> E2eResult<()> {
        self.state()
            .typed
            .entry(element.locator.clone())
            .or_default()
            .push_str(text);
        Ok(())
    }

    async fn script_click(&self, element: &FakeElement) -> E2eResult<()> {
        self.state().script_clicks.push(element.locator.clone());
        Ok(())
    }

    async fn screenshot_png(&self) -> E2eResult<Vec<u8>> {
        let mut state = self.state();
        if state.fail_screenshots {
            return Err(E2eError::WebDriver("screenshot unavailable".into()));
        }
        state.screenshots_taken += 1;
        Ok(PNG_MAGIC.to_vec())
    }

    async fn quit(self) -> E2eResult<()> {
        self.state().quit = true;
        Ok(())
    }
}

/// Hands out the same fake session and remembers what was launched
#[derive(Clone, Default)]
pub struct FakeLauncher {
    pub session: FakeSession,
    pub launches: Arc<Mutex<Vec<BrowserKind>>>,
}

impl FakeLauncher {
    pub fn new(session: FakeSession) -> Self {
        Self {
            session,
            launches: Arc::default(),
        }
    }

    pub fn launches(&self) -> Vec<BrowserKind> {
        self.launches.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionLauncher for FakeLauncher {
    type Session = FakeSession;

    async fn launch(&self, kind: BrowserKind) -> E2eResult<FakeSession> {
        self.launches.lock().unwrap().push(kind);
        Ok(self.session.clone())
    }
}

/// Runner config with short waits and screenshots under `dir`
pub fn test_config(dir: &Path) -> RunnerConfig {
    RunnerConfig {
        screenshot_dir: dir.join("screenshots"),
        output_dir: dir.join("results"),
        waits: WaitConfig {
            explicit_timeout_ms: 200,
            explicit_interval_ms: 10,
            poll_timeout_ms: 300,
            poll_interval_ms: 20,
            max_stale_retries: 10,
        },
        ..Default::default()
    }
}

pub fn short() -> Duration {
    Duration::from_millis(100)
}

pub fn gadget_listing() -> FakeSession {
    FakeSession::with_products(&[
        ("boAt Rockerz 255", "Rs. 1,099"),
        ("Budget Buds", "Rs. 399"),
        ("Noise Tune Active", "Rs.  799"),
        ("JBL Tune 510BT", "Rs. 3,499"),
        ("pTron Bassbuds", "Rs. 700"),
        ("Zebronics Zeb-Thunder", "Rs. 1,400"),
        ("Boult Audio Z20", "Rs. 1,299"),
        ("Mivi Collar", "Rs. 999"),
        ("Sony WH-CH520", "Rs. 4,490"),
    ])
}
