//! Scenario runner: owns one browser session and drives the storefront steps

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use crate::browser::{BrowserKind, BrowserSession, Locator, SessionLauncher, ENTER};
use crate::config::RunnerConfig;
use crate::error::{E2eError, E2eResult, TransientFault};
use crate::product::{parse_price, PriceRange, ProductRecord};
use crate::report::{ScenarioReport, StepResult};
use crate::screenshot::ScreenshotWriter;
use crate::soft_assert::SoftAssert;
use crate::spec::{ScenarioSpec, ScenarioStep, SiteSelectors, StepAction};
use crate::wait::{self, Wait};

/// What a successful step leaves behind
#[derive(Debug, Default)]
pub struct StepOutput {
    pub screenshot: Option<PathBuf>,
    pub products: Vec<ProductRecord>,
}

/// Drives one browser session through a scenario
pub struct ScenarioRunner<S: BrowserSession> {
    config: RunnerConfig,
    site: SiteSelectors,
    screenshots: ScreenshotWriter,
    session: Option<S>,
    browser: Option<BrowserKind>,
}

impl<S: BrowserSession> ScenarioRunner<S> {
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            screenshots: ScreenshotWriter::new(config.screenshot_dir.clone()),
            site: SiteSelectors::default(),
            config,
            session: None,
            browser: None,
        }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> E2eResult<&S> {
        self.session.as_ref().ok_or(E2eError::SessionNotInitialized)
    }

    /// Open a session for `browser`, maximize it and clear its cookies.
    ///
    /// An unsupported browser name fails before the launcher is asked for
    /// anything.
    pub async fn initialize_session<L>(&mut self, launcher: &L, browser: &str) -> E2eResult<()>
    where
        L: SessionLauncher<Session = S>,
    {
        let kind: BrowserKind = browser.parse()?;

        if self.session.is_some() {
            warn!("Replacing existing browser session");
            self.teardown().await;
        }

        let session = launcher.launch(kind).await?;
        let prepared = async {
            session.maximize_window().await?;
            session.delete_all_cookies().await
        }
        .await;

        if let Err(e) = prepared {
            if let Err(quit_err) = session.quit().await {
                warn!("Failed to quit half-initialized session: {}", quit_err);
            }
            return Err(e);
        }

        info!(
            "{} session ready (explicit wait {} ms)",
            kind, self.config.waits.explicit_timeout_ms
        );
        self.session = Some(session);
        self.browser = Some(kind);
        Ok(())
    }

    /// Quit the session if there is one. A no-op otherwise.
    pub async fn teardown(&mut self) {
        if let Some(session) = self.session.take() {
            match session.quit().await {
                Ok(()) => info!("Browser session closed"),
                Err(e) => warn!("Failed to quit browser session: {}", e),
            }
        }
    }

    fn explicit_wait(&self, timeout: Duration) -> Wait {
        Wait::explicit(timeout).with_interval(self.config.waits.explicit_interval())
    }

    fn default_timeout(&self) -> Duration {
        self.config.waits.explicit_timeout()
    }

    pub async fn navigate(&self, url: &str) -> E2eResult<()> {
        debug!("Navigating to {}", url);
        self.session()?.navigate(url).await
    }

    pub async fn wait_for_visible(&self, locator: &Locator, timeout: Duration) -> E2eResult<S::Element> {
        let session = self.session()?;
        self.explicit_wait(timeout)
            .until(&format!("visibility of {}", locator), || {
                wait::visible_element(session, locator)
            })
            .await
    }

    pub async fn wait_for_clickable(&self, locator: &Locator, timeout: Duration) -> E2eResult<S::Element> {
        let session = self.session()?;
        self.explicit_wait(timeout)
            .until(&format!("{} to be clickable", locator), || {
                wait::clickable_element(session, locator)
            })
            .await
    }

    pub async fn wait_for_presence_of_all(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> E2eResult<Vec<S::Element>> {
        let session = self.session()?;
        self.explicit_wait(timeout)
            .until(&format!("presence of all {}", locator), || {
                wait::present_elements(session, locator)
            })
            .await
    }

    pub async fn wait_for_visibility_of_all(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> E2eResult<Vec<S::Element>> {
        let session = self.session()?;
        self.explicit_wait(timeout)
            .until(&format!("visibility of all {}", locator), || {
                wait::all_visible_elements(session, locator)
            })
            .await
    }

    /// Capture a labelled screenshot; never fails.
    pub async fn screenshot(&self, label: &str) -> Option<PathBuf> {
        match self.session.as_ref() {
            Some(session) => self.screenshots.capture(session, label).await,
            None => {
                warn!("No browser session for screenshot '{}'", label);
                None
            }
        }
    }

    pub async fn open_homepage(&self, url: &str, expect_url_contains: &str) -> E2eResult<Option<PathBuf>> {
        let mut soft = SoftAssert::new();
        self.navigate(url).await?;

        let session = self.session()?;
        let current = session.current_url().await?;
        info!("Page title: {}", session.title().await?);
        info!("Page URL: {}", current);

        soft.check(
            current.contains(expect_url_contains),
            format!("Homepage not loaded! Current URL: {}", current),
        );
        let shot = self.screenshot("homepage").await;
        soft.assert_all()?;
        Ok(shot)
    }

    pub async fn search(&self, query: &str) -> E2eResult<Option<PathBuf>> {
        let session = self.session()?;
        let search_box = self.wait_for_visible(&self.site.search_box, self.default_timeout()).await?;
        session
            .send_keys(&search_box, &format!("{}{}", query, ENTER))
            .await?;
        info!("Searched for '{}'", query);
        Ok(self.screenshot("search_results").await)
    }

    pub async fn sort_by_popularity(&self) -> E2eResult<Option<PathBuf>> {
        let session = self.session()?;
        let timeout = self.default_timeout();

        let trigger = self.wait_for_clickable(&self.site.sort_trigger, timeout).await?;
        session.click(&trigger).await?;

        self.wait_for_visible(&self.site.sort_options, timeout).await?;
        let popularity = self.wait_for_clickable(&self.site.sort_popularity, timeout).await?;
        // The option sits under an overlay; dispatch the click from script.
        session.script_click(&popularity).await?;

        info!("Sorted results by popularity");
        Ok(self.screenshot("sorted_by_popularity").await)
    }

    pub async fn set_price_range(&self, min: u64, max: u64) -> E2eResult<Option<PathBuf>> {
        let session = self.session()?;
        let timeout = self.default_timeout();

        let from = self.wait_for_visible(&self.site.price_min, timeout).await?;
        session.clear(&from).await?;
        session.send_keys(&from, &min.to_string()).await?;

        let to = self.wait_for_visible(&self.site.price_max, timeout).await?;
        session.clear(&to).await?;
        session.send_keys(&to, &max.to_string()).await?;

        let apply = self.wait_for_clickable(&self.site.price_apply, timeout).await?;
        session.click(&apply).await?;

        self.wait_for_presence_of_all(&self.site.product_listing, timeout).await?;
        info!("Filtered price range {} - {}", min, max);
        Ok(self.screenshot("filtered_by_price").await)
    }

    /// Collect up to `count` listed products priced within `[min_price, max_price]`.
    ///
    /// The listing is re-located for every index so a re-render between
    /// reads does not leave us holding dead handles. A stale element retries
    /// the same index, up to `waits.max_stale_retries` times.
    pub async fn extract_top_products(
        &self,
        count: usize,
        min_price: u64,
        max_price: u64,
    ) -> E2eResult<StepOutput> {
        let session = self.session()?;
        let listing = &self.site.product_listing;
        let range = PriceRange::new(min_price, max_price);
        let max_retries = self.config.waits.max_stale_retries;

        let poll = Wait::fluent(self.config.waits.poll_timeout(), self.config.waits.poll_interval())
            .ignoring(TransientFault::NoSuchElement)
            .ignoring(TransientFault::StaleElement);
        let total = poll
            .until(&format!("visibility of all {}", listing), || {
                wait::all_visible_elements(session, listing)
            })
            .await?
            .len();
        debug!("{} product listing(s) visible", total);

        let mut soft = SoftAssert::new();
        let mut products: Vec<ProductRecord> = Vec::new();
        let mut index = 0;
        let mut stale_attempts = 0u32;

        while index < total && products.len() < count {
            match self.read_listing(session, index).await {
                Ok(Some((name, price))) => {
                    stale_attempts = 0;
                    if range.contains(price) {
                        let rank = products.len() + 1;
                        info!("{}. {} - Rs. {}", rank, name, price);
                        soft.check(
                            range.contains(price),
                            format!("Price not in expected range for product: {}", name),
                        );
                        products.push(ProductRecord { rank, name, price });
                    }
                    index += 1;
                }
                Ok(None) => {
                    warn!("Listing shrank below {} entries at index {}", total, index);
                    break;
                }
                Err(e) if e.transient_fault() == Some(TransientFault::StaleElement) => {
                    stale_attempts += 1;
                    if stale_attempts > max_retries {
                        return Err(E2eError::StaleRetriesExhausted {
                            index,
                            attempts: stale_attempts,
                        });
                    }
                    warn!("Stale element at index {}, retrying...", index);
                }
                Err(e) => return Err(e),
            }
        }

        let screenshot = self.screenshot("top_products").await;
        soft.assert_all()?;
        Ok(StepOutput { screenshot, products })
    }

    async fn read_listing(&self, session: &S, index: usize) -> E2eResult<Option<(String, u64)>> {
        let listings = session.find_all(&self.site.product_listing).await?;
        let Some(product) = listings.get(index) else {
            return Ok(None);
        };

        let title = session.find_within(product, &self.site.product_title).await?;
        let name = session.text(&title).await?.trim().to_string();

        let price_el = session.find_within(product, &self.site.product_price).await?;
        let price = parse_price(session.text(&price_el).await?.trim())?;

        Ok(Some((name, price)))
    }

    /// Execute a single scenario step
    pub async fn execute_step(&self, step: &ScenarioStep) -> E2eResult<StepOutput> {
        debug!("Executing step: {}", step.name);

        let screenshot = match &step.action {
            StepAction::OpenHomepage { url, expect_url_contains } => {
                self.open_homepage(url, expect_url_contains).await?
            }
            StepAction::Search { query } => self.search(query).await?,
            StepAction::SortByPopularity => self.sort_by_popularity().await?,
            StepAction::FilterByPrice { min, max } => self.set_price_range(*min, *max).await?,
            StepAction::ExtractTopProducts { count, min_price, max_price } => {
                return self.extract_top_products(*count, *min_price, *max_price).await;
            }
        };

        Ok(StepOutput {
            screenshot,
            products: Vec::new(),
        })
    }

    /// Run every step in order against the current session.
    ///
    /// A step only runs if the one before it passed; the rest are reported
    /// as skipped. A failing step gets a `FAILED_<name>` screenshot.
    pub async fn run_steps(&mut self, spec: &ScenarioSpec) -> ScenarioReport {
        self.site = spec.site.clone();
        let start = Instant::now();
        let mut results = Vec::with_capacity(spec.steps.len());
        let mut blocked_by: Option<String> = None;

        info!("Running scenario '{}' ({} steps)", spec.name, spec.steps.len());

        for step in &spec.steps {
            if let Some(blocker) = &blocked_by {
                info!("- {} skipped", step.name);
                results.push(StepResult::skipped(&step.name, blocker));
                continue;
            }

            let step_start = Instant::now();
            let outcome = self.execute_step(step).await;
            let duration_ms = step_start.elapsed().as_millis() as u64;

            match outcome {
                Ok(output) => {
                    info!("✓ {} ({} ms)", step.name, duration_ms);
                    results.push(StepResult::passed(
                        &step.name,
                        duration_ms,
                        output.screenshot,
                        output.products,
                    ));
                }
                Err(e) => {
                    error!("✗ {} - {}", step.name, e);
                    let shot = self.screenshot(&format!("FAILED_{}", step.name)).await;
                    results.push(StepResult::failed(&step.name, duration_ms, e.to_string(), shot));
                    blocked_by = Some(step.name.clone());
                }
            }
        }

        let report = ScenarioReport::new(
            &spec.name,
            self.browser,
            start.elapsed().as_millis() as u64,
            results,
        );
        info!(
            "Scenario Results: {} passed, {} failed, {} skipped ({} ms)",
            report.passed, report.failed, report.skipped, report.duration_ms
        );
        report
    }

    /// Initialize, run `spec`, and always tear down.
    pub async fn run<L>(&mut self, launcher: &L, spec: &ScenarioSpec) -> E2eResult<ScenarioReport>
    where
        L: SessionLauncher<Session = S>,
    {
        let browser = self.config.browser.clone();
        if let Err(e) = self.initialize_session(launcher, &browser).await {
            self.teardown().await;
            return Err(e);
        }

        let report = self.run_steps(spec).await;
        self.teardown().await;
        Ok(report)
    }
}
