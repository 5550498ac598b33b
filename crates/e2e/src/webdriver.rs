//! WebDriver-backed sessions via thirtyfour

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use thirtyfour::error::WebDriverError;
use thirtyfour::{By, WebDriver, WebElement};
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::browser::{BrowserKind, BrowserSession, Locator, SessionLauncher};
use crate::error::{E2eError, E2eResult};

/// Launches sessions against a running WebDriver server (chromedriver,
/// geckodriver, msedgedriver or a Selenium grid).
#[derive(Debug, Clone)]
pub struct WebDriverLauncher {
    pub webdriver_url: String,
    pub headless: bool,
    pub startup_timeout: Duration,
}

impl WebDriverLauncher {
    pub fn new(webdriver_url: impl Into<String>) -> Self {
        Self {
            webdriver_url: webdriver_url.into(),
            headless: false,
            startup_timeout: Duration::from_secs(10),
        }
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn startup_timeout(mut self, timeout: Duration) -> Self {
        self.startup_timeout = timeout;
        self
    }

    /// Poll the driver's `/status` endpoint until it reports ready
    async fn wait_for_ready(&self) -> E2eResult<()> {
        let status_url = format!("{}/status", self.webdriver_url.trim_end_matches('/'));
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(2))
            .build()?;

        let start = Instant::now();
        let mut attempts = 0;

        while start.elapsed() < self.startup_timeout {
            attempts += 1;

            match client.get(&status_url).send().await {
                Ok(resp) if resp.status().is_success() => match resp.json::<DriverStatus>().await {
                    Ok(status) if status.value.ready => {
                        debug!("WebDriver ready after {} attempt(s): {}", attempts, status.value.message);
                        return Ok(());
                    }
                    Ok(status) => debug!("WebDriver not ready yet: {}", status.value.message),
                    Err(e) => debug!("Unreadable WebDriver status: {}", e),
                },
                Ok(resp) => debug!("WebDriver status returned {}", resp.status()),
                Err(e) => debug!("WebDriver status request failed: {}", e),
            }

            sleep(Duration::from_millis(250)).await;
        }

        warn!("WebDriver at {} not ready after {} attempts", self.webdriver_url, attempts);
        Err(E2eError::DriverUnavailable(self.webdriver_url.clone()))
    }

    /// W3C capabilities for the requested engine
    pub fn capabilities(&self, kind: BrowserKind) -> Map<String, Value> {
        let mut args: Vec<&str> = Vec::new();
        let (browser_name, options_key) = match kind {
            BrowserKind::Chrome => ("chrome", "goog:chromeOptions"),
            BrowserKind::Firefox => ("firefox", "moz:firefoxOptions"),
            BrowserKind::Edge => ("MicrosoftEdge", "ms:edgeOptions"),
        };

        if self.headless {
            match kind {
                BrowserKind::Firefox => args.push("-headless"),
                BrowserKind::Chrome | BrowserKind::Edge => {
                    args.push("--headless=new");
                    args.push("--disable-gpu");
                }
            }
        }

        let mut caps = Map::new();
        caps.insert("browserName".to_string(), json!(browser_name));
        caps.insert(options_key.to_string(), json!({ "args": args }));
        caps
    }
}

#[derive(Debug, Deserialize)]
struct DriverStatus {
    value: DriverStatusValue,
}

#[derive(Debug, Deserialize)]
struct DriverStatusValue {
    #[serde(default)]
    ready: bool,
    #[serde(default)]
    message: String,
}

#[async_trait]
impl SessionLauncher for WebDriverLauncher {
    type Session = WebDriverSession;

    async fn launch(&self, kind: BrowserKind) -> E2eResult<WebDriverSession> {
        self.wait_for_ready().await?;

        info!("Starting {} session via {}", kind, self.webdriver_url);
        let driver = WebDriver::new(self.webdriver_url.as_str(), self.capabilities(kind))
            .await
            .map_err(map_err)?;

        Ok(WebDriverSession { driver })
    }
}

/// A live thirtyfour session
pub struct WebDriverSession {
    driver: WebDriver,
}

fn by(locator: &Locator) -> By {
    match locator {
        Locator::Id(v) => By::Id(v.as_str()),
        Locator::Css(v) => By::Css(v.as_str()),
        Locator::XPath(v) => By::XPath(v.as_str()),
        Locator::Name(v) => By::Name(v.as_str()),
    }
}

fn map_err(err: WebDriverError) -> E2eError {
    match err {
        err @ WebDriverError::StaleElementReference(_) => E2eError::StaleElement(err.to_string()),
        err @ WebDriverError::NoSuchElement(_) => E2eError::NoSuchElement(err.to_string()),
        other => E2eError::WebDriver(other.to_string()),
    }
}

#[async_trait]
impl BrowserSession for WebDriverSession {
    type Element = WebElement;

    async fn navigate(&self, url: &str) -> E2eResult<()> {
        self.driver
            .goto(url)
            .await
            .map_err(|e| E2eError::Navigation(format!("{}: {}", url, e)))
    }

    async fn current_url(&self) -> E2eResult<String> {
        Ok(self.driver.current_url().await.map_err(map_err)?.to_string())
    }

    async fn title(&self) -> E2eResult<String> {
        self.driver.title().await.map_err(map_err)
    }

    async fn maximize_window(&self) -> E2eResult<()> {
        self.driver.maximize_window().await.map_err(map_err)
    }

    async fn delete_all_cookies(&self) -> E2eResult<()> {
        self.driver.delete_all_cookies().await.map_err(map_err)
    }

    async fn find_all(&self, locator: &Locator) -> E2eResult<Vec<WebElement>> {
        self.driver.find_all(by(locator)).await.map_err(map_err)
    }

    async fn find_within(&self, parent: &WebElement, locator: &Locator) -> E2eResult<WebElement> {
        parent.find(by(locator)).await.map_err(map_err)
    }

    async fn is_displayed(&self, element: &WebElement) -> E2eResult<bool> {
        element.is_displayed().await.map_err(map_err)
    }

    async fn is_enabled(&self, element: &WebElement) -> E2eResult<bool> {
        element.is_enabled().await.map_err(map_err)
    }

    async fn text(&self, element: &WebElement) -> E2eResult<String> {
        element.text().await.map_err(map_err)
    }

    async fn click(&self, element: &WebElement) -> E2eResult<()> {
        element.click().await.map_err(map_err)
    }

    async fn clear(&self, element: &WebElement) -> E2eResult<()> {
        element.clear().await.map_err(map_err)
    }

    async fn send_keys(&self, element: &WebElement, text: &str) -> E2eResult<()> {
        element.send_keys(text).await.map_err(map_err)
    }

    async fn script_click(&self, element: &WebElement) -> E2eResult<()> {
        let arg = element.to_json().map_err(map_err)?;
        self.driver
            .execute("arguments[0].click();", vec![arg])
            .await
            .map_err(map_err)?;
        Ok(())
    }

    async fn screenshot_png(&self) -> E2eResult<Vec<u8>> {
        self.driver.screenshot_as_png().await.map_err(map_err)
    }

    async fn quit(self) -> E2eResult<()> {
        self.driver.quit().await.map_err(map_err)
    }
}
