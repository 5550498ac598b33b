//! Browser session abstraction
//!
//! The runner only needs a handful of capabilities from a live browser:
//! navigation, element lookup, a few element interactions, a script bridge
//! for clicks and a viewport screenshot. [`BrowserSession`] captures exactly
//! those so the runner can be driven by a real WebDriver session or by an
//! in-memory fake in tests.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{E2eError, E2eResult};

/// WebDriver key code for Enter, appended to typed text to submit a field.
pub const ENTER: char = '\u{E007}';

/// Browser engines a session can be launched with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrowserKind {
    #[default]
    Chrome,
    Firefox,
    Edge,
}

impl BrowserKind {
    pub const ALL: [BrowserKind; 3] = [BrowserKind::Chrome, BrowserKind::Firefox, BrowserKind::Edge];

    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserKind::Chrome => "chrome",
            BrowserKind::Firefox => "firefox",
            BrowserKind::Edge => "edge",
        }
    }
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BrowserKind {
    type Err = E2eError;

    fn from_str(s: &str) -> E2eResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chrome" => Ok(BrowserKind::Chrome),
            "firefox" => Ok(BrowserKind::Firefox),
            "edge" => Ok(BrowserKind::Edge),
            _ => Err(E2eError::UnsupportedConfiguration(s.to_string())),
        }
    }
}

/// How to find elements in the current page
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locator {
    Id(String),
    Css(String),
    #[serde(rename = "xpath")]
    XPath(String),
    Name(String),
}

impl Locator {
    pub fn id(value: impl Into<String>) -> Self {
        Locator::Id(value.into())
    }

    pub fn css(value: impl Into<String>) -> Self {
        Locator::Css(value.into())
    }

    pub fn xpath(value: impl Into<String>) -> Self {
        Locator::XPath(value.into())
    }

    pub fn name(value: impl Into<String>) -> Self {
        Locator::Name(value.into())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Id(v) => write!(f, "id={}", v),
            Locator::Css(v) => write!(f, "css={}", v),
            Locator::XPath(v) => write!(f, "xpath={}", v),
            Locator::Name(v) => write!(f, "name={}", v),
        }
    }
}

/// A live browser under automated control.
///
/// Element handles are opaque; any of the element methods may fail with
/// [`E2eError::StaleElement`] when the page re-rendered underneath them.
#[async_trait]
pub trait BrowserSession: Send + Sync + Sized {
    type Element: Send + Sync;

    async fn navigate(&self, url: &str) -> E2eResult<()>;

    async fn current_url(&self) -> E2eResult<String>;

    async fn title(&self) -> E2eResult<String>;

    async fn maximize_window(&self) -> E2eResult<()>;

    async fn delete_all_cookies(&self) -> E2eResult<()>;

    /// All elements matching `locator`, in document order. Empty when nothing matches.
    async fn find_all(&self, locator: &Locator) -> E2eResult<Vec<Self::Element>>;

    /// First descendant of `parent` matching `locator`.
    async fn find_within(&self, parent: &Self::Element, locator: &Locator) -> E2eResult<Self::Element>;

    async fn is_displayed(&self, element: &Self::Element) -> E2eResult<bool>;

    async fn is_enabled(&self, element: &Self::Element) -> E2eResult<bool>;

    async fn text(&self, element: &Self::Element) -> E2eResult<String>;

    async fn click(&self, element: &Self::Element) -> E2eResult<()>;

    async fn clear(&self, element: &Self::Element) -> E2eResult<()>;

    async fn send_keys(&self, element: &Self::Element, text: &str) -> E2eResult<()>;

    /// Click through the page's script engine instead of a native click.
    async fn script_click(&self, element: &Self::Element) -> E2eResult<()>;

    /// PNG bytes of the current viewport.
    async fn screenshot_png(&self) -> E2eResult<Vec<u8>>;

    async fn quit(self) -> E2eResult<()>;
}

/// Creates browser sessions for a given engine
#[async_trait]
pub trait SessionLauncher: Send + Sync {
    type Session: BrowserSession;

    async fn launch(&self, kind: BrowserKind) -> E2eResult<Self::Session>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_kind_parse_is_case_insensitive() {
        assert_eq!("Chrome".parse::<BrowserKind>().unwrap(), BrowserKind::Chrome);
        assert_eq!("FIREFOX".parse::<BrowserKind>().unwrap(), BrowserKind::Firefox);
        assert_eq!("edge".parse::<BrowserKind>().unwrap(), BrowserKind::Edge);
    }

    #[test]
    fn test_browser_kind_rejects_unknown() {
        let err = "safari".parse::<BrowserKind>().unwrap_err();
        assert!(matches!(err, E2eError::UnsupportedConfiguration(ref s) if s == "safari"));
    }

    #[test]
    fn test_locator_display() {
        assert_eq!(Locator::id("search-box-input").to_string(), "id=search-box-input");
        assert_eq!(
            Locator::xpath("//li[@data-sorttype='plrty']").to_string(),
            "xpath=//li[@data-sorttype='plrty']"
        );
    }
}
