//! Best-effort diagnostic screenshots

use std::path::PathBuf;

use chrono::{DateTime, Local};
use tracing::{info, warn};

use crate::browser::BrowserSession;

/// Timestamp layout used in screenshot file names
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H%M%S";

/// Writes `<label>_<timestamp>.png` files into one directory
#[derive(Debug, Clone)]
pub struct ScreenshotWriter {
    dir: PathBuf,
}

impl ScreenshotWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn file_name(label: &str, at: DateTime<Local>) -> String {
        format!("{}_{}.png", label, at.format(TIMESTAMP_FORMAT))
    }

    /// Capture the viewport and write it to disk.
    ///
    /// Failures are logged and reported as `None`; a screenshot never fails a step.
    pub async fn capture<S: BrowserSession>(&self, session: &S, label: &str) -> Option<PathBuf> {
        let png = match session.screenshot_png().await {
            Ok(png) => png,
            Err(e) => {
                warn!("Failed to capture screenshot '{}': {}", label, e);
                return None;
            }
        };
        self.write(label, &png)
    }

    /// Write already-captured PNG bytes.
    pub fn write(&self, label: &str, png: &[u8]) -> Option<PathBuf> {
        let path = self.dir.join(Self::file_name(label, Local::now()));

        let result = std::fs::create_dir_all(&self.dir).and_then(|_| std::fs::write(&path, png));
        match result {
            Ok(()) => {
                info!("Screenshot saved: {}", path.display());
                Some(path)
            }
            Err(e) => {
                warn!("Failed to write screenshot {}: {}", path.display(), e);
                None
            }
        }
    }
}
