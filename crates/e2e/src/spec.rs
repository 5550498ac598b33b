//! Declarative YAML scenario specification

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::browser::Locator;
use crate::error::{E2eError, E2eResult};

/// An ordered list of named steps against one storefront
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSpec {
    /// Unique name for this scenario
    pub name: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Locators for the storefront under test
    #[serde(default)]
    pub site: SiteSelectors,

    /// Steps to execute in order; each depends on the previous one passing
    pub steps: Vec<ScenarioStep>,
}

/// A named step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioStep {
    pub name: String,

    #[serde(flatten)]
    pub action: StepAction,
}

/// What a step does
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum StepAction {
    /// Load the homepage and check where the browser ended up
    OpenHomepage {
        url: String,
        expect_url_contains: String,
    },

    /// Type a query into the search box and submit it
    Search { query: String },

    /// Switch the result ordering to popularity
    SortByPopularity,

    /// Apply the price filter
    FilterByPrice { min: u64, max: u64 },

    /// Read the first matching products from the listing
    ExtractTopProducts {
        count: usize,
        min_price: u64,
        max_price: u64,
    },
}

/// Storefront locators used by the step actions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSelectors {
    pub search_box: Locator,
    pub sort_trigger: Locator,
    pub sort_options: Locator,
    pub sort_popularity: Locator,
    pub price_min: Locator,
    pub price_max: Locator,
    pub price_apply: Locator,
    pub product_listing: Locator,
    pub product_title: Locator,
    pub product_price: Locator,
}

impl Default for SiteSelectors {
    fn default() -> Self {
        Self {
            search_box: Locator::id("search-box-input"),
            sort_trigger: Locator::css("div.sort-drop"),
            sort_options: Locator::css("ul.sort-value"),
            sort_popularity: Locator::xpath("//li[@data-sorttype='plrty']"),
            price_min: Locator::name("fromVal"),
            price_max: Locator::name("toVal"),
            price_apply: Locator::xpath("//div[contains(@class,'price-go-arrow')]"),
            product_listing: Locator::css("div.product-tuple-listing"),
            product_title: Locator::css("p.product-title"),
            product_price: Locator::css("span.product-price"),
        }
    }
}

impl ScenarioStep {
    pub fn new(name: impl Into<String>, action: StepAction) -> Self {
        Self {
            name: name.into(),
            action,
        }
    }
}

impl Default for ScenarioSpec {
    /// The storefront gadget search scenario
    fn default() -> Self {
        Self {
            name: "snapdeal-gadgets".to_string(),
            description: "Search Bluetooth headphones, sort by popularity, filter by price and list the top five"
                .to_string(),
            site: SiteSelectors::default(),
            steps: vec![
                ScenarioStep::new(
                    "open_homepage",
                    StepAction::OpenHomepage {
                        url: "https://www.snapdeal.com/".to_string(),
                        expect_url_contains: "snapdeal.com".to_string(),
                    },
                ),
                ScenarioStep::new(
                    "search_product",
                    StepAction::Search {
                        query: "Bluetooth headphone".to_string(),
                    },
                ),
                ScenarioStep::new("sort_results", StepAction::SortByPopularity),
                ScenarioStep::new("filter_by_price", StepAction::FilterByPrice { min: 700, max: 1400 }),
                ScenarioStep::new(
                    "print_top_products",
                    StepAction::ExtractTopProducts {
                        count: 5,
                        min_price: 700,
                        max_price: 1400,
                    },
                ),
            ],
        }
    }
}

impl ScenarioSpec {
    /// Parse a scenario from YAML string
    pub fn from_yaml(yaml: &str) -> E2eResult<Self> {
        let spec: Self = serde_yaml::from_str(yaml)?;
        spec.validate()?;
        Ok(spec)
    }

    /// Parse a scenario from a YAML file
    pub fn from_file(path: &Path) -> E2eResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn to_yaml(&self) -> E2eResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject specs whose steps could never pass
    pub fn validate(&self) -> E2eResult<()> {
        if self.steps.is_empty() {
            return Err(E2eError::Config(format!("scenario '{}' has no steps", self.name)));
        }
        for step in &self.steps {
            match &step.action {
                StepAction::FilterByPrice { min, max } if min > max => {
                    return Err(E2eError::Config(format!(
                        "step '{}': min price {} exceeds max price {}",
                        step.name, min, max
                    )));
                }
                StepAction::ExtractTopProducts { min_price, max_price, .. } if min_price > max_price => {
                    return Err(E2eError::Config(format!(
                        "step '{}': min price {} exceeds max price {}",
                        step.name, min_price, max_price
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }
}
