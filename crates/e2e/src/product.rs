//! Product records extracted from result listings

use serde::{Deserialize, Serialize};

use crate::error::{E2eError, E2eResult};

/// A product read from the listing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// 1-based position among the matching products
    pub rank: usize,
    pub name: String,
    /// Price with currency symbols and separators stripped
    pub price: u64,
}

/// Inclusive price bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: u64,
    pub max: u64,
}

impl PriceRange {
    pub fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, price: u64) -> bool {
        price >= self.min && price <= self.max
    }
}

/// Keep only the digits of `text` and parse them.
///
/// `"Rs.  1,299"` parses to `1299`. Text without any digit is an error
/// rather than zero, as is a digit run above `u64::MAX` (20 digits).
pub fn parse_price(text: &str) -> E2eResult<u64> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Err(E2eError::PriceParse(text.to_string()));
    }
    digits
        .parse()
        .map_err(|_| E2eError::PriceParse(text.to_string()))
}
