//! Exploding rate table provider - testing stub
//!
//! Panics on any fetch. Wrap it in a cache to prove a fresh cache file is
//! served without touching the network, or hand it to code that should
//! never need rates at all.

use super::base::{RateTable, RateTableProvider};
use crate::error::Result;

/// Exploding rate table provider
///
/// # Example
/// ```should_panic
/// use ecb_fx::data::fx::{ExplodingRateTableProvider, RateTableProvider};
///
/// let provider = ExplodingRateTableProvider::new();
///
/// // This will panic!
/// provider.fetch_table().unwrap();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplodingRateTableProvider {
    /// Custom panic message
    message: Option<&'static str>,
}

impl ExplodingRateTableProvider {
    pub fn new() -> Self {
        Self { message: None }
    }

    pub fn with_message(message: &'static str) -> Self {
        Self {
            message: Some(message),
        }
    }

    fn panic_message(&self) -> &'static str {
        self.message
            .unwrap_or("Rate table fetch not allowed! The table should have come from the cache.")
    }
}

impl RateTableProvider for ExplodingRateTableProvider {
    fn fetch_table(&self) -> Result<RateTable> {
        panic!("{}", self.panic_message());
    }
}
