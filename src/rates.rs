//! One-call exchange rate lookup
//!
//! Wires a rate table provider built from [`FxConfig`] to the resolver.
//! Every call fetches (or loads from cache) the table and resolves the
//! query synchronously; nothing is shared between calls except the cache
//! file.

use crate::config::FxConfig;
use crate::data::fx::{
    resolve, resolve_detailed, CachedRateTableProvider, EcbRateTableProvider, RateQuery, RateTable,
    RateTableProvider, ResolvedRates,
};
use crate::error::Result;
use std::collections::BTreeMap;

/// Exchange rate lookups against a rate table provider
pub struct ExchangeRates {
    provider: Box<dyn RateTableProvider>,
}

impl ExchangeRates {
    /// ECB download, wrapped in the disk cache unless `config.cache` is off
    pub fn from_config(config: &FxConfig) -> Result<Self> {
        config.validate()?;
        let ecb = EcbRateTableProvider::with_url(&config.source_url, config.timeout())?;

        let provider: Box<dyn RateTableProvider> = if config.cache {
            Box::new(CachedRateTableProvider::with_path(
                ecb,
                &config.cache_file,
                config.cache_ttl(),
            ))
        } else {
            Box::new(ecb)
        };

        Ok(Self { provider })
    }

    /// Create lookups against any provider (in-memory tables, custom caches)
    pub fn with_provider<P: RateTableProvider + 'static>(provider: P) -> Self {
        Self {
            provider: Box::new(provider),
        }
    }

    /// The full table as the provider currently sees it
    pub fn table(&self) -> Result<RateTable> {
        self.provider.fetch_table()
    }

    /// Rates of the query's targets relative to its base currency
    pub fn rates(&self, query: &RateQuery) -> Result<BTreeMap<String, f64>> {
        let table = self.provider.fetch_table()?;
        resolve(&table, query)
    }

    /// Like [`ExchangeRates::rates`], also telling which day the rates are from
    pub fn detailed_rates(&self, query: &RateQuery) -> Result<ResolvedRates> {
        let table = self.provider.fetch_table()?;
        resolve_detailed(&table, query)
    }
}

/// Fetch the table described by `config` and resolve `query` against it
///
/// ```no_run
/// use ecb_fx::{get_exchange_rates, FxConfig};
///
/// let config = FxConfig::default();
/// let query = config.query("USD").targets(["EUR", "CAD", "USD"]).on_str("2023-10-01").unwrap();
/// let rates = get_exchange_rates(&config, &query).unwrap();
/// println!("{:?}", rates);
/// ```
pub fn get_exchange_rates(config: &FxConfig, query: &RateQuery) -> Result<BTreeMap<String, f64>> {
    ExchangeRates::from_config(config)?.rates(query)
}
