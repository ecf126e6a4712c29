//! Foreign Exchange (FX) rate system
//!
//! Historical ECB reference rates: where the table comes from, and how a
//! single-date cross-rate lookup is answered from it.
//!
//! # Components
//!
//! - **base**: Core types (RateRecord, RateTable) and the RateTableProvider trait
//! - **archive**: ZIP + CSV decoding of the ECB history file
//! - **ecb**: HTTP provider for the ECB download
//! - **cached**: TTL-gated disk cache decorator for any provider
//! - **in_memory**: Provider serving a fixed table
//! - **exploding**: Testing stub that panics on fetch
//! - **resolver**: Closest-date search and cross-rate derivation
//! - **utils**: Rate arithmetic
//!
//! # Example
//!
//! ```rust
//! use ecb_fx::data::fx::{resolve, InMemoryRateTableProvider, RateQuery, RateTableProvider};
//!
//! let provider = InMemoryRateTableProvider::from_csv(
//!     "Date,USD,CAD,\n2023-09-29,1.0594,1.4322,\n",
//! ).unwrap();
//! let table = provider.fetch_table().unwrap();
//!
//! let query = RateQuery::new("USD").targets(["EUR", "USD"]).on_str("2023-10-01").unwrap();
//! let rates = resolve(&table, &query).unwrap();
//! assert_eq!(rates["USD"], 1.0);
//! ```

pub mod archive;
pub mod base;
pub mod cached;
pub mod ecb;
pub mod exploding;
pub mod in_memory;
pub mod resolver;
pub mod utils;

pub use base::{
    normalize_code, parse_date, RateRecord, RateTable, RateTableProvider, REFERENCE_CURRENCY,
};
pub use cached::{default_cache_path, CachedRateTableProvider, DEFAULT_CACHE_TTL};
pub use ecb::{EcbRateTableProvider, ECB_HISTORY_URL};
pub use exploding::ExplodingRateTableProvider;
pub use in_memory::InMemoryRateTableProvider;
pub use resolver::{
    find_closest, resolve, resolve_detailed, RateQuery, ResolvedRates, TargetCurrencies,
    DEFAULT_WITHIN_DAYS,
};
pub use utils::cross_rate;
