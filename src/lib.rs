//! # ecb_fx
//!
//! Historical exchange rates from the European Central Bank reference rate
//! archive.
//!
//! The full history is downloaded as a ZIP, optionally cached on disk for a
//! day, and searched for the published day closest to the requested date.
//! Rates are then expressed relative to any base currency (cross-rates via
//! EUR, the ECB's reference currency).
//!
//! ## Example
//!
//! ```rust,no_run
//! use ecb_fx::prelude::*;
//!
//! let config = FxConfig::default();
//! let query = config
//!     .query("USD")
//!     .targets(["EUR", "CAD", "USD"])
//!     .on_str("2023-10-01")
//!     .unwrap();
//!
//! let rates = get_exchange_rates(&config, &query).unwrap();
//! // {"CAD": 1.3613485280151947, "EUR": 0.9496676163342831, "USD": 1.0}
//! println!("{:?}", rates);
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod rates;

pub use config::FxConfig;
pub use error::{FxError, Result};
pub use rates::{get_exchange_rates, ExchangeRates};

pub mod prelude {
    //! Commonly used types and traits
    pub use crate::config::FxConfig;
    pub use crate::data::fx::{
        resolve, CachedRateTableProvider, EcbRateTableProvider, InMemoryRateTableProvider,
        RateQuery, RateRecord, RateTable, RateTableProvider, TargetCurrencies,
    };
    pub use crate::error::{ConversionFailure, FxError, Result};
    pub use crate::rates::{get_exchange_rates, ExchangeRates};
}
