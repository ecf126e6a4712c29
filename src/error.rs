//! Error types for ecb_fx

use chrono::NaiveDate;
use std::fmt;
use thiserror::Error;

/// Why a single currency could not be converted
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionFailure {
    /// The record holds a placeholder (e.g. `N/A`) instead of a decimal
    NotNumeric(String),
    /// The currency code is not a column of the matched record
    Missing,
    /// The base currency rate is zero, so no ratio exists
    ZeroBase,
}

impl fmt::Display for ConversionFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConversionFailure::NotNumeric(raw) => write!(f, "value `{}` is not numeric", raw),
            ConversionFailure::Missing => write!(f, "no rate in the matched record"),
            ConversionFailure::ZeroBase => write!(f, "base currency rate is zero"),
        }
    }
}

/// Main error type for ecb_fx
#[derive(Error, Debug)]
pub enum FxError {
    /// Fetching, unpacking or parsing the rate archive failed
    #[error("Rate source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("No exchange rates found for {base} on {on_date} within {within_days} days")]
    NoRatesWithinTolerance {
        base: String,
        on_date: NaiveDate,
        within_days: u32,
    },

    #[error("Could not convert `{currency}` on {on_date}: {reason}")]
    RateConversion {
        currency: String,
        on_date: NaiveDate,
        reason: ConversionFailure,
    },

    /// Only raised when the query asks for base currency validation
    #[error("Base currency `{base}` has no rate on {on_date}")]
    UnknownBaseCurrency { base: String, on_date: NaiveDate },

    #[error("Invalid date `{0}`, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl FxError {
    /// Whether the error is a per-currency conversion failure
    pub fn is_conversion(&self) -> bool {
        matches!(self, FxError::RateConversion { .. })
    }
}

/// Result type alias for ecb_fx operations
pub type Result<T> = std::result::Result<T, FxError>;
