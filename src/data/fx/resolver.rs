//! Rate resolver - closest-date search and cross-rate derivation
//!
//! Given a [`RateTable`], finds the record nearest to the requested date and
//! expresses the requested currencies relative to a base currency.
//!
//! # Example
//! ```
//! use ecb_fx::data::fx::{resolve, RateQuery, RateRecord, RateTable};
//! use chrono::NaiveDate;
//!
//! let table: RateTable = vec![
//!     RateRecord::new(NaiveDate::from_ymd_opt(2023, 9, 29).unwrap())
//!         .with_rate("USD", "1.0594")
//!         .with_rate("CAD", "1.4322"),
//! ]
//! .into_iter()
//! .collect();
//!
//! // 2023-10-01 is a Sunday, Friday's rates are two days away
//! let query = RateQuery::new("EUR").targets(["USD"]).on_str("2023-10-01").unwrap();
//! let rates = resolve(&table, &query).unwrap();
//! assert_eq!(rates["USD"], 1.0594);
//! ```

use super::base::{normalize_code, parse_date, RateRecord, RateTable, REFERENCE_CURRENCY};
use super::utils::cross_rate;
use crate::error::{ConversionFailure, FxError, Result};
use chrono::{Local, NaiveDate};
use std::collections::BTreeMap;

/// Default tolerance. Four days covers the Easter closing of TARGET2,
/// the longest stretch without published rates.
pub const DEFAULT_WITHIN_DAYS: u32 = 4;

/// Which currencies a query asks for
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TargetCurrencies {
    /// Every currency column of the matched record
    #[default]
    All,
    /// An explicit list, resolved in the given order
    Only(Vec<String>),
}

impl TargetCurrencies {
    fn for_record(&self, record: &RateRecord) -> Vec<String> {
        match self {
            TargetCurrencies::All => {
                let mut all: Vec<String> = record.currencies().map(str::to_string).collect();
                all.sort();
                all
            }
            TargetCurrencies::Only(list) => list.clone(),
        }
    }
}

/// Parameters of a single rate lookup
#[derive(Debug, Clone, PartialEq)]
pub struct RateQuery {
    pub base_currency: String,
    pub targets: TargetCurrencies,
    /// `None` means today (local calendar date)
    pub on_date: Option<NaiveDate>,
    /// Exclusive: a record exactly this many days away is rejected
    pub within_days: u32,
    /// Skip currencies that cannot be converted instead of failing
    pub continue_on_error: bool,
    /// Fail with `UnknownBaseCurrency` when the base has no usable rate,
    /// instead of letting every target fail on the shared denominator
    pub require_base: bool,
}

impl RateQuery {
    /// Create a query for every currency, today, with the default tolerance
    /// in tolerant mode
    pub fn new(base_currency: &str) -> Self {
        Self {
            base_currency: normalize_code(base_currency),
            targets: TargetCurrencies::All,
            on_date: None,
            within_days: DEFAULT_WITHIN_DAYS,
            continue_on_error: true,
            require_base: false,
        }
    }

    /// Restrict the result to these currencies
    pub fn targets<I, S>(mut self, currencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.targets = TargetCurrencies::Only(
            currencies
                .into_iter()
                .map(|c| normalize_code(c.as_ref()))
                .collect(),
        );
        self
    }

    /// Look up rates for this date instead of today
    pub fn on(mut self, date: NaiveDate) -> Self {
        self.on_date = Some(date);
        self
    }

    /// Same as [`RateQuery::on`] for a `YYYY-MM-DD` string
    pub fn on_str(self, date: &str) -> Result<Self> {
        Ok(self.on(parse_date(date)?))
    }

    /// Set the tolerance window in days (exclusive)
    pub fn within_days(mut self, days: u32) -> Self {
        self.within_days = days;
        self
    }

    /// Skip (`true`) or fail on (`false`) currencies that cannot be converted
    pub fn continue_on_error(mut self, yes: bool) -> Self {
        self.continue_on_error = yes;
        self
    }

    /// Shorthand for `continue_on_error(false)`
    pub fn strict(self) -> Self {
        self.continue_on_error(false)
    }

    /// Check the base currency before deriving any rate
    pub fn require_base(mut self, yes: bool) -> Self {
        self.require_base = yes;
        self
    }

    /// The requested date, or today when none was given
    pub fn effective_date(&self) -> NaiveDate {
        self.on_date.unwrap_or_else(|| Local::now().date_naive())
    }
}

/// Outcome of a lookup, with the date the rates were actually published
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRates {
    /// Date the caller asked for (today if none was given)
    pub requested: NaiveDate,
    /// Date of the record the rates come from
    pub matched: NaiveDate,
    pub rates: BTreeMap<String, f64>,
}

/// Find the record closest to `on_date`.
///
/// An exact match ends the scan. Otherwise a record only replaces the current
/// best when it is strictly closer, so among equidistant records the one
/// appearing first in table order wins.
pub fn find_closest(table: &RateTable, on_date: NaiveDate) -> Option<(&RateRecord, u64)> {
    let mut best: Option<(&RateRecord, u64)> = None;

    for record in table {
        let distance = record.distance_days(on_date);
        if distance == 0 {
            return Some((record, 0));
        }
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((record, distance));
        }
    }

    best
}

/// Rate of `currency` against the reference currency in `record`.
/// The reference currency itself is always 1.0, whatever the source says.
fn reference_rate(record: &RateRecord, currency: &str) -> std::result::Result<f64, ConversionFailure> {
    if currency == REFERENCE_CURRENCY {
        return Ok(1.0);
    }
    let raw = record.raw_rate(currency).ok_or(ConversionFailure::Missing)?;
    raw.parse::<f64>()
        .map_err(|_| ConversionFailure::NotNumeric(raw.to_string()))
}

fn derive_rate(
    record: &RateRecord,
    currency: &str,
    base: &str,
) -> std::result::Result<f64, ConversionFailure> {
    let quote = reference_rate(record, currency)?;
    let denominator = reference_rate(record, base)?;
    cross_rate(quote, denominator).ok_or(ConversionFailure::ZeroBase)
}

/// Resolve `query` against `table`.
///
/// Returns one entry per target currency that could be derived. In tolerant
/// mode (`continue_on_error`) currencies that fail are left out and logged at
/// debug level; in strict mode the first failure aborts the whole lookup.
pub fn resolve(table: &RateTable, query: &RateQuery) -> Result<BTreeMap<String, f64>> {
    resolve_detailed(table, query).map(|resolved| resolved.rates)
}

/// Same as [`resolve`], also reporting the requested and matched dates
pub fn resolve_detailed(table: &RateTable, query: &RateQuery) -> Result<ResolvedRates> {
    let on_date = query.effective_date();
    let base = query.base_currency.as_str();

    let record = match find_closest(table, on_date) {
        Some((record, distance)) if distance < u64::from(query.within_days) => record,
        _ => {
            return Err(FxError::NoRatesWithinTolerance {
                base: base.to_string(),
                on_date,
                within_days: query.within_days,
            })
        }
    };

    if record.date() != on_date {
        log::debug!("No rates published on {}, using {}", on_date, record.date());
    }

    if query.require_base {
        if let Err(reason) = reference_rate(record, base) {
            log::debug!("Base currency `{}` unusable on {}: {}", base, record.date(), reason);
            return Err(FxError::UnknownBaseCurrency {
                base: base.to_string(),
                on_date: record.date(),
            });
        }
    }

    let mut rates = BTreeMap::new();
    for currency in query.targets.for_record(record) {
        match derive_rate(record, &currency, base) {
            Ok(rate) => {
                rates.insert(currency, rate);
            }
            Err(reason) => {
                log::debug!(
                    "Could not convert `{}` against `{}` on {}: {}",
                    currency,
                    base,
                    record.date(),
                    reason
                );
                if !query.continue_on_error {
                    return Err(FxError::RateConversion {
                        currency,
                        on_date: record.date(),
                        reason,
                    });
                }
            }
        }
    }

    Ok(ResolvedRates {
        requested: on_date,
        matched: record.date(),
        rates,
    })
}
