//! Base FX system - rate records, the rate table and the provider trait

use crate::error::{FxError, Result};
use chrono::NaiveDate;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Currency every raw value in the ECB table is quoted against.
/// It never appears as a column and is implicitly 1.0.
pub const REFERENCE_CURRENCY: &str = "EUR";

/// Name of the date column in the ECB history file and the cache file
pub const DATE_COLUMN: &str = "Date";

/// Date format used by the source table, the cache and queries
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Normalize a caller-supplied currency code (trimmed, uppercase)
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| FxError::InvalidDate(s.to_string()))
}

/// Raw row as stored on disk: `{"Date": "2023-10-02", "USD": "1.0474", ...}`
type RawRow = BTreeMap<String, String>;

/// One day of published rates.
///
/// Values are kept as the raw strings from the source, so placeholders such
/// as `N/A` survive until a caller actually asks for that currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "RawRow", try_from = "RawRow")]
pub struct RateRecord {
    date: NaiveDate,
    rates: HashMap<String, String>,
}

impl RateRecord {
    /// Create an empty record for a date
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            rates: HashMap::new(),
        }
    }

    /// Builder-style insert, mostly for tests and in-memory tables
    pub fn with_rate(mut self, currency: &str, raw: &str) -> Self {
        self.insert(currency, raw);
        self
    }

    /// Insert or replace a raw rate. Codes are normalized.
    pub fn insert(&mut self, currency: &str, raw: &str) {
        self.rates.insert(normalize_code(currency), raw.trim().to_string());
    }

    /// Publication date
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Raw value for a currency, exactly as published
    pub fn raw_rate(&self, currency: &str) -> Option<&str> {
        self.rates.get(currency).map(String::as_str)
    }

    /// Currency codes present as columns (the reference currency excluded
    /// unless the source carried it explicitly)
    pub fn currencies(&self) -> impl Iterator<Item = &str> {
        self.rates.keys().map(String::as_str)
    }

    /// Number of currency columns
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Absolute distance in days to `on_date`
    pub fn distance_days(&self, on_date: NaiveDate) -> u64 {
        (self.date - on_date).num_days().unsigned_abs()
    }
}

impl From<RateRecord> for RawRow {
    fn from(record: RateRecord) -> Self {
        let mut row: RawRow = record.rates.into_iter().collect();
        row.insert(
            DATE_COLUMN.to_string(),
            record.date.format(DATE_FORMAT).to_string(),
        );
        row
    }
}

impl TryFrom<RawRow> for RateRecord {
    type Error = FxError;

    fn try_from(mut row: RawRow) -> Result<Self> {
        let raw_date = row
            .remove(DATE_COLUMN)
            .ok_or_else(|| FxError::SourceUnavailable(format!("Row without `{}` column", DATE_COLUMN)))?;
        let date = parse_date(&raw_date)
            .map_err(|_| FxError::SourceUnavailable(format!("Invalid row date `{}`", raw_date)))?;

        let mut record = RateRecord::new(date);
        for (currency, raw) in row {
            if currency.trim().is_empty() {
                continue;
            }
            record.insert(&currency, &raw);
        }
        Ok(record)
    }
}

impl fmt::Display for RateRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({} currencies)", self.date.format(DATE_FORMAT), self.rates.len())
    }
}

/// Historical rate table in source order.
///
/// The ECB file lists the newest day first. Nothing here sorts it: the
/// closest-date search is a linear scan and its tie-break depends on this
/// order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateTable {
    records: Vec<RateRecord>,
}

impl RateTable {
    /// Create a table from records in source order (newest first for ECB data)
    pub fn new(records: Vec<RateRecord>) -> Self {
        Self { records }
    }

    /// Append a record after the existing ones; order is kept as given
    pub fn push(&mut self, record: RateRecord) {
        self.records.push(record);
    }

    /// Number of published days
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in table order
    pub fn iter(&self) -> std::slice::Iter<'_, RateRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[RateRecord] {
        &self.records
    }

    /// Earliest and latest published dates
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.first()?.date;
        Some(self.records.iter().fold((first, first), |(lo, hi), r| {
            (lo.min(r.date), hi.max(r.date))
        }))
    }

    /// Every currency code seen in any record
    pub fn currencies(&self) -> BTreeSet<String> {
        self.records
            .iter()
            .flat_map(|r| r.currencies().map(str::to_string))
            .collect()
    }
}

impl FromIterator<RateRecord> for RateTable {
    fn from_iter<I: IntoIterator<Item = RateRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a RateTable {
    type Item = &'a RateRecord;
    type IntoIter = std::slice::Iter<'a, RateRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Trait for anything that can hand out the historical rate table
pub trait RateTableProvider: Send + Sync {
    /// Produce the full table. Fails with `FxError::SourceUnavailable` when
    /// the source cannot be retrieved or decoded.
    fn fetch_table(&self) -> Result<RateTable>;
}

impl<P: RateTableProvider + ?Sized> RateTableProvider for Box<P> {
    fn fetch_table(&self) -> Result<RateTable> {
        (**self).fetch_table()
    }
}
