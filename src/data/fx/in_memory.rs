//! In-memory rate table provider
//!
//! Serves a table that is already in memory, for tests, offline use and
//! callers that obtain the ECB file some other way.

use super::archive::parse_csv_table;
use super::base::{RateRecord, RateTable, RateTableProvider};
use crate::error::Result;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Fixed rate table
///
/// # Example
/// ```
/// use ecb_fx::data::fx::{InMemoryRateTableProvider, RateTableProvider};
///
/// let provider = InMemoryRateTableProvider::from_csv(
///     "Date,USD,CAD,\n2023-10-02,1.0474,1.4328,\n",
/// ).unwrap();
///
/// let table = provider.fetch_table().unwrap();
/// assert_eq!(table.len(), 1);
/// assert_eq!(provider.fetch_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryRateTableProvider {
    table: RateTable,
    /// Number of `fetch_table` calls served
    fetches: AtomicUsize,
}

impl InMemoryRateTableProvider {
    pub fn new(table: RateTable) -> Self {
        Self {
            table,
            fetches: AtomicUsize::new(0),
        }
    }

    /// Build from ECB-format CSV text
    pub fn from_csv(csv_data: &str) -> Result<Self> {
        Ok(Self::new(parse_csv_table(csv_data.as_bytes())?))
    }

    /// Append a record (kept in insertion order)
    pub fn add_record(&mut self, record: RateRecord) {
        self.table.push(record);
    }

    pub fn table(&self) -> &RateTable {
        &self.table
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }
}

impl From<RateTable> for InMemoryRateTableProvider {
    fn from(table: RateTable) -> Self {
        Self::new(table)
    }
}

impl RateTableProvider for InMemoryRateTableProvider {
    fn fetch_table(&self) -> Result<RateTable> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        Ok(self.table.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_add_record_keeps_order() {
        let mut provider = InMemoryRateTableProvider::default();
        provider.add_record(RateRecord::new(NaiveDate::from_ymd_opt(2023, 10, 2).unwrap()));
        provider.add_record(RateRecord::new(NaiveDate::from_ymd_opt(2023, 9, 29).unwrap()));

        let table = provider.fetch_table().unwrap();
        let dates: Vec<_> = table.iter().map(|r| r.date().to_string()).collect();
        assert_eq!(dates, vec!["2023-10-02", "2023-09-29"]);
    }

    #[test]
    fn test_fetch_count() {
        let provider = InMemoryRateTableProvider::new(RateTable::default());
        assert_eq!(provider.fetch_count(), 0);
        provider.fetch_table().unwrap();
        provider.fetch_table().unwrap();
        assert_eq!(provider.fetch_count(), 2);
    }

    #[test]
    fn test_from_csv_rejects_garbage() {
        assert!(InMemoryRateTableProvider::from_csv("Date,USD\nnot-a-date,1.0\n").is_err());
    }
}
