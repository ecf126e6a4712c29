//! Integration tests for the FX system
//!
//! Runs queries end to end over ECB-format data: archive decoding, the disk
//! cache and the resolver together.

use approx::assert_relative_eq;
use chrono::NaiveDate;
use ecb_fx::data::fx::{
    archive::decode_archive, resolve, CachedRateTableProvider, ExplodingRateTableProvider,
    InMemoryRateTableProvider, RateQuery, RateRecord, RateTable, RateTableProvider,
    DEFAULT_CACHE_TTL,
};
use ecb_fx::{ExchangeRates, FxError};
use std::io::{Cursor, Write};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Rates around 2023-10-01, newest first like the ECB file
const HISTORY_CSV: &str = "\
Date,USD,JPY,CAD,ISK,HRK,
2023-10-03,1.0485,156.6,1.4382,145.9,N/A,
2023-10-02,1.0474,156.34,1.4328,145.3,N/A,
2023-10-01,1.053,157.87,1.4335,144.9,N/A,
2023-09-29,1.0594,158.0,1.4322,144.5,N/A,
2023-09-28,1.0517,157.05,1.4229,144.1,N/A,
";

fn history() -> RateTable {
    InMemoryRateTableProvider::from_csv(HISTORY_CSV)
        .unwrap()
        .table()
        .clone()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn zipped(csv: &str) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    writer.start_file("eurofxref-hist.csv", options).unwrap();
    writer.write_all(csv.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

#[test]
fn test_usd_based_rates_on_2023_10_01() {
    let query = RateQuery::new("USD")
        .targets(["EUR", "CAD", "USD"])
        .on_str("2023-10-01")
        .unwrap();

    let rates = resolve(&history(), &query).unwrap();

    assert_eq!(rates.len(), 3);
    assert_relative_eq!(rates["EUR"], 0.9496676163342831, max_relative = 1e-15);
    assert_relative_eq!(rates["CAD"], 1.3613485280151947, max_relative = 1e-15);
    assert_eq!(rates["USD"], 1.0);
}

#[test]
fn test_eur_based_rates_on_2023_10_01() {
    let query = RateQuery::new("EUR")
        .targets(["EUR", "CAD", "USD"])
        .on_str("2023-10-01")
        .unwrap();

    let rates = resolve(&history(), &query).unwrap();

    assert_eq!(rates["EUR"], 1.0);
    assert_eq!(rates["CAD"], 1.4335);
    assert_eq!(rates["USD"], 1.053);
}

#[test]
fn test_all_currencies_skip_placeholders() {
    let query = RateQuery::new("CAD").on(date(2023, 10, 2));
    let rates = resolve(&history(), &query).unwrap();

    let keys: Vec<&str> = rates.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["CAD", "ISK", "JPY", "USD"]);
    assert_eq!(rates["CAD"], 1.0);
}

#[test]
fn test_tolerant_mode_omits_unknown_currency() {
    let query = RateQuery::new("USD")
        .targets(["USD", "XXX"])
        .on(date(2023, 10, 2));
    let rates = resolve(&history(), &query).unwrap();

    assert_eq!(rates.len(), 1);
    assert_eq!(rates["USD"], 1.0);
}

#[test]
fn test_strict_mode_names_unknown_currency() {
    let query = RateQuery::new("USD")
        .targets(["USD", "XXX"])
        .on(date(2023, 10, 2))
        .strict();

    let err = resolve(&history(), &query).unwrap_err();
    assert!(err.is_conversion());
    assert!(err.to_string().contains("XXX"));
}

#[test]
fn test_weekend_uses_closest_day() {
    // 2023-09-30 is a Saturday: 2023-10-01 and 2023-09-29 are both one day
    // away, and 2023-10-01 comes first in the (newest first) table
    let query = RateQuery::new("EUR").targets(["USD"]).on(date(2023, 9, 30));
    let rates = resolve(&history(), &query).unwrap();
    assert_eq!(rates["USD"], 1.053);
}

#[test]
fn test_far_date_fails() {
    let query = RateQuery::new("USD").on(date(2024, 1, 1));
    match resolve(&history(), &query) {
        Err(FxError::NoRatesWithinTolerance { base, on_date, within_days }) => {
            assert_eq!(base, "USD");
            assert_eq!(on_date, date(2024, 1, 1));
            assert_eq!(within_days, 4);
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_archive_to_rates() {
    let table = decode_archive(&zipped(HISTORY_CSV)).unwrap();
    assert_eq!(table, history());

    let query = RateQuery::new("JPY").targets(["USD"]).on(date(2023, 9, 28));
    let rates = resolve(&table, &query).unwrap();
    assert_relative_eq!(rates["USD"], 1.0517 / 157.05);
}

#[test]
fn test_cached_table_answers_like_the_source() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("exchange_rates.json");

    let query = RateQuery::new("USD")
        .targets(["EUR", "CAD", "ISK"])
        .on(date(2023, 10, 1));

    let fresh = CachedRateTableProvider::with_path(
        InMemoryRateTableProvider::new(history()),
        &path,
        DEFAULT_CACHE_TTL,
    );
    let from_source = ExchangeRates::with_provider(fresh).rates(&query).unwrap();

    // Second provider must be served entirely from disk
    let cached = CachedRateTableProvider::with_path(ExplodingRateTableProvider::new(), &path, DEFAULT_CACHE_TTL);
    let from_cache = ExchangeRates::with_provider(cached).rates(&query).unwrap();

    assert_eq!(from_source, from_cache);
}

#[test]
fn test_cache_preserves_order_for_tie_break() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("exchange_rates.json");

    let table: RateTable = vec![
        RateRecord::new(date(2023, 10, 1)).with_rate("USD", "1.1"),
        RateRecord::new(date(2023, 9, 29)).with_rate("USD", "1.2"),
    ]
    .into_iter()
    .collect();

    let provider = CachedRateTableProvider::with_path(
        InMemoryRateTableProvider::new(table.clone()),
        &path,
        DEFAULT_CACHE_TTL,
    );
    provider.fetch_table().unwrap();
    let reloaded = provider.fetch_table().unwrap();

    assert_eq!(reloaded, table);
    assert_eq!(provider.inner().fetch_count(), 1);
}
