//! ECB archive decoding - ZIP container and the CSV inside it
//!
//! The history file looks like:
//!
//! ```text
//! Date,USD,JPY,BGN,CYP,...,
//! 2023-10-02,1.0474,156.5,1.9558,N/A,...,
//! ```
//!
//! The trailing comma yields an unnamed last column, which is ignored.
//! Values stay raw strings so `N/A` placeholders reach the resolver intact.

use super::base::{parse_date, RateRecord, RateTable, DATE_COLUMN};
use crate::error::{FxError, Result};
use csv::{ReaderBuilder, Trim};
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// Extract the one file the archive is expected to hold
pub fn read_single_entry(zip_data: &[u8]) -> Result<Vec<u8>> {
    let mut archive = ZipArchive::new(Cursor::new(zip_data))
        .map_err(|e| FxError::SourceUnavailable(format!("Failed to read ZIP: {}", e)))?;

    let mut files = Vec::new();
    for i in 0..archive.len() {
        let file = archive
            .by_index(i)
            .map_err(|e| FxError::SourceUnavailable(format!("Failed to access file {}: {}", i, e)))?;
        if !file.is_dir() {
            files.push(i);
        }
    }

    let index = match files.as_slice() {
        [index] => *index,
        _ => {
            return Err(FxError::SourceUnavailable(format!(
                "Expected exactly one file in archive, found {}",
                files.len()
            )))
        }
    };

    let mut file = archive
        .by_index(index)
        .map_err(|e| FxError::SourceUnavailable(format!("Failed to access file {}: {}", index, e)))?;
    log::debug!("Extracting `{}` ({} bytes)", file.name(), file.size());

    let mut contents = Vec::with_capacity(file.size() as usize);
    file.read_to_end(&mut contents)
        .map_err(|e| FxError::SourceUnavailable(format!("Failed to decompress {}: {}", file.name(), e)))?;
    Ok(contents)
}

/// Parse ECB-format CSV (header row `Date,<CUR>,...`) into a rate table
pub fn parse_csv_table<R: Read>(reader: R) -> Result<RateTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| FxError::SourceUnavailable(format!("Failed to read headers: {}", e)))?
        .clone();

    let date_idx = headers
        .iter()
        .position(|h| h == DATE_COLUMN)
        .ok_or_else(|| FxError::SourceUnavailable(format!("No {} column", DATE_COLUMN)))?;

    let mut table = RateTable::default();
    for (line, result) in rdr.records().enumerate() {
        let row = result
            .map_err(|e| FxError::SourceUnavailable(format!("Failed to read record: {}", e)))?;

        let raw_date = row.get(date_idx).unwrap_or_default();
        let date = parse_date(raw_date).map_err(|_| {
            FxError::SourceUnavailable(format!("Invalid date `{}` at row {}", raw_date, line + 2))
        })?;

        let mut record = RateRecord::new(date);
        for (idx, (currency, raw)) in headers.iter().zip(row.iter()).enumerate() {
            if idx == date_idx || currency.is_empty() {
                continue;
            }
            record.insert(currency, raw);
        }
        table.push(record);
    }

    log::debug!("Parsed {} rate records", table.len());
    Ok(table)
}

/// Decode a downloaded archive into a rate table
pub fn decode_archive(zip_data: &[u8]) -> Result<RateTable> {
    let csv_data = read_single_entry(zip_data)?;
    parse_csv_table(csv_data.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::{CompressionMethod, ZipWriter};

    const CSV: &str = "Date,USD,CAD,ISK,\n\
                       2023-10-02,1.0474,1.4328,N/A,\n\
                       2023-09-29,1.0594,1.4322,N/A,\n";

    fn zip_of(files: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        for (name, contents) in files {
            writer.start_file(*name, options).unwrap();
            writer.write_all(contents.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_parse_csv_table() {
        let table = parse_csv_table(CSV.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);

        let first = &table.records()[0];
        assert_eq!(first.date(), NaiveDate::from_ymd_opt(2023, 10, 2).unwrap());
        assert_eq!(first.raw_rate("USD"), Some("1.0474"));
        assert_eq!(first.raw_rate("ISK"), Some("N/A"));
        assert_eq!(first.raw_rate(""), None);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let csv = "Date, USD, CAD\n2023-10-02, 1.0474, 1.4328\n";
        let table = parse_csv_table(csv.as_bytes()).unwrap();
        assert_eq!(table.records()[0].raw_rate("CAD"), Some("1.4328"));
    }

    #[test]
    fn test_parse_requires_date_column() {
        let csv = "Day,USD\n2023-10-02,1.0474\n";
        assert!(matches!(
            parse_csv_table(csv.as_bytes()),
            Err(FxError::SourceUnavailable(_))
        ));
    }

    #[test]
    fn test_parse_rejects_bad_date() {
        let csv = "Date,USD\nyesterday,1.0474\n";
        let err = parse_csv_table(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("yesterday"));
    }

    #[test]
    fn test_decode_archive() {
        let data = zip_of(&[("eurofxref-hist.csv", CSV)]);
        let table = decode_archive(&data).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_archive_with_two_files() {
        let data = zip_of(&[("a.csv", CSV), ("b.csv", CSV)]);
        assert!(matches!(
            read_single_entry(&data),
            Err(FxError::SourceUnavailable(_))
        ));
    }

    #[test]
    fn test_not_a_zip() {
        assert!(matches!(
            decode_archive(b"<html>maintenance</html>"),
            Err(FxError::SourceUnavailable(_))
        ));
    }
}
