//! European Central Bank history archive provider
//!
//! Downloads `eurofxref-hist.zip` with a single blocking GET. There is no
//! retry: a failed request surfaces as `FxError::SourceUnavailable`.

use super::archive::decode_archive;
use super::base::{RateTable, RateTableProvider};
use crate::error::{FxError, Result};
use reqwest::blocking::Client;
use std::time::Duration;

/// Location of the full ECB reference rate history
pub const ECB_HISTORY_URL: &str = "https://www.ecb.europa.eu/stats/eurofxref/eurofxref-hist.zip";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Rate table provider backed by the ECB download
pub struct EcbRateTableProvider {
    url: String,
    client: Client,
}

impl EcbRateTableProvider {
    /// Provider for the official ECB URL
    pub fn new() -> Result<Self> {
        Self::with_url(ECB_HISTORY_URL, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Provider for a mirror or a test server
    pub fn with_url(url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FxError::SourceUnavailable(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            url: url.to_string(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn download(&self) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| FxError::SourceUnavailable(format!("HTTP request failed: {}", e)))?;

        let bytes = response
            .bytes()
            .map_err(|e| FxError::SourceUnavailable(format!("Failed to read response body: {}", e)))?;
        Ok(bytes.to_vec())
    }
}

impl RateTableProvider for EcbRateTableProvider {
    fn fetch_table(&self) -> Result<RateTable> {
        log::debug!("Loading from source url: {}", self.url);
        let zip_data = self.download()?;
        log::info!("Downloaded {} bytes from {}", zip_data.len(), self.url);
        decode_archive(&zip_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_creation() {
        let provider = EcbRateTableProvider::new().unwrap();
        assert_eq!(provider.url(), ECB_HISTORY_URL);
    }

    #[test]
    fn test_unreachable_source() {
        // Port 9 (discard) on localhost refuses connections on test machines
        let provider =
            EcbRateTableProvider::with_url("http://127.0.0.1:9/eurofxref-hist.zip", Duration::from_secs(2))
                .unwrap();
        assert!(matches!(
            provider.fetch_table(),
            Err(FxError::SourceUnavailable(_))
        ));
    }
}
