use chrono::Utc;

#[cfg(feature = "api")]
use crate::error::{EcountError, Result};
#[cfg(feature = "api")]
use log::{info, warn};
#[cfg(feature = "api")]
use reqwest::Client;

/// Where the per-site CSV files are published.
pub const DEFAULT_BASE_URL: &str = "https://enterococcus.today/waf/TX/others/eCount_stat_app";

/// Build `<base-url>/<siteId>.csv`, with a `ts` cache-busting parameter when
/// a timestamp is given.
pub fn site_csv_url(base_url: &str, site_id: &str, ts_millis: Option<i64>) -> String {
    let base = base_url.trim_end_matches('/');
    match ts_millis {
        Some(ts) => format!("{}/{}.csv?ts={}", base, site_id, ts),
        None => format!("{}/{}.csv", base, site_id),
    }
}

/// URL for a fetch issued right now.
pub fn cache_busting_url(base_url: &str, site_id: &str) -> String {
    site_csv_url(base_url, site_id, Some(Utc::now().timestamp_millis()))
}

/// Reads a site's CSV over HTTP. No retry is attempted; the caller's timer
/// drives the next try.
#[cfg(feature = "api")]
#[derive(Clone)]
pub struct CsvFetcher {
    client: Client,
    base_url: String,
}

#[cfg(feature = "api")]
impl CsvFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the raw CSV body for `site_id`.
    pub async fn fetch(&self, site_id: &str) -> Result<String> {
        let url = cache_busting_url(&self.base_url, site_id);
        info!("Fetching {}", url);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("Bad response status for {}: {}", site_id, status);
            return Err(EcountError::BadStatus {
                url,
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;
        Ok(body)
    }
}
