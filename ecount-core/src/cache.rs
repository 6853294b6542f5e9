//! Last-fetch-date bookkeeping, one entry per site.
//!
//! The stored date is informational only; it never decides whether a fetch
//! happens.

use crate::error::Result;
use crate::row::DATE_FORMAT;
use chrono::NaiveDate;
use log::warn;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

/// Namespaced key under which a site's last fetch date is stored.
pub fn cache_key(site_id: &str) -> String {
    format!("lastFetchDate-{}", site_id)
}

/// A string key-value store for last fetch dates.
pub trait LastFetchCache {
    fn get_raw(&self, key: &str) -> Result<Option<String>>;
    fn set_raw(&mut self, key: &str, value: &str) -> Result<()>;

    /// Last recorded fetch date for the site. Unparseable entries read as `None`.
    fn last_fetch_date(&self, site_id: &str) -> Result<Option<NaiveDate>> {
        let raw = self.get_raw(&cache_key(site_id))?;
        Ok(raw.and_then(|s| match NaiveDate::parse_from_str(&s, DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(_) => {
                warn!("Ignoring malformed cache entry for {}: {}", site_id, s);
                None
            }
        }))
    }

    fn record_fetch(&mut self, site_id: &str, date: NaiveDate) -> Result<()> {
        let value = date.format(DATE_FORMAT).to_string();
        self.set_raw(&cache_key(site_id), &value)
    }
}

/// Process-local cache, used in tests and one-shot commands.
#[derive(Debug, Default, Clone)]
pub struct MemoryCache {
    entries: HashMap<String, String>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LastFetchCache for MemoryCache {
    fn get_raw(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_raw(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A JSON object on disk (`{"lastFetchDate-GAL001": "2024-05-01"}`),
/// rewritten in full on every update.
#[derive(Debug, Clone)]
pub struct FileCache {
    path: PathBuf,
}

impl FileCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let text = std::fs::read_to_string(&self.path)?;
        if text.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&text)?)
    }
}

impl LastFetchCache for FileCache {
    fn get_raw(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.get(key).cloned())
    }

    fn set_raw(&mut self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        std::fs::write(&self.path, serde_json::to_string_pretty(&entries)?)?;
        Ok(())
    }
}
