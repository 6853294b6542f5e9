/// Error types for the ecount pipeline
use thiserror::Error;

/// Main error type for fetching, parsing and caching site data
#[derive(Error, Debug)]
pub enum EcountError {
    /// HTTP request failed before a response arrived
    #[cfg(feature = "api")]
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Request could not be completed by a non-reqwest transport
    #[error("Request failed: {0}")]
    FetchFailed(String),

    /// Server answered with a non-success status
    #[error("Bad response status for {url}: {status}")]
    BadStatus { url: String, status: u16 },

    /// Failed to read the CSV structure
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// The header row has no `date` column
    #[error("CSV header has no `date` column")]
    MissingDateColumn,

    /// Cache file could not be read or written
    #[error("Cache I/O failed: {0}")]
    CacheIo(#[from] std::io::Error),

    /// Cache file exists but is not a JSON object of strings
    #[error("Cache file is malformed: {0}")]
    CacheFormat(#[from] serde_json::Error),
}

impl EcountError {
    /// True for transport failures and non-success statuses.
    pub fn is_network(&self) -> bool {
        match self {
            #[cfg(feature = "api")]
            EcountError::HttpRequest(_) => true,
            EcountError::FetchFailed(_) => true,
            EcountError::BadStatus { .. } => true,
            _ => false,
        }
    }
}

/// Type alias for Results using EcountError
pub type Result<T> = std::result::Result<T, EcountError>;
