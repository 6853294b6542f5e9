//! Core pipeline for enterococcus count site data: fetch the per-site CSV,
//! coerce it into typed rows, drop unusable rows, and pivot the rest into
//! per-metric series with a chart domain.

pub mod cache;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod row;
pub mod series;

pub use error::{EcountError, Result};
pub use pipeline::process;
