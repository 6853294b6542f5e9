use crate::error::{EcountError, Result};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use log::debug;
use serde::{Deserialize, Serialize};

/// Date format of the `date` column: "YYYY-MM-DD"
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Name of the mandatory date column in the site CSV header.
pub const DATE_COLUMN: &str = "date";

/// One CSV line after per-field coercion.
///
/// `date` is `None` when the date text does not parse. `metrics` holds only the
/// fields whose text was non-empty and parsed as a finite number, in column
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedRow {
    pub date: Option<NaiveDate>,
    pub metrics: Vec<(String, f64)>,
}

impl ParsedRow {
    /// Value of a metric in this row, if it survived parsing.
    pub fn get(&self, metric: &str) -> Option<f64> {
        self.metrics
            .iter()
            .find(|(name, _)| name == metric)
            .map(|(_, value)| *value)
    }

    /// A row is usable when it has a date and at least one finite metric.
    pub fn is_usable(&self) -> bool {
        self.date.is_some() && self.metrics.iter().any(|(_, value)| value.is_finite())
    }
}

/// A ParsedRow that passed [`filter_rows`]: dated, with at least one metric.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredRow {
    pub date: NaiveDate,
    pub metrics: Vec<(String, f64)>,
}

impl TryFrom<ParsedRow> for FilteredRow {
    type Error = ParsedRow;

    fn try_from(row: ParsedRow) -> std::result::Result<Self, Self::Error> {
        if !row.is_usable() {
            return Err(row);
        }
        match row.date {
            Some(date) => Ok(FilteredRow {
                date,
                metrics: row.metrics,
            }),
            None => Err(row),
        }
    }
}

/// Parse a date field strictly as "YYYY-MM-DD".
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).ok()
}

/// Parse a metric field. Empty text, partial numbers and non-finite values
/// are all treated as missing.
pub fn parse_metric(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse site CSV text into rows, in source order.
///
/// The header must contain a `date` column; every other column is a metric.
/// Short rows are tolerated and their missing trailing fields count as empty.
pub fn parse_rows(csv_text: &str) -> Result<Vec<ParsedRow>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_text.as_bytes());

    let headers = rdr.headers()?.clone();
    let date_idx = headers
        .iter()
        .position(|h| h.trim() == DATE_COLUMN)
        .ok_or(EcountError::MissingDateColumn)?;
    let metric_columns: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != date_idx)
        .map(|(idx, name)| (idx, name.trim().to_string()))
        .collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let date = record.get(date_idx).and_then(parse_date);
        let metrics = metric_columns
            .iter()
            .filter_map(|(idx, name)| {
                record
                    .get(*idx)
                    .and_then(parse_metric)
                    .map(|value| (name.clone(), value))
            })
            .collect();
        rows.push(ParsedRow { date, metrics });
    }
    Ok(rows)
}

/// Keep rows with a date and at least one usable metric.
pub fn filter_rows(rows: Vec<ParsedRow>) -> Vec<FilteredRow> {
    let parsed = rows.len();
    let kept: Vec<FilteredRow> = rows
        .into_iter()
        .filter_map(|row| FilteredRow::try_from(row).ok())
        .collect();
    debug!("Parsed rows: {} -> Filtered: {}", parsed, kept.len());
    kept
}
