use crate::error::Result;
use crate::row::{filter_rows, parse_rows};
use crate::series::{transform, TransformConfig, Transformed};
use log::debug;

/// Parse, filter and pivot one CSV body.
pub fn process(csv_text: &str, config: &TransformConfig) -> Result<Transformed> {
    let rows = filter_rows(parse_rows(csv_text)?);
    let transformed = transform(&rows, config);
    debug!(
        "Transformed {} rows into {} metric series",
        rows.len(),
        transformed.series.len()
    );
    Ok(transformed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kept_row_contributes_a_point() {
        let csv = "\
date,Probability_Space_high,Probability_Space_low,Probability_Space,Site
2024-04-01,120,20,70,
2024-04-02,,,,
2024-04-03,130,25,80,33
";
        let out = process(csv, &TransformConfig::default()).unwrap();
        let total: usize = out.series.iter().map(|s| s.points.len()).sum();
        assert_eq!(total, 7);
        assert_eq!(out.series.points("Site").len(), 1);
        assert_eq!(out.initially_visible(4).len(), 4);
    }

    #[test]
    fn header_problems_propagate() {
        assert!(process("when,A\n", &TransformConfig::default()).is_err());
    }
}
