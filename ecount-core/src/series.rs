use crate::row::FilteredRow;
use chrono::{NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single sample of one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub date: NaiveDateTime,
    pub value: f64,
}

/// All samples of one metric, in source row order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSeries {
    pub name: String,
    pub points: Vec<Point>,
}

/// Metric name -> samples, remembering first-appearance order of the names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesSet {
    metrics: Vec<MetricSeries>,
    index: HashMap<String, usize>,
}

impl SeriesSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample, creating the metric on first sight.
    pub fn push(&mut self, name: &str, point: Point) {
        let idx = match self.index.get(name) {
            Some(idx) => *idx,
            None => {
                self.metrics.push(MetricSeries {
                    name: name.to_string(),
                    points: Vec::new(),
                });
                let idx = self.metrics.len() - 1;
                self.index.insert(name.to_string(), idx);
                idx
            }
        };
        self.metrics[idx].points.push(point);
    }

    pub fn get(&self, name: &str) -> Option<&MetricSeries> {
        self.index.get(name).map(|idx| &self.metrics[*idx])
    }

    pub fn points(&self, name: &str) -> &[Point] {
        self.get(name).map(|s| s.points.as_slice()).unwrap_or(&[])
    }

    /// Position of the metric in first-appearance order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Metric names in first-appearance order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.metrics.iter().map(|s| s.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricSeries> {
        self.metrics.iter()
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Largest value over every metric and sample, if any.
    pub fn max_value(&self) -> Option<f64> {
        self.metrics
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.value))
            .fold(None, |acc: Option<f64>, v| match acc {
                Some(m) if m >= v => Some(m),
                _ => Some(v),
            })
    }
}

/// Step function choosing a round y-axis ceiling from the data maximum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YCeiling {
    pub threshold: f64,
    pub high: f64,
    pub low: f64,
}

impl Default for YCeiling {
    fn default() -> Self {
        Self {
            threshold: 140.0,
            high: 250.0,
            low: 150.0,
        }
    }
}

impl YCeiling {
    pub fn pick(&self, data_max: Option<f64>) -> f64 {
        match data_max {
            Some(max) if max > self.threshold => self.high,
            _ => self.low,
        }
    }
}

/// Knobs of the series transformer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformConfig {
    /// Added after the last sample so recent points are not flush with the edge.
    pub forward_padding_days: i64,
    pub y_ceiling: YCeiling,
    /// How many metrics, in first-appearance order, start out visible.
    pub initial_visible: usize,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            forward_padding_days: 2,
            y_ceiling: YCeiling::default(),
            initial_visible: 4,
        }
    }
}

/// Date and value ranges used to scale data to pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub start_date: NaiveDateTime,
    /// Last sample date plus the forward padding.
    pub end_date: NaiveDateTime,
    /// Last sample date without padding; tick generation runs off this.
    pub last_sample: NaiveDateTime,
    pub max_y: f64,
}

impl Domain {
    pub fn contains(&self, date: NaiveDateTime) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Output of one transform: series plus the domain, absent for zero rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transformed {
    pub series: SeriesSet,
    pub domain: Option<Domain>,
}

impl Transformed {
    /// First `count` metrics in first-appearance order.
    pub fn initially_visible(&self, count: usize) -> Vec<String> {
        self.series
            .names()
            .take(count)
            .map(|name| name.to_string())
            .collect()
    }
}

/// Samples are placed at midnight of their calendar day.
pub fn at_midnight(date: chrono::NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Pivot filtered rows into per-metric series and derive the domain.
pub fn transform(rows: &[FilteredRow], config: &TransformConfig) -> Transformed {
    let mut series = SeriesSet::new();
    for row in rows {
        let date = at_midnight(row.date);
        for (name, value) in &row.metrics {
            series.push(
                name,
                Point {
                    date,
                    value: *value,
                },
            );
        }
    }

    let first = rows.iter().map(|r| r.date).min();
    let last = rows.iter().map(|r| r.date).max();
    let domain = match (first, last) {
        (Some(first), Some(last)) => {
            let last_sample = at_midnight(last);
            let padding = TimeDelta::try_days(config.forward_padding_days).unwrap_or(TimeDelta::zero());
            Some(Domain {
                start_date: at_midnight(first),
                end_date: last_sample + padding,
                last_sample,
                max_y: config.y_ceiling.pick(series.max_value()),
            })
        }
        _ => None,
    };

    Transformed { series, domain }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::{filter_rows, parse_rows};
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        at_midnight(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    fn run(csv: &str) -> Transformed {
        let rows = filter_rows(parse_rows(csv).unwrap());
        transform(&rows, &TransformConfig::default())
    }

    #[test]
    fn pivots_sparse_rows_per_metric() {
        let out = run("date,A,B\n2024-01-01,10,\n2024-01-02,,20\n2024-01-03,15,25\n");
        assert_eq!(
            out.series.points("A"),
            &[
                Point { date: day(2024, 1, 1), value: 10.0 },
                Point { date: day(2024, 1, 3), value: 15.0 },
            ]
        );
        assert_eq!(
            out.series.points("B"),
            &[
                Point { date: day(2024, 1, 2), value: 20.0 },
                Point { date: day(2024, 1, 3), value: 25.0 },
            ]
        );
        let domain = out.domain.unwrap();
        assert_eq!(domain.start_date, day(2024, 1, 1));
        assert_eq!(domain.last_sample, day(2024, 1, 3));
        assert_eq!(domain.end_date, day(2024, 1, 5));
        assert_eq!(domain.max_y, 150.0);
    }

    #[test]
    fn large_values_raise_the_ceiling() {
        let out = run("date,A\n2024-01-01,141\n");
        assert_eq!(out.domain.unwrap().max_y, 250.0);
        let out = run("date,A\n2024-01-01,140\n");
        assert_eq!(out.domain.unwrap().max_y, 150.0);
    }

    #[test]
    fn metric_order_follows_first_appearance() {
        let out = run("date,A,B,C\n2024-01-01,,1,\n2024-01-02,2,3,4\n");
        let names: Vec<&str> = out.series.names().collect();
        assert_eq!(names, vec!["B", "A", "C"]);
        assert_eq!(out.series.position("C"), Some(2));
    }

    #[test]
    fn initially_visible_takes_the_first_metrics() {
        let out = run("date,A,B,C,D,E\n2024-01-01,1,2,3,4,5\n");
        assert_eq!(out.initially_visible(4), vec!["A", "B", "C", "D"]);
        assert_eq!(out.initially_visible(10).len(), 5);
    }

    #[test]
    fn every_point_lies_inside_the_domain() {
        let out = run("date,A,B\n2024-02-10,1,\n2024-02-01,,2\n2024-02-20,3,4\n");
        let domain = out.domain.unwrap();
        assert_eq!(domain.start_date, day(2024, 2, 1));
        assert!(out
            .series
            .iter()
            .flat_map(|s| s.points.iter())
            .all(|p| domain.contains(p.date)));
    }

    #[test]
    fn zero_rows_have_no_domain() {
        let out = run("date,A\n");
        assert!(out.series.is_empty());
        assert!(out.domain.is_none());
        assert_eq!(YCeiling::default().pick(out.series.max_value()), 150.0);
    }
}
