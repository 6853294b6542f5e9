//! Nearest-sample lookup behind the chart tooltip.

use crate::layout::ChartLayout;
use crate::scale::{millis, XScale};
use crate::visibility::{BandGroup, VisibilityMap};
use chrono::{NaiveDateTime, TimeDelta};
use ecount_core::series::{Domain, Point, SeriesSet};
use std::collections::BTreeSet;

/// Display format of the tooltip date, e.g. "3/7/2024".
pub const TOOLTIP_DATE_FORMAT: &str = "%-m/%-d/%Y";

/// Default maximum distance between the pointer date and a metric's sample.
pub fn default_tolerance() -> TimeDelta {
    TimeDelta::try_hours(12).unwrap_or(TimeDelta::zero())
}

/// One metric's reading in the tooltip.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipValue {
    pub name: String,
    pub value: f64,
}

impl TooltipValue {
    /// Value rounded to two decimals for display.
    pub fn display(&self) -> String {
        format!("{:.2}", self.value)
    }
}

/// Readings at the sample date nearest to a pointer position.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    /// Formatted sample date; empty when no visible series has samples.
    pub date: String,
    pub sample_date: Option<NaiveDateTime>,
    pub values: Vec<TooltipValue>,
    /// Pointer position the tooltip was produced for.
    pub anchor: (f64, f64),
}

/// Inputs for a tooltip lookup.
pub struct Locator<'a> {
    pub series: &'a SeriesSet,
    pub visibility: &'a VisibilityMap,
    pub domain: &'a Domain,
    pub layout: &'a ChartLayout,
    pub group: &'a BandGroup,
    pub tolerance: TimeDelta,
}

/// Earliest point with the smallest distance to `target`.
fn nearest(points: &[Point], target: f64) -> Option<(&Point, f64)> {
    let mut best: Option<(&Point, f64)> = None;
    for point in points {
        let diff = (millis(point.date) - target).abs();
        match best {
            Some((_, best_diff)) if diff >= best_diff => {}
            _ => best = Some((point, diff)),
        }
    }
    best
}

impl Locator<'_> {
    /// Date under the pointer, from the inverse of the x scale.
    pub fn estimated_date(&self, pointer_x: f64) -> NaiveDateTime {
        XScale::new(self.domain.start_date, self.domain.end_date, self.layout).date_at(pointer_x)
    }

    /// Build the tooltip for a pointer at `(pointer_x, pointer_y)`. Only the x
    /// coordinate selects data; both are kept as the anchor.
    pub fn locate(&self, pointer_x: f64, pointer_y: f64) -> Tooltip {
        let estimated = self.estimated_date(pointer_x);
        let target = millis(estimated);

        let dates: BTreeSet<NaiveDateTime> = self
            .series
            .iter()
            .filter(|s| self.visibility.is_visible(&s.name))
            .flat_map(|s| s.points.iter().map(|p| p.date))
            .collect();

        let mut closest: Option<(NaiveDateTime, f64)> = None;
        for date in &dates {
            let diff = (millis(*date) - target).abs();
            match closest {
                Some((_, best)) if diff >= best => {}
                _ => closest = Some((*date, diff)),
            }
        }

        let max_diff = self.tolerance.num_milliseconds() as f64;
        let values = self
            .series
            .iter()
            .filter(|s| self.visibility.is_visible(&s.name) && !self.group.is_bound(&s.name))
            .filter_map(|s| {
                let (point, diff) = nearest(&s.points, target)?;
                if diff > max_diff || !point.value.is_finite() {
                    return None;
                }
                Some(TooltipValue {
                    name: s.name.clone(),
                    value: point.value,
                })
            })
            .collect();

        let sample_date = closest.map(|(date, _)| date);
        Tooltip {
            date: sample_date
                .map(|d| d.format(TOOLTIP_DATE_FORMAT).to_string())
                .unwrap_or_default(),
            sample_date,
            values,
            anchor: (pointer_x, pointer_y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    /// 400 px of plot width over 400 hours: one pixel per hour from 3/1 00:00.
    fn domain() -> Domain {
        Domain {
            start_date: at(1, 0),
            end_date: at(17, 16),
            last_sample: at(15, 16),
            max_y: 150.0,
        }
    }

    fn px_for_hour(hour: f64) -> f64 {
        50.0 + hour
    }

    fn build(entries: Vec<(&str, Vec<(NaiveDateTime, f64)>)>) -> SeriesSet {
        let mut set = SeriesSet::new();
        for (name, points) in entries {
            for (date, value) in points {
                set.push(name, Point { date, value });
            }
        }
        set
    }

    fn locate(series: &SeriesSet, visibility: &VisibilityMap, x: f64) -> Tooltip {
        let domain = domain();
        let layout = ChartLayout::default();
        let group = BandGroup::default();
        Locator {
            series,
            visibility,
            domain: &domain,
            layout: &layout,
            group: &group,
            tolerance: default_tolerance(),
        }
        .locate(x, 5.0)
    }

    #[test]
    fn reports_values_on_the_nearest_day() {
        let series = build(vec![
            ("A", vec![(at(1, 0), 10.0), (at(2, 0), 11.0), (at(3, 0), 12.5)]),
            ("B", vec![(at(2, 0), 40.126)]),
        ]);
        let visibility = VisibilityMap::seed(&series, 4);
        let tooltip = locate(&series, &visibility, px_for_hour(25.0));
        assert_eq!(tooltip.date, "3/2/2024");
        assert_eq!(tooltip.sample_date, Some(at(2, 0)));
        let names: Vec<&str> = tooltip.values.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(tooltip.values[0].value, 11.0);
        assert_eq!(tooltip.values[1].display(), "40.13");
        assert_eq!(tooltip.anchor, (px_for_hour(25.0), 5.0));
    }

    #[test]
    fn metric_far_from_pointer_is_omitted() {
        // Pointer midway between samples 40 hours apart: 20 hours from each.
        let series = build(vec![
            ("A", vec![(at(1, 0), 1.0), (at(2, 16), 2.0)]),
            ("B", vec![(at(1, 20), 3.0)]),
        ]);
        let visibility = VisibilityMap::seed(&series, 4);
        let tooltip = locate(&series, &visibility, px_for_hour(20.0));
        let names: Vec<&str> = tooltip.values.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["B"]);
    }

    #[test]
    fn tolerance_is_inclusive() {
        let series = build(vec![("A", vec![(at(1, 0), 1.0)])]);
        let visibility = VisibilityMap::seed(&series, 4);
        assert_eq!(locate(&series, &visibility, px_for_hour(12.0)).values.len(), 1);
        assert!(locate(&series, &visibility, px_for_hour(14.0)).values.is_empty());
    }

    #[test]
    fn hidden_series_and_bounds_are_skipped() {
        let series = build(vec![
            ("Probability_Space_high", vec![(at(2, 0), 90.0)]),
            ("Probability_Space_low", vec![(at(2, 0), 10.0)]),
            ("Probability_Space", vec![(at(2, 0), 50.0)]),
            ("Hidden", vec![(at(2, 8), 7.0)]),
        ]);
        let mut visibility = VisibilityMap::seed(&series, 4);
        visibility.set("Hidden", false);
        let tooltip = locate(&series, &visibility, px_for_hour(32.0));
        // The hidden sample right under the pointer does not attract the date.
        assert_eq!(tooltip.sample_date, Some(at(2, 0)));
        let names: Vec<&str> = tooltip.values.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Probability_Space"]);
    }

    #[test]
    fn ties_go_to_the_earlier_sample() {
        let series = build(vec![("A", vec![(at(1, 0), 1.0), (at(2, 0), 2.0)])]);
        let visibility = VisibilityMap::seed(&series, 4);
        let tooltip = locate(&series, &visibility, px_for_hour(12.0));
        assert_eq!(tooltip.sample_date, Some(at(1, 0)));
        assert_eq!(tooltip.values[0].value, 1.0);
    }

    #[test]
    fn nothing_visible_gives_empty_tooltip() {
        let series = build(vec![("A", vec![(at(1, 0), 1.0)])]);
        let visibility = VisibilityMap::seed(&series, 0);
        let tooltip = locate(&series, &visibility, px_for_hour(0.0));
        assert_eq!(tooltip.date, "");
        assert!(tooltip.values.is_empty());
    }

    #[test]
    fn pointer_outside_plot_clamps_to_domain() {
        let series = build(vec![("A", vec![(at(1, 0), 1.0), (at(17, 0), 9.0)])]);
        let visibility = VisibilityMap::seed(&series, 4);
        assert_eq!(locate(&series, &visibility, -100.0).sample_date, Some(at(1, 0)));
        assert_eq!(locate(&series, &visibility, 900.0).sample_date, Some(at(17, 0)));
    }
}
