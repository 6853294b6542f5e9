//! Date -> x and value -> y pixel mappings.
//!
//! Scales are cheap value types rebuilt from the current domain on every use.

use crate::layout::ChartLayout;
use chrono::{NaiveDateTime, TimeDelta};
use ecount_core::series::Domain;

pub(crate) fn millis(date: NaiveDateTime) -> f64 {
    date.and_utc().timestamp_millis() as f64
}

/// Horizontal time scale over `[start, end]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct XScale {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub left_px: f64,
    pub plot_width: f64,
}

impl XScale {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime, layout: &ChartLayout) -> Self {
        Self {
            start,
            end,
            left_px: layout.plot_left(),
            plot_width: layout.plot_width(),
        }
    }

    fn span_millis(&self) -> f64 {
        millis(self.end) - millis(self.start)
    }

    /// Pixel x of `date`. A zero-width domain maps everything to the left edge.
    pub fn to_px(&self, date: NaiveDateTime) -> f64 {
        let span = self.span_millis();
        if span <= 0.0 {
            return self.left_px;
        }
        self.left_px + (millis(date) - millis(self.start)) / span * self.plot_width
    }

    /// Fractional position of pixel `px` within the domain, clamped to [0, 1].
    pub fn fraction_at(&self, px: f64) -> f64 {
        if self.plot_width <= 0.0 {
            return 0.0;
        }
        ((px - self.left_px) / self.plot_width).clamp(0.0, 1.0)
    }

    /// Date under pixel `px`, clamped to the domain.
    pub fn date_at(&self, px: f64) -> NaiveDateTime {
        let offset = (self.fraction_at(px) * self.span_millis().max(0.0)).round() as i64;
        self.start + TimeDelta::try_milliseconds(offset).unwrap_or(TimeDelta::zero())
    }
}

/// Vertical value scale from 0 at the x axis up to `max_y + margin`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct YScale {
    pub max_y: f64,
    pub margin: f64,
    pub bottom_px: f64,
    pub plot_height: f64,
}

impl YScale {
    pub fn new(max_y: f64, layout: &ChartLayout) -> Self {
        Self {
            max_y,
            margin: layout.y_margin,
            bottom_px: layout.plot_bottom(),
            plot_height: layout.plot_height(),
        }
    }

    /// Pixel y of `value`. A zero ceiling maps everything onto the x axis.
    pub fn to_px(&self, value: f64) -> f64 {
        let ceiling = self.max_y + self.margin;
        if ceiling <= 0.0 {
            return self.bottom_px;
        }
        self.bottom_px - (value / ceiling) * self.plot_height
    }
}

/// The x/y pair used by every drawing step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scales {
    pub x: XScale,
    pub y: YScale,
}

impl Scales {
    pub fn new(domain: &Domain, layout: &ChartLayout) -> Self {
        Self {
            x: XScale::new(domain.start_date, domain.end_date, layout),
            y: YScale::new(domain.max_y, layout),
        }
    }

    pub fn project(&self, date: NaiveDateTime, value: f64) -> (f64, f64) {
        (self.x.to_px(date), self.y.to_px(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn domain() -> Domain {
        Domain {
            start_date: day(2024, 1, 1),
            end_date: day(2024, 1, 11),
            last_sample: day(2024, 1, 9),
            max_y: 150.0,
        }
    }

    #[test]
    fn x_endpoints_land_on_padding_edges() {
        let layout = ChartLayout::default();
        let scales = Scales::new(&domain(), &layout);
        assert_eq!(scales.x.to_px(day(2024, 1, 1)), layout.padding.left);
        assert_eq!(
            scales.x.to_px(day(2024, 1, 11)),
            layout.width - layout.padding.right
        );
        assert_eq!(scales.x.to_px(day(2024, 1, 6)), 250.0);
    }

    #[test]
    fn degenerate_domain_maps_to_left_edge() {
        let layout = ChartLayout::default();
        let x = XScale::new(day(2024, 1, 1), day(2024, 1, 1), &layout);
        assert_eq!(x.to_px(day(2024, 1, 1)), 50.0);
        assert_eq!(x.to_px(day(2030, 1, 1)), 50.0);
        assert!(x.to_px(day(2024, 3, 1)).is_finite());
        assert_eq!(x.date_at(300.0), day(2024, 1, 1));
    }

    #[test]
    fn y_maps_zero_to_axis_and_ceiling_near_top() {
        let layout = ChartLayout::default();
        let y = YScale::new(150.0, &layout);
        assert_eq!(y.to_px(0.0), 350.0);
        assert_eq!(y.to_px(160.0), 10.0);
        assert!(y.to_px(150.0) > 10.0);
    }

    #[test]
    fn zero_ceiling_is_defined() {
        let layout = ChartLayout {
            y_margin: 0.0,
            ..ChartLayout::default()
        };
        assert_eq!(YScale::new(0.0, &layout).to_px(42.0), 350.0);
    }

    #[test]
    fn monotone_and_repeatable() {
        let layout = ChartLayout::default();
        let scales = Scales::new(&domain(), &layout);
        let dates: Vec<NaiveDateTime> = (1..=11).map(|d| day(2024, 1, d)).collect();
        let first: Vec<f64> = dates.iter().map(|d| scales.x.to_px(*d)).collect();
        let second: Vec<f64> = dates.iter().map(|d| scales.x.to_px(*d)).collect();
        assert!(first.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(first, second);
    }

    #[test]
    fn pixel_to_date_clamps() {
        let layout = ChartLayout::default();
        let x = Scales::new(&domain(), &layout).x;
        assert_eq!(x.fraction_at(0.0), 0.0);
        assert_eq!(x.fraction_at(1000.0), 1.0);
        assert_eq!(x.date_at(250.0), day(2024, 1, 6));
        assert_eq!(x.date_at(-5.0), day(2024, 1, 1));
    }
}
