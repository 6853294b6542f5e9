//! Projection of chart state into primitive shapes in pixel space.
//!
//! A scene is an ordered draw list: background zones, axes, grid and labels,
//! the probability band, today markers, then the metric lines on top.

use crate::layout::ChartLayout;
use crate::path::{area_path, band_points, line_path};
use crate::scale::Scales;
use crate::ticks::{week_ticks, y_ticks};
use crate::visibility::{BandGroup, VisibilityMap};
use chrono::{NaiveDateTime, TimeDelta};
use ecount_core::series::{Domain, SeriesSet};
use serde::Serialize;

/// Line colors, indexed by a metric's first-appearance position.
pub const PALETTE: [&str; 9] = [
    "#0B6623", // dark green
    "#FF5733", // orange-red
    "#D7AC00", // mustard
    "#FF6600", // orange
    "#FFC928", // yellow
    "#FF2868", // pink-red
    "#EE4B2B", // vibrant red
    "#300000", // dark maroon
    "#E67E22", // pumpkin
];

pub const BAND_FILL: &str = "#ECD0B7";
pub const BAND_OPACITY: f64 = 0.8;
pub const GRID_STROKE: &str = "#ddd";
pub const AXIS_STROKE: &str = "black";
pub const DASH_PATTERN: &str = "6,4";
pub const X_LABEL_FORMAT: &str = "%d %b";
pub const X_TITLE: &str = "Date";
pub const Y_TITLE: &str = "Highest Count (cfu/100 ml)";

/// A horizontal background band between two count levels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskZone {
    pub low: f64,
    pub high: f64,
    pub fill: &'static str,
}

/// Advisory levels in cfu/100 ml, drawn in this order.
pub const RISK_ZONES: [RiskZone; 3] = [
    RiskZone {
        low: 35.0,
        high: 104.0,
        fill: "#FFFFE5",
    },
    RiskZone {
        low: 0.0,
        high: 35.0,
        fill: "#E5FFE5",
    },
    RiskZone {
        low: 104.0,
        high: 300.0,
        fill: "#FFE5E5",
    },
];

/// Offset of the two "today" markers from the current time.
pub fn today_offset() -> TimeDelta {
    TimeDelta::try_hours(7).unwrap_or(TimeDelta::zero())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineShape {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke: String,
    pub stroke_width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathShape {
    pub key: String,
    pub d: String,
    pub stroke: Option<String>,
    pub stroke_width: f64,
    pub fill: Option<String>,
    pub opacity: f64,
    pub dash: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextShape {
    pub x: f64,
    pub y: f64,
    pub content: String,
    pub anchor: TextAnchor,
    pub font_size: f64,
    pub bold: bool,
    /// Rotation in degrees about the origin.
    pub rotation: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RectShape {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: String,
}

/// A drawable primitive in pixel space.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Shape {
    Line(LineShape),
    Path(PathShape),
    Text(TextShape),
    Rect(RectShape),
}

/// Everything needed to draw one frame of the chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub shapes: Vec<Shape>,
}

impl Scene {
    pub fn paths(&self) -> impl Iterator<Item = &PathShape> {
        self.shapes.iter().filter_map(|shape| match shape {
            Shape::Path(path) => Some(path),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextShape> {
        self.shapes.iter().filter_map(|shape| match shape {
            Shape::Text(text) => Some(text),
            _ => None,
        })
    }
}

/// Borrowed view of the state a scene is drawn from.
pub struct SceneInput<'a> {
    pub series: &'a SeriesSet,
    pub domain: Option<&'a Domain>,
    pub visibility: &'a VisibilityMap,
    pub group: &'a BandGroup,
    pub layout: &'a ChartLayout,
    pub now: NaiveDateTime,
}

fn line(x1: f64, y1: f64, x2: f64, y2: f64, stroke: &str) -> Shape {
    Shape::Line(LineShape {
        x1,
        y1,
        x2,
        y2,
        stroke: stroke.to_string(),
        stroke_width: 1.0,
    })
}

fn text(x: f64, y: f64, content: String, anchor: TextAnchor, font_size: f64) -> TextShape {
    TextShape {
        x,
        y,
        content,
        anchor,
        font_size,
        bold: false,
        rotation: None,
    }
}

impl SceneInput<'_> {
    pub fn build(&self) -> Scene {
        let layout = self.layout;
        let mut shapes = Vec::new();

        let domain = match self.domain {
            Some(domain) => domain,
            None => {
                self.push_axes(&mut shapes);
                return Scene {
                    width: layout.width,
                    height: layout.height,
                    shapes,
                };
            }
        };
        let scales = Scales::new(domain, layout);

        for zone in RISK_ZONES.iter() {
            let top = scales.y.to_px(zone.high).max(layout.plot_top());
            let bottom = scales.y.to_px(zone.low).min(layout.plot_bottom());
            if bottom > top {
                shapes.push(Shape::Rect(RectShape {
                    x: layout.plot_left(),
                    y: top,
                    width: layout.plot_width(),
                    height: bottom - top,
                    fill: zone.fill.to_string(),
                }));
            }
        }

        self.push_axes(&mut shapes);

        for tick in week_ticks(domain).into_iter().filter(|t| domain.contains(*t)) {
            let x = scales.x.to_px(tick);
            shapes.push(line(x, layout.plot_top(), x, layout.plot_bottom(), GRID_STROKE));
            shapes.push(Shape::Text(text(
                x,
                layout.plot_bottom() + 20.0,
                tick.format(X_LABEL_FORMAT).to_string(),
                TextAnchor::Middle,
                12.0,
            )));
        }

        for tick in y_ticks(domain.max_y) {
            let y = scales.y.to_px(tick);
            shapes.push(line(layout.plot_left(), y, layout.plot_right(), y, GRID_STROKE));
            shapes.push(Shape::Text(text(
                layout.plot_left() - 10.0,
                y + 4.0,
                format!("{}", tick),
                TextAnchor::End,
                12.0,
            )));
        }

        shapes.push(Shape::Text(TextShape {
            bold: true,
            ..text(
                layout.width / 2.0,
                layout.height - 10.0,
                X_TITLE.to_string(),
                TextAnchor::Middle,
                14.0,
            )
        }));
        shapes.push(Shape::Text(TextShape {
            bold: true,
            rotation: Some(-90.0),
            ..text(
                -layout.height / 2.0,
                20.0,
                Y_TITLE.to_string(),
                TextAnchor::Middle,
                14.0,
            )
        }));

        let group = self.group;
        let high = self.series.points(&group.high);
        let low = self.series.points(&group.low);
        if self.visibility.is_visible(&group.high)
            && self.visibility.is_visible(&group.low)
            && !high.is_empty()
            && !low.is_empty()
        {
            let band = area_path(&scales, &band_points(high, low));
            shapes.push(Shape::Path(PathShape {
                key: group.label.clone(),
                d: band.to_string(),
                stroke: None,
                stroke_width: 0.0,
                fill: Some(BAND_FILL.to_string()),
                opacity: BAND_OPACITY,
                dash: None,
            }));
        }

        for marker in [self.now - today_offset(), self.now + today_offset()] {
            if domain.contains(marker) {
                let x = scales.x.to_px(marker);
                shapes.push(line(x, layout.plot_top(), x, layout.plot_bottom(), AXIS_STROKE));
            }
        }

        for (idx, metric) in self.series.iter().enumerate() {
            if !self.visibility.is_visible(&metric.name)
                || metric.points.is_empty()
                || group.is_bound(&metric.name)
            {
                continue;
            }
            let dash = if metric.name == group.line {
                Some(DASH_PATTERN.to_string())
            } else {
                None
            };
            shapes.push(Shape::Path(PathShape {
                key: metric.name.clone(),
                d: line_path(&scales, &metric.points).to_string(),
                stroke: Some(PALETTE[idx % PALETTE.len()].to_string()),
                stroke_width: 2.0,
                fill: None,
                opacity: 1.0,
                dash,
            }));
        }

        Scene {
            width: layout.width,
            height: layout.height,
            shapes,
        }
    }

    fn push_axes(&self, shapes: &mut Vec<Shape>) {
        let layout = self.layout;
        shapes.push(line(
            layout.plot_left(),
            layout.plot_bottom(),
            layout.plot_right(),
            layout.plot_bottom(),
            AXIS_STROKE,
        ));
        shapes.push(line(
            layout.plot_left(),
            layout.plot_top(),
            layout.plot_left(),
            layout.plot_bottom(),
            AXIS_STROKE,
        ));
    }
}
