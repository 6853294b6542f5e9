//! SVG path data for series lines and probability bands.

use crate::scale::Scales;
use chrono::NaiveDateTime;
use ecount_core::series::Point;
use std::fmt;

/// One path instruction in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    Close,
}

/// An ordered list of path instructions; `Display` renders SVG `d` syntax.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathData {
    pub commands: Vec<PathCommand>,
}

impl PathData {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of move-to and line-to instructions.
    pub fn point_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| !matches!(c, PathCommand::Close))
            .count()
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.commands.last(), Some(PathCommand::Close))
    }

    fn move_or_line(&mut self, x: f64, y: f64) {
        if self.commands.is_empty() {
            self.commands.push(PathCommand::MoveTo(x, y));
        } else {
            self.commands.push(PathCommand::LineTo(x, y));
        }
    }
}

impl fmt::Display for PathData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, command) in self.commands.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match command {
                PathCommand::MoveTo(x, y) => write!(f, "M {} {}", x, y)?,
                PathCommand::LineTo(x, y) => write!(f, "L {} {}", x, y)?,
                PathCommand::Close => f.write_str("Z")?,
            }
        }
        Ok(())
    }
}

/// Upper and lower bound of a band at one date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandPoint {
    pub date: NaiveDateTime,
    pub y: f64,
    pub y0: f64,
}

/// Pair index-aligned upper and lower series into band points. The two
/// series must share length and date order; extra trailing samples of the
/// longer one are ignored.
pub fn band_points(upper: &[Point], lower: &[Point]) -> Vec<BandPoint> {
    upper
        .iter()
        .zip(lower.iter())
        .map(|(high, low)| BandPoint {
            date: high.date,
            y: high.value,
            y0: low.value,
        })
        .collect()
}

/// Polyline through `points` in the given order.
pub fn line_path(scales: &Scales, points: &[Point]) -> PathData {
    let mut path = PathData::default();
    for point in points {
        let (x, y) = scales.project(point.date, point.value);
        path.move_or_line(x, y);
    }
    path
}

/// Closed polygon: upper bound forward, lower bound backward, then close.
pub fn area_path(scales: &Scales, band: &[BandPoint]) -> PathData {
    let mut path = PathData::default();
    if band.is_empty() {
        return path;
    }
    for point in band {
        let (x, y) = scales.project(point.date, point.y);
        path.move_or_line(x, y);
    }
    for point in band.iter().rev() {
        let (x, y) = scales.project(point.date, point.y0);
        path.move_or_line(x, y);
    }
    path.commands.push(PathCommand::Close);
    path
}

/// String form of [`line_path`]; empty input gives "".
pub fn build_line_path(scales: &Scales, points: &[Point]) -> String {
    line_path(scales, points).to_string()
}

/// String form of [`area_path`]; empty input gives "".
pub fn build_area_path(scales: &Scales, band: &[BandPoint]) -> String {
    area_path(scales, band).to_string()
}
