use serde::{Deserialize, Serialize};

/// Space reserved around the plot area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            top: 10.0,
            bottom: 50.0,
            left: 50.0,
            right: 50.0,
        }
    }
}

/// Pixel geometry of the chart surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    pub padding: Padding,
    /// Headroom added to the y ceiling so the top gridline is not at the edge.
    pub y_margin: f64,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 400.0,
            padding: Padding::default(),
            y_margin: 10.0,
        }
    }
}

impl ChartLayout {
    pub fn with_size(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn plot_width(&self) -> f64 {
        self.width - self.padding.left - self.padding.right
    }

    pub fn plot_height(&self) -> f64 {
        self.height - self.padding.top - self.padding.bottom
    }

    pub fn plot_left(&self) -> f64 {
        self.padding.left
    }

    pub fn plot_right(&self) -> f64 {
        self.width - self.padding.right
    }

    pub fn plot_top(&self) -> f64 {
        self.padding.top
    }

    /// The x axis sits on this line.
    pub fn plot_bottom(&self) -> f64 {
        self.height - self.padding.bottom
    }
}
