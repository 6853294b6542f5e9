//! Chart model for enterococcus count series: pixel scales, SVG path data,
//! axis ticks, series visibility, tooltip lookup, and a drawable scene.

pub mod layout;
pub mod path;
pub mod refresh;
pub mod scale;
pub mod scene;
pub mod state;
pub mod svg;
pub mod ticks;
pub mod tooltip;
pub mod visibility;

pub use layout::ChartLayout;
pub use scene::{Scene, Shape};
pub use state::{ChartState, FetchTicket};
