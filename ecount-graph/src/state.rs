//! Application state managed via Dioxus context.
//!
//! `AppState` bundles the reactive signals into a single struct provided via
//! `use_context_provider`. Child components retrieve it with `use_context::<AppState>()`.

use ecount_chart::{ChartLayout, ChartState};
use dioxus::prelude::*;

/// Site shown when the page URL does not name one.
pub const DEFAULT_SITE: &str = "GAL001";

#[derive(Clone, Copy)]
pub struct AppState {
    /// Series, domain, visibility and tooltip for the current site
    pub chart: Signal<ChartState>,
    /// Site identifier the fetch loop follows
    pub site: Signal<String>,
    pub layout: Signal<ChartLayout>,
    /// True until the first cycle for the current site completes
    pub loading: Signal<bool>,
    /// Message from the latest failed fetch, cleared on success
    pub error_msg: Signal<Option<String>>,
    /// Whether the legend dropdown is open
    pub legend_open: Signal<bool>,
}

impl AppState {
    pub fn new(site: String) -> Self {
        Self {
            chart: Signal::new(ChartState::default()),
            site: Signal::new(site),
            layout: Signal::new(ChartLayout::default()),
            loading: Signal::new(true),
            error_msg: Signal::new(None),
            legend_open: Signal::new(false),
        }
    }
}
