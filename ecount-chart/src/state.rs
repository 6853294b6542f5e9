//! `ChartState` holds everything one chart instance shows and the rules for
//! moving between fetches, site switches, legend toggles and pointer clicks.

use crate::layout::ChartLayout;
use crate::scene::{Scene, SceneInput};
use crate::tooltip::{default_tolerance, Locator, Tooltip};
use crate::visibility::{legend, BandGroup, LegendEntry, LegendTarget, VisibilityMap};
use chrono::{NaiveDateTime, TimeDelta};
use ecount_core::series::{Domain, SeriesSet, Transformed};
use log::{debug, info};

/// Issued when a fetch starts; a result is only applied if its ticket is
/// still current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub site_id: String,
}

#[derive(Debug, Clone)]
pub struct ChartState {
    site_id: Option<String>,
    series: SeriesSet,
    domain: Option<Domain>,
    visibility: VisibilityMap,
    tooltip: Option<Tooltip>,
    generation: u64,
    band: BandGroup,
    /// `band` matched against the spelling of the loaded columns
    active_band: BandGroup,
    initial_visible: usize,
    tolerance: TimeDelta,
}

impl Default for ChartState {
    fn default() -> Self {
        Self::new(BandGroup::default(), 4)
    }
}

impl ChartState {
    pub fn new(band: BandGroup, initial_visible: usize) -> Self {
        Self {
            site_id: None,
            series: SeriesSet::new(),
            domain: None,
            visibility: VisibilityMap::default(),
            tooltip: None,
            generation: 0,
            active_band: band.clone(),
            band,
            initial_visible,
            tolerance: default_tolerance(),
        }
    }

    pub fn with_tolerance(mut self, tolerance: TimeDelta) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn site_id(&self) -> Option<&str> {
        self.site_id.as_deref()
    }

    pub fn series(&self) -> &SeriesSet {
        &self.series
    }

    pub fn domain(&self) -> Option<&Domain> {
        self.domain.as_ref()
    }

    pub fn visibility(&self) -> &VisibilityMap {
        &self.visibility
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    pub fn band(&self) -> &BandGroup {
        &self.active_band
    }

    /// Switch to another site. Results of fetches started for the previous
    /// site are discarded from now on; the old data stays on screen until the
    /// new site's first fetch lands.
    pub fn set_site(&mut self, site_id: &str) {
        if self.site_id.as_deref() == Some(site_id) {
            return;
        }
        info!("Switching chart to site {}", site_id);
        self.site_id = Some(site_id.to_string());
        self.generation += 1;
    }

    /// Start a fetch for the current site.
    pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
        let site_id = self.site_id.clone()?;
        self.generation += 1;
        Some(FetchTicket {
            generation: self.generation,
            site_id,
        })
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.generation && self.site_id.as_deref() == Some(&ticket.site_id)
    }

    /// Replace series and domain with a fetch result and reseed visibility.
    /// Returns false, leaving the state untouched, for a stale ticket.
    pub fn apply_fetch(&mut self, ticket: &FetchTicket, data: Transformed) -> bool {
        if !self.is_current(ticket) {
            debug!(
                "Discarding stale fetch for {} (generation {}, current {})",
                ticket.site_id, ticket.generation, self.generation
            );
            return false;
        }
        self.active_band = self.band.resolve(&data.series);
        self.visibility = VisibilityMap::seed(&data.series, self.initial_visible);
        self.series = data.series;
        self.domain = data.domain;
        true
    }

    pub fn toggle(&mut self, key: &str) -> Option<bool> {
        self.visibility.toggle(key)
    }

    pub fn toggle_group(&mut self) -> bool {
        self.visibility.toggle_group(&self.active_band)
    }

    /// Apply a legend row selection.
    pub fn select(&mut self, target: &LegendTarget) {
        match target {
            LegendTarget::Group => {
                self.toggle_group();
            }
            LegendTarget::Metric(key) => {
                self.toggle(key);
            }
        }
    }

    pub fn legend(&self) -> Vec<LegendEntry> {
        legend(&self.visibility, &self.active_band)
    }

    /// Resolve a click into a tooltip. Without a domain there is nothing to
    /// show and any open tooltip is closed.
    pub fn locate(&mut self, x: f64, y: f64, layout: &ChartLayout) -> Option<&Tooltip> {
        self.tooltip = self.domain.as_ref().map(|domain| {
            Locator {
                series: &self.series,
                visibility: &self.visibility,
                domain,
                layout,
                group: &self.active_band,
                tolerance: self.tolerance,
            }
            .locate(x, y)
        });
        self.tooltip.as_ref()
    }

    pub fn dismiss_tooltip(&mut self) {
        self.tooltip = None;
    }

    pub fn scene(&self, layout: &ChartLayout, now: NaiveDateTime) -> Scene {
        SceneInput {
            series: &self.series,
            domain: self.domain.as_ref(),
            visibility: &self.visibility,
            group: &self.active_band,
            layout,
            now,
        }
        .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ecount_core::process;
    use ecount_core::series::TransformConfig;

    const CSV_A: &str = "\
date,Probability_Space_high,Probability_Space_low,Probability_Space,Beach_A,Beach_B
2024-05-01,120,20,60,40,10
2024-05-02,130,25,70,45,12
";

    const CSV_B: &str = "date,Other\n2024-06-01,5\n";

    fn data(csv: &str) -> Transformed {
        process(csv, &TransformConfig::default()).unwrap()
    }

    fn loaded(site: &str, csv: &str) -> ChartState {
        let mut state = ChartState::default();
        state.set_site(site);
        let ticket = state.begin_fetch().unwrap();
        assert!(state.apply_fetch(&ticket, data(csv)));
        state
    }

    #[test]
    fn no_fetch_without_site() {
        let mut state = ChartState::default();
        assert!(state.begin_fetch().is_none());
    }

    #[test]
    fn apply_reseeds_visibility() {
        let mut state = loaded("A", CSV_A);
        assert!(state.visibility().is_visible("Beach_A"));
        assert!(!state.visibility().is_visible("Beach_B"));

        state.toggle("Beach_B");
        let ticket = state.begin_fetch().unwrap();
        state.apply_fetch(&ticket, data(CSV_A));
        assert!(!state.visibility().is_visible("Beach_B"));
    }

    #[test]
    fn stale_fetch_after_site_switch_is_dropped() {
        let mut state = ChartState::default();
        state.set_site("A");
        let old = state.begin_fetch().unwrap();
        state.set_site("B");
        let new = state.begin_fetch().unwrap();

        assert!(state.apply_fetch(&new, data(CSV_B)));
        assert!(!state.apply_fetch(&old, data(CSV_A)));
        assert!(state.series().contains("Other"));
        assert!(!state.series().contains("Beach_A"));
    }

    #[test]
    fn site_switch_keeps_previous_data_until_fetch_lands() {
        let mut state = loaded("A", CSV_A);
        state.set_site("B");
        assert_eq!(state.site_id(), Some("B"));
        assert!(state.series().contains("Beach_A"));
        assert!(state.domain().is_some());
    }

    #[test]
    fn overlapping_fetches_keep_only_the_latest() {
        let mut state = ChartState::default();
        state.set_site("A");
        let first = state.begin_fetch().unwrap();
        let second = state.begin_fetch().unwrap();
        assert!(!state.is_current(&first));
        assert!(state.apply_fetch(&second, data(CSV_A)));
    }

    #[test]
    fn legend_selection_toggles() {
        let mut state = loaded("A", CSV_A);
        let entries = state.legend();
        assert_eq!(entries[0].target, LegendTarget::Group);
        assert!(entries[0].selected);

        state.select(&LegendTarget::Group);
        assert!(!state.visibility().is_visible("Probability_Space"));
        state.select(&LegendTarget::Metric("Beach_B".to_string()));
        assert!(state.visibility().is_visible("Beach_B"));
    }

    #[test]
    fn tooltip_survives_refresh_until_dismissed() {
        let layout = ChartLayout::default();
        let mut state = loaded("A", CSV_A);
        let tooltip = state.locate(60.0, 100.0, &layout).unwrap();
        assert_eq!(tooltip.date, "5/1/2024");

        let ticket = state.begin_fetch().unwrap();
        state.apply_fetch(&ticket, data(CSV_A));
        assert!(state.tooltip().is_some());

        state.dismiss_tooltip();
        assert!(state.tooltip().is_none());
    }

    #[test]
    fn misspelled_band_columns_still_form_the_band() {
        let csv = "\
date,Probality_Space_high,Probality_Space_low,Probality_Space,Beach_A
2024-05-01,120,20,60,40
2024-05-02,130,25,70,45
";
        let layout = ChartLayout::default();
        let now = NaiveDate::from_ymd_opt(2024, 5, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut state = loaded("A", csv);
        assert_eq!(state.band().high, "Probality_Space_high");

        let scene = state.scene(&layout, now);
        let keys: Vec<&str> = scene.paths().map(|p| p.key.as_str()).collect();
        assert!(!keys.contains(&"Probality_Space_high"));
        assert!(!keys.contains(&"Probality_Space_low"));
        assert!(keys.contains(&"Probality_Space"));
        assert!(keys.contains(&"Beach_A"));
        assert!(scene.paths().any(|p| p.fill.is_some()));

        let labels: Vec<String> = state.legend().into_iter().map(|e| e.label).collect();
        assert_eq!(labels, vec!["Probability Space", "Beach_A"]);

        let tooltip = state.locate(60.0, 100.0, &layout).unwrap();
        let names: Vec<&str> = tooltip.values.iter().map(|v| v.name.as_str()).collect();
        assert!(!names.contains(&"Probality_Space_high"));
        assert!(!names.contains(&"Probality_Space_low"));
    }

    #[test]
    fn locate_without_domain_is_none() {
        let layout = ChartLayout::default();
        let mut state = ChartState::default();
        assert!(state.locate(100.0, 100.0, &layout).is_none());
    }

    #[test]
    fn scene_follows_visibility() {
        let layout = ChartLayout::default();
        let now = NaiveDate::from_ymd_opt(2024, 5, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut state = loaded("A", CSV_A);
        let before = state.scene(&layout, now).paths().count();
        state.toggle("Beach_A");
        let after = state.scene(&layout, now).paths().count();
        assert_eq!(before, after + 1);
    }
}
