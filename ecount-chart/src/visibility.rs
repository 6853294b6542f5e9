use ecount_core::series::SeriesSet;
use serde::{Deserialize, Serialize};

/// Three metric keys toggled as one unit: the upper and lower bounds of the
/// probability band and its display line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandGroup {
    pub high: String,
    pub low: String,
    pub line: String,
    pub label: String,
}

impl Default for BandGroup {
    fn default() -> Self {
        Self {
            high: "Probability_Space_high".to_string(),
            low: "Probability_Space_low".to_string(),
            line: "Probability_Space".to_string(),
            label: "Probability Space".to_string(),
        }
    }
}

/// Column prefixes the band has been published under. Site CSVs carry
/// either spelling.
const BAND_PREFIXES: [&str; 2] = ["Probability_Space", "Probality_Space"];

impl BandGroup {
    /// Match each key to the spelling the loaded series actually use. Keys
    /// found as-is, or with no alternate spelling present, are kept.
    pub fn resolve(&self, series: &SeriesSet) -> BandGroup {
        let pick = |key: &str| -> String {
            if series.contains(key) {
                return key.to_string();
            }
            let Some(suffix) = BAND_PREFIXES
                .iter()
                .find_map(|prefix| key.strip_prefix(*prefix))
            else {
                return key.to_string();
            };
            BAND_PREFIXES
                .iter()
                .map(|prefix| format!("{}{}", prefix, suffix))
                .find(|candidate| series.contains(candidate))
                .unwrap_or_else(|| key.to_string())
        };
        BandGroup {
            high: pick(&self.high),
            low: pick(&self.low),
            line: pick(&self.line),
            label: self.label.clone(),
        }
    }

    pub fn keys(&self) -> [&str; 3] {
        [self.high.as_str(), self.low.as_str(), self.line.as_str()]
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys().contains(&key)
    }

    /// The bounds are drawn as a filled band, never as lines or tooltip rows.
    pub fn is_bound(&self, key: &str) -> bool {
        key == self.high || key == self.low
    }
}

/// Which metrics are drawn, in first-appearance order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisibilityMap {
    entries: Vec<(String, bool)>,
}

impl VisibilityMap {
    /// The first `visible_count` metrics start visible, the rest hidden.
    pub fn seed(series: &SeriesSet, visible_count: usize) -> Self {
        let entries = series
            .names()
            .enumerate()
            .map(|(idx, name)| (name.to_string(), idx < visible_count))
            .collect();
        Self { entries }
    }

    pub fn is_visible(&self, key: &str) -> bool {
        self.entries
            .iter()
            .any(|(name, visible)| name == key && *visible)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(name, _)| name == key)
    }

    /// Set a known key. Unknown keys are ignored so only real metrics can
    /// become visible.
    pub fn set(&mut self, key: &str, visible: bool) {
        if let Some(entry) = self.entries.iter_mut().find(|(name, _)| name == key) {
            entry.1 = visible;
        }
    }

    /// Flip one metric; returns its new state, or `None` for an unknown key.
    pub fn toggle(&mut self, key: &str) -> Option<bool> {
        let entry = self.entries.iter_mut().find(|(name, _)| name == key)?;
        entry.1 = !entry.1;
        Some(entry.1)
    }

    pub fn all_visible(&self, group: &BandGroup) -> bool {
        group.keys().iter().all(|key| self.is_visible(key))
    }

    /// Show all three band keys unless all three are already shown, in which
    /// case hide them. Returns the value written.
    pub fn toggle_group(&mut self, group: &BandGroup) -> bool {
        let visible = !self.all_visible(group);
        for key in group.keys() {
            self.set(key, visible);
        }
        visible
    }

    pub fn visible_keys(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, visible)| *visible)
            .map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries.iter().map(|(name, visible)| (name.as_str(), *visible))
    }
}

/// What a legend row toggles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegendTarget {
    Group,
    Metric(String),
}

/// One selectable row of the series legend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    pub label: String,
    pub selected: bool,
    pub target: LegendTarget,
}

/// The band group first, then every other metric in first-appearance order.
pub fn legend(visibility: &VisibilityMap, group: &BandGroup) -> Vec<LegendEntry> {
    let mut entries = vec![LegendEntry {
        label: group.label.clone(),
        selected: visibility.all_visible(group),
        target: LegendTarget::Group,
    }];
    entries.extend(
        visibility
            .iter()
            .filter(|(name, _)| !group.contains(name))
            .map(|(name, visible)| LegendEntry {
                label: name.to_string(),
                selected: visible,
                target: LegendTarget::Metric(name.to_string()),
            }),
    );
    entries
}
