//! Applying a fetch result: process, apply, record.
//!
//! A failed cycle is logged and leaves the chart exactly as it was.

use crate::state::{ChartState, FetchTicket};
use chrono::NaiveDate;
use ecount_core::cache::LastFetchCache;
use ecount_core::series::TransformConfig;
use ecount_core::process;
use log::{info, warn};

/// What a refresh cycle did to the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// New data replaced the chart's series.
    Applied,
    /// A newer fetch or a site switch superseded this one.
    Stale,
    /// Fetch or parse failed; previous data kept.
    Failed,
    /// No site selected, nothing fetched.
    Idle,
}

/// Apply a fetch result for `ticket` to the chart state.
pub fn apply_refresh<C: LastFetchCache>(
    state: &mut ChartState,
    cache: &mut C,
    ticket: &FetchTicket,
    fetched: ecount_core::Result<String>,
    config: &TransformConfig,
    today: NaiveDate,
) -> RefreshOutcome {
    let body = match fetched {
        Ok(body) => body,
        Err(e) => {
            warn!("Fetch for {} failed: {}", ticket.site_id, e);
            return RefreshOutcome::Failed;
        }
    };
    let data = match process(&body, config) {
        Ok(data) => data,
        Err(e) => {
            warn!("CSV for {} could not be read: {}", ticket.site_id, e);
            return RefreshOutcome::Failed;
        }
    };
    let metrics = data.series.len();
    if !state.apply_fetch(ticket, data) {
        return RefreshOutcome::Stale;
    }
    info!("Loaded {} metric series for {}", metrics, ticket.site_id);
    if let Err(e) = cache.record_fetch(&ticket.site_id, today) {
        warn!("Could not record fetch date for {}: {}", ticket.site_id, e);
    }
    RefreshOutcome::Applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecount_core::cache::MemoryCache;
    use ecount_core::EcountError;

    const CSV: &str = "date,A,B\n2024-05-01,10,\n2024-05-02,,20\n";

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 3).unwrap()
    }

    fn state_for(site: &str) -> ChartState {
        let mut state = ChartState::default();
        state.set_site(site);
        state
    }

    #[test]
    fn success_applies_and_records_date() {
        let mut state = state_for("GAL001");
        let mut cache = MemoryCache::new();
        let ticket = state.begin_fetch().unwrap();
        let outcome = apply_refresh(
            &mut state,
            &mut cache,
            &ticket,
            Ok(CSV.to_string()),
            &TransformConfig::default(),
            today(),
        );
        assert_eq!(outcome, RefreshOutcome::Applied);
        assert!(state.series().contains("B"));
        assert_eq!(cache.last_fetch_date("GAL001").unwrap(), Some(today()));
    }

    #[test]
    fn failed_fetch_keeps_previous_data() {
        let mut state = state_for("GAL001");
        let mut cache = MemoryCache::new();
        let config = TransformConfig::default();
        let ticket = state.begin_fetch().unwrap();
        apply_refresh(&mut state, &mut cache, &ticket, Ok(CSV.to_string()), &config, today());

        let ticket = state.begin_fetch().unwrap();
        let failure = Err(EcountError::BadStatus {
            url: "https://example.org/GAL001.csv".to_string(),
            status: 503,
        });
        let later = today().succ_opt().unwrap();
        let outcome = apply_refresh(&mut state, &mut cache, &ticket, failure, &config, later);
        assert_eq!(outcome, RefreshOutcome::Failed);
        assert_eq!(state.series().points("A").len(), 1);
        assert_eq!(cache.last_fetch_date("GAL001").unwrap(), Some(today()));
    }

    #[test]
    fn unreadable_csv_is_a_failed_cycle() {
        let mut state = state_for("GAL001");
        let mut cache = MemoryCache::new();
        let ticket = state.begin_fetch().unwrap();
        let outcome = apply_refresh(
            &mut state,
            &mut cache,
            &ticket,
            Ok("day,A\n2024-01-01,1\n".to_string()),
            &TransformConfig::default(),
            today(),
        );
        assert_eq!(outcome, RefreshOutcome::Failed);
        assert!(state.domain().is_none());
    }

    #[test]
    fn result_for_previous_site_is_stale() {
        let mut state = state_for("A");
        let mut cache = MemoryCache::new();
        let ticket = state.begin_fetch().unwrap();
        state.set_site("B");
        let outcome = apply_refresh(
            &mut state,
            &mut cache,
            &ticket,
            Ok(CSV.to_string()),
            &TransformConfig::default(),
            today(),
        );
        assert_eq!(outcome, RefreshOutcome::Stale);
        assert_eq!(cache.last_fetch_date("A").unwrap(), None);
    }
}
