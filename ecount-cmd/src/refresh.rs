//! One fetch cycle: read the cache, fetch, then apply the result.

use chrono::Utc;
use ecount_chart::refresh::{apply_refresh, RefreshOutcome};
use ecount_chart::ChartState;
use ecount_core::cache::LastFetchCache;
use ecount_core::series::TransformConfig;
use log::{info, warn};
use std::future::Future;

/// Run one cycle against `fetch`, which receives the site identifier.
pub async fn refresh_cycle<C, F, Fut>(
    state: &mut ChartState,
    cache: &mut C,
    config: &TransformConfig,
    fetch: &mut F,
) -> RefreshOutcome
where
    C: LastFetchCache,
    F: FnMut(String) -> Fut,
    Fut: Future<Output = ecount_core::Result<String>>,
{
    let ticket = match state.begin_fetch() {
        Some(ticket) => ticket,
        None => return RefreshOutcome::Idle,
    };
    match cache.last_fetch_date(&ticket.site_id) {
        Ok(Some(date)) => info!("{} last fetched on {}", ticket.site_id, date),
        Ok(None) => info!("{} has no recorded fetch", ticket.site_id),
        Err(e) => warn!("Could not read fetch cache: {}", e),
    }
    let fetched = fetch(ticket.site_id.clone()).await;
    let today = Utc::now().date_naive();
    apply_refresh(state, cache, &ticket, fetched, config, today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecount_core::cache::MemoryCache;
    use ecount_core::EcountError;

    const CSV: &str = "date,A,B\n2024-05-01,10,\n2024-05-02,,20\n";

    fn state_for(site: &str) -> ChartState {
        let mut state = ChartState::default();
        state.set_site(site);
        state
    }

    #[tokio::test]
    async fn cycle_passes_the_site_to_the_fetcher() {
        let mut state = state_for("GAL001");
        let mut cache = MemoryCache::new();
        let mut requested = Vec::new();
        let mut fetch = |site: String| {
            requested.push(site);
            async { Ok::<_, EcountError>(CSV.to_string()) }
        };
        let outcome =
            refresh_cycle(&mut state, &mut cache, &TransformConfig::default(), &mut fetch).await;
        assert_eq!(outcome, RefreshOutcome::Applied);
        assert_eq!(requested, vec!["GAL001".to_string()]);
        assert!(cache.last_fetch_date("GAL001").unwrap().is_some());
    }

    #[tokio::test]
    async fn cycle_without_site_is_idle() {
        let mut state = ChartState::default();
        let mut cache = MemoryCache::new();
        let mut fetch = |_site: String| async { Ok::<_, EcountError>(CSV.to_string()) };
        let outcome =
            refresh_cycle(&mut state, &mut cache, &TransformConfig::default(), &mut fetch).await;
        assert_eq!(outcome, RefreshOutcome::Idle);
    }
}
