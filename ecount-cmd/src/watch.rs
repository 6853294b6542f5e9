//! Periodic refresh: fetch on start, then once per interval, rewriting the
//! chart after every cycle whether or not the fetch succeeded.

use crate::refresh::refresh_cycle;
use crate::render::render_document;
use crate::Settings;
use ecount_chart::refresh::RefreshOutcome;
use ecount_chart::{ChartLayout, ChartState};
use ecount_core::cache::{FileCache, LastFetchCache};
use ecount_core::fetch::CsvFetcher;
use ecount_core::series::TransformConfig;
use log::{info, warn};
use std::future::Future;
use std::path::Path;
use std::time::Duration;

/// Drive refresh cycles every `period`, writing the chart to `output`.
/// Runs until `max_cycles` cycles have completed, or forever without a bound.
pub async fn watch_with<C, F, Fut>(
    state: &mut ChartState,
    cache: &mut C,
    fetch: &mut F,
    layout: &ChartLayout,
    output: &Path,
    period: Duration,
    max_cycles: Option<u64>,
) -> anyhow::Result<Vec<RefreshOutcome>>
where
    C: LastFetchCache,
    F: FnMut(String) -> Fut,
    Fut: Future<Output = ecount_core::Result<String>>,
{
    let config = TransformConfig::default();
    let mut interval = tokio::time::interval(period);
    let mut outcomes = Vec::new();
    loop {
        interval.tick().await;
        let outcome = refresh_cycle(state, cache, &config, fetch).await;
        if outcome == RefreshOutcome::Failed {
            warn!("Keeping previous chart after failed refresh");
        }
        std::fs::write(output, render_document(state, layout, false)?)?;
        outcomes.push(outcome);
        if let Some(max) = max_cycles {
            if outcomes.len() as u64 >= max {
                break;
            }
        }
    }
    Ok(outcomes)
}

pub async fn run_watch(
    settings: &Settings,
    site: &str,
    output: &str,
    width: f64,
    height: f64,
    interval_mins: u64,
    max_cycles: Option<u64>,
) -> anyhow::Result<()> {
    let fetcher = CsvFetcher::new(settings.base_url.clone());
    let mut cache = FileCache::new(&settings.cache_file);
    let mut state = ChartState::default();
    state.set_site(site);
    let layout = ChartLayout::with_size(width, height);

    let mut fetch = |site_id: String| {
        let fetcher = fetcher.clone();
        async move { fetcher.fetch(&site_id).await }
    };
    info!(
        "Watching {} every {} minutes, writing {}",
        site, interval_mins, output
    );
    let outcomes = watch_with(
        &mut state,
        &mut cache,
        &mut fetch,
        &layout,
        Path::new(output),
        Duration::from_secs(interval_mins.max(1) * 60),
        max_cycles,
    )
    .await?;
    info!("Stopped after {} cycles", outcomes.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecount_core::cache::MemoryCache;
    use ecount_core::EcountError;

    fn temp_output(name: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("ecount-watch-{}-{}.svg", name, std::process::id()));
        path
    }

    #[tokio::test]
    async fn failed_cycle_keeps_last_good_chart() {
        let output = temp_output("stale");
        let mut state = ChartState::default();
        state.set_site("GAL001");
        let mut cache = MemoryCache::new();
        let mut calls = 0;
        let mut fetch = |_site: String| {
            calls += 1;
            let result = if calls == 1 {
                Ok("date,A\n2024-05-01,12\n2024-05-02,14\n".to_string())
            } else {
                Err(EcountError::BadStatus {
                    url: "https://example.org/GAL001.csv".to_string(),
                    status: 500,
                })
            };
            async move { result }
        };

        let outcomes = watch_with(
            &mut state,
            &mut cache,
            &mut fetch,
            &ChartLayout::default(),
            &output,
            Duration::from_millis(1),
            Some(3),
        )
        .await
        .unwrap();

        assert_eq!(
            outcomes,
            vec![
                RefreshOutcome::Applied,
                RefreshOutcome::Failed,
                RefreshOutcome::Failed
            ]
        );
        assert_eq!(state.series().points("A").len(), 2);
        let svg = std::fs::read_to_string(&output).unwrap();
        assert!(svg.contains(r#"data-key="A""#));
        let _ = std::fs::remove_file(&output);
    }
}
