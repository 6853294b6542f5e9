//! One-shot commands: print a site's series summary or render its chart.

use crate::refresh::refresh_cycle;
use crate::Settings;
use anyhow::bail;
use chrono::Utc;
use ecount_chart::refresh::RefreshOutcome;
use ecount_chart::{ChartLayout, ChartState};
use ecount_core::cache::FileCache;
use ecount_core::fetch::CsvFetcher;
use ecount_core::series::TransformConfig;
use log::info;

/// One line per metric plus a domain line, for terminal output.
pub fn summarize(state: &ChartState) -> Vec<String> {
    let mut lines = Vec::new();
    match state.domain() {
        Some(domain) => lines.push(format!(
            "{} to {} (last sample {}), y ceiling {}",
            domain.start_date.date(),
            domain.end_date.date(),
            domain.last_sample.date(),
            domain.max_y
        )),
        None => lines.push("no usable rows".to_string()),
    }
    for series in state.series().iter() {
        let marker = if state.visibility().is_visible(&series.name) {
            "*"
        } else {
            " "
        };
        lines.push(format!(
            "{} {:<32} {:>5} points",
            marker,
            series.name,
            series.points.len()
        ));
    }
    lines
}

/// Serialize the current chart for `layout`, as SVG or as the JSON shape list.
pub fn render_document(state: &ChartState, layout: &ChartLayout, json: bool) -> anyhow::Result<String> {
    let scene = state.scene(layout, Utc::now().naive_utc());
    if json {
        Ok(scene.to_json()?)
    } else {
        Ok(scene.to_svg())
    }
}

/// Fetch a site once into a fresh chart state.
async fn load_site(settings: &Settings, site: &str) -> anyhow::Result<ChartState> {
    let fetcher = CsvFetcher::new(settings.base_url.clone());
    let mut cache = FileCache::new(&settings.cache_file);
    let mut state = ChartState::default();
    state.set_site(site);

    let mut fetch = |site_id: String| {
        let fetcher = fetcher.clone();
        async move { fetcher.fetch(&site_id).await }
    };
    match refresh_cycle(&mut state, &mut cache, &TransformConfig::default(), &mut fetch).await {
        RefreshOutcome::Applied => Ok(state),
        outcome => bail!("Could not load site {}: {:?}", site, outcome),
    }
}

pub async fn run_fetch(settings: &Settings, site: &str) -> anyhow::Result<()> {
    let state = load_site(settings, site).await?;
    for line in summarize(&state) {
        println!("{}", line);
    }
    Ok(())
}

pub async fn run_render(
    settings: &Settings,
    site: &str,
    output: &str,
    width: f64,
    height: f64,
    json: bool,
) -> anyhow::Result<()> {
    let state = load_site(settings, site).await?;
    let layout = ChartLayout::with_size(width, height);
    std::fs::write(output, render_document(&state, &layout, json)?)?;
    info!("Wrote chart for {} to {}", site, output);
    Ok(())
}
