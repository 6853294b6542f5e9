//! Enterococcus count chart for one sampling site.
//!
//! Data flow:
//! 1. The site comes from `?site=` in the page URL, or the site input.
//! 2. Whenever the site changes, a fetch loop starts for it: fetch the
//!    site's CSV now, then every 30 minutes. The previous site's loop is
//!    dropped with its resource.
//! 3. Each successful cycle replaces the chart's series wholesale and
//!    records today's date in `localStorage`; a failed one leaves the chart
//!    as it was and shows the error.

mod bridge;
mod components;
mod state;

use bridge::LocalStorageCache;
use chrono::Utc;
use components::{GraphSvg, LegendDropdown, SiteSelector, StatusLine, TooltipCard};
use dioxus::prelude::*;
use ecount_chart::refresh::{apply_refresh, RefreshOutcome};
use ecount_core::cache::LastFetchCache;
use ecount_core::fetch::{cache_busting_url, DEFAULT_BASE_URL};
use ecount_core::series::TransformConfig;
use state::{AppState, DEFAULT_SITE};

const REFRESH_INTERVAL_MS: i32 = 30 * 60 * 1000;

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname("ecount-graph-root"))
        .launch(App);
}

/// One fetch cycle for whatever site the chart currently follows.
async fn refresh_once(mut state: AppState) {
    let ticket = state.chart.write().begin_fetch();
    let Some(ticket) = ticket else {
        return;
    };

    let mut cache = LocalStorageCache;
    match cache.last_fetch_date(&ticket.site_id) {
        Ok(Some(date)) => log::info!("{} last fetched on {}", ticket.site_id, date),
        Ok(None) => log::info!("{} has no recorded fetch", ticket.site_id),
        Err(e) => log::warn!("Could not read fetch cache: {}", e),
    }

    let url = cache_busting_url(DEFAULT_BASE_URL, &ticket.site_id);
    let fetched = bridge::fetch_text(&url).await;
    let error = fetched.as_ref().err().map(|e| e.to_string());
    let outcome = apply_refresh(
        &mut *state.chart.write(),
        &mut cache,
        &ticket,
        fetched,
        &TransformConfig::default(),
        Utc::now().date_naive(),
    );

    match outcome {
        RefreshOutcome::Applied => {
            state.error_msg.set(None);
            state.loading.set(false);
        }
        RefreshOutcome::Failed => {
            let message = error.unwrap_or_else(|| "site data could not be read".to_string());
            state.error_msg.set(Some(message));
            state.loading.set(false);
        }
        RefreshOutcome::Stale | RefreshOutcome::Idle => {}
    }
}

async fn follow_site(mut state: AppState, site: String) {
    state.chart.write().set_site(&site);
    state.loading.set(true);
    loop {
        refresh_once(state).await;
        bridge::sleep_ms(REFRESH_INTERVAL_MS).await;
    }
}

#[component]
fn App() -> Element {
    let state = use_context_provider(|| {
        AppState::new(bridge::site_from_location().unwrap_or_else(|| DEFAULT_SITE.to_string()))
    });

    // Restarted (and the old loop dropped) whenever the site changes
    let _refresh = use_resource(move || async move {
        let site = (state.site)();
        follow_site(state, site).await;
    });

    rsx! {
        div {
            style: "font-family: sans-serif; max-width: 540px; margin: 0 auto; padding: 12px;",
            h3 {
                style: "margin: 0 0 4px 0; font-size: 16px;",
                "Enterococcus counts"
            }
            SiteSelector {}
            LegendDropdown {}
            StatusLine {}
            div {
                style: "position: relative;",
                GraphSvg {}
                TooltipCard {}
            }
        }
    }
}
