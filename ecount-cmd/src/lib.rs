//! Command implementations for the ecount CLI.
//!
//! Provides subcommands to inspect a site's series, render its chart to SVG,
//! and keep that chart refreshed on a timer.

use clap::{Args, Subcommand};
use ecount_core::fetch::DEFAULT_BASE_URL;

pub mod refresh;
pub mod render;
pub mod watch;

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct Settings {
    /// Directory URL the `<siteId>.csv` files are published under
    #[arg(long, global = true, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// JSON file holding the last fetch date per site
    #[arg(long, global = true, default_value = ".ecount-cache.json")]
    pub cache_file: String,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch a site's CSV once and print its series summary
    Fetch {
        /// Site identifier, e.g. GAL001
        #[arg(short, long)]
        site: String,
    },

    /// Fetch a site's CSV once and write the chart as SVG
    Render {
        #[arg(short, long)]
        site: String,

        /// Output path for the SVG document
        #[arg(short, long)]
        output: String,

        #[arg(long, default_value_t = 500.0)]
        width: f64,

        #[arg(long, default_value_t = 400.0)]
        height: f64,

        /// Write the shape list as JSON instead of SVG
        #[arg(long)]
        json: bool,
    },

    /// Refresh a site's chart periodically, rewriting the SVG after each cycle
    Watch {
        #[arg(short, long)]
        site: String,

        #[arg(short, long)]
        output: String,

        #[arg(long, default_value_t = 500.0)]
        width: f64,

        #[arg(long, default_value_t = 400.0)]
        height: f64,

        /// Minutes between fetches
        #[arg(long, default_value_t = 30)]
        interval_mins: u64,

        /// Stop after this many cycles
        #[arg(long)]
        max_cycles: Option<u64>,
    },
}

pub async fn run(settings: Settings, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Fetch { site } => render::run_fetch(&settings, &site).await,
        Command::Render {
            site,
            output,
            width,
            height,
            json,
        } => render::run_render(&settings, &site, &output, width, height, json).await,
        Command::Watch {
            site,
            output,
            width,
            height,
            interval_mins,
            max_cycles,
        } => {
            watch::run_watch(
                &settings,
                &site,
                &output,
                width,
                height,
                interval_mins,
                max_cycles,
            )
            .await
        }
    }
}
