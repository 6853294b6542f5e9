//! ecount CLI - fetch, render and watch enterococcus count charts.

use clap::Parser;
use log::debug;

#[derive(Parser)]
#[command(
    name = "ecount-cli",
    version,
    about = "Enterococcus count chart toolkit"
)]
struct Cli {
    #[command(flatten)]
    settings: ecount_cmd::Settings,

    #[command(subcommand)]
    command: ecount_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    debug!("Using {} with cache {}", cli.settings.base_url, cli.settings.cache_file);
    ecount_cmd::run(cli.settings, cli.command).await
}
