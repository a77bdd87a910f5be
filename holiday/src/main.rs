use std::sync::Arc;

use clap::Parser;
use holiday::core::errors::Result;
use holiday::core::SystemClock;
use holiday::data::{HolidaySource, SourceConfig};
use holiday::engine::HolidayEngine;
use holiday::{preprocess_args, Cli, SettingsStore};
use tracing_subscriber::EnvFilter;

/// Log filter, e.g. `HOLIDAY_LOG=debug`.
const LOG_ENV: &str = "HOLIDAY_LOG";

/// Overrides the dataset base URL.
const BASE_URL_ENV: &str = "HOLIDAY_API_BASE_URL";

#[tokio::main]
async fn main() {
    init_logging();
    let cli = Cli::parse_from(preprocess_args(std::env::args().collect()));
    if let Err(err) = execute(cli).await {
        eprintln!("error: {err}");
        std::process::exit(err.exit_code().code());
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn execute(cli: Cli) -> Result<()> {
    let mut config = SourceConfig::default();
    if let Ok(url) = std::env::var(BASE_URL_ENV) {
        config = config.with_base_url(url);
    }
    let clock = SystemClock::shared();
    let source = Arc::new(HolidaySource::http(config, clock.clone())?);
    let engine = HolidayEngine::new(source, clock);

    let mut settings = SettingsStore::open_default().unwrap_or_else(|err| {
        tracing::warn!(%err, "ignoring unreadable settings");
        SettingsStore::detached()
    });

    let mut out = std::io::stdout().lock();
    holiday::run(cli, &engine, &mut settings, &mut out).await
}
