use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

use cardwire_core::config::load_config;

mod cli;

fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    let cli = cli::Cli::parse();

    let settings = load_config(cli.config.as_deref())?;

    let level = cli.log_level.as_deref().unwrap_or(settings.logging.level.as_str());
    if let Ok(filter) = EnvFilter::try_new(level) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter");
        }
    } else {
        tracing::warn!(level = %level, "Invalid log level, keeping info");
    }

    tracing::debug!(settings = ?settings, "Configuration loaded");

    cli::run(cli.command, &settings)
}
