use cadence_app::cli::{Args, read_rule};
use cadence_app::render::{expand, render};
use cadence_core::config::load_config;
use cadence_core::constants::DEFAULT_LOG_LEVEL;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new(DEFAULT_LOG_LEVEL));

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

    let args = Args::parse();
    let config = load_config()?;

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping default");
    }

    let spec = read_rule(&args.rule)?;
    let occurrences = expand(spec, &config, args.start, args.count)?;

    tracing::debug!(count = occurrences.len(), "Expanded occurrences");
    println!("{}", render(&occurrences, args.json)?);

    Ok(())
}
