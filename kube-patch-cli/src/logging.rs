use std::io::IsTerminal as _;

use anyhow::Result;
use clap::ColorChoice;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    fmt::Layer as FmtLayer, layer::SubscriberExt as _, Layer as _, Registry,
};

pub(crate) struct Options {
    pub verbose: bool,
    pub color: ColorChoice,
}

/// Log to stderr; stdout is reserved for the command output.
pub(crate) fn set_up(options: &Options) -> Result<()> {
    let filter = if options.verbose {
        LevelFilter::TRACE
    } else {
        LevelFilter::INFO
    };

    let ansi = match options.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => std::io::stderr().is_terminal(),
    };

    let fmt_layer = FmtLayer::new()
        .with_writer(std::io::stderr)
        .with_ansi(ansi)
        .with_filter(filter);
    let subscriber = Registry::default().with(fmt_layer);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("failed to set up tracing: {}", e))?;

    Ok(())
}
