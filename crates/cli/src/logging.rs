//! `tracing-subscriber` bootstrap.
//!
//! Logs always go to stderr so stdout carries only the plan/apply report.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::cli::LogFormat;

/// Filter directive for a `-v` count. `None` defers to `RUST_LOG`.
pub fn filter_directive(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        // HTTP stack noise stays at warn even in debug mode.
        _ => Some("debug,hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn,h2=warn"),
    }
}

pub fn init(format: LogFormat, verbose: u8) {
    let filter = match filter_directive(verbose) {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    let layer = match format {
        LogFormat::Text => fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(layer.with_filter(filter))
        .init();
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
