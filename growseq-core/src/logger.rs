//! Logging setup using tracing.
//!
//! The sequence types report failed operations through `tracing` events at
//! `warn` level and lifecycle events at `debug`/`trace`. This module installs
//! a subscriber that prints them to stderr and forwards `log` crate records
//! to tracing.
//!
//! # Example
//!
//! ```ignore
//! use growseq_core::logger::init_logging;
//! use tracing::info;
//!
//! // Initialize logging (call once at startup)
//! init_logging("growseq");
//! info!("ready");
//! ```

use std::sync::OnceLock;

use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize logging.
///
/// This sets up:
/// 1. A subscriber writing to stderr, filtered by `RUST_LOG` (default `info`)
/// 2. A bridge that forwards `log` crate calls to tracing
///
/// `name` is recorded once at `debug` level so interleaved output from several
/// tools can be told apart. Subsequent calls are ignored.
pub fn init_logging(name: &str) {
    LOGGER_INITIALIZED.get_or_init(|| {
        tracing_log::LogTracer::init().ok();

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let fmt_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_file(true)
            .with_line_number(true)
            .with_span_events(FmtSpan::NONE)
            .with_writer(std::io::stderr);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
            .ok();

        tracing::debug!(logger = name, "logging initialized");
    });
}

/// Re-export tracing macros for convenience.
pub use tracing::{debug, error, info, trace, warn};
