#![forbid(unsafe_code)]

//! Structured logging helpers.
//!
//! arbor logs through `tracing`. With the `tracing` feature enabled this
//! module re-exports the usual macros so downstream crates can write
//! `arbor_core::debug!` without a direct `tracing` dependency. Spans with
//! fields filled in later use [`field::Empty`].
//!
//! The `tracing-json` feature adds [`init_json_logging`], a one-call
//! subscriber setup that emits newline-delimited JSON filtered by
//! `RUST_LOG`. Hosts that already install their own subscriber should not
//! call it.

#[cfg(feature = "tracing")]
pub use tracing::{
    debug, debug_span, error, error_span, field, info, info_span, trace, trace_span, warn,
    warn_span,
};

/// Error returned when a global subscriber is already installed.
#[cfg(feature = "tracing-json")]
pub type InitError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Install a JSON `tracing` subscriber filtered by `RUST_LOG`.
///
/// Falls back to `warn` when `RUST_LOG` is unset or invalid.
#[cfg(feature = "tracing-json")]
pub fn init_json_logging() -> Result<(), InitError> {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
}
