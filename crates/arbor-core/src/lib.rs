#![forbid(unsafe_code)]

//! Core: input events, timers, and logging for arbor widgets.
//!
//! # Role in arbor
//! `arbor-core` is the input layer. It owns the normalized event types that
//! widgets consume and the small timing primitives (debounce) that the
//! widgets need but should not implement against a particular clock.
//!
//! # Primary responsibilities
//! - **Event**: canonical input events (keys, pointer, focus).
//! - **Debouncer**: single-slot, caller-clocked debounce timer.
//! - **Logging**: `tracing` re-exports and an optional JSON subscriber.
//!
//! # How it fits in the system
//! Widgets (`arbor-widgets`) consume `arbor_core::event::Event` values; the
//! host translates its native events (DOM, terminal) into them and drives
//! the widget's timers with its own notion of "now".

pub mod debounce;
pub mod event;
pub mod logging;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
