#![forbid(unsafe_code)]

//! Single-slot debounce timer.
//!
//! A [`Debouncer`] holds at most one pending value. Scheduling a new value
//! replaces the pending one and restarts the quiet period, so only the last
//! value of a burst is ever delivered. There is no explicit cancellation
//! token: superseding *is* cancellation.
//!
//! The timer never reads the clock itself. Callers pass `now` into
//! [`schedule`](Debouncer::schedule) and [`poll`](Debouncer::poll), which keeps
//! it deterministic under test and usable on hosts without a global clock.
//!
//! # State Machine
//!
//! ```text
//!              schedule(v)               poll(now >= deadline)
//! ┌──────┐ ─────────────────▶ ┌─────────┐ ─────────────────────▶ emit(v)
//! │ Idle │                    │ Pending │                          │
//! └──────┘ ◀───────────────── └─────────┘ ◀──┐                     │
//!    ▲          cancel()          │          │ schedule(v')        │
//!    │                            └──────────┘ (restart timer)     │
//!    └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use std::time::{Duration, Instant};
//! use arbor_core::debounce::{DebounceConfig, Debouncer};
//!
//! let mut search = Debouncer::new(DebounceConfig::default());
//! let t0 = Instant::now();
//!
//! search.schedule("f".to_string(), t0);
//! search.schedule("fi".to_string(), t0 + Duration::from_millis(50));
//!
//! // Quiet period restarts on every keystroke.
//! assert_eq!(search.poll(t0 + Duration::from_millis(200)), None);
//! assert_eq!(
//!     search.poll(t0 + Duration::from_millis(250)),
//!     Some("fi".to_string())
//! );
//! ```

use web_time::{Duration, Instant};

// ---------------------------------------------------------------------------
// Configuration Constants
// ---------------------------------------------------------------------------

/// Default quiet period before a debounced search fires.
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 200;

/// Minimum allowed quiet period (fire on next poll).
pub const MIN_SEARCH_DEBOUNCE_MS: u64 = 0;

/// Maximum allowed quiet period.
pub const MAX_SEARCH_DEBOUNCE_MS: u64 = 2_000;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for a [`Debouncer`].
///
/// # Environment Variables
///
/// | Variable | Type | Default | Description |
/// |----------|------|---------|-------------|
/// | `ARBOR_SEARCH_DEBOUNCE_MS` | u64 | 200 | Quiet period before search fires |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceConfig {
    /// Time that must pass after the last `schedule` before the value fires.
    /// Default: 200ms.
    pub quiet_period: Duration,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            quiet_period: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
        }
    }
}

impl DebounceConfig {
    /// Set a custom quiet period.
    #[must_use]
    pub fn with_quiet_period(mut self, quiet_period: Duration) -> Self {
        self.quiet_period = quiet_period;
        self
    }

    /// Load config from environment variables.
    ///
    /// Reads `ARBOR_SEARCH_DEBOUNCE_MS`. Unparseable values are ignored and
    /// the result is clamped to the valid range.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_overrides().validated()
    }

    /// Replace the quiet period with `ARBOR_SEARCH_DEBOUNCE_MS`, clamped,
    /// when it is set and parses. Otherwise `self` is returned unchanged.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        match std::env::var("ARBOR_SEARCH_DEBOUNCE_MS") {
            Ok(val) => match val.trim().parse::<u64>() {
                Ok(ms) => self.with_quiet_period(Duration::from_millis(ms)).validated(),
                Err(_) => self,
            },
            Err(_) => self,
        }
    }

    /// Clamp the quiet period to 0-2000ms.
    ///
    /// ```
    /// use arbor_core::debounce::DebounceConfig;
    /// use std::time::Duration;
    ///
    /// let config = DebounceConfig::default()
    ///     .with_quiet_period(Duration::from_secs(10))
    ///     .validated();
    /// assert_eq!(config.quiet_period.as_millis(), 2_000);
    /// ```
    #[must_use]
    pub fn validated(mut self) -> Self {
        let ms = u64::try_from(self.quiet_period.as_millis()).unwrap_or(u64::MAX);
        let clamped = ms.clamp(MIN_SEARCH_DEBOUNCE_MS, MAX_SEARCH_DEBOUNCE_MS);
        self.quiet_period = Duration::from_millis(clamped);
        self
    }

    /// Check if the quiet period is within the valid range.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let ms = u64::try_from(self.quiet_period.as_millis()).unwrap_or(u64::MAX);
        (MIN_SEARCH_DEBOUNCE_MS..=MAX_SEARCH_DEBOUNCE_MS).contains(&ms)
    }
}

// ---------------------------------------------------------------------------
// Debouncer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot<T> {
    Idle,
    Pending { value: T, scheduled_at: Instant },
}

/// Cancellable single-slot timer. See the [module docs](self).
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    config: DebounceConfig,
    slot: Slot<T>,
}

impl<T> Debouncer<T> {
    /// Create an idle debouncer.
    #[must_use]
    pub fn new(config: DebounceConfig) -> Self {
        Self {
            config,
            slot: Slot::Idle,
        }
    }

    /// Create an idle debouncer with the default 200ms quiet period.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(DebounceConfig::default())
    }

    /// Schedule `value`, replacing any pending one and restarting the timer.
    ///
    /// Returns `true` when a pending value was superseded.
    pub fn schedule(&mut self, value: T, now: Instant) -> bool {
        let superseded = self.is_pending();
        self.slot = Slot::Pending {
            value,
            scheduled_at: now,
        };
        superseded
    }

    /// Deliver the pending value once its quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let Slot::Pending { scheduled_at, .. } = &self.slot else {
            return None;
        };
        if now.saturating_duration_since(*scheduled_at) < self.config.quiet_period {
            return None;
        }
        self.take()
    }

    /// Deliver the pending value immediately, ignoring the timer.
    pub fn flush(&mut self) -> Option<T> {
        self.take()
    }

    /// Drop the pending value, if any.
    pub fn cancel(&mut self) {
        self.slot = Slot::Idle;
    }

    /// Whether a value is waiting for its quiet period.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self.slot, Slot::Pending { .. })
    }

    /// Instant at which the pending value becomes deliverable.
    ///
    /// Hosts with a real timer can arm it for this instant instead of
    /// polling on every tick.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        match &self.slot {
            Slot::Idle => None,
            Slot::Pending { scheduled_at, .. } => Some(*scheduled_at + self.config.quiet_period),
        }
    }

    /// Get a reference to the current configuration.
    #[must_use]
    pub fn config(&self) -> &DebounceConfig {
        &self.config
    }

    /// Update the configuration. Does not reset the pending value.
    pub fn set_config(&mut self, config: DebounceConfig) {
        self.config = config;
    }

    fn take(&mut self) -> Option<T> {
        match std::mem::replace(&mut self.slot, Slot::Idle) {
            Slot::Idle => None,
            Slot::Pending { value, .. } => Some(value),
        }
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::with_defaults()
    }
}
