#![forbid(unsafe_code)]

//! arbor public facade crate.
//!
//! Re-exports the input events, the multi-select widget, and its
//! configuration behind one dependency, plus a prelude for hosts.
//!
//! ```
//! use arbor::prelude::*;
//!
//! let mut ms = MultiSelect::from_json(
//!     MultiSelectConfig::new("format", "format[]"),
//!     r#"[{"displayText":"Books","value":"0/Book/"},
//!         {"displayText":"E-books","value":"1/Book/eBook/","level":1}]"#,
//! )?;
//! ms.handle_event(&Event::Focus(true))?;
//! ms.handle_key(&KeyEvent::new(KeyCode::Enter));
//! assert_eq!(ms.backing_model().selected_values().count(), 1);
//! # Ok::<(), arbor::Error>(())
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use arbor_core::debounce::{DebounceConfig, Debouncer};
pub use arbor_core::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, Modifiers, PointerEvent, PointerEventKind,
};

// --- Widget re-exports -----------------------------------------------------

pub use arbor_widgets::multiselect::{
    AccessibilitySnapshot, AccessibleOption, BackingModel, BackingOption, Entry, FilterOutcome,
    LevelPolicy, MultiSelect, MultiSelectConfig, MultiSelectError, NodeRef, NodeUpdate,
    Notification,
};

pub use web_time::Instant;

// --- Errors ---------------------------------------------------------------

/// Top-level error type for arbor hosts.
#[derive(Debug)]
pub enum Error {
    /// Widget construction or operation failed.
    Widget(MultiSelectError),
    /// Logging could not be initialized.
    Logging(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Widget(err) => write!(f, "{err}"),
            Self::Logging(msg) => write!(f, "logging: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Widget(err) => Some(err),
            Self::Logging(_) => None,
        }
    }
}

impl From<MultiSelectError> for Error {
    fn from(err: MultiSelectError) -> Self {
        Self::Widget(err)
    }
}

/// Standard result type for arbor APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Install the JSON log subscriber.
#[cfg(feature = "tracing-json")]
pub fn init_logging() -> Result<()> {
    arbor_core::logging::init_json_logging().map_err(|err| Error::Logging(err.to_string()))
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Entry, Error, Event, Instant, KeyCode, KeyEvent, LevelPolicy, Modifiers, MultiSelect,
        MultiSelectConfig, Notification, PointerEvent, PointerEventKind, Result,
    };

    pub use crate::{core, widgets};
}

pub use arbor_core as core;
pub use arbor_widgets as widgets;
