//! Error taxonomy for the multi-select widget.
//!
//! Every variant describes a deterministic input-shape problem. Nothing here
//! is transient, so nothing is retried.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MultiSelectError>;

#[derive(Debug, Error)]
pub enum MultiSelectError {
    /// An entry is nested two or more levels below its predecessor, or the
    /// first entry is not at level 0.
    #[error("malformed level sequence at entry {index}: level {level} may not follow level {previous}")]
    Structure {
        index: usize,
        level: u32,
        previous: u32,
    },

    /// An operation addressed a node id that does not exist.
    #[error("no option with id `{id}`")]
    NotFound { id: String },

    /// Activation target is hidden or does not exist.
    #[error("cannot activate `{id}`: {reason}")]
    InvalidState { id: String, reason: &'static str },

    /// The entry payload could not be decoded.
    #[error("invalid entry list: {0}")]
    Entries(#[from] serde_json::Error),
}

impl MultiSelectError {
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    #[must_use]
    pub fn invalid_state(id: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidState {
            id: id.into(),
            reason,
        }
    }

    /// Whether the error was raised while building the tree.
    #[must_use]
    pub fn is_construction(&self) -> bool {
        matches!(self, Self::Structure { .. } | Self::Entries(_))
    }
}

#[cfg(test)]
mod tests {
    use super::MultiSelectError;

    #[test]
    fn structure_message_names_position_and_levels() {
        let err = MultiSelectError::Structure {
            index: 3,
            level: 2,
            previous: 0,
        };
        assert_eq!(
            err.to_string(),
            "malformed level sequence at entry 3: level 2 may not follow level 0"
        );
        assert!(err.is_construction());
    }

    #[test]
    fn runtime_errors_are_not_construction_errors() {
        let err = MultiSelectError::not_found("x_opt_9");
        assert_eq!(err.to_string(), "no option with id `x_opt_9`");
        assert!(!err.is_construction());

        let err = MultiSelectError::invalid_state("x_opt_1", "option is hidden");
        assert_eq!(err.to_string(), "cannot activate `x_opt_1`: option is hidden");
    }

    #[test]
    fn json_errors_convert() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: MultiSelectError = json_err.into();
        assert!(matches!(err, MultiSelectError::Entries(_)));
    }
}
