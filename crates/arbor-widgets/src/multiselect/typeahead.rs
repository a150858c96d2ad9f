//! First-letter typeahead over visible options.
//!
//! Typing a character jumps to the first visible option whose label starts
//! with it. Typing the same character again cycles through the other
//! matches. The match list is cached per character and rebuilt whenever the
//! character changes or the cache is cleared (focus loss, arrow keys,
//! search).

use super::state::SelectionState;
use super::tree::{OptionId, OptionTree};

/// Typeahead cache. See the [module docs](self).
#[derive(Debug, Clone, Default)]
pub struct Typeahead {
    key: Option<String>,
    matches: Vec<OptionId>,
}

impl Typeahead {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `ch` drives typeahead: letters, digits, `-` and `_`.
    ///
    /// Space is deliberately excluded; it commits the active option.
    #[must_use]
    pub fn accepts(ch: char) -> bool {
        ch.is_alphanumeric() || matches!(ch, '-' | '_')
    }

    /// Character the cache was built for, lower-cased.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Cached matches for [`key`](Self::key).
    #[must_use]
    pub fn matches(&self) -> &[OptionId] {
        &self.matches
    }

    pub fn clear(&mut self) {
        self.key = None;
        self.matches.clear();
    }

    /// Compute the option to activate for a typed character.
    ///
    /// Returns `None` when `ch` is not a typeahead character or no visible
    /// option starts with it; the cache is left empty in the latter case.
    pub fn advance(
        &mut self,
        ch: char,
        active: Option<OptionId>,
        tree: &OptionTree,
        state: &SelectionState,
    ) -> Option<OptionId> {
        if !Self::accepts(ch) {
            return None;
        }
        let key: String = ch.to_lowercase().collect();
        if self.key.as_deref() != Some(key.as_str()) {
            self.clear();
        }

        if self.matches.is_empty() {
            self.matches.extend(
                state
                    .visible(tree)
                    .filter(|&id| tree.option(id).initial() == Some(key.as_str())),
            );
        }
        if self.matches.is_empty() {
            self.clear();
            return None;
        }

        let active_matches_key =
            active.is_some_and(|id| tree.option(id).initial() == Some(key.as_str()));
        let next = if active_matches_key {
            let position = active.and_then(|id| self.matches.iter().position(|&m| m == id));
            match position {
                Some(i) if i + 1 < self.matches.len() => self.matches[i + 1],
                _ => self.matches[0],
            }
        } else {
            self.matches[0]
        };

        self.key = Some(key);
        Some(next)
    }
}
