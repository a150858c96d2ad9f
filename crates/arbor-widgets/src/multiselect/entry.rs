//! Input records for the multi-select.
//!
//! An [`Entry`] is one selectable label with its form value, initial
//! selection, and nesting depth. Order matters: the sequence is both the
//! document order and the only place hierarchy is encoded.
//!
//! Entries usually arrive as JSON from a server template:
//!
//! ```
//! use arbor_widgets::multiselect::parse_entries;
//!
//! let entries = parse_entries(r#"[
//!     {"displayText": "Europe", "value": "eu", "selected": false, "level": 0},
//!     {"displayText": "Finland", "value": "fi", "selected": true, "level": "1"},
//!     {"displayText": "Asia", "value": "as"}
//! ]"#).unwrap();
//!
//! assert_eq!(entries[1].level, 1);
//! assert_eq!(entries[2].level, 0);
//! ```

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use super::error::Result;

/// One input record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Text shown to the user and matched by search and typeahead.
    pub display_text: String,
    /// Value submitted with the form when selected.
    #[serde(deserialize_with = "deserialize_value")]
    pub value: String,
    /// Initial selection.
    #[serde(default)]
    pub selected: bool,
    /// Nesting depth; 0 is the root. Missing means 0.
    #[serde(default, deserialize_with = "deserialize_level")]
    pub level: u32,
}

impl Entry {
    /// Create an unselected root-level entry.
    #[must_use]
    pub fn new(display_text: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            display_text: display_text.into(),
            value: value.into(),
            selected: false,
            level: 0,
        }
    }

    /// Set the nesting depth.
    #[must_use]
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// Set the initial selection.
    #[must_use]
    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

/// Decode a JSON array of entries.
pub fn parse_entries(json: &str) -> Result<Vec<Entry>> {
    Ok(serde_json::from_str(json)?)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LevelRepr {
    Number(u32),
    Text(String),
}

// Templates emit levels both as numbers and as numeric strings.
fn deserialize_level<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<LevelRepr>::deserialize(deserializer)? {
        None => Ok(0),
        Some(LevelRepr::Number(level)) => Ok(level),
        Some(LevelRepr::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(0);
            }
            text.parse::<u32>()
                .map_err(|_| de::Error::custom(format!("invalid level `{text}`")))
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ValueRepr {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

fn deserialize_value<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match ValueRepr::deserialize(deserializer)? {
        ValueRepr::Text(text) => text,
        ValueRepr::Integer(n) => n.to_string(),
        ValueRepr::Float(n) => n.to_string(),
        ValueRepr::Bool(b) => b.to_string(),
    })
}
