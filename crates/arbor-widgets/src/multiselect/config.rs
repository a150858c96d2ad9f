//! Construction-time configuration.
//!
//! # Environment Variables
//!
//! | Variable | Type | Default | Description |
//! |----------|------|---------|-------------|
//! | `ARBOR_LEVEL_POLICY` | string | "strict" | `strict` rejects malformed levels, `lenient`/`clamp` clamps them |
//! | `ARBOR_SEARCH_DEBOUNCE_MS` | u64 | 200 | Quiet period before search fires |

use arbor_core::debounce::DebounceConfig;

/// How the builder treats an entry nested too deep for its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LevelPolicy {
    /// Fail construction with a structure error.
    #[default]
    Strict,

    /// Clamp the level to the deepest legal value and log a warning.
    Lenient,
}

impl LevelPolicy {
    /// Parse from string (environment variable value).
    #[must_use]
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "strict" | "reject" => Some(Self::Strict),
            "lenient" | "clamp" => Some(Self::Lenient),
            _ => None,
        }
    }
}

/// Display strings, identity, and behavior switches for one widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiSelectConfig {
    /// Id of the visible field label. Also the default id stem.
    pub label_id: String,
    /// Text of the visible field label.
    pub label_text: String,
    /// Accessible label of the option list.
    pub list_label: String,
    /// Text of the clear-all button.
    pub clear_text: String,
    /// Placeholder of the search input.
    pub placeholder: String,
    /// Name of the backing selection model (the form field name).
    pub name: String,
    /// Explicit component id; `"<label_id>_fms"` when `None`.
    pub component_id: Option<String>,
    /// Malformed level handling.
    pub level_policy: LevelPolicy,
    /// Search debounce timing.
    pub debounce: DebounceConfig,
}

impl MultiSelectConfig {
    /// Create a config with empty display strings.
    #[must_use]
    pub fn new(label_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            label_id: label_id.into(),
            label_text: String::new(),
            list_label: String::new(),
            clear_text: String::new(),
            placeholder: String::new(),
            name: name.into(),
            component_id: None,
            level_policy: LevelPolicy::default(),
            debounce: DebounceConfig::default(),
        }
    }

    #[must_use]
    pub fn with_label_text(mut self, text: impl Into<String>) -> Self {
        self.label_text = text.into();
        self
    }

    #[must_use]
    pub fn with_list_label(mut self, text: impl Into<String>) -> Self {
        self.list_label = text.into();
        self
    }

    #[must_use]
    pub fn with_clear_text(mut self, text: impl Into<String>) -> Self {
        self.clear_text = text.into();
        self
    }

    #[must_use]
    pub fn with_placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = text.into();
        self
    }

    #[must_use]
    pub fn with_component_id(mut self, id: impl Into<String>) -> Self {
        self.component_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_level_policy(mut self, policy: LevelPolicy) -> Self {
        self.level_policy = policy;
        self
    }

    #[must_use]
    pub fn with_debounce(mut self, debounce: DebounceConfig) -> Self {
        self.debounce = debounce;
        self
    }

    /// Overlay environment settings on top of this config.
    ///
    /// Reads `ARBOR_LEVEL_POLICY` and `ARBOR_SEARCH_DEBOUNCE_MS`. Unset or
    /// unknown values leave the current setting in place.
    #[must_use]
    pub fn from_env(mut self) -> Self {
        if let Ok(val) = std::env::var("ARBOR_LEVEL_POLICY")
            && let Some(policy) = LevelPolicy::from_str_opt(&val)
        {
            self.level_policy = policy;
        }
        self.debounce = self.debounce.with_env_overrides();
        self
    }

    /// The id all option ids are derived from.
    #[must_use]
    pub fn resolved_component_id(&self) -> String {
        match &self.component_id {
            Some(id) if !id.is_empty() => id.clone(),
            _ => format!("{}_fms", self.label_id),
        }
    }
}
