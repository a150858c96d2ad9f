//! Hierarchical multi-select with filtering and keyboard navigation.
//!
//! A flat list of [`Entry`] records carrying a nesting `level` is built once
//! into an [`OptionTree`]. Everything that changes afterwards lives in
//! [`SelectionState`], and [`MultiSelect`] maps host input onto it.
//!
//! ```
//! use arbor_widgets::multiselect::{Entry, MultiSelect, MultiSelectConfig};
//!
//! let mut ms = MultiSelect::new(
//!     MultiSelectConfig::new("region", "region[]"),
//!     &[
//!         Entry::new("Europe", "eu"),
//!         Entry::new("Finland", "fi").with_level(1),
//!         Entry::new("Sweden", "se").with_level(1),
//!     ],
//! )?;
//! ms.apply_filter("swe");
//! assert_eq!(ms.state().visible(ms.tree()).count(), 2);
//! # Ok::<(), arbor_widgets::multiselect::MultiSelectError>(())
//! ```

pub mod a11y;
pub mod config;
pub mod controller;
pub mod entry;
pub mod error;
pub mod model;
pub mod state;
pub mod tree;
pub mod typeahead;

pub use a11y::{
    AccessibilitySnapshot, AccessibleOption, ButtonSemantics, LabelSemantics, ListboxSemantics,
    NodeUpdate, SearchSemantics,
};
pub use config::{LevelPolicy, MultiSelectConfig};
pub use controller::{MultiSelect, Notification};
pub use entry::{Entry, parse_entries};
pub use error::{MultiSelectError, Result};
pub use model::{BackingModel, BackingOption};
pub use state::{FilterOutcome, NodeRef, SelectionState};
pub use tree::{GroupId, GroupNode, OptionId, OptionNode, OptionRole, OptionTree, TreeBuilder};
pub use typeahead::Typeahead;
