//! Accessibility projection of the widget.
//!
//! The snapshot describes what assistive technology must be able to see,
//! independent of the markup a host renders it into:
//!
//! - the option list is a multi-selectable listbox that names its active
//!   descendant;
//! - every visible option exposes its selected state and whether it is the
//!   active one;
//! - every parent option exposes whether its group is expanded;
//! - the search input names the active option too, so a screen reader
//!   following the input announces keyboard moves in the list.
//!
//! Hidden options are left out entirely.
//!
//! For incremental rendering use [`node_update`] on the handles drained from
//! the change set instead of rebuilding the whole snapshot.

use serde::Serialize;

use super::config::MultiSelectConfig;
use super::state::{NodeRef, SelectionState};
use super::tree::{OptionId, OptionRole, OptionTree};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessibilitySnapshot {
    pub label: LabelSemantics,
    pub search: SearchSemantics,
    pub listbox: ListboxSemantics,
    pub clear_button: ButtonSemantics,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelSemantics {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchSemantics {
    /// Id of the element labelling the input.
    pub labelled_by: String,
    pub placeholder: String,
    /// Text as typed, ahead of the debounce.
    pub value: String,
    /// Normalized query of the last applied filter.
    pub query: String,
    pub active_descendant: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListboxSemantics {
    pub id: String,
    pub label: String,
    pub multiselectable: bool,
    pub active_descendant: Option<String>,
    /// Visible level-0 options with their visible subtrees.
    pub options: Vec<AccessibleOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ButtonSemantics {
    pub text: String,
}

/// One visible option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessibleOption {
    pub id: String,
    pub label: String,
    pub selected: bool,
    pub active: bool,
    /// Nesting depth, for indentation.
    pub level: u32,
    /// `Some` for parents: whether the group is expanded.
    pub expanded: Option<bool>,
    /// Visible options of the owned group.
    pub children: Vec<AccessibleOption>,
}

/// Fresh observable fields of one changed node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeUpdate {
    Option {
        id: String,
        hidden: bool,
        selected: bool,
        active: bool,
    },
    Group {
        /// Id of the parent option carrying the expanded state.
        owner_id: String,
        expanded: bool,
    },
}

/// Build the full snapshot. `search_text` is the raw input value.
#[must_use]
pub fn snapshot(
    config: &MultiSelectConfig,
    tree: &OptionTree,
    state: &SelectionState,
    search_text: &str,
) -> AccessibilitySnapshot {
    let active_descendant = state.active().map(|id| tree.option(id).id().to_owned());
    AccessibilitySnapshot {
        label: LabelSemantics {
            id: config.label_id.clone(),
            text: config.label_text.clone(),
        },
        search: SearchSemantics {
            labelled_by: config.label_id.clone(),
            placeholder: config.placeholder.clone(),
            value: search_text.to_owned(),
            query: state.query().to_owned(),
            active_descendant: active_descendant.clone(),
        },
        listbox: ListboxSemantics {
            id: tree.component_id().to_owned(),
            label: config.list_label.clone(),
            multiselectable: true,
            active_descendant,
            options: visible_options(tree, state, tree.root()),
        },
        clear_button: ButtonSemantics {
            text: config.clear_text.clone(),
        },
    }
}

fn visible_options(
    tree: &OptionTree,
    state: &SelectionState,
    ids: &[OptionId],
) -> Vec<AccessibleOption> {
    ids.iter()
        .copied()
        .filter(|&id| state.is_visible(id))
        .map(|id| {
            let mut option = option_semantics(tree, state, id);
            if let Some(group) = tree.option(id).group() {
                option.children = visible_options(tree, state, tree.group(group).children());
            }
            option
        })
        .collect()
}

/// Semantics of a single option without its subtree.
#[must_use]
pub fn option_semantics(
    tree: &OptionTree,
    state: &SelectionState,
    id: OptionId,
) -> AccessibleOption {
    let node = tree.option(id);
    let expanded = node
        .role()
        .contains(OptionRole::PARENT)
        .then(|| node.group().is_some_and(|g| state.is_expanded(g)));
    AccessibleOption {
        id: node.id().to_owned(),
        label: node.label().to_owned(),
        selected: state.is_selected(id),
        active: state.active() == Some(id),
        level: node.level(),
        expanded,
        children: Vec::new(),
    }
}

/// Observable fields of a node reported by the change set.
#[must_use]
pub fn node_update(tree: &OptionTree, state: &SelectionState, node: NodeRef) -> NodeUpdate {
    match node {
        NodeRef::Option(id) => NodeUpdate::Option {
            id: tree.option(id).id().to_owned(),
            hidden: state.is_hidden(id),
            selected: state.is_selected(id),
            active: state.active() == Some(id),
        },
        NodeRef::Group(group) => NodeUpdate::Group {
            owner_id: tree.option(tree.group(group).owner()).id().to_owned(),
            expanded: state.is_expanded(group),
        },
    }
}
