//! Backing selection model: one `(value, selected)` pair per option, in
//! entry order, under the form field name.

use serde::Serialize;

use super::state::SelectionState;
use super::tree::OptionTree;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackingOption {
    pub value: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackingModel {
    pub name: String,
    pub options: Vec<BackingOption>,
}

impl BackingModel {
    #[must_use]
    pub fn from_state(name: &str, tree: &OptionTree, state: &SelectionState) -> Self {
        Self {
            name: name.to_owned(),
            options: tree
                .navigation_order()
                .iter()
                .map(|&id| BackingOption {
                    value: tree.option(id).value().to_owned(),
                    selected: state.is_selected(id),
                })
                .collect(),
        }
    }

    /// Selected values in entry order.
    pub fn selected_values(&self) -> impl Iterator<Item = &str> {
        self.options
            .iter()
            .filter(|o| o.selected)
            .map(|o| o.value.as_str())
    }

    /// `(name, value)` pairs a multi-valued form field submits.
    pub fn form_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.selected_values().map(|value| (self.name.as_str(), value))
    }
}
