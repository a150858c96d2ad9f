//! Selection and visibility state.
//!
//! [`SelectionState`] owns everything about a widget that changes after
//! construction: per-option `selected` and `hidden` flags, per-group
//! `expanded` flags, and the single optional active option. The tree itself
//! never changes.
//!
//! # Invariants
//!
//! - `selected` changes only through [`toggle_selected`] and [`clear_all`].
//! - `hidden` and `expanded` change only through [`apply_filter`].
//! - The active option, when set, was visible at the moment it was set.
//!
//! Every flag write that actually changes a value records the node in a
//! change set; [`take_changes`] drains it so a renderer touches only those
//! nodes.
//!
//! [`toggle_selected`]: SelectionState::toggle_selected
//! [`clear_all`]: SelectionState::clear_all
//! [`apply_filter`]: SelectionState::apply_filter
//! [`take_changes`]: SelectionState::take_changes

use std::collections::BTreeSet;

use super::error::{MultiSelectError, Result};
use super::tree::{GroupId, OptionId, OptionTree};

/// A node whose observable fields changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeRef {
    Option(OptionId),
    Group(GroupId),
}

/// Result of one filter application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOutcome {
    /// Normalized (trimmed, lower-cased) query.
    pub query: String,
    /// Options whose own label matched. Every option when the query is empty.
    pub match_count: usize,
    /// Options visible afterwards, including revealed ancestors.
    pub visible_count: usize,
}

/// Mutable per-instance state. See the [module docs](self).
#[derive(Debug, Clone)]
pub struct SelectionState {
    selected: Vec<bool>,
    hidden: Vec<bool>,
    expanded: Vec<bool>,
    active: Option<OptionId>,
    query: String,
    changes: BTreeSet<NodeRef>,
}

impl SelectionState {
    /// Initial state: entry selections, nothing hidden, groups at their
    /// default expansion, nothing active.
    #[must_use]
    pub fn new(tree: &OptionTree) -> Self {
        Self {
            selected: tree
                .navigation_order()
                .iter()
                .map(|&id| tree.option(id).initially_selected())
                .collect(),
            hidden: vec![false; tree.len()],
            expanded: tree.groups().map(|(_, g)| g.expanded_by_default()).collect(),
            active: None,
            query: String::new(),
            changes: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn is_selected(&self, id: OptionId) -> bool {
        self.selected.get(id.index()).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn is_hidden(&self, id: OptionId) -> bool {
        self.hidden.get(id.index()).copied().unwrap_or(true)
    }

    #[must_use]
    pub fn is_visible(&self, id: OptionId) -> bool {
        !self.is_hidden(id)
    }

    #[must_use]
    pub fn is_expanded(&self, id: GroupId) -> bool {
        self.expanded.get(id.index()).copied().unwrap_or(false)
    }

    /// The active option, if any.
    #[inline]
    #[must_use]
    pub const fn active(&self) -> Option<OptionId> {
        self.active
    }

    /// Query of the last filter application (normalized).
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.selected.iter().filter(|&&s| s).count()
    }

    /// Visible options in navigation order.
    pub fn visible<'a>(&'a self, tree: &'a OptionTree) -> impl Iterator<Item = OptionId> + 'a {
        tree.navigation_order()
            .iter()
            .copied()
            .filter(|&id| self.is_visible(id))
    }

    /// Flip `selected` on one option and return the new value.
    pub fn toggle_selected(&mut self, id: OptionId) -> Result<bool> {
        let Some(slot) = self.selected.get_mut(id.index()) else {
            return Err(MultiSelectError::not_found(format!("#{}", id.index())));
        };
        *slot = !*slot;
        let selected = *slot;
        self.changes.insert(NodeRef::Option(id));
        arbor_core::debug!(
            message = "multiselect.selection",
            action = "toggle",
            option = id.index(),
            selected,
        );
        Ok(selected)
    }

    /// Deselect everything. Returns the options that were selected.
    pub fn clear_all(&mut self) -> Vec<OptionId> {
        let mut cleared = Vec::new();
        for (index, slot) in self.selected.iter_mut().enumerate() {
            if std::mem::replace(slot, false) {
                cleared.push(OptionId::from_index(index));
            }
        }
        self.changes
            .extend(cleared.iter().copied().map(NodeRef::Option));
        arbor_core::debug!(
            message = "multiselect.selection",
            action = "clear_all",
            cleared = cleared.len(),
        );
        cleared
    }

    /// Move the active marker. `None` clears it.
    ///
    /// Fails with `InvalidState` when the target is hidden or unknown; the
    /// previous active option is kept in that case.
    pub fn set_active(&mut self, tree: &OptionTree, id: Option<OptionId>) -> Result<()> {
        if let Some(target) = id {
            let Some(node) = tree.get(target) else {
                return Err(MultiSelectError::invalid_state(
                    format!("#{}", target.index()),
                    "no such option",
                ));
            };
            if self.is_hidden(target) {
                return Err(MultiSelectError::invalid_state(node.id(), "option is hidden"));
            }
        }
        if self.active == id {
            return Ok(());
        }
        if let Some(previous) = self.active {
            self.changes.insert(NodeRef::Option(previous));
        }
        if let Some(next) = id {
            self.changes.insert(NodeRef::Option(next));
        }
        self.active = id;
        arbor_core::debug!(
            message = "multiselect.active",
            active = id.map(|id| tree.option(id).id()),
        );
        Ok(())
    }

    /// Apply a substring filter over option labels.
    ///
    /// The query is trimmed and lower-cased. An empty query shows every
    /// option and restores default group expansion. Otherwise an option is
    /// visible when its label contains the query, and every group on the
    /// path to a visible option is expanded with its owner forced visible.
    /// Groups with no visible descendant collapse.
    ///
    /// Applying the same query twice yields the same state as once.
    pub fn apply_filter(&mut self, tree: &OptionTree, query: &str) -> FilterOutcome {
        let query = query.trim().to_lowercase();

        let mut hidden = vec![false; tree.len()];
        let mut expanded: Vec<bool>;
        let match_count;

        if query.is_empty() {
            expanded = tree.groups().map(|(_, g)| g.expanded_by_default()).collect();
            match_count = tree.len();
        } else {
            expanded = vec![false; tree.group_count()];
            let mut matches = Vec::new();
            for &id in tree.navigation_order() {
                let hit = tree.option(id).search_key().contains(&query);
                hidden[id.index()] = !hit;
                if hit {
                    matches.push(id);
                }
            }
            match_count = matches.len();
            for id in matches {
                for (group, owner) in tree.ancestors(id) {
                    if expanded[group.index()] && !hidden[owner.index()] {
                        // The rest of this chain was revealed by an earlier match.
                        break;
                    }
                    expanded[group.index()] = true;
                    hidden[owner.index()] = false;
                }
            }
        }

        for (index, value) in hidden.into_iter().enumerate() {
            if self.hidden[index] != value {
                self.hidden[index] = value;
                self.changes.insert(NodeRef::Option(OptionId::from_index(index)));
            }
        }
        for (index, value) in expanded.into_iter().enumerate() {
            if self.expanded[index] != value {
                self.expanded[index] = value;
                self.changes.insert(NodeRef::Group(GroupId::from_index(index)));
            }
        }

        let visible_count = self.hidden.iter().filter(|&&h| !h).count();
        arbor_core::debug!(
            message = "multiselect.filter",
            query = %query,
            match_count,
            visible_count,
        );
        self.query.clone_from(&query);
        FilterOutcome {
            query,
            match_count,
            visible_count,
        }
    }

    /// Drain the set of nodes changed since the last call, in handle order.
    pub fn take_changes(&mut self) -> Vec<NodeRef> {
        std::mem::take(&mut self.changes).into_iter().collect()
    }

    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multiselect::entry::Entry;
    use crate::multiselect::tree::TreeBuilder;

    fn geo() -> OptionTree {
        TreeBuilder::new("geo")
            .build(&[
                Entry::new("Europe", "eu"),
                Entry::new("Finland", "fi").with_level(1).with_selected(true),
                Entry::new("Sweden", "se").with_level(1),
                Entry::new("Asia", "as"),
            ])
            .unwrap()
    }

    fn nth(tree: &OptionTree, i: usize) -> OptionId {
        tree.navigation_order()[i]
    }

    fn hidden_labels(tree: &OptionTree, state: &SelectionState) -> Vec<String> {
        tree.navigation_order()
            .iter()
            .filter(|&&id| state.is_hidden(id))
            .map(|&id| tree.option(id).label().to_owned())
            .collect()
    }

    #[test]
    fn initial_state_mirrors_entries() {
        let tree = geo();
        let state = SelectionState::new(&tree);
        assert!(state.is_selected(nth(&tree, 1)));
        assert!(!state.is_selected(nth(&tree, 0)));
        assert_eq!(state.selected_count(), 1);
        assert_eq!(state.visible(&tree).count(), 4);
        assert_eq!(state.active(), None);
        assert!(!state.has_changes());
    }

    #[test]
    fn toggle_twice_round_trips_and_touches_only_target() {
        let tree = geo();
        let mut state = SelectionState::new(&tree);
        let sweden = nth(&tree, 2);
        assert!(state.toggle_selected(sweden).unwrap());
        assert!(!state.toggle_selected(sweden).unwrap());
        assert!(state.is_selected(nth(&tree, 1)));
        assert_eq!(state.take_changes(), vec![NodeRef::Option(sweden)]);
    }

    #[test]
    fn toggle_out_of_range_is_not_found() {
        let tree = geo();
        let mut state = SelectionState::new(&tree);
        let foreign = OptionId::from_index(99);
        assert!(matches!(
            state.toggle_selected(foreign),
            Err(MultiSelectError::NotFound { .. })
        ));
    }

    #[test]
    fn clear_all_is_idempotent() {
        let tree = geo();
        let mut state = SelectionState::new(&tree);
        state.toggle_selected(nth(&tree, 3)).unwrap();
        state.take_changes();

        let cleared = state.clear_all();
        assert_eq!(cleared, vec![nth(&tree, 1), nth(&tree, 3)]);
        assert_eq!(state.selected_count(), 0);
        assert!(state.clear_all().is_empty());
        assert_eq!(state.take_changes().len(), 2);
    }

    #[test]
    fn set_active_rejects_hidden() {
        let tree = geo();
        let mut state = SelectionState::new(&tree);
        state.apply_filter(&tree, "asia");
        let err = state.set_active(&tree, Some(nth(&tree, 1))).unwrap_err();
        assert!(matches!(err, MultiSelectError::InvalidState { .. }));
        assert_eq!(state.active(), None);

        state.set_active(&tree, Some(nth(&tree, 3))).unwrap();
        assert_eq!(state.active(), Some(nth(&tree, 3)));
    }

    #[test]
    fn set_active_marks_old_and_new() {
        let tree = geo();
        let mut state = SelectionState::new(&tree);
        state.set_active(&tree, Some(nth(&tree, 0))).unwrap();
        state.take_changes();
        state.set_active(&tree, Some(nth(&tree, 2))).unwrap();
        assert_eq!(
            state.take_changes(),
            vec![NodeRef::Option(nth(&tree, 0)), NodeRef::Option(nth(&tree, 2))]
        );
        state.set_active(&tree, None).unwrap();
        assert_eq!(state.active(), None);
    }

    #[test]
    fn filter_reveals_parent_of_match() {
        let tree = geo();
        let mut state = SelectionState::new(&tree);
        let outcome = state.apply_filter(&tree, "  SWE ");
        assert_eq!(outcome.query, "swe");
        assert_eq!(outcome.match_count, 1);
        assert_eq!(outcome.visible_count, 2);
        assert_eq!(hidden_labels(&tree, &state), vec!["Finland", "Asia"]);

        let europe = tree.option(nth(&tree, 0));
        assert!(state.is_expanded(europe.group().unwrap()));
    }

    #[test]
    fn filter_collapses_groups_without_visible_descendants() {
        let tree = geo();
        let mut state = SelectionState::new(&tree);
        state.apply_filter(&tree, "asia");
        let group = tree.option(nth(&tree, 0)).group().unwrap();
        assert!(!state.is_expanded(group));
        assert_eq!(hidden_labels(&tree, &state), vec!["Europe", "Finland", "Sweden"]);
    }

    #[test]
    fn filter_is_idempotent_and_empty_query_restores() {
        let tree = geo();
        let mut state = SelectionState::new(&tree);
        state.apply_filter(&tree, "a");
        state.take_changes();
        let snapshot = (state.hidden.clone(), state.expanded.clone());
        state.apply_filter(&tree, "a");
        assert_eq!((state.hidden.clone(), state.expanded.clone()), snapshot);
        assert!(state.take_changes().is_empty());

        let outcome = state.apply_filter(&tree, "");
        assert_eq!(outcome.match_count, 4);
        assert!(hidden_labels(&tree, &state).is_empty());
        assert!(tree.groups().all(|(id, _)| state.is_expanded(id)));
    }

    #[test]
    fn filter_never_changes_selection() {
        let tree = geo();
        let mut state = SelectionState::new(&tree);
        state.apply_filter(&tree, "zzz");
        assert!(state.is_selected(nth(&tree, 1)));
        assert_eq!(state.visible(&tree).count(), 0);
    }

    #[test]
    fn deep_match_reveals_whole_chain() {
        let tree = TreeBuilder::new("t")
            .build(&[
                Entry::new("Animals", "a"),
                Entry::new("Mammals", "m").with_level(1),
                Entry::new("Cats", "c").with_level(2),
                Entry::new("Birds", "b").with_level(1),
            ])
            .unwrap();
        let mut state = SelectionState::new(&tree);
        state.apply_filter(&tree, "cat");
        assert_eq!(hidden_labels(&tree, &state), vec!["Birds"]);
        assert!(tree.groups().all(|(id, _)| state.is_expanded(id)));
    }
}
