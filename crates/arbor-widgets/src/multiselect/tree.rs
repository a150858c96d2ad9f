//! Option tree reconstructed from level-annotated entries.
//!
//! The builder makes a single left-to-right pass. An entry one level deeper
//! than its predecessor turns the predecessor into a parent: a synthetic
//! [`GroupNode`] is attached to it and becomes the insertion point. Shallower
//! entries climb back to the open group of their level; level-0 entries go
//! to the root.
//!
//! Nodes live in flat arenas addressed by [`OptionId`] / [`GroupId`]. An
//! option's `parent` is a back-reference used only for upward walks; the
//! arenas own everything.
//!
//! # Example
//!
//! ```
//! use arbor_widgets::multiselect::{Entry, TreeBuilder};
//!
//! let entries = vec![
//!     Entry::new("Europe", "eu"),
//!     Entry::new("Finland", "fi").with_level(1),
//!     Entry::new("Sweden", "se").with_level(1),
//!     Entry::new("Asia", "as"),
//! ];
//! let tree = TreeBuilder::new("geo_fms").build(&entries).unwrap();
//!
//! assert_eq!(tree.root().len(), 2);
//! let europe = tree.option(tree.root()[0]);
//! let group = tree.group(europe.group().unwrap());
//! assert_eq!(group.children().len(), 2);
//! assert_eq!(tree.option(group.children()[1]).label(), "Sweden");
//! ```

use ahash::AHashMap;
use bitflags::bitflags;
use unicode_segmentation::UnicodeSegmentation;

use super::config::LevelPolicy;
use super::entry::Entry;
use super::error::{MultiSelectError, Result};

/// Handle of an option node. Equal to the entry's index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OptionId(usize);

impl OptionId {
    pub(crate) const fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Position in entry (and navigation) order.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Handle of a synthetic group node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(usize);

impl GroupId {
    pub(crate) const fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Position in group creation order.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

bitflags! {
    /// Structural role of an option within the tree.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct OptionRole: u8 {
        /// Owns a group of deeper options.
        const PARENT = 0b001;
        /// A parent sitting at level 0.
        const ROOT   = 0b010;
        /// Lives inside a group.
        const CHILD  = 0b100;
    }
}

/// One option, created from exactly one entry.
#[derive(Debug, Clone)]
pub struct OptionNode {
    id: String,
    label: String,
    value: String,
    level: u32,
    initially_selected: bool,
    parent: Option<GroupId>,
    group: Option<GroupId>,
    role: OptionRole,
    search_key: String,
    initial: Option<String>,
}

impl OptionNode {
    fn new(id: String, entry: &Entry, level: u32) -> Self {
        let search_key = entry.display_text.to_lowercase();
        let initial = entry
            .display_text
            .graphemes(true)
            .next()
            .map(str::to_lowercase);
        Self {
            id,
            label: entry.display_text.clone(),
            value: entry.value.clone(),
            level,
            initially_selected: entry.selected,
            parent: None,
            group: None,
            role: OptionRole::empty(),
            search_key,
            initial,
        }
    }

    /// Session-stable id, `"<componentId>_opt_<index>"`.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Effective depth (after clamping, if any).
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Selection given by the entry.
    #[must_use]
    pub const fn initially_selected(&self) -> bool {
        self.initially_selected
    }

    /// Enclosing group, `None` at the root.
    #[must_use]
    pub const fn parent(&self) -> Option<GroupId> {
        self.parent
    }

    /// Group this option owns, if it is a parent.
    #[must_use]
    pub const fn group(&self) -> Option<GroupId> {
        self.group
    }

    #[must_use]
    pub const fn role(&self) -> OptionRole {
        self.role
    }

    /// Lower-cased label used for substring search.
    #[must_use]
    pub fn search_key(&self) -> &str {
        &self.search_key
    }

    /// Lower-cased first grapheme of the label, for typeahead.
    #[must_use]
    pub fn initial(&self) -> Option<&str> {
        self.initial.as_deref()
    }
}

/// Synthetic container for the options nested under a parent option.
#[derive(Debug, Clone)]
pub struct GroupNode {
    owner: OptionId,
    level: u32,
    children: Vec<OptionId>,
    expanded_by_default: bool,
}

impl GroupNode {
    /// The labeled option this group hangs under.
    #[must_use]
    pub const fn owner(&self) -> OptionId {
        self.owner
    }

    /// Level of the options directly inside this group.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub fn children(&self) -> &[OptionId] {
        &self.children
    }

    /// Expansion state outside of any search filter.
    #[must_use]
    pub const fn expanded_by_default(&self) -> bool {
        self.expanded_by_default
    }
}

/// Immutable structure of one widget instance.
///
/// Handles are only meaningful for the tree that issued them; indexing with
/// a foreign handle panics.
#[derive(Debug, Clone)]
pub struct OptionTree {
    component_id: String,
    options: Vec<OptionNode>,
    groups: Vec<GroupNode>,
    root: Vec<OptionId>,
    navigation: Vec<OptionId>,
    index: AHashMap<String, OptionId>,
    clamped: usize,
}

impl OptionTree {
    #[must_use]
    pub fn component_id(&self) -> &str {
        &self.component_id
    }

    /// Number of options (equals the number of entries).
    #[must_use]
    pub fn len(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Level-0 options in document order.
    #[must_use]
    pub fn root(&self) -> &[OptionId] {
        &self.root
    }

    /// Every option in creation order, regardless of nesting.
    #[must_use]
    pub fn navigation_order(&self) -> &[OptionId] {
        &self.navigation
    }

    #[must_use]
    pub fn option(&self, id: OptionId) -> &OptionNode {
        &self.options[id.0]
    }

    #[must_use]
    pub fn get(&self, id: OptionId) -> Option<&OptionNode> {
        self.options.get(id.0)
    }

    #[must_use]
    pub fn group(&self, id: GroupId) -> &GroupNode {
        &self.groups[id.0]
    }

    /// All groups with their handles, in creation order.
    pub fn groups(&self) -> impl Iterator<Item = (GroupId, &GroupNode)> {
        self.groups.iter().enumerate().map(|(i, g)| (GroupId(i), g))
    }

    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Resolve a node id string to its handle.
    #[must_use]
    pub fn find(&self, node_id: &str) -> Option<OptionId> {
        self.index.get(node_id).copied()
    }

    /// Resolve a node id string, failing with `NotFound`.
    pub fn resolve(&self, node_id: &str) -> Result<OptionId> {
        self.find(node_id)
            .ok_or_else(|| MultiSelectError::not_found(node_id))
    }

    /// Walk from `id` towards the root, yielding each enclosing group and
    /// the option that owns it.
    #[must_use]
    pub fn ancestors(&self, id: OptionId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.get(id).and_then(OptionNode::parent),
        }
    }

    /// How many entries had their level clamped during construction.
    #[must_use]
    pub const fn clamped_count(&self) -> usize {
        self.clamped
    }
}

/// Iterator returned by [`OptionTree::ancestors`].
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
    tree: &'a OptionTree,
    next: Option<GroupId>,
}

impl Iterator for Ancestors<'_> {
    type Item = (GroupId, OptionId);

    fn next(&mut self) -> Option<Self::Item> {
        let group_id = self.next?;
        let owner = self.tree.group(group_id).owner;
        self.next = self.tree.option(owner).parent;
        Some((group_id, owner))
    }
}

/// Builds an [`OptionTree`] from entries.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    component_id: String,
    policy: LevelPolicy,
}

impl TreeBuilder {
    #[must_use]
    pub fn new(component_id: impl Into<String>) -> Self {
        Self {
            component_id: component_id.into(),
            policy: LevelPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: LevelPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Build the tree in one pass.
    ///
    /// Under [`LevelPolicy::Strict`] a malformed level sequence fails the
    /// whole call; no partial tree is returned.
    pub fn build(&self, entries: &[Entry]) -> Result<OptionTree> {
        let span = arbor_core::debug_span!(
            "multiselect.build",
            component = %self.component_id,
            entries = entries.len(),
            groups = arbor_core::logging::field::Empty,
            clamped = arbor_core::logging::field::Empty,
        );
        let _guard = span.enter();

        let mut tree = OptionTree {
            component_id: self.component_id.clone(),
            options: Vec::with_capacity(entries.len()),
            groups: Vec::new(),
            root: Vec::new(),
            navigation: Vec::with_capacity(entries.len()),
            index: AHashMap::with_capacity(entries.len()),
            clamped: 0,
        };
        // open[k] is the group currently receiving level k + 1 entries, so
        // open.len() == previous_level between iterations.
        let mut open: Vec<GroupId> = Vec::new();
        let mut previous_level = 0u32;

        for (index, entry) in entries.iter().enumerate() {
            let level = self.checked_level(index, entry.level, previous_level)?;
            if level != entry.level {
                tree.clamped += 1;
            }

            let id = OptionId(index);
            let mut node = OptionNode::new(format!("{}_opt_{index}", self.component_id), entry, level);

            if level == 0 {
                open.clear();
                tree.root.push(id);
            } else {
                if level > previous_level {
                    let owner = index.checked_sub(1).map(OptionId).ok_or(
                        MultiSelectError::Structure {
                            index,
                            level,
                            previous: previous_level,
                        },
                    )?;
                    let group_id = GroupId(tree.groups.len());
                    tree.groups.push(GroupNode {
                        owner,
                        level,
                        children: Vec::new(),
                        expanded_by_default: true,
                    });
                    let owner_node = &mut tree.options[owner.0];
                    owner_node.group = Some(group_id);
                    owner_node.role |= OptionRole::PARENT;
                    if previous_level == 0 {
                        owner_node.role |= OptionRole::ROOT;
                    }
                    open.push(group_id);
                } else if level < previous_level {
                    open.truncate(level as usize);
                }

                let Some(&group_id) = open.last() else {
                    return Err(MultiSelectError::Structure {
                        index,
                        level,
                        previous: previous_level,
                    });
                };
                tree.groups[group_id.0].children.push(id);
                node.parent = Some(group_id);
                node.role |= OptionRole::CHILD;
            }

            tree.index.insert(node.id.clone(), id);
            tree.options.push(node);
            tree.navigation.push(id);
            previous_level = level;
        }

        span.record("groups", tree.groups.len());
        span.record("clamped", tree.clamped);
        Ok(tree)
    }

    fn checked_level(&self, index: usize, level: u32, previous: u32) -> Result<u32> {
        let deepest = if index == 0 {
            0
        } else {
            previous.saturating_add(1)
        };
        if level <= deepest {
            return Ok(level);
        }
        match self.policy {
            LevelPolicy::Strict => Err(MultiSelectError::Structure {
                index,
                level,
                previous,
            }),
            LevelPolicy::Lenient => {
                arbor_core::warn!(
                    message = "multiselect.level_clamped",
                    component = %self.component_id,
                    index,
                    level,
                    clamped_to = deepest
                );
                Ok(deepest)
            }
        }
    }
}
