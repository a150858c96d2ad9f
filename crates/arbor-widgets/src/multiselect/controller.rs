//! Interaction controller.
//!
//! [`MultiSelect`] turns host input (keys, pointer, focus, search text) into
//! state transitions on one widget instance and queues [`Notification`]s for
//! the host. The host drives time: search keystrokes are scheduled with the
//! current instant and applied from [`MultiSelect::poll`] once the debounce
//! quiet period has elapsed.
//!
//! # Keys
//!
//! | Key | Effect |
//! |-----|--------|
//! | `Up` / `Down` | Move the active option over visible options, wrapping |
//! | `Enter` / `Space` | Toggle the active option |
//! | letter, digit, `-`, `_` | Typeahead to the next option with that initial |
//!
//! Only press events are interpreted, and chords with Ctrl, Alt, or Super
//! are left to the host.

use arbor_core::debounce::Debouncer;
use arbor_core::event::{Event, KeyCode, KeyEvent, KeyEventKind, PointerEvent};
use web_time::Instant;

use super::a11y::{self, AccessibilitySnapshot, NodeUpdate};
use super::config::MultiSelectConfig;
use super::entry::{Entry, parse_entries};
use super::error::Result;
use super::model::BackingModel;
use super::state::{FilterOutcome, NodeRef, SelectionState};
use super::tree::{OptionId, OptionTree, TreeBuilder};
use super::typeahead::Typeahead;

/// Something the host may want to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// An option's selected flag flipped or was cleared.
    SelectionChanged {
        id: String,
        option: OptionId,
        selected: bool,
    },
    /// A search filter ran.
    FilterApplied { query: String, match_count: usize },
}

/// One hierarchical multi-select instance. See the [module docs](self).
#[derive(Debug, Clone)]
pub struct MultiSelect {
    config: MultiSelectConfig,
    tree: OptionTree,
    state: SelectionState,
    typeahead: Typeahead,
    search: Debouncer<String>,
    search_text: String,
    /// Set by pointer-down so the focus-in it causes does not auto-activate.
    pointer_focus: bool,
    focused: bool,
    scroll_into_view_requested: bool,
    notifications: Vec<Notification>,
}

impl MultiSelect {
    /// Build an instance from entries.
    ///
    /// Fails with a structure error when the level sequence is malformed
    /// under the configured policy.
    pub fn new(config: MultiSelectConfig, entries: &[Entry]) -> Result<Self> {
        let tree = TreeBuilder::new(config.resolved_component_id())
            .with_policy(config.level_policy)
            .build(entries)?;
        let state = SelectionState::new(&tree);
        let search = Debouncer::new(config.debounce.validated());
        Ok(Self {
            config,
            tree,
            state,
            typeahead: Typeahead::new(),
            search,
            search_text: String::new(),
            pointer_focus: false,
            focused: false,
            scroll_into_view_requested: false,
            notifications: Vec::new(),
        })
    }

    /// Build an instance from a JSON array of entries.
    pub fn from_json(config: MultiSelectConfig, json: &str) -> Result<Self> {
        let entries = parse_entries(json)?;
        Self::new(config, &entries)
    }

    #[must_use]
    pub fn config(&self) -> &MultiSelectConfig {
        &self.config
    }

    #[must_use]
    pub fn tree(&self) -> &OptionTree {
        &self.tree
    }

    #[must_use]
    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Typeahead cache, for inspection.
    #[must_use]
    pub fn typeahead(&self) -> &Typeahead {
        &self.typeahead
    }

    #[must_use]
    pub const fn is_focused(&self) -> bool {
        self.focused
    }

    /// Raw text last typed into the search input.
    #[must_use]
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Node id of the active option.
    #[must_use]
    pub fn active_id(&self) -> Option<&str> {
        self.state.active().map(|id| self.tree.option(id).id())
    }

    /// Selected flag of the option with the given node id.
    pub fn is_selected(&self, node_id: &str) -> Result<bool> {
        let id = self.tree.resolve(node_id)?;
        Ok(self.state.is_selected(id))
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Dispatch a canonical event. Returns whether it was consumed.
    ///
    /// Errors only when a click targets an unknown node.
    pub fn handle_event(&mut self, event: &Event) -> Result<bool> {
        match event {
            Event::Key(key) => Ok(self.handle_key(key)),
            Event::Pointer(pointer) => self.handle_pointer(pointer),
            Event::Focus(true) => {
                self.focus_in();
                Ok(true)
            }
            Event::Focus(false) => {
                self.focus_out();
                Ok(true)
            }
        }
    }

    /// Handle a key event on the option list. Returns whether it was consumed.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press || key.ctrl() || key.alt() || key.super_key() {
            return false;
        }
        match key.code {
            KeyCode::Up => {
                self.typeahead.clear();
                self.move_active(-1)
            }
            KeyCode::Down => {
                self.typeahead.clear();
                self.move_active(1)
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.commit(),
            KeyCode::Char(ch) if Typeahead::accepts(ch) => {
                let active = self.state.active();
                match self.typeahead.advance(ch, active, &self.tree, &self.state) {
                    Some(next) => self.activate(next),
                    None => false,
                }
            }
            _ => false,
        }
    }

    fn handle_pointer(&mut self, pointer: &PointerEvent) -> Result<bool> {
        if pointer.kind.grabs_focus() {
            self.pointer_down();
            return Ok(true);
        }
        match &pointer.target {
            Some(target) => {
                self.click(target)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Click or tap on an option: make it active, then toggle it.
    ///
    /// Collapsed ancestors are not reopened.
    pub fn click(&mut self, node_id: &str) -> Result<bool> {
        let id = self.tree.resolve(node_id)?;
        self.state.set_active(&self.tree, Some(id))?;
        self.toggle(id)
    }

    /// Pointer-down or touch-start on the list, ahead of the focus it grants.
    pub fn pointer_down(&mut self) {
        self.pointer_focus = true;
    }

    /// The option list gained focus.
    ///
    /// Without an active option, activates the first selected visible
    /// option, else the first visible one. Skipped when the focus came from
    /// a pointer press, since the click picks the active option itself.
    pub fn focus_in(&mut self) {
        self.focused = true;
        if std::mem::take(&mut self.pointer_focus) {
            return;
        }
        if self.state.active().is_some() {
            return;
        }
        let target = self
            .state
            .visible(&self.tree)
            .find(|&id| self.state.is_selected(id))
            .or_else(|| self.state.visible(&self.tree).next());
        if let Some(id) = target {
            self.activate(id);
        }
    }

    /// The option list lost focus: drop the active option and typeahead.
    pub fn focus_out(&mut self) {
        self.focused = false;
        self.pointer_focus = false;
        self.typeahead.clear();
        self.reset_active();
    }

    /// Clear-all button. Leaves active and visibility untouched.
    pub fn press_clear(&mut self) -> usize {
        self.clear_all()
    }

    /// A keystroke changed the search input. Schedules the filter.
    pub fn search_input(&mut self, text: impl Into<String>, now: Instant) {
        let text = text.into();
        self.search_text.clone_from(&text);
        self.search.schedule(text, now);
    }

    /// Apply the pending search once its quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<FilterOutcome> {
        let query = self.search.poll(now)?;
        Some(self.apply_filter(&query))
    }

    /// Apply the pending search immediately, if any.
    pub fn flush_search(&mut self) -> Option<FilterOutcome> {
        let query = self.search.flush()?;
        Some(self.apply_filter(&query))
    }

    /// When the pending search fires, if any.
    #[must_use]
    pub fn search_deadline(&self) -> Option<Instant> {
        self.search.deadline()
    }

    /// Filter now, bypassing the debounce.
    ///
    /// Invalidates the typeahead cache and resets the active option when it
    /// became hidden.
    pub fn apply_filter(&mut self, query: &str) -> FilterOutcome {
        self.typeahead.clear();
        let outcome = self.state.apply_filter(&self.tree, query);
        if let Some(active) = self.state.active()
            && self.state.is_hidden(active)
        {
            self.reset_active();
        }
        self.notifications.push(Notification::FilterApplied {
            query: outcome.query.clone(),
            match_count: outcome.match_count,
        });
        outcome
    }

    // ------------------------------------------------------------------
    // Direct operations
    // ------------------------------------------------------------------

    /// Flip one option's selected flag by node id.
    pub fn toggle_selected(&mut self, node_id: &str) -> Result<bool> {
        let id = self.tree.resolve(node_id)?;
        self.toggle(id)
    }

    /// Move the active option by node id. `None` clears it.
    pub fn set_active(&mut self, node_id: Option<&str>) -> Result<()> {
        let id = node_id.map(|n| self.tree.resolve(n)).transpose()?;
        self.state.set_active(&self.tree, id)
    }

    /// Deselect every option. Returns how many were selected.
    pub fn clear_all(&mut self) -> usize {
        let cleared = self.state.clear_all();
        for &id in &cleared {
            self.notifications.push(Notification::SelectionChanged {
                id: self.tree.option(id).id().to_owned(),
                option: id,
                selected: false,
            });
        }
        cleared.len()
    }

    // ------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------

    #[must_use]
    pub fn accessibility(&self) -> AccessibilitySnapshot {
        a11y::snapshot(&self.config, &self.tree, &self.state, &self.search_text)
    }

    #[must_use]
    pub fn backing_model(&self) -> BackingModel {
        BackingModel::from_state(&self.config.name, &self.tree, &self.state)
    }

    /// Drain the nodes changed since the last call.
    pub fn take_changes(&mut self) -> Vec<NodeRef> {
        self.state.take_changes()
    }

    /// Drain the changed nodes with their current observable fields.
    pub fn take_updates(&mut self) -> Vec<NodeUpdate> {
        self.state
            .take_changes()
            .into_iter()
            .map(|node| a11y::node_update(&self.tree, &self.state, node))
            .collect()
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Whether a keyboard move asked for the active option to be scrolled
    /// into view. Resets the request.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_into_view_requested)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn toggle(&mut self, id: OptionId) -> Result<bool> {
        let selected = self.state.toggle_selected(id)?;
        self.notifications.push(Notification::SelectionChanged {
            id: self.tree.option(id).id().to_owned(),
            option: id,
            selected,
        });
        Ok(selected)
    }

    fn commit(&mut self) -> bool {
        match self.state.active() {
            Some(id) => self.toggle(id).is_ok(),
            None => false,
        }
    }

    /// Activate a visible option from the keyboard.
    fn activate(&mut self, id: OptionId) -> bool {
        if self.state.set_active(&self.tree, Some(id)).is_err() {
            return false;
        }
        self.scroll_into_view_requested = true;
        true
    }

    fn reset_active(&mut self) {
        // Clearing never fails.
        let _ = self.state.set_active(&self.tree, None);
    }

    fn move_active(&mut self, delta: isize) -> bool {
        let visible: Vec<OptionId> = self.state.visible(&self.tree).collect();
        if visible.is_empty() {
            return false;
        }
        let len = visible.len() as isize;
        let current = self
            .state
            .active()
            .and_then(|active| visible.iter().position(|&id| id == active))
            .map_or(-1, |i| i as isize);
        let mut next = current + delta;
        if next >= len {
            next = 0;
        }
        if next < 0 {
            next = len - 1;
        }
        self.activate(visible[next as usize])
    }
}
