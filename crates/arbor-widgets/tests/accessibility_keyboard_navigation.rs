#![forbid(unsafe_code)]

//! Keyboard navigation and accessibility semantics of the multi-select.
//!
//! Proves that:
//! 1. Up/Down wrap over visible options only
//! 2. Typeahead activates and cycles by first letter
//! 3. Enter/Space commit the active option
//! 4. Filtering reveals ancestors and resets a hidden active option
//! 5. Focus and pointer input drive the active option like a listbox
//! 6. The accessibility snapshot tracks all of the above
//!
//! Run:
//!   cargo test -p arbor-widgets --test accessibility_keyboard_navigation

use arbor_core::event::{Event, KeyCode, KeyEvent, PointerEvent, PointerEventKind};
use arbor_widgets::multiselect::{
    Entry, LevelPolicy, MultiSelect, MultiSelectConfig, MultiSelectError, Notification, OptionRole,
};

fn config() -> MultiSelectConfig {
    MultiSelectConfig::new("region", "region[]")
        .with_label_text("Region")
        .with_list_label("Regions")
        .with_placeholder("Filter")
        .with_clear_text("Clear selections")
}

fn europe() -> MultiSelect {
    MultiSelect::new(
        config(),
        &[
            Entry::new("Europe", "eu"),
            Entry::new("Finland", "fi").with_level(1),
            Entry::new("Sweden", "se").with_level(1),
            Entry::new("Asia", "as"),
        ],
    )
    .unwrap()
}

fn five() -> MultiSelect {
    let entries: Vec<Entry> = ["One", "Two", "Three", "Four", "Five"]
        .iter()
        .map(|l| Entry::new(*l, l.to_lowercase()))
        .collect();
    MultiSelect::new(config(), &entries).unwrap()
}

fn key(ms: &mut MultiSelect, code: KeyCode) -> bool {
    ms.handle_event(&Event::Key(KeyEvent::new(code))).unwrap()
}

fn active_label(ms: &MultiSelect) -> Option<String> {
    ms.state()
        .active()
        .map(|id| ms.tree().option(id).label().to_owned())
}

fn visible_labels(ms: &MultiSelect) -> Vec<String> {
    ms.state()
        .visible(ms.tree())
        .map(|id| ms.tree().option(id).label().to_owned())
        .collect()
}

// ============================================================================
// 1. Tree shape
// ============================================================================

#[test]
fn europe_scenario_builds_expected_tree() {
    let ms = europe();
    let tree = ms.tree();
    assert_eq!(tree.root().len(), 2);

    let labels: Vec<&str> = tree
        .navigation_order()
        .iter()
        .map(|&id| tree.option(id).label())
        .collect();
    assert_eq!(labels, vec!["Europe", "Finland", "Sweden", "Asia"]);

    let europe = tree.option(tree.root()[0]);
    assert!(europe.role().contains(OptionRole::PARENT | OptionRole::ROOT));
    let group = tree.group(europe.group().unwrap());
    let children: Vec<&str> = group
        .children()
        .iter()
        .map(|&id| tree.option(id).label())
        .collect();
    assert_eq!(children, vec!["Finland", "Sweden"]);
    assert!(tree.option(tree.root()[1]).group().is_none());
}

#[test]
fn malformed_levels_fail_unless_lenient() {
    let entries = [Entry::new("A", "a"), Entry::new("B", "b").with_level(2)];
    let err = MultiSelect::new(config(), &entries).unwrap_err();
    assert!(matches!(
        err,
        MultiSelectError::Structure {
            index: 1,
            level: 2,
            previous: 0
        }
    ));

    let ms = MultiSelect::new(config().with_level_policy(LevelPolicy::Lenient), &entries).unwrap();
    assert_eq!(ms.tree().option(ms.tree().navigation_order()[1]).level(), 1);
}

// ============================================================================
// 2. Arrow navigation
// ============================================================================

#[test]
fn down_from_last_wraps_to_first() {
    let mut ms = five();
    for _ in 0..5 {
        assert!(key(&mut ms, KeyCode::Down));
    }
    assert_eq!(active_label(&ms).as_deref(), Some("Five"));
    assert!(key(&mut ms, KeyCode::Down));
    assert_eq!(active_label(&ms).as_deref(), Some("One"));
}

#[test]
fn up_from_first_wraps_to_last() {
    let mut ms = five();
    key(&mut ms, KeyCode::Down);
    assert_eq!(active_label(&ms).as_deref(), Some("One"));
    key(&mut ms, KeyCode::Up);
    assert_eq!(active_label(&ms).as_deref(), Some("Five"));
}

#[test]
fn arrows_skip_hidden_options() {
    let mut ms = europe();
    ms.apply_filter("swe");
    assert_eq!(visible_labels(&ms), vec!["Europe", "Sweden"]);

    key(&mut ms, KeyCode::Down);
    key(&mut ms, KeyCode::Down);
    assert_eq!(active_label(&ms).as_deref(), Some("Sweden"));
    key(&mut ms, KeyCode::Down);
    assert_eq!(active_label(&ms).as_deref(), Some("Europe"));
}

#[test]
fn arrows_are_noop_when_nothing_visible() {
    let mut ms = europe();
    ms.apply_filter("zzz");
    assert!(!key(&mut ms, KeyCode::Down));
    assert!(!key(&mut ms, KeyCode::Up));
    assert_eq!(ms.state().active(), None);
}

// ============================================================================
// 3. Typeahead
// ============================================================================

#[test]
fn typing_f_twice_stays_on_finland() {
    let mut ms = europe();
    assert!(key(&mut ms, KeyCode::Char('f')));
    assert_eq!(active_label(&ms).as_deref(), Some("Finland"));
    assert!(key(&mut ms, KeyCode::Char('f')));
    assert_eq!(active_label(&ms).as_deref(), Some("Finland"));
}

#[test]
fn typeahead_is_case_insensitive() {
    let mut ms = europe();
    key(&mut ms, KeyCode::Char('S'));
    assert_eq!(active_label(&ms).as_deref(), Some("Sweden"));
}

#[test]
fn typeahead_without_match_keeps_active() {
    let mut ms = europe();
    key(&mut ms, KeyCode::Char('a'));
    assert!(!key(&mut ms, KeyCode::Char('q')));
    assert_eq!(active_label(&ms).as_deref(), Some("Asia"));
}

#[test]
fn dom_key_strings_translate_to_navigation() {
    let mut ms = five();
    for dom in ["ArrowDown", "ArrowDown", "ArrowUp"] {
        let key = KeyEvent::from_dom_key(dom).unwrap();
        ms.handle_key(&key);
    }
    assert_eq!(active_label(&ms).as_deref(), Some("One"));
    let space = KeyEvent::from_dom_key(" ").unwrap();
    assert!(ms.handle_key(&space));
    assert!(ms.is_selected("region_fms_opt_0").unwrap());
}

// ============================================================================
// 4. Commit
// ============================================================================

#[test]
fn enter_toggles_active_and_notifies() {
    let mut ms = europe();
    key(&mut ms, KeyCode::Char('s'));
    assert!(key(&mut ms, KeyCode::Enter));
    assert!(key(&mut ms, KeyCode::Enter));
    assert_eq!(
        ms.drain_notifications(),
        vec![
            Notification::SelectionChanged {
                id: "region_fms_opt_2".into(),
                option: ms.tree().navigation_order()[2],
                selected: true,
            },
            Notification::SelectionChanged {
                id: "region_fms_opt_2".into(),
                option: ms.tree().navigation_order()[2],
                selected: false,
            },
        ]
    );
}

// ============================================================================
// 5. Filtering
// ============================================================================

#[test]
fn swe_filter_reveals_europe_and_hides_others() {
    let mut ms = europe();
    let outcome = ms.apply_filter("swe");
    assert_eq!(outcome.match_count, 1);
    assert_eq!(visible_labels(&ms), vec!["Europe", "Sweden"]);

    let snap = ms.accessibility();
    let europe = &snap.listbox.options[0];
    assert_eq!(europe.expanded, Some(true));
    assert_eq!(europe.children.len(), 1);
    assert_eq!(europe.children[0].label, "Sweden");
}

#[test]
fn filter_hiding_active_resets_it() {
    let mut ms = europe();
    key(&mut ms, KeyCode::Char('a'));
    assert_eq!(active_label(&ms).as_deref(), Some("Asia"));
    ms.apply_filter("fin");
    assert_eq!(ms.state().active(), None);
    assert_eq!(ms.accessibility().listbox.active_descendant, None);
}

#[test]
fn empty_filter_restores_everything() {
    let mut ms = europe();
    ms.apply_filter("asia");
    ms.apply_filter("   ");
    assert_eq!(visible_labels(&ms).len(), 4);
    assert!(ms.tree().groups().all(|(g, _)| ms.state().is_expanded(g)));
}

// ============================================================================
// 6. Focus and pointer
// ============================================================================

#[test]
fn keyboard_focus_activates_first_visible_when_nothing_selected() {
    let mut ms = europe();
    ms.handle_event(&Event::Focus(true)).unwrap();
    assert_eq!(active_label(&ms).as_deref(), Some("Europe"));
    assert!(ms.take_scroll_request());
}

#[test]
fn keyboard_focus_keeps_existing_active() {
    let mut ms = europe();
    ms.set_active(Some("region_fms_opt_3")).unwrap();
    ms.focus_in();
    assert_eq!(active_label(&ms).as_deref(), Some("Asia"));
}

#[test]
fn touch_then_tap_selects_exactly_the_tapped_option() {
    let mut ms = europe();
    let touch = PointerEvent::new(PointerEventKind::TouchStart);
    ms.handle_event(&Event::Pointer(touch)).unwrap();
    ms.handle_event(&Event::Focus(true)).unwrap();
    ms.handle_event(&Event::Pointer(PointerEvent::click("region_fms_opt_1")))
        .unwrap();

    assert_eq!(active_label(&ms).as_deref(), Some("Finland"));
    let model = ms.backing_model();
    assert_eq!(model.selected_values().collect::<Vec<_>>(), vec!["fi"]);
}

#[test]
fn click_on_hidden_option_is_invalid_state() {
    let mut ms = europe();
    ms.apply_filter("asia");
    let err = ms.click("region_fms_opt_1").unwrap_err();
    assert!(matches!(err, MultiSelectError::InvalidState { .. }));
    assert_eq!(ms.state().selected_count(), 0);
}

#[test]
fn unknown_ids_are_not_found() {
    let mut ms = europe();
    assert!(matches!(
        ms.toggle_selected("region_fms_opt_99"),
        Err(MultiSelectError::NotFound { .. })
    ));
    assert!(matches!(
        ms.set_active(Some("nope")),
        Err(MultiSelectError::NotFound { .. })
    ));
}

#[test]
fn focus_out_clears_active_descendant() {
    let mut ms = europe();
    key(&mut ms, KeyCode::Down);
    assert!(ms.accessibility().listbox.active_descendant.is_some());
    ms.handle_event(&Event::Focus(false)).unwrap();
    let snap = ms.accessibility();
    assert_eq!(snap.listbox.active_descendant, None);
    assert_eq!(snap.search.active_descendant, None);
}

// ============================================================================
// 7. Accessibility snapshot
// ============================================================================

#[test]
fn snapshot_exposes_labels_and_selection() {
    let mut ms = europe();
    ms.toggle_selected("region_fms_opt_1").unwrap();
    let snap = ms.accessibility();

    assert_eq!(snap.label.id, "region");
    assert_eq!(snap.label.text, "Region");
    assert_eq!(snap.search.labelled_by, "region");
    assert_eq!(snap.search.placeholder, "Filter");
    assert_eq!(snap.clear_button.text, "Clear selections");
    assert_eq!(snap.listbox.label, "Regions");
    assert!(snap.listbox.multiselectable);
    assert!(snap.listbox.options[0].children[0].selected);
    assert!(!snap.listbox.options[0].children[1].selected);
}

#[test]
fn clear_all_resets_backing_model() {
    let mut ms = europe();
    ms.toggle_selected("region_fms_opt_0").unwrap();
    ms.toggle_selected("region_fms_opt_3").unwrap();
    assert_eq!(ms.backing_model().selected_values().count(), 2);
    ms.press_clear();
    assert_eq!(ms.backing_model().selected_values().count(), 0);
    assert_eq!(ms.backing_model().options.len(), 4);
}
