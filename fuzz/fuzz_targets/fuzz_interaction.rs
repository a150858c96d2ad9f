#![no_main]

use arbitrary::Arbitrary;
use arbor_core::event::{Event, KeyCode, KeyEvent, PointerEvent, PointerEventKind};
use arbor_widgets::multiselect::{Entry, LevelPolicy, MultiSelect, MultiSelectConfig};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    Up,
    Down,
    Enter,
    Space,
    Char(char),
    Filter(String),
    Click(u8),
    PointerDown,
    FocusIn,
    FocusOut,
    Clear,
}

#[derive(Debug, Arbitrary)]
struct Input {
    rows: Vec<(String, u8)>,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let entries: Vec<Entry> = input
        .rows
        .into_iter()
        .take(64)
        .enumerate()
        .map(|(i, (label, level))| Entry::new(label, i.to_string()).with_level(u32::from(level % 4)))
        .collect();
    let config = MultiSelectConfig::new("f", "f[]").with_level_policy(LevelPolicy::Lenient);
    let Ok(mut ms) = MultiSelect::new(config, &entries) else {
        return;
    };

    for op in input.ops.into_iter().take(256) {
        let event = match op {
            Op::Up => Event::Key(KeyEvent::new(KeyCode::Up)),
            Op::Down => Event::Key(KeyEvent::new(KeyCode::Down)),
            Op::Enter => Event::Key(KeyEvent::new(KeyCode::Enter)),
            Op::Space => Event::Key(KeyEvent::new(KeyCode::Char(' '))),
            Op::Char(c) => Event::Key(KeyEvent::new(KeyCode::Char(c))),
            Op::Click(i) => Event::Pointer(PointerEvent::click(format!("f_fms_opt_{i}"))),
            Op::PointerDown => Event::Pointer(PointerEvent::new(PointerEventKind::Down)),
            Op::FocusIn => Event::Focus(true),
            Op::FocusOut => Event::Focus(false),
            Op::Filter(q) => {
                ms.apply_filter(&q);
                continue;
            }
            Op::Clear => {
                ms.press_clear();
                continue;
            }
        };
        // Unknown or hidden click targets are reported, never panicked on.
        let _ = ms.handle_event(&event);

        if let Some(active) = ms.state().active() {
            assert!(ms.state().is_visible(active), "active option hidden");
        }
    }

    let snapshot = ms.accessibility();
    assert!(snapshot.listbox.multiselectable);
    assert_eq!(ms.backing_model().options.len(), ms.tree().len());
});
