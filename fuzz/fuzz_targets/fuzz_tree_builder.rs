#![no_main]

use arbor_widgets::multiselect::{Entry, LevelPolicy, TreeBuilder};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (bool, Vec<(String, u8, bool)>)| {
    let (lenient, rows) = input;
    let entries: Vec<Entry> = rows
        .into_iter()
        .take(256)
        .enumerate()
        .map(|(i, (label, level, selected))| {
            Entry::new(label, i.to_string())
                .with_level(u32::from(level % 8))
                .with_selected(selected)
        })
        .collect();
    let policy = if lenient {
        LevelPolicy::Lenient
    } else {
        LevelPolicy::Strict
    };

    let Ok(tree) = TreeBuilder::new("f").with_policy(policy).build(&entries) else {
        assert!(!lenient, "lenient build must not fail");
        return;
    };

    // Post-conditions that must always hold:
    assert_eq!(tree.len(), entries.len());
    let mut placed = vec![0u8; tree.len()];
    for &id in tree.root() {
        placed[id.index()] += 1;
    }
    for (gid, group) in tree.groups() {
        assert_eq!(tree.option(group.owner()).group(), Some(gid));
        for &child in group.children() {
            placed[child.index()] += 1;
            assert_eq!(tree.option(child).parent(), Some(gid));
        }
    }
    assert!(placed.iter().all(|&n| n == 1), "option placed twice or never");
    for &id in tree.navigation_order() {
        let depth = tree.ancestors(id).count();
        assert_eq!(depth, tree.option(id).level() as usize);
    }
});
