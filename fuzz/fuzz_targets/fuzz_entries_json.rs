#![no_main]

use arbor_widgets::multiselect::{LevelPolicy, MultiSelect, MultiSelectConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };
    let config = MultiSelectConfig::new("f", "f[]").with_level_policy(LevelPolicy::Lenient);
    // Decoding may fail; it must not panic.
    if let Ok(ms) = MultiSelect::from_json(config, json) {
        assert_eq!(ms.backing_model().options.len(), ms.tree().len());
    }
});
