// Run locally (from the repo root):
//   cargo +nightly fuzz run fuzz_config_parse -- -runs=1000
#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Oracle: malformed config must produce an error, never a panic.
    if let Ok(config) = jolt_config::JoltConfig::load_from_str(text) {
        if let Ok(hierarchy) = config.hierarchy.build() {
            let aliases = config.hierarchy.type_aliases();
            for (alias, _) in aliases.iter().take(32) {
                let _ = aliases.resolve_in(alias, &hierarchy);
            }
        }
    }
});
