//! Fuzz target for `Cargo.lock` graph loading.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_lockfile
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = depaudit_graph::parse_lockfile(text);
        let _ = depaudit_graph::parse_snapshot(text);
    }
});
