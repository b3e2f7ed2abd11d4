//! Fuzz target for advisory database parsing, including version predicates.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_advisory_db
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data)
        && let Ok(set) = depaudit_advisories::parse_advisory_db("fuzz", text)
    {
        for record in set.iter() {
            let _ = record.matches("1.0.0");
        }
    }
});
