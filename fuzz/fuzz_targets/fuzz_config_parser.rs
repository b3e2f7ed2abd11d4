//! Fuzz target for `depaudit.toml` parsing and resolution.
//!
//! Goal: the parser should **never panic** on any input. It may return errors.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_config_parser
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data)
        && let Ok(cfg) = depaudit_settings::parse_config_toml(text)
    {
        let _ = depaudit_settings::resolve_config(cfg, Default::default());
    }
});
