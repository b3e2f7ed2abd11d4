//! Unknown-key detection over the raw TOML table.
//!
//! serde alone would either ignore unknown keys or reject them without the full path, so the
//! document is walked once before deserializing.

use crate::error::ConfigError;
use toml::{Table, Value};

const TOP: &[&str] = &["schema", "advisories", "licenses", "bans", "sources"];
const ADVISORIES: &[&str] = &[
    "db-path",
    "db-urls",
    "yanked",
    "ignore",
    "ignore-yanked",
    "fetch-timeout-secs",
];
const LICENSES: &[&str] = &["allow", "confidence-threshold", "exceptions", "private"];
const LICENSE_EXCEPTION: &[&str] = &["name", "allow"];
const LICENSES_PRIVATE: &[&str] = &["ignore"];
const BANS: &[&str] = &["multiple-versions", "wildcards", "skip"];
const SOURCES: &[&str] = &[
    "unknown-registry",
    "unknown-git",
    "allow-registry",
    "allow-git",
];

pub fn check_known_keys(doc: &Table) -> Result<(), ConfigError> {
    check_table(doc, "", TOP)?;

    if let Some(Value::Table(t)) = doc.get("advisories") {
        check_table(t, "advisories", ADVISORIES)?;
    }
    if let Some(Value::Table(t)) = doc.get("licenses") {
        check_table(t, "licenses", LICENSES)?;
        if let Some(Value::Table(private)) = t.get("private") {
            check_table(private, "licenses.private", LICENSES_PRIVATE)?;
        }
        if let Some(Value::Array(items)) = t.get("exceptions") {
            for (idx, item) in items.iter().enumerate() {
                if let Value::Table(e) = item {
                    check_table(e, &format!("licenses.exceptions[{idx}]"), LICENSE_EXCEPTION)?;
                }
            }
        }
    }
    if let Some(Value::Table(t)) = doc.get("bans") {
        check_table(t, "bans", BANS)?;
    }
    if let Some(Value::Table(t)) = doc.get("sources") {
        check_table(t, "sources", SOURCES)?;
    }

    Ok(())
}

fn check_table(table: &Table, prefix: &str, known: &[&str]) -> Result<(), ConfigError> {
    for key in table.keys() {
        if !known.contains(&key.as_str()) {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            return Err(ConfigError::UnknownKey { path });
        }
    }
    Ok(())
}
