//! Shared test utilities for the depaudit workspace.
//!
//! Lives in its own crate so CLI integration tests and `xtask` can both reach it.

use serde_json::Value;

const ENVELOPE_KEYS: [&str; 6] = ["schema", "tool", "run", "verdict", "diagnostics", "data"];

/// Normalize the non-deterministic parts of a report envelope for golden comparison.
///
/// Only the root envelope is touched: `tool.version` becomes `"__VERSION__"`, run timestamps
/// become `"__TIMESTAMP__"` and `run.duration_ms` becomes `0`. Diagnostic `data` payloads are
/// left alone even when they contain look-alike keys.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    let Some(obj) = value.as_object_mut() else {
        return value;
    };
    if !ENVELOPE_KEYS.iter().all(|k| obj.contains_key(*k)) {
        return value;
    }

    if let Some(tool) = obj.get_mut("tool").and_then(Value::as_object_mut)
        && tool.contains_key("version")
    {
        tool.insert("version".into(), Value::String("__VERSION__".into()));
    }

    if let Some(run) = obj.get_mut("run").and_then(Value::as_object_mut) {
        for key in ["started_at", "ended_at"] {
            if run.contains_key(key) {
                run.insert(key.into(), Value::String("__TIMESTAMP__".into()));
            }
        }
        if run.contains_key("duration_ms") {
            run.insert("duration_ms".into(), Value::Number(0.into()));
        }
    }

    value
}

/// `(checker, code, package)` triples in report order. `package` is `name@version` or `-`.
pub fn diagnostic_keys(report: &Value) -> Vec<(String, String, String)> {
    let Some(diagnostics) = report.get("diagnostics").and_then(Value::as_array) else {
        return Vec::new();
    };
    diagnostics
        .iter()
        .map(|d| {
            let field = |name: &str| {
                d.get(name)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            };
            let package = match d.get("package") {
                Some(p) if p.is_object() => format!(
                    "{}@{}",
                    p.get("name").and_then(Value::as_str).unwrap_or_default(),
                    p.get("version").and_then(Value::as_str).unwrap_or_default()
                ),
                _ => "-".to_string(),
            };
            (field("checker"), field("code"), package)
        })
        .collect()
}
