//! Developer tasks (schema generation, explain coverage, report normalization).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use schemars::schema_for;
use std::fs;
use std::path::{Path, PathBuf};

/// The workspace root (parent of the xtask directory).
fn project_root() -> anyhow::Result<PathBuf> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .context("xtask has no parent directory")
}

fn schemas_dir() -> anyhow::Result<PathBuf> {
    Ok(project_root()?.join("schemas"))
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn generate_report_schema() -> schemars::Schema {
    schema_for!(depaudit_types::AuditReport)
}

fn generate_config_schema() -> schemars::Schema {
    schema_for!(depaudit_settings::DepauditConfigV1)
}

fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "depaudit.report.v1.json",
            generate: generate_report_schema,
        },
        SchemaSpec {
            filename: "depaudit.config.v1.json",
            generate: generate_config_schema,
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir()?;
    fs::create_dir_all(&dir).context("Failed to create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json)
            .with_context(|| format!("Failed to write schema to {}", path.display()))?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

/// Fail if schemas/ does not match what the Rust types generate.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir()?;
    let mut stale = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        let expected = serialize_schema(&(spec.generate)())?;
        match fs::read_to_string(&path) {
            Ok(actual) if actual == expected => {}
            Ok(_) => stale.push(format!("{} (out of date)", spec.filename)),
            Err(_) => stale.push(format!("{} (missing)", spec.filename)),
        }
    }

    if stale.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }
    for name in &stale {
        eprintln!("  - {name}");
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("Schema validation failed")
}

/// Every checker and code must have an explanation with non-empty examples.
fn explain_coverage() -> anyhow::Result<()> {
    use depaudit_types::explain::{all_check_ids, all_codes, lookup_explanation};

    let mut errors = Vec::new();
    for id in all_check_ids().iter().chain(all_codes()) {
        match lookup_explanation(id) {
            None => errors.push(format!("{id}: no explanation")),
            Some(exp) => {
                if exp.examples.before.trim().is_empty() || exp.examples.after.trim().is_empty() {
                    errors.push(format!("{id}: empty example"));
                }
            }
        }
    }

    if errors.is_empty() {
        println!(
            "All {} checkers and {} codes are explained.",
            all_check_ids().len(),
            all_codes().len()
        );
        return Ok(());
    }
    for e in &errors {
        eprintln!("  - {e}");
    }
    bail!(
        "Explain coverage validation failed with {} errors",
        errors.len()
    )
}

/// Print a report with timestamps and tool version replaced, for golden files.
fn normalize_report(path: Option<&str>) -> anyhow::Result<()> {
    let path = path.context("usage: cargo xtask normalize-report <report.json>")?;
    let text = fs::read_to_string(path).with_context(|| format!("read {path}"))?;
    let value: serde_json::Value =
        serde_json::from_str(&text).with_context(|| format!("parse {path}"))?;
    let normalized = depaudit_test_util::normalize_nondeterministic(value);
    println!(
        "{}",
        serde_json::to_string_pretty(&normalized).context("serialize report")?
    );
    Ok(())
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help                       Show this message");
    eprintln!("  emit-schemas               Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas           Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids           Print known schema IDs");
    eprintln!("  explain-coverage           Validate all checkers and codes have explanations");
    eprintln!("  normalize-report <path>    Print a report with nondeterministic fields masked");
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "explain-coverage" => explain_coverage(),
        "normalize-report" => normalize_report(args.get(2).map(String::as_str)),
        "print-schema-ids" => {
            for spec in schema_specs() {
                println!("{}", spec.filename.trim_end_matches(".json"));
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
