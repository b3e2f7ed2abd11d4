use crate::fingerprint::fingerprint_for;
use crate::model::PackageId;
use depaudit_types::{CheckerKind, Diagnostic, Severity};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde_json::Value;

/// Build a diagnostic attributed to one package, with a stable fingerprint.
pub fn package_diagnostic(
    checker: CheckerKind,
    severity: Severity,
    code: &str,
    package: &PackageId,
    discriminator: Option<&str>,
    message: String,
) -> Diagnostic {
    Diagnostic {
        severity,
        checker,
        code: code.to_string(),
        package: Some(package.to_ref()),
        message,
        help: None,
        fingerprint: Some(fingerprint_for(
            checker,
            code,
            Some((&package.name, &package.version)),
            discriminator,
        )),
        data: Value::Null,
    }
}

/// Compile name globs. Patterns are validated by `depaudit-settings`; anything that still fails
/// to compile is skipped with a warning rather than aborting the run.
pub fn build_skiplist(patterns: &[String]) -> Option<GlobSet> {
    if patterns.is_empty() {
        return None;
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        match Glob::new(pattern) {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(err) => tracing::warn!(%pattern, %err, "ignoring invalid skip pattern"),
        }
    }
    match builder.build() {
        Ok(set) => Some(set),
        Err(err) => {
            tracing::warn!(%err, "ignoring skip list");
            None
        }
    }
}

pub fn is_skipped(skip: Option<&GlobSet>, name: &str) -> bool {
    skip.map(|set| set.is_match(name)).unwrap_or(false)
}
