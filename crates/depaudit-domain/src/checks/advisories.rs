use crate::advisory::{AdvisoryRecord, AdvisorySet, PredicateMatch};
use crate::checks::Checker;
use crate::checks::utils::package_diagnostic;
use crate::fingerprint::fingerprint_for;
use crate::model::{DependencyGraph, Package};
use crate::policy::Policy;
use depaudit_types::{CheckerKind, Diagnostic, Severity, ids};
use serde_json::json;

const KIND: CheckerKind = CheckerKind::Advisories;

pub struct AdvisoryChecker {
    db: AdvisorySet,
}

impl AdvisoryChecker {
    pub fn new(db: AdvisorySet) -> Self {
        Self { db }
    }
}

impl Checker for AdvisoryChecker {
    fn kind(&self) -> CheckerKind {
        KIND
    }

    fn evaluate(&self, graph: &DependencyGraph, policy: &Policy) -> Vec<Diagnostic> {
        let mut out = Vec::new();

        // Packages iterate in (name, version) order and records in ID order.
        for package in graph.packages() {
            for record in self.db.for_package(package.name()) {
                let ignore = policy.advisories.ignore.contains(&record.id);
                match record.matches(package.version()) {
                    PredicateMatch::Unaffected => {}
                    PredicateMatch::Unparseable(reason) if ignore => {
                        out.push(ignored(package, record, Some(&reason)));
                    }
                    PredicateMatch::Unparseable(reason) => {
                        out.push(unknown_predicate(package, record, &reason));
                    }
                    PredicateMatch::Affected if ignore => out.push(ignored(package, record, None)),
                    PredicateMatch::Affected => out.push(vulnerability(package, record)),
                }
            }

            if package.yanked {
                let Some(severity) = policy.advisories.yanked.severity() else {
                    continue;
                };
                let exempt = policy
                    .advisories
                    .ignore_yanked
                    .iter()
                    .any(|spec| spec.matches(&package.id));
                if !exempt {
                    out.push(yanked(package, severity));
                }
            }
        }

        out
    }
}

fn advisory_data(package: &Package, record: &AdvisoryRecord) -> serde_json::Value {
    let mut data = json!({
        "advisory": record.id,
        "package": package.name(),
        "version": package.version(),
        "affected": record.affected,
        "patched": record.patched,
    });
    if let Some(title) = &record.title {
        data["title"] = json!(title);
    }
    if let Some(url) = &record.url {
        data["url"] = json!(url);
    }
    data
}

fn vulnerability(package: &Package, record: &AdvisoryRecord) -> Diagnostic {
    let mut d = package_diagnostic(
        KIND,
        record.severity,
        ids::CODE_VULNERABILITY,
        &package.id,
        Some(&record.id),
        match &record.title {
            Some(title) => format!("{} is affected by {}: {}", package.id, record.id, title),
            None => format!("{} is affected by {}", package.id, record.id),
        },
    );
    d.help = Some(if record.patched.is_empty() {
        "No patched version is published; consider replacing the dependency.".to_string()
    } else {
        format!("Upgrade to a version matching {}.", record.patched.join(" or "))
    });
    d.data = advisory_data(package, record);
    d
}

/// `unparsed` carries the predicate error when the match could not be decided.
fn ignored(package: &Package, record: &AdvisoryRecord, unparsed: Option<&str>) -> Diagnostic {
    let message = match unparsed {
        Some(_) => format!(
            "{} may match {}, suppressed by advisories.ignore",
            package.id, record.id
        ),
        None => format!(
            "{} matches {}, suppressed by advisories.ignore",
            package.id, record.id
        ),
    };
    let mut d = package_diagnostic(
        KIND,
        Severity::Note,
        ids::CODE_ADVISORY_IGNORED,
        &package.id,
        Some(&record.id),
        message,
    );
    d.data = advisory_data(package, record);
    if let Some(reason) = unparsed {
        d.data["unparseable"] = json!(reason);
    }
    d
}

fn unknown_predicate(package: &Package, record: &AdvisoryRecord, reason: &str) -> Diagnostic {
    let mut d = package_diagnostic(
        KIND,
        Severity::Deny,
        ids::CODE_UNKNOWN_VERSION_PREDICATE,
        &package.id,
        Some(&record.id),
        format!(
            "cannot decide whether {} is affected by {}: {}",
            package.id, record.id, reason
        ),
    );
    d.data = advisory_data(package, record);
    d
}

fn yanked(package: &Package, severity: Severity) -> Diagnostic {
    let mut d = package_diagnostic(
        KIND,
        severity,
        ids::CODE_YANKED,
        &package.id,
        None,
        format!("{} has been yanked", package.id),
    );
    d.help = Some(
        "Update to a non-yanked version, or exempt it via advisories.ignore-yanked.".to_string(),
    );
    d.data = json!({
        "package": package.name(),
        "version": package.version(),
    });
    d
}

/// Run-level note recorded when the advisory database could not be refreshed and a cached copy
/// was used instead.
pub fn stale_database_note(reason: &str) -> Diagnostic {
    Diagnostic {
        severity: Severity::Note,
        checker: KIND,
        code: ids::CODE_ADVISORY_DB_STALE.to_string(),
        package: None,
        message: format!("advisory database refresh failed, using cached copy: {reason}"),
        help: Some("Results may miss recently published advisories.".to_string()),
        fingerprint: Some(fingerprint_for(
            KIND,
            ids::CODE_ADVISORY_DB_STALE,
            None,
            None,
        )),
        data: json!({ "reason": reason }),
    }
}
