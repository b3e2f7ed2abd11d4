use crate::checks::Checker;
use crate::checks::utils::{build_skiplist, is_skipped, package_diagnostic};
use crate::model::DependencyGraph;
use crate::policy::Policy;
use crate::version::is_wildcard_requirement;
use depaudit_types::{CheckerKind, Diagnostic, ids};
use serde_json::json;

const KIND: CheckerKind = CheckerKind::Bans;

pub struct BanChecker;

impl Checker for BanChecker {
    fn kind(&self) -> CheckerKind {
        KIND
    }

    fn evaluate(&self, graph: &DependencyGraph, policy: &Policy) -> Vec<Diagnostic> {
        let bans = &policy.bans;
        let skip = build_skiplist(&bans.skip);
        let mut out = Vec::new();

        if let Some(severity) = bans.multiple_versions.severity() {
            for (name, versions) in graph.by_name() {
                if versions.len() < 2 || is_skipped(skip.as_ref(), name) {
                    continue;
                }
                let all: Vec<&str> = versions.iter().map(|p| p.version()).collect();
                let first = versions[0];
                // The lowest version is the reference; each later one is a duplicate.
                for package in &versions[1..] {
                    let mut d = package_diagnostic(
                        KIND,
                        severity,
                        ids::CODE_DUPLICATE_VERSION,
                        &package.id,
                        None,
                        format!(
                            "{} is duplicated: {} also resolves to {}",
                            package.id,
                            name,
                            first.version()
                        ),
                    );
                    d.help = Some(format!(
                        "Align dependents on a single version of '{name}', or add it to bans.skip."
                    ));
                    d.data = json!({ "package": name, "versions": all });
                    out.push(d);
                }
            }
        }

        if let Some(severity) = bans.wildcards.severity() {
            for package in graph.packages() {
                if is_skipped(skip.as_ref(), package.name()) {
                    continue;
                }
                let dependents: Vec<String> = graph
                    .incoming(&package.id)
                    .filter(|edge| edge.req.as_deref().is_some_and(is_wildcard_requirement))
                    .map(|edge| edge.from.to_string())
                    .collect();
                if dependents.is_empty() {
                    continue;
                }

                let mut d = package_diagnostic(
                    KIND,
                    severity,
                    ids::CODE_WILDCARD_REQUIREMENT,
                    &package.id,
                    None,
                    format!(
                        "{} is required with a wildcard version by {}",
                        package.id,
                        dependents.join(", ")
                    ),
                );
                d.help = Some("Pin the dependency to a semver range such as \"^1.2\".".to_string());
                d.data = json!({ "dependents": dependents });
                out.push(d);
            }
        }

        out
    }
}
