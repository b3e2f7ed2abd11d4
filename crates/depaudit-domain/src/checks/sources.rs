use crate::checks::Checker;
use crate::checks::utils::package_diagnostic;
use crate::model::{DependencyGraph, Source};
use crate::policy::{Policy, SourcePolicy};
use depaudit_types::{CheckerKind, Diagnostic, ids};
use serde_json::json;

const KIND: CheckerKind = CheckerKind::Sources;

/// Classification of a package's origin against the trusted lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin<'a> {
    KnownRegistry,
    UnknownRegistry(&'a str),
    KnownGit,
    UnknownGit(&'a str),
    Path,
}

pub fn classify<'a>(source: &'a Source, policy: &SourcePolicy) -> Origin<'a> {
    match source {
        Source::Registry(url) if policy.is_known_registry(url) => Origin::KnownRegistry,
        Source::Registry(url) => Origin::UnknownRegistry(url),
        Source::Git { url, .. } if policy.is_known_git(url) => Origin::KnownGit,
        Source::Git { url, .. } => Origin::UnknownGit(url),
        Source::Path(_) => Origin::Path,
    }
}

pub struct SourceChecker;

impl Checker for SourceChecker {
    fn kind(&self) -> CheckerKind {
        KIND
    }

    fn evaluate(&self, graph: &DependencyGraph, policy: &Policy) -> Vec<Diagnostic> {
        let sources = &policy.sources;
        let mut out = Vec::new();

        for package in graph.packages() {
            let (level, code, kind, url) = match classify(&package.source, sources) {
                Origin::KnownRegistry | Origin::KnownGit | Origin::Path => continue,
                Origin::UnknownRegistry(url) => (
                    sources.unknown_registry,
                    ids::CODE_UNKNOWN_REGISTRY,
                    "registry",
                    url,
                ),
                Origin::UnknownGit(url) => {
                    (sources.unknown_git, ids::CODE_UNKNOWN_GIT, "git", url)
                }
            };
            let Some(severity) = level.severity() else {
                continue;
            };

            let mut d = package_diagnostic(
                KIND,
                severity,
                code,
                &package.id,
                Some(url),
                format!("{} comes from untrusted {} source {}", package.id, kind, url),
            );
            d.help = Some(format!(
                "Add the URL to sources.allow-{kind} if this source is trusted."
            ));
            let mut data = json!({ "source": kind, "url": url });
            if let Source::Git { rev: Some(rev), .. } = &package.source {
                data["rev"] = json!(rev);
            }
            d.data = data;
            out.push(d);
        }

        out
    }
}
