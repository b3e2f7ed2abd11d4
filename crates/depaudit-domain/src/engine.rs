use crate::checks::Checker;
use crate::model::DependencyGraph;
use crate::policy::Policy;
use crate::report::{DomainReport, SeverityCounts, Verdict};
use depaudit_types::{AuditData, CheckerKind, Diagnostic};
use rayon::prelude::*;
use std::cmp::Ordering;

/// Runs a fixed set of checkers against one graph and policy and aggregates the result.
pub struct PolicyEngine {
    checkers: Vec<Box<dyn Checker>>,
    notes: Vec<Diagnostic>,
}

impl PolicyEngine {
    pub fn new(checkers: Vec<Box<dyn Checker>>) -> Self {
        Self {
            checkers,
            notes: Vec::new(),
        }
    }

    /// Run-level diagnostics produced before evaluation (e.g. advisory database fallback),
    /// merged into the result like any checker output.
    pub fn with_notes(mut self, notes: Vec<Diagnostic>) -> Self {
        self.notes = notes;
        self
    }

    /// Kinds of the configured checkers, in name order.
    pub fn kinds(&self) -> Vec<CheckerKind> {
        let mut kinds: Vec<CheckerKind> = self.checkers.iter().map(|c| c.kind()).collect();
        kinds.sort();
        kinds.dedup();
        kinds
    }

    pub fn evaluate(&self, graph: &DependencyGraph, policy: &Policy) -> DomainReport {
        let span = tracing::info_span!("evaluate", packages = graph.len());
        let _guard = span.enter();

        // Each checker gets its own output list; lists are joined before merging.
        let per_checker: Vec<Vec<Diagnostic>> = self
            .checkers
            .par_iter()
            .map(|checker| {
                let out = checker.evaluate(graph, policy);
                tracing::debug!(checker = %checker.kind(), diagnostics = out.len(), "checker finished");
                out
            })
            .collect();

        let mut diagnostics: Vec<Diagnostic> = self.notes.clone();
        diagnostics.extend(per_checker.into_iter().flatten());

        diagnostics.sort_by(compare_diagnostics);
        diagnostics.dedup_by(|a, b| is_same_diagnostic(a, b));

        let counts = SeverityCounts::from_diagnostics(&diagnostics);
        let verdict = Verdict::from_diagnostics(diagnostics);

        tracing::info!(
            status = verdict.status.as_str(),
            deny = counts.deny,
            warn = counts.warn,
            note = counts.note,
            "evaluation complete"
        );

        let data = AuditData {
            checks: self.kinds(),
            packages_scanned: saturating_u32(graph.len()),
            edges_scanned: saturating_u32(graph.edges().len()),
            advisories_loaded: None,
            diagnostics_total: saturating_u32(verdict.diagnostics.len()),
        };

        DomainReport {
            verdict,
            counts,
            data,
        }
    }
}

/// Report order:
/// 1) severity (deny -> warn -> note)
/// 2) package name (run-level diagnostics last)
/// 3) checker name
/// 4) package version
/// 5) code
/// 6) message
/// 7) fingerprint
pub(crate) fn compare_diagnostics(a: &Diagnostic, b: &Diagnostic) -> Ordering {
    fn name(d: &Diagnostic) -> Option<&str> {
        d.package.as_ref().map(|p| p.name.as_str())
    }
    fn version(d: &Diagnostic) -> Option<&str> {
        d.package.as_ref().map(|p| p.version.as_str())
    }

    b.severity
        .cmp(&a.severity)
        .then_with(|| none_last(name(a), name(b), |x, y| x.cmp(y)))
        .then_with(|| a.checker.cmp(&b.checker))
        .then_with(|| none_last(version(a), version(b), crate::version::compare_versions))
        .then_with(|| a.code.cmp(&b.code))
        .then_with(|| a.message.cmp(&b.message))
        .then_with(|| a.fingerprint.cmp(&b.fingerprint))
}

fn none_last<'a>(
    a: Option<&'a str>,
    b: Option<&'a str>,
    cmp: impl Fn(&'a str, &'a str) -> Ordering,
) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => cmp(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Report counters are `u32`; larger counts saturate.
pub(crate) fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

fn is_same_diagnostic(a: &Diagnostic, b: &Diagnostic) -> bool {
    a.severity == b.severity
        && a.checker == b.checker
        && a.code == b.code
        && a.package == b.package
        && a.message == b.message
        && a.fingerprint == b.fingerprint
}
