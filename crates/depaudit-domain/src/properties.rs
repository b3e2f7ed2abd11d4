//! Property-based tests for the engine.
//!
//! These tests use proptest to verify invariants around:
//! - License expressions built only from allowed tokens
//! - Ignored advisories never escalating past a note
//! - Duplicate-version counting
//! - Verdict monotonicity and ordering determinism

use crate::PolicyEngine;
use crate::advisory::AdvisorySet;
use crate::checks::{AdvisoryChecker, BanChecker, CheckSet, Checker, LicenseChecker, checkers_for};
use crate::policy::{LintLevel, Policy};
use crate::test_support::{advisory, diag, graph, licensed, pkg};
use depaudit_types::{CheckerKind, Diagnostic, Severity, VerdictStatus, ids};
use proptest::prelude::*;
use std::collections::HashSet;

// ============================================================================
// Strategies
// ============================================================================

const TOKENS: &[&str] = &["MIT", "Apache-2.0", "BSD-3-Clause", "ISC", "Zlib", "GPL-3.0"];

fn arb_token() -> impl Strategy<Value = String> {
    prop::sample::select(TOKENS).prop_map(str::to_string)
}

/// Random well-formed expressions over `tokens`.
fn arb_expr(tokens: Vec<String>) -> impl Strategy<Value = String> {
    let leaf = prop::sample::select(tokens);
    leaf.prop_recursive(4, 24, 3, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 2..4).prop_map(|xs| xs.join(" AND ")),
            prop::collection::vec(inner.clone(), 2..4).prop_map(|xs| xs.join(" OR ")),
            inner.prop_map(|x| format!("({x})")),
        ]
    })
}

/// An allow-set together with an expression using only its members.
fn arb_allowed_expr() -> impl Strategy<Value = (HashSet<String>, String)> {
    prop::collection::hash_set(arb_token(), 1..4).prop_flat_map(|allow| {
        let tokens: Vec<String> = allow.iter().cloned().collect();
        (Just(allow), arb_expr(tokens))
    })
}

fn arb_severity() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Note),
        Just(Severity::Warn),
        Just(Severity::Deny),
    ]
}

fn arb_diagnostics() -> impl Strategy<Value = Vec<Diagnostic>> {
    prop::collection::vec(
        (arb_severity(), "[a-e]", 1u32..4),
        0..12,
    )
    .prop_map(|items| {
        items
            .into_iter()
            .map(|(sev, name, major)| {
                diag(sev, CheckerKind::Bans, &name, &format!("{major}.0.0"))
            })
            .collect()
    })
}

struct Fixed(Vec<Diagnostic>);

impl Checker for Fixed {
    fn kind(&self) -> CheckerKind {
        CheckerKind::Bans
    }

    fn evaluate(&self, _: &crate::model::DependencyGraph, _: &Policy) -> Vec<Diagnostic> {
        self.0.clone()
    }
}

fn rank(status: VerdictStatus) -> u8 {
    match status {
        VerdictStatus::Pass => 0,
        VerdictStatus::Warn => 1,
        VerdictStatus::Fail => 2,
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn expressions_of_allowed_tokens_never_diagnose((allow, expr) in arb_allowed_expr()) {
        let g = graph(vec![licensed("foo", "1.0.0", &expr)], vec![]);
        let mut policy = Policy::default();
        policy.licenses.allow = allow;

        let out = LicenseChecker.evaluate(&g, &policy);
        prop_assert!(out.is_empty(), "{} produced {:?}", expr, out);
    }

    #[test]
    fn ignored_advisories_are_notes_regardless_of_severity(
        severity in arb_severity(),
        minor in 0u64..20,
    ) {
        let db = AdvisorySet::new(vec![advisory("RUSTSEC-2024-0001", "foo", &[], severity)]);
        let g = graph(vec![pkg("foo", &format!("1.{minor}.0"))], vec![]);
        let mut policy = Policy::default();
        policy.advisories.ignore.insert("RUSTSEC-2024-0001".to_string());

        let out = AdvisoryChecker::new(db).evaluate(&g, &policy);
        prop_assert_eq!(out.len(), 1);
        prop_assert_eq!(out[0].severity, Severity::Note);
        prop_assert_eq!(out[0].code.as_str(), ids::CODE_ADVISORY_IGNORED);
    }

    #[test]
    fn n_versions_yield_n_minus_one_warnings(
        minors in prop::collection::btree_set(0u64..50, 1..8),
    ) {
        let packages = minors.iter().map(|m| pkg("baz", &format!("1.{m}.0"))).collect();
        let g = graph(packages, vec![]);
        let mut policy = Policy::default();
        policy.bans.multiple_versions = LintLevel::Warn;

        let out = BanChecker.evaluate(&g, &policy);
        prop_assert_eq!(out.len(), minors.len() - 1);
        prop_assert!(out.iter().all(|d| d.severity == Severity::Warn));

        let lowest = format!("1.{}.0", minors.iter().next().copied().unwrap_or_default());
        prop_assert!(out
            .iter()
            .all(|d| d.package.as_ref().map(|p| p.version.as_str()) != Some(lowest.as_str())));
    }

    #[test]
    fn adding_diagnostics_never_lowers_the_verdict(
        base in arb_diagnostics(),
        extra in arb_diagnostics(),
    ) {
        let g = graph(vec![], vec![]);
        let policy = Policy::default();

        let before = PolicyEngine::new(vec![Box::new(Fixed(base.clone()))]).evaluate(&g, &policy);
        let mut all = base;
        all.extend(extra);
        let after = PolicyEngine::new(vec![Box::new(Fixed(all))]).evaluate(&g, &policy);

        prop_assert!(rank(after.verdict.status) >= rank(before.verdict.status));
    }

    #[test]
    fn ordering_is_independent_of_input_order(diags in arb_diagnostics()) {
        let g = graph(vec![], vec![]);
        let policy = Policy::default();

        let mut reversed = diags.clone();
        reversed.reverse();
        let a = PolicyEngine::new(vec![Box::new(Fixed(diags))]).evaluate(&g, &policy);
        let b = PolicyEngine::new(vec![Box::new(Fixed(reversed))]).evaluate(&g, &policy);

        prop_assert_eq!(a.verdict.diagnostics, b.verdict.diagnostics);
    }
}

#[test]
fn all_checkers_agree_on_an_empty_graph() {
    let report = PolicyEngine::new(checkers_for(&CheckSet::all(), AdvisorySet::default()))
        .evaluate(&graph(vec![], vec![]), &Policy::default());
    assert_eq!(report.verdict.status, VerdictStatus::Pass);
}
