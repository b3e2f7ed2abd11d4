use super::{
    AdvisoryChecker, BanChecker, CheckSet, Checker, LicenseChecker, SourceChecker, checkers_for,
    stale_database_note,
};
use crate::PolicyEngine;
use crate::advisory::AdvisorySet;
use crate::model::{LicenseMatch, Source};
use crate::policy::{LicenseException, LintLevel, PackageSpec, Policy};
use crate::test_support::{advisory, codes, edge, graph, licensed, pkg, with_source};
use depaudit_types::{CheckerKind, Severity, VerdictStatus, ids};
use std::collections::HashSet;

fn set(items: &[&str]) -> HashSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn licenses_policy(allow: &[&str]) -> Policy {
    let mut policy = Policy::default();
    policy.licenses.allow = set(allow);
    policy
}

// ---------------------------------------------------------------------------
// End-to-end scenarios through the engine
// ---------------------------------------------------------------------------

#[test]
fn allowed_license_passes() {
    let g = graph(vec![licensed("foo", "1.0.0", "MIT")], vec![]);
    let policy = licenses_policy(&["MIT", "Apache-2.0"]);

    let report = PolicyEngine::new(checkers_for(&CheckSet::all(), AdvisorySet::default()))
        .evaluate(&g, &policy);

    assert!(report.verdict.diagnostics.is_empty());
    assert_eq!(report.verdict.status, VerdictStatus::Pass);
}

#[test]
fn yanked_package_denied() {
    let mut bar = licensed("bar", "2.0.0", "MIT");
    bar.yanked = true;
    let g = graph(vec![bar], vec![]);
    let mut policy = licenses_policy(&["MIT"]);
    policy.advisories.yanked = LintLevel::Deny;

    let report = PolicyEngine::new(checkers_for(&CheckSet::all(), AdvisorySet::default()))
        .evaluate(&g, &policy);

    assert_eq!(codes(&report.verdict.diagnostics), vec![ids::CODE_YANKED]);
    assert_eq!(report.verdict.diagnostics[0].severity, Severity::Deny);
    assert_eq!(report.verdict.status, VerdictStatus::Fail);
}

#[test]
fn duplicate_versions_warn() {
    let g = graph(
        vec![
            licensed("baz", "1.0.0", "MIT"),
            licensed("baz", "2.0.0", "MIT"),
        ],
        vec![],
    );
    let policy = licenses_policy(&["MIT"]);

    let report = PolicyEngine::new(checkers_for(&CheckSet::all(), AdvisorySet::default()))
        .evaluate(&g, &policy);

    assert_eq!(codes(&report.verdict.diagnostics), vec![ids::CODE_DUPLICATE_VERSION]);
    let d = &report.verdict.diagnostics[0];
    assert_eq!(d.severity, Severity::Warn);
    assert_eq!(d.package.as_ref().map(|p| p.version.as_str()), Some("2.0.0"));
    assert_eq!(report.verdict.status, VerdictStatus::Warn);
}

#[test]
fn untrusted_git_source_denied() {
    let g = graph(
        vec![with_source(
            licensed("qux", "0.1.0", "MIT"),
            Source::Git {
                url: "https://github.com/someone/qux".to_string(),
                rev: Some("deadbeef".to_string()),
            },
        )],
        vec![],
    );
    let mut policy = licenses_policy(&["MIT"]);
    policy.sources.unknown_git = LintLevel::Deny;

    let report = PolicyEngine::new(checkers_for(&CheckSet::all(), AdvisorySet::default()))
        .evaluate(&g, &policy);

    assert_eq!(codes(&report.verdict.diagnostics), vec![ids::CODE_UNKNOWN_GIT]);
    assert_eq!(report.verdict.diagnostics[0].severity, Severity::Deny);
    assert_eq!(report.verdict.diagnostics[0].data["rev"], "deadbeef");
    assert_eq!(report.verdict.status, VerdictStatus::Fail);
}

#[test]
fn check_set_limits_checkers() {
    let mut bar = pkg("bar", "2.0.0");
    bar.yanked = true;
    let g = graph(vec![bar], vec![]);
    let mut policy = Policy::default();
    policy.advisories.yanked = LintLevel::Deny;

    // Missing license would deny under the license checker, which is not selected.
    let engine = PolicyEngine::new(checkers_for(
        &CheckSet::default().with(CheckerKind::Advisories),
        AdvisorySet::default(),
    ));
    let report = engine.evaluate(&g, &policy);
    assert_eq!(codes(&report.verdict.diagnostics), vec![ids::CODE_YANKED]);
    assert_eq!(report.data.checks, vec![CheckerKind::Advisories]);
}

// ---------------------------------------------------------------------------
// Advisories
// ---------------------------------------------------------------------------

#[test]
fn advisory_match_uses_record_severity_and_id_order() {
    let db = AdvisorySet::new(vec![
        advisory("RUSTSEC-2024-0002", "foo", &["<2.0.0"], Severity::Warn),
        advisory("RUSTSEC-2024-0001", "foo", &["<1.5.0"], Severity::Deny),
        advisory("RUSTSEC-2024-0003", "foo", &[">=3.0.0"], Severity::Deny),
    ]);
    let g = graph(vec![pkg("foo", "1.0.0")], vec![]);

    let out = AdvisoryChecker::new(db).evaluate(&g, &Policy::default());
    let advisories: Vec<&str> = out
        .iter()
        .map(|d| d.data["advisory"].as_str().unwrap_or(""))
        .collect();
    assert_eq!(advisories, vec!["RUSTSEC-2024-0001", "RUSTSEC-2024-0002"]);
    assert_eq!(out[0].severity, Severity::Deny);
    assert_eq!(out[1].severity, Severity::Warn);
    assert!(out.iter().all(|d| d.code == ids::CODE_VULNERABILITY));
}

#[test]
fn ignored_advisory_becomes_note() {
    let db = AdvisorySet::new(vec![advisory(
        "RUSTSEC-2024-0001",
        "foo",
        &[],
        Severity::Deny,
    )]);
    let g = graph(vec![pkg("foo", "1.0.0")], vec![]);
    let mut policy = Policy::default();
    policy.advisories.ignore = set(&["RUSTSEC-2024-0001"]);

    let out = AdvisoryChecker::new(db).evaluate(&g, &policy);
    assert_eq!(codes(&out), vec![ids::CODE_ADVISORY_IGNORED]);
    assert_eq!(out[0].severity, Severity::Note);
}

#[test]
fn unparseable_predicate_is_a_deny_for_that_package() {
    let db = AdvisorySet::new(vec![advisory(
        "RUSTSEC-2024-0001",
        "foo",
        &["not a range"],
        Severity::Warn,
    )]);
    let g = graph(vec![pkg("foo", "1.0.0"), pkg("other", "1.0.0")], vec![]);

    let out = AdvisoryChecker::new(db).evaluate(&g, &Policy::default());
    assert_eq!(codes(&out), vec![ids::CODE_UNKNOWN_VERSION_PREDICATE]);
    assert_eq!(out[0].severity, Severity::Deny);
    assert_eq!(out[0].package.as_ref().map(|p| p.name.as_str()), Some("foo"));
}

#[test]
fn ignored_advisory_with_unparseable_predicate_is_a_note() {
    let db = AdvisorySet::new(vec![advisory(
        "RUSTSEC-2024-0001",
        "foo",
        &["< one.two"],
        Severity::Deny,
    )]);
    let g = graph(vec![pkg("foo", "1.0.0")], vec![]);
    let mut policy = Policy::default();
    policy.advisories.ignore = set(&["RUSTSEC-2024-0001"]);

    let out = AdvisoryChecker::new(db.clone()).evaluate(&g, &policy);
    assert_eq!(codes(&out), vec![ids::CODE_ADVISORY_IGNORED]);
    assert_eq!(out[0].severity, Severity::Note);
    assert_eq!(out[0].data["advisory"], "RUSTSEC-2024-0001");
    assert!(out[0].data["unparseable"].is_string());

    // Other advisory IDs do not suppress it.
    policy.advisories.ignore = set(&["RUSTSEC-2024-0002"]);
    let out = AdvisoryChecker::new(db).evaluate(&g, &policy);
    assert_eq!(codes(&out), vec![ids::CODE_UNKNOWN_VERSION_PREDICATE]);
    assert_eq!(out[0].severity, Severity::Deny);
}

#[test]
fn yanked_respects_level_and_exemptions() {
    let mut bar = pkg("bar", "2.0.0");
    bar.yanked = true;
    let g = graph(vec![bar], vec![]);
    let checker = AdvisoryChecker::new(AdvisorySet::default());

    let mut policy = Policy::default();
    let out = checker.evaluate(&g, &policy);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].severity, Severity::Warn);

    policy.advisories.yanked = LintLevel::Allow;
    assert!(checker.evaluate(&g, &policy).is_empty());

    policy.advisories.yanked = LintLevel::Deny;
    policy.advisories.ignore_yanked = vec![PackageSpec::parse("bar@2.0.0")];
    assert!(checker.evaluate(&g, &policy).is_empty());

    policy.advisories.ignore_yanked = vec![PackageSpec::parse("bar@1.0.0")];
    assert_eq!(checker.evaluate(&g, &policy).len(), 1);
}

#[test]
fn stale_database_note_is_run_level() {
    let note = stale_database_note("connection refused");
    assert_eq!(note.severity, Severity::Note);
    assert_eq!(note.code, ids::CODE_ADVISORY_DB_STALE);
    assert!(note.package.is_none());
    assert!(note.message.contains("connection refused"));
}

// ---------------------------------------------------------------------------
// Licenses
// ---------------------------------------------------------------------------

#[test]
fn license_expression_boolean_semantics() {
    let policy = licenses_policy(&["MIT"]);
    let cases = [
        ("MIT OR GPL-3.0", true),
        ("MIT AND GPL-3.0", false),
        ("GPL-3.0 OR (MIT AND MIT)", true),
        ("(GPL-3.0 OR Apache-2.0) AND MIT", false),
        ("MIT/GPL-3.0", true),
        ("MIT WITH LLVM-exception", true),
    ];
    for (expr, ok) in cases {
        let g = graph(vec![licensed("foo", "1.0.0", expr)], vec![]);
        let out = LicenseChecker.evaluate(&g, &policy);
        assert_eq!(out.is_empty(), ok, "{expr}");
    }
}

#[test]
fn unsatisfied_expression_yields_one_deny_with_rejected_tokens() {
    let g = graph(
        vec![licensed("foo", "1.0.0", "GPL-3.0 AND (MIT OR AGPL-3.0)")],
        vec![],
    );
    let out = LicenseChecker.evaluate(&g, &licenses_policy(&["MIT", "Apache-2.0"]));

    assert_eq!(codes(&out), vec![ids::CODE_LICENSE_NOT_ALLOWED]);
    assert_eq!(out[0].severity, Severity::Deny);
    assert_eq!(
        out[0].data["rejected"],
        serde_json::json!(["GPL-3.0", "AGPL-3.0"])
    );
    assert_eq!(out[0].data["allow"], serde_json::json!(["Apache-2.0", "MIT"]));
}

#[test]
fn first_exception_replaces_global_allow_set() {
    let mut policy = licenses_policy(&["MIT"]);
    policy.licenses.exceptions = vec![
        LicenseException {
            name: "ring".to_string(),
            allow: set(&["ISC", "OpenSSL"]),
        },
        LicenseException {
            name: "ring".to_string(),
            allow: set(&["GPL-3.0"]),
        },
    ];

    let ok = graph(vec![licensed("ring", "0.17.0", "ISC AND OpenSSL")], vec![]);
    assert!(LicenseChecker.evaluate(&ok, &policy).is_empty());

    // The exception replaces, not extends, the global set.
    let mit = graph(vec![licensed("ring", "0.17.0", "MIT")], vec![]);
    let out = LicenseChecker.evaluate(&mit, &policy);
    assert_eq!(codes(&out), vec![ids::CODE_LICENSE_NOT_ALLOWED]);
    assert_eq!(out[0].data["exception"], "ring");

    let second = graph(vec![licensed("ring", "0.17.0", "GPL-3.0")], vec![]);
    assert_eq!(LicenseChecker.evaluate(&second, &policy).len(), 1);
}

#[test]
fn fuzzy_match_needs_confidence_above_threshold() {
    let mut foo = licensed("foo", "1.0.0", "MIT-ish");
    foo.license_matches = vec![LicenseMatch {
        token: "MIT-ish".to_string(),
        license: "MIT".to_string(),
        confidence: 0.9,
    }];
    let g = graph(vec![foo], vec![]);

    let policy = licenses_policy(&["MIT"]);
    assert!(LicenseChecker.evaluate(&g, &policy).is_empty());

    let mut strict = licenses_policy(&["MIT"]);
    strict.licenses = strict.licenses.with_confidence_threshold(0.9);
    assert_eq!(LicenseChecker.evaluate(&g, &strict).len(), 1);

    let mut other = licenses_policy(&["Apache-2.0"]);
    other.licenses = other.licenses.with_confidence_threshold(0.1);
    assert_eq!(LicenseChecker.evaluate(&g, &other).len(), 1);
}

#[test]
fn missing_license_honours_private_ignore() {
    let mut private = pkg("internal", "0.1.0");
    private.private = true;
    let public = pkg("public", "0.1.0");
    let g = graph(vec![private, public], vec![]);

    let mut policy = licenses_policy(&["MIT"]);
    let out = LicenseChecker.evaluate(&g, &policy);
    assert_eq!(out.len(), 2);
    assert!(out.iter().all(|d| d.code == ids::CODE_LICENSE_MISSING));

    policy.licenses.private_ignore = true;
    let out = LicenseChecker.evaluate(&g, &policy);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].package.as_ref().map(|p| p.name.as_str()), Some("public"));
}

#[test]
fn blank_license_counts_as_missing() {
    let g = graph(vec![licensed("foo", "1.0.0", "   ")], vec![]);
    let out = LicenseChecker.evaluate(&g, &licenses_policy(&["MIT"]));
    assert_eq!(codes(&out), vec![ids::CODE_LICENSE_MISSING]);
}

#[test]
fn malformed_expression_is_localised() {
    let g = graph(
        vec![
            licensed("bad", "1.0.0", "MIT AND (Apache-2.0"),
            licensed("good", "1.0.0", "MIT"),
        ],
        vec![],
    );
    let out = LicenseChecker.evaluate(&g, &licenses_policy(&["MIT", "Apache-2.0"]));
    assert_eq!(codes(&out), vec![ids::CODE_LICENSE_UNPARSEABLE]);
    assert_eq!(out[0].severity, Severity::Deny);
    assert_eq!(out[0].package.as_ref().map(|p| p.name.as_str()), Some("bad"));
}

#[test]
fn deeply_nested_expression_is_a_deny_not_a_crash() {
    let deep = format!("{}MIT{}", "(".repeat(5000), ")".repeat(5000));
    let g = graph(
        vec![
            licensed("deep", "1.0.0", &deep),
            licensed("good", "1.0.0", "MIT"),
        ],
        vec![],
    );

    let report = PolicyEngine::new(checkers_for(&CheckSet::all(), AdvisorySet::default()))
        .evaluate(&g, &licenses_policy(&["MIT"]));

    assert_eq!(codes(&report.verdict.diagnostics), vec![ids::CODE_LICENSE_UNPARSEABLE]);
    let d = &report.verdict.diagnostics[0];
    assert_eq!(d.severity, Severity::Deny);
    assert_eq!(d.package.as_ref().map(|p| p.name.as_str()), Some("deep"));
    assert_eq!(report.verdict.status, VerdictStatus::Fail);
}

// ---------------------------------------------------------------------------
// Bans
// ---------------------------------------------------------------------------

#[test]
fn duplicates_flag_every_version_after_the_lowest() {
    let g = graph(
        vec![
            pkg("baz", "1.10.0"),
            pkg("baz", "1.2.0"),
            pkg("baz", "1.9.0"),
            pkg("solo", "1.0.0"),
        ],
        vec![],
    );
    let mut policy = Policy::default();
    policy.bans.multiple_versions = LintLevel::Deny;

    let out = BanChecker.evaluate(&g, &policy);
    let versions: Vec<&str> = out
        .iter()
        .filter_map(|d| d.package.as_ref().map(|p| p.version.as_str()))
        .collect();
    assert_eq!(versions, vec!["1.9.0", "1.10.0"]);
    assert!(out.iter().all(|d| d.severity == Severity::Deny));

    policy.bans.multiple_versions = LintLevel::Allow;
    assert!(BanChecker.evaluate(&g, &policy).is_empty());
}

#[test]
fn wildcard_requirements_are_reported_on_the_target() {
    let g = graph(
        vec![pkg("app", "0.1.0"), pkg("lib", "1.0.0"), pkg("pinned", "1.0.0")],
        vec![
            edge(("app", "0.1.0"), ("lib", "1.0.0"), "*"),
            edge(("app", "0.1.0"), ("pinned", "1.0.0"), "^1.0"),
        ],
    );
    let mut policy = Policy::default();
    assert!(BanChecker.evaluate(&g, &policy).is_empty());

    policy.bans.wildcards = LintLevel::Deny;
    let out = BanChecker.evaluate(&g, &policy);
    assert_eq!(codes(&out), vec![ids::CODE_WILDCARD_REQUIREMENT]);
    assert_eq!(out[0].package.as_ref().map(|p| p.name.as_str()), Some("lib"));
    assert_eq!(out[0].data["dependents"], serde_json::json!(["app@0.1.0"]));
}

#[test]
fn duplicate_and_wildcard_can_both_fire() {
    let g = graph(
        vec![pkg("app", "0.1.0"), pkg("dup", "1.0.0"), pkg("dup", "2.0.0")],
        vec![edge(("app", "0.1.0"), ("dup", "2.0.0"), ">=*")],
    );
    let mut policy = Policy::default();
    policy.bans.wildcards = LintLevel::Warn;

    let out = BanChecker.evaluate(&g, &policy);
    assert_eq!(
        codes(&out),
        vec![ids::CODE_DUPLICATE_VERSION, ids::CODE_WILDCARD_REQUIREMENT]
    );
}

#[test]
fn skip_globs_exempt_both_ban_rules() {
    let g = graph(
        vec![
            pkg("app", "0.1.0"),
            pkg("windows-sys", "0.48.0"),
            pkg("windows-sys", "0.52.0"),
        ],
        vec![edge(("app", "0.1.0"), ("windows-sys", "0.52.0"), "*")],
    );
    let mut policy = Policy::default();
    policy.bans.wildcards = LintLevel::Deny;
    policy.bans.skip = vec!["windows-*".to_string()];

    assert!(BanChecker.evaluate(&g, &policy).is_empty());
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

#[test]
fn sources_levels_and_allow_lists() {
    let g = graph(
        vec![
            with_source(
                pkg("private", "1.0.0"),
                Source::Registry("https://my-registry.example/index".to_string()),
            ),
            with_source(
                pkg("trusted", "1.0.0"),
                Source::Git {
                    url: "https://github.com/org/trusted.git".to_string(),
                    rev: None,
                },
            ),
            with_source(pkg("local", "0.1.0"), Source::Path("crates/local".to_string())),
            pkg("serde", "1.0.0"),
        ],
        vec![],
    );

    let mut policy = Policy::default();
    policy.sources.allow_git = set(&["https://github.com/org/trusted"]);
    let out = SourceChecker.evaluate(&g, &policy);
    assert_eq!(codes(&out), vec![ids::CODE_UNKNOWN_REGISTRY]);
    assert_eq!(out[0].severity, Severity::Warn);

    policy.sources.unknown_registry = LintLevel::Allow;
    assert!(SourceChecker.evaluate(&g, &policy).is_empty());
}
