//! Explain registry for checkers and codes.
//!
//! Maps checker IDs and reason codes to human-readable explanations with remediation guidance.

use crate::ids;

/// Explanation entry for a checker or code.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the checker/code.
    pub title: &'static str,
    /// What the rule does and why it exists.
    pub description: &'static str,
    /// How to resolve diagnostics.
    pub remediation: &'static str,
    /// Before/after `depaudit.toml` examples.
    pub examples: ExamplePair,
}

/// Before and after configuration examples.
#[derive(Debug, Clone)]
pub struct ExamplePair {
    /// Configuration that would produce a diagnostic.
    pub before: &'static str,
    /// Configuration that passes.
    pub after: &'static str,
}

/// Look up an explanation by checker ID or code.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    match identifier {
        // Checkers
        ids::CHECK_ADVISORIES => Some(explain_advisories()),
        ids::CHECK_LICENSES => Some(explain_licenses()),
        ids::CHECK_BANS => Some(explain_bans()),
        ids::CHECK_SOURCES => Some(explain_sources()),

        // Codes
        ids::CODE_VULNERABILITY => Some(explain_vulnerability()),
        ids::CODE_ADVISORY_IGNORED => Some(explain_advisory_ignored()),
        ids::CODE_YANKED => Some(explain_yanked()),
        ids::CODE_UNKNOWN_VERSION_PREDICATE => Some(explain_unknown_version_predicate()),
        ids::CODE_ADVISORY_DB_STALE => Some(explain_advisory_db_stale()),
        ids::CODE_LICENSE_NOT_ALLOWED => Some(explain_license_not_allowed()),
        ids::CODE_LICENSE_MISSING => Some(explain_license_missing()),
        ids::CODE_LICENSE_UNPARSEABLE => Some(explain_license_unparseable()),
        ids::CODE_DUPLICATE_VERSION => Some(explain_duplicate_version()),
        ids::CODE_WILDCARD_REQUIREMENT => Some(explain_wildcard_requirement()),
        ids::CODE_UNKNOWN_REGISTRY => Some(explain_unknown_registry()),
        ids::CODE_UNKNOWN_GIT => Some(explain_unknown_git()),

        _ => None,
    }
}

/// List all known checker IDs.
pub fn all_check_ids() -> &'static [&'static str] {
    &[
        ids::CHECK_ADVISORIES,
        ids::CHECK_BANS,
        ids::CHECK_LICENSES,
        ids::CHECK_SOURCES,
    ]
}

/// List all known codes.
pub fn all_codes() -> &'static [&'static str] {
    &[
        ids::CODE_VULNERABILITY,
        ids::CODE_ADVISORY_IGNORED,
        ids::CODE_YANKED,
        ids::CODE_UNKNOWN_VERSION_PREDICATE,
        ids::CODE_ADVISORY_DB_STALE,
        ids::CODE_LICENSE_NOT_ALLOWED,
        ids::CODE_LICENSE_MISSING,
        ids::CODE_LICENSE_UNPARSEABLE,
        ids::CODE_DUPLICATE_VERSION,
        ids::CODE_WILDCARD_REQUIREMENT,
        ids::CODE_UNKNOWN_REGISTRY,
        ids::CODE_UNKNOWN_GIT,
    ]
}

// --- Checker-level explanations ---

fn explain_advisories() -> Explanation {
    Explanation {
        title: "Security Advisories",
        description: "\
Matches every package in the dependency graph against the loaded advisory database.

A package is affected when its version satisfies one of the advisory's affected
requirements and none of its patched requirements. Yanked package versions are
reported according to `advisories.yanked`.

Advisories listed in `advisories.ignore` are still reported, downgraded to a note,
so a suppression is never silent.",
        remediation: "\
Upgrade the affected package to a patched version. If the advisory does not apply
to how the package is used, add its ID to `advisories.ignore` with a comment
explaining why.",
        examples: ExamplePair {
            before: r#"[advisories]
yanked = "deny""#,
            after: r#"[advisories]
yanked = "deny"
ignore = ["RUSTSEC-2020-0071"]  # not reachable: we never call localtime"#,
        },
    }
}

fn explain_licenses() -> Explanation {
    Explanation {
        title: "License Admissibility",
        description: "\
Evaluates each package's SPDX license expression against the allow-set.

`AND` requires every operand to be allowed, `OR` requires at least one. A package
named in `licenses.exceptions` is evaluated against that exception's allow-set
instead of the global one; the first matching exception wins.",
        remediation: "\
Either add the license to `licenses.allow` after legal review, add a per-package
exception, or replace the dependency.",
        examples: ExamplePair {
            before: r#"[licenses]
allow = ["MIT"]"#,
            after: r#"[licenses]
allow = ["MIT", "Apache-2.0"]
exceptions = [{ name = "ring", allow = ["ISC", "OpenSSL"] }]"#,
        },
    }
}

fn explain_bans() -> Explanation {
    Explanation {
        title: "Dependency Bans",
        description: "\
Detects packages present in more than one version, and packages declared with a
wildcard version requirement.

Duplicate versions bloat build times and binary size. Wildcard requirements offer
no version pinning at all.",
        remediation: "\
Align dependents on one version, or exempt the package via `bans.skip`. Replace
wildcard requirements with explicit semver requirements.",
        examples: ExamplePair {
            before: r#"[bans]
multiple-versions = "deny""#,
            after: r#"[bans]
multiple-versions = "deny"
skip = ["windows-*"]"#,
        },
    }
}

fn explain_sources() -> Explanation {
    Explanation {
        title: "Trusted Sources",
        description: "\
Checks that every package was fetched from a trusted registry or git repository.
Local path packages are always allowed.",
        remediation: "\
Add the registry or git URL to `sources.allow-registry` / `sources.allow-git`, or
move the dependency to a trusted source.",
        examples: ExamplePair {
            before: r#"[sources]
unknown-git = "deny""#,
            after: r#"[sources]
unknown-git = "deny"
allow-git = ["https://github.com/my-org/my-fork"]"#,
        },
    }
}

// --- Code-level explanations ---

fn explain_vulnerability() -> Explanation {
    Explanation {
        title: "Vulnerable Package Version",
        description: "\
The package version is covered by a published security advisory. The diagnostic
severity is the advisory's own severity.",
        remediation: "Upgrade to a version matched by the advisory's patched requirements.",
        examples: ExamplePair {
            before: r#"# Cargo.lock
name = "time"
version = "0.1.43""#,
            after: r#"# Cargo.lock
name = "time"
version = "0.3.36""#,
        },
    }
}

fn explain_advisory_ignored() -> Explanation {
    Explanation {
        title: "Ignored Advisory Matched",
        description: "\
An advisory listed in `advisories.ignore` matched a package. The match is recorded
as a note so suppressions remain visible in every report.",
        remediation: "\
No action required. Periodically review the ignore list and remove entries once
the dependency has been upgraded.",
        examples: ExamplePair {
            before: r#"[advisories]
ignore = ["RUSTSEC-2020-0071"]"#,
            after: r#"[advisories]
ignore = []  # upgraded past the affected range"#,
        },
    }
}

fn explain_yanked() -> Explanation {
    Explanation {
        title: "Yanked Package Version",
        description: "\
The resolved package version was yanked by its publisher, usually because of a
defect. Severity follows `advisories.yanked`.",
        remediation: "\
Update the lockfile to a non-yanked version, or exempt the package with
`advisories.ignore-yanked`.",
        examples: ExamplePair {
            before: r#"[advisories]
yanked = "deny""#,
            after: r#"[advisories]
yanked = "deny"
ignore-yanked = ["bar@2.0.0"]"#,
        },
    }
}

fn explain_unknown_version_predicate() -> Explanation {
    Explanation {
        title: "Unknown Version Predicate",
        description: "\
An advisory's affected or patched requirement, or the package's own version, could
not be parsed as semver. The package cannot be proven safe and is denied.",
        remediation: "\
Fix the advisory database entry or the package version in the graph snapshot.",
        examples: ExamplePair {
            before: r#"{ "affected": ["< one.two"] }"#,
            after: r#"{ "affected": ["< 1.2.0"] }"#,
        },
    }
}

fn explain_advisory_db_stale() -> Explanation {
    Explanation {
        title: "Stale Advisory Database",
        description: "\
Refreshing the advisory database failed and the last cached copy was used instead.
The verdict may miss advisories published since the cache was written.",
        remediation: "\
Check network access to `advisories.db-urls`, or raise
`advisories.fetch-timeout-secs`.",
        examples: ExamplePair {
            before: r#"[advisories]
fetch-timeout-secs = 1"#,
            after: r#"[advisories]
fetch-timeout-secs = 30"#,
        },
    }
}

fn explain_license_not_allowed() -> Explanation {
    Explanation {
        title: "License Not Allowed",
        description: "\
The package's license expression is not satisfied by the effective allow-set.",
        remediation: "\
Allow one of the licenses offered by the expression, or add a per-package exception.",
        examples: ExamplePair {
            before: r#"[licenses]
allow = ["MIT"]  # package is "GPL-3.0-only OR MPL-2.0""#,
            after: r#"[licenses]
allow = ["MIT", "MPL-2.0"]"#,
        },
    }
}

fn explain_license_missing() -> Explanation {
    Explanation {
        title: "Missing License",
        description: "\
The package declares no license expression at all. Private packages are exempt
when `licenses.private.ignore` is set.",
        remediation: "\
Add a `license` field to the package, or set `licenses.private.ignore = true` for
unpublished workspace crates.",
        examples: ExamplePair {
            before: r#"[licenses.private]
ignore = false"#,
            after: r#"[licenses.private]
ignore = true"#,
        },
    }
}

fn explain_license_unparseable() -> Explanation {
    Explanation {
        title: "Unparseable License Expression",
        description: "\
The license expression is not a well-formed combination of license identifiers
joined by AND/OR. It is treated as an unknown license and denied.",
        remediation: "Fix the package's `license` field to a valid SPDX expression.",
        examples: ExamplePair {
            before: r#"license = "MIT AND (Apache-2.0""#,
            after: r#"license = "MIT AND Apache-2.0""#,
        },
    }
}

fn explain_duplicate_version() -> Explanation {
    Explanation {
        title: "Duplicate Package Version",
        description: "\
More than one version of the package is present. The lowest version is never
flagged; each additional version produces one diagnostic.",
        remediation: "\
Upgrade dependents so they agree on one version, or exempt the name via `bans.skip`.",
        examples: ExamplePair {
            before: r#"[bans]
multiple-versions = "deny""#,
            after: r#"[bans]
multiple-versions = "warn""#,
        },
    }
}

fn explain_wildcard_requirement() -> Explanation {
    Explanation {
        title: "Wildcard Version Requirement",
        description: "\
A dependent declared this package with a requirement that matches any version
(for example `*`).",
        remediation: "Replace the wildcard with an explicit semver requirement.",
        examples: ExamplePair {
            before: r#"[dependencies]
serde = "*""#,
            after: r#"[dependencies]
serde = "1.0""#,
        },
    }
}

fn explain_unknown_registry() -> Explanation {
    Explanation {
        title: "Unknown Registry",
        description: "The package was fetched from a registry not listed in `sources.allow-registry`.",
        remediation: "Add the registry to `sources.allow-registry` if it is trusted.",
        examples: ExamplePair {
            before: r#"[sources]
allow-registry = []"#,
            after: r#"[sources]
allow-registry = ["https://github.com/rust-lang/crates.io-index"]"#,
        },
    }
}

fn explain_unknown_git() -> Explanation {
    Explanation {
        title: "Unknown Git Source",
        description: "The package was fetched from a git repository not listed in `sources.allow-git`.",
        remediation: "Add the repository to `sources.allow-git` if it is trusted.",
        examples: ExamplePair {
            before: r#"[sources]
allow-git = []"#,
            after: r#"[sources]
allow-git = ["https://github.com/my-org/my-fork"]"#,
        },
    }
}
