use crate::checks::Checker;
use crate::checks::utils::package_diagnostic;
use crate::license_expr::{self, LicenseReq};
use crate::model::{DependencyGraph, Package};
use crate::policy::Policy;
use depaudit_types::{CheckerKind, Diagnostic, Severity, ids};
use serde_json::json;
use std::collections::HashSet;

const KIND: CheckerKind = CheckerKind::Licenses;

pub struct LicenseChecker;

impl Checker for LicenseChecker {
    fn kind(&self) -> CheckerKind {
        KIND
    }

    fn evaluate(&self, graph: &DependencyGraph, policy: &Policy) -> Vec<Diagnostic> {
        let licenses = &policy.licenses;
        let threshold = licenses.confidence_threshold();
        let mut out = Vec::new();

        for package in graph.packages() {
            let expression = package
                .license
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty());

            let Some(expression) = expression else {
                if licenses.private_ignore && package.private {
                    continue;
                }
                out.push(missing(package));
                continue;
            };

            let (allow, exception) = licenses.effective_allow(package.name());

            let expr = match license_expr::parse(expression) {
                Ok(expr) => expr,
                Err(err) => {
                    out.push(unparseable(package, expression, &err.to_string()));
                    continue;
                }
            };

            let satisfied =
                expr.evaluate(&mut |req| is_satisfied(req, allow, package, threshold));
            if satisfied {
                continue;
            }

            let rejected: Vec<String> = expr
                .requirements()
                .into_iter()
                .filter(|req| !is_satisfied(req, allow, package, threshold))
                .map(|req| req.to_string())
                .collect();
            let mut allowed: Vec<&str> = allow.iter().map(String::as_str).collect();
            allowed.sort_unstable();

            let mut d = package_diagnostic(
                KIND,
                Severity::Deny,
                ids::CODE_LICENSE_NOT_ALLOWED,
                &package.id,
                Some(expression),
                format!(
                    "license not allowed: {} is licensed under `{}`",
                    package.id, expression
                ),
            );
            d.help = Some(match exception {
                Some(e) => format!(
                    "Add one of the rejected licenses to the exception for '{}'.",
                    e.name
                ),
                None => "Add one of the rejected licenses to licenses.allow, or add a \
                         per-package exception."
                    .to_string(),
            });
            d.data = json!({
                "expression": expression,
                "rejected": rejected,
                "allow": allowed,
                "exception": exception.map(|e| e.name.as_str()),
            });
            out.push(d);
        }

        out
    }
}

/// A leaf is satisfied by exact allow-set membership (an exception only widens a license, so
/// `X WITH Y` is also satisfied when `X` is allowed), or by a fuzzy match for the token whose
/// confidence exceeds the threshold and whose resolved license is allowed.
fn is_satisfied(
    req: &LicenseReq,
    allow: &HashSet<String>,
    package: &Package,
    threshold: f32,
) -> bool {
    if allow.contains(&req.to_string()) || allow.contains(&req.license) {
        return true;
    }
    package.license_matches.iter().any(|m| {
        m.token == req.license && m.confidence > threshold && allow.contains(&m.license)
    })
}

fn missing(package: &Package) -> Diagnostic {
    let mut d = package_diagnostic(
        KIND,
        Severity::Deny,
        ids::CODE_LICENSE_MISSING,
        &package.id,
        None,
        format!("{} does not declare a license", package.id),
    );
    d.help = Some(
        "Declare a license for the package, or set licenses.private.ignore for unpublished crates."
            .to_string(),
    );
    d.data = json!({ "private": package.private });
    d
}

fn unparseable(package: &Package, expression: &str, reason: &str) -> Diagnostic {
    let mut d = package_diagnostic(
        KIND,
        Severity::Deny,
        ids::CODE_LICENSE_UNPARSEABLE,
        &package.id,
        Some(expression),
        format!(
            "unknown license: {} has a malformed expression `{}` ({})",
            package.id, expression, reason
        ),
    );
    d.data = json!({ "expression": expression, "error": reason });
    d
}
