//! Version parsing, ordering, and wildcard detection.

use semver::Version;
use std::cmp::Ordering;

/// Total order over version strings.
///
/// Valid semver versions compare by semver precedence and sort before anything that does not
/// parse. Ties (and pairs of unparseable versions) fall back to plain string order, which keeps
/// the order consistent with string equality.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let by_semver = match (Version::parse(a), Version::parse(b)) {
        (Ok(va), Ok(vb)) => va.cmp(&vb),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => Ordering::Equal,
    };
    by_semver.then_with(|| a.cmp(b))
}

/// Returns true if a version requirement matches effectively any version.
///
/// Recognised forms: empty, `*`, `=*`, `^*`, `~*`, `>=*`, `x`, `X`, and comma-joined lists made
/// only of those. Partial wildcards such as `1.*` still pin a major version and are not reported.
pub fn is_wildcard_requirement(req: &str) -> bool {
    req.split(',').all(|part| {
        let part = part.trim();
        let bare = part
            .trim_start_matches(['=', '^', '~', '>'])
            .trim_start();
        matches!(bare, "" | "*" | "x" | "X")
    })
}
