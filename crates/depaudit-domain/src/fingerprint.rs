use depaudit_types::CheckerKind;
use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a diagnostic.
///
/// Identity fields:
/// - checker
/// - code
/// - package name and version (if attributed)
/// - discriminator (advisory ID, source URL, ... if present)
pub fn fingerprint_for(
    checker: CheckerKind,
    code: &str,
    package: Option<(&str, &str)>,
    discriminator: Option<&str>,
) -> String {
    let mut parts = vec![checker.as_str(), code];
    if let Some((name, version)) = package {
        parts.push(name);
        parts.push(version);
    }
    if let Some(d) = discriminator {
        parts.push(d);
    }
    // Parts are NUL-separated; identity fields never contain NUL.
    let mut hasher = Sha256::new();
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            hasher.update([0u8]);
        }
        hasher.update(part.as_bytes());
    }
    let digest = hasher.finalize();
    hex::encode(digest)
}
