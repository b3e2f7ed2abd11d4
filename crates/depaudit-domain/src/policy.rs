use crate::model::PackageId;
use depaudit_types::Severity;
use std::collections::HashSet;

/// Per-rule reaction: `deny`, `warn`, or `allow` (no diagnostic).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LintLevel {
    Deny,
    #[default]
    Warn,
    Allow,
}

impl LintLevel {
    pub fn severity(self) -> Option<Severity> {
        match self {
            LintLevel::Deny => Some(Severity::Deny),
            LintLevel::Warn => Some(Severity::Warn),
            LintLevel::Allow => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LintLevel::Deny => "deny",
            LintLevel::Warn => "warn",
            LintLevel::Allow => "allow",
        }
    }
}

/// `name` or `name@version`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageSpec {
    pub name: String,
    pub version: Option<String>,
}

impl PackageSpec {
    pub fn parse(spec: &str) -> Self {
        match spec.trim().split_once('@') {
            Some((name, version)) => Self {
                name: name.to_string(),
                version: Some(version.to_string()),
            },
            None => Self {
                name: spec.trim().to_string(),
                version: None,
            },
        }
    }

    pub fn matches(&self, id: &PackageId) -> bool {
        self.name == id.name && self.version.as_deref().is_none_or(|v| v == id.version)
    }
}

#[derive(Clone, Debug, Default)]
pub struct AdvisoryPolicy {
    pub yanked: LintLevel,
    /// Advisory IDs whose matches are downgraded to notes.
    pub ignore: HashSet<String>,
    /// Packages exempt from the yanked rule.
    pub ignore_yanked: Vec<PackageSpec>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LicenseException {
    pub name: String,
    pub allow: HashSet<String>,
}

pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.8;

#[derive(Clone, Debug)]
pub struct LicensePolicy {
    pub allow: HashSet<String>,
    /// Evaluated in order; the first exception naming a package wins.
    pub exceptions: Vec<LicenseException>,
    pub private_ignore: bool,
    confidence_threshold: f32,
}

impl Default for LicensePolicy {
    fn default() -> Self {
        Self {
            allow: HashSet::new(),
            exceptions: Vec::new(),
            private_ignore: false,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }
}

impl LicensePolicy {
    /// A policy with the default confidence threshold.
    pub fn new(
        allow: HashSet<String>,
        exceptions: Vec<LicenseException>,
        private_ignore: bool,
    ) -> Self {
        Self {
            allow,
            exceptions,
            private_ignore,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }

    pub fn confidence_threshold(&self) -> f32 {
        self.confidence_threshold
    }

    /// Set the threshold, clamped to `[0, 1]`. NaN keeps the default.
    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = clamp_confidence(threshold);
        self
    }

    /// The allow-set that applies to `name`, plus the exception that supplied it (if any).
    pub fn effective_allow(&self, name: &str) -> (&HashSet<String>, Option<&LicenseException>) {
        match self.exceptions.iter().find(|e| e.name == name) {
            Some(exception) => (&exception.allow, Some(exception)),
            None => (&self.allow, None),
        }
    }
}

pub fn clamp_confidence(threshold: f32) -> f32 {
    if threshold.is_nan() {
        DEFAULT_CONFIDENCE_THRESHOLD
    } else {
        threshold.clamp(0.0, 1.0)
    }
}

#[derive(Clone, Debug)]
pub struct BanPolicy {
    pub multiple_versions: LintLevel,
    pub wildcards: LintLevel,
    /// Glob patterns over package names exempt from both ban rules.
    pub skip: Vec<String>,
}

impl Default for BanPolicy {
    fn default() -> Self {
        Self {
            multiple_versions: LintLevel::Warn,
            wildcards: LintLevel::Allow,
            skip: Vec::new(),
        }
    }
}

pub const CRATES_IO_INDEX: &str = "https://github.com/rust-lang/crates.io-index";

/// Trusted-source lists. Entries are stored normalized (see [`normalize_source_url`]).
#[derive(Clone, Debug)]
pub struct SourcePolicy {
    pub unknown_registry: LintLevel,
    pub unknown_git: LintLevel,
    pub allow_registry: HashSet<String>,
    pub allow_git: HashSet<String>,
}

impl Default for SourcePolicy {
    fn default() -> Self {
        Self {
            unknown_registry: LintLevel::Warn,
            unknown_git: LintLevel::Warn,
            allow_registry: HashSet::from([normalize_source_url(CRATES_IO_INDEX)]),
            allow_git: HashSet::new(),
        }
    }
}

impl SourcePolicy {
    pub fn is_known_registry(&self, url: &str) -> bool {
        self.allow_registry.contains(&normalize_source_url(url))
    }

    pub fn is_known_git(&self, url: &str) -> bool {
        self.allow_git.contains(&normalize_source_url(url))
    }
}

/// Immutable policy passed explicitly to every checker.
#[derive(Clone, Debug, Default)]
pub struct Policy {
    pub advisories: AdvisoryPolicy,
    pub licenses: LicensePolicy,
    pub bans: BanPolicy,
    pub sources: SourcePolicy,
}

/// Canonical form for source URLs: lower-case scheme and host, no query or fragment, no trailing
/// `/` or `.git`.
pub fn normalize_source_url(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_query = trimmed.split(['#', '?']).next().unwrap_or(trimmed);

    let mut out = String::new();
    let rest = match without_query.split_once("://") {
        Some((scheme, rest)) => {
            out.push_str(&scheme.to_ascii_lowercase());
            out.push_str("://");
            rest
        }
        None => without_query,
    };
    match rest.split_once('/') {
        Some((host, path)) => {
            out.push_str(&host.to_ascii_lowercase());
            out.push('/');
            out.push_str(path);
        }
        None => out.push_str(&rest.to_ascii_lowercase()),
    }

    let mut out = out.trim_end_matches('/').to_string();
    if let Some(stripped) = out.strip_suffix(".git") {
        out = stripped.trim_end_matches('/').to_string();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lint_level_maps_to_severity() {
        assert_eq!(LintLevel::Deny.severity(), Some(Severity::Deny));
        assert_eq!(LintLevel::Warn.severity(), Some(Severity::Warn));
        assert_eq!(LintLevel::Allow.severity(), None);
    }

    #[test]
    fn confidence_threshold_is_clamped() {
        assert_eq!(
            LicensePolicy::default()
                .with_confidence_threshold(1.7)
                .confidence_threshold(),
            1.0
        );
        assert_eq!(
            LicensePolicy::default()
                .with_confidence_threshold(-0.2)
                .confidence_threshold(),
            0.0
        );
        assert_eq!(
            LicensePolicy::default()
                .with_confidence_threshold(f32::NAN)
                .confidence_threshold(),
            DEFAULT_CONFIDENCE_THRESHOLD
        );
    }

    #[test]
    fn first_matching_exception_wins() {
        let policy = LicensePolicy {
            allow: HashSet::from(["MIT".to_string()]),
            exceptions: vec![
                LicenseException {
                    name: "ring".to_string(),
                    allow: HashSet::from(["ISC".to_string()]),
                },
                LicenseException {
                    name: "ring".to_string(),
                    allow: HashSet::from(["OpenSSL".to_string()]),
                },
            ],
            ..LicensePolicy::default()
        };

        let (allow, exception) = policy.effective_allow("ring");
        assert!(allow.contains("ISC"));
        assert!(!allow.contains("OpenSSL"));
        assert!(exception.is_some());

        let (allow, exception) = policy.effective_allow("serde");
        assert!(allow.contains("MIT"));
        assert!(exception.is_none());
    }

    #[test]
    fn package_spec_matches_name_and_optional_version() {
        let any = PackageSpec::parse("bar");
        let exact = PackageSpec::parse("bar@2.0.0");
        let id = PackageId::new("bar", "2.0.0");
        let other = PackageId::new("bar", "1.0.0");
        assert!(any.matches(&id) && any.matches(&other));
        assert!(exact.matches(&id));
        assert!(!exact.matches(&other));
    }

    #[test]
    fn normalizes_source_urls() {
        assert_eq!(
            normalize_source_url("HTTPS://GitHub.com/Org/Repo.git/"),
            "https://github.com/Org/Repo"
        );
        assert_eq!(
            normalize_source_url("https://github.com/org/repo?rev=1#abc"),
            "https://github.com/org/repo"
        );
        assert_eq!(
            normalize_source_url("sparse+https://index.crates.io/"),
            "sparse+https://index.crates.io"
        );
    }

    #[test]
    fn default_sources_trust_crates_io_only() {
        let policy = SourcePolicy::default();
        assert!(policy.is_known_registry("https://github.com/rust-lang/crates.io-index/"));
        assert!(!policy.is_known_registry("https://my-registry.example/index"));
        assert!(!policy.is_known_git("https://github.com/org/repo"));
    }
}
