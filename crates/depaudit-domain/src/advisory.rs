//! Advisory records as consumed by the engine.
//!
//! Records are loaded elsewhere (see `depaudit-advisories`); the engine only reads them.

use depaudit_types::Severity;
use semver::{Version, VersionReq};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq)]
pub struct AdvisoryRecord {
    pub id: String,
    /// Name of the affected package.
    pub package: String,
    /// Semver requirements describing affected versions (ORed). Empty means every version.
    pub affected: Vec<String>,
    /// Semver requirements describing fixed versions (ORed). These win over `affected`.
    pub patched: Vec<String>,
    pub severity: Severity,
    pub title: Option<String>,
    pub url: Option<String>,
}

/// Outcome of matching one record against one package version.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PredicateMatch {
    Affected,
    Unaffected,
    /// The package version or one of the record's requirements is not valid semver.
    Unparseable(String),
}

impl AdvisoryRecord {
    pub fn matches(&self, version: &str) -> PredicateMatch {
        let version = match Version::parse(version) {
            Ok(v) => v,
            Err(err) => {
                return PredicateMatch::Unparseable(format!(
                    "package version `{version}` is not valid semver: {err}"
                ));
            }
        };

        for raw in &self.patched {
            match VersionReq::parse(raw) {
                Ok(req) if req.matches(&version) => return PredicateMatch::Unaffected,
                Ok(_) => {}
                Err(err) => {
                    return PredicateMatch::Unparseable(format!(
                        "patched requirement `{raw}` is not valid semver: {err}"
                    ));
                }
            }
        }

        if self.affected.is_empty() {
            return PredicateMatch::Affected;
        }

        let mut affected = false;
        for raw in &self.affected {
            match VersionReq::parse(raw) {
                Ok(req) => affected |= req.matches(&version),
                Err(err) => {
                    return PredicateMatch::Unparseable(format!(
                        "affected requirement `{raw}` is not valid semver: {err}"
                    ));
                }
            }
        }

        if affected {
            PredicateMatch::Affected
        } else {
            PredicateMatch::Unaffected
        }
    }
}

/// Advisory records indexed by package name; each bucket is sorted by advisory ID.
#[derive(Clone, Debug, Default)]
pub struct AdvisorySet {
    by_package: BTreeMap<String, Vec<AdvisoryRecord>>,
    len: usize,
}

impl AdvisorySet {
    pub fn new(records: impl IntoIterator<Item = AdvisoryRecord>) -> Self {
        let mut by_package: BTreeMap<String, Vec<AdvisoryRecord>> = BTreeMap::new();
        let mut len = 0;
        for record in records {
            by_package
                .entry(record.package.clone())
                .or_default()
                .push(record);
            len += 1;
        }
        for bucket in by_package.values_mut() {
            bucket.sort_by(|a, b| a.id.cmp(&b.id));
        }
        Self { by_package, len }
    }

    pub fn for_package(&self, name: &str) -> &[AdvisoryRecord] {
        self.by_package.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &AdvisoryRecord> {
        self.by_package.values().flatten()
    }
}
