//! The four rule sets. Each checker reads the graph and policy and returns its own diagnostics;
//! checkers never see each other's output.

use crate::advisory::AdvisorySet;
use crate::model::DependencyGraph;
use crate::policy::Policy;
use depaudit_types::{CheckerKind, Diagnostic};
use std::collections::BTreeSet;

mod advisories;
mod bans;
mod licenses;
mod sources;
mod utils;

#[cfg(test)]
mod tests;

pub use advisories::{stale_database_note, AdvisoryChecker};
pub use bans::BanChecker;
pub use licenses::LicenseChecker;
pub use sources::{classify, Origin, SourceChecker};

/// Uniform contract for a rule set.
pub trait Checker: Send + Sync {
    fn kind(&self) -> CheckerKind;

    fn evaluate(&self, graph: &DependencyGraph, policy: &Policy) -> Vec<Diagnostic>;
}

/// Which checkers to run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CheckSet(BTreeSet<CheckerKind>);

impl CheckSet {
    pub fn all() -> Self {
        Self(CheckerKind::ALL.into_iter().collect())
    }

    pub fn with(mut self, kind: CheckerKind) -> Self {
        self.0.insert(kind);
        self
    }

    pub fn contains(&self, kind: CheckerKind) -> bool {
        self.0.contains(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Selected kinds in name order.
    pub fn kinds(&self) -> Vec<CheckerKind> {
        self.0.iter().copied().collect()
    }
}

impl FromIterator<CheckerKind> for CheckSet {
    fn from_iter<I: IntoIterator<Item = CheckerKind>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Instantiate the selected checkers. `advisories` is only consumed by the advisory checker.
pub fn checkers_for(set: &CheckSet, advisories: AdvisorySet) -> Vec<Box<dyn Checker>> {
    let mut out: Vec<Box<dyn Checker>> = Vec::new();
    if set.contains(CheckerKind::Advisories) {
        out.push(Box::new(AdvisoryChecker::new(advisories)));
    }
    if set.contains(CheckerKind::Bans) {
        out.push(Box::new(BanChecker));
    }
    if set.contains(CheckerKind::Licenses) {
        out.push(Box::new(LicenseChecker));
    }
    if set.contains(CheckerKind::Sources) {
        out.push(Box::new(SourceChecker));
    }
    out
}
