use crate::advisory::AdvisoryRecord;
use crate::fingerprint::fingerprint_for;
use crate::model::{DependencyEdge, DependencyGraph, Package, PackageId, Source};
use crate::policy::CRATES_IO_INDEX;
use depaudit_types::{CheckerKind, Diagnostic, Severity};

/// A crates.io package with no license metadata.
pub fn pkg(name: &str, version: &str) -> Package {
    Package::new(
        PackageId::new(name, version),
        Source::Registry(CRATES_IO_INDEX.to_string()),
    )
}

pub fn licensed(name: &str, version: &str, license: &str) -> Package {
    let mut p = pkg(name, version);
    p.license = Some(license.to_string());
    p
}

pub fn with_source(mut package: Package, source: Source) -> Package {
    package.source = source;
    package
}

pub fn edge(from: (&str, &str), to: (&str, &str), req: &str) -> DependencyEdge {
    DependencyEdge {
        from: PackageId::new(from.0, from.1),
        to: PackageId::new(to.0, to.1),
        req: Some(req.to_string()),
    }
}

pub fn graph(packages: Vec<Package>, edges: Vec<DependencyEdge>) -> DependencyGraph {
    DependencyGraph::new(packages, edges).expect("test graph must be valid")
}

pub fn advisory(id: &str, package: &str, affected: &[&str], severity: Severity) -> AdvisoryRecord {
    AdvisoryRecord {
        id: id.to_string(),
        package: package.to_string(),
        affected: affected.iter().map(|s| s.to_string()).collect(),
        patched: Vec::new(),
        severity,
        title: None,
        url: None,
    }
}

pub fn diag(severity: Severity, checker: CheckerKind, name: &str, version: &str) -> Diagnostic {
    let id = PackageId::new(name, version);
    Diagnostic {
        severity,
        checker,
        code: "test".to_string(),
        package: Some(id.to_ref()),
        message: format!("{id}"),
        help: None,
        fingerprint: Some(fingerprint_for(checker, "test", Some((name, version)), None)),
        data: serde_json::Value::Null,
    }
}

pub fn codes(diagnostics: &[Diagnostic]) -> Vec<&str> {
    diagnostics.iter().map(|d| d.code.as_str()).collect()
}
