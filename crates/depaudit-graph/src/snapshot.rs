use anyhow::{Context, bail};
use depaudit_domain::model::{
    DependencyEdge, DependencyGraph, LicenseMatch, Package, PackageId, Source,
};
use serde::{Deserialize, Serialize};

/// Resolved graph as produced by an external resolver.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GraphSnapshot {
    #[serde(default)]
    pub packages: Vec<SnapshotPackage>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SnapshotPackage {
    pub name: String,
    pub version: String,

    /// Cargo source ID. Absent for local packages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub license_matches: Vec<SnapshotLicenseMatch>,

    #[serde(default)]
    pub yanked: bool,

    #[serde(default)]
    pub private: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<SnapshotDependency>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotLicenseMatch {
    pub token: String,
    pub license: String,
    pub confidence: f32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotDependency {
    pub name: String,
    /// Resolved version of the dependency.
    pub version: String,
    /// Requirement as declared by the dependent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub req: Option<String>,
}

pub fn parse_snapshot(text: &str) -> anyhow::Result<DependencyGraph> {
    let snapshot: GraphSnapshot = serde_json::from_str(text).context("parse graph snapshot")?;
    snapshot_to_graph(snapshot)
}

pub fn snapshot_to_graph(snapshot: GraphSnapshot) -> anyhow::Result<DependencyGraph> {
    let mut packages = Vec::with_capacity(snapshot.packages.len());
    let mut edges = Vec::new();

    for p in snapshot.packages {
        let id = PackageId::new(&p.name, &p.version);
        let source = match p.source.as_deref() {
            None => Source::Path(String::new()),
            Some(raw) => match Source::from_source_id(raw) {
                Some(source) => source,
                None => bail!("package {id}: unrecognised source `{raw}`"),
            },
        };

        for dep in &p.dependencies {
            edges.push(DependencyEdge {
                from: id.clone(),
                to: PackageId::new(&dep.name, &dep.version),
                req: dep.req.clone(),
            });
        }

        let mut package = Package::new(id, source);
        package.license = p.license;
        package.license_matches = p
            .license_matches
            .into_iter()
            .map(|m| LicenseMatch {
                token: m.token,
                license: m.license,
                confidence: m.confidence,
            })
            .collect();
        package.yanked = p.yanked;
        package.private = p.private;
        packages.push(package);
    }

    Ok(DependencyGraph::new(packages, edges)?)
}
