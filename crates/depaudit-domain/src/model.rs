use crate::version::compare_versions;
use depaudit_types::PackageRef;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Package identity: unique within a graph.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PackageId {
    pub name: String,
    pub version: String,
}

impl PackageId {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    pub fn to_ref(&self) -> PackageRef {
        PackageRef {
            name: self.name.clone(),
            version: self.version.clone(),
        }
    }
}

impl Ord for PackageId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| compare_versions(&self.version, &other.version))
    }
}

impl PartialOrd for PackageId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// Where a package was fetched from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    Registry(String),
    Git { url: String, rev: Option<String> },
    /// Local path or workspace member. Always trusted.
    Path(String),
}

impl Source {
    /// Parse a Cargo source ID (`registry+URL`, `sparse+URL`, `git+URL?query#rev`,
    /// `path+file://...`).
    ///
    /// Sparse registries keep their `sparse+` prefix so they can be allow-listed distinctly from
    /// the git index of the same registry.
    pub fn from_source_id(id: &str) -> Option<Source> {
        let (kind, rest) = id.split_once('+')?;
        match kind {
            "registry" => Some(Source::Registry(rest.to_string())),
            "sparse" => Some(Source::Registry(id.to_string())),
            "git" => {
                let (url, rev) = match rest.split_once('#') {
                    Some((url, rev)) => (url, Some(rev.to_string())),
                    None => (rest, None),
                };
                let url = url.split_once('?').map(|(u, _)| u).unwrap_or(url);
                Some(Source::Git {
                    url: url.to_string(),
                    rev,
                })
            }
            "path" => Some(Source::Path(
                rest.strip_prefix("file://").unwrap_or(rest).to_string(),
            )),
            _ => None,
        }
    }
}

/// A fuzzy/alias resolution of one license token, produced by the resolver's text scanner.
#[derive(Clone, Debug, PartialEq)]
pub struct LicenseMatch {
    /// The token as written in the package's expression.
    pub token: String,
    /// The license identifier the token was resolved to.
    pub license: String,
    /// Match confidence in `[0, 1]`.
    pub confidence: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Package {
    pub id: PackageId,
    /// Declared SPDX license expression, if any.
    pub license: Option<String>,
    pub license_matches: Vec<LicenseMatch>,
    pub source: Source,
    pub yanked: bool,
    /// Not published (e.g. `publish = false`).
    pub private: bool,
}

impl Package {
    pub fn new(id: PackageId, source: Source) -> Self {
        Self {
            id,
            license: None,
            license_matches: Vec::new(),
            source,
            yanked: false,
            private: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.id.name
    }

    pub fn version(&self) -> &str {
        &self.id.version
    }
}

/// `from` depends on `to` through the version requirement `req`.
///
/// `req` is `None` when the input format does not record requirements (e.g. `Cargo.lock`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DependencyEdge {
    pub from: PackageId,
    pub to: PackageId,
    pub req: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("package {0} appears more than once")]
    DuplicatePackage(PackageId),
    #[error("dependency edge {from} -> {to} references a package that is not in the graph")]
    DanglingEdge { from: PackageId, to: PackageId },
}

/// Immutable snapshot of the resolved dependency graph.
#[derive(Clone, Debug, Default)]
pub struct DependencyGraph {
    packages: BTreeMap<PackageId, Package>,
    edges: Vec<DependencyEdge>,
    incoming: BTreeMap<PackageId, Vec<usize>>,
}

impl DependencyGraph {
    pub fn new(packages: Vec<Package>, edges: Vec<DependencyEdge>) -> Result<Self, GraphError> {
        let mut by_id = BTreeMap::new();
        for package in packages {
            let id = package.id.clone();
            if by_id.insert(id.clone(), package).is_some() {
                return Err(GraphError::DuplicatePackage(id));
            }
        }

        let mut incoming: BTreeMap<PackageId, Vec<usize>> = BTreeMap::new();
        for (idx, edge) in edges.iter().enumerate() {
            if !by_id.contains_key(&edge.from) || !by_id.contains_key(&edge.to) {
                return Err(GraphError::DanglingEdge {
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                });
            }
            incoming.entry(edge.to.clone()).or_default().push(idx);
        }

        Ok(Self {
            packages: by_id,
            edges,
            incoming,
        })
    }

    /// All packages in `(name, version)` order.
    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.packages.values()
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn get(&self, id: &PackageId) -> Option<&Package> {
        self.packages.get(id)
    }

    pub fn edges(&self) -> &[DependencyEdge] {
        &self.edges
    }

    /// Edges pointing at `id`, in insertion order.
    pub fn incoming(&self, id: &PackageId) -> impl Iterator<Item = &DependencyEdge> {
        self.incoming
            .get(id)
            .into_iter()
            .flatten()
            .map(|&idx| &self.edges[idx])
    }

    /// Packages grouped by name; each group is in ascending version order.
    pub fn by_name(&self) -> BTreeMap<&str, Vec<&Package>> {
        let mut groups: BTreeMap<&str, Vec<&Package>> = BTreeMap::new();
        for package in self.packages.values() {
            groups.entry(package.name()).or_default().push(package);
        }
        groups
    }
}
