use anyhow::{Context, anyhow, bail};
use depaudit_domain::model::{DependencyEdge, DependencyGraph, Package, PackageId, Source};
use toml_edit::{DocumentMut, Item};

/// Build a graph from `Cargo.lock`.
///
/// The lockfile records neither license metadata nor declared requirements, so packages carry no
/// license and edges carry no requirement.
pub fn parse_lockfile(text: &str) -> anyhow::Result<DependencyGraph> {
    let doc: DocumentMut = text.parse().context("parse Cargo.lock")?;

    let Some(entries) = doc.get("package").and_then(Item::as_array_of_tables) else {
        return Ok(DependencyGraph::new(Vec::new(), Vec::new())?);
    };

    let mut packages = Vec::new();
    let mut raw_deps: Vec<(PackageId, Vec<String>)> = Vec::new();

    for (idx, entry) in entries.iter().enumerate() {
        let name = entry
            .get("name")
            .and_then(Item::as_str)
            .with_context(|| format!("[[package]] #{idx} has no name"))?;
        let version = entry
            .get("version")
            .and_then(Item::as_str)
            .with_context(|| format!("[[package]] #{idx} ({name}) has no version"))?;
        let id = PackageId::new(name, version);

        let source = match entry.get("source").and_then(Item::as_str) {
            None => Source::Path(String::new()),
            Some(raw) => Source::from_source_id(raw)
                .ok_or_else(|| anyhow!("package {id}: unrecognised source `{raw}`"))?,
        };

        let deps: Vec<String> = entry
            .get("dependencies")
            .and_then(Item::as_array)
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        raw_deps.push((id.clone(), deps));
        packages.push(Package::new(id, source));
    }

    let mut edges = Vec::new();
    for (from, deps) in &raw_deps {
        for dep in deps {
            let to = resolve_dependency(&packages, dep)
                .with_context(|| format!("resolve dependency `{dep}` of {from}"))?;
            edges.push(DependencyEdge {
                from: from.clone(),
                to,
                req: None,
            });
        }
    }

    tracing::debug!(packages = packages.len(), edges = edges.len(), "parsed Cargo.lock");
    Ok(DependencyGraph::new(packages, edges)?)
}

/// Lockfile dependency entries are `name`, `name version`, or `name version (source)`; the
/// version is only written when the name alone is ambiguous.
fn resolve_dependency(packages: &[Package], entry: &str) -> anyhow::Result<PackageId> {
    let mut parts = entry.split_whitespace();
    let name = parts.next().context("empty dependency entry")?;
    let version = parts.next();

    let mut candidates = packages
        .iter()
        .filter(|p| p.name() == name && version.is_none_or(|v| p.version() == v));
    let Some(first) = candidates.next() else {
        bail!("no package named `{name}` in the lockfile");
    };
    if candidates.next().is_some() {
        bail!("`{entry}` matches more than one package");
    }
    Ok(first.id.clone())
}
