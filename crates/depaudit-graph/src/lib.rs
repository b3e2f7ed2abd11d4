//! Graph adapters: turn resolver output on disk into a [`DependencyGraph`].
//!
//! Two inputs are understood: a JSON snapshot (full metadata, including licenses and declared
//! requirements) and a plain `Cargo.lock` (identities, sources and edges only).

#![forbid(unsafe_code)]

mod lockfile;
mod snapshot;

pub use lockfile::parse_lockfile;
pub use snapshot::{
    GraphSnapshot, SnapshotDependency, SnapshotLicenseMatch, SnapshotPackage, parse_snapshot,
    snapshot_to_graph,
};

use anyhow::Context;
use camino::Utf8Path;
use depaudit_domain::model::DependencyGraph;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphFormat {
    Snapshot,
    Lockfile,
}

impl GraphFormat {
    /// `*.lock` files are lockfiles; everything else is read as a JSON snapshot.
    pub fn detect(path: &Utf8Path) -> Self {
        match path.extension() {
            Some("lock") => GraphFormat::Lockfile,
            _ => GraphFormat::Snapshot,
        }
    }
}

pub fn load_graph(path: &Utf8Path) -> anyhow::Result<DependencyGraph> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read dependency graph {path}"))?;
    let format = GraphFormat::detect(path);
    tracing::debug!(%path, ?format, "loading dependency graph");
    let graph = match format {
        GraphFormat::Snapshot => parse_snapshot(&text),
        GraphFormat::Lockfile => parse_lockfile(&text),
    };
    graph.with_context(|| format!("load dependency graph {path}"))
}
