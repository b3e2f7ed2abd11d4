//! Advisory database loading.
//!
//! The database is a single JSON file (`depaudit.advisory-db.v1`). It is read from a local cache
//! and optionally refreshed through an [`AdvisoryFetcher`]; when a refresh fails the cached copy
//! is used and the caller is told why.

#![forbid(unsafe_code)]

mod db;
mod error;
mod fetch;

pub use db::{AdvisoryDbFile, AdvisoryEntry, SCHEMA_ADVISORY_DB_V1, parse_advisory_db};
pub use error::DataUnavailable;
pub use fetch::{AdvisoryFetcher, LoadedAdvisories, refresh};

use camino::Utf8Path;
use depaudit_domain::advisory::AdvisorySet;

/// Read and parse the cached database at `path`.
pub fn load_cached(path: &Utf8Path) -> Result<AdvisorySet, DataUnavailable> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(DataUnavailable::Missing {
                path: path.to_string(),
            });
        }
        Err(source) => {
            return Err(DataUnavailable::Io {
                path: path.to_string(),
                source,
            });
        }
    };
    parse_advisory_db(path.as_str(), &text)
}
