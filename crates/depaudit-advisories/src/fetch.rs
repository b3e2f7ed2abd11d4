use crate::db::parse_advisory_db;
use crate::error::DataUnavailable;
use crate::load_cached;
use camino::Utf8Path;
use depaudit_domain::advisory::AdvisorySet;
use std::time::Duration;

/// Transport used to download a database. The CLI provides an HTTP implementation; tests use
/// in-memory fakes.
pub trait AdvisoryFetcher {
    fn fetch(&self, url: &str, timeout: Duration) -> anyhow::Result<String>;
}

/// The database to evaluate with, plus why it may be out of date.
#[derive(Clone, Debug)]
pub struct LoadedAdvisories {
    pub set: AdvisorySet,
    /// Set when a refresh failed and the cached copy was used instead.
    pub stale_reason: Option<String>,
}

/// Try each URL in order; the first one that downloads and parses wins and replaces the cache.
///
/// When every URL fails, fall back to the cache and record why. Without a usable cache the
/// failure is fatal.
pub fn refresh(
    cache: Option<&Utf8Path>,
    urls: &[String],
    timeout: Duration,
    fetcher: &dyn AdvisoryFetcher,
) -> Result<LoadedAdvisories, DataUnavailable> {
    let mut failures: Vec<String> = Vec::new();
    if urls.is_empty() {
        failures.push("no advisories.db-urls configured".to_string());
    }

    for url in urls {
        let text = match fetcher.fetch(url, timeout) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(%url, error = %format!("{err:#}"), "advisory database fetch failed");
                failures.push(format!("{url}: {err:#}"));
                continue;
            }
        };
        match parse_advisory_db(url, &text) {
            Ok(set) => {
                if let Some(path) = cache {
                    write_cache(path, &text);
                }
                tracing::info!(%url, advisories = set.len(), "advisory database refreshed");
                return Ok(LoadedAdvisories {
                    set,
                    stale_reason: None,
                });
            }
            Err(err) => {
                tracing::warn!(%url, error = %err, "downloaded advisory database is unusable");
                failures.push(err.to_string());
            }
        }
    }

    let reason = failures.join("; ");
    let Some(path) = cache else {
        return Err(DataUnavailable::NoCache { reason });
    };
    match load_cached(path) {
        Ok(set) => {
            tracing::warn!(%path, "using cached advisory database");
            Ok(LoadedAdvisories {
                set,
                stale_reason: Some(reason),
            })
        }
        Err(DataUnavailable::Missing { .. }) => Err(DataUnavailable::NoCache { reason }),
        Err(other) => Err(other),
    }
}

/// A failed cache write only costs the next run a refresh.
fn write_cache(path: &Utf8Path, text: &str) {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
        && let Err(err) = std::fs::create_dir_all(parent)
    {
        tracing::warn!(%path, %err, "could not create advisory cache directory");
        return;
    }
    if let Err(err) = std::fs::write(path, text) {
        tracing::warn!(%path, %err, "could not update advisory cache");
    }
}
