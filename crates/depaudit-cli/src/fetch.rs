use std::time::Duration;

use anyhow::Context;
use depaudit_advisories::AdvisoryFetcher;
use reqwest::blocking::Client;

const USER_AGENT: &str = concat!("depaudit/", env!("CARGO_PKG_VERSION"));

/// Downloads advisory databases over HTTP with a per-request timeout.
pub struct ReqwestFetcher;

impl AdvisoryFetcher for ReqwestFetcher {
    fn fetch(&self, url: &str, timeout: Duration) -> anyhow::Result<String> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("build http client")?;
        let response = client
            .get(url)
            .send()
            .with_context(|| format!("GET {url}"))?
            .error_for_status()
            .with_context(|| format!("GET {url}"))?;
        response.text().context("read response body")
    }
}
