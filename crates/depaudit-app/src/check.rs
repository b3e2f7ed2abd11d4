//! The `check` use case: load inputs, evaluate policy, and produce a report.

use anyhow::Context;
use camino::Utf8Path;
use depaudit_advisories::AdvisoryFetcher;
use depaudit_domain::PolicyEngine;
use depaudit_domain::advisory::AdvisorySet;
use depaudit_domain::checks::{CheckSet, checkers_for, stale_database_note};
use depaudit_settings::{AdvisoryDbSettings, Overrides, ResolvedConfig};
use depaudit_types::{
    AuditReport, CheckerKind, Diagnostic, ReportEnvelope, ReportVerdict, RunMeta,
    SCHEMA_REPORT_V1, ToolMeta, VerdictStatus,
};
use time::OffsetDateTime;

pub const EXIT_OK: i32 = 0;
pub const EXIT_FAIL: i32 = 1;
/// Configuration or input could not be loaded.
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// Input for the check use case.
pub struct CheckInput<'a> {
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
    /// JSON snapshot or `Cargo.lock`.
    pub graph_path: &'a Utf8Path,
    pub checks: CheckSet,
    /// When set, the advisory database is refreshed through this fetcher before evaluation.
    pub fetcher: Option<&'a dyn AdvisoryFetcher>,
}

/// Output from the check use case.
#[derive(Clone, Debug)]
pub struct CheckOutput {
    pub report: AuditReport,
    /// The resolved configuration used.
    pub resolved_config: ResolvedConfig,
}

/// Run the check use case: parse config, load graph and advisories, evaluate, produce report.
pub fn run_check(input: CheckInput<'_>) -> anyhow::Result<CheckOutput> {
    let started_at = OffsetDateTime::now_utc();

    // Parse config (empty is allowed, defaults apply).
    let cfg = if input.config_text.trim().is_empty() {
        depaudit_settings::DepauditConfigV1::default()
    } else {
        depaudit_settings::parse_config_toml(input.config_text).context("parse config")?
    };
    let resolved = depaudit_settings::resolve_config(cfg, input.overrides.clone())
        .context("resolve config")?;

    let graph = depaudit_graph::load_graph(input.graph_path)?;

    let mut notes: Vec<Diagnostic> = Vec::new();
    let (advisories, advisories_loaded) = if input.checks.contains(CheckerKind::Advisories) {
        let set = load_advisories(&resolved.advisory_db, input.fetcher, &mut notes)?;
        let loaded = set
            .as_ref()
            .map(|s| u32::try_from(s.len()).unwrap_or(u32::MAX));
        (set.unwrap_or_default(), loaded)
    } else {
        (AdvisorySet::default(), None)
    };

    let engine = PolicyEngine::new(checkers_for(&input.checks, advisories)).with_notes(notes);
    let depaudit_domain::report::DomainReport {
        verdict,
        counts,
        mut data,
    } = engine.evaluate(&graph, &resolved.policy);
    data.advisories_loaded = advisories_loaded;

    let ended_at = OffsetDateTime::now_utc();
    let duration_ms = (ended_at - started_at).whole_milliseconds().max(0) as u64;

    let report = ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "depaudit".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        run: RunMeta {
            started_at,
            ended_at,
            duration_ms,
        },
        verdict: ReportVerdict {
            status: verdict.status,
            counts: counts.into(),
        },
        diagnostics: verdict.diagnostics,
        data,
    };

    Ok(CheckOutput {
        report,
        resolved_config: resolved,
    })
}

/// `None` means no database is configured; only the yanked rule can fire then.
fn load_advisories(
    settings: &AdvisoryDbSettings,
    fetcher: Option<&dyn AdvisoryFetcher>,
    notes: &mut Vec<Diagnostic>,
) -> anyhow::Result<Option<AdvisorySet>> {
    let cache = settings.db_path.as_deref().map(Utf8Path::new);

    if let Some(fetcher) = fetcher {
        let loaded = depaudit_advisories::refresh(
            cache,
            &settings.db_urls,
            settings.fetch_timeout,
            fetcher,
        )
        .context("load advisory database")?;
        if let Some(reason) = &loaded.stale_reason {
            notes.push(stale_database_note(reason));
        }
        return Ok(Some(loaded.set));
    }

    match cache {
        Some(path) => {
            let set = depaudit_advisories::load_cached(path).context("load advisory database")?;
            Ok(Some(set))
        }
        None => {
            tracing::info!("no advisory database configured; only yanked packages are checked");
            Ok(None)
        }
    }
}

/// Map verdict to exit code: 0 = pass/warn, 1 = fail.
pub fn verdict_exit_code(status: VerdictStatus) -> i32 {
    match status {
        VerdictStatus::Pass | VerdictStatus::Warn => EXIT_OK,
        VerdictStatus::Fail => EXIT_FAIL,
    }
}
