use crate::error::ConfigError;
use crate::model::DepauditConfigV1;
use depaudit_domain::policy::{
    AdvisoryPolicy, BanPolicy, LicenseException, LicensePolicy, LintLevel, PackageSpec, Policy,
    SourcePolicy, normalize_source_url,
};
use globset::Glob;
use std::collections::HashSet;
use std::time::Duration;

pub const SCHEMA_CONFIG_V1: &str = "depaudit.config.v1";

pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Values supplied on the command line that win over the config file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub advisory_db_path: Option<String>,
}

/// Where the advisory database lives and how to refresh it. Consumed by the app layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdvisoryDbSettings {
    pub db_path: Option<String>,
    pub db_urls: Vec<String>,
    pub fetch_timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub policy: Policy,
    pub advisory_db: AdvisoryDbSettings,
}

pub fn resolve_config(
    cfg: DepauditConfigV1,
    overrides: Overrides,
) -> Result<ResolvedConfig, ConfigError> {
    if let Some(schema) = cfg.schema.as_deref()
        && schema != SCHEMA_CONFIG_V1
    {
        return Err(ConfigError::invalid(
            "schema",
            format!("unsupported schema '{schema}' (expected '{SCHEMA_CONFIG_V1}')"),
        ));
    }

    let advisories = &cfg.advisories;
    let advisory_policy = AdvisoryPolicy {
        yanked: lint_level("advisories.yanked", advisories.yanked.as_deref(), LintLevel::Warn)?,
        ignore: advisories.ignore.iter().cloned().collect(),
        ignore_yanked: advisories
            .ignore_yanked
            .iter()
            .enumerate()
            .map(|(idx, raw)| package_spec(&format!("advisories.ignore-yanked[{idx}]"), raw))
            .collect::<Result<_, _>>()?,
    };

    let fetch_timeout_secs = advisories
        .fetch_timeout_secs
        .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS);
    if fetch_timeout_secs == 0 {
        return Err(ConfigError::invalid(
            "advisories.fetch-timeout-secs",
            "must be at least 1",
        ));
    }
    for (idx, url) in advisories.db_urls.iter().enumerate() {
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(ConfigError::invalid(
                format!("advisories.db-urls[{idx}]"),
                format!("'{url}' is not an http(s) URL"),
            ));
        }
    }
    let advisory_db = AdvisoryDbSettings {
        db_path: overrides
            .advisory_db_path
            .or_else(|| advisories.db_path.clone()),
        db_urls: advisories.db_urls.clone(),
        fetch_timeout: Duration::from_secs(fetch_timeout_secs),
    };

    let licenses = &cfg.licenses;
    let mut license_policy = LicensePolicy::new(
        licenses.allow.iter().cloned().collect(),
        licenses
            .exceptions
            .iter()
            .map(|e| LicenseException {
                name: e.name.clone(),
                allow: e.allow.iter().cloned().collect(),
            })
            .collect(),
        licenses.private.ignore,
    );
    if let Some(threshold) = licenses.confidence_threshold {
        if threshold.is_nan() {
            return Err(ConfigError::invalid(
                "licenses.confidence-threshold",
                "must be a number between 0 and 1",
            ));
        }
        if !(0.0..=1.0).contains(&threshold) {
            tracing::warn!(
                threshold,
                "licenses.confidence-threshold is outside [0, 1] and will be clamped"
            );
        }
        license_policy = license_policy.with_confidence_threshold(threshold);
    }

    let bans = &cfg.bans;
    for (idx, pattern) in bans.skip.iter().enumerate() {
        Glob::new(pattern).map_err(|e| {
            ConfigError::invalid(format!("bans.skip[{idx}]"), format!("invalid glob: {e}"))
        })?;
    }
    let ban_policy = BanPolicy {
        multiple_versions: lint_level(
            "bans.multiple-versions",
            bans.multiple_versions.as_deref(),
            LintLevel::Warn,
        )?,
        wildcards: lint_level("bans.wildcards", bans.wildcards.as_deref(), LintLevel::Allow)?,
        skip: bans.skip.clone(),
    };

    let sources = &cfg.sources;
    let defaults = SourcePolicy::default();
    let source_policy = SourcePolicy {
        unknown_registry: lint_level(
            "sources.unknown-registry",
            sources.unknown_registry.as_deref(),
            LintLevel::Warn,
        )?,
        unknown_git: lint_level(
            "sources.unknown-git",
            sources.unknown_git.as_deref(),
            LintLevel::Warn,
        )?,
        allow_registry: match &sources.allow_registry {
            Some(list) => normalized(list),
            None => defaults.allow_registry,
        },
        allow_git: normalized(&sources.allow_git),
    };

    Ok(ResolvedConfig {
        policy: Policy {
            advisories: advisory_policy,
            licenses: license_policy,
            bans: ban_policy,
            sources: source_policy,
        },
        advisory_db,
    })
}

fn normalized(urls: &[String]) -> HashSet<String> {
    urls.iter().map(|u| normalize_source_url(u)).collect()
}

fn lint_level(path: &str, value: Option<&str>, default: LintLevel) -> Result<LintLevel, ConfigError> {
    match value {
        None => Ok(default),
        Some("deny") => Ok(LintLevel::Deny),
        Some("warn" | "warning") => Ok(LintLevel::Warn),
        Some("allow") => Ok(LintLevel::Allow),
        Some(other) => Err(ConfigError::invalid(
            path,
            format!("unknown lint level '{other}' (expected deny|warn|allow)"),
        )),
    }
}

fn package_spec(path: &str, raw: &str) -> Result<PackageSpec, ConfigError> {
    let spec = PackageSpec::parse(raw);
    if spec.name.is_empty() || spec.version.as_deref() == Some("") {
        return Err(ConfigError::invalid(
            path,
            format!("'{raw}' is not a `name` or `name@version` spec"),
        ));
    }
    Ok(spec)
}
