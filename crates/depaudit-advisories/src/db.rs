use crate::error::DataUnavailable;
use depaudit_domain::advisory::{AdvisoryRecord, AdvisorySet};
use depaudit_types::Severity;
use serde::{Deserialize, Serialize};

/// On-disk advisory database (`depaudit.advisory-db.v1`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AdvisoryDbFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// When the database was last generated (free-form, informational).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,

    #[serde(default)]
    pub advisories: Vec<AdvisoryEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryEntry {
    pub id: String,
    pub package: String,
    #[serde(default)]
    pub affected: Vec<String>,
    #[serde(default)]
    pub patched: Vec<String>,
    /// `deny|warn|note`, or the CVSS-style `critical|high|medium|low|informational`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

pub const SCHEMA_ADVISORY_DB_V1: &str = "depaudit.advisory-db.v1";

/// Parse database text. `origin` names the file or URL for error messages.
pub fn parse_advisory_db(origin: &str, text: &str) -> Result<AdvisorySet, DataUnavailable> {
    let file: AdvisoryDbFile =
        serde_json::from_str(text).map_err(|e| DataUnavailable::Corrupt {
            origin: origin.to_string(),
            message: e.to_string(),
        })?;

    if let Some(schema) = file.schema.as_deref()
        && schema != SCHEMA_ADVISORY_DB_V1
    {
        return Err(DataUnavailable::Corrupt {
            origin: origin.to_string(),
            message: format!("unsupported schema '{schema}'"),
        });
    }

    let mut records = Vec::with_capacity(file.advisories.len());
    for (idx, entry) in file.advisories.into_iter().enumerate() {
        if entry.id.trim().is_empty() || entry.package.trim().is_empty() {
            return Err(DataUnavailable::Corrupt {
                origin: origin.to_string(),
                message: format!("advisory #{idx} is missing an id or package"),
            });
        }
        let severity = parse_severity(&entry.id, entry.severity.as_deref());
        records.push(AdvisoryRecord {
            id: entry.id,
            package: entry.package,
            affected: entry.affected,
            patched: entry.patched,
            severity,
            title: entry.title,
            url: entry.url,
        });
    }

    let set = AdvisorySet::new(records);
    tracing::debug!(%origin, advisories = set.len(), "parsed advisory database");
    Ok(set)
}

/// Unrated and unrecognised severities are treated as `deny`.
fn parse_severity(id: &str, raw: Option<&str>) -> Severity {
    let Some(raw) = raw else {
        return Severity::Deny;
    };
    match raw.to_ascii_lowercase().as_str() {
        "deny" | "critical" | "high" => Severity::Deny,
        "warn" | "warning" | "medium" | "low" => Severity::Warn,
        "note" | "info" | "informational" => Severity::Note,
        other => {
            tracing::warn!(advisory = %id, severity = %other, "unknown advisory severity; treating as deny");
            Severity::Deny
        }
    }
}
