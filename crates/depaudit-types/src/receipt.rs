use crate::ids;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use time::OffsetDateTime;

/// Stable schema identifier for depaudit reports.
pub const SCHEMA_REPORT_V1: &str = "depaudit.report.v1";

/// Diagnostic severity. The order is total: `deny > warn > note`.
///
/// The derived `Ord` follows declaration order, so keep the variants sorted from least to most
/// severe.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Note,
    Warn,
    Deny,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Note => "note",
            Severity::Warn => "warn",
            Severity::Deny => "deny",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The rule set a diagnostic originates from.
///
/// Variants are declared in name order so the derived `Ord` matches sorting by checker name.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum CheckerKind {
    Advisories,
    Bans,
    Licenses,
    Sources,
}

impl CheckerKind {
    pub const ALL: [CheckerKind; 4] = [
        CheckerKind::Advisories,
        CheckerKind::Bans,
        CheckerKind::Licenses,
        CheckerKind::Sources,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CheckerKind::Advisories => ids::CHECK_ADVISORIES,
            CheckerKind::Bans => ids::CHECK_BANS,
            CheckerKind::Licenses => ids::CHECK_LICENSES,
            CheckerKind::Sources => ids::CHECK_SOURCES,
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == id)
    }
}

impl fmt::Display for CheckerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to the package a diagnostic is attributed to.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub struct PackageRef {
    pub name: String,
    pub version: String,
}

impl fmt::Display for PackageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Diagnostic {
    pub severity: Severity,
    pub checker: CheckerKind,
    pub code: String,

    /// Every policy violation names exactly one package. Run-level notes (for example a stale
    /// advisory database) carry no package.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<PackageRef>,

    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,

    /// Stable identifier intended for dedup and trending. A hash of:
    /// `checker + code + package + salient fields`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,

    /// Checker-specific structured payload (kept open-ended for forward compatibility).
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub data: JsonValue,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum VerdictStatus {
    Pass,
    Warn,
    Fail,
}

impl VerdictStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            VerdictStatus::Pass => "pass",
            VerdictStatus::Warn => "warn",
            VerdictStatus::Fail => "fail",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VerdictCounts {
    pub note: u32,
    pub warn: u32,
    pub deny: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReportVerdict {
    pub status: VerdictStatus,
    pub counts: VerdictCounts,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RunMeta {
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub ended_at: OffsetDateTime,
    pub duration_ms: u64,
}

/// Depaudit-specific summary payload for the report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct AuditData {
    /// Checkers that ran, in name order.
    pub checks: Vec<CheckerKind>,

    pub packages_scanned: u32,
    pub edges_scanned: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisories_loaded: Option<u32>,

    pub diagnostics_total: u32,
}

/// A generic receipt/envelope.
///
/// Keeping this generic allows depaudit to embed tool-specific data while still enforcing a
/// stable outer shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportEnvelope<TData = AuditData> {
    /// Versioned schema identifier for the envelope shape.
    pub schema: String,
    pub tool: ToolMeta,
    pub run: RunMeta,
    pub verdict: ReportVerdict,
    pub diagnostics: Vec<Diagnostic>,
    pub data: TData,
}

pub type AuditReport = ReportEnvelope<AuditData>;
