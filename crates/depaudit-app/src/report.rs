use anyhow::Context;
use depaudit_render::{
    RenderableCounts, RenderableData, RenderableDiagnostic, RenderableReport, RenderableSeverity,
    RenderableVerdictStatus,
};
use depaudit_types::{AuditReport, Diagnostic, SCHEMA_REPORT_V1, Severity, VerdictStatus};

/// Parse a previously written report, rejecting other schemas.
pub fn parse_report_json(text: &str) -> anyhow::Result<AuditReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: '{schema}' (expected {SCHEMA_REPORT_V1})");
    }

    serde_json::from_value(value).context("parse depaudit report")
}

pub fn serialize_report(report: &AuditReport) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}

pub fn to_renderable(report: &AuditReport) -> RenderableReport {
    RenderableReport {
        verdict: match report.verdict.status {
            VerdictStatus::Pass => RenderableVerdictStatus::Pass,
            VerdictStatus::Warn => RenderableVerdictStatus::Warn,
            VerdictStatus::Fail => RenderableVerdictStatus::Fail,
        },
        counts: RenderableCounts {
            note: report.verdict.counts.note,
            warn: report.verdict.counts.warn,
            deny: report.verdict.counts.deny,
        },
        diagnostics: report.diagnostics.iter().map(renderable_diagnostic).collect(),
        data: RenderableData {
            checks: report
                .data
                .checks
                .iter()
                .map(|k| k.as_str().to_string())
                .collect(),
            packages_scanned: report.data.packages_scanned,
            diagnostics_total: report.data.diagnostics_total,
        },
    }
}

fn renderable_diagnostic(d: &Diagnostic) -> RenderableDiagnostic {
    RenderableDiagnostic {
        severity: match d.severity {
            Severity::Note => RenderableSeverity::Note,
            Severity::Warn => RenderableSeverity::Warn,
            Severity::Deny => RenderableSeverity::Deny,
        },
        checker: d.checker.as_str().to_string(),
        code: d.code.clone(),
        package: d.package.as_ref().map(ToString::to_string),
        message: d.message.clone(),
        help: d.help.clone(),
        url: d
            .data
            .get("url")
            .and_then(|v| v.as_str())
            .map(str::to_string),
    }
}
