use depaudit_types::{AuditData, Diagnostic, Severity, VerdictCounts, VerdictStatus};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeverityCounts {
    pub note: u32,
    pub warn: u32,
    pub deny: u32,
}

impl SeverityCounts {
    pub fn from_diagnostics(diagnostics: &[Diagnostic]) -> Self {
        let mut counts = SeverityCounts::default();
        for d in diagnostics {
            match d.severity {
                Severity::Note => counts.note += 1,
                Severity::Warn => counts.warn += 1,
                Severity::Deny => counts.deny += 1,
            }
        }
        counts
    }
}

impl From<SeverityCounts> for VerdictCounts {
    fn from(c: SeverityCounts) -> Self {
        VerdictCounts {
            note: c.note,
            warn: c.warn,
            deny: c.deny,
        }
    }
}

/// `fail` if any deny, else `warn` if any warn, else `pass`. Notes never affect the status.
pub fn derive_status(diagnostics: &[Diagnostic]) -> VerdictStatus {
    match diagnostics.iter().map(|d| d.severity).max() {
        Some(Severity::Deny) => VerdictStatus::Fail,
        Some(Severity::Warn) => VerdictStatus::Warn,
        Some(Severity::Note) | None => VerdictStatus::Pass,
    }
}

/// Ordered diagnostics plus the status derived from them.
#[derive(Clone, Debug, PartialEq)]
pub struct Verdict {
    pub status: VerdictStatus,
    pub diagnostics: Vec<Diagnostic>,
}

impl Verdict {
    /// `diagnostics` must already be in report order.
    pub fn from_diagnostics(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            status: derive_status(&diagnostics),
            diagnostics,
        }
    }
}

#[derive(Clone, Debug)]
pub struct DomainReport {
    pub verdict: Verdict,
    pub counts: SeverityCounts,
    pub data: AuditData,
}

#[cfg(test)]
mod tests {
    use super::*;
    use depaudit_types::CheckerKind;

    fn diag(severity: Severity) -> Diagnostic {
        Diagnostic {
            severity,
            checker: CheckerKind::Bans,
            code: "x".to_string(),
            package: None,
            message: String::new(),
            help: None,
            fingerprint: None,
            data: serde_json::Value::Null,
        }
    }

    #[test]
    fn status_follows_highest_severity() {
        assert_eq!(derive_status(&[]), VerdictStatus::Pass);
        assert_eq!(derive_status(&[diag(Severity::Note)]), VerdictStatus::Pass);
        assert_eq!(
            derive_status(&[diag(Severity::Note), diag(Severity::Warn)]),
            VerdictStatus::Warn
        );
        assert_eq!(
            derive_status(&[diag(Severity::Deny), diag(Severity::Warn)]),
            VerdictStatus::Fail
        );
    }

    #[test]
    fn counts_by_severity() {
        let counts = SeverityCounts::from_diagnostics(&[
            diag(Severity::Warn),
            diag(Severity::Warn),
            diag(Severity::Deny),
        ]);
        assert_eq!(
            counts,
            SeverityCounts {
                note: 0,
                warn: 2,
                deny: 1
            }
        );
    }
}
