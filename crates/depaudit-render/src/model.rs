#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableSeverity {
    Note,
    Warn,
    Deny,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableVerdictStatus {
    Pass,
    Warn,
    Fail,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableDiagnostic {
    pub severity: RenderableSeverity,
    pub checker: String,
    pub code: String,
    /// `name@version`, absent for run-level notes.
    pub package: Option<String>,
    pub message: String,
    pub help: Option<String>,
    pub url: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderableCounts {
    pub note: u32,
    pub warn: u32,
    pub deny: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderableData {
    pub checks: Vec<String>,
    pub packages_scanned: u32,
    pub diagnostics_total: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableReport {
    pub verdict: RenderableVerdictStatus,
    pub counts: RenderableCounts,
    pub diagnostics: Vec<RenderableDiagnostic>,
    pub data: RenderableData,
}
