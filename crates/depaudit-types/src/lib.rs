//! Stable DTOs and IDs used across the depaudit workspace.
//!
//! This crate is intentionally boring:
//! - data types for the emitted diagnostics and report envelope
//! - stable string IDs for checkers and reason codes
//! - explain registry for remediation guidance

#![forbid(unsafe_code)]

pub mod explain;
pub mod ids;
pub mod receipt;

pub use explain::{lookup_explanation, ExamplePair, Explanation};
pub use receipt::{
    AuditData, AuditReport, CheckerKind, Diagnostic, PackageRef, ReportEnvelope, ReportVerdict,
    RunMeta, Severity, ToolMeta, VerdictCounts, VerdictStatus, SCHEMA_REPORT_V1,
};
