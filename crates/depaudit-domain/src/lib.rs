//! Pure policy evaluation (no IO).
//!
//! Input: a dependency graph and an immutable policy, both constructed elsewhere.
//! Output: diagnostics + verdict + summary data.

#![forbid(unsafe_code)]

pub mod advisory;
pub mod checks;
pub mod license_expr;
pub mod model;
pub mod policy;
pub mod report;
pub mod version;

mod engine;
mod fingerprint;

pub use engine::PolicyEngine;

#[cfg(test)]
mod test_support;

#[cfg(test)]
mod properties;
