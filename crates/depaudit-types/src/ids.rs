//! Stable identifiers for checkers and diagnostic reason codes.
//!
//! A checker ID names one of the four rule sets. A `code` is a short snake_case discriminator.

// Checkers
pub const CHECK_ADVISORIES: &str = "advisories";
pub const CHECK_BANS: &str = "bans";
pub const CHECK_LICENSES: &str = "licenses";
pub const CHECK_SOURCES: &str = "sources";

// Codes: advisories
pub const CODE_VULNERABILITY: &str = "vulnerability";
pub const CODE_ADVISORY_IGNORED: &str = "advisory_ignored";
pub const CODE_YANKED: &str = "yanked";
pub const CODE_UNKNOWN_VERSION_PREDICATE: &str = "unknown_version_predicate";
pub const CODE_ADVISORY_DB_STALE: &str = "advisory_db_stale";

// Codes: licenses
pub const CODE_LICENSE_NOT_ALLOWED: &str = "license_not_allowed";
pub const CODE_LICENSE_MISSING: &str = "license_missing";
pub const CODE_LICENSE_UNPARSEABLE: &str = "license_unparseable";

// Codes: bans
pub const CODE_DUPLICATE_VERSION: &str = "duplicate_version";
pub const CODE_WILDCARD_REQUIREMENT: &str = "wildcard_requirement";

// Codes: sources
pub const CODE_UNKNOWN_REGISTRY: &str = "unknown_registry";
pub const CODE_UNKNOWN_GIT: &str = "unknown_git";
