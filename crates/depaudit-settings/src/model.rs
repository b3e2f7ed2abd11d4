use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `depaudit.toml` schema v1.
///
/// This is a *user-facing* config model: lint levels stay strings here and are validated (with
/// their key path) during resolution.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct DepauditConfigV1 {
    /// Optional schema string for tooling (`depaudit.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[serde(default)]
    pub advisories: AdvisoriesConfig,

    #[serde(default)]
    pub licenses: LicensesConfig,

    #[serde(default)]
    pub bans: BansConfig,

    #[serde(default)]
    pub sources: SourcesConfig,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct AdvisoriesConfig {
    /// Cached advisory database file (JSON).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<String>,

    /// Where `--fetch` refreshes the database from; tried in order.
    #[serde(default)]
    pub db_urls: Vec<String>,

    /// `deny`, `warn` (default), or `allow`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yanked: Option<String>,

    /// Advisory IDs reported as notes instead of violations.
    #[serde(default)]
    pub ignore: Vec<String>,

    /// `name` or `name@version` specs exempt from the yanked rule.
    #[serde(default)]
    pub ignore_yanked: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_timeout_secs: Option<u64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct LicensesConfig {
    #[serde(default)]
    pub allow: Vec<String>,

    /// Minimum confidence (exclusive) for fuzzy license matches. Clamped to `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_threshold: Option<f32>,

    /// Per-package allow-sets; the first entry naming a package wins.
    #[serde(default)]
    pub exceptions: Vec<LicenseExceptionConfig>,

    #[serde(default)]
    pub private: PrivateConfig,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LicenseExceptionConfig {
    pub name: String,
    #[serde(default)]
    pub allow: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PrivateConfig {
    /// Skip the missing-license rule for unpublished packages.
    #[serde(default)]
    pub ignore: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct BansConfig {
    /// `deny`, `warn` (default), or `allow`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiple_versions: Option<String>,

    /// `deny`, `warn`, or `allow` (default).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wildcards: Option<String>,

    /// Package-name globs exempt from both ban rules.
    #[serde(default)]
    pub skip: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct SourcesConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unknown_registry: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unknown_git: Option<String>,

    /// Trusted registries. Defaults to the crates.io index when absent; an explicit list
    /// replaces the default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_registry: Option<Vec<String>>,

    #[serde(default)]
    pub allow_git: Vec<String>,
}
