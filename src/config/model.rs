// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

/// Configuration as read from TOML, before env overrides and validation.
///
/// ```toml
/// [deploy]
/// temp_dir = "/tmp/bundles"
/// environment = "staging"
/// private_subnet_ids = "subnet-a,subnet-b"
/// notifications_hook = "https://chat.example.com/hooks/deploys"
/// alerts_hook = "https://chat.example.com/hooks/alerts"
///
/// [terraform]
/// template_dir = "terraform"
/// state_bucket = "my-state-bucket"
/// region = "us-east-1"
/// apply = false
/// ```
///
/// Every field is optional here; [`ConfigFile`] is what the rest of the
/// crate consumes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub deploy: RawDeploySection,

    #[serde(default)]
    pub terraform: RawTerraformSection,
}

/// `[deploy]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawDeploySection {
    /// Scratch directory bundles are downloaded and unpacked into.
    pub temp_dir: Option<PathBuf>,

    /// Deployment environment passed to templates (e.g. `staging`).
    pub environment: Option<String>,

    /// Comma-separated subnet ids passed through to templates.
    pub private_subnet_ids: Option<String>,

    /// Incoming webhook that receives successful deploy reports.
    pub notifications_hook: Option<String>,

    /// Incoming webhook that receives deploy failures.
    pub alerts_hook: Option<String>,
}

/// `[terraform]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawTerraformSection {
    pub template_dir: Option<PathBuf>,
    pub state_bucket: Option<String>,
    pub region: Option<String>,

    /// Run `apply` instead of `plan` when deploying.
    pub apply: Option<bool>,
}

/// Validated configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub deploy: DeployConfig,
    pub terraform: TerraformConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployConfig {
    pub temp_dir: PathBuf,
    pub environment: String,
    pub private_subnet_ids: String,
    pub notifications_hook: Option<String>,
    pub alerts_hook: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerraformConfig {
    pub template_dir: PathBuf,
    pub state_bucket: String,
    pub region: String,
    pub apply: bool,
}

pub const DEFAULT_REGION: &str = "us-east-1";
