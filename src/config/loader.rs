// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Prefix for environment overrides, e.g. `DEPLOYEXEC_STATE_BUCKET`.
pub const ENV_PREFIX: &str = "DEPLOYEXEC_";

/// Load a configuration file from a given path without validating it.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    let config: RawConfigFile = toml::from_str(&contents)?;
    Ok(config)
}

/// Load config, apply `DEPLOYEXEC_*` overrides from the process environment
/// and validate.
///
/// A missing file is not an error: the environment alone may carry every
/// required value.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let raw = if path.exists() {
        load_from_path(path)?
    } else {
        tracing::debug!(path = %path.display(), "config file not found; using environment only");
        RawConfigFile::default()
    };

    let raw = apply_env_overrides(raw, |key| std::env::var(key).ok());
    ConfigFile::try_from(raw)
}

/// Overlay values from `lookup` (keyed by `DEPLOYEXEC_<FIELD>`) onto `raw`.
///
/// Empty values are ignored. `DEPLOYEXEC_APPLY` is true only for `"true"`.
pub fn apply_env_overrides<F>(mut raw: RawConfigFile, lookup: F) -> RawConfigFile
where
    F: Fn(&str) -> Option<String>,
{
    let get = |field: &str| lookup(&format!("{ENV_PREFIX}{field}")).filter(|v| !v.is_empty());

    if let Some(v) = get("TEMP_DIR") {
        raw.deploy.temp_dir = Some(PathBuf::from(v));
    }
    if let Some(v) = get("ENVIRONMENT") {
        raw.deploy.environment = Some(v);
    }
    if let Some(v) = get("PRIVATE_SUBNET_IDS") {
        raw.deploy.private_subnet_ids = Some(v);
    }
    if let Some(v) = get("NOTIFICATIONS_HOOK") {
        raw.deploy.notifications_hook = Some(v);
    }
    if let Some(v) = get("ALERTS_HOOK") {
        raw.deploy.alerts_hook = Some(v);
    }
    if let Some(v) = get("TEMPLATE_DIR") {
        raw.terraform.template_dir = Some(PathBuf::from(v));
    }
    if let Some(v) = get("STATE_BUCKET") {
        raw.terraform.state_bucket = Some(v);
    }
    if let Some(v) = get("REGION") {
        raw.terraform.region = Some(v);
    }
    if let Some(v) = get("APPLY") {
        raw.terraform.apply = Some(v.trim().eq_ignore_ascii_case("true"));
    }

    raw
}

/// Default config path: `Deployexec.toml` in the current directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Deployexec.toml")
}
