// src/config/validate.rs

use std::path::PathBuf;

use crate::config::model::{
    ConfigFile, DEFAULT_REGION, DeployConfig, RawConfigFile, TerraformConfig,
};
use crate::errors::{DeployexecError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = DeployexecError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let deploy = DeployConfig {
            temp_dir: required_path(raw.deploy.temp_dir, "deploy.temp_dir")?,
            environment: required(raw.deploy.environment, "deploy.environment")?,
            private_subnet_ids: raw.deploy.private_subnet_ids.unwrap_or_default(),
            notifications_hook: optional(raw.deploy.notifications_hook),
            alerts_hook: optional(raw.deploy.alerts_hook),
        };

        let terraform = TerraformConfig {
            template_dir: required_path(raw.terraform.template_dir, "terraform.template_dir")?,
            state_bucket: required(raw.terraform.state_bucket, "terraform.state_bucket")?,
            region: raw
                .terraform
                .region
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
            apply: raw.terraform.apply.unwrap_or(false),
        };

        Ok(ConfigFile { deploy, terraform })
    }
}

fn required(value: Option<String>, field: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(DeployexecError::ConfigError(format!("{field} was not set"))),
    }
}

fn optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn required_path(value: Option<PathBuf>, field: &str) -> Result<PathBuf> {
    match value {
        Some(p) if !p.as_os_str().is_empty() => Ok(p),
        _ => Err(DeployexecError::ConfigError(format!("{field} was not set"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::{RawDeploySection, RawTerraformSection};

    fn complete() -> RawConfigFile {
        RawConfigFile {
            deploy: RawDeploySection {
                temp_dir: Some("/tmp/bundles".into()),
                environment: Some("staging".into()),
                private_subnet_ids: None,
                notifications_hook: None,
                alerts_hook: Some(" ".into()),
            },
            terraform: RawTerraformSection {
                template_dir: Some("terraform".into()),
                state_bucket: Some("state".into()),
                region: None,
                apply: None,
            },
        }
    }

    #[test]
    fn fills_defaults() {
        let cfg = ConfigFile::try_from(complete()).unwrap();
        assert_eq!(cfg.terraform.region, "us-east-1");
        assert!(!cfg.terraform.apply);
        assert_eq!(cfg.deploy.private_subnet_ids, "");
        assert_eq!(cfg.deploy.notifications_hook, None);
        assert_eq!(cfg.deploy.alerts_hook, None);
    }

    #[test]
    fn blank_state_bucket_is_rejected() {
        let mut raw = complete();
        raw.terraform.state_bucket = Some("  ".into());
        match ConfigFile::try_from(raw) {
            Err(DeployexecError::ConfigError(msg)) => {
                assert_eq!(msg, "terraform.state_bucket was not set")
            }
            other => panic!("expected ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn missing_temp_dir_is_rejected() {
        let mut raw = complete();
        raw.deploy.temp_dir = None;
        assert!(matches!(
            ConfigFile::try_from(raw),
            Err(DeployexecError::ConfigError(_))
        ));
    }
}
