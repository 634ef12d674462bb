// src/tools/terraform.rs

//! Thin wrapper around the `terraform` binary.
//!
//! Each operation assembles its argument list, runs it in the template
//! directory through [`crate::exec::run`] and wraps failures with the name
//! of the operation.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;
use tracing::info;

use crate::config::{DeployConfig, TerraformConfig};
use crate::errors::{DeployexecError, Result};
use crate::exec::{ProcessSpec, RunOutput, StripAnsiSink, find_in_path, run};
use crate::model::LambdaFunction;

#[derive(Debug, Deserialize)]
struct TerraformOutput {
    #[allow(dead_code)]
    #[serde(default)]
    sensitive: bool,
    value: serde_json::Value,
}

#[derive(Debug, Clone)]
pub struct Terraform {
    program: PathBuf,
    dir: PathBuf,
    state_bucket: String,
    region: String,
    environment: String,
    private_subnet_ids: String,
    sink: StripAnsiSink,
}

impl Terraform {
    /// Locate `terraform` on `PATH` and prepare to run it in `dir`.
    pub fn new(
        dir: impl Into<PathBuf>,
        state_bucket: impl Into<String>,
        region: impl Into<String>,
    ) -> Result<Self> {
        let program = find_in_path("terraform")
            .ok_or_else(|| DeployexecError::ToolNotFound("terraform".to_string()))?;
        Self::with_program(program, dir, state_bucket, region)
    }

    /// Like [`Terraform::new`] but with an explicit binary path.
    pub fn with_program(
        program: impl Into<PathBuf>,
        dir: impl Into<PathBuf>,
        state_bucket: impl Into<String>,
        region: impl Into<String>,
    ) -> Result<Self> {
        let state_bucket = state_bucket.into();
        if state_bucket.is_empty() {
            return Err(DeployexecError::ConfigError(
                "remote state bucket cannot be an empty value".to_string(),
            ));
        }

        Ok(Self {
            program: program.into(),
            dir: dir.into(),
            state_bucket,
            region: region.into(),
            environment: String::new(),
            private_subnet_ids: String::new(),
            sink: StripAnsiSink::new(),
        })
    }

    pub fn from_config(terraform: &TerraformConfig, deploy: &DeployConfig) -> Result<Self> {
        Ok(Self::new(
            &terraform.template_dir,
            &terraform.state_bucket,
            &terraform.region,
        )?
        .environment(&deploy.environment)
        .private_subnet_ids(&deploy.private_subnet_ids))
    }

    /// Environment used for functions that don't name one.
    pub fn environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    pub fn private_subnet_ids(mut self, ids: impl Into<String>) -> Self {
        self.private_subnet_ids = ids.into();
        self
    }

    /// `terraform init` against the remote state stored under `remote_key`.
    pub async fn init(&self, remote_key: &str) -> Result<()> {
        self.invoke(self.init_args(remote_key))
            .await
            .into_result()
            .context("failed to invoke terraform init")?;
        Ok(())
    }

    pub async fn plan(&self, function: &LambdaFunction) -> Result<()> {
        self.invoke(self.plan_args(function))
            .await
            .into_result()
            .context("failed to invoke terraform plan")?;
        Ok(())
    }

    pub async fn apply(&self, function: &LambdaFunction) -> Result<()> {
        self.invoke(self.apply_args(function))
            .await
            .into_result()
            .context("failed to invoke terraform apply")?;
        Ok(())
    }

    pub async fn apply_target(&self, target: &str) -> Result<()> {
        let args = vec![
            "apply".to_string(),
            arg("input", "false"),
            arg("target", target),
            flag("auto-approve"),
        ];
        self.invoke(args)
            .await
            .into_result()
            .context("failed to invoke terraform apply")?;
        Ok(())
    }

    pub async fn destroy(&self) -> Result<()> {
        self.invoke(vec!["destroy".to_string(), flag("auto-approve")])
            .await
            .into_result()
            .context("failed to invoke terraform destroy")?;
        Ok(())
    }

    /// Value of the named output, or `None` if the state has no such output.
    pub async fn output(&self, name: &str) -> Result<Option<String>> {
        let (stdout, _) = self
            .invoke(vec!["output".to_string(), flag("json")])
            .await
            .into_result()
            .context("failed to invoke terraform output")?;

        let outputs: HashMap<String, TerraformOutput> =
            serde_json::from_slice(&stdout).context("failed to parse terraform output")?;

        Ok(outputs.get(name).map(|o| render_value(&o.value)))
    }

    pub async fn version(&self) -> Result<String> {
        let (stdout, _) = self
            .invoke(vec!["version".to_string()])
            .await
            .into_result()
            .context("failed to invoke terraform version")?;

        let text = String::from_utf8_lossy(&stdout);
        Ok(text.strip_suffix('\n').unwrap_or(&text).to_string())
    }

    pub fn init_args(&self, remote_key: &str) -> Vec<String> {
        vec![
            "init".to_string(),
            arg("backend-config", &format!("bucket={}", self.state_bucket)),
            arg("backend-config", &format!("key={remote_key}")),
            arg("backend-config", &format!("region={}", self.region)),
        ]
    }

    pub fn plan_args(&self, function: &LambdaFunction) -> Vec<String> {
        let mut args = vec!["plan".to_string(), arg("input", "false")];
        args.extend(self.function_vars(function));
        args
    }

    pub fn apply_args(&self, function: &LambdaFunction) -> Vec<String> {
        let mut args = vec!["apply".to_string(), arg("input", "false")];
        args.extend(self.function_vars(function));
        args.push(flag("auto-approve"));
        args
    }

    fn function_vars(&self, f: &LambdaFunction) -> Vec<String> {
        let environment = f.environment.as_deref().unwrap_or(&self.environment);
        [
            ("lambda_name", f.name.as_str()),
            ("lambda_file", f.zip_file.as_str()),
            ("environment", environment),
            ("bundle_name", f.bundle_name.as_str()),
            ("handler", f.handler.as_str()),
            ("runtime", f.runtime.as_str()),
            ("private_subnet_ids", self.private_subnet_ids.as_str()),
        ]
        .into_iter()
        .map(|(k, v)| arg("var", &format!("{k}={v}")))
        .collect()
    }

    async fn invoke(&self, args: Vec<String>) -> RunOutput {
        info!(dir = %self.dir.display(), subcommand = %args[0], "running terraform");
        let spec = ProcessSpec::new(&self.program)
            .args(args)
            .current_dir(&self.dir);
        run(&spec, Some(&self.sink)).await
    }
}

fn arg(key: &str, value: &str) -> String {
    format!("-{key}={value}")
}

fn flag(key: &str) -> String {
    format!("-{key}")
}

fn render_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
