// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod model;
pub mod tools;

use std::path::Path;

use anyhow::Context;
use tokio::io::AsyncWriteExt;
use tracing::{error, info};

use crate::cli::{CliArgs, Command, TerraformAction};
use crate::config::{ConfigFile, load_and_validate};
use crate::errors::{DeployexecError, Result};
use crate::exec::{ProcessSpec, find_in_path};
use crate::model::LambdaFunction;
use crate::tools::{Notifier, Terraform, remove_local_files, unzip_bundle};

/// High-level entry point used by `main.rs`.
pub async fn run(args: CliArgs) -> Result<()> {
    match args.command {
        Command::Exec { program, args } => exec_passthrough(&program, args).await,
        Command::Unzip { bundle } => {
            let cfg = load_and_validate(&args.config)?;
            let target = unzip_bundle(&cfg.deploy.temp_dir, &bundle).await?;
            println!("{}", target.display());
            Ok(())
        }
        Command::Clean { paths } => remove_local_files(&paths).await,
        Command::Terraform { action } => {
            let cfg = load_and_validate(&args.config)?;
            run_terraform(&cfg, action).await
        }
    }
}

/// Run one program through the harness and replay its captured output.
async fn exec_passthrough(program: &str, args: Vec<String>) -> Result<()> {
    let path =
        find_in_path(program).ok_or_else(|| DeployexecError::ToolNotFound(program.to_string()))?;
    let output = exec::run(&ProcessSpec::new(path).args(args), None).await;

    tokio::io::stdout().write_all(&output.stdout).await?;
    tokio::io::stderr().write_all(&output.stderr).await?;

    output.outcome?;
    Ok(())
}

async fn run_terraform(cfg: &ConfigFile, action: TerraformAction) -> Result<()> {
    let tf = Terraform::from_config(&cfg.terraform, &cfg.deploy)?;

    match action {
        TerraformAction::Init { key } => tf.init(&key).await,
        TerraformAction::Plan { function } => tf.plan(&load_function(&function).await?).await,
        TerraformAction::Apply { function } => tf.apply(&load_function(&function).await?).await,
        TerraformAction::ApplyTarget { target } => tf.apply_target(&target).await,
        TerraformAction::Destroy => tf.destroy().await,
        TerraformAction::Deploy { function } => {
            let notifier = Notifier::from_config(&cfg.deploy)?;
            let function = load_function(&function).await?;
            deploy_and_report(&tf, &notifier, &function, cfg.terraform.apply).await
        }
        TerraformAction::Output { name } => match tf.output(&name).await? {
            Some(value) => {
                println!("{value}");
                Ok(())
            }
            None => Err(DeployexecError::Other(anyhow::anyhow!(
                "terraform output {name} does not exist"
            ))),
        },
        TerraformAction::Version => {
            println!("{}", tf.version().await?);
            Ok(())
        }
    }
}

/// Initialise state for one function, then apply or plan it.
pub async fn deploy_function(tf: &Terraform, function: &LambdaFunction, apply: bool) -> Result<()> {
    tf.init(&function.name)
        .await
        .context("failed to run Terraform init")?;

    if apply {
        info!(lambda_name = %function.name, "applying Terraform template");
        tf.apply(function)
            .await
            .context("failed to run Terraform apply")?;
        info!(lambda_name = %function.name, "Successfully deployed lambda function");
    } else {
        tf.plan(function)
            .await
            .context("failed to run Terraform plan")?;
        info!(lambda_name = %function.name, "Successfully ran Terraform plan");
    }

    Ok(())
}

/// Deploy `function` and report the result through `notifier`.
///
/// Failing to send a report is logged and never changes the deploy result.
pub async fn deploy_and_report(
    tf: &Terraform,
    notifier: &Notifier,
    function: &LambdaFunction,
    apply: bool,
) -> Result<()> {
    match deploy_function(tf, function, apply).await {
        Ok(()) => {
            // Plans are not announced.
            if apply {
                if let Err(err) = notifier.deployed(function).await {
                    error!(error = %err, "failed to send deploy notification");
                }
            }
            Ok(())
        }
        Err(deploy_err) => {
            if let Err(err) = notifier
                .failed(&deploy_err, "Lambda deployment failed.")
                .await
            {
                error!(error = %err, "failed to send deploy error notification");
            }
            Err(deploy_err)
        }
    }
}

/// Read a [`LambdaFunction`] description from a TOML file.
pub async fn load_function(path: &Path) -> Result<LambdaFunction> {
    let contents = tokio::fs::read_to_string(path).await?;
    Ok(toml::from_str(&contents)?)
}
