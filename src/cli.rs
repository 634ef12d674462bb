// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `deployexec`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "deployexec",
    version,
    about = "Run deployment tooling with captured, correlated output.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML). `DEPLOYEXEC_*` env vars override it.
    #[arg(
        long,
        value_name = "PATH",
        default_value_os_t = crate::config::default_config_path(),
        global = true
    )]
    pub config: PathBuf,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `DEPLOYEXEC_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run a program, logging its output line by line.
    Exec {
        program: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Unpack `<temp_dir>/<BUNDLE>` into `<temp_dir>/<bundle name>`.
    Unzip { bundle: String },

    /// Remove local files or directories.
    Clean {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Drive terraform in the configured template directory.
    Terraform {
        #[command(subcommand)]
        action: TerraformAction,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum TerraformAction {
    /// `terraform init` with remote state stored under KEY.
    Init { key: String },
    /// `terraform plan` for the function described in a TOML file.
    Plan { function: PathBuf },
    /// `terraform apply` for the function described in a TOML file.
    Apply { function: PathBuf },
    /// `terraform apply -target=TARGET`.
    ApplyTarget { target: String },
    /// `terraform destroy`.
    Destroy,
    /// `init` keyed by the function name, then `apply` or `plan` depending
    /// on `terraform.apply`.
    Deploy { function: PathBuf },
    /// Print a single output value.
    Output { name: String },
    /// Print the terraform version.
    Version,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

pub fn parse() -> CliArgs {
    CliArgs::parse()
}
