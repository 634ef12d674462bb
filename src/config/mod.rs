// src/config/mod.rs

//! Configuration for the deployment tools.
//!
//! - `model.rs`: TOML-backed raw model and the validated [`ConfigFile`].
//! - `loader.rs`: read the file and overlay `DEPLOYEXEC_*` env vars.
//! - `validate.rs`: turn the raw model into a [`ConfigFile`].

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{apply_env_overrides, default_config_path, load_and_validate, load_from_path};
pub use model::{ConfigFile, DeployConfig, RawConfigFile, TerraformConfig};
