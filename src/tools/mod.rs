// src/tools/mod.rs

//! External tools driven through the execution harness.

pub mod bundle;
pub mod notify;
pub mod terraform;

pub use bundle::{bundle_name, remove_local_files, unzip_bundle};
pub use notify::Notifier;
pub use terraform::Terraform;
