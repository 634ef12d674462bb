// src/model.rs

use serde::Deserialize;

/// A lambda function to provision from a bundle.
///
/// ```toml
/// name = "my-app-handler"
/// zip_file = "handler.zip"
/// bundle_name = "my-app"
/// handler = "index.handler"
/// runtime = "nodejs18.x"
/// environment = "staging"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LambdaFunction {
    pub name: String,
    pub zip_file: String,
    pub bundle_name: String,
    pub handler: String,
    pub runtime: String,
    /// Falls back to the configured deploy environment when omitted.
    #[serde(default)]
    pub environment: Option<String>,
}
