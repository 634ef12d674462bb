// src/tools/notify.rs

//! Deploy reports posted to chat incoming webhooks.
//!
//! Successful deploys go to the notifications hook, failures to the alerts
//! hook. Payloads use the Slack-compatible attachment layout that
//! Mattermost and Slack both accept. An unset hook turns the matching
//! report into a no-op.

use std::fmt::Display;
use std::time::Duration;

use anyhow::Context;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::DeployConfig;
use crate::errors::Result;
use crate::model::LambdaFunction;

const USERNAME: &str = "Lambda Deployer";
const ICON_URL: &str =
    "https://cdn-images-1.medium.com/max/1200/1*9860tn6_CPEPnBxF1wIpmw@2x.jpeg";

pub const SUCCESS_COLOR: &str = "#006400";
pub const FAILURE_COLOR: &str = "#FF0000";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookPayload {
    pub username: String,
    pub icon_url: String,
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attachment {
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub fields: Vec<AttachmentField>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttachmentField {
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub value: String,
    pub short: bool,
}

impl AttachmentField {
    fn new(title: impl Into<String>, value: impl Into<String>, short: bool) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            short,
        }
    }
}

fn payload(attachment: Attachment) -> WebhookPayload {
    WebhookPayload {
        username: USERNAME.to_string(),
        icon_url: ICON_URL.to_string(),
        attachments: vec![attachment],
    }
}

/// Report for a function that was deployed.
pub fn deployed_payload(function: &LambdaFunction, environment: &str) -> WebhookPayload {
    payload(Attachment {
        color: SUCCESS_COLOR.to_string(),
        title: Some(format!(
            "Lambda function {} was successfully deployed",
            function.name
        )),
        fields: vec![
            AttachmentField::new("Name", format!("`{}`", function.name), true),
            AttachmentField::new("Bundle", format!("`{}`", function.bundle_name), true),
            AttachmentField::new("Runtime", &function.runtime, true),
            AttachmentField::new("Environment", environment, false),
        ],
    })
}

/// Report for a failed deploy. `message` is the headline, `err` the cause.
pub fn failure_payload(err: &dyn Display, message: &str, environment: &str) -> WebhookPayload {
    payload(Attachment {
        color: FAILURE_COLOR.to_string(),
        title: None,
        fields: vec![
            AttachmentField::new(message, "", false),
            AttachmentField::new("Error Message", format!("{err:#}"), false),
            AttachmentField::new("Environment", environment, true),
        ],
    })
}

#[derive(Debug, Clone)]
pub struct Notifier {
    client: reqwest::Client,
    notifications_hook: Option<String>,
    alerts_hook: Option<String>,
    environment: String,
}

impl Notifier {
    pub fn new(
        notifications_hook: Option<String>,
        alerts_hook: Option<String>,
        environment: impl Into<String>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("deployexec/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()
            .context("failed to build the webhook HTTP client")?;

        Ok(Self::with_client(
            client,
            notifications_hook,
            alerts_hook,
            environment,
        ))
    }

    /// Like [`Notifier::new`] but with a caller-provided client.
    pub fn with_client(
        client: reqwest::Client,
        notifications_hook: Option<String>,
        alerts_hook: Option<String>,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            client,
            notifications_hook,
            alerts_hook,
            environment: environment.into(),
        }
    }

    pub fn from_config(deploy: &DeployConfig) -> Result<Self> {
        Self::new(
            deploy.notifications_hook.clone(),
            deploy.alerts_hook.clone(),
            &deploy.environment,
        )
    }

    /// Post a success report to the notifications hook.
    pub async fn deployed(&self, function: &LambdaFunction) -> Result<()> {
        let environment = function.environment.as_deref().unwrap_or(&self.environment);
        let payload = deployed_payload(function, environment);
        self.send(self.notifications_hook.as_deref(), &payload, "notification")
            .await
    }

    /// Post a failure report to the alerts hook.
    pub async fn failed(&self, err: &dyn Display, message: &str) -> Result<()> {
        let payload = failure_payload(err, message, &self.environment);
        self.send(self.alerts_hook.as_deref(), &payload, "error").await
    }

    async fn send(&self, hook: Option<&str>, payload: &WebhookPayload, kind: &str) -> Result<()> {
        let Some(url) = hook else {
            debug!(kind, "no webhook configured; skipping report");
            return Ok(());
        };

        self.client
            .post(url)
            .header("X-Custom-Header", "aws-sns")
            .json(payload)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .with_context(|| format!("failed to send {kind} payload"))?;

        info!(kind, "sent webhook report");
        Ok(())
    }
}
