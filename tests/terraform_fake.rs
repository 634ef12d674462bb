// tests/terraform_fake.rs
#![cfg(unix)]

mod common;
use crate::common::{init_tracing, one_shot_server, webhook_client};

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use deployexec::{deploy_and_report, deploy_function, load_function};
use deployexec::model::LambdaFunction;
use deployexec::tools::{Notifier, Terraform};
use deployexec_test_utils::capture_logs;

/// A stand-in for `terraform` that records its arguments in `calls.log`
/// (in its working directory) and answers a few subcommands.
const FAKE_TERRAFORM: &str = r#"#!/bin/sh
echo "$*" >> calls.log
case "$*" in
  *lambda_name=broken-handler*)
    echo "invalid function" >&2
    exit 1
    ;;
esac
case "$1" in
  output)
    printf '{"function_arn":{"sensitive":false,"type":"string","value":"arn:aws:lambda:x"},"ids":{"sensitive":false,"type":["list","string"],"value":["a","b"]}}\n'
    ;;
  version)
    printf 'Terraform v1.6.0\n'
    ;;
  plan)
    printf '\033[1mPlan:\033[0m 1 to add\n'
    ;;
  destroy)
    echo "state is locked" >&2
    exit 1
    ;;
esac
"#;

struct Fixture {
    dir: TempDir,
    tf: Terraform,
}

impl Fixture {
    fn new() -> Self {
        init_tracing();
        let dir = TempDir::new().unwrap();
        let program = write_fake(dir.path());
        let tf = Terraform::with_program(program, dir.path(), "state-bucket", "eu-west-1")
            .unwrap()
            .environment("staging")
            .private_subnet_ids("subnet-1");
        Self { dir, tf }
    }

    fn calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.dir.path().join("calls.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

fn write_fake(dir: &Path) -> PathBuf {
    let path = dir.join("terraform");
    std::fs::write(&path, FAKE_TERRAFORM).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn function() -> LambdaFunction {
    LambdaFunction {
        name: "app-handler".into(),
        zip_file: "handler.zip".into(),
        bundle_name: "app".into(),
        handler: "index.handler".into(),
        runtime: "nodejs18.x".into(),
        environment: None,
    }
}

#[tokio::test]
async fn init_runs_in_template_dir_with_backend_config() {
    let fx = Fixture::new();
    fx.tf.init("app-handler").await.unwrap();

    assert_eq!(
        fx.calls(),
        vec![
            "init -backend-config=bucket=state-bucket -backend-config=key=app-handler -backend-config=region=eu-west-1"
        ]
    );
}

#[tokio::test]
async fn output_returns_named_values() {
    let fx = Fixture::new();

    assert_eq!(
        fx.tf.output("function_arn").await.unwrap().as_deref(),
        Some("arn:aws:lambda:x")
    );
    assert_eq!(
        fx.tf.output("ids").await.unwrap().as_deref(),
        Some(r#"["a","b"]"#)
    );
    assert_eq!(fx.tf.output("missing").await.unwrap(), None);
}

#[tokio::test]
async fn version_is_trimmed() {
    let fx = Fixture::new();
    assert_eq!(fx.tf.version().await.unwrap(), "Terraform v1.6.0");
}

#[tokio::test]
async fn failures_name_the_operation() {
    let fx = Fixture::new();
    let err = fx.tf.destroy().await.unwrap_err();

    let msg = format!("{err:#}");
    assert!(msg.contains("failed to invoke terraform destroy"), "{msg}");
    assert!(msg.contains("failed invocation"), "{msg}");
    assert_eq!(fx.calls(), vec!["destroy -auto-approve"]);
}

#[tokio::test]
async fn deploy_plans_unless_apply_is_set() {
    let fx = Fixture::new();
    deploy_function(&fx.tf, &function(), false).await.unwrap();

    let calls = fx.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].starts_with("init "));
    assert!(calls[0].contains("key=app-handler"));
    assert!(calls[1].starts_with("plan -input=false -var=lambda_name=app-handler"));
}

#[tokio::test]
async fn deploy_applies_when_asked() {
    let fx = Fixture::new();
    deploy_function(&fx.tf, &function(), true).await.unwrap();

    let calls = fx.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[1].starts_with("apply -input=false"));
    assert!(calls[1].ends_with("-auto-approve"));
    assert!(calls[1].contains("-var=environment=staging"));
}

#[tokio::test]
async fn plan_output_is_logged_without_colour_escapes() {
    let fx = Fixture::new();
    let (logs, _guard) = capture_logs();

    fx.tf.plan(&function()).await.unwrap();

    let events = logs.events();
    let plan_line = events
        .iter()
        .find(|e| e.message == "Plan: 1 to add")
        .expect("plan line logged");
    assert_eq!(plan_line.field("stream"), Some("stdout"));
    assert!(plan_line.field("run").is_some());
    assert!(events.iter().all(|e| !e.message.contains('\x1b')));
}

#[tokio::test]
async fn applied_deploy_is_announced() {
    let fx = Fixture::new();
    let (url, server) = one_shot_server(200).await;
    let notifier = Notifier::with_client(webhook_client(), Some(url), None, "staging");

    deploy_and_report(&fx.tf, &notifier, &function(), true)
        .await
        .unwrap();

    let got = server.await.unwrap();
    let attachment = &got.body["attachments"][0];
    assert_eq!(attachment["color"], "#006400");
    assert_eq!(attachment["fields"][0]["value"], "`app-handler`");
}

#[tokio::test]
async fn failed_deploy_raises_an_alert_and_keeps_the_error() {
    let fx = Fixture::new();
    let (url, server) = one_shot_server(200).await;
    let notifier = Notifier::with_client(webhook_client(), None, Some(url), "staging");
    let broken = LambdaFunction {
        name: "broken-handler".into(),
        ..function()
    };

    let err = deploy_and_report(&fx.tf, &notifier, &broken, true)
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("failed to run Terraform apply"), "{err:#}");

    let got = server.await.unwrap();
    let fields = &got.body["attachments"][0]["fields"];
    assert_eq!(fields[0]["title"], "Lambda deployment failed.");
    assert!(
        fields[1]["value"]
            .as_str()
            .unwrap()
            .contains("failed to run Terraform apply")
    );
}

#[tokio::test]
async fn unreachable_webhook_does_not_fail_the_deploy() {
    let fx = Fixture::new();
    let notifier = Notifier::with_client(
        webhook_client(),
        Some("http://127.0.0.1:9/hooks/deploys".into()),
        None,
        "staging",
    );

    deploy_and_report(&fx.tf, &notifier, &function(), true)
        .await
        .unwrap();
    assert_eq!(fx.calls().len(), 2);
}

#[tokio::test]
async fn function_file_is_read_from_toml() {
    let fx = Fixture::new();
    let path = fx.dir.path().join("function.toml");
    std::fs::write(
        &path,
        r#"
name = "app-handler"
zip_file = "handler.zip"
bundle_name = "app"
handler = "index.handler"
runtime = "nodejs18.x"
"#,
    )
    .unwrap();

    assert_eq!(load_function(&path).await.unwrap(), function());
    assert!(load_function(&fx.dir.path().join("missing.toml")).await.is_err());
}
