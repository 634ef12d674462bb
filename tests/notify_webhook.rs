// tests/notify_webhook.rs

mod common;
use crate::common::{init_tracing, one_shot_server, webhook_client};

use deployexec::model::LambdaFunction;
use deployexec::tools::Notifier;
use deployexec_test_utils::with_timeout;

fn function() -> LambdaFunction {
    LambdaFunction {
        name: "app-handler".into(),
        zip_file: "handler.zip".into(),
        bundle_name: "app".into(),
        handler: "index.handler".into(),
        runtime: "nodejs18.x".into(),
        environment: Some("qa".into()),
    }
}

#[tokio::test]
async fn success_report_is_posted_as_json() {
    init_tracing();
    let (url, server) = one_shot_server(200).await;
    let notifier = Notifier::with_client(webhook_client(), Some(url), None, "staging");

    with_timeout(notifier.deployed(&function())).await.unwrap();
    let got = server.await.unwrap();

    assert!(got.head.starts_with("post /hooks/deploys "));
    assert!(got.head.contains("x-custom-header: aws-sns"));
    assert!(got.head.contains("content-type: application/json"));

    let attachment = &got.body["attachments"][0];
    assert_eq!(attachment["color"], "#006400");
    // The function's own environment wins over the configured one.
    assert_eq!(attachment["fields"][3]["value"], "qa");
}

#[tokio::test]
async fn failure_report_goes_to_the_alerts_hook() {
    init_tracing();
    let (url, server) = one_shot_server(200).await;
    let notifier = Notifier::with_client(webhook_client(), None, Some(url), "staging");

    with_timeout(notifier.failed(&"state is locked", "Lambda deployment failed."))
        .await
        .unwrap();
    let got = server.await.unwrap();

    let fields = &got.body["attachments"][0]["fields"];
    assert_eq!(fields[0]["title"], "Lambda deployment failed.");
    assert_eq!(fields[1]["value"], "state is locked");
    assert_eq!(fields[2]["value"], "staging");
}

#[tokio::test]
async fn rejected_report_is_an_error() {
    init_tracing();
    let (url, server) = one_shot_server(500).await;
    let notifier = Notifier::with_client(webhook_client(), Some(url), None, "staging");

    let err = with_timeout(notifier.deployed(&function()))
        .await
        .unwrap_err();
    server.await.unwrap();

    assert!(
        format!("{err:#}").contains("failed to send notification payload"),
        "{err:#}"
    );
}
