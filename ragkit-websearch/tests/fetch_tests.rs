//! HTTP fetch retry behavior against a mock server.

use std::time::Duration;

use httpmock::prelude::*;
use ragkit_core::{RagError, WebSearchConfig};
use ragkit_websearch::fetch_with_retry;

fn config(retry_attempts: u32) -> WebSearchConfig {
    WebSearchConfig {
        retry_attempts,
        retry_delay: Duration::from_millis(10),
        timeout: Duration::from_secs(5),
        ..WebSearchConfig::default()
    }
}

#[tokio::test]
async fn returns_the_body_on_success() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/page");
            then.status(200).body("<html>hello</html>");
        })
        .await;

    let client = reqwest::Client::new();
    let body = fetch_with_retry(&client, &server.url("/page"), &config(2)).await.unwrap();

    assert_eq!(body, "<html>hello</html>");
    mock.assert_async().await;
}

#[tokio::test]
async fn sends_the_configured_user_agent() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/ua").header("user-agent", "ragkit-test-agent");
            then.status(200).body("ok");
        })
        .await;

    let mut cfg = config(1);
    cfg.user_agent = "ragkit-test-agent".to_string();
    let client = reqwest::Client::new();
    fetch_with_retry(&client, &server.url("/ua"), &cfg).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn retries_until_attempts_are_exhausted() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/flaky");
            then.status(503).body("unavailable");
        })
        .await;

    let client = reqwest::Client::new();
    let result = fetch_with_retry(&client, &server.url("/flaky"), &config(3)).await;

    assert!(
        matches!(result, Err(RagError::Extraction { ref message, .. }) if message.contains("503"))
    );
    mock.assert_hits_async(3).await;
}

#[tokio::test]
async fn zero_attempts_still_fetches_once() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/once");
            then.status(404);
        })
        .await;

    let client = reqwest::Client::new();
    let result = fetch_with_retry(&client, &server.url("/once"), &config(0)).await;

    assert!(matches!(result, Err(RagError::Extraction { .. })));
    mock.assert_hits_async(1).await;
}
