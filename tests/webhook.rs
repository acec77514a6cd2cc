//! Webhook delivery against a mock HTTP server.

mod helpers;

use std::sync::Arc;

use httptest::{all_of, cycle, matchers::*, responders::*, Expectation, Server};
use serde_json::json;

use asin_extractor::config::WebhookMode;
use asin_extractor::store::{CollectedItem, WebhookConfig, WebhookConfigUpdate};
use asin_extractor::webhook::{build_payload, validate_payload, WebhookClient};

use helpers::create_temp_store;

fn item(asin: &str) -> CollectedItem {
    CollectedItem::manual(asin, format!("https://www.amazon.com/dp/{asin}/"))
}

fn client() -> WebhookClient {
    WebhookClient::new(Arc::new(reqwest::Client::new()))
}

#[tokio::test]
async fn test_send_basic_payload_with_auth() {
    let server = Server::run();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("POST", "/hook"),
            request::headers(contains(("authorization", "Basic dXNlcjpwYXNz"))),
            request::headers(contains(("user-agent", "AMZ-Extractor-ALL/1.0.0"))),
            request::body(json_decoded(eq(json!({
                "amazon_keywords": "coffee mug",
                "asin_top3": "B0AAAAAAAA,B0BBBBBBBB,B0CCCCCCCC",
                "asin_list": "B0DDDDDDDD",
            })))),
        ])
        .respond_with(status_code(200).body("accepted")),
    );

    let (store, _dir) = create_temp_store().await;
    let items: Vec<CollectedItem> = ["B0AAAAAAAA", "B0BBBBBBBB", "B0CCCCCCCC", "B0DDDDDDDD"]
        .into_iter()
        .map(item)
        .collect();
    store.set_asin_list(&items).await.unwrap();
    store.set_keywords("coffee mug").await.unwrap();

    let config = WebhookConfig {
        url: server.url("/hook").to_string(),
        username: "user".into(),
        password: "pass".into(),
        mode: WebhookMode::Basic,
    };
    let response = client()
        .send(&store, WebhookMode::Basic, &config)
        .await
        .expect("request should complete");

    assert!(response.success);
    assert_eq!(response.status, 200);
    assert_eq!(response.body, "accepted");
}

#[tokio::test]
async fn test_non_success_status_is_reported() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("POST", "/hook"))
            .respond_with(status_code(401).body("bad credentials")),
    );

    let config = WebhookConfig {
        url: server.url("/hook").to_string(),
        username: "user".into(),
        password: "wrong".into(),
        mode: WebhookMode::Enhanced,
    };
    let response = client()
        .test_connection(&config)
        .await
        .expect("a 401 is a response, not an error");

    assert!(!response.success);
    assert_eq!(response.status, 401);
    assert_eq!(response.status_text, "Unauthorized");
    assert_eq!(response.body, "bad credentials");
}

#[tokio::test]
async fn test_connection_sends_test_payload_without_auth() {
    let server = Server::run();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("POST", "/hook"),
            request::headers(not(contains(key("authorization")))),
            request::body(matches("\"test\":true")),
        ])
        .respond_with(status_code(204)),
    );

    let config = WebhookConfig {
        url: server.url("/hook").to_string(),
        username: String::new(),
        password: String::new(),
        mode: WebhookMode::Basic,
    };
    let response = client().test_connection(&config).await.unwrap();
    assert!(response.success);
    assert_eq!(response.status, 204);
}

#[tokio::test]
async fn test_send_batch_reports_each_payload() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("POST", "/hook"))
            .times(2)
            .respond_with(cycle![
                status_code(200).body("first"),
                status_code(500).body("second"),
            ]),
    );

    let config = WebhookConfig {
        url: server.url("/hook").to_string(),
        ..WebhookConfig::default()
    };
    let results = client()
        .send_batch(&[json!({"n": 1}), json!({"n": 2})], &config)
        .await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].index, 0);
    assert!(results[0].success);
    assert_eq!(results[1].index, 1);
    assert!(!results[1].success);
    assert_eq!(results[1].status, Some(500));
}

#[tokio::test]
async fn test_enhanced_payload_from_store() {
    let (store, _dir) = create_temp_store().await;
    store.add_asin(item("B0AAAAAAAA")).await.unwrap();

    let payload = build_payload(&store, WebhookMode::Enhanced).await.unwrap();
    assert_eq!(payload["source"], "amz-extractor-all");
    assert_eq!(payload["asin_top3"], "B0AAAAAAAA");
    assert_eq!(payload["asin_list"], "");
    assert_eq!(payload["extraction_data"]["images"], json!([]));

    let validation = validate_payload(&payload, WebhookMode::Enhanced);
    assert!(validation.valid);
    assert_eq!(validation.mode, WebhookMode::Enhanced);

    let basic = build_payload(&store, WebhookMode::Basic).await.unwrap();
    assert!(basic.get("extraction_data").is_none());
}

#[tokio::test]
async fn test_stored_settings_drive_delivery() {
    let server = Server::run();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("POST", "/stored"),
            request::headers(contains(("authorization", "Basic dXNlcjpzM2NyZXQ="))),
        ])
        .respond_with(status_code(200)),
    );

    let (store, _dir) = create_temp_store().await;
    store
        .set_webhook_config(WebhookConfigUpdate {
            url: Some(server.url("/stored").to_string()),
            username: Some("user".into()),
            password: Some("s3cret".into()),
            mode: Some(WebhookMode::Basic),
        })
        .await
        .unwrap();

    let config = store.get_webhook_config().await.unwrap();
    assert_eq!(config.password, "s3cret");
    let response = client().send(&store, config.mode, &config).await.unwrap();
    assert!(response.success);
}
