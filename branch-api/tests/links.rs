//! Integration tests for the deep-link operations.
//!
//! Every test runs the real client against the in-process mock server and
//! checks both what went over the wire and what the caller gets back.

mod common;

use std::time::{Duration, Instant};

use serde_json::json;
use tokio::task::JoinSet;

use branch_api::{CancellationToken, CustomData, DeepLinkApi, DeepLinkData, DeepLinkProperties};
use branch_core::error::BranchError;

use common::{object, MockBranch, TEST_KEY, TEST_SECRET};

fn sample_properties() -> DeepLinkProperties {
    DeepLinkProperties {
        channel: "email".into(),
        feature: "sharing".into(),
        campaign: "spring".into(),
        tags: vec!["promo".into(), "q2".into()],
        ..Default::default()
    }
}

fn sample_data() -> DeepLinkData {
    DeepLinkData {
        canonical_identifier: "content/123".into(),
        og_title: "Spring Sale".into(),
        ..Default::default()
    }
}

fn sample_custom() -> CustomData {
    object(json!({"$og_title": "Custom Title", "product_id": 42}))
}

// ---- create ----

#[tokio::test]
async fn create_link_returns_url() {
    let mock = MockBranch::start(200, r#"{"Url":"https://bnc.lt/abc123"}"#).await;
    let cancel = CancellationToken::new();

    let url = mock
        .client()
        .create_link(&cancel, &sample_properties(), &sample_data(), &sample_custom())
        .await
        .unwrap();

    assert_eq!(url, "https://bnc.lt/abc123");
}

#[tokio::test]
async fn create_link_sends_key_and_merged_data() {
    let mock = MockBranch::start(200, r#"{"url":"https://bnc.lt/abc123"}"#).await;
    let cancel = CancellationToken::new();

    mock.client()
        .create_link(&cancel, &sample_properties(), &sample_data(), &sample_custom())
        .await
        .unwrap();

    let req = mock.single_request();
    assert_eq!(req.method, "POST");
    assert_eq!(req.path, "/v1/url");
    assert!(req.query.is_empty());
    assert_eq!(req.content_type.as_deref(), Some("application/json"));

    let body = req.json();
    assert_eq!(
        body,
        json!({
            "channel": "email",
            "feature": "sharing",
            "campaign": "spring",
            "tags": ["promo", "q2"],
            "data": {
                "$canonical_identifier": "content/123",
                "$og_title": "Custom Title",
                "product_id": 42
            },
            "branch_key": TEST_KEY
        })
    );
    assert!(body.get("branch_secret").is_none());
}

#[tokio::test]
async fn create_link_rejects_unexpected_body() {
    let mock = MockBranch::start(200, r#"["not", "an", "object"]"#).await;
    let cancel = CancellationToken::new();

    let err = mock
        .client()
        .create_link(&cancel, &sample_properties(), &sample_data(), &CustomData::new())
        .await
        .unwrap_err();

    assert!(matches!(err, BranchError::Serialization(_)));
}

// ---- get ----

#[tokio::test]
async fn get_link_pretty_prints_with_tabs() {
    let mock = MockBranch::start(200, r#"{"a":1,"b":2}"#).await;
    let cancel = CancellationToken::new();

    let pretty = mock
        .client()
        .get_link(&cancel, "https://bnc.lt/abc123")
        .await
        .unwrap();

    assert_eq!(pretty, "{\n\t\"a\": 1,\n\t\"b\": 2\n}");
}

#[tokio::test]
async fn get_link_keeps_large_numbers_verbatim() {
    let mock = MockBranch::start(200, r#"{"id":123456789012345678901234,"f":1e2}"#).await;
    let cancel = CancellationToken::new();

    let pretty = mock
        .client()
        .get_link(&cancel, "https://bnc.lt/abc123")
        .await
        .unwrap();

    assert_eq!(pretty, "{\n\t\"id\": 123456789012345678901234,\n\t\"f\": 1e2\n}");
}

#[tokio::test]
async fn get_link_sends_key_and_url_in_query_without_body() {
    let mock = MockBranch::start(200, r#"{"data":{}}"#).await;
    let cancel = CancellationToken::new();

    mock.client()
        .get_link(&cancel, "https://bnc.lt/abc123")
        .await
        .unwrap();

    let req = mock.single_request();
    assert_eq!(req.method, "GET");
    assert_eq!(req.query.get("branch_key").map(String::as_str), Some(TEST_KEY));
    assert_eq!(
        req.query.get("url").map(String::as_str),
        Some("https://bnc.lt/abc123")
    );
    assert!(req.body.is_empty());
    assert_eq!(req.content_type.as_deref(), Some("application/json"));
}

#[tokio::test]
async fn get_link_rejects_non_json_body() {
    let mock = MockBranch::start(200, "definitely not json").await;
    let cancel = CancellationToken::new();

    let err = mock
        .client()
        .get_link(&cancel, "https://bnc.lt/abc123")
        .await
        .unwrap_err();

    assert!(matches!(err, BranchError::Serialization(_)));
}

// ---- update ----

#[tokio::test]
async fn update_link_sends_secret_in_body_and_url_in_query() {
    let mock = MockBranch::start(200, r#"{"url":"https://bnc.lt/abc123","campaign":"summer"}"#).await;
    let cancel = CancellationToken::new();
    let properties = DeepLinkProperties {
        campaign: "summer".into(),
        ..Default::default()
    };

    let pretty = mock
        .client()
        .update_link(
            &cancel,
            "https://bnc.lt/abc123",
            &properties,
            &DeepLinkData::default(),
            &object(json!({"ref": "update"})),
        )
        .await
        .unwrap();

    assert_eq!(
        pretty,
        "{\n\t\"url\": \"https://bnc.lt/abc123\",\n\t\"campaign\": \"summer\"\n}"
    );

    let req = mock.single_request();
    assert_eq!(req.method, "PUT");
    assert_eq!(req.path, "/v1/url");
    assert_eq!(req.query.len(), 1);
    assert_eq!(
        req.query.get("url").map(String::as_str),
        Some("https://bnc.lt/abc123")
    );
    assert_eq!(
        req.json(),
        json!({
            "campaign": "summer",
            "data": {"ref": "update"},
            "branch_key": TEST_KEY,
            "branch_secret": TEST_SECRET
        })
    );
}

// ---- errors ----

#[tokio::test]
async fn every_operation_reports_provider_errors() {
    let mock = MockBranch::start(404, r#"{"message":"not found","code":404}"#).await;
    let client = mock.client();
    let cancel = CancellationToken::new();
    let link = "https://bnc.lt/missing";

    let errors = vec![
        client
            .create_link(&cancel, &sample_properties(), &sample_data(), &sample_custom())
            .await
            .unwrap_err(),
        client.get_link(&cancel, link).await.unwrap_err(),
        client
            .update_link(&cancel, link, &sample_properties(), &sample_data(), &sample_custom())
            .await
            .unwrap_err(),
    ];

    for err in errors {
        let text = err.to_string();
        assert!(text.contains("404"), "missing status in {text}");
        assert!(text.contains("not found"), "missing message in {text}");
        assert_eq!(err.status(), Some(404));
    }
}

#[tokio::test]
async fn error_body_without_code_keeps_message() {
    let mock = MockBranch::start(429, r#"{"message":"rate limited"}"#).await;
    let cancel = CancellationToken::new();

    let err = mock
        .client()
        .create_link(&cancel, &sample_properties(), &sample_data(), &sample_custom())
        .await
        .unwrap_err();

    match err {
        BranchError::ServerError { status, code, message } => {
            assert_eq!(status, 429);
            assert_eq!(code, 0);
            assert_eq!(message, "rate limited");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn unparseable_error_body_is_reported_separately() {
    let mock = MockBranch::start(500, "<html>oops</html>").await;
    let cancel = CancellationToken::new();

    let err = mock
        .client()
        .get_link(&cancel, "https://bnc.lt/abc123")
        .await
        .unwrap_err();

    assert!(matches!(err, BranchError::ErrorBody { status: 500, .. }));
}

#[tokio::test]
async fn non_200_success_status_is_an_error() {
    let mock = MockBranch::start(201, r#"{"message":"created elsewhere","code":201}"#).await;
    let cancel = CancellationToken::new();

    let err = mock
        .client()
        .create_link(&cancel, &sample_properties(), &sample_data(), &sample_custom())
        .await
        .unwrap_err();

    assert!(matches!(err, BranchError::ServerError { status: 201, .. }));
}

#[tokio::test]
async fn connection_failure_is_a_transport_error() {
    let client = common::unreachable_client().await;
    let cancel = CancellationToken::new();

    let err = client
        .get_link(&cancel, "https://bnc.lt/abc123")
        .await
        .unwrap_err();

    assert!(matches!(err, BranchError::Http(_)));
}

// ---- cancellation ----

#[tokio::test]
async fn cancelled_token_short_circuits_every_operation() {
    let mock = MockBranch::start(200, r#"{"url":"https://bnc.lt/abc123"}"#).await;
    let client = mock.client();
    let cancel = CancellationToken::new();
    cancel.cancel();
    let link = "https://bnc.lt/abc123";

    let results = vec![
        client
            .create_link(&cancel, &sample_properties(), &sample_data(), &sample_custom())
            .await,
        client.get_link(&cancel, link).await,
        client
            .update_link(&cancel, link, &sample_properties(), &sample_data(), &sample_custom())
            .await,
    ];

    for result in results {
        assert!(result.unwrap_err().is_cancelled());
    }
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn cancelling_mid_flight_returns_promptly() {
    let mock = MockBranch::start_with_delay(200, r#"{"a":1}"#, Duration::from_secs(30)).await;
    let client = mock.client();
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let start = Instant::now();
    let err = client
        .get_link(&cancel, "https://bnc.lt/abc123")
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
    assert!(start.elapsed() < Duration::from_secs(10));
}

// ---- sharing ----

#[tokio::test]
async fn clones_share_one_client_across_tasks() {
    let mock = MockBranch::start(200, r#"{"url":"https://bnc.lt/shared"}"#).await;
    let client = mock.client();
    let cancel = CancellationToken::new();

    let mut tasks = JoinSet::new();
    for i in 0..8 {
        let client = client.clone();
        let cancel = cancel.clone();
        tasks.spawn(async move {
            let custom = object(json!({"n": i}));
            client
                .create_link(&cancel, &DeepLinkProperties::default(), &DeepLinkData::default(), &custom)
                .await
        });
    }

    while let Some(joined) = tasks.join_next().await {
        assert_eq!(joined.unwrap().unwrap(), "https://bnc.lt/shared");
    }
    assert_eq!(mock.requests().len(), 8);
}

#[tokio::test]
async fn works_through_the_trait_object() {
    let mock = MockBranch::start(200, r#"{"a":1}"#).await;
    let api: Box<dyn DeepLinkApi> = Box::new(mock.client());
    let cancel = CancellationToken::new();

    let pretty = api.get_link(&cancel, "https://bnc.lt/abc123").await.unwrap();
    assert_eq!(pretty, "{\n\t\"a\": 1\n}");
}
