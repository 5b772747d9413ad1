use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::client::{AiClient, truncate};
use crate::error::AiError;

#[tokio::test]
async fn test_start_session_relays_json() {
    let server = MockServer::start().await;
    let body = json!({"gameId": "g1", "characterId": "c1"});

    Mock::given(method("POST"))
        .and(path("/api/session/start"))
        .and(body_json(&body))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"session_id": "remote-1", "status": "ready"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = AiClient::new(&server.uri()).unwrap();
    let result = client.start_session(&body).await.unwrap();
    assert_eq!(result["session_id"], "remote-1");
}

#[tokio::test]
async fn test_trailing_slash_in_base_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/session/start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = AiClient::new(&format!("{}/", server.uri())).unwrap();
    assert!(client.start_session(&json!({})).await.is_ok());
    assert!(!client.base_url().ends_with('/'));
}

#[tokio::test]
async fn test_upstream_error_status_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/session/start"))
        .respond_with(ResponseTemplate::new(503).set_body_string("model loading"))
        .expect(1)
        .mount(&server)
        .await;

    let client = AiClient::new(&server.uri()).unwrap();
    let err = client.start_session(&json!({})).await.unwrap_err();
    assert!(err.is_upstream_status());
    assert!(matches!(err, AiError::HttpStatus { code: 503, ref body } if body == "model loading"));
}

#[tokio::test]
async fn test_non_json_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/session/start"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = AiClient::new(&server.uri()).unwrap();
    let err = client.start_session(&json!({})).await.unwrap_err();
    assert!(matches!(err, AiError::JsonParse { .. }));
}

#[tokio::test]
async fn test_unreachable_server_is_request_error() {
    let client = AiClient::new("http://127.0.0.1:1").unwrap();
    let err = client.start_session(&json!({})).await.unwrap_err();
    assert!(matches!(err, AiError::HttpRequest(_)));
    assert!(!err.is_upstream_status());
}

#[test]
fn test_rejects_non_http_url() {
    assert!(matches!(AiClient::new("ftp://ai.local"), Err(AiError::InvalidUrl(_))));
    assert!(matches!(AiClient::new(""), Err(AiError::InvalidUrl(_))));
}

#[test]
fn test_truncate_respects_char_boundary() {
    assert_eq!(truncate("héllo", 2), "h");
    assert_eq!(truncate("short", 100), "short");
}
