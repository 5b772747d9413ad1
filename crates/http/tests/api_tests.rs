#![allow(clippy::unwrap_used, reason = "Test code")]
#![allow(clippy::indexing_slicing, reason = "Test code")]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use questline_core::AppConfig;
use questline_http::{AppState, create_router};
use questline_service::{Mailer, ServiceError};
use questline_storage::StorageBackend;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct CapturingMailer {
    codes: Mutex<Vec<String>>,
}

impl CapturingMailer {
    fn last_code(&self) -> Option<String> {
        self.codes.lock().ok()?.last().cloned()
    }
}

#[async_trait]
impl Mailer for CapturingMailer {
    async fn send_reset_code(&self, _email: &str, code: &str) -> Result<(), ServiceError> {
        if let Ok(mut codes) = self.codes.lock() {
            codes.push(code.to_owned());
        }
        Ok(())
    }
}

struct TestApp {
    router: Router,
    mailer: Arc<CapturingMailer>,
    _uploads: tempfile::TempDir,
}

fn test_app_with(configure: impl FnOnce(&mut AppConfig)) -> TestApp {
    let uploads = tempfile::tempdir().unwrap();
    let mut config = AppConfig {
        jwt_secret: "api-test-secret".to_owned(),
        upload_dir: uploads.path().to_path_buf(),
        ..AppConfig::default()
    };
    configure(&mut config);
    let mailer = Arc::new(CapturingMailer::default());
    let state = AppState::new(
        Arc::new(StorageBackend::new_memory()),
        &config,
        Arc::clone(&mailer) as Arc<dyn Mailer>,
    );
    TestApp { router: create_router(Arc::new(state)), mailer, _uploads: uploads }
}

fn test_app() -> TestApp {
    test_app_with(|_| {})
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, body)
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    send(router, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn json_request(router: &Router, verb: &str, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(verb)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(router, request).await
}

async fn post(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    json_request(router, "POST", uri, body).await
}

async fn start_session(router: &Router, session_id: &str) -> Value {
    let (status, body) = post(
        router,
        "/api/session/start",
        json!({"sessionId": session_id, "gameId": "g1", "userId": "u1", "characterId": "c1"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body
}

#[tokio::test]
async fn test_health_reports_backend() {
    let app = test_app();
    let (status, body) = get(&app.router, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["backend"], "memory");
}

#[tokio::test]
async fn test_start_end_and_restart_reactivates_session() {
    let app = test_app();
    let started = start_session(&app.router, "s1").await;
    assert_eq!(started["status"], "active");

    let (status, ended) = post(&app.router, "/api/session/end", json!({"sessionId": "s1"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ended["status"], "ended");
    assert!(!ended["ended_at"].is_null());

    let restarted = start_session(&app.router, "s1").await;
    assert_eq!(restarted["status"], "active");
    assert!(restarted["ended_at"].is_null());

    let (status, fetched) = get(&app.router, "/api/session/s1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["character_id"], "c1");
}

#[tokio::test]
async fn test_start_without_ids_is_rejected() {
    let app = test_app();
    let (status, body) = post(&app.router, "/api/session/start", json!({"gameId": "g1"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_end_unknown_session_is_not_found() {
    let app = test_app();
    let (status, _) = post(&app.router, "/api/session/end", json!({"sessionId": "ghost"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post(&app.router, "/api/session/end", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_role_is_rejected_and_not_stored() {
    let app = test_app();
    start_session(&app.router, "s1").await;

    let (status, _) = post(
        &app.router,
        "/api/messages",
        json!({"sessionId": "s1", "role": "npc", "content": "hello"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, messages) = get(&app.router, "/api/messages?sessionId=s1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(messages.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_messages_after_cursor() {
    let app = test_app();
    start_session(&app.router, "s1").await;

    let mut ids = Vec::new();
    for content in ["one", "two", "three"] {
        let (status, created) = post(
            &app.router,
            "/api/messages",
            json!({"sessionId": "s1", "role": "user", "content": content}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        ids.push(created["id"].as_i64().unwrap());
    }

    let uri = format!("/api/messages?sessionId=s1&afterId={}", ids[0]);
    let (status, messages) = get(&app.router, &uri).await;
    assert_eq!(status, StatusCode::OK);
    let contents: Vec<&str> =
        messages.as_array().unwrap().iter().map(|m| m["content"].as_str().unwrap()).collect();
    assert_eq!(contents, ["two", "three"]);

    let (status, _) = get(&app.router, "/api/messages?sessionId=ghost").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = get(&app.router, "/api/messages").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_input_is_json_bad_request() {
    let app = test_app();
    start_session(&app.router, "s1").await;

    let (status, body) = post(
        &app.router,
        "/api/messages",
        json!({"sessionId": "s1", "role": 5, "content": "hello"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = get(&app.router, "/api/messages?sessionId=s1&afterId=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = get(&app.router, "/api/games/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let request = Request::post("/api/session/start")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_known_character_can_start_in_another_game() {
    let app = test_app();
    start_session(&app.router, "s1").await;

    let (status, body) = post(
        &app.router,
        "/api/session/start",
        json!({"sessionId": "s2", "gameId": "g2", "userId": "u1", "characterId": "c1"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["game_id"], "g2");

    let (status, saved) = post(
        &app.router,
        "/api/conversations",
        json!({"gameId": "g3", "characterId": "c1", "userId": "u1", "messages": []}),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{saved}");
    assert_eq!(saved["game_id"], "g3");
}

#[tokio::test]
async fn test_progress_and_checkpoints() {
    let app = test_app();
    start_session(&app.router, "s1").await;

    let (status, _) = get(&app.router, "/api/session/s1/progress").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, progress) = json_request(
        &app.router,
        "PUT",
        "/api/session/s1/progress",
        json!({"chapter": "1", "scene": "tavern"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(progress["scene"], "tavern");

    let (status, _) =
        post(&app.router, "/api/session/s1/checkpoints", json!({"state": {"hp": 3}})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) =
        post(&app.router, "/api/session/s1/checkpoints", json!({"label": "gate"})).await;
    assert_eq!(status, StatusCode::OK);

    let (status, checkpoints) = get(&app.router, "/api/session/s1/checkpoints").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(checkpoints[0]["label"], "gate");

    let (status, _) = get(&app.router, "/api/session/ghost/checkpoints").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_conversation_save_get_delete() {
    let app = test_app();
    let (status, _) = post(
        &app.router,
        "/api/conversations",
        json!({"gameId": "g1", "characterId": "c1", "userId": "u1", "messages": "nope"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, saved) = post(
        &app.router,
        "/api/conversations",
        json!({
            "gameId": "g1",
            "characterId": "c1",
            "userId": "u1",
            "title": "Night watch",
            "messages": [{"role": "user", "content": "hi"}]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{saved}");
    assert_eq!(saved["title"], "Night watch");

    let (status, list) = get(&app.router, "/api/conversations?userId=u1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let delete = Request::delete("/api/conversations/g1/c1").body(Body::empty()).unwrap();
    let (status, _) = send(&app.router, delete).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get(&app.router, "/api/conversations/g1/c1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

async fn register_and_login(app: &TestApp) -> String {
    let (status, user) = post(
        &app.router,
        "/api/auth/register",
        json!({"username": "mira", "email": "mira@example.com", "password": "secret1"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{user}");
    assert!(user.get("password_hash").is_none());

    let (status, login) = post(
        &app.router,
        "/api/auth/login",
        json!({"account": "mira@example.com", "password": "secret1"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    login["token"].as_str().unwrap().to_owned()
}

fn bearer(request: axum::http::request::Builder, token: &str) -> axum::http::request::Builder {
    request.header(header::AUTHORIZATION, format!("Bearer {token}"))
}

#[tokio::test]
async fn test_register_login_and_me() {
    let app = test_app();
    let token = register_and_login(&app).await;

    let (status, _) = post(
        &app.router,
        "/api/auth/register",
        json!({"username": "mira", "email": "other@example.com", "password": "secret1"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) =
        post(&app.router, "/api/auth/login", json!({"account": "mira", "password": "wrong!"}))
            .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = get(&app.router, "/api/auth/me").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = bearer(Request::get("/api/auth/me"), &token).body(Body::empty()).unwrap();
    let (status, me) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "mira");

    let request = bearer(Request::get("/api/auth/me"), "not.a.token").body(Body::empty()).unwrap();
    let (status, _) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

fn multipart_avatar(token: &str, content_type: &str, bytes: &[u8]) -> Request<Body> {
    let boundary = "questline-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"avatar\"; filename=\"avatar.bin\"\r\n",
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    bearer(Request::post("/api/auth/avatar"), token)
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_avatar_upload_checks_image_content() {
    let app = test_app();
    let token = register_and_login(&app).await;

    let (status, _) = send(&app.router, multipart_avatar(&token, "text/plain", b"hello")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) =
        send(&app.router, multipart_avatar(&token, "image/png", b"plain text bytes")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let png = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
    let (status, user) = send(&app.router, multipart_avatar(&token, "image/png", png)).await;
    assert_eq!(status, StatusCode::OK, "{user}");
    let url = user["avatar_url"].as_str().unwrap();
    assert!(url.starts_with("/uploads/avatars/"), "{url}");
    assert!(url.ends_with(".png"));
}

#[tokio::test]
async fn test_password_reset_flow() {
    let app = test_app();
    register_and_login(&app).await;

    let (status, _) =
        post(&app.router, "/api/auth/forgot-password", json!({"email": "nobody@example.com"}))
            .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) =
        post(&app.router, "/api/auth/forgot-password", json!({"email": "Mira@Example.com"})).await;
    assert_eq!(status, StatusCode::OK);
    let code = app.mailer.last_code().unwrap();

    let (status, _) = post(
        &app.router,
        "/api/auth/verify-code",
        json!({"email": "mira@example.com", "code": "000000x"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = post(
        &app.router,
        "/api/auth/verify-code",
        json!({"email": "mira@example.com", "code": code}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = post(
        &app.router,
        "/api/auth/reset-password",
        json!({"email": "mira@example.com", "code": code, "newPassword": "fresh-pass"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = post(
        &app.router,
        "/api/auth/login",
        json!({"account": "mira", "password": "fresh-pass"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = post(
        &app.router,
        "/api/auth/reset-password",
        json!({"email": "mira@example.com", "code": code, "newPassword": "again-pass"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_legacy_catalog_routes() {
    let app = test_app();
    let (status, _) = post(&app.router, "/api/games", json!({"genre": "fantasy"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, game) =
        post(&app.router, "/api/games", json!({"title": "Ashen Keep", "genre": "fantasy"})).await;
    assert_eq!(status, StatusCode::CREATED);
    let game_id = game["id"].as_i64().unwrap();

    let (status, _) = post(
        &app.router,
        "/api/characters",
        json!({"userId": 1, "gameId": 9999, "name": "Tova"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, character) = post(
        &app.router,
        "/api/characters",
        json!({"userId": 1, "gameId": game_id, "name": "Tova", "class": "ranger"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let character_id = character["id"].as_i64().unwrap();

    let (status, listed) = get(&app.router, &format!("/api/characters?userId=1&gameId={game_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    for chapter in ["prologue", "chapter-2"] {
        let (status, _) = post(
            &app.router,
            "/api/progress",
            json!({"userId": 1, "gameId": game_id, "chapter": chapter}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, progress) =
        get(&app.router, &format!("/api/progress?userId=1&gameId={game_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(progress["chapter"], "chapter-2");

    let delete =
        Request::delete(format!("/api/characters/{character_id}")).body(Body::empty()).unwrap();
    let (status, _) = send(&app.router, delete).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get(&app.router, &format!("/api/characters/{character_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_dialogue_persists_into_known_session() {
    let app = test_app();
    start_session(&app.router, "s1").await;

    let (status, reply) =
        post(&app.router, "/api/ai/dialogue", json!({"message": "I open the door", "sessionId": "s1"}))
            .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["persisted"], true);

    let (_, messages) = get(&app.router, "/api/messages?sessionId=s1").await;
    let roles: Vec<&str> =
        messages.as_array().unwrap().iter().map(|m| m["role"].as_str().unwrap()).collect();
    assert_eq!(roles, ["user", "assistant"]);

    let (status, _) = post(&app.router, "/api/ai/dialogue", json!({"message": ""})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_image_and_scenario_placeholders() {
    let app = test_app();
    let (status, image) = post(&app.router, "/api/ai/image", json!({"prompt": "a red dragon"})).await;
    assert_eq!(status, StatusCode::OK);
    assert!(image["url"].as_str().unwrap().starts_with("https://"));

    let (status, _) = post(&app.router, "/api/ai/image", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = Request::post("/api/ai/scenario").body(Body::empty()).unwrap();
    let (status, scenario) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(scenario["opening"].is_string());
}

#[tokio::test]
async fn test_ai_start_without_server_is_unavailable() {
    let app = test_app();
    let (status, body) = post(&app.router, "/api/ai/start", json!({"gameId": "g1"})).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap().contains("AI server"));
}

#[tokio::test]
async fn test_ai_start_relays_upstream_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/session/start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sessionId": "remote-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let app = test_app_with(|config| config.ai_server_url = Some(uri));
    let (status, body) = post(&app.router, "/api/ai/start", json!({"gameId": "g1"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sessionId"], "remote-1");

    let (_, hints) = get(&app.router, "/api/ai/config?gameId=g1").await;
    assert_eq!(hints["namespace"], "/game/g1");
}

#[tokio::test]
async fn test_ai_start_upstream_failure_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/session/start"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let uri = server.uri();
    let app = test_app_with(|config| config.ai_server_url = Some(uri));
    let (status, _) = post(&app.router, "/api/ai/start", json!({})).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}
