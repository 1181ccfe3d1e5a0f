//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`. Middleware: CORS for the configured
//! frontend origins, request tracing, and a body limit on photo uploads.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, ORIGIN};
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post, put};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([ORIGIN, CONTENT_TYPE, ACCEPT, AUTHORIZATION])
        .allow_credentials(true)
}

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.allowed_origins);

    let api_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        // Accounts
        .route("/auth/register", post(handlers::auth::register))
        .route(
            "/auth/confirm",
            get(handlers::auth::confirm_email).post(handlers::auth::confirm_email),
        )
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/forgot-password", post(handlers::auth::forgot_password))
        .route("/auth/reset-password", post(handlers::auth::reset_password))
        .route("/me", get(handlers::account::me))
        .route(
            "/profile",
            put(handlers::account::update_profile).delete(handlers::account::delete_profile),
        )
        .route("/change-password", put(handlers::account::change_password))
        // Records
        .route(
            "/people",
            get(handlers::people::list_people).post(handlers::people::create_person),
        )
        .route(
            "/memories",
            get(handlers::memories::list_memories).post(handlers::memories::create_memory),
        )
        .route(
            "/upload-photo",
            post(handlers::photos::upload_photo)
                .layer(DefaultBodyLimit::max(state.max_upload_bytes)),
        )
        .route("/photos/{id}", get(handlers::photos::get_photo))
        // Chat
        .route("/chat", post(handlers::chat::chat))
        .route("/chat/history", get(handlers::chat::chat_history));

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tempfile::TempDir;
    use tower::ServiceExt;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use luma_core::repository::user::UserRepository;
    use luma_core::service::hash::OneTimeTokens;
    use luma_infra::crypto::hash::Sha256OneTimeTokens;
    use luma_infra::sqlite::pool::{DatabasePool, default_database_url};
    use luma_infra::sqlite::user::SqliteUserRepository;
    use luma_types::config::AppConfig;

    const PASSWORD: &str = "correct-horse-1";

    struct TestApp {
        router: Router,
        state: AppState,
        _dir: TempDir,
    }

    async fn test_app_with(upstream: Option<&MockServer>, max_upload_bytes: usize) -> TestApp {
        let dir = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.auth.jwt_secret = Some("router-test-secret".to_string());
        config.storage.max_upload_bytes = max_upload_bytes;
        if let Some(server) = upstream {
            config.anthropic.api_key = Some("test-key".to_string());
            config.anthropic.api_url = Some(format!("{}/v1/messages", server.uri()));
        }

        let pool = DatabasePool::new(&default_database_url(dir.path()))
            .await
            .unwrap();
        let state = AppState::from_parts(dir.path().to_path_buf(), &config, pool).unwrap();
        TestApp {
            router: build_router(state.clone()),
            state,
            _dir: dir,
        }
    }

    async fn test_app(upstream: Option<&MockServer>) -> TestApp {
        test_app_with(upstream, 10 * 1024 * 1024).await
    }

    impl TestApp {
        async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
            let resp = self.router.clone().oneshot(req).await.unwrap();
            let status = resp.status();
            let bytes = resp.into_body().collect().await.unwrap().to_bytes();
            let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            (status, body)
        }

        async fn json(
            &self,
            method: &str,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                builder = builder.header("authorization", format!("Bearer {token}"));
            }
            let req = match body {
                Some(body) => builder
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };
            self.send(req).await
        }

        async fn register(&self, email: &str) -> (StatusCode, Value) {
            self.json(
                "POST",
                "/api/v1/auth/register",
                None,
                Some(json!({"email": email, "password": PASSWORD, "displayName": "Ada"})),
            )
            .await
        }

        /// Give `email` a known confirmation token.
        async fn plant_confirmation_token(&self, email: &str, token: &str) {
            let repo = SqliteUserRepository::new(self.state.db_pool.clone());
            let mut user = repo.get_by_email(email).await.unwrap().unwrap();
            user.confirmation_token_hash = Some(Sha256OneTimeTokens::new().digest(token));
            repo.update(&user).await.unwrap();
        }

        async fn signed_in(&self, email: &str) -> String {
            let (status, _) = self.register(email).await;
            assert_eq!(status, StatusCode::CREATED);
            self.plant_confirmation_token(email, "confirm-me").await;
            let (status, _) = self
                .json("POST", "/api/v1/auth/confirm?token=confirm-me", None, None)
                .await;
            assert_eq!(status, StatusCode::OK);

            let (status, body) = self
                .json(
                    "POST",
                    "/api/v1/auth/login",
                    None,
                    Some(json!({"email": email, "password": PASSWORD})),
                )
                .await;
            assert_eq!(status, StatusCode::OK);
            body["token"].as_str().unwrap().to_string()
        }
    }

    fn multipart_upload(token: &str, filename: &str, bytes: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--XBOUNDARY\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n--XBOUNDARY--\r\n");

        Request::builder()
            .method("POST")
            .uri("/api/v1/upload-photo")
            .header("authorization", format!("Bearer {token}"))
            .header("content-type", "multipart/form-data; boundary=XBOUNDARY")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app(None).await;
        let (status, body) = app.json("GET", "/api/v1/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_register_confirm_login_flow() {
        let app = test_app(None).await;

        let (status, body) = app.register("Ada@Example.com").await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["user"]["email"], "ada@example.com");
        assert_eq!(body["user"]["displayName"], "Ada");
        assert!(body["user"].get("passwordHash").is_none());

        let (status, body) = app.register("ada@example.com").await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "User with this email already exists");

        let login = json!({"email": "ada@example.com", "password": PASSWORD});
        let (status, body) = app
            .json("POST", "/api/v1/auth/login", None, Some(login.clone()))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Please confirm your email before logging in.");

        let (status, body) = app.json("GET", "/api/v1/auth/confirm", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Token is required");

        app.plant_confirmation_token("ada@example.com", "known-token").await;
        let (status, body) = app
            .json("GET", "/api/v1/auth/confirm?token=known-token", None, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Email confirmed successfully. You can now log in.");

        // Single use.
        let (status, _) = app
            .json("GET", "/api/v1/auth/confirm?token=known-token", None, None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = app
            .json(
                "POST",
                "/api/v1/auth/login",
                None,
                Some(json!({"email": "ada@example.com", "password": "wrong-password"})),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid email or password");

        let (status, body) = app.json("POST", "/api/v1/auth/login", None, Some(login)).await;
        assert_eq!(status, StatusCode::OK);
        let token = body["token"].as_str().unwrap();

        let (status, body) = app.json("GET", "/api/v1/me", Some(token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "ada@example.com");
    }

    #[tokio::test]
    async fn test_forgot_password_does_not_reveal_accounts() {
        let app = test_app(None).await;
        let (status, body) = app
            .json(
                "POST",
                "/api/v1/auth/forgot-password",
                None,
                Some(json!({"email": "nobody@example.com"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "If the email exists, a reset link has been sent.");

        let (status, body) = app
            .json(
                "POST",
                "/api/v1/auth/reset-password",
                None,
                Some(json!({"token": "bogus", "password": "another-password"})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid or expired token");
    }

    #[tokio::test]
    async fn test_bearer_errors() {
        let app = test_app(None).await;

        let (status, body) = app.json("GET", "/api/v1/people", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Authorization header required");

        let req = Request::builder()
            .uri("/api/v1/people")
            .header("authorization", "Token abc")
            .body(Body::empty())
            .unwrap();
        let (status, body) = app.send(req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid authorization header format");

        let (status, body) = app.json("GET", "/api/v1/people", Some("not.a.jwt"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid token");
    }

    #[tokio::test]
    async fn test_malformed_json_body_uses_error_shape() {
        let app = test_app(None).await;
        let req = Request::builder()
            .method("POST")
            .uri("/api/v1/auth/login")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = app.send(req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_BODY");
    }

    #[tokio::test]
    async fn test_account_management() {
        let app = test_app(None).await;
        let token = app.signed_in("ada@example.com").await;

        let (status, body) = app
            .json("PUT", "/api/v1/profile", Some(&token), Some(json!({"displayName": "Ada L."})))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["displayName"], "Ada L.");

        let (status, body) = app
            .json(
                "PUT",
                "/api/v1/change-password",
                Some(&token),
                Some(json!({"currentPassword": "nope-nope", "newPassword": "fresh-password-2"})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Current password is incorrect");

        let (status, _) = app
            .json(
                "PUT",
                "/api/v1/change-password",
                Some(&token),
                Some(json!({"currentPassword": PASSWORD, "newPassword": "fresh-password-2"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = app.json("DELETE", "/api/v1/profile", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Account deleted successfully");

        let (status, _) = app.json("GET", "/api/v1/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_people_and_memories() {
        let app = test_app(None).await;
        let token = app.signed_in("ada@example.com").await;

        let (status, body) = app
            .json(
                "POST",
                "/api/v1/people",
                Some(&token),
                Some(json!({
                    "firstName": "Mary",
                    "lastName": "Smith",
                    "email": "mary@example.com",
                    "phone": "555-0100",
                    "relationship": "daughter",
                    "notes": "Visits on Sundays"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let mary_id = body["id"].as_str().unwrap().to_string();
        assert!(body.get("photoUrl").is_none());

        let (status, body) = app
            .json(
                "POST",
                "/api/v1/memories",
                Some(&token),
                Some(json!({
                    "title": "Wedding",
                    "type": "event",
                    "content": "A sunny day",
                    "peopleIds": [mary_id]
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["memory"]["type"], "event");
        assert_eq!(body["memory"]["people"][0]["firstName"], "Mary");

        let (status, body) = app
            .json(
                "POST",
                "/api/v1/memories",
                Some(&token),
                Some(json!({
                    "title": "Ghost",
                    "type": "event",
                    "content": "x",
                    "peopleIds": [uuid::Uuid::now_v7()]
                })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "One or more people not found or not owned by user");

        // Another account sees none of it.
        let other = app.signed_in("bob@example.com").await;
        let (_, body) = app.json("GET", "/api/v1/memories", Some(&other), None).await;
        assert_eq!(body["memories"], json!([]));

        let (_, body) = app.json("GET", "/api/v1/people", Some(&token), None).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        let (_, body) = app.json("GET", "/api/v1/memories", Some(&token), None).await;
        assert_eq!(body["memories"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_photo_upload_and_fetch() {
        let app = test_app(None).await;
        let token = app.signed_in("ada@example.com").await;

        let (status, body) = app.send(multipart_upload(&token, "beach.png", b"png-bytes")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Photo uploaded successfully");
        let id = body["id"].as_str().unwrap().to_string();
        assert_eq!(body["key"], format!("photos/{id}.png"));

        let req = Request::builder()
            .uri(format!("/api/v1/photos/{id}"))
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let resp = app.router.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-type"], "image/png");
        assert_eq!(resp.headers()["cache-control"], "private, max-age=3600");
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"png-bytes");

        let other = app.signed_in("bob@example.com").await;
        let (status, body) = app
            .json("GET", &format!("/api/v1/photos/{id}"), Some(&other), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Photo not found or not owned by user");

        let (status, body) = app
            .json("GET", "/api/v1/photos/not-a-uuid", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid photo ID format");

        // A person can point at the uploaded photo and gets a URL for it.
        let (status, body) = app
            .json(
                "POST",
                "/api/v1/people",
                Some(&token),
                Some(json!({
                    "firstName": "Tom",
                    "lastName": "Smith",
                    "email": "tom@example.com",
                    "phone": "555-0101",
                    "relationship": "son",
                    "photoId": id
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["photoId"], id);
        assert!(body["photoUrl"].as_str().unwrap().ends_with(&format!("/api/v1/photos/{id}")));
    }

    #[tokio::test]
    async fn test_upload_over_limit_rejected() {
        let app = test_app_with(None, 1024).await;
        let token = app.signed_in("ada@example.com").await;

        let (status, _) = app
            .send(multipart_upload(&token, "big.png", &vec![7u8; 4096]))
            .await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_chat_single_shot() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(body_partial_json(json!({"stream": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "msg_01",
                "model": "claude-3-5-sonnet-20241022",
                "content": [{"type": "text", "text": "Mary is your daughter."}],
                "usage": {"input_tokens": 10, "output_tokens": 5}
            })))
            .mount(&server)
            .await;

        let app = test_app(Some(&server)).await;
        let token = app.signed_in("ada@example.com").await;

        let (status, body) = app
            .json("POST", "/api/v1/chat", Some(&token), Some(json!({"message": "Who is Mary?"})))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Mary is your daughter.");

        let (status, body) = app
            .json("POST", "/api/v1/chat", Some(&token), Some(json!({"message": "  "})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (_, body) = app.json("GET", "/api/v1/chat/history", Some(&token), None).await;
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[1]["content"], "Mary is your daughter.");
    }

    #[tokio::test]
    async fn test_chat_upstream_failure_is_bad_gateway() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let app = test_app(Some(&server)).await;
        let token = app.signed_in("ada@example.com").await;
        let (status, body) = app
            .json("POST", "/api/v1/chat", Some(&token), Some(json!({"message": "hello"})))
            .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "Failed to generate response");
    }

    #[tokio::test]
    async fn test_chat_unconfigured() {
        let app = test_app(None).await;
        let token = app.signed_in("ada@example.com").await;

        let (status, body) = app
            .json("POST", "/api/v1/chat", Some(&token), Some(json!({"message": "hello"})))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["message"].as_str().unwrap().contains("not configured"));

        let (status, body) = app
            .json(
                "POST",
                "/api/v1/chat?stream=true",
                Some(&token),
                Some(json!({"message": "hello"})),
            )
            .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Streaming not configured");
    }

    #[tokio::test]
    async fn test_chat_stream_relays_fragments() {
        let server = MockServer::start().await;
        let sse_body = concat!(
            "event: content_block_delta\n",
            "data: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\"Hi\"}}\n",
            "\n",
            "data: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\" there\\nfriend\"}}\n",
            "\n",
            "data: [DONE]\n",
        );
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(body_partial_json(json!({"stream": true})))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(sse_body),
            )
            .mount(&server)
            .await;

        let app = test_app(Some(&server)).await;
        let token = app.signed_in("ada@example.com").await;

        let req = Request::builder()
            .method("POST")
            .uri("/api/v1/chat?stream=true")
            .header("authorization", format!("Bearer {token}"))
            .header("content-type", "application/json")
            .body(Body::from(json!({"message": "hello"}).to_string()))
            .unwrap();
        let resp = app.router.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-type"], "text/event-stream");
        assert_eq!(resp.headers()["cache-control"], "no-cache");

        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("data: Hi\n\n"), "{text}");
        assert!(text.contains("data:  there\\nfriend\n\n"), "{text}");

        let (_, body) = app
            .json("GET", "/api/v1/chat/history?limit=1", Some(&token), None)
            .await;
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "assistant");
        assert_eq!(messages[0]["content"], "Hi there\nfriend");
    }

    #[tokio::test]
    async fn test_chat_stream_upstream_status_fails_before_streaming() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(body_partial_json(json!({"stream": true})))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let app = test_app(Some(&server)).await;
        let token = app.signed_in("ada@example.com").await;

        let req = Request::builder()
            .method("POST")
            .uri("/api/v1/chat?stream=true")
            .header("authorization", format!("Bearer {token}"))
            .header("content-type", "application/json")
            .body(Body::from(json!({"message": "hello"}).to_string()))
            .unwrap();
        let resp = app.router.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let content_type = resp.headers()["content-type"].to_str().unwrap().to_string();
        assert!(content_type.starts_with("application/json"), "{content_type}");

        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Failed to generate response");

        let (status, body) = app
            .json("GET", "/api/v1/chat/history", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["messages"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_history_rejects_bad_limit() {
        let app = test_app(None).await;
        let token = app.signed_in("ada@example.com").await;
        for limit in ["0", "-1", "abc"] {
            let (status, body) = app
                .json("GET", &format!("/api/v1/chat/history?limit={limit}"), Some(&token), None)
                .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "Invalid limit parameter");
        }
    }

    #[tokio::test]
    async fn test_cors_preflight_allows_frontend() {
        let app = test_app(None).await;
        let req = Request::builder()
            .method("OPTIONS")
            .uri("/api/v1/people")
            .header("origin", "http://localhost:3000")
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap();
        let resp = app.router.clone().oneshot(req).await.unwrap();
        assert_eq!(
            resp.headers()["access-control-allow-origin"],
            "http://localhost:3000"
        );
        assert_eq!(resp.headers()["access-control-allow-credentials"], "true");
    }
}
