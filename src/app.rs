/*
 * Responsibility
 * - tracing 初期化 / panic hook
 * - Config読み込み → 依存生成 → Router 組み立て
 * - Middleware の適用 (CORS / request-id / trace / security headers)
 * - axum::serve() で起動
 */
use std::{panic, process, time::Duration};

use anyhow::Result;
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{api, config::Config, middleware, state::AppState, web};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,login_upload=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development: crash the whole process so we notice immediately.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting in {:?} mode on {} (upload limit {} bytes, allowed {:?})",
        config.app_env,
        config.addr,
        config.upload_policy.max_bytes,
        config.upload_policy.allowed_extensions()
    );

    let state = AppState::new(&config)?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub(crate) fn build_router(state: AppState, config: &Config) -> Router {
    let api_v1 = middleware::cors::apply(api::v1::routes(), config);

    let router = Router::new()
        .merge(web::routes())
        .nest("/api/v1", api_v1)
        .with_state(state);

    let router = middleware::security_headers::apply(router);
    middleware::http::apply(router, Duration::from_secs(config.http_timeout_seconds))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
        response::Response,
    };
    use tower::ServiceExt;

    use super::build_router;
    use crate::services::session::verifier::test_keys;
    use crate::state::{AppState, test_support};

    const BOUNDARY: &str = "login-upload-test-boundary";

    fn router_with(overrides: &[(&'static str, &str)]) -> axum::Router {
        let config = test_support::config_with(overrides);
        let state = AppState::new(&config).unwrap();
        build_router(state, &config)
    }

    fn router() -> axum::Router {
        router_with(&[])
    }

    fn session_cookie() -> String {
        let mut claims = test_keys::claims("user-1", 600);
        claims["name"] = "Ada Lovelace".into();
        claims["email"] = "ada@contoso.example".into();
        format!("session={}", test_keys::sign(&claims))
    }

    fn multipart_body(file_name: &str, content: &[u8]) -> Vec<u8> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload_request(uri: &str, cookie: Option<&str>, body: Vec<u8>) -> Request<Body> {
        let mut builder = Request::builder().method("POST").uri(uri).header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body)).unwrap()
    }

    fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn anonymous_page_has_no_upload_form() {
        let response = router().oneshot(get("/", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");

        let html = body_text(response).await;
        assert!(html.contains("No user data available"));
        assert!(html.contains("Please log in to upload files."));
        assert!(!html.contains(r#"name="file""#));
    }

    #[tokio::test]
    async fn signed_in_page_shows_profile_and_form() {
        let cookie = session_cookie();

        let response = router().oneshot(get("/", Some(&cookie))).await.unwrap();
        let html = body_text(response).await;

        assert!(html.contains("User name: Ada Lovelace"));
        assert!(html.contains("Email: ada@contoso.example"));
        assert!(!html.contains("Preferred Username"));
        assert!(html.contains("You are logged in, you can upload files."));
        assert!(html.contains(r#"name="file""#));
    }

    #[tokio::test]
    async fn expired_session_is_treated_as_logged_out() {
        let cookie = format!(
            "session={}",
            test_keys::sign(&test_keys::claims("user-1", -600))
        );

        let response = router().oneshot(get("/", Some(&cookie))).await.unwrap();
        let html = body_text(response).await;

        assert!(html.contains("Please log in to upload files."));
        assert!(!html.contains(r#"name="file""#));
    }

    #[tokio::test]
    async fn accepted_upload_is_echoed_on_page() {
        let cookie = session_cookie();
        let request = upload_request(
            "/upload",
            Some(&cookie),
            multipart_body("report.PDF", b"0123456789"),
        );

        let response = router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.contains("Uploaded file content: b"));
        assert!(html.contains("0123456789"));
    }

    #[tokio::test]
    async fn unsupported_upload_is_rejected_on_page() {
        let cookie = session_cookie();
        let request = upload_request(
            "/upload",
            Some(&cookie),
            multipart_body("archive.zip", b"PK\x03\x04 secret"),
        );

        let html = body_text(router().oneshot(request).await.unwrap()).await;

        assert!(html.contains("Unsupported file type!"));
        assert!(!html.contains("secret"));
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected_on_page() {
        let router = router_with(&[("UPLOAD_MAX_BYTES", "1024")]);
        let cookie = session_cookie();

        let at_limit = upload_request(
            "/upload",
            Some(&cookie),
            multipart_body("big.csv", &[b'a'; 1024]),
        );
        let html = body_text(router.clone().oneshot(at_limit).await.unwrap()).await;
        assert!(html.contains("Uploaded file content"));

        let over = upload_request(
            "/upload",
            Some(&cookie),
            multipart_body("big.csv", &[b'a'; 1025]),
        );
        let html = body_text(router.oneshot(over).await.unwrap()).await;
        assert!(html.contains("File too large!"));
        assert!(!html.contains("Uploaded file content"));
    }

    #[tokio::test]
    async fn anonymous_upload_is_ignored() {
        let request = upload_request("/upload", None, multipart_body("notes.txt", b"hello"));

        let html = body_text(router().oneshot(request).await.unwrap()).await;

        assert!(html.contains("Please log in to upload files."));
        assert!(!html.contains("hello"));
    }

    #[tokio::test]
    async fn api_upload_requires_session() {
        let request = upload_request(
            "/api/v1/uploads",
            None,
            multipart_body("notes.txt", b"hello"),
        );

        let response = router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn api_upload_returns_outcome() {
        let cookie = session_cookie();
        let request = upload_request(
            "/api/v1/uploads",
            Some(&cookie),
            multipart_body("notes.TXT", b"hello"),
        );

        let response = router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["status"], "accepted");
        assert_eq!(json["file_name"], "notes.TXT");
        assert_eq!(json["size"], 5);
        assert_eq!(json["content_base64"], "aGVsbG8=");
    }

    #[tokio::test]
    async fn api_upload_reports_rejection() {
        let cookie = session_cookie();
        let request = upload_request(
            "/api/v1/uploads",
            Some(&cookie),
            multipart_body("tool.exe", b""),
        );

        let response = router().oneshot(request).await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();

        assert_eq!(json["status"], "rejected");
        assert_eq!(json["rejection"]["code"], "UNSUPPORTED_FILE_TYPE");
        assert!(json.get("content_base64").is_none());
    }

    #[tokio::test]
    async fn api_upload_without_file_is_bad_request() {
        let cookie = session_cookie();
        let body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nhi\r\n--{BOUNDARY}--\r\n"
        );
        let request = upload_request("/api/v1/uploads", Some(&cookie), body.into_bytes());

        let response = router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["error"]["code"], "FILE_REQUIRED");
    }

    #[tokio::test]
    async fn api_session_reflects_bearer_token() {
        let token = test_keys::sign(&test_keys::claims("user-7", 600));
        let request = Request::builder()
            .uri("/api/v1/session")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();

        let response = router().oneshot(request).await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();

        assert_eq!(json["is_authenticated"], true);
        assert_eq!(json["subject"], "user-7");
        assert!(json["display_name"].is_null());
    }

    #[tokio::test]
    async fn login_redirects_to_provider() {
        let response = router().oneshot(get("/auth/login", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[header::LOCATION],
            "https://login.example.com/authorize?provider=microsoft"
        );
    }

    #[tokio::test]
    async fn logout_clears_cookie_and_redirects() {
        let router = router_with(&[("AUTH_LOGOUT_URL", "https://login.example.com/logout")]);

        let response = router.oneshot(get("/auth/logout", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[header::LOCATION],
            "https://login.example.com/logout"
        );
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("session=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn health_is_ok() {
        let response = router().oneshot(get("/api/v1/health", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, r#"{"status":"ok"}"#);
    }
}
