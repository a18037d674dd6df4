/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health, /session, /uploads
 * - /uploads は axum の既定 body 上限を外す (上限は UploadPolicy が持つ)
 */
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::state::AppState;

use crate::api::v1::handlers::{health::health, session::current_session, uploads::upload_file};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/session", get(current_session))
        .route(
            "/uploads",
            post(upload_file).layer(DefaultBodyLimit::disable()),
        )
}
