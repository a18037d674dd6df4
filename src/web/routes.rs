/*
 * Responsibility
 * - ページ側の URL 構造を定義 (/, /upload, /auth/login, /auth/logout)
 * - アップロードだけは axum の既定 body 上限を外す (上限は UploadPolicy が持つ)
 */
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::state::AppState;
use crate::web::{
    auth::{login, logout},
    handlers::{index, upload},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/upload", post(upload).layer(DefaultBodyLimit::disable()))
        .route("/auth/login", get(login))
        .route("/auth/logout", get(logout))
}
