/*
 * Responsibility
 * - GET /session: 現在のセッションを JSON で返す (未認証でも 200)
 */
use axum::Json;

use crate::api::{extractors::CurrentSession, v1::dto::session::SessionResponse};

pub async fn current_session(CurrentSession(session): CurrentSession) -> Json<SessionResponse> {
    Json(session.into())
}
