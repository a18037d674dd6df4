/*
 * Responsibility
 * - GET / と POST /upload の handler
 * - セッションは extractor から明示的に受け取り、view::render に渡す
 * - 未認証の POST /upload はファイルを読まずに、ログインを促すページを返す
 */
use axum::{
    extract::{Multipart, State},
    response::Html,
};

use crate::{
    api::extractors::CurrentSession,
    error::AppError,
    services::upload::read_upload,
    state::AppState,
    web::view,
};

pub async fn index(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Html<String>, AppError> {
    let page = view::render(&session, None);
    Ok(Html(state.pages.to_html(&page, &state.auth)?))
}

pub async fn upload(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    mut multipart: Multipart,
) -> Result<Html<String>, AppError> {
    let outcome = if session.is_authenticated {
        read_upload(&mut multipart, &state.upload_policy).await?
    } else {
        tracing::info!("upload attempted without a session");
        None
    };

    let page = view::render(&session, outcome.as_ref());
    Ok(Html(state.pages.to_html(&page, &state.auth)?))
}
