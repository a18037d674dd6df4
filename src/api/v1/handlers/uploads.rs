/*
 * Responsibility
 * - POST /uploads (multipart, part 名は "file")
 * - 認証必須: 未認証は 401 (body は読まない)
 * - 検証結果は 200 で返す (拒否も正常系)
 */
use axum::{
    Json,
    extract::{Multipart, State},
};
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    api::{extractors::CurrentSession, v1::dto::uploads::UploadResponse},
    error::AppError,
    services::upload::{read_upload, reader::FILE_FIELD},
    state::AppState,
};

pub async fn upload_file(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    if !session.is_authenticated {
        return Err(AppError::Unauthorized);
    }

    let upload_id = Uuid::new_v4();
    let span = tracing::info_span!(
        "upload",
        %upload_id,
        subject = session.subject.as_deref().unwrap_or_default()
    );

    let outcome = read_upload(&mut multipart, &state.upload_policy)
        .instrument(span)
        .await?
        .ok_or_else(|| {
            AppError::bad_request(
                "FILE_REQUIRED",
                format!("multipart part '{FILE_FIELD}' with a file name is required"),
            )
        })?;

    Ok(Json(UploadResponse::from_outcome(upload_id, outcome)))
}
