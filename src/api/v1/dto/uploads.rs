/*
 * Responsibility
 * - POST /uploads の response DTO
 * - 受理したファイルの内容は base64 で返す (保存はしない)
 */
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::Serialize;
use uuid::Uuid;

use crate::services::upload::UploadOutcome;

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    Accepted,
    Rejected,
}

#[derive(Debug, Serialize)]
pub struct RejectionBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub upload_id: Uuid,
    pub status: UploadStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_base64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<RejectionBody>,
}

impl UploadResponse {
    pub fn from_outcome(upload_id: Uuid, outcome: UploadOutcome) -> Self {
        match outcome {
            UploadOutcome::Accepted(file) => Self {
                upload_id,
                status: UploadStatus::Accepted,
                size: Some(file.content.len() as u64),
                content_base64: Some(STANDARD.encode(&file.content)),
                file_name: Some(file.name),
                rejection: None,
            },
            UploadOutcome::Rejected(rejection) => Self {
                upload_id,
                status: UploadStatus::Rejected,
                file_name: None,
                size: None,
                content_base64: None,
                rejection: Some(RejectionBody {
                    code: rejection.code(),
                    message: rejection.user_message(),
                }),
            },
        }
    }
}
