use axum::extract::Multipart;
use tracing::{debug, info};

use super::policy::{UploadOutcome, UploadPolicy, UploadedFile};
use crate::error::AppError;

/// Name of the form part carrying the file.
pub const FILE_FIELD: &str = "file";

/// Pull the single file part out of a multipart body and validate it.
///
/// - `Ok(None)`: no file was submitted (no `file` part, or an empty file name).
/// - The extension is checked before any body chunk is read.
/// - Reading stops once the ceiling is exceeded.
pub async fn read_upload(
    multipart: &mut Multipart,
    policy: &UploadPolicy,
) -> Result<Option<UploadOutcome>, AppError> {
    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            debug!(field = ?field.name(), "skipping multipart field");
            continue;
        }

        let file_name = match field.file_name() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => return Ok(None),
        };

        if let Err(rejection) = policy.check_extension(&file_name) {
            info!(file_name = %file_name, "upload rejected: unsupported file type");
            return Ok(Some(UploadOutcome::Rejected(rejection)));
        }

        let mut content: Vec<u8> = Vec::new();
        while let Some(chunk) = field.chunk().await? {
            content.extend_from_slice(&chunk);
            if let Err(rejection) = policy.check_size(content.len() as u64) {
                info!(file_name = %file_name, limit = policy.max_bytes, "upload rejected: too large");
                return Ok(Some(UploadOutcome::Rejected(rejection)));
            }
        }

        info!(file_name = %file_name, size = content.len(), "upload accepted");
        return Ok(Some(UploadOutcome::Accepted(UploadedFile {
            name: file_name,
            content,
        })));
    }

    Ok(None)
}
