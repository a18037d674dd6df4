/*
 * Responsibility
 * - GET /session の response DTO
 */
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::extractors::SessionRecord;

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub is_authenticated: bool,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub preferred_username: Option<String>,
    pub subject: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<SessionRecord> for SessionResponse {
    fn from(s: SessionRecord) -> Self {
        Self {
            is_authenticated: s.is_authenticated,
            display_name: s.display_name,
            email: s.email,
            preferred_username: s.preferred_username,
            subject: s.subject,
            expires_at: s.expires_at,
        }
    }
}
