/*
 * Responsibility
 * - Handler から見える「現在のセッション」の型
 * - extractor がトークンを検証して組み立て、handler / view はこの型だけを受け取る
 *
 * Notes
 * - トークン検証ロジックは services/session 側の責務
 * - 未認証でもエラーにはしない (匿名レコードとして渡す)
 */
use chrono::{DateTime, Utc};

use crate::services::session::VerifiedSession;

/// Per-request snapshot of authentication state and profile fields.
///
/// Never stored; a new record is built for every request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionRecord {
    pub is_authenticated: bool,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub preferred_username: Option<String>,

    pub subject: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl SessionRecord {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Present, non-empty profile fields as `(label, value)` pairs,
    /// always in display-name, email, preferred-username order.
    pub fn profile_lines(&self) -> Vec<(&'static str, &str)> {
        [
            ("User name", self.display_name.as_deref()),
            ("Email", self.email.as_deref()),
            ("Preferred Username", self.preferred_username.as_deref()),
        ]
        .into_iter()
        .filter_map(|(label, value)| match value {
            Some(v) if !v.is_empty() => Some((label, v)),
            _ => None,
        })
        .collect()
    }
}

impl From<VerifiedSession> for SessionRecord {
    fn from(v: VerifiedSession) -> Self {
        Self {
            is_authenticated: true,
            display_name: v.name,
            email: v.email,
            preferred_username: v.preferred_username,
            subject: Some(v.subject),
            expires_at: v.expires_at,
        }
    }
}
