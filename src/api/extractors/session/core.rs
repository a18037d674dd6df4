use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, header, request::Parts};

use crate::state::AppState;

use super::SessionRecord;

/// Handler で、現在のセッションを受け取るための extractor
///
/// トークンが無い・検証に失敗した場合は匿名セッションになる（reject しない）。
/// 認証必須かどうかは handler 側で `is_authenticated` を見て決める。
pub struct CurrentSession(pub SessionRecord);

impl FromRequestParts<AppState> for CurrentSession
where
    AppState: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(&parts.headers, &state.session_cookie_name) else {
            return Ok(Self(SessionRecord::anonymous()));
        };

        let record = match state.sessions.verify(token) {
            Ok(verified) => SessionRecord::from(verified),
            Err(err) => {
                tracing::warn!(error = %err, "session token verification failed");
                SessionRecord::anonymous()
            }
        };

        Ok(Self(record))
    }
}

/// Session token carried by the request.
///
/// `Authorization: Bearer <token>` wins over the session cookie.
pub fn session_token<'a>(headers: &'a HeaderMap, cookie_name: &str) -> Option<&'a str> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim_start().split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, t)| t.trim())
        .filter(|t| !t.is_empty());
    if bearer.is_some() {
        return bearer;
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .map(|(_, value)| value.trim_matches('"'))
        .filter(|t| !t.is_empty())
}
