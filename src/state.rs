/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - session 検証器, アップロードポリシー, 認証プロバイダの入口, ページテンプレート
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 * - リクエストを跨いで変化する状態は持たない
 */
use std::sync::Arc;

use crate::config::Config;
use crate::error::AppError;
use crate::services::session::{SessionVerifier, build_session_verifier};
use crate::services::upload::UploadPolicy;
use crate::web::{auth::AuthEndpoints, view::PageRenderer};

#[derive(Clone, Debug)]
pub struct AppState {
    pub sessions: Arc<SessionVerifier>,
    pub session_cookie_name: Arc<str>,
    pub upload_policy: Arc<UploadPolicy>,
    pub auth: Arc<AuthEndpoints>,
    pub pages: Arc<PageRenderer>,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let sessions = build_session_verifier(config)?;
        let pages = PageRenderer::new()?;

        Ok(Self {
            sessions,
            session_cookie_name: Arc::from(config.session_cookie_name.as_str()),
            upload_policy: Arc::new(config.upload_policy.clone()),
            auth: Arc::new(AuthEndpoints::from_config(config)),
            pages: Arc::new(pages),
        })
    }
}
