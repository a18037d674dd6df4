//! Login / logout entry points.
//!
//! The identity-provider handshake lives outside this service. Login only
//! sends the browser to the provider; logout drops the session cookie and
//! hands over to the provider's logout page when one is configured.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Redirect},
};
use url::Url;

use crate::config::Config;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct AuthEndpoints {
    pub provider: String,
    pub login_url: String,
    pub logout_url: Option<String>,
    pub public_base_url: Option<String>,
    pub cookie_name: String,
}

impl AuthEndpoints {
    pub fn from_config(config: &Config) -> Self {
        Self {
            provider: config.auth_provider.clone(),
            login_url: config.auth_login_url.clone(),
            logout_url: config.auth_logout_url.clone(),
            public_base_url: config.public_base_url.clone(),
            cookie_name: config.session_cookie_name.clone(),
        }
    }

    pub fn login_label(&self) -> String {
        match self.provider.to_ascii_lowercase().as_str() {
            "microsoft" => "Microsoft Entra login".to_string(),
            other => format!("Log in with {other}"),
        }
    }

    /// Provider login URL with `provider` and, when known, `redirect_uri`.
    pub fn login_redirect(&self) -> Result<String, AppError> {
        let mut url = Url::parse(&self.login_url).map_err(|e| {
            tracing::error!(error = %e, "invalid login url");
            AppError::Internal
        })?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("provider", &self.provider);
            if let Some(base) = &self.public_base_url {
                query.append_pair("redirect_uri", &format!("{base}/"));
            }
        }

        Ok(url.into())
    }

    pub fn logout_target(&self) -> &str {
        self.logout_url.as_deref().unwrap_or("/")
    }

    /// `Set-Cookie` value that expires the session cookie.
    pub fn clear_cookie(&self) -> String {
        format!(
            "{}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax",
            self.cookie_name
        )
    }
}

pub async fn login(State(state): State<AppState>) -> Result<Redirect, AppError> {
    let target = state.auth.login_redirect()?;
    tracing::info!(provider = %state.auth.provider, "redirecting to identity provider");
    Ok(Redirect::to(&target))
}

pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    tracing::info!("logging out");
    (
        [(header::SET_COOKIE, state.auth.clear_cookie())],
        Redirect::to(state.auth.logout_target()),
    )
}
