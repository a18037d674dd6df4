/// Factory: build `SessionVerifier` from application `Config`.
use std::sync::Arc;

use tracing::error;

use crate::config::Config;
use crate::error::AppError;
use crate::services::session::SessionVerifier;

pub fn build_session_verifier(config: &Config) -> Result<Arc<SessionVerifier>, AppError> {
    let verifier = SessionVerifier::new(
        &config.session_jwt_public_key_pem,
        &config.auth_issuer,
        &config.auth_audience,
        config.session_token_leeway_seconds,
    )
    .map_err(|e| {
        error!(error = %e, "failed to build session verifier");
        AppError::Internal
    })?;

    Ok(Arc::new(verifier))
}
