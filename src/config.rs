/*
 * Responsibility
 * - 環境変数や設定の読み込み (認証プロバイダ URL, セッショントークン検証鍵, アップロード制限など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::services::upload::UploadPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn parse(value: Option<&str>) -> Self {
        match value
            .unwrap_or("development")
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    // External identity provider entry points
    pub auth_provider: String,
    pub auth_login_url: String,
    pub auth_logout_url: Option<String>,
    pub public_base_url: Option<String>,

    // Session token issued by the provider side
    pub auth_issuer: String,
    pub auth_audience: String,
    pub session_jwt_public_key_pem: String,
    pub session_token_leeway_seconds: u64,
    pub session_cookie_name: String,

    pub upload_policy: UploadPolicy,
    pub http_timeout_seconds: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// `from_env` uses the process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT") {
            Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV").as_deref());

        let cors_allowed_origins = split_list(&lookup("CORS_ALLOWED_ORIGINS").unwrap_or_default());

        let auth_provider = non_empty(lookup("AUTH_PROVIDER")).unwrap_or_else(|| "microsoft".into());

        let auth_login_url =
            non_empty(lookup("AUTH_LOGIN_URL")).ok_or(ConfigError::Missing("AUTH_LOGIN_URL"))?;
        url::Url::parse(&auth_login_url).map_err(|_| ConfigError::Invalid("AUTH_LOGIN_URL"))?;

        let auth_logout_url = non_empty(lookup("AUTH_LOGOUT_URL"));
        if let Some(u) = &auth_logout_url {
            url::Url::parse(u).map_err(|_| ConfigError::Invalid("AUTH_LOGOUT_URL"))?;
        }

        let public_base_url =
            non_empty(lookup("PUBLIC_BASE_URL")).map(|s| s.trim_end_matches('/').to_string());
        if let Some(u) = &public_base_url {
            url::Url::parse(u).map_err(|_| ConfigError::Invalid("PUBLIC_BASE_URL"))?;
        }

        let auth_issuer =
            non_empty(lookup("AUTH_ISSUER")).ok_or(ConfigError::Missing("AUTH_ISSUER"))?;
        let auth_audience =
            non_empty(lookup("AUTH_AUDIENCE")).ok_or(ConfigError::Missing("AUTH_AUDIENCE"))?;

        let session_jwt_public_key_pem = non_empty(lookup("SESSION_JWT_PUBLIC_KEY_PEM"))
            .ok_or(ConfigError::Missing("SESSION_JWT_PUBLIC_KEY_PEM"))?
            .replace("\\n", "\n");

        let session_token_leeway_seconds = lookup("SESSION_TOKEN_LEEWAY_SECONDS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(60);

        let session_cookie_name =
            non_empty(lookup("SESSION_COOKIE_NAME")).unwrap_or_else(|| "session".into());

        let mut upload_policy = UploadPolicy::default();
        if let Some(v) = lookup("UPLOAD_MAX_BYTES") {
            upload_policy.max_bytes = v
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid("UPLOAD_MAX_BYTES"))?;
        }
        if let Some(v) = lookup("UPLOAD_ALLOWED_EXTENSIONS") {
            let extensions = split_list(&v);
            if extensions.is_empty() {
                return Err(ConfigError::Invalid("UPLOAD_ALLOWED_EXTENSIONS"));
            }
            upload_policy = UploadPolicy::new(extensions, upload_policy.max_bytes);
        }

        let http_timeout_seconds = lookup("HTTP_TIMEOUT_SECONDS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(300);

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            auth_provider,
            auth_login_url,
            auth_logout_url,
            public_base_url,
            auth_issuer,
            auth_audience,
            session_jwt_public_key_pem,
            session_token_leeway_seconds,
            session_cookie_name,
            upload_policy,
            http_timeout_seconds,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
