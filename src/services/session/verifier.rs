use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use thiserror::Error;

// Errors returned by session-token verification + strict claim validation.
#[derive(Debug, Error)]
pub enum SessionTokenError {
    #[error("jwt verification failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("empty '{0}' claim")]
    EmptyClaim(&'static str),
}

/// Session token claims as left behind by the identity provider.
///
/// Profile claims follow the OpenID Connect names (`name`, `email`,
/// `preferred_username`) and are all optional.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionTokenClaims {
    pub iss: String,
    pub sub: String,
    pub exp: u64,

    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub preferred_username: Option<String>,
}

/// Verified session, in the shape the rest of the app consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedSession {
    pub subject: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub preferred_username: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// EdDSA (Ed25519) session-token verifier.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct SessionVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for SessionVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("SessionVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl SessionVerifier {
    pub fn new(
        public_key_pem: &str,
        issuer: &str,
        audience: &str,
        leeway_seconds: u64,
    ) -> Result<Self, String> {
        let decoding_key = DecodingKey::from_ed_pem(public_key_pem.as_bytes())
            .map_err(|e| format!("invalid ed25519 public key pem: {}", e))?;

        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.leeway = leeway_seconds;

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// Verify signature, `iss`/`aud`/`exp`, then reject meaningless claims.
    pub fn verify(&self, token: &str) -> Result<VerifiedSession, SessionTokenError> {
        let data =
            jsonwebtoken::decode::<SessionTokenClaims>(token, &self.decoding_key, &self.validation)?;
        let claims = data.claims;

        if claims.iss.trim().is_empty() {
            return Err(SessionTokenError::EmptyClaim("iss"));
        }
        if claims.sub.trim().is_empty() {
            return Err(SessionTokenError::EmptyClaim("sub"));
        }

        let expires_at = i64::try_from(claims.exp)
            .ok()
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0));

        Ok(VerifiedSession {
            subject: claims.sub,
            name: claims.name,
            email: claims.email,
            preferred_username: claims.preferred_username,
            expires_at,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::test_keys::*;
    use super::*;

    fn verifier() -> SessionVerifier {
        SessionVerifier::new(PUBLIC_KEY_PEM, ISSUER, AUDIENCE, 0).unwrap()
    }

    #[test]
    fn verifies_profile_claims() {
        let mut claims = claims("user-1", 600);
        claims["name"] = "Ada Lovelace".into();
        claims["email"] = "ada@example.com".into();

        let session = verifier().verify(&sign(&claims)).unwrap();

        assert_eq!(session.subject, "user-1");
        assert_eq!(session.name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(session.email.as_deref(), Some("ada@example.com"));
        assert_eq!(session.preferred_username, None);
        assert!(session.expires_at.is_some());
    }

    #[test]
    fn rejects_expired_token() {
        let token = sign(&claims("user-1", -600));

        assert!(matches!(
            verifier().verify(&token),
            Err(SessionTokenError::Jwt(_))
        ));
    }

    #[test]
    fn rejects_foreign_key() {
        let other = SessionVerifier::new(OTHER_PUBLIC_KEY_PEM, ISSUER, AUDIENCE, 0).unwrap();

        assert!(other.verify(&sign(&claims("user-1", 600))).is_err());
    }

    #[test]
    fn rejects_wrong_audience() {
        let mut claims = claims("user-1", 600);
        claims["aud"] = "someone-else".into();

        assert!(verifier().verify(&sign(&claims)).is_err());
    }

    #[test]
    fn rejects_blank_subject() {
        let token = sign(&claims("  ", 600));

        assert!(matches!(
            verifier().verify(&token),
            Err(SessionTokenError::EmptyClaim("sub"))
        ));
    }

    #[test]
    fn rejects_invalid_pem() {
        assert!(SessionVerifier::new("not a pem", ISSUER, AUDIENCE, 0).is_err());
    }
}
