use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde_derive::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
    jti: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token signing failed: {0}")]
    Signing(String),
}

/// HS256 access tokens whose subject is a username.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, subject: &str) -> Result<String, TokenError> {
        self.issue_with_ttl(subject, self.ttl)
    }

    pub fn issue_with_ttl(&self, subject: &str, ttl: Duration) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_owned(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Subject of a valid, unexpired token. Anything else reads as `None`.
    pub fn subject(&self, token: &str) -> Option<String> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        match decode::<Claims>(token, &self.decoding, &validation) {
            Ok(data) => Some(data.claims.sub),
            Err(e) => {
                debug!(error = %e, "Rejected access token");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-secret", Duration::minutes(30))
    }

    #[test]
    fn issued_token_yields_its_subject() {
        let tokens = service();
        let token = tokens.issue("ana").unwrap();
        assert_eq!(tokens.subject(&token).as_deref(), Some("ana"));
    }

    #[test]
    fn expired_token_is_rejected() {
        let tokens = service();
        let token = tokens.issue_with_ttl("ana", Duration::minutes(-5)).unwrap();
        assert_eq!(tokens.subject(&token), None);
    }

    #[test]
    fn token_from_another_secret_is_rejected() {
        let other = TokenService::new("other-secret", Duration::minutes(30));
        let token = other.issue("ana").unwrap();
        assert_eq!(service().subject(&token), None);
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(service().subject("not.a.jwt"), None);
        assert_eq!(service().subject(""), None);
    }
}
