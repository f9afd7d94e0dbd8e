use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::{AuthenticatedUser, Role};

/// Claims of an HS256 session token
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionClaims {
    /// Telegram user id
    sub: String,
    role: Role,
    iat: i64,
    exp: i64,
}

/// Token handed out after a successful Telegram login
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_in: i64,
}

/// Issues and verifies HMAC-signed session tokens
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self::from_secret(config.session_secret.as_bytes(), config.session_token_ttl)
    }

    pub fn from_secret(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    /// Issue a session token for the given Telegram user
    pub fn issue(&self, telegram_id: i64, role: Role) -> Result<IssuedToken> {
        self.issue_at(telegram_id, role, Utc::now().timestamp())
    }

    fn issue_at(&self, telegram_id: i64, role: Role, now: i64) -> Result<IssuedToken> {
        let expires_in = self.ttl.as_secs() as i64;
        let claims = SessionClaims {
            sub: telegram_id.to_string(),
            role,
            iat: now,
            exp: now + expires_in,
        };

        let access_token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign session token: {}", e)))?;

        Ok(IssuedToken {
            access_token,
            expires_in,
        })
    }

    /// Verify signature and expiry, returning the authenticated identity
    pub fn verify(&self, token: &str) -> Result<AuthenticatedUser> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation.leeway = 30;

        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::Auth(format!("Invalid session token: {}", e)))?;

        let telegram_id = token_data
            .claims
            .sub
            .parse::<i64>()
            .map_err(|_| AppError::Auth("Invalid session token subject".to_string()))?;

        Ok(AuthenticatedUser {
            telegram_id,
            role: token_data.claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret-test-secret-test-secret!";

    fn service() -> TokenService {
        TokenService::from_secret(SECRET, Duration::from_secs(3600))
    }

    #[test]
    fn test_issue_and_verify() {
        let service = service();
        let token = service.issue(279058397, Role::Admin).unwrap();
        assert_eq!(token.expires_in, 3600);

        let user = service.verify(&token.access_token).unwrap();
        assert_eq!(user.telegram_id, 279058397);
        assert_eq!(user.role, Role::Admin);
        assert!(user.is_admin());
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = service();
        let issued_long_ago = Utc::now().timestamp() - 7200;
        let token = service
            .issue_at(1, Role::Customer, issued_long_ago)
            .unwrap();

        assert!(matches!(
            service.verify(&token.access_token),
            Err(AppError::Auth(_))
        ));
    }

    #[test]
    fn test_foreign_secret_rejected() {
        let token = service().issue(1, Role::Customer).unwrap();
        let other = TokenService::from_secret(b"another-secret-another-secret-xx", Duration::from_secs(3600));

        assert!(matches!(
            other.verify(&token.access_token),
            Err(AppError::Auth(_))
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(service().verify("not.a.token").is_err());
    }
}
