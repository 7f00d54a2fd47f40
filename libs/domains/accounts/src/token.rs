use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::error::{AccountError, AccountResult};

/// Turns credentials into account identifiers and back.
///
/// Signing, expiry and claim layout are private to the implementation.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Issue a credential for the given account identifier
    fn issue(&self, account_id: &str) -> AccountResult<String>;

    /// Resolve a credential to the account identifier it was issued for
    fn resolve(&self, credential: &str) -> AccountResult<String>;
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Account identifier (email)
    pub exp: i64,    // Expiration time
    pub iat: i64,    // Issued at
    pub jti: String, // JWT ID
}

/// HS256 JWT implementation of TokenService
#[derive(Clone)]
pub struct JwtTokenService {
    secret: String,
    ttl_seconds: i64,
}

impl JwtTokenService {
    pub fn new(config: &JwtConfig) -> Self {
        tracing::info!(ttl_seconds = config.ttl_seconds, "JWT token service initialized");
        Self {
            secret: config.secret.clone(),
            ttl_seconds: config.ttl_seconds,
        }
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, account_id: &str) -> AccountResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: account_id.to_string(),
            exp: (now + Duration::seconds(self.ttl_seconds)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let header = Header {
            alg: jsonwebtoken::Algorithm::HS256,
            ..Default::default()
        };

        encode(
            &header,
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AccountError::Internal(format!("Failed to sign token: {}", e)))
    }

    fn resolve(&self, credential: &str) -> AccountResult<String> {
        let token_data = decode::<Claims>(
            credential,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| {
            tracing::debug!("JWT verification failed: {}", e);
            AccountError::unauthorized()
        })?;

        Ok(token_data.claims.sub)
    }
}
