//! Configuration for the accounts domain.
//!
//! Both structs implement `FromEnv` from `core_config`, like the shared
//! server configuration.

use core_config::{ConfigError, FromEnv, env_parse, env_required};

pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 900;

/// JWT signing configuration.
///
/// Loaded from environment variables:
/// - `JWT_SECRET` (required) - at least 32 characters
/// - `JWT_TTL_SECONDS` (optional) - token lifetime, defaults to 900
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_seconds: i64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl JwtConfig {
    /// # Panics
    /// Panics if the secret is less than 32 characters.
    pub fn new(secret: impl Into<String>) -> Self {
        let secret = secret.into();
        assert!(
            secret.len() >= 32,
            "JWT secret must be at least 32 characters"
        );
        Self {
            secret,
            ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
        }
    }

    pub fn with_ttl(mut self, ttl_seconds: i64) -> Self {
        self.ttl_seconds = ttl_seconds;
        self
    }
}

impl FromEnv for JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let secret = env_required("JWT_SECRET")?;

        if secret.len() < 32 {
            return Err(ConfigError::ParseError {
                key: "JWT_SECRET".to_string(),
                details: format!(
                    "must be at least 32 characters (got {})",
                    secret.len()
                ),
            });
        }

        let ttl_seconds = env_parse("JWT_TTL_SECONDS", DEFAULT_TOKEN_TTL_SECONDS)?;

        Ok(Self {
            secret,
            ttl_seconds,
        })
    }
}

/// Bootstrap superadmin credentials
///
/// - `SUPERADMIN_EMAIL` (required)
/// - `SUPERADMIN_PASSWORD` (required)
#[derive(Clone)]
pub struct SuperadminConfig {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for SuperadminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuperadminConfig")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl FromEnv for SuperadminConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            email: env_required("SUPERADMIN_EMAIL")?,
            password: env_required("SUPERADMIN_PASSWORD")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "this-is-a-valid-secret-with-32-chars!";

    #[test]
    fn test_jwt_config_new_valid() {
        let config = JwtConfig::new(SECRET);
        assert_eq!(config.secret, SECRET);
        assert_eq!(config.ttl_seconds, DEFAULT_TOKEN_TTL_SECONDS);
    }

    #[test]
    fn test_jwt_config_debug_hides_secret() {
        let rendered = format!("{:?}", JwtConfig::new(SECRET).with_ttl(60));
        assert!(!rendered.contains(SECRET));
        assert!(rendered.contains("<redacted>"));
        assert!(rendered.contains("60"));
    }

    #[test]
    #[should_panic(expected = "JWT secret must be at least 32 characters")]
    fn test_jwt_config_new_too_short() {
        JwtConfig::new("short");
    }

    #[test]
    fn test_jwt_config_from_env() {
        temp_env::with_vars(
            [("JWT_SECRET", Some(SECRET)), ("JWT_TTL_SECONDS", Some("60"))],
            || {
                let config = JwtConfig::from_env().unwrap();
                assert_eq!(config.secret, SECRET);
                assert_eq!(config.ttl_seconds, 60);
            },
        );
    }

    #[test]
    fn test_jwt_config_from_env_too_short() {
        temp_env::with_var("JWT_SECRET", Some("short"), || {
            let err = JwtConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("32 characters"));
        });
    }

    #[test]
    fn test_jwt_config_from_env_bad_ttl() {
        temp_env::with_vars(
            [("JWT_SECRET", Some(SECRET)), ("JWT_TTL_SECONDS", Some("soon"))],
            || {
                let err = JwtConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("JWT_TTL_SECONDS"));
            },
        );
    }

    #[test]
    fn test_superadmin_config_requires_both_vars() {
        temp_env::with_vars(
            [
                ("SUPERADMIN_EMAIL", Some("root@mail.com")),
                ("SUPERADMIN_PASSWORD", None::<&str>),
            ],
            || {
                let err = SuperadminConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("SUPERADMIN_PASSWORD"));
            },
        );
    }

    #[test]
    fn test_superadmin_debug_redacts_password() {
        let config = SuperadminConfig {
            email: "root@mail.com".to_string(),
            password: "hunter22hunter22".to_string(),
        };
        assert!(!format!("{:?}", config).contains("hunter22"));
    }
}
