use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::validate_cake;

/// Account roles, ordered from least to most privileged
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
    Superadmin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
            Role::Superadmin => write!(f, "superadmin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            "superadmin" => Ok(Role::Superadmin),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// One ban episode. The `unbanned_*` fields stay unset while the ban is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BanRecord {
    pub banned_by: String,
    pub banned_at: DateTime<Utc>,
    pub reason: String,
    pub unbanned_by: Option<String>,
    pub unbanned_at: Option<DateTime<Utc>>,
}

impl BanRecord {
    pub fn is_open(&self) -> bool {
        self.unbanned_at.is_none()
    }
}

/// Account entity, keyed by email in the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier (email)
    pub email: String,
    /// Argon2 password hash (never exposed in API responses)
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub favorite_cake: String,
    /// Ban history, oldest first
    #[serde(default)]
    pub ban_history: Vec<BanRecord>,
}

impl Account {
    /// Create a new account (password must already be hashed)
    pub fn new(email: String, password_hash: String, favorite_cake: String, role: Role) -> Self {
        Self {
            email,
            password_hash,
            role,
            favorite_cake,
            ban_history: Vec::new(),
        }
    }

    /// The currently open ban, if any
    pub fn active_ban(&self) -> Option<&BanRecord> {
        self.ban_history.last().filter(|ban| ban.is_open())
    }
}

/// Account response DTO (without password_hash and ban details)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountResponse {
    pub email: String,
    pub role: Role,
    pub favorite_cake: String,
    pub banned: bool,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        let banned = account.active_ban().is_some();
        Self {
            email: account.email,
            role: account.role,
            favorite_cake: account.favorite_cake,
            banned,
        }
    }
}

/// DTO for account registration
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password too short"))]
    pub password: String,
    #[validate(custom(function = "validate_cake"))]
    pub favorite_cake: String,
}

/// DTO for login (token issuance)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub password: String,
}

/// DTO naming the target of an administrative action
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TargetRequest {
    #[serde(default)]
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BanRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateEmail {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdatePassword {
    #[validate(length(min = 8, message = "Password too short"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateFavoriteCake {
    #[validate(custom(function = "validate_cake"))]
    pub favorite_cake: String,
}

/// Plain status message returned by most endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Issued access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}
