//! Authentication gate.
//!
//! Resolves the caller from a credential, loads the account and rejects
//! unknown or banned callers before any handler logic runs.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::future::Future;
use std::sync::Arc;

use crate::error::{AccountError, AccountResult};
use crate::models::Account;
use crate::store::AccountStore;
use crate::token::TokenService;

/// Reject an account that currently has an open ban
pub fn reject_if_banned(account: &Account) -> AccountResult<()> {
    match account.active_ban() {
        Some(ban) => Err(AccountError::Unauthorized(format!(
            "user {} has ban due to '{}'",
            account.email, ban.reason
        ))),
        None => Ok(()),
    }
}

pub struct AuthGate<S: AccountStore> {
    store: Arc<S>,
    tokens: Arc<dyn TokenService>,
}

impl<S: AccountStore> Clone for AuthGate<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            tokens: Arc::clone(&self.tokens),
        }
    }
}

impl<S: AccountStore> AuthGate<S> {
    pub fn new(store: Arc<S>, tokens: Arc<dyn TokenService>) -> Self {
        Self { store, tokens }
    }

    /// Resolve a credential to a live, unbanned account
    pub async fn authenticate(&self, credential: &str) -> AccountResult<Account> {
        let id = self
            .tokens
            .resolve(credential)
            .map_err(|_| AccountError::unauthorized())?;

        // Deleted and never-existing accounts look the same from here
        let account = self.store.get(&id).await.map_err(|e| {
            tracing::debug!(account = %id, error = %e, "Credential resolved to unknown account");
            AccountError::unauthorized()
        })?;

        reject_if_banned(&account).inspect_err(|_| {
            tracing::info!(account = %id, "Rejected banned account");
        })?;

        Ok(account)
    }

    /// Authenticate, then run `next` with the account and return its result unchanged
    pub async fn guard<F, Fut, T>(&self, credential: &str, next: F) -> AccountResult<T>
    where
        F: FnOnce(Account) -> Fut,
        Fut: Future<Output = AccountResult<T>>,
    {
        let account = self.authenticate(credential).await?;
        next(account).await
    }
}

/// Extract the credential from `Authorization: Bearer` or the `access_token` cookie
fn extract_credential(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer ").map(|s| s.to_string()))
        .or_else(|| {
            headers
                .get("cookie")
                .and_then(|v| v.to_str().ok())
                .and_then(|cookies| {
                    cookies.split(';').find_map(|cookie| {
                        let (name, value) = cookie.trim().split_once('=')?;
                        (name == "access_token").then(|| value.to_string())
                    })
                })
        })
}

/// Gate middleware
///
/// Inserts the caller's [`CurrentAccount`] into request extensions on success.
///
/// ```ignore
/// let protected = Router::new()
///     .route("/user/me", get(me))
///     .layer(axum::middleware::from_fn_with_state(gate, require_account));
/// ```
pub async fn require_account<S: AccountStore + 'static>(
    State(gate): State<AuthGate<S>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(credential) = extract_credential(request.headers()) else {
        tracing::debug!("No credential in Authorization header or cookie");
        return AccountError::unauthorized().into_response();
    };

    match gate.authenticate(&credential).await {
        Ok(account) => {
            request.extensions_mut().insert(CurrentAccount(account));
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

/// The account the gate resolved for this request
#[derive(Debug, Clone)]
pub struct CurrentAccount(pub Account);

impl<St> FromRequestParts<St> for CurrentAccount
where
    St: Send + Sync,
{
    type Rejection = AccountError;

    async fn from_request_parts(parts: &mut Parts, _state: &St) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentAccount>()
            .cloned()
            .ok_or_else(AccountError::unauthorized)
    }
}
