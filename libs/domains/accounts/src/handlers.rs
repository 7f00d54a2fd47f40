use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Serialize;
use std::sync::Arc;

use crate::bans::InspectionReport;
use crate::error::AccountResult;
use crate::gate::{AuthGate, CurrentAccount, require_account};
use crate::models::{
    AccountResponse, BanRequest, LoginRequest, MessageResponse, RegisterRequest, TargetRequest,
    TokenResponse, UpdateEmail, UpdateFavoriteCake, UpdatePassword,
};
use crate::service::AccountService;
use crate::store::AccountStore;
use crate::token::TokenService;

/// Shared handler state
pub struct AppState<S: AccountStore> {
    pub service: AccountService<S>,
    pub tokens: Arc<dyn TokenService>,
}

impl<S: AccountStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            tokens: Arc::clone(&self.tokens),
        }
    }
}

/// Create the accounts router with all HTTP endpoints.
///
/// Everything except registration and token issuance sits behind the gate.
pub fn router<S: AccountStore + 'static>(
    service: AccountService<S>,
    tokens: Arc<dyn TokenService>,
) -> Router {
    let gate = AuthGate::new(service.store(), Arc::clone(&tokens));
    let state = AppState { service, tokens };

    let protected = Router::new()
        .route("/cake", get(get_cake))
        .route("/user/me", get(me))
        .route("/user/favorite_cake", post(update_favorite_cake::<S>))
        .route("/user/email", post(update_email::<S>))
        .route("/user/password", post(update_password::<S>))
        .route("/admin/promote", post(promote::<S>))
        .route("/admin/fire", post(fire::<S>))
        .route("/admin/ban", post(ban::<S>))
        .route("/admin/unban", post(unban::<S>))
        .route("/admin/inspect", get(inspect::<S>))
        .route_layer(middleware::from_fn_with_state(gate, require_account::<S>));

    Router::new()
        .route("/user/register", post(register::<S>))
        .route("/user/jwt", post(issue_token::<S>))
        .merge(protected)
        .with_state(state)
}

/// Register a new account
///
/// POST /user/register
async fn register<S: AccountStore>(
    State(state): State<AppState<S>>,
    Json(input): Json<RegisterRequest>,
) -> AccountResult<impl IntoResponse> {
    state.service.register(input).await?;
    Ok((StatusCode::CREATED, Json(MessageResponse::new("registered"))))
}

/// Exchange credentials for a token
///
/// POST /user/jwt
async fn issue_token<S: AccountStore>(
    State(state): State<AppState<S>>,
    Json(input): Json<LoginRequest>,
) -> AccountResult<Json<TokenResponse>> {
    let account = state.service.authenticate_credentials(input).await?;
    let token = state.tokens.issue(&account.email)?;
    Ok(Json(TokenResponse { token }))
}

/// GET /user/me
async fn me(CurrentAccount(account): CurrentAccount) -> Json<AccountResponse> {
    Json(account.into())
}

/// GET /cake
async fn get_cake(CurrentAccount(account): CurrentAccount) -> Json<MessageResponse> {
    Json(MessageResponse::new(account.favorite_cake))
}

/// POST /user/favorite_cake
async fn update_favorite_cake<S: AccountStore>(
    State(state): State<AppState<S>>,
    CurrentAccount(account): CurrentAccount,
    Json(input): Json<UpdateFavoriteCake>,
) -> AccountResult<Json<MessageResponse>> {
    let message = state.service.update_favorite_cake(&account, input).await?;
    Ok(Json(MessageResponse::new(message)))
}

/// POST /user/email
async fn update_email<S: AccountStore>(
    State(state): State<AppState<S>>,
    CurrentAccount(account): CurrentAccount,
    Json(input): Json<UpdateEmail>,
) -> AccountResult<Json<MessageResponse>> {
    let message = state.service.update_email(&account, input).await?;
    Ok(Json(MessageResponse::new(message)))
}

/// POST /user/password
async fn update_password<S: AccountStore>(
    State(state): State<AppState<S>>,
    CurrentAccount(account): CurrentAccount,
    Json(input): Json<UpdatePassword>,
) -> AccountResult<Json<MessageResponse>> {
    let message = state.service.update_password(&account, input).await?;
    Ok(Json(MessageResponse::new(message)))
}

/// POST /admin/promote
async fn promote<S: AccountStore>(
    State(state): State<AppState<S>>,
    CurrentAccount(actor): CurrentAccount,
    Json(input): Json<TargetRequest>,
) -> AccountResult<Json<MessageResponse>> {
    let message = state.service.promote(&actor, input).await?;
    Ok(Json(MessageResponse::new(message)))
}

/// POST /admin/fire
async fn fire<S: AccountStore>(
    State(state): State<AppState<S>>,
    CurrentAccount(actor): CurrentAccount,
    Json(input): Json<TargetRequest>,
) -> AccountResult<Json<MessageResponse>> {
    let message = state.service.fire(&actor, input).await?;
    Ok(Json(MessageResponse::new(message)))
}

/// POST /admin/ban
async fn ban<S: AccountStore>(
    State(state): State<AppState<S>>,
    CurrentAccount(actor): CurrentAccount,
    Json(input): Json<BanRequest>,
) -> AccountResult<Json<MessageResponse>> {
    let message = state.service.ban(&actor, input).await?;
    Ok(Json(MessageResponse::new(message)))
}

/// POST /admin/unban
async fn unban<S: AccountStore>(
    State(state): State<AppState<S>>,
    CurrentAccount(actor): CurrentAccount,
    Json(input): Json<TargetRequest>,
) -> AccountResult<Json<MessageResponse>> {
    let message = state.service.unban(&actor, input).await?;
    Ok(Json(MessageResponse::new(message)))
}

#[derive(Debug, Serialize)]
struct InspectionResponse {
    message: String,
    report: InspectionReport,
}

/// Ban history of an account
///
/// GET /admin/inspect?email=user@mail.com
async fn inspect<S: AccountStore>(
    State(state): State<AppState<S>>,
    CurrentAccount(actor): CurrentAccount,
    Query(input): Query<TargetRequest>,
) -> AccountResult<Json<InspectionResponse>> {
    let report = state.service.inspect(&actor, input).await?;
    Ok(Json(InspectionResponse {
        message: report.to_string(),
        report,
    }))
}
