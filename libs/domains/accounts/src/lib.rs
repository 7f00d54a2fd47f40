//! Accounts Domain
//!
//! Account registration, authentication and administration: a role hierarchy
//! deciding who may act on whom, a ban lifecycle per account, and a
//! concurrency-safe in-memory account store.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//! ┌──────▼──────┐
//! │    Gate     │  ← credential → account, rejects unknown/banned callers
//! └──────┬──────┘
//! ┌──────▼──────┐
//! │   Service   │  ← use cases: register, promote, fire, ban, unban, inspect, self-update
//! └──┬───────┬──┘
//! ┌──▼───┐ ┌─▼────┐
//! │Policy│ │ Bans │  ← pure role checks and ban transitions
//! └──────┘ └──────┘
//! ┌─────────────┐
//! │    Store    │  ← the only owner of mutable account state
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_accounts::{
//!     handlers, AccountService, InMemoryAccountStore, JwtConfig, JwtTokenService,
//! };
//!
//! let store = Arc::new(InMemoryAccountStore::new());
//! let service = AccountService::new(store);
//! let tokens = Arc::new(JwtTokenService::new(&JwtConfig::new(
//!     "this-is-a-valid-secret-with-32-chars!",
//! )));
//!
//! let router = handlers::router(service, tokens);
//! ```

pub mod bans;
pub mod config;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod models;
pub mod policy;
pub mod service;
pub mod store;
pub mod token;
pub mod validation;

pub use bans::{BanState, InspectionReport};
pub use config::{JwtConfig, SuperadminConfig};
pub use error::{AccountError, AccountResult};
pub use gate::{AuthGate, CurrentAccount, require_account};
pub use models::{Account, AccountResponse, BanRecord, Role};
pub use policy::AdminAction;
pub use service::AccountService;
pub use store::{AccountStore, Edit, InMemoryAccountStore, Mutation};
pub use token::{JwtTokenService, TokenService};
