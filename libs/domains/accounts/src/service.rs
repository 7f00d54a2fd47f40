use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use std::sync::Arc;

use crate::bans::{self, InspectionReport};
use crate::config::SuperadminConfig;
use crate::error::{AccountError, AccountResult};
use crate::gate::reject_if_banned;
use crate::models::{
    Account, AccountResponse, BanRequest, LoginRequest, RegisterRequest, Role, TargetRequest,
    UpdateEmail, UpdateFavoriteCake, UpdatePassword,
};
use crate::policy::{self, AdminAction};
use crate::store::AccountStore;
use crate::validation::validate_input;

/// Service layer for account use cases
pub struct AccountService<S: AccountStore> {
    store: Arc<S>,
}

impl<S: AccountStore> Clone for AccountService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: AccountStore> AccountService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> Arc<S> {
        Arc::clone(&self.store)
    }

    /// Register a plain user account
    pub async fn register(&self, input: RegisterRequest) -> AccountResult<AccountResponse> {
        validate_input(&input)?;

        let password_hash = hash_password(&input.password)?;
        let account = Account::new(input.email, password_hash, input.favorite_cake, Role::User);

        self.store.add(&account.email, account.clone()).await?;
        Ok(account.into())
    }

    /// Create the bootstrap superadmin
    pub async fn seed_superadmin(&self, config: &SuperadminConfig) -> AccountResult<()> {
        let password_hash = hash_password(&config.password)?;
        let account = Account::new(
            config.email.clone(),
            password_hash,
            "napoleon".to_string(),
            Role::Superadmin,
        );

        self.store.add(&config.email, account).await?;
        tracing::info!(account = %config.email, "Seeded superadmin");
        Ok(())
    }

    /// Verify credentials for token issuance. Banned accounts are refused.
    pub async fn authenticate_credentials(&self, input: LoginRequest) -> AccountResult<Account> {
        validate_input(&input)?;

        let account = self.store.get(&input.email).await?;

        if !verify_password(&input.password, &account.password_hash)? {
            return Err(AccountError::InvalidCredentials);
        }
        reject_if_banned(&account)?;

        Ok(account)
    }

    /// Make a user an admin (superadmin only)
    pub async fn promote(&self, actor: &Account, input: TargetRequest) -> AccountResult<String> {
        let target = self
            .set_role(actor, AdminAction::Promote, input, Role::Admin)
            .await?;
        Ok(format!("user {} is admin now", target.email))
    }

    /// Turn an admin back into a user (superadmin only)
    pub async fn fire(&self, actor: &Account, input: TargetRequest) -> AccountResult<String> {
        let target = self
            .set_role(actor, AdminAction::Demote, input, Role::User)
            .await?;
        Ok(format!("user {} is not admin now", target.email))
    }

    async fn set_role(
        &self,
        actor: &Account,
        action: AdminAction,
        input: TargetRequest,
        role: Role,
    ) -> AccountResult<Account> {
        // Non-superadmins are rejected before the target is looked up
        policy::authorize(actor.role, action, None)?;
        validate_input(&input)?;

        let actor_role = actor.role;
        let target = self
            .store
            .modify(
                &input.email,
                Box::new(move |target: &mut Account| -> AccountResult<()> {
                    policy::authorize(actor_role, action, Some(target.role))?;
                    target.role = role;
                    Ok(())
                }),
            )
            .await?;

        tracing::info!(actor = %actor.email, target = %target.email, %role, "Changed role");
        Ok(target)
    }

    /// The role check and the transition run against the stored account
    /// inside one store operation.
    pub async fn ban(&self, actor: &Account, input: BanRequest) -> AccountResult<String> {
        validate_input(&input)?;

        let actor_role = actor.role;
        let issuer = actor.email.clone();
        let reason = input.reason.clone();
        let at = Utc::now();
        let banned = self
            .store
            .modify(
                &input.email,
                Box::new(move |target: &mut Account| -> AccountResult<()> {
                    policy::authorize(actor_role, AdminAction::Ban, Some(target.role))?;
                    *target = bans::ban(target.clone(), &issuer, &reason, at)?;
                    Ok(())
                }),
            )
            .await?;

        tracing::info!(actor = %actor.email, target = %banned.email, reason = %input.reason, "Banned account");
        Ok(format!("user {} is banned now", banned.email))
    }

    pub async fn unban(&self, actor: &Account, input: TargetRequest) -> AccountResult<String> {
        validate_input(&input)?;

        let actor_role = actor.role;
        let issuer = actor.email.clone();
        let at = Utc::now();
        let cleared = self
            .store
            .modify(
                &input.email,
                Box::new(move |target: &mut Account| -> AccountResult<()> {
                    policy::authorize(actor_role, AdminAction::Unban, Some(target.role))?;
                    *target = bans::unban(target.clone(), &issuer, at)?;
                    Ok(())
                }),
            )
            .await?;

        tracing::info!(actor = %actor.email, target = %cleared.email, "Unbanned account");
        Ok(format!("user {} is unbanned now", cleared.email))
    }

    /// Ban history of the target (admins and superadmins only)
    pub async fn inspect(
        &self,
        actor: &Account,
        input: TargetRequest,
    ) -> AccountResult<InspectionReport> {
        policy::authorize(actor.role, AdminAction::Inspect, None)?;
        validate_input(&input)?;

        let target = self.store.get(&input.email).await?;
        Ok(bans::inspect(&target))
    }

    /// Change the caller's email. The key move is a single store operation.
    pub async fn update_email(&self, actor: &Account, input: UpdateEmail) -> AccountResult<String> {
        validate_input(&input)?;

        self.store
            .rename(&actor.email, &input.email, Box::new(|_: &mut Account| {}))
            .await?;

        tracing::info!(from = %actor.email, to = %input.email, "Changed email");
        Ok("email changed".to_string())
    }

    pub async fn update_password(
        &self,
        actor: &Account,
        input: UpdatePassword,
    ) -> AccountResult<String> {
        validate_input(&input)?;
        let password_hash = hash_password(&input.password)?;

        self.store
            .modify(
                &actor.email,
                Box::new(move |account: &mut Account| -> AccountResult<()> {
                    account.password_hash = password_hash;
                    Ok(())
                }),
            )
            .await?;

        Ok("password changed".to_string())
    }

    pub async fn update_favorite_cake(
        &self,
        actor: &Account,
        input: UpdateFavoriteCake,
    ) -> AccountResult<String> {
        validate_input(&input)?;

        let favorite_cake = input.favorite_cake;
        self.store
            .modify(
                &actor.email,
                Box::new(move |account: &mut Account| -> AccountResult<()> {
                    account.favorite_cake = favorite_cake;
                    Ok(())
                }),
            )
            .await?;

        Ok("favorite cake changed".to_string())
    }
}

// Password helpers

fn hash_password(password: &str) -> AccountResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AccountError::Internal(format!("Password hashing failed: {}", e)))
}

fn verify_password(password: &str, hash: &str) -> AccountResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AccountError::Internal(format!("Stored password hash is invalid: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
