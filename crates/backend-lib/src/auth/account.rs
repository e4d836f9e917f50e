// ============================
// crates/backend-lib/src/auth/account.rs
// ============================
//! Account registration, login and deletion.
use std::sync::Arc;

use conch_common::{AccountRequest, UserId};
use zeroize::Zeroizing;

use super::authorizer::Principal;
use super::password::CredentialHasher;
use super::rate_limit::AuthRateLimiter;
use super::token::UNKNOWN_USERNAME;
use crate::error::AppError;
use crate::storage::{ContactRecord, Storage, StoreError, UserRecord};
use crate::validation;

/// Username and plaintext password, wiped on drop
#[derive(Clone)]
pub struct LoginCredentials {
    pub username: String,
    pub password: Zeroizing<String>,
}

impl LoginCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Zeroizing::new(password.into()),
        }
    }
}

impl std::fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn Storage>,
    hasher: Arc<dyn CredentialHasher>,
    limiter: AuthRateLimiter,
}

impl AccountService {
    pub fn new(
        store: Arc<dyn Storage>,
        hasher: Arc<dyn CredentialHasher>,
        limiter: AuthRateLimiter,
    ) -> Self {
        Self { store, hasher, limiter }
    }

    /// Validate and create an account with its contact and credential rows.
    ///
    /// A failure after the username is reserved deletes the reservation again,
    /// so no partial account is left behind.
    #[tracing::instrument(skip_all, fields(username = %account.username))]
    pub async fn register(&self, mut account: AccountRequest) -> Result<UserRecord, AppError> {
        validation::validate_account(&account).into_result()?;
        let password = Zeroizing::new(std::mem::take(&mut account.password));

        let user = self.store.insert_user(&account.username).await.map_err(|e| match e {
            StoreError::Conflict(_) => AppError::Conflict(format!(
                "Error: username {} is already taken",
                account.username
            )),
            other => other.into(),
        })?;

        if let Err(err) = self.complete_registration(user.id, account, password).await {
            tracing::warn!(user_id = user.id, error = %err, "registration failed, rolling back");
            metrics::counter!(crate::metrics::REGISTRATION_ROLLBACK).increment(1);
            if let Err(rollback) = self.store.delete_user(user.id).await {
                tracing::error!(user_id = user.id, error = %rollback, "rollback failed");
            }
            return Err(err);
        }

        tracing::info!(user_id = user.id, "account registered");
        metrics::counter!(crate::metrics::ACCOUNT_REGISTERED).increment(1);
        Ok(user)
    }

    async fn complete_registration(
        &self,
        user_id: UserId,
        account: AccountRequest,
        password: Zeroizing<String>,
    ) -> Result<(), AppError> {
        self.store
            .insert_contact(ContactRecord {
                user_id,
                fname: account.fname,
                lname: account.lname,
                address: account.address,
            })
            .await?;

        let hash = self.hash(password).await?;
        self.store.insert_credential(user_id, hash).await?;
        Ok(())
    }

    /// Check a username/password pair
    #[tracing::instrument(skip_all, fields(username = %credentials.username))]
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<UserRecord, AppError> {
        if !self.limiter.check_rate_limit(&credentials.username) {
            return Err(AppError::AuthRateLimited);
        }

        let user = self
            .store
            .find_user_by_name(&credentials.username)
            .await
            .map_err(|e| match e {
                StoreError::NotFound(_) => AppError::NotFound(UNKNOWN_USERNAME.to_string()),
                other => other.into(),
            })?;
        let stored = self.store.find_credential(user.id).await?;

        if !self.verify(credentials.password.clone(), stored.hash).await? {
            tracing::info!(user_id = user.id, "login rejected");
            metrics::counter!(crate::metrics::LOGIN_FAILURE).increment(1);
            self.limiter.record_failed_attempt(&credentials.username);
            return Err(AppError::InvalidCredentials);
        }

        self.limiter.record_success(&credentials.username);
        metrics::counter!(crate::metrics::LOGIN_SUCCESS).increment(1);
        Ok(user)
    }

    /// Re-check the caller's credentials, then delete the account and every
    /// row it owns. Nothing changes when the check fails.
    #[tracing::instrument(skip_all, fields(user_id = principal.user_id))]
    pub async fn delete_account(
        &self,
        principal: &Principal,
        credentials: &LoginCredentials,
    ) -> Result<UserRecord, AppError> {
        let confirmed = self.login(credentials).await?;
        principal.ensure_owns(confirmed.id)?;

        let removed = self.store.delete_user(confirmed.id).await?;
        tracing::info!(user_id = removed.id, "account deleted");
        metrics::counter!(crate::metrics::ACCOUNT_DELETED).increment(1);
        Ok(removed)
    }

    pub async fn contact(&self, user_id: UserId) -> Result<ContactRecord, AppError> {
        Ok(self.store.find_contact(user_id).await?)
    }

    pub async fn user(&self, user_id: UserId) -> Result<UserRecord, AppError> {
        Ok(self.store.find_user(user_id).await?)
    }

    async fn hash(&self, password: Zeroizing<String>) -> Result<Vec<u8>, AppError> {
        let hasher = Arc::clone(&self.hasher);
        let hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Internal(format!("hash task failed: {e}")))??;
        Ok(hash)
    }

    async fn verify(&self, password: Zeroizing<String>, stored: Vec<u8>) -> Result<bool, AppError> {
        let hasher = Arc::clone(&self.hasher);
        let matched = tokio::task::spawn_blocking(move || hasher.verify(&password, &stored))
            .await
            .map_err(|e| AppError::Internal(format!("verify task failed: {e}")))??;
        Ok(matched)
    }
}
