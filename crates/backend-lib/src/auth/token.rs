//! Bearer token issuance and lookup.
//!
//! The token table is the only record of who is logged in; nothing is cached
//! in process memory.

use std::sync::Arc;

use conch_common::UserId;

use super::token_generator::generate_token;
use crate::error::AppError;
use crate::storage::{Storage, StoreError, TokenRecord};

pub const DUPLICATE_TOKEN: &str =
    "Error: Duplicate User: cannot generate a new token if one already exist";
pub const UNKNOWN_USERNAME: &str = "Error: username is incorrect";

#[derive(Clone)]
pub struct TokenService {
    store: Arc<dyn Storage>,
}

impl TokenService {
    pub fn new(store: Arc<dyn Storage>) -> Self {
        Self { store }
    }

    /// Issue a fresh token for `username`; fails while one is still live
    #[tracing::instrument(skip(self))]
    pub async fn issue(&self, username: &str) -> Result<TokenRecord, AppError> {
        let user = self.store.find_user_by_name(username).await.map_err(|e| match e {
            StoreError::NotFound(_) => AppError::NotFound(UNKNOWN_USERNAME.to_string()),
            other => other.into(),
        })?;

        let token = generate_token();
        let record = self.store.insert_token(user.id, &token).await.map_err(|e| match e {
            StoreError::Conflict(_) => AppError::Conflict(DUPLICATE_TOKEN.to_string()),
            other => other.into(),
        })?;

        tracing::info!(user_id = user.id, "token issued");
        metrics::counter!(crate::metrics::TOKEN_ISSUED).increment(1);
        Ok(record)
    }

    /// Delete the live token of `user_id`
    #[tracing::instrument(skip(self))]
    pub async fn revoke(&self, user_id: UserId) -> Result<TokenRecord, AppError> {
        let record = self.store.delete_token(user_id).await?;
        tracing::info!(user_id, "token revoked");
        metrics::counter!(crate::metrics::TOKEN_REVOKED).increment(1);
        Ok(record)
    }

    /// Owner of `token`, or `NotFound` when it was never issued or is revoked
    pub async fn resolve_user(&self, token: &str) -> Result<UserId, AppError> {
        Ok(self.store.find_token(token).await?.user_id)
    }
}
