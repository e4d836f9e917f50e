// ============================
// crates/backend-lib/src/storage.rs
// ============================
//! Storage abstraction with in-memory and flat-file implementations.
//!
//! The tables mirror a relational layout: usernames, contacts, credentials,
//! tokens and invoices, all keyed by the owning user id. Deleting a user
//! cascades to every dependent row.
use std::fmt;

use async_trait::async_trait;
use conch_common::{InvoiceId, UserId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::AppError;

mod flat_file;
mod memory;

pub use flat_file::FlatFileStorage;
pub use memory::MemoryStorage;

/// Longest text value any column accepts
pub const MAX_VARCHAR: usize = 255;

/// Largest absolute price the price column holds (two decimals)
pub const MAX_PRICE: f64 = 999.99;

/// A registered username
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub username: String,
}

/// Contact details, one row per user
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ContactRecord {
    pub user_id: UserId,
    pub fname: String,
    pub lname: String,
    pub address: String,
}

/// Stored password hash, one row per user
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub user_id: UserId,
    pub hash: Vec<u8>,
}

/// Live bearer token, at most one per user
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    pub user_id: UserId,
    pub token: String,
}

/// Stored invoice
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InvoiceRecord {
    pub id: InvoiceId,
    pub user_id: UserId,
    pub product: String,
    pub category: String,
    pub price: f64,
    pub quantity: i32,
}

/// Invoice values before the store has checked their ranges
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceDraft {
    pub user_id: UserId,
    pub product: String,
    pub category: String,
    pub price: f64,
    pub quantity: i64,
}

/// Numeric column whose range was exceeded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericColumn {
    Price,
    Quantity,
}

impl fmt::Display for NumericColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericColumn::Price => {
                f.write_str("numeric field overflow, provide a value between 1.00 - 999.99")
            },
            NumericColumn::Quantity => {
                f.write_str("integer overflow, value must be between 1 - 2147483647")
            },
        }
    }
}

/// Typed persistence failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write
    #[error("duplicate {0}")]
    Conflict(&'static str),

    /// No row matched the key
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("varchar too long, use varchar length between 1-255")]
    ValueTooLong(&'static str),

    #[error("{0}")]
    OutOfRange(NumericColumn),

    /// The backing medium failed
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(what) => AppError::Conflict(format!("Error: duplicate {what}")),
            StoreError::NotFound(what) => {
                AppError::NotFound(format!("Resource Not Found: {what} does not exist"))
            },
            err @ (StoreError::ValueTooLong(_) | StoreError::OutOfRange(_)) => {
                AppError::InvalidInput(err.to_string())
            },
            StoreError::Unavailable(msg) => AppError::Internal(msg),
        }
    }
}

/// Trait for storage backends
#[async_trait]
pub trait Storage: Send + Sync {
    /// Reserve a username; fails with `Conflict` when it is taken
    async fn insert_user(&self, username: &str) -> Result<UserRecord, StoreError>;

    async fn find_user(&self, id: UserId) -> Result<UserRecord, StoreError>;

    async fn find_user_by_name(&self, username: &str) -> Result<UserRecord, StoreError>;

    /// Delete a user and every row that references it
    async fn delete_user(&self, id: UserId) -> Result<UserRecord, StoreError>;

    async fn insert_contact(&self, contact: ContactRecord) -> Result<ContactRecord, StoreError>;

    async fn find_contact(&self, user_id: UserId) -> Result<ContactRecord, StoreError>;

    async fn insert_credential(
        &self,
        user_id: UserId,
        hash: Vec<u8>,
    ) -> Result<CredentialRecord, StoreError>;

    async fn find_credential(&self, user_id: UserId) -> Result<CredentialRecord, StoreError>;

    /// Store a token; fails with `Conflict` while the user already has one
    async fn insert_token(&self, user_id: UserId, token: &str) -> Result<TokenRecord, StoreError>;

    async fn find_token(&self, token: &str) -> Result<TokenRecord, StoreError>;

    async fn delete_token(&self, user_id: UserId) -> Result<TokenRecord, StoreError>;

    async fn insert_invoice(&self, draft: InvoiceDraft) -> Result<InvoiceRecord, StoreError>;

    /// Every invoice of `user_id`, ordered by id; empty when there are none
    async fn list_invoices(&self, user_id: UserId) -> Result<Vec<InvoiceRecord>, StoreError>;

    async fn find_invoice(&self, id: InvoiceId) -> Result<InvoiceRecord, StoreError>;

    async fn update_invoice(
        &self,
        id: InvoiceId,
        draft: InvoiceDraft,
    ) -> Result<InvoiceRecord, StoreError>;

    async fn delete_invoice(&self, id: InvoiceId) -> Result<InvoiceRecord, StoreError>;
}
