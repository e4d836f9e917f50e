// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Core library of the conch account and invoice API.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod invoice;
pub mod metrics;
pub mod router;
pub mod storage;
pub mod validation;

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{AccountService, AuthRateLimiter, RequestAuthorizer, ScryptHasher, TokenService};
use crate::config::{Settings, StorageBackend, StorageSettings};
use crate::error::AppError;
use crate::invoice::InvoiceService;
use crate::storage::{FlatFileStorage, MemoryStorage, Storage};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Registration, login and deletion
    pub accounts: AccountService,
    /// Token issue and revoke
    pub tokens: TokenService,
    /// Bearer token resolution
    pub authorizer: RequestAuthorizer,
    /// Invoice CRUD
    pub invoices: InvoiceService,
    /// Failed-login lockouts
    pub rate_limiter: AuthRateLimiter,
    /// Settings the state was built from
    pub settings: Arc<Settings>,
    /// Storage backend
    pub storage: Arc<dyn Storage>,
}

impl AppState {
    /// Wire every service over `storage`
    pub fn new(storage: Arc<dyn Storage>, settings: Settings) -> Result<Self, AppError> {
        let hasher = ScryptHasher::new(settings.auth.hash_cost, settings.auth.max_password_bytes)
            .map_err(|e| AppError::Config(e.to_string()))?;
        let rate_limiter = AuthRateLimiter::new(
            settings.auth.max_failed_logins,
            Duration::from_secs(settings.auth.lockout_secs),
        );
        let tokens = TokenService::new(Arc::clone(&storage));

        Ok(Self {
            accounts: AccountService::new(
                Arc::clone(&storage),
                Arc::new(hasher),
                rate_limiter.clone(),
            ),
            authorizer: RequestAuthorizer::new(tokens.clone()),
            tokens,
            invoices: InvoiceService::new(Arc::clone(&storage)),
            rate_limiter,
            settings: Arc::new(settings),
            storage,
        })
    }

    /// Build state with the storage engine named in `settings`
    pub fn from_settings(settings: Settings) -> Result<Self, AppError> {
        let storage = open_storage(&settings.storage)?;
        Self::new(storage, settings)
    }
}

/// Open the configured storage engine
pub fn open_storage(settings: &StorageSettings) -> Result<Arc<dyn Storage>, AppError> {
    match settings.backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryStorage::new())),
        StorageBackend::FlatFile => Ok(Arc::new(FlatFileStorage::new(&settings.path)?)),
    }
}
