// ============================
// crates/backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use scrypt::{
    password_hash::{self, rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Params, Scrypt,
};
use thiserror::Error;

use crate::error::AppError;

/// Default scrypt cost, as log2 of the iteration count
pub const DEFAULT_HASH_COST: u8 = 15;

/// Longest password, in bytes, the hasher accepts
pub const DEFAULT_MAX_PASSWORD_BYTES: usize = 72;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HashError {
    #[error("Hashing Error: password longer than {0} bytes, can't hash")]
    InputTooLong(usize),

    #[error("Hashing Error: invalid cost parameters: {0}")]
    Params(String),

    #[error("Hashing Error: stored hash is malformed: {0}")]
    Malformed(String),
}

impl From<HashError> for AppError {
    fn from(err: HashError) -> Self {
        match err {
            HashError::Malformed(_) => AppError::Internal(err.to_string()),
            other => AppError::Hashing(other.to_string()),
        }
    }
}

/// Salted, adaptive one-way hash over user passwords
pub trait CredentialHasher: Send + Sync {
    /// Hash `plain`; the output is opaque bytes safe to store
    fn hash(&self, plain: &str) -> Result<Vec<u8>, HashError>;

    /// Constant-time comparison of `plain` against a stored hash
    fn verify(&self, plain: &str, stored: &[u8]) -> Result<bool, HashError>;
}

/// scrypt hasher storing PHC strings
#[derive(Debug, Clone)]
pub struct ScryptHasher {
    params: Params,
    max_input: usize,
}

impl ScryptHasher {
    /// Build a hasher with cost `log_n` and an input cap of `max_input` bytes
    pub fn new(log_n: u8, max_input: usize) -> Result<Self, HashError> {
        let params = Params::new(log_n, 8, 1, Params::RECOMMENDED_LEN)
            .map_err(|e| HashError::Params(e.to_string()))?;
        Ok(Self { params, max_input })
    }

    pub fn with_cost(log_n: u8) -> Result<Self, HashError> {
        Self::new(log_n, DEFAULT_MAX_PASSWORD_BYTES)
    }
}

impl CredentialHasher for ScryptHasher {
    fn hash(&self, plain: &str) -> Result<Vec<u8>, HashError> {
        if plain.len() > self.max_input {
            return Err(HashError::InputTooLong(self.max_input));
        }
        let salt = SaltString::generate(&mut OsRng);
        let hash = Scrypt
            .hash_password_customized(plain.as_bytes(), None, None, self.params, &salt)
            .map_err(|e| HashError::Params(e.to_string()))?;
        Ok(hash.to_string().into_bytes())
    }

    fn verify(&self, plain: &str, stored: &[u8]) -> Result<bool, HashError> {
        let stored =
            std::str::from_utf8(stored).map_err(|e| HashError::Malformed(e.to_string()))?;
        let parsed = PasswordHash::new(stored).map_err(|e| HashError::Malformed(e.to_string()))?;
        match Scrypt.verify_password(plain.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(HashError::Malformed(e.to_string())),
        }
    }
}
