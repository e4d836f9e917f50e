// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication and authorization.

pub mod account;
pub mod authorizer;
pub mod password;
pub mod rate_limit;
pub mod token;
pub mod token_generator;

pub use account::{AccountService, LoginCredentials};
pub use authorizer::{Principal, Rejection, RequestAuthorizer};
pub use password::{CredentialHasher, HashError, ScryptHasher};
pub use rate_limit::AuthRateLimiter;
pub use token::TokenService;
