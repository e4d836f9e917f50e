// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const ACCOUNT_REGISTERED: &str = "account.registered";
pub const ACCOUNT_DELETED: &str = "account.deleted";
pub const REGISTRATION_ROLLBACK: &str = "account.registration_rollback";
pub const LOGIN_SUCCESS: &str = "login.success";
pub const LOGIN_FAILURE: &str = "login.failure";
pub const LOGIN_LOCKOUT: &str = "login.lockout";
pub const TOKEN_ISSUED: &str = "token.issued";
pub const TOKEN_REVOKED: &str = "token.revoked";
pub const AUTH_REJECTED: &str = "auth.rejected";
pub const INVOICE_WRITTEN: &str = "invoice.written";
