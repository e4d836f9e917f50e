// ================
// common/src/lib.rs
// ================
//! Wire types shared between the conch HTTP API and its clients.
//! Every request and response body the server speaks is defined here.

use serde::{Deserialize, Serialize};

/// Identifier of a registered user
pub type UserId = i64;

/// Identifier of a stored invoice
pub type InvoiceId = i64;

/// Body of `POST /users`
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct AccountRequest {
    pub fname: String,
    pub lname: String,
    pub address: String,
    pub username: String,
    pub password: String,
}

/// Successful registration
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Registered {
    /// Id assigned to the new account
    pub user_id: UserId,
    /// Always `"registered"`
    pub msg: String,
}

/// Username/password pair, used to confirm account deletion
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

/// Body of `POST /login` on success
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TokenResponse {
    /// 40 lowercase hex characters
    pub token: String,
}

/// Plain confirmation message
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

/// Contact details of the authenticated user
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ContactResponse {
    pub id: UserId,
    pub fname: String,
    pub lname: String,
    pub address: String,
}

/// Body of invoice create/replace/patch requests.
///
/// On a patch, an empty string or a zero keeps the stored value.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct InvoiceRequest {
    #[serde(default)]
    pub product: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub quantity: i64,
}

/// An invoice as returned by the API
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InvoiceResponse {
    pub id: InvoiceId,
    pub user_id: UserId,
    pub product: String,
    pub category: String,
    pub price: f64,
    pub quantity: i32,
}

/// Failure body returned for every non-2xx response
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    /// HTTP status code, repeated in the body
    pub status: u16,
    /// Every message collected while handling the request, in order
    pub messages: Vec<String>,
}
