//! Account routes: register, login, logout, contact lookup, deletion.
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use conch_common::{
    AccountRequest, ContactResponse, CredentialsRequest, MessageResponse, Registered, TokenResponse,
};

use super::json_body;
use crate::auth::{LoginCredentials, Principal};
use crate::error::AppError;
use crate::AppState;

/// Decode `Authorization: Basic <base64(username:password)>`
pub fn basic_credentials(headers: &HeaderMap) -> Result<LoginCredentials, AppError> {
    let unauthorized = || AppError::Unauthorized("unauthorized: basic credentials required".into());

    let encoded = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().strip_prefix("Basic "))
        .ok_or_else(unauthorized)?;
    let decoded = STANDARD.decode(encoded.trim()).map_err(|_| unauthorized())?;
    let decoded = String::from_utf8(decoded).map_err(|_| unauthorized())?;
    let (username, password) = decoded.split_once(':').ok_or_else(unauthorized)?;
    Ok(LoginCredentials::new(username, password))
}

/// `POST /users`
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AccountRequest>, JsonRejection>,
) -> Result<Json<Registered>, AppError> {
    let account = json_body(payload)?;
    let user = state.accounts.register(account).await?;
    Ok(Json(Registered { user_id: user.id, msg: "registered".to_string() }))
}

/// `POST /login` with HTTP basic credentials; answers 202 with a bearer token
pub async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
    let credentials = basic_credentials(&headers)?;
    state.accounts.login(&credentials).await?;
    let record = state.tokens.issue(&credentials.username).await?;
    Ok((StatusCode::ACCEPTED, Json(TokenResponse { token: record.token })))
}

/// `POST /logout`
pub async fn logout(
    State(state): State<Arc<AppState>>,
    principal: Principal,
) -> Result<Json<MessageResponse>, AppError> {
    let user = state.accounts.user(principal.user_id).await?;
    state.tokens.revoke(principal.user_id).await?;
    Ok(Json(MessageResponse { message: format!("User: {} has logged out", user.username) }))
}

/// `GET /user`
pub async fn contact(
    State(state): State<Arc<AppState>>,
    principal: Principal,
) -> Result<Json<ContactResponse>, AppError> {
    let contact = state.accounts.contact(principal.user_id).await?;
    Ok(Json(ContactResponse {
        id: contact.user_id,
        fname: contact.fname,
        lname: contact.lname,
        address: contact.address,
    }))
}

/// `DELETE /users`; the body repeats the caller's username and password
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let body = json_body(payload)?;
    let credentials = LoginCredentials::new(body.username, body.password);
    let removed = state.accounts.delete_account(&principal, &credentials).await?;
    Ok(Json(MessageResponse { message: format!("User: {} has been deleted", removed.username) }))
}
