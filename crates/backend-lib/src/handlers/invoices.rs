//! Invoice routes.
use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use conch_common::{InvoiceId, InvoiceRequest, InvoiceResponse};

use super::{invoice_id, json_body};
use crate::auth::Principal;
use crate::error::AppError;
use crate::storage::InvoiceRecord;
use crate::AppState;

impl From<InvoiceRecord> for InvoiceResponse {
    fn from(record: InvoiceRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            product: record.product,
            category: record.category,
            price: record.price,
            quantity: record.quantity,
        }
    }
}

type IdPath = Result<Path<InvoiceId>, PathRejection>;
type InvoiceBody = Result<Json<InvoiceRequest>, JsonRejection>;

/// `POST /invoices`
pub async fn create(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    payload: InvoiceBody,
) -> Result<(StatusCode, Json<InvoiceResponse>), AppError> {
    let request = json_body(payload)?;
    let record = state.invoices.create(&principal, request).await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

/// `GET /user/invoices`
pub async fn list(
    State(state): State<Arc<AppState>>,
    principal: Principal,
) -> Result<Json<Vec<InvoiceResponse>>, AppError> {
    let records = state.invoices.list(&principal).await?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}

/// `GET /invoice/{id}`
pub async fn get(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    path: IdPath,
) -> Result<Json<InvoiceResponse>, AppError> {
    let id = invoice_id(path)?;
    Ok(Json(state.invoices.get(&principal, id).await?.into()))
}

/// `PUT /invoice/{id}`
pub async fn replace(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    path: IdPath,
    payload: InvoiceBody,
) -> Result<Json<InvoiceResponse>, AppError> {
    let id = invoice_id(path)?;
    let request = json_body(payload)?;
    Ok(Json(state.invoices.replace(&principal, id, request).await?.into()))
}

/// `PATCH /invoice/{id}`
pub async fn patch(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    path: IdPath,
    payload: InvoiceBody,
) -> Result<Json<InvoiceResponse>, AppError> {
    let id = invoice_id(path)?;
    let request = json_body(payload)?;
    Ok(Json(state.invoices.patch(&principal, id, request).await?.into()))
}

/// `DELETE /invoice/{id}`
pub async fn delete(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    path: IdPath,
) -> Result<Json<InvoiceResponse>, AppError> {
    let id = invoice_id(path)?;
    Ok(Json(state.invoices.delete(&principal, id).await?.into()))
}
