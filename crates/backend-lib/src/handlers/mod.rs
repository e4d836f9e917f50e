//! HTTP handlers.

pub mod accounts;
pub mod invoices;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Json, Path};
use conch_common::InvoiceId;

use crate::error::AppError;

/// Unwrap a JSON body, reporting parse failures as a 400
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::InvalidInput(format!("Binding Error: {}", rejection.body_text())))
}

/// Unwrap the `{id}` path segment of invoice routes
pub(crate) fn invoice_id(path: Result<Path<InvoiceId>, PathRejection>) -> Result<InvoiceId, AppError> {
    path.map(|Path(id)| id).map_err(|_| {
        AppError::InvalidInput("Bad Request: invoice id can't be converted to an integer".into())
    })
}
