//! Invoice CRUD scoped to the authenticated owner.
//!
//! Every id-addressed operation loads the row first and then checks ownership,
//! so a foreign invoice is refused with 401 rather than hidden as 404.
use std::sync::Arc;

use conch_common::{InvoiceId, InvoiceRequest};

use crate::auth::Principal;
use crate::error::AppError;
use crate::storage::{InvoiceDraft, InvoiceRecord, Storage};
use crate::validation::{self, Field, ValidationReport};

#[derive(Clone)]
pub struct InvoiceService {
    store: Arc<dyn Storage>,
}

impl InvoiceService {
    pub fn new(store: Arc<dyn Storage>) -> Self {
        Self { store }
    }

    #[tracing::instrument(skip(self, principal, request), fields(user_id = principal.user_id))]
    pub async fn create(
        &self,
        principal: &Principal,
        request: InvoiceRequest,
    ) -> Result<InvoiceRecord, AppError> {
        validation::validate_invoice(&request).into_result()?;
        let record = self
            .store
            .insert_invoice(InvoiceDraft {
                user_id: principal.user_id,
                product: request.product,
                category: request.category,
                price: request.price,
                quantity: request.quantity,
            })
            .await?;
        tracing::info!(invoice_id = record.id, "invoice created");
        metrics::counter!(crate::metrics::INVOICE_WRITTEN).increment(1);
        Ok(record)
    }

    /// All invoices of the caller; empty when there are none
    pub async fn list(&self, principal: &Principal) -> Result<Vec<InvoiceRecord>, AppError> {
        Ok(self.store.list_invoices(principal.user_id).await?)
    }

    pub async fn get(&self, principal: &Principal, id: InvoiceId) -> Result<InvoiceRecord, AppError> {
        self.owned(principal, id).await
    }

    /// Overwrite every field (PUT)
    #[tracing::instrument(skip(self, principal, request), fields(user_id = principal.user_id))]
    pub async fn replace(
        &self,
        principal: &Principal,
        id: InvoiceId,
        request: InvoiceRequest,
    ) -> Result<InvoiceRecord, AppError> {
        let current = self.owned(principal, id).await?;
        validation::validate_invoice(&request).into_result()?;
        self.write(
            current.id,
            InvoiceDraft {
                user_id: current.user_id,
                product: request.product,
                category: request.category,
                price: request.price,
                quantity: request.quantity,
            },
        )
        .await
    }

    /// Overwrite only the supplied fields (PATCH); empty strings and zeros
    /// keep the stored values
    #[tracing::instrument(skip(self, principal, request), fields(user_id = principal.user_id))]
    pub async fn patch(
        &self,
        principal: &Principal,
        id: InvoiceId,
        request: InvoiceRequest,
    ) -> Result<InvoiceRecord, AppError> {
        let current = self.owned(principal, id).await?;

        let mut report = ValidationReport::new();
        let product =
            validation::validate_patch(Field::Product, &request.product, &current.product, &mut report)
                .to_string();
        let category = validation::validate_patch(
            Field::Category,
            &request.category,
            &current.category,
            &mut report,
        )
        .to_string();
        let price = validation::validate_price_patch(request.price, current.price, &mut report);
        let quantity = validation::validate_quantity_patch(
            request.quantity,
            i64::from(current.quantity),
            &mut report,
        );
        report.into_result()?;

        self.write(
            current.id,
            InvoiceDraft { user_id: current.user_id, product, category, price, quantity },
        )
        .await
    }

    #[tracing::instrument(skip(self, principal), fields(user_id = principal.user_id))]
    pub async fn delete(&self, principal: &Principal, id: InvoiceId) -> Result<InvoiceRecord, AppError> {
        let current = self.owned(principal, id).await?;
        let removed = self.store.delete_invoice(current.id).await?;
        tracing::info!(invoice_id = removed.id, "invoice deleted");
        Ok(removed)
    }

    async fn owned(&self, principal: &Principal, id: InvoiceId) -> Result<InvoiceRecord, AppError> {
        let record = self.store.find_invoice(id).await?;
        principal.ensure_owns(record.user_id)?;
        Ok(record)
    }

    async fn write(&self, id: InvoiceId, draft: InvoiceDraft) -> Result<InvoiceRecord, AppError> {
        let record = self.store.update_invoice(id, draft).await?;
        tracing::info!(invoice_id = record.id, "invoice updated");
        metrics::counter!(crate::metrics::INVOICE_WRITTEN).increment(1);
        Ok(record)
    }
}
