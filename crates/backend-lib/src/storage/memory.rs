//! In-memory tables behind a single lock.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use conch_common::{InvoiceId, UserId};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::{
    ContactRecord, CredentialRecord, InvoiceDraft, InvoiceRecord, NumericColumn, Storage,
    StoreError, TokenRecord, UserRecord, MAX_PRICE, MAX_VARCHAR,
};

/// Every table, serializable as one snapshot
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub(crate) struct Tables {
    last_user_id: UserId,
    last_invoice_id: InvoiceId,
    users: BTreeMap<UserId, UserRecord>,
    contacts: BTreeMap<UserId, ContactRecord>,
    credentials: BTreeMap<UserId, CredentialRecord>,
    tokens: BTreeMap<UserId, TokenRecord>,
    invoices: BTreeMap<InvoiceId, InvoiceRecord>,
}

/// Storage engine keeping all rows in process memory.
///
/// Constraint checks and writes run under one write guard, so two concurrent
/// inserts can never both pass a uniqueness check.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    tables: Arc<RwLock<Tables>>,
}

fn check_varchar(column: &'static str, value: &str) -> Result<(), StoreError> {
    if value.chars().count() > MAX_VARCHAR {
        return Err(StoreError::ValueTooLong(column));
    }
    Ok(())
}

/// Range-check a draft and convert it to column types
fn checked_columns(draft: &InvoiceDraft) -> Result<(f64, i32), StoreError> {
    check_varchar("product", &draft.product)?;
    check_varchar("category", &draft.category)?;
    let price = (draft.price * 100.0).round() / 100.0;
    if !price.is_finite() || price.abs() > MAX_PRICE {
        return Err(StoreError::OutOfRange(NumericColumn::Price));
    }
    let quantity =
        i32::try_from(draft.quantity).map_err(|_| StoreError::OutOfRange(NumericColumn::Quantity))?;
    Ok((price, quantity))
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_tables(tables: Tables) -> Self {
        Self { tables: Arc::new(RwLock::new(tables)) }
    }

    /// Copy of every table
    pub(crate) fn snapshot(&self) -> Tables {
        self.tables.read().clone()
    }

    /// Replace every table with `tables`
    pub(crate) fn restore(&self, tables: Tables) {
        *self.tables.write() = tables;
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn insert_user(&self, username: &str) -> Result<UserRecord, StoreError> {
        check_varchar("username", username)?;
        let mut tables = self.tables.write();
        if tables.users.values().any(|u| u.username == username) {
            return Err(StoreError::Conflict("username"));
        }
        tables.last_user_id += 1;
        let user = UserRecord { id: tables.last_user_id, username: username.to_string() };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: UserId) -> Result<UserRecord, StoreError> {
        self.tables.read().users.get(&id).cloned().ok_or(StoreError::NotFound("user"))
    }

    async fn find_user_by_name(&self, username: &str) -> Result<UserRecord, StoreError> {
        self.tables
            .read()
            .users
            .values()
            .find(|u| u.username == username)
            .cloned()
            .ok_or(StoreError::NotFound("user"))
    }

    async fn delete_user(&self, id: UserId) -> Result<UserRecord, StoreError> {
        let mut tables = self.tables.write();
        let user = tables.users.remove(&id).ok_or(StoreError::NotFound("user"))?;
        tables.contacts.remove(&id);
        tables.credentials.remove(&id);
        tables.tokens.remove(&id);
        tables.invoices.retain(|_, inv| inv.user_id != id);
        Ok(user)
    }

    async fn insert_contact(&self, contact: ContactRecord) -> Result<ContactRecord, StoreError> {
        check_varchar("fname", &contact.fname)?;
        check_varchar("lname", &contact.lname)?;
        check_varchar("address", &contact.address)?;
        let mut tables = self.tables.write();
        if !tables.users.contains_key(&contact.user_id) {
            return Err(StoreError::NotFound("user"));
        }
        if tables.contacts.contains_key(&contact.user_id) {
            return Err(StoreError::Conflict("contact"));
        }
        tables.contacts.insert(contact.user_id, contact.clone());
        Ok(contact)
    }

    async fn find_contact(&self, user_id: UserId) -> Result<ContactRecord, StoreError> {
        self.tables
            .read()
            .contacts
            .get(&user_id)
            .cloned()
            .ok_or(StoreError::NotFound("contact"))
    }

    async fn insert_credential(
        &self,
        user_id: UserId,
        hash: Vec<u8>,
    ) -> Result<CredentialRecord, StoreError> {
        let mut tables = self.tables.write();
        if !tables.users.contains_key(&user_id) {
            return Err(StoreError::NotFound("user"));
        }
        if tables.credentials.contains_key(&user_id) {
            return Err(StoreError::Conflict("credential"));
        }
        let record = CredentialRecord { user_id, hash };
        tables.credentials.insert(user_id, record.clone());
        Ok(record)
    }

    async fn find_credential(&self, user_id: UserId) -> Result<CredentialRecord, StoreError> {
        self.tables
            .read()
            .credentials
            .get(&user_id)
            .cloned()
            .ok_or(StoreError::NotFound("credential"))
    }

    async fn insert_token(&self, user_id: UserId, token: &str) -> Result<TokenRecord, StoreError> {
        let mut tables = self.tables.write();
        if !tables.users.contains_key(&user_id) {
            return Err(StoreError::NotFound("user"));
        }
        if tables.tokens.contains_key(&user_id) {
            return Err(StoreError::Conflict("token"));
        }
        let record = TokenRecord { user_id, token: token.to_string() };
        tables.tokens.insert(user_id, record.clone());
        Ok(record)
    }

    async fn find_token(&self, token: &str) -> Result<TokenRecord, StoreError> {
        self.tables
            .read()
            .tokens
            .values()
            .find(|t| t.token == token)
            .cloned()
            .ok_or(StoreError::NotFound("token"))
    }

    async fn delete_token(&self, user_id: UserId) -> Result<TokenRecord, StoreError> {
        self.tables.write().tokens.remove(&user_id).ok_or(StoreError::NotFound("token"))
    }

    async fn insert_invoice(&self, draft: InvoiceDraft) -> Result<InvoiceRecord, StoreError> {
        let (price, quantity) = checked_columns(&draft)?;
        let mut tables = self.tables.write();
        if !tables.users.contains_key(&draft.user_id) {
            return Err(StoreError::NotFound("user"));
        }
        tables.last_invoice_id += 1;
        let record = InvoiceRecord {
            id: tables.last_invoice_id,
            user_id: draft.user_id,
            product: draft.product,
            category: draft.category,
            price,
            quantity,
        };
        tables.invoices.insert(record.id, record.clone());
        Ok(record)
    }

    async fn list_invoices(&self, user_id: UserId) -> Result<Vec<InvoiceRecord>, StoreError> {
        Ok(self
            .tables
            .read()
            .invoices
            .values()
            .filter(|inv| inv.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_invoice(&self, id: InvoiceId) -> Result<InvoiceRecord, StoreError> {
        self.tables.read().invoices.get(&id).cloned().ok_or(StoreError::NotFound("invoice"))
    }

    async fn update_invoice(
        &self,
        id: InvoiceId,
        draft: InvoiceDraft,
    ) -> Result<InvoiceRecord, StoreError> {
        let (price, quantity) = checked_columns(&draft)?;
        let mut tables = self.tables.write();
        let record = tables.invoices.get_mut(&id).ok_or(StoreError::NotFound("invoice"))?;
        record.product = draft.product;
        record.category = draft.category;
        record.price = price;
        record.quantity = quantity;
        Ok(record.clone())
    }

    async fn delete_invoice(&self, id: InvoiceId) -> Result<InvoiceRecord, StoreError> {
        self.tables.write().invoices.remove(&id).ok_or(StoreError::NotFound("invoice"))
    }
}
