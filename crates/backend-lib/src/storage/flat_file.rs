//! JSON snapshot persistence on top of [`MemoryStorage`].

use std::future::Future;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use conch_common::{InvoiceId, UserId};
use tokio::{fs as tokio_fs, io::AsyncWriteExt, sync::Mutex};

use super::memory::{MemoryStorage, Tables};
use super::{
    ContactRecord, CredentialRecord, InvoiceDraft, InvoiceRecord, Storage, StoreError,
    TokenRecord, UserRecord,
};

const SNAPSHOT_FILE: &str = "conch.json";

/// Flat-file implementation of the Storage trait.
///
/// Reads are served from memory. Every successful write rewrites
/// `conch.json` under the data directory; a write that cannot be saved is
/// undone in memory as well.
#[derive(Debug, Clone)]
pub struct FlatFileStorage {
    inner: MemoryStorage,
    root: PathBuf,
    write_lock: std::sync::Arc<Mutex<()>>,
}

fn unavailable(err: impl std::fmt::Display) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

impl FlatFileStorage {
    /// Open the data directory, loading an existing snapshot if there is one
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root).map_err(unavailable)?;

        let path = root.join(SNAPSHOT_FILE);
        let tables = if path.exists() {
            let raw = std::fs::read(&path).map_err(unavailable)?;
            serde_json::from_slice::<Tables>(&raw).map_err(unavailable)?
        } else {
            Tables::default()
        };
        tracing::debug!(path = %path.display(), "opened flat-file storage");

        Ok(Self {
            inner: MemoryStorage::from_tables(tables),
            root,
            write_lock: std::sync::Arc::new(Mutex::new(())),
        })
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.root.join(SNAPSHOT_FILE)
    }

    /// Run one mutation and write the result to disk.
    ///
    /// Mutations are serialized by the write lock. When the snapshot cannot
    /// be written the in-memory tables are put back as they were, so memory
    /// never holds a row the file does not.
    async fn commit<T>(
        &self,
        mutation: impl Future<Output = Result<T, StoreError>> + Send,
    ) -> Result<T, StoreError> {
        let _guard = self.write_lock.lock().await;
        let before = self.inner.snapshot();
        let value = mutation.await?;
        if let Err(err) = self.write_snapshot().await {
            tracing::error!(error = %err, "snapshot write failed, discarding mutation");
            self.inner.restore(before);
            return Err(err);
        }
        Ok(value)
    }

    /// Write the current tables through a temporary file; callers hold the write lock
    async fn write_snapshot(&self) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(&self.inner.snapshot()).map_err(unavailable)?;

        let tmp = self.tmp_path();
        let mut file = tokio_fs::File::create(&tmp).await.map_err(unavailable)?;
        file.write_all(&json).await.map_err(unavailable)?;
        file.sync_all().await.map_err(unavailable)?;
        tokio_fs::rename(&tmp, self.snapshot_path()).await.map_err(unavailable)?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        self.root.join(format!("{SNAPSHOT_FILE}.tmp"))
    }
}

#[async_trait]
impl Storage for FlatFileStorage {
    async fn insert_user(&self, username: &str) -> Result<UserRecord, StoreError> {
        self.commit(self.inner.insert_user(username)).await
    }

    async fn find_user(&self, id: UserId) -> Result<UserRecord, StoreError> {
        self.inner.find_user(id).await
    }

    async fn find_user_by_name(&self, username: &str) -> Result<UserRecord, StoreError> {
        self.inner.find_user_by_name(username).await
    }

    async fn delete_user(&self, id: UserId) -> Result<UserRecord, StoreError> {
        self.commit(self.inner.delete_user(id)).await
    }

    async fn insert_contact(&self, contact: ContactRecord) -> Result<ContactRecord, StoreError> {
        self.commit(self.inner.insert_contact(contact)).await
    }

    async fn find_contact(&self, user_id: UserId) -> Result<ContactRecord, StoreError> {
        self.inner.find_contact(user_id).await
    }

    async fn insert_credential(
        &self,
        user_id: UserId,
        hash: Vec<u8>,
    ) -> Result<CredentialRecord, StoreError> {
        self.commit(self.inner.insert_credential(user_id, hash)).await
    }

    async fn find_credential(&self, user_id: UserId) -> Result<CredentialRecord, StoreError> {
        self.inner.find_credential(user_id).await
    }

    async fn insert_token(&self, user_id: UserId, token: &str) -> Result<TokenRecord, StoreError> {
        self.commit(self.inner.insert_token(user_id, token)).await
    }

    async fn find_token(&self, token: &str) -> Result<TokenRecord, StoreError> {
        self.inner.find_token(token).await
    }

    async fn delete_token(&self, user_id: UserId) -> Result<TokenRecord, StoreError> {
        self.commit(self.inner.delete_token(user_id)).await
    }

    async fn insert_invoice(&self, draft: InvoiceDraft) -> Result<InvoiceRecord, StoreError> {
        self.commit(self.inner.insert_invoice(draft)).await
    }

    async fn list_invoices(&self, user_id: UserId) -> Result<Vec<InvoiceRecord>, StoreError> {
        self.inner.list_invoices(user_id).await
    }

    async fn find_invoice(&self, id: InvoiceId) -> Result<InvoiceRecord, StoreError> {
        self.inner.find_invoice(id).await
    }

    async fn update_invoice(
        &self,
        id: InvoiceId,
        draft: InvoiceDraft,
    ) -> Result<InvoiceRecord, StoreError> {
        self.commit(self.inner.update_invoice(id, draft)).await
    }

    async fn delete_invoice(&self, id: InvoiceId) -> Result<InvoiceRecord, StoreError> {
        self.commit(self.inner.delete_invoice(id)).await
    }
}
