//! In-memory implementation of OtpRepository

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::OtpRecord;
use crate::domain::value_objects::OtpKey;
use crate::errors::DomainError;

use super::r#trait::OtpRepository;

/// Process-local passcode store
///
/// Used for development, single-instance deployments and tests. Records
/// are lost on restart.
#[derive(Clone, Default)]
pub struct InMemoryOtpRepository {
    records: Arc<RwLock<HashMap<OtpKey, OtpRecord>>>,
}

impl InMemoryOtpRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Get the record stored under a key
    pub async fn get(&self, key: &OtpKey) -> Option<OtpRecord> {
        self.records.read().await.get(key).cloned()
    }

    /// Overwrite whatever is stored under the record's key
    ///
    /// Bypasses the service; tests use it to plant expired or known records.
    pub async fn insert_raw(&self, record: OtpRecord) {
        self.records.write().await.insert(record.key(), record);
    }
}

#[async_trait]
impl OtpRepository for InMemoryOtpRepository {
    async fn save(&self, record: OtpRecord) -> Result<OtpRecord, DomainError> {
        let mut records = self.records.write().await;
        records.insert(record.key(), record.clone());
        Ok(record)
    }

    async fn find_by_identity_and_purpose(
        &self,
        identity: &str,
        purpose: &str,
    ) -> Result<Option<OtpRecord>, DomainError> {
        let records = self.records.read().await;
        Ok(records.get(&OtpKey::new(identity, purpose)).cloned())
    }

    async fn delete(&self, record: &OtpRecord) -> Result<bool, DomainError> {
        let mut records = self.records.write().await;
        let key = record.key();

        match records.get(&key) {
            Some(stored) if stored.id == record.id => {
                records.remove(&key);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
