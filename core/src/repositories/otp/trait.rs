//! OTP repository trait defining the interface for passcode persistence.

use async_trait::async_trait;

use crate::domain::entities::OtpRecord;
use crate::errors::DomainError;

/// Repository trait for OtpRecord persistence operations
///
/// Records are looked up by (identity, purpose). Implementations must keep
/// at most one record per key: saving a record whose key is already taken
/// replaces the stored one.
#[async_trait]
pub trait OtpRepository: Send + Sync {
    /// Save a record, replacing any record stored under the same key
    ///
    /// # Arguments
    /// * `record` - The OtpRecord to persist
    ///
    /// # Returns
    /// * `Ok(OtpRecord)` - The saved record
    /// * `Err(DomainError)` - Save failed
    ///
    /// # Example
    /// ```no_run
    /// # use chrono::Duration;
    /// # use ot_core::repositories::OtpRepository;
    /// # use ot_core::domain::entities::OtpRecord;
    /// # async fn example(repo: &impl OtpRepository) -> Result<(), Box<dyn std::error::Error>> {
    /// let record = OtpRecord::new("a@x.com", "signup", "042391", Duration::minutes(5));
    /// let saved = repo.save(record).await?;
    /// println!("Stored passcode {}", saved.id);
    /// # Ok(())
    /// # }
    /// ```
    async fn save(&self, record: OtpRecord) -> Result<OtpRecord, DomainError>;

    /// Find the record stored for an identity and purpose
    ///
    /// Expired records are returned as well; expiry is judged by the caller.
    ///
    /// # Returns
    /// * `Ok(Some(OtpRecord))` - Record found
    /// * `Ok(None)` - No record for the key
    /// * `Err(DomainError)` - Store error occurred
    async fn find_by_identity_and_purpose(
        &self,
        identity: &str,
        purpose: &str,
    ) -> Result<Option<OtpRecord>, DomainError>;

    /// Delete a record by its id
    ///
    /// A record that was replaced in the meantime is left untouched.
    ///
    /// # Returns
    /// * `Ok(true)` - Record was deleted
    /// * `Ok(false)` - Record no longer stored
    /// * `Err(DomainError)` - Store error occurred
    async fn delete(&self, record: &OtpRecord) -> Result<bool, DomainError>;
}
