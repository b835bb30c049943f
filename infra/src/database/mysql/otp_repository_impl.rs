//! MySQL implementation of the OtpRepository trait.
//!
//! Records live in the `otp_records` table, whose unique key on
//! `(identity, purpose)` keeps at most one code per pair even when several
//! service instances share the database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use ot_core::domain::entities::OtpRecord;
use ot_core::errors::DomainError;
use ot_core::repositories::OtpRepository;

use crate::InfrastructureError;

/// MySQL implementation of OtpRepository
pub struct MySqlOtpRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlOtpRepository {
    /// Create a new MySQL passcode repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to OtpRecord entity
    fn row_to_record(row: &sqlx::mysql::MySqlRow) -> Result<OtpRecord, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| DomainError::Internal { message: format!("Failed to get id: {}", e) })?;

        Ok(OtpRecord {
            id: Uuid::parse_str(&id)
                .map_err(|e| DomainError::Internal { message: format!("Invalid record UUID: {}", e) })?,
            identity: row
                .try_get("identity")
                .map_err(|e| DomainError::Internal { message: format!("Failed to get identity: {}", e) })?,
            purpose: row
                .try_get("purpose")
                .map_err(|e| DomainError::Internal { message: format!("Failed to get purpose: {}", e) })?,
            code: row
                .try_get("code")
                .map_err(|e| DomainError::Internal { message: format!("Failed to get code: {}", e) })?,
            issued_at: row
                .try_get::<DateTime<Utc>, _>("issued_at")
                .map_err(|e| DomainError::Internal { message: format!("Failed to get issued_at: {}", e) })?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| DomainError::Internal { message: format!("Failed to get expires_at: {}", e) })?,
        })
    }
}

#[async_trait]
impl OtpRepository for MySqlOtpRepository {
    async fn save(&self, record: OtpRecord) -> Result<OtpRecord, DomainError> {
        let query = r#"
            INSERT INTO otp_records (
                id, identity, purpose, code, issued_at, expires_at
            ) VALUES (?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                id = VALUES(id),
                code = VALUES(code),
                issued_at = VALUES(issued_at),
                expires_at = VALUES(expires_at)
        "#;

        sqlx::query(query)
            .bind(record.id.to_string())
            .bind(&record.identity)
            .bind(&record.purpose)
            .bind(&record.code)
            .bind(record.issued_at)
            .bind(record.expires_at)
            .execute(&self.pool)
            .await
            .map_err(InfrastructureError::Database)?;

        tracing::debug!(record_id = %record.id, "Saved OTP record");

        Ok(record)
    }

    async fn find_by_identity_and_purpose(
        &self,
        identity: &str,
        purpose: &str,
    ) -> Result<Option<OtpRecord>, DomainError> {
        let query = r#"
            SELECT id, identity, purpose, code, issued_at, expires_at
            FROM otp_records
            WHERE identity = ? AND purpose = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(identity)
            .bind(purpose)
            .fetch_optional(&self.pool)
            .await
            .map_err(InfrastructureError::Database)?;

        match result {
            Some(row) => Ok(Some(Self::row_to_record(&row)?)),
            None => Ok(None),
        }
    }

    async fn delete(&self, record: &OtpRecord) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM otp_records WHERE id = ?")
            .bind(record.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(InfrastructureError::Database)?;

        Ok(result.rows_affected() > 0)
    }
}
