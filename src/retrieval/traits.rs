//! Materials provider trait definitions.

use async_trait::async_trait;

use crate::model::{Credential, Criteria, MaterialRecord, SUMMARY_FIELDS};

/// Trait for remote materials databases.
#[async_trait]
pub trait MaterialsProvider: Send + Sync {
    /// Provider name for logs.
    fn name(&self) -> &str {
        "materials"
    }

    /// Fetch up to `limit` records matching `criteria`.
    ///
    /// `fields` are top-level field names the caller wants populated.
    async fn search(
        &self,
        criteria: &Criteria,
        fields: &[String],
        limit: usize,
        credential: &Credential,
    ) -> crate::error::Result<Vec<MaterialRecord>>;

    /// Check a credential with a lightweight lookup.
    ///
    /// `Ok(false)` means the service rejected it; `Err` means the check
    /// itself could not be completed.
    async fn validate_credential(&self, credential: &Credential) -> crate::error::Result<bool>;

    /// Field names this provider can return.
    fn supported_fields(&self) -> &[&str] {
        SUMMARY_FIELDS
    }
}
