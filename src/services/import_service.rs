//! Domain service for bulk phrase import.

use serde::Serialize;

use crate::import::{ImportError, ImportFormat, RowError};

/// Outcome of one import run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub inserted: usize,
    pub duplicates: usize,
    pub errors: usize,
    pub dry_run: bool,
    pub duplicate_rows: Vec<usize>,
    pub error_details: Vec<RowError>,
}

#[async_trait::async_trait]
pub trait ImportService: Send + Sync {
    /// Reads `bytes`, skips rows whose signature already exists and inserts
    /// the rest one by one. Failed rows are counted and the batch continues.
    ///
    /// # Errors
    ///
    /// Fails as a whole only when the file cannot be read, lacks a required
    /// column or exceeds the size limit.
    async fn import(
        &self,
        importer: &str,
        bytes: &[u8],
        format: ImportFormat,
        dry_run: bool,
    ) -> Result<ImportSummary, ImportError>;
}
