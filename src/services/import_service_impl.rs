use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::ImportConfig;
use crate::db::Store;
use crate::import::{ImportContext, ImportError, ImportFormat, RowError, plan_import, read_rows};
use crate::services::activity::{self, ActivityLog};
use crate::services::import_service::{ImportService, ImportSummary};

pub struct DefaultImportService {
    store: Store,
    config: ImportConfig,
    activity: ActivityLog,
}

impl DefaultImportService {
    #[must_use]
    pub fn new(store: Store, config: ImportConfig) -> Self {
        let activity = ActivityLog::new(store.clone());
        Self {
            store,
            config,
            activity,
        }
    }
}

#[async_trait]
impl ImportService for DefaultImportService {
    async fn import(
        &self,
        importer: &str,
        bytes: &[u8],
        format: ImportFormat,
        dry_run: bool,
    ) -> Result<ImportSummary, ImportError> {
        if bytes.len() > self.config.max_file_bytes {
            return Err(ImportError::FileTooLarge {
                limit: self.config.max_file_bytes,
            });
        }

        let parsed = read_rows(bytes, format)?;
        let existing = self.store.list_phrases().await?;

        let ctx = ImportContext {
            importer,
            today: chrono::Local::now().date_naive(),
            default_company: &self.config.default_company,
            default_document_type: &self.config.default_document_type,
        };
        let plan = plan_import(&existing, parsed.rows, &ctx);

        let mut error_details = parsed.errors;
        error_details.extend(plan.rejected);

        let mut inserted = 0;
        if dry_run {
            inserted = plan.accepted.len();
        } else {
            for (row, phrase) in plan.accepted_rows.iter().zip(&plan.accepted) {
                match self.store.add_phrase(phrase).await {
                    Ok(_) => inserted += 1,
                    Err(e) => {
                        warn!(error = %e, row, "Failed to insert imported phrase");
                        error_details.push(RowError::new(*row, format!("Insert failed: {e}")));
                    }
                }
            }
        }

        error_details.sort_by_key(|e| e.row);

        let summary = ImportSummary {
            inserted,
            duplicates: plan.duplicate_rows.len(),
            errors: error_details.len(),
            dry_run,
            duplicate_rows: plan.duplicate_rows,
            error_details,
        };

        info!(
            importer,
            %format,
            dry_run,
            inserted = summary.inserted,
            duplicates = summary.duplicates,
            errors = summary.errors,
            "Import finished"
        );

        if !dry_run {
            self.activity
                .record(
                    importer,
                    activity::IMPORT,
                    Some(format!(
                        "{} inserted, {} duplicates, {} errors",
                        summary.inserted, summary.duplicates, summary.errors
                    )),
                )
                .await;
        }

        Ok(summary)
    }
}
