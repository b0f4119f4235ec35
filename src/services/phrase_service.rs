//! Domain service for the phrase library.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Phrase;
use crate::search::{FacetOptions, SearchFilter};

#[derive(Debug, Error)]
pub enum PhraseError {
    #[error("Phrase not found: {0}")]
    NotFound(i32),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("A phrase with the same content already exists (id {existing_id})")]
    DuplicateContent { existing_id: i32 },

    #[error("Backend unavailable: {0}")]
    Backend(String),
}

impl From<sea_orm::DbErr> for PhraseError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Backend(err.to_string())
    }
}

impl From<anyhow::Error> for PhraseError {
    fn from(err: anyhow::Error) -> Self {
        Self::Backend(err.to_string())
    }
}

/// Editable fields of a phrase. Missing reviewer and date default to the
/// acting user and today.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhraseInput {
    pub company: String,
    #[serde(default)]
    pub document_type: Option<String>,
    pub reason: String,
    pub content: String,
    #[serde(default)]
    pub reviewed_by: Option<String>,
    #[serde(default)]
    pub review_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PhraseSearch {
    pub results: Vec<Phrase>,
    pub total: usize,
    pub facets: FacetOptions,
}

#[async_trait::async_trait]
pub trait PhraseService: Send + Sync {
    /// Text search with linked company and document-type facets.
    async fn search(&self, filter: &SearchFilter) -> Result<PhraseSearch, PhraseError>;

    async fn get(&self, id: i32) -> Result<Phrase, PhraseError>;

    /// All phrases ordered by company.
    async fn list(&self) -> Result<Vec<Phrase>, PhraseError>;

    /// # Errors
    ///
    /// Returns [`PhraseError::DuplicateContent`] if another phrase has the
    /// same normalized content.
    async fn create(&self, actor: &str, input: PhraseInput) -> Result<Phrase, PhraseError>;

    async fn update(&self, actor: &str, id: i32, input: PhraseInput)
    -> Result<Phrase, PhraseError>;

    async fn delete(&self, actor: &str, id: i32) -> Result<(), PhraseError>;
}
