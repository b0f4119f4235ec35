//! `SeaORM` implementation of the `PhraseService` trait.

use async_trait::async_trait;
use tracing::info;

use crate::config::ImportConfig;
use crate::db::Store;
use crate::models::{NewPhrase, Phrase};
use crate::normalize::normalize_text;
use crate::search::{SearchFilter, linked_search};
use crate::services::activity::{self, ActivityLog};
use crate::services::phrase_service::{PhraseError, PhraseInput, PhraseSearch, PhraseService};

pub struct SeaOrmPhraseService {
    store: Store,
    defaults: ImportConfig,
    activity: ActivityLog,
}

impl SeaOrmPhraseService {
    #[must_use]
    pub fn new(store: Store, defaults: ImportConfig) -> Self {
        let activity = ActivityLog::new(store.clone());
        Self {
            store,
            defaults,
            activity,
        }
    }

    fn required(field: &str, value: &str) -> Result<String, PhraseError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(PhraseError::Validation(format!("'{field}' cannot be empty")));
        }
        Ok(value.to_string())
    }

    fn resolve(&self, actor: &str, input: PhraseInput) -> Result<NewPhrase, PhraseError> {
        let document_type = input
            .document_type
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map_or_else(|| self.defaults.default_document_type.clone(), ToString::to_string);

        let reviewed_by = input
            .reviewed_by
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(actor)
            .to_string();

        Ok(NewPhrase {
            company: Self::required("company", &input.company)?,
            document_type,
            reason: Self::required("reason", &input.reason)?,
            content: Self::required("content", &input.content)?,
            reviewed_by: Some(reviewed_by),
            review_date: Some(
                input
                    .review_date
                    .unwrap_or_else(|| chrono::Local::now().date_naive()),
            ),
        })
    }

    /// Fails if a phrase other than `exclude` has the same normalized content.
    async fn ensure_unique_content(
        &self,
        content: &str,
        exclude: Option<i32>,
    ) -> Result<(), PhraseError> {
        let wanted = normalize_text(content);
        let clash = self
            .store
            .list_phrase_contents()
            .await?
            .into_iter()
            .find(|(id, existing)| Some(*id) != exclude && normalize_text(existing) == wanted);

        match clash {
            Some((existing_id, _)) => Err(PhraseError::DuplicateContent { existing_id }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PhraseService for SeaOrmPhraseService {
    async fn search(&self, filter: &SearchFilter) -> Result<PhraseSearch, PhraseError> {
        let phrases = self.store.list_phrases().await?;
        let outcome = linked_search(&phrases, filter);

        let results: Vec<Phrase> = outcome.results.into_iter().cloned().collect();
        Ok(PhraseSearch {
            total: results.len(),
            results,
            facets: outcome.facets,
        })
    }

    async fn get(&self, id: i32) -> Result<Phrase, PhraseError> {
        self.store
            .get_phrase(id)
            .await?
            .ok_or(PhraseError::NotFound(id))
    }

    async fn list(&self) -> Result<Vec<Phrase>, PhraseError> {
        Ok(self.store.list_phrases().await?)
    }

    async fn create(&self, actor: &str, input: PhraseInput) -> Result<Phrase, PhraseError> {
        let phrase = self.resolve(actor, input)?;
        self.ensure_unique_content(&phrase.content, None).await?;

        let created = self.store.add_phrase(&phrase).await?;
        info!(id = created.id, company = %created.company, "Phrase created");
        self.activity
            .record(
                actor,
                activity::PHRASE_CREATED,
                Some(format!("#{} {}", created.id, created.company)),
            )
            .await;

        Ok(created)
    }

    async fn update(
        &self,
        actor: &str,
        id: i32,
        input: PhraseInput,
    ) -> Result<Phrase, PhraseError> {
        let phrase = self.resolve(actor, input)?;
        self.ensure_unique_content(&phrase.content, Some(id)).await?;

        let updated = self
            .store
            .update_phrase(id, &phrase)
            .await?
            .ok_or(PhraseError::NotFound(id))?;

        self.activity
            .record(actor, activity::PHRASE_UPDATED, Some(format!("#{id}")))
            .await;

        Ok(updated)
    }

    async fn delete(&self, actor: &str, id: i32) -> Result<(), PhraseError> {
        if !self.store.remove_phrase(id).await? {
            return Err(PhraseError::NotFound(id));
        }

        info!(id, deleted_by = actor, "Phrase deleted");
        self.activity
            .record(actor, activity::PHRASE_DELETED, Some(format!("#{id}")))
            .await;
        Ok(())
    }
}
