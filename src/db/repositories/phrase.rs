use crate::entities::{phrases, prelude::*};
use crate::models::{NewPhrase, Phrase};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, QuerySelect, Set};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Repository for the `frases` table
pub struct PhraseRepository {
    conn: DatabaseConnection,
}

impl PhraseRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    // ========================================================================
    // Model Conversion Helpers
    // ========================================================================

    fn map_model(m: phrases::Model) -> Phrase {
        Phrase {
            id: m.id,
            company: m.company,
            document_type: m.document_type,
            reason: m.reason,
            content: m.content,
            reviewed_by: m.reviewed_by,
            review_date: m
                .review_date
                .as_deref()
                .and_then(|d| NaiveDate::parse_from_str(d, DATE_FORMAT).ok()),
            created_at: m.created_at,
        }
    }

    fn format_date(date: Option<NaiveDate>) -> Option<String> {
        date.map(|d| d.format(DATE_FORMAT).to_string())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// All phrases ordered by company, then insertion order.
    pub async fn list_all(&self) -> Result<Vec<Phrase>> {
        let rows = Phrases::find()
            .order_by_asc(phrases::Column::Company)
            .order_by_asc(phrases::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list phrases")?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn get(&self, id: i32) -> Result<Option<Phrase>> {
        let row = Phrases::find_by_id(id)
            .one(&self.conn)
            .await
            .with_context(|| format!("Failed to query phrase {id}"))?;

        Ok(row.map(Self::map_model))
    }

    /// `(id, content)` pairs, for uniqueness checks that need no other column.
    pub async fn list_contents(&self) -> Result<Vec<(i32, String)>> {
        let rows = Phrases::find()
            .select_only()
            .column(phrases::Column::Id)
            .column(phrases::Column::Content)
            .into_tuple::<(i32, String)>()
            .all(&self.conn)
            .await
            .context("Failed to list phrase contents")?;

        Ok(rows)
    }

    // ========================================================================
    // Writes
    // ========================================================================

    pub async fn insert(&self, phrase: &NewPhrase) -> Result<Phrase> {
        let active = phrases::ActiveModel {
            company: Set(phrase.company.clone()),
            document_type: Set(phrase.document_type.clone()),
            reason: Set(phrase.reason.clone()),
            content: Set(phrase.content.clone()),
            reviewed_by: Set(phrase.reviewed_by.clone()),
            review_date: Set(Self::format_date(phrase.review_date)),
            created_at: Set(chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert phrase")?;

        Ok(Self::map_model(model))
    }

    /// Overwrites every editable column. Returns `None` if the id is unknown.
    pub async fn update(&self, id: i32, phrase: &NewPhrase) -> Result<Option<Phrase>> {
        let Some(existing) = Phrases::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: phrases::ActiveModel = existing.into();
        active.company = Set(phrase.company.clone());
        active.document_type = Set(phrase.document_type.clone());
        active.reason = Set(phrase.reason.clone());
        active.content = Set(phrase.content.clone());
        active.reviewed_by = Set(phrase.reviewed_by.clone());
        active.review_date = Set(Self::format_date(phrase.review_date));

        let model = active
            .update(&self.conn)
            .await
            .with_context(|| format!("Failed to update phrase {id}"))?;

        Ok(Some(Self::map_model(model)))
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Phrases::delete_by_id(id)
            .exec(&self.conn)
            .await
            .with_context(|| format!("Failed to delete phrase {id}"))?;

        Ok(result.rows_affected > 0)
    }
}
