use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phrase {
    pub id: i32,
    pub company: String,
    pub document_type: String,
    pub reason: String,
    pub content: String,
    pub reviewed_by: Option<String>,
    pub review_date: Option<NaiveDate>,
    pub created_at: String,
}

/// A phrase that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPhrase {
    pub company: String,
    pub document_type: String,
    pub reason: String,
    pub content: String,
    pub reviewed_by: Option<String>,
    pub review_date: Option<NaiveDate>,
}

/// Anything that can be matched against a company/reason/content triple.
pub trait PhraseFields {
    fn company(&self) -> &str;
    fn document_type(&self) -> &str;
    fn reason(&self) -> &str;
    fn content(&self) -> &str;
}

impl PhraseFields for Phrase {
    fn company(&self) -> &str {
        &self.company
    }

    fn document_type(&self) -> &str {
        &self.document_type
    }

    fn reason(&self) -> &str {
        &self.reason
    }

    fn content(&self) -> &str {
        &self.content
    }
}

impl PhraseFields for NewPhrase {
    fn company(&self) -> &str {
        &self.company
    }

    fn document_type(&self) -> &str {
        &self.document_type
    }

    fn reason(&self) -> &str {
        &self.reason
    }

    fn content(&self) -> &str {
        &self.content
    }
}
