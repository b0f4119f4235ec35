//! Bulk import of phrases from CSV and XLSX spreadsheets.
//!
//! [`reader`] turns a file into candidate rows, [`dedup`] decides which of
//! them are new.

pub mod dedup;
pub mod reader;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use dedup::{ImportContext, ImportPlan, plan_import, signature, signature_of};
pub use reader::{ParsedFile, read_rows};

pub const COL_COMPANY: &str = "empresa";
pub const COL_DOCUMENT_TYPE: &str = "documento";
pub const COL_REASON: &str = "motivo";
pub const COL_CONTENT: &str = "conteudo";
pub const COL_REVIEWED_BY: &str = "revisado_por";
pub const COL_REVIEW_DATE: &str = "data_revisao";

pub const REQUIRED_COLUMNS: &[&str] = &[COL_COMPANY, COL_REASON, COL_CONTENT];

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("The file has no header row")]
    EmptyFile,

    #[error("File is larger than the {limit} byte limit")]
    FileTooLarge { limit: usize },

    #[error("Unreadable {format} file: {message}")]
    UnreadableFile {
        format: ImportFormat,
        message: String,
    },

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for ImportError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportFormat {
    #[default]
    Csv,
    Xlsx,
}

impl ImportFormat {
    /// Guesses the format from a file name, defaulting to CSV.
    #[must_use]
    pub fn from_path(path: &std::path::Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("xlsx" | "xlsm") => Self::Xlsx,
            _ => Self::Csv,
        }
    }
}

impl std::fmt::Display for ImportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv => write!(f, "CSV"),
            Self::Xlsx => write!(f, "XLSX"),
        }
    }
}

/// One data row of an import file, with cells already trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportRow {
    /// Spreadsheet row number; the header is row 1.
    pub row: usize,
    pub company: String,
    pub document_type: Option<String>,
    pub reason: String,
    pub content: String,
    pub reviewed_by: Option<String>,
    pub review_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowError {
    pub row: usize,
    pub message: String,
}

impl RowError {
    pub fn new(row: usize, message: impl Into<String>) -> Self {
        Self {
            row,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ImportFormat::from_path(Path::new("frases.XLSX")),
            ImportFormat::Xlsx
        );
        assert_eq!(
            ImportFormat::from_path(Path::new("frases.csv")),
            ImportFormat::Csv
        );
        assert_eq!(ImportFormat::from_path(Path::new("frases")), ImportFormat::Csv);
        // Legacy BIFF workbooks are not readable as XLSX
        assert_eq!(
            ImportFormat::from_path(Path::new("frases.xls")),
            ImportFormat::Csv
        );
    }

    #[test]
    fn test_missing_columns_message() {
        let err = ImportError::MissingColumns(vec!["motivo".into(), "conteudo".into()]);
        assert_eq!(err.to_string(), "Missing required columns: motivo, conteudo");
    }
}
