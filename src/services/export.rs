//! CSV backup of the phrase table. The columns are the import columns plus
//! `id`, so a backup can be imported back.

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::import::{
    COL_COMPANY, COL_CONTENT, COL_DOCUMENT_TYPE, COL_REASON, COL_REVIEW_DATE, COL_REVIEWED_BY,
};
use crate::models::Phrase;

pub const EXPORT_HEADERS: [&str; 7] = [
    "id",
    COL_COMPANY,
    COL_DOCUMENT_TYPE,
    COL_REASON,
    COL_CONTENT,
    COL_REVIEWED_BY,
    COL_REVIEW_DATE,
];

#[must_use]
pub fn backup_filename(date: NaiveDate) -> String {
    format!("frases_backup_{}.csv", date.format("%Y-%m-%d"))
}

pub fn phrases_to_csv(phrases: &[Phrase]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(EXPORT_HEADERS)
        .context("Failed to write CSV header")?;

    for phrase in phrases {
        let review_date = phrase
            .review_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();

        let id = phrase.id.to_string();
        writer
            .write_record([
                id.as_str(),
                phrase.company.as_str(),
                phrase.document_type.as_str(),
                phrase.reason.as_str(),
                phrase.content.as_str(),
                phrase.reviewed_by.as_deref().unwrap_or_default(),
                review_date.as_str(),
            ])
            .with_context(|| format!("Failed to write phrase {}", phrase.id))?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV writer: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::{ImportFormat, read_rows};

    fn phrase(id: i32, content: &str) -> Phrase {
        Phrase {
            id,
            company: "Acme".to_string(),
            document_type: "Carta".to_string(),
            reason: "Atraso".to_string(),
            content: content.to_string(),
            reviewed_by: Some("ana".to_string()),
            review_date: NaiveDate::from_ymd_opt(2025, 6, 30),
            created_at: String::new(),
        }
    }

    #[test]
    fn test_backup_filename() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert_eq!(backup_filename(date), "frases_backup_2026-01-05.csv");
    }

    #[test]
    fn test_csv_header_and_quoting() {
        let bytes = phrases_to_csv(&[phrase(7, "Olá, \"candidato\"")]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next(),
            Some("id,empresa,documento,motivo,conteudo,revisado_por,data_revisao")
        );
        assert_eq!(
            lines.next(),
            Some("7,Acme,Carta,Atraso,\"Olá, \"\"candidato\"\"\",ana,2025-06-30")
        );
    }

    #[test]
    fn test_backup_reads_back_as_import() {
        let bytes = phrases_to_csv(&[phrase(1, "Primeira"), phrase(2, "Segunda")]).unwrap();
        let parsed = read_rows(&bytes, ImportFormat::Csv).unwrap();

        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[1].content, "Segunda");
        assert_eq!(parsed.rows[0].review_date.as_deref(), Some("2025-06-30"));
    }
}
