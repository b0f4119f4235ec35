use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashSet;

use super::{ImportRow, RowError};
use crate::models::{NewPhrase, PhraseFields};
use crate::normalize::normalize_text;

const SIGNATURE_SEPARATOR: &str = "|";

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%d/%m/%Y %H:%M"];

/// De-duplication key of a record: normalized company, reason and content.
#[must_use]
pub fn signature(company: &str, reason: &str, content: &str) -> String {
    [
        normalize_text(company),
        normalize_text(reason),
        normalize_text(content),
    ]
    .join(SIGNATURE_SEPARATOR)
}

#[must_use]
pub fn signature_of(record: &impl PhraseFields) -> String {
    signature(record.company(), record.reason(), record.content())
}

/// Who is importing and what to fill in for missing values.
#[derive(Debug, Clone)]
pub struct ImportContext<'a> {
    pub importer: &'a str,
    pub today: NaiveDate,
    pub default_company: &'a str,
    pub default_document_type: &'a str,
}

#[derive(Debug, Default)]
pub struct ImportPlan {
    /// New records, in file order.
    pub accepted: Vec<NewPhrase>,

    /// Row number of each entry of `accepted`.
    pub accepted_rows: Vec<usize>,

    /// Row numbers skipped because their signature or content already existed.
    pub duplicate_rows: Vec<usize>,

    pub rejected: Vec<RowError>,
}

impl ImportPlan {
    #[must_use]
    pub fn duplicates(&self) -> usize {
        self.duplicate_rows.len()
    }
}

/// Splits candidate rows into new records, duplicates and rejects.
///
/// A row is a duplicate when its signature, or its normalized content alone,
/// matches an existing record or an earlier row of the same batch. Rows with
/// blank content are rejected.
pub fn plan_import<'a, E>(
    existing: impl IntoIterator<Item = &'a E>,
    candidates: Vec<ImportRow>,
    ctx: &ImportContext<'_>,
) -> ImportPlan
where
    E: PhraseFields + 'a,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut seen_contents: HashSet<String> = HashSet::new();
    for record in existing {
        seen.insert(signature_of(record));
        seen_contents.insert(normalize_text(record.content()));
    }
    let mut plan = ImportPlan::default();

    for row in candidates {
        if row.content.trim().is_empty() {
            plan.rejected
                .push(RowError::new(row.row, "Column 'conteudo' is empty"));
            continue;
        }

        let row_number = row.row;
        let record = resolve_row(row, ctx);
        let content_key = normalize_text(&record.content);
        if seen_contents.contains(&content_key) || !seen.insert(signature_of(&record)) {
            plan.duplicate_rows.push(row_number);
        } else {
            seen_contents.insert(content_key);
            plan.accepted.push(record);
            plan.accepted_rows.push(row_number);
        }
    }

    plan
}

fn resolve_row(row: ImportRow, ctx: &ImportContext<'_>) -> NewPhrase {
    let company = if row.company.is_empty() {
        ctx.default_company.to_string()
    } else {
        row.company
    };

    NewPhrase {
        company,
        document_type: row
            .document_type
            .unwrap_or_else(|| ctx.default_document_type.to_string()),
        reason: row.reason,
        content: row.content,
        reviewed_by: Some(
            row.reviewed_by
                .unwrap_or_else(|| ctx.importer.to_string()),
        ),
        review_date: Some(
            row.review_date
                .as_deref()
                .and_then(parse_review_date)
                .unwrap_or(ctx.today),
        ),
    }
}

/// Parses the date formats seen in exported spreadsheets.
#[must_use]
pub fn parse_review_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Phrase;

    fn ctx() -> ImportContext<'static> {
        ImportContext {
            importer: "ana",
            today: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            default_company: "Geral",
            default_document_type: "Geral",
        }
    }

    fn existing(company: &str, reason: &str, content: &str) -> Phrase {
        Phrase {
            id: 1,
            company: company.to_string(),
            document_type: "Geral".to_string(),
            reason: reason.to_string(),
            content: content.to_string(),
            reviewed_by: None,
            review_date: None,
            created_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    fn row(n: usize, company: &str, reason: &str, content: &str) -> ImportRow {
        ImportRow {
            row: n,
            company: company.to_string(),
            reason: reason.to_string(),
            content: content.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_signature_ignores_case_and_whitespace() {
        assert_eq!(
            signature(" Acme ", "Late", "Hello"),
            signature("acme", "late", "hello")
        );
        assert_ne!(
            signature("acme", "late", "hello"),
            signature("acme", "late", "hello world")
        );
    }

    #[test]
    fn test_signature_fields_do_not_bleed() {
        assert_ne!(signature("a b", "c", "d"), signature("a", "b c", "d"));
    }

    #[test]
    fn test_existing_duplicate_is_skipped() {
        let stored = [existing("Acme", "Late Docs", "Please resend.")];
        let rows = vec![row(2, "ACME", "late docs", " please resend. ")];

        let plan = plan_import(&stored, rows, &ctx());

        assert!(plan.accepted.is_empty());
        assert_eq!(plan.duplicates(), 1);
        assert_eq!(plan.duplicate_rows, vec![2]);
    }

    #[test]
    fn test_duplicate_within_batch() {
        let stored: [Phrase; 0] = [];
        let rows = vec![
            row(2, "Acme", "Atraso", "Reenvie o documento."),
            row(3, "acme", "ATRASO", "reenvie o documento."),
        ];

        let plan = plan_import(&stored, rows, &ctx());

        assert_eq!(plan.accepted.len(), 1);
        assert_eq!(plan.accepted_rows, vec![2]);
        assert_eq!(plan.duplicate_rows, vec![3]);
    }

    #[test]
    fn test_same_content_under_other_company_is_duplicate() {
        let stored = [existing("Acme", "Atraso", "Reenvie o documento.")];
        let rows = vec![
            row(2, "Beta", "Outro", "reenvie o documento."),
            row(3, "Gamma", "Perfil", "Texto novo."),
            row(4, "Delta", "Prazo", "TEXTO  novo."),
        ];

        let plan = plan_import(&stored, rows, &ctx());

        assert_eq!(plan.accepted_rows, vec![3]);
        assert_eq!(plan.duplicate_rows, vec![2, 4]);
    }

    #[test]
    fn test_accent_folding_matches_existing() {
        let stored = [existing("Gupy", "Documentação", "Não recebemos.")];
        let rows = vec![row(2, "gupy", "documentacao", "nao recebemos.")];

        let plan = plan_import(&stored, rows, &ctx());
        assert_eq!(plan.duplicates(), 1);
    }

    #[test]
    fn test_empty_content_rejected() {
        let stored: [Phrase; 0] = [];
        let rows = vec![row(2, "Acme", "Atraso", "   "), row(3, "Acme", "Atraso", "ok")];

        let plan = plan_import(&stored, rows, &ctx());

        assert_eq!(plan.accepted.len(), 1);
        assert_eq!(plan.rejected.len(), 1);
        assert_eq!(plan.rejected[0].row, 2);
    }

    #[test]
    fn test_defaults_for_missing_values() {
        let stored: [Phrase; 0] = [];
        let plan = plan_import(&stored, vec![row(2, "", "Atraso", "Texto")], &ctx());

        let record = &plan.accepted[0];
        assert_eq!(record.company, "Geral");
        assert_eq!(record.document_type, "Geral");
        assert_eq!(record.reviewed_by.as_deref(), Some("ana"));
        assert_eq!(record.review_date, NaiveDate::from_ymd_opt(2026, 3, 1));
    }

    #[test]
    fn test_explicit_reviewer_and_date_override() {
        let stored: [Phrase; 0] = [];
        let mut candidate = row(2, "Acme", "Atraso", "Texto");
        candidate.reviewed_by = Some("joao".to_string());
        candidate.review_date = Some("15/02/2025".to_string());
        candidate.document_type = Some("Carta".to_string());

        let plan = plan_import(&stored, vec![candidate], &ctx());

        let record = &plan.accepted[0];
        assert_eq!(record.reviewed_by.as_deref(), Some("joao"));
        assert_eq!(record.review_date, NaiveDate::from_ymd_opt(2025, 2, 15));
        assert_eq!(record.document_type, "Carta");
    }

    #[test]
    fn test_unparseable_date_falls_back_to_today() {
        let stored: [Phrase; 0] = [];
        let mut candidate = row(2, "Acme", "Atraso", "Texto");
        candidate.review_date = Some("ontem".to_string());

        let plan = plan_import(&stored, vec![candidate], &ctx());
        assert_eq!(
            plan.accepted[0].review_date,
            NaiveDate::from_ymd_opt(2026, 3, 1)
        );
    }

    #[test]
    fn test_parse_review_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 1);
        assert_eq!(parse_review_date("2024-05-01"), expected);
        assert_eq!(parse_review_date("01/05/2024"), expected);
        assert_eq!(parse_review_date("2024-05-01 13:45:00"), expected);
        assert_eq!(parse_review_date(" 2024-05-01T08:00:00 "), expected);
        assert_eq!(parse_review_date(""), None);
        assert_eq!(parse_review_date("31/02/2024"), None);
    }
}
