//! Text search with linked (cascading) company and document-type filters.
//!
//! Each filter's options are the distinct values of the subset left by the
//! previous stage, so every option offered yields at least one result.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::PhraseFields;
use crate::normalize::normalize_text;

/// Sentinel option meaning "no restriction".
pub const ALL_OPTION: &str = "All";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchFilter {
    #[serde(default, alias = "q")]
    pub term: Option<String>,
    pub company: Option<String>,
    pub document_type: Option<String>,
}

impl SearchFilter {
    #[must_use]
    pub fn term(term: impl Into<String>) -> Self {
        Self {
            term: Some(term.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    #[must_use]
    pub fn with_document_type(mut self, document_type: impl Into<String>) -> Self {
        self.document_type = Some(document_type.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetOptions {
    pub companies: Vec<String>,
    pub document_types: Vec<String>,
}

#[derive(Debug)]
pub struct SearchOutcome<'a, T> {
    pub results: Vec<&'a T>,
    pub facets: FacetOptions,
}

/// Case, accent and whitespace-insensitive substring match over company,
/// reason and content. A blank term matches everything.
pub fn matches_term(record: &impl PhraseFields, normalized_term: &str) -> bool {
    normalized_term.is_empty()
        || [record.company(), record.reason(), record.content()]
            .iter()
            .any(|field| normalize_text(field).contains(normalized_term))
}

pub fn linked_search<'a, T: PhraseFields>(
    records: &'a [T],
    filter: &SearchFilter,
) -> SearchOutcome<'a, T> {
    let term = filter
        .term
        .as_deref()
        .map(normalize_text)
        .unwrap_or_default();

    let text_matches: Vec<&T> = records.iter().filter(|r| matches_term(*r, &term)).collect();
    let companies = options(text_matches.iter().map(|r| r.company()));

    let by_company: Vec<&T> = match selection(filter.company.as_deref()) {
        Some(company) => text_matches
            .into_iter()
            .filter(|r| r.company().trim() == company)
            .collect(),
        None => text_matches,
    };
    let document_types = options(by_company.iter().map(|r| r.document_type()));

    let results = match selection(filter.document_type.as_deref()) {
        Some(document_type) => by_company
            .into_iter()
            .filter(|r| r.document_type().trim() == document_type)
            .collect(),
        None => by_company,
    };

    SearchOutcome {
        results,
        facets: FacetOptions {
            companies,
            document_types,
        },
    }
}

fn selection(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != ALL_OPTION)
}

/// Distinct values sorted case-insensitively, `All` first.
fn options<'v>(values: impl Iterator<Item = &'v str>) -> Vec<String> {
    let distinct: BTreeSet<&str> = values.map(str::trim).filter(|v| !v.is_empty()).collect();

    let mut sorted: Vec<&str> = distinct.into_iter().collect();
    sorted.sort_by_cached_key(|v| (normalize_text(v), (*v).to_string()));

    std::iter::once(ALL_OPTION)
        .chain(sorted)
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Phrase;

    fn phrase(id: i32, company: &str, document_type: &str, reason: &str, content: &str) -> Phrase {
        Phrase {
            id,
            company: company.to_string(),
            document_type: document_type.to_string(),
            reason: reason.to_string(),
            content: content.to_string(),
            reviewed_by: None,
            review_date: None,
            created_at: String::new(),
        }
    }

    fn sample() -> Vec<Phrase> {
        vec![
            phrase(1, "Acme", "Carta", "Boleto vencido", "Reenvie o boleto."),
            phrase(2, "Beta", "Email", "Documentos", "Falta o BOLETO pago."),
            phrase(3, "Gamma", "Carta", "Atraso", "Prazo encerrado."),
            phrase(4, "acme", "Email", "Atraso", "Sem retorno."),
            phrase(5, "Acme", "Email", "Perfil", "Perfil incompatível."),
        ]
    }

    fn ids(outcome: &SearchOutcome<'_, Phrase>) -> Vec<i32> {
        outcome.results.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_term_filters_company_reason_and_content() {
        let records = sample();
        let outcome = linked_search(&records, &SearchFilter::term("boleto"));

        assert_eq!(ids(&outcome), vec![1, 2]);
        assert_eq!(outcome.facets.companies, vec!["All", "Acme", "Beta"]);
    }

    #[test]
    fn test_empty_filter_returns_everything() {
        let records = sample();
        let outcome = linked_search(&records, &SearchFilter::default());

        assert_eq!(outcome.results.len(), records.len());
        assert_eq!(
            outcome.facets.companies,
            vec!["All", "Acme", "acme", "Beta", "Gamma"]
        );
        assert_eq!(outcome.facets.document_types, vec!["All", "Carta", "Email"]);
    }

    #[test]
    fn test_company_selection_narrows_document_types() {
        let records = sample();
        let filter = SearchFilter::default().with_company("Gamma");
        let outcome = linked_search(&records, &filter);

        assert_eq!(ids(&outcome), vec![3]);
        assert_eq!(outcome.facets.document_types, vec!["All", "Carta"]);
        // Company options still come from the text-filtered set
        assert_eq!(outcome.facets.companies.len(), 5);
    }

    #[test]
    fn test_document_type_selection() {
        let records = sample();
        let filter = SearchFilter::default()
            .with_company("Acme")
            .with_document_type("Email");
        let outcome = linked_search(&records, &filter);

        assert_eq!(ids(&outcome), vec![5]);
    }

    #[test]
    fn test_all_sentinel_means_no_restriction() {
        let records = sample();
        let filter = SearchFilter::term("atraso")
            .with_company(ALL_OPTION)
            .with_document_type(ALL_OPTION);
        let outcome = linked_search(&records, &filter);

        assert_eq!(ids(&outcome), vec![3, 4]);
    }

    #[test]
    fn test_every_company_option_yields_results() {
        let records = sample();
        for term in ["", "boleto", "atraso", "perfil", "zzz"] {
            let base = linked_search(&records, &SearchFilter::term(term));
            for company in base.facets.companies.iter().skip(1) {
                let narrowed =
                    linked_search(&records, &SearchFilter::term(term).with_company(company));
                assert!(
                    !narrowed.results.is_empty(),
                    "company {company} offered for '{term}' but yields nothing"
                );
                for document_type in narrowed.facets.document_types.iter().skip(1) {
                    let filter = SearchFilter::term(term)
                        .with_company(company)
                        .with_document_type(document_type);
                    assert!(!linked_search(&records, &filter).results.is_empty());
                }
            }
        }
    }

    #[test]
    fn test_no_matches_leaves_only_sentinel() {
        let records = sample();
        let outcome = linked_search(&records, &SearchFilter::term("inexistente"));

        assert!(outcome.results.is_empty());
        assert_eq!(outcome.facets.companies, vec![ALL_OPTION]);
        assert_eq!(outcome.facets.document_types, vec![ALL_OPTION]);
    }

    #[test]
    fn test_term_is_accent_insensitive() {
        let records = sample();
        let outcome = linked_search(&records, &SearchFilter::term("INCOMPATIVEL"));
        assert_eq!(ids(&outcome), vec![5]);
    }
}
