//! Text normalization shared by import de-duplication, the content uniqueness
//! check and spreadsheet column matching.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Folds case, accents and whitespace: `"  Ação   Rápida "` becomes
/// `"acao rapida"`.
#[must_use]
pub fn normalize_text(value: &str) -> String {
    let folded: String = value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Column headers also lose a leading byte-order mark, which some spreadsheet
/// tools prepend to the first header cell of a CSV export, and use `_` between
/// words so `Data Revisão` matches `data_revisao`.
#[must_use]
pub fn normalize_column_name(header: &str) -> String {
    normalize_text(header.trim_start_matches('\u{feff}')).replace(' ', "_")
}
