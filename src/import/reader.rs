use calamine::{Data, DataType, Reader, Xlsx, open_workbook_from_rs};
use std::io::Cursor;

use super::{
    COL_COMPANY, COL_CONTENT, COL_DOCUMENT_TYPE, COL_REASON, COL_REVIEW_DATE, COL_REVIEWED_BY,
    ImportError, ImportFormat, ImportRow, REQUIRED_COLUMNS, RowError,
};
use crate::normalize::normalize_column_name;

/// Rows decoded from an import file. Rows that could not be decoded are kept
/// as errors so the batch can continue.
#[derive(Debug, Default)]
pub struct ParsedFile {
    pub rows: Vec<ImportRow>,
    pub errors: Vec<RowError>,
}

pub fn read_rows(bytes: &[u8], format: ImportFormat) -> Result<ParsedFile, ImportError> {
    match format {
        ImportFormat::Csv => read_csv(bytes),
        ImportFormat::Xlsx => read_xlsx(bytes),
    }
}

/// Positions of the known columns in the header row.
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    company: usize,
    document_type: Option<usize>,
    reason: usize,
    content: usize,
    reviewed_by: Option<usize>,
    review_date: Option<usize>,
}

impl ColumnMap {
    fn from_headers<S: AsRef<str>>(headers: &[S]) -> Result<Self, ImportError> {
        let names: Vec<String> = headers
            .iter()
            .map(|h| normalize_column_name(h.as_ref()))
            .collect();
        let find = |name: &str| names.iter().position(|n| n == name);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|col| find(col).is_none())
            .map(|col| (*col).to_string())
            .collect();

        match (find(COL_COMPANY), find(COL_REASON), find(COL_CONTENT)) {
            (Some(company), Some(reason), Some(content)) => Ok(Self {
                company,
                document_type: find(COL_DOCUMENT_TYPE),
                reason,
                content,
                reviewed_by: find(COL_REVIEWED_BY),
                review_date: find(COL_REVIEW_DATE),
            }),
            _ => Err(ImportError::MissingColumns(missing)),
        }
    }

    fn extract<'a>(&self, row: usize, cell: impl Fn(usize) -> Option<&'a str>) -> ImportRow {
        let text = |index: usize| cell(index).map(str::trim).unwrap_or_default().to_string();
        let optional = |index: Option<usize>| {
            index
                .and_then(&cell)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(ToString::to_string)
        };

        ImportRow {
            row,
            company: text(self.company),
            document_type: optional(self.document_type),
            reason: text(self.reason),
            content: text(self.content),
            reviewed_by: optional(self.reviewed_by),
            review_date: optional(self.review_date),
        }
    }
}

/// Spreadsheet tools in pt-BR locales export with `;`.
fn sniff_delimiter(bytes: &[u8]) -> u8 {
    let header = bytes.split(|b| *b == b'\n').next().unwrap_or_default();
    let semicolons = header.iter().filter(|b| **b == b';').count();
    let commas = header.iter().filter(|b| **b == b',').count();

    if semicolons > commas { b';' } else { b',' }
}

fn read_csv(bytes: &[u8]) -> Result<ParsedFile, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(sniff_delimiter(bytes))
        .flexible(true)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| ImportError::UnreadableFile {
            format: ImportFormat::Csv,
            message: e.to_string(),
        })?
        .clone();

    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(ImportError::EmptyFile);
    }

    let header_cells: Vec<&str> = headers.iter().collect();
    let columns = ColumnMap::from_headers(&header_cells)?;

    let mut parsed = ParsedFile::default();
    for (index, record) in reader.records().enumerate() {
        let row = index + 2;
        match record {
            Ok(record) => {
                if record.iter().all(|cell| cell.trim().is_empty()) {
                    continue;
                }
                parsed.rows.push(columns.extract(row, |i| record.get(i)));
            }
            Err(e) => parsed.errors.push(RowError::new(row, e.to_string())),
        }
    }

    Ok(parsed)
}

fn read_xlsx(bytes: &[u8]) -> Result<ParsedFile, ImportError> {
    let unreadable = |message: String| ImportError::UnreadableFile {
        format: ImportFormat::Xlsx,
        message,
    };

    let mut workbook = open_workbook_from_rs::<Xlsx<_>, _>(Cursor::new(bytes))
        .map_err(|e| unreadable(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ImportError::EmptyFile)?
        .map_err(|e| unreadable(e.to_string()))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or(ImportError::EmptyFile)?
        .iter()
        .map(cell_text)
        .collect();

    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(ImportError::EmptyFile);
    }

    let columns = ColumnMap::from_headers(&headers)?;

    let mut parsed = ParsedFile::default();
    for (index, cells) in rows.enumerate() {
        let row = index + 2;
        let texts: Vec<String> = cells.iter().map(cell_text).collect();
        if texts.iter().all(|t| t.trim().is_empty()) {
            continue;
        }

        if let Some(message) = cells.iter().find_map(|cell| match cell {
            Data::Error(e) => Some(format!("Cell error: {e}")),
            _ => None,
        }) {
            parsed.errors.push(RowError::new(row, message));
            continue;
        }

        parsed
            .rows
            .push(columns.extract(row, |i| texts.get(i).map(String::as_str)));
    }

    Ok(parsed)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_date()
            .map_or_else(|| cell.to_string(), |d| d.format("%Y-%m-%d").to_string()),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_csv_basic() {
        let csv = "empresa,documento,motivo,conteudo\nAcme,Carta,Late Docs,Please resend.\n";
        let parsed = read_rows(csv.as_bytes(), ImportFormat::Csv).unwrap();

        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.rows.len(), 1);
        let row = &parsed.rows[0];
        assert_eq!(row.row, 2);
        assert_eq!(row.company, "Acme");
        assert_eq!(row.document_type.as_deref(), Some("Carta"));
        assert_eq!(row.reason, "Late Docs");
        assert_eq!(row.content, "Please resend.");
        assert!(row.reviewed_by.is_none());
    }

    #[test]
    fn test_read_csv_headers_are_case_and_accent_insensitive() {
        let csv = "\u{feff} EMPRESA ;Motivo;Conteúdo;Revisado Por;Data Revisão\n\
                   Acme;Atraso;Texto;maria;2024-05-01\n";
        let parsed = read_rows(csv.as_bytes(), ImportFormat::Csv).unwrap();

        assert_eq!(parsed.rows.len(), 1);
        let row = &parsed.rows[0];
        assert_eq!(row.company, "Acme");
        assert_eq!(row.content, "Texto");
        assert_eq!(row.reviewed_by.as_deref(), Some("maria"));
        assert_eq!(row.review_date.as_deref(), Some("2024-05-01"));
        assert!(row.document_type.is_none());
    }

    #[test]
    fn test_read_csv_missing_required_column() {
        let csv = "empresa,conteudo\nAcme,Texto\n";
        let err = read_rows(csv.as_bytes(), ImportFormat::Csv).unwrap_err();

        match err {
            ImportError::MissingColumns(cols) => assert_eq!(cols, vec!["motivo".to_string()]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_csv_empty_file() {
        let err = read_rows(b"", ImportFormat::Csv).unwrap_err();
        assert!(matches!(err, ImportError::EmptyFile));
    }

    #[test]
    fn test_read_csv_skips_blank_rows_and_keeps_short_rows() {
        let csv = "empresa,motivo,conteudo\n,,\nAcme,Atraso\n";
        let parsed = read_rows(csv.as_bytes(), ImportFormat::Csv).unwrap();

        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0].row, 3);
        assert_eq!(parsed.rows[0].content, "");
    }

    #[test]
    fn test_read_csv_invalid_utf8_row_is_an_error() {
        let mut bytes = b"empresa,motivo,conteudo\nAcme,Atraso,ok\n".to_vec();
        bytes.extend_from_slice(b"Acme,Atraso,\xff\xfe\n");
        bytes.extend_from_slice(b"Beta,Atraso,fine\n");

        let parsed = read_rows(&bytes, ImportFormat::Csv).unwrap();
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].row, 3);
    }

    #[test]
    fn test_read_csv_quoted_multiline_content() {
        let csv = "empresa,motivo,conteudo\nAcme,Atraso,\"Linha 1\nLinha 2, com vírgula\"\n";
        let parsed = read_rows(csv.as_bytes(), ImportFormat::Csv).unwrap();

        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0].content, "Linha 1\nLinha 2, com vírgula");
    }

    #[test]
    fn test_sniff_delimiter() {
        assert_eq!(sniff_delimiter(b"a;b;c\n1,2;3"), b';');
        assert_eq!(sniff_delimiter(b"a,b,c\n"), b',');
        assert_eq!(sniff_delimiter(b""), b',');
    }

    #[test]
    fn test_read_xlsx_garbage_is_unreadable() {
        let err = read_rows(b"not a zip file", ImportFormat::Xlsx).unwrap_err();
        assert!(matches!(
            err,
            ImportError::UnreadableFile {
                format: ImportFormat::Xlsx,
                ..
            }
        ));
    }

    #[test]
    fn test_read_xlsx_first_sheet() {
        use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (col, header) in ["Empresa", "Motivo", "Conteúdo", "Data Revisão"].iter().enumerate() {
            sheet
                .write_string(0, u16::try_from(col).unwrap(), *header)
                .unwrap();
        }
        sheet.write_string(1, 0, "Acme").unwrap();
        sheet.write_string(1, 1, "Atraso").unwrap();
        sheet.write_string(1, 2, "Reenvie o documento.").unwrap();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");
        let date = ExcelDateTime::from_ymd(2025, 2, 15).unwrap();
        sheet
            .write_datetime_with_format(1, 3, &date, &date_format)
            .unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let parsed = read_rows(&bytes, ImportFormat::Xlsx).unwrap();

        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.rows.len(), 1);
        let row = &parsed.rows[0];
        assert_eq!(row.row, 2);
        assert_eq!(row.company, "Acme");
        assert_eq!(row.content, "Reenvie o documento.");
        assert_eq!(row.review_date.as_deref(), Some("2025-02-15"));
    }
}
