// ============================================================
// Layer 4 — CSV Loader & Cleaner
// ============================================================
// Reads the labelled export with the csv crate and produces the
// cleaned row set the rest of the pipeline works on.
//
// The source table has two named columns (the export uses
// Cyrillic headers, so both names are configurable):
//   - a free-text comment column
//   - a category label column
//
// Cleaning drops, in order:
//   1. rows whose comment text is empty or whitespace-only
//   2. rows whose category is in the configured exclusion set
//
// Before/after row counts are logged. A missing file or a
// missing required column is a fatal error — there is no
// partial-read fallback.

use anyhow::{anyhow, Context, Result};
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::domain::comment::CommentRecord;
use crate::domain::traits::CommentSource;

/// Loads labelled comment rows from a delimited file.
/// Implements the CommentSource trait from Layer 3.
pub struct CsvCommentLoader {
    path:            String,
    text_column:     String,
    category_column: String,
    delimiter:       u8,
    excluded:        HashSet<String>,
}

impl CsvCommentLoader {
    pub fn new(
        path:            impl Into<String>,
        text_column:     impl Into<String>,
        category_column: impl Into<String>,
        delimiter:       u8,
        excluded:        &[String],
    ) -> Self {
        Self {
            path:            path.into(),
            text_column:     text_column.into(),
            category_column: category_column.into(),
            delimiter,
            excluded: excluded.iter().cloned().collect(),
        }
    }
}

impl CommentSource for CsvCommentLoader {
    fn load_all(&self) -> Result<Vec<CommentRecord>> {
        let path = Path::new(&self.path);
        let file = File::open(path)
            .with_context(|| format!("Cannot open dataset file '{}'", self.path))?;

        let records = read_records(
            file,
            &self.text_column,
            &self.category_column,
            self.delimiter,
        )
        .with_context(|| format!("Cannot parse dataset file '{}'", self.path))?;

        Ok(clean_records(records, &self.excluded))
    }
}

/// Parse all rows from a delimited reader.
///
/// The header row is inspected once to find the positions of the
/// two required columns; either one being absent is an error that
/// names the missing column.
fn read_records<R: Read>(
    reader:          R,
    text_column:     &str,
    category_column: &str,
    delimiter:       u8,
) -> Result<Vec<CommentRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);

    // Locate the two required columns in the header row
    let headers = csv_reader.headers().context("Cannot read CSV header row")?;
    let text_idx = headers
        .iter()
        .position(|h| h.trim() == text_column)
        .ok_or_else(|| anyhow!("Required column '{}' not found in header", text_column))?;
    let category_idx = headers
        .iter()
        .position(|h| h.trim() == category_column)
        .ok_or_else(|| anyhow!("Required column '{}' not found in header", category_column))?;

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row.context("Malformed CSV row")?;
        // flexible(true) allows ragged rows; treat missing cells as empty
        let text     = row.get(text_idx).unwrap_or("").to_string();
        let category = row.get(category_idx).unwrap_or("").trim().to_string();
        records.push(CommentRecord::new(text, category));
    }

    Ok(records)
}

/// Apply the two row-level cleaning rules and log the shrinkage.
fn clean_records(records: Vec<CommentRecord>, excluded: &HashSet<String>) -> Vec<CommentRecord> {
    let before = records.len();

    let cleaned: Vec<CommentRecord> = records
        .into_iter()
        .filter(|r| !r.text.trim().is_empty())
        .filter(|r| !excluded.contains(&r.category))
        .collect();

    tracing::info!(
        "Cleaned dataset: {} rows in, {} rows kept ({} dropped)",
        before,
        cleaned.len(),
        before - cleaned.len(),
    );

    cleaned
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
Комментарий,Категория
Отличный сервис,благодарность
,жалоба
Очень долго ждал ответа,жалоба
Как продлить подписку?,вопрос
реклама реклама,спам
   ,вопрос
";

    fn load(excluded: &[&str]) -> Vec<CommentRecord> {
        let excluded: HashSet<String> = excluded.iter().map(|s| s.to_string()).collect();
        let records =
            read_records(CSV.as_bytes(), "Комментарий", "Категория", b',').unwrap();
        clean_records(records, &excluded)
    }

    #[test]
    fn test_drops_empty_and_whitespace_text() {
        let rows = load(&[]);
        // 6 data rows, 2 with empty/whitespace-only text
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| !r.text.trim().is_empty()));
    }

    #[test]
    fn test_drops_excluded_categories() {
        let rows = load(&["спам"]);
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.category != "спам"));
    }

    #[test]
    fn test_preserves_row_order() {
        let rows = load(&[]);
        assert_eq!(rows[0].text, "Отличный сервис");
        assert_eq!(rows[1].text, "Очень долго ждал ответа");
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let err = read_records(CSV.as_bytes(), "Текст", "Категория", b',')
            .unwrap_err()
            .to_string();
        assert!(err.contains("Текст"));
    }

    #[test]
    fn test_category_is_trimmed() {
        let csv = "Комментарий,Категория\nтекст, вопрос \n";
        let rows = read_records(csv.as_bytes(), "Комментарий", "Категория", b',').unwrap();
        assert_eq!(rows[0].category, "вопрос");
    }
}
