//! CSV bulk import of FAQ records.
//!
//! Each CSV row is a positional record:
//! `category id, question, answer, keywords, language, author, email, active, sticky`.

use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

use crate::api::FaqStore;
use crate::errors::ImportError;
use crate::types::{FaqEntity, FaqMetaData};

pub const RECORD_FIELDS: usize = 9;
const REQUIRED_COLUMNS: [usize; 8] = [0, 1, 2, 4, 5, 6, 7, 8];
const ACTIVE_COLUMN: usize = 7;
const STICKY_COLUMN: usize = 8;
/// Reserved by the FAQ engine for internal hashing; not allowed in questions.
const RESERVED_HASH: char = '#';

pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<Vec<String>>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    reader
        .records()
        .map(|record| record.map(|r| r.iter().map(str::to_string).collect()))
        .collect()
}

pub fn is_csv_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn is_boolean_literal(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false")
}

/// A required column counts as missing when it is `""` or `"0"`. Whitespace is a value.
fn is_missing(value: &str) -> bool {
    value.is_empty() || value == "0"
}

/// Checks every row's shape before anything is imported.
pub fn validate_csv(rows: &[Vec<String>]) -> bool {
    rows.iter().all(|row| {
        row.len() == RECORD_FIELDS
            && REQUIRED_COLUMNS.iter().all(|&i| !is_missing(&row[i]))
            && is_boolean_literal(&row[ACTIVE_COLUMN])
            && is_boolean_literal(&row[STICKY_COLUMN])
    })
}

/// Encodes `'"<>&` and ASCII control characters as numeric HTML entities.
pub fn encode_special_chars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' | '\'' | '<' | '>' | '&' => out.push_str(&format!("&#{};", c as u32)),
            c if (c as u32) < 32 => out.push_str(&format!("&#{};", c as u32)),
            c => out.push(c),
        }
    }
    out
}

/// Drops every character that cannot appear in an e-mail address.
pub fn sanitize_email(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || "!#$%&'*+-=?^_`{|}~@.[]".contains(*c))
        .collect()
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "on" | "yes"
    )
}

#[derive(Debug, Default)]
pub struct ImportSummary {
    pub imported: Vec<i64>,
    pub failed: Vec<(usize, ImportError)>,
}

impl ImportSummary {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct FaqImport<S> {
    store: S,
}

impl<S: FaqStore> FaqImport<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Imports one record and returns the new FAQ id.
    pub async fn import(&self, record: &[String]) -> Result<i64, ImportError> {
        if let Some(question) = record.get(1) {
            if question.contains(RESERVED_HASH) {
                return Err(ImportError::HashInQuestion {
                    question: question.clone(),
                });
            }
        }
        if record.len() != RECORD_FIELDS {
            return Err(ImportError::FieldCount {
                found: record.len(),
            });
        }

        let category_id: i64 =
            record[0]
                .trim()
                .parse()
                .map_err(|_| ImportError::InvalidCategory {
                    value: record[0].clone(),
                })?;
        let language = encode_special_chars(record[4].trim());

        let faq = FaqEntity {
            language: language.clone(),
            question: encode_special_chars(&record[1]),
            answer: encode_special_chars(&record[2]),
            keywords: encode_special_chars(&record[3]),
            author: encode_special_chars(&record[5]),
            email: sanitize_email(&record[6]),
            active: parse_flag(&record[ACTIVE_COLUMN]),
            sticky: parse_flag(&record[STICKY_COLUMN]),
            comment: false,
            notes: String::new(),
        };

        let faq_id = self
            .store
            .create_faq(&faq)
            .await
            .map_err(ImportError::Create)?;

        let meta = FaqMetaData {
            faq_id,
            faq_language: language,
            categories: vec![category_id],
        };
        if let Err(source) = self.store.save_metadata(&meta).await {
            warn!(faq_id, "FAQ created without category metadata");
            return Err(ImportError::Metadata { faq_id, source });
        }

        info!(faq_id, category_id, "FAQ imported");
        Ok(faq_id)
    }

    /// Validates the whole file, then imports row by row. Returns `None` if validation failed.
    pub async fn import_all(&self, rows: &[Vec<String>]) -> Option<ImportSummary> {
        if !validate_csv(rows) {
            return None;
        }

        let mut summary = ImportSummary::default();
        for (line, record) in rows.iter().enumerate() {
            match self.import(record).await {
                Ok(id) => summary.imported.push(id),
                Err(e) => {
                    warn!(line = line + 1, "{e}");
                    summary.failed.push((line + 1, e));
                }
            }
        }
        Some(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn parse_reads_quoted_fields_without_headers() {
        let data = "1,\"Q, really?\",A.,kw,en,Jan,a@b.com,true,false\n2,Q2,A2,,de,Eva,e@f.de,FALSE,TRUE\n";
        let rows = parse_csv(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][1], "Q, really?");
        assert_eq!(rows[1][3], "");
    }

    #[test]
    fn csv_extension_is_case_insensitive() {
        assert!(is_csv_file(Path::new("faqs.CSV")));
        assert!(is_csv_file(Path::new("/tmp/import.csv")));
        assert!(!is_csv_file(Path::new("faqs.xlsx")));
        assert!(!is_csv_file(Path::new("csv")));
    }

    #[test]
    fn keywords_may_be_empty() {
        assert!(validate_csv(&[row(&["1", "Q?", "A.", "", "en", "Jan", "a@b.com", "TRUE", "false"])]));
    }

    #[test]
    fn special_characters_are_encoded() {
        assert_eq!(encode_special_chars("<b>\"R&D\"</b>"), "&#60;b&#62;&#34;R&#38;D&#34;&#60;/b&#62;");
        assert_eq!(encode_special_chars("line\nbreak"), "line&#10;break");
        assert_eq!(sanitize_email("jan (work) <a@b.com>"), "janworka@b.com");
    }
}
