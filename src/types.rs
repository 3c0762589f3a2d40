use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub success: Option<String>,
    #[serde(default)]
    pub warning: Option<String>,
}

/// Result of `api/update-check`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VersionInfo {
    #[serde(rename = "dateLastChecked")]
    pub date_last_checked: String,
    pub version: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DownloadResponse {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub success: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExtractResponse {
    #[serde(default)]
    pub success: Option<Value>,
    #[serde(default)]
    pub message: String,
}

/// `{error}` body returned by failing endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ErrorPayload {
    pub error: String,
}

/// One decoded object from a backup or install progress stream.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProgressEvent {
    pub progress: String,
}

impl ProgressEvent {
    pub fn new(progress: impl Into<String>) -> Self {
        Self {
            progress: progress.into(),
        }
    }

    /// Numeric value of a CSS-style percentage such as `"42%"`, clamped to 0..=100.
    pub fn percent(&self) -> Option<f64> {
        let raw = self.progress.trim();
        let number = raw.strip_suffix('%').unwrap_or(raw).trim();
        let value: f64 = number.parse().ok()?;
        if value.is_finite() {
            Some(value.clamp(0.0, 100.0))
        } else {
            None
        }
    }
}

/// Generic `{success}` / `{error}` answer of the FAQ row actions.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub success: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ActionResponse {
    pub fn is_success(&self) -> bool {
        match &self.success {
            None | Some(Value::Null) | Some(Value::Bool(false)) => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FaqRow {
    #[serde(deserialize_with = "flexible_id")]
    pub id: i64,
    pub language: String,
    #[serde(rename = "solution_id", deserialize_with = "flexible_id")]
    pub solution_id: i64,
    pub question: String,
    #[serde(rename = "created", default)]
    pub created_at: String,
    #[serde(deserialize_with = "yes_no", default)]
    pub sticky: bool,
    #[serde(deserialize_with = "yes_no", default)]
    pub active: bool,
    #[serde(rename = "category_id", deserialize_with = "flexible_id")]
    pub category_id: i64,
}

impl FaqRow {
    pub fn key(&self) -> FaqKey {
        FaqKey {
            id: self.id,
            language: self.language.clone(),
        }
    }
}

/// Rows are identified by id and language together.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FaqKey {
    pub id: i64,
    pub language: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FaqListResponse {
    #[serde(default)]
    pub faqs: Vec<FaqRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Sticky,
    Active,
}

impl StatusKind {
    pub fn endpoint(&self) -> &'static str {
        match self {
            StatusKind::Active => "api/faq/activate",
            StatusKind::Sticky => "api/faq/sticky",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusToggleRequest {
    pub csrf: String,
    #[serde(rename = "categoryId")]
    pub category_id: i64,
    #[serde(rename = "faqIds")]
    pub faq_ids: Vec<i64>,
    #[serde(rename = "faqLanguage")]
    pub faq_language: String,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeleteFaqRequest {
    pub csrf: String,
    #[serde(rename = "faqId")]
    pub faq_id: i64,
    #[serde(rename = "faqLanguage")]
    pub faq_language: String,
}

/// A FAQ ready to be persisted by the importer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaqEntity {
    pub language: String,
    pub question: String,
    pub answer: String,
    pub keywords: String,
    pub author: String,
    pub email: String,
    pub active: bool,
    pub sticky: bool,
    pub comment: bool,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaqMetaData {
    #[serde(rename = "faqId")]
    pub faq_id: i64,
    #[serde(rename = "faqLanguage")]
    pub faq_language: String,
    pub categories: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreatedFaq {
    #[serde(deserialize_with = "flexible_id")]
    pub id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationMode {
    Update,
    FaqOverview,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    SelectingOperation,
    UpdateWizard,
    FaqOverview,
    ConfirmDelete,
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    Editing,
}

fn flexible_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| serde::de::Error::custom(format!("id out of range: {n}"))),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid id: {s}"))),
        other => Err(serde::de::Error::custom(format!("invalid id: {other}"))),
    }
}

// The overview endpoint reports flags as "yes"/"no".
fn yes_no<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::String(s) => matches!(s.to_ascii_lowercase().as_str(), "yes" | "y" | "1" | "true"),
        Value::Number(n) => n.as_i64().unwrap_or(0) != 0,
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_parses_css_percentages() {
        assert_eq!(ProgressEvent::new("42%").percent(), Some(42.0));
        assert_eq!(ProgressEvent::new(" 12.5 % ").percent(), Some(12.5));
        assert_eq!(ProgressEvent::new("140%").percent(), Some(100.0));
        assert_eq!(ProgressEvent::new("abc").percent(), None);
    }

    #[test]
    fn faq_row_accepts_yes_no_flags_and_string_ids() {
        let row: FaqRow = serde_json::from_str(
            r#"{"id":"12","language":"en","solution_id":1012,"question":"Why?",
                "created":"2024-01-05 10:00","sticky":"yes","active":"no","category_id":"3"}"#,
        )
        .unwrap();

        assert_eq!(row.id, 12);
        assert_eq!(row.category_id, 3);
        assert!(row.sticky);
        assert!(!row.active);
        assert_eq!(row.key(), FaqKey { id: 12, language: "en".to_string() });
    }

    #[test]
    fn action_response_success_detection() {
        let ok: ActionResponse = serde_json::from_str(r#"{"success":"Saved"}"#).unwrap();
        let failed: ActionResponse = serde_json::from_str(r#"{"error":"Denied"}"#).unwrap();
        assert!(ok.is_success());
        assert!(!failed.is_success());
        assert_eq!(failed.error.as_deref(), Some("Denied"));
    }

    #[test]
    fn status_toggle_request_uses_camel_case_keys() {
        let request = StatusToggleRequest {
            csrf: "token".to_string(),
            category_id: 4,
            faq_ids: vec![1, 2],
            faq_language: "de".to_string(),
            checked: true,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["categoryId"], 4);
        assert_eq!(json["faqIds"], serde_json::json!([1, 2]));
        assert_eq!(json["faqLanguage"], "de");
    }
}
