use thiserror::Error;

use crate::types::ErrorPayload;

/// Status line and body of a response that was not ok.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("network response was not ok: {endpoint} returned {}", .response.status)]
    Status {
        endpoint: String,
        response: RawResponse,
    },

    #[error("{endpoint} returned an unreadable payload: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid endpoint url {url}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("{endpoint} sent no data for {seconds}s")]
    Stalled { endpoint: String, seconds: u64 },
}

impl ApiError {
    /// The raw response behind a non-ok status, if any.
    pub fn response(&self) -> Option<&RawResponse> {
        match self {
            ApiError::Status { response, .. } => Some(response),
            _ => None,
        }
    }

    /// The `error` field of the structured error payload, if the response carried one.
    pub fn payload_error(&self) -> Option<String> {
        self.response()
            .and_then(|r| r.json::<ErrorPayload>().ok())
            .map(|p| p.error)
    }

    pub fn endpoint(&self) -> &str {
        match self {
            ApiError::Transport { endpoint, .. }
            | ApiError::Status { endpoint, .. }
            | ApiError::Decode { endpoint, .. }
            | ApiError::Stalled { endpoint, .. } => endpoint,
            ApiError::InvalidUrl { url, .. } => url,
        }
    }
}

/// Turns a status/body pair into the body on 2xx, or a `Status` error carrying both.
pub fn ensure_success(endpoint: &str, status: u16, body: String) -> Result<String, ApiError> {
    if (200..300).contains(&status) {
        Ok(body)
    } else {
        Err(ApiError::Status {
            endpoint: endpoint.to_string(),
            response: RawResponse { status, body },
        })
    }
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("record has {found} fields, expected 9")]
    FieldCount { found: usize },

    #[error("It is not allowed, that the question title {question} contains a hash.")]
    HashInQuestion { question: String },

    #[error("invalid category id '{value}'")]
    InvalidCategory { value: String },

    #[error("creating the FAQ failed: {0}")]
    Create(#[source] ApiError),

    #[error("FAQ {faq_id} was created but its category metadata was not saved: {source}")]
    Metadata {
        faq_id: i64,
        #[source]
        source: ApiError,
    },
}
