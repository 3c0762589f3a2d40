use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::Settings;
use crate::errors::{ensure_success, ApiError, RawResponse};
use crate::progress::ChunkStream;
use crate::types::{
    ActionResponse, CreatedFaq, DeleteFaqRequest, DownloadResponse, ExtractResponse, FaqEntity,
    FaqListResponse, FaqMetaData, FaqRow, HealthResponse, StatusKind, StatusToggleRequest,
    VersionInfo,
};

pub const UPDATE_CHECK: &str = "api/update-check";
pub const EXTRACT_PACKAGE: &str = "api/extract-package";
pub const CREATE_TEMPORARY_BACKUP: &str = "api/create-temporary-backup";
pub const INSTALL_PACKAGE: &str = "api/install-package";
pub const DELETE_FAQ: &str = "api/faq/delete";
pub const CREATE_FAQ: &str = "api/faq/create";
pub const SAVE_FAQ_META: &str = "api/faq/meta";

const ACCEPT_ANY: &str = "application/json, text/plain, */*";

/// Admin endpoints used by the update wizard and the FAQ overview.
#[mockall::automock]
#[async_trait]
pub trait AdminApiTrait: Send + Sync {
    async fn health_check(&self) -> Result<HealthResponse, ApiError>;
    async fn check_for_updates(&self) -> Result<VersionInfo, ApiError>;
    async fn download_package(&self, version: &str) -> Result<DownloadResponse, ApiError>;
    async fn extract_package(&self) -> Result<ExtractResponse, ApiError>;
    async fn create_temporary_backup(&self) -> Result<ChunkStream, ApiError>;
    async fn install_package(&self) -> Result<ChunkStream, ApiError>;
    async fn fetch_faqs_by_category(&self, category_id: i64) -> Result<Vec<FaqRow>, ApiError>;
    async fn delete_faq(&self, request: &DeleteFaqRequest) -> Result<ActionResponse, ApiError>;
    async fn save_status(
        &self,
        kind: StatusKind,
        request: &StatusToggleRequest,
    ) -> Result<ActionResponse, ApiError>;
}

/// Persistence used by the CSV importer: the FAQ itself, then its category metadata.
#[mockall::automock]
#[async_trait]
pub trait FaqStore: Send + Sync {
    async fn create_faq(&self, faq: &FaqEntity) -> Result<i64, ApiError>;
    async fn save_metadata(&self, meta: &FaqMetaData) -> Result<(), ApiError>;
}

pub fn download_endpoint(version: &str) -> String {
    format!("api/download-package/{version}")
}

pub fn faqs_endpoint(category_id: i64) -> String {
    format!("api/faqs/{category_id}")
}

pub struct AdminClient {
    client: Client,
    base_url: Url,
    health_endpoint: String,
    request_timeout: Duration,
}

impl AdminClient {
    pub fn new(settings: &Settings) -> Result<Self, ApiError> {
        let mut base = settings.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| ApiError::InvalidUrl {
            url: base.clone(),
            message: e.to_string(),
        })?;

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|source| ApiError::Transport {
                endpoint: base.clone(),
                source,
            })?;

        info!(base_url = %base_url, "admin client ready");

        Ok(Self {
            client,
            base_url,
            health_endpoint: settings.health_endpoint.clone(),
            request_timeout: settings.request_timeout(),
        })
    }

    fn url(&self, endpoint: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(endpoint.trim_start_matches("./"))
            .map_err(|e| ApiError::InvalidUrl {
                url: endpoint.to_string(),
                message: e.to_string(),
            })
    }

    /// Replaces rather than appends, so `.json()` bodies keep a single content type.
    fn with_headers(builder: RequestBuilder) -> RequestBuilder {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_ANY));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        builder.headers(headers)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        debug!(endpoint, "sending request");
        let response = Self::with_headers(builder)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|source| ApiError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;
        let body = ensure_success(endpoint, status, body)?;

        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    async fn post_empty<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let url = self.url(endpoint)?;
        self.send_json(endpoint, self.client.post(url)).await
    }

    async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(endpoint)?;
        self.send_json(endpoint, self.client.post(url).json(body)).await
    }

    /// Opens a chunked progress response. No overall timeout: these run for minutes.
    async fn open_stream(&self, endpoint: &'static str) -> Result<ChunkStream, ApiError> {
        let url = self.url(endpoint)?;
        let response = Self::with_headers(self.client.post(url))
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                endpoint: endpoint.to_string(),
                response: RawResponse { status, body },
            });
        }

        let chunks = response.bytes_stream().map(move |chunk| {
            chunk
                .map(|bytes| bytes.to_vec())
                .map_err(|source| ApiError::Transport {
                    endpoint: endpoint.to_string(),
                    source,
                })
        });
        Ok(Box::pin(chunks))
    }
}

#[async_trait]
impl AdminApiTrait for AdminClient {
    async fn health_check(&self) -> Result<HealthResponse, ApiError> {
        let url = self.url(&self.health_endpoint)?;
        self.send_json(&self.health_endpoint, self.client.get(url)).await
    }

    async fn check_for_updates(&self) -> Result<VersionInfo, ApiError> {
        self.post_empty(UPDATE_CHECK).await
    }

    async fn download_package(&self, version: &str) -> Result<DownloadResponse, ApiError> {
        self.post_empty(&download_endpoint(version)).await
    }

    async fn extract_package(&self) -> Result<ExtractResponse, ApiError> {
        self.post_empty(EXTRACT_PACKAGE).await
    }

    async fn create_temporary_backup(&self) -> Result<ChunkStream, ApiError> {
        self.open_stream(CREATE_TEMPORARY_BACKUP).await
    }

    async fn install_package(&self) -> Result<ChunkStream, ApiError> {
        self.open_stream(INSTALL_PACKAGE).await
    }

    async fn fetch_faqs_by_category(&self, category_id: i64) -> Result<Vec<FaqRow>, ApiError> {
        let endpoint = faqs_endpoint(category_id);
        let url = self.url(&endpoint)?;
        let list: FaqListResponse = self.send_json(&endpoint, self.client.get(url)).await?;
        Ok(list.faqs)
    }

    async fn delete_faq(&self, request: &DeleteFaqRequest) -> Result<ActionResponse, ApiError> {
        let url = self.url(DELETE_FAQ)?;
        self.send_json(DELETE_FAQ, self.client.delete(url).json(request))
            .await
    }

    async fn save_status(
        &self,
        kind: StatusKind,
        request: &StatusToggleRequest,
    ) -> Result<ActionResponse, ApiError> {
        self.post_json(kind.endpoint(), request).await
    }
}

#[async_trait]
impl FaqStore for AdminClient {
    async fn create_faq(&self, faq: &FaqEntity) -> Result<i64, ApiError> {
        let created: CreatedFaq = self.post_json(CREATE_FAQ, faq).await?;
        Ok(created.id)
    }

    async fn save_metadata(&self, meta: &FaqMetaData) -> Result<(), ApiError> {
        let _: ActionResponse = self.post_json(SAVE_FAQ_META, meta).await?;
        Ok(())
    }
}
