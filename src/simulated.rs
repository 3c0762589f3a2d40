use async_trait::async_trait;
use futures_util::stream;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tracing::info;

use crate::api::{AdminApiTrait, FaqStore};
use crate::errors::ApiError;
use crate::progress::ChunkStream;
use crate::types::{
    ActionResponse, DeleteFaqRequest, DownloadResponse, ExtractResponse, FaqEntity, FaqMetaData,
    FaqRow, HealthResponse, StatusKind, StatusToggleRequest, VersionInfo,
};

/// Stands in for the admin backend in `--dry-run` mode. Nothing leaves the machine.
pub struct SimulatedApi {
    step_delay: Duration,
    next_faq_id: AtomicI64,
    deleted: Mutex<Vec<(i64, String)>>,
}

impl Default for SimulatedApi {
    fn default() -> Self {
        Self::new(Duration::from_millis(250))
    }
}

impl SimulatedApi {
    pub fn new(step_delay: Duration) -> Self {
        Self {
            step_delay,
            next_faq_id: AtomicI64::new(1000),
            deleted: Mutex::new(Vec::new()),
        }
    }

    fn progress_stream(&self) -> ChunkStream {
        let delay = self.step_delay;
        let steps = stream::unfold(0u32, move |percent| async move {
            if percent > 100 {
                return None;
            }
            tokio::time::sleep(delay).await;
            let chunk = format!("{{\"progress\":\"{percent}%\"}}").into_bytes();
            Some((Ok::<_, ApiError>(chunk), percent + 20))
        });
        Box::pin(steps)
    }
}

#[async_trait]
impl AdminApiTrait for SimulatedApi {
    async fn health_check(&self) -> Result<HealthResponse, ApiError> {
        tokio::time::sleep(self.step_delay).await;
        Ok(HealthResponse {
            success: Some("[dry run] The installation is healthy.".to_string()),
            warning: None,
        })
    }

    async fn check_for_updates(&self) -> Result<VersionInfo, ApiError> {
        tokio::time::sleep(self.step_delay).await;
        Ok(VersionInfo {
            date_last_checked: chrono::Utc::now().to_rfc3339(),
            version: "4.0.1".to_string(),
            message: "[dry run] Version 4.0.1 is available.".to_string(),
        })
    }

    async fn download_package(&self, version: &str) -> Result<DownloadResponse, ApiError> {
        tokio::time::sleep(self.step_delay).await;
        Ok(DownloadResponse {
            version: Some(version.to_string()),
            success: format!("[dry run] Package {version} downloaded."),
        })
    }

    async fn extract_package(&self) -> Result<ExtractResponse, ApiError> {
        tokio::time::sleep(self.step_delay).await;
        Ok(ExtractResponse {
            success: Some(serde_json::Value::String("ok".to_string())),
            message: "[dry run] Package extracted.".to_string(),
        })
    }

    async fn create_temporary_backup(&self) -> Result<ChunkStream, ApiError> {
        Ok(self.progress_stream())
    }

    async fn install_package(&self) -> Result<ChunkStream, ApiError> {
        Ok(self.progress_stream())
    }

    async fn fetch_faqs_by_category(&self, category_id: i64) -> Result<Vec<FaqRow>, ApiError> {
        tokio::time::sleep(self.step_delay).await;
        let deleted = self.deleted.lock().map(|d| d.clone()).unwrap_or_default();
        let rows = (1..=3)
            .map(|n| {
                let id = category_id * 10 + n;
                FaqRow {
                    id,
                    language: "en".to_string(),
                    solution_id: 1000 + id,
                    question: format!("Sample question {n} in category {category_id}?"),
                    created_at: "2024-01-05 10:00".to_string(),
                    sticky: n == 1,
                    active: true,
                    category_id,
                }
            })
            .filter(|row| !deleted.contains(&(row.id, row.language.clone())))
            .collect();
        Ok(rows)
    }

    async fn delete_faq(&self, request: &DeleteFaqRequest) -> Result<ActionResponse, ApiError> {
        if let Ok(mut deleted) = self.deleted.lock() {
            deleted.push((request.faq_id, request.faq_language.clone()));
        }
        Ok(ActionResponse {
            success: Some(serde_json::Value::String("[dry run] FAQ deleted.".to_string())),
            error: None,
        })
    }

    async fn save_status(
        &self,
        kind: StatusKind,
        request: &StatusToggleRequest,
    ) -> Result<ActionResponse, ApiError> {
        info!(?kind, faq_ids = ?request.faq_ids, checked = request.checked, "[dry run] status");
        Ok(ActionResponse {
            success: Some(serde_json::Value::String("[dry run] Saved.".to_string())),
            error: None,
        })
    }
}

#[async_trait]
impl FaqStore for SimulatedApi {
    async fn create_faq(&self, faq: &FaqEntity) -> Result<i64, ApiError> {
        let id = self.next_faq_id.fetch_add(1, Ordering::SeqCst);
        info!(id, question = %faq.question, "[dry run] FAQ created");
        Ok(id)
    }

    async fn save_metadata(&self, meta: &FaqMetaData) -> Result<(), ApiError> {
        info!(faq_id = meta.faq_id, categories = ?meta.categories, "[dry run] metadata saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::consume_progress;

    #[tokio::test]
    async fn simulated_stream_reaches_one_hundred() {
        let api = SimulatedApi::new(Duration::from_millis(1));
        let stream = api.create_temporary_backup().await.unwrap();
        let mut last = String::new();
        let count = consume_progress("dry-run", stream, None, |e| last = e.progress)
            .await
            .unwrap();
        assert_eq!(count, 6);
        assert_eq!(last, "100%");
    }

    #[tokio::test]
    async fn deleted_rows_stay_deleted() {
        let api = SimulatedApi::new(Duration::from_millis(1));
        api.delete_faq(&DeleteFaqRequest {
            csrf: String::new(),
            faq_id: 21,
            faq_language: "en".to_string(),
        })
        .await
        .unwrap();

        let rows = api.fetch_faqs_by_category(2).await.unwrap();
        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![22, 23]);
    }
}
