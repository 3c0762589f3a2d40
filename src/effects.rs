//! Network side of each wizard step and overview action.
//!
//! Effects never touch UI state; they turn API outcomes into events. Failures of every step
//! except the download are only logged, matching what the admin page does.

use std::time::Duration;
use tracing::{error, info, warn};

use crate::api::{AdminApiTrait, CREATE_TEMPORARY_BACKUP, INSTALL_PACKAGE};
use crate::errors::ApiError;
use crate::progress::consume_progress;
use crate::state::faq_overview::OverviewEvent;
use crate::state::pipeline::{StepEvent, StepId};
use crate::types::{DeleteFaqRequest, FaqKey, StatusKind, StatusToggleRequest};

/// Logs a failure the way the page's console would: decoded payload if any, else the error.
fn log_failure(step: &str, err: &ApiError) {
    match err.response() {
        Some(response) => match response.json::<serde_json::Value>() {
            Ok(payload) => error!(step, status = response.status, %payload, "request failed"),
            Err(_) => error!(step, status = response.status, body = %response.body, "request failed"),
        },
        None => error!(step, "{err}"),
    }
}

pub async fn check_health(api: &dyn AdminApiTrait) -> StepEvent {
    match api.health_check().await {
        Ok(response) => StepEvent::HealthChecked(response),
        Err(e) => {
            log_failure("health-check", &e);
            StepEvent::Failed(StepId::HealthCheck)
        }
    }
}

pub async fn check_versions(api: &dyn AdminApiTrait) -> StepEvent {
    match api.check_for_updates().await {
        Ok(info) => {
            info!(version = %info.version, "update check finished");
            StepEvent::VersionChecked(info)
        }
        Err(e) => {
            log_failure("update-check", &e);
            StepEvent::Failed(StepId::CheckVersions)
        }
    }
}

/// Download failures are rendered on the card, so the message is part of the event.
pub async fn download(api: &dyn AdminApiTrait, version: &str) -> StepEvent {
    match api.download_package(version).await {
        Ok(response) => {
            info!(version, "package downloaded");
            StepEvent::Downloaded(response)
        }
        Err(e) => {
            log_failure("download-package", &e);
            StepEvent::DownloadFailed(e.payload_error().unwrap_or_else(|| e.to_string()))
        }
    }
}

pub async fn extract(api: &dyn AdminApiTrait) -> StepEvent {
    match api.extract_package().await {
        Ok(response) => StepEvent::Extracted(response),
        Err(e) => {
            log_failure("extract-package", &e);
            StepEvent::Failed(StepId::Extract)
        }
    }
}

/// Streams the temporary backup to completion.
pub async fn run_backup<F>(
    api: &dyn AdminApiTrait,
    stall_timeout: Option<Duration>,
    mut emit: F,
) -> Result<(), ApiError>
where
    F: FnMut(StepEvent),
{
    let stream = api.create_temporary_backup().await?;
    consume_progress(CREATE_TEMPORARY_BACKUP, stream, stall_timeout, |event| {
        emit(StepEvent::BackupProgress(event))
    })
    .await?;
    emit(StepEvent::BackupFinished);
    Ok(())
}

pub async fn run_install<F>(
    api: &dyn AdminApiTrait,
    stall_timeout: Option<Duration>,
    mut emit: F,
) -> Result<(), ApiError>
where
    F: FnMut(StepEvent),
{
    let stream = api.install_package().await?;
    consume_progress(INSTALL_PACKAGE, stream, stall_timeout, |event| {
        emit(StepEvent::InstallProgress(event))
    })
    .await?;
    emit(StepEvent::InstallFinished);
    Ok(())
}

/// Backup first; the installer only starts once the backup stream completed cleanly.
pub async fn backup_and_install<F>(
    api: &dyn AdminApiTrait,
    stall_timeout: Option<Duration>,
    mut emit: F,
) where
    F: FnMut(StepEvent),
{
    if let Err(e) = run_backup(api, stall_timeout, &mut emit).await {
        log_failure("create-temporary-backup", &e);
        warn!("installation skipped because the backup did not complete");
        emit(StepEvent::Failed(StepId::Install));
        return;
    }

    if let Err(e) = run_install(api, stall_timeout, &mut emit).await {
        log_failure("install-package", &e);
        emit(StepEvent::Failed(StepId::Install));
    }
}

pub async fn load_category(api: &dyn AdminApiTrait, category_id: i64) -> OverviewEvent {
    match api.fetch_faqs_by_category(category_id).await {
        Ok(rows) => OverviewEvent::RowsLoaded { category_id, rows },
        Err(e) => {
            log_failure("faqs", &e);
            OverviewEvent::RowsFailed { category_id }
        }
    }
}

/// Returns the deletion event only when the backend confirmed it.
pub async fn delete_faq(api: &dyn AdminApiTrait, request: DeleteFaqRequest) -> Option<OverviewEvent> {
    match api.delete_faq(&request).await {
        Ok(response) if response.is_success() => Some(OverviewEvent::Deleted(FaqKey {
            id: request.faq_id,
            language: request.faq_language,
        })),
        Ok(response) => {
            error!(faq_id = request.faq_id, error = ?response.error, "delete rejected");
            None
        }
        Err(e) => {
            log_failure("faq/delete", &e);
            None
        }
    }
}

pub async fn save_status(api: &dyn AdminApiTrait, kind: StatusKind, request: StatusToggleRequest) {
    match api.save_status(kind, &request).await {
        Ok(response) if response.is_success() => {
            info!(?kind, faq_ids = ?request.faq_ids, checked = request.checked, "status saved")
        }
        Ok(response) => error!(?kind, error = ?response.error, "status not saved"),
        Err(e) => log_failure(kind.endpoint(), &e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockAdminApiTrait;
    use crate::errors::RawResponse;
    use crate::progress::ChunkStream;
    use crate::types::ProgressEvent;
    use futures_util::stream;

    fn progress(parts: &[&str]) -> ChunkStream {
        let items: Vec<Result<Vec<u8>, ApiError>> = parts
            .iter()
            .map(|p| Ok(format!("{{\"progress\":\"{p}\"}}").into_bytes()))
            .collect();
        Box::pin(stream::iter(items))
    }

    #[tokio::test]
    async fn download_failure_carries_the_payload_error() {
        let mut api = MockAdminApiTrait::new();
        api.expect_download_package().times(1).returning(|v| {
            Err(ApiError::Status {
                endpoint: format!("api/download-package/{v}"),
                response: RawResponse {
                    status: 502,
                    body: r#"{"error":"Cannot reach download server"}"#.to_string(),
                },
            })
        });

        let event = download(&api, "4.0.1").await;
        assert_eq!(
            event,
            StepEvent::DownloadFailed("Cannot reach download server".to_string())
        );
    }

    #[tokio::test]
    async fn backup_failure_skips_installation() {
        let mut api = MockAdminApiTrait::new();
        api.expect_create_temporary_backup().times(1).returning(|| {
            Err(ApiError::Stalled {
                endpoint: CREATE_TEMPORARY_BACKUP.to_string(),
                seconds: 1,
            })
        });
        api.expect_install_package().times(0);

        let mut events = Vec::new();
        backup_and_install(&api, None, |e| events.push(e)).await;
        assert_eq!(events, vec![StepEvent::Failed(StepId::Install)]);
    }

    #[tokio::test]
    async fn backup_then_install_emits_in_order() {
        let mut api = MockAdminApiTrait::new();
        api.expect_create_temporary_backup()
            .times(1)
            .returning(|| Ok(progress(&["30%", "60%"])));
        api.expect_install_package()
            .times(1)
            .returning(|| Ok(progress(&["90%"])));

        let mut events = Vec::new();
        backup_and_install(&api, None, |e| events.push(e)).await;

        assert_eq!(
            events,
            vec![
                StepEvent::BackupProgress(ProgressEvent::new("30%")),
                StepEvent::BackupProgress(ProgressEvent::new("60%")),
                StepEvent::BackupFinished,
                StepEvent::InstallProgress(ProgressEvent::new("90%")),
                StepEvent::InstallFinished,
            ]
        );
    }
}
