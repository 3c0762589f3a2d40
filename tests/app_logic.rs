use pmf_upgrade::api::MockAdminApiTrait;
use pmf_upgrade::app::App;
use pmf_upgrade::config::Settings;
use pmf_upgrade::errors::{ApiError, RawResponse};
use pmf_upgrade::state::faq_overview::OverviewItem;
use pmf_upgrade::state::pipeline::{Highlight, StepEvent, StepId, StepStatus};
use pmf_upgrade::types::{
    ActionResponse, AppState, DownloadResponse, ExtractResponse, FaqRow, HealthResponse,
    InputMode, OperationMode, StatusKind, VersionInfo,
};

fn create_test_app(mock: MockAdminApiTrait) -> App {
    App::new(Box::new(mock), Settings::default(), false)
}

fn faq(id: i64, category_id: i64) -> FaqRow {
    FaqRow {
        id,
        language: "en".to_string(),
        solution_id: 1000 + id,
        question: format!("Question {id}?"),
        created_at: "2024-01-05 10:00".to_string(),
        sticky: false,
        active: true,
        category_id,
    }
}

fn version_info(version: &str) -> VersionInfo {
    VersionInfo {
        date_last_checked: "2024-05-01T12:00:00+00:00".to_string(),
        version: version.to_string(),
        message: format!("phpMyFAQ {version} is available"),
    }
}

#[test]
fn test_app_initialization() {
    let app = create_test_app(MockAdminApiTrait::new());

    assert_eq!(app.state, AppState::SelectingOperation);
    assert!(!app.dry_run_mode);
    assert!(!app.loading());
    assert!(app.overview.sections.is_empty());
    assert_eq!(app.pipeline.release_environment, "production");
}

#[tokio::test]
async fn test_select_operation_update() {
    let mut app = create_test_app(MockAdminApiTrait::new());
    app.selected_operation_index = 0;

    app.select_current_item().await.unwrap();

    assert_eq!(app.state, AppState::UpdateWizard);
    assert_eq!(app.operation_mode, Some(OperationMode::Update));
    assert!(!app.manual_input_active);
}

#[tokio::test]
async fn test_select_overview_without_categories_asks_for_one() {
    let mut app = create_test_app(MockAdminApiTrait::new());
    app.selected_operation_index = 1;

    app.select_current_item().await.unwrap();

    assert_eq!(app.state, AppState::FaqOverview);
    assert_eq!(app.operation_mode, Some(OperationMode::FaqOverview));
    assert!(app.manual_input_active);
    assert_eq!(app.manual_input_type, "category");
}

#[tokio::test]
async fn test_finish_manual_input_category_loads_rows() {
    let mut mock = MockAdminApiTrait::new();
    mock.expect_fetch_faqs_by_category()
        .withf(|id| *id == 7)
        .times(1)
        .returning(|_| Ok(vec![faq(1, 7), faq(2, 7)]));

    let mut app = create_test_app(mock);
    app.state = AppState::FaqOverview;
    app.start_manual_input("category");
    app.manual_input_buffer = " 7 ".to_string();

    app.finish_manual_input().await.unwrap();
    app.settle().await;

    assert!(!app.manual_input_active);
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.remembered_categories, vec![7]);
    let section = &app.overview.sections[0];
    assert!(section.expanded);
    assert!(!section.loading);
    assert_eq!(section.rows.len(), 2);
    assert!(section.all_active);
    assert!(!section.all_sticky);
}

#[tokio::test]
async fn test_finish_manual_input_rejects_non_numeric_category() {
    let mut app = create_test_app(MockAdminApiTrait::new());
    app.start_manual_input("category");
    app.manual_input_buffer = "faq".to_string();

    app.finish_manual_input().await.unwrap();

    assert!(app.overview.sections.is_empty());
    assert!(app.error.is_some());
}

#[tokio::test]
async fn test_health_check_applies_success_and_warning() {
    let mut mock = MockAdminApiTrait::new();
    mock.expect_health_check().times(1).returning(|| {
        Ok(HealthResponse {
            success: Some("All good".to_string()),
            warning: Some("Folder permissions look odd".to_string()),
        })
    });

    let mut app = create_test_app(mock);
    app.trigger_step(StepId::HealthCheck);
    assert_eq!(app.pipeline.card(StepId::HealthCheck).status, StepStatus::Running);
    app.settle().await;

    let card = app.pipeline.card(StepId::HealthCheck);
    assert!(card.highlights.contains(&Highlight::Success));
    assert!(card.highlights.contains(&Highlight::Warning));
    assert_eq!(card.status, StepStatus::Warning);
    assert_eq!(card.result.as_deref(), Some("Folder permissions look odd"));
    assert!(!app.loading());
}

#[tokio::test]
async fn test_version_check_failure_keeps_card_idle() {
    let mut mock = MockAdminApiTrait::new();
    mock.expect_check_for_updates().times(1).returning(|| {
        Err(ApiError::Status {
            endpoint: "api/update-check".to_string(),
            response: RawResponse {
                status: 500,
                body: r#"{"error":"Cannot reach update server"}"#.to_string(),
            },
        })
    });

    let mut app = create_test_app(mock);
    app.trigger_step(StepId::CheckVersions);
    app.settle().await;

    let card = app.pipeline.card(StepId::CheckVersions);
    assert_eq!(card.status, StepStatus::Pending);
    assert!(card.result.is_none());
    assert!(app.pipeline.version_last_checked.is_none());
}

#[tokio::test]
async fn test_download_requires_a_checked_version() {
    let mut mock = MockAdminApiTrait::new();
    mock.expect_download_package().times(0);

    let mut app = create_test_app(mock);
    app.trigger_step(StepId::Download);
    app.settle().await;

    let card = app.pipeline.card(StepId::Download);
    assert_eq!(card.status, StepStatus::Error);
    assert!(card.result.is_some());
}

#[tokio::test]
async fn test_download_uses_checked_version() {
    let mut mock = MockAdminApiTrait::new();
    mock.expect_check_for_updates()
        .times(1)
        .returning(|| Ok(version_info("4.0.1")));
    mock.expect_download_package()
        .withf(|v| v == "4.0.1")
        .times(1)
        .returning(|v| {
            Ok(DownloadResponse {
                version: Some(v.to_string()),
                success: "Package downloaded".to_string(),
            })
        });

    let mut app = create_test_app(mock);
    app.trigger_step(StepId::CheckVersions);
    app.settle().await;
    assert_eq!(app.pipeline.version_last_checked.as_deref(), Some("4.0.1"));
    assert!(app.pipeline.date_last_checked.is_some());

    app.trigger_step(StepId::Download);
    app.settle().await;

    assert_eq!(app.pipeline.card(StepId::Download).status, StepStatus::Success);
    assert!(app.pipeline.card(StepId::Extract).revealed);
    assert!(!app.pipeline.card(StepId::Install).revealed);
}

#[tokio::test]
async fn test_nightly_installation_downloads_nightly() {
    let mut mock = MockAdminApiTrait::new();
    mock.expect_download_package()
        .withf(|v| v == "nightly")
        .times(1)
        .returning(|_| {
            Ok(DownloadResponse {
                version: None,
                success: "Nightly build downloaded".to_string(),
            })
        });

    let settings = Settings {
        release_environment: "NightLY".to_string(),
        ..Settings::default()
    };
    let mut app = App::new(Box::new(mock), settings, false);
    app.trigger_step(StepId::Download);
    app.settle().await;

    assert_eq!(app.pipeline.card(StepId::Download).status, StepStatus::Success);
}

#[tokio::test]
async fn test_locked_steps_cannot_be_triggered() {
    let mut mock = MockAdminApiTrait::new();
    mock.expect_extract_package().times(0);
    mock.expect_create_temporary_backup().times(0);

    let mut app = create_test_app(mock);
    app.trigger_step(StepId::Extract);
    app.trigger_step(StepId::Install);

    assert!(!app.loading());
    assert_eq!(app.pipeline.card(StepId::Extract).status, StepStatus::Pending);
}

#[tokio::test]
async fn test_backup_failure_never_installs() {
    let mut mock = MockAdminApiTrait::new();
    mock.expect_create_temporary_backup().times(1).returning(|| {
        Err(ApiError::Status {
            endpoint: "api/create-temporary-backup".to_string(),
            response: RawResponse {
                status: 500,
                body: "disk full".to_string(),
            },
        })
    });
    mock.expect_install_package().times(0);

    let mut app = create_test_app(mock);
    app.pipeline.apply(StepEvent::Extracted(ExtractResponse {
        success: None,
        message: "Extracted".to_string(),
    }));

    app.trigger_step(StepId::Install);
    app.settle().await;

    assert_eq!(app.pipeline.card(StepId::Install).status, StepStatus::Pending);
    assert!(app.pipeline.install.is_none());
    let backup = app.pipeline.backup.as_ref().unwrap();
    assert!(!backup.is_animated());
}

#[tokio::test]
async fn test_toggle_all_sends_every_row_of_the_category() {
    let mut mock = MockAdminApiTrait::new();
    mock.expect_fetch_faqs_by_category()
        .times(1)
        .returning(|id| Ok(vec![faq(1, id), faq(2, id), faq(3, id)]));
    mock.expect_save_status()
        .withf(|kind, request| {
            *kind == StatusKind::Sticky
                && request.faq_ids == vec![1, 2, 3]
                && request.checked
                && request.category_id == 5
                && request.csrf == "token"
        })
        .times(1)
        .returning(|_, _| {
            Ok(ActionResponse {
                success: Some(serde_json::json!("saved")),
                error: None,
            })
        });

    let settings = Settings {
        categories: vec![5],
        csrf_token: Some("token".to_string()),
        ..Settings::default()
    };
    let mut app = App::new(Box::new(mock), settings, false);
    app.state = AppState::FaqOverview;

    app.select_current_item().await.unwrap();
    app.settle().await;
    assert_eq!(app.overview.sections[0].rows.len(), 3);

    app.toggle_all_in_selected_section(StatusKind::Sticky);
    app.settle().await;

    assert!(app.overview.sections[0].all_sticky);
    assert!(app.overview.sections[0].rows.iter().all(|r| r.sticky));
}

#[tokio::test]
async fn test_delete_requires_confirmation() {
    let mut mock = MockAdminApiTrait::new();
    mock.expect_fetch_faqs_by_category()
        .times(1)
        .returning(|id| Ok(vec![faq(1, id), faq(2, id)]));
    mock.expect_delete_faq()
        .withf(|request| request.faq_id == 1 && request.faq_language == "en")
        .times(1)
        .returning(|_| {
            Ok(ActionResponse {
                success: Some(serde_json::json!("deleted")),
                error: None,
            })
        });

    let settings = Settings {
        categories: vec![9],
        ..Settings::default()
    };
    let mut app = App::new(Box::new(mock), settings, false);
    app.state = AppState::FaqOverview;
    app.toggle_selected_section();
    app.settle().await;

    app.move_selection_down();
    assert_eq!(app.overview.selected(), Some(OverviewItem::Row(0, 0)));

    app.request_delete_selected();
    assert_eq!(app.state, AppState::ConfirmDelete);

    app.confirm_delete();
    app.settle().await;

    assert_eq!(app.state, AppState::FaqOverview);
    assert_eq!(
        app.overview.sections[0].rows.iter().map(|r| r.id).collect::<Vec<_>>(),
        vec![2]
    );
    assert!(app.overview.pending_delete.is_none());
}

#[test]
fn test_navigation_step_selection() {
    let mut app = create_test_app(MockAdminApiTrait::new());
    app.state = AppState::UpdateWizard;

    app.move_selection_up();
    assert_eq!(app.selected_step_index, 0);

    for _ in 0..10 {
        app.move_selection_down();
    }
    assert_eq!(app.selected_step_index, 4);
    assert_eq!(app.selected_step(), StepId::Install);

    app.move_selection_up();
    assert_eq!(app.selected_step(), StepId::Extract);
}

#[tokio::test]
async fn test_reset_starts_over() {
    let mut app = create_test_app(MockAdminApiTrait::new());
    app.state = AppState::UpdateWizard;
    app.operation_mode = Some(OperationMode::Update);
    app.pipeline.apply(StepEvent::VersionChecked(version_info("4.0.1")));

    app.reset();

    assert_eq!(app.state, AppState::SelectingOperation);
    assert!(app.operation_mode.is_none());
    assert!(app.pipeline.version_last_checked.is_none());
}
