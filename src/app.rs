use anyhow::Result;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use crate::api::AdminApiTrait;
use crate::config::Settings;
use crate::effects;
use crate::state::faq_overview::{FaqOverview, OverviewEvent, OverviewItem};
use crate::state::pipeline::{PipelineState, StepEvent, StepId};
use crate::types::{AppState, InputMode, OperationMode, StatusKind, StatusToggleRequest};

/// Results sent back by spawned effects. `Settled` marks the end of one effect task.
#[derive(Debug)]
pub enum AppEvent {
    Pipeline(StepEvent),
    Overview(OverviewEvent),
    Settled,
}

pub struct App {
    pub operation_mode: Option<OperationMode>,
    pub state: AppState,
    pub dry_run_mode: bool,
    pub input_mode: InputMode,
    pub settings: Settings,
    pub pipeline: PipelineState,
    pub overview: FaqOverview,
    pub remembered_categories: Vec<i64>,
    pub selected_operation_index: usize,
    pub selected_step_index: usize,
    pub show_help: bool,
    pub should_quit: bool,
    pub error: Option<String>,
    pub manual_input_active: bool,
    pub manual_input_buffer: String,
    pub manual_input_type: String, // "category"
    api: Arc<dyn AdminApiTrait>,
    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,
    in_flight: usize,
}

impl App {
    pub fn new(api: Box<dyn AdminApiTrait>, settings: Settings, dry_run_mode: bool) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Self {
            operation_mode: None,
            state: AppState::SelectingOperation,
            dry_run_mode,
            input_mode: InputMode::Normal,
            pipeline: PipelineState::new(settings.release_environment.clone()),
            overview: FaqOverview::new(&settings.categories),
            remembered_categories: settings.categories.clone(),
            settings,
            selected_operation_index: 0,
            selected_step_index: 0,
            show_help: false,
            should_quit: false,
            error: None,
            manual_input_active: false,
            manual_input_buffer: String::new(),
            manual_input_type: String::new(),
            api: Arc::from(api),
            events_tx,
            events_rx,
            in_flight: 0,
        }
    }

    pub fn loading(&self) -> bool {
        self.in_flight > 0
    }

    fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.in_flight += 1;
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            task.await;
            let _ = tx.send(AppEvent::Settled);
        });
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Pipeline(event) => self.pipeline.apply(event),
            AppEvent::Overview(event) => self.overview.apply(event),
            AppEvent::Settled => self.in_flight = self.in_flight.saturating_sub(1),
        }
    }

    /// Applies everything the effects reported since the last tick.
    pub fn pump_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
        }
    }

    /// Waits until every spawned effect has finished and its events are applied.
    pub async fn settle(&mut self) {
        while self.in_flight > 0 {
            match self.events_rx.recv().await {
                Some(event) => self.handle_event(event),
                None => break,
            }
        }
    }

    pub fn trigger_step(&mut self, step: StepId) {
        if !self.pipeline.can_trigger(step) {
            debug!(?step, "step is locked or already running");
            return;
        }

        let version = if step == StepId::Download {
            match self.pipeline.download_target() {
                Some(version) => Some(version),
                None => {
                    self.pipeline.apply(StepEvent::DownloadFailed(
                        "Please check for updates before downloading a package.".to_string(),
                    ));
                    return;
                }
            }
        } else {
            None
        };

        info!(?step, "starting step");
        self.pipeline.apply(StepEvent::Started(step));

        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        let emit = move |event: StepEvent| {
            let _ = tx.send(AppEvent::Pipeline(event));
        };

        match step {
            StepId::HealthCheck => self.spawn(async move {
                emit(effects::check_health(api.as_ref()).await);
            }),
            StepId::CheckVersions => self.spawn(async move {
                emit(effects::check_versions(api.as_ref()).await);
            }),
            StepId::Download => {
                let version = version.unwrap_or_default();
                self.spawn(async move {
                    emit(effects::download(api.as_ref(), &version).await);
                })
            }
            StepId::Extract => self.spawn(async move {
                emit(effects::extract(api.as_ref()).await);
            }),
            StepId::Install => {
                let stall_timeout = self.settings.stall_timeout();
                self.spawn(async move {
                    effects::backup_and_install(api.as_ref(), stall_timeout, emit).await;
                })
            }
        }
    }

    fn send_overview<F>(&mut self, task: F)
    where
        F: Future<Output = Option<OverviewEvent>> + Send + 'static,
    {
        let tx = self.events_tx.clone();
        self.spawn(async move {
            if let Some(event) = task.await {
                let _ = tx.send(AppEvent::Overview(event));
            }
        });
    }

    fn load_section(&mut self, section: usize) {
        if let Some(category_id) = self.overview.expand(section) {
            let api = Arc::clone(&self.api);
            self.send_overview(async move {
                Some(effects::load_category(api.as_ref(), category_id).await)
            });
        }
    }

    /// Expands a collapsed category (fetching its rows) or collapses an expanded one.
    pub fn toggle_selected_section(&mut self) {
        let Some(section) = self.overview.selected_section() else {
            return;
        };
        if self.overview.sections[section].expanded {
            self.overview.collapse(section);
        } else {
            self.load_section(section);
        }
    }

    pub fn refresh_selected_section(&mut self) {
        if let Some(section) = self.overview.selected_section() {
            if self.overview.sections[section].expanded {
                self.overview.select_section(section);
                self.load_section(section);
            }
        }
    }

    fn send_status(&mut self, kind: StatusKind, request: StatusToggleRequest) {
        let api = Arc::clone(&self.api);
        self.send_overview(async move {
            effects::save_status(api.as_ref(), kind, request).await;
            None
        });
    }

    pub fn toggle_selected_status(&mut self, kind: StatusKind) {
        let Some(OverviewItem::Row(section, row)) = self.overview.selected() else {
            return;
        };
        let csrf = self.settings.csrf();
        if let Some(request) = self.overview.toggle_row(section, row, kind, &csrf) {
            self.send_status(kind, request);
        }
    }

    pub fn toggle_all_in_selected_section(&mut self, kind: StatusKind) {
        let Some(section) = self.overview.selected_section() else {
            return;
        };
        let csrf = self.settings.csrf();
        if let Some(request) = self.overview.toggle_all(section, kind, &csrf) {
            self.send_status(kind, request);
        }
    }

    pub fn request_delete_selected(&mut self) {
        if let Some(OverviewItem::Row(section, row)) = self.overview.selected() {
            if self.overview.request_delete(section, row).is_some() {
                self.state = AppState::ConfirmDelete;
            }
        }
    }

    pub fn confirm_delete(&mut self) {
        let csrf = self.settings.csrf();
        if let Some(request) = self.overview.confirm_delete(&csrf) {
            info!(faq_id = request.faq_id, language = %request.faq_language, "deleting FAQ");
            let api = Arc::clone(&self.api);
            self.send_overview(async move { effects::delete_faq(api.as_ref(), request).await });
        }
        self.state = AppState::FaqOverview;
    }

    pub fn cancel_delete(&mut self) {
        self.overview.cancel_delete();
        self.state = AppState::FaqOverview;
    }

    pub fn move_selection_up(&mut self) {
        match self.state {
            AppState::SelectingOperation => {
                if self.selected_operation_index > 0 {
                    self.selected_operation_index -= 1;
                }
            }
            AppState::UpdateWizard => {
                if self.selected_step_index > 0 {
                    self.selected_step_index -= 1;
                }
            }
            AppState::FaqOverview => self.overview.move_up(),
            _ => {}
        }
    }

    pub fn move_selection_down(&mut self) {
        match self.state {
            AppState::SelectingOperation => {
                if self.selected_operation_index < 1 {
                    self.selected_operation_index += 1;
                }
            }
            AppState::UpdateWizard => {
                if self.selected_step_index < StepId::ALL.len() - 1 {
                    self.selected_step_index += 1;
                }
            }
            AppState::FaqOverview => self.overview.move_down(),
            _ => {}
        }
    }

    pub fn selected_step(&self) -> StepId {
        StepId::ALL[self.selected_step_index.min(StepId::ALL.len() - 1)]
    }

    pub async fn select_current_item(&mut self) -> Result<()> {
        match self.state {
            AppState::SelectingOperation => {
                let selected_mode = if self.selected_operation_index == 0 {
                    OperationMode::Update
                } else {
                    OperationMode::FaqOverview
                };
                self.operation_mode = Some(selected_mode);
                match selected_mode {
                    OperationMode::Update => self.state = AppState::UpdateWizard,
                    OperationMode::FaqOverview => {
                        self.state = AppState::FaqOverview;
                        if self.overview.sections.is_empty() {
                            self.start_manual_input("category");
                        }
                    }
                }
            }
            AppState::UpdateWizard => self.trigger_step(self.selected_step()),
            AppState::FaqOverview => {
                if let Some(OverviewItem::Section(_)) = self.overview.selected() {
                    self.toggle_selected_section();
                }
            }
            AppState::ConfirmDelete => self.confirm_delete(),
            AppState::Error(_) => {}
        }
        Ok(())
    }

    /// Starts over with a fresh wizard and overview. Ignored while effects are running.
    pub fn reset(&mut self) {
        if self.loading() {
            debug!("reset ignored while requests are in flight");
            return;
        }
        self.state = AppState::SelectingOperation;
        self.operation_mode = None;
        self.selected_step_index = 0;
        self.pipeline = PipelineState::new(self.settings.release_environment.clone());
        self.overview = FaqOverview::new(&self.remembered_categories);
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn start_manual_input(&mut self, input_type: &str) {
        self.manual_input_active = true;
        self.manual_input_type = input_type.to_string();
        self.manual_input_buffer.clear();
        self.input_mode = InputMode::Editing;
    }

    pub async fn finish_manual_input(&mut self) -> Result<()> {
        let input_value = self.manual_input_buffer.trim().to_string();
        if !input_value.is_empty() {
            match self.manual_input_type.as_str() {
                "category" => match input_value.parse::<i64>() {
                    Ok(category_id) => {
                        if !self.remembered_categories.contains(&category_id) {
                            self.remembered_categories.push(category_id);
                        }
                        let section = self.overview.add_category(category_id);
                        self.overview.select_section(section);
                        if !self.overview.sections[section].expanded {
                            self.load_section(section);
                        }
                    }
                    Err(_) => {
                        self.error = Some(format!("'{input_value}' is not a category id"));
                    }
                },
                _ => {}
            }
        }
        self.manual_input_active = false;
        self.manual_input_buffer.clear();
        self.input_mode = InputMode::Normal;
        Ok(())
    }

    pub fn cancel_manual_input(&mut self) {
        self.manual_input_active = false;
        self.manual_input_buffer.clear();
        self.input_mode = InputMode::Normal;
    }
}
