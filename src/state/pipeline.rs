//! Update wizard state: one card per step plus the two install progress bars.
//!
//! All mutation goes through [`PipelineState::apply`]; network effects live in
//! `crate::effects` and report back with [`StepEvent`]s.

use chrono::{DateTime, Local};
use std::collections::BTreeSet;
use tracing::{debug, info};

use crate::progress::ProgressBar;
use crate::types::{DownloadResponse, ExtractResponse, HealthResponse, ProgressEvent, VersionInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StepId {
    HealthCheck,
    CheckVersions,
    Download,
    Extract,
    Install,
}

impl StepId {
    pub const ALL: [StepId; 5] = [
        StepId::HealthCheck,
        StepId::CheckVersions,
        StepId::Download,
        StepId::Extract,
        StepId::Install,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            StepId::HealthCheck => "Health check",
            StepId::CheckVersions => "Check for updates",
            StepId::Download => "Download package",
            StepId::Extract => "Extract package",
            StepId::Install => "Install package",
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            StepId::HealthCheck => "Check health",
            StepId::CheckVersions => "Check for updates",
            StepId::Download => "Download now",
            StepId::Extract => "Extract package",
            StepId::Install => "Install package",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Pending,
    Running,
    Success,
    Warning,
    Error,
}

/// Card decorations. Both may be present at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Highlight {
    Success,
    Warning,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepCard {
    pub id: StepId,
    pub status: StepStatus,
    pub highlights: BTreeSet<Highlight>,
    pub result: Option<String>,
    pub revealed: bool,
}

impl StepCard {
    fn new(id: StepId) -> Self {
        Self {
            id,
            status: StepStatus::Pending,
            highlights: BTreeSet::new(),
            result: None,
            revealed: !matches!(id, StepId::Extract | StepId::Install),
        }
    }

    fn highlight(&mut self, highlight: Highlight, message: Option<String>) {
        self.highlights.insert(highlight);
        self.status = match highlight {
            Highlight::Success => StepStatus::Success,
            Highlight::Warning => StepStatus::Warning,
        };
        if message.is_some() {
            self.result = message;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepEvent {
    Started(StepId),
    HealthChecked(HealthResponse),
    VersionChecked(VersionInfo),
    Downloaded(DownloadResponse),
    DownloadFailed(String),
    Extracted(ExtractResponse),
    BackupProgress(ProgressEvent),
    BackupFinished,
    InstallProgress(ProgressEvent),
    InstallFinished,
    /// A failure that was only logged; the card goes back to idle.
    Failed(StepId),
}

#[derive(Debug, Clone)]
pub struct PipelineState {
    cards: Vec<StepCard>,
    pub release_environment: String,
    pub date_last_checked: Option<String>,
    pub version_last_checked: Option<String>,
    pub backup: Option<ProgressBar>,
    pub install: Option<ProgressBar>,
}

impl PipelineState {
    pub fn new(release_environment: impl Into<String>) -> Self {
        Self {
            cards: StepId::ALL.iter().copied().map(StepCard::new).collect(),
            release_environment: release_environment.into(),
            date_last_checked: None,
            version_last_checked: None,
            backup: None,
            install: None,
        }
    }

    pub fn card(&self, id: StepId) -> &StepCard {
        &self.cards[id.index()]
    }

    fn card_mut(&mut self, id: StepId) -> &mut StepCard {
        &mut self.cards[id.index()]
    }

    pub fn cards(&self) -> &[StepCard] {
        &self.cards
    }

    /// Whether a step's action is currently available.
    pub fn can_trigger(&self, id: StepId) -> bool {
        let card = self.card(id);
        card.revealed && card.status != StepStatus::Running
    }

    pub fn is_nightly(&self) -> bool {
        self.release_environment.trim().eq_ignore_ascii_case("nightly")
    }

    /// Version to download: always `nightly` on nightly installations, else the last checked one.
    pub fn download_target(&self) -> Option<String> {
        if self.is_nightly() {
            Some("nightly".to_string())
        } else {
            self.version_last_checked.clone()
        }
    }

    pub fn any_running(&self) -> bool {
        self.cards.iter().any(|c| c.status == StepStatus::Running)
    }

    pub fn apply(&mut self, event: StepEvent) {
        debug!(?event, "pipeline event");
        match event {
            StepEvent::Started(id) => {
                self.card_mut(id).status = StepStatus::Running;
                if id == StepId::Install {
                    self.backup = Some(ProgressBar::new());
                    self.install = None;
                }
            }
            StepEvent::HealthChecked(response) => {
                let card = self.card_mut(StepId::HealthCheck);
                card.status = StepStatus::Pending;
                if let Some(message) = response.success {
                    card.highlight(Highlight::Success, Some(message));
                }
                if let Some(message) = response.warning {
                    card.highlight(Highlight::Warning, Some(message));
                }
            }
            StepEvent::VersionChecked(info) => {
                self.date_last_checked = Some(format_checked_date(&info.date_last_checked));
                self.version_last_checked = Some(info.version.clone());
                self.card_mut(StepId::CheckVersions)
                    .highlight(Highlight::Success, Some(info.message));
            }
            StepEvent::Downloaded(response) => {
                self.card_mut(StepId::Download)
                    .highlight(Highlight::Success, Some(response.success));
                self.card_mut(StepId::Extract).revealed = true;
            }
            StepEvent::DownloadFailed(message) => {
                let card = self.card_mut(StepId::Download);
                card.status = StepStatus::Error;
                card.result = Some(message);
            }
            StepEvent::Extracted(response) => {
                self.card_mut(StepId::Install).revealed = true;
                self.card_mut(StepId::Extract)
                    .highlight(Highlight::Success, Some(response.message));
            }
            StepEvent::BackupProgress(progress) => {
                self.backup.get_or_insert_with(ProgressBar::new).advance(&progress);
            }
            StepEvent::BackupFinished => {
                self.backup.get_or_insert_with(ProgressBar::new).complete();
                self.install = Some(ProgressBar::new());
                info!("temporary backup finished");
            }
            StepEvent::InstallProgress(progress) => {
                self.install.get_or_insert_with(ProgressBar::new).advance(&progress);
            }
            StepEvent::InstallFinished => {
                self.install.get_or_insert_with(ProgressBar::new).complete();
                self.card_mut(StepId::Install).highlight(Highlight::Success, None);
                info!("package installed");
            }
            StepEvent::Failed(id) => {
                let card = self.card_mut(id);
                if card.status == StepStatus::Running {
                    card.status = if card.highlights.contains(&Highlight::Warning) {
                        StepStatus::Warning
                    } else if card.highlights.contains(&Highlight::Success) {
                        StepStatus::Success
                    } else {
                        StepStatus::Pending
                    };
                }
                if id == StepId::Install {
                    for bar in [self.backup.as_mut(), self.install.as_mut()].into_iter().flatten() {
                        bar.halt();
                    }
                }
            }
        }
    }
}

/// Renders the server timestamp in the local timezone; unparseable values are shown verbatim.
pub fn format_checked_date(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(date) => date.with_timezone(&Local).format("%c").to_string(),
        Err(_) => raw.to_string(),
    }
}
