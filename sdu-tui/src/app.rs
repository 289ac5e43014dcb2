//! Application state: single-owner, main-thread only.
//!
//! All TUI state lives here. The worker thread communicates via channels.

use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, Sender};

use chrono::NaiveDateTime;

use sdu_core::flows::{LoginFlow, SearchFlow, UploadFlow};
use sdu_core::reference::{self, ReferenceCodeEntry};
use sdu_core::transport::TransportError;
use sdu_core::{Screen, Session};

use crate::theme::Theme;
use crate::worker::{WorkerCommand, WorkerResponse};

const ERROR_HISTORY_CAP: usize = 50;

/// Status bar message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// An error record for the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    pub context: String,
}

/// Error category for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Server,
    Validation,
    Other,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Network => "NET",
            ErrorCategory::Server => "SRV",
            ErrorCategory::Validation => "FORM",
            ErrorCategory::Other => "ERR",
        }
    }
}

/// CID screen state. Lookups are local and synchronous.
#[derive(Debug, Default)]
pub struct ReferenceState {
    pub input: String,
    pub selected: Option<&'static ReferenceCodeEntry>,
    /// Code of the last lookup, used for the "not found" hint.
    pub last_lookup: Option<String>,
}

impl ReferenceState {
    pub fn lookup(&mut self) {
        if self.input.trim().is_empty() {
            return;
        }
        self.selected = reference::lookup(&self.input);
        self.last_lookup = Some(self.input.to_uppercase());
    }

    pub fn not_found(&self) -> bool {
        self.last_lookup.is_some() && self.selected.is_none()
    }
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Help,
    ErrorHistory,
}

/// Top-level application state.
pub struct AppState {
    // Navigation
    pub session: Session,
    pub running: bool,
    pub overlay: Overlay,

    // Screen states
    pub login: LoginFlow,
    pub search: SearchFlow,
    pub upload: UploadFlow,
    pub reference: ReferenceState,

    // Worker communication
    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,

    // Cross-cutting
    pub dark_mode: bool,
    pub theme: Theme,
    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
    pub base_url: String,
}

impl AppState {
    pub fn new(
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
        base_url: String,
    ) -> Self {
        Self {
            session: Session::new(),
            running: true,
            overlay: Overlay::None,
            login: LoginFlow::new(),
            search: SearchFlow::new(),
            upload: UploadFlow::new(),
            reference: ReferenceState::default(),
            worker_tx,
            worker_rx,
            dark_mode: true,
            theme: Theme::dark(),
            status_message: None,
            error_history: VecDeque::with_capacity(ERROR_HISTORY_CAP),
            error_scroll: 0,
            base_url,
        }
    }

    pub fn screen(&self) -> Screen {
        self.session.screen()
    }

    /// Record an error in the history only; the status bar is left alone.
    pub fn record_error(&mut self, category: ErrorCategory, message: String, context: String) {
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message,
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > ERROR_HISTORY_CAP {
            self.error_history.pop_back();
        }
    }

    /// Push an error to the history and show it in the status bar.
    pub fn push_error(&mut self, category: ErrorCategory, message: String, context: String) {
        self.record_error(category, message.clone(), context);
        self.status_message = Some((message, StatusLevel::Error));
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    pub fn toggle_theme(&mut self) {
        self.dark_mode = !self.dark_mode;
        self.theme = Theme::for_mode(self.dark_mode);
    }

    pub fn navigate(&mut self, screen: Screen) {
        if self.session.navigate(screen) {
            self.overlay = Overlay::None;
        }
    }

    /// Send a command to the worker. A dead worker is reported as a
    /// transport failure so callers can clear their busy flag.
    fn dispatch(&mut self, cmd: WorkerCommand) -> Result<(), TransportError> {
        self.worker_tx.send(cmd).map_err(|_| {
            let err = TransportError::Other("background worker stopped".into());
            self.push_error(ErrorCategory::Other, err.to_string(), String::new());
            err
        })
    }

    pub fn start_session_check(&mut self) {
        if self.session.begin_check() && self.dispatch(WorkerCommand::CheckSession).is_err() {
            self.session.finish_check(false);
        }
    }

    pub fn submit_login(&mut self) {
        if let Some(credentials) = self.login.begin_submit() {
            if let Err(e) = self.dispatch(WorkerCommand::Login(credentials)) {
                self.login.finish_submit(Err(e), &mut self.session);
            }
        }
    }

    pub fn submit_search(&mut self) {
        if let Some(query) = self.search.begin_search() {
            if let Err(e) = self.dispatch(WorkerCommand::SearchExams { query }) {
                self.search.finish_search(Err(e));
            }
        }
    }

    pub fn request_download(&mut self) {
        if let Some(exam_id) = self.search.begin_download() {
            self.set_status(format!("Resolving download link for exam #{exam_id}..."));
            if let Err(e) = self.dispatch(WorkerCommand::ResolveDownload { exam_id }) {
                self.search.finish_download(Err(e));
            }
        }
    }

    pub fn submit_upload(&mut self) {
        match self.upload.begin_submit() {
            Some(upload) => {
                if let Err(e) = self.dispatch(WorkerCommand::Upload(Box::new(upload))) {
                    self.upload.finish_submit(Err(e));
                }
            }
            None => {
                if let Some(msg) = self.upload.error() {
                    let msg = msg.to_string();
                    self.record_error(ErrorCategory::Validation, msg, "upload form".into());
                }
            }
        }
    }

    /// Logout is client-side only; every screen's local state is dropped.
    pub fn logout(&mut self) {
        self.session.logout();
        self.login.reset();
        self.search.reset();
        self.upload.reset();
        self.reference = ReferenceState::default();
        self.overlay = Overlay::None;
        self.set_status("Logged out");
    }

    /// Apply a worker response to the owning flow.
    pub fn handle_worker_response(&mut self, resp: WorkerResponse) {
        match resp {
            WorkerResponse::SessionChecked { confirmed } => {
                self.session.finish_check(confirmed);
                if confirmed {
                    self.set_status("Existing session restored");
                }
            }
            WorkerResponse::LoginDone(result) => {
                if let Err(e) = &result {
                    // Not shown on the login screen; only the history keeps it.
                    self.record_error(ErrorCategory::Network, e.to_string(), "login".into());
                }
                self.login.finish_submit(result, &mut self.session);
                if self.session.is_authenticated() {
                    self.set_status(format!("Logged in as {}", self.login.username));
                }
            }
            WorkerResponse::SearchDone(result) => {
                match &result {
                    Err(e) => {
                        self.record_error(ErrorCategory::Network, e.to_string(), "exam search".into())
                    }
                    Ok(sdu_core::SearchOutcome::Rejected { status }) => self.record_error(
                        ErrorCategory::Server,
                        format!("search rejected with HTTP {status}"),
                        "exam search".into(),
                    ),
                    Ok(sdu_core::SearchOutcome::Malformed(e)) => self.record_error(
                        ErrorCategory::Server,
                        e.to_string(),
                        "exam search".into(),
                    ),
                    Ok(_) => {}
                }
                self.search.finish_search(result);
            }
            WorkerResponse::DownloadDone(result) => {
                match &result {
                    Err(e) => {
                        self.record_error(ErrorCategory::Network, e.to_string(), "download".into())
                    }
                    Ok(sdu_core::DownloadOutcome::Rejected { status }) => self.record_error(
                        ErrorCategory::Server,
                        format!("download rejected with HTTP {status}"),
                        "download".into(),
                    ),
                    Ok(sdu_core::DownloadOutcome::Malformed(e)) => {
                        self.record_error(ErrorCategory::Server, e.to_string(), "download".into())
                    }
                    Ok(sdu_core::DownloadOutcome::Ready(_)) => {}
                }
                match self.search.finish_download(result) {
                    Some(url) => self.set_status(format!("Download: {url}")),
                    None => self.status_message = None,
                }
            }
            WorkerResponse::UploadDone(result) => {
                self.upload.finish_submit(result);
                if self.upload.succeeded() {
                    self.set_status("File uploaded");
                } else if let Some(msg) = self.upload.error() {
                    let msg = msg.to_string();
                    self.push_error(ErrorCategory::Server, msg, "upload".into());
                }
            }
        }
    }
}
