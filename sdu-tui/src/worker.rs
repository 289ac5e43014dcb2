//! Background worker thread: every HTTP call runs here.
//!
//! Communication with the TUI main thread is via `mpsc` channels. Requests
//! are handled one at a time; the flows' busy flags keep each screen to a
//! single request in flight. The startup session check runs on its own
//! short-lived thread so a slow backend never queues a login behind it.

use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use sdu_core::api::Credentials;
use sdu_core::transport::{Transport, TransportError};
use sdu_core::{ApiClient, DownloadOutcome, LoginOutcome, SearchOutcome, UploadOutcome, ValidatedUpload};

/// Commands sent from the TUI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    CheckSession,
    Login(Credentials),
    SearchExams { query: String },
    ResolveDownload { exam_id: u64 },
    Upload(Box<ValidatedUpload>),
    Shutdown,
}

/// Responses sent from the worker back to the TUI.
#[derive(Debug, Clone)]
pub enum WorkerResponse {
    /// Startup check; transport failures already folded into `false`.
    SessionChecked { confirmed: bool },
    LoginDone(Result<LoginOutcome, TransportError>),
    SearchDone(Result<SearchOutcome, TransportError>),
    DownloadDone(Result<DownloadOutcome, TransportError>),
    UploadDone(Result<UploadOutcome, TransportError>),
}

/// Spawn the background worker thread owning the API client.
pub fn spawn_worker<T: Transport + 'static>(
    client: ApiClient<T>,
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("sdu-worker".into())
        .spawn(move || worker_loop(Arc::new(client), rx, tx))
}

fn worker_loop<T: Transport + 'static>(
    client: Arc<ApiClient<T>>,
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
) {
    tracing::debug!(transport = client.transport().name(), "worker started");
    loop {
        match rx.recv() {
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
            Ok(WorkerCommand::CheckSession) => spawn_session_check(Arc::clone(&client), tx.clone()),
            Ok(cmd) => {
                let response = handle_command(&client, cmd);
                if let Some(response) = response {
                    if tx.send(response).is_err() {
                        break;
                    }
                }
            }
        }
    }
    tracing::debug!("worker stopped");
}

/// Run the startup check off the serial queue. The answer may arrive after
/// a login has already finished; `Session::finish_check` ignores it then.
fn spawn_session_check<T: Transport + 'static>(
    client: Arc<ApiClient<T>>,
    tx: Sender<WorkerResponse>,
) {
    let fallback = tx.clone();
    let spawned = thread::Builder::new()
        .name("sdu-session-check".into())
        .spawn(move || {
            let _ = tx.send(check_session(&client));
        });
    if let Err(e) = spawned {
        tracing::warn!(error = %e, "could not spawn session check thread");
        let _ = fallback.send(WorkerResponse::SessionChecked { confirmed: false });
    }
}

fn check_session<T: Transport>(client: &ApiClient<T>) -> WorkerResponse {
    let confirmed = client.check_session().unwrap_or_else(|e| {
        tracing::debug!(error = %e, "session check failed, staying logged out");
        false
    });
    WorkerResponse::SessionChecked { confirmed }
}

fn handle_command<T: Transport>(
    client: &ApiClient<T>,
    cmd: WorkerCommand,
) -> Option<WorkerResponse> {
    let response = match cmd {
        WorkerCommand::CheckSession => check_session(client),
        WorkerCommand::Login(credentials) => WorkerResponse::LoginDone(client.login(&credentials)),
        WorkerCommand::SearchExams { query } => {
            WorkerResponse::SearchDone(client.search_exams(&query))
        }
        WorkerCommand::ResolveDownload { exam_id } => {
            WorkerResponse::DownloadDone(client.resolve_download(exam_id))
        }
        WorkerCommand::Upload(upload) => WorkerResponse::UploadDone(client.upload(&upload)),
        WorkerCommand::Shutdown => return None,
    };
    Some(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdu_core::api::endpoints;
    use sdu_core::transport::{HttpRequest, HttpResponse, Method};
    use sdu_core::ScriptedTransport;
    use std::sync::{mpsc, Mutex};
    use std::time::Duration;

    /// Holds the session check until the gate sender is dropped.
    struct GatedCheck {
        inner: ScriptedTransport,
        gate: Mutex<Receiver<()>>,
    }

    impl Transport for GatedCheck {
        fn name(&self) -> &str {
            "gated"
        }

        fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            if request.path == endpoints::CHECK_LOGIN {
                let gate = self.gate.lock().unwrap_or_else(|p| p.into_inner());
                let _ = gate.recv();
            }
            self.inner.send(request)
        }
    }

    #[test]
    fn worker_shutdown() {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, _resp_rx) = mpsc::channel();
        let client = ApiClient::new(ScriptedTransport::new());

        let handle = spawn_worker(client, cmd_rx, resp_tx).unwrap();
        cmd_tx.send(WorkerCommand::Shutdown).unwrap();
        handle.join().expect("worker should join cleanly");
    }

    #[test]
    fn worker_stops_when_sender_dropped() {
        let (cmd_tx, cmd_rx) = mpsc::channel::<WorkerCommand>();
        let (resp_tx, _resp_rx) = mpsc::channel();
        let handle = spawn_worker(ApiClient::new(ScriptedTransport::new()), cmd_rx, resp_tx).unwrap();
        drop(cmd_tx);
        handle.join().unwrap();
    }

    #[test]
    fn session_check_failure_reports_unconfirmed() {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();
        let handle = spawn_worker(ApiClient::new(ScriptedTransport::new()), cmd_rx, resp_tx).unwrap();

        cmd_tx.send(WorkerCommand::CheckSession).unwrap();
        let resp = resp_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(resp, WorkerResponse::SessionChecked { confirmed: false }));

        cmd_tx.send(WorkerCommand::Shutdown).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn search_round_trip_through_worker() {
        let transport = ScriptedTransport::new();
        transport.reply(Method::Get, endpoints::SEARCH_EXAM, HttpResponse::new(400, ""));
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();
        let handle = spawn_worker(ApiClient::new(transport.clone()), cmd_rx, resp_tx).unwrap();

        cmd_tx
            .send(WorkerCommand::SearchExams { query: "12345678900".into() })
            .unwrap();
        match resp_rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            WorkerResponse::SearchDone(Ok(SearchOutcome::NoResults)) => {}
            other => panic!("unexpected response {other:?}"),
        }
        assert_eq!(transport.requests()[0].query_value("cpf"), Some("12345678900"));

        cmd_tx.send(WorkerCommand::Shutdown).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn stalled_session_check_does_not_hold_up_login() {
        let inner = ScriptedTransport::new();
        inner.reply(Method::Post, endpoints::LOGIN, HttpResponse::new(200, "{}"));
        let (gate_tx, gate_rx) = mpsc::channel::<()>();
        let transport = GatedCheck { inner, gate: Mutex::new(gate_rx) };
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();
        let handle = spawn_worker(ApiClient::new(transport), cmd_rx, resp_tx).unwrap();

        cmd_tx.send(WorkerCommand::CheckSession).unwrap();
        let credentials = Credentials {
            username: "admin".into(),
            password: "admin".into(),
        };
        cmd_tx.send(WorkerCommand::Login(credentials)).unwrap();
        match resp_rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            WorkerResponse::LoginDone(Ok(LoginOutcome::Accepted)) => {}
            other => panic!("unexpected response {other:?}"),
        }

        drop(gate_tx);
        let late = resp_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(late, WorkerResponse::SessionChecked { .. }));

        cmd_tx.send(WorkerCommand::Shutdown).unwrap();
        handle.join().unwrap();
    }
}
