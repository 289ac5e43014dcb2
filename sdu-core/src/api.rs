//! SDU backend API client.
//!
//! One method per endpoint. HTTP statuses and body shapes are turned into
//! typed outcomes here; only transport failures come back as `Err`.

use tracing::{debug, warn};

use crate::domain::ExamRecord;
use crate::payload::{self, PayloadError};
use crate::transport::{HttpRequest, RequestBody, Transport, TransportError};
use crate::upload::ValidatedUpload;

pub mod endpoints {
    pub const HEALTH: &str = "/api/";
    pub const CHECK_LOGIN: &str = "/check_login";
    pub const LOGIN: &str = "/login";
    pub const SEARCH_EXAM: &str = "/api/search/exam";
    pub const DOWNLOAD_EXAM: &str = "/api/download/exam";
    pub const UPLOAD_EXAM: &str = "/api/upload/exam";
    pub const UPLOAD_DIAGNOSIS: &str = "/api/upload/diagnosis";
}

/// Shown when the server rejects a login without a usable message.
pub const GENERIC_LOGIN_FAILURE: &str = "incorrect username or password";
/// Shown when an upload is rejected without a usable message.
pub const GENERIC_UPLOAD_FAILURE: &str = "upload failed";

/// Username/password pair. `Debug` never prints the password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Accepted,
    Rejected { status: u16, message: String },
}

/// Result of an exam search that reached the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// 2xx with a well-formed `exames` array (possibly empty).
    Records(Vec<ExamRecord>),
    /// HTTP 400: the backend's way of saying "nothing for this CPF".
    NoResults,
    /// Any other non-2xx status.
    Rejected { status: u16 },
    /// 2xx whose body failed the schema check.
    Malformed(PayloadError),
}

impl SearchOutcome {
    /// Rows to display. Every branch but `Records` shows an empty list.
    pub fn into_records(self) -> Vec<ExamRecord> {
        match self {
            SearchOutcome::Records(records) => records,
            SearchOutcome::NoResults
            | SearchOutcome::Rejected { .. }
            | SearchOutcome::Malformed(_) => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Signed link the caller should navigate to.
    Ready(String),
    Rejected { status: u16 },
    Malformed(PayloadError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Stored,
    Rejected { status: u16, message: String },
}

/// Typed client over any `Transport`.
pub struct ApiClient<T: Transport> {
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// `GET /api/`: true on any 2xx.
    pub fn health(&self) -> Result<bool, TransportError> {
        let response = self.transport.send(&HttpRequest::get(endpoints::HEALTH))?;
        Ok(response.is_success())
    }

    /// `GET /check_login`: only HTTP 200 confirms an existing session.
    pub fn check_session(&self) -> Result<bool, TransportError> {
        let response = self
            .transport
            .send(&HttpRequest::get(endpoints::CHECK_LOGIN))?;
        debug!(status = response.status, "session check");
        Ok(response.status == 200)
    }

    /// Form-encoded `POST /login`. The session cookie is kept by the transport.
    pub fn login(&self, credentials: &Credentials) -> Result<LoginOutcome, TransportError> {
        let body = RequestBody::Form(vec![
            ("username".to_string(), credentials.username.clone()),
            ("password".to_string(), credentials.password.clone()),
        ]);
        let response = self
            .transport
            .send(&HttpRequest::post(endpoints::LOGIN, body))?;

        if response.is_success() {
            debug!(username = %credentials.username, "login accepted");
            return Ok(LoginOutcome::Accepted);
        }
        let message = payload::string_field(&response.body, payload::MESSAGE_FIELD)
            .unwrap_or_else(|| GENERIC_LOGIN_FAILURE.to_string());
        debug!(status = response.status, %message, "login rejected");
        Ok(LoginOutcome::Rejected {
            status: response.status,
            message,
        })
    }

    /// `GET /api/search/exam?cpf=<query>`. The query is sent as given.
    pub fn search_exams(&self, query: &str) -> Result<SearchOutcome, TransportError> {
        let request = HttpRequest::get(endpoints::SEARCH_EXAM).with_query("cpf", query);
        let response = self.transport.send(&request)?;

        if response.status == 400 {
            // Kept as "no results" for compatibility; 400 normally means a bad request.
            debug!("search returned 400, treating as no results");
            return Ok(SearchOutcome::NoResults);
        }
        if !response.is_success() {
            warn!(status = response.status, "exam search rejected");
            return Ok(SearchOutcome::Rejected {
                status: response.status,
            });
        }
        match payload::decode_exam_list(&response.body) {
            Ok(records) => Ok(SearchOutcome::Records(records)),
            Err(e) => {
                warn!(error = %e, "exam search returned a malformed body");
                Ok(SearchOutcome::Malformed(e))
            }
        }
    }

    /// `GET /api/download/exam?id=<id>`: resolves a signed download link.
    pub fn resolve_download(&self, exam_id: u64) -> Result<DownloadOutcome, TransportError> {
        let request =
            HttpRequest::get(endpoints::DOWNLOAD_EXAM).with_query("id", exam_id.to_string());
        let response = self.transport.send(&request)?;

        if !response.is_success() {
            warn!(status = response.status, exam_id, "download link rejected");
            return Ok(DownloadOutcome::Rejected {
                status: response.status,
            });
        }
        match payload::decode_download_url(&response.body) {
            Ok(url) => Ok(DownloadOutcome::Ready(url)),
            Err(e) => {
                warn!(error = %e, exam_id, "download response has no usable url");
                Ok(DownloadOutcome::Malformed(e))
            }
        }
    }

    /// Multipart upload to the exam or diagnosis endpoint.
    pub fn upload(&self, upload: &ValidatedUpload) -> Result<UploadOutcome, TransportError> {
        let response = self.transport.send(&upload.to_request())?;
        if response.is_success() {
            debug!(kind = upload.kind.wire_name(), file = %upload.file.file_name, "upload stored");
            return Ok(UploadOutcome::Stored);
        }
        let message = payload::string_field(&response.body, payload::ERROR_FIELD)
            .unwrap_or_else(|| GENERIC_UPLOAD_FAILURE.to_string());
        warn!(status = response.status, %message, "upload rejected");
        Ok(UploadOutcome::Rejected {
            status: response.status,
            message,
        })
    }
}
