//! HTTP transport trait and structured transport errors.
//!
//! The `Transport` trait is one request/response exchange against the SDU
//! backend. `HttpTransport` talks to a real server through reqwest with a
//! cookie store (the session cookie lives there and is never inspected).
//! `ScriptedTransport` answers from a queue of canned responses so flows can
//! be exercised without sockets or timers.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;

use crate::config::ClientConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

/// File part of a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    Empty,
    /// `application/x-www-form-urlencoded`
    Form(Vec<(String, String)>),
    /// `multipart/form-data` with text fields and one file.
    Multipart {
        fields: Vec<(String, String)>,
        file: FilePart,
    },
}

/// A request relative to the backend base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl HttpRequest {
    pub fn get(path: &str) -> Self {
        Self {
            method: Method::Get,
            path: path.to_string(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn post(path: &str, body: RequestBody) -> Self {
        Self {
            method: Method::Post,
            path: path.to_string(),
            query: Vec::new(),
            body,
        }
    }

    pub fn with_query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    /// First value of a query parameter.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First value of a text field in a form or multipart body.
    pub fn field_value(&self, key: &str) -> Option<&str> {
        let fields = match &self.body {
            RequestBody::Empty => return None,
            RequestBody::Form(fields) => fields,
            RequestBody::Multipart { fields, .. } => fields,
        };
        fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Status + raw body. Decoding is the caller's job (see `payload`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self::new(status, value.to_string())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Structured transport failures: the request never produced an HTTP status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("server unreachable: {0}")]
    Unreachable(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("transport error: {0}")]
    Other(String),
}

/// One HTTP exchange with the SDU backend.
pub trait Transport: Send + Sync {
    /// Human-readable name, used in logs.
    fn name(&self) -> &str;

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request)
    }
}

/// reqwest-backed transport with a cookie jar.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        // reqwest's blocking client defaults to a 30s timeout; the SDU client
        // only enforces one when configured.
        let client = reqwest::blocking::Client::builder()
            .cookie_store(true)
            .timeout(config.timeout())
            .user_agent(concat!("sdu-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Transport for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = self.url(&request.path);
        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        builder = builder.header(reqwest::header::ACCEPT, "application/json");
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Form(fields) => builder.form(fields),
            RequestBody::Multipart { fields, file } => {
                let mut form = reqwest::blocking::multipart::Form::new();
                for (key, value) in fields {
                    form = form.text(key.clone(), value.clone());
                }
                let part = reqwest::blocking::multipart::Part::bytes(file.bytes.clone())
                    .file_name(file.file_name.clone())
                    .mime_str(&file.mime)
                    .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
                builder.multipart(form.part(file.field.clone(), part))
            }
        };

        let response = builder.send().map_err(classify)?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .map_err(|e| TransportError::Body(e.to_string()))?
            .to_vec();

        tracing::debug!(path = %request.path, status, bytes = body.len(), "http exchange");
        Ok(HttpResponse { status, body })
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(err.to_string())
    } else if err.is_connect() {
        TransportError::Unreachable(err.to_string())
    } else if err.is_builder() {
        TransportError::InvalidRequest(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}

#[derive(Debug, Default)]
struct Script {
    replies: HashMap<(Method, String), VecDeque<Result<HttpResponse, TransportError>>>,
    sent: Vec<HttpRequest>,
}

/// In-memory transport answering from per-route queues.
///
/// Clones share the same script, so a test can keep a handle after moving a
/// clone into an `ApiClient`. An exhausted or unscripted route fails as
/// unreachable.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Queue a response for `method path`.
    pub fn reply(&self, method: Method, path: &str, response: HttpResponse) -> &Self {
        self.lock()
            .replies
            .entry((method, path.to_string()))
            .or_default()
            .push_back(Ok(response));
        self
    }

    /// Queue a transport failure for `method path`.
    pub fn fail(&self, method: Method, path: &str, error: TransportError) -> &Self {
        self.lock()
            .replies
            .entry((method, path.to_string()))
            .or_default()
            .push_back(Err(error));
        self
    }

    /// Every request seen so far, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.lock().sent.clone()
    }

    pub fn request_count(&self) -> usize {
        self.lock().sent.len()
    }
}

impl Transport for ScriptedTransport {
    fn name(&self) -> &str {
        "scripted"
    }

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut script = self.lock();
        script.sent.push(request.clone());
        script
            .replies
            .get_mut(&(request.method, request.path.clone()))
            .and_then(|queue| queue.pop_front())
            .unwrap_or_else(|| {
                Err(TransportError::Unreachable(format!(
                    "no scripted response for {}",
                    request.path
                )))
            })
    }
}
