//! SDU Core: client side of the Unified Health Data System.
//!
//! This crate holds everything the front ends share:
//! - Session gate (authenticated flag + current screen)
//! - Login, record search and upload flows with their busy flags
//! - API client over a pluggable `Transport` (reqwest in production, scripted in tests)
//! - Explicit payload decoding for the loosely-typed JSON responses
//! - CPF masking, upload validation and the static CID reference table
//! - Client configuration

pub mod api;
pub mod config;
pub mod cpf;
pub mod domain;
pub mod flows;
pub mod payload;
pub mod reference;
pub mod session;
pub mod transport;
pub mod upload;

pub use api::{ApiClient, DownloadOutcome, LoginOutcome, SearchOutcome, UploadOutcome};
pub use config::{ClientConfig, ConfigError};
pub use domain::{DocumentKind, ExamRecord};
pub use session::{Screen, Session};
pub use transport::{HttpTransport, ScriptedTransport, Transport, TransportError};
pub use upload::{UploadError, UploadForm, ValidatedUpload};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything the TUI worker thread owns or sends back is Send.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<ApiClient<HttpTransport>>();
        require_send::<ApiClient<ScriptedTransport>>();
        require_send::<ApiClient<Box<dyn Transport>>>();
        require_sync::<HttpTransport>();
        require_sync::<ScriptedTransport>();

        require_send::<SearchOutcome>();
        require_send::<DownloadOutcome>();
        require_send::<LoginOutcome>();
        require_send::<UploadOutcome>();
        require_send::<ValidatedUpload>();
        require_send::<TransportError>();
        require_send::<ExamRecord>();
        require_sync::<ExamRecord>();
    }
}
