//! Per-screen request flows.
//!
//! Each flow owns its local display state and a busy flag. `begin_*` returns
//! the work to perform (or `None` while busy / invalid), `finish_*` applies the
//! result. The front end decides where the request actually runs.

pub mod login;
pub mod search;
pub mod upload;

pub use login::{check_existing_session, LoginError, LoginField, LoginFlow};
pub use search::SearchFlow;
pub use upload::{UploadField, UploadFlow};
