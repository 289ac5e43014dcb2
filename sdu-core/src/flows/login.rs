//! Login screen flow and the startup session check.

use thiserror::Error;

use crate::api::{ApiClient, Credentials, LoginOutcome};
use crate::session::Session;
use crate::transport::{Transport, TransportError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginError {
    #[error("please fill in all fields")]
    MissingFields,
}

/// Both fields are required, non-empty after trimming. The values
/// themselves are sent untrimmed.
pub fn validate_credentials(username: &str, password: &str) -> Result<Credentials, LoginError> {
    if username.trim().is_empty() || password.trim().is_empty() {
        return Err(LoginError::MissingFields);
    }
    Ok(Credentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Username,
    Password,
}

impl LoginField {
    pub fn toggle(self) -> Self {
        match self {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        }
    }
}

#[derive(Debug, Default)]
pub struct LoginFlow {
    pub username: String,
    pub password: String,
    pub focus: LoginField,
    error: Option<String>,
    busy: bool,
}

impl LoginFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Text of the focused field, for key handling.
    pub fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        }
    }

    /// Start a submission. `None` means nothing should be sent: either a
    /// request is already in flight or validation failed (error set).
    pub fn begin_submit(&mut self) -> Option<Credentials> {
        if self.busy {
            return None;
        }
        self.error = None;
        match validate_credentials(&self.username, &self.password) {
            Ok(credentials) => {
                self.busy = true;
                Some(credentials)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        }
    }

    /// Apply the server's answer.
    ///
    /// Transport failures are logged and otherwise dropped: the form simply
    /// stops being busy, with no message for the user.
    pub fn finish_submit(
        &mut self,
        result: Result<LoginOutcome, TransportError>,
        session: &mut Session,
    ) {
        self.busy = false;
        match result {
            Ok(LoginOutcome::Accepted) => {
                self.password.clear();
                self.error = None;
                session.login();
            }
            Ok(LoginOutcome::Rejected { message, .. }) => {
                self.error = Some(message);
            }
            Err(e) => {
                tracing::error!(error = %e, "login request failed");
            }
        }
    }

    /// Clear everything, used on logout.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Validate, send and apply in one call.
    pub fn submit<T: Transport>(&mut self, client: &ApiClient<T>, session: &mut Session) {
        if let Some(credentials) = self.begin_submit() {
            let result = client.login(&credentials);
            self.finish_submit(result, session);
        }
    }
}

/// Startup check: confirm an existing server session without credentials.
///
/// Any failure leaves the session unauthenticated and is never surfaced.
pub fn check_existing_session<T: Transport>(client: &ApiClient<T>, session: &mut Session) {
    if !session.begin_check() {
        return;
    }
    let confirmed = match client.check_session() {
        Ok(confirmed) => confirmed,
        Err(e) => {
            tracing::debug!(error = %e, "session check failed, staying logged out");
            false
        }
    };
    session.finish_check(confirmed);
}
