//! Credential check against the session endpoint.

use crate::client::{CompileService, TransportResult};
use crate::model::Credentials;
use serde::Deserialize;
use std::time::Duration;

pub const MISSING_FIELDS_MESSAGE: &str = "Please enter both a username and a password.";
pub const DEFAULT_ACCEPTED_MESSAGE: &str = "Signed in.";
pub const DEFAULT_REJECTED_MESSAGE: &str = "Invalid credentials.";
pub const REDIRECT_NOTICE: &str = "Redirecting...";

/// Body of a `/login` response. Every field is optional on the wire.
#[derive(Debug, Default, Deserialize)]
struct LoginReply {
    #[serde(default)]
    message: Option<String>,
}

/// How a login attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// A field was empty; nothing was sent.
    Invalid { message: String },
    /// The server accepted the credentials. Navigate after `redirect_after`.
    Accepted {
        server_message: String,
        redirect_after: Duration,
    },
    Rejected { message: String },
    /// The service could not be reached.
    Unreachable { message: String },
}

impl LoginOutcome {
    /// The message without any navigation notice.
    pub fn message(&self) -> &str {
        match self {
            LoginOutcome::Invalid { message }
            | LoginOutcome::Accepted {
                server_message: message,
                ..
            }
            | LoginOutcome::Rejected { message }
            | LoginOutcome::Unreachable { message } => message,
        }
    }

    /// Text for the login screen; an accepted login announces the redirect.
    pub fn display(&self) -> String {
        match self {
            LoginOutcome::Accepted { server_message, .. } => {
                format!("{} {}", server_message, REDIRECT_NOTICE)
            }
            other => other.message().to_string(),
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, LoginOutcome::Accepted { .. })
    }
}

/// Validates credentials and interprets `/login` responses.
///
/// `prepare` and `conclude` bracket the network call so the terminal UI can
/// run it on a worker thread; `attempt_login` chains them for headless use.
#[derive(Debug, Clone, Copy)]
pub struct AuthGate {
    redirect_delay: Duration,
}

impl AuthGate {
    pub fn new(redirect_delay: Duration) -> Self {
        Self { redirect_delay }
    }

    /// Check the fields and build the request payload.
    pub fn prepare(&self, username: &str, password: &str) -> Result<Credentials, LoginOutcome> {
        if username.trim().is_empty() || password.is_empty() {
            tracing::debug!("login rejected locally: empty field");
            return Err(LoginOutcome::Invalid {
                message: MISSING_FIELDS_MESSAGE.to_string(),
            });
        }
        Ok(Credentials {
            username: username.trim().to_string(),
            password: password.to_string(),
        })
    }

    /// Interpret the outcome of the `/login` call.
    pub fn conclude(&self, outcome: TransportResult, endpoint: &str) -> LoginOutcome {
        let response = match outcome {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "login endpoint unreachable");
                return LoginOutcome::Unreachable {
                    message: format!(
                        "Could not connect to the server at {}. Check that it is running. ({})",
                        endpoint, e.detail
                    ),
                };
            }
        };

        let server_message = serde_json::from_str::<LoginReply>(&response.body)
            .unwrap_or_default()
            .message
            .filter(|m| !m.trim().is_empty());

        if response.is_success_status() {
            tracing::info!(status = response.status, "login accepted");
            LoginOutcome::Accepted {
                server_message: server_message
                    .unwrap_or_else(|| DEFAULT_ACCEPTED_MESSAGE.to_string()),
                redirect_after: self.redirect_delay,
            }
        } else {
            tracing::warn!(status = response.status, "login rejected");
            LoginOutcome::Rejected {
                message: server_message.unwrap_or_else(|| DEFAULT_REJECTED_MESSAGE.to_string()),
            }
        }
    }

    /// Validate, send and interpret a login in one call.
    pub fn attempt_login(
        &self,
        service: &dyn CompileService,
        username: &str,
        password: &str,
    ) -> LoginOutcome {
        match self.prepare(username, password) {
            Ok(credentials) => self.conclude(service.login(&credentials), service.endpoint()),
            Err(invalid) => invalid,
        }
    }
}
