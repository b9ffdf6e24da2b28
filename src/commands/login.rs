//! Login command handler.

use crate::auth::{AuthGate, LoginOutcome};
use crate::config::Config;
use crate::error::{MjcError, Result};
use crate::output::print_success;
use crate::progress::WaitSpinner;

use super::connect;

/// Check `username`/`password` against the service's `/login` endpoint.
///
/// Empty fields are rejected before any request is made.
pub fn login_command(config: &Config, username: &str, password: &str) -> Result<()> {
    let gate = AuthGate::new(config.login_redirect());
    // Validate first so an empty field never shows a spinner.
    if let Err(LoginOutcome::Invalid { message }) = gate.prepare(username, password) {
        return Err(MjcError::Validation(message));
    }

    let service = connect(config)?;
    let spinner = WaitSpinner::new(&format!("Signing in to {}", config.base_url()));
    let outcome = gate.attempt_login(&service, username, password);
    spinner.clear();

    login_result(outcome)
}

/// Map a login outcome to the command result, printing the server message.
fn login_result(outcome: LoginOutcome) -> Result<()> {
    match outcome {
        LoginOutcome::Accepted { server_message, .. } => {
            // No screen to redirect to, so no notice.
            print_success(&server_message);
            Ok(())
        }
        LoginOutcome::Invalid { message } => Err(MjcError::Validation(message)),
        LoginOutcome::Rejected { message } => Err(MjcError::LoginRejected(message)),
        LoginOutcome::Unreachable { message } => Err(MjcError::Connectivity(message)),
    }
}
