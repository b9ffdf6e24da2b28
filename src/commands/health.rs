//! Health command handler.

use crate::client::{parse_health, CompileService};
use crate::config::Config;
use crate::error::{MjcError, Result};
use crate::output::{print_success, print_warning, BOLD, CYAN, RESET};

use super::connect;

/// Probe `GET /` and report the service status.
pub fn health_command(config: &Config) -> Result<()> {
    let service = connect(config)?;
    report(&service)
}

fn report(service: &dyn CompileService) -> Result<()> {
    let response = service.health().map_err(|e| {
        MjcError::Connectivity(format!(
            "{} is not reachable ({})",
            service.endpoint(),
            e.detail
        ))
    })?;

    println!("{BOLD}Server:{RESET} {CYAN}{}{RESET}", service.endpoint());
    let health = parse_health(&response);
    if !response.is_success_status() {
        print_warning(&format!(
            "Server answered with HTTP {}: {}",
            response.status, health.status
        ));
        return Ok(());
    }

    match health.version {
        Some(version) => print_success(&format!("{} (version {})", health.status, version)),
        None => print_success(&health.status),
    }
    Ok(())
}
