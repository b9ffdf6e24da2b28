//! Compile command handler.
//!
//! Headless counterpart of the workspace screen: submits one file, then
//! prints the assembly, diagram and symbol channels to stdout.

use crate::auth::{AuthGate, LoginOutcome};
use crate::client::CompileService;
use crate::config::Config;
use crate::editor::{FileEditor, SourceEditor};
use crate::error::{MjcError, Result};
use crate::orchestrator::{FailureKind, SessionOrchestrator, Settlement};
use crate::output::{
    format_symbol_table, print_section_banner, print_section_footer, print_status,
    terminal_width, BannerColor, DIM, GRAY, GREEN, RED, RESET,
};
use crate::presenter::{DiagramView, Panes, ResultPresenter};
use crate::progress::WaitSpinner;
use std::path::Path;

use super::{build_presenter, connect};

/// Compile `file` against the configured server.
///
/// With `credentials`, a login is performed first on the same HTTP client so
/// its session cookie is sent with the compile request.
///
/// # Returns
///
/// * `Ok(())` when the compilation succeeded
/// * `Err(MjcError)` on login failure, connectivity failure, compiler
///   error or session expiry
pub fn compile_command(
    config: &Config,
    file: &Path,
    credentials: Option<(String, String)>,
) -> Result<()> {
    let editor = FileEditor::open_existing(file)?;
    let source = editor.contents()?;
    let service = connect(config)?;

    if let Some((username, password)) = credentials {
        let spinner = WaitSpinner::new("Signing in");
        let outcome = AuthGate::new(config.login_redirect()).attempt_login(
            &service,
            &username,
            &password,
        );
        spinner.clear();
        login_result(outcome)?;
    }

    let spinner = WaitSpinner::new(&format!("Compiling {}", file.display()));
    let (settlement, panes) = compile_source(&service, build_presenter(config)?, config, source);
    match settlement {
        Settlement::Succeeded => spinner.finish_success(),
        Settlement::Unauthorized { .. } => spinner.finish_warning(),
        _ => spinner.finish_error(),
    }

    if settlement == Settlement::Succeeded {
        print_panes(&panes);
    }
    settlement_result(settlement, &panes)
}

/// Run one compilation and return what the surface ended up showing.
fn compile_source(
    service: &dyn CompileService,
    presenter: ResultPresenter,
    config: &Config,
    source: String,
) -> (Settlement, Panes) {
    let mut orchestrator = SessionOrchestrator::new(presenter, config.session_expiry_redirect());
    let mut panes = Panes::default();
    // A fresh orchestrator never has a request in flight.
    let settlement = orchestrator
        .run(service, source, &mut panes)
        .unwrap_or(Settlement::Stale);
    (settlement, panes)
}

fn login_result(outcome: LoginOutcome) -> Result<()> {
    match outcome {
        LoginOutcome::Accepted { server_message, .. } => {
            println!("{GREEN}\u{2714}{RESET} {}", server_message);
            Ok(())
        }
        LoginOutcome::Invalid { message } => Err(MjcError::Validation(message)),
        LoginOutcome::Rejected { message } => Err(MjcError::LoginRejected(message)),
        LoginOutcome::Unreachable { message } => Err(MjcError::Connectivity(message)),
    }
}

fn settlement_result(settlement: Settlement, panes: &Panes) -> Result<()> {
    let message = panes
        .status
        .as_ref()
        .map(|s| s.text.clone())
        .unwrap_or_default();
    match settlement {
        Settlement::Succeeded => Ok(()),
        Settlement::Unauthorized { .. } => Err(MjcError::SessionExpired),
        Settlement::Failed(FailureKind::Unreachable) => Err(MjcError::Connectivity(message)),
        Settlement::Failed(FailureKind::Malformed) => Err(MjcError::MalformedResponse(message)),
        Settlement::Failed(FailureKind::Compiler) => Err(MjcError::Compilation(message)),
        Settlement::Stale => Err(MjcError::Compilation(
            "a compilation is already in progress".to_string(),
        )),
    }
}

fn print_panes(panes: &Panes) {
    print_section_banner("ASSEMBLY", BannerColor::Cyan);
    if panes.assembly.is_empty() {
        println!("{DIM}(no assembly){RESET}");
    } else {
        println!("{}", panes.assembly.trim_end());
    }
    print_section_footer(BannerColor::Cyan);

    print_section_banner("DIAGRAM", BannerColor::Cyan);
    print_diagram(&panes.diagram);
    print_section_footer(BannerColor::Cyan);

    print_section_banner("SYMBOLS", BannerColor::Cyan);
    for line in format_symbol_table(&panes.symbols, terminal_width()) {
        println!("{}", line);
    }
    print_section_footer(BannerColor::Cyan);

    if let Some(status) = &panes.status {
        print_status(status);
    }
}

fn print_diagram(view: &DiagramView) {
    match view {
        DiagramView::Empty => println!("{DIM}(no diagram){RESET}"),
        DiagramView::Rendered {
            path,
            svg_bytes,
            edges,
        } => {
            match path {
                Some(path) => println!("SVG ({} bytes) saved to {}", svg_bytes, path.display()),
                None => println!("SVG rendered ({} bytes)", svg_bytes),
            }
            for edge in edges {
                println!("  {GRAY}{}{RESET} \u{2192} {GRAY}{}{RESET}", edge.from, edge.to);
            }
        }
        DiagramView::Failed { source, error } => {
            println!("{RED}Diagram could not be rendered:{RESET} {}", error);
            println!("{}", source.trim_end());
        }
    }
}
