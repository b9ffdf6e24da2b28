//! TUI command handler.
//!
//! Wires the configured service, renderer, preference file and source file
//! into the terminal UI and runs it until the user quits.

use crate::auth::AuthGate;
use crate::client::CompileService;
use crate::config::Config;
use crate::editor::{FileEditor, DEFAULT_SOURCE_FILE};
use crate::error::Result;
use crate::orchestrator::SessionOrchestrator;
use crate::theme::{PreferenceFile, PreferenceStorage, ThemePreferenceStore};
use crate::tui::{self, App, Screen};
use std::path::PathBuf;
use std::sync::Arc;

use super::{build_presenter, connect};

#[derive(Debug, Clone, Default)]
pub struct TuiOptions {
    /// Source file to edit and compile; `main.mjava` when unset.
    pub source: Option<PathBuf>,
    /// Start on the workspace screen instead of the login screen.
    pub skip_login: bool,
}

/// Launch the interactive terminal UI.
///
/// # Returns
///
/// * `Ok(())` when the user exits the TUI
/// * `Err(MjcError)` if the source file, preferences or terminal fail
pub fn tui_command(config: &Config, options: TuiOptions) -> Result<()> {
    let source = options
        .source
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE_FILE));
    let editor = FileEditor::create_or_open(source)?;

    let storage: Box<dyn PreferenceStorage> = Box::new(PreferenceFile::default_location()?);
    let theme = ThemePreferenceStore::load(storage);

    let service: Arc<dyn CompileService> = Arc::new(connect(config)?);
    let orchestrator =
        SessionOrchestrator::new(build_presenter(config)?, config.session_expiry_redirect());
    let start = if options.skip_login {
        Screen::Workspace
    } else {
        Screen::Login
    };

    let app = App::new(
        orchestrator,
        AuthGate::new(config.login_redirect()),
        theme,
        Box::new(editor),
        service.endpoint(),
        start,
    );
    tui::run(app, service)
}
