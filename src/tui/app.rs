//! Terminal UI state.
//!
//! `App` never touches the terminal or the network. Work that has to leave
//! the event loop thread is queued as an [`Effect`] and its result comes back
//! through [`App::on_worker`]. Delayed navigation is a deadline checked by
//! [`App::tick`].

use super::actions::Action;
use crate::auth::{AuthGate, LoginOutcome};
use crate::client::TransportResult;
use crate::editor::SourceEditor;
use crate::error::Result;
use crate::model::{CompilationRequest, Credentials};
use crate::orchestrator::{SessionOrchestrator, Settlement};
use crate::presenter::{OutputSurface, Panes, StatusMessage};
use crate::theme::{PreferenceStorage, ThemePreference, ThemePreferenceStore};
use std::time::Instant;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Workspace,
}

/// Focusable controls of the login form, in Tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Username,
    Password,
    Button,
}

impl LoginField {
    pub fn next(&self) -> Self {
        match self {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Button,
            LoginField::Button => LoginField::Username,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            LoginField::Username => LoginField::Button,
            LoginField::Password => LoginField::Username,
            LoginField::Button => LoginField::Password,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub focus: LoginField,
    pub message: Option<StatusMessage>,
    /// A `/login` call is outstanding.
    pub pending: bool,
}

/// Work the event loop performs on the app's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Compile(CompilationRequest),
    Login(Credentials),
    /// Suspend the terminal and run the external editor.
    EditSource,
}

/// Results delivered back from worker threads.
#[derive(Debug)]
pub enum WorkerEvent {
    Compiled { id: Uuid, outcome: TransportResult },
    LoggedIn { outcome: TransportResult },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Navigation {
    to: Screen,
    at: Instant,
}

pub struct App {
    screen: Screen,
    login: LoginForm,
    panes: Panes,
    orchestrator: SessionOrchestrator,
    auth: AuthGate,
    theme: ThemePreferenceStore<Box<dyn PreferenceStorage>>,
    editor: Box<dyn SourceEditor>,
    endpoint: String,
    source: String,
    pending_navigation: Option<Navigation>,
    effects: Vec<Effect>,
    should_quit: bool,
}

impl App {
    pub fn new(
        orchestrator: SessionOrchestrator,
        auth: AuthGate,
        theme: ThemePreferenceStore<Box<dyn PreferenceStorage>>,
        mut editor: Box<dyn SourceEditor>,
        endpoint: impl Into<String>,
        start: Screen,
    ) -> Self {
        editor.apply_theme(theme.current());
        let mut app = Self {
            screen: start,
            login: LoginForm::default(),
            panes: Panes::default(),
            orchestrator,
            auth,
            theme,
            editor,
            endpoint: endpoint.into(),
            source: String::new(),
            pending_navigation: None,
            effects: Vec::new(),
            should_quit: false,
        };
        app.reload_source();
        app
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn login(&self) -> &LoginForm {
        &self.login
    }

    pub fn panes(&self) -> &Panes {
        &self.panes
    }

    pub fn orchestrator(&self) -> &SessionOrchestrator {
        &self.orchestrator
    }

    pub fn theme(&self) -> ThemePreference {
        self.theme.current()
    }

    pub fn editor(&self) -> &dyn SourceEditor {
        self.editor.as_ref()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// A navigation is scheduled but has not fired yet.
    pub fn is_redirecting(&self) -> bool {
        self.pending_navigation.is_some()
    }

    /// Drain the queued effects.
    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    pub fn dispatch(&mut self, action: Action) {
        tracing::trace!(?action, screen = ?self.screen, "dispatch");
        match action {
            Action::Quit => self.should_quit = true,
            Action::NextField => self.login.focus = self.login.focus.next(),
            Action::PreviousField => self.login.focus = self.login.focus.previous(),
            Action::Input(c) => match self.login.focus {
                LoginField::Username => self.login.username.push(c),
                LoginField::Password => self.login.password.push(c),
                LoginField::Button => {}
            },
            Action::Backspace => match self.login.focus {
                LoginField::Username => {
                    self.login.username.pop();
                }
                LoginField::Password => {
                    self.login.password.pop();
                }
                LoginField::Button => {}
            },
            Action::SubmitLogin => self.submit_login(),
            Action::Compile => self.compile(),
            Action::EditSource => self.effects.push(Effect::EditSource),
            Action::ToggleTheme => self.toggle_theme(),
            Action::NextTab => {
                let next = self.panes.tab.next();
                self.panes.select_tab(next);
            }
        }
    }

    fn submit_login(&mut self) {
        if self.login.pending || self.pending_navigation.is_some() {
            return;
        }
        match self.auth.prepare(&self.login.username, &self.login.password) {
            Ok(credentials) => {
                self.login.pending = true;
                self.login.message = Some(StatusMessage::info("Signing in..."));
                self.effects.push(Effect::Login(credentials));
            }
            Err(invalid) => {
                self.login.message = Some(StatusMessage::warning(invalid.message()));
            }
        }
    }

    fn compile(&mut self) {
        if !self.reload_source() {
            return;
        }
        if let Some(request) = self.orchestrator.submit(self.source.clone(), &mut self.panes) {
            self.effects.push(Effect::Compile(request));
        }
    }

    fn toggle_theme(&mut self) {
        match self.theme.toggle() {
            Ok(theme) => {
                self.editor.apply_theme(theme);
                self.panes
                    .show_status(StatusMessage::info(format!("Switched to the {} theme.", theme)));
            }
            Err(e) => {
                self.panes.show_status(StatusMessage::error(format!(
                    "Could not save the theme preference: {}",
                    e
                )));
            }
        }
    }

    /// Feed back the result of the external editor.
    pub fn source_edited(&mut self, result: Result<()>) {
        if let Err(e) = result {
            tracing::warn!(error = %e, "external editor failed");
            self.panes.show_status(StatusMessage::error(e.to_string()));
        }
        self.reload_source();
    }

    /// Editor access for the event loop, which runs it with the terminal suspended.
    pub fn editor_mut(&mut self) -> &mut dyn SourceEditor {
        self.editor.as_mut()
    }

    /// Re-read the source file. Returns false and reports when it is unreadable.
    fn reload_source(&mut self) -> bool {
        match self.editor.contents() {
            Ok(source) => {
                self.source = source;
                true
            }
            Err(e) => {
                self.source.clear();
                self.panes.show_status(StatusMessage::error(e.to_string()));
                false
            }
        }
    }

    pub fn on_worker(&mut self, event: WorkerEvent, now: Instant) {
        match event {
            WorkerEvent::Compiled { id, outcome } => {
                let settlement = self
                    .orchestrator
                    .settle(id, outcome, &self.endpoint, &mut self.panes);
                if let Settlement::Unauthorized { after } = settlement {
                    self.schedule(Screen::Login, now + after);
                }
            }
            WorkerEvent::LoggedIn { outcome } => {
                self.login.pending = false;
                let outcome = self.auth.conclude(outcome, &self.endpoint);
                let status = match &outcome {
                    LoginOutcome::Accepted { redirect_after, .. } => {
                        self.schedule(Screen::Workspace, now + *redirect_after);
                        StatusMessage::success(outcome.display())
                    }
                    LoginOutcome::Invalid { .. } => StatusMessage::warning(outcome.display()),
                    LoginOutcome::Rejected { .. } | LoginOutcome::Unreachable { .. } => {
                        StatusMessage::error(outcome.display())
                    }
                };
                self.login.message = Some(status);
            }
        }
    }

    fn schedule(&mut self, to: Screen, at: Instant) {
        tracing::info!(?to, "navigation scheduled");
        self.pending_navigation = Some(Navigation { to, at });
    }

    /// Fire the scheduled navigation once its deadline has passed.
    pub fn tick(&mut self, now: Instant) {
        let Some(navigation) = self.pending_navigation else {
            return;
        };
        if now < navigation.at {
            return;
        }
        self.pending_navigation = None;
        self.screen = navigation.to;
        tracing::info!(screen = ?navigation.to, "navigated");

        if navigation.to == Screen::Login {
            self.login.password.clear();
            self.login.focus = if self.login.username.is_empty() {
                LoginField::Username
            } else {
                LoginField::Password
            };
            self.login.message = Some(StatusMessage::warning(
                "Your session has expired. Please sign in again.",
            ));
        } else {
            self.login = LoginForm {
                username: std::mem::take(&mut self.login.username),
                ..LoginForm::default()
            };
        }
    }
}
