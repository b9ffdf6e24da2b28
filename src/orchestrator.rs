//! The compile session state machine.
//!
//! ```text
//! Idle ──submit──▶ Submitting ──settle──▶ Succeeded | Failed | Unauthorized
//!   ▲                                         │
//!   └──────────────── submit ◀────────────────┘
//! ```
//!
//! `submit` and `settle` are split so the network call can run off the UI
//! thread: the caller takes the [`CompilationRequest`] returned by `submit`,
//! performs the call, and feeds the outcome back through `settle`. While a
//! request is outstanding every further `submit` is rejected.

use crate::client::{CompileService, TransportResult};
use crate::model::{CompilationRequest, CompilationResult, SessionState};
use crate::normalize::{normalize, GENERIC_FAILURE_MESSAGE};
use crate::presenter::{OutputSurface, ResultPresenter, StatusMessage};
use std::time::Duration;
use uuid::Uuid;

pub const COMPILE_LABEL: &str = "Compile";
pub const COMPILING_LABEL: &str = "Compiling...";

pub const SUCCESS_MESSAGE: &str = "Compilation succeeded.";
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Returning to the login screen...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
    Unauthorized,
}

impl SessionPhase {
    pub fn name(&self) -> &'static str {
        match self {
            SessionPhase::Idle => "Idle",
            SessionPhase::Submitting => "Submitting",
            SessionPhase::Succeeded => "Succeeded",
            SessionPhase::Failed => "Failed",
            SessionPhase::Unauthorized => "Unauthorized",
        }
    }
}

/// State of the control that starts a compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitTrigger {
    pub enabled: bool,
    pub label: &'static str,
}

impl SubmitTrigger {
    fn ready() -> Self {
        Self {
            enabled: true,
            label: COMPILE_LABEL,
        }
    }

    fn busy() -> Self {
        Self {
            enabled: false,
            label: COMPILING_LABEL,
        }
    }
}

/// Why a request ended in [`SessionPhase::Failed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The service could not be reached.
    Unreachable,
    /// The service answered with a body that could not be decoded.
    Malformed,
    /// The compiler reported an error.
    Compiler,
}

/// What the caller must do after a request settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Succeeded,
    Failed(FailureKind),
    /// Navigate to the login screen once `after` has elapsed.
    Unauthorized { after: Duration },
    /// The outcome belonged to a request that is no longer outstanding.
    Stale,
}

/// Owns the in-flight guard, the submit trigger and the session phase.
pub struct SessionOrchestrator {
    phase: SessionPhase,
    in_flight: Option<Uuid>,
    trigger: SubmitTrigger,
    presenter: ResultPresenter,
    redirect_delay: Duration,
}

impl SessionOrchestrator {
    pub fn new(presenter: ResultPresenter, redirect_delay: Duration) -> Self {
        Self {
            phase: SessionPhase::Idle,
            in_flight: None,
            trigger: SubmitTrigger::ready(),
            presenter,
            redirect_delay,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn trigger(&self) -> SubmitTrigger {
        self.trigger
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Start a compilation, or return `None` if one is already outstanding.
    pub fn submit(
        &mut self,
        source_text: impl Into<String>,
        surface: &mut dyn OutputSurface,
    ) -> Option<CompilationRequest> {
        if self.phase == SessionPhase::Submitting {
            tracing::debug!("submit rejected: a compilation is already in flight");
            return None;
        }

        let request = CompilationRequest::new(source_text);
        self.phase = SessionPhase::Submitting;
        self.in_flight = Some(request.id());
        self.trigger = SubmitTrigger::busy();
        surface.clear_outputs();

        tracing::info!(request = %request.id(), "compilation submitted");
        Some(request)
    }

    /// Apply the outcome of the network call made for `request_id`.
    pub fn settle(
        &mut self,
        request_id: Uuid,
        outcome: TransportResult,
        endpoint: &str,
        surface: &mut dyn OutputSurface,
    ) -> Settlement {
        if self.in_flight != Some(request_id) {
            tracing::warn!(request = %request_id, "dropping response for a request that is no longer outstanding");
            return Settlement::Stale;
        }

        let settlement = self.apply(outcome, endpoint, surface);

        self.in_flight = None;
        self.trigger = SubmitTrigger::ready();
        tracing::info!(request = %request_id, phase = self.phase.name(), "compilation settled");
        settlement
    }

    /// Submit and settle in one go, for callers without an event loop.
    ///
    /// Returns `None` when the submit was rejected.
    pub fn run(
        &mut self,
        service: &dyn CompileService,
        source_text: impl Into<String>,
        surface: &mut dyn OutputSurface,
    ) -> Option<Settlement> {
        let request = self.submit(source_text, surface)?;
        let outcome = service.compile(request.source_text());
        Some(self.settle(request.id(), outcome, service.endpoint(), surface))
    }

    fn apply(
        &mut self,
        outcome: TransportResult,
        endpoint: &str,
        surface: &mut dyn OutputSurface,
    ) -> Settlement {
        let response = match outcome {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "compiler service unreachable");
                self.phase = SessionPhase::Failed;
                surface.show_status(StatusMessage::error(connectivity_message(
                    endpoint, &e.detail,
                )));
                return Settlement::Failed(FailureKind::Unreachable);
            }
        };

        tracing::debug!(
            status = response.status,
            authenticated = SessionState::from_status(response.status).authenticated,
            "compile response received"
        );

        let result = match normalize(&response) {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(error = %e, "undecodable compile response");
                self.phase = SessionPhase::Failed;
                surface.show_status(StatusMessage::error(format!(
                    "The compiler service returned an unreadable response: {}",
                    e
                )));
                return Settlement::Failed(FailureKind::Malformed);
            }
        };

        match result {
            CompilationResult::SessionExpired => {
                self.phase = SessionPhase::Unauthorized;
                surface.show_status(StatusMessage::warning(SESSION_EXPIRED_MESSAGE));
                Settlement::Unauthorized {
                    after: self.redirect_delay,
                }
            }
            CompilationResult::Success(success) => {
                self.phase = SessionPhase::Succeeded;
                self.presenter.present(&success, surface);
                surface.show_status(StatusMessage::success(SUCCESS_MESSAGE));
                Settlement::Succeeded
            }
            CompilationResult::Failure { message } => {
                self.phase = SessionPhase::Failed;
                let message = if message.trim().is_empty() {
                    GENERIC_FAILURE_MESSAGE.to_string()
                } else {
                    message
                };
                surface.show_status(StatusMessage::error(message));
                Settlement::Failed(FailureKind::Compiler)
            }
        }
    }
}

/// Message shown when the service could not be reached at all.
pub fn connectivity_message(endpoint: &str, detail: &str) -> String {
    format!(
        "Could not connect to the compiler service at {}. Is the server running? ({})",
        endpoint, detail
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{RawResponse, TransportError};
    use crate::model::Credentials;
    use crate::presenter::{DiagramView, Panes, StatusKind, SymbolRow};
    use crate::render::{DiagramRenderer, RenderError, RenderedDiagram};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const ENDPOINT: &str = "http://127.0.0.1:4567";

    struct FailingRenderer;

    impl DiagramRenderer for FailingRenderer {
        fn render(&self, _source: &str) -> Result<RenderedDiagram, RenderError> {
            Err(RenderError::Unavailable("dot".to_string()))
        }
    }

    /// Replays queued outcomes and counts compile calls.
    struct ScriptedService {
        calls: AtomicUsize,
        outcomes: Mutex<Vec<TransportResult>>,
    }

    impl ScriptedService {
        fn new(outcomes: Vec<TransportResult>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                outcomes: Mutex::new(outcomes),
            }
        }
    }

    impl CompileService for ScriptedService {
        fn endpoint(&self) -> &str {
            ENDPOINT
        }

        fn compile(&self, _source_text: &str) -> TransportResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcomes.lock().unwrap().remove(0)
        }

        fn login(&self, _credentials: &Credentials) -> TransportResult {
            unreachable!("orchestrator never logs in")
        }

        fn health(&self) -> TransportResult {
            unreachable!("orchestrator never probes health")
        }
    }

    fn ok(status: u16, body: &str) -> TransportResult {
        Ok(RawResponse {
            status,
            body: body.to_string(),
        })
    }

    fn orchestrator() -> SessionOrchestrator {
        SessionOrchestrator::new(
            ResultPresenter::new(Box::new(FailingRenderer)),
            Duration::from_secs(2),
        )
    }

    fn status_of(panes: &Panes) -> (StatusKind, String) {
        let status = panes.status.as_ref().expect("status should be set");
        (status.kind, status.text.clone())
    }

    #[test]
    fn test_new_orchestrator_is_idle_and_ready() {
        let orch = orchestrator();
        assert_eq!(orch.phase(), SessionPhase::Idle);
        assert_eq!(orch.trigger(), SubmitTrigger::ready());
        assert!(!orch.is_in_flight());
    }

    #[test]
    fn test_submit_disables_trigger_and_clears_outputs() {
        let mut orch = orchestrator();
        let mut panes = Panes {
            assembly: "old".to_string(),
            symbols: vec![SymbolRow::Placeholder],
            status: Some(StatusMessage::info("old")),
            ..Default::default()
        };

        let request = orch.submit("class A {}", &mut panes).unwrap();

        assert_eq!(request.source_text(), "class A {}");
        assert_eq!(orch.phase(), SessionPhase::Submitting);
        assert!(!orch.trigger().enabled);
        assert_eq!(orch.trigger().label, COMPILING_LABEL);
        assert!(panes.assembly.is_empty());
        assert!(panes.symbols.is_empty());
        assert!(panes.status.is_none());
    }

    #[test]
    fn test_rapid_submits_issue_one_request() {
        let service = ScriptedService::new(vec![ok(200, r#"{"success":true}"#)]);
        let mut orch = orchestrator();
        let mut panes = Panes::default();

        let mut requests = Vec::new();
        for _ in 0..10 {
            if let Some(request) = orch.submit("class A {}", &mut panes) {
                requests.push(request);
            }
        }
        assert_eq!(requests.len(), 1);

        for request in &requests {
            let outcome = service.compile(request.source_text());
            orch.settle(request.id(), outcome, ENDPOINT, &mut panes);
        }
        assert_eq!(service.calls.load(Ordering::SeqCst), 1);

        // Once settled, a new submit is accepted again.
        assert!(orch.submit("class B {}", &mut panes).is_some());
    }

    #[test]
    fn test_run_rejected_while_in_flight() {
        let service = ScriptedService::new(vec![]);
        let mut orch = orchestrator();
        let mut panes = Panes::default();

        let _pending = orch.submit("class A {}", &mut panes).unwrap();
        assert_eq!(orch.run(&service, "class A {}", &mut panes), None);
        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_success_presents_and_reports() {
        let service = ScriptedService::new(vec![ok(
            200,
            r#"{"success":true,"asmCode":"MOV R1,R2","symbolTable":[]}"#,
        )]);
        let mut orch = orchestrator();
        let mut panes = Panes::default();

        let settlement = orch.run(&service, "class A {}", &mut panes);

        assert_eq!(settlement, Some(Settlement::Succeeded));
        assert_eq!(orch.phase(), SessionPhase::Succeeded);
        assert_eq!(panes.assembly, "MOV R1,R2");
        assert_eq!(panes.symbols, vec![SymbolRow::Placeholder]);
        assert_eq!(panes.diagram, DiagramView::Empty);
        assert_eq!(
            status_of(&panes),
            (StatusKind::Success, SUCCESS_MESSAGE.to_string())
        );
        assert_eq!(orch.trigger(), SubmitTrigger::ready());
    }

    #[test]
    fn test_render_failure_keeps_success_status() {
        let service = ScriptedService::new(vec![ok(
            200,
            r#"{"success":true,"dotCode":"digraph{A->B}"}"#,
        )]);
        let mut orch = orchestrator();
        let mut panes = Panes::default();

        orch.run(&service, "class A {}", &mut panes);

        assert!(matches!(
            &panes.diagram,
            DiagramView::Failed { source, .. } if source == "digraph{A->B}"
        ));
        assert_eq!(status_of(&panes).0, StatusKind::Success);
        assert_eq!(orch.phase(), SessionPhase::Succeeded);
    }

    #[test]
    fn test_failure_message_verbatim() {
        let service = ScriptedService::new(vec![ok(
            200,
            r#"{"success":false,"error":"Semantic error: variable 'x' is not declared"}"#,
        )]);
        let mut orch = orchestrator();
        let mut panes = Panes::default();

        let settlement = orch.run(&service, "class A {}", &mut panes);

        assert_eq!(settlement, Some(Settlement::Failed(FailureKind::Compiler)));
        assert_eq!(orch.phase(), SessionPhase::Failed);
        assert_eq!(
            status_of(&panes),
            (
                StatusKind::Error,
                "Semantic error: variable 'x' is not declared".to_string()
            )
        );
        assert!(orch.trigger().enabled);
    }

    #[test]
    fn test_failure_without_message_uses_generic_text() {
        let service = ScriptedService::new(vec![ok(500, "{}")]);
        let mut orch = orchestrator();
        let mut panes = Panes::default();

        orch.run(&service, "x", &mut panes);
        assert_eq!(status_of(&panes).1, GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn test_session_expiry_requests_delayed_redirect() {
        let service = ScriptedService::new(vec![ok(
            401,
            r#"{"success":false,"error":"Access denied"}"#,
        )]);
        let mut orch = orchestrator();
        let mut panes = Panes::default();

        let settlement = orch.run(&service, "x", &mut panes);

        assert_eq!(
            settlement,
            Some(Settlement::Unauthorized {
                after: Duration::from_secs(2)
            })
        );
        assert_eq!(orch.phase(), SessionPhase::Unauthorized);
        assert_eq!(
            status_of(&panes),
            (StatusKind::Warning, SESSION_EXPIRED_MESSAGE.to_string())
        );
        assert!(orch.trigger().enabled);
    }

    #[test]
    fn test_transport_failure_is_connectivity_error() {
        let service = ScriptedService::new(vec![Err(TransportError {
            url: format!("{}/compile", ENDPOINT),
            detail: "connection refused".to_string(),
        })]);
        let mut orch = orchestrator();
        let mut panes = Panes::default();

        let settlement = orch.run(&service, "x", &mut panes);

        assert_eq!(settlement, Some(Settlement::Failed(FailureKind::Unreachable)));
        let (kind, text) = status_of(&panes);
        assert_eq!(kind, StatusKind::Error);
        assert!(text.starts_with("Could not connect to the compiler service at http://127.0.0.1:4567"));
        assert!(text.contains("connection refused"));
        assert_eq!(orch.trigger(), SubmitTrigger::ready());
    }

    #[test]
    fn test_malformed_body_fails_and_restores_trigger() {
        let service = ScriptedService::new(vec![ok(200, "<html>502 Bad Gateway</html>")]);
        let mut orch = orchestrator();
        let mut panes = Panes::default();

        assert_eq!(
            orch.run(&service, "x", &mut panes),
            Some(Settlement::Failed(FailureKind::Malformed))
        );
        assert!(status_of(&panes).1.contains("unreadable response"));
        assert_eq!(orch.trigger(), SubmitTrigger::ready());
        assert!(!orch.is_in_flight());
    }

    #[test]
    fn test_stale_outcome_is_ignored() {
        let mut orch = orchestrator();
        let mut panes = Panes::default();
        let request = orch.submit("x", &mut panes).unwrap();

        let settlement = orch.settle(
            Uuid::new_v4(),
            ok(200, r#"{"asmCode":"STALE"}"#),
            ENDPOINT,
            &mut panes,
        );

        assert_eq!(settlement, Settlement::Stale);
        assert!(panes.assembly.is_empty());
        assert_eq!(orch.phase(), SessionPhase::Submitting);

        // The real response still lands.
        let settlement = orch.settle(
            request.id(),
            ok(200, r#"{"asmCode":"FRESH"}"#),
            ENDPOINT,
            &mut panes,
        );
        assert_eq!(settlement, Settlement::Succeeded);
        assert_eq!(panes.assembly, "FRESH");
    }

    #[test]
    fn test_settle_twice_is_stale() {
        let mut orch = orchestrator();
        let mut panes = Panes::default();
        let request = orch.submit("x", &mut panes).unwrap();

        orch.settle(request.id(), ok(200, "{}"), ENDPOINT, &mut panes);
        assert_eq!(
            orch.settle(request.id(), ok(200, "{}"), ENDPOINT, &mut panes),
            Settlement::Stale
        );
    }
}
