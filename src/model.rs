//! Core data types shared by the orchestrator, normalizer and presenter.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Text shown in place of a symbol's address when the server omits it.
pub const MISSING_ADDRESS: &str = "N/A";

/// A single compile submission. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationRequest {
    id: Uuid,
    source_text: String,
}

impl CompilationRequest {
    pub fn new(source_text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_text: source_text.into(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }
}

/// One entry of the symbol table produced by the compiler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub address: Option<String>,
}

impl Symbol {
    /// Address as displayed, `N/A` when absent or blank.
    pub fn display_address(&self) -> &str {
        match self.address.as_deref() {
            Some(addr) if !addr.trim().is_empty() => addr,
            _ => MISSING_ADDRESS,
        }
    }
}

/// Payload of a successful compilation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompileSuccess {
    pub asm_text: String,
    pub diagram_source: Option<String>,
    pub symbols: Vec<Symbol>,
}

/// The canonical, normalized outcome of a compile request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompilationResult {
    Success(CompileSuccess),
    Failure { message: String },
    SessionExpired,
}

impl CompilationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, CompilationResult::Success(_))
    }
}

/// Authentication state inferred from a single response status.
///
/// Never cached: the cookie held by the HTTP client is the durable artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    pub authenticated: bool,
}

impl SessionState {
    pub fn from_status(status: u16) -> Self {
        Self {
            authenticated: status != 401,
        }
    }
}

/// Credentials posted to the session endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}
