pub mod auth;
pub mod client;
pub mod commands;
pub mod completion;
pub mod config;
pub mod editor;
pub mod error;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod orchestrator;
pub mod output;
pub mod presenter;
pub mod progress;
pub mod render;
pub mod theme;
pub mod tui;

pub use error::{MjcError, Result};
pub use orchestrator::{SessionOrchestrator, Settlement};
pub use presenter::ResultPresenter;
pub use theme::ThemePreferenceStore;
