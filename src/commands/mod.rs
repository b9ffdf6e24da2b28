//! CLI command handlers for mjc.
//!
//! - [`compile`] - Compile a source file and print all result channels
//! - [`login`] - Check credentials against the service
//! - [`health`] - Probe the service
//! - [`theme`] - Show or toggle the theme preference
//! - [`config`] - Show or update configuration
//! - [`tui`] - Interactive terminal UI

mod compile;
mod config;
mod health;
mod login;
mod theme;
mod tui;

pub use compile::compile_command;
pub use config::{config_set_command, config_show_command};
pub use health::health_command;
pub use login::login_command;
pub use theme::{theme_command, ThemeAction};
pub use tui::{tui_command, TuiOptions};

use crate::client::HttpCompileService;
use crate::config::{diagrams_dir, Config};
use crate::error::Result;
use crate::presenter::ResultPresenter;
use crate::render::GraphvizRenderer;

/// HTTP client for the configured server.
pub fn connect(config: &Config) -> Result<HttpCompileService> {
    HttpCompileService::new(config.base_url())
}

/// Presenter backed by the configured Graphviz renderer.
pub fn build_presenter(config: &Config) -> Result<ResultPresenter> {
    let mut renderer = GraphvizRenderer::new(config.renderer.clone());
    if config.save_diagrams {
        renderer = renderer.with_output_dir(diagrams_dir()?);
    }
    Ok(ResultPresenter::new(Box::new(renderer)))
}
