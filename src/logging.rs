//! Tracing subscriber setup.
//!
//! Filtering follows `MJC_LOG` (an `EnvFilter` directive string) and falls
//! back to `mjc=info`, or `mjc=debug` with `--verbose`.

use crate::config::logs_dir;
use crate::error::Result;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_ENV_VAR: &str = "MJC_LOG";
pub const LOG_FILENAME: &str = "mjc.log";

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Headless commands: stdout carries results, logs go to stderr.
    Stderr,
    /// The terminal UI owns the screen, so logs are appended to a file.
    File(PathBuf),
}

impl LogTarget {
    /// `~/.config/mjc/logs/mjc.log`.
    pub fn default_file() -> Result<Self> {
        Ok(LogTarget::File(logs_dir()?.join(LOG_FILENAME)))
    }
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "mjc=debug"
    } else {
        "mjc=info"
    }
}

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| default_directive(verbose).into())
}

/// Install the global subscriber. Calling it again is a no-op.
pub fn init(target: LogTarget, verbose: bool) -> Result<()> {
    let registry = tracing_subscriber::registry().with(env_filter(verbose));

    let installed = match target {
        LogTarget::Stderr => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .try_init()
        }
    };

    // Only fails when a subscriber is already installed.
    if let Err(e) = installed {
        tracing::debug!(error = %e, "logging already initialised");
    }
    Ok(())
}
