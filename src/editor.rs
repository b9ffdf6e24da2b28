//! The source editor capability.
//!
//! Editing itself is delegated to the user's `$EDITOR`; this module only
//! owns the file being edited, reads it back for submission and remembers
//! which palette the source pane should use.

use crate::error::{MjcError, Result};
use crate::theme::ThemePreference;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Default source file name used when none is given.
pub const DEFAULT_SOURCE_FILE: &str = "main.mjava";

/// Written into a missing source file so there is something to compile.
pub const SAMPLE_PROGRAM: &str = "\
int counter;
boolean done;

counter = 0;
done = false;

while (!done) {
    counter = counter + 1;
    if (counter > 9) {
        done = true;
    } else {
        done = false;
    }
}
";

/// What the session needs from a text editor.
pub trait SourceEditor {
    /// Current source text.
    fn contents(&self) -> Result<String>;

    /// Let the user edit the source. Blocks until editing is finished.
    fn open(&mut self) -> Result<()>;

    fn apply_theme(&mut self, theme: ThemePreference);

    fn theme(&self) -> ThemePreference;
}

/// A source file on disk, edited with an external program.
pub struct FileEditor {
    path: PathBuf,
    theme: ThemePreference,
}

impl FileEditor {
    /// Open `path`, seeding it with [`SAMPLE_PROGRAM`] if it does not exist.
    pub fn create_or_open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, SAMPLE_PROGRAM)?;
            tracing::info!(path = %path.display(), "seeded new source file");
        }
        Ok(Self {
            path,
            theme: ThemePreference::default(),
        })
    }

    /// Open an existing file only.
    pub fn open_existing(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.is_file() {
            return Err(MjcError::SourceNotFound(path));
        }
        Ok(Self {
            path,
            theme: ThemePreference::default(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SourceEditor for FileEditor {
    fn contents(&self) -> Result<String> {
        if !self.path.is_file() {
            return Err(MjcError::SourceNotFound(self.path.clone()));
        }
        Ok(fs::read_to_string(&self.path)?)
    }

    fn open(&mut self) -> Result<()> {
        let command_line = editor_command();
        let mut parts = command_line.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| MjcError::Editor("no editor configured".to_string()))?;

        tracing::info!(editor = %command_line, path = %self.path.display(), "opening external editor");
        let status = Command::new(program)
            .args(parts)
            .arg(&self.path)
            .status()
            .map_err(|e| MjcError::Editor(format!("failed to start `{}`: {}", program, e)))?;

        if !status.success() {
            return Err(MjcError::Editor(format!(
                "`{}` exited with {}",
                command_line, status
            )));
        }
        Ok(())
    }

    fn apply_theme(&mut self, theme: ThemePreference) {
        self.theme = theme;
    }

    fn theme(&self) -> ThemePreference {
        self.theme
    }
}

/// `$VISUAL`, then `$EDITOR`, then `vi`.
pub fn editor_command() -> String {
    ["VISUAL", "EDITOR"]
        .iter()
        .filter_map(|var| env::var(var).ok())
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| "vi".to_string())
}
