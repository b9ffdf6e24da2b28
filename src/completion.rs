//! Shell completion scripts for mjc.
//!
//! The clap command tree is passed in by the binary so the generated script
//! always matches the real argument parser.

use crate::error::{MjcError, Result};
use clap::Command;
use clap_complete::{generate, Shell};
use std::io::Write;

pub const BIN_NAME: &str = "mjc";

/// Shells a completion script can be generated for.
pub const SUPPORTED_SHELLS: &[&str] = &["bash", "zsh", "fish"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellType {
    Bash,
    Zsh,
    Fish,
}

impl ShellType {
    /// Convert to the `clap_complete::Shell` type.
    pub fn to_clap_shell(self) -> Shell {
        match self {
            ShellType::Bash => Shell::Bash,
            ShellType::Zsh => Shell::Zsh,
            ShellType::Fish => Shell::Fish,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShellType::Bash => "bash",
            ShellType::Zsh => "zsh",
            ShellType::Fish => "fish",
        }
    }

    /// Parse a shell from its name or full path (`zsh`, `/usr/bin/fish`).
    pub fn from_name(name: &str) -> Result<Self> {
        let base = std::path::Path::new(name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(name);

        match base {
            "bash" => Ok(ShellType::Bash),
            "zsh" => Ok(ShellType::Zsh),
            "fish" => Ok(ShellType::Fish),
            _ => Err(MjcError::ShellCompletion(format!(
                "Unsupported shell: '{}'",
                base
            ))),
        }
    }
}

impl std::fmt::Display for ShellType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Generate the completion script for `cmd` as a string.
pub fn generate_completion_script(shell: ShellType, cmd: &mut Command) -> String {
    let mut buf = Vec::new();
    generate(shell.to_clap_shell(), cmd, BIN_NAME, &mut buf);
    String::from_utf8(buf).unwrap_or_default()
}

/// Write the completion script to stdout.
pub fn print_completion_script(shell: ShellType, cmd: &mut Command) -> Result<()> {
    let script = generate_completion_script(shell, cmd);
    std::io::stdout().write_all(script.as_bytes())?;
    Ok(())
}
