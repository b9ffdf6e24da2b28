//! Diagram rendering through Graphviz.
//!
//! The compiler returns its AST as DOT source. Turning that into an image is
//! delegated to an external `dot` executable; this module only spawns it,
//! feeds it the source and collects the SVG.

use chrono::Local;
use regex::Regex;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::OnceLock;
use thiserror::Error;

/// Why a diagram could not be rendered.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("diagram renderer `{0}` is not installed or not on PATH")]
    Unavailable(String),

    #[error("diagram renderer rejected the source: {0}")]
    Rejected(String),

    #[error("diagram renderer I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// SVG output of a successful render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDiagram {
    pub svg: String,
    /// Where the SVG was written, if it was kept on disk.
    pub path: Option<PathBuf>,
}

/// Capability that turns diagram source into a vector image.
pub trait DiagramRenderer {
    fn render(&self, source: &str) -> Result<RenderedDiagram, RenderError>;
}

/// Renders DOT to SVG with `dot -Tsvg`.
pub struct GraphvizRenderer {
    command: String,
    output_dir: Option<PathBuf>,
}

impl GraphvizRenderer {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            output_dir: None,
        }
    }

    /// Also write each rendered SVG into `dir`.
    pub fn with_output_dir(mut self, dir: PathBuf) -> Self {
        self.output_dir = Some(dir);
        self
    }

    fn save(&self, svg: &str) -> Result<Option<PathBuf>, RenderError> {
        let Some(dir) = &self.output_dir else {
            return Ok(None);
        };
        fs::create_dir_all(dir)?;
        let path = dir.join(format!(
            "diagram-{}.svg",
            Local::now().format("%Y%m%d-%H%M%S-%3f")
        ));
        fs::write(&path, svg)?;
        Ok(Some(path))
    }
}

impl DiagramRenderer for GraphvizRenderer {
    fn render(&self, source: &str) -> Result<RenderedDiagram, RenderError> {
        let mut child = Command::new(&self.command)
            .arg("-Tsvg")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => RenderError::Unavailable(self.command.clone()),
                _ => RenderError::Io(e),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            // A renderer that exits early closes the pipe; its exit status
            // carries the real error.
            if let Err(e) = stdin.write_all(source.as_bytes()) {
                if e.kind() != io::ErrorKind::BrokenPipe {
                    return Err(e.into());
                }
            }
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(RenderError::Rejected(if stderr.is_empty() {
                format!("exited with {}", output.status)
            } else {
                stderr
            }));
        }

        let svg = String::from_utf8_lossy(&output.stdout).to_string();
        let path = self.save(&svg)?;
        tracing::debug!(bytes = svg.len(), path = ?path, "diagram rendered");
        Ok(RenderedDiagram { svg, path })
    }
}

/// A directed or undirected edge found in DOT source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub from: String,
    pub to: String,
}

/// Node IDs (quoted or bare) and edge operators, in source order.
fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#""(?:[^"\\]|\\.)*"|[A-Za-z0-9_.]+|-[->]"#).expect("token pattern is valid")
    })
}

fn is_edge_op(token: &str) -> bool {
    token == "->" || token == "--"
}

/// Extract `a -> b` / `a -- b` pairs for a text summary of the diagram.
///
/// Quoted IDs are taken whole, so `;`, braces or arrows inside quotes never
/// split or create edges. Chains such as `a -> b -> c` yield one edge per hop.
pub fn edge_summary(source: &str) -> Vec<Edge> {
    let unquote = |s: &str| s.trim_matches('"').to_string();
    let tokens: Vec<_> = token_pattern().find_iter(source).collect();
    // Tokens only form an edge when nothing but whitespace separates them.
    let adjacent = |a: usize, b: usize| source[a..b].trim().is_empty();

    tokens
        .windows(3)
        .filter(|w| {
            !is_edge_op(w[0].as_str())
                && is_edge_op(w[1].as_str())
                && !is_edge_op(w[2].as_str())
                && adjacent(w[0].end(), w[1].start())
                && adjacent(w[1].end(), w[2].start())
        })
        .map(|w| Edge {
            from: unquote(w[0].as_str()),
            to: unquote(w[2].as_str()),
        })
        .collect()
}
