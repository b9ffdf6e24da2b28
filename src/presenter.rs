//! Routing of a successful compilation to the three output regions.
//!
//! The regions themselves are behind [`OutputSurface`] so the same presenter
//! drives the terminal UI ([`Panes`]) and the headless `compile` command.

use crate::model::{CompileSuccess, Symbol};
use crate::render::{edge_summary, DiagramRenderer, Edge};
use chrono::{DateTime, Local};
use std::fmt;
use std::path::PathBuf;

/// Text of the single row shown when the symbol table is empty.
pub const PLACEHOLDER_ROW_TEXT: &str = "No symbols were produced";

/// Output tabs in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputTab {
    #[default]
    Assembly,
    Diagram,
    Symbols,
}

impl OutputTab {
    pub fn name(&self) -> &'static str {
        match self {
            OutputTab::Assembly => "Assembly",
            OutputTab::Diagram => "Diagram",
            OutputTab::Symbols => "Symbols",
        }
    }

    pub fn all() -> &'static [OutputTab] {
        &[OutputTab::Assembly, OutputTab::Diagram, OutputTab::Symbols]
    }

    pub fn index(&self) -> usize {
        OutputTab::all()
            .iter()
            .position(|t| t == self)
            .unwrap_or(0)
    }

    pub fn next(&self) -> OutputTab {
        let tabs = OutputTab::all();
        tabs[(self.index() + 1) % tabs.len()]
    }
}

impl fmt::Display for OutputTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Warning,
    Error,
}

/// A line for the status region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
    pub at: DateTime<Local>,
}

impl StatusMessage {
    pub fn new(kind: StatusKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            at: Local::now(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(StatusKind::Info, text)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(StatusKind::Success, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(StatusKind::Warning, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(StatusKind::Error, text)
    }
}

/// What the diagram region shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DiagramView {
    #[default]
    Empty,
    Rendered {
        path: Option<PathBuf>,
        svg_bytes: usize,
        edges: Vec<Edge>,
    },
    /// Rendering failed; the raw source is shown next to the error.
    Failed { source: String, error: String },
}

/// One row of the symbol table region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolRow {
    Placeholder,
    Entry {
        name: String,
        kind: String,
        scope: String,
        address: String,
    },
}

impl SymbolRow {
    pub fn from_symbol(symbol: &Symbol) -> Self {
        SymbolRow::Entry {
            name: symbol.name.clone(),
            kind: symbol.kind.clone(),
            scope: symbol.scope.clone(),
            address: symbol.display_address().to_string(),
        }
    }

    /// Cells in column order: name, type, scope, address.
    pub fn cells(&self) -> [&str; 4] {
        match self {
            SymbolRow::Placeholder => [PLACEHOLDER_ROW_TEXT, "", "", ""],
            SymbolRow::Entry {
                name,
                kind,
                scope,
                address,
            } => [name.as_str(), kind.as_str(), scope.as_str(), address.as_str()],
        }
    }
}

/// Column headers of the symbol table.
pub const SYMBOL_COLUMNS: [&str; 4] = ["Name", "Type", "Scope", "Address"];

/// The output regions a compilation result is written into.
pub trait OutputSurface {
    /// Empty the assembly, diagram and symbol regions and the status line.
    fn clear_outputs(&mut self);

    /// Replace the assembly region's content.
    fn show_assembly(&mut self, text: &str);

    fn show_diagram(&mut self, view: DiagramView);

    /// Drop every existing row, then insert `rows`.
    fn replace_symbol_rows(&mut self, rows: Vec<SymbolRow>);

    fn select_tab(&mut self, tab: OutputTab);

    fn show_status(&mut self, status: StatusMessage);
}

/// In-memory output regions rendered by the terminal UI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Panes {
    pub assembly: String,
    pub diagram: DiagramView,
    pub symbols: Vec<SymbolRow>,
    pub tab: OutputTab,
    pub status: Option<StatusMessage>,
}

impl OutputSurface for Panes {
    fn clear_outputs(&mut self) {
        self.assembly.clear();
        self.diagram = DiagramView::Empty;
        self.symbols.clear();
        self.status = None;
    }

    fn show_assembly(&mut self, text: &str) {
        self.assembly = text.to_string();
    }

    fn show_diagram(&mut self, view: DiagramView) {
        self.diagram = view;
    }

    fn replace_symbol_rows(&mut self, rows: Vec<SymbolRow>) {
        self.symbols.clear();
        self.symbols.extend(rows);
    }

    fn select_tab(&mut self, tab: OutputTab) {
        self.tab = tab;
    }

    fn show_status(&mut self, status: StatusMessage) {
        self.status = Some(status);
    }
}

/// Sends each channel of a successful compilation to its region.
pub struct ResultPresenter {
    renderer: Box<dyn DiagramRenderer + Send>,
}

impl ResultPresenter {
    pub fn new(renderer: Box<dyn DiagramRenderer + Send>) -> Self {
        Self { renderer }
    }

    pub fn present(&self, result: &CompileSuccess, surface: &mut dyn OutputSurface) {
        surface.show_assembly(&result.asm_text);

        if let Some(source) = &result.diagram_source {
            surface.show_diagram(self.diagram_view(source));
        }

        surface.replace_symbol_rows(symbol_rows(&result.symbols));

        if !result.symbols.is_empty() {
            surface.select_tab(OutputTab::Assembly);
        }
    }

    fn diagram_view(&self, source: &str) -> DiagramView {
        match self.renderer.render(source) {
            Ok(rendered) => DiagramView::Rendered {
                path: rendered.path,
                svg_bytes: rendered.svg.len(),
                edges: edge_summary(source),
            },
            Err(e) => {
                tracing::warn!(error = %e, "diagram rendering failed");
                DiagramView::Failed {
                    source: source.to_string(),
                    error: e.to_string(),
                }
            }
        }
    }
}

/// Table rows for `symbols`, or the placeholder row when there are none.
pub fn symbol_rows(symbols: &[Symbol]) -> Vec<SymbolRow> {
    if symbols.is_empty() {
        return vec![SymbolRow::Placeholder];
    }
    symbols.iter().map(SymbolRow::from_symbol).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{RenderError, RenderedDiagram};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FailingRenderer;

    impl DiagramRenderer for FailingRenderer {
        fn render(&self, _source: &str) -> Result<RenderedDiagram, RenderError> {
            Err(RenderError::Rejected("syntax error in line 1 near '{'".to_string()))
        }
    }

    struct CountingRenderer(Arc<AtomicUsize>);

    impl DiagramRenderer for CountingRenderer {
        fn render(&self, source: &str) -> Result<RenderedDiagram, RenderError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(RenderedDiagram {
                svg: format!("<svg>{}</svg>", source),
                path: None,
            })
        }
    }

    fn symbol(name: &str, address: Option<&str>) -> Symbol {
        Symbol {
            name: name.to_string(),
            kind: "int".to_string(),
            scope: "main".to_string(),
            address: address.map(str::to_string),
        }
    }

    #[test]
    fn test_output_tab_cycle() {
        assert_eq!(OutputTab::Assembly.next(), OutputTab::Diagram);
        assert_eq!(OutputTab::Diagram.next(), OutputTab::Symbols);
        assert_eq!(OutputTab::Symbols.next(), OutputTab::Assembly);
        assert_eq!(OutputTab::Symbols.index(), 2);
        assert_eq!(format!("{}", OutputTab::Diagram), "Diagram");
    }

    #[test]
    fn test_assembly_only_result() {
        let renders = Arc::new(AtomicUsize::new(0));
        let presenter = ResultPresenter::new(Box::new(CountingRenderer(renders.clone())));
        let mut panes = Panes::default();

        presenter.present(
            &CompileSuccess {
                asm_text: "MOV R1,R2".to_string(),
                diagram_source: None,
                symbols: vec![],
            },
            &mut panes,
        );

        assert_eq!(panes.assembly, "MOV R1,R2");
        assert_eq!(panes.symbols, vec![SymbolRow::Placeholder]);
        assert_eq!(panes.diagram, DiagramView::Empty);
        assert_eq!(renders.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_render_failure_shows_source_and_error() {
        let presenter = ResultPresenter::new(Box::new(FailingRenderer));
        let mut panes = Panes::default();

        presenter.present(
            &CompileSuccess {
                asm_text: String::new(),
                diagram_source: Some("digraph{A->B}".to_string()),
                symbols: vec![],
            },
            &mut panes,
        );

        match &panes.diagram {
            DiagramView::Failed { source, error } => {
                assert_eq!(source, "digraph{A->B}");
                assert!(error.contains("syntax error"));
            }
            other => panic!("expected failed diagram, got {:?}", other),
        }
        assert_eq!(panes.symbols, vec![SymbolRow::Placeholder]);
    }

    #[test]
    fn test_rendered_diagram_has_edge_summary() {
        let presenter =
            ResultPresenter::new(Box::new(CountingRenderer(Arc::new(AtomicUsize::new(0)))));
        let mut panes = Panes::default();

        presenter.present(
            &CompileSuccess {
                diagram_source: Some("digraph{A->B}".to_string()),
                ..Default::default()
            },
            &mut panes,
        );

        match &panes.diagram {
            DiagramView::Rendered {
                svg_bytes, edges, ..
            } => {
                assert_eq!(*svg_bytes, "<svg>digraph{A->B}</svg>".len());
                assert_eq!(edges.len(), 1);
            }
            other => panic!("expected rendered diagram, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_addresses_render_na() {
        let rows = symbol_rows(&[symbol("a", None), symbol("b", None)]);
        assert_eq!(rows.len(), 2);
        for row in &rows {
            assert_eq!(row.cells()[3], "N/A");
        }
    }

    #[test]
    fn test_symbol_rows_replace_previous_rows() {
        let presenter = ResultPresenter::new(Box::new(FailingRenderer));
        let mut panes = Panes::default();
        panes.replace_symbol_rows(vec![SymbolRow::Placeholder, SymbolRow::Placeholder]);

        presenter.present(
            &CompileSuccess {
                symbols: vec![symbol("x", Some("0x04"))],
                ..Default::default()
            },
            &mut panes,
        );

        assert_eq!(
            panes.symbols,
            vec![SymbolRow::Entry {
                name: "x".to_string(),
                kind: "int".to_string(),
                scope: "main".to_string(),
                address: "0x04".to_string(),
            }]
        );
    }

    #[test]
    fn test_non_empty_symbols_select_assembly_tab() {
        let presenter = ResultPresenter::new(Box::new(FailingRenderer));
        let mut panes = Panes {
            tab: OutputTab::Symbols,
            ..Default::default()
        };

        presenter.present(
            &CompileSuccess {
                symbols: vec![symbol("x", None)],
                ..Default::default()
            },
            &mut panes,
        );
        assert_eq!(panes.tab, OutputTab::Assembly);
    }

    #[test]
    fn test_empty_symbols_keep_current_tab() {
        let presenter = ResultPresenter::new(Box::new(FailingRenderer));
        let mut panes = Panes {
            tab: OutputTab::Diagram,
            ..Default::default()
        };

        presenter.present(&CompileSuccess::default(), &mut panes);
        assert_eq!(panes.tab, OutputTab::Diagram);
    }

    #[test]
    fn test_clear_outputs_resets_regions_but_not_tab() {
        let mut panes = Panes {
            assembly: "NOP".to_string(),
            diagram: DiagramView::Failed {
                source: "x".to_string(),
                error: "y".to_string(),
            },
            symbols: vec![SymbolRow::Placeholder],
            tab: OutputTab::Symbols,
            status: Some(StatusMessage::info("old")),
        };
        panes.clear_outputs();

        assert!(panes.assembly.is_empty());
        assert_eq!(panes.diagram, DiagramView::Empty);
        assert!(panes.symbols.is_empty());
        assert!(panes.status.is_none());
        assert_eq!(panes.tab, OutputTab::Symbols);
    }

    #[test]
    fn test_placeholder_cells() {
        assert_eq!(
            SymbolRow::Placeholder.cells(),
            [PLACEHOLDER_ROW_TEXT, "", "", ""]
        );
    }
}
