//! Layout and widgets.
//!
//! ```text
//! ┌ mjc ─ Assembly │ Diagram │ Symbols ───────────────────────┐
//! ├ main.mjava ──────────────┬ Assembly ──────────────────────┤
//! │ source (themed)          │ active output tab              │
//! ├──────────────────────────┴────────────────────────────────┤
//! │ [Compile] status line                                      │
//! │ F5 compile | e edit | t theme | Tab next tab | q quit      │
//! └────────────────────────────────────────────────────────────┘
//! ```

use super::app::{App, LoginField, Screen};
use crate::presenter::{
    DiagramView, OutputTab, StatusKind, StatusMessage, SymbolRow, SYMBOL_COLUMNS,
};
use crate::theme::ThemePreference;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};

pub fn render(frame: &mut Frame, app: &App) {
    match app.screen() {
        Screen::Login => render_login(frame, app),
        Screen::Workspace => render_workspace(frame, app),
    }
}

fn status_color(kind: StatusKind) -> Color {
    match kind {
        StatusKind::Info => Color::Cyan,
        StatusKind::Success => Color::Green,
        StatusKind::Warning => Color::Yellow,
        StatusKind::Error => Color::Red,
    }
}

fn status_line(status: Option<&StatusMessage>) -> Line<'_> {
    match status {
        Some(status) => Line::from(vec![
            Span::styled(
                format!("{} ", status.at.format("%H:%M:%S")),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                status.text.as_str(),
                Style::default().fg(status_color(status.kind)),
            ),
        ]),
        None => Line::from(""),
    }
}

/// Foreground and background of the source pane.
fn source_palette(theme: ThemePreference) -> Style {
    match theme {
        ThemePreference::Light => Style::default().fg(Color::Black).bg(Color::White),
        ThemePreference::Dark => Style::default().fg(Color::Gray).bg(Color::Black),
    }
}

// ============================================================================
// Login screen
// ============================================================================

fn render_login(frame: &mut Frame, app: &App) {
    let area = centered_rect(50, 60, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" mjc ─ sign in ")
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Username
            Constraint::Length(3), // Password
            Constraint::Length(1), // Button
            Constraint::Length(1),
            Constraint::Min(1), // Message
        ])
        .split(inner);

    let form = app.login();
    let field_block = |title: &'static str, field: LoginField| {
        let style = if form.focus == field {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(style)
    };

    frame.render_widget(
        Paragraph::new(form.username.as_str()).block(field_block(" Username ", LoginField::Username)),
        rows[0],
    );
    frame.render_widget(
        Paragraph::new(mask(&form.password)).block(field_block(" Password ", LoginField::Password)),
        rows[1],
    );

    let button_style = if form.focus == LoginField::Button {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan)
    };
    let button_label = if form.pending { " Signing in... " } else { " Sign in " };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(button_label, button_style))),
        rows[2],
    );

    frame.render_widget(
        Paragraph::new(status_line(form.message.as_ref())).wrap(Wrap { trim: true }),
        rows[4],
    );

    let footer_area = Rect {
        y: frame.area().bottom().saturating_sub(1),
        height: 1,
        ..frame.area()
    };
    frame.render_widget(
        Paragraph::new(" Tab: next field | Enter: sign in | Esc: quit ")
            .style(Style::default().fg(Color::DarkGray)),
        footer_area,
    );
}

fn mask(secret: &str) -> String {
    "*".repeat(secret.chars().count())
}

// ============================================================================
// Workspace screen
// ============================================================================

fn render_workspace(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with tabs
            Constraint::Min(5),    // Source and output
            Constraint::Length(1), // Trigger and status
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[1]);
    render_source(frame, app, body[0]);
    render_output(frame, app, body[1]);

    render_status(frame, app, chunks[2]);
    render_footer(frame, app, chunks[3]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = OutputTab::all()
        .iter()
        .map(|t| Line::from(t.name()))
        .collect();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" mjc ─ {} ", app.endpoint())),
        )
        .select(app.panes().tab.index())
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

fn render_source(frame: &mut Frame, app: &App, area: Rect) {
    let palette = source_palette(app.editor().theme());
    let lines: Vec<Line> = app
        .source()
        .lines()
        .enumerate()
        .map(|(i, line)| {
            Line::from(vec![
                Span::styled(format!("{:>3} ", i + 1), Style::default().fg(Color::DarkGray)),
                Span::raw(line),
            ])
        })
        .collect();

    let source = Paragraph::new(lines).style(palette).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Source ")
            .title_bottom(format!(" {} ", app.theme().toggle_label())),
    );
    frame.render_widget(source, area);
}

fn render_output(frame: &mut Frame, app: &App, area: Rect) {
    let panes = app.panes();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", panes.tab));

    match panes.tab {
        OutputTab::Assembly => {
            let text = if panes.assembly.is_empty() {
                Paragraph::new("No assembly yet.").style(Style::default().fg(Color::DarkGray))
            } else {
                Paragraph::new(panes.assembly.as_str())
            };
            frame.render_widget(text.block(block), area);
        }
        OutputTab::Diagram => {
            frame.render_widget(
                Paragraph::new(diagram_lines(&panes.diagram))
                    .wrap(Wrap { trim: false })
                    .block(block),
                area,
            );
        }
        OutputTab::Symbols => {
            let header = Row::new(SYMBOL_COLUMNS).style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            );
            let rows: Vec<Row> = panes
                .symbols
                .iter()
                .map(|row| {
                    let style = match row {
                        SymbolRow::Placeholder => Style::default().fg(Color::DarkGray),
                        SymbolRow::Entry { .. } => Style::default(),
                    };
                    Row::new(row.cells()).style(style)
                })
                .collect();
            let widths = [
                Constraint::Percentage(30),
                Constraint::Percentage(20),
                Constraint::Percentage(30),
                Constraint::Percentage(20),
            ];
            frame.render_widget(Table::new(rows, widths).header(header).block(block), area);
        }
    }
}

fn diagram_lines(view: &DiagramView) -> Vec<Line<'_>> {
    match view {
        DiagramView::Empty => vec![Line::styled(
            "No diagram.",
            Style::default().fg(Color::DarkGray),
        )],
        DiagramView::Rendered {
            path,
            svg_bytes,
            edges,
        } => {
            let mut lines = vec![Line::styled(
                match path {
                    Some(path) => format!("SVG ({} bytes) saved to {}", svg_bytes, path.display()),
                    None => format!("SVG rendered ({} bytes)", svg_bytes),
                },
                Style::default().fg(Color::Green),
            )];
            lines.push(Line::from(""));
            lines.push(Line::styled(
                format!("{} edges", edges.len()),
                Style::default().add_modifier(Modifier::BOLD),
            ));
            lines.extend(
                edges
                    .iter()
                    .map(|e| Line::from(format!("  {} → {}", e.from, e.to))),
            );
            lines
        }
        DiagramView::Failed { source, error } => {
            let mut lines = vec![
                Line::styled(
                    format!("Diagram could not be rendered: {}", error),
                    Style::default().fg(Color::Red),
                ),
                Line::from(""),
            ];
            lines.extend(source.lines().map(Line::from));
            lines
        }
    }
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let trigger = app.orchestrator().trigger();
    let trigger_style = if trigger.enabled {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Black).bg(Color::DarkGray)
    };

    let mut spans = vec![
        Span::styled(format!(" {} ", trigger.label), trigger_style),
        Span::raw(" "),
    ];
    spans.extend(status_line(app.panes().status.as_ref()).spans);
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = if app.is_redirecting() {
        " Redirecting to the login screen... "
    } else {
        " F5/Ctrl+R: compile | e: edit | t: theme | Tab: next tab | q: quit "
    };
    let footer = Paragraph::new(help_text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, area);
}

/// Create a centered rectangle of given percentage width/height
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
