//! Plain-text rendering of the symbol table.

use crate::presenter::{SymbolRow, PLACEHOLDER_ROW_TEXT, SYMBOL_COLUMNS};

const COLUMN_GAP: &str = "  ";
const MIN_COLUMN_WIDTH: usize = 4;

/// Truncate to `max_len` characters, ending with "..." when shortened.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Shrink the widest column until the row fits in `max_width`.
fn fit_widths(mut widths: [usize; 4], max_width: usize) -> [usize; 4] {
    let gaps = COLUMN_GAP.len() * (widths.len() - 1);
    while widths.iter().sum::<usize>() + gaps > max_width {
        let (widest, width) = widths
            .iter()
            .copied()
            .enumerate()
            .max_by_key(|(_, w)| *w)
            .unwrap_or((0, 0));
        if width <= MIN_COLUMN_WIDTH {
            break;
        }
        widths[widest] -= 1;
    }
    widths
}

fn format_row(cells: [&str; 4], widths: &[usize; 4]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", truncate(cell, *width), width = width))
        .collect::<Vec<_>>()
        .join(COLUMN_GAP)
        .trim_end()
        .to_string()
}

/// Lines of an aligned table no wider than `max_width` (when possible).
pub fn format_symbol_table(rows: &[SymbolRow], max_width: usize) -> Vec<String> {
    let mut widths = SYMBOL_COLUMNS.map(|h| h.chars().count());
    for row in rows {
        if let SymbolRow::Entry { .. } = row {
            for (width, cell) in widths.iter_mut().zip(row.cells()) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }
    let widths = fit_widths(widths, max_width);
    let total: usize = widths.iter().sum::<usize>() + COLUMN_GAP.len() * (widths.len() - 1);

    let mut lines = vec![
        format_row(SYMBOL_COLUMNS, &widths),
        "─".repeat(total.min(max_width.max(MIN_COLUMN_WIDTH))),
    ];
    for row in rows {
        match row {
            SymbolRow::Placeholder => lines.push(truncate(PLACEHOLDER_ROW_TEXT, max_width)),
            SymbolRow::Entry { .. } => lines.push(format_row(row.cells(), &widths)),
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, kind: &str, scope: &str, address: &str) -> SymbolRow {
        SymbolRow::Entry {
            name: name.to_string(),
            kind: kind.to_string(),
            scope: scope.to_string(),
            address: address.to_string(),
        }
    }

    #[test]
    fn test_columns_are_aligned() {
        let lines = format_symbol_table(
            &[
                entry("counter", "int", "global", "0x00"),
                entry("x", "boolean", "main", "N/A"),
            ],
            80,
        );

        assert_eq!(lines[0], "Name     Type     Scope   Address");
        assert_eq!(lines[2], "counter  int      global  0x00");
        assert_eq!(lines[3], "x        boolean  main    N/A");
    }

    #[test]
    fn test_placeholder_row() {
        let lines = format_symbol_table(&[SymbolRow::Placeholder], 80);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], PLACEHOLDER_ROW_TEXT);
    }

    #[test]
    fn test_narrow_terminal_truncates_widest_column() {
        let long_name = "a_really_long_identifier_name_for_testing";
        let lines = format_symbol_table(&[entry(long_name, "int", "main", "0x04")], 40);

        for line in &lines {
            assert!(line.chars().count() <= 40, "too wide: {:?}", line);
        }
        assert!(lines[2].contains("..."));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 6), "abc...");
    }
}
