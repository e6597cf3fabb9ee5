//! Data table component.
//!
//! Resource views describe their tables with these types; the table renders
//! as aligned plain text for terminal output.

use std::fmt::Write as _;

use serde::Serialize;

/// Column definition for a data table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableColumn {
    /// Unique key for the column.
    pub key: String,
    /// Display label for the column header.
    pub label: String,
    /// Right-align cell text (numbers, money).
    pub numeric: bool,
}

impl TableColumn {
    /// Create a new left-aligned column.
    #[must_use]
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            numeric: false,
        }
    }

    /// Create a new right-aligned column.
    #[must_use]
    pub fn numeric(key: &str, label: &str) -> Self {
        Self {
            numeric: true,
            ..Self::new(key, label)
        }
    }
}

/// A rendered-on-demand table of rows.
#[derive(Debug, Clone, Serialize)]
pub struct DataTable {
    /// Column definitions.
    pub columns: Vec<TableColumn>,
    /// Cell text, one inner vector per row, in column order.
    pub rows: Vec<Vec<String>>,
    /// Title shown instead of an empty body.
    pub empty_title: String,
}

impl DataTable {
    /// Create a table for a collection of `noun` ("users", "orders").
    #[must_use]
    pub fn new(noun: &str) -> Self {
        Self {
            columns: vec![],
            rows: vec![],
            empty_title: format!("No {noun} found"),
        }
    }

    /// Add a column.
    #[must_use]
    pub fn column(mut self, column: TableColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// Append a row. Missing cells render blank; extra cells are dropped.
    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render as aligned text: header, rule, then rows or the empty title.
    #[must_use]
    pub fn render(&self) -> String {
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.chars().count())
                    .fold(column.label.chars().count(), usize::max)
            })
            .collect();

        let mut out = String::new();
        let header: Vec<&str> = self.columns.iter().map(|c| c.label.as_str()).collect();
        self.write_line(&mut out, &widths, &header);

        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        let rule: Vec<&str> = rule.iter().map(String::as_str).collect();
        self.write_line(&mut out, &widths, &rule);

        if self.rows.is_empty() {
            out.push_str(&self.empty_title);
            out.push('\n');
            return out;
        }

        for row in &self.rows {
            let cells: Vec<&str> = (0..self.columns.len())
                .map(|i| row.get(i).map_or("", String::as_str))
                .collect();
            self.write_line(&mut out, &widths, &cells);
        }
        out
    }

    fn write_line(&self, out: &mut String, widths: &[usize], cells: &[&str]) {
        let mut line = String::new();
        for ((column, width), cell) in self.columns.iter().zip(widths).zip(cells) {
            if !line.is_empty() {
                line.push_str("  ");
            }
            let _ = if column.numeric {
                write!(line, "{cell:>width$}")
            } else {
                write!(line, "{cell:<width$}")
            };
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
}
