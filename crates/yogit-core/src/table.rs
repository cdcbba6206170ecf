// SPDX-License-Identifier: Apache-2.0

//! Plain-text tables.
//!
//! Layout: a header line, a line of dashes per column, then one line per row.
//! Columns are separated by two spaces and trailing blanks are stripped.
//! A cell containing newlines spans several lines.

/// Minimum spacing kept around a header.
const HEADER_PADDING: usize = 2;

/// Table builder with left-aligned columns.
#[derive(Debug, Clone)]
pub struct TablePrinter {
    headers: Vec<String>,
    column_widths: Vec<usize>,
    rows: Vec<Vec<String>>,
}

fn width(text: &str) -> usize {
    text.lines().map(|l| l.chars().count()).max().unwrap_or(0)
}

impl TablePrinter {
    /// Create a new table printer with the given headers.
    pub fn new<I, H>(headers: I) -> Self
    where
        I: IntoIterator<Item = H>,
        H: Into<String>,
    {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        let column_widths = headers
            .iter()
            .map(|h| h.chars().count() + HEADER_PADDING)
            .collect();
        Self {
            headers,
            column_widths,
            rows: Vec::new(),
        }
    }

    /// Add a row to the table, updating column widths as needed.
    ///
    /// Extra cells beyond the header count are ignored; missing ones are blank.
    pub fn add_row<I, C>(&mut self, cells: I)
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        let mut cells: Vec<String> = cells
            .into_iter()
            .take(self.headers.len())
            .map(Into::into)
            .collect();
        cells.resize(self.headers.len(), String::new());
        for (column, cell) in self.column_widths.iter_mut().zip(&cells) {
            *column = (*column).max(width(cell));
        }
        self.rows.push(cells);
    }

    fn line<'a>(&self, cells: impl Iterator<Item = &'a str>) -> String {
        let mut out = String::new();
        for (i, (cell, width)) in cells.zip(&self.column_widths).enumerate() {
            if i > 0 {
                out.push_str("  ");
            }
            out.push_str(cell);
            let pad = width.saturating_sub(cell.chars().count());
            out.extend(std::iter::repeat_n(' ', pad));
        }
        out.trim_end().to_string()
    }

    /// Render the table, without a trailing newline.
    #[must_use]
    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(self.line(self.headers.iter().map(String::as_str)));

        let dashes: Vec<String> = self.column_widths.iter().map(|w| "-".repeat(*w)).collect();
        lines.push(self.line(dashes.iter().map(String::as_str)));

        for row in &self.rows {
            let split: Vec<Vec<&str>> = row.iter().map(|c| c.lines().collect()).collect();
            let height = split.iter().map(Vec::len).max().unwrap_or(0).max(1);
            for n in 0..height {
                lines.push(self.line(split.iter().map(|c| c.get(n).copied().unwrap_or(""))));
            }
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table_pads_headers() {
        let table = TablePrinter::new(["REPO", "URL"]);
        assert_eq!(table.render(), "REPO    URL\n------  -----");
    }

    #[test]
    fn test_columns_grow_with_cells() {
        let mut table = TablePrinter::new(["REPO", "URL"]);
        table.add_row(["owner1/repo", "https://"]);
        table.add_row(["owner2/repo", "https://"]);

        assert_eq!(
            table.render(),
            "REPO         URL\n\
             -----------  --------\n\
             owner1/repo  https://\n\
             owner2/repo  https://"
        );
    }

    #[test]
    fn test_multiline_cells() {
        let mut table = TablePrinter::new(["BRANCH", "PULL REQUEST"]);
        table.add_row(["has_pull_request", "https://def/pull/1\nhttps://def/pull/2"]);
        table.add_row(["no_pull_request", ""]);

        assert_eq!(
            table.render(),
            "BRANCH            PULL REQUEST\n\
             ----------------  ------------------\n\
             has_pull_request  https://def/pull/1\n\
             \x20                 https://def/pull/2\n\
             no_pull_request"
        );
    }

    #[test]
    fn test_row_is_fitted_to_headers() {
        let mut table = TablePrinter::new(["A", "B"]);
        table.add_row(["1"]);
        table.add_row(["1", "2", "3"]);
        let rendered = table.render();
        assert_eq!(rendered.lines().count(), 4);
        assert!(!rendered.contains('3'));
    }

    #[test]
    fn test_width_counts_chars_not_bytes() {
        let mut table = TablePrinter::new(["NAME", "X"]);
        table.add_row(["Besançon", "1"]);
        let rendered = table.render();
        let row = rendered.lines().nth(2).unwrap();
        assert_eq!(row, "Besançon  1");
    }
}
