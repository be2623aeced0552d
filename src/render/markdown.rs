//! Markdown rendering for document summaries.

use crate::error::Result;
use crate::model::{DocumentSummary, ExtractedTable, FormField, TableRow};

use super::{RenderOptions, TableStyle};

/// Convert a summary to Markdown.
pub fn to_markdown(summary: &DocumentSummary, options: &RenderOptions) -> Result<String> {
    let renderer = MarkdownRenderer::new(options.clone());
    renderer.render(summary)
}

/// Markdown renderer.
pub struct MarkdownRenderer {
    options: RenderOptions,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render a summary to Markdown.
    pub fn render(&self, summary: &DocumentSummary) -> Result<String> {
        let mut output = String::new();

        if self.options.include_frontmatter {
            output.push_str(&summary.to_yaml_frontmatter());
            output.push('\n');
        }

        if self.options.include_text && !summary.full_text.is_empty() {
            self.render_text(&mut output, &summary.full_text);
        }

        if self.options.include_tables {
            for (i, table) in summary.tables.iter().enumerate() {
                self.render_table(&mut output, i + 1, table);
            }
        }

        if self.options.include_form_fields && !summary.form_fields.is_empty() {
            self.render_form_fields(&mut output, &summary.form_fields);
        }

        Ok(output.trim().to_string())
    }

    fn escape(&self, text: &str) -> String {
        if self.options.escape_special_chars {
            escape_markdown(text)
        } else {
            text.to_string()
        }
    }

    fn render_text(&self, output: &mut String, text: &str) {
        let lines: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| self.escape(line))
            .collect();

        // Hard line breaks keep the service's line structure.
        output.push_str(&lines.join("  \n"));
        output.push_str("\n\n");
    }

    fn render_table(&self, output: &mut String, number: usize, table: &ExtractedTable) {
        if table.is_empty() {
            return;
        }

        output.push_str(&format!("### Table {}", number));
        if let Some(page) = table.page {
            output.push_str(&format!(" (page {})", page));
        }
        output.push_str("\n\n");

        match self.options.table_style {
            TableStyle::Markdown => self.render_table_markdown(output, table),
            TableStyle::Html => self.render_table_html(output, table),
        }
    }

    fn render_table_markdown(&self, output: &mut String, table: &ExtractedTable) {
        let col_count = table.column_count();
        if col_count == 0 {
            return;
        }

        for (i, row) in table.rows.iter().enumerate() {
            output.push('|');
            for slot in row.slots(col_count) {
                let content = slot
                    .map(|cell| self.escape(&cell.text.replace('\n', " ")))
                    .unwrap_or_default();
                output.push_str(&format!(" {} |", content.trim()));
            }
            output.push('\n');

            // The first row doubles as the header.
            if i == 0 {
                output.push('|');
                for _ in 0..col_count {
                    output.push_str(" --- |");
                }
                output.push('\n');
            }
        }

        output.push('\n');
    }

    fn render_table_html(&self, output: &mut String, table: &ExtractedTable) {
        let col_count = table.column_count();
        output.push_str("<table>\n<tbody>\n");
        for row in &table.rows {
            self.render_html_row(output, row, col_count);
        }
        output.push_str("</tbody>\n</table>\n\n");
    }

    fn render_html_row(&self, output: &mut String, row: &TableRow, col_count: usize) {
        output.push_str("<tr>");
        for slot in row.slots(col_count) {
            output.push_str("<td>");
            if let Some(cell) = slot {
                output.push_str(&escape_html(&cell.text).replace('\n', "<br>"));
            }
            output.push_str("</td>");
        }
        output.push_str("</tr>\n");
    }

    fn render_form_fields(&self, output: &mut String, fields: &[FormField]) {
        output.push_str("### Form Fields\n\n");
        for field in fields {
            output.push(self.options.list_marker);
            output.push_str(&format!(
                " **{}**: {}\n",
                self.escape(field.label()),
                self.escape(&field.value.replace('\n', " "))
            ));
        }
        output.push('\n');
    }
}

/// Escape special Markdown characters.
/// Only escape characters that could be misinterpreted as Markdown syntax.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' | '|' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TableCell;

    fn table(rows: &[&[&str]]) -> ExtractedTable {
        let mut table = ExtractedTable::new("t1", 90.0);
        for (r, cells) in rows.iter().enumerate() {
            let cells = cells
                .iter()
                .enumerate()
                .map(|(c, text)| TableCell::new(*text, 90.0, c as u32 + 1))
                .collect();
            table.add_row(TableRow::new(r as u32 + 1, cells));
        }
        table
    }

    fn summary() -> DocumentSummary {
        let mut summary = DocumentSummary::new();
        summary.full_text = "Harbor Hardware\nTotal $250.00".to_string();
        summary.page_count = 1;
        summary.amount = Some(250.0);
        summary.tables.push(table(&[&["Item", "Price"], &["Nails", "$4"]]));
        summary.form_fields.extend(FormField::new("Total:", "$250.00", 88.0));
        summary
    }

    #[test]
    fn test_escape_markdown() {
        assert_eq!(escape_markdown("Hello *world*"), "Hello \\*world\\*");
        assert_eq!(escape_markdown("a|b"), "a\\|b");
    }

    #[test]
    fn test_render_sections() {
        let result = to_markdown(&summary(), &RenderOptions::new()).unwrap();

        assert!(result.starts_with("Harbor Hardware  \nTotal $250.00"));
        assert!(result.contains("### Table 1\n\n| Item | Price |\n| --- | --- |\n| Nails | $4 |"));
        assert!(result.contains("### Form Fields\n\n- **Total**: $250.00"));
        assert!(!result.contains("---\npages"));
    }

    #[test]
    fn test_render_with_frontmatter() {
        let options = RenderOptions::new().with_frontmatter(true);
        let result = to_markdown(&summary(), &options).unwrap();

        assert!(result.starts_with("---\npages: 1\n"));
        assert!(result.contains("amount: 250.00"));
    }

    #[test]
    fn test_ragged_table_padded() {
        let mut summary = DocumentSummary::new();
        summary.tables.push(table(&[&["A", "B", "C"], &["D"]]));

        let result = to_markdown(&summary, &RenderOptions::new()).unwrap();
        assert!(result.contains("| A | B | C |\n| --- | --- | --- |\n| D |  |  |"));
    }

    #[test]
    fn test_column_gap_padded() {
        let mut summary = DocumentSummary::new();
        summary.tables.push(ExtractedTable {
            block_id: "t".to_string(),
            rows: vec![
                TableRow::new(
                    1,
                    vec![
                        TableCell::new("A", 0.0, 1),
                        TableCell::new("B", 0.0, 2),
                        TableCell::new("C", 0.0, 3),
                    ],
                ),
                TableRow::new(
                    2,
                    vec![TableCell::new("D", 0.0, 1), TableCell::new("F", 0.0, 3)],
                ),
            ],
            confidence: 0.0,
            page: None,
        });

        let result = to_markdown(&summary, &RenderOptions::new()).unwrap();
        assert!(result.contains("| A | B | C |\n| --- | --- | --- |\n| D |  | F |"));

        let options = RenderOptions::new().with_table_style(TableStyle::Html);
        let result = to_markdown(&summary, &options).unwrap();
        assert!(result.contains("<tr><td>D</td><td></td><td>F</td></tr>"));
    }

    #[test]
    fn test_html_tables() {
        let mut summary = DocumentSummary::new();
        summary.tables.push(table(&[&["R&D", "<1>"]]));

        let options = RenderOptions::new().with_table_style(TableStyle::Html);
        let result = to_markdown(&summary, &options).unwrap();
        assert!(result.contains("<tr><td>R&amp;D</td><td>&lt;1&gt;</td></tr>"));
    }

    #[test]
    fn test_sections_disabled() {
        let options = RenderOptions::new()
            .with_text(false)
            .with_tables(false)
            .with_form_fields(false);
        let result = to_markdown(&summary(), &options).unwrap();
        assert!(result.is_empty());
    }
}
