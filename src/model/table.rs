//! Table types.

use serde::{Deserialize, Serialize};

/// A table reconstructed from a TABLE block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedTable {
    /// Id of the source TABLE block
    pub block_id: String,

    /// Rows in ascending row index order
    pub rows: Vec<TableRow>,

    /// Confidence of the source TABLE block (0 when absent)
    pub confidence: f64,

    /// 1-based page number, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

impl ExtractedTable {
    /// Create a new empty table.
    pub fn new(block_id: impl Into<String>, confidence: f64) -> Self {
        Self {
            block_id: block_id.into(),
            rows: Vec::new(),
            confidence,
            page: None,
        }
    }

    /// Add a row to the table.
    pub fn add_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns: the widest row, or the highest column
    /// index when that is larger.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(TableRow::width).max().unwrap_or(0)
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell texts as a plain grid.
    pub fn grid(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.cells.iter().map(|c| c.text.clone()).collect())
            .collect()
    }

    /// Get plain text representation of the table.
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whether some rows have a different number of cells than others.
    pub fn is_ragged(&self) -> bool {
        let mut widths = self.rows.iter().map(|r| r.cells.len());
        match widths.next() {
            Some(first) => widths.any(|w| w != first),
            None => false,
        }
    }
}

/// A table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// 1-based row index shared by every cell in the row
    pub index: u32,

    /// Cells in ascending column index order
    pub cells: Vec<TableCell>,
}

impl TableRow {
    /// Create a new row with cells.
    pub fn new(index: u32, cells: Vec<TableCell>) -> Self {
        Self { index, cells }
    }

    /// Number of grid slots the row needs.
    pub fn width(&self) -> usize {
        let highest = self.cells.iter().map(|c| c.column as usize).max().unwrap_or(0);
        highest.max(self.cells.len())
    }

    /// Cells laid out on a grid of `width` slots by column index.
    ///
    /// Column gaps stay `None`. A cell without a column index, or one whose
    /// slot is already taken, goes to the next free slot.
    pub fn slots(&self, width: usize) -> Vec<Option<&TableCell>> {
        let width = width.max(self.width());
        let mut slots: Vec<Option<&TableCell>> = vec![None; width];
        for (position, cell) in self.cells.iter().enumerate() {
            let target = match cell.column {
                0 => position,
                column => column as usize - 1,
            };
            let free = (target..width)
                .chain(0..target)
                .find(|&i| slots[i].is_none());
            if let Some(i) = free {
                slots[i] = Some(cell);
            }
        }
        slots
    }

    /// Get plain text representation.
    pub fn plain_text(&self) -> String {
        self.cells
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\t")
    }
}

/// A table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    /// Concatenated word/line text
    pub text: String,

    /// Cell confidence (0 when absent)
    pub confidence: f64,

    /// 1-based column index
    pub column: u32,
}

impl TableCell {
    /// Create a new cell.
    pub fn new(text: impl Into<String>, confidence: f64, column: u32) -> Self {
        Self {
            text: text.into(),
            confidence,
            column,
        }
    }

    /// Check if the cell is empty.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}
