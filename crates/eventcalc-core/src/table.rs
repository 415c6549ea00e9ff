//! In-memory table loaded from a workbook.

use crate::value::CellValue;

/// Name of the leading orientation column holding source row numbers.
pub const ROW_COLUMN: &str = "ROW";

/// What a column is for, which also decides whether it can be edited.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnRole {
    /// Source spreadsheet row numbers; read-only.
    RowNumber,
    /// Grey input cells; editable.
    Input,
    /// Blue output cells, filled by a later calculation; read-only.
    Output,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub name: String,
    pub role: ColumnRole,
}

impl Column {
    pub fn new(name: impl Into<String>, role: ColumnRole) -> Self {
        Column {
            name: name.into(),
            role,
        }
    }

    pub fn is_editable(&self) -> bool {
        self.role == ColumnRole::Input
    }
}

/// One table row. `cells` is parallel to the table's columns.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    /// 1-based row number in the source sheet.
    pub source_row: u32,
    pub cells: Vec<CellValue>,
}

/// Ordered columns and rows.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Row>,
}

impl Table {
    /// Build a table. Rows shorter than the column list are padded with
    /// `Empty`; longer rows are truncated.
    pub fn new(columns: Vec<Column>, mut rows: Vec<Row>) -> Self {
        let width = columns.len();
        for row in &mut rows {
            row.cells.resize(width, CellValue::Empty);
        }
        Table { columns, rows }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the first column with this name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column(&self, col: usize) -> Option<&Column> {
        self.columns.get(col)
    }

    /// Column names excluding the `ROW` orientation column.
    pub fn data_column_names(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.role != ColumnRole::RowNumber)
            .map(|c| c.name.as_str())
            .collect()
    }

    pub fn input_columns(&self) -> impl Iterator<Item = (usize, &Column)> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_editable())
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row)?.cells.get(col)
    }

    /// Value of `column` in `row`, looked up by column name.
    pub fn value(&self, row: usize, column: &str) -> Option<&CellValue> {
        self.get(row, self.column_index(column)?)
    }

    pub(crate) fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut CellValue> {
        self.rows.get_mut(row)?.cells.get_mut(col)
    }

    /// A table with the row-number column (if any) and the input columns only.
    pub fn input_preview(&self) -> Table {
        let keep: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.role != ColumnRole::Output)
            .map(|(idx, _)| idx)
            .collect();

        let columns = keep.iter().map(|&idx| self.columns[idx].clone()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| Row {
                source_row: row.source_row,
                cells: keep.iter().map(|&idx| row.cells[idx].clone()).collect(),
            })
            .collect();
        Table::new(columns, rows)
    }

    /// Positions `(row, col)` whose values differ from `other`.
    /// Both tables are expected to share a shape; extra rows or columns on
    /// either side are ignored.
    pub fn diff(&self, other: &Table) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for (r, (a, b)) in self.rows.iter().zip(other.rows.iter()).enumerate() {
            for (c, (va, vb)) in a.cells.iter().zip(b.cells.iter()).enumerate() {
                if va != vb {
                    out.push((r, c));
                }
            }
        }
        out
    }
}
