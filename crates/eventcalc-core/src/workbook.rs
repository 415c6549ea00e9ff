//! Workbook reading via calamine.

use calamine::{Data, Range, Reader, Sheets, open_workbook_auto};
use log::{debug, info, warn};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::cell_ref::{CellRange, CellRef};
use crate::cities::dedupe_preserving_order;
use crate::error::{CoreError, Result};
use crate::layout::{CityListLayout, HeaderMode, OptionsLayout, TableLayout};
use crate::options::InputOptions;
use crate::table::{Column, ColumnRole, ROW_COLUMN, Row, Table};
use crate::value::CellValue;

/// An open spreadsheet file.
pub struct Workbook {
    path: PathBuf,
    sheets: Sheets<BufReader<File>>,
}

/// Values and formulas of one sheet.
struct SheetData {
    values: Range<Data>,
    formulas: Option<Range<String>>,
}

impl SheetData {
    fn is_formula(&self, row: u32, col: u32) -> bool {
        self.formulas
            .as_ref()
            .and_then(|f| f.get_value((row, col)))
            .is_some_and(|f| !f.trim().is_empty())
    }

    fn raw(&self, row: u32, col: u32) -> CellValue {
        self.values
            .get_value((row, col))
            .map(CellValue::from_data)
            .unwrap_or_default()
    }

    /// Cell as displayed: formula cells stay blank until they are calculated.
    fn display(&self, row: u32, col: u32) -> CellValue {
        if self.is_formula(row, col) {
            return CellValue::Empty;
        }
        self.raw(row, col)
    }

    fn used_range(&self) -> Option<CellRange> {
        let (start, end) = match (self.values.start(), self.values.end()) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                let f = self.formulas.as_ref()?;
                (f.start()?, f.end()?)
            }
        };
        Some(CellRange::new(
            CellRef::new(start.1, start.0),
            CellRef::new(end.1, end.0),
        ))
    }
}

impl Workbook {
    /// Open a spreadsheet. The format is picked from the file extension.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::SourceNotFound {
                path: path.to_path_buf(),
            });
        }
        let sheets = open_workbook_auto(path)?;
        info!("opened workbook {}", path.display());
        Ok(Workbook {
            path: path.to_path_buf(),
            sheets,
        })
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names().to_vec()
    }

    fn resolve_sheet(&self, name: Option<&str>) -> Result<String> {
        let names = self.sheet_names();
        match name {
            Some(name) => names
                .into_iter()
                .find(|n| n == name)
                .ok_or_else(|| CoreError::SheetNotFound {
                    name: name.to_string(),
                }),
            None => names
                .into_iter()
                .next()
                .ok_or_else(|| CoreError::SheetNotFound {
                    name: "<first sheet>".to_string(),
                }),
        }
    }

    fn read_sheet(&mut self, sheet: &str) -> Result<SheetData> {
        let values = self.sheets.worksheet_range(sheet)?;
        // Some formats carry no formula records; treat them as formula-free.
        let formulas = match self.sheets.worksheet_formula(sheet) {
            Ok(formulas) => Some(formulas),
            Err(e) => {
                debug!("no formulas for sheet '{}': {}", sheet, e);
                None
            }
        };
        Ok(SheetData { values, formulas })
    }

    /// Load the table described by `layout`.
    pub fn load_table(&mut self, layout: &TableLayout) -> Result<Table> {
        let sheet = self.resolve_sheet(layout.sheet.as_deref())?;
        let data = self.read_sheet(&sheet)?;

        let range = match layout.range {
            Some(range) => range,
            None => data
                .used_range()
                .ok_or_else(|| CoreError::EmptySheet {
                    name: sheet.clone(),
                })?,
        };

        let (names, body) = match layout.headers {
            HeaderMode::Letters => {
                let names = range
                    .cols()
                    .map(|col| (col, CellRef::col_to_letters(col)))
                    .collect();
                (names, Some(range))
            }
            HeaderMode::FirstRow => {
                let header_row = range.start.row;
                let names = range
                    .cols()
                    .map(|col| {
                        let name = data.raw(header_row, col).to_string();
                        let name = name.trim();
                        if name.is_empty() {
                            (col, CellRef::col_to_letters(col))
                        } else {
                            (col, name.to_string())
                        }
                    })
                    .collect();
                (names, range.without_first_row())
            }
        };

        let columns = build_columns(names, layout);

        let mut rows = Vec::new();
        if let Some(body) = body {
            for row in body.rows() {
                let mut cells = Vec::with_capacity(columns.len());
                if layout.row_numbers {
                    cells.push(CellValue::Number((row + 1) as f64));
                }
                cells.extend(body.cols().map(|col| data.display(row, col)));
                rows.push(Row {
                    source_row: row + 1,
                    cells,
                });
            }
        }

        info!(
            "loaded {} rows x {} columns from {} '{}'!{}",
            rows.len(),
            columns.len(),
            self.path.display(),
            sheet,
            range
        );
        Ok(Table::new(columns, rows))
    }

    /// Read the city list: one column from `first_row` down, trimmed and
    /// de-duplicated in order.
    pub fn read_cities(&mut self, layout: &CityListLayout) -> Result<Vec<String>> {
        let sheet = self.resolve_sheet(Some(&layout.sheet))?;
        let data = self.read_sheet(&sheet)?;

        let mut names = Vec::new();
        if let Some(range) = data.used_range() {
            let first = layout.first_row.saturating_sub(1);
            for row in first..=range.end.row {
                let value = data.raw(row, layout.column);
                if !value.is_empty() {
                    names.push(value.to_string());
                }
            }
        }

        let cities = dedupe_preserving_order(names);
        if cities.is_empty() {
            return Err(CoreError::NoCities {
                sheet,
                column: CellRef::col_to_letters(layout.column),
                first_row: layout.first_row,
            });
        }
        debug!("read {} cities", cities.len());
        Ok(cities)
    }

    /// Read the choice lists. Venue types run down their column until the
    /// first blank cell; format options are the sorted union of the format
    /// list columns with blanks skipped.
    pub fn read_options(&mut self, layout: &OptionsLayout) -> Result<InputOptions> {
        let sheet = self.resolve_sheet(Some(&layout.sheet))?;
        let data = self.read_sheet(&sheet)?;
        let first = layout.first_row.saturating_sub(1);
        let last = data.used_range().map(|r| r.end.row);

        let mut venue_types = Vec::new();
        let mut formats = Vec::new();
        if let Some(last) = last {
            for row in first..=last {
                let value = data.raw(row, layout.venue_column).to_string();
                let value = value.trim();
                if value.is_empty() {
                    break;
                }
                venue_types.push(value.to_string());
            }
            for &col in &layout.format_lists {
                for row in first..=last {
                    let value = data.raw(row, col).to_string();
                    let value = value.trim();
                    if !value.is_empty() {
                        formats.push(value.to_string());
                    }
                }
            }
        }
        formats.sort();
        formats.dedup();

        debug!(
            "read {} venue types and {} formats from '{}'",
            venue_types.len(),
            formats.len(),
            sheet
        );
        Ok(InputOptions {
            venue_types,
            formats,
            format_columns: layout.format_columns.clone(),
        })
    }
}

/// Column names must be unique for name lookups; a repeated name gets its
/// column letter appended. Roles follow the name as written in the sheet.
fn build_columns(names: Vec<(u32, String)>, layout: &TableLayout) -> Vec<Column> {
    for wanted in &layout.editable {
        if !names.iter().any(|(_, n)| n == wanted) {
            warn!("editable column '{}' not found in table", wanted);
        }
    }

    let mut columns = Vec::with_capacity(names.len() + 1);
    if layout.row_numbers {
        columns.push(Column::new(ROW_COLUMN, ColumnRole::RowNumber));
    }
    for (col, name) in names {
        let role = if layout.editable.iter().any(|e| *e == name) {
            ColumnRole::Input
        } else {
            ColumnRole::Output
        };
        let display = if columns.iter().any(|c: &Column| c.name == name) {
            let unique = format!("{} ({})", name, CellRef::col_to_letters(col));
            warn!("duplicate column name '{}' renamed to '{}'", name, unique);
            unique
        } else {
            name
        };
        columns.push(Column::new(display, role));
    }
    columns
}
