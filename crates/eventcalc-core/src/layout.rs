//! Where the table and the city list live inside the workbook.

use crate::cell_ref::{CellRange, CellRef};

/// Default workbook, looked up relative to the working directory.
pub const DEFAULT_SOURCE: &str = "Калькулятор_оценки_мероприятий_по_городам.xlsx";

pub const TEMPLATE_SHEET: &str = "TEMPLATE";
pub const TEMPLATE_RANGE: &str = "C27:O134";
pub const TEMPLATE_INPUT_COLUMNS: [&str; 6] = ["D", "E", "F", "G", "H", "I"];

pub const CITIES_SHEET: &str = "ЦА по городам";

/// Reference lists sheet: venue types in column W, format lists in B..Q.
pub const LISTS_SHEET: &str = "Списки";
pub const DEFAULT_VENUE_TYPE: &str = "Площадка";
pub const LISTS_VENUE_COLUMN: &str = "W";
pub const LISTS_FORMAT_COLUMNS: [&str; 14] = [
    "B", "C", "D", "E", "F", "H", "I", "K", "L", "M", "N", "O", "P", "Q",
];

/// How column names are derived.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum HeaderMode {
    /// Names are column letters; every row of the range is data.
    #[default]
    Letters,
    /// The first row of the range holds the names.
    FirstRow,
}

impl HeaderMode {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "letters" => Some(HeaderMode::Letters),
            "first-row" | "first_row" | "header" => Some(HeaderMode::FirstRow),
            _ => None,
        }
    }
}

/// Table selection inside a workbook.
#[derive(Clone, Debug, PartialEq)]
pub struct TableLayout {
    /// Sheet name; the first sheet when `None`.
    pub sheet: Option<String>,
    /// Display range; the sheet's used range when `None`.
    pub range: Option<CellRange>,
    pub headers: HeaderMode,
    /// Prepend the `ROW` column with source row numbers.
    pub row_numbers: bool,
    /// Names of the input columns.
    pub editable: Vec<String>,
}

impl TableLayout {
    /// The calculator block on the `TEMPLATE` sheet.
    pub fn calculator_template() -> Self {
        TableLayout {
            sheet: Some(TEMPLATE_SHEET.to_string()),
            range: TEMPLATE_RANGE.parse().ok(),
            headers: HeaderMode::Letters,
            row_numbers: true,
            editable: TEMPLATE_INPUT_COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// The used range of the first sheet, with its first row as header.
    pub fn first_sheet_with_header() -> Self {
        TableLayout {
            sheet: None,
            range: None,
            headers: HeaderMode::FirstRow,
            row_numbers: false,
            editable: Vec::new(),
        }
    }
}

impl Default for TableLayout {
    fn default() -> Self {
        Self::calculator_template()
    }
}

/// A single-column list of city names.
#[derive(Clone, Debug, PartialEq)]
pub struct CityListLayout {
    pub sheet: String,
    /// 0-based column index.
    pub column: u32,
    /// 1-based first row to read.
    pub first_row: u32,
}

impl Default for CityListLayout {
    fn default() -> Self {
        CityListLayout {
            sheet: CITIES_SHEET.to_string(),
            column: 0,
            first_row: 2,
        }
    }
}

/// Choice lists on the reference sheet.
#[derive(Clone, Debug, PartialEq)]
pub struct OptionsLayout {
    pub sheet: String,
    /// 1-based first row of every list.
    pub first_row: u32,
    /// 0-based column of the venue type list.
    pub venue_column: u32,
    /// 0-based columns whose values together form the format choices.
    pub format_lists: Vec<u32>,
    /// Table columns restricted to the format choices, in addition to any
    /// column whose name contains `ФОРМ`.
    pub format_columns: Vec<String>,
}

impl Default for OptionsLayout {
    fn default() -> Self {
        OptionsLayout {
            sheet: LISTS_SHEET.to_string(),
            first_row: 2,
            venue_column: CellRef::col_from_letters(LISTS_VENUE_COLUMN).unwrap_or(22),
            format_lists: LISTS_FORMAT_COLUMNS
                .iter()
                .filter_map(|c| CellRef::col_from_letters(c))
                .collect(),
            format_columns: Vec::new(),
        }
    }
}
