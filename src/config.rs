//! Configuration: built-in defaults, an optional TOML file, then CLI flags.
//!
//! ```toml
//! source = "Калькулятор_оценки_мероприятий_по_городам.xlsx"
//!
//! [table]
//! sheet = "TEMPLATE"        # "" selects the first sheet
//! range = "C27:O134"        # "" selects the used range
//! headers = "letters"       # or "first-row"
//! row_numbers = true
//! editable = ["D", "E", "F", "G", "H", "I"]
//!
//! [cities]
//! enabled = true
//! sheet = "ЦА по городам"
//! column = "A"
//! first_row = 2
//!
//! [options]
//! enabled = true
//! sheet = "Списки"
//! first_row = 2
//! venue_column = "W"
//! format_lists = ["B", "C", "D", "E", "F", "H", "I", "K", "L", "M", "N", "O", "P", "Q"]
//! format_columns = []       # besides columns whose name contains "ФОРМ"
//! ```

use directories::ProjectDirs;
use eventcalc_core::layout::DEFAULT_SOURCE;
use eventcalc_core::{
    CellRange, CellRef, CityListLayout, CoreError, HeaderMode, InputOptions, OptionsLayout, Table,
    TableLayout, Workbook,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    source: Option<PathBuf>,
    table: TableSection,
    cities: CitySection,
    options: OptionsSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct TableSection {
    sheet: Option<String>,
    range: Option<String>,
    headers: Option<String>,
    row_numbers: Option<bool>,
    editable: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct CitySection {
    enabled: Option<bool>,
    sheet: Option<String>,
    column: Option<String>,
    first_row: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct OptionsSection {
    enabled: Option<bool>,
    sheet: Option<String>,
    first_row: Option<u32>,
    venue_column: Option<String>,
    format_lists: Option<Vec<String>>,
    format_columns: Option<Vec<String>>,
}

/// Everything read from the workbook at (re)load.
#[derive(Debug)]
pub struct Loaded {
    pub table: Table,
    pub cities: Vec<String>,
    pub options: InputOptions,
}

/// Resolved settings.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Workbook path, relative to the working directory unless absolute.
    pub source: PathBuf,
    pub table: TableLayout,
    /// `None` when the city list is disabled.
    pub cities: Option<CityListLayout>,
    /// `None` when the choice lists are disabled.
    pub options: Option<OptionsLayout>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source: PathBuf::from(DEFAULT_SOURCE),
            table: TableLayout::calculator_template(),
            cities: Some(CityListLayout::default()),
            options: Some(OptionsLayout::default()),
        }
    }
}

impl Config {
    /// Default config file location (`<config dir>/eventcalc/config.toml`).
    pub fn default_path() -> Option<PathBuf> {
        let proj = ProjectDirs::from("", "", "eventcalc")?;
        Some(proj.config_dir().join("config.toml"))
    }

    /// Load from `explicit` (which must exist) or from the default location
    /// (which may be absent).
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Config::default()),
            },
        };
        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        log::info!("using config {}", path.display());
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)?;
        let mut config = Config::default();

        if let Some(source) = file.source {
            config.source = source;
        }

        let table = file.table;
        if let Some(sheet) = table.sheet {
            config.table.sheet = non_empty(sheet);
        }
        if let Some(range) = table.range {
            config.table.range = match non_empty(range) {
                Some(range) => Some(parse_range("table.range", &range)?),
                None => None,
            };
        }
        if let Some(headers) = table.headers {
            config.table.headers = parse_headers("table.headers", &headers)?;
        }
        if let Some(row_numbers) = table.row_numbers {
            config.table.row_numbers = row_numbers;
        }
        if let Some(editable) = table.editable {
            config.table.editable = editable;
        }

        let cities = file.cities;
        if cities.enabled == Some(false) {
            config.cities = None;
        } else {
            let mut layout = CityListLayout::default();
            if let Some(sheet) = cities.sheet {
                layout.sheet = sheet;
            }
            if let Some(column) = cities.column {
                layout.column = parse_column("cities.column", &column)?;
            }
            if let Some(first_row) = cities.first_row {
                layout.first_row = parse_first_row("cities.first_row", first_row)?;
            }
            config.cities = Some(layout);
        }

        let options = file.options;
        if options.enabled == Some(false) {
            config.options = None;
        } else {
            let mut layout = OptionsLayout::default();
            if let Some(sheet) = options.sheet {
                layout.sheet = sheet;
            }
            if let Some(first_row) = options.first_row {
                layout.first_row = parse_first_row("options.first_row", first_row)?;
            }
            if let Some(column) = options.venue_column {
                layout.venue_column = parse_column("options.venue_column", &column)?;
            }
            if let Some(lists) = options.format_lists {
                layout.format_lists = lists
                    .iter()
                    .map(|c| parse_column("options.format_lists", c))
                    .collect::<Result<_>>()?;
            }
            if let Some(columns) = options.format_columns {
                layout.format_columns = columns;
            }
            config.options = Some(layout);
        }

        Ok(config)
    }

    /// Read the table and, when enabled, the city list and choice lists.
    /// A workbook without the lists sheet loads with no choices.
    pub fn load_workbook(&self) -> eventcalc_core::Result<Loaded> {
        let mut workbook = Workbook::open(&self.source)?;
        let table = workbook.load_table(&self.table)?;
        let cities = match &self.cities {
            Some(layout) => workbook.read_cities(layout)?,
            None => Vec::new(),
        };
        let options = match &self.options {
            Some(layout) => match workbook.read_options(layout) {
                Ok(options) => options,
                Err(CoreError::SheetNotFound { name }) => {
                    log::warn!("lists sheet '{}' not found, no input choices", name);
                    InputOptions::default()
                }
                Err(e) => return Err(e),
            },
            None => InputOptions::default(),
        };
        Ok(Loaded {
            table,
            cities,
            options,
        })
    }
}

fn parse_column(key: &str, text: &str) -> Result<u32> {
    CellRef::col_from_letters(text).ok_or_else(|| ConfigError::Invalid {
        key: key.to_string(),
        message: format!("expected a column letter, got '{text}'"),
    })
}

fn parse_first_row(key: &str, row: u32) -> Result<u32> {
    if row == 0 {
        return Err(ConfigError::Invalid {
            key: key.to_string(),
            message: "rows start at 1".to_string(),
        });
    }
    Ok(row)
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() { None } else { Some(s) }
}

pub(crate) fn parse_range(key: &str, text: &str) -> Result<CellRange> {
    text.parse().map_err(|e: eventcalc_core::CoreError| ConfigError::Invalid {
        key: key.to_string(),
        message: e.to_string(),
    })
}

pub(crate) fn parse_headers(key: &str, text: &str) -> Result<HeaderMode> {
    HeaderMode::parse(text).ok_or_else(|| ConfigError::Invalid {
        key: key.to_string(),
        message: format!("expected \"letters\" or \"first-row\", got '{text}'"),
    })
}
