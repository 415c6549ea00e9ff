//! Error types for Eventcalc core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or editing a workbook table
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Source file not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("Cannot read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Sheet not found: '{name}'")]
    SheetNotFound { name: String },

    #[error("Sheet '{name}' is empty")]
    EmptySheet { name: String },

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("No cities found on sheet '{sheet}' (column {column}, from row {first_row})")]
    NoCities {
        sheet: String,
        column: String,
        first_row: u32,
    },

    #[error("City not found: '{0}'")]
    CityNotFound(String),

    #[error("Unknown column: '{0}'")]
    UnknownColumn(String),

    #[error("Column '{column}' is read-only")]
    ReadOnlyColumn { column: String },

    #[error("Row {row} is out of range ({rows} rows)")]
    RowOutOfRange { row: usize, rows: usize },

    #[error("Invalid value for {name}: {message}")]
    InvalidParameter { name: String, message: String },

    #[error("'{value}' is not an option for {name}")]
    NotAnOption { name: String, value: String },

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,
}

pub type Result<T> = std::result::Result<T, CoreError>;
