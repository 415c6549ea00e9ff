//! eventcalc-core - UI-agnostic workbook table model and edit session.

pub mod cell_ref;
pub mod cities;
pub mod error;
pub mod layout;
pub mod options;
pub mod params;
pub mod session;
pub mod storage;
pub mod table;
pub mod value;
pub mod workbook;

pub use cell_ref::{CellRange, CellRef};
pub use error::{CoreError, Result};
pub use layout::{CityListLayout, HeaderMode, OptionsLayout, TableLayout};
pub use options::InputOptions;
pub use params::{ParamField, Parameters};
pub use session::{Session, Submission, UndoAction};
pub use table::{Column, ColumnRole, Row, Table};
pub use value::CellValue;
pub use workbook::Workbook;

#[cfg(test)]
pub(crate) mod test_support;
