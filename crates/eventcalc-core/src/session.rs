//! Edit session: the loaded table, the user's edits and the scenario form.

use log::{debug, info};

use crate::cities::find_city;
use crate::error::{CoreError, Result};
use crate::options::{InputOptions, find_option};
use crate::params::{DEFAULT_SCENARIO_NAME, ParamField, Parameters};
use crate::table::Table;
use crate::value::CellValue;

/// Maximum number of undo entries to keep
pub(crate) const MAX_UNDO_STACK: usize = 100;

/// Represents an undoable edit of a single cell
#[derive(Clone, Debug, PartialEq)]
pub struct UndoAction {
    pub row: usize,
    pub col: usize,
    pub old_value: CellValue,
    pub new_value: CellValue,
}

/// What pressing "calculate" captures. v1 performs no calculation, so the
/// output cells are not part of it.
#[derive(Clone, Debug, PartialEq)]
pub struct Submission {
    pub scenario_name: String,
    pub city: Option<String>,
    pub parameters: Parameters,
    /// `ROW` plus the input columns of the edited table.
    pub inputs: Table,
}

/// UI-agnostic editing state.
pub struct Session {
    /// Table as loaded from the workbook
    pristine: Table,
    /// Table with the user's edits applied
    table: Table,
    cities: Vec<String>,
    city: Option<usize>,
    options: InputOptions,
    pub scenario_name: String,
    pub parameters: Parameters,
    undo_stack: Vec<UndoAction>,
    redo_stack: Vec<UndoAction>,
}

impl Session {
    /// Start a session. The first city, if any, is selected.
    pub fn new(table: Table, cities: Vec<String>) -> Self {
        let city = if cities.is_empty() { None } else { Some(0) };
        Session {
            pristine: table.clone(),
            table,
            cities,
            city,
            options: InputOptions::default(),
            scenario_name: DEFAULT_SCENARIO_NAME.to_string(),
            parameters: Parameters::default(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn pristine(&self) -> &Table {
        &self.pristine
    }

    pub fn is_modified(&self) -> bool {
        self.table != self.pristine
    }

    /// Cells that differ from the loaded table.
    pub fn edits(&self) -> Vec<(usize, usize)> {
        self.pristine.diff(&self.table)
    }

    pub fn is_edited(&self, row: usize, col: usize) -> bool {
        self.table.get(row, col) != self.pristine.get(row, col)
    }

    /// Set a cell addressed by column name from user-typed text.
    pub fn set_cell(&mut self, row: usize, column: &str, input: &str) -> Result<()> {
        let col = self
            .table
            .column_index(column)
            .ok_or_else(|| CoreError::UnknownColumn(column.to_string()))?;
        self.set_cell_at(row, col, input)
    }

    /// Set a cell from user-typed text. Only input columns accept edits,
    /// and format columns only accept one of the format options.
    pub fn set_cell_at(&mut self, row: usize, col: usize, input: &str) -> Result<()> {
        self.check_editable(row, col)?;
        let value = match self.choices(col) {
            Some(choices) if !input.trim().is_empty() => {
                let option = find_option(choices, input).ok_or_else(|| CoreError::NotAnOption {
                    name: self.table.column(col).map_or_else(String::new, |c| c.name.clone()),
                    value: input.trim().to_string(),
                })?;
                CellValue::Text(option.to_string())
            }
            _ => CellValue::parse_input(input),
        };
        let Some(cell) = self.table.cell_mut(row, col) else {
            return Err(CoreError::RowOutOfRange {
                row,
                rows: self.pristine.row_count(),
            });
        };
        if *cell == value {
            return Ok(());
        }
        let old_value = std::mem::replace(cell, value.clone());
        debug!("set ({}, {}) {:?} -> {:?}", row, col, old_value, value);
        self.push_undo(UndoAction {
            row,
            col,
            old_value,
            new_value: value,
        });
        Ok(())
    }

    pub fn clear_cell(&mut self, row: usize, col: usize) -> Result<()> {
        self.set_cell_at(row, col, "")
    }

    /// Whether `(row, col)` may be edited; the error says why not.
    pub fn check_editable(&self, row: usize, col: usize) -> Result<()> {
        let column = self
            .table
            .column(col)
            .ok_or_else(|| CoreError::UnknownColumn(format!("#{col}")))?;
        if row >= self.table.row_count() {
            return Err(CoreError::RowOutOfRange {
                row,
                rows: self.table.row_count(),
            });
        }
        if !column.is_editable() {
            return Err(CoreError::ReadOnlyColumn {
                column: column.name.clone(),
            });
        }
        Ok(())
    }

    /// Allowed values for an input column, when it is a format column and
    /// format options are loaded.
    pub fn choices(&self, col: usize) -> Option<&[String]> {
        let column = self.table.column(col)?;
        if column.is_editable()
            && !self.options.formats.is_empty()
            && self.options.is_format_column(&column.name)
        {
            Some(&self.options.formats)
        } else {
            None
        }
    }

    fn push_undo(&mut self, action: UndoAction) {
        self.undo_stack.push(action);
        self.redo_stack.clear();
        if self.undo_stack.len() > MAX_UNDO_STACK {
            self.undo_stack.remove(0);
        }
    }

    fn write(&mut self, row: usize, col: usize, value: CellValue) {
        if let Some(cell) = self.table.cell_mut(row, col) {
            *cell = value;
        }
    }

    /// Undo the last edit. Returns the position it touched.
    pub fn undo(&mut self) -> Result<(usize, usize)> {
        let action = self.undo_stack.pop().ok_or(CoreError::NothingToUndo)?;
        self.write(action.row, action.col, action.old_value.clone());
        let pos = (action.row, action.col);
        self.redo_stack.push(action);
        Ok(pos)
    }

    /// Redo the last undone edit. Returns the position it touched.
    pub fn redo(&mut self) -> Result<(usize, usize)> {
        let action = self.redo_stack.pop().ok_or(CoreError::NothingToRedo)?;
        self.write(action.row, action.col, action.new_value.clone());
        let pos = (action.row, action.col);
        self.undo_stack.push(action);
        Ok(pos)
    }

    /// Drop every edit.
    pub fn reset(&mut self) {
        self.table = self.pristine.clone();
        self.undo_stack.clear();
        self.redo_stack.clear();
        info!("edits discarded");
    }

    /// Install a freshly loaded table, discarding edits and history.
    /// The selected city is kept when it is still in `cities`.
    pub fn replace_table(&mut self, table: Table, cities: Vec<String>) {
        let selected = self.city().map(str::to_string);
        self.pristine = table.clone();
        self.table = table;
        self.cities = cities;
        self.city = selected
            .and_then(|name| find_city(&self.cities, &name))
            .or(if self.cities.is_empty() { None } else { Some(0) });
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    pub fn city(&self) -> Option<&str> {
        self.city.map(|idx| self.cities[idx].as_str())
    }

    pub fn select_city(&mut self, name: &str) -> Result<()> {
        let idx = find_city(&self.cities, name)
            .ok_or_else(|| CoreError::CityNotFound(name.trim().to_string()))?;
        self.city = Some(idx);
        Ok(())
    }

    pub fn next_city(&mut self) {
        if !self.cities.is_empty() {
            self.city = Some(self.city.map_or(0, |idx| (idx + 1) % self.cities.len()));
        }
    }

    pub fn prev_city(&mut self) {
        if !self.cities.is_empty() {
            let len = self.cities.len();
            self.city = Some(self.city.map_or(0, |idx| (idx + len - 1) % len));
        }
    }

    pub fn options(&self) -> &InputOptions {
        &self.options
    }

    /// Install the choice lists. A venue type that is no longer listed is
    /// replaced by the default one.
    pub fn set_options(&mut self, options: InputOptions) {
        let current = self.parameters.venue_type.take();
        self.parameters.venue_type = current
            .and_then(|v| find_option(&options.venue_types, &v).map(str::to_string))
            .or_else(|| options.default_venue().map(str::to_string));
        debug!(
            "{} venue types, {} formats",
            options.venue_types.len(),
            options.formats.len()
        );
        self.options = options;
    }

    pub fn set_venue_type(&mut self, name: &str) -> Result<()> {
        let venue = find_option(&self.options.venue_types, name).ok_or_else(|| {
            CoreError::NotAnOption {
                name: "venue type".to_string(),
                value: name.trim().to_string(),
            }
        })?;
        self.parameters.venue_type = Some(venue.to_string());
        Ok(())
    }

    pub fn set_scenario_name(&mut self, name: &str) {
        self.scenario_name = name.trim().to_string();
    }

    pub fn set_parameter(&mut self, field: ParamField, text: &str) -> Result<()> {
        self.parameters.set_from_text(field, text)
    }

    /// Capture the scenario. Blue (output) cells are left as they are.
    pub fn calculate(&self) -> Submission {
        let submission = Submission {
            scenario_name: self.scenario_name.clone(),
            city: self.city().map(str::to_string),
            parameters: self.parameters.clone(),
            inputs: self.table.input_preview(),
        };
        info!(
            "captured scenario '{}' ({} edited cells)",
            submission.scenario_name,
            self.edits().len()
        );
        submission
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Column, ColumnRole, ROW_COLUMN, Row};

    fn table() -> Table {
        Table::new(
            vec![
                Column::new(ROW_COLUMN, ColumnRole::RowNumber),
                Column::new("C", ColumnRole::Output),
                Column::new("D", ColumnRole::Input),
                Column::new("J", ColumnRole::Output),
            ],
            (27..30)
                .map(|r| Row {
                    source_row: r,
                    cells: vec![
                        CellValue::Number(r as f64),
                        CellValue::Text(format!("channel {r}")),
                        CellValue::Empty,
                        CellValue::Empty,
                    ],
                })
                .collect(),
        )
    }

    fn session() -> Session {
        Session::new(table(), vec!["Москва".into(), "Казань".into()])
    }

    #[test]
    fn test_edit_changes_only_that_cell() {
        let mut s = session();
        s.set_cell(1, "D", "12").unwrap();
        assert_eq!(s.table().value(1, "D"), Some(&CellValue::Number(12.0)));
        assert_eq!(s.edits(), vec![(1, 2)]);
        assert!(s.is_modified());
        assert!(s.is_edited(1, 2));
        assert!(!s.is_edited(0, 2));
    }

    #[test]
    fn test_non_input_columns_reject_edits() {
        let mut s = session();
        for column in ["C", "J", ROW_COLUMN] {
            let err = s.set_cell(0, column, "x").unwrap_err();
            assert!(matches!(err, CoreError::ReadOnlyColumn { .. }));
        }
        assert_eq!(s.table(), s.pristine());
        assert!(!s.is_modified());
    }

    #[test]
    fn test_bad_addresses() {
        let mut s = session();
        assert!(matches!(
            s.set_cell(0, "Q", "1").unwrap_err(),
            CoreError::UnknownColumn(_)
        ));
        assert!(matches!(
            s.set_cell(3, "D", "1").unwrap_err(),
            CoreError::RowOutOfRange { row: 3, rows: 3 }
        ));
    }

    #[test]
    fn test_same_value_is_noop() {
        let mut s = session();
        s.set_cell(0, "D", "").unwrap();
        assert!(matches!(s.undo().unwrap_err(), CoreError::NothingToUndo));
    }

    #[test]
    fn test_undo_redo() {
        let mut s = session();
        s.set_cell(0, "D", "5").unwrap();
        s.set_cell(0, "D", "Outdoor").unwrap();

        assert_eq!(s.undo().unwrap(), (0, 2));
        assert_eq!(s.table().value(0, "D"), Some(&CellValue::Number(5.0)));
        s.undo().unwrap();
        assert_eq!(s.table(), s.pristine());
        assert!(matches!(s.undo().unwrap_err(), CoreError::NothingToUndo));

        s.redo().unwrap();
        s.redo().unwrap();
        assert_eq!(
            s.table().value(0, "D"),
            Some(&CellValue::Text("Outdoor".into()))
        );
        assert!(matches!(s.redo().unwrap_err(), CoreError::NothingToRedo));
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut s = session();
        s.set_cell(0, "D", "1").unwrap();
        s.undo().unwrap();
        s.set_cell(1, "D", "2").unwrap();
        assert!(matches!(s.redo().unwrap_err(), CoreError::NothingToRedo));
    }

    #[test]
    fn test_undo_stack_is_bounded() {
        let mut s = session();
        for i in 0..(MAX_UNDO_STACK + 5) {
            s.set_cell(0, "D", &i.to_string()).unwrap();
        }
        let mut undone = 0;
        while s.undo().is_ok() {
            undone += 1;
        }
        assert_eq!(undone, MAX_UNDO_STACK);
    }

    #[test]
    fn test_reset_restores_loaded_table() {
        let mut s = session();
        s.set_cell(2, "D", "9").unwrap();
        s.reset();
        assert!(!s.is_modified());
        assert!(s.edits().is_empty());
    }

    #[test]
    fn test_replace_table_keeps_city_and_clears_history() {
        let mut s = session();
        s.select_city("казань").unwrap();
        s.set_cell(0, "D", "1").unwrap();
        s.replace_table(table(), vec!["Сочи".into(), "Казань".into()]);
        assert_eq!(s.city(), Some("Казань"));
        assert!(!s.is_modified());
        assert!(s.undo().is_err());
    }

    #[test]
    fn test_city_cycling() {
        let mut s = session();
        assert_eq!(s.city(), Some("Москва"));
        s.next_city();
        assert_eq!(s.city(), Some("Казань"));
        s.next_city();
        assert_eq!(s.city(), Some("Москва"));
        s.prev_city();
        assert_eq!(s.city(), Some("Казань"));
        assert!(matches!(
            s.select_city("Самара").unwrap_err(),
            CoreError::CityNotFound(_)
        ));
    }

    #[test]
    fn test_no_cities() {
        let mut s = Session::new(table(), Vec::new());
        s.next_city();
        assert_eq!(s.city(), None);
    }

    #[test]
    fn test_calculate_captures_inputs_and_leaves_outputs() {
        let mut s = session();
        s.set_scenario_name("  Summer fest ");
        s.set_parameter(ParamField::EventDays, "2").unwrap();
        s.set_cell(0, "D", "Outdoor").unwrap();
        let before = s.table().clone();

        let submission = s.calculate();
        assert_eq!(submission.scenario_name, "Summer fest");
        assert_eq!(submission.city.as_deref(), Some("Москва"));
        assert_eq!(submission.parameters.event_days, 2);
        let names: Vec<&str> = submission
            .inputs
            .columns()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec![ROW_COLUMN, "D"]);
        assert_eq!(
            submission.inputs.value(0, "D"),
            Some(&CellValue::Text("Outdoor".into()))
        );
        assert_eq!(s.table(), &before);
        assert_eq!(s.table().value(0, "J"), Some(&CellValue::Empty));
    }

    fn format_session() -> Session {
        let table = Table::new(
            vec![
                Column::new(ROW_COLUMN, ColumnRole::RowNumber),
                Column::new("Канал", ColumnRole::Input),
                Column::new("Формат", ColumnRole::Input),
                Column::new("Формат (план)", ColumnRole::Output),
            ],
            vec![Row {
                source_row: 2,
                cells: vec![CellValue::Number(2.0)],
            }],
        );
        let mut s = Session::new(table, Vec::new());
        s.set_options(InputOptions {
            venue_types: vec!["Парк".into(), "Площадка".into()],
            formats: vec!["Баннер 3x6".into(), "Видео 15с".into()],
            format_columns: Vec::new(),
        });
        s
    }

    #[test]
    fn test_format_column_accepts_only_options() {
        let mut s = format_session();
        assert_eq!(s.choices(2).map(<[String]>::len), Some(2));
        assert_eq!(s.choices(1), None);
        assert_eq!(s.choices(3), None);

        let err = s.set_cell(0, "Формат", "Радио").unwrap_err();
        assert!(matches!(err, CoreError::NotAnOption { ref name, .. } if name == "Формат"));
        assert!(!s.is_modified());

        s.set_cell(0, "Формат", "  видео 15С").unwrap();
        assert_eq!(
            s.table().value(0, "Формат"),
            Some(&CellValue::Text("Видео 15с".into()))
        );
        s.set_cell(0, "Формат", "").unwrap();
        assert_eq!(s.table().value(0, "Формат"), Some(&CellValue::Empty));
        s.set_cell(0, "Канал", "Радио").unwrap();
    }

    #[test]
    fn test_venue_type() {
        let mut s = format_session();
        assert_eq!(s.parameters.venue_type.as_deref(), Some("Площадка"));
        s.set_venue_type("парк").unwrap();
        assert_eq!(s.parameters.venue_type.as_deref(), Some("Парк"));
        assert!(matches!(
            s.set_venue_type("Стадион").unwrap_err(),
            CoreError::NotAnOption { .. }
        ));
        assert_eq!(s.parameters.venue_type.as_deref(), Some("Парк"));

        s.set_options(InputOptions {
            venue_types: vec!["Парк".into()],
            ..InputOptions::default()
        });
        assert_eq!(s.parameters.venue_type.as_deref(), Some("Парк"));
        s.set_options(InputOptions::default());
        assert_eq!(s.parameters.venue_type, None);
    }
}
