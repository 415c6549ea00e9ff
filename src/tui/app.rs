//! Application state and logic.
//!
//! [`App`] wraps the UI-agnostic [`Session`] with everything the terminal
//! view needs: cursor and viewport, edit/command buffers, status line and
//! modal state. Like Vim, the app is modal: Normal for navigation, Edit for
//! the current cell, Command for `:` commands.

use eventcalc_core::options::find_option;
use eventcalc_core::{ColumnRole, ParamField, Session, Submission};

use super::clipboard::ClipboardProvider;
use crate::config::Config;

const MIN_COLUMN_WIDTH: usize = 4;
const MAX_COLUMN_WIDTH: usize = 28;

/// Modal editing state for the application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Navigate the grid, execute single-key commands.
    Normal,
    /// Edit the contents of the current cell.
    Edit,
    /// Enter ex-style commands (`:calc`, `:q`, etc.).
    Command,
}

/// Main application state container.
pub struct App {
    pub session: Session,
    /// Where the table came from, used by `:reload`
    pub config: Config,
    /// Current cursor position (column index into the table)
    pub cursor_col: usize,
    /// Current cursor position (row index into the table)
    pub cursor_row: usize,
    /// Viewport offset (column)
    pub viewport_col: usize,
    /// Viewport offset (row)
    pub viewport_row: usize,
    /// Number of visible columns
    pub visible_cols: usize,
    /// Number of visible rows
    pub visible_rows: usize,
    pub mode: Mode,
    /// Edit buffer for cell editing
    pub edit_buffer: String,
    /// Cursor position within edit buffer (byte offset)
    pub edit_cursor: usize,
    /// Buffer contents when editing started; committing them unchanged is a no-op
    pub edit_original: String,
    /// Command buffer for command mode
    pub command_buffer: String,
    /// Cursor position within command buffer (byte offset)
    pub command_cursor: usize,
    /// Status message to display
    pub status_message: String,
    /// Set after the first quit request while edits exist
    pub confirm_quit: bool,
    pub help_modal: bool,
    pub help_scroll: usize,
    /// Result of the last `:calc`, shown in a modal while set
    pub calc_modal: Option<Submission>,
    pub calc_scroll: usize,
    /// Display width per table column
    pub column_widths: Vec<usize>,
}

impl App {
    pub fn new(session: Session, config: Config) -> Self {
        let mut app = App {
            session,
            config,
            cursor_col: 0,
            cursor_row: 0,
            viewport_col: 0,
            viewport_row: 0,
            visible_cols: 8,
            visible_rows: 20,
            mode: Mode::Normal,
            edit_buffer: String::new(),
            edit_cursor: 0,
            edit_original: String::new(),
            command_buffer: String::new(),
            command_cursor: 0,
            status_message: String::new(),
            confirm_quit: false,
            help_modal: false,
            help_scroll: 0,
            calc_modal: None,
            calc_scroll: 0,
            column_widths: Vec::new(),
        };
        app.recompute_column_widths();
        app.cursor_col = app.first_input_column().unwrap_or(0);
        app
    }

    pub fn max_rows(&self) -> usize {
        self.session.table().row_count()
    }

    pub fn max_cols(&self) -> usize {
        self.session.table().column_count()
    }

    fn first_input_column(&self) -> Option<usize> {
        self.session.table().input_columns().map(|(idx, _)| idx).next()
    }

    /// Fit each column to its widest value, within fixed bounds.
    pub fn recompute_column_widths(&mut self) {
        let table = self.session.table();
        self.column_widths = table
            .columns()
            .iter()
            .enumerate()
            .map(|(col, column)| {
                let widest = table
                    .rows()
                    .iter()
                    .map(|row| row.cells[col].to_string().chars().count())
                    .max()
                    .unwrap_or(0);
                widest
                    .max(column.name.chars().count())
                    .clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH)
            })
            .collect();
    }

    pub fn get_column_width(&self, col: usize) -> usize {
        self.column_widths
            .get(col)
            .copied()
            .unwrap_or(MIN_COLUMN_WIDTH)
    }

    /// Name of the column under the cursor, `?` when the table has none.
    pub fn current_column_name(&self) -> &str {
        self.session
            .table()
            .column(self.cursor_col)
            .map_or("?", |c| c.name.as_str())
    }

    pub fn current_column_role(&self) -> Option<ColumnRole> {
        self.session.table().column(self.cursor_col).map(|c| c.role)
    }

    /// `D28`-style label for the cursor: column name plus source row.
    pub fn current_cell_label(&self) -> String {
        let row = self
            .session
            .table()
            .rows()
            .get(self.cursor_row)
            .map_or(String::new(), |r| r.source_row.to_string());
        format!("{}{}", self.current_column_name(), row)
    }

    pub fn current_display(&self) -> String {
        self.session
            .table()
            .get(self.cursor_row, self.cursor_col)
            .map(|v| v.to_string())
            .unwrap_or_default()
    }

    /// Move cursor by delta, clamped to the table.
    pub fn move_cursor(&mut self, dx: i32, dy: i32) {
        let max_col = self.max_cols().saturating_sub(1) as i64;
        let max_row = self.max_rows().saturating_sub(1) as i64;
        self.cursor_col = (self.cursor_col as i64 + dx as i64).clamp(0, max_col) as usize;
        self.cursor_row = (self.cursor_row as i64 + dy as i64).clamp(0, max_row) as usize;
        self.update_viewport();
    }

    pub fn goto_first_row(&mut self) {
        self.cursor_row = 0;
        self.update_viewport();
    }

    pub fn goto_last_row(&mut self) {
        self.cursor_row = self.max_rows().saturating_sub(1);
        self.update_viewport();
    }

    pub fn goto_first_col(&mut self) {
        self.cursor_col = 0;
        self.update_viewport();
    }

    pub fn goto_last_col(&mut self) {
        self.cursor_col = self.max_cols().saturating_sub(1);
        self.update_viewport();
    }

    /// Jump to the row loaded from spreadsheet row `source_row`.
    pub fn goto_source_row(&mut self, source_row: u32) -> bool {
        let Some(idx) = self
            .session
            .table()
            .rows()
            .iter()
            .position(|r| r.source_row == source_row)
        else {
            return false;
        };
        self.cursor_row = idx;
        self.update_viewport();
        true
    }

    /// Keep the cursor inside the viewport.
    pub fn update_viewport(&mut self) {
        if self.cursor_col < self.viewport_col {
            self.viewport_col = self.cursor_col;
        } else if self.cursor_col >= self.viewport_col + self.visible_cols.max(1) {
            self.viewport_col = self.cursor_col + 1 - self.visible_cols.max(1);
        }

        if self.cursor_row < self.viewport_row {
            self.viewport_row = self.cursor_row;
        } else if self.cursor_row >= self.viewport_row + self.visible_rows.max(1) {
            self.viewport_row = self.cursor_row + 1 - self.visible_rows.max(1);
        }
    }

    /// Number of columns that fit in `width` starting at the viewport,
    /// with one cell of spacing after each column. At least one.
    pub fn fit_columns(&self, width: usize) -> usize {
        let mut used = 0;
        let mut count = 0;
        for col in self.viewport_col..self.max_cols() {
            let needed = self.get_column_width(col) + 1;
            if count > 0 && used + needed > width {
                break;
            }
            used += needed;
            count += 1;
        }
        count.max(1)
    }

    /// Enter Edit mode on the current cell, if its column takes input.
    pub fn enter_edit_mode(&mut self) {
        if let Err(e) = self.session.check_editable(self.cursor_row, self.cursor_col) {
            self.status_message = format!("Error: {}", e);
            return;
        }
        self.mode = Mode::Edit;
        self.edit_buffer = self
            .session
            .table()
            .get(self.cursor_row, self.cursor_col)
            .map(|v| v.to_input_string())
            .unwrap_or_default();
        self.edit_original = self.edit_buffer.clone();
        self.edit_cursor = self.edit_buffer.len();
        self.status_message = match self.session.choices(self.cursor_col) {
            Some(choices) => format!("Options (Tab to cycle): {}", choices.join(", ")),
            None => String::new(),
        };
    }

    /// Step the edit buffer through the current column's choices.
    pub fn cycle_option(&mut self, delta: i32) {
        let Some(choices) = self.session.choices(self.cursor_col) else {
            self.status_message = format!("No options for column {}", self.current_column_name());
            return;
        };
        let len = choices.len() as i64;
        let next = match find_option(choices, &self.edit_buffer)
            .and_then(|found| choices.iter().position(|c| c == found))
        {
            Some(idx) => (idx as i64 + delta as i64).rem_euclid(len),
            None if delta < 0 => len - 1,
            None => 0,
        };
        self.edit_buffer = choices[next as usize].clone();
        self.edit_cursor = self.edit_buffer.len();
    }

    /// Write the edit buffer to the current cell and move down.
    pub fn commit_edit(&mut self) {
        let input = std::mem::take(&mut self.edit_buffer);
        let original = std::mem::take(&mut self.edit_original);
        self.edit_cursor = 0;
        self.mode = Mode::Normal;
        if input == original {
            self.status_message.clear();
            self.move_cursor(0, 1);
            return;
        }
        match self
            .session
            .set_cell_at(self.cursor_row, self.cursor_col, &input)
        {
            Ok(()) => {
                self.confirm_quit = false;
                self.status_message.clear();
                self.move_cursor(0, 1);
            }
            Err(e) => self.status_message = format!("Error: {}", e),
        }
    }

    pub fn cancel_edit(&mut self) {
        self.mode = Mode::Normal;
        self.edit_buffer.clear();
        self.edit_original.clear();
        self.edit_cursor = 0;
    }

    pub fn enter_command_mode(&mut self) {
        self.mode = Mode::Command;
        self.command_buffer.clear();
        self.command_cursor = 0;
    }

    pub fn cancel_command(&mut self) {
        self.mode = Mode::Normal;
        self.command_buffer.clear();
        self.command_cursor = 0;
    }

    pub fn clear_current_cell(&mut self) {
        match self.session.clear_cell(self.cursor_row, self.cursor_col) {
            Ok(()) => self.status_message.clear(),
            Err(e) => self.status_message = format!("Error: {}", e),
        }
    }

    pub fn undo(&mut self) {
        match self.session.undo() {
            Ok((row, col)) => {
                self.cursor_row = row;
                self.cursor_col = col;
                self.update_viewport();
                self.status_message = "Undone".to_string();
            }
            Err(e) => self.status_message = e.to_string(),
        }
    }

    pub fn redo(&mut self) {
        match self.session.redo() {
            Ok((row, col)) => {
                self.cursor_row = row;
                self.cursor_col = col;
                self.update_viewport();
                self.status_message = "Redone".to_string();
            }
            Err(e) => self.status_message = e.to_string(),
        }
    }

    pub fn next_city(&mut self) {
        self.session.next_city();
        self.report_city();
    }

    pub fn prev_city(&mut self) {
        self.session.prev_city();
        self.report_city();
    }

    fn report_city(&mut self) {
        self.status_message = match self.session.city() {
            Some(city) => format!("City: {}", city),
            None => "No city list loaded".to_string(),
        };
    }

    fn report_venue(&mut self) {
        self.status_message = match &self.session.parameters.venue_type {
            Some(venue) => format!("Venue type: {}", venue),
            None => "No venue types loaded".to_string(),
        };
    }

    pub fn yank<C: ClipboardProvider>(&mut self, clipboard: &mut C) {
        let label = self.current_cell_label();
        if clipboard.set_text(self.current_display()) {
            self.status_message = format!("Copied {}", label);
        } else {
            self.status_message = "Copy failed: clipboard unavailable".to_string();
        }
    }

    /// Capture the scenario and show it. No cells are calculated in v1.
    pub fn calculate(&mut self) {
        self.calc_modal = Some(self.session.calculate());
        self.calc_scroll = 0;
        self.status_message = "Inputs captured. Blue cells will be calculated in a later version."
            .to_string();
    }

    pub fn close_calc_modal(&mut self) {
        self.calc_modal = None;
    }

    pub fn open_help_modal(&mut self) {
        self.help_modal = true;
        self.help_scroll = 0;
    }

    pub fn close_help_modal(&mut self) {
        self.help_modal = false;
    }

    pub fn scroll_help_by(&mut self, delta: i32) {
        self.help_scroll = (self.help_scroll as i64 + delta as i64).max(0) as usize;
    }

    pub fn scroll_calc_by(&mut self, delta: i32) {
        self.calc_scroll = (self.calc_scroll as i64 + delta as i64).max(0) as usize;
    }

    /// Re-read the workbook, dropping all edits.
    pub fn reload(&mut self) {
        match self.config.load_workbook() {
            Ok(loaded) => {
                self.session.replace_table(loaded.table, loaded.cities);
                self.session.set_options(loaded.options);
                self.recompute_column_widths();
                self.cursor_row = self.cursor_row.min(self.max_rows().saturating_sub(1));
                self.cursor_col = self.cursor_col.min(self.max_cols().saturating_sub(1));
                self.update_viewport();
                self.confirm_quit = false;
                self.status_message = format!("Reloaded {}", self.config.source.display());
                log::info!("reloaded {}", self.config.source.display());
            }
            Err(e) => {
                log::warn!("reload failed: {}", e);
                self.status_message = format!("Error: reload failed: {}", e);
            }
        }
    }

    pub fn reset(&mut self) {
        self.session.reset();
        self.confirm_quit = false;
        self.status_message = "All edits discarded".to_string();
    }

    /// Returns true when the app may exit. Edits are never written back to
    /// the workbook, so the first request with edits only warns.
    pub fn request_quit(&mut self) -> bool {
        if self.session.is_modified() && !self.confirm_quit {
            self.confirm_quit = true;
            self.status_message =
                "Edits are not saved to the workbook. Press q again (or :q!) to quit.".to_string();
            return false;
        }
        true
    }

    /// Run the command buffer. Returns true if the app should quit.
    pub fn execute_command(&mut self) -> bool {
        let command = std::mem::take(&mut self.command_buffer);
        self.command_cursor = 0;
        self.mode = Mode::Normal;
        self.run_command(command.trim())
    }

    pub fn run_command(&mut self, command: &str) -> bool {
        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };

        match name {
            "" => {}
            "q" | "quit" => return self.request_quit(),
            "q!" | "quit!" => return true,
            "calc" | "calculate" => self.calculate(),
            "reload" => self.reload(),
            "reset" => self.reset(),
            "help" | "h" => self.open_help_modal(),
            "city" if arg.is_empty() => {
                self.status_message = if self.session.cities().is_empty() {
                    "No city list loaded".to_string()
                } else {
                    format!("Cities: {}", self.session.cities().join(", "))
                };
            }
            "city" => match self.session.select_city(arg) {
                Ok(()) => self.report_city(),
                Err(e) => self.status_message = format!("Error: {}", e),
            },
            "venue" if arg.is_empty() => {
                let venues = &self.session.options().venue_types;
                self.status_message = if venues.is_empty() {
                    "No venue types loaded".to_string()
                } else {
                    format!("Venue types: {}", venues.join(", "))
                };
            }
            "venue" => match self.session.set_venue_type(arg) {
                Ok(()) => self.report_venue(),
                Err(e) => self.status_message = format!("Error: {}", e),
            },
            "scenario" if arg.is_empty() => {
                self.status_message = "Usage: :scenario <name>".to_string();
            }
            "scenario" => {
                self.session.set_scenario_name(arg);
                self.status_message = format!("Scenario: {}", self.session.scenario_name);
            }
            "days" => self.set_parameter(ParamField::EventDays, arg),
            "period" => self.set_parameter(ParamField::PlacementDays, arg),
            "visitors" => self.set_parameter(ParamField::PlannedVisitors, arg),
            "goto" | "g" => match arg.parse::<u32>() {
                Ok(row) if self.goto_source_row(row) => self.status_message.clear(),
                Ok(row) => self.status_message = format!("Error: row {} is not in the table", row),
                Err(_) => self.status_message = "Usage: :goto <row>".to_string(),
            },
            _ => self.status_message = format!("Unknown command: {}", command),
        }
        false
    }

    fn set_parameter(&mut self, field: ParamField, text: &str) {
        match self.session.set_parameter(field, text) {
            Ok(()) => {
                self.status_message =
                    format!("{}: {}", field, self.session.parameters.display(field));
            }
            Err(e) => self.status_message = format!("Error: {}", e),
        }
    }
}
