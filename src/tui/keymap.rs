//! Key bindings: maps key events to [`Action`]s per [`Mode`].

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::Mode;

/// An operation bound to a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Cancel current operation and return to Normal mode.
    Cancel,
    /// Enter Edit mode for the current cell.
    EnterEdit,
    /// Commit the current edit and return to Normal mode.
    CommitEdit,
    /// Enter Command mode (`:` prompt).
    EnterCommand,
    /// Execute the command in the command buffer.
    ExecuteCommand,
    /// Copy the current cell to the system clipboard.
    Yank,
    Undo,
    Redo,
    /// Clear the current cell.
    ClearCell,
    NextCity,
    PrevCity,
    /// Show the input preview (same as `:calc`).
    Calculate,
    Help,
    /// Quit, asking once if there are edits.
    Quit,

    /// Move cursor by (dx, dy).
    Move(i32, i32),
    /// Page up (-1) or down (+1).
    Page(i32),
    /// Jump to first column.
    HomeCol,
    /// Jump to last column.
    EndCol,
    GotoFirst,
    GotoLast,
    /// Open the `:goto` prompt.
    OpenGotoPrompt,
    /// Replace the edit buffer with the next (+1) or previous (-1) choice.
    CycleOption(i32),
}

pub fn translate(mode: Mode, key: KeyEvent) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match mode {
        Mode::Normal => match key.code {
            KeyCode::Char('u') => Some(Action::Undo),
            KeyCode::Char('r') if ctrl => Some(Action::Redo),
            KeyCode::Char('c') if ctrl => Some(Action::Quit),

            KeyCode::Up | KeyCode::Char('k') => Some(Action::Move(0, -1)),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::Move(0, 1)),
            KeyCode::Left | KeyCode::Char('h') => Some(Action::Move(-1, 0)),
            KeyCode::Right | KeyCode::Char('l') => Some(Action::Move(1, 0)),
            KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => {
                Some(Action::Move(-1, 0))
            }
            KeyCode::Tab => Some(Action::Move(1, 0)),
            KeyCode::BackTab => Some(Action::Move(-1, 0)),

            KeyCode::PageUp => Some(Action::Page(-1)),
            KeyCode::PageDown => Some(Action::Page(1)),
            KeyCode::Home if ctrl => Some(Action::GotoFirst),
            KeyCode::End if ctrl => Some(Action::GotoLast),
            KeyCode::Home | KeyCode::Char('0') => Some(Action::HomeCol),
            KeyCode::End | KeyCode::Char('$') => Some(Action::EndCol),
            KeyCode::Char('G') => Some(Action::GotoLast),
            KeyCode::Char('g') => Some(Action::OpenGotoPrompt),

            KeyCode::Enter | KeyCode::Char('i') | KeyCode::Char('a') => Some(Action::EnterEdit),
            KeyCode::Char('x') | KeyCode::Delete => Some(Action::ClearCell),
            KeyCode::Char('y') => Some(Action::Yank),
            KeyCode::Char(']') => Some(Action::NextCity),
            KeyCode::Char('[') => Some(Action::PrevCity),
            KeyCode::Char('C') => Some(Action::Calculate),
            KeyCode::Char(':') => Some(Action::EnterCommand),
            KeyCode::Char('?') => Some(Action::Help),
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        },

        Mode::Edit => match key.code {
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Enter => Some(Action::CommitEdit),
            KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => {
                Some(Action::CycleOption(-1))
            }
            KeyCode::Tab => Some(Action::CycleOption(1)),
            KeyCode::BackTab => Some(Action::CycleOption(-1)),
            _ => None,
        },

        Mode::Command => match key.code {
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Enter => Some(Action::ExecuteCommand),
            _ => None,
        },
    }
}

pub fn status_hint() -> &'static str {
    "hjkl:move  i:edit  x:clear  u:undo  [/]:city  C:calc  y:copy  ?:help  q:quit"
}
