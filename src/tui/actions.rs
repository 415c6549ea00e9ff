use crossterm::event::{self, KeyCode, KeyModifiers};

use super::app::{App, Mode};
use super::clipboard::ClipboardProvider;
use super::keymap::Action;

/// Handle text editing operations on a buffer with UTF-8 aware cursor movement.
fn handle_text_input(buffer: &mut String, cursor: &mut usize, key: event::KeyEvent) {
    match key.code {
        KeyCode::Left => {
            if *cursor > 0 {
                let mut new_pos = *cursor - 1;
                while new_pos > 0 && !buffer.is_char_boundary(new_pos) {
                    new_pos -= 1;
                }
                *cursor = new_pos;
            }
        }
        KeyCode::Right => {
            if *cursor < buffer.len() {
                let mut new_pos = *cursor + 1;
                while new_pos < buffer.len() && !buffer.is_char_boundary(new_pos) {
                    new_pos += 1;
                }
                *cursor = new_pos;
            }
        }
        KeyCode::Home => *cursor = 0,
        KeyCode::End => *cursor = buffer.len(),
        KeyCode::Backspace => {
            if *cursor > 0 {
                let mut del_start = *cursor - 1;
                while del_start > 0 && !buffer.is_char_boundary(del_start) {
                    del_start -= 1;
                }
                buffer.drain(del_start..*cursor);
                *cursor = del_start;
            }
        }
        KeyCode::Delete => {
            if *cursor < buffer.len() {
                let mut del_end = *cursor + 1;
                while del_end < buffer.len() && !buffer.is_char_boundary(del_end) {
                    del_end += 1;
                }
                buffer.drain(*cursor..del_end);
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            buffer.drain(..*cursor);
            *cursor = 0;
        }
        KeyCode::Char(c) => {
            if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                buffer.insert(*cursor, c);
                *cursor += c.len_utf8();
            }
        }
        _ => {}
    }
}

/// Result of applying an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyResult {
    Continue,
    Quit,
}

/// Apply an action to the application state.
///
/// Returns `ApplyResult::Quit` if the application should exit.
pub fn apply_action<C: ClipboardProvider>(
    app: &mut App,
    action: Action,
    clipboard: &mut C,
) -> ApplyResult {
    if !matches!(
        action,
        Action::Quit | Action::EnterCommand | Action::ExecuteCommand | Action::Cancel
    ) {
        app.confirm_quit = false;
    }

    match action {
        Action::Cancel => match app.mode {
            Mode::Edit => app.cancel_edit(),
            Mode::Command => app.cancel_command(),
            Mode::Normal => {}
        },

        Action::EnterEdit => app.enter_edit_mode(),
        Action::CommitEdit => app.commit_edit(),
        Action::EnterCommand => app.enter_command_mode(),
        Action::ExecuteCommand => {
            if app.execute_command() {
                return ApplyResult::Quit;
            }
        }
        Action::Yank => app.yank(clipboard),
        Action::Undo => app.undo(),
        Action::Redo => app.redo(),
        Action::ClearCell => app.clear_current_cell(),
        Action::NextCity => app.next_city(),
        Action::PrevCity => app.prev_city(),
        Action::Calculate => app.calculate(),
        Action::Help => app.open_help_modal(),
        Action::Quit => {
            if app.request_quit() {
                return ApplyResult::Quit;
            }
        }

        Action::Move(dx, dy) => app.move_cursor(dx, dy),
        Action::Page(dir) => {
            let delta = app.visible_rows as i32 * dir;
            app.move_cursor(0, delta);
        }
        Action::HomeCol => app.goto_first_col(),
        Action::EndCol => app.goto_last_col(),
        Action::GotoFirst => app.goto_first_row(),
        Action::GotoLast => app.goto_last_row(),
        Action::CycleOption(delta) => app.cycle_option(delta),
        Action::OpenGotoPrompt => {
            app.mode = Mode::Command;
            app.command_buffer = "goto ".to_string();
            app.command_cursor = app.command_buffer.len();
        }
    }
    ApplyResult::Continue
}

pub fn handle_edit_text(app: &mut App, key: event::KeyEvent) {
    handle_text_input(&mut app.edit_buffer, &mut app.edit_cursor, key);
}

pub fn handle_command_text(app: &mut App, key: event::KeyEvent) {
    handle_text_input(&mut app.command_buffer, &mut app.command_cursor, key);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::tests::sample_app;
    use crossterm::event::KeyEvent;

    struct NoClipboard;

    impl ClipboardProvider for NoClipboard {
        fn set_text(&mut self, _text: String) -> bool {
            false
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_text_input_is_utf8_aware() {
        let mut buffer = String::new();
        let mut cursor = 0;
        for c in "Сочи".chars() {
            handle_text_input(&mut buffer, &mut cursor, key(KeyCode::Char(c)));
        }
        assert_eq!(cursor, buffer.len());
        handle_text_input(&mut buffer, &mut cursor, key(KeyCode::Left));
        handle_text_input(&mut buffer, &mut cursor, key(KeyCode::Backspace));
        assert_eq!(buffer, "Сои");
        handle_text_input(&mut buffer, &mut cursor, key(KeyCode::Delete));
        assert_eq!(buffer, "Со");
    }

    #[test]
    fn test_ctrl_u_clears_to_start() {
        let mut buffer = "days 12".to_string();
        let mut cursor = 5;
        handle_text_input(
            &mut buffer,
            &mut cursor,
            KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL),
        );
        assert_eq!(buffer, "12");
        assert_eq!(cursor, 0);
    }

    #[test]
    fn test_typed_edit_commits_value() {
        let mut app = sample_app();
        let mut clipboard = NoClipboard;
        apply_action(&mut app, Action::EnterEdit, &mut clipboard);
        for c in "7,5".chars() {
            handle_edit_text(&mut app, key(KeyCode::Char(c)));
        }
        apply_action(&mut app, Action::CommitEdit, &mut clipboard);
        assert_eq!(app.session.table().get(0, 2).unwrap().to_string(), "7.5");
    }

    #[test]
    fn test_cancel_edit_keeps_value() {
        let mut app = sample_app();
        let mut clipboard = NoClipboard;
        apply_action(&mut app, Action::EnterEdit, &mut clipboard);
        handle_edit_text(&mut app, key(KeyCode::Char('9')));
        apply_action(&mut app, Action::Cancel, &mut clipboard);
        assert_eq!(app.mode, Mode::Normal);
        assert!(!app.session.is_modified());
    }

    #[test]
    fn test_command_quit_flow() {
        let mut app = sample_app();
        let mut clipboard = NoClipboard;
        apply_action(&mut app, Action::EnterCommand, &mut clipboard);
        for c in "q".chars() {
            handle_command_text(&mut app, key(KeyCode::Char(c)));
        }
        assert_eq!(
            apply_action(&mut app, Action::ExecuteCommand, &mut clipboard),
            ApplyResult::Quit
        );
    }

    #[test]
    fn test_other_action_resets_quit_confirmation() {
        let mut app = sample_app();
        let mut clipboard = NoClipboard;
        app.session.set_cell(0, "D", "1").unwrap();
        assert_eq!(
            apply_action(&mut app, Action::Quit, &mut clipboard),
            ApplyResult::Continue
        );
        apply_action(&mut app, Action::Move(0, 1), &mut clipboard);
        assert_eq!(
            apply_action(&mut app, Action::Quit, &mut clipboard),
            ApplyResult::Continue
        );
        assert_eq!(
            apply_action(&mut app, Action::Quit, &mut clipboard),
            ApplyResult::Quit
        );
    }

    #[test]
    fn test_yank_without_clipboard_reports() {
        let mut app = sample_app();
        apply_action(&mut app, Action::Yank, &mut NoClipboard);
        assert!(app.status_message.contains("clipboard unavailable"));
    }

    #[test]
    fn test_goto_prompt_prefills_command() {
        let mut app = sample_app();
        apply_action(&mut app, Action::OpenGotoPrompt, &mut NoClipboard);
        assert_eq!(app.mode, Mode::Command);
        assert_eq!(app.command_buffer, "goto ");
    }
}
