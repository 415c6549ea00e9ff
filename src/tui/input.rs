use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::prelude::*;
use std::io;

use super::actions::{ApplyResult, apply_action, handle_command_text, handle_edit_text};
use super::app::{App, Mode};
use super::clipboard::ClipboardProvider;
use super::keymap::translate;
use super::ui;

fn handle_mouse_event(app: &mut App, terminal_area: Rect, mouse: MouseEvent) {
    if app.calc_modal.is_some() || app.help_modal || app.mode != Mode::Normal {
        return;
    }

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let [_header, _cell, grid_area, _status] = ui::split_main_chunks(terminal_area);
            if let Some((col, row)) = ui::grid_cell_at(app, grid_area, mouse.column, mouse.row) {
                app.cursor_col = col;
                app.cursor_row = row;
                app.update_viewport();
                app.confirm_quit = false;
            }
        }
        MouseEventKind::ScrollDown => app.move_cursor(0, 3),
        MouseEventKind::ScrollUp => app.move_cursor(0, -3),
        _ => {}
    }
}

/// Keys while a modal is open. Returns true if the key was consumed.
fn handle_modal_key(app: &mut App, key: KeyEvent) -> bool {
    let close = matches!(key.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter);

    if app.calc_modal.is_some() {
        match key.code {
            _ if close => app.close_calc_modal(),
            KeyCode::Down | KeyCode::Char('j') => app.scroll_calc_by(1),
            KeyCode::Up | KeyCode::Char('k') => app.scroll_calc_by(-1),
            KeyCode::PageDown => app.scroll_calc_by(12),
            KeyCode::PageUp => app.scroll_calc_by(-12),
            _ => {}
        }
        return true;
    }

    if app.help_modal {
        match key.code {
            _ if close => app.close_help_modal(),
            KeyCode::Down | KeyCode::Char('j') => app.scroll_help_by(1),
            KeyCode::Up | KeyCode::Char('k') => app.scroll_help_by(-1),
            KeyCode::PageDown => app.scroll_help_by(12),
            KeyCode::PageUp => app.scroll_help_by(-12),
            KeyCode::Home | KeyCode::Char('g') => app.help_scroll = 0,
            _ => {}
        }
        return true;
    }

    false
}

/// Process one key press. Returns `ApplyResult::Quit` to leave the loop.
pub(crate) fn handle_key<C: ClipboardProvider>(
    app: &mut App,
    key: KeyEvent,
    clipboard: &mut C,
) -> ApplyResult {
    if handle_modal_key(app, key) {
        return ApplyResult::Continue;
    }

    if let Some(action) = translate(app.mode, key) {
        return apply_action(app, action, clipboard);
    }

    // Text entry fallbacks (not bound in the keymap).
    match app.mode {
        Mode::Edit => handle_edit_text(app, key),
        Mode::Command => handle_command_text(app, key),
        Mode::Normal => {}
    }
    ApplyResult::Continue
}

pub fn run_app<B: Backend, C: ClipboardProvider>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    clipboard: &mut C,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        match event::read()? {
            Event::Key(key) => {
                // Only process key press events (Windows reports Press + Release)
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if key.code == KeyCode::Char('c')
                    && key.modifiers.contains(KeyModifiers::CONTROL)
                    && app.mode != Mode::Normal
                {
                    app.cancel_edit();
                    app.cancel_command();
                    continue;
                }
                if handle_key(app, key, clipboard) == ApplyResult::Quit {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => {
                let size = terminal.size()?;
                let terminal_area = Rect::new(0, 0, size.width, size.height);
                handle_mouse_event(app, terminal_area, mouse);
            }
            _ => {}
        }
    }
}
