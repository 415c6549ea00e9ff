//! UI rendering

use eventcalc_core::{ColumnRole, ParamField, Submission};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
};

use super::app::{App, Mode};
use super::help::get_help_text;
use super::keymap::status_hint;

pub(crate) const HEADER_PANEL_HEIGHT: u16 = 5;
pub(crate) const CELL_BAR_HEIGHT: u16 = 3;
pub(crate) const GRID_MIN_HEIGHT: u16 = 6;
pub(crate) const STATUS_BAR_HEIGHT: u16 = 1;
pub(crate) const GRID_COLUMN_SPACING: u16 = 1;

pub(crate) const V1_NOTICE: &str =
    "v1: blue cells are not calculated yet. Calculation arrives in a later version.";

const ROW_NUMBER_BG: Color = Color::Rgb(0xF7, 0xF7, 0xF7);
const INPUT_BG: Color = Color::Rgb(0xE6, 0xE6, 0xE6);
const OUTPUT_BG: Color = Color::Rgb(0xD9, 0xEE, 0xF9);

pub(crate) fn split_main_chunks(area: Rect) -> [Rect; 4] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_PANEL_HEIGHT),
            Constraint::Length(CELL_BAR_HEIGHT),
            Constraint::Min(GRID_MIN_HEIGHT),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2], chunks[3]]
}

/// Map a terminal position inside the grid block to `(col, row)` of the
/// table, or `None` for borders, the header row and column spacing.
pub(crate) fn grid_cell_at(
    app: &App,
    grid_area: Rect,
    mouse_col: u16,
    mouse_row: u16,
) -> Option<(usize, usize)> {
    if grid_area.width < 3 || grid_area.height < 4 {
        return None;
    }

    let inner_x = grid_area.x.saturating_add(1);
    let inner_y = grid_area.y.saturating_add(1);
    let inner_right = inner_x.saturating_add(grid_area.width.saturating_sub(2));
    let inner_bottom = inner_y.saturating_add(grid_area.height.saturating_sub(2));

    if mouse_col < inner_x
        || mouse_col >= inner_right
        || mouse_row < inner_y
        || mouse_row >= inner_bottom
    {
        return None;
    }

    // Header row holds column names, not data cells.
    if mouse_row == inner_y {
        return None;
    }

    let rel_row = mouse_row.saturating_sub(inner_y.saturating_add(1)) as usize;
    if rel_row >= app.visible_rows {
        return None;
    }
    let row = app.viewport_row.saturating_add(rel_row);
    if row >= app.max_rows() {
        return None;
    }

    let mut x = inner_x;
    for offset in 0..app.visible_cols {
        let col = app.viewport_col + offset;
        if col >= app.max_cols() || x >= inner_right {
            break;
        }

        let cell_end = x.saturating_add(app.get_column_width(col) as u16);
        if mouse_col >= x && mouse_col < cell_end {
            return Some((col, row));
        }
        x = cell_end.saturating_add(GRID_COLUMN_SPACING);
        if mouse_col < x {
            return None;
        }
    }

    None
}

/// Draw the application UI
pub fn draw(f: &mut Frame, app: &mut App) {
    let [header_area, cell_area, grid_area, status_area] = split_main_chunks(f.area());

    // Update visible dimensions based on actual size
    let available_width = grid_area.width.saturating_sub(2) as usize;
    let available_height = grid_area.height.saturating_sub(3) as usize; // header + borders
    app.visible_rows = available_height.max(1);
    app.visible_cols = app.fit_columns(available_width);
    app.update_viewport();
    app.visible_cols = app.fit_columns(available_width);

    draw_header_panel(f, app, header_area);
    draw_cell_bar(f, app, cell_area);
    draw_grid(f, app, grid_area);
    draw_status_bar(f, app, status_area);

    if let Some(submission) = &app.calc_modal {
        draw_calc_modal(f, submission, app.calc_scroll);
    }

    if app.help_modal {
        draw_help_modal(f, app);
    }
}

fn draw_header_panel(f: &mut Frame, app: &App, area: Rect) {
    let session = &app.session;
    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().add_modifier(Modifier::BOLD);

    let city = session.city().unwrap_or("(none)");
    let mut params = Vec::new();
    for field in ParamField::ALL {
        if !params.is_empty() {
            params.push(Span::raw("   "));
        }
        params.push(Span::styled(format!("{}: ", field), label));
        params.push(Span::styled(session.parameters.display(field), value));
    }

    let mut scenario = vec![
        Span::styled("Scenario: ", label),
        Span::styled(session.scenario_name.clone(), value),
        Span::raw("   "),
        Span::styled("City: ", label),
        Span::styled(city.to_string(), value),
    ];
    if let Some(venue) = &session.parameters.venue_type {
        scenario.push(Span::raw("   "));
        scenario.push(Span::styled("Venue: ", label));
        scenario.push(Span::styled(venue.clone(), value));
    }

    let lines = vec![
        Line::from(scenario),
        Line::from(params),
        Line::from(Span::styled(
            V1_NOTICE,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Event evaluation calculator ");
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_cell_bar(f: &mut Frame, app: &App, area: Rect) {
    let cell_name = app.current_cell_label();

    let content = match app.mode {
        Mode::Edit => {
            // Insert cursor marker at cursor position
            let (before, after) = app.edit_buffer.split_at(app.edit_cursor);
            format!("{}: {}│{}", cell_name, before, after)
        }
        Mode::Command => {
            let (before, after) = app.command_buffer.split_at(app.command_cursor);
            format!(":{}│{}", before, after)
        }
        Mode::Normal => {
            let role = match app.current_column_role() {
                Some(ColumnRole::Input) => "input",
                Some(ColumnRole::Output) => "read-only",
                Some(ColumnRole::RowNumber) => "row",
                None => "",
            };
            let display = app.current_display();
            if display.is_empty() {
                format!("{} [{}]: (empty)", cell_name, role)
            } else {
                format!("{} [{}]: {}", cell_name, role, display)
            }
        }
    };

    let (title, border) = match app.mode {
        Mode::Edit => (" Edit ", Color::Yellow),
        Mode::Command => (" Command ", Color::Cyan),
        Mode::Normal => (" Cell ", Color::White),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(border));
    f.render_widget(Paragraph::new(content).block(block), area);
}

fn role_style(role: ColumnRole) -> Style {
    let bg = match role {
        ColumnRole::RowNumber => ROW_NUMBER_BG,
        ColumnRole::Input => INPUT_BG,
        ColumnRole::Output => OUTPUT_BG,
    };
    Style::default().fg(Color::Black).bg(bg)
}

fn draw_grid(f: &mut Frame, app: &App, area: Rect) {
    let table = app.session.table();
    let cols: Vec<usize> = (app.viewport_col..app.viewport_col + app.visible_cols)
        .take_while(|&col| col < app.max_cols())
        .collect();

    let header_cells = cols.iter().map(|&col| {
        let name = table.column(col).map_or("", |c| c.name.as_str());
        let style = if col == app.cursor_col {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Cell::from(name.to_string()).style(style)
    });
    let header = Row::new(header_cells).height(1);

    let rows = (app.viewport_row..app.viewport_row + app.visible_rows)
        .take_while(|&row| row < app.max_rows())
        .map(|row| {
            let cells = cols.iter().map(|&col| {
                let display = table.get(row, col).map(|v| v.to_string()).unwrap_or_default();
                let role = table.column(col).map_or(ColumnRole::Output, |c| c.role);

                let style = if row == app.cursor_row && col == app.cursor_col {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else if app.session.is_edited(row, col) {
                    role_style(role)
                        .fg(Color::Blue)
                        .add_modifier(Modifier::BOLD | Modifier::ITALIC)
                } else {
                    role_style(role)
                };
                Cell::from(display).style(style)
            });
            Row::new(cells.collect::<Vec<_>>())
        })
        .collect::<Vec<_>>();

    let widths = cols
        .iter()
        .map(|&col| Constraint::Length(app.get_column_width(col) as u16));

    let title = if app.session.is_modified() {
        format!(" {} [+] ", app.config.source.display())
    } else {
        format!(" {} ", app.config.source.display())
    };

    let grid = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .column_spacing(GRID_COLUMN_SPACING);

    f.render_widget(grid, area);

    if table.row_count() == 0 {
        let inner = area.inner(ratatui::layout::Margin::new(1, 2));
        f.render_widget(
            Paragraph::new("No data rows").style(Style::default().fg(Color::DarkGray)),
            inner,
        );
    }
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let status = if !app.status_message.is_empty() {
        app.status_message.clone()
    } else {
        let edits = app.session.edits().len();
        format!(
            "{} rows  |  {} edited  |  {}",
            app.max_rows(),
            edits,
            status_hint()
        )
    };

    let style = if app.status_message.starts_with("Error") {
        Style::default().fg(Color::Red)
    } else if !app.status_message.is_empty() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    f.render_widget(Paragraph::new(Line::from(Span::styled(status, style))), area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn modal_block(title: &str, border: Color) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(border))
        .style(Style::default().fg(Color::White).bg(Color::Black))
}

pub(crate) fn calc_modal_lines(submission: &Submission) -> Vec<String> {
    let mut lines = vec![
        V1_NOTICE.to_string(),
        String::new(),
        format!("Scenario: {}", submission.scenario_name),
        format!(
            "City: {}",
            submission.city.as_deref().unwrap_or("(none)")
        ),
    ];
    if let Some(venue) = &submission.parameters.venue_type {
        lines.push(format!("Venue type: {}", venue));
    }
    for field in ParamField::ALL {
        lines.push(format!(
            "{}: {}",
            field,
            submission.parameters.display(field)
        ));
    }
    lines.push(String::new());

    let inputs = &submission.inputs;
    lines.push(
        inputs
            .columns()
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(" | "),
    );
    for row in inputs.rows() {
        lines.push(
            row.cells
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(" | "),
        );
    }
    lines
}

fn draw_calc_modal(f: &mut Frame, submission: &Submission, scroll: usize) {
    let area = centered_rect(80, 80, f.area());
    let lines: Vec<Line> = calc_modal_lines(submission)
        .into_iter()
        .enumerate()
        .map(|(idx, text)| {
            let style = if idx == 0 {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(Span::styled(text, style))
        })
        .collect();

    let paragraph = Paragraph::new(lines)
        .block(modal_block(" Calculate (Esc to close) ", Color::Cyan))
        .scroll((scroll.min(u16::MAX as usize) as u16, 0));

    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}

fn draw_help_modal(f: &mut Frame, app: &App) {
    let area = centered_rect(80, 85, f.area());

    let lines: Vec<Line> = get_help_text()
        .into_iter()
        .map(|text| {
            let style = if text.starts_with("  ") || text.is_empty() {
                Style::default().fg(Color::White)
            } else {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            };
            Line::from(Span::styled(text, style))
        })
        .collect();

    let paragraph = Paragraph::new(lines)
        .block(modal_block(" Help (Esc to close) ", Color::Green))
        .wrap(Wrap { trim: false })
        .scroll((app.help_scroll.min(u16::MAX as usize) as u16, 0));

    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::tests::sample_app;
    use ratatui::{Terminal, backend::TestBackend};

    fn render(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_draw_shows_header_panel_and_columns() {
        let mut app = sample_app();
        let screen = render(&mut app);
        assert!(screen.contains("Event evaluation calculator"));
        assert!(screen.contains("Scenario: Scenario 1"));
        assert!(screen.contains("City: Москва"));
        assert!(screen.contains("v1: blue cells are not calculated yet"));
        assert!(screen.contains("ROW"));
        assert!(screen.contains("Channel 27"));
        assert!(screen.contains("D27 [input]"));
    }

    #[test]
    fn test_venue_shown_in_header_and_calc() {
        let mut app = crate::tui::app::tests::format_app();
        let screen = render(&mut app);
        assert!(screen.contains("Venue: Площадка"));
        app.calculate();
        let lines = calc_modal_lines(app.calc_modal.as_ref().unwrap());
        assert!(lines.contains(&"Venue type: Площадка".to_string()));
    }

    #[test]
    fn test_draw_sets_visible_rows() {
        let mut app = sample_app();
        render(&mut app);
        // 30 - header panel - cell bar - status - borders - header row
        assert_eq!(app.visible_rows, 30 - 5 - 3 - 1 - 3);
    }

    #[test]
    fn test_calc_modal_lists_inputs() {
        let mut app = sample_app();
        app.session.set_cell(0, "D", "5").unwrap();
        app.calculate();
        let lines = calc_modal_lines(app.calc_modal.as_ref().unwrap());
        assert_eq!(lines[0], V1_NOTICE);
        assert!(lines.contains(&"City: Москва".to_string()));
        assert!(lines.contains(&"ROW | D | E".to_string()));
        assert!(lines.contains(&"27 | 5 | ".to_string()));
        let screen = render(&mut app);
        assert!(screen.contains("Calculate (Esc to close)"));
    }

    #[test]
    fn test_grid_cell_at_maps_body_cells() {
        let mut app = sample_app();
        render(&mut app);
        let [_, _, grid_area, _] = split_main_chunks(Rect::new(0, 0, 100, 30));
        let body_y = grid_area.y + 2;

        assert_eq!(
            grid_cell_at(&app, grid_area, grid_area.x + 1, body_y),
            Some((0, 0))
        );
        // ROW is 4 wide, then one space of spacing, then column C.
        assert_eq!(grid_cell_at(&app, grid_area, grid_area.x + 5, body_y), None);
        assert_eq!(
            grid_cell_at(&app, grid_area, grid_area.x + 6, body_y + 2),
            Some((1, 2))
        );
        // Header row and border
        assert_eq!(grid_cell_at(&app, grid_area, grid_area.x + 6, grid_area.y + 1), None);
        assert_eq!(grid_cell_at(&app, grid_area, grid_area.x, body_y), None);
    }
}
