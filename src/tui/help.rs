//! Help text content for the help modal

use super::keymap::status_hint;

pub fn get_help_text() -> Vec<String> {
    let mut lines: Vec<String> = [
        "Navigation:",
        "  h/j/k/l      Move left/down/up/right",
        "  Arrow keys   Move cursor",
        "  Tab          Next column",
        "  PageUp/Down  Scroll by page",
        "  Home/End     First/last column",
        "  Ctrl+Home    First row",
        "  G / Ctrl+End Last row",
        "  g            Go to a sheet row (:goto)",
        "  Mouse click  Select cell",
        "",
        "Editing (grey input columns only):",
        "  i / Enter    Edit cell",
        "  Enter        Commit edit and move down",
        "  Tab/S-Tab    Cycle format options while editing",
        "  x / Delete   Clear cell",
        "  Esc          Cancel edit",
        "  u            Undo",
        "  Ctrl+r       Redo",
        "",
        "Scenario:",
        "  ] / [        Next/previous city",
        "  C            Calculate (preview inputs)",
        "  y            Copy cell to clipboard",
        "",
        "Commands:",
        "  :calc              Preview the inputs that would be calculated",
        "  :city <name>       Select a city (no name lists them)",
        "  :venue <name>      Select a venue type (no name lists them)",
        "  :scenario <name>   Rename the scenario",
        "  :days <n>          Event duration in days",
        "  :period <n>        Placement period in days",
        "  :visitors <n>      Planned number of visitors",
        "  :goto <row>        Jump to a sheet row number",
        "  :reset             Discard all edits",
        "  :reload            Re-read the workbook (discards edits)",
        "  :q  :q!            Quit / quit without asking",
        "",
        "Edits stay in memory; the workbook is never written.",
        "Blue cells are calculated in a later version.",
    ]
    .into_iter()
    .map(str::to_string)
    .collect();
    lines.push(String::new());
    lines.push(status_hint().to_string());
    lines
}
