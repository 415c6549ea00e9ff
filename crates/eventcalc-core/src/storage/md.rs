//! Markdown rendering of a table.

use std::io::{self, Write};

use crate::session::Submission;
use crate::table::Table;

/// Write the table as a markdown pipe table.
pub fn write_markdown<W: Write>(w: &mut W, table: &Table) -> io::Result<()> {
    if table.columns().is_empty() {
        writeln!(w, "*Empty table*")?;
        return Ok(());
    }

    write!(w, "|")?;
    for column in table.columns() {
        write!(w, " {} |", escape_markdown(&column.name))?;
    }
    writeln!(w)?;

    write!(w, "|")?;
    for _ in table.columns() {
        write!(w, "---|")?;
    }
    writeln!(w)?;

    for row in table.rows() {
        write!(w, "|")?;
        for value in &row.cells {
            write!(w, " {} |", escape_markdown(&value.to_string()))?;
        }
        writeln!(w)?;
    }
    Ok(())
}

pub fn render_markdown(table: &Table) -> String {
    let mut out = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_markdown(&mut out, table);
    String::from_utf8_lossy(&out).into_owned()
}

/// Write a captured scenario: a short parameter list followed by the inputs.
pub fn write_submission<W: Write>(w: &mut W, submission: &Submission) -> io::Result<()> {
    use crate::params::ParamField;

    writeln!(w, "# {}", escape_markdown(&submission.scenario_name))?;
    writeln!(w)?;
    if let Some(city) = &submission.city {
        writeln!(w, "- City: {}", escape_markdown(city))?;
    }
    if let Some(venue) = &submission.parameters.venue_type {
        writeln!(w, "- Venue type: {}", escape_markdown(venue))?;
    }
    for field in ParamField::ALL {
        writeln!(w, "- {}: {}", field, submission.parameters.display(field))?;
    }
    writeln!(w)?;
    write_markdown(w, &submission.inputs)
}

/// Escape special markdown characters in cell content
fn escape_markdown(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ").replace('\r', "")
}
