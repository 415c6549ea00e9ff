//! Choice lists read from the reference sheet: venue types for the
//! scenario form and the allowed values of format columns.

use crate::cities::normalize_label;
use crate::layout::DEFAULT_VENUE_TYPE;

/// Marker that makes a table column a format column.
pub const FORMAT_MARKER: &str = "ФОРМ";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputOptions {
    /// Venue types in sheet order.
    pub venue_types: Vec<String>,
    /// Union of the format lists, sorted, without duplicates.
    pub formats: Vec<String>,
    /// Columns configured as format columns by name.
    pub format_columns: Vec<String>,
}

impl InputOptions {
    pub fn is_empty(&self) -> bool {
        self.venue_types.is_empty() && self.formats.is_empty()
    }

    /// Whether values of column `name` must come from [`Self::formats`].
    pub fn is_format_column(&self, name: &str) -> bool {
        self.format_columns.iter().any(|c| c == name)
            || name.to_uppercase().contains(FORMAT_MARKER)
    }

    /// `Площадка` when listed, otherwise the first venue type.
    pub fn default_venue(&self) -> Option<&str> {
        self.venue_types
            .iter()
            .find(|v| v.as_str() == DEFAULT_VENUE_TYPE)
            .or_else(|| self.venue_types.first())
            .map(String::as_str)
    }
}

/// Find `wanted` among `options`, ignoring case and spacing.
/// Returns the option as listed.
pub fn find_option<'a>(options: &'a [String], wanted: &str) -> Option<&'a str> {
    let wanted = normalize_label(wanted);
    options
        .iter()
        .find(|o| normalize_label(o) == wanted)
        .map(String::as_str)
}
