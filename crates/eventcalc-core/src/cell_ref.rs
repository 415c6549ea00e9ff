//! Cell reference parsing and formatting.
//!
//! Provides bidirectional conversion between spreadsheet-style references
//! (e.g., "A1", "C27", "AA100") and zero-indexed column/row coordinates, plus
//! rectangular ranges such as "C27:O134".
//!
//! # Examples
//!
//! ```
//! use eventcalc_core::{CellRange, CellRef};
//!
//! let cell: CellRef = "B3".parse().unwrap();
//! assert_eq!(cell.col, 1);
//! assert_eq!(cell.row, 2);
//!
//! let range: CellRange = "C27:O134".parse().unwrap();
//! assert_eq!(range.width(), 13);
//! assert_eq!(range.height(), 108);
//! ```

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::CoreError;

static A1_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\$?(?<letters>[A-Za-z]+)\$?(?<numbers>[0-9]+)$").expect("valid A1 pattern")
});

static LETTERS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]+$").expect("valid column pattern"));

/// A reference to a cell by column and row indices (0-indexed).
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct CellRef {
    pub row: u32,
    pub col: u32,
}

impl CellRef {
    pub fn new(col: u32, row: u32) -> CellRef {
        CellRef { row, col }
    }

    fn parse_a1(name: &str) -> Option<CellRef> {
        let caps = A1_RE.captures(name.trim())?;
        let col = letters_to_col(&caps["letters"])?;
        let row = caps["numbers"].parse::<u32>().ok()?.checked_sub(1)?;
        Some(CellRef::new(col, row))
    }

    /// Convert column index to spreadsheet-style letters (0 -> A, 25 -> Z, 26 -> AA).
    pub fn col_to_letters(col: u32) -> String {
        let mut result = String::new();
        let mut n = col as u64 + 1;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        result
    }

    /// Parse a bare column name such as "D" or "aa" into its 0-based index.
    pub fn col_from_letters(letters: &str) -> Option<u32> {
        let letters = letters.trim();
        if !LETTERS_RE.is_match(letters) {
            return None;
        }
        letters_to_col(letters)
    }
}

fn letters_to_col(letters: &str) -> Option<u32> {
    let mut acc = 0u32;
    for c in letters.to_ascii_uppercase().bytes() {
        let digit = (c - b'A') as u32 + 1;
        acc = acc.checked_mul(26)?.checked_add(digit)?;
    }
    acc.checked_sub(1)
}

impl FromStr for CellRef {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_a1(s).ok_or_else(|| CoreError::InvalidRange(format!("bad cell reference '{s}'")))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", CellRef::col_to_letters(self.col), self.row + 1)
    }
}

/// An inclusive rectangular block of cells.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub struct CellRange {
    pub start: CellRef,
    pub end: CellRef,
}

impl CellRange {
    /// Build a range from two corners in any order.
    pub fn new(a: CellRef, b: CellRef) -> CellRange {
        CellRange {
            start: CellRef::new(a.col.min(b.col), a.row.min(b.row)),
            end: CellRef::new(a.col.max(b.col), a.row.max(b.row)),
        }
    }

    pub fn width(&self) -> u32 {
        self.end.col - self.start.col + 1
    }

    pub fn height(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    pub fn rows(&self) -> std::ops::RangeInclusive<u32> {
        self.start.row..=self.end.row
    }

    pub fn cols(&self) -> std::ops::RangeInclusive<u32> {
        self.start.col..=self.end.col
    }

    /// Drop the first row (the header row in `first-row` mode).
    /// Returns `None` when nothing is left.
    pub fn without_first_row(&self) -> Option<CellRange> {
        if self.start.row == self.end.row {
            return None;
        }
        Some(CellRange {
            start: CellRef::new(self.start.col, self.start.row + 1),
            end: self.end,
        })
    }
}

impl FromStr for CellRange {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidRange(format!("expected A1:B2 notation, got '{s}'"));
        let (a, b) = s.split_once(':').ok_or_else(invalid)?;
        let a = CellRef::parse_a1(a).ok_or_else(invalid)?;
        let b = CellRef::parse_a1(b).ok_or_else(invalid)?;
        Ok(CellRange::new(a, b))
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::{CellRange, CellRef};

    #[test]
    fn test_parse_single_and_multi_letter_columns() {
        let a1: CellRef = "A1".parse().unwrap();
        assert_eq!((a1.col, a1.row), (0, 0));
        let o134: CellRef = "O134".parse().unwrap();
        assert_eq!((o134.col, o134.row), (14, 133));
        let ab1: CellRef = "ab1".parse().unwrap();
        assert_eq!(ab1.col, 27);
    }

    #[test]
    fn test_parse_absolute_markers() {
        let cell: CellRef = "$C$27".parse().unwrap();
        assert_eq!(cell, CellRef::new(2, 26));
    }

    #[test]
    fn test_parse_invalid_refs() {
        assert!("".parse::<CellRef>().is_err());
        assert!("A0".parse::<CellRef>().is_err());
        assert!("1A".parse::<CellRef>().is_err());
        assert!("A 1".parse::<CellRef>().is_err());
        let huge = format!("{}1", "Z".repeat(40));
        assert!(huge.parse::<CellRef>().is_err());
    }

    #[test]
    fn test_col_letters_round_trip_edges() {
        assert_eq!(CellRef::col_to_letters(0), "A");
        assert_eq!(CellRef::col_to_letters(25), "Z");
        assert_eq!(CellRef::col_to_letters(26), "AA");
        assert_eq!(CellRef::col_from_letters("D"), Some(3));
        assert_eq!(CellRef::col_from_letters("d1"), None);
        assert_eq!(CellRef::col_from_letters(""), None);
    }

    #[test]
    fn test_range_parse_and_normalize() {
        let range: CellRange = "O134:C27".parse().unwrap();
        assert_eq!(range.to_string(), "C27:O134");
        assert_eq!(range.width(), 13);
        assert_eq!(range.height(), 108);
        assert!("C27".parse::<CellRange>().is_err());
        assert!("C27:".parse::<CellRange>().is_err());
    }

    #[test]
    fn test_range_without_first_row() {
        let range: CellRange = "A1:C1".parse().unwrap();
        assert!(range.without_first_row().is_none());
        let range: CellRange = "A1:C3".parse().unwrap();
        assert_eq!(range.without_first_row().unwrap().to_string(), "A2:C3");
    }
}
