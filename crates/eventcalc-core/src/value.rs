//! Cell values as shown in the grid.

use calamine::Data;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::fmt;

/// A single cell value.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Interpret user-typed text.
    ///
    /// - Blank (after trimming) -> `Empty`
    /// - Finite number, with `.` or a single `,` as decimal separator -> `Number`
    /// - Otherwise -> `Text`, kept verbatim
    pub fn parse_input(input: &str) -> CellValue {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return CellValue::Empty;
        }
        if let Some(n) = parse_number(trimmed) {
            return CellValue::Number(n);
        }
        CellValue::Text(input.to_string())
    }

    /// Text to seed an editor with. Unlike `Display`, numbers are not
    /// rounded, so an unchanged buffer parses back to the same value.
    pub fn to_input_string(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        }
    }

    /// Convert a value read by calamine.
    pub(crate) fn from_data(data: &Data) -> CellValue {
        match data {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::Error(e) => CellValue::Text(e.to_string()),
            Data::DateTime(dt) => CellValue::Text(format_excel_serial(dt.as_f64())),
            Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        }
    }
}

fn parse_number(s: &str) -> Option<f64> {
    let n = match s.parse::<f64>() {
        Ok(n) => n,
        Err(_) if s.matches(',').count() == 1 && !s.contains('.') => {
            s.replace(',', ".").parse::<f64>().ok()?
        }
        Err(_) => return None,
    };
    n.is_finite().then_some(n)
}

/// Format a number the way the grid shows it: integers without a fraction,
/// everything else with trailing zeros trimmed.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        let s = format!("{:.6}", n);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Excel serial dates count days from 1899-12-30 in the 1900 date system.
fn format_excel_serial(serial: f64) -> String {
    let Some(epoch) = NaiveDate::from_ymd_opt(1899, 12, 30).and_then(|d| d.and_hms_opt(0, 0, 0))
    else {
        return format_number(serial);
    };
    let millis = (serial * 86_400_000.0).round() as i64;
    let Some(dt) = epoch.checked_add_signed(Duration::milliseconds(millis)) else {
        return format_number(serial);
    };
    format_datetime(dt, serial.fract() != 0.0)
}

fn format_datetime(dt: NaiveDateTime, with_time: bool) -> String {
    if with_time {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    } else {
        dt.format("%Y-%m-%d").to_string()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => f.write_str(&format_number(*n)),
            CellValue::Bool(true) => f.write_str("TRUE"),
            CellValue::Bool(false) => f.write_str("FALSE"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input_kinds() {
        assert_eq!(CellValue::parse_input("   "), CellValue::Empty);
        assert_eq!(CellValue::parse_input("42"), CellValue::Number(42.0));
        assert_eq!(CellValue::parse_input(" 0.25 "), CellValue::Number(0.25));
        assert_eq!(CellValue::parse_input("0,5"), CellValue::Number(0.5));
        assert_eq!(
            CellValue::parse_input("Outdoor"),
            CellValue::Text("Outdoor".to_string())
        );
        assert_eq!(
            CellValue::parse_input("1,000.5"),
            CellValue::Text("1,000.5".to_string())
        );
    }

    #[test]
    fn test_parse_input_rejects_non_finite() {
        assert_eq!(CellValue::parse_input("inf"), CellValue::Text("inf".to_string()));
        assert_eq!(CellValue::parse_input("NaN"), CellValue::Text("NaN".to_string()));
    }

    #[test]
    fn test_display() {
        assert_eq!(CellValue::Number(3.0).to_string(), "3");
        assert_eq!(CellValue::Number(0.125).to_string(), "0.125");
        assert_eq!(CellValue::Bool(true).to_string(), "TRUE");
        assert_eq!(CellValue::Empty.to_string(), "");
    }

    #[test]
    fn test_input_string_keeps_full_precision() {
        let third = CellValue::Number(1.0 / 3.0);
        assert_eq!(third.to_string(), "0.333333");
        assert_eq!(CellValue::parse_input(&third.to_input_string()), third);
        assert_eq!(CellValue::Number(14.0).to_input_string(), "14");
        assert_eq!(CellValue::Text("007".into()).to_input_string(), "007");
        assert_eq!(CellValue::Bool(false).to_input_string(), "FALSE");
    }

    #[test]
    fn test_excel_serial_dates() {
        assert_eq!(format_excel_serial(45292.0), "2024-01-01");
        assert_eq!(format_excel_serial(45292.5), "2024-01-01 12:00:00");
    }

    #[test]
    fn test_from_data() {
        assert_eq!(CellValue::from_data(&Data::Int(7)), CellValue::Number(7.0));
        assert_eq!(
            CellValue::from_data(&Data::String("x".into())),
            CellValue::Text("x".into())
        );
        assert_eq!(CellValue::from_data(&Data::Empty), CellValue::Empty);
        assert_eq!(CellValue::from_data(&Data::Bool(false)), CellValue::Bool(false));
        assert_eq!(
            CellValue::from_data(&Data::Error(calamine::CellErrorType::Div0)),
            CellValue::Text("#DIV/0!".into())
        );
    }
}
