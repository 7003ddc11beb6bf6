//! The `Cell` type, which is how every value crosses the storage boundary.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt::{Display, Formatter};

/// Format used when a date-time cell needs to be rendered as text.
pub(crate) const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Milliseconds in a day, used for spreadsheet serial date conversion.
const MS_PER_DAY: f64 = 86_400_000.0;

/// Serial numbers past 9999-12-31 are not dates.
const MAX_SERIAL: f64 = 2_958_466.0;

/// A single loosely-typed spreadsheet value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cell {
    #[default]
    Empty,
    String(String),
    Number(f64),
    DateTime(NaiveDateTime),
}

impl Cell {
    /// Parses a raw text value, as found in a CSV file, into a `Cell`. Blank text is `Empty`,
    /// anything that parses as a finite number is a `Number` and everything else is a `String`.
    /// Dates are left as text; interpreting them is the job of the transaction reader.
    pub fn infer(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Cell::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Cell::Number(n),
            _ => Cell::String(s.to_string()),
        }
    }

    /// True for `Empty` and for strings that contain only whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::String(s) => s.trim().is_empty(),
            Cell::Number(_) | Cell::DateTime(_) => false,
        }
    }

    /// Renders the cell as text. `Empty` is the empty string.
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// The cell text, trimmed, compared case-insensitively to `other`.
    pub fn text_eq_ignore_case(&self, other: &str) -> bool {
        self.to_text().trim().eq_ignore_ascii_case(other.trim())
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::String(s) => f.write_str(s),
            Cell::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            Cell::DateTime(dt) => write!(f, "{}", dt.format(DATE_TIME_FORMAT)),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::String(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::String(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<NaiveDateTime> for Cell {
    fn from(value: NaiveDateTime) -> Self {
        Cell::DateTime(value)
    }
}

impl From<NaiveDate> for Cell {
    fn from(value: NaiveDate) -> Self {
        Cell::DateTime(value.and_time(NaiveTime::MIN))
    }
}

/// Day zero of the 1900 date system as spreadsheets actually count it.
fn serial_epoch() -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(1899, 12, 30).map(|d| d.and_time(NaiveTime::MIN))
}

/// Converts a date-time into a spreadsheet serial number (days since 1899-12-30, with the time
/// of day as the fraction). Accurate for dates from 1900-03-01 onwards. Sub-millisecond parts
/// round up, so a value read back is never earlier than the one written.
pub(crate) fn to_serial(dt: NaiveDateTime) -> f64 {
    let Some(epoch) = serial_epoch() else {
        return 0.0;
    };
    let elapsed = dt - epoch;
    let mut ms = elapsed.num_milliseconds();
    if elapsed - Duration::milliseconds(ms) > Duration::zero() {
        ms += 1;
    }
    ms as f64 / MS_PER_DAY
}

/// Converts a spreadsheet serial number back into a date-time. Returns `None` for values that
/// cannot be dates.
pub(crate) fn from_serial(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !(0.0..MAX_SERIAL).contains(&serial) {
        return None;
    }
    let ms = (serial * MS_PER_DAY).round() as i64;
    serial_epoch()?.checked_add_signed(Duration::milliseconds(ms))
}
