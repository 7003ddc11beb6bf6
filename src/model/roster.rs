use crate::api::{Book, Sheet, STAFF};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Labels that can sit in the first column of a sheet without being staff names.
const NOT_NAMES: [&str; 2] = ["Staff", "Staff list"];

/// The known staff: unique, trimmed, non-empty names in sorted order.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    names: BTreeSet<String>,
}

impl Roster {
    pub fn new<S, I>(names: I) -> Self
    where
        S: AsRef<str>,
        I: IntoIterator<Item = S>,
    {
        let names = names
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        Self { names }
    }

    /// Reads the roster from the `Staff` sheet. When that sheet is missing or lists nobody, names
    /// are salvaged from the first column of the workbook's first sheet instead.
    pub fn read(book: &Book) -> Self {
        let roster = Self::from_staff_sheet(book);
        if !roster.is_empty() {
            return roster;
        }
        match book.first_sheet() {
            Some(first) => Self::salvage(first),
            None => roster,
        }
    }

    /// Only the names listed in the `Staff` sheet.
    pub fn from_staff_sheet(book: &Book) -> Self {
        match book.sheet(STAFF) {
            Some(sheet) => Self::new(first_column(sheet)),
            None => Self::default(),
        }
    }

    fn salvage(sheet: &Sheet) -> Self {
        Self::new(
            first_column(sheet)
                .filter(|name| !NOT_NAMES.iter().any(|n| n.eq_ignore_ascii_case(name.trim()))),
        )
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Column A text from the second row down.
fn first_column(sheet: &Sheet) -> impl Iterator<Item = String> + '_ {
    sheet.rows().iter().skip(1).map(|row| {
        row.first()
            .map(|cell| cell.to_text())
            .unwrap_or_default()
    })
}
