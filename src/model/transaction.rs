use crate::api::{from_serial, Cell, Sheet};
use crate::model::{ColumnMap, EntryType};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

pub const STAFF_STR: &str = "Staff";
pub const START_DATE_STR: &str = "Start Date";
pub const END_DATE_STR: &str = "End Date";
pub const TYPE_STR: &str = "Type";
pub const DAYS_STR: &str = "Days";
pub const NOTE_STR: &str = "Note";
pub const ENTERED_BY_STR: &str = "Entered By";
pub const TIMESTAMP_STR: &str = "Timestamp";

/// The header row of a Transactions sheet, in canonical column order.
pub const TRANSACTION_HEADERS: [&str; TransactionColumn::COUNT] = [
    STAFF_STR,
    START_DATE_STR,
    END_DATE_STR,
    TYPE_STR,
    DAYS_STR,
    NOTE_STR,
    ENTERED_BY_STR,
    TIMESTAMP_STR,
];

/// Date-time text formats accepted in date cells, tried in order.
const DATE_TIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Date-only text formats, promoted to midnight.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// The known columns of the Transactions sheet.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionColumn {
    Staff,
    StartDate,
    EndDate,
    Type,
    Days,
    Note,
    EnteredBy,
    Timestamp,
}

serde_plain::derive_display_from_serialize!(TransactionColumn);
serde_plain::derive_fromstr_from_deserialize!(TransactionColumn);

impl TransactionColumn {
    pub const COUNT: usize = 8;

    pub const ALL: [TransactionColumn; Self::COUNT] = [
        TransactionColumn::Staff,
        TransactionColumn::StartDate,
        TransactionColumn::EndDate,
        TransactionColumn::Type,
        TransactionColumn::Days,
        TransactionColumn::Note,
        TransactionColumn::EnteredBy,
        TransactionColumn::Timestamp,
    ];

    /// The zero-based canonical column index.
    pub fn position(self) -> usize {
        self as usize
    }

    pub fn header(self) -> &'static str {
        TRANSACTION_HEADERS[self.position()]
    }

    /// Matches a header cell's text, ignoring case and surrounding whitespace.
    pub fn from_header(header: &str) -> Option<TransactionColumn> {
        let header = header.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.header().eq_ignore_ascii_case(header))
    }
}

/// One row of the Transactions sheet after normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Transaction {
    pub(crate) staff: String,
    pub(crate) start_date: Option<NaiveDateTime>,
    pub(crate) end_date: Option<NaiveDateTime>,
    pub(crate) entry_type: String,
    pub(crate) days: f64,
    pub(crate) note: String,
    pub(crate) entered_by: String,
    pub(crate) timestamp: Option<NaiveDateTime>,
}

impl Transaction {
    /// Normalizes one sheet row. Malformed values are coerced rather than rejected: unreadable
    /// dates become `None` and unreadable day counts become `0.0`.
    pub fn from_row(row: &[Cell], map: &ColumnMap) -> Self {
        let get = |column: TransactionColumn| -> Cell {
            row.get(map.index(column)).cloned().unwrap_or_default()
        };
        let start_date = parse_date(&get(TransactionColumn::StartDate));
        let end_cell = get(TransactionColumn::EndDate);
        let end_date = if end_cell.is_blank() {
            start_date
        } else {
            parse_date(&end_cell)
        };
        Self {
            staff: get(TransactionColumn::Staff).to_text().trim().to_string(),
            start_date,
            end_date,
            entry_type: get(TransactionColumn::Type).to_text().trim().to_string(),
            days: parse_days(&get(TransactionColumn::Days)),
            note: get(TransactionColumn::Note).to_text(),
            entered_by: get(TransactionColumn::EnteredBy).to_text(),
            timestamp: parse_date(&get(TransactionColumn::Timestamp)),
        }
    }

    pub fn staff(&self) -> &str {
        &self.staff
    }

    pub fn start_date(&self) -> Option<NaiveDateTime> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDateTime> {
        self.end_date
    }

    /// The trimmed `Type` label exactly as it appears in the sheet.
    pub fn entry_type(&self) -> &str {
        &self.entry_type
    }

    /// The recognized kind of this transaction, if its label is one of the three known types.
    pub fn kind(&self) -> Option<EntryType> {
        EntryType::parse_label(&self.entry_type)
    }

    pub fn days(&self) -> f64 {
        self.days
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn entered_by(&self) -> &str {
        &self.entered_by
    }

    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        self.timestamp
    }
}

/// The normalized contents of a Transactions sheet, in sheet row order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionLog {
    data: Vec<Transaction>,
}

impl TransactionLog {
    pub fn new(data: Vec<Transaction>) -> Self {
        Self { data }
    }

    /// Reads every non-blank data row of `sheet`. The first row is the header. This never fails;
    /// see `Transaction::from_row` for how bad cells are treated.
    pub fn read(sheet: &Sheet) -> Self {
        let map = ColumnMap::new(sheet.header());
        let width = sheet.width().max(TransactionColumn::COUNT);
        let data = sheet
            .rows()
            .iter()
            .skip(1)
            .filter(|row| row.iter().take(width).any(|c| !c.is_blank()))
            .map(|row| Transaction::from_row(row, &map))
            .collect();
        Self { data }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.data.iter()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn last(&self) -> Option<&Transaction> {
        self.data.last()
    }
}

/// A transaction as requested by the user, before it is given a timestamp and written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NewTransaction {
    pub staff: String,
    pub start: NaiveDateTime,
    /// Defaults to `start` when `None`.
    pub end: Option<NaiveDateTime>,
    pub entry_type: EntryType,
    pub days: f64,
    pub note: String,
    pub entered_by: String,
}

impl NewTransaction {
    pub fn end_or_start(&self) -> NaiveDateTime {
        self.end.unwrap_or(self.start)
    }
}

/// The number of calendar days from `start` to `end`, counting both.
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> f64 {
    ((end - start).num_days() + 1) as f64
}

/// Interprets a date cell. Date-time cells are kept as they are, numbers are spreadsheet serial
/// dates and text is parsed with the accepted formats.
pub(crate) fn parse_date(cell: &Cell) -> Option<NaiveDateTime> {
    match cell {
        Cell::Empty => None,
        Cell::DateTime(dt) => Some(*dt),
        Cell::Number(n) => from_serial(*n),
        Cell::String(s) => parse_date_str(s),
    }
}

/// Parses date or date-time text. A bare date is promoted to midnight.
pub(crate) fn parse_date_str(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

fn parse_days(cell: &Cell) -> f64 {
    let days = match cell {
        Cell::Number(n) => *n,
        Cell::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        Cell::Empty | Cell::DateTime(_) => 0.0,
    };
    if days.is_finite() {
        days
    } else {
        0.0
    }
}
