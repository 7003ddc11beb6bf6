use crate::api::{Cell, Sheet};
use crate::model::{ColumnMap, NewTransaction, TransactionColumn};
use chrono::NaiveDateTime;
use tracing::debug;

/// Writes `entry` into the first unused row of the Transactions `sheet`, stamped with
/// `timestamp`, and returns the zero-based row index. Each value goes to the column its header
/// resolves to. Nothing is validated here; that is the caller's job.
pub fn append(sheet: &mut Sheet, entry: &NewTransaction, timestamp: NaiveDateTime) -> usize {
    let map = ColumnMap::new(sheet.header());
    let row = sheet.used_height().max(1);

    let values: [(TransactionColumn, Cell); TransactionColumn::COUNT] = [
        (TransactionColumn::Staff, entry.staff.as_str().into()),
        (TransactionColumn::StartDate, entry.start.into()),
        (TransactionColumn::EndDate, entry.end_or_start().into()),
        (TransactionColumn::Type, entry.entry_type.to_string().into()),
        (TransactionColumn::Days, entry.days.into()),
        (TransactionColumn::Note, entry.note.as_str().into()),
        (TransactionColumn::EnteredBy, entry.entered_by.as_str().into()),
        (TransactionColumn::Timestamp, timestamp.into()),
    ];
    for (column, value) in values {
        sheet.set_cell(row, map.index(column), value);
    }

    debug!(
        "Appended {} of {} days for '{}' at row {}",
        entry.entry_type,
        entry.days,
        entry.staff,
        row + 1
    );
    row
}
