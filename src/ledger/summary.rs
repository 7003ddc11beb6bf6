use crate::api::{Sheet, DATE_TIME_FORMAT};
use crate::model::{SummaryTable, MONTHS};
use chrono::NaiveDateTime;
use tracing::debug;

/// Columns in the summary region: the name, twelve months and the balance.
pub const SUMMARY_COLUMNS: usize = 14;

/// Zero-based row of the column headers. Staff rows follow it.
const HEADER_ROW: usize = 2;

/// Extra rows cleared below the staff rows so a shrinking roster leaves nothing behind.
const MARGIN_ROWS: usize = 10;

const STAFF_LIST: &str = "Staff list";
const CURRENT_BALANCE: &str = "Current balance";

/// Clears the summary region of `sheet` and writes `table` into it. `rebuilt_at` is shown in the
/// title row. The same table and instant always produce the same cells.
pub fn write(sheet: &mut Sheet, table: &SummaryTable, rebuilt_at: NaiveDateTime) {
    let region_rows = sheet
        .height()
        .max(HEADER_ROW + 1 + table.rows().len() + MARGIN_ROWS);
    sheet.clear(0..region_rows, 0..SUMMARY_COLUMNS);

    sheet.set_cell(0, 0, table.title());
    sheet.set_cell(
        0,
        1,
        format!("Last updated: {}", rebuilt_at.format(DATE_TIME_FORMAT)),
    );

    sheet.set_cell(HEADER_ROW, 0, STAFF_LIST);
    for (ix, month) in MONTHS.iter().enumerate() {
        sheet.set_cell(HEADER_ROW, ix + 1, *month);
    }
    sheet.set_cell(HEADER_ROW, SUMMARY_COLUMNS - 1, CURRENT_BALANCE);

    for (offset, row) in table.rows().iter().enumerate() {
        let r = HEADER_ROW + 1 + offset;
        sheet.set_cell(r, 0, row.staff());
        for (ix, value) in row.months().iter().enumerate() {
            sheet.set_cell(r, ix + 1, *value);
        }
        sheet.set_cell(r, SUMMARY_COLUMNS - 1, row.balance());
    }
    debug!(
        "Wrote summary for {} with {} staff rows",
        table.year(),
        table.rows().len()
    );
}
