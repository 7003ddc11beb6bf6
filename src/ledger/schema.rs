//! Brings a workbook up to the current layout: a `Summary` sheet first, a `Staff` sheet and a
//! `Transactions` sheet with the eight canonical headers. Running it again on a migrated workbook
//! changes nothing.

use crate::api::{Book, Sheet, STAFF, SUMMARY, TRANSACTIONS};
use crate::error::Res;
use crate::model::{ColumnMap, TransactionColumn};
use serde::{Deserialize, Serialize};
use tracing::info;

/// The header that legacy Transactions sheets had in the second column.
const LEGACY_DATE: &str = "Date";

/// What `migrate` changed, one human-readable line per change.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Migration {
    changes: Vec<String>,
}

impl Migration {
    pub fn changes(&self) -> &[String] {
        &self.changes
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    fn push(&mut self, change: impl Into<String>) {
        let change = change.into();
        info!("Workbook migration: {change}");
        self.changes.push(change);
    }
}

/// Migrates `book` in place.
pub fn migrate(book: &mut Book) -> Res<Migration> {
    let mut migration = Migration::default();
    ensure_summary(book, &mut migration)?;
    ensure_staff(book, &mut migration)?;
    ensure_transactions(book, &mut migration)?;
    Ok(migration)
}

fn ensure_summary(book: &mut Book, migration: &mut Migration) -> Res<()> {
    if let Some(ix) = book.position(SUMMARY) {
        fix_casing(book, SUMMARY, migration)?;
        if ix != 0 {
            book.move_sheet(SUMMARY, 0)?;
            migration.push("Moved the Summary sheet to the front");
        }
        return Ok(());
    }
    let first = book.first_sheet().map(|s| s.name().to_string());
    match first {
        Some(name) if !is_data_sheet(&name) => {
            book.rename_sheet(&name, SUMMARY)?;
            migration.push(format!("Renamed sheet '{name}' to '{SUMMARY}'"));
        }
        _ => {
            book.insert_sheet(0, Sheet::new(SUMMARY))?;
            migration.push("Created the Summary sheet");
        }
    }
    Ok(())
}

fn ensure_staff(book: &mut Book, migration: &mut Migration) -> Res<()> {
    if book.sheet(STAFF).is_none() {
        let mut sheet = Sheet::new(STAFF);
        sheet.set_cell(0, 0, STAFF);
        book.push_sheet(sheet)?;
        migration.push("Created the Staff sheet");
        return Ok(());
    }
    fix_casing(book, STAFF, migration)?;
    let sheet = book.require_mut(STAFF)?;
    if sheet.cell(0, 0).is_blank() {
        sheet.set_cell(0, 0, STAFF);
        migration.push("Added the Staff header");
    }
    Ok(())
}

fn ensure_transactions(book: &mut Book, migration: &mut Migration) -> Res<()> {
    if book.sheet(TRANSACTIONS).is_none() {
        let mut sheet = Sheet::new(TRANSACTIONS);
        for column in TransactionColumn::ALL {
            sheet.set_cell(0, column.position(), column.header());
        }
        book.push_sheet(sheet)?;
        migration.push("Created the Transactions sheet");
        return Ok(());
    }
    fix_casing(book, TRANSACTIONS, migration)?;
    let sheet = book.require_mut(TRANSACTIONS)?;
    upgrade_legacy_dates(sheet, migration);
    fill_empty_headers(sheet, migration);
    Ok(())
}

/// Renames a legacy `Date` column to `Start Date` and adds an `End Date` column whose values are
/// copied from the start dates. The start column is found by header, so reordered sheets copy the
/// right values.
fn upgrade_legacy_dates(sheet: &mut Sheet, migration: &mut Migration) {
    let legacy = TransactionColumn::StartDate.position();
    let end = TransactionColumn::EndDate.position();

    if sheet.cell(0, legacy).text_eq_ignore_case(LEGACY_DATE) {
        sheet.set_cell(0, legacy, TransactionColumn::StartDate.header());
        migration.push("Renamed the 'Date' column to 'Start Date'");
    }

    if find_header(sheet, TransactionColumn::EndDate).is_some() {
        return;
    }

    let mut start = ColumnMap::new(sheet.header()).index(TransactionColumn::StartDate);
    // An empty header cell in the End Date position can be claimed without shifting anything.
    if !sheet.cell(0, end).is_blank() {
        sheet.insert_column(end);
        if start >= end {
            start += 1;
        }
    }
    sheet.set_cell(0, end, TransactionColumn::EndDate.header());
    let mut copied = 0;
    for row in 1..sheet.height() {
        let start_value = sheet.cell(row, start).clone();
        if !start_value.is_blank() && sheet.cell(row, end).is_blank() {
            sheet.set_cell(row, end, start_value);
            copied += 1;
        }
    }
    migration.push(format!(
        "Added the 'End Date' column and copied {copied} start dates into it"
    ));
}

/// Gives every column that has no header one. It goes to its canonical position when that header
/// cell is empty, otherwise to the first empty header cell past the used ones, which is where
/// `ColumnMap` looks for it.
fn fill_empty_headers(sheet: &mut Sheet, migration: &mut Migration) {
    let mut filled = Vec::new();
    let mut next_free = sheet.header().len();
    for column in TransactionColumn::ALL {
        if find_header(sheet, column).is_some() {
            continue;
        }
        let ix = if sheet.cell(0, column.position()).is_blank() {
            column.position()
        } else {
            while !sheet.cell(0, next_free).is_blank() {
                next_free += 1;
            }
            next_free
        };
        sheet.set_cell(0, ix, column.header());
        filled.push(column.header());
    }
    if !filled.is_empty() {
        migration.push(format!("Filled empty headers: {}", filled.join(", ")));
    }
}

fn find_header(sheet: &Sheet, column: TransactionColumn) -> Option<usize> {
    sheet
        .header()
        .iter()
        .position(|h| TransactionColumn::from_header(&h.to_text()) == Some(column))
}

/// Renames a sheet whose name only differs from `canonical` by case.
fn fix_casing(book: &mut Book, canonical: &str, migration: &mut Migration) -> Res<()> {
    let current = match book.sheet(canonical) {
        Some(sheet) if sheet.name() != canonical => sheet.name().to_string(),
        _ => return Ok(()),
    };
    book.rename_sheet(&current, canonical)?;
    migration.push(format!("Renamed sheet '{current}' to '{canonical}'"));
    Ok(())
}

fn is_data_sheet(name: &str) -> bool {
    name.eq_ignore_ascii_case(STAFF) || name.eq_ignore_ascii_case(TRANSACTIONS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Cell;
    use crate::model::{TransactionLog, TRANSACTION_HEADERS};
    use chrono::NaiveDate;

    /// True when the first eight headers are the canonical ones, in order.
    fn is_canonical(sheet: &Sheet) -> bool {
        TRANSACTION_HEADERS
            .iter()
            .enumerate()
            .all(|(ix, h)| sheet.cell(0, ix).to_text() == *h)
    }

    fn sheet(name: &str, rows: &[&[&str]]) -> Sheet {
        Sheet::with_rows(
            name,
            rows.iter()
                .map(|r| r.iter().map(|&s| Cell::infer(s)).collect())
                .collect(),
        )
    }

    #[test]
    fn test_empty_book_gets_all_sheets() {
        let mut book = Book::new();
        let migration = migrate(&mut book).unwrap();
        assert_eq!(book.sheet_names(), vec![SUMMARY, STAFF, TRANSACTIONS]);
        assert_eq!(migration.changes().len(), 3);
        assert_eq!(book.sheet(STAFF).unwrap().cell(0, 0), &Cell::from("Staff"));
        assert!(is_canonical(book.sheet(TRANSACTIONS).unwrap()));
    }

    #[test]
    fn test_migrate_twice_is_a_no_op() {
        let mut book = Book::new();
        book.push_sheet(sheet("Sheet1", &[&["Staff list"], &["Bob"]]))
            .unwrap();
        book.push_sheet(sheet(
            "transactions",
            &[
                &["Staff", "Date", "Type", "Days"],
                &["Bob", "2024-01-10", "Earned", "2"],
            ],
        ))
        .unwrap();

        assert!(!migrate(&mut book).unwrap().is_empty());
        let once = book.clone();
        let second = migrate(&mut book).unwrap();
        assert!(second.is_empty(), "{:?}", second.changes());
        assert_eq!(book, once);
    }

    #[test]
    fn test_legacy_layout() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let mut legacy = Sheet::new(TRANSACTIONS);
        for (ix, h) in ["Staff", "Date", "Type", "Days", "Note"].iter().enumerate() {
            legacy.set_cell(0, ix, *h);
        }
        legacy.set_cell(1, 0, "Alice");
        legacy.set_cell(1, 1, start);
        legacy.set_cell(1, 2, "Earned");
        legacy.set_cell(1, 3, 2.0);
        legacy.set_cell(1, 4, "cover");
        let mut book = Book::new();
        book.push_sheet(Sheet::new("Summary")).unwrap();
        book.push_sheet(legacy).unwrap();

        migrate(&mut book).unwrap();

        let sheet = book.sheet(TRANSACTIONS).unwrap();
        assert!(is_canonical(sheet));
        assert_eq!(sheet.cell(1, 0), &Cell::from("Alice"));
        assert_eq!(sheet.cell(1, 1), &Cell::from(start));
        assert_eq!(sheet.cell(1, 2), &Cell::from(start));
        assert_eq!(sheet.cell(1, 3), &Cell::from("Earned"));
        assert_eq!(sheet.cell(1, 4), &Cell::Number(2.0));
        assert_eq!(sheet.cell(1, 5), &Cell::from("cover"));
    }

    #[test]
    fn test_first_sheet_renamed_to_summary() {
        let mut book = Book::new();
        book.push_sheet(sheet("Lieu Days", &[&["Staff"], &["Bob"]]))
            .unwrap();
        migrate(&mut book).unwrap();
        assert_eq!(book.sheet_names(), vec![SUMMARY, STAFF, TRANSACTIONS]);
        // The renamed sheet keeps its contents.
        assert_eq!(book.sheet(SUMMARY).unwrap().cell(1, 0), &Cell::from("Bob"));
    }

    #[test]
    fn test_data_sheet_first_is_not_renamed() {
        let mut book = Book::new();
        book.push_sheet(sheet("Staff", &[&["Staff"], &["Bob"]]))
            .unwrap();
        migrate(&mut book).unwrap();
        assert_eq!(book.sheet_names(), vec![SUMMARY, STAFF, TRANSACTIONS]);
        assert_eq!(book.sheet(STAFF).unwrap().cell(1, 0), &Cell::from("Bob"));
    }

    #[test]
    fn test_summary_moved_to_front_and_names_cased() {
        let mut book = Book::new();
        book.push_sheet(sheet("STAFF", &[&[""]])).unwrap();
        book.push_sheet(Sheet::new("summary")).unwrap();
        migrate(&mut book).unwrap();
        assert_eq!(book.sheet_names(), vec![SUMMARY, STAFF, TRANSACTIONS]);
        assert_eq!(book.sheet(STAFF).unwrap().cell(0, 0), &Cell::from("Staff"));
    }

    #[test]
    fn test_fills_empty_headers_without_shifting() {
        let mut book = Book::new();
        book.push_sheet(Sheet::new(SUMMARY)).unwrap();
        book.push_sheet(sheet(STAFF, &[&["Staff"], &["Bob"]])).unwrap();
        book.push_sheet(sheet(
            TRANSACTIONS,
            &[
                &["Staff", "Start Date", "End Date", "", "Days"],
                &["Bob", "2025-01-01", "2025-01-01", "Earned", "1"],
            ],
        ))
        .unwrap();
        let migration = migrate(&mut book).unwrap();
        let sheet = book.sheet(TRANSACTIONS).unwrap();
        assert!(is_canonical(sheet));
        assert_eq!(sheet.cell(1, 3), &Cell::from("Earned"));
        assert_eq!(
            migration.changes(),
            ["Filled empty headers: Type, Note, Entered By, Timestamp"]
        );
    }

    #[test]
    fn test_reordered_sheet_copies_start_dates_into_end_date() {
        let start = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
        let mut reordered = Sheet::new(TRANSACTIONS);
        for (ix, h) in ["Type", "Days", "Staff", "Start Date"].iter().enumerate() {
            reordered.set_cell(0, ix, *h);
        }
        reordered.set_cell(1, 0, "Earned");
        reordered.set_cell(1, 1, 1.5);
        reordered.set_cell(1, 2, "Carol");
        reordered.set_cell(1, 3, start);
        let mut book = Book::new();
        book.push_sheet(Sheet::new(SUMMARY)).unwrap();
        book.push_sheet(sheet(STAFF, &[&["Staff"], &["Carol"]])).unwrap();
        book.push_sheet(reordered).unwrap();

        let before = TransactionLog::read(book.sheet(TRANSACTIONS).unwrap());
        migrate(&mut book).unwrap();

        let sheet = book.sheet(TRANSACTIONS).unwrap();
        let map = ColumnMap::new(sheet.header());
        assert_eq!(sheet.cell(1, map.index(TransactionColumn::EndDate)), &Cell::from(start));
        assert_eq!(sheet.cell(1, map.index(TransactionColumn::Days)), &Cell::Number(1.5));

        // Every canonical header appears exactly once.
        for column in TransactionColumn::ALL {
            let count = sheet
                .header()
                .iter()
                .filter(|h| TransactionColumn::from_header(&h.to_text()) == Some(column))
                .count();
            assert_eq!(count, 1, "{column}");
        }

        let after = TransactionLog::read(sheet);
        assert_eq!(after, before);
        assert!(migrate(&mut book).unwrap().is_empty());
    }

    #[test]
    fn test_missing_headers_do_not_duplicate_existing_ones() {
        let mut book = Book::new();
        book.push_sheet(Sheet::new(SUMMARY)).unwrap();
        book.push_sheet(sheet(STAFF, &[&["Staff"]])).unwrap();
        book.push_sheet(sheet(
            TRANSACTIONS,
            &[&["Days", "Type", "Staff"], &["2", "Earned", "Bob"]],
        ))
        .unwrap();

        migrate(&mut book).unwrap();

        let sheet = book.sheet(TRANSACTIONS).unwrap();
        let headers: Vec<String> = sheet.header().iter().map(|h| h.to_text()).collect();
        assert_eq!(
            headers,
            vec![
                "Days",
                "Type",
                "End Date",
                "Staff",
                "Start Date",
                "Note",
                "Entered By",
                "Timestamp",
            ]
        );
        let log = TransactionLog::read(sheet);
        let t = log.last().unwrap();
        assert_eq!(t.staff(), "Bob");
        assert_eq!(t.days(), 2.0);
    }
}
