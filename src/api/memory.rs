//! Implements the `Storage` trait using in-memory data.
//!
//! Note: this is compiled even in the "production" version of this app so that the whole ledger
//! can be exercised, top-to-bottom, without touching the file system.

use crate::api::{Book, Cell, Sheet, Storage, STAFF, SUMMARY, TRANSACTIONS};
use crate::error::Res;
use anyhow::Context;
use std::io::Cursor;
use tracing::trace;

/// An implementation of the `Storage` trait that keeps the workbook in memory. By default it is
/// seeded with a small, already-migrated workbook.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    book: Book,
    saves: usize,
}

impl MemoryStorage {
    pub fn new(book: Book) -> Self {
        Self { book, saves: 0 }
    }

    /// Creates a `MemoryStorage` from `(sheet name, CSV text)` pairs. Sheets appear in the given
    /// order and every CSV record, including the first, becomes a row.
    pub fn from_csv(sheets: &[(&str, &str)]) -> Res<Self> {
        let mut book = Book::new();
        for (name, csv_data) in sheets {
            let rows =
                load_csv(csv_data).with_context(|| format!("Unable to parse CSV for '{name}'"))?;
            book.push_sheet(Sheet::with_rows(*name, rows))?;
        }
        Ok(Self::new(book))
    }

    /// The most recently saved (or initial) workbook.
    pub fn book(&self) -> &Book {
        &self.book
    }

    /// How many times `save` has been called.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl Storage for MemoryStorage {
    fn load(&mut self) -> Res<Book> {
        Ok(self.book.clone())
    }

    fn save(&mut self, book: &Book) -> Res<()> {
        trace!("saving {} sheets to memory", book.sheets().len());
        self.book = book.clone();
        self.saves += 1;
        Ok(())
    }

    fn describe(&self) -> String {
        String::from("in-memory workbook")
    }
}

impl Default for MemoryStorage {
    /// Loads seed data from this module.
    fn default() -> Self {
        Self::new(default_data())
    }
}

/// Provides the seed workbook from this module.
fn default_data() -> Book {
    let mut book = Book::new();
    let sheets = [
        (SUMMARY, SUMMARY_DATA),
        (STAFF, STAFF_DATA),
        (TRANSACTIONS, TRANSACTION_DATA),
    ];
    for (name, data) in sheets {
        // The seed data is a compile-time constant, so an empty sheet is the only fallback needed.
        let rows = load_csv(data).unwrap_or_default();
        let _ = book.push_sheet(Sheet::with_rows(name, rows));
    }
    book
}

/// Loads data from a CSV-formatted string.
fn load_csv(csv_data: &str) -> Res<Vec<Vec<Cell>>> {
    let bytes = csv_data.as_bytes();
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(Cursor::new(bytes));

    let mut rows: Vec<Vec<Cell>> = Vec::new();

    for result in rdr.records() {
        let record = result?;
        let row: Vec<Cell> = record.iter().map(Cell::infer).collect();
        rows.push(row);
    }
    Ok(rows)
}

/// Seed summary data.
const SUMMARY_DATA: &str = r##""##;

/// Seed staff data.
const STAFF_DATA: &str = r##"Staff
Bob
Alice
Carol
"##;

/// Seed transaction data.
const TRANSACTION_DATA: &str = r##"Staff,Start Date,End Date,Type,Days,Note,Entered By,Timestamp
Bob,2024-01-01,2024-01-01,Earned,5,Carried over,Pat,2024-01-02 09:00:00
Alice,2025-02-10,2025-02-11,earned,2,Weekend cover,Pat,2025-02-12 10:15:00
Bob,2025-03-01,2025-03-01,Earned,2,Stocktake,Pat,2025-03-02 08:30:00
Bob,2025-03-15,2025-03-15,Taken,1,,Pat,2025-03-15 17:45:00
Alice,2025-04-04,2025-04-04,LOST,0.5,Expired,Pat,2025-04-05 12:00:00
"##;
