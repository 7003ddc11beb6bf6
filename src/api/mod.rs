//! The tabular storage adapter. Everything that reads or writes a workbook goes through the
//! `Storage` trait, which moves whole `Book`s in and out of some backing store.

mod book;
mod cell;
mod memory;
mod xlsx;

pub use book::{Book, Sheet};
pub use cell::Cell;
pub(crate) use cell::{from_serial, DATE_TIME_FORMAT};
pub use memory::MemoryStorage;
pub use xlsx::XlsxStorage;

use crate::error::Res;
use std::path::Path;

/// The name of the sheet holding the staff roster.
pub const STAFF: &str = "Staff";

/// The name of the sheet holding the transaction log.
pub const TRANSACTIONS: &str = "Transactions";

/// The name of the summary sheet, which is always the first sheet in the workbook.
pub const SUMMARY: &str = "Summary";

/// A backing store for a workbook. Loads are whole-workbook reads and saves are whole-workbook
/// writes; a save either fully succeeds or fails without altering what was stored before.
pub trait Storage {
    /// Reads the entire workbook.
    fn load(&mut self) -> Res<Book>;

    /// Replaces the stored workbook with `book`.
    fn save(&mut self, book: &Book) -> Res<()>;

    /// A short description of where the workbook lives, for messages.
    fn describe(&self) -> String;

    /// The file backing this storage, if there is one.
    fn path(&self) -> Option<&Path> {
        None
    }
}

/// Creates the file-backed storage for an `.xlsx` workbook at `path`.
pub fn xlsx(path: impl AsRef<Path>) -> Box<dyn Storage> {
    Box::new(XlsxStorage::new(path.as_ref()))
}
