//! The read-modify-write session over one workbook.
//!
//! A `Ledger` loads the whole workbook from its `Storage`, migrates it in memory, applies any
//! number of changes and then writes the whole workbook back with `save`. Nothing reaches storage
//! before `save` is called, and a failed save leaves the in-memory workbook as it was so the
//! caller can retry.

pub mod schema;
pub mod summary;
pub mod writer;

pub use schema::Migration;

use crate::api::{Book, Storage, STAFF, SUMMARY, TRANSACTIONS};
use crate::error::Res;
use crate::model::{Balance, NewTransaction, Roster, SummaryTable, TransactionLog};
use anyhow::{bail, Context};
use chrono::{Local, NaiveDateTime};
use std::path::Path;
use tracing::{debug, info};

pub struct Ledger {
    storage: Box<dyn Storage>,
    book: Book,
    migration: Migration,
}

impl Ledger {
    /// Loads and migrates the workbook held by `storage`.
    pub fn open(mut storage: Box<dyn Storage>) -> Res<Self> {
        let mut book = storage
            .load()
            .with_context(|| format!("Unable to load the workbook from {}", storage.describe()))?;
        let migration = schema::migrate(&mut book)?;
        debug!(
            "Opened {} with sheets {:?}",
            storage.describe(),
            book.sheet_names()
        );
        Ok(Self {
            storage,
            book,
            migration,
        })
    }

    /// What was changed to bring the workbook up to date when it was opened.
    pub fn migration(&self) -> &Migration {
        &self.migration
    }

    pub fn book(&self) -> &Book {
        &self.book
    }

    pub fn describe(&self) -> String {
        self.storage.describe()
    }

    /// The file behind the storage, if any.
    pub fn storage_path(&self) -> Option<&Path> {
        self.storage.path()
    }

    pub fn roster(&self) -> Roster {
        Roster::read(&self.book)
    }

    pub fn transactions(&self) -> Res<TransactionLog> {
        Ok(TransactionLog::read(self.book.require(TRANSACTIONS)?))
    }

    pub fn balance(&self, staff: &str) -> Res<Balance> {
        Ok(Balance::for_staff(&self.transactions()?, staff))
    }

    /// Appends `entry` stamped with the current local time and returns the staff member's new
    /// balance.
    pub fn add(&mut self, entry: &NewTransaction) -> Res<Balance> {
        self.add_at(entry, Local::now().naive_local())
    }

    /// Like `add` with an explicit timestamp.
    pub fn add_at(&mut self, entry: &NewTransaction, timestamp: NaiveDateTime) -> Res<Balance> {
        let sheet = self.book.require_mut(TRANSACTIONS)?;
        writer::append(sheet, entry, timestamp);
        self.balance(&entry.staff)
    }

    /// Adds `name` to the Staff sheet. Returns `false` if it was already on the roster. When the
    /// roster had been salvaged from the first sheet, those names are written to the Staff sheet
    /// first so that they are not lost.
    pub fn add_staff(&mut self, name: &str) -> Res<bool> {
        let name = name.trim();
        if name.is_empty() {
            bail!("A staff name cannot be empty");
        }
        let roster = self.roster();
        let listed = Roster::from_staff_sheet(&self.book);
        if listed.contains(name) {
            return Ok(false);
        }

        let sheet = self.book.require_mut(STAFF)?;
        if listed.is_empty() {
            for salvaged in roster.iter() {
                info!("Copying '{salvaged}' into the Staff sheet");
                sheet.append_row(vec![salvaged.into()]);
            }
        }
        if roster.contains(name) {
            return Ok(false);
        }
        sheet.append_row(vec![name.into()]);
        Ok(true)
    }

    /// Recomputes the summary for `year` and rewrites the Summary sheet, stamped with the current
    /// local time.
    pub fn rebuild_summary(&mut self, year: i32) -> Res<SummaryTable> {
        self.rebuild_summary_at(year, Local::now().naive_local())
    }

    /// Like `rebuild_summary` with an explicit rebuild time.
    pub fn rebuild_summary_at(
        &mut self,
        year: i32,
        rebuilt_at: NaiveDateTime,
    ) -> Res<SummaryTable> {
        let table = SummaryTable::build(&self.roster(), &self.transactions()?, year);
        let sheet = self.book.require_mut(SUMMARY)?;
        summary::write(sheet, &table, rebuilt_at);
        Ok(table)
    }

    /// Writes the whole workbook back to storage.
    pub fn save(&mut self) -> Res<()> {
        self.storage
            .save(&self.book)
            .with_context(|| format!("Unable to save the workbook to {}", self.storage.describe()))
    }
}
