//! Command handlers for the lieu CLI.
//!
//! This module contains implementations for all CLI subcommands. Each handler opens the workbook,
//! does its work on the in-memory copy and saves it once at the end, or not at all.

mod add;
mod balance;
mod init;
mod migrate;
mod staff;
mod summary;

use crate::error::{ErrorType, IntoResult};
use crate::ledger::Ledger;
use crate::{api, Config, Result};
use serde::Serialize;
use std::fmt::Debug;
use std::path::Path;
use tracing::{debug, info};

pub use add::{add, Added};
pub use balance::{balance, StaffBalance};
pub use init::init;
pub use migrate::migrate;
pub use staff::{staff_add, staff_list};
pub use summary::summary;

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// Opens and migrates the xlsx workbook at `path`. A missing file opens as a new workbook.
fn open(path: &Path) -> Result<Ledger> {
    Ledger::open(api::xlsx(path)).pub_result(ErrorType::Storage)
}

/// Backs up the workbook file, if it already exists, then saves the ledger over it.
fn persist(config: &Config, ledger: &mut Ledger) -> Result<()> {
    if let Some(path) = ledger.storage_path() {
        config
            .backup()
            .save_copy(path)
            .pub_result(ErrorType::Storage)?;
    }
    ledger.save().pub_result(ErrorType::Storage)
}
