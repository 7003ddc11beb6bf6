//! lieu: a lieu day ledger kept in an `.xlsx` workbook.
//!
//! The workbook holds a Staff roster, an append-only Transactions log and a Summary sheet that is
//! rebuilt from the log. Balances are never stored; they are always recomputed from the log.

pub mod api;
pub mod args;
mod backup;
pub mod commands;
mod config;
mod error;
pub mod ledger;
pub mod model;
mod utils;

#[cfg(test)]
mod test;

pub use backup::Backup;
pub use config::Config;
pub use error::{Error, ErrorType, Result};
