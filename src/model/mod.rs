//! Types that represent the core data model, such as `Transaction`, `Roster` and `Balance`.
mod balance;
mod entry_type;
mod mapping;
mod roster;
mod summary;
mod transaction;

pub use balance::Balance;
pub use entry_type::{Action, EntryType};
pub use mapping::ColumnMap;
pub use roster::Roster;
pub use summary::{SummaryRow, SummaryTable, MONTHS};
pub use transaction::{
    inclusive_days, NewTransaction, Transaction, TransactionColumn, TransactionLog,
    TRANSACTION_HEADERS,
};
