use crate::commands::{open, Out};
use crate::error::{ErrorType, IntoResult};
use crate::model::Balance;
use crate::Result;
use serde::Serialize;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, Serialize)]
pub struct StaffBalance {
    pub staff: String,
    pub balance: Balance,
}

/// Computes balances from the transaction log. With `staff`, only that name is reported,
/// otherwise everyone on the roster is. Nothing is saved.
pub fn balance(workbook: &Path, staff: Option<&str>) -> Result<Out<Vec<StaffBalance>>> {
    let ledger = open(workbook)?;
    let log = ledger.transactions().pub_result(ErrorType::Storage)?;
    let roster = ledger.roster();

    let names: Vec<String> = match staff {
        Some(name) => {
            let name = name.trim();
            if !roster.contains(name) {
                warn!("'{name}' is not on the roster");
            }
            vec![name.to_string()]
        }
        None => roster.iter().map(String::from).collect(),
    };

    let balances: Vec<StaffBalance> = names
        .into_iter()
        .map(|staff| StaffBalance {
            balance: Balance::for_staff(&log, &staff),
            staff,
        })
        .collect();

    if balances.is_empty() {
        return Ok(Out::new("There is nobody on the roster", balances));
    }
    let message = balances
        .iter()
        .map(|b| format!("{}: {}", b.staff, b.balance))
        .collect::<Vec<_>>()
        .join("\n");
    Ok(Out::new(message, balances))
}
