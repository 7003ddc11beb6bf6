use crate::commands::{open, persist, Out};
use crate::error::{ErrorType, IntoResult};
use crate::model::Roster;
use crate::{Config, Result};
use std::path::Path;

/// Lists the roster of the workbook at `workbook`. Nothing is saved.
pub fn staff_list(workbook: &Path) -> Result<Out<Roster>> {
    let ledger = open(workbook)?;
    let roster = ledger.roster();
    if roster.is_empty() {
        return Ok(Out::new("There is nobody on the roster", roster));
    }
    let names: Vec<&str> = roster.iter().collect();
    Ok(Out::new(names.join("\n"), roster))
}

/// Adds `name` to the Staff sheet and saves the workbook. A name that is already on the roster
/// leaves the workbook untouched.
pub fn staff_add(config: &Config, workbook: &Path, name: &str) -> Result<Out<Roster>> {
    let mut ledger = open(workbook)?;
    let added = ledger.add_staff(name).pub_result(ErrorType::Validation)?;
    if !added {
        return Ok(Out::new(
            format!("'{}' is already on the roster", name.trim()),
            ledger.roster(),
        ));
    }
    persist(config, &mut ledger)?;
    Ok(Out::new(
        format!("Added '{}' to the roster", name.trim()),
        ledger.roster(),
    ))
}
