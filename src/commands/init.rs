use crate::args::InitArgs;
use crate::commands::{open, persist, Out};
use crate::error::{ErrorType, IntoResult};
use crate::model::Roster;
use crate::{Config, Result};
use std::path::Path;
use tracing::info;

/// Creates the data directory and its `config.json` and, when a workbook is known:
/// - creates the workbook if it does not exist, or brings it up to the current layout if it does
/// - adds the staff names in `args` to the Staff sheet
/// - remembers the workbook as the default for later commands
///
/// # Arguments
/// - `lieu_home` - The directory that will be the root of data directory, e.g. `$HOME/lieu`
/// - `workbook` - The `.xlsx` file to set up. When `None`, the last workbook from an existing
///   config is used, and if there is none only the data directory is created.
///
/// # Errors
/// - Returns an error if any file operations fail or a staff name is empty.
pub fn init(lieu_home: &Path, workbook: Option<&Path>, args: &InitArgs) -> Result<Out<Roster>> {
    let mut config = Config::create(lieu_home)?;
    if workbook.or(config.last_workbook()).is_none() {
        return Ok(format!(
            "Created the lieu home at {}. Run init again with --workbook to set up a workbook",
            config.root().display()
        )
        .into());
    }
    let path = config.workbook_path(workbook)?;

    let mut ledger = open(&path)?;
    for name in args.staff() {
        if !ledger.add_staff(name).pub_result(ErrorType::Validation)? {
            info!("'{}' is already on the roster", name.trim());
        }
    }
    persist(&config, &mut ledger)?;
    config.set_last_workbook(&path)?;

    let roster = ledger.roster();
    Ok(Out::new(
        format!(
            "Set up {} with {} staff, the lieu home is at {}",
            path.display(),
            roster.len(),
            config.root().display()
        ),
        roster,
    ))
}
