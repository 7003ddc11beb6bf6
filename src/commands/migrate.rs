use crate::commands::{open, persist, Out};
use crate::{Config, Result};
use std::path::Path;

/// Brings the workbook up to the current layout. The workbook is only saved when the migration
/// changed something.
pub fn migrate(config: &Config, workbook: &Path) -> Result<Out<Vec<String>>> {
    let mut ledger = open(workbook)?;
    let changes = ledger.migration().changes().to_vec();
    if changes.is_empty() {
        return Ok(Out::new(
            format!("{} is already up to date", workbook.display()),
            changes,
        ));
    }
    persist(config, &mut ledger)?;
    Ok(Out::new(
        format!(
            "Migrated {}:\n{}",
            workbook.display(),
            changes.join("\n")
        ),
        changes,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Book, Cell, Sheet, Storage, XlsxStorage, TRANSACTIONS};
    use crate::test::TestEnv;
    use chrono::NaiveDate;

    #[test]
    fn test_migrate_up_to_date_does_not_save() {
        let env = TestEnv::seeded();
        let out = migrate(&env.config(), &env.workbook_path()).unwrap();
        assert!(out.structure().unwrap().is_empty());
        assert_eq!(std::fs::read_dir(env.config().backups()).unwrap().count(), 0);
    }

    #[test]
    fn test_migrate_legacy_workbook() {
        let env = TestEnv::new();
        let path = env.workbook_path();
        let date = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
        let mut book = Book::new();
        book.push_sheet(Sheet::with_rows(
            "Transactions",
            vec![
                vec!["Staff".into(), "Date".into(), "Type".into(), "Days".into()],
                vec!["Bob".into(), date.into(), "Earned".into(), 2.0.into()],
            ],
        ))
        .unwrap();
        XlsxStorage::new(&path).save(&book).unwrap();

        let out = migrate(&env.config(), &path).unwrap();
        assert!(!out.structure().unwrap().is_empty());
        assert_eq!(std::fs::read_dir(env.config().backups()).unwrap().count(), 1);

        let book = XlsxStorage::new(&path).load().unwrap();
        let sheet = book.sheet(TRANSACTIONS).unwrap();
        assert_eq!(sheet.cell(0, 1), &Cell::from("Start Date"));
        assert_eq!(sheet.cell(0, 2), &Cell::from("End Date"));
        assert_eq!(sheet.cell(1, 2), sheet.cell(1, 1));
        assert_eq!(sheet.cell(1, 3), &Cell::from("Earned"));

        // A second run finds nothing to do.
        let again = migrate(&env.config(), &path).unwrap();
        assert!(again.structure().unwrap().is_empty());
    }
}
