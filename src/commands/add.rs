use crate::args::AddArgs;
use crate::commands::{open, persist, Out};
use crate::error::{invalid, ErrorType, IntoResult};
use crate::model::{inclusive_days, Balance, NewTransaction};
use crate::{Config, Result};
use chrono::NaiveTime;
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// What `lieu add` recorded and where it left the staff member's balance.
#[derive(Debug, Clone, Serialize)]
pub struct Added {
    pub transaction: NewTransaction,
    pub balance: Balance,
}

/// Validates `args`, appends the transaction to the workbook's log and saves.
///
/// Nothing is written when validation fails:
/// - the staff member must be on the roster
/// - the number of days must be greater than zero
/// - a range must not end before it starts, and cannot be combined with an explicit day count
pub fn add(config: &Config, workbook: &Path, args: &AddArgs) -> Result<Out<Added>> {
    let staff = args.staff().trim();
    if staff.is_empty() {
        return invalid("A staff name is required");
    }

    let start = args.start();
    let days = match (args.end(), args.days()) {
        (Some(_), Some(_)) => return invalid("Give either an end date or a number of days"),
        (Some(end), None) => {
            if end < start {
                return invalid(format!("The end date {end} is before the start date {start}"));
            }
            inclusive_days(start, end)
        }
        (None, Some(days)) => days,
        (None, None) => 1.0,
    };
    if !days.is_finite() || days <= 0.0 {
        return invalid(format!("Days must be greater than zero, got {days}"));
    }

    let mut ledger = open(workbook)?;
    if !ledger.roster().contains(staff) {
        return invalid(format!(
            "'{staff}' is not on the roster, add them with 'lieu staff add' first"
        ));
    }

    let entered_by = args
        .entered_by()
        .or(config.entered_by())
        .unwrap_or_default();
    let transaction = NewTransaction {
        staff: staff.to_string(),
        start: start.and_time(NaiveTime::MIN),
        end: args.end().map(|end| end.and_time(NaiveTime::MIN)),
        entry_type: args.action().entry_type(),
        days,
        note: args.note().to_string(),
        entered_by: entered_by.to_string(),
    };
    debug!("Adding {transaction:?}");

    let balance = ledger.add(&transaction).pub_result(ErrorType::Storage)?;
    persist(config, &mut ledger)?;

    Ok(Out::new(
        format!(
            "Recorded {} {} day(s) for {}. New {}",
            days, transaction.entry_type, staff, balance
        ),
        Added {
            transaction,
            balance,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Storage, XlsxStorage, TRANSACTIONS};
    use crate::model::{Action, EntryType, TransactionLog};
    use crate::test::TestEnv;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn log(env: &TestEnv) -> TransactionLog {
        let book = XlsxStorage::new(env.workbook_path()).load().unwrap();
        TransactionLog::read(book.sheet(TRANSACTIONS).unwrap())
    }

    #[test]
    fn test_add_range() {
        let env = TestEnv::seeded();
        let args = AddArgs::new("Carol", Action::Add, date(2025, 6, 1))
            .with_end(date(2025, 6, 3))
            .with_note("Conference")
            .with_entered_by("Pat");
        let out = add(&env.config(), &env.workbook_path(), &args).unwrap();
        let added = out.structure().unwrap();
        assert_eq!(added.transaction.days, 3.0);
        assert_eq!(added.balance.balance(), 3.0);

        let log = log(&env);
        assert_eq!(log.len(), 6);
        let last = log.last().unwrap();
        assert_eq!(last.staff(), "Carol");
        assert_eq!(last.kind(), Some(EntryType::Earned));
        assert_eq!(last.days(), 3.0);
        assert_eq!(last.note(), "Conference");
        assert_eq!(last.entered_by(), "Pat");
        assert_eq!(
            last.end_date(),
            Some(date(2025, 6, 3).and_time(NaiveTime::MIN))
        );
        assert!(last.timestamp().is_some());
    }

    #[test]
    fn test_add_days_defaults_end_to_start() {
        let env = TestEnv::seeded();
        let args = AddArgs::new("Bob", Action::Minus, date(2025, 7, 4)).with_days(0.5);
        let out = add(&env.config(), &env.workbook_path(), &args).unwrap();
        assert_eq!(out.structure().unwrap().balance.balance(), 5.5);

        let log = log(&env);
        let last = log.last().unwrap();
        assert_eq!(last.kind(), Some(EntryType::Taken));
        assert_eq!(last.start_date(), last.end_date());
    }

    #[test]
    fn test_add_one_day_by_default() {
        let env = TestEnv::seeded();
        let args = AddArgs::new("Alice", Action::Lost, date(2025, 12, 31));
        let out = add(&env.config(), &env.workbook_path(), &args).unwrap();
        assert_eq!(out.structure().unwrap().balance.balance(), 0.5);
    }

    #[test]
    fn test_add_validation_writes_nothing() {
        let env = TestEnv::seeded();
        let config = env.config();
        let path = env.workbook_path();
        let cases = [
            AddArgs::new("Nobody", Action::Add, date(2025, 6, 1)),
            AddArgs::new("  ", Action::Add, date(2025, 6, 1)),
            AddArgs::new("Bob", Action::Add, date(2025, 6, 1)).with_days(0.0),
            AddArgs::new("Bob", Action::Add, date(2025, 6, 1)).with_days(-1.0),
            AddArgs::new("Bob", Action::Add, date(2025, 6, 1)).with_days(f64::NAN),
            AddArgs::new("Bob", Action::Add, date(2025, 6, 3)).with_end(date(2025, 6, 1)),
            AddArgs::new("Bob", Action::Add, date(2025, 6, 1))
                .with_end(date(2025, 6, 3))
                .with_days(3.0),
        ];
        for args in cases {
            let err = add(&config, &path, &args).unwrap_err();
            assert_eq!(err.error_type(), ErrorType::Validation, "{args:?}");
        }
        assert_eq!(log(&env).len(), 5);
        assert_eq!(std::fs::read_dir(config.backups()).unwrap().count(), 0);
    }
}
