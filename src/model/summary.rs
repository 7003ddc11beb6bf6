use crate::model::{Balance, Roster, Transaction, TransactionLog};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// One staff member's line in the summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SummaryRow {
    staff: String,
    /// Net change (`earned - taken - lost`) for January through December of the summary year,
    /// bucketed by start date.
    months: [f64; 12],
    /// The lifetime balance across every year.
    balance: f64,
}

impl SummaryRow {
    pub fn staff(&self) -> &str {
        &self.staff
    }

    pub fn months(&self) -> &[f64; 12] {
        &self.months
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }
}

/// The staff-by-month table for one year, computed entirely in memory before anything is
/// written. Values are rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SummaryTable {
    year: i32,
    rows: Vec<SummaryRow>,
}

#[derive(Default)]
struct Totals {
    months: [Balance; 12],
    lifetime: Balance,
}

impl SummaryTable {
    /// Builds one row per roster member, in roster order. Staff with no transactions get zeros
    /// for every month and for the balance.
    pub fn build(roster: &Roster, log: &TransactionLog, year: i32) -> Self {
        let mut totals: HashMap<&str, Totals> = HashMap::new();
        for t in log.iter() {
            if !roster.contains(t.staff()) {
                continue;
            }
            let entry = totals.entry(t.staff()).or_default();
            entry.lifetime.record(t);
            if let Some(month) = month_in_year(t, year) {
                entry.months[month].record(t);
            }
        }

        let rows = roster
            .iter()
            .map(|staff| {
                let (months, balance) = match totals.get(staff) {
                    Some(totals) => (
                        totals.months.map(|b| round2(b.balance())),
                        round2(totals.lifetime.balance()),
                    ),
                    None => ([0.0; 12], 0.0),
                };
                SummaryRow {
                    staff: staff.to_string(),
                    months,
                    balance,
                }
            })
            .collect();

        Self { year, rows }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn rows(&self) -> &[SummaryRow] {
        &self.rows
    }

    pub fn title(&self) -> String {
        format!("Lieu Day Summary {}", self.year)
    }
}

/// The zero-based month of `t`'s start date, if it falls in `year`.
fn month_in_year(t: &Transaction, year: i32) -> Option<usize> {
    t.start_date()
        .filter(|start| start.year() == year)
        .map(|start| start.month0() as usize)
}

/// Rounds to two decimals. Negative zero comes out as `0.0`.
pub(crate) fn round2(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}
