use crate::model::{EntryType, Transaction, TransactionLog};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Lieu day totals for one staff member. Always derived from the transaction log, never stored.
///
/// `balance` is `earned - taken - lost` and is not clamped, a negative balance means more leave
/// was used than was earned. Nothing is rounded here; rounding happens when values are written or
/// shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Balance {
    earned: f64,
    taken: f64,
    lost: f64,
    balance: f64,
}

impl Balance {
    /// Totals the days of `transactions`. Rows whose type is not recognized contribute nothing.
    pub fn from_transactions<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let mut balance = Self::default();
        for t in transactions {
            balance.record(t);
        }
        balance
    }

    /// Totals every transaction whose staff name is exactly `staff`.
    pub fn for_staff(log: &TransactionLog, staff: &str) -> Self {
        Self::from_transactions(log.iter().filter(|t| t.staff() == staff))
    }

    /// Adds one transaction to the totals.
    pub fn record(&mut self, t: &Transaction) {
        match t.kind() {
            Some(EntryType::Earned) => self.earned += t.days(),
            Some(EntryType::Taken) => self.taken += t.days(),
            Some(EntryType::Lost) => self.lost += t.days(),
            None => return,
        }
        self.balance = self.earned - self.taken - self.lost;
    }

    pub fn earned(&self) -> f64 {
        self.earned
    }

    pub fn taken(&self) -> f64 {
        self.taken
    }

    pub fn lost(&self) -> f64 {
        self.lost
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }
}

impl Display for Balance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "balance {:.2} (earned {:.2}, taken {:.2}, lost {:.2})",
            self.balance, self.earned, self.taken, self.lost
        )
    }
}
