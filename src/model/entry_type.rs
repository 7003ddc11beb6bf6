use serde::{Deserialize, Serialize};

/// The three kinds of transaction that can appear in the `Type` column.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum EntryType {
    /// Adds to the balance.
    Earned,
    /// Subtracts from the balance.
    Taken,
    /// Subtracts from the balance (e.g. days that expired).
    Lost,
}

serde_plain::derive_display_from_serialize!(EntryType);
serde_plain::derive_fromstr_from_deserialize!(EntryType);

impl EntryType {
    pub const ALL: [EntryType; 3] = [EntryType::Earned, EntryType::Taken, EntryType::Lost];

    /// Matches a `Type` cell label, ignoring case and surrounding whitespace.
    pub fn parse_label(label: &str) -> Option<EntryType> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.to_string().eq_ignore_ascii_case(label))
    }
}

/// What the user asked to do with the days on the command line.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    serde::Serialize,
    serde::Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Credit days to the staff member.
    #[default]
    Add,
    /// Record days taken as leave.
    Minus,
    /// Record days forfeited.
    Lost,
}

serde_plain::derive_display_from_serialize!(Action);
serde_plain::derive_fromstr_from_deserialize!(Action);

impl Action {
    pub fn entry_type(self) -> EntryType {
        match self {
            Action::Add => EntryType::Earned,
            Action::Minus => EntryType::Taken,
            Action::Lost => EntryType::Lost,
        }
    }
}
