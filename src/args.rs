//! These structs provide the CLI interface for the lieu CLI.

use crate::model::Action;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// lieu: A command-line tool for tracking lieu days in a spreadsheet.
///
/// Staff, leave transactions and a yearly summary are kept in an .xlsx workbook. Every
/// transaction you record (days earned, taken or lost) is appended to the Transactions sheet,
/// balances are always recomputed from those rows, and the Summary sheet can be rebuilt for any
/// year.
///
/// The workbook is given with --workbook the first time and remembered after that.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and configuration file, and set up the workbook.
    ///
    /// This is the first command you should run. The workbook given with --workbook is created if
    /// it does not exist, or brought up to the current layout if it does, and remembered as the
    /// default workbook for later commands.
    Init(InitArgs),
    /// List or add staff.
    Staff(StaffArgs),
    /// Record days earned, taken or lost for a staff member.
    Add(AddArgs),
    /// Show lieu day balances.
    Balance(BalanceArgs),
    /// Rebuild the Summary sheet for a year.
    Summary(SummaryArgs),
    /// Bring the workbook up to the current layout without changing anything else.
    Migrate,
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where lieu configuration and backups are held. Defaults to ~/lieu
    #[arg(long, env = "LIEU_HOME", default_value_t = default_lieu_home())]
    lieu_home: DisplayPath,

    /// The .xlsx workbook to use. Defaults to the last workbook used.
    #[arg(long, env = "LIEU_WORKBOOK")]
    workbook: Option<PathBuf>,
}

impl Common {
    pub fn new(log_level: LevelFilter, lieu_home: PathBuf, workbook: Option<PathBuf>) -> Self {
        Self {
            log_level,
            lieu_home: lieu_home.into(),
            workbook,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn lieu_home(&self) -> &DisplayPath {
        &self.lieu_home
    }

    pub fn workbook(&self) -> Option<&Path> {
        self.workbook.as_deref()
    }
}

/// Args for the `lieu init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// Staff names to add to the roster. May be repeated.
    #[arg(long = "staff")]
    staff: Vec<String>,
}

impl InitArgs {
    pub fn new(staff: Vec<String>) -> Self {
        Self { staff }
    }

    pub fn staff(&self) -> &[String] {
        &self.staff
    }
}

/// Args for the `lieu staff` command.
#[derive(Debug, Parser, Clone)]
pub struct StaffArgs {
    #[command(subcommand)]
    command: StaffCommand,
}

impl StaffArgs {
    pub fn new(command: StaffCommand) -> Self {
        Self { command }
    }

    pub fn command(&self) -> &StaffCommand {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum StaffCommand {
    /// Print the roster.
    List,
    /// Add a name to the Staff sheet.
    Add {
        /// The staff member's name.
        name: String,
    },
}

/// Args for the `lieu add` command.
///
/// Give either --days, or --end to record a range of whole days, where the number of days is
/// counted from --start to --end inclusive. With neither, one day is recorded.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// The staff member, who must be on the roster.
    #[arg(long)]
    staff: String,

    /// What to do with the days.
    #[arg(long, value_enum, default_value_t = Action::Add)]
    action: Action,

    /// The first day, as YYYY-MM-DD.
    #[arg(long)]
    start: NaiveDate,

    /// The last day of a range, as YYYY-MM-DD.
    #[arg(long, conflicts_with = "days")]
    end: Option<NaiveDate>,

    /// The number of days, e.g. 0.5 for half a day.
    #[arg(long)]
    days: Option<f64>,

    /// A free-text note.
    #[arg(long, default_value = "")]
    note: String,

    /// Who is recording this. Defaults to `entered_by` from the config file.
    #[arg(long)]
    entered_by: Option<String>,
}

impl AddArgs {
    pub fn new(staff: impl Into<String>, action: Action, start: NaiveDate) -> Self {
        Self {
            staff: staff.into(),
            action,
            start,
            end: None,
            days: None,
            note: String::new(),
            entered_by: None,
        }
    }

    pub fn with_end(mut self, end: NaiveDate) -> Self {
        self.end = Some(end);
        self
    }

    pub fn with_days(mut self, days: f64) -> Self {
        self.days = Some(days);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn with_entered_by(mut self, entered_by: impl Into<String>) -> Self {
        self.entered_by = Some(entered_by.into());
        self
    }

    pub fn staff(&self) -> &str {
        &self.staff
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    pub fn days(&self) -> Option<f64> {
        self.days
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn entered_by(&self) -> Option<&str> {
        self.entered_by.as_deref()
    }
}

/// Args for the `lieu balance` command.
#[derive(Debug, Parser, Clone)]
pub struct BalanceArgs {
    /// Show only this staff member. Without it, everyone on the roster is shown.
    #[arg(long)]
    staff: Option<String>,
}

impl BalanceArgs {
    pub fn new(staff: Option<String>) -> Self {
        Self { staff }
    }

    pub fn staff(&self) -> Option<&str> {
        self.staff.as_deref()
    }
}

/// Args for the `lieu summary` command.
#[derive(Debug, Parser, Clone)]
pub struct SummaryArgs {
    /// The year to summarize. Defaults to the current year.
    #[arg(long, value_parser = clap::value_parser!(i32).range(2000..=2100))]
    year: Option<i32>,
}

impl SummaryArgs {
    pub fn new(year: Option<i32>) -> Self {
        Self { year }
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }
}

fn default_lieu_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("lieu"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --lieu-home or LIEU_HOME instead of relying on the default \
                lieu home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("lieu")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add() {
        let args = Args::try_parse_from([
            "lieu",
            "--lieu-home",
            "/tmp/lieu",
            "add",
            "--staff",
            "Bob",
            "--action",
            "minus",
            "--start",
            "2025-06-01",
            "--end",
            "2025-06-03",
        ])
        .unwrap();
        assert_eq!(args.common().lieu_home().path(), Path::new("/tmp/lieu"));
        let Command::Add(add) = args.command() else {
            panic!("expected add, got {:?}", args.command());
        };
        assert_eq!(add.staff(), "Bob");
        assert_eq!(add.action(), Action::Minus);
        assert_eq!(add.end(), NaiveDate::from_ymd_opt(2025, 6, 3));
        assert_eq!(add.days(), None);
    }

    #[test]
    fn test_end_conflicts_with_days() {
        let result = Args::try_parse_from([
            "lieu", "add", "--staff", "Bob", "--start", "2025-06-01", "--end", "2025-06-03",
            "--days", "2",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_summary_year_range() {
        assert!(Args::try_parse_from(["lieu", "summary", "--year", "1999"]).is_err());
        let args = Args::try_parse_from(["lieu", "summary", "--year", "2025"]).unwrap();
        let Command::Summary(summary) = args.command() else {
            panic!("expected summary");
        };
        assert_eq!(summary.year(), Some(2025));
    }
}
