use clap::Parser;
use lieu_ledger::args::{Args, Command, StaffCommand};
use lieu_ledger::{commands, Config, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with {} error: {e}", e.error_type());
            ExitCode::FAILURE
        }
    }
}

pub fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().lieu_home().path();
    let workbook = args.common().workbook();

    // init creates the config rather than loading it, and remembers the workbook itself.
    if let Command::Init(init_args) = args.command() {
        commands::init(home, workbook, init_args)?.print();
        return Ok(());
    }

    let mut config = Config::load(home)?;
    let path = config.workbook_path(workbook)?;

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init(_) => return Ok(()),

        Command::Staff(staff_args) => match staff_args.command() {
            StaffCommand::List => commands::staff_list(&path)?.print(),
            StaffCommand::Add { name } => commands::staff_add(&config, &path, name)?.print(),
        },

        Command::Add(add_args) => commands::add(&config, &path, add_args)?.print(),

        Command::Balance(balance_args) => commands::balance(&path, balance_args.staff())?.print(),

        Command::Summary(summary_args) => {
            commands::summary(&config, &path, summary_args.year())?.print()
        }

        Command::Migrate => commands::migrate(&config, &path)?.print(),
    };

    config.set_last_workbook(&path)
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for the library and this binary.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
