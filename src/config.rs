//! Configuration file handling for lieu.
//!
//! The configuration file is stored at `$LIEU_HOME/config.json`. It holds backup settings, the
//! default `entered_by` name and the path of the last workbook used, so that `--workbook` can be
//! omitted on later runs.

use crate::backup::Backup;
use crate::error::{ErrorType, IntoResult, Res};
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "lieu";
const CONFIG_VERSION: u8 = 1;
const BACKUP_COPIES: u32 = 5;
const BACKUPS: &str = ".backups";
const CONFIG_JSON: &str = "config.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$LIEU_HOME` and from there it loads `$LIEU_HOME/config.json`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    backups: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the data directory and its `.backups` subdirectory, then writes an initial
    /// `config.json` with default settings. An existing `config.json` is loaded and kept rather
    /// than overwritten.
    ///
    /// # Errors
    /// - Returns an error if any file operations fail.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        Self::make(dir.into()).pub_result(ErrorType::Config)
    }

    fn make(maybe_relative: PathBuf) -> Res<Self> {
        utils::make_dir(&maybe_relative).context("Unable to create the lieu home directory")?;
        let root = utils::canonicalize(&maybe_relative)?;

        let backups = root.join(BACKUPS);
        utils::make_dir(&backups)?;

        let config_path = root.join(CONFIG_JSON);
        let config_file = if config_path.is_file() {
            ConfigFile::load(&config_path)?
        } else {
            let config_file = ConfigFile::default();
            config_file.save(&config_path)?;
            config_file
        };

        Ok(Self {
            root,
            backups,
            config_path,
            config_file,
        })
    }

    /// This will
    /// - validate that `lieu_home` exists and that the config file exists
    /// - load the config file
    /// - validate that the backups directory exists
    /// - return the loaded configuration object
    pub fn load(lieu_home: impl Into<PathBuf>) -> Result<Self> {
        Self::read(lieu_home.into()).pub_result(ErrorType::Config)
    }

    fn read(maybe_relative: PathBuf) -> Res<Self> {
        let root = utils::canonicalize(&maybe_relative)
            .context("Lieu Home is missing, run 'lieu init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path)?;

        let config = Self {
            root: root.clone(),
            backups: root.join(BACKUPS),
            config_path,
            config_file,
        };
        if !config.backups.is_dir() {
            bail!(
                "The backups directory is missing '{}'",
                config.backups.display()
            )
        }
        Ok(config)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn backups(&self) -> &Path {
        &self.backups
    }

    pub fn backup_copies(&self) -> u32 {
        self.config_file.backup_copies
    }

    /// The default for `add --entered-by`.
    pub fn entered_by(&self) -> Option<&str> {
        self.config_file.entered_by.as_deref()
    }

    /// The workbook used by the most recent successful command.
    pub fn last_workbook(&self) -> Option<&Path> {
        self.config_file.last_workbook.as_deref()
    }

    /// Picks the workbook to operate on: `arg` when given, otherwise the last one used.
    pub fn workbook_path(&self, arg: Option<&Path>) -> Result<PathBuf> {
        let path = match arg.or(self.last_workbook()) {
            Some(path) => utils::absolute(path),
            None => Err(anyhow::anyhow!(
                "No workbook given. Pass --workbook (or set LIEU_WORKBOOK); it will be remembered \
                for later runs"
            )),
        };
        path.pub_result(ErrorType::Config)
    }

    /// Remembers `path` as the last workbook and saves the config file if it changed.
    pub fn set_last_workbook(&mut self, path: &Path) -> Result<()> {
        if self.last_workbook() == Some(path) {
            return Ok(());
        }
        self.config_file.last_workbook = Some(path.to_path_buf());
        self.config_file
            .save(&self.config_path)
            .pub_result(ErrorType::Config)
    }

    /// Creates a new `Backup` instance for managing backup files.
    pub fn backup(&self) -> Backup {
        Backup::new(self)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "lieu",
///   "config_version": 1,
///   "backup_copies": 5,
///   "last_workbook": "/home/pat/leave.xlsx",
///   "entered_by": "Pat"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "lieu"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Number of backup copies to keep per workbook
    backup_copies: u32,

    /// The workbook used by the most recent successful command
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_workbook: Option<PathBuf>,

    /// Default name recorded in the `Entered By` column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    entered_by: Option<String>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            backup_copies: BACKUP_COPIES,
            last_workbook: None,
            entered_by: None,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    fn load(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path)?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    fn save(&self, path: impl AsRef<Path>) -> Res<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data).context("Unable to write config file")
    }
}
