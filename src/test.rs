//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::api::{MemoryStorage, Storage, XlsxStorage};
use crate::Config;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test environment that sets up a lieu home directory with a Config. Holds TempDir to keep the
/// directory alive for the duration of the test.
pub struct TestEnv {
    temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    /// Creates a test environment with a fresh lieu home and no workbook.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::create(temp_dir.path().join("lieu")).unwrap();
        Self { temp_dir, config }
    }

    /// Creates a test environment and writes the seeded `MemoryStorage` workbook to
    /// `workbook_path()`.
    pub fn seeded() -> Self {
        let env = Self::new();
        let seed = MemoryStorage::default();
        XlsxStorage::new(env.workbook_path())
            .save(seed.book())
            .unwrap();
        env
    }

    /// Returns a clone of the Config.
    pub fn config(&self) -> Config {
        self.config.clone()
    }

    /// The temporary directory everything lives under.
    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Where the workbook for this environment lives. It only exists after `seeded` or after a
    /// command has saved it.
    pub fn workbook_path(&self) -> PathBuf {
        self.dir().join("leave.xlsx")
    }
}
