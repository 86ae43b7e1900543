//! Shared handle to the CSV storage directory.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Points the CSV repositories at a common base directory.
///
/// Cloning is cheap; clones share the same directory.
#[derive(Debug, Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
}

impl CsvConnection {
    /// Open a connection rooted at `base_directory`, creating the
    /// directory if it does not exist.
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_directory = base_directory.as_ref().to_path_buf();
        if !base_directory.exists() {
            fs::create_dir_all(&base_directory)?;
        }
        Ok(Self { base_directory })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn transactions_path(&self) -> PathBuf {
        self.base_directory.join("transactions.csv")
    }

    pub fn settings_path(&self) -> PathBuf {
        self.base_directory.join("settings.csv")
    }

    pub fn households_path(&self) -> PathBuf {
        self.base_directory.join("households.csv")
    }

    pub fn memberships_path(&self) -> PathBuf {
        self.base_directory.join("memberships.csv")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("ledger").join("data");
        assert!(!nested.exists());

        let connection = CsvConnection::new(&nested).unwrap();
        assert!(nested.exists());
        assert_eq!(connection.base_directory(), nested.as_path());
        assert_eq!(
            connection.transactions_path(),
            nested.join("transactions.csv")
        );
    }
}
