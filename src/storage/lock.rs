use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::warn;

/// Exclusive marker file held while a league is being rewritten
pub struct LockFile {
    path: PathBuf,
}

impl LockFile {
    pub fn acquire(path: &Path) -> Result<Self> {
        let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                bail!(
                    "{} is locked by another ingestion; remove it if no ingestion is running",
                    path.display()
                )
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to create lock {}", path.display()));
            }
        };

        writeln!(file, "{}", std::process::id()).context("Failed to write lock file")?;

        Ok(Self {
            path: path.to_path_buf(),
        })
    }
}

impl Drop for LockFile {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!("Failed to release lock {}: {}", self.path.display(), e);
        }
    }
}
