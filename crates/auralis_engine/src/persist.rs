use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("record directory missing or not writable: {0}")]
    RecordDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure the record directory exists; create if missing.
pub fn ensure_record_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::RecordDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::RecordDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::RecordDir(e.to_string()))?;
    }
    Ok(())
}

/// A directory of small named records. Writes go to a temp file first and
/// are renamed into place, so readers never see a half-written record.
#[derive(Debug, Clone)]
pub struct RecordFiles {
    dir: PathBuf,
}

impl RecordFiles {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// `Ok(None)` when the record does not exist.
    pub fn read(&self, name: &str) -> Result<Option<String>, PersistError> {
        match fs::read_to_string(self.dir.join(name)) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub fn write(&self, name: &str, content: &str) -> Result<PathBuf, PersistError> {
        ensure_record_dir(&self.dir)?;

        let target = self.dir.join(name);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        // persist() renames over an existing record.
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }

    /// Deletes the record. A missing record is not an error.
    pub fn remove(&self, name: &str) -> Result<(), PersistError> {
        match fs::remove_file(self.dir.join(name)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
