use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ubl_logging::{ubl_error, ubl_info, ubl_warn};

use crate::persist::{AtomicFileWriter, PersistError};

/// Last-known-good raw payload, kept in a single file.
///
/// Neither operation ever fails the caller: problems are logged and the
/// cycle carries on with whatever it has.
#[derive(Debug, Clone)]
pub struct BackupStore {
    path: PathBuf,
}

/// What a raw read of the backup found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupContents {
    /// The file's bytes, exactly as stored.
    Present(Vec<u8>),
    Missing,
    /// The file exists but could not be read.
    Unreadable,
}

impl BackupContents {
    /// The payload as text. Missing and unreadable backups are empty.
    pub fn text(&self) -> String {
        match self {
            BackupContents::Present(bytes) => match std::str::from_utf8(bytes) {
                Ok(text) => text.to_owned(),
                Err(_) => {
                    ubl_warn!("UBL backup is not valid UTF-8; decoding lossily");
                    String::from_utf8_lossy(bytes).into_owned()
                }
            },
            BackupContents::Missing | BackupContents::Unreadable => String::new(),
        }
    }
}

impl BackupStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole backup, or an empty payload if there is none.
    pub fn load(&self) -> String {
        self.load_raw().text()
    }

    /// Read the backup without decoding it.
    pub fn load_raw(&self) -> BackupContents {
        match fs::read(&self.path) {
            Ok(bytes) => {
                ubl_info!("UBL loaded from local backup {:?}", self.path);
                BackupContents::Present(bytes)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                ubl_error!(
                    "The backup file {:?} could not be located. You are running without UBL protection!",
                    self.path
                );
                BackupContents::Missing
            }
            Err(err) => {
                ubl_error!(
                    "Could not load UBL backup {:?}: {}. You are running without UBL protection!",
                    self.path,
                    err
                );
                BackupContents::Unreadable
            }
        }
    }

    /// Overwrite the backup with `payload`. Failures are logged only.
    pub fn save(&self, payload: &str) {
        self.save_bytes(payload.as_bytes());
    }

    /// Overwrite the backup with `payload` byte for byte. Returns whether the
    /// write succeeded; failures are logged.
    pub fn save_bytes(&self, payload: &[u8]) -> bool {
        match self.try_save(payload) {
            Ok(()) => true,
            Err(err) => {
                ubl_error!("Failed to save UBL backup to {:?}: {}", self.path, err);
                false
            }
        }
    }

    fn try_save(&self, payload: &[u8]) -> Result<(), PersistError> {
        let (dir, filename) = match (self.path.parent(), self.path.file_name()) {
            (Some(dir), Some(name)) => (dir, name.to_string_lossy()),
            _ => {
                return Err(PersistError::DataDir {
                    path: self.path.clone(),
                    reason: "backup path has no file name".into(),
                })
            }
        };
        let dir = if dir.as_os_str().is_empty() {
            Path::new(".")
        } else {
            dir
        };
        AtomicFileWriter::new(dir.to_path_buf()).write(&filename, payload)?;
        Ok(())
    }
}
