use std::cell::{Cell, RefCell};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde_json::Error as SerdeError;

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "TourPlanner";
const APP_NAME: &str = "TourPlanner";

/// Overrides the default state file location.
pub const STATE_FILE_ENV: &str = "TOUR_PLANNER_STATE_FILE";

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("storage directory unavailable")]
    StorageUnavailable,
    #[error("backend rejected the write")]
    WriteRejected,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] SerdeError),
}

/// Where the serialized catalog lives between sessions.
pub trait StateBackend {
    /// The stored record, or `None` when nothing was ever written.
    fn read(&self) -> Result<Option<String>, PersistError>;
    fn write(&self, contents: &str) -> Result<(), PersistError>;
    fn describe(&self) -> String;
}

impl<B: StateBackend + ?Sized> StateBackend for &B {
    fn read(&self) -> Result<Option<String>, PersistError> {
        (**self).read()
    }

    fn write(&self, contents: &str) -> Result<(), PersistError> {
        (**self).write(contents)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// One pretty-printed JSON file on disk.
#[derive(Clone, Debug)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$TOUR_PLANNER_STATE_FILE`, else `state.json` in the platform config dir.
    pub fn from_env() -> Result<Self, PersistError> {
        if let Some(path) = std::env::var_os(STATE_FILE_ENV).filter(|value| !value.is_empty()) {
            return Ok(Self::new(path));
        }
        default_state_file()
            .map(Self::new)
            .ok_or(PersistError::StorageUnavailable)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn default_state_file() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join("state.json"))
}

impl StateBackend for JsonFileBackend {
    fn read(&self) -> Result<Option<String>, PersistError> {
        match fs::read_to_string(&self.path) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&self, contents: &str) -> Result<(), PersistError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        // Temp file + rename keeps the write atomic.
        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, contents)?;
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Process-local storage, for tests and embedders without a filesystem.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    contents: RefCell<Option<String>>,
    fail_writes: Cell<bool>,
    writes: Cell<usize>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: impl Into<String>) -> Self {
        let backend = Self::default();
        backend.contents.replace(Some(contents.into()));
        backend
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }

    /// Make every subsequent write fail until switched back.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl StateBackend for MemoryBackend {
    fn read(&self) -> Result<Option<String>, PersistError> {
        Ok(self.contents())
    }

    fn write(&self, contents: &str) -> Result<(), PersistError> {
        if self.fail_writes.get() {
            return Err(PersistError::WriteRejected);
        }
        self.contents.replace(Some(contents.to_string()));
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
