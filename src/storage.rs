// Manages the on-disk record of the last observed appointment set.
//
// The record is a plain JSON array of ISO-8601 local date-times without a
// timezone suffix, e.g. ["2025-11-19T07:30:00", "2025-11-01T08:00:00"].
// The shape is fixed; do not wrap it in a versioned envelope.
use crate::appointment::AppointmentSet;
use crate::context::AppContext;
use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs;
use std::path::{Path, PathBuf};

/// Durable record of the appointment set seen by the previous run.
pub trait DateStore {
    /// Last persisted set. Missing or unreadable records read as empty.
    fn load(&self) -> AppointmentSet;

    /// Replaces the persisted set with `set` (no merge).
    fn save(&mut self, set: &AppointmentSet) -> Result<()>;
}

/// Filesystem helpers shared by every file this crate writes.
pub struct LocalStorage;

impl LocalStorage {
    fn get_lock_path(file_path: &Path) -> PathBuf {
        let mut lock_path = file_path.to_path_buf();
        if let Some(ext) = lock_path.extension() {
            let mut new_ext = ext.to_os_string();
            new_ext.push(".lock");
            lock_path.set_extension(new_ext);
        } else {
            lock_path.set_extension("lock");
        }
        lock_path
    }

    /// Runs `f` while holding an exclusive advisory lock next to `file_path`.
    pub fn with_lock<F, T>(file_path: &Path, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let lock_path = Self::get_lock_path(file_path);
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file {:?}", lock_path))?;

        file.lock_exclusive()?;
        let result = f();
        file.unlock()?;
        result
    }

    /// Atomic write: Write to .tmp file then rename
    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
        let path = path.as_ref();
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(tmp_path, path)?;
        Ok(())
    }
}

/// `DateStore` backed by `last_dates.json` in the data directory.
#[derive(Debug, Clone)]
pub struct FileDateStore {
    path: PathBuf,
}

impl FileDateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store located through the given context.
    pub fn from_context(ctx: &dyn AppContext) -> Result<Self> {
        Ok(Self::new(ctx.get_state_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Deletes the record so the next run starts from an empty set.
    pub fn clear(&self) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        LocalStorage::with_lock(&self.path, || {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove {:?}", self.path))?;
            Ok(())
        })
    }

    fn read(&self) -> Result<AppointmentSet> {
        LocalStorage::with_lock(&self.path, || {
            let json = fs::read_to_string(&self.path)?;
            let set: AppointmentSet = serde_json::from_str(&json)?;
            Ok(set)
        })
    }
}

impl DateStore for FileDateStore {
    fn load(&self) -> AppointmentSet {
        if !self.path.exists() {
            return AppointmentSet::new();
        }
        match self.read() {
            Ok(set) => set,
            Err(e) => {
                log::warn!(
                    "Ignoring unreadable state file {:?}: {:#}",
                    self.path,
                    e
                );
                AppointmentSet::new()
            }
        }
    }

    fn save(&mut self, set: &AppointmentSet) -> Result<()> {
        LocalStorage::with_lock(&self.path, || {
            let json = serde_json::to_string(set)?;
            LocalStorage::atomic_write(&self.path, json)?;
            Ok(())
        })
        .with_context(|| format!("Failed to save state to {:?}", self.path))
    }
}

/// In-memory `DateStore`; counts saves so callers can see the side effect.
#[derive(Debug, Clone, Default)]
pub struct MemoryDateStore {
    pub dates: AppointmentSet,
    pub saves: usize,
}

impl MemoryDateStore {
    pub fn with_dates(dates: AppointmentSet) -> Self {
        Self { dates, saves: 0 }
    }
}

impl DateStore for MemoryDateStore {
    fn load(&self) -> AppointmentSet {
        self.dates.clone()
    }

    fn save(&mut self, set: &AppointmentSet) -> Result<()> {
        self.dates = set.clone();
        self.saves += 1;
        Ok(())
    }
}
