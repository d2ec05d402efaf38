//! Shared access to a [`TemplateDatabase`] across threads.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::{DatabaseConfig, Result, TemplateDatabase};

/// A template database behind a single lock.
///
/// The arena, the name map and the master templates reference each other,
/// so they are locked together.
#[derive(Debug, Clone)]
pub struct SharedDatabase {
    inner: Arc<Mutex<TemplateDatabase>>,
}

impl SharedDatabase {
    pub fn new(database: TemplateDatabase) -> Self {
        Self {
            inner: Arc::new(Mutex::new(database)),
        }
    }

    pub fn open(config: DatabaseConfig) -> Result<Self> {
        TemplateDatabase::open(config).map(Self::new)
    }

    /// Lock the database for the lifetime of the guard.
    pub fn lock(&self) -> MutexGuard<'_, TemplateDatabase> {
        self.inner.lock()
    }

    /// Run `f` with the database locked.
    pub fn with<R>(&self, f: impl FnOnce(&mut TemplateDatabase) -> R) -> R {
        f(&mut self.inner.lock())
    }
}
