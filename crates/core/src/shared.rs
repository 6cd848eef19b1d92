//! Thread-safe registry handle
//!
//! All calls, reads included, take one global lock. Booth registrations are
//! entered by hand at a market stall, so contention is not a concern.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{Error, Result};
use crate::models::{Booth, BoothId};
use crate::registry::{BoothRegistry, Decision};
use crate::stats::Statistics;

/// Cloneable handle to one registry shared between threads
#[derive(Debug, Clone)]
pub struct SharedRegistry {
    inner: Arc<Mutex<BoothRegistry>>,
}

impl SharedRegistry {
    pub fn new(registry: BoothRegistry) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, BoothRegistry>> {
        self.inner.lock().map_err(|_| Error::LockPoisoned)
    }

    /// Run a read-only closure against the registry
    pub fn read<T>(&self, f: impl FnOnce(&BoothRegistry) -> T) -> Result<T> {
        let guard = self.lock()?;
        Ok(f(&*guard))
    }

    pub fn all(&self) -> Result<Vec<Booth>> {
        self.read(BoothRegistry::all)
    }

    pub fn get(&self, id: BoothId) -> Result<Booth> {
        self.lock()?.get(id).cloned()
    }

    pub fn register(&self, id: BoothId, name: &str, description: &str) -> Result<Booth> {
        self.lock()?.register(id, name, description)
    }

    pub fn set_status(&self, id: BoothId, decision: Decision) -> Result<Booth> {
        self.lock()?.set_status(id, decision)
    }

    pub fn statistics(&self) -> Result<Statistics> {
        self.read(BoothRegistry::statistics)
    }
}
