//! Optional listing cache
//!
//! Stores read the file system on every call by default. When caching is
//! enabled, a store keeps its last listing here until something calls
//! [`ListingCache::invalidate`], e.g. the server's content watcher.

use std::sync::{Arc, Mutex, PoisonError};

/// A single cached listing, loaded on first use
#[derive(Debug)]
pub struct ListingCache<T> {
    slot: Mutex<Option<Arc<Vec<T>>>>,
}

impl<T> ListingCache<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Return the cached listing, running `load` if there is none.
    ///
    /// The lock is held while loading so concurrent callers wait for one
    /// scan. A failed load leaves the cache empty.
    pub fn get_or_load<E, F>(&self, load: F) -> Result<Arc<Vec<T>>, E>
    where
        F: FnOnce() -> Result<Vec<T>, E>,
    {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(items) = slot.as_ref() {
            return Ok(Arc::clone(items));
        }

        let items = Arc::new(load()?);
        *slot = Some(Arc::clone(&items));
        Ok(items)
    }

    /// Drop the cached listing
    pub fn invalidate(&self) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn is_populated(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl<T> Default for ListingCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
