//! Handle table - native objects addressed by opaque ids
//!
//! Ids are issued from a monotonic counter and never reused, so a released
//! handle can never alias a newer object. Removing an entry is the single
//! point of release; a second removal finds nothing and reports
//! `DisposedHandle`.

use crate::errors::{BridgeError, Result};
use crate::interop::NativeHandle;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

pub struct HandleTable<T> {
    kind: &'static str,
    entries: DashMap<u64, T>,
    next_id: AtomicU64,
    live: AtomicUsize,
}

impl<T> HandleTable<T> {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: DashMap::new(),
            next_id: AtomicU64::new(1),
            live: AtomicUsize::new(0),
        }
    }

    #[inline]
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Store `value`, failing if `limit` entries are already live
    pub fn insert(&self, value: T, limit: usize) -> Result<NativeHandle> {
        self.live
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |live| {
                (live < limit).then_some(live + 1)
            })
            .map_err(|live| {
                BridgeError::allocation(
                    self.kind,
                    format!("{} live handles, limit is {}", live, limit),
                )
            })?;

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.entries.insert(id, value);
        Ok(NativeHandle::from_raw(id))
    }

    /// Run `f` against a live entry
    pub fn with<R>(&self, handle: NativeHandle, f: impl FnOnce(&T) -> R) -> Result<R> {
        let id = handle.non_null()?.as_raw();
        let entry = self.entries.get(&id).ok_or_else(|| BridgeError::disposed(id))?;
        Ok(f(entry.value()))
    }

    /// Run `f` against a live entry with exclusive access
    pub fn with_mut<R>(&self, handle: NativeHandle, f: impl FnOnce(&mut T) -> R) -> Result<R> {
        let id = handle.non_null()?.as_raw();
        let mut entry = self.entries.get_mut(&id).ok_or_else(|| BridgeError::disposed(id))?;
        Ok(f(entry.value_mut()))
    }

    /// Take the entry out of the table, ending the handle's validity
    pub fn remove(&self, handle: NativeHandle) -> Result<T> {
        let id = handle.non_null()?.as_raw();
        let (_, value) = self.entries.remove(&id).ok_or_else(|| BridgeError::disposed(id))?;
        self.live.fetch_sub(1, Ordering::AcqRel);
        Ok(value)
    }

    pub fn contains(&self, handle: NativeHandle) -> bool {
        !handle.is_null() && self.entries.contains_key(&handle.as_raw())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.live.load(Ordering::Acquire)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Release every live entry, returning how many there were
    pub fn clear(&self) -> usize {
        let ids: Vec<u64> = self.entries.iter().map(|entry| *entry.key()).collect();
        ids.into_iter()
            .filter(|id| self.remove(NativeHandle::from_raw(*id)).is_ok())
            .count()
    }
}
