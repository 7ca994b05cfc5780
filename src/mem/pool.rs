//! Generational pools: the "free-list with a generation bit" pattern from the C original,
//! expressed as `get(h) -> Option<&T>` / `get_mut(h) -> Option<&mut T>` instead of raw pointers.

use {
    super::handle::{Handle, RawHandle},
    crate::error::MemError,
    parking_lot::RwLock,
    std::marker::PhantomData,
};

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// A single-threaded generational pool.
///
/// `add` reuses the oldest freed slot if one exists (so `len()` stays close to the high-water
/// mark of concurrently-live items), otherwise it grows. `remove` clears the slot's value and
/// bumps its generation so that every handle obtained before the removal fails its lookup
/// forever after.
pub struct Pool<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Pool<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Inserts `value`, returning a handle that remains valid until the matching [`Self::remove`].
    pub fn add(&mut self, value: T) -> Handle<T> {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            Handle::from_raw(RawHandle::new(index, slot.generation))
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 1,
                value: Some(value),
            });
            Handle::from_raw(RawHandle::new(index, 1))
        }
    }

    /// Removes the value behind `handle`, if it is still live. Every handle derived from the
    /// same slot (i.e. every copy of `handle`) becomes stale as a result.
    pub fn remove(&mut self, handle: Handle<T>) -> Option<T> {
        let raw = handle.raw();
        let slot = self.slots.get_mut(raw.index() as usize)?;
        if slot.generation != raw.generation() {
            return None;
        }
        slot.generation = slot.generation.wrapping_add(1).max(1);
        self.free.push(raw.index());
        slot.value.take()
    }

    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        let raw = handle.raw();
        let slot = self.slots.get(raw.index() as usize)?;
        if slot.generation != raw.generation() {
            return None;
        }
        slot.value.as_ref()
    }

    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        let raw = handle.raw();
        let slot = self.slots.get_mut(raw.index() as usize)?;
        if slot.generation != raw.generation() {
            return None;
        }
        slot.value.as_mut()
    }

    pub fn try_get(&self, handle: Handle<T>) -> Result<&T, MemError> {
        self.get(handle).ok_or(MemError::Stale)
    }

    /// Iterates over every currently-live `(Handle, &T)` pair; freed slots are skipped.
    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value.as_ref().map(|value| {
                (
                    Handle::from_raw(RawHandle::new(index as u32, slot.generation)),
                    value,
                )
            })
        })
    }

    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A pool safe to share across threads.
///
/// `add`/`remove` serialize behind a single `RwLock` write guard (mirroring the original's
/// mutex around the free-list); `get` takes the lock's read mode, which multiple readers may
/// hold concurrently and which never blocks a reader behind another reader.
pub struct ConcurrentPool<T> {
    inner: RwLock<Pool<T>>,
}

impl<T> ConcurrentPool<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Pool::new()),
        }
    }

    pub fn add(&self, value: T) -> Handle<T> {
        self.inner.write().add(value)
    }

    pub fn remove(&self, handle: Handle<T>) -> Option<T>
    where
        T: Send,
    {
        self.inner.write().remove(handle)
    }

    pub fn get_cloned(&self, handle: Handle<T>) -> Option<T>
    where
        T: Clone,
    {
        self.inner.read().get(handle).cloned()
    }

    pub fn with<R>(&self, handle: Handle<T>, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.inner.read().get(handle).map(f)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for ConcurrentPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_fails_after_remove() {
        let mut pool = Pool::new();
        let h = pool.add(42);
        assert_eq!(pool.get(h), Some(&42));
        pool.remove(h);
        assert_eq!(pool.get(h), None);
    }

    #[test]
    fn reused_slot_gets_new_generation() {
        let mut pool = Pool::new();
        let a = pool.add(1);
        pool.remove(a);
        let b = pool.add(2);
        assert_eq!(a.raw().index(), b.raw().index());
        assert_ne!(a.raw().generation(), b.raw().generation());
        assert_eq!(pool.get(a), None);
        assert_eq!(pool.get(b), Some(&2));
    }

    #[test]
    fn iter_skips_freed_slots() {
        let mut pool = Pool::new();
        let a = pool.add(10);
        let _b = pool.add(20);
        pool.remove(a);
        let values: Vec<_> = pool.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![20]);
    }

    #[test]
    fn concurrent_pool_get_never_sees_torn_state() {
        let pool = ConcurrentPool::new();
        let h = pool.add(7);
        assert_eq!(pool.with(h, |v| *v), Some(7));
    }
}
