//! Generational handles into a [`crate::mem::Pool`].
//!
//! A handle is a `{ index, generation }` pair. Looking a handle up in the pool that issued it
//! fails cleanly (returns `None`) if the slot has since been freed and reused, giving safe
//! use-after-free detection without reference counting.

use std::{fmt, marker::PhantomData};

/// The untyped, 64-bit wire form of a handle: `index` in the low 32 bits, `generation` in the
/// high 32 bits. All-zero is [`RawHandle::NULL`].
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
pub struct RawHandle(pub u64);

impl RawHandle {
    pub const NULL: Self = Self(0);

    pub fn new(index: u32, generation: u32) -> Self {
        // Generation zero is reserved so that an all-zero handle (`NULL`) never aliases a valid
        // slot; `Pool::add` starts every slot's generation at 1.
        debug_assert!(generation != 0 || index == 0, "generation 0 reserved for NULL");
        Self(((generation as u64) << 32) | index as u64)
    }

    pub fn index(self) -> u32 {
        self.0 as u32
    }

    pub fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for RawHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RawHandle({}#{})", self.index(), self.generation())
    }
}

/// A type-tagged handle into a `Pool<T>`. Carries no runtime cost over [`RawHandle`]; the `T`
/// parameter exists purely so the compiler rejects looking a `Handle<Texture>` up in a
/// `Pool<Mesh>`.
pub struct Handle<T> {
    raw: RawHandle,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    pub const NULL: Self = Self {
        raw: RawHandle::NULL,
        _marker: PhantomData,
    };

    pub(crate) fn from_raw(raw: RawHandle) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    pub fn raw(self) -> RawHandle {
        self.raw
    }

    pub fn is_null(self) -> bool {
        self.raw.is_null()
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for Handle<T> {}

impl<T> std::hash::Hash for Handle<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.raw.fmt(f)
    }
}

impl<T> Default for Handle<T> {
    fn default() -> Self {
        Self::NULL
    }
}
