//! Stack handles
//!
//! A handle is the index of a registry slot. Across the C ABI it travels as a
//! plain `c_int` where `-1` means "no handle"; inside Rust it is a `Handle`
//! newtype so a raw integer can never be used to index the table unchecked.

/// Raw handle type used across the C ABI (`hstack_t` in `cstack.h`)
#[allow(non_camel_case_types)]
pub type hstack_t = std::os::raw::c_int;

/// Raw value returned when no handle could be produced
pub const INVALID_HANDLE: hstack_t = -1;

/// Index of a live stack inside a `StackRegistry`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Handle(usize);

impl Handle {
    #[inline]
    pub(crate) const fn new(index: usize) -> Self {
        Handle(index)
    }

    /// Slot index inside the registry
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }

    /// Convert a raw C handle, rejecting negative values
    ///
    /// A `Some` result is only a well-formed index; whether it names a live
    /// stack is up to the registry (`StackRegistry::is_valid`).
    #[inline]
    pub fn from_raw(raw: hstack_t) -> Option<Self> {
        usize::try_from(raw).ok().map(Handle)
    }

    /// Convert to the raw C representation
    ///
    /// Indices that do not fit a `c_int` map to `INVALID_HANDLE`.
    #[inline]
    pub fn into_raw(self) -> hstack_t {
        hstack_t::try_from(self.0).unwrap_or(INVALID_HANDLE)
    }
}

impl std::fmt::Display for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
