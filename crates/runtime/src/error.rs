//! Last-error channel for the C ABI
//!
//! The C functions keep the original sentinel contract (`-1`, `0`, silent
//! no-op), which cannot tell "popped nothing" from "rejected". Each entry
//! point therefore clears this thread-local slot on entry and records the
//! `StackError` when it rejects the call.
//!
//! # Usage
//!
//! ```ignore
//! let n = stack_pop(h, buf.as_mut_ptr().cast(), 16);
//! if n == 0 && hstack_has_error() {
//!     let code = hstack_last_error_code();
//!     // Handle error...
//! }
//! ```

use hstack_core::StackError;
use std::cell::RefCell;
use std::ffi::{CString, c_char, c_int};
use std::ptr;

thread_local! {
    /// Thread-local storage for the last rejected call
    static LAST_ERROR: RefCell<Option<(&'static str, StackError)>> = const { RefCell::new(None) };

    /// Cached C string for FFI access (keeps returned pointers alive)
    static ERROR_CSTRING: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Record that `op` rejected its call with `err`
pub fn set_runtime_error(op: &'static str, err: StackError) {
    // Clear cached CString first to prevent stale pointers
    ERROR_CSTRING.with(|cs| *cs.borrow_mut() = None);
    LAST_ERROR.with(|e| *e.borrow_mut() = Some((op, err)));
}

/// Take (and clear) the last error
pub fn take_runtime_error() -> Option<StackError> {
    LAST_ERROR.with(|e| e.borrow_mut().take()).map(|(_, err)| err)
}

/// Peek at the last error without clearing it
pub fn last_runtime_error() -> Option<StackError> {
    LAST_ERROR.with(|e| (*e.borrow()).map(|(_, err)| err))
}

/// Check if there's a pending error
pub fn has_runtime_error() -> bool {
    LAST_ERROR.with(|e| e.borrow().is_some())
}

/// Clear any pending error
pub fn clear_runtime_error() {
    LAST_ERROR.with(|e| *e.borrow_mut() = None);
    ERROR_CSTRING.with(|e| *e.borrow_mut() = None);
}

/// Stable numeric code for each error kind (0 = no error)
pub fn error_code(err: &StackError) -> c_int {
    match err {
        StackError::InvalidHandle => 1,
        StackError::NullBuffer => 2,
        StackError::ZeroLength => 3,
        StackError::SizeMismatch { .. } => 4,
        StackError::CapacityExhausted { .. } => 5,
        StackError::AllocationFailure { .. } => 6,
        StackError::EmptyStackUnderflow => 7,
        StackError::BufferTooSmall { .. } => 8,
    }
}

/// Cache `op: message` as a C string and return a pointer into the cache
fn cache_message(op: &str, err: &StackError) -> *const c_char {
    ERROR_CSTRING.with(|cs| {
        // Error messages are built from our own Display impls, which
        // never contain interior NULs; fall back to a fixed text anyway.
        let cstring = CString::new(format!("{}: {}", op, err))
            .unwrap_or_else(|_| CString::from(c"stack error"));
        let ptr = cstring.as_ptr();
        *cs.borrow_mut() = Some(cstring);
        ptr
    })
}

// FFI-safe error access functions

/// Check if the last call on this thread was rejected (FFI-safe)
#[unsafe(no_mangle)]
pub extern "C" fn hstack_has_error() -> bool {
    has_runtime_error()
}

/// Numeric code of the last error, 0 if none (FFI-safe)
#[unsafe(no_mangle)]
pub extern "C" fn hstack_last_error_code() -> c_int {
    last_runtime_error().map_or(0, |err| error_code(&err))
}

/// Get the last error message as a C string pointer (FFI-safe)
///
/// Returns null if no error is pending.
///
/// # WARNING: Pointer Lifetime
/// The returned pointer is only valid until the next call into this library
/// on the same thread. Callers must copy the string immediately if they
/// need to retain it.
#[unsafe(no_mangle)]
pub extern "C" fn hstack_get_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some((op, err)) => cache_message(op, err),
        None => ptr::null(),
    })
}

/// Take (and clear) the last error, returning it as a C string (FFI-safe)
///
/// Returns null if no error is pending. Same pointer lifetime rules as
/// `hstack_get_error`.
#[unsafe(no_mangle)]
pub extern "C" fn hstack_take_error() -> *const c_char {
    match LAST_ERROR.with(|e| e.borrow_mut().take()) {
        Some((op, err)) => cache_message(op, &err),
        None => ptr::null(),
    }
}

/// Clear any pending error (FFI-safe)
#[unsafe(no_mangle)]
pub extern "C" fn hstack_clear_error() {
    clear_runtime_error();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    #[test]
    fn test_set_and_take_error() {
        clear_runtime_error();
        assert!(!has_runtime_error());

        set_runtime_error("stack_pop", StackError::EmptyStackUnderflow);
        assert!(has_runtime_error());
        assert_eq!(last_runtime_error(), Some(StackError::EmptyStackUnderflow));

        let error = take_runtime_error();
        assert_eq!(error, Some(StackError::EmptyStackUnderflow));
        assert!(!has_runtime_error());
    }

    #[test]
    fn test_clear_error() {
        set_runtime_error("stack_push", StackError::ZeroLength);
        assert!(hstack_has_error());

        hstack_clear_error();
        assert!(!hstack_has_error());
        assert!(take_runtime_error().is_none());
        assert_eq!(hstack_last_error_code(), 0);
    }

    #[test]
    fn test_error_message_pointer() {
        set_runtime_error("stack_new", StackError::CapacityExhausted { capacity: 20 });
        assert_eq!(hstack_last_error_code(), 5);

        let msg = unsafe { CStr::from_ptr(hstack_get_error()) };
        assert_eq!(msg.to_str().unwrap(), "stack_new: all 20 stack slots are in use");
        assert!(hstack_has_error());

        let msg = unsafe { CStr::from_ptr(hstack_take_error()) };
        assert_eq!(msg.to_str().unwrap(), "stack_new: all 20 stack slots are in use");
        assert!(!hstack_has_error());
        assert!(hstack_take_error().is_null());
        assert!(hstack_get_error().is_null());
    }

    #[test]
    fn test_error_codes_are_distinct() {
        let errors = [
            StackError::InvalidHandle,
            StackError::NullBuffer,
            StackError::ZeroLength,
            StackError::SizeMismatch {
                expected: 1,
                actual: 2,
            },
            StackError::CapacityExhausted { capacity: 1 },
            StackError::AllocationFailure { requested: 1 },
            StackError::EmptyStackUnderflow,
            StackError::BufferTooSmall {
                needed: 2,
                available: 1,
            },
        ];
        let mut codes: Vec<c_int> = errors.iter().map(error_code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
        assert!(codes.iter().all(|&c| c > 0));
    }
}
