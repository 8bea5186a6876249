//! C ABI matching `cstack.h`
//!
//! ```c
//! typedef int hstack_t;
//!
//! hstack_t     stack_new(void);
//! void         stack_free(const hstack_t stack);
//! int          stack_valid_handler(const hstack_t stack);
//! unsigned int stack_size(const hstack_t stack);
//! void         stack_push(const hstack_t stack, const void* data_in, const unsigned int size);
//! unsigned int stack_pop(const hstack_t stack, void* data_out, const unsigned int size);
//! ```
//!
//! Return conventions are kept as C callers expect them: `-1` for "no
//! handle", `0` for "nothing popped", silent no-ops for rejected pushes and
//! frees. Every call clears the thread's last error on entry and records the
//! `StackError` when it rejects the call (see `crate::error`).
//!
//! Handles are bounds-checked before the table is touched, so garbage
//! handle values are rejected instead of reading past the table.

use crate::error::{clear_runtime_error, set_runtime_error};
use crate::global::with_registry;
use hstack_core::{Handle, INVALID_HANDLE, StackError, StackRegistry, hstack_t};
use std::ffi::{c_int, c_uint, c_void};

/// Resolve a raw handle to a live stack
fn resolve(registry: &StackRegistry, raw: hstack_t) -> Result<Handle, StackError> {
    Handle::from_raw(raw)
        .filter(|&handle| registry.is_valid(handle))
        .ok_or(StackError::InvalidHandle)
}

/// Clear the last error, run `f`, record its error if any
fn ffi_call<T>(op: &'static str, f: impl FnOnce() -> Result<T, StackError>) -> Option<T> {
    clear_runtime_error();
    match f() {
        Ok(value) => Some(value),
        Err(err) => {
            set_runtime_error(op, err);
            None
        }
    }
}

/// Create a new empty stack
///
/// Returns its handle, or `-1` when every slot is taken.
#[unsafe(no_mangle)]
pub extern "C" fn stack_new() -> hstack_t {
    ffi_call("stack_new", || with_registry(StackRegistry::create))
        .map_or(INVALID_HANDLE, Handle::into_raw)
}

/// Destroy a stack and every element on it
///
/// Invalid handles are ignored.
#[unsafe(no_mangle)]
pub extern "C" fn stack_free(hstack: hstack_t) {
    ffi_call("stack_free", || {
        with_registry(|registry| {
            let handle = resolve(registry, hstack)?;
            registry.destroy(handle)
        })
    });
}

/// Check a handle
///
/// Returns `0` if the handle names a live stack, `1` otherwise. A query, so
/// an invalid handle is not recorded as an error.
#[unsafe(no_mangle)]
pub extern "C" fn stack_valid_handler(hstack: hstack_t) -> c_int {
    clear_runtime_error();
    let valid = with_registry(|registry| resolve(registry, hstack).is_ok());
    if valid { 0 } else { 1 }
}

/// Number of elements on the stack, `0` for an invalid handle
#[unsafe(no_mangle)]
pub extern "C" fn stack_size(hstack: hstack_t) -> c_uint {
    ffi_call("stack_size", || {
        with_registry(|registry| {
            let handle = resolve(registry, hstack)?;
            Ok(registry.size(handle))
        })
    })
    .map_or(0, |size| c_uint::try_from(size).unwrap_or(c_uint::MAX))
}

/// Copy `size` bytes from `data_in` onto the stack
///
/// Ignored when the handle is invalid, `data_in` is null, `size` is 0, or
/// the element cannot be allocated.
///
/// # Safety
/// `data_in` must be null or point to at least `size` readable bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn stack_push(hstack: hstack_t, data_in: *const c_void, size: c_uint) {
    ffi_call("stack_push", || {
        with_registry(|registry| {
            let handle = resolve(registry, hstack)?;
            if data_in.is_null() {
                return Err(StackError::NullBuffer);
            }
            if size == 0 {
                return Err(StackError::ZeroLength);
            }
            let data = unsafe { std::slice::from_raw_parts(data_in.cast::<u8>(), size as usize) };
            registry.push(handle, data)
        })
    });
}

/// Pop the top element into `data_out`
///
/// The top element must be exactly `size` bytes long. Returns the number of
/// bytes written, or `0` when the call was rejected (invalid handle, null
/// buffer, zero size, empty stack, length mismatch); the stack is then
/// unchanged.
///
/// # Safety
/// `data_out` must be null or point to at least `size` writable bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn stack_pop(
    hstack: hstack_t,
    data_out: *mut c_void,
    size: c_uint,
) -> c_uint {
    ffi_call("stack_pop", || {
        with_registry(|registry| {
            let handle = resolve(registry, hstack)?;
            if data_out.is_null() {
                return Err(StackError::NullBuffer);
            }
            if size == 0 {
                return Err(StackError::ZeroLength);
            }
            let out =
                unsafe { std::slice::from_raw_parts_mut(data_out.cast::<u8>(), size as usize) };
            registry.pop_into(handle, out, size as usize)
        })
    })
    // The written length equals `size`, so it fits a c_uint
    .map_or(0, |written| written as c_uint)
}
