//! hstack runtime: C ABI over a process-wide pool of byte stacks
//!
//! Exposes the `cstack.h` interface (`stack_new`, `stack_push`, ...) on top
//! of a single `hstack_core::StackRegistry`, plus a thread-local last-error
//! channel so C callers can tell a rejected call from an empty result.
//!
//! # Modules
//!
//! - `cstack`: the `cstack.h` entry points
//! - `error`: thread-local last-error slot and its FFI accessors
//! - `global`: the lazily built, mutex-guarded process registry

pub mod cstack;
pub mod error;
pub mod global;

// C entry points (exported for C linking)
pub use cstack::{stack_free, stack_new, stack_pop, stack_push, stack_size, stack_valid_handler};

// Error handling
pub use error::{
    clear_runtime_error, has_runtime_error, hstack_clear_error as clear_error,
    hstack_get_error as get_error, hstack_has_error as has_error,
    hstack_last_error_code as last_error_code, hstack_take_error as take_error,
    last_runtime_error, set_runtime_error, take_runtime_error,
};

pub use global::{clear_registry, process_registry, registry_stats, with_registry};

pub use hstack_core::{Handle, INVALID_HANDLE, StackError, hstack_t};
