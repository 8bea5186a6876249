//! Process-wide stack registry behind the C ABI
//!
//! C callers address stacks by bare integer handles, so there is exactly one
//! registry per process. It is built lazily on first use from
//! `RegistryConfig::from_env()` and guarded by a mutex: concurrent callers
//! are serialized rather than racing on the table.

use hstack_core::{MAX_STACKS_LIMIT, RegistryConfig, RegistryStats, StackRegistry, hstack_t};
use std::sync::{Mutex, OnceLock, PoisonError};
use tracing::info;

static REGISTRY: OnceLock<Mutex<StackRegistry>> = OnceLock::new();

// Every slot index must be representable as a raw handle
const _: () = assert!(MAX_STACKS_LIMIT <= hstack_t::MAX as usize + 1);

/// Get the process-wide registry
pub fn process_registry() -> &'static Mutex<StackRegistry> {
    REGISTRY.get_or_init(|| {
        let config = RegistryConfig::from_env();
        info!(max_stacks = config.max_stacks, "stack registry initialized");
        Mutex::new(StackRegistry::new(config))
    })
}

/// Run `f` with exclusive access to the process registry
///
/// A poisoned lock is recovered: every registry method leaves the table
/// consistent before it can panic.
pub fn with_registry<F, R>(f: F) -> R
where
    F: FnOnce(&mut StackRegistry) -> R,
{
    let mut guard = process_registry()
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    f(&mut guard)
}

/// Statistics of the process registry
pub fn registry_stats() -> RegistryStats {
    with_registry(|registry| registry.stats())
}

/// Destroy every stack in the process registry
///
/// For hosts that need to reset library state, e.g. between test cases.
pub fn clear_registry() {
    with_registry(StackRegistry::clear);
}
