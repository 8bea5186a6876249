//! Registry occupancy statistics
//!
//! A snapshot computed on demand by `StackRegistry::stats`. Element and byte
//! totals are summed over the live stacks; the peak and overflow counters
//! are maintained by the registry itself.

use serde::{Deserialize, Serialize};

/// Aggregated statistics across all live stacks of a registry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStats {
    /// Number of slots in the handle table
    pub capacity: usize,
    /// Slots currently holding a stack
    pub live_stacks: usize,
    /// Elements across all live stacks (sentinels excluded)
    pub total_elements: usize,
    /// Payload bytes across all live stacks
    pub total_payload_bytes: usize,
    /// High-water mark of `live_stacks`
    pub peak_live_stacks: usize,
    /// Creates rejected because every slot was taken
    pub overflow_count: u64,
}

impl RegistryStats {
    /// Slots still available to `create`
    pub fn free_slots(&self) -> usize {
        self.capacity.saturating_sub(self.live_stacks)
    }
}
