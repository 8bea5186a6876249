//! Stack Registry: fixed-capacity table of handle-addressed stacks
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    StackRegistry                        │
//! ├─────────────────────────────────────────────────────────┤
//! │ slots: [Option<Chain>; max_stacks]                      │
//! │                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐   │
//! │  │ Slot 0       │  │ Slot 1       │  │ Slot 2       │   │
//! │  │ Some(Chain)  │  │ None (free)  │  │ Some(Chain)  │...│
//! │  └──────────────┘  └──────────────┘  └──────────────┘   │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Handles
//!
//! `create` always claims the lowest free slot, so handle reuse is
//! deterministic: after `destroy(h)` the next `create` returns `h` unless a
//! lower slot is free too. Every entry point bounds-checks the handle before
//! touching the table.
//!
//! # Ownership
//!
//! The registry owns each chain outright and the chain owns its nodes, so
//! `destroy` is just clearing the slot. Mutation takes `&mut self`; sharing a
//! registry between threads is the caller's business (wrap it in a `Mutex`,
//! as the C ABI does).

use crate::chain::Chain;
use crate::config::{MAX_STACKS_LIMIT, RegistryConfig};
use crate::error::{Result, StackError};
use crate::handle::Handle;
use crate::stats::RegistryStats;
use tracing::{debug, warn};

/// A fixed pool of independent stacks of opaque byte records
#[derive(Debug)]
pub struct StackRegistry {
    slots: Box<[Option<Chain>]>,
    live: usize,
    peak_live: usize,
    overflow_count: u64,
}

impl StackRegistry {
    /// Create a registry from a configuration
    ///
    /// An out-of-range `max_stacks` is replaced by the default.
    pub fn new(config: RegistryConfig) -> Self {
        Self::with_capacity(config.validated().max_stacks)
    }

    /// Create a registry with room for `capacity` live stacks
    ///
    /// The whole table is allocated here, so `capacity` is capped at
    /// `MAX_STACKS_LIMIT`.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.min(MAX_STACKS_LIMIT);
        let slots: Vec<Option<Chain>> = (0..capacity).map(|_| None).collect();
        StackRegistry {
            slots: slots.into_boxed_slice(),
            live: 0,
            peak_live: 0,
            overflow_count: 0,
        }
    }

    /// Number of slots in the handle table
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live stacks
    #[inline]
    pub fn live_count(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.live == self.slots.len()
    }

    /// Allocate a new empty stack in the lowest free slot
    pub fn create(&mut self) -> Result<Handle> {
        let Some(index) = self.slots.iter().position(Option::is_none) else {
            self.overflow_count += 1;
            warn!(capacity = self.capacity(), "stack registry full");
            return Err(StackError::CapacityExhausted {
                capacity: self.capacity(),
            });
        };

        self.slots[index] = Some(Chain::new());
        self.live += 1;
        self.peak_live = self.peak_live.max(self.live);
        debug!(handle = index, live = self.live, "stack created");
        Ok(Handle::new(index))
    }

    /// True when `handle` is in range and names a live stack
    #[inline]
    pub fn is_valid(&self, handle: Handle) -> bool {
        self.chain(handle).is_ok()
    }

    /// Number of elements on the stack, 0 for an invalid handle
    pub fn size(&self, handle: Handle) -> usize {
        self.chain(handle).map_or(0, Chain::len)
    }

    /// Length of the top element without popping it
    pub fn peek_len(&self, handle: Handle) -> Result<usize> {
        self.chain(handle)?
            .peek()
            .map(<[u8]>::len)
            .ok_or(StackError::EmptyStackUnderflow)
    }

    /// Copy `data` onto the top of the stack
    ///
    /// Rejected pushes leave the stack unchanged.
    pub fn push(&mut self, handle: Handle, data: &[u8]) -> Result<()> {
        let chain = self.chain_mut(handle)?;
        chain.push(data).inspect_err(|err| {
            if let StackError::AllocationFailure { requested } = err {
                warn!(handle = handle.index(), requested, "push dropped: out of memory");
            }
        })
    }

    /// Pop the top element into `out`
    ///
    /// The top element must be exactly `expected_len` bytes long. Returns the
    /// number of bytes written.
    pub fn pop_into(
        &mut self,
        handle: Handle,
        out: &mut [u8],
        expected_len: usize,
    ) -> Result<usize> {
        self.chain_mut(handle)?.pop_into(out, expected_len)
    }

    /// Pop the top element into a new buffer
    pub fn pop(&mut self, handle: Handle, expected_len: usize) -> Result<Vec<u8>> {
        let payload = self.chain_mut(handle)?.pop_exact(expected_len)?;
        Ok(payload.into_vec())
    }

    /// Release the stack and all of its elements, freeing the handle
    pub fn destroy(&mut self, handle: Handle) -> Result<()> {
        let chain = self
            .slots
            .get_mut(handle.index())
            .and_then(Option::take)
            .ok_or(StackError::InvalidHandle)?;
        self.live -= 1;
        debug!(
            handle = handle.index(),
            elements = chain.len(),
            live = self.live,
            "stack destroyed"
        );
        drop(chain);
        Ok(())
    }

    /// Destroy every live stack
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            slot.take();
        }
        self.live = 0;
    }

    /// Live handles in ascending order
    pub fn handles(&self) -> impl Iterator<Item = Handle> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(idx, _)| Handle::new(idx))
    }

    /// Aggregate statistics across all live stacks
    pub fn stats(&self) -> RegistryStats {
        let mut total_elements = 0;
        let mut total_payload_bytes = 0;
        for chain in self.slots.iter().flatten() {
            total_elements += chain.len();
            total_payload_bytes += chain.payload_bytes();
        }

        RegistryStats {
            capacity: self.capacity(),
            live_stacks: self.live,
            total_elements,
            total_payload_bytes,
            peak_live_stacks: self.peak_live,
            overflow_count: self.overflow_count,
        }
    }

    fn chain(&self, handle: Handle) -> Result<&Chain> {
        self.slots
            .get(handle.index())
            .and_then(Option::as_ref)
            .ok_or(StackError::InvalidHandle)
    }

    fn chain_mut(&mut self, handle: Handle) -> Result<&mut Chain> {
        self.slots
            .get_mut(handle.index())
            .and_then(Option::as_mut)
            .ok_or(StackError::InvalidHandle)
    }
}

impl Default for StackRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}
