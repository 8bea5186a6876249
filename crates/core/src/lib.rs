//! hstack core: a fixed pool of handle-addressed stacks of byte records
//!
//! A caller asks the registry for a new stack, gets back a small integer
//! handle, and pushes/pops opaque byte buffers through that handle without
//! ever holding a reference to the stack itself.
//!
//! Key design principles:
//! - Handle: a bounds-checked slot index, reused lowest-first after destroy
//! - Chain: singly linked list of owned nodes, newest at the head
//! - StackNode: explicit `Sentinel` bottom marker vs `Data` payload nodes
//! - Pop is strict-size: the caller names the exact length it expects
//!
//! # Modules
//!
//! - `error`: `StackError` taxonomy
//! - `handle`: `Handle` newtype and raw C handle conversions
//! - `node`: `StackNode` chain links
//! - `chain`: one stack (push/pop/size, iterative teardown)
//! - `registry`: fixed-capacity handle table
//! - `config`: registry configuration (environment aware)
//! - `stats`: aggregate occupancy statistics

pub mod chain;
pub mod config;
pub mod error;
pub mod handle;
pub mod node;
pub mod registry;
pub mod stats;

pub use chain::Chain;
pub use config::{DEFAULT_MAX_STACKS, MAX_STACKS_ENV, MAX_STACKS_LIMIT, RegistryConfig};
pub use error::{Result, StackError};
pub use handle::{Handle, INVALID_HANDLE, hstack_t};
pub use node::StackNode;
pub use registry::StackRegistry;
pub use stats::RegistryStats;
