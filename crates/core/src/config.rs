//! Registry configuration
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `HSTACK_MAX_STACKS` | `20` | Maximum number of simultaneously live stacks (1 to 65536) |
//!
//! The handle table is allocated up front, so `max_stacks` is capped at
//! `MAX_STACKS_LIMIT`. Values outside `1..=MAX_STACKS_LIMIT` fall back to the
//! default, whether they come from the environment or from a deserialized
//! config.
//!
//! Only the process registry behind the C ABI reads the environment; a
//! `StackRegistry` built in Rust takes its configuration explicitly.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Default maximum number of live stacks
pub const DEFAULT_MAX_STACKS: usize = 20;

/// Largest accepted `max_stacks`
pub const MAX_STACKS_LIMIT: usize = 1 << 16;

/// Environment variable overriding `max_stacks`
pub const MAX_STACKS_ENV: &str = "HSTACK_MAX_STACKS";

/// Registry construction parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Number of slots in the handle table
    pub max_stacks: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_stacks: DEFAULT_MAX_STACKS,
        }
    }
}

impl RegistryConfig {
    pub fn with_max_stacks(max_stacks: usize) -> Self {
        Self { max_stacks }
    }

    /// Load configuration from environment variables
    ///
    /// Unparseable or out-of-range values fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup(MAX_STACKS_ENV)
            .and_then(|s| s.trim().parse().ok())
            .map(Self::with_max_stacks)
            .map(Self::validated)
            .unwrap_or_default()
    }

    /// Replace an out-of-range `max_stacks` with the default
    pub fn validated(self) -> Self {
        if (1..=MAX_STACKS_LIMIT).contains(&self.max_stacks) {
            return self;
        }
        warn!(
            max_stacks = self.max_stacks,
            limit = MAX_STACKS_LIMIT,
            default = DEFAULT_MAX_STACKS,
            "max_stacks out of range, using default"
        );
        Self::default()
    }
}
