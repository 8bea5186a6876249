//! Stack Errors
//!
//! Every way a registry operation can be rejected. The Rust API returns these
//! through `Result`; the C ABI in `hstack-runtime` folds them into the
//! sentinel return values (`-1`, `0`) and records the message in its
//! last-error slot.

/// Why a registry operation did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackError {
    /// Handle is out of range or names an empty slot
    InvalidHandle,
    /// A required data pointer was null (C ABI only)
    NullBuffer,
    /// Zero-length push or zero expected length on pop
    ZeroLength,
    /// Top element length differs from the length the caller asked for
    SizeMismatch { expected: usize, actual: usize },
    /// Every slot of the registry holds a live stack
    CapacityExhausted { capacity: usize },
    /// The payload buffer could not be allocated
    AllocationFailure { requested: usize },
    /// Pop on a stack holding only its sentinel
    EmptyStackUnderflow,
    /// Output slice is shorter than the expected length
    BufferTooSmall { needed: usize, available: usize },
}

impl std::fmt::Display for StackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StackError::InvalidHandle => write!(f, "invalid stack handle"),
            StackError::NullBuffer => write!(f, "null data buffer"),
            StackError::ZeroLength => write!(f, "zero-length element"),
            StackError::SizeMismatch { expected, actual } => write!(
                f,
                "size mismatch: caller expected {} bytes, top element holds {}",
                expected, actual
            ),
            StackError::CapacityExhausted { capacity } => {
                write!(f, "all {} stack slots are in use", capacity)
            }
            StackError::AllocationFailure { requested } => {
                write!(f, "failed to allocate {} bytes for element", requested)
            }
            StackError::EmptyStackUnderflow => write!(f, "pop on empty stack"),
            StackError::BufferTooSmall { needed, available } => write!(
                f,
                "output buffer too small: need {} bytes, have {}",
                needed, available
            ),
        }
    }
}

impl std::error::Error for StackError {}

/// Result alias used throughout the registry API
pub type Result<T> = std::result::Result<T, StackError>;
