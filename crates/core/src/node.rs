//! StackNode: one link of a stack's chain
//!
//! A chain is a singly linked list, newest element at the head. Each data
//! node owns its payload and the older node beneath it. The bottom of every
//! chain is a `Sentinel` that carries no payload and is never handed to a
//! caller; it only goes away when the whole stack is destroyed.
//!
//! ```text
//!   top
//!    │
//!    ▼
//! ┌────────────┐   ┌────────────┐   ┌──────────┐
//! │ Data       │──▶│ Data       │──▶│ Sentinel │
//! │ payload B2 │   │ payload B1 │   └──────────┘
//! └────────────┘   └────────────┘
//! ```

use crate::error::{Result, StackError};

/// A link in a stack chain
///
/// The stored length of a data node is the length of its boxed payload, so
/// it cannot drift from the bytes the node owns.
#[derive(Debug, PartialEq, Eq)]
pub enum StackNode {
    /// Bottom marker of an empty stack
    Sentinel,
    /// One stored element and the older node beneath it
    Data {
        payload: Box<[u8]>,
        pred: Box<StackNode>,
    },
}

impl StackNode {
    /// True for the bottom marker
    #[inline]
    pub fn is_sentinel(&self) -> bool {
        matches!(self, StackNode::Sentinel)
    }

    /// Payload of a data node, `None` for the sentinel
    #[inline]
    pub fn payload(&self) -> Option<&[u8]> {
        match self {
            StackNode::Data { payload, .. } => Some(&**payload),
            StackNode::Sentinel => None,
        }
    }

    /// Stored length of the payload (0 for the sentinel)
    #[inline]
    pub fn payload_len(&self) -> usize {
        self.payload().map_or(0, <[u8]>::len)
    }

    /// The older node beneath this one
    #[inline]
    pub fn pred(&self) -> Option<&StackNode> {
        match self {
            StackNode::Data { pred, .. } => Some(&**pred),
            StackNode::Sentinel => None,
        }
    }
}

/// Copy `data` into a freshly allocated payload of exactly `data.len()` bytes
///
/// Uses a fallible reservation so an out-of-memory condition is reported as
/// `AllocationFailure` instead of aborting the process.
pub(crate) fn alloc_payload(data: &[u8]) -> Result<Box<[u8]>> {
    let mut buf: Vec<u8> = Vec::new();
    buf.try_reserve_exact(data.len())
        .map_err(|_| StackError::AllocationFailure {
            requested: data.len(),
        })?;
    buf.extend_from_slice(data);
    Ok(buf.into_boxed_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_has_no_payload() {
        let node = StackNode::Sentinel;
        assert!(node.is_sentinel());
        assert_eq!(node.payload(), None);
        assert_eq!(node.payload_len(), 0);
        assert!(node.pred().is_none());
    }

    #[test]
    fn test_data_node_links_pred() {
        let node = StackNode::Data {
            payload: alloc_payload(b"abc").unwrap(),
            pred: Box::new(StackNode::Sentinel),
        };
        assert!(!node.is_sentinel());
        assert_eq!(node.payload(), Some(&b"abc"[..]));
        assert_eq!(node.payload_len(), 3);
        assert!(node.pred().unwrap().is_sentinel());
    }

    #[test]
    fn test_alloc_payload_exact_length() {
        let payload = alloc_payload(&[7u8; 33]).unwrap();
        assert_eq!(payload.len(), 33);
        assert!(payload.iter().all(|&b| b == 7));
    }
}
