//! Chain: the linked representation of one stack
//!
//! Design:
//! - `top` is held inline, so an empty stack (just the sentinel) needs no
//!   heap allocation and creating a stack cannot fail for lack of memory
//! - push/pop only touch the head: O(1)
//! - depth and payload bytes are cached; `count_nodes` walks the chain and
//!   must always agree with the cache
//! - teardown is iterative, so a very deep chain never recurses in `Drop`

use crate::error::{Result, StackError};
use crate::node::{StackNode, alloc_payload};
use tracing::trace;

/// One stack of opaque byte records
pub struct Chain {
    top: StackNode,
    depth: usize,
    bytes: usize,
}

impl Chain {
    /// A chain holding only its sentinel
    pub fn new() -> Self {
        Chain {
            top: StackNode::Sentinel,
            depth: 0,
            bytes: 0,
        }
    }

    /// Number of elements above the sentinel
    #[inline]
    pub fn len(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.top.is_sentinel()
    }

    /// Sum of all payload lengths
    #[inline]
    pub fn payload_bytes(&self) -> usize {
        self.bytes
    }

    /// Head of the chain (the sentinel when empty)
    #[inline]
    pub fn top(&self) -> &StackNode {
        &self.top
    }

    /// Payload of the top element without removing it
    pub fn peek(&self) -> Option<&[u8]> {
        self.top.payload()
    }

    /// Count data nodes by walking down to the sentinel
    pub fn count_nodes(&self) -> usize {
        let mut count = 0;
        let mut current = &self.top;
        while let Some(pred) = current.pred() {
            count += 1;
            current = pred;
        }
        count
    }

    /// Copy `data` into a new top element
    ///
    /// Nothing changes unless the whole push succeeds.
    pub fn push(&mut self, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Err(StackError::ZeroLength);
        }
        let payload = alloc_payload(data)?;

        let old_top = std::mem::replace(&mut self.top, StackNode::Sentinel);
        self.top = StackNode::Data {
            payload,
            pred: Box::new(old_top),
        };
        self.depth += 1;
        self.bytes += data.len();
        trace!(len = data.len(), depth = self.depth, "push");
        Ok(())
    }

    /// Check the strict-size pop contract against the top element
    ///
    /// Returns the top element's length when a pop of `expected` bytes
    /// would succeed.
    fn check_pop(&self, expected: usize) -> Result<usize> {
        if expected == 0 {
            return Err(StackError::ZeroLength);
        }
        match self.top.payload() {
            None => Err(StackError::EmptyStackUnderflow),
            Some(payload) if payload.len() != expected => Err(StackError::SizeMismatch {
                expected,
                actual: payload.len(),
            }),
            Some(payload) => Ok(payload.len()),
        }
    }

    /// Unlink the top element and hand back its payload
    fn take_top(&mut self) -> Option<Box<[u8]>> {
        match std::mem::replace(&mut self.top, StackNode::Sentinel) {
            StackNode::Data { payload, pred } => {
                self.top = *pred;
                self.depth -= 1;
                self.bytes -= payload.len();
                trace!(len = payload.len(), depth = self.depth, "pop");
                Some(payload)
            }
            StackNode::Sentinel => None,
        }
    }

    /// Pop the top element into `out`, which must hold `expected` bytes
    ///
    /// The element's length must equal `expected` exactly; short reads are
    /// rejected, not truncated. On any error the chain is left untouched.
    pub fn pop_into(&mut self, out: &mut [u8], expected: usize) -> Result<usize> {
        let len = self.check_pop(expected)?;
        if out.len() < len {
            return Err(StackError::BufferTooSmall {
                needed: len,
                available: out.len(),
            });
        }
        let payload = self.take_top().ok_or(StackError::EmptyStackUnderflow)?;
        out[..len].copy_from_slice(&payload);
        Ok(len)
    }

    /// Pop the top element, which must be exactly `expected` bytes long
    pub fn pop_exact(&mut self, expected: usize) -> Result<Box<[u8]>> {
        self.check_pop(expected)?;
        self.take_top().ok_or(StackError::EmptyStackUnderflow)
    }
}

impl std::fmt::Debug for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chain")
            .field("depth", &self.depth)
            .field("bytes", &self.bytes)
            .finish()
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Chain {
    fn drop(&mut self) {
        let mut current = std::mem::replace(&mut self.top, StackNode::Sentinel);
        while let StackNode::Data { pred, .. } = current {
            current = *pred;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_chain_is_empty() {
        let chain = Chain::new();
        assert!(chain.is_empty());
        assert_eq!(chain.len(), 0);
        assert_eq!(chain.count_nodes(), 0);
        assert!(chain.top().is_sentinel());
        assert_eq!(chain.peek(), None);
    }

    #[test]
    fn test_push_pop() {
        let mut chain = Chain::new();
        chain.push(b"hello").unwrap();
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.peek(), Some(&b"hello"[..]));

        let mut out = [0u8; 5];
        assert_eq!(chain.pop_into(&mut out, 5), Ok(5));
        assert_eq!(&out, b"hello");
        assert!(chain.is_empty());
    }

    #[test]
    fn test_lifo_order() {
        let mut chain = Chain::new();
        chain.push(b"one").unwrap();
        chain.push(b"three").unwrap();
        chain.push(b"eleven").unwrap();

        assert_eq!(&*chain.pop_exact(6).unwrap(), b"eleven");
        assert_eq!(&*chain.pop_exact(5).unwrap(), b"three");
        assert_eq!(&*chain.pop_exact(3).unwrap(), b"one");
        assert_eq!(chain.pop_exact(3), Err(StackError::EmptyStackUnderflow));
    }

    #[test]
    fn test_zero_length_push_rejected() {
        let mut chain = Chain::new();
        assert_eq!(chain.push(&[]), Err(StackError::ZeroLength));
        assert_eq!(chain.len(), 0);
    }

    #[test]
    fn test_size_mismatch_leaves_top() {
        let mut chain = Chain::new();
        chain.push(&[1, 2, 3, 4]).unwrap();

        let mut out = [0u8; 8];
        assert_eq!(
            chain.pop_into(&mut out, 8),
            Err(StackError::SizeMismatch {
                expected: 8,
                actual: 4
            })
        );
        assert_eq!(
            chain.pop_into(&mut out, 2),
            Err(StackError::SizeMismatch {
                expected: 2,
                actual: 4
            })
        );
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.pop_into(&mut out, 4), Ok(4));
        assert_eq!(&out[..4], &[1, 2, 3, 4]);
    }

    #[test]
    fn test_zero_expected_length_rejected() {
        let mut chain = Chain::new();
        chain.push(b"x").unwrap();
        let mut out = [0u8; 1];
        assert_eq!(chain.pop_into(&mut out, 0), Err(StackError::ZeroLength));
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn test_buffer_too_small() {
        let mut chain = Chain::new();
        chain.push(b"abcd").unwrap();
        let mut out = [0u8; 2];
        assert_eq!(
            chain.pop_into(&mut out, 4),
            Err(StackError::BufferTooSmall {
                needed: 4,
                available: 2
            })
        );
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn test_counters_track_pushes_and_pops() {
        let mut chain = Chain::new();
        for i in 1..=10usize {
            chain.push(&vec![0xAB; i]).unwrap();
        }
        assert_eq!(chain.len(), 10);
        assert_eq!(chain.count_nodes(), 10);
        assert_eq!(chain.payload_bytes(), 55);

        chain.pop_exact(10).unwrap();
        chain.pop_exact(9).unwrap();
        assert_eq!(chain.len(), 8);
        assert_eq!(chain.count_nodes(), 8);
        assert_eq!(chain.payload_bytes(), 36);
    }

    #[test]
    fn test_deep_chain_drops_without_recursion() {
        let mut chain = Chain::new();
        for _ in 0..200_000 {
            chain.push(&[1]).unwrap();
        }
        assert_eq!(chain.len(), 200_000);
        drop(chain);
    }
}
