//! Bounded queue used for both job distribution and result publication.
//!
//! [`BoundedQueue`] is a fixed-capacity FIFO with blocking and non-blocking
//! push, blocking pop and an explicit close-for-writing signal that
//! propagates end-of-stream to every reader.
//!
//! Failed pushes return the rejected item inside [`QueueError`], so callers
//! never lose an item silently:
//!
//! ```rust
//! use rust_worker_pool::queue::{BoundedQueue, QueueError};
//!
//! let queue = BoundedQueue::new(1);
//! queue.close();
//!
//! match queue.push("job") {
//!     Err(QueueError::Closed(item)) => assert_eq!(item, "job"),
//!     _ => unreachable!(),
//! }
//! ```

mod bounded;

pub use bounded::BoundedQueue;

use std::fmt;

/// Errors returned by push operations. Each variant carries the rejected item.
#[derive(Clone, PartialEq, Eq)]
pub enum QueueError<T> {
    /// Queue is at capacity (non-blocking push only)
    Full(T),
    /// Queue is closed and not accepting new items
    Closed(T),
    /// No space became available before the timeout elapsed
    Timeout(T),
}

impl<T> QueueError<T> {
    /// Recovers the item that could not be pushed.
    pub fn into_inner(self) -> T {
        match self {
            QueueError::Full(item) | QueueError::Closed(item) | QueueError::Timeout(item) => item,
        }
    }

    /// Returns `true` if the queue was closed.
    pub fn is_closed(&self) -> bool {
        matches!(self, QueueError::Closed(_))
    }
}

// Items are not required to be Debug
impl<T> fmt::Debug for QueueError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueError::Full(_) => write!(f, "Full(..)"),
            QueueError::Closed(_) => write!(f, "Closed(..)"),
            QueueError::Timeout(_) => write!(f, "Timeout(..)"),
        }
    }
}

impl<T> fmt::Display for QueueError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueError::Full(_) => write!(f, "queue is full"),
            QueueError::Closed(_) => write!(f, "queue is closed"),
            QueueError::Timeout(_) => write!(f, "operation timed out"),
        }
    }
}

impl<T> std::error::Error for QueueError<T> {}

/// Result type for push operations.
pub type PushResult<T> = std::result::Result<(), QueueError<T>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_inner_recovers_item() {
        assert_eq!(QueueError::Full(1).into_inner(), 1);
        assert_eq!(QueueError::Closed(2).into_inner(), 2);
        assert_eq!(QueueError::Timeout(3).into_inner(), 3);
    }

    #[test]
    fn test_display() {
        assert_eq!(QueueError::Full(()).to_string(), "queue is full");
        assert_eq!(QueueError::Closed(()).to_string(), "queue is closed");
        assert_eq!(QueueError::Timeout(()).to_string(), "operation timed out");
        assert!(QueueError::Closed(()).is_closed());
        assert!(!QueueError::Full(()).is_closed());
    }
}
