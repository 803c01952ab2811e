//! Bounded FIFO queue with capacity limit and close-for-writing.

use super::{PushResult, QueueError};
use parking_lot::{Condvar, Mutex, MutexGuard};
use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

struct State<T> {
    items: VecDeque<T>,
    closed: bool,
    /// Poppers currently parked on `not_empty`
    waiting_receivers: usize,
}

/// A bounded FIFO queue with an explicit end-of-stream signal.
///
/// Producers block in [`push`](Self::push) while the queue is full,
/// consumers block in [`pop`](Self::pop) while it is empty. After
/// [`close`](Self::close) every push is rejected and every pop returns the
/// remaining items followed by `None`.
///
/// A capacity of zero turns the queue into a synchronous hand-off: a push
/// only completes when a consumer is parked in `pop` to take the item.
///
/// # Example
///
/// ```rust
/// use rust_worker_pool::queue::{BoundedQueue, QueueError};
///
/// let queue = BoundedQueue::new(2);
/// queue.push(1).unwrap();
/// queue.push(2).unwrap();
///
/// // Queue is now full - try_push hands the item back
/// assert!(matches!(queue.try_push(3), Err(QueueError::Full(3))));
///
/// queue.close();
/// assert_eq!(queue.pop(), Some(1));
/// assert_eq!(queue.pop(), Some(2));
/// assert_eq!(queue.pop(), None);
/// ```
pub struct BoundedQueue<T> {
    state: Mutex<State<T>>,
    not_empty: Condvar,
    not_full: Condvar,
    capacity: usize,
}

impl<T> BoundedQueue<T> {
    /// Creates a new bounded queue with the specified capacity.
    ///
    /// # Arguments
    ///
    /// * `capacity` - The maximum number of items the queue can hold.
    ///   Zero means synchronous hand-off.
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(State {
                items: VecDeque::with_capacity(capacity),
                closed: false,
                waiting_receivers: 0,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            capacity,
        }
    }

    /// Returns the maximum capacity of this queue.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn has_room(&self, state: &State<T>) -> bool {
        if self.capacity == 0 {
            state.items.len() < state.waiting_receivers
        } else {
            state.items.len() < self.capacity
        }
    }

    fn enqueue(&self, mut state: MutexGuard<'_, State<T>>, item: T) {
        state.items.push_back(item);
        drop(state);
        self.not_empty.notify_one();
    }

    /// Pushes an item, blocking while the queue is full.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Closed`] with the item if the queue is closed,
    /// including when it is closed while this call is blocked.
    pub fn push(&self, item: T) -> PushResult<T> {
        let mut state = self.state.lock();
        loop {
            if state.closed {
                return Err(QueueError::Closed(item));
            }
            if self.has_room(&state) {
                self.enqueue(state, item);
                return Ok(());
            }
            self.not_full.wait(&mut state);
        }
    }

    /// Pushes an item without blocking.
    ///
    /// # Errors
    ///
    /// - [`QueueError::Closed`] if the queue is closed
    /// - [`QueueError::Full`] if the queue is at capacity
    pub fn try_push(&self, item: T) -> PushResult<T> {
        let state = self.state.lock();
        if state.closed {
            return Err(QueueError::Closed(item));
        }
        if !self.has_room(&state) {
            return Err(QueueError::Full(item));
        }
        self.enqueue(state, item);
        Ok(())
    }

    /// Pushes an item, blocking at most `timeout` for space.
    ///
    /// # Errors
    ///
    /// - [`QueueError::Closed`] if the queue is or becomes closed
    /// - [`QueueError::Timeout`] if no space became available in time
    pub fn push_timeout(&self, item: T, timeout: Duration) -> PushResult<T> {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock();
        loop {
            if state.closed {
                return Err(QueueError::Closed(item));
            }
            if self.has_room(&state) {
                self.enqueue(state, item);
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(QueueError::Timeout(item));
            }
            self.not_full.wait_until(&mut state, deadline);
        }
    }

    /// Pops the oldest item, blocking while the queue is empty and open.
    ///
    /// Returns `None` once the queue is closed and drained.
    pub fn pop(&self) -> Option<T> {
        let mut state = self.state.lock();
        loop {
            if let Some(item) = state.items.pop_front() {
                drop(state);
                self.not_full.notify_one();
                return Some(item);
            }
            if state.closed {
                return None;
            }
            state.waiting_receivers += 1;
            if self.capacity == 0 {
                // A parked receiver is what makes room in a hand-off queue
                self.not_full.notify_one();
            }
            self.not_empty.wait(&mut state);
            state.waiting_receivers -= 1;
        }
    }

    /// Pops the oldest item without blocking.
    pub fn try_pop(&self) -> Option<T> {
        let item = self.state.lock().items.pop_front();
        if item.is_some() {
            self.not_full.notify_one();
        }
        item
    }

    /// Closes the queue for writing and wakes every blocked caller.
    ///
    /// Returns `true` if this call closed the queue. Second and subsequent
    /// calls are no-ops that return `false`.
    pub fn close(&self) -> bool {
        {
            let mut state = self.state.lock();
            if state.closed {
                return false;
            }
            state.closed = true;
        }
        self.not_empty.notify_all();
        self.not_full.notify_all();
        true
    }

    /// Returns `true` once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Removes and returns every queued item in FIFO order.
    pub fn drain(&self) -> Vec<T> {
        let items: Vec<T> = self.state.lock().items.drain(..).collect();
        if !items.is_empty() {
            self.not_full.notify_all();
        }
        items
    }

    /// Number of items currently queued.
    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    /// Returns `true` if no items are queued.
    pub fn is_empty(&self) -> bool {
        self.state.lock().items.is_empty()
    }
}

impl<T> fmt::Debug for BoundedQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("BoundedQueue")
            .field("capacity", &self.capacity)
            .field("len", &state.items.len())
            .field("closed", &state.closed)
            .finish()
    }
}
