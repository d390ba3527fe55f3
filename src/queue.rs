use std::sync::{Condvar, Mutex, MutexGuard, PoisonError, TryLockError};
use std::time::{Duration, Instant};

use crate::dump::YPQueueDump;
use crate::ring::YPRing;
use crate::trace::{debug, trace};
use crate::{YPQueueError, YPQueueFull};

/// State guarded by the queue lock.
struct YPQueueState<T> {
    ring: YPRing<T>,
    /// consumers currently parked on the condvar
    waiters: usize,
}

/// Fixed-capacity, thread-safe FIFO of handles.
///
/// A single mutex guards the ring and a condition variable wakes consumers parked in
/// [`pop`](Self::pop) or [`pop_timeout`](Self::pop_timeout) when an item arrives. Pushing never
/// blocks: a full queue hands the item back instead.
///
/// Share it between threads by reference (e.g. `std::thread::scope`) or behind an `Arc`.
pub struct YPQueue<T> {
    /// fixed at construction, so readable without the lock
    capacity: usize,
    state: Mutex<YPQueueState<T>>,
    condvar: Condvar,
}

impl<T> YPQueue<T> {
    /// Create an empty queue that holds up to `capacity` handles.
    ///
    /// # Errors
    /// Returns `YPQueueError::InvalidArgs` when `capacity` is zero and
    /// `YPQueueError::OutOfMemory` when the slot array cannot be allocated.
    ///
    /// # Examples
    /// ```
    /// use yep_pq::YPQueue;
    ///
    /// let queue = YPQueue::<u64>::new(8).unwrap();
    /// assert_eq!(queue.capacity(), 8);
    /// assert!(queue.is_empty());
    /// assert!(YPQueue::<u64>::new(0).is_err());
    /// ```
    pub fn new(capacity: usize) -> Result<YPQueue<T>, YPQueueError> {
        let ring = YPRing::new(capacity)?;
        debug!(capacity, "created queue");

        Ok(YPQueue {
            capacity: ring.capacity(),
            state: Mutex::new(YPQueueState { ring, waiters: 0 }),
            condvar: Condvar::new(),
        })
    }

    /// Acquire the state lock. Nothing under the lock can panic half way through an update, so a
    /// poisoned lock still guards a consistent ring.
    fn lock(&self) -> MutexGuard<'_, YPQueueState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the number of handles the queue can hold. Does not take the lock.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the physical slot count, one more than [`capacity`](Self::capacity). Does not take
    /// the lock.
    #[inline]
    pub fn storage_capacity(&self) -> usize {
        self.capacity + 1
    }

    /// Returns the number of handles currently queued.
    ///
    /// # Examples
    /// ```
    /// use yep_pq::YPQueue;
    ///
    /// let queue = YPQueue::new(4).unwrap();
    /// queue.push('a').unwrap();
    /// queue.push('b').unwrap();
    /// assert_eq!(queue.len(), 2);
    /// ```
    pub fn len(&self) -> usize {
        self.lock().ring.len()
    }

    /// Returns true when no handle is queued.
    ///
    /// The answer may be stale by the time the caller acts on it if other threads share the queue.
    pub fn is_empty(&self) -> bool {
        self.lock().ring.is_empty()
    }

    /// Returns true when every usable slot is taken, i.e. the next [`push`](Self::push) would hand
    /// its item back.
    pub fn is_full(&self) -> bool {
        self.lock().ring.is_full()
    }

    /// Append a handle at the tail and wake one parked consumer, if any.
    ///
    /// Never blocks on a full queue.
    ///
    /// # Errors
    /// Returns [`YPQueueFull`] carrying `item` back when every usable slot is taken. It converts
    /// into `YPQueueError::QueueFull` with `?`.
    ///
    /// # Examples
    /// ```
    /// use yep_pq::YPQueue;
    ///
    /// let queue = YPQueue::new(1).unwrap();
    /// queue.push(1u32).unwrap();
    ///
    /// let rejected = queue.push(2u32).unwrap_err();
    /// assert_eq!(rejected.into_inner(), 2);
    /// ```
    pub fn push(&self, item: T) -> Result<(), YPQueueFull<T>> {
        let mut state = self.lock();

        if let Err(item) = state.ring.push(item) {
            trace!(capacity = state.ring.capacity(), "push on full queue");
            return Err(YPQueueFull(item));
        }

        if state.waiters > 0 {
            // each push makes exactly one item available, so one wake is enough
            self.condvar.notify_one();
        }

        Ok(())
    }

    /// Take the head handle without waiting for the lock or for an item.
    ///
    /// # Errors
    /// Returns `YPQueueError::LockContended` when another thread holds the lock and
    /// `YPQueueError::EmptyQueue` when the lock was acquired but nothing is queued.
    ///
    /// # Examples
    /// ```
    /// use yep_pq::{YPQueue, YPQueueError};
    ///
    /// let queue = YPQueue::new(2).unwrap();
    /// assert_eq!(queue.try_pop(), Err(YPQueueError::EmptyQueue));
    ///
    /// queue.push(5u8).unwrap();
    /// assert_eq!(queue.try_pop(), Ok(5));
    /// ```
    pub fn try_pop(&self) -> Result<T, YPQueueError> {
        let mut state = match self.state.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return Err(YPQueueError::LockContended),
        };

        state.ring.pop().ok_or(YPQueueError::EmptyQueue)
    }

    /// Take the head handle, parking the calling thread until one is pushed.
    ///
    /// Cannot be cancelled; use [`pop_timeout`](Self::pop_timeout) for a bounded wait.
    ///
    /// # Examples
    /// ```
    /// use yep_pq::YPQueue;
    ///
    /// let queue = YPQueue::new(4).unwrap();
    /// std::thread::scope(|s| {
    ///     let consumer = s.spawn(|| queue.pop());
    ///     queue.push(42u32).unwrap();
    ///     assert_eq!(consumer.join().unwrap(), 42);
    /// });
    /// ```
    pub fn pop(&self) -> T {
        let mut state = self.lock();

        loop {
            if let Some(item) = state.ring.pop() {
                return item;
            }

            state.waiters += 1;
            trace!(waiters = state.waiters, "consumer parked");
            state = self
                .condvar
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
            state.waiters -= 1;
            trace!(waiters = state.waiters, "consumer woke");
        }
    }

    /// Take the head handle, waiting at most `timeout` for one to be pushed.
    ///
    /// # Errors
    /// Returns `YPQueueError::Timeout` when the queue stayed empty for the whole `timeout`.
    ///
    /// # Examples
    /// ```
    /// use std::time::Duration;
    /// use yep_pq::{YPQueue, YPQueueError};
    ///
    /// let queue = YPQueue::<u32>::new(4).unwrap();
    /// assert_eq!(queue.pop_timeout(Duration::from_millis(1)), Err(YPQueueError::Timeout));
    /// ```
    pub fn pop_timeout(&self, timeout: Duration) -> Result<T, YPQueueError> {
        let start_time = Instant::now();
        let mut state = self.lock();

        loop {
            if let Some(item) = state.ring.pop() {
                return Ok(item);
            }

            // Recalculate remaining timeout before each wait
            let remaining_timeout = match timeout.checked_sub(start_time.elapsed()) {
                Some(t) if !t.is_zero() => t,
                _ => {
                    trace!(?timeout, "pop timed out");
                    return Err(YPQueueError::Timeout);
                }
            };

            state.waiters += 1;
            let (new_state, _) = self
                .condvar
                .wait_timeout(state, remaining_timeout)
                .unwrap_or_else(PoisonError::into_inner);
            state = new_state;
            state.waiters -= 1;
        }
    }
}

impl<T: std::fmt::Debug> YPQueue<T> {
    /// Snapshot the internal state (indices, waiter count, every slot) for inspection.
    ///
    /// # Examples
    /// ```
    /// use yep_pq::YPQueue;
    ///
    /// let queue = YPQueue::new(2).unwrap();
    /// queue.push(7u8).unwrap();
    ///
    /// let dump = queue.dump();
    /// assert_eq!((dump.head, dump.tail, dump.len), (0, 1, 1));
    /// assert_eq!(dump.slots, vec![Some("7".to_string()), None, None]);
    /// ```
    pub fn dump(&self) -> YPQueueDump {
        let state = self.lock();
        let ring = &state.ring;

        YPQueueDump {
            capacity: ring.capacity(),
            storage_capacity: ring.storage_capacity(),
            len: ring.len(),
            head: ring.head(),
            tail: ring.tail(),
            waiters: state.waiters,
            slots: ring
                .slots()
                .iter()
                .map(|slot| slot.as_ref().map(|item| format!("{item:?}")))
                .collect(),
        }
    }

    /// Emit [`dump`](Self::dump) as a debug event. A no-op without the `tracing` feature.
    pub fn log_dump(&self) {
        #[cfg(feature = "tracing")]
        {
            let dump = self.dump();
            debug!("{dump}");
        }
    }
}
