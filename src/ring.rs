use crate::YPQueueError;
use crate::utils::{advance, ring_len};

/// Fixed ring of handle slots. One slot is always kept free so that `head == tail` means empty
/// and `advance(tail) == head` means full. Not synchronized; [`YPQueue`](crate::YPQueue) wraps it
/// in a mutex.
pub(crate) struct YPRing<T> {
    slots: Vec<Option<T>>,
    head: usize,
    tail: usize,
}

impl<T> YPRing<T> {
    /// Allocate a ring that can hold `capacity` items (`capacity + 1` slots).
    pub(crate) fn new(capacity: usize) -> Result<YPRing<T>, YPQueueError> {
        if capacity == 0 {
            return Err(YPQueueError::InvalidArgs);
        }

        let storage_capacity = capacity.checked_add(1).ok_or(YPQueueError::InvalidArgs)?;

        let mut slots = Vec::<Option<T>>::new();
        slots
            .try_reserve_exact(storage_capacity)
            .map_err(|_| YPQueueError::OutOfMemory)?;
        slots.resize_with(storage_capacity, || None);

        Ok(YPRing {
            slots,
            head: 0,
            tail: 0,
        })
    }

    /// Number of usable slots.
    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len() - 1
    }

    /// Physical slot count, always `capacity() + 1`.
    #[inline]
    pub(crate) fn storage_capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn head(&self) -> usize {
        self.head
    }

    #[inline]
    pub(crate) fn tail(&self) -> usize {
        self.tail
    }

    #[inline]
    pub(crate) fn slots(&self) -> &[Option<T>] {
        &self.slots
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        ring_len(self.head, self.tail, self.storage_capacity())
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        advance(self.tail, self.storage_capacity()) == self.head
    }

    /// Store `item` at the tail. Hands the item back when the ring is full.
    pub(crate) fn push(&mut self, item: T) -> Result<(), T> {
        let new_tail = advance(self.tail, self.storage_capacity());
        if new_tail == self.head {
            return Err(item);
        }

        let old = self.slots[self.tail].replace(item);
        debug_assert!(old.is_none(), "tail slot {} was occupied", self.tail);
        self.tail = new_tail;

        Ok(())
    }

    /// Take the item at the head, leaving the slot empty.
    pub(crate) fn pop(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        let item = self.slots[self.head].take();
        debug_assert!(item.is_some(), "head slot {} was empty", self.head);
        self.head = advance(self.head, self.storage_capacity());

        item
    }
}
