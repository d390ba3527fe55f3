use std::fmt;

/// Errors returned by queue and pool operations.
#[derive(Eq, PartialEq, Debug, Clone, Copy, thiserror::Error)]
pub enum YPQueueError {
    /// A zero or overflowing capacity, record count or record size.
    #[error("invalid arguments")]
    InvalidArgs,
    /// The slot array or record arena could not be allocated.
    #[error("allocation failed")]
    OutOfMemory,
    /// No free slot; see [`YPQueueFull`] for the variant that returns the item.
    #[error("queue is full")]
    QueueFull,
    /// A non-waiting pop found nothing queued.
    #[error("queue is empty")]
    EmptyQueue,
    /// A non-waiting pop found the lock held by another thread.
    #[error("queue lock is held by another thread")]
    LockContended,
    /// A timed pop saw an empty queue for its whole timeout.
    #[error("timed out waiting for an item")]
    Timeout,
}

/// Returned by [`YPQueue::push`](crate::YPQueue::push) when there is no free slot. Carries the
/// rejected item back to the caller so pool records are never lost.
#[derive(Eq, PartialEq)]
pub struct YPQueueFull<T>(pub T);

impl<T> YPQueueFull<T> {
    /// Take back the item that could not be pushed.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for YPQueueFull<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("YPQueueFull(..)")
    }
}

impl<T> fmt::Display for YPQueueFull<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("queue is full")
    }
}

impl<T> std::error::Error for YPQueueFull<T> {}

impl<T> From<YPQueueFull<T>> for YPQueueError {
    fn from(_: YPQueueFull<T>) -> Self {
        YPQueueError::QueueFull
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_full_converts_and_returns_item() {
        let full = YPQueueFull(7u64);
        assert_eq!(full.to_string(), "queue is full");
        assert_eq!(format!("{full:?}"), "YPQueueFull(..)");
        assert_eq!(full.into_inner(), 7);

        let err: YPQueueError = YPQueueFull("x").into();
        assert_eq!(err, YPQueueError::QueueFull);
        assert_eq!(
            YPQueueError::LockContended.to_string(),
            "queue lock is held by another thread"
        );
    }
}
