/// Step a ring index forward by one, wrapping at `storage_capacity`.
pub(crate) fn advance(index: usize, storage_capacity: usize) -> usize {
    debug_assert!(index < storage_capacity, "index out of range");
    let next = index + 1;
    if next >= storage_capacity {
        next - storage_capacity
    } else {
        next
    }
}

/// Number of live entries between `head` (inclusive) and `tail` (exclusive).
pub(crate) fn ring_len(head: usize, tail: usize, storage_capacity: usize) -> usize {
    debug_assert!(head < storage_capacity && tail < storage_capacity, "index out of range");
    if head == tail {
        0
    } else if tail > head {
        tail - head
    } else {
        // wrapped
        (storage_capacity - head) + tail
    }
}
