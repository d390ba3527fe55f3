use std::fmt;

use crate::trace::debug;
use crate::{YPQueue, YPQueueError};

/// Contiguous arena of `record_count` zeroed records, each `record_size` bytes.
///
/// The arena owns the bytes; [`YPQueue::from_pool`] borrows it mutably and circulates one
/// [`YPRecord`] per record, so the pool always outlives the queue built over it.
#[derive(Debug)]
pub struct YPRecordPool {
    record_count: usize,
    record_size: usize,
    data: Vec<u8>,
}

impl YPRecordPool {
    /// Allocate the arena.
    ///
    /// # Errors
    /// Returns `YPQueueError::InvalidArgs` when either argument is zero or the total size
    /// overflows, and `YPQueueError::OutOfMemory` when the allocation fails.
    ///
    /// # Examples
    /// ```
    /// use yep_pq::YPRecordPool;
    ///
    /// let pool = YPRecordPool::new(4, 32).unwrap();
    /// assert_eq!(pool.len(), 128);
    /// assert!(YPRecordPool::new(0, 32).is_err());
    /// ```
    pub fn new(record_count: usize, record_size: usize) -> Result<YPRecordPool, YPQueueError> {
        if record_count == 0 || record_size == 0 {
            return Err(YPQueueError::InvalidArgs);
        }

        let len = record_count
            .checked_mul(record_size)
            .ok_or(YPQueueError::InvalidArgs)?;

        let mut data = Vec::<u8>::new();
        data.try_reserve_exact(len)
            .map_err(|_| YPQueueError::OutOfMemory)?;
        data.resize(len, 0);

        Ok(YPRecordPool {
            record_count,
            record_size,
            data,
        })
    }

    /// Returns the number of records in the arena.
    #[inline]
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    /// Returns the size of one record in bytes.
    #[inline]
    pub fn record_size(&self) -> usize {
        self.record_size
    }

    /// Total arena size in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Pairs with [`len`](Self::len). Always false: [`new`](Self::new) rejects a zero record
    /// count or size.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterate over the records in arena order, e.g. to inspect them once every queue over the
    /// pool is gone.
    pub fn records(&self) -> impl Iterator<Item = &[u8]> {
        self.data.chunks_exact(self.record_size)
    }

    fn records_mut(&mut self) -> impl Iterator<Item = YPRecord<'_>> {
        self.data
            .chunks_exact_mut(self.record_size)
            .enumerate()
            .map(|(index, data)| YPRecord { index, data })
    }
}

/// Exclusive handle to one record of a [`YPRecordPool`].
///
/// Popping a record from the queue hands its bytes to the caller; pushing it back returns it to
/// the free list.
pub struct YPRecord<'a> {
    index: usize,
    data: &'a mut [u8],
}

impl<'a> YPRecord<'a> {
    /// Position of the record in the arena.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Byte offset of the record from the start of the arena.
    #[inline]
    pub fn offset(&self) -> usize {
        self.index * self.data.len()
    }

    /// The record bytes, `record_size` long.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &*self.data
    }

    /// Mutable record bytes. Writes land directly in the pool's arena.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut *self.data
    }
}

impl fmt::Debug for YPRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YPRecord")
            .field("index", &self.index)
            .field("offset", &self.offset())
            .field("len", &self.data.len())
            .finish()
    }
}

impl<'a> YPQueue<YPRecord<'a>> {
    /// Build a queue holding every record of `pool`, turning it into a free list.
    ///
    /// The queue (lock and condvar included) is created first, then each record is pushed in
    /// ascending offset order, so the returned queue is full.
    ///
    /// # Errors
    /// Propagates `YPQueueError::OutOfMemory` from the slot allocation.
    ///
    /// # Examples
    /// ```
    /// use yep_pq::{YPQueue, YPRecordPool};
    ///
    /// let mut pool = YPRecordPool::new(4, 16).unwrap();
    /// let free_list = YPQueue::from_pool(&mut pool).unwrap();
    /// assert_eq!(free_list.len(), 4);
    ///
    /// let mut record = free_list.pop();
    /// assert_eq!(record.offset(), 0);
    /// record.data_mut().fill(0xAB);
    /// free_list.push(record).unwrap();
    /// ```
    pub fn from_pool(pool: &'a mut YPRecordPool) -> Result<YPQueue<YPRecord<'a>>, YPQueueError> {
        let queue = YPQueue::new(pool.record_count())?;

        debug!(
            records = pool.record_count(),
            record_size = pool.record_size(),
            "seeding queue from record pool"
        );

        for record in pool.records_mut() {
            queue.push(record)?;
        }

        Ok(queue)
    }
}
