use std::fmt;

/// Point-in-time view of a [`YPQueue`](crate::YPQueue), taken under its lock.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct YPQueueDump {
    /// usable slots
    pub capacity: usize,
    /// physical slots, `capacity + 1`
    pub storage_capacity: usize,
    /// queued handles
    pub len: usize,
    /// slot the next pop reads
    pub head: usize,
    /// slot the next push writes
    pub tail: usize,
    /// consumers parked in `pop` or `pop_timeout`
    pub waiters: usize,
    /// `Debug` rendering of every physical slot, `None` for empty ones.
    pub slots: Vec<Option<String>>,
}

impl fmt::Display for YPQueueDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "queue dump ------------------------------")?;
        writeln!(f, "storage_capacity: {}", self.storage_capacity)?;
        writeln!(f, "capacity:         {}", self.capacity)?;
        writeln!(f, "len:              {}", self.len)?;
        writeln!(f, "head:             {}", self.head)?;
        writeln!(f, "tail:             {}", self.tail)?;
        writeln!(f, "waiters:          {}", self.waiters)?;

        for (i, slot) in self.slots.iter().enumerate() {
            match slot {
                Some(item) => writeln!(f, "slot[{i:02}]: {item}")?,
                None => writeln!(f, "slot[{i:02}]: -")?,
            }
        }

        Ok(())
    }
}
