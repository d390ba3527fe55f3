/// the thread-safe handle queue
pub mod queue;
pub use queue::YPQueue;

/// ring buffer storage behind the queue
mod ring;

/// Fixed-size record pool that seeds a queue as a free list
pub mod pool;
pub use pool::YPRecord;
pub use pool::YPRecordPool;

/// Debug snapshot of a queue
pub mod dump;
pub use dump::YPQueueDump;

/// the errors
pub mod error;
pub use error::YPQueueError;
pub use error::YPQueueFull;

/// Optional tracing output (feature `tracing`)
pub mod trace;

/// utils for internal usage
mod utils;
