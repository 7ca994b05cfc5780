//! Fixed-capacity MPMC job queue with a worker pool, wait-groups, and cooperative cancellation.
//!
//! Two independent rings back [`Priority::High`] and [`Priority::Low`] (the original keeps a
//! `high_priority_job_queue` and a `low_priority_job_queue`); a shared worker pool drains the
//! high-priority ring first and only falls back to the low-priority one when it is empty.

mod queue;

pub use queue::{JobContext, JobQueue, Priority, WaitGroup};
