//! Quaerix job queue.
//!
//! The two long-running computations — answering a question and refreshing
//! the knowledge graph for one — run outside the request path. Handlers
//! submit a job and return a task id immediately; clients poll
//! `/status/{task_id}` separately. The in-process implementation runs one
//! bounded worker pool per role (answerer, updater) and keeps a registry of
//! every task for status lookups and queue introspection.

pub mod error;
pub mod job;
pub mod queue;

pub use error::QueueError;
pub use job::{Job, JobKind, TaskState, WorkerRole};
pub use queue::{InProcessQueue, JobRunner, QueueClient, QueueConfig, QueueSnapshot, TaskInfo};
