//! In-process queue with bounded worker pools.
//!
//! Deployment mirror: one answerer pool (default four slots, `answer` work)
//! and one updater pool (default one slot, `update` work). Submission never
//! blocks on execution — the job is registered as PENDING and a worker slot
//! picks it up when free.

use crate::error::QueueError;
use crate::job::{Job, JobKind, TaskState, WorkerRole};
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, Semaphore};
use uuid::Uuid;

/// Executes a job's actual work. The server wires this to the external
/// knowledge-graph service; tests inject stubs.
#[async_trait]
pub trait JobRunner: Send + Sync + 'static {
    async fn run(&self, job: &Job) -> anyhow::Result<()>;
}

/// Submission, status polling, and queue introspection.
#[async_trait]
pub trait QueueClient: Send + Sync {
    /// Register a job and return its task id without waiting for execution.
    async fn submit(&self, kind: JobKind, question_id: &str) -> Result<Uuid, QueueError>;

    /// Current state of a task. Unknown ids report PENDING, matching the
    /// behavior of result backends that lazily materialize task records.
    async fn status(&self, task_id: Uuid) -> TaskState;

    /// Queued/active tasks grouped by worker role.
    async fn snapshot(&self) -> QueueSnapshot;
}

/// Worker pool sizes.
#[derive(Debug, Clone)]
pub struct QueueConfig {
    pub answer_workers: usize,
    pub update_workers: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            answer_workers: 4,
            update_workers: 1,
        }
    }
}

/// One row of the `/tasks` listing.
#[derive(Debug, Clone, Serialize)]
pub struct TaskInfo {
    pub id: Uuid,
    pub question_id: String,
    pub kind: JobKind,
}

/// Snapshot of queued/active tasks per worker role.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QueueSnapshot {
    pub answerers_queued: Vec<TaskInfo>,
    pub answerers_active: Vec<TaskInfo>,
    pub updaters_queued: Vec<TaskInfo>,
    pub updaters_active: Vec<TaskInfo>,
}

struct TaskEntry {
    job: Job,
    state: TaskState,
}

/// Queue implementation backed by tokio tasks and per-role semaphores.
#[derive(Clone)]
pub struct InProcessQueue {
    runner: Arc<dyn JobRunner>,
    registry: Arc<Mutex<HashMap<Uuid, TaskEntry>>>,
    answer_slots: Arc<Semaphore>,
    update_slots: Arc<Semaphore>,
}

impl InProcessQueue {
    pub fn new(config: QueueConfig, runner: Arc<dyn JobRunner>) -> Self {
        Self {
            runner,
            registry: Arc::new(Mutex::new(HashMap::new())),
            answer_slots: Arc::new(Semaphore::new(config.answer_workers.max(1))),
            update_slots: Arc::new(Semaphore::new(config.update_workers.max(1))),
        }
    }

    fn slots_for(&self, role: WorkerRole) -> Arc<Semaphore> {
        match role {
            WorkerRole::Answerer => self.answer_slots.clone(),
            WorkerRole::Updater => self.update_slots.clone(),
        }
    }

    async fn set_state(registry: &Mutex<HashMap<Uuid, TaskEntry>>, id: Uuid, state: TaskState) {
        if let Some(entry) = registry.lock().await.get_mut(&id) {
            entry.state = state;
        }
    }
}

#[async_trait]
impl QueueClient for InProcessQueue {
    async fn submit(&self, kind: JobKind, question_id: &str) -> Result<Uuid, QueueError> {
        let job = Job::new(kind, question_id);
        let task_id = job.id;

        self.registry.lock().await.insert(
            task_id,
            TaskEntry {
                job: job.clone(),
                state: TaskState::Pending,
            },
        );
        tracing::info!(task_id = %task_id, job = kind.as_str(), question_id, "job submitted");

        let runner = self.runner.clone();
        let registry = self.registry.clone();
        let slots = self.slots_for(kind.role());

        tokio::spawn(async move {
            let permit = match slots.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    Self::set_state(&registry, task_id, TaskState::Failure).await;
                    return;
                }
            };

            Self::set_state(&registry, task_id, TaskState::Started).await;

            let outcome = runner.run(&job).await;
            drop(permit);

            match outcome {
                Ok(()) => {
                    tracing::info!(task_id = %task_id, "job finished");
                    Self::set_state(&registry, task_id, TaskState::Success).await;
                }
                Err(error) => {
                    tracing::warn!(task_id = %task_id, %error, "job failed");
                    Self::set_state(&registry, task_id, TaskState::Failure).await;
                }
            }
        });

        Ok(task_id)
    }

    async fn status(&self, task_id: Uuid) -> TaskState {
        self.registry
            .lock()
            .await
            .get(&task_id)
            .map(|entry| entry.state)
            .unwrap_or(TaskState::Pending)
    }

    async fn snapshot(&self) -> QueueSnapshot {
        let registry = self.registry.lock().await;
        let mut snapshot = QueueSnapshot::default();

        for entry in registry.values() {
            let info = TaskInfo {
                id: entry.job.id,
                question_id: entry.job.question_id.clone(),
                kind: entry.job.kind,
            };
            match (entry.job.kind.role(), entry.state) {
                (WorkerRole::Answerer, TaskState::Pending) => snapshot.answerers_queued.push(info),
                (WorkerRole::Answerer, TaskState::Started) => snapshot.answerers_active.push(info),
                (WorkerRole::Updater, TaskState::Pending) => snapshot.updaters_queued.push(info),
                (WorkerRole::Updater, TaskState::Started) => snapshot.updaters_active.push(info),
                _ => {}
            }
        }

        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct NoopRunner;

    #[async_trait]
    impl JobRunner for NoopRunner {
        async fn run(&self, _job: &Job) -> anyhow::Result<()> {
            Ok(())
        }
    }

    struct FailingRunner;

    #[async_trait]
    impl JobRunner for FailingRunner {
        async fn run(&self, _job: &Job) -> anyhow::Result<()> {
            anyhow::bail!("kg unreachable")
        }
    }

    /// Blocks every job until the test releases a permit on the gate.
    struct GatedRunner {
        gate: Arc<Semaphore>,
    }

    #[async_trait]
    impl JobRunner for GatedRunner {
        async fn run(&self, _job: &Job) -> anyhow::Result<()> {
            let permit = self.gate.acquire().await?;
            permit.forget();
            Ok(())
        }
    }

    async fn wait_for(queue: &InProcessQueue, id: Uuid, state: TaskState) {
        for _ in 0..200 {
            if queue.status(id).await == state {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("task {} never reached {}", id, state);
    }

    #[tokio::test]
    async fn test_submitted_job_runs_to_success() {
        let queue = InProcessQueue::new(QueueConfig::default(), Arc::new(NoopRunner));
        let id = queue.submit(JobKind::AnswerQuestion, "q1").await.unwrap();
        wait_for(&queue, id, TaskState::Success).await;
    }

    #[tokio::test]
    async fn test_runner_error_marks_failure() {
        let queue = InProcessQueue::new(QueueConfig::default(), Arc::new(FailingRunner));
        let id = queue.submit(JobKind::UpdateKg, "q1").await.unwrap();
        wait_for(&queue, id, TaskState::Failure).await;
    }

    #[tokio::test]
    async fn test_unknown_task_reports_pending() {
        let queue = InProcessQueue::new(QueueConfig::default(), Arc::new(NoopRunner));
        assert_eq!(queue.status(Uuid::new_v4()).await, TaskState::Pending);
    }

    #[tokio::test]
    async fn test_updater_pool_is_serialized() {
        let gate = Arc::new(Semaphore::new(0));
        let queue = InProcessQueue::new(
            QueueConfig {
                answer_workers: 4,
                update_workers: 1,
            },
            Arc::new(GatedRunner { gate: gate.clone() }),
        );

        let first = queue.submit(JobKind::UpdateKg, "q1").await.unwrap();
        let second = queue.submit(JobKind::UpdateKg, "q2").await.unwrap();

        wait_for(&queue, first, TaskState::Started).await;

        // With a single updater slot the second job must still be queued.
        let snapshot = queue.snapshot().await;
        assert_eq!(snapshot.updaters_active.len(), 1);
        assert_eq!(snapshot.updaters_queued.len(), 1);
        assert_eq!(snapshot.updaters_queued[0].id, second);

        gate.add_permits(2);
        wait_for(&queue, first, TaskState::Success).await;
        wait_for(&queue, second, TaskState::Success).await;
    }

    #[tokio::test]
    async fn test_snapshot_groups_by_role() {
        let gate = Arc::new(Semaphore::new(0));
        let queue = InProcessQueue::new(
            QueueConfig::default(),
            Arc::new(GatedRunner { gate: gate.clone() }),
        );

        let answer = queue.submit(JobKind::AnswerQuestion, "qa").await.unwrap();
        let update = queue.submit(JobKind::UpdateKg, "qu").await.unwrap();

        wait_for(&queue, answer, TaskState::Started).await;
        wait_for(&queue, update, TaskState::Started).await;

        let snapshot = queue.snapshot().await;
        assert!(snapshot.answerers_active.iter().any(|t| t.id == answer));
        assert!(snapshot.updaters_active.iter().any(|t| t.id == update));
        assert!(snapshot.answerers_queued.is_empty());

        gate.add_permits(2);
        wait_for(&queue, answer, TaskState::Success).await;
        wait_for(&queue, update, TaskState::Success).await;
    }
}
