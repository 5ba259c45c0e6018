//! Wires queue jobs to the external knowledge-graph service.

use async_trait::async_trait;
use quaerix_kg::KgClient;
use quaerix_queue::{Job, JobKind, JobRunner};

/// Default job runner: forwards each job to the service endpoint that
/// performs the actual computation.
pub struct KgJobRunner {
    kg: KgClient,
}

impl KgJobRunner {
    pub fn new(kg: KgClient) -> Self {
        Self { kg }
    }
}

#[async_trait]
impl JobRunner for KgJobRunner {
    async fn run(&self, job: &Job) -> anyhow::Result<()> {
        match job.kind {
            JobKind::AnswerQuestion => self.kg.answer(&job.question_id).await?,
            JobKind::UpdateKg => self.kg.update(&job.question_id).await?,
        }
        Ok(())
    }
}
