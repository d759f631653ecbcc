//! Daily activity retention sweep, an ephemeral recurring task.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tracing::info;

use super::{Task, TaskContext};

#[derive(Debug)]
pub struct ActivityPruneTask {
    due_at: DateTime<Utc>,
}

impl ActivityPruneTask {
    pub const CODE: &'static str = "activity_prune";

    pub fn new(due_at: DateTime<Utc>) -> Self {
        Self { due_at }
    }
}

#[async_trait]
impl Task for ActivityPruneTask {
    fn code(&self) -> &'static str {
        Self::CODE
    }

    fn due_at(&self) -> DateTime<Utc> {
        self.due_at
    }

    async fn run(&self, ctx: &TaskContext) -> anyhow::Result<()> {
        let retention = Duration::days(ctx.config.activity.retention_days as i64);
        let cutoff = Utc::now() - retention;

        let removed = ctx.db.activity().prune_before(cutoff.timestamp()).await?;
        if removed > 0 {
            info!(removed, "Pruned old activity rows");
        }
        Ok(())
    }

    async fn after(&self, ctx: &TaskContext) -> anyhow::Result<()> {
        ctx.queue
            .push(std::sync::Arc::new(ActivityPruneTask::new(
                Utc::now() + Duration::days(1),
            )));
        Ok(())
    }
}
