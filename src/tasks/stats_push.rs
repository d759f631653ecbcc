//! Periodic guild statistics push, an ephemeral recurring task.
//!
//! Reports guild and user counts to the configured HTTP endpoint, the
//! kind of feed bot list sites consume. Never persisted: the first
//! occurrence is seeded at startup and each firing pushes the next.

use anyhow::Context as _;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use tracing::info;

use super::{Task, TaskContext};

#[derive(Debug)]
pub struct StatsPushTask {
    due_at: DateTime<Utc>,
}

impl StatsPushTask {
    pub const CODE: &'static str = "stats_push";

    pub fn new(due_at: DateTime<Utc>) -> Self {
        Self { due_at }
    }
}

#[async_trait]
impl Task for StatsPushTask {
    fn code(&self) -> &'static str {
        Self::CODE
    }

    fn due_at(&self) -> DateTime<Utc> {
        self.due_at
    }

    async fn run(&self, ctx: &TaskContext) -> anyhow::Result<()> {
        let endpoint = ctx
            .config
            .stats
            .endpoint
            .as_deref()
            .context("stats push fired without a configured endpoint")?;

        let entities = ctx.db.entities();
        let guilds = entities.guild_count().await?;
        let users = entities.user_count().await?;

        let mut request = ctx.http.post(endpoint).json(&json!({
            "guild_count": guilds,
            "user_count": users,
        }));
        if let Some(token) = &ctx.config.stats.token {
            request = request.bearer_auth(token);
        }

        request.send().await?.error_for_status()?;
        info!(guilds, users, "Pushed guild statistics");
        Ok(())
    }

    async fn after(&self, ctx: &TaskContext) -> anyhow::Result<()> {
        let interval = Duration::seconds(ctx.config.stats.interval_secs as i64);
        ctx.queue
            .push(std::sync::Arc::new(StatsPushTask::new(Utc::now() + interval)));
        Ok(())
    }
}
