//! Scheduled task system.
//!
//! A task is a unit of deferred work with a due time. Durable tasks are
//! backed by a database row and survive restarts; ephemeral tasks (the
//! recurring maintenance kinds) are re-seeded at startup and re-push
//! their next occurrence each time they fire.
//!
//! All tasks share one timer: the [`TaskQueue`] sleeps until the
//! earliest due time and re-arms early only when something sooner
//! arrives.

pub mod loader;
pub mod queue;

mod activity_prune;
mod reminder;
mod stats_push;

pub use activity_prune::ActivityPruneTask;
pub use loader::{TaskLoadError, load, requeue_pending};
pub use queue::TaskQueue;
pub use reminder::{ReminderPayload, ReminderTask};
pub use stats_push::StatsPushTask;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use herald_platform::Chat;

use crate::config::Config;
use crate::db::Database;
use crate::locales::Locales;

/// Collaborators handed to a firing task.
#[derive(Clone)]
pub struct TaskContext {
    pub db: Database,
    pub chat: Arc<dyn Chat>,
    pub config: Arc<Config>,
    pub locales: Arc<Locales>,
    /// Shared HTTP client for tasks that talk to external services.
    pub http: reqwest::Client,
    /// The queue itself, so recurring tasks can push their successor.
    pub queue: Arc<TaskQueue>,
}

/// A schedulable unit of work.
///
/// The queue awaits `before`, `run`, and `after` in order when the task
/// fires. Hook and run errors are logged, never retried; a durable task
/// is marked completed either way.
#[async_trait]
pub trait Task: Send + Sync + std::fmt::Debug {
    /// Stable discriminator, also the storage code for durable tasks.
    fn code(&self) -> &'static str;

    /// When the task should fire.
    fn due_at(&self) -> DateTime<Utc>;

    /// Backing row id, for durable tasks.
    fn storage_id(&self) -> Option<i64> {
        None
    }

    /// Runs before `run`.
    async fn before(&self, ctx: &TaskContext) -> anyhow::Result<()> {
        let _ = ctx;
        Ok(())
    }

    /// The task body.
    async fn run(&self, ctx: &TaskContext) -> anyhow::Result<()>;

    /// Runs after `run`, even when it failed. Recurring tasks push
    /// their next occurrence here.
    async fn after(&self, ctx: &TaskContext) -> anyhow::Result<()> {
        let _ = ctx;
        Ok(())
    }
}
