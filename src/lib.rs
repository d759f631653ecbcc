//! herald - a platform-agnostic chat bot core.
//!
//! Command dispatch, per-guild settings, passive activity statistics, and
//! a durable single-timer task queue, all behind one [`Chat`] trait so the
//! same core runs against any platform adapter.

pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod locales;
pub mod resolver;
pub mod tasks;

use std::sync::Arc;

use chrono::{Duration, Utc};
use herald_platform::{Chat, MessageEvent, Response};
use tokio::task::JoinHandle;

use crate::commands::{Dispatcher, Registry};
use crate::config::Config;
use crate::db::Database;
use crate::locales::Locales;
use crate::tasks::{ActivityPruneTask, StatsPushTask, TaskQueue};

/// The assembled bot: the dispatcher plus the services behind it.
///
/// Construction runs the whole startup sequence short of spawning the
/// queue loop, so everything that can be misconfigured fails here rather
/// than on first use: catalogs parse, migrations apply, the registry
/// compiles every validator declaration, and stored tasks rehydrate.
pub struct Bot {
    dispatcher: Dispatcher,
    queue: Arc<TaskQueue>,
    db: Database,
}

impl Bot {
    /// Wire up the bot against the given chat backend.
    pub async fn new(config: Config, chat: Arc<dyn Chat>) -> anyhow::Result<Self> {
        let locales = Arc::new(Locales::builtin(&config.bot.default_locale)?);
        let db = Database::new(&config.database.path).await?;
        let registry = Registry::new()?;

        let config = Arc::new(config);
        let queue = TaskQueue::new(
            db.clone(),
            Arc::clone(&chat),
            Arc::clone(&config),
            Arc::clone(&locales),
        )?;

        // A stored task with an unrecognized code aborts startup here.
        tasks::requeue_pending(&db, &queue).await?;

        // Recurring tasks are never persisted; each start seeds the first
        // occurrence. The prune runs right away, the stats push waits one
        // interval so a restart loop cannot hammer the endpoint.
        queue.push(Arc::new(ActivityPruneTask::new(Utc::now())));
        if config.stats.endpoint.is_some() {
            let interval = Duration::seconds(config.stats.interval_secs as i64);
            queue.push(Arc::new(StatsPushTask::new(Utc::now() + interval)));
        }

        let dispatcher = Dispatcher::new(
            registry,
            db.clone(),
            chat,
            Arc::clone(&queue),
            config,
            locales,
        );

        Ok(Self {
            dispatcher,
            queue,
            db,
        })
    }

    /// Process one inbound message.
    ///
    /// This is the adapter contract: feed every message event through
    /// here and post the returned response, if any, to the originating
    /// channel.
    pub async fn handle(&self, event: &MessageEvent) -> Option<Response> {
        self.dispatcher.handle(event).await
    }

    /// Spawn the task queue loop. Call once after construction.
    pub fn spawn_queue(&self) -> JoinHandle<()> {
        tokio::spawn(Arc::clone(&self.queue).run())
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn queue(&self) -> &Arc<TaskQueue> {
        &self.queue
    }

    pub fn db(&self) -> &Database {
        &self.db
    }
}
