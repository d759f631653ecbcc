//! The single-timer task queue.
//!
//! One loop serves every scheduled task. It sleeps towards the earliest
//! pending due time; a push wakes it only when the new task is due
//! sooner than the armed deadline. Firing drains everything that is due,
//! runs each task to completion in push order, then marks the durable
//! ones completed in one batched statement.
//!
//! Due times are wall-clock for storage but converted to monotonic
//! instants at push time, so the timer never jumps with the system
//! clock.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use herald_platform::Chat;
use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::time::{self, Instant};
use tracing::{debug, error, info, warn};

use super::{Task, TaskContext};
use crate::config::Config;
use crate::db::Database;
use crate::locales::Locales;

/// How long an outbound HTTP call from a task may take.
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

struct QueueEntry {
    due: Instant,
    task: Arc<dyn Task>,
}

struct QueueState {
    /// Pending tasks in push order. Firing preserves this order.
    pending: Vec<QueueEntry>,
    /// The deadline the timer loop is currently sleeping towards.
    armed: Option<Instant>,
}

/// Shared scheduler for all deferred work.
pub struct TaskQueue {
    state: Mutex<QueueState>,
    notify: Notify,
    db: Database,
    chat: Arc<dyn Chat>,
    config: Arc<Config>,
    locales: Arc<Locales>,
    http: reqwest::Client,
}

impl TaskQueue {
    pub fn new(
        db: Database,
        chat: Arc<dyn Chat>,
        config: Arc<Config>,
        locales: Arc<Locales>,
    ) -> anyhow::Result<Arc<Self>> {
        let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;

        Ok(Arc::new(Self {
            state: Mutex::new(QueueState {
                pending: Vec::new(),
                armed: None,
            }),
            notify: Notify::new(),
            db,
            chat,
            config,
            locales,
            http,
        }))
    }

    /// Schedule a task. Past-due tasks fire on the next sweep.
    ///
    /// The timer is only interrupted when this task is due before the
    /// armed deadline; a later task waits its turn without a wakeup.
    pub fn push(&self, task: Arc<dyn Task>) {
        let due = instant_for(task.due_at());
        let sooner = {
            let mut state = self.state.lock();
            state.pending.push(QueueEntry { due, task });
            state.armed.is_none_or(|armed| due < armed)
        };
        if sooner {
            self.notify.notify_one();
        }
    }

    /// Number of tasks waiting to fire.
    pub fn pending_len(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Time until the earliest pending task, zero when overdue.
    pub fn next_due_in(&self) -> Option<Duration> {
        let state = self.state.lock();
        let earliest = state.pending.iter().map(|e| e.due).min()?;
        Some(earliest.saturating_duration_since(Instant::now()))
    }

    /// Drive the queue forever. Spawn this once at startup.
    pub async fn run(self: Arc<Self>) {
        info!("Task queue running");
        loop {
            let deadline = {
                let mut state = self.state.lock();
                let earliest = state.pending.iter().map(|e| e.due).min();
                state.armed = earliest;
                earliest
            };

            match deadline {
                Some(deadline) => {
                    tokio::select! {
                        _ = time::sleep_until(deadline) => self.sweep().await,
                        // A sooner task arrived; recompute the deadline.
                        _ = self.notify.notified() => {}
                    }
                }
                None => self.notify.notified().await,
            }
        }
    }

    /// Fire everything that is due.
    async fn sweep(self: &Arc<Self>) {
        let now = Instant::now();
        let due: Vec<Arc<dyn Task>> = {
            let mut state = self.state.lock();
            let mut due = Vec::new();
            let mut rest = Vec::with_capacity(state.pending.len());
            for entry in state.pending.drain(..) {
                if entry.due <= now {
                    due.push(entry.task);
                } else {
                    rest.push(entry);
                }
            }
            state.pending = rest;
            due
        };

        if due.is_empty() {
            return;
        }

        let ctx = self.task_context();
        let mut completed = Vec::new();

        for task in due {
            let code = task.code();
            debug!(task = code, "Task firing");

            if let Err(e) = task.before(&ctx).await {
                warn!(task = code, error = %e, "Task before-hook failed");
            }
            if let Err(e) = task.run(&ctx).await {
                warn!(task = code, error = %e, "Task failed");
            }
            if let Err(e) = task.after(&ctx).await {
                warn!(task = code, error = %e, "Task after-hook failed");
            }

            if let Some(id) = task.storage_id() {
                completed.push(id);
            }
        }

        if let Err(e) = self.db.tasks().complete_many(&completed).await {
            error!(error = %e, "Failed to mark tasks completed");
        }
    }

    fn task_context(self: &Arc<Self>) -> TaskContext {
        TaskContext {
            db: self.db.clone(),
            chat: Arc::clone(&self.chat),
            config: Arc::clone(&self.config),
            locales: Arc::clone(&self.locales),
            http: self.http.clone(),
            queue: Arc::clone(self),
        }
    }
}

/// Convert a wall-clock due time to a monotonic deadline now.
fn instant_for(due: DateTime<Utc>) -> Instant {
    let remaining = (due - Utc::now()).to_std().unwrap_or(Duration::ZERO);
    Instant::now() + remaining
}
