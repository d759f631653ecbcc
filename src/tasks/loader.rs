//! Rehydration of stored tasks at startup.
//!
//! The code-to-kind mapping is closed: a stored code this module does
//! not recognize means the database was written by a newer or foreign
//! build, and startup aborts rather than silently dropping the row.

use std::sync::Arc;

use chrono::DateTime;
use thiserror::Error;
use tracing::info;

use super::queue::TaskQueue;
use super::reminder::{ReminderPayload, ReminderTask};
use super::Task;
use crate::db::{Database, TaskRecord};

/// Errors while decoding a stored task.
#[derive(Debug, Error)]
pub enum TaskLoadError {
    #[error("stored task {id} has unknown code {code:?}")]
    UnknownCode { id: i64, code: String },
    #[error("stored task {id} has a malformed payload: {source}")]
    BadPayload {
        id: i64,
        #[source]
        source: serde_json::Error,
    },
    #[error("stored task {id} has an unrepresentable due time {due_at}")]
    BadDueTime { id: i64, due_at: i64 },
}

/// Decode one stored row into a runnable task.
pub fn load(record: &TaskRecord) -> Result<Arc<dyn Task>, TaskLoadError> {
    let due_at = DateTime::from_timestamp(record.due_at, 0).ok_or(TaskLoadError::BadDueTime {
        id: record.id,
        due_at: record.due_at,
    })?;

    match record.code.as_str() {
        ReminderTask::CODE => {
            let payload: ReminderPayload =
                serde_json::from_str(&record.payload).map_err(|source| {
                    TaskLoadError::BadPayload {
                        id: record.id,
                        source,
                    }
                })?;
            Ok(Arc::new(ReminderTask::stored(record.id, due_at, payload)))
        }
        other => Err(TaskLoadError::UnknownCode {
            id: record.id,
            code: other.to_string(),
        }),
    }
}

/// Load every pending stored task into the queue. Returns how many.
pub async fn requeue_pending(db: &Database, queue: &Arc<TaskQueue>) -> anyhow::Result<usize> {
    let records = db.tasks().pending().await?;
    let count = records.len();

    for record in &records {
        queue.push(load(record)?);
    }

    if count > 0 {
        info!(count, "Requeued stored tasks");
    }
    Ok(count)
}
