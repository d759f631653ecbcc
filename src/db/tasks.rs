//! Task repository for durable scheduled work.
//!
//! Rows are written when a durable task is scheduled and flipped to
//! completed in one batched statement after a queue sweep fires them.
//! There is no retry state; a task row is pending or done.

use super::DbError;
use sqlx::SqlitePool;

/// A stored task, not yet decoded into a runnable kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    pub id: i64,
    /// Stable discriminator, e.g. `"reminder"`.
    pub code: String,
    /// JSON payload interpreted by the task kind.
    pub payload: String,
    /// Unix seconds.
    pub due_at: i64,
    pub created_at: i64,
}

/// Repository for task operations.
pub struct TaskRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> TaskRepository<'a> {
    /// Create a new task repository.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist a new pending task. Returns its row id.
    pub async fn insert(&self, code: &str, payload: &str, due_at: i64) -> Result<i64, DbError> {
        let now = chrono::Utc::now().timestamp();

        let result = sqlx::query(
            r#"
            INSERT INTO tasks (code, payload, due_at, completed, created_at)
            VALUES (?, ?, ?, 0, ?)
            "#,
        )
        .bind(code)
        .bind(payload)
        .bind(due_at)
        .bind(now)
        .execute(self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// All pending tasks, soonest first. Used to rebuild the queue at startup.
    pub async fn pending(&self) -> Result<Vec<TaskRecord>, DbError> {
        let rows = sqlx::query_as::<_, (i64, String, String, i64, i64)>(
            r#"
            SELECT id, code, payload, due_at, created_at
            FROM tasks
            WHERE completed = 0
            ORDER BY due_at ASC, id ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, code, payload, due_at, created_at)| TaskRecord {
                id,
                code,
                payload,
                due_at,
                created_at,
            })
            .collect())
    }

    /// Number of pending tasks.
    pub async fn pending_count(&self) -> Result<i64, DbError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE completed = 0")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Mark a batch of tasks completed in a single statement.
    ///
    /// Returns the number of rows flipped; callers treat a short count as
    /// already-completed rows, not an error.
    pub async fn complete_many(&self, ids: &[i64]) -> Result<u64, DbError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "UPDATE tasks SET completed = 1 WHERE completed = 0 AND id IN ({placeholders})"
        );

        let mut query = sqlx::query(&sql);
        for id in ids {
            query = query.bind(id);
        }

        let result = query.execute(self.pool).await?;
        Ok(result.rows_affected())
    }
}
