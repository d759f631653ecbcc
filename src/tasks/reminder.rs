//! Reminder delivery, the durable task kind.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use herald_platform::{ChannelId, Response, UserId};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Task, TaskContext};
use crate::locales::fill;

/// What a reminder needs to know at fire time, stored as JSON.
///
/// The locale is captured when the reminder is set; the guild's language
/// may change before it fires, but the reminder speaks the language it
/// was asked in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderPayload {
    pub user_id: u64,
    /// Channel the reminder was set in, used when the DM is refused.
    pub channel_id: u64,
    pub guild_id: Option<u64>,
    pub text: String,
    pub locale: String,
    /// Unix seconds at which the reminder was asked for.
    pub created_at: i64,
}

/// A one-shot reminder backed by a task row.
#[derive(Debug)]
pub struct ReminderTask {
    id: i64,
    due_at: DateTime<Utc>,
    payload: ReminderPayload,
}

impl ReminderTask {
    pub const CODE: &'static str = "reminder";

    /// Wrap an already-persisted reminder row.
    pub fn stored(id: i64, due_at: DateTime<Utc>, payload: ReminderPayload) -> Self {
        Self {
            id,
            due_at,
            payload,
        }
    }
}

#[async_trait]
impl Task for ReminderTask {
    fn code(&self) -> &'static str {
        Self::CODE
    }

    fn due_at(&self) -> DateTime<Utc> {
        self.due_at
    }

    fn storage_id(&self) -> Option<i64> {
        Some(self.id)
    }

    async fn run(&self, ctx: &TaskContext) -> anyhow::Result<()> {
        let catalog = ctx.locales.get(Some(&self.payload.locale));
        let message = Response::text(fill(
            &catalog.replies.reminder_fire,
            &[("text", &self.payload.text)],
        ));

        let user = UserId(self.payload.user_id);
        if let Err(e) = ctx.chat.send_dm(user, message.clone()).await {
            // Closed DMs are common; fall back to where the reminder was set.
            debug!(user = %user, error = %e, "Reminder DM refused, using origin channel");
            ctx.chat
                .send(ChannelId(self.payload.channel_id), message)
                .await?;
        }
        Ok(())
    }
}
