//! Integration tests for reminders: scheduling, persistence across
//! restarts, and delivery.

mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use common::{CHANNEL, TestBot, USER, guild_message, test_config};
use herald::Bot;
use herald_platform::{
    ChannelId, Chat, ChatError, GuildId, MessageId, MockChat, Permissions, Response, SentTarget,
    UserId,
};

#[tokio::test]
async fn test_remind_schedules_a_durable_task() {
    let tb = TestBot::spawn().await;

    let body = tb
        .dispatch(&guild_message("!remind 10m drink water"))
        .await
        .expect("remind should answer");
    assert_eq!(body, "Okay, I will remind you in 10m.");

    let durable = tb
        .bot
        .db()
        .tasks()
        .pending_count()
        .await
        .expect("Failed to count tasks");
    assert_eq!(durable, 1);

    // The reminder next to the seeded retention sweep.
    assert_eq!(tb.bot.queue().pending_len(), 2);
}

#[tokio::test]
async fn test_remind_rejects_a_malformed_delay() {
    let tb = TestBot::spawn().await;

    let body = tb
        .dispatch(&guild_message("!remind tomorrow stretch"))
        .await
        .expect("validation failure should answer");
    assert!(body.contains("\"tomorrow\" is not a valid value"));

    let durable = tb
        .bot
        .db()
        .tasks()
        .pending_count()
        .await
        .expect("Failed to count tasks");
    assert_eq!(durable, 0);
}

#[tokio::test]
async fn test_remind_rejects_out_of_range_delays() {
    let tb = TestBot::spawn().await;

    let body = tb
        .dispatch(&guild_message("!remind 999d nap"))
        .await
        .expect("out of range delay should answer");
    assert!(body.contains("between 1s and 365d"));

    let body = tb
        .dispatch(&guild_message("!remind 0m nap"))
        .await
        .expect("zero delay should answer");
    assert!(body.contains("between 1s and 365d"));
}

#[tokio::test]
async fn test_reminders_survive_a_restart() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("herald.db");
    let db_path = db_path.to_str().expect("temp path is not utf-8");

    {
        let tb = TestBot::spawn_with(test_config(db_path)).await;
        tb.dispatch(&guild_message("!remind 2h water the plants"))
            .await
            .expect("remind should answer");
    }

    let tb = TestBot::spawn_with(test_config(db_path)).await;

    // The stored reminder is live again, next to the seeded sweep.
    assert_eq!(tb.bot.queue().pending_len(), 2);
    let durable = tb
        .bot
        .db()
        .tasks()
        .pending_count()
        .await
        .expect("Failed to count tasks");
    assert_eq!(durable, 1);
}

#[tokio::test]
async fn test_unknown_stored_task_code_aborts_startup() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("herald.db");
    let db_path = db_path.to_str().expect("temp path is not utf-8");

    {
        let tb = TestBot::spawn_with(test_config(db_path)).await;
        // A row as a newer build would write it.
        tb.bot
            .db()
            .tasks()
            .insert("poll_close", "{}", chrono::Utc::now().timestamp() + 600)
            .await
            .expect("Failed to insert task row");
    }

    let result = Bot::new(test_config(db_path), Arc::new(MockChat::new())).await;
    assert!(result.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_reminder_fires_as_a_dm_and_completes() {
    let tb = TestBot::spawn().await;
    tb.bot.spawn_queue();

    tb.dispatch(&guild_message("!remind 1h water the plants"))
        .await
        .expect("remind should answer");

    tokio::time::sleep(Duration::from_secs(3601)).await;

    // Give the sweep time to finish its database work.
    let mut fired = Vec::new();
    for _ in 0..100 {
        fired = tb.outbound();
        if !fired.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].target, SentTarget::User(USER));
    assert_eq!(fired[0].response.body(), "Reminder: water the plants");

    // The backing row leaves the pending set.
    let mut durable = 1;
    for _ in 0..100 {
        durable = tb
            .bot
            .db()
            .tasks()
            .pending_count()
            .await
            .expect("Failed to count tasks");
        if durable == 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(durable, 0);
}

/// A backend whose DM door is always closed.
struct NoDmChat {
    inner: MockChat,
}

#[async_trait]
impl Chat for NoDmChat {
    async fn send(&self, channel: ChannelId, response: Response) -> Result<MessageId, ChatError> {
        self.inner.send(channel, response).await
    }

    async fn send_dm(&self, _user: UserId, _response: Response) -> Result<MessageId, ChatError> {
        Err(ChatError::UnknownRecipient)
    }

    async fn member_permissions(
        &self,
        guild: GuildId,
        channel: ChannelId,
        user: UserId,
    ) -> Result<Permissions, ChatError> {
        self.inner.member_permissions(guild, channel, user).await
    }

    async fn self_permissions(
        &self,
        guild: GuildId,
        channel: ChannelId,
    ) -> Result<Permissions, ChatError> {
        self.inner.self_permissions(guild, channel).await
    }
}

#[tokio::test(start_paused = true)]
async fn test_closed_dms_fall_back_to_the_origin_channel() {
    let chat = Arc::new(NoDmChat {
        inner: MockChat::new(),
    });
    let bot = Bot::new(test_config(":memory:"), chat.clone())
        .await
        .expect("Failed to start bot");
    bot.spawn_queue();

    bot.handle(&guild_message("!remind 5m stretch"))
        .await
        .expect("remind should answer");

    tokio::time::sleep(Duration::from_secs(301)).await;

    let mut sent = Vec::new();
    for _ in 0..100 {
        sent = chat.inner.sent();
        if !sent.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].target, SentTarget::Channel(CHANNEL));
    assert_eq!(sent[0].response.body(), "Reminder: stretch");
}
