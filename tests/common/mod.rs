//! Integration test common infrastructure.
//!
//! Wires a complete bot against the recording mock backend and an
//! in-memory database, and provides builders for inbound message events.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;
use herald::Bot;
use herald::config::{ActivityConfig, BotConfig, Config, DatabaseConfig, StatsConfig};
use herald_platform::{
    Author, ChannelId, ChannelKind, GuildId, MessageEvent, MessageId, MockChat, Response, Sent,
    UserId,
};

/// The guild every test message arrives in unless built otherwise.
pub const GUILD: GuildId = GuildId(100);
pub const CHANNEL: ChannelId = ChannelId(200);
pub const USER: UserId = UserId(300);
pub const OWNER: UserId = UserId(900);

/// A fully wired bot instance.
pub struct TestBot {
    pub bot: Bot,
    pub chat: Arc<MockChat>,
}

impl TestBot {
    /// Spawn a bot over a fresh in-memory database.
    pub async fn spawn() -> TestBot {
        Self::spawn_with(test_config(":memory:")).await
    }

    /// Spawn a bot with the given configuration.
    pub async fn spawn_with(config: Config) -> TestBot {
        let chat = Arc::new(MockChat::new());
        let bot = Bot::new(config, chat.clone())
            .await
            .expect("Failed to start bot");
        TestBot { bot, chat }
    }

    /// Dispatch one event and return the rendered response body, if any.
    pub async fn dispatch(&self, event: &MessageEvent) -> Option<String> {
        self.bot
            .handle(event)
            .await
            .map(|response| response.body().to_string())
    }

    /// Everything the bot itself sent out-of-band (reminders, DMs).
    pub fn outbound(&self) -> Vec<Sent> {
        self.chat.sent()
    }
}

/// Test configuration over the given database path.
pub fn test_config(db_path: &str) -> Config {
    Config {
        bot: BotConfig {
            owner_id: Some(OWNER.get()),
            ..BotConfig::default()
        },
        database: DatabaseConfig {
            path: db_path.to_string(),
        },
        stats: StatsConfig::default(),
        activity: ActivityConfig::default(),
    }
}

/// A message from the default test user in the default guild channel.
pub fn guild_message(content: &str) -> MessageEvent {
    message_from(USER, content)
}

/// A guild message from a specific user.
pub fn message_from(user: UserId, content: &str) -> MessageEvent {
    MessageEvent {
        id: MessageId(1),
        guild_id: Some(GUILD),
        channel_id: CHANNEL,
        channel_kind: ChannelKind::GuildText,
        author: Author {
            id: user,
            name: format!("user-{}", user.get()),
            bot: false,
        },
        content: content.to_string(),
        sent_at: Utc::now(),
    }
}

/// A direct message from the default test user.
pub fn direct_message(content: &str) -> MessageEvent {
    MessageEvent {
        id: MessageId(2),
        guild_id: None,
        channel_id: ChannelId(4000),
        channel_kind: ChannelKind::DirectMessage,
        author: Author {
            id: USER,
            name: format!("user-{}", USER.get()),
            bot: false,
        },
        content: content.to_string(),
        sent_at: Utc::now(),
    }
}

/// Unwrap a text response body.
pub fn text_of(response: &Response) -> &str {
    match response {
        Response::Text(body) => body,
        Response::Notice { .. } => panic!("expected a plain text response, got a notice"),
    }
}
