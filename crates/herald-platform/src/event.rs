//! Inbound message events as delivered by a gateway adapter.
//!
//! Adapters translate whatever their platform sends on the wire into a
//! [`MessageEvent`] before handing it to the bot core. The core never sees
//! raw gateway payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{ChannelId, GuildId, MessageId, UserId};

/// The kind of channel a message arrived in.
///
/// Threads carry their parent text channel so the core can attribute
/// activity and settings lookups to the parent rather than the thread
/// itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// An ordinary text channel inside a guild.
    GuildText,
    /// A thread hanging off a guild text channel.
    Thread { parent_id: ChannelId },
    /// A one-to-one direct message channel.
    DirectMessage,
    /// Anything else the platform may invent (voice chat text, stages).
    Other,
}

/// The user who sent a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: UserId,
    /// Display name at the time the message was sent.
    pub name: String,
    /// Whether the platform flags this account as a bot.
    pub bot: bool,
}

/// A single chat message, normalized across platforms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEvent {
    pub id: MessageId,
    /// `None` for direct messages.
    pub guild_id: Option<GuildId>,
    pub channel_id: ChannelId,
    pub channel_kind: ChannelKind,
    pub author: Author,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

impl MessageEvent {
    /// The channel this message should be recorded under.
    ///
    /// Messages in threads are attributed to the parent text channel so a
    /// thread never shows up as a channel of its own.
    pub fn record_channel(&self) -> ChannelId {
        match self.channel_kind {
            ChannelKind::Thread { parent_id } => parent_id,
            _ => self.channel_id,
        }
    }

    /// True when the message was sent inside a guild.
    pub fn in_guild(&self) -> bool {
        self.guild_id.is_some()
    }
}
