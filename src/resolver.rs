//! Per-message context resolution.
//!
//! Every inbound message resolves the entities it touches (guild, user,
//! membership, channel), creating rows on first sight, and folds the
//! message into the activity statistics as a side effect. Command
//! handling starts from the [`Session`] this produces.

use std::sync::Arc;

use herald_platform::MessageEvent;

use crate::commands::Session;
use crate::config::Config;
use crate::db::{Database, DbError};

/// Resolves messages against the entity store.
pub struct Resolver {
    db: Database,
    config: Arc<Config>,
}

impl Resolver {
    pub fn new(db: Database, config: Arc<Config>) -> Self {
        Self { db, config }
    }

    /// Resolve the message's entities and record its activity.
    ///
    /// Direct messages resolve the user only; there is no guild or
    /// channel to track and no statistics to record.
    pub async fn resolve(&self, event: &MessageEvent) -> Result<Session, DbError> {
        let entities = self.db.entities();
        let user = entities.ensure_user(event.author.id).await?;

        let Some(guild_id) = event.guild_id else {
            return Ok(Session {
                guild: None,
                user,
                prefix: self.config.bot.default_prefix.clone(),
                locale: self.config.bot.default_locale.clone(),
            });
        };

        let guild = entities.ensure_guild(guild_id).await?;
        entities.ensure_member(guild_id, event.author.id).await?;

        // Thread messages count against the parent text channel.
        let channel = event.record_channel();
        entities.ensure_channel(channel, guild_id).await?;

        if user.trackable {
            let words = countable_words(&event.content);
            if words > 0 {
                self.db
                    .activity()
                    .record(
                        guild_id,
                        channel,
                        event.author.id,
                        words,
                        event.sent_at.timestamp(),
                    )
                    .await?;
            }
        }

        let prefix = guild
            .prefix
            .clone()
            .unwrap_or_else(|| self.config.bot.default_prefix.clone());
        let locale = guild
            .locale
            .clone()
            .unwrap_or_else(|| self.config.bot.default_locale.clone());

        Ok(Session {
            guild: Some(guild),
            user,
            prefix,
            locale,
        })
    }
}

/// Count the words of a message that matter for activity statistics.
///
/// A word counts when it is at least three characters long and contains
/// at least one letter. Mention and channel-reference tokens never
/// count, however long they are.
pub fn countable_words(content: &str) -> i64 {
    content
        .split_whitespace()
        .filter(|token| {
            if token.starts_with("<@") || token.starts_with("<#") {
                return false;
            }
            token.chars().count() >= 3 && token.chars().any(|c| c.is_alphabetic())
        })
        .count() as i64
}
