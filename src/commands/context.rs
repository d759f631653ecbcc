//! Command execution context.

use std::sync::Arc;

use herald_platform::{Chat, MessageEvent};

use super::registry::Registry;
use crate::config::Config;
use crate::db::{Database, Guild, User};
use crate::locales::{Catalog, Locales};
use crate::tasks::TaskQueue;

/// Everything resolved about the message before its command runs:
/// the stored entities plus the effective per-guild settings.
#[derive(Debug, Clone)]
pub struct Session {
    /// `None` for direct messages.
    pub guild: Option<Guild>,
    pub user: User,
    /// The prefix this message was matched against.
    pub prefix: String,
    /// The locale responses are rendered in.
    pub locale: String,
}

/// Context passed to each command handler.
pub struct Context<'a> {
    /// The triggering message.
    pub event: &'a MessageEvent,
    /// Arguments after the command name, whitespace-split.
    pub args: &'a [&'a str],
    /// Resolved entities and settings.
    pub session: &'a Session,
    pub db: &'a Database,
    pub chat: &'a Arc<dyn Chat>,
    pub queue: &'a Arc<TaskQueue>,
    /// The registry, for commands that enumerate other commands.
    pub registry: &'a Registry,
    pub config: &'a Config,
    pub locales: &'a Locales,
}

impl Context<'_> {
    /// The message catalog for this session's locale.
    pub fn catalog(&self) -> &Catalog {
        self.locales.get(Some(&self.session.locale))
    }

    /// Whether the caller is the configured bot owner.
    pub fn is_owner(&self) -> bool {
        self.config.bot.owner_id == Some(self.event.author.id.get())
    }
}
