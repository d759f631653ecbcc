//! An in-memory [`Chat`] implementation for tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use crate::chat::{Chat, ChatError};
use crate::ids::{ChannelId, GuildId, MessageId, UserId};
use crate::perms::Permissions;
use crate::response::Response;

/// Where a recorded response went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentTarget {
    Channel(ChannelId),
    User(UserId),
}

/// One response captured by [`MockChat`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sent {
    pub target: SentTarget,
    pub response: Response,
}

/// Records every outbound response and answers permission lookups from
/// tables seeded by the test.
///
/// Both permission tables start empty, so every permission check fails
/// until the test grants what it needs via [`grant_member`](Self::grant_member)
/// and [`grant_self`](Self::grant_self).
#[derive(Debug, Default)]
pub struct MockChat {
    sends: Mutex<Vec<Sent>>,
    member_perms: Mutex<HashMap<(GuildId, UserId), Permissions>>,
    self_perms: Mutex<HashMap<GuildId, Permissions>>,
    next_message_id: AtomicU64,
}

impl MockChat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant_member(&self, guild: GuildId, user: UserId, perms: Permissions) {
        self.member_perms.lock().unwrap().insert((guild, user), perms);
    }

    pub fn grant_self(&self, guild: GuildId, perms: Permissions) {
        self.self_perms.lock().unwrap().insert(guild, perms);
    }

    /// Everything sent so far, oldest first.
    pub fn sent(&self) -> Vec<Sent> {
        self.sends.lock().unwrap().clone()
    }

    /// Drains the recorded sends.
    pub fn take_sent(&self) -> Vec<Sent> {
        std::mem::take(&mut *self.sends.lock().unwrap())
    }

    fn record(&self, target: SentTarget, response: Response) -> MessageId {
        self.sends.lock().unwrap().push(Sent { target, response });
        MessageId(self.next_message_id.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

#[async_trait]
impl Chat for MockChat {
    async fn send(&self, channel: ChannelId, response: Response) -> Result<MessageId, ChatError> {
        Ok(self.record(SentTarget::Channel(channel), response))
    }

    async fn send_dm(&self, user: UserId, response: Response) -> Result<MessageId, ChatError> {
        Ok(self.record(SentTarget::User(user), response))
    }

    async fn member_permissions(
        &self,
        guild: GuildId,
        _channel: ChannelId,
        user: UserId,
    ) -> Result<Permissions, ChatError> {
        Ok(self
            .member_perms
            .lock()
            .unwrap()
            .get(&(guild, user))
            .copied()
            .unwrap_or_default())
    }

    async fn self_permissions(
        &self,
        guild: GuildId,
        _channel: ChannelId,
    ) -> Result<Permissions, ChatError> {
        Ok(self
            .self_perms
            .lock()
            .unwrap()
            .get(&guild)
            .copied()
            .unwrap_or_default())
    }
}
