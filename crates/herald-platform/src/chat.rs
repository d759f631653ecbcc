//! The outbound platform interface implemented by gateway adapters.

use async_trait::async_trait;
use thiserror::Error;

use crate::ids::{ChannelId, GuildId, MessageId, UserId};
use crate::perms::Permissions;
use crate::response::Response;

/// Errors surfaced by a [`Chat`] implementation.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The transport to the platform failed (socket dropped, timeout).
    #[error("platform transport failed: {0}")]
    Transport(String),
    /// The channel or user no longer exists on the platform.
    #[error("unknown recipient")]
    UnknownRecipient,
    /// The platform rejected the request outright.
    #[error("platform denied the request: {0}")]
    Denied(String),
}

/// Everything the bot core needs from a chat platform.
///
/// One implementation per gateway adapter. The core holds it behind
/// `Arc<dyn Chat>` and never assumes which platform sits behind it;
/// tests substitute [`MockChat`](crate::mock::MockChat).
#[async_trait]
pub trait Chat: Send + Sync {
    /// Deliver a response to a channel.
    async fn send(&self, channel: ChannelId, response: Response) -> Result<MessageId, ChatError>;

    /// Deliver a response to a user's direct-message channel.
    async fn send_dm(&self, user: UserId, response: Response) -> Result<MessageId, ChatError>;

    /// Effective permissions of a guild member in a channel.
    async fn member_permissions(
        &self,
        guild: GuildId,
        channel: ChannelId,
        user: UserId,
    ) -> Result<Permissions, ChatError>;

    /// Effective permissions of the bot's own account in a channel.
    async fn self_permissions(
        &self,
        guild: GuildId,
        channel: ChannelId,
    ) -> Result<Permissions, ChatError>;
}
