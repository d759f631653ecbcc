//! # herald-platform
//!
//! Platform-facing types shared between the herald bot core and the gateway
//! adapters that connect it to a real chat platform.
//!
//! The bot core never talks to a platform API directly. It consumes inbound
//! [`MessageEvent`]s, inspects [`Permissions`], and produces [`Response`]
//! payloads through the [`Chat`] capability trait. Gateway adapters (one per
//! platform) implement [`Chat`] and translate between these types and their
//! platform's wire format.
//!
//! [`MockChat`] is a complete in-memory implementation used by the core's
//! test suite and as a stand-in when no adapter is wired up.

pub mod chat;
pub mod event;
pub mod ids;
pub mod mock;
pub mod perms;
pub mod response;

pub use chat::{Chat, ChatError};
pub use event::{Author, ChannelKind, MessageEvent};
pub use ids::{ChannelId, GuildId, MessageId, UserId};
pub use mock::{MockChat, Sent, SentTarget};
pub use perms::Permissions;
pub use response::Response;
