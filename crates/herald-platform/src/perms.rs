//! Permission flags shared by callers and the bot itself.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Platform permissions, resolved per guild member and per channel.
    ///
    /// Only the flags the bot core actually checks are modeled. Adapters
    /// map their platform's full permission set down to these.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Permissions: u64 {
        /// Full control, implies every other flag on most platforms.
        const ADMINISTRATOR = 1 << 0;
        /// Change guild-wide settings such as the command prefix.
        const MANAGE_GUILD = 1 << 1;
        /// Create, edit, and delete channels.
        const MANAGE_CHANNELS = 1 << 2;
        /// Delete or pin other users' messages.
        const MANAGE_MESSAGES = 1 << 3;
        /// Remove members from the guild.
        const KICK_MEMBERS = 1 << 4;
        /// Permanently remove members from the guild.
        const BAN_MEMBERS = 1 << 5;
        /// Post messages in a channel.
        const SEND_MESSAGES = 1 << 6;
        /// Attach rich embeds to messages.
        const EMBED_LINKS = 1 << 7;
        /// Ping @everyone and roles.
        const MENTION_EVERYONE = 1 << 8;
        /// Add reactions to messages.
        const ADD_REACTIONS = 1 << 9;
    }
}

impl Permissions {
    /// Flags present in `required` but not in `self`.
    ///
    /// `ADMINISTRATOR` satisfies every requirement.
    pub fn missing(self, required: Permissions) -> Permissions {
        if self.contains(Permissions::ADMINISTRATOR) {
            return Permissions::empty();
        }
        required.difference(self)
    }

    /// Human-readable names of the set flags, in declaration order.
    pub fn names(self) -> Vec<&'static str> {
        self.iter_names().map(|(name, _)| name).collect()
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("(none)");
        }
        let mut first = true;
        for (name, _) in self.iter_names() {
            if !first {
                f.write_str(", ")?;
            }
            f.write_str(name)?;
            first = false;
        }
        Ok(())
    }
}
