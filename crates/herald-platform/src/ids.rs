//! Snowflake-style entity identifiers.
//!
//! Every platform entity the core cares about is addressed by a 64-bit
//! numeric id. Newtypes keep the four roles from being mixed up at call
//! sites; serde support is transparent (plain integers on the wire and in
//! stored task payloads).

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! snowflake {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Raw numeric value.
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

snowflake!(
    /// Identifies a guild (server).
    GuildId
);
snowflake!(
    /// Identifies a user account.
    UserId
);
snowflake!(
    /// Identifies a channel (or thread).
    ChannelId
);
snowflake!(
    /// Identifies a single message.
    MessageId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_raw_number() {
        assert_eq!(GuildId(42).to_string(), "42");
        assert_eq!(UserId::from(7).get(), 7);
    }

    #[test]
    fn serde_is_transparent() {
        let id = ChannelId(123456789012345678);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "123456789012345678");
        let back: ChannelId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
