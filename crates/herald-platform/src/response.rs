//! Outbound responses produced by command handlers.

use serde::{Deserialize, Serialize};

/// What the bot wants to say back.
///
/// Adapters decide how to render each variant on their platform; a
/// [`Notice`](Response::Notice) typically becomes an embed where the
/// platform supports one and falls back to plain text where it does not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Response {
    /// A plain chat message.
    Text(String),
    /// A titled block, for multi-line output such as listings.
    Notice { title: String, description: String },
}

impl Response {
    pub fn text(body: impl Into<String>) -> Self {
        Response::Text(body.into())
    }

    pub fn notice(title: impl Into<String>, description: impl Into<String>) -> Self {
        Response::Notice {
            title: title.into(),
            description: description.into(),
        }
    }

    /// The textual body regardless of variant.
    pub fn body(&self) -> &str {
        match self {
            Response::Text(body) => body,
            Response::Notice { description, .. } => description,
        }
    }
}
