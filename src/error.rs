//! Unified error handling for herald.
//!
//! This module provides the error hierarchy for command execution, with
//! automatic conversions and log labeling. The chat-facing rendering of
//! these errors lives in [`crate::commands::respond`].

use herald_platform::Permissions;
use thiserror::Error;

// ============================================================================
// Command Errors (validation and execution)
// ============================================================================

/// Errors that can occur while validating or executing a command.
///
/// The first three groups are structured: they carry the data needed to
/// render a localized message. [`Plain`](CommandError::Plain) is shown to
/// the caller verbatim. Everything else is logged and rendered as a
/// generic failure notice.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("caller is missing permissions: {missing}")]
    CallerPermission { missing: Permissions },

    #[error("bot is missing permissions: {missing}")]
    BotPermission { missing: Permissions },

    #[error("wrong argument count: got {got}, want {min}..{max:?}")]
    ArgCount {
        min: usize,
        max: Option<usize>,
        got: usize,
    },

    #[error("argument {position} too long: {got} > {limit}")]
    ArgLength {
        /// 1-based argument position, for display.
        position: usize,
        limit: usize,
        /// Whether the length must match exactly rather than fit under the limit.
        exact: bool,
        got: usize,
    },

    #[error("argument {position} not allowed: {passed:?}")]
    ArgValue {
        position: usize,
        passed: String,
        allowed: Vec<String>,
    },

    #[error("argument {position} malformed: {passed:?}")]
    ArgFormat { position: usize, passed: String },

    /// A message composed by the handler, displayed to the caller as-is.
    #[error("{0}")]
    Plain(String),

    #[error("database error: {0}")]
    Db(#[from] crate::db::DbError),

    #[error("platform error: {0}")]
    Chat(#[from] herald_platform::ChatError),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl CommandError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::CallerPermission { .. } => "caller_permission",
            Self::BotPermission { .. } => "bot_permission",
            Self::ArgCount { .. } => "arg_count",
            Self::ArgLength { .. } => "arg_length",
            Self::ArgValue { .. } => "arg_value",
            Self::ArgFormat { .. } => "arg_format",
            Self::Plain(_) => "plain",
            Self::Db(_) => "db_error",
            Self::Chat(_) => "chat_error",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Whether this error should be logged as a bug rather than as a
    /// caller mistake.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Db(_) | Self::Chat(_) | Self::Internal(_))
    }
}

/// Result type for command handlers.
pub type CommandResult = Result<herald_platform::Response, CommandError>;

// ============================================================================
// Database Errors (re-exported, kept in db module for sqlx proximity)
// ============================================================================

// DbError stays in db/mod.rs because it has #[from] sqlx::Error which requires
// sqlx to be in scope. We just document that it exists there.
