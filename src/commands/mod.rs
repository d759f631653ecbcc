//! Chat command handlers.
//!
//! This module contains the [`Command`] trait, the registry that owns every
//! handler, and the dispatch pipeline that turns an inbound message into a
//! response.
//!
//! ## Declaration-first validation
//!
//! Each command declares what it needs up front in a [`CommandSpec`]:
//! permissions, argument counts, lengths, and value constraints. The
//! registry compiles those declarations once at startup and refuses to
//! start on a malformed one, so a handler body never re-checks its own
//! arguments.

pub mod context;
pub mod dispatch;
pub mod registry;
pub mod respond;
pub mod validate;

mod general;
mod owner;
mod settings;

pub use context::{Context, Session};
pub use dispatch::Dispatcher;
pub use registry::{Registry, RegistryError};
pub use validate::{CountRule, LengthMode, LengthRule, ValidatorSpec, ValueRule};

use crate::error::CommandResult;
use async_trait::async_trait;

/// Where a command shows up in `help`.
///
/// `Owner` commands are never listed; they exist for the operator of the
/// bot account only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    General,
    Settings,
    Owner,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::General => "General",
            Category::Settings => "Settings",
            Category::Owner => "Owner",
        }
    }
}

/// Static declaration of a command.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    /// Canonical name, lowercase.
    pub code: &'static str,
    /// Alternative names resolving to the same handler.
    pub aliases: &'static [&'static str],
    pub category: Category,
    /// One-line description shown by `help`.
    pub summary: &'static str,
    pub validators: ValidatorSpec,
}

/// A chat command.
#[async_trait]
pub trait Command: Send + Sync {
    /// The command's static declaration.
    fn spec(&self) -> CommandSpec;

    /// Execute after all declared validators have passed.
    async fn run(&self, ctx: &Context<'_>) -> CommandResult;
}
