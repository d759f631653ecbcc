//! Command registry: construction, name lookup, and usage statistics.
//!
//! The registry is built once at startup. Building it compiles every
//! command's validator declaration and claims every name and alias;
//! any conflict or malformed declaration aborts startup.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

use super::validate::{ValidatorSet, ValidatorSpecError};
use super::{Command, CommandSpec};

/// Errors raised while building the registry. All of them are fatal.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("command name {name:?} registered twice (second claim by {code:?})")]
    DuplicateName { name: String, code: &'static str },
    #[error("command {code:?} has a malformed validator declaration: {source}")]
    Validator {
        code: &'static str,
        #[source]
        source: ValidatorSpecError,
    },
}

/// A command with its compiled declaration.
pub struct RegisteredCommand {
    pub handler: Box<dyn Command>,
    pub spec: CommandSpec,
    pub validators: ValidatorSet,
}

/// Registry of command handlers.
pub struct Registry {
    commands: Vec<RegisteredCommand>,
    /// Lowercased name or alias to index into `commands`.
    names: HashMap<String, usize>,
    /// Command usage counters, keyed by canonical code.
    command_counts: HashMap<&'static str, Arc<AtomicU64>>,
}

impl Registry {
    /// Create a registry with all built-in commands registered.
    pub fn new() -> Result<Self, RegistryError> {
        Self::with_commands(default_commands())
    }

    /// Create a registry from an explicit command list.
    pub fn with_commands(list: Vec<Box<dyn Command>>) -> Result<Self, RegistryError> {
        let mut commands = Vec::with_capacity(list.len());
        let mut names: HashMap<String, usize> = HashMap::new();
        let mut command_counts = HashMap::new();

        for handler in list {
            let spec = handler.spec();
            let validators = spec
                .validators
                .compile()
                .map_err(|source| RegistryError::Validator {
                    code: spec.code,
                    source,
                })?;

            let index = commands.len();
            for name in std::iter::once(spec.code).chain(spec.aliases.iter().copied()) {
                let key = name.to_ascii_lowercase();
                if names.insert(key, index).is_some() {
                    return Err(RegistryError::DuplicateName {
                        name: name.to_string(),
                        code: spec.code,
                    });
                }
            }

            command_counts.insert(spec.code, Arc::new(AtomicU64::new(0)));
            commands.push(RegisteredCommand {
                handler,
                spec,
                validators,
            });
        }

        Ok(Self {
            commands,
            names,
            command_counts,
        })
    }

    /// Look up a command by name or alias, case-insensitively.
    pub fn get(&self, name: &str) -> Option<&RegisteredCommand> {
        let key = name.to_ascii_lowercase();
        self.names.get(&key).map(|&i| &self.commands[i])
    }

    /// All registered commands, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredCommand> {
        self.commands.iter()
    }

    /// Count one use of a command.
    pub(super) fn record_use(&self, code: &str) {
        if let Some(counter) = self.command_counts.get(code) {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Get command usage statistics, most used first.
    pub fn get_command_stats(&self) -> Vec<(&'static str, u64)> {
        let mut stats: Vec<_> = self
            .command_counts
            .iter()
            .map(|(cmd, count)| (*cmd, count.load(Ordering::Relaxed)))
            .filter(|(_, count)| *count > 0) // Only include used commands
            .collect();

        // Sort by usage count (descending)
        stats.sort_by(|a, b| b.1.cmp(&a.1));
        stats
    }
}

/// All built-in commands, in the order `help` lists them.
fn default_commands() -> Vec<Box<dyn Command>> {
    vec![
        // General
        Box::new(super::general::PingCommand),
        Box::new(super::general::HelpCommand),
        Box::new(super::general::TrackingCommand),
        Box::new(super::general::ActivityCommand),
        Box::new(super::general::RemindCommand),
        // Settings
        Box::new(super::settings::PrefixCommand),
        Box::new(super::settings::LanguageCommand),
        // Owner
        Box::new(super::owner::QueueCommand),
    ]
}
