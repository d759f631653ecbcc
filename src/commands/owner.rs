//! Owner-only commands.
//!
//! These are operator tooling, gated on the configured owner id rather
//! than guild permissions, and hidden from `help`. Their output is not
//! localized.

use async_trait::async_trait;
use herald_platform::Response;

use super::{Category, Command, CommandSpec, Context, ValidatorSpec};
use crate::error::{CommandError, CommandResult};

/// Shows the live state of the task queue and command usage.
pub struct QueueCommand;

#[async_trait]
impl Command for QueueCommand {
    fn spec(&self) -> CommandSpec {
        CommandSpec {
            code: "queue",
            aliases: &[],
            category: Category::Owner,
            summary: "Inspect the task queue",
            validators: ValidatorSpec::default(),
        }
    }

    async fn run(&self, ctx: &Context<'_>) -> CommandResult {
        if !ctx.is_owner() {
            return Err(CommandError::Plain(
                "This command is reserved for the bot owner.".to_string(),
            ));
        }

        let queued = ctx.queue.pending_len();
        let durable = ctx.db.tasks().pending_count().await?;
        let next = match ctx.queue.next_due_in() {
            Some(eta) => format!("in {}s", eta.as_secs()),
            None => "never (queue empty)".to_string(),
        };

        let usage = ctx.registry.get_command_stats();
        let usage_line = if usage.is_empty() {
            "none yet".to_string()
        } else {
            usage
                .iter()
                .take(5)
                .map(|(code, count)| format!("{code}: {count}"))
                .collect::<Vec<_>>()
                .join(", ")
        };

        Ok(Response::notice(
            "Task queue",
            format!(
                "queued: {queued} ({durable} durable rows pending)\nnext fire: {next}\ncommand use: {usage_line}"
            ),
        ))
    }
}
