//! Per-guild settings commands.
//!
//! Handles prefix and language. Both require the caller to manage the
//! guild and only work inside one.

use async_trait::async_trait;
use herald_platform::{Permissions, Response};

use super::validate::{CountRule, LengthRule, ValueRule};
use super::{Category, Command, CommandSpec, Context, ValidatorSpec};
use crate::error::{CommandError, CommandResult};
use crate::locales::{Locales, fill};

static PREFIX_LENGTHS: &[LengthRule] = &[LengthRule::max(0, 10)];

/// Changes the guild's command prefix.
pub struct PrefixCommand;

#[async_trait]
impl Command for PrefixCommand {
    fn spec(&self) -> CommandSpec {
        CommandSpec {
            code: "prefix",
            aliases: &[],
            category: Category::Settings,
            summary: "Change the command prefix for this server",
            validators: ValidatorSpec {
                caller_permissions: Permissions::MANAGE_GUILD,
                arg_count: Some(CountRule::exactly(1)),
                arg_lengths: PREFIX_LENGTHS,
                ..Default::default()
            },
        }
    }

    async fn run(&self, ctx: &Context<'_>) -> CommandResult {
        let catalog = ctx.catalog();
        let Some(guild) = ctx.event.guild_id else {
            return Err(CommandError::Plain(catalog.errors.guild_only.clone()));
        };

        let prefix = ctx.args[0];
        ctx.db.entities().set_prefix(guild, prefix).await?;

        Ok(Response::text(fill(
            &catalog.replies.prefix_set,
            &[("prefix", prefix)],
        )))
    }
}

static LANGUAGE_VALUES: &[ValueRule] = &[ValueRule::one_of(0, Locales::SUPPORTED)];

/// Changes the guild's response language.
pub struct LanguageCommand;

#[async_trait]
impl Command for LanguageCommand {
    fn spec(&self) -> CommandSpec {
        CommandSpec {
            code: "language",
            aliases: &["lang"],
            category: Category::Settings,
            summary: "Change the bot language for this server",
            validators: ValidatorSpec {
                caller_permissions: Permissions::MANAGE_GUILD,
                arg_count: Some(CountRule::exactly(1)),
                arg_values: LANGUAGE_VALUES,
                ..Default::default()
            },
        }
    }

    async fn run(&self, ctx: &Context<'_>) -> CommandResult {
        let Some(guild) = ctx.event.guild_id else {
            return Err(CommandError::Plain(ctx.catalog().errors.guild_only.clone()));
        };

        let locale = ctx.args[0];
        ctx.db.entities().set_locale(guild, locale).await?;

        // Confirm in the language that was just chosen.
        let reply = ctx.locales.get(Some(locale)).replies.language_set.clone();
        Ok(Response::text(reply))
    }
}
