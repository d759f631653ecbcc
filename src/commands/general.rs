//! General commands available to everyone.
//!
//! Handles ping, help, tracking, activity, and remind.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use herald_platform::Response;

use super::validate::{CountRule, ValueRule};
use super::{Category, Command, CommandSpec, Context, ValidatorSpec};
use crate::error::{CommandError, CommandResult};
use crate::locales::fill;
use crate::tasks::{ReminderPayload, ReminderTask};

/// Liveness check.
pub struct PingCommand;

#[async_trait]
impl Command for PingCommand {
    fn spec(&self) -> CommandSpec {
        CommandSpec {
            code: "ping",
            aliases: &[],
            category: Category::General,
            summary: "Check whether the bot is alive",
            validators: ValidatorSpec::default(),
        }
    }

    async fn run(&self, ctx: &Context<'_>) -> CommandResult {
        Ok(Response::text(ctx.catalog().replies.pong.clone()))
    }
}

/// Lists every visible command, grouped by category.
pub struct HelpCommand;

#[async_trait]
impl Command for HelpCommand {
    fn spec(&self) -> CommandSpec {
        CommandSpec {
            code: "help",
            aliases: &["commands"],
            category: Category::General,
            summary: "Show this command list",
            validators: ValidatorSpec::default(),
        }
    }

    async fn run(&self, ctx: &Context<'_>) -> CommandResult {
        let mut description = String::new();
        let mut current: Option<Category> = None;

        for command in ctx.registry.iter() {
            let spec = &command.spec;
            if spec.category == Category::Owner {
                continue;
            }
            if current != Some(spec.category) {
                if current.is_some() {
                    description.push('\n');
                }
                description.push_str("**");
                description.push_str(spec.category.label());
                description.push_str("**\n");
                current = Some(spec.category);
            }

            description.push_str(&ctx.session.prefix);
            description.push_str(spec.code);
            if !spec.aliases.is_empty() {
                description.push_str(&format!(" ({})", spec.aliases.join(", ")));
            }
            description.push_str(&format!(" - {}\n", spec.summary));
        }

        Ok(Response::notice(
            ctx.catalog().replies.help_title.clone(),
            description.trim_end().to_string(),
        ))
    }
}

static TRACKING_VALUES: &[ValueRule] = &[ValueRule::one_of(0, &["on", "off"])];

/// Per-user opt-out from activity statistics.
pub struct TrackingCommand;

#[async_trait]
impl Command for TrackingCommand {
    fn spec(&self) -> CommandSpec {
        CommandSpec {
            code: "tracking",
            aliases: &[],
            category: Category::General,
            summary: "Turn activity tracking for your messages on or off",
            validators: ValidatorSpec {
                arg_count: Some(CountRule::exactly(1)),
                arg_values: TRACKING_VALUES,
                ..Default::default()
            },
        }
    }

    async fn run(&self, ctx: &Context<'_>) -> CommandResult {
        let enable = ctx.args[0] == "on";
        ctx.db
            .entities()
            .set_trackable(ctx.event.author.id, enable)
            .await?;

        let catalog = ctx.catalog();
        let reply = if enable {
            catalog.replies.tracking_on.clone()
        } else {
            catalog.replies.tracking_off.clone()
        };
        Ok(Response::text(reply))
    }
}

/// Word-count leaderboard plus the caller's own rank.
pub struct ActivityCommand;

#[async_trait]
impl Command for ActivityCommand {
    fn spec(&self) -> CommandSpec {
        CommandSpec {
            code: "activity",
            aliases: &["rank"],
            category: Category::General,
            summary: "Show the most active members and your own rank",
            validators: ValidatorSpec::default(),
        }
    }

    async fn run(&self, ctx: &Context<'_>) -> CommandResult {
        let catalog = ctx.catalog();
        let Some(guild) = ctx.event.guild_id else {
            return Err(CommandError::Plain(catalog.errors.guild_only.clone()));
        };

        let activity = ctx.db.activity();
        let board = activity.leaderboard(guild, 5).await?;

        let mut lines = Vec::with_capacity(board.len() + 2);
        for (i, entry) in board.iter().enumerate() {
            lines.push(format!("{}. <@{}> - {}", i + 1, entry.user_id, entry.words));
        }

        let total = activity.user_total(guild, ctx.event.author.id).await?;
        let footer = if total > 0 {
            let rank = activity.user_rank(guild, ctx.event.author.id).await?;
            fill(
                &catalog.replies.activity_self,
                &[("rank", &rank.to_string()), ("words", &total.to_string())],
            )
        } else {
            catalog.replies.activity_none.clone()
        };
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(footer);

        Ok(Response::notice(
            catalog.replies.activity_title.clone(),
            lines.join("\n"),
        ))
    }
}

static REMIND_VALUES: &[ValueRule] = &[ValueRule::pattern(0, r"^\d+[smhd]$")];

/// Longest a reminder may be deferred.
const MAX_REMINDER_DELAY_DAYS: i64 = 365;

/// Parse a delay token like `10m` or `2d`. The validator has already
/// vetted the shape; this rejects zero and out-of-range delays.
fn parse_delay(token: &str) -> Option<Duration> {
    let (number, unit) = token.split_at(token.len() - 1);
    let n: i64 = number.parse().ok()?;
    if n == 0 {
        return None;
    }

    let delay = match unit {
        "s" => Duration::seconds(n),
        "m" => Duration::minutes(n),
        "h" => Duration::hours(n),
        "d" => Duration::days(n),
        _ => return None,
    };

    (delay <= Duration::days(MAX_REMINDER_DELAY_DAYS)).then_some(delay)
}

/// Schedules a durable reminder.
pub struct RemindCommand;

#[async_trait]
impl Command for RemindCommand {
    fn spec(&self) -> CommandSpec {
        CommandSpec {
            code: "remind",
            aliases: &["reminder"],
            category: Category::General,
            summary: "Schedule a reminder, e.g. remind 10m stretch your legs",
            validators: ValidatorSpec {
                arg_count: Some(CountRule::at_least(2)),
                arg_values: REMIND_VALUES,
                ..Default::default()
            },
        }
    }

    async fn run(&self, ctx: &Context<'_>) -> CommandResult {
        let catalog = ctx.catalog();
        let Some(delay) = parse_delay(ctx.args[0]) else {
            return Err(CommandError::Plain(catalog.errors.delay_out_of_range.clone()));
        };

        let now = Utc::now();
        let due = now + delay;
        let payload = ReminderPayload {
            user_id: ctx.event.author.id.get(),
            channel_id: ctx.event.channel_id.get(),
            guild_id: ctx.event.guild_id.map(|g| g.get()),
            text: ctx.args[1..].join(" "),
            locale: ctx.session.locale.clone(),
            created_at: now.timestamp(),
        };

        let json = serde_json::to_string(&payload)
            .map_err(|e| CommandError::Internal(e.into()))?;
        let id = ctx
            .db
            .tasks()
            .insert(ReminderTask::CODE, &json, due.timestamp())
            .await?;
        ctx.queue
            .push(Arc::new(ReminderTask::stored(id, due, payload)));

        Ok(Response::text(fill(
            &catalog.replies.reminder_set,
            &[("delay", ctx.args[0])],
        )))
    }
}
