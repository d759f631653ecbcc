//! The dispatch pipeline: prefix match, parse, validate, execute.

use std::sync::Arc;

use herald_platform::{Chat, MessageEvent, Response};
use tracing::{Instrument, Level, debug, error, span};

use super::context::Context;
use super::registry::Registry;
use super::respond;
use crate::config::Config;
use crate::db::Database;
use crate::locales::Locales;
use crate::resolver::Resolver;
use crate::tasks::TaskQueue;

/// A parsed command invocation.
#[derive(Debug, PartialEq, Eq)]
struct Invocation<'a> {
    name: &'a str,
    args: Vec<&'a str>,
}

/// Split message content into a command name and arguments.
///
/// Returns `None` when the content does not start with the prefix or
/// contains nothing after it. Runs of whitespace collapse.
fn parse_invocation<'a>(content: &'a str, prefix: &str) -> Option<Invocation<'a>> {
    let rest = content.strip_prefix(prefix)?;
    let mut tokens = rest.split_whitespace();
    let name = tokens.next()?;
    Some(Invocation {
        name,
        args: tokens.collect(),
    })
}

/// Turns inbound messages into responses.
///
/// One dispatcher serves the whole process; it is cheap to share because
/// every collaborator is behind an `Arc` or a pool.
pub struct Dispatcher {
    registry: Registry,
    resolver: Resolver,
    db: Database,
    chat: Arc<dyn Chat>,
    queue: Arc<TaskQueue>,
    config: Arc<Config>,
    locales: Arc<Locales>,
}

impl Dispatcher {
    pub fn new(
        registry: Registry,
        db: Database,
        chat: Arc<dyn Chat>,
        queue: Arc<TaskQueue>,
        config: Arc<Config>,
        locales: Arc<Locales>,
    ) -> Self {
        Self {
            registry,
            resolver: Resolver::new(db.clone(), Arc::clone(&config)),
            db,
            chat,
            queue,
            config,
            locales,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Process one message. Returns the response to post in the
    /// originating channel, or `None` when the message is not a command
    /// for us.
    ///
    /// Entity resolution and activity recording happen for every
    /// message, command or not. Unknown command names stay silent: on a
    /// shared prefix another bot may own the name.
    pub async fn handle(&self, event: &MessageEvent) -> Option<Response> {
        if event.author.bot {
            return None;
        }

        let session = match self.resolver.resolve(event).await {
            Ok(session) => session,
            Err(e) => {
                error!(error = %e, message = %event.id, "Context resolution failed");
                return None;
            }
        };

        let invocation = parse_invocation(&event.content, &session.prefix)?;
        let Some(entry) = self.registry.get(invocation.name) else {
            debug!(name = %invocation.name, "Unknown command name");
            return None;
        };
        self.registry.record_use(entry.spec.code);

        let ctx = Context {
            event,
            args: &invocation.args,
            session: &session,
            db: &self.db,
            chat: &self.chat,
            queue: &self.queue,
            registry: &self.registry,
            config: &self.config,
            locales: &self.locales,
        };

        let command_span = span!(
            Level::DEBUG,
            "command",
            command = %entry.spec.code,
            user = %event.author.id,
            guild = ?event.guild_id.map(|g| g.get()),
        );

        let result = async {
            entry.validators.check(&ctx).await?;
            entry.handler.run(&ctx).await
        }
        .instrument(command_span)
        .await;

        match result {
            Ok(response) => Some(response),
            Err(err) => {
                if err.is_internal() {
                    error!(
                        command = %entry.spec.code,
                        code = err.error_code(),
                        error = %err,
                        "Command failed"
                    );
                } else {
                    debug!(
                        command = %entry.spec.code,
                        code = err.error_code(),
                        "Command rejected"
                    );
                }
                Some(respond::error_response(&err, ctx.catalog()))
            }
        }
    }
}
