//! Rendering of command errors into chat responses.
//!
//! Structured validation errors become localized messages built from the
//! session's catalog. [`CommandError::Plain`] is already a user-facing
//! message and passes through untouched. Everything else renders as the
//! catalog's generic failure notice; the dispatcher has logged the
//! details by the time this runs.

use herald_platform::Response;

use crate::error::CommandError;
use crate::locales::{Catalog, fill};

/// Render a command error for the caller.
pub fn error_response(err: &CommandError, catalog: &Catalog) -> Response {
    let text = match err {
        CommandError::CallerPermission { missing } => fill(
            &catalog.errors.caller_permission,
            &[("perms", &missing.to_string())],
        ),
        CommandError::BotPermission { missing } => fill(
            &catalog.errors.bot_permission,
            &[("perms", &missing.to_string())],
        ),
        CommandError::ArgCount { min, max, got } => match max {
            Some(max) if max == min => fill(
                &catalog.errors.arg_count_exact,
                &[("want", &min.to_string()), ("got", &got.to_string())],
            ),
            Some(max) => fill(
                &catalog.errors.arg_count_between,
                &[
                    ("min", &min.to_string()),
                    ("max", &max.to_string()),
                    ("got", &got.to_string()),
                ],
            ),
            None => fill(
                &catalog.errors.arg_count_at_least,
                &[("min", &min.to_string()), ("got", &got.to_string())],
            ),
        },
        CommandError::ArgLength {
            position,
            limit,
            exact,
            got,
        } => {
            let template = if *exact {
                &catalog.errors.arg_length_exact
            } else {
                &catalog.errors.arg_length_max
            };
            fill(
                template,
                &[
                    ("position", &position.to_string()),
                    ("limit", &limit.to_string()),
                    ("got", &got.to_string()),
                ],
            )
        }
        CommandError::ArgValue {
            position,
            passed,
            allowed,
        } => fill(
            &catalog.errors.arg_value,
            &[
                ("position", &position.to_string()),
                ("passed", passed),
                ("allowed", &allowed.join(", ")),
            ],
        ),
        CommandError::ArgFormat { position, passed } => fill(
            &catalog.errors.arg_format,
            &[("position", &position.to_string()), ("passed", passed)],
        ),
        CommandError::Plain(message) => message.clone(),
        CommandError::Db(_) | CommandError::Chat(_) | CommandError::Internal(_) => {
            catalog.errors.internal.clone()
        }
    };

    Response::Text(text)
}
