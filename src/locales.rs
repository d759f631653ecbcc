//! Localized message catalogs.
//!
//! Catalogs are embedded TOML, parsed once at startup. A malformed
//! catalog is a build defect, so loading failures are fatal.

use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

const EN: &str = include_str!("../locales/en.toml");
const DE: &str = include_str!("../locales/de.toml");

/// Locale loading errors.
#[derive(Debug, Error)]
pub enum LocaleError {
    #[error("failed to parse {locale} catalog: {source}")]
    Parse {
        locale: &'static str,
        source: toml::de::Error,
    },
    #[error("default locale {0:?} has no catalog")]
    UnknownDefault(String),
}

/// Messages rendered for command failures.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorMessages {
    pub caller_permission: String,
    pub bot_permission: String,
    pub arg_count_exact: String,
    pub arg_count_at_least: String,
    pub arg_count_between: String,
    pub arg_length_max: String,
    pub arg_length_exact: String,
    pub arg_value: String,
    pub arg_format: String,
    pub guild_only: String,
    pub delay_out_of_range: String,
    pub internal: String,
}

/// Messages rendered for command replies.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplyMessages {
    pub pong: String,
    pub tracking_on: String,
    pub tracking_off: String,
    pub prefix_set: String,
    pub language_set: String,
    pub reminder_set: String,
    pub reminder_fire: String,
    pub activity_title: String,
    pub activity_self: String,
    pub activity_none: String,
    pub help_title: String,
}

/// One language's full message catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    pub errors: ErrorMessages,
    pub replies: ReplyMessages,
}

/// All known catalogs plus the configured fallback.
#[derive(Debug, Clone)]
pub struct Locales {
    catalogs: HashMap<String, Catalog>,
    default_locale: String,
}

impl Locales {
    /// Locale codes with an embedded catalog, in the order the `language`
    /// command advertises them.
    pub const SUPPORTED: &'static [&'static str] = &["en", "de"];

    /// Parse the embedded catalogs.
    pub fn builtin(default_locale: &str) -> Result<Self, LocaleError> {
        let mut catalogs = HashMap::new();
        catalogs.insert(
            "en".to_string(),
            toml::from_str(EN).map_err(|source| LocaleError::Parse {
                locale: "en",
                source,
            })?,
        );
        catalogs.insert(
            "de".to_string(),
            toml::from_str(DE).map_err(|source| LocaleError::Parse {
                locale: "de",
                source,
            })?,
        );

        if !catalogs.contains_key(default_locale) {
            return Err(LocaleError::UnknownDefault(default_locale.to_string()));
        }

        Ok(Self {
            catalogs,
            default_locale: default_locale.to_string(),
        })
    }

    /// The catalog for a locale, falling back to the default for unknown
    /// or unset locales.
    pub fn get(&self, locale: Option<&str>) -> &Catalog {
        locale
            .and_then(|l| self.catalogs.get(l))
            .unwrap_or_else(|| &self.catalogs[&self.default_locale])
    }

    pub fn is_supported(locale: &str) -> bool {
        Self::SUPPORTED.contains(&locale)
    }
}

/// Substitute `{name}` placeholders in a catalog template.
///
/// Unknown placeholders are left in place so a stale catalog shows the
/// gap instead of silently dropping text.
pub fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (name, value) in vars {
        out = out.replace(&format!("{{{name}}}"), value);
    }
    out
}
