//! Declarative argument and permission validation.
//!
//! Commands declare constraints as plain data ([`ValidatorSpec`]); the
//! registry compiles each declaration into a [`ValidatorSet`] at startup.
//! Compilation is where malformed declarations surface: an impossible
//! count range or an unparsable pattern aborts startup instead of
//! misbehaving at dispatch time.
//!
//! At dispatch time the checks run in a fixed order and stop at the first
//! failure: caller permissions, bot permissions, argument count, argument
//! lengths, argument values.

use super::context::Context;
use crate::error::CommandError;
use herald_platform::Permissions;
use regex::Regex;
use thiserror::Error;

/// Errors found while compiling a validator declaration.
#[derive(Debug, Error)]
pub enum ValidatorSpecError {
    #[error("argument count range is impossible: min {min} > max {max}")]
    ImpossibleCount { min: usize, max: usize },
    #[error("length rule for argument {index} has a zero limit")]
    ZeroLengthLimit { index: usize },
    #[error("argument {index} has more than one length rule")]
    DuplicateLengthRule { index: usize },
    #[error("value rule for argument {index} allows nothing")]
    EmptyValueList { index: usize },
    #[error("argument {index} has more than one value rule")]
    DuplicateValueRule { index: usize },
    #[error("value pattern for argument {index} does not parse: {source}")]
    BadPattern {
        index: usize,
        source: regex::Error,
    },
    #[error("rule for argument {index} is beyond the declared maximum of {max} arguments")]
    RuleBeyondArgs { index: usize, max: usize },
}

/// Bounds on how many arguments a command accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountRule {
    pub min: usize,
    /// `None` means unbounded.
    pub max: Option<usize>,
}

impl CountRule {
    pub const fn at_least(min: usize) -> Self {
        Self { min, max: None }
    }

    pub const fn exactly(n: usize) -> Self {
        Self { min: n, max: Some(n) }
    }

    pub const fn between(min: usize, max: usize) -> Self {
        Self { min, max: Some(max) }
    }
}

/// How a length limit is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthMode {
    /// The argument may be at most `limit` characters.
    Max,
    /// The argument must be exactly `limit` characters.
    Exact,
}

/// A length constraint on one positional argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthRule {
    /// 0-based argument position.
    pub index: usize,
    pub mode: LengthMode,
    pub limit: usize,
}

impl LengthRule {
    pub const fn max(index: usize, limit: usize) -> Self {
        Self {
            index,
            mode: LengthMode::Max,
            limit,
        }
    }

    pub const fn exact(index: usize, limit: usize) -> Self {
        Self {
            index,
            mode: LengthMode::Exact,
            limit,
        }
    }
}

/// A value constraint on one positional argument.
#[derive(Debug, Clone)]
pub enum ValueRule {
    /// The argument must equal one of the listed values.
    OneOf {
        index: usize,
        allowed: &'static [&'static str],
    },
    /// The argument must match the regular expression.
    Pattern {
        index: usize,
        pattern: &'static str,
    },
}

impl ValueRule {
    pub const fn one_of(index: usize, allowed: &'static [&'static str]) -> Self {
        ValueRule::OneOf { index, allowed }
    }

    pub const fn pattern(index: usize, pattern: &'static str) -> Self {
        ValueRule::Pattern { index, pattern }
    }

    fn index(&self) -> usize {
        match self {
            ValueRule::OneOf { index, .. } | ValueRule::Pattern { index, .. } => *index,
        }
    }
}

/// A command's declared constraints, before compilation.
#[derive(Debug, Clone, Default)]
pub struct ValidatorSpec {
    /// Permissions the caller must hold in the channel.
    pub caller_permissions: Permissions,
    /// Permissions the bot account must hold in the channel.
    pub bot_permissions: Permissions,
    pub arg_count: Option<CountRule>,
    pub arg_lengths: &'static [LengthRule],
    pub arg_values: &'static [ValueRule],
}

impl ValidatorSpec {
    /// Compile the declaration, rejecting anything malformed.
    pub fn compile(&self) -> Result<ValidatorSet, ValidatorSpecError> {
        if let Some(CountRule { min, max: Some(max) }) = self.arg_count
            && max < min
        {
            return Err(ValidatorSpecError::ImpossibleCount { min, max });
        }

        let max_args = self.arg_count.and_then(|c| c.max);

        let mut lengths = Vec::with_capacity(self.arg_lengths.len());
        for rule in self.arg_lengths {
            if rule.limit == 0 {
                return Err(ValidatorSpecError::ZeroLengthLimit { index: rule.index });
            }
            if lengths.iter().any(|r: &LengthRule| r.index == rule.index) {
                return Err(ValidatorSpecError::DuplicateLengthRule { index: rule.index });
            }
            if let Some(max) = max_args
                && rule.index >= max
            {
                return Err(ValidatorSpecError::RuleBeyondArgs {
                    index: rule.index,
                    max,
                });
            }
            lengths.push(*rule);
        }

        let mut values = Vec::with_capacity(self.arg_values.len());
        for rule in self.arg_values {
            let index = rule.index();
            if values.iter().any(|r: &CompiledValueRule| r.index() == index) {
                return Err(ValidatorSpecError::DuplicateValueRule { index });
            }
            if let Some(max) = max_args
                && index >= max
            {
                return Err(ValidatorSpecError::RuleBeyondArgs { index, max });
            }
            let compiled = match rule {
                ValueRule::OneOf { index, allowed } => {
                    if allowed.is_empty() {
                        return Err(ValidatorSpecError::EmptyValueList { index: *index });
                    }
                    CompiledValueRule::OneOf {
                        index: *index,
                        allowed,
                    }
                }
                ValueRule::Pattern { index, pattern } => CompiledValueRule::Pattern {
                    index: *index,
                    regex: Regex::new(pattern).map_err(|source| {
                        ValidatorSpecError::BadPattern {
                            index: *index,
                            source,
                        }
                    })?,
                },
            };
            values.push(compiled);
        }

        Ok(ValidatorSet {
            caller_permissions: self.caller_permissions,
            bot_permissions: self.bot_permissions,
            arg_count: self.arg_count,
            lengths,
            values,
        })
    }
}

#[derive(Debug)]
enum CompiledValueRule {
    OneOf {
        index: usize,
        allowed: &'static [&'static str],
    },
    Pattern {
        index: usize,
        regex: Regex,
    },
}

impl CompiledValueRule {
    fn index(&self) -> usize {
        match self {
            CompiledValueRule::OneOf { index, .. } | CompiledValueRule::Pattern { index, .. } => {
                *index
            }
        }
    }
}

/// A compiled, ready-to-run validator.
#[derive(Debug)]
pub struct ValidatorSet {
    caller_permissions: Permissions,
    bot_permissions: Permissions,
    arg_count: Option<CountRule>,
    lengths: Vec<LengthRule>,
    values: Vec<CompiledValueRule>,
}

impl ValidatorSet {
    /// Run every check in order, stopping at the first failure.
    pub async fn check(&self, ctx: &Context<'_>) -> Result<(), CommandError> {
        self.check_permissions(ctx).await?;
        self.check_args(ctx.args)
    }

    /// Permission checks. Commands that require permissions only work
    /// inside guilds; in a direct message the requirement can never be
    /// satisfied.
    async fn check_permissions(&self, ctx: &Context<'_>) -> Result<(), CommandError> {
        if self.caller_permissions.is_empty() && self.bot_permissions.is_empty() {
            return Ok(());
        }

        let Some(guild) = ctx.event.guild_id else {
            if !self.caller_permissions.is_empty() {
                return Err(CommandError::CallerPermission {
                    missing: self.caller_permissions,
                });
            }
            return Err(CommandError::BotPermission {
                missing: self.bot_permissions,
            });
        };

        if !self.caller_permissions.is_empty() {
            let held = ctx
                .chat
                .member_permissions(guild, ctx.event.channel_id, ctx.event.author.id)
                .await?;
            let missing = held.missing(self.caller_permissions);
            if !missing.is_empty() {
                return Err(CommandError::CallerPermission { missing });
            }
        }

        if !self.bot_permissions.is_empty() {
            let held = ctx
                .chat
                .self_permissions(guild, ctx.event.channel_id)
                .await?;
            let missing = held.missing(self.bot_permissions);
            if !missing.is_empty() {
                return Err(CommandError::BotPermission { missing });
            }
        }

        Ok(())
    }

    /// Argument checks: count, then lengths, then values.
    ///
    /// Positional rules only apply when the argument is present; absence
    /// is the count rule's business.
    pub fn check_args(&self, args: &[&str]) -> Result<(), CommandError> {
        if let Some(CountRule { min, max }) = self.arg_count {
            let got = args.len();
            if got < min || max.is_some_and(|m| got > m) {
                return Err(CommandError::ArgCount { min, max, got });
            }
        }

        for rule in &self.lengths {
            let Some(arg) = args.get(rule.index) else {
                continue;
            };
            let got = arg.chars().count();
            let failed = match rule.mode {
                LengthMode::Max => got > rule.limit,
                LengthMode::Exact => got != rule.limit,
            };
            if failed {
                return Err(CommandError::ArgLength {
                    position: rule.index + 1,
                    limit: rule.limit,
                    exact: matches!(rule.mode, LengthMode::Exact),
                    got,
                });
            }
        }

        for rule in &self.values {
            match rule {
                CompiledValueRule::OneOf { index, allowed } => {
                    let Some(arg) = args.get(*index) else {
                        continue;
                    };
                    if !allowed.contains(arg) {
                        return Err(CommandError::ArgValue {
                            position: index + 1,
                            passed: (*arg).to_string(),
                            allowed: allowed.iter().map(|s| s.to_string()).collect(),
                        });
                    }
                }
                CompiledValueRule::Pattern { index, regex } => {
                    let Some(arg) = args.get(*index) else {
                        continue;
                    };
                    if !regex.is_match(arg) {
                        return Err(CommandError::ArgFormat {
                            position: index + 1,
                            passed: (*arg).to_string(),
                        });
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_spec_compiles_and_passes() {
        let set = ValidatorSpec::default().compile().unwrap();
        set.check_args(&[]).unwrap();
        set.check_args(&["anything", "goes"]).unwrap();
    }

    #[test]
    fn impossible_count_range_is_rejected() {
        let spec = ValidatorSpec {
            arg_count: Some(CountRule::between(3, 1)),
            ..Default::default()
        };
        assert!(matches!(
            spec.compile(),
            Err(ValidatorSpecError::ImpossibleCount { min: 3, max: 1 })
        ));
    }

    #[test]
    fn bad_pattern_is_rejected() {
        static RULES: &[ValueRule] = &[ValueRule::pattern(0, r"([unclosed")];
        let spec = ValidatorSpec {
            arg_values: RULES,
            ..Default::default()
        };
        assert!(matches!(
            spec.compile(),
            Err(ValidatorSpecError::BadPattern { index: 0, .. })
        ));
    }

    #[test]
    fn empty_allow_list_is_rejected() {
        static RULES: &[ValueRule] = &[ValueRule::one_of(0, &[])];
        let spec = ValidatorSpec {
            arg_values: RULES,
            ..Default::default()
        };
        assert!(matches!(
            spec.compile(),
            Err(ValidatorSpecError::EmptyValueList { index: 0 })
        ));
    }

    #[test]
    fn rule_beyond_declared_max_is_rejected() {
        static RULES: &[LengthRule] = &[LengthRule::max(2, 5)];
        let spec = ValidatorSpec {
            arg_count: Some(CountRule::exactly(1)),
            arg_lengths: RULES,
            ..Default::default()
        };
        assert!(matches!(
            spec.compile(),
            Err(ValidatorSpecError::RuleBeyondArgs { index: 2, max: 1 })
        ));
    }

    #[test]
    fn duplicate_positional_rules_are_rejected() {
        static LENGTHS: &[LengthRule] = &[LengthRule::max(0, 5), LengthRule::exact(0, 3)];
        let spec = ValidatorSpec {
            arg_lengths: LENGTHS,
            ..Default::default()
        };
        assert!(matches!(
            spec.compile(),
            Err(ValidatorSpecError::DuplicateLengthRule { index: 0 })
        ));
    }

    #[test]
    fn count_check_reports_bounds_and_got() {
        let spec = ValidatorSpec {
            arg_count: Some(CountRule::between(1, 2)),
            ..Default::default()
        };
        let set = spec.compile().unwrap();

        set.check_args(&["one"]).unwrap();
        set.check_args(&["one", "two"]).unwrap();

        let err = set.check_args(&[]).unwrap_err();
        assert!(matches!(
            err,
            CommandError::ArgCount {
                min: 1,
                max: Some(2),
                got: 0
            }
        ));

        let err = set.check_args(&["a", "b", "c"]).unwrap_err();
        assert!(matches!(err, CommandError::ArgCount { got: 3, .. }));
    }

    #[test]
    fn length_modes_check_chars_not_bytes() {
        static LENGTHS: &[LengthRule] = &[LengthRule::max(0, 3)];
        let spec = ValidatorSpec {
            arg_lengths: LENGTHS,
            ..Default::default()
        };
        let set = spec.compile().unwrap();

        // Three codepoints, more than three bytes.
        set.check_args(&["äöü"]).unwrap();

        let err = set.check_args(&["äöüß"]).unwrap_err();
        assert!(matches!(
            err,
            CommandError::ArgLength {
                position: 1,
                limit: 3,
                exact: false,
                got: 4
            }
        ));
    }

    #[test]
    fn exact_length_rejects_shorter_too() {
        static LENGTHS: &[LengthRule] = &[LengthRule::exact(0, 4)];
        let spec = ValidatorSpec {
            arg_lengths: LENGTHS,
            ..Default::default()
        };
        let set = spec.compile().unwrap();

        set.check_args(&["abcd"]).unwrap();
        assert!(set.check_args(&["abc"]).is_err());
        assert!(set.check_args(&["abcde"]).is_err());
    }

    #[test]
    fn one_of_reports_passed_and_allowed() {
        static RULES: &[ValueRule] = &[ValueRule::one_of(0, &["on", "off"])];
        let spec = ValidatorSpec {
            arg_values: RULES,
            ..Default::default()
        };
        let set = spec.compile().unwrap();

        set.check_args(&["on"]).unwrap();

        let err = set.check_args(&["maybe"]).unwrap_err();
        match err {
            CommandError::ArgValue {
                position,
                passed,
                allowed,
            } => {
                assert_eq!(position, 1);
                assert_eq!(passed, "maybe");
                assert_eq!(allowed, vec!["on", "off"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn pattern_rule_matches_whole_value() {
        static RULES: &[ValueRule] = &[ValueRule::pattern(0, r"^\d+[smhd]$")];
        let spec = ValidatorSpec {
            arg_values: RULES,
            ..Default::default()
        };
        let set = spec.compile().unwrap();

        set.check_args(&["10m"]).unwrap();
        set.check_args(&["1d"]).unwrap();
        assert!(set.check_args(&["10 m"]).is_err());
        assert!(set.check_args(&["soon"]).is_err());
    }

    #[test]
    fn positional_rules_skip_absent_arguments() {
        static LENGTHS: &[LengthRule] = &[LengthRule::max(1, 2)];
        let spec = ValidatorSpec {
            arg_count: Some(CountRule::between(0, 2)),
            arg_lengths: LENGTHS,
            ..Default::default()
        };
        let set = spec.compile().unwrap();

        // Second argument absent: only the count rule speaks.
        set.check_args(&["first"]).unwrap();
        assert!(set.check_args(&["first", "toolong"]).is_err());
    }

    #[test]
    fn first_failure_wins() {
        static LENGTHS: &[LengthRule] = &[LengthRule::max(0, 1)];
        static RULES: &[ValueRule] = &[ValueRule::one_of(0, &["x"])];
        let spec = ValidatorSpec {
            arg_count: Some(CountRule::exactly(2)),
            arg_lengths: LENGTHS,
            arg_values: RULES,
            ..Default::default()
        };
        let set = spec.compile().unwrap();

        // Count, length, and value would all fail; count is reported.
        let err = set.check_args(&["wrong"]).unwrap_err();
        assert!(matches!(err, CommandError::ArgCount { .. }));
    }
}
