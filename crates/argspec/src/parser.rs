//! Single-pass token scanner.
//!
//! The first token selects a command (see [`crate::registry`]); every following
//! token is dispatched on its prefix:
//! - `--name` / `--name=value`: long flag
//! - `-abc`: a cluster of short flags `-a`, `-b`, `-c`
//! - anything else: the next positional param
//!
//! A valued short flag always takes the *next token* as its value, never the
//! rest of its own cluster, so `-vo out.txt` counts `-v` and gives `-o` the
//! value `out.txt`, and `-oo a b` gives `-o` both `a` and `b`.

use indexmap::{IndexMap, IndexSet};

use crate::error::{ConvertError, ParseError};
use crate::registry::find_command;
use crate::spec::{Command, Converter, Flag, FlagKind};
use crate::value::{Matches, Value};

/// Parse a full token sequence: `argv[0]` selects the command, the rest is
/// matched against that command's flags and params.
///
/// On failure nothing is returned besides the error. Interrupts raised by
/// conversion functions come back as `ParseError::Interrupted`, unwrapped.
pub fn parse<S: AsRef<str>>(commands: &[Command], argv: &[S]) -> Result<Matches, ParseError> {
    let Some(first) = argv.first() else {
        return Err(ParseError::NoCommand);
    };
    let token = first.as_ref();
    let command = find_command(commands, token).ok_or_else(|| ParseError::UnknownCommand {
        token: token.to_string(),
    })?;
    tracing::debug!(command = command.name(), token, "selected command");

    ArgParser::new(command, argv, 1).run()
}

/// Parse `args` against an already selected command. `args` must not include
/// the command token itself.
pub fn parse_command<S: AsRef<str>>(command: &Command, args: &[S]) -> Result<Matches, ParseError> {
    ArgParser::new(command, args, 0).run()
}

struct ArgParser<'c, 'a, S> {
    command: &'c Command,
    argv: &'a [S],
    idx: usize,
    param_idx: usize,
    values: IndexMap<String, Value>,
    required_flags: IndexSet<&'c str>,
}

impl<'c, 'a, S: AsRef<str>> ArgParser<'c, 'a, S> {
    fn new(command: &'c Command, argv: &'a [S], start: usize) -> Self {
        let required_flags = command
            .flags()
            .iter()
            .filter(|f| f.is_required())
            .map(Flag::name)
            .collect();
        Self {
            command,
            argv,
            idx: start,
            param_idx: 0,
            values: IndexMap::new(),
            required_flags,
        }
    }

    fn run(mut self) -> Result<Matches, ParseError> {
        let argv = self.argv;
        while self.idx < argv.len() {
            let token = argv[self.idx].as_ref();
            self.idx += 1;
            tracing::trace!(command = self.command.name(), token, "scanning token");

            if token.starts_with("--") {
                self.parse_long(token)?;
            } else if token.starts_with('-') {
                self.parse_short(token)?;
            } else {
                self.parse_positional(token)?;
            }
        }
        self.finish()
    }

    fn parse_long(&mut self, token: &'a str) -> Result<(), ParseError> {
        let (alias, inline) = match token.split_once('=') {
            Some((alias, value)) => (alias, Some(value)),
            None => (token, None),
        };
        let command = self.command;
        let flag = command
            .find_long_flag(alias)
            .ok_or_else(|| self.unknown_flag(alias))?;
        self.required_flags.shift_remove(flag.name());

        if inline.is_some() && flag.kind() != FlagKind::Value {
            return Err(ParseError::ValueNotAccepted {
                command: command.name().to_string(),
                flag: alias.to_string(),
            });
        }
        self.apply(flag, alias, inline)
    }

    fn parse_short(&mut self, token: &'a str) -> Result<(), ParseError> {
        let cluster = &token[1..];
        if cluster.is_empty() {
            return Err(ParseError::EmptyFlagCluster {
                command: self.command.name().to_string(),
            });
        }

        let command = self.command;
        for c in cluster.chars() {
            let alias = format!("-{c}");
            let flag = command
                .find_short_flag(&alias)
                .ok_or_else(|| self.unknown_flag(&alias))?;
            self.required_flags.shift_remove(flag.name());
            self.apply(flag, &alias, None)?;
        }
        Ok(())
    }

    fn parse_positional(&mut self, token: &'a str) -> Result<(), ParseError> {
        let command = self.command;
        let Some(param) = command.params().get(self.param_idx) else {
            return Err(ParseError::UnexpectedPositional {
                command: command.name().to_string(),
                token: token.to_string(),
            });
        };
        self.param_idx += 1;

        let value = self.convert(param.value_parser(), param.name(), token)?;
        self.values.insert(param.name().to_string(), value);
        Ok(())
    }

    /// Record one occurrence of `flag`, addressed as `alias`.
    fn apply(&mut self, flag: &Flag, alias: &str, inline: Option<&'a str>) -> Result<(), ParseError> {
        match flag.kind() {
            FlagKind::Value => {
                let raw = match inline {
                    Some(raw) => raw,
                    None => self.next_value(alias)?,
                };
                let value = self.convert(flag.value_parser(), alias, raw)?;
                let slot = self
                    .values
                    .entry(flag.name().to_string())
                    .or_insert_with(|| Value::List(Vec::new()));
                if let Value::List(items) = slot {
                    items.push(value);
                }
            }
            FlagKind::Count => {
                let slot = self
                    .values
                    .entry(flag.name().to_string())
                    .or_insert(Value::Count(0));
                if let Value::Count(n) = slot {
                    *n += 1;
                }
            }
            FlagKind::Presence => {
                if self.values.contains_key(flag.name()) {
                    return Err(ParseError::DuplicateFlag {
                        command: self.command.name().to_string(),
                        flag: alias.to_string(),
                    });
                }
                self.values.insert(flag.name().to_string(), Value::Bool(true));
            }
        }
        Ok(())
    }

    fn next_value(&mut self, alias: &str) -> Result<&'a str, ParseError> {
        let argv = self.argv;
        let Some(raw) = argv.get(self.idx) else {
            return Err(ParseError::MissingValue {
                command: self.command.name().to_string(),
                flag: alias.to_string(),
            });
        };
        self.idx += 1;
        Ok(raw.as_ref())
    }

    fn convert(
        &self,
        parser: Option<&Converter>,
        target: &str,
        raw: &str,
    ) -> Result<Value, ParseError> {
        let Some(parser) = parser else {
            return Ok(Value::Str(raw.to_string()));
        };
        parser(raw).map_err(|err| match err {
            ConvertError::Interrupted(interrupt) => ParseError::Interrupted(interrupt),
            ConvertError::Invalid(source) => ParseError::InvalidArgument {
                command: self.command.name().to_string(),
                target: target.to_string(),
                arg: raw.to_string(),
                source,
            },
        })
    }

    fn unknown_flag(&self, alias: &str) -> ParseError {
        ParseError::UnknownFlag {
            command: self.command.name().to_string(),
            flag: alias.to_string(),
        }
    }

    fn finish(mut self) -> Result<Matches, ParseError> {
        let command = self.command;

        if let Some(param) = command.params().get(self.param_idx) {
            if param.is_required() {
                return Err(ParseError::MissingRequiredPositional {
                    command: command.name().to_string(),
                    name: param.name().to_string(),
                });
            }
        }

        if !self.required_flags.is_empty() {
            return Err(ParseError::MissingRequiredFlags {
                command: command.name().to_string(),
                names: self.required_flags.iter().map(|n| n.to_string()).collect(),
            });
        }

        // Rebuild in declaration order; anything still unset is optional here
        // and takes its declared default.
        let mut values = IndexMap::with_capacity(command.params().len() + command.flags().len());
        for param in command.params() {
            let value = self
                .values
                .swap_remove(param.name())
                .unwrap_or_else(|| param.default_value().clone());
            values.insert(param.name().to_string(), value);
        }
        for flag in command.flags() {
            let value = self
                .values
                .swap_remove(flag.name())
                .unwrap_or_else(|| flag.default_value().clone());
            values.insert(flag.name().to_string(), value);
        }

        tracing::debug!(command = command.name(), values = values.len(), "parsed arguments");
        Ok(Matches::new(command.name().to_string(), values))
    }
}
