//! Declarative command model.
//!
//! Every builder call validates its input immediately, so a `Command` that
//! made it through construction is always well formed:
//!
//! ```
//! use argspec::{Command, Flag, Param, Value};
//!
//! # fn main() -> Result<(), argspec::SpecError> {
//! let cmd = Command::new("brightness", "adjust the brightness of an image")?
//!     .arg(Param::new("image", "the file to open")?)?
//!     .arg(Param::new("level", "new brightness")?.parser(|s| Ok(Value::Float(s.parse()?))))?
//!     .arg(Flag::new("output", "the output file path")?.short("-o")?.long("--output")?.valued())?;
//! assert_eq!(cmd.params().len(), 2);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use crate::error::{ConvertError, SpecError};
use crate::value::Value;

/// Converts a raw token into a `Value`.
pub type Converter = Arc<dyn Fn(&str) -> Result<Value, ConvertError> + Send + Sync>;

/// How a flag consumes its occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlagKind {
    /// Boolean toggle; may appear at most once.
    #[default]
    Presence,
    /// Counts repeated occurrences (`-vvv`).
    Count,
    /// Takes an argument; repeatable, values accumulate in order.
    Value,
}

fn checked_name(kind: &'static str, name: impl Into<String>) -> Result<String, SpecError> {
    let name = name.into();
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(SpecError::EmptyName { kind });
    }
    Ok(trimmed.to_string())
}

fn checked_short(owner: &str, raw: &str) -> Result<String, SpecError> {
    let alias = raw.trim();
    let fail = |reason| SpecError::InvalidShortAlias {
        owner: owner.to_string(),
        alias: alias.to_string(),
        reason,
    };
    if alias.starts_with("--") {
        return Err(fail("short alias cannot start with '--'"));
    }
    if !alias.starts_with('-') {
        return Err(fail("short alias must start with '-'"));
    }
    if alias.chars().count() != 2 {
        return Err(fail("short alias must be exactly 2 characters long"));
    }
    Ok(alias.to_string())
}

fn checked_long(owner: &str, raw: &str) -> Result<String, SpecError> {
    let alias = raw.trim();
    let fail = |reason| SpecError::InvalidLongAlias {
        owner: owner.to_string(),
        alias: alias.to_string(),
        reason,
    };
    if !alias.starts_with("--") {
        return Err(fail("long alias must start with '--'"));
    }
    if alias.len() == 2 {
        return Err(fail("long alias must not be empty"));
    }
    Ok(alias.to_string())
}

fn describe(description: impl Into<String>) -> Option<String> {
    let description = description.into();
    if description.trim().is_empty() {
        None
    } else {
        Some(description)
    }
}

/// A top-level command with its own flags and positional params.
#[derive(Clone)]
pub struct Command {
    name: String,
    description: Option<String>,
    disable_name: bool,
    short: Vec<String>,
    long: Vec<String>,
    flags: Vec<Flag>,
    params: Vec<Param>,
}

impl Command {
    /// Pass an empty description to leave it unset.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Result<Self, SpecError> {
        Ok(Self {
            name: checked_name("command", name)?,
            description: describe(description),
            disable_name: false,
            short: Vec::new(),
            long: Vec::new(),
            flags: Vec::new(),
            params: Vec::new(),
        })
    }

    pub fn short(mut self, alias: &str) -> Result<Self, SpecError> {
        let alias = checked_short(&format!("command {}", self.name), alias)?;
        self.short.push(alias);
        Ok(self)
    }

    pub fn long(mut self, alias: &str) -> Result<Self, SpecError> {
        let alias = checked_long(&format!("command {}", self.name), alias)?;
        self.long.push(alias);
        Ok(self)
    }

    /// Only the aliases select this command; the bare name no longer does.
    pub fn disable_name(mut self) -> Self {
        self.disable_name = true;
        self
    }

    /// Add a flag or param, consuming and returning the command.
    pub fn arg(mut self, arg: impl Into<Arg>) -> Result<Self, SpecError> {
        self.push(arg)?;
        Ok(self)
    }

    /// Add a flag or param in place. On error the command is left untouched.
    pub fn push(&mut self, arg: impl Into<Arg>) -> Result<(), SpecError> {
        let arg = arg.into();
        let name = arg.name();
        if self.flags.iter().any(|f| f.name == name) || self.params.iter().any(|p| p.name == name)
        {
            return Err(SpecError::DuplicateName {
                command: self.name.clone(),
                name: name.to_string(),
            });
        }

        match arg {
            Arg::Flag(flag) => {
                if flag.short.is_empty() && flag.long.is_empty() {
                    return Err(SpecError::MissingAlias {
                        command: self.name.clone(),
                        flag: flag.name,
                    });
                }
                for alias in flag.short.iter().chain(&flag.long) {
                    if let Some(other) = self.flag_by_alias(alias) {
                        return Err(SpecError::AliasConflict {
                            command: self.name.clone(),
                            alias: alias.clone(),
                            first: other.name.clone(),
                            second: flag.name.clone(),
                        });
                    }
                }
                self.flags.push(flag);
            }
            Arg::Param(param) => {
                let after_optional = self.params.last().is_some_and(|p| !p.required);
                if param.required && after_optional {
                    return Err(SpecError::RequiredAfterOptional {
                        command: self.name.clone(),
                        param: param.name,
                    });
                }
                self.params.push(param);
            }
        }
        Ok(())
    }

    fn flag_by_alias(&self, alias: &str) -> Option<&Flag> {
        self.flags
            .iter()
            .find(|f| f.short.iter().chain(&f.long).any(|a| a == alias))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_name_disabled(&self) -> bool {
        self.disable_name
    }

    pub fn short_aliases(&self) -> &[String] {
        &self.short
    }

    pub fn long_aliases(&self) -> &[String] {
        &self.long
    }

    /// Short aliases followed by long aliases, in declaration order.
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.short.iter().chain(&self.long).map(String::as_str)
    }

    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn find_long_flag(&self, alias: &str) -> Option<&Flag> {
        self.flags.iter().find(|f| f.long.iter().any(|l| l == alias))
    }

    pub fn find_short_flag(&self, alias: &str) -> Option<&Flag> {
        self.flags.iter().find(|f| f.short.iter().any(|s| s == alias))
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("disable_name", &self.disable_name)
            .field("short", &self.short)
            .field("long", &self.long)
            .field("flags", &self.flags)
            .field("params", &self.params)
            .finish()
    }
}

/// A named, alias-addressed option.
#[derive(Clone)]
pub struct Flag {
    name: String,
    description: Option<String>,
    required: bool,
    short: Vec<String>,
    long: Vec<String>,
    kind: FlagKind,
    parser: Option<Converter>,
    default: Value,
}

impl Flag {
    /// New optional presence flag with no aliases yet.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Result<Self, SpecError> {
        Ok(Self {
            name: checked_name("flag", name)?,
            description: describe(description),
            required: false,
            short: Vec::new(),
            long: Vec::new(),
            kind: FlagKind::Presence,
            parser: None,
            default: Value::None,
        })
    }

    pub fn short(mut self, alias: &str) -> Result<Self, SpecError> {
        let alias = checked_short(&format!("flag {}", self.name), alias)?;
        self.short.push(alias);
        Ok(self)
    }

    pub fn long(mut self, alias: &str) -> Result<Self, SpecError> {
        let alias = checked_long(&format!("flag {}", self.name), alias)?;
        self.long.push(alias);
        Ok(self)
    }

    pub fn valued(mut self) -> Self {
        self.kind = FlagKind::Value;
        self
    }

    /// Fails if a value parser was already attached.
    pub fn count(mut self) -> Result<Self, SpecError> {
        if self.parser.is_some() {
            return Err(SpecError::ParserOnNonValueFlag { flag: self.name });
        }
        self.kind = FlagKind::Count;
        Ok(self)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Attach a value parser. Only valid once the flag is `valued()`.
    pub fn parser<F>(mut self, parser: F) -> Result<Self, SpecError>
    where
        F: Fn(&str) -> Result<Value, ConvertError> + Send + Sync + 'static,
    {
        if self.kind != FlagKind::Value {
            return Err(SpecError::ParserOnNonValueFlag { flag: self.name });
        }
        self.parser = Some(Arc::new(parser));
        Ok(self)
    }

    /// Value stored when the flag is optional and never given.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = value.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_optional(&self) -> bool {
        !self.required
    }

    pub fn short_aliases(&self) -> &[String] {
        &self.short
    }

    pub fn long_aliases(&self) -> &[String] {
        &self.long
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.short.iter().chain(&self.long).map(String::as_str)
    }

    pub fn kind(&self) -> FlagKind {
        self.kind
    }

    pub fn value_parser(&self) -> Option<&Converter> {
        self.parser.as_ref()
    }

    pub fn default_value(&self) -> &Value {
        &self.default
    }
}

impl fmt::Debug for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flag")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("required", &self.required)
            .field("short", &self.short)
            .field("long", &self.long)
            .field("kind", &self.kind)
            .field("parser", &self.parser.is_some())
            .field("default", &self.default)
            .finish()
    }
}

/// A positional argument. Required unless marked `optional()`.
#[derive(Clone)]
pub struct Param {
    name: String,
    description: Option<String>,
    required: bool,
    parser: Option<Converter>,
    default: Value,
}

impl Param {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Result<Self, SpecError> {
        Ok(Self {
            name: checked_name("param", name)?,
            description: describe(description),
            required: true,
            parser: None,
            default: Value::None,
        })
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn parser<F>(mut self, parser: F) -> Self
    where
        F: Fn(&str) -> Result<Value, ConvertError> + Send + Sync + 'static,
    {
        self.parser = Some(Arc::new(parser));
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = value.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_optional(&self) -> bool {
        !self.required
    }

    pub fn value_parser(&self) -> Option<&Converter> {
        self.parser.as_ref()
    }

    pub fn default_value(&self) -> &Value {
        &self.default
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Param")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("required", &self.required)
            .field("parser", &self.parser.is_some())
            .field("default", &self.default)
            .finish()
    }
}

/// Either kind of item a command accepts through `Command::arg`.
#[derive(Debug, Clone)]
pub enum Arg {
    Flag(Flag),
    Param(Param),
}

impl Arg {
    pub fn name(&self) -> &str {
        match self {
            Self::Flag(f) => f.name(),
            Self::Param(p) => p.name(),
        }
    }
}

impl From<Flag> for Arg {
    fn from(flag: Flag) -> Self {
        Self::Flag(flag)
    }
}

impl From<Param> for Arg {
    fn from(param: Param) -> Self {
        Self::Param(param)
    }
}
