//! Error types for spec building and parsing.

use std::error::Error as StdError;
use std::fmt;

/// Boxed cause of a failed value conversion.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Raised while a `Command` is being built. Always returned by the offending
/// builder call; never deferred to parse time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpecError {
    #[error("{kind} name must be a non-empty string")]
    EmptyName { kind: &'static str },

    #[error("{owner}: invalid short alias '{alias}': {reason}")]
    InvalidShortAlias {
        owner: String,
        alias: String,
        reason: &'static str,
    },

    #[error("{owner}: invalid long alias '{alias}': {reason}")]
    InvalidLongAlias {
        owner: String,
        alias: String,
        reason: &'static str,
    },

    #[error("command {command}: item with name '{name}' already exists")]
    DuplicateName { command: String, name: String },

    #[error("command {command}: flag '{flag}' must have at least one short/long alias")]
    MissingAlias { command: String, flag: String },

    #[error("command {command}: required parameter '{param}' cannot follow an optional one")]
    RequiredAfterOptional { command: String, param: String },

    #[error("flag {flag}: only valued flags can set a value parser")]
    ParserOnNonValueFlag { flag: String },

    #[error("command {command}: alias '{alias}' maps to both '{first}' and '{second}'")]
    AliasConflict {
        command: String,
        alias: String,
        first: String,
        second: String,
    },

    #[error("alias conflict: '{alias}' selects both command '{first}' and command '{second}'")]
    CommandAliasConflict {
        alias: String,
        first: String,
        second: String,
    },
}

/// A cancellation raised from inside a conversion function.
///
/// It is never wrapped into `ParseError::InvalidArgument`; `parse` hands it
/// back as `ParseError::Interrupted` untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interrupted {
    reason: String,
}

impl Interrupted {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for Interrupted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.reason.is_empty() {
            f.write_str("interrupted")
        } else {
            write!(f, "interrupted: {}", self.reason)
        }
    }
}

impl StdError for Interrupted {}

/// Failure of a user supplied conversion function.
#[derive(Debug)]
pub enum ConvertError {
    /// Propagated to the caller unchanged.
    Interrupted(Interrupted),
    /// Wrapped into `ParseError::InvalidArgument`.
    Invalid(BoxError),
}

impl ConvertError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        let msg: String = msg.into();
        Self::Invalid(msg.into())
    }

    /// Wraps any other error as an invalid argument, for error types without a
    /// `From` impl: `.map_err(ConvertError::invalid_from)?`.
    pub fn invalid_from<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Invalid(Box::new(err))
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interrupted(i) => fmt::Display::fmt(i, f),
            Self::Invalid(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl From<Interrupted> for ConvertError {
    fn from(i: Interrupted) -> Self {
        Self::Interrupted(i)
    }
}

impl From<BoxError> for ConvertError {
    fn from(e: BoxError) -> Self {
        Self::Invalid(e)
    }
}

impl From<String> for ConvertError {
    fn from(s: String) -> Self {
        Self::Invalid(s.into())
    }
}

impl From<&str> for ConvertError {
    fn from(s: &str) -> Self {
        Self::Invalid(s.into())
    }
}

impl From<std::io::Error> for ConvertError {
    fn from(e: std::io::Error) -> Self {
        // Surface a terminal interrupt as a cancellation, not a bad argument.
        if e.kind() == std::io::ErrorKind::Interrupted {
            return Self::Interrupted(Interrupted::new(e.to_string()));
        }
        Self::Invalid(Box::new(e))
    }
}

impl From<std::num::ParseIntError> for ConvertError {
    fn from(e: std::num::ParseIntError) -> Self {
        Self::Invalid(Box::new(e))
    }
}

impl From<std::num::ParseFloatError> for ConvertError {
    fn from(e: std::num::ParseFloatError) -> Self {
        Self::Invalid(Box::new(e))
    }
}

impl From<std::str::ParseBoolError> for ConvertError {
    fn from(e: std::str::ParseBoolError) -> Self {
        Self::Invalid(Box::new(e))
    }
}

impl From<std::string::FromUtf8Error> for ConvertError {
    fn from(e: std::string::FromUtf8Error) -> Self {
        Self::Invalid(Box::new(e))
    }
}

/// Raised by `parse`. Nothing is returned to the caller alongside it.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("no command specified")]
    NoCommand,

    #[error("unknown command: '{token}'")]
    UnknownCommand { token: String },

    #[error("{command}: unknown flag '{flag}'")]
    UnknownFlag { command: String, flag: String },

    #[error("{command}: invalid argument '-'")]
    EmptyFlagCluster { command: String },

    #[error("{command}: flag '{flag}' was provided a value but is not a valued flag")]
    ValueNotAccepted { command: String, flag: String },

    #[error("{command}: expected a value after flag '{flag}'")]
    MissingValue { command: String, flag: String },

    #[error("{command}: invalid argument '{arg}' for '{target}' -- {source}")]
    InvalidArgument {
        command: String,
        target: String,
        arg: String,
        #[source]
        source: BoxError,
    },

    #[error("{command}: flag '{flag}' specified more than once")]
    DuplicateFlag { command: String, flag: String },

    #[error("{command}: unexpected argument '{token}'")]
    UnexpectedPositional { command: String, token: String },

    #[error("{command}: missing required argument '{name}'")]
    MissingRequiredPositional { command: String, name: String },

    #[error("{command}: required flags are missing: {}", quote_join(.names))]
    MissingRequiredFlags { command: String, names: Vec<String> },

    #[error(transparent)]
    Interrupted(#[from] Interrupted),
}

impl ParseError {
    /// Name of the command the failure happened in, if one was selected.
    pub fn command(&self) -> Option<&str> {
        match self {
            Self::NoCommand | Self::UnknownCommand { .. } | Self::Interrupted(_) => None,
            Self::UnknownFlag { command, .. }
            | Self::EmptyFlagCluster { command }
            | Self::ValueNotAccepted { command, .. }
            | Self::MissingValue { command, .. }
            | Self::InvalidArgument { command, .. }
            | Self::DuplicateFlag { command, .. }
            | Self::UnexpectedPositional { command, .. }
            | Self::MissingRequiredPositional { command, .. }
            | Self::MissingRequiredFlags { command, .. } => Some(command),
        }
    }

    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Interrupted(_))
    }
}

fn quote_join(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("'{n}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_required_flags_lists_every_name() {
        let err = ParseError::MissingRequiredFlags {
            command: "deploy".to_string(),
            names: vec!["name".to_string(), "region".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "deploy: required flags are missing: 'name', 'region'"
        );
        assert_eq!(err.command(), Some("deploy"));
    }

    #[test]
    fn invalid_argument_exposes_cause() {
        let cause = "abc".parse::<f64>().unwrap_err();
        let err = ParseError::InvalidArgument {
            command: "brightness".to_string(),
            target: "level".to_string(),
            arg: "abc".to_string(),
            source: Box::new(cause),
        };
        let msg = err.to_string();
        assert!(msg.contains("'abc'"), "{msg}");
        assert!(msg.contains("invalid float literal"), "{msg}");
        assert!(StdError::source(&err).is_some());
    }

    #[test]
    fn std_errors_convert_into_invalid() {
        fn convert(raw: &str) -> Result<i64, ConvertError> {
            Ok(raw.parse::<i64>()?)
        }
        assert!(matches!(convert("x"), Err(ConvertError::Invalid(_))));
        assert_eq!(convert("7").unwrap(), 7);
    }

    #[test]
    fn foreign_errors_wrap_with_invalid_from() {
        #[derive(Debug)]
        struct OutOfRange(i64);

        impl fmt::Display for OutOfRange {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{} is out of range", self.0)
            }
        }

        impl StdError for OutOfRange {}

        fn in_range(n: i64) -> Result<i64, OutOfRange> {
            if (0..=100).contains(&n) {
                Ok(n)
            } else {
                Err(OutOfRange(n))
            }
        }

        fn percent(raw: &str) -> Result<i64, ConvertError> {
            let n: i64 = raw.parse()?;
            in_range(n).map_err(ConvertError::invalid_from)
        }

        assert_eq!(percent("40").unwrap(), 40);
        let err = percent("140").unwrap_err();
        assert!(matches!(err, ConvertError::Invalid(_)));
        assert_eq!(err.to_string(), "140 is out of range");

        let json = serde_json::from_str::<i64>("nope").unwrap_err();
        assert!(matches!(
            ConvertError::invalid_from(json),
            ConvertError::Invalid(_)
        ));
    }

    #[test]
    fn io_interrupt_becomes_cancellation() {
        let io = std::io::Error::new(std::io::ErrorKind::Interrupted, "signal");
        assert!(matches!(
            ConvertError::from(io),
            ConvertError::Interrupted(_)
        ));
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(matches!(ConvertError::from(io), ConvertError::Invalid(_)));
    }

    #[test]
    fn interrupted_is_transparent() {
        let err = ParseError::from(Interrupted::new("ctrl-c"));
        assert!(err.is_interrupted());
        assert_eq!(err.to_string(), "interrupted: ctrl-c");
        assert_eq!(err.command(), None);
    }
}
