//! Parsed values and the per-parse result container.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A single parsed (or default) value.
///
/// Conversion functions may return any of the plain variants, or wrap an
/// arbitrary type with [`Value::opaque`] and recover it with
/// [`Value::downcast_ref`].
#[derive(Clone, Default)]
pub enum Value {
    /// Explicit "no value" sentinel. This is the default of every flag/param
    /// that does not declare one.
    #[default]
    None,
    Bool(bool),
    Count(u64),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Opaque(Arc<dyn Any + Send + Sync>),
}

impl Value {
    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        Self::Opaque(Arc::new(value))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Python-style truthiness: zero, empty and `None` are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::None => false,
            Self::Bool(b) => *b,
            Self::Count(n) => *n != 0,
            Self::Int(n) => *n != 0,
            Self::Float(f) => *f != 0.0,
            Self::Str(s) => !s.is_empty(),
            Self::List(items) => !items.is_empty(),
            Self::Opaque(_) => true,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_count(&self) -> Option<u64> {
        match self {
            Self::Count(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Opaque(any) => any.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Count(n) => f.debug_tuple("Count").field(n).finish(),
            Self::Int(n) => f.debug_tuple("Int").field(n).finish(),
            Self::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Self::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Self::List(items) => f.debug_tuple("List").field(items).finish(),
            Self::Opaque(_) => f.write_str("Opaque(..)"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Count(n) => write!(f, "{n}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(s) => f.write_str(s),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Opaque(_) => f.write_str("<opaque>"),
        }
    }
}

// Opaque values compare by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::None, Self::None) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Count(a), Self::Count(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Opaque(a), Self::Opaque(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::None | Self::Opaque(_) => serializer.serialize_none(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Count(n) => serializer.serialize_u64(*n),
            Self::Int(n) => serializer.serialize_i64(*n),
            Self::Float(v) => serializer.serialize_f64(*v),
            Self::Str(s) => serializer.serialize_str(s),
            Self::List(items) => items.serialize(serializer),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

/// Outcome of a successful parse: the selected command plus one entry per
/// declared param and flag, params first, each in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Matches {
    command: String,
    values: IndexMap<String, Value>,
}

impl Matches {
    pub(crate) fn new(command: String, values: IndexMap<String, Value>) -> Self {
        Self { command, values }
    }

    /// Canonical name of the selected command (not the token that selected it).
    pub fn command_name(&self) -> &str {
        &self.command
    }

    pub fn values(&self) -> &IndexMap<String, Value> {
        &self.values
    }

    pub fn into_values(self) -> IndexMap<String, Value> {
        self.values
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// String value of a param, or the last value of a valued flag.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.values.get(name)? {
            Value::List(items) => items.last().and_then(Value::as_str),
            v => v.as_str(),
        }
    }

    /// All occurrences of a valued flag in encounter order.
    pub fn get_list(&self, name: &str) -> &[Value] {
        self.values
            .get(name)
            .and_then(Value::as_list)
            .unwrap_or(&[])
    }

    /// Occurrences of a counting flag; zero when it never appeared.
    pub fn count(&self, name: &str) -> u64 {
        self.values
            .get(name)
            .and_then(Value::as_count)
            .unwrap_or(0)
    }

    pub fn is_present(&self, name: &str) -> bool {
        self.values.get(name).is_some_and(Value::is_truthy)
    }

    /// Downcast an opaque conversion result (for a valued flag, the last one).
    pub fn get_as<T: Any>(&self, name: &str) -> Option<&T> {
        match self.values.get(name)? {
            Value::List(items) => items.last().and_then(|v| v.downcast_ref::<T>()),
            v => v.downcast_ref::<T>(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness_matches_help_rules() {
        assert!(!Value::None.is_truthy());
        assert!(!Value::Str(String::new()).is_truthy());
        assert!(!Value::Float(0.0).is_truthy());
        assert!(!Value::List(vec![]).is_truthy());
        assert!(Value::from("x").is_truthy());
        assert!(Value::Count(2).is_truthy());
        assert!(Value::opaque(0u8).is_truthy());
    }

    #[test]
    fn opaque_values_downcast() {
        #[derive(Debug, PartialEq)]
        struct Handle(u32);

        let v = Value::opaque(Handle(7));
        assert_eq!(v.downcast_ref::<Handle>(), Some(&Handle(7)));
        assert!(v.downcast_ref::<String>().is_none());
        assert_eq!(v, v.clone());
        assert_ne!(v, Value::opaque(Handle(7)));
    }

    #[test]
    fn matches_accessors() {
        let mut values = IndexMap::new();
        values.insert("file".to_string(), Value::from("in.txt"));
        values.insert(
            "tag".to_string(),
            Value::List(vec![Value::from("a"), Value::from("b")]),
        );
        values.insert("verbose".to_string(), Value::Count(3));
        values.insert("quiet".to_string(), Value::None);
        let m = Matches::new("show".to_string(), values);

        assert_eq!(m.command_name(), "show");
        assert_eq!(m.get_str("file"), Some("in.txt"));
        assert_eq!(m.get_str("tag"), Some("b"));
        assert_eq!(m.get_list("tag").len(), 2);
        assert!(m.get_list("file").is_empty());
        assert_eq!(m.count("verbose"), 3);
        assert_eq!(m.count("missing"), 0);
        assert!(!m.is_present("quiet"));
        assert!(m.is_present("verbose"));
    }

    #[test]
    fn serializes_to_plain_json() {
        let mut values = IndexMap::new();
        values.insert("n".to_string(), Value::Int(4));
        values.insert("out".to_string(), Value::List(vec![Value::from("a.txt")]));
        values.insert("img".to_string(), Value::opaque(vec![1u8, 2, 3]));
        let m = Matches::new("run".to_string(), values);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(
            json,
            r#"{"command":"run","values":{"n":4,"out":["a.txt"],"img":null}}"#
        );
    }
}
