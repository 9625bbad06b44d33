//! Typed path variables extracted from a matched request path.

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// The declared type of a placeholder in a path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VarKind {
    /// Signed integer without leading zeros (`{id:int}`).
    Int,
    /// Non-negative integer without leading zeros (`{age:nat}`).
    Nat,
    /// One or more ASCII letters or underscores (`{slug:str}`).
    Str,
    /// Arbitrary regex fragment, kept verbatim (`{file:\d{3}\.html}`).
    Pattern(String),
}

impl VarKind {
    /// Parse the type portion of a placeholder. Anything that is not one of
    /// the reserved type names is a regex fragment.
    pub fn parse(spec: &str) -> Self {
        match spec {
            "int" => VarKind::Int,
            "nat" => VarKind::Nat,
            "str" => VarKind::Str,
            other => VarKind::Pattern(other.to_string()),
        }
    }

    /// The regex the placeholder contributes to the matching rule.
    pub fn regex(&self) -> &str {
        match self {
            VarKind::Int => r"-?(?:0|[1-9][0-9]*)",
            VarKind::Nat => r"(?:0|[1-9][0-9]*)",
            VarKind::Str => r"[a-zA-Z_]+",
            VarKind::Pattern(fragment) => fragment,
        }
    }

    /// Convert raw captured text into a typed value.
    ///
    /// Returns `None` only when a numeric capture does not fit the target
    /// integer type.
    pub fn convert(&self, raw: &str) -> Option<Value> {
        match self {
            VarKind::Int => raw.parse().ok().map(Value::Int),
            VarKind::Nat => raw.parse().ok().map(Value::Nat),
            VarKind::Str => Some(Value::Str(raw.to_string())),
            VarKind::Pattern(_) => Some(Value::Raw(raw.to_string())),
        }
    }
}

/// A typed path variable value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Nat(u64),
    Str(String),
    /// Text captured by a regex placeholder, or a numeric capture that
    /// overflowed its type.
    Raw(String),
}

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Nat(n) => i64::try_from(*n).ok(),
            _ => None,
        }
    }

    pub fn as_nat(&self) -> Option<u64> {
        match self {
            Value::Nat(n) => Some(*n),
            Value::Int(n) => u64::try_from(*n).ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) | Value::Raw(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

/// Writes the value in canonical form. `-0` prints as `0`; the captured
/// text is kept in [`Vars::raw`].
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Nat(n) => write!(f, "{}", n),
            Value::Str(s) | Value::Raw(s) => f.write_str(s),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Nat(n) => serializer.serialize_u64(*n),
            Value::Str(s) | Value::Raw(s) => serializer.serialize_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    name: String,
    raw: String,
    value: Value,
}

/// Name to value mapping produced for one request by one path filter.
///
/// Entries keep the left-to-right order of the placeholders in the template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vars {
    entries: Vec<Entry>,
}

impl Vars {
    pub(crate) fn push(&mut self, name: impl Into<String>, raw: impl Into<String>, value: Value) {
        self.entries.push(Entry {
            name: name.into(),
            raw: raw.into(),
            value,
        });
    }

    fn entry(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entry(name).map(|entry| &entry.value)
    }

    /// The text exactly as it was captured from the path.
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.entry(name).map(|entry| entry.raw.as_str())
    }

    /// Shorthand for `get(name).and_then(Value::as_int)`.
    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_int)
    }

    pub fn nat(&self, name: &str) -> Option<u64> {
        self.get(name).and_then(Value::as_nat)
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .map(|entry| (entry.name.as_str(), &entry.value))
    }

    /// Names and captured text, left to right.
    pub fn iter_raw(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|entry| (entry.name.as_str(), entry.raw.as_str()))
    }
}

impl Serialize for Vars {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.name, &entry.value)?;
        }
        map.end()
    }
}
