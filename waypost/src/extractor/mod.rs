//! Defines the `Arg` values extracted from a request path and handed to handlers.

use std::fmt;

/// A single handler argument, extracted from a path variable or a conventional action key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Arg {
    /// An optional, untyped variable which was absent from the request path.
    Null,

    /// A value coerced by an `int` or `num` constraint, or a numeric action key.
    Int(i64),

    /// The raw (percent decoded) value of an untyped variable.
    Str(String),
}

impl Arg {
    /// Returns the integer value, if this argument holds one.
    pub fn as_int(&self) -> Option<i64> {
        match *self {
            Arg::Int(i) => Some(i),
            _ => None,
        }
    }

    /// Returns the string value, if this argument holds one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Arg::Str(s) => Some(s),
            _ => None,
        }
    }

    /// True when the argument stands in for an absent optional variable.
    pub fn is_null(&self) -> bool {
        *self == Arg::Null
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Null => f.write_str("null"),
            Arg::Int(i) => write!(f, "{}", i),
            Arg::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Arg {
    fn from(i: i64) -> Self {
        Arg::Int(i)
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Str(s.to_owned())
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::Str(s)
    }
}

impl PartialEq<i64> for Arg {
    fn eq(&self, other: &i64) -> bool {
        self.as_int() == Some(*other)
    }
}

impl PartialEq<&str> for Arg {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}
