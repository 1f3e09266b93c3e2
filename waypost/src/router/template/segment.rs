//! Defines `Segment` and its variants for `PathTemplate`.

use std::fmt;

use crate::error::TemplateError;
use crate::router::template::regex::LiteralSegmentRegex;

/// Type coercion applied to the value of a variable segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Constraint {
    /// `{name:int}`, the leading integer of the value (`0` when there is none).
    Int,

    /// `{name:num}`, a non-negative number which also understands `yes`/`on`/`no`/`off`.
    Num,
}

/// A variable template segment: `{name}`, `{name?}`, `{name:int}`, `{name:num?}` and so on.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Variable {
    name: String,
    constraint: Option<Constraint>,
    optional: bool,
}

impl Variable {
    /// The variable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The type coercion applied to the value, if any.
    pub fn constraint(&self) -> Option<Constraint> {
        self.constraint
    }

    /// True when the request path may omit this segment.
    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

/// One `/`-delimited token of a compiled `PathTemplate`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Segment {
    /// Matched case-insensitively against the whole of the corresponding request path segment.
    ///
    /// Values matched by this segment are **not** passed to the handler.
    Literal {
        /// The literal text as written in the template.
        text: String,
        /// Regex used to match against a single segment of a request path.
        regex: LiteralSegmentRegex,
    },

    /// Captures the corresponding request path segment as a handler argument.
    Variable(Variable),
}

impl Segment {
    /// Parses a single non-empty template token.
    pub fn parse(token: &str) -> Result<Segment, TemplateError> {
        if token.len() >= 2 && token.starts_with('{') && token.ends_with('}') {
            return parse_variable(token);
        }

        let regex =
            LiteralSegmentRegex::new(token).map_err(|source| TemplateError::InvalidLiteral {
                segment: token.to_owned(),
                source,
            })?;

        Ok(Segment::Literal {
            text: token.to_owned(),
            regex,
        })
    }

    /// True for an optional variable, the only kind of segment a request path may leave out.
    pub fn is_optional(&self) -> bool {
        match self {
            Segment::Variable(v) => v.optional,
            Segment::Literal { .. } => false,
        }
    }

    /// Provides the variable this segment captures, if it is not a literal.
    pub fn variable(&self) -> Option<&Variable> {
        match self {
            Segment::Variable(v) => Some(v),
            Segment::Literal { .. } => None,
        }
    }
}

fn parse_variable(token: &str) -> Result<Segment, TemplateError> {
    let inner = &token[1..token.len() - 1];
    let (inner, optional) = match inner.strip_suffix('?') {
        Some(rest) => (rest, true),
        None => (inner, false),
    };

    let mut parts = inner.splitn(2, ':');
    let name = parts.next().unwrap_or("").trim();
    let constraint = match parts.next().map(str::trim) {
        Some("int") => Some(Constraint::Int),
        Some("num") => Some(Constraint::Num),
        _ => None,
    };

    if name.is_empty() {
        return Err(TemplateError::EmptyVariable(token.to_owned()));
    }

    Ok(Segment::Variable(Variable {
        name: name.to_owned(),
        constraint,
        optional,
    }))
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Literal { text, .. } => f.write_str(text),
            Segment::Variable(v) => {
                f.write_str("{")?;
                f.write_str(&v.name)?;
                match v.constraint {
                    Some(Constraint::Int) => f.write_str(":int")?,
                    Some(Constraint::Num) => f.write_str(":num")?,
                    None => (),
                }
                if v.optional {
                    f.write_str("?")?;
                }
                f.write_str("}")
            }
        }
    }
}
