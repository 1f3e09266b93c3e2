//! Defines the wrapping type for a literal-segment regex.

use regex::Regex;

use std::cmp::Ordering;

/// A regex matching one literal template segment against one request path segment. Implements
/// PartialEq, Eq, PartialOrd, and Ord by comparing the underlying &str representations of the
/// regular expression.
///
/// Literal segments are patterns in their own right, so a template segment such as `(en|de)`
/// matches either language code.
#[derive(Clone, Debug)]
pub struct LiteralSegmentRegex {
    regex: Regex,
}

impl LiteralSegmentRegex {
    /// Creates a new LiteralSegmentRegex from a literal template segment.
    ///
    /// The segment is wrapped in begin and end anchors to prevent it from matching more than
    /// intended, and matching is case-insensitive.
    pub fn new(segment: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("(?i)^(?:{})$", segment))?;
        Ok(LiteralSegmentRegex { regex })
    }

    /// Returns the pattern backing this regex as a `&str`.
    #[inline]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Wraps `regex::Regex::is_match` to return true if and only if the regex matches the whole
    /// of the string given.
    #[inline]
    pub fn is_match(&self, s: &str) -> bool {
        self.regex.is_match(s)
    }
}

impl PartialEq for LiteralSegmentRegex {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for LiteralSegmentRegex {}

impl PartialOrd for LiteralSegmentRegex {
    fn partial_cmp(&self, other: &LiteralSegmentRegex) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LiteralSegmentRegex {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}
