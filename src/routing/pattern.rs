//! Path pattern matching.
//!
//! # Responsibilities
//! - Parse `/literal/{variable}` templates into segments
//! - Match an inbound path segment-by-segment, capturing variables
//! - Report specificity and structural overlap between patterns
//!
//! # Design Decisions
//! - Segment counts must be equal; trailing or missing segments never match
//! - Literal segments are case-sensitive
//! - Captures are percent-decoded; `.` and `..` never bind to a variable
//! - No regex to guarantee O(n) matching

use std::fmt;

use percent_encoding::percent_decode_str;

use crate::routing::RouteError;

/// One segment of a parsed pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Variable(String),
}

impl Segment {
    fn is_variable(&self) -> bool {
        matches!(self, Segment::Variable(_))
    }
}

/// Variable bindings produced by a successful match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captures {
    values: Vec<(String, String)>,
}

impl Captures {
    /// Look up the decoded value bound to `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A parsed route pattern such as `/quarterly/{lang}/{quarterlyId}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Parse a pattern. Variables are written as whole segments: `{name}`.
    pub fn parse(source: &str) -> Result<Self, RouteError> {
        let invalid = |reason: &str| RouteError::InvalidPattern {
            pattern: source.to_string(),
            reason: reason.to_string(),
        };

        let rest = source
            .strip_prefix('/')
            .ok_or_else(|| invalid("must start with '/'"))?;
        if rest.is_empty() {
            return Err(invalid("must contain at least one segment"));
        }

        let mut segments = Vec::new();
        for raw in rest.split('/') {
            if raw.is_empty() {
                return Err(invalid("empty segment"));
            }
            let segment = match raw.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(name) => {
                    if name.is_empty() || name.contains(['{', '}']) {
                        return Err(invalid("malformed variable"));
                    }
                    if segments
                        .iter()
                        .any(|s| matches!(s, Segment::Variable(n) if n == name))
                    {
                        return Err(RouteError::DuplicateVariable {
                            pattern: source.to_string(),
                            name: name.to_string(),
                        });
                    }
                    Segment::Variable(name.to_string())
                }
                None if raw.contains(['{', '}']) => return Err(invalid("malformed variable")),
                None => Segment::Literal(raw.to_string()),
            };
            segments.push(segment);
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// Number of literal + variable segments. Higher is more specific.
    pub fn specificity(&self) -> usize {
        self.segments.len()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether the pattern binds a variable called `name`.
    pub fn has_variable(&self, name: &str) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Variable(n) if n == name))
    }

    /// Match a raw request path, returning decoded captures on success.
    pub fn matches(&self, path: &str) -> Option<Captures> {
        let rest = path.strip_prefix('/')?;
        let mut parts = rest.split('/');
        let mut captures = Captures::default();

        for segment in &self.segments {
            let part = parts.next()?;
            if part.is_empty() {
                return None;
            }
            match segment {
                Segment::Literal(literal) => {
                    if part != literal {
                        return None;
                    }
                }
                Segment::Variable(name) => {
                    let value = percent_decode_str(part).decode_utf8().ok()?;
                    if value.is_empty() || value == "." || value == ".." {
                        return None;
                    }
                    captures.values.push((name.clone(), value.into_owned()));
                }
            }
        }

        if parts.next().is_some() {
            return None;
        }
        Some(captures)
    }

    /// Whether some path could match both patterns.
    pub fn overlaps(&self, other: &PathPattern) -> bool {
        self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|(a, b)| a.is_variable() || b.is_variable() || a == b)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
