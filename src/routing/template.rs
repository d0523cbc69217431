//! Upstream URL templates.
//!
//! A template is a path suffix such as `/{lang}/quarterlies/index.json`
//! appended to the configured upstream base. Placeholders are whole
//! segments and are filled from the captures of the matched pattern.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::routing::pattern::{Captures, PathPattern, Segment};
use crate::routing::RouteError;

/// Characters escaped when a captured value becomes one path segment.
/// Everything except RFC 3986 unreserved characters is encoded.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// A parsed upstream path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl UpstreamTemplate {
    /// Parse a template, checking every placeholder is bound by `pattern`.
    pub fn parse(source: &str, pattern: &PathPattern) -> Result<Self, RouteError> {
        // Same segment grammar as inbound patterns.
        let parsed = PathPattern::parse(source).map_err(|e| match e {
            RouteError::InvalidPattern { reason, .. } => RouteError::InvalidTemplate {
                template: source.to_string(),
                reason,
            },
            other => other,
        })?;

        for segment in parsed.segments() {
            if let Segment::Variable(name) = segment {
                if !pattern.has_variable(name) {
                    return Err(RouteError::UnboundVariable {
                        template: source.to_string(),
                        name: name.clone(),
                    });
                }
            }
        }

        Ok(Self {
            source: source.to_string(),
            segments: parsed.segments().to_vec(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Render the path with each captured value escaped as a single segment.
    pub fn render(&self, captures: &Captures) -> String {
        let mut path = String::new();
        for segment in &self.segments {
            path.push('/');
            match segment {
                Segment::Literal(literal) => path.push_str(literal),
                Segment::Variable(name) => {
                    let value = captures.get(name).unwrap_or_default();
                    path.extend(utf8_percent_encode(value, SEGMENT));
                }
            }
        }
        path
    }

    /// Full upstream URL for the given base.
    pub fn url(&self, base: &str, captures: &Captures) -> String {
        format!("{}{}", base.trim_end_matches('/'), self.render(captures))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day_pattern() -> PathPattern {
        PathPattern::parse("/quarterly/{lang}/{quarterly}/{lesson}/{day}").unwrap()
    }

    #[test]
    fn test_render_day_url() {
        let pattern = day_pattern();
        let template = UpstreamTemplate::parse(
            "/{lang}/quarterlies/{quarterly}/lessons/{lesson}/days/{day}/read/index.json",
            &pattern,
        )
        .unwrap();
        let captures = pattern.matches("/quarterly/en/2026-01/01/03").unwrap();

        assert_eq!(
            template.url("https://content.example.com/api/v1", &captures),
            "https://content.example.com/api/v1/en/quarterlies/2026-01/lessons/01/days/03/read/index.json"
        );
    }

    #[test]
    fn test_trailing_slash_on_base() {
        let pattern = PathPattern::parse("/quarterlies/{lang}").unwrap();
        let template = UpstreamTemplate::parse("/{lang}/quarterlies/index.json", &pattern).unwrap();
        let captures = pattern.matches("/quarterlies/es").unwrap();
        assert_eq!(
            template.url("http://127.0.0.1:3000/", &captures),
            "http://127.0.0.1:3000/es/quarterlies/index.json"
        );
    }

    #[test]
    fn test_values_are_escaped_as_one_segment() {
        let pattern = PathPattern::parse("/quarterlies/{lang}").unwrap();
        let template = UpstreamTemplate::parse("/{lang}/quarterlies/index.json", &pattern).unwrap();

        let captures = pattern.matches("/quarterlies/a%2F..%2Fadmin").unwrap();
        assert_eq!(template.render(&captures), "/a%2F..%2Fadmin/quarterlies/index.json");

        let captures = pattern.matches("/quarterlies/x%3Fy%23z%20w").unwrap();
        assert_eq!(template.render(&captures), "/x%3Fy%23z%20w/quarterlies/index.json");
    }

    #[test]
    fn test_unbound_variable_rejected() {
        let pattern = PathPattern::parse("/quarterlies/{lang}").unwrap();
        let err = UpstreamTemplate::parse("/{lang}/quarterlies/{id}/index.json", &pattern).unwrap_err();
        assert!(matches!(err, RouteError::UnboundVariable { ref name, .. } if name == "id"));
    }

    #[test]
    fn test_invalid_template_rejected() {
        let pattern = day_pattern();
        let err = UpstreamTemplate::parse("{lang}/index.json", &pattern).unwrap_err();
        assert!(matches!(err, RouteError::InvalidTemplate { .. }));
    }
}
