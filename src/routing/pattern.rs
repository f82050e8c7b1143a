//! Route pattern grammar: `["METHOD "] "/" segment {"/" segment}`.

use std::collections::HashSet;

use crate::http::request::Method;
use crate::routing::RouteError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    /// `{name}`
    Param(String),
}

/// A validated route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    /// `None` registers a catch-all handler.
    pub method: Option<Method>,
    pub segments: Vec<Segment>,
}

impl Pattern {
    /// Parses and validates a pattern such as `"GET /files/{file}"` or `"/echo/{str}"`.
    ///
    /// ```
    /// # use burrow::routing::pattern::{Pattern, Segment};
    /// # use burrow::http::request::Method;
    /// let pattern = Pattern::parse("GET /files/{file}").unwrap();
    /// assert_eq!(pattern.method, Some(Method::GET));
    /// assert_eq!(pattern.segments[1], Segment::Param("file".into()));
    /// ```
    pub fn parse(pattern: &str) -> Result<Self, RouteError> {
        let invalid = |reason: &'static str| RouteError::InvalidPattern {
            pattern: pattern.to_string(),
            reason,
        };

        let (method, path) = match pattern.split_once(' ') {
            Some((method, path)) => {
                let method = Method::from_str(method).ok_or_else(|| RouteError::InvalidMethod {
                    pattern: pattern.to_string(),
                    method: method.to_string(),
                })?;
                (Some(method), path)
            }
            None => (None, pattern),
        };

        if path.contains(' ') {
            return Err(invalid("more than one space"));
        }
        if !path.starts_with('/') {
            return Err(invalid("path must start with '/'"));
        }

        let mut seen = HashSet::new();
        let mut segments = Vec::new();
        for raw in split_path(path) {
            let segment = match param_name(raw) {
                Some("") => return Err(invalid("empty parameter name")),
                Some(name) if name.contains(['{', '}']) => {
                    return Err(invalid("braces inside a parameter name"));
                }
                Some(name) => {
                    if !seen.insert(name) {
                        return Err(invalid("parameter name used twice"));
                    }
                    Segment::Param(name.to_string())
                }
                None => Segment::Literal(raw.to_string()),
            };
            segments.push(segment);
        }

        Ok(Self { method, segments })
    }

    /// Declared parameter names, left to right.
    pub fn param_names(&self) -> Vec<String> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Param(name) => Some(name.clone()),
                Segment::Literal(_) => None,
            })
            .collect()
    }
}

/// Splits a path on `/`, dropping the empty segment before the leading slash.
///
/// `"/"` yields a single empty segment, so the root is an ordinary route.
pub fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.strip_prefix('/').unwrap_or(path).split('/')
}

fn param_name(segment: &str) -> Option<&str> {
    segment.strip_prefix('{')?.strip_suffix('}')
}
