//! Rewrite templates.
//!
//! # Responsibilities
//! - Tokenize a rewrite target into literals and capture references
//! - Validate references against the pattern's capture groups
//! - Expand the template against a [`MatchCapture`]
//!
//! # Reference Syntax
//! - `[*]`      every captured segment, all groups, slash-joined
//! - `[*g]`     every segment of group `g`, slash-joined
//! - `[*g(s)]`  segment `s` of group `g`
//!
//! Group and position indices are 0-based.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::matcher::MatchCapture;
use super::pattern::{parse_count, RoutePattern};
use super::{RouteError, PLACEHOLDER_CLOSE, PLACEHOLDER_OPEN};

/// A rewrite target as written in configuration.
///
/// A single string is slash-split after stripping one leading and one
/// trailing slash; a list is taken token by token, untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RewriteSource {
    Path(String),
    Segments(Vec<String>),
}

impl From<&str> for RewriteSource {
    fn from(path: &str) -> Self {
        RewriteSource::Path(path.to_string())
    }
}

impl From<String> for RewriteSource {
    fn from(path: String) -> Self {
        RewriteSource::Path(path)
    }
}

impl From<Vec<String>> for RewriteSource {
    fn from(segments: Vec<String>) -> Self {
        RewriteSource::Segments(segments)
    }
}

impl From<Vec<&str>> for RewriteSource {
    fn from(segments: Vec<&str>) -> Self {
        RewriteSource::Segments(segments.into_iter().map(str::to_string).collect())
    }
}

impl fmt::Display for RewriteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RewriteSource::Path(path) => f.write_str(path),
            RewriteSource::Segments(segments) => write!(f, "{}", segments.join("/")),
        }
    }
}

/// One token of a rewrite template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteToken {
    Literal(String),
    /// `[*]`
    All,
    /// `[*g]`
    Group(usize),
    /// `[*g(s)]`
    Segment { group: usize, position: usize },
}

impl RewriteToken {
    pub fn parse(raw: &str) -> Result<Self, RouteError> {
        if !raw.contains(PLACEHOLDER_OPEN) {
            return Ok(RewriteToken::Literal(raw.to_string()));
        }

        let invalid = || RouteError::InvalidReference(raw.to_string());
        let inner = raw
            .strip_prefix(PLACEHOLDER_OPEN)
            .and_then(|rest| rest.strip_suffix(PLACEHOLDER_CLOSE))
            .ok_or_else(invalid)?;

        if inner.is_empty() {
            return Ok(RewriteToken::All);
        }

        match inner.split_once('(') {
            Some((group, position)) => {
                let position = position.strip_suffix(')').ok_or_else(invalid)?;
                Ok(RewriteToken::Segment {
                    group: parse_count(group).ok_or_else(invalid)?,
                    position: parse_count(position).ok_or_else(invalid)?,
                })
            }
            None => parse_count(inner)
                .map(RewriteToken::Group)
                .ok_or_else(invalid),
        }
    }

    pub fn is_reference(&self) -> bool {
        !matches!(self, RewriteToken::Literal(_))
    }
}

impl fmt::Display for RewriteToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RewriteToken::Literal(value) => f.write_str(value),
            RewriteToken::All => write!(f, "[*]"),
            RewriteToken::Group(group) => write!(f, "[*{}]", group),
            RewriteToken::Segment { group, position } => write!(f, "[*{}({})]", group, position),
        }
    }
}

/// A tokenized rewrite target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteTemplate {
    tokens: Vec<RewriteToken>,
}

impl RewriteTemplate {
    pub fn parse(source: &RewriteSource) -> Result<Self, RouteError> {
        let tokens = match source {
            RewriteSource::Path(path) => {
                let trimmed = path.strip_prefix('/').unwrap_or(path);
                let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
                trimmed
                    .split('/')
                    .map(RewriteToken::parse)
                    .collect::<Result<Vec<_>, _>>()?
            }
            RewriteSource::Segments(segments) => segments
                .iter()
                .map(|segment| RewriteToken::parse(segment))
                .collect::<Result<Vec<_>, _>>()?,
        };
        Ok(Self { tokens })
    }

    pub fn tokens(&self) -> &[RewriteToken] {
        &self.tokens
    }

    /// Check every reference against the groups `pattern` can capture.
    ///
    /// `[*g(s)]` is accepted only when group `g` always holds more than `s`
    /// segments, so a validated template never fails to expand.
    pub fn validate(&self, pattern: &RoutePattern) -> Result<(), RouteError> {
        let groups = pattern.groups();
        for token in &self.tokens {
            let (group, position) = match token {
                RewriteToken::Literal(_) | RewriteToken::All => continue,
                RewriteToken::Group(group) => (*group, None),
                RewriteToken::Segment { group, position } => (*group, Some(*position)),
            };

            let bounds = groups.get(group).ok_or_else(|| RouteError::UnknownGroup {
                token: token.to_string(),
                group,
                available: groups.len(),
            })?;

            // Only positions below the group's minimum are present on every match
            if let Some(position) = position {
                if position >= bounds.min {
                    return Err(RouteError::PositionOutOfRange {
                        token: token.to_string(),
                        group,
                        position,
                        limit: bounds.min,
                    });
                }
            }
        }
        Ok(())
    }

    /// Build the rewritten path from `capture`.
    ///
    /// Group references that expand to nothing (an empty group) are dropped so
    /// the result never carries doubled or trailing separators. A single
    /// captured segment is kept even when it is the empty string.
    pub fn expand(&self, capture: &MatchCapture) -> Result<String, RouteError> {
        let mut parts: Vec<String> = Vec::with_capacity(self.tokens.len());

        for token in &self.tokens {
            let part = match token {
                RewriteToken::Literal(value) => {
                    parts.push(value.clone());
                    continue;
                }
                RewriteToken::All => capture.segments().collect::<Vec<_>>().join("/"),
                RewriteToken::Group(group) => capture
                    .group(*group)
                    .ok_or_else(|| RouteError::UnknownGroup {
                        token: token.to_string(),
                        group: *group,
                        available: capture.len(),
                    })?
                    .join("/"),
                RewriteToken::Segment { group, position } => {
                    let segments = capture.group(*group).ok_or_else(|| RouteError::UnknownGroup {
                        token: token.to_string(),
                        group: *group,
                        available: capture.len(),
                    })?;
                    let segment = segments.get(*position).ok_or_else(|| {
                        RouteError::PositionOutOfRange {
                            token: token.to_string(),
                            group: *group,
                            position: *position,
                            limit: segments.len(),
                        }
                    })?;
                    parts.push(segment.clone());
                    continue;
                }
            };

            if !part.is_empty() {
                parts.push(part);
            }
        }

        Ok(parts.join("/"))
    }
}

impl fmt::Display for RewriteTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, token) in self.tokens.iter().enumerate() {
            if idx > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture(groups: &[&[&str]]) -> MatchCapture {
        groups
            .iter()
            .map(|g| g.iter().map(|s| s.to_string()).collect())
            .collect::<Vec<Vec<String>>>()
            .into()
    }

    fn template(source: &str) -> RewriteTemplate {
        RewriteTemplate::parse(&source.into()).unwrap()
    }

    #[test]
    fn test_token_parsing() {
        assert_eq!(RewriteToken::parse("posts").unwrap(), RewriteToken::Literal("posts".into()));
        assert_eq!(RewriteToken::parse("[*]").unwrap(), RewriteToken::All);
        assert_eq!(RewriteToken::parse("[*2]").unwrap(), RewriteToken::Group(2));
        assert_eq!(
            RewriteToken::parse("[*2(0)]").unwrap(),
            RewriteToken::Segment { group: 2, position: 0 }
        );
    }

    #[test]
    fn test_malformed_references() {
        for raw in ["[*x]", "[*1(]", "[*1(a)]", "[*(1)]", "[*1", "a[*]"] {
            assert_eq!(
                RewriteToken::parse(raw),
                Err(RouteError::InvalidReference(raw.to_string())),
                "{} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn test_path_source_strips_outer_slashes() {
        let t = template("/posts/[*0]/");
        assert_eq!(
            t.tokens(),
            &[RewriteToken::Literal("posts".into()), RewriteToken::Group(0)]
        );
    }

    #[test]
    fn test_segment_source_used_as_is() {
        let t = RewriteTemplate::parse(&vec!["/mycollections", "get", "[*]"].into()).unwrap();
        assert_eq!(
            t.tokens(),
            &[
                RewriteToken::Literal("/mycollections".into()),
                RewriteToken::Literal("get".into()),
                RewriteToken::All,
            ]
        );
    }

    #[test]
    fn test_expand_references() {
        let c = capture(&[&["a", "b"], &["c"], &["d", "e", "f"]]);

        assert_eq!(template("x/[*]").expand(&c).unwrap(), "x/a/b/c/d/e/f");
        assert_eq!(template("x/[*2]").expand(&c).unwrap(), "x/d/e/f");
        assert_eq!(template("x/[*2(1)]/[*0(0)]").expand(&c).unwrap(), "x/e/a");
        assert_eq!(template("static/page").expand(&c).unwrap(), "static/page");
    }

    #[test]
    fn test_expand_skips_empty_groups() {
        let c = capture(&[&[], &["y"]]);
        assert_eq!(template("posts/[*0]").expand(&c).unwrap(), "posts");
        assert_eq!(template("posts/[*0]/[*1]").expand(&c).unwrap(), "posts/y");
        assert_eq!(template("[*]/list").expand(&c).unwrap(), "y/list");
    }

    #[test]
    fn test_expand_out_of_range() {
        let c = capture(&[&["a"]]);
        assert!(matches!(
            template("[*1]").expand(&c),
            Err(RouteError::UnknownGroup { group: 1, available: 1, .. })
        ));
        assert!(matches!(
            template("[*0(3)]").expand(&c),
            Err(RouteError::PositionOutOfRange { position: 3, limit: 1, .. })
        ));
    }

    #[test]
    fn test_validate_against_pattern() {
        let pattern = RoutePattern::parse("shop/[*2]/detail/[*]").unwrap();

        assert!(template("[*0]/[*1]/[*0(1)]").validate(&pattern).is_ok());
        assert!(matches!(
            template("[*1(0)]").validate(&pattern),
            Err(RouteError::PositionOutOfRange { group: 1, position: 0, limit: 0, .. })
        ));
        assert!(matches!(
            template("[*2]").validate(&pattern),
            Err(RouteError::UnknownGroup { group: 2, available: 2, .. })
        ));
        assert!(matches!(
            template("[*0(2)]").validate(&pattern),
            Err(RouteError::PositionOutOfRange { group: 0, position: 2, limit: 2, .. })
        ));
    }

    #[test]
    fn test_validate_uses_guaranteed_minimum() {
        let at_most = RoutePattern::parse("docs/[*<2]").unwrap();
        assert!(matches!(
            template("manual/[*0(1)]").validate(&at_most),
            Err(RouteError::PositionOutOfRange { position: 1, limit: 0, .. })
        ));

        let at_least = RoutePattern::parse("docs/[*>2]").unwrap();
        assert!(template("manual/[*0(1)]").validate(&at_least).is_ok());
        assert!(template("manual/[*0(2)]").validate(&at_least).is_err());

        // Merged run: [*>1]/[*<4] guarantees one segment
        let merged = RoutePattern::parse("a/[*>1]/[*<4]").unwrap();
        assert!(template("[*0(0)]").validate(&merged).is_ok());
        assert!(template("[*0(1)]").validate(&merged).is_err());
    }

    #[test]
    fn test_expand_keeps_empty_captured_segment() {
        let c = capture(&[&["a", "", "b"]]);
        assert_eq!(template("x/[*0(1)]/y").expand(&c).unwrap(), "x//y");
        assert_eq!(template("x/[*0(2)]/y").expand(&c).unwrap(), "x/b/y");
    }

    #[test]
    fn test_display_is_lossless() {
        for source in ["pages/about", "a/[*0]/b/[*1(2)]/[*]", "x//y"] {
            assert_eq!(template(source).to_string(), source);
        }
    }
}
