//! Route lookup and rewriting.
//!
//! # Responsibilities
//! - Store compiled route rules in registration order
//! - Find the first rule matching a request path
//! - Return the rewritten path, or the path unchanged when nothing matches
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) rule scan with a substring quick filter in front of each full match
//! - The quick filter is a plain substring check on the whole path, not a
//!   segment check; it may let a rule through that then fails the full match
//! - Match failures are silent; only a failed rewrite expansion is logged

use crate::config::RouteConfig;

use super::matcher::{match_segments, MatchCapture};
use super::pattern::RoutePattern;
use super::rewrite::{RewriteSource, RewriteTemplate};
use super::RouteError;

/// A compiled `(pattern, rewrite)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRule {
    pattern: RoutePattern,
    rewrite: RewriteTemplate,
}

impl RouteRule {
    /// Compile a rule, validating rewrite references against the pattern.
    pub fn compile(pattern: &str, rewrite: &RewriteSource) -> Result<Self, RouteError> {
        let pattern = RoutePattern::parse(pattern)?;
        let rewrite = RewriteTemplate::parse(rewrite)?;
        rewrite.validate(&pattern)?;
        Ok(Self { pattern, rewrite })
    }

    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    pub fn rewrite(&self) -> &RewriteTemplate {
        &self.rewrite
    }

    pub fn quick_filter(&self) -> Option<&str> {
        self.pattern.quick_filter()
    }

    /// Quick filter followed by the full segment match.
    fn capture(&self, path: &str, segments: &[&str]) -> Option<MatchCapture> {
        if let Some(filter) = self.quick_filter() {
            if !path.contains(filter) {
                return None;
            }
        }
        match_segments(self.pattern.segments(), segments)
    }
}

/// Result of a successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    /// Registration index of the matched rule.
    pub index: usize,
    pub rule: &'a RouteRule,
    pub capture: MatchCapture,
    /// The rewritten path.
    pub path: String,
}

/// Ordered, immutable set of route rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    rules: Vec<RouteRule>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile every configured route, in order.
    pub fn from_config(routes: &[RouteConfig]) -> Result<Self, RouteError> {
        let mut table = Self::new();
        for route in routes {
            table.register(&route.pattern, route.rewrite.clone())?;
        }
        Ok(table)
    }

    /// Append a rule. Rules registered first are tried first.
    pub fn register(
        &mut self,
        pattern: &str,
        rewrite: impl Into<RewriteSource>,
    ) -> Result<(), RouteError> {
        let rule = RouteRule::compile(pattern, &rewrite.into())?;
        self.rules.push(rule);
        Ok(())
    }

    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Find the first rule matching `path` and rewrite it.
    pub fn find(&self, path: &str) -> Option<RouteMatch<'_>> {
        let path = strip_trailing_slash(path);
        let relative = path.strip_prefix('/').unwrap_or(path);
        let segments: Vec<&str> = if relative.is_empty() {
            Vec::new()
        } else {
            relative.split('/').collect()
        };

        for (index, rule) in self.rules.iter().enumerate() {
            let Some(capture) = rule.capture(path, &segments) else {
                continue;
            };

            // The first structural match decides the outcome, even if expansion fails.
            return match rule.rewrite.expand(&capture) {
                Ok(rewritten) => Some(RouteMatch {
                    index,
                    rule,
                    capture,
                    path: rewritten,
                }),
                Err(e) => {
                    tracing::warn!(
                        pattern = %rule.pattern,
                        rewrite = %rule.rewrite,
                        error = %e,
                        "Rewrite expansion failed"
                    );
                    None
                }
            };
        }
        None
    }

    /// Rewrite `path` with the first matching rule, or return it unchanged
    /// (minus a trailing slash) when no rule matches.
    pub fn resolve(&self, path: &str) -> String {
        match self.find(path) {
            Some(matched) => matched.path,
            None => strip_trailing_slash(path).to_string(),
        }
    }
}

fn strip_trailing_slash(path: &str) -> &str {
    path.strip_suffix('/').unwrap_or(path)
}
