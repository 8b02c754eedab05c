//! Route pattern parsing.
//!
//! A pattern is a slash-delimited list of segments. A segment is either a
//! literal, matched verbatim, or a placeholder that consumes a run of request
//! segments:
//!
//! | Syntax  | Consumes              |
//! |---------|-----------------------|
//! | `[*]`   | any number (greedy)   |
//! | `[*N]`  | exactly N             |
//! | `[*>N]` | at least N            |
//! | `[*<N]` | at most N             |
//!
//! Adjacent placeholders form a single window and therefore a single capture
//! group; their bounds are merged (see [`Bounds::from_run`]).

use std::fmt;

use super::{RouteError, PLACEHOLDER_CLOSE, PLACEHOLDER_OPEN};

/// Quantity constraint carried by one placeholder segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// `[*]`
    Any,
    /// `[*N]`
    Exact(usize),
    /// `[*>N]`
    AtLeast(usize),
    /// `[*<N]`
    AtMost(usize),
}

impl Placeholder {
    /// Parse the marker content between `[*` and `]`.
    ///
    /// Upper bounds of zero are rejected: such a placeholder could never
    /// consume anything and always reflects a typo in the route.
    fn parse(inner: &str) -> Option<Self> {
        if inner.is_empty() {
            return Some(Placeholder::Any);
        }
        if let Some(count) = inner.strip_prefix('<') {
            return parse_count(count)
                .filter(|n| *n > 0)
                .map(Placeholder::AtMost);
        }
        if let Some(count) = inner.strip_prefix('>') {
            return parse_count(count).map(Placeholder::AtLeast);
        }
        parse_count(inner).filter(|n| *n > 0).map(Placeholder::Exact)
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placeholder::Any => write!(f, "[*]"),
            Placeholder::Exact(n) => write!(f, "[*{}]", n),
            Placeholder::AtLeast(n) => write!(f, "[*>{}]", n),
            Placeholder::AtMost(n) => write!(f, "[*<{}]", n),
        }
    }
}

/// Digits only; `str::parse` alone would also accept a leading `+`.
pub(crate) fn parse_count(s: &str) -> Option<usize> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Merged `(min, max)` bounds governing one placeholder window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: usize,
    /// `None` means "as many as available".
    pub max: Option<usize>,
}

impl Bounds {
    pub const ANY: Bounds = Bounds { min: 0, max: None };

    /// Fold a run of placeholders into one window constraint.
    ///
    /// Each placeholder overrides the bound it sets, so `[*>2]/[*<5]` reads
    /// as "between 2 and 5". Literal segments in `run` are ignored.
    pub fn from_run(run: &[Segment]) -> Self {
        run.iter()
            .filter_map(Segment::placeholder)
            .fold(Bounds::ANY, |mut bounds, placeholder| {
                match placeholder {
                    Placeholder::Any => {}
                    Placeholder::Exact(n) => {
                        bounds.min = n;
                        bounds.max = Some(n);
                    }
                    Placeholder::AtLeast(n) => bounds.min = n,
                    Placeholder::AtMost(n) => bounds.max = Some(n),
                }
                bounds
            })
    }

    /// Whether a window of `count` segments satisfies these bounds.
    pub fn admits(&self, count: usize) -> bool {
        count >= self.min && self.max.map_or(true, |max| count <= max)
    }
}

/// One segment of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(Placeholder),
}

impl Segment {
    fn parse(raw: &str, pattern: &str) -> Result<Self, RouteError> {
        if !raw.contains(PLACEHOLDER_OPEN) {
            return Ok(Segment::Literal(raw.to_string()));
        }

        raw.strip_prefix(PLACEHOLDER_OPEN)
            .and_then(|rest| rest.strip_suffix(PLACEHOLDER_CLOSE))
            .and_then(Placeholder::parse)
            .map(Segment::Placeholder)
            .ok_or_else(|| RouteError::InvalidPlaceholder {
                pattern: pattern.to_string(),
                segment: raw.to_string(),
            })
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Segment::Placeholder(_))
    }

    pub fn literal(&self) -> Option<&str> {
        match self {
            Segment::Literal(value) => Some(value),
            Segment::Placeholder(_) => None,
        }
    }

    pub fn placeholder(&self) -> Option<Placeholder> {
        match self {
            Segment::Placeholder(p) => Some(*p),
            Segment::Literal(_) => None,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Literal(value) => f.write_str(value),
            Segment::Placeholder(p) => write!(f, "{}", p),
        }
    }
}

/// A compiled route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    source: String,
    segments: Vec<Segment>,
    groups: Vec<Bounds>,
    quick_filter: Option<String>,
}

impl RoutePattern {
    /// Parse a pattern source such as `/shop/[*2]/detail/`.
    ///
    /// One leading and one trailing slash are stripped before splitting.
    pub fn parse(source: &str) -> Result<Self, RouteError> {
        let trimmed = source.strip_prefix('/').unwrap_or(source);
        let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
        if trimmed.is_empty() {
            return Err(RouteError::EmptyPattern);
        }

        let segments = trimmed
            .split('/')
            .map(|raw| Segment::parse(raw, trimmed))
            .collect::<Result<Vec<_>, _>>()?;

        // One group per maximal run of adjacent placeholders
        let mut groups = Vec::new();
        let mut run_start = None;
        for (idx, segment) in segments.iter().enumerate() {
            match (segment.is_placeholder(), run_start) {
                (true, None) => run_start = Some(idx),
                (false, Some(start)) => {
                    groups.push(Bounds::from_run(&segments[start..idx]));
                    run_start = None;
                }
                _ => {}
            }
        }
        if let Some(start) = run_start {
            groups.push(Bounds::from_run(&segments[start..]));
        }

        let quick_filter = segments
            .iter()
            .filter_map(Segment::literal)
            .find(|literal| !literal.is_empty())
            .map(str::to_string);

        Ok(Self {
            source: trimmed.to_string(),
            segments,
            groups,
            quick_filter,
        })
    }

    /// The pattern source with its outer slashes stripped.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Bounds of each capture group, in group order.
    pub fn groups(&self) -> &[Bounds] {
        &self.groups
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// First non-empty literal segment, used as a substring pre-check.
    pub fn quick_filter(&self) -> Option<&str> {
        self.quick_filter.as_deref()
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
