//! Segment-window matching.
//!
//! # Responsibilities
//! - Walk pattern and request segments with two cursors
//! - Locate each literal anchor in the request (first occurrence only)
//! - Check the window before the anchor against the placeholder bounds
//! - Record the window as a capture group
//!
//! # Design Decisions
//! - Non-backtracking: once an anchor occurrence is chosen, a later failure
//!   does not retry with a later occurrence. This is observable routing
//!   behavior and is kept as is.
//! - Cursor state is loop-local; the matcher is a pure function of its inputs.
//! - A placeholder window that consumes nothing still records an empty group,
//!   so group indices always line up with the pattern.

use super::pattern::{Bounds, Segment};

/// Segments captured by each placeholder window of a successful match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchCapture {
    groups: Vec<Vec<String>>,
}

impl MatchCapture {
    pub fn groups(&self) -> &[Vec<String>] {
        &self.groups
    }

    pub fn group(&self, index: usize) -> Option<&[String]> {
        self.groups.get(index).map(Vec::as_slice)
    }

    /// Every captured segment in group order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().flatten().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl From<Vec<Vec<String>>> for MatchCapture {
    fn from(groups: Vec<Vec<String>>) -> Self {
        Self { groups }
    }
}

/// Match request `route` segments against `pattern` segments.
///
/// Returns the capture groups on success, `None` when the pattern does not
/// match. See the module docs for the exact (non-backtracking) semantics.
pub fn match_segments(pattern: &[Segment], route: &[&str]) -> Option<MatchCapture> {
    let mut capture = MatchCapture::default();
    if pattern.is_empty() && route.is_empty() {
        return Some(capture);
    }

    let mut route_cursor = 0;
    let mut pattern_cursor = 0;

    loop {
        // Next literal anchor at or after the pattern cursor
        let anchor = pattern[pattern_cursor..]
            .iter()
            .position(|segment| !segment.is_placeholder())
            .map_or(pattern.len(), |offset| pattern_cursor + offset);

        // Where that anchor sits in the request; without one, the window runs to the end
        let window_end = match pattern.get(anchor).and_then(Segment::literal) {
            Some(literal) => {
                let remaining = route.get(route_cursor..)?;
                route_cursor + remaining.iter().position(|segment| *segment == literal)?
            }
            None => route.len(),
        };

        let window = window_end.checked_sub(route_cursor)?;
        let run = &pattern[pattern_cursor..anchor];

        if run.is_empty() {
            // Literal-only span: the anchor must follow immediately
            if window != 0 || pattern_cursor == pattern.len() {
                return None;
            }
        } else {
            if !Bounds::from_run(run).admits(window) {
                return None;
            }
            capture.groups.push(
                route[route_cursor..window_end]
                    .iter()
                    .map(|segment| segment.to_string())
                    .collect(),
            );
        }

        if anchor + 1 >= pattern.len() && window_end + 1 >= route.len() {
            return Some(capture);
        }

        route_cursor = window_end + 1;
        pattern_cursor = anchor + 1;
    }
}
