//! The scan loop: one matcher at a time over a bounded window.
//!
//! Each call to [`Scanner::next_production`] runs the active matcher from the
//! cursor. Text the matcher skipped over comes back first as a
//! [`Production::Pre`] run; the hit itself is held back and returned by the
//! following call, so callers always see productions in source order and the
//! matcher may be swapped between any two calls.
//!
//! Offsets are absolute. A scanner over a delegated region keeps the whole
//! source and only narrows its boundary, so `^`/`$` and look-behind-free
//! patterns see the same text they would at top level.

use std::ops::Range;

use markup_grammar::Matcher;

/// One step of the scan loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Production {
    /// A run matched by the `whitespace` group.
    Whitespace(Range<usize>),
    /// A literal matched by the `sequence` group.
    Sequence(Range<usize>),
    /// Text between the cursor and the next hit (or the boundary).
    Pre(Range<usize>),
    /// The cursor reached the boundary.
    End,
}

impl Production {
    pub fn range(&self) -> Option<Range<usize>> {
        match self {
            Production::Whitespace(range) | Production::Sequence(range) | Production::Pre(range) => {
                Some(range.clone())
            }
            Production::End => None,
        }
    }
}

/// Cursor over `source[..boundary]`.
#[derive(Clone, Debug)]
pub struct Scanner<'src> {
    source: &'src str,
    cursor: usize,
    boundary: usize,
    /// Hit found behind a `Pre` run, returned on the next call.
    pending: Option<Production>,
}

impl<'src> Scanner<'src> {
    pub fn new(source: &'src str) -> Self {
        Scanner::over(source, 0..source.len())
    }

    /// A scanner confined to `range`, which must lie on char boundaries.
    pub fn over(source: &'src str, range: Range<usize>) -> Self {
        let boundary = range.end.min(source.len());
        Scanner {
            source,
            cursor: range.start.min(boundary),
            boundary,
            pending: None,
        }
    }

    #[inline]
    pub fn source(&self) -> &'src str {
        self.source
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn boundary(&self) -> usize {
        self.boundary
    }

    /// Move the cursor, discarding any held-back hit.
    pub fn relocate(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.boundary);
        self.pending = None;
    }

    /// Produce the next step using `matcher`, never reading past `limit`
    /// (clamped to the boundary).
    ///
    /// A zero-length hit is treated as the end of input: the rest of the
    /// window comes back as one `Pre` run, which guarantees progress.
    pub fn next_production(&mut self, matcher: &Matcher, limit: usize) -> Production {
        if let Some(production) = self.pending.take() {
            if let Some(range) = production.range() {
                self.cursor = range.end;
            }
            return production;
        }

        let limit = limit.min(self.boundary);
        if self.cursor >= limit {
            return Production::End;
        }

        let window = &self.source[..limit];
        match matcher.find_at(window, self.cursor) {
            Some(hit) if !hit.is_empty() => {
                let range = hit.start..hit.end;
                let production = if hit.whitespace {
                    Production::Whitespace(range)
                } else {
                    Production::Sequence(range)
                };
                if hit.start > self.cursor {
                    let pre = Production::Pre(self.cursor..hit.start);
                    self.cursor = hit.start;
                    self.pending = Some(production);
                    pre
                } else {
                    self.cursor = hit.end;
                    production
                }
            }
            _ => {
                let pre = Production::Pre(self.cursor..limit);
                self.cursor = limit;
                pre
            }
        }
    }

    /// Look ahead from the cursor for a sequence equal to `closer`, scanning
    /// with `matcher` up to `limit`. Does not move the cursor.
    pub fn find_sequence(&self, matcher: &Matcher, closer: &str, limit: usize) -> Option<usize> {
        let limit = limit.min(self.boundary);
        let window = &self.source[..limit];
        let mut at = self.cursor;
        while at < limit {
            let hit = matcher.find_at(window, at)?;
            if hit.is_empty() {
                return None;
            }
            if !hit.whitespace && &window[hit.start..hit.end] == closer {
                return Some(hit.start);
            }
            at = hit.end;
        }
        None
    }
}
