//! Compiled matcher patterns.
//!
//! A matcher finds the next significant boundary in the source. It must
//! expose two named capture groups: `whitespace` for whitespace runs and
//! `sequence` for literal sequences. Text the matcher skips over between
//! two hits is an unmatched run that the tokenizer classifies as a word.

use std::fmt;

use regex::Regex;

use crate::GrammarError;

/// Capture group name for whitespace runs.
pub const WHITESPACE_GROUP: &str = "whitespace";

/// Capture group name for literal sequences.
pub const SEQUENCE_GROUP: &str = "sequence";

/// One regex hit, in absolute byte offsets.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MatcherHit {
    pub start: usize,
    pub end: usize,
    /// The `whitespace` group participated in the match.
    pub whitespace: bool,
}

impl MatcherHit {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A compiled pattern plus the indices of its two required groups.
///
/// Cloning is cheap: `Regex` shares its compiled program.
#[derive(Clone)]
pub struct Matcher {
    regex: Regex,
    whitespace: usize,
}

impl Matcher {
    /// Compile `pattern` for grammar `syntax`.
    ///
    /// `name` identifies the pattern in error messages.
    pub fn new(syntax: &str, name: &str, pattern: &str) -> Result<Self, GrammarError> {
        let regex = Regex::new(pattern).map_err(|source| GrammarError::InvalidPattern {
            syntax: syntax.to_owned(),
            name: name.to_owned(),
            source,
        })?;
        let group = |group: &'static str| {
            regex
                .capture_names()
                .position(|n| n == Some(group))
                .ok_or_else(|| GrammarError::MissingCaptureGroup {
                    syntax: syntax.to_owned(),
                    name: name.to_owned(),
                    group,
                })
        };
        let whitespace = group(WHITESPACE_GROUP)?;
        group(SEQUENCE_GROUP)?;
        Ok(Matcher { regex, whitespace })
    }

    /// The pattern source.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Find the next hit in `haystack` at or after `start`.
    ///
    /// `haystack` is the scan window: callers pass `&source[..boundary]` so a
    /// hit never crosses a grammar boundary while offsets stay absolute.
    pub fn find_at(&self, haystack: &str, start: usize) -> Option<MatcherHit> {
        let mut locations = self.regex.capture_locations();
        let found = self
            .regex
            .captures_read_at(&mut locations, haystack, start)?;
        // Anything outside the whitespace group counts as a sequence.
        Some(MatcherHit {
            start: found.start(),
            end: found.end(),
            whitespace: locations.get(self.whitespace).is_some(),
        })
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Matcher").field(&self.regex.as_str()).finish()
    }
}
