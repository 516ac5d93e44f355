//! Punctuator kinds assigned to literal sequences.

use std::fmt;

/// Classification of a literal sequence.
///
/// The first eight variants are produced by the classifier, in priority
/// order. `Opener` and `Closer` are never classifier results: the grouping
/// stack assigns them to the tokens that open and close a closure.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Punctuator {
    Nonbreaker,
    Operator,
    Comment,
    Span,
    Quote,
    Closure,
    Breaker,
    Aggregator,
    Opener,
    Closer,
}

impl Punctuator {
    /// Classifier categories in the order they are tested.
    pub const CLASSIFICATION_ORDER: [Punctuator; 8] = [
        Punctuator::Nonbreaker,
        Punctuator::Operator,
        Punctuator::Comment,
        Punctuator::Span,
        Punctuator::Quote,
        Punctuator::Closure,
        Punctuator::Breaker,
        Punctuator::Aggregator,
    ];

    /// Lowercase name, as reported to renderers.
    pub const fn as_str(self) -> &'static str {
        match self {
            Punctuator::Nonbreaker => "nonbreaker",
            Punctuator::Operator => "operator",
            Punctuator::Comment => "comment",
            Punctuator::Span => "span",
            Punctuator::Quote => "quote",
            Punctuator::Closure => "closure",
            Punctuator::Breaker => "breaker",
            Punctuator::Aggregator => "aggregator",
            Punctuator::Opener => "opener",
            Punctuator::Closer => "closer",
        }
    }

    /// Whether this kind opens a grouping frame when it appears as an opener.
    pub const fn is_grouping(self) -> bool {
        matches!(
            self,
            Punctuator::Comment | Punctuator::Span | Punctuator::Quote | Punctuator::Closure
        )
    }
}

impl fmt::Display for Punctuator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
