//! Memoized punctuator classification.
//!
//! Each grammar instance owns one [`Classifications`] table mapping literal
//! text to its punctuator kind (or to "no kind"). The table only grows, and
//! the first writer wins: a racing second computation for the same text is
//! discarded, so every caller observes the same answer regardless of order.
//!
//! # Thread Safety
//! Uses an `RwLock` with a read-only fast path and a double-checked insert,
//! so tokenizers running on different threads can share one grammar.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::{Grammar, Punctuator};

/// Per-grammar classification cache.
#[derive(Default)]
pub struct Classifications {
    map: RwLock<FxHashMap<Box<str>, Option<Punctuator>>>,
}

impl Classifications {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached entries (hits and misses alike).
    pub fn len(&self) -> usize {
        self.map.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.read().is_empty()
    }

    #[inline]
    fn get(&self, text: &str) -> Option<Option<Punctuator>> {
        self.map.read().get(text).copied()
    }

    /// Insert `kind` unless another caller got there first; returns the
    /// stored value either way.
    fn insert_if_absent(&self, text: &str, kind: Option<Punctuator>) -> Option<Punctuator> {
        let mut guard = self.map.write();
        if let Some(&existing) = guard.get(text) {
            return existing;
        }
        guard.insert(text.into(), kind);
        kind
    }
}

impl std::fmt::Debug for Classifications {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Classifications")
            .field("len", &self.len())
            .finish()
    }
}

impl Grammar {
    /// Classify a literal sequence.
    ///
    /// The first call for a given text tests the categories in
    /// [`Punctuator::CLASSIFICATION_ORDER`] and caches the first match;
    /// later calls are a single hash lookup.
    pub fn classify(&self, text: &str) -> Option<Punctuator> {
        // Fast path: already classified
        if let Some(kind) = self.classifications().get(text) {
            return kind;
        }

        let kind = Punctuator::CLASSIFICATION_ORDER
            .into_iter()
            .find(|&kind| self.is_classified_as(kind, text));
        tracing::trace!(
            syntax = self.syntax(),
            text,
            punctuator = kind.map(Punctuator::as_str),
            "classified sequence"
        );
        self.classifications().insert_if_absent(text, kind)
    }

    /// Number of memoized classifications.
    pub fn cached_classifications(&self) -> usize {
        self.classifications().len()
    }

    fn is_classified_as(&self, kind: Punctuator, text: &str) -> bool {
        let punctuators = self.punctuators();
        match kind {
            Punctuator::Nonbreaker => punctuators.nonbreakers.contains(text),
            Punctuator::Operator => punctuators.operators.contains(text),
            Punctuator::Comment => self.comment(text).is_some(),
            Punctuator::Span => self.span(text).is_some(),
            Punctuator::Quote => self.quote(text).is_some(),
            Punctuator::Closure => self.closure(text).is_some(),
            Punctuator::Breaker => punctuators.breakers.contains(text),
            Punctuator::Aggregator => punctuators.aggregators.contains(text),
            Punctuator::Opener | Punctuator::Closer => false,
        }
    }
}
