//! The context stack and its cached groupers.
//!
//! A [`Grouper`] describes one kind of open construct for the active grammar:
//! the goal to report, the matcher to scan with, and what closes it. Groupers
//! are built on first use and reused for the rest of the tokenize call, so a
//! deeply nested document allocates one grouper per distinct opener, not one
//! per frame. Frames on the stack only point at a grouper and at the token
//! that opened them.

use std::ops::Range;
use std::sync::Arc;

use markup_grammar::{Closer, ClosureKind, Delimiter, Grammar, Matcher, Punctuator};
use regex::Regex;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::{TokenId, TokenKind};

/// Index into the grouper arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct GrouperId(u32);

impl GrouperId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// One kind of open construct.
#[derive(Debug)]
pub(crate) struct Grouper {
    /// `Comment`, `Quote`, `Span` or `Closure`.
    pub punctuator: Punctuator,
    pub goal: Arc<str>,
    pub matcher: Matcher,
    pub closer: Closer,
    /// Where the look-ahead for the closer gives up.
    pub bound: Option<Regex>,
    pub kind: ClosureKind,
}

impl Grouper {
    fn delimited(
        punctuator: Punctuator,
        delimiter: &Delimiter,
        goal: &Arc<str>,
        grammar: &Grammar,
    ) -> Self {
        Grouper {
            punctuator,
            goal: Arc::clone(goal),
            matcher: delimiter
                .matcher
                .clone()
                .unwrap_or_else(|| grammar.matcher().clone()),
            closer: delimiter.closer.clone(),
            bound: delimiter.bound.clone(),
            kind: ClosureKind::Plain,
        }
    }

    fn build(grammar: &Grammar, punctuator: Punctuator, opener: &str) -> Option<Self> {
        match punctuator {
            Punctuator::Comment => grammar
                .comment(opener)
                .map(|d| Grouper::delimited(punctuator, d, grammar.comment_goal(), grammar)),
            Punctuator::Quote => grammar
                .quote(opener)
                .map(|d| Grouper::delimited(punctuator, d, grammar.quote_goal(), grammar)),
            Punctuator::Span => grammar
                .span(opener)
                .map(|d| Grouper::delimited(punctuator, d, grammar.syntax_goal(), grammar)),
            Punctuator::Closure => grammar.closure(opener).map(|closure| Grouper {
                punctuator,
                goal: Arc::clone(grammar.syntax_goal()),
                matcher: closure
                    .matcher
                    .clone()
                    .unwrap_or_else(|| grammar.matcher().clone()),
                closer: Closer::Literal(closure.closer.clone()),
                bound: None,
                kind: closure.kind,
            }),
            _ => None,
        }
    }

    /// Whether this frame is a markup tag whose closer triggers resolution.
    #[inline]
    pub fn is_tag(&self) -> bool {
        matches!(self.kind, ClosureKind::EmbeddableTag(_))
    }
}

/// A token seen inside an open tag, kept for resolving the tag on close.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Sibling {
    pub kind: TokenKind,
    pub punctuator: Option<Punctuator>,
    pub range: Range<usize>,
}

/// An open construct.
#[derive(Debug)]
pub(crate) struct Frame {
    pub grouper: GrouperId,
    pub opener: TokenId,
    /// Present only on tag frames.
    pub siblings: Option<Vec<Sibling>>,
}

/// Open constructs, innermost last, plus the grouper cache.
#[derive(Debug, Default)]
pub(crate) struct ContextStack {
    groupers: Vec<Grouper>,
    /// Keyed by opener text alone: classification is deterministic, so one
    /// opener maps to one punctuator kind.
    cache: FxHashMap<Box<str>, GrouperId>,
    frames: SmallVec<[Frame; 8]>,
}

impl ContextStack {
    pub fn new() -> Self {
        ContextStack::default()
    }

    /// The grouper for `opener`, building it on first use.
    ///
    /// `None` when the grammar has no construct of that kind for `opener`.
    pub fn grouper_for(
        &mut self,
        grammar: &Grammar,
        punctuator: Punctuator,
        opener: &str,
    ) -> Option<GrouperId> {
        self.intern(opener, || Grouper::build(grammar, punctuator, opener))
    }

    /// The grouper for the grammar's regular-expression literal.
    ///
    /// Its opener is an operator text, so it never shares a cache key with
    /// a construct opener.
    pub fn pattern_grouper(&mut self, grammar: &Grammar) -> Option<GrouperId> {
        let pattern = grammar.pattern()?;
        self.intern(&pattern.delimiter.opener, || {
            Some(Grouper::delimited(
                Punctuator::Quote,
                &pattern.delimiter,
                grammar.quote_goal(),
                grammar,
            ))
        })
    }

    fn intern(
        &mut self,
        opener: &str,
        build: impl FnOnce() -> Option<Grouper>,
    ) -> Option<GrouperId> {
        if let Some(&id) = self.cache.get(opener) {
            return Some(id);
        }
        let grouper = build()?;
        let id = GrouperId(u32::try_from(self.groupers.len()).ok()?);
        self.groupers.push(grouper);
        self.cache.insert(opener.into(), id);
        Some(id)
    }

    #[inline]
    pub fn grouper(&self, id: GrouperId) -> &Grouper {
        &self.groupers[id.index()]
    }

    pub fn push(&mut self, grouper: GrouperId, opener: TokenId) {
        let siblings = self.grouper(grouper).is_tag().then(Vec::new);
        self.frames.push(Frame {
            grouper,
            opener,
            siblings,
        });
        tracing::trace!(
            goal = &*self.grouper(grouper).goal,
            depth = self.frames.len(),
            "push frame"
        );
    }

    pub fn pop(&mut self) -> Option<Frame> {
        let frame = self.frames.pop()?;
        tracing::trace!(
            goal = &*self.grouper(frame.grouper).goal,
            depth = self.frames.len(),
            "pop frame"
        );
        Some(frame)
    }

    #[inline]
    pub fn top(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn top_grouper(&self) -> Option<&Grouper> {
        self.top().map(|frame| self.grouper(frame.grouper))
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Goal of the innermost frame, or the grammar's syntax id.
    pub fn goal<'g>(&'g self, grammar: &'g Grammar) -> &'g Arc<str> {
        self.top_grouper()
            .map_or(grammar.syntax_goal(), |grouper| &grouper.goal)
    }

    /// Matcher of the innermost frame, or the grammar's primary matcher.
    pub fn matcher<'g>(&'g self, grammar: &'g Grammar) -> &'g Matcher {
        self.top_grouper()
            .map_or(grammar.matcher(), |grouper| &grouper.matcher)
    }

    /// Record a token on the innermost open tag, if any.
    pub fn record(&mut self, sibling: Sibling) {
        if let Some(siblings) = self
            .frames
            .iter_mut()
            .rev()
            .find_map(|frame| frame.siblings.as_mut())
        {
            siblings.push(sibling);
        }
    }
}
