//! Delimiter descriptors for quotes, comments, spans and closures.
//!
//! Closures that can host another grammar carry their delegation logic as
//! data: a plain `fn` selector that maps what the tokenizer saw (a tag name
//! and its `type` attribute, or a fence info string) to an [`Embedding`].

use regex::Regex;
use rustc_hash::FxHashSet;

use crate::Matcher;

/// What ends a grouped construct.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Closer {
    /// A literal sequence, e.g. `*/` or `"`.
    Literal(Box<str>),
    /// The first line terminator (line comments).
    LineBreak,
}

impl Closer {
    /// Whether the sequence `text` closes the construct.
    #[inline]
    pub fn is_closed_by(&self, text: &str) -> bool {
        match self {
            Closer::Literal(closer) => **closer == *text,
            Closer::LineBreak => false,
        }
    }

    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Closer::Literal(closer) => Some(closer),
            Closer::LineBreak => None,
        }
    }
}

/// Descriptor for a quote, comment or span.
#[derive(Clone, Debug)]
pub struct Delimiter {
    pub opener: Box<str>,
    pub closer: Closer,
    /// Pattern used while inside; `None` falls back to the grammar matcher.
    pub matcher: Option<Matcher>,
    /// The look-ahead for the closer stops at the first match of this
    /// pattern. An opener with no closer before the bound does not open.
    pub bound: Option<Regex>,
}

impl Delimiter {
    pub fn new(opener: impl Into<Box<str>>, closer: impl Into<Box<str>>) -> Self {
        Delimiter {
            opener: opener.into(),
            closer: Closer::Literal(closer.into()),
            matcher: None,
            bound: None,
        }
    }

    /// A delimiter closed by the end of the line.
    pub fn line(opener: impl Into<Box<str>>) -> Self {
        Delimiter {
            opener: opener.into(),
            closer: Closer::LineBreak,
            matcher: None,
            bound: None,
        }
    }

    #[must_use]
    pub fn with_matcher(mut self, matcher: Matcher) -> Self {
        self.matcher = Some(matcher);
        self
    }

    #[must_use]
    pub fn with_bound(mut self, bound: Regex) -> Self {
        self.bound = Some(bound);
        self
    }
}

/// A regular-expression literal such as ECMAScript's `/a+/g`.
///
/// The opener is an ordinary operator text. It opens a literal only where an
/// operand may start: not after a word, a closer, a quote, or one of the
/// texts listed in `operand_ends`. The body goes to the grammar `syntax`.
#[derive(Clone, Debug)]
pub struct PatternLiteral {
    /// Opener and closer; the matcher only needs to find the closer.
    pub delimiter: Delimiter,
    pub syntax: Box<str>,
    pub operand_ends: FxHashSet<Box<str>>,
}

impl PatternLiteral {
    pub fn new(delimiter: Delimiter, syntax: impl Into<Box<str>>) -> Self {
        PatternLiteral {
            delimiter,
            syntax: syntax.into(),
            operand_ends: FxHashSet::default(),
        }
    }

    /// Add whitespace-separated texts after which the opener divides.
    #[must_use]
    pub fn operand_ends(mut self, list: &str) -> Self {
        self.operand_ends
            .extend(list.split_whitespace().map(Into::into));
        self
    }

    pub fn ends_operand(&self, text: &str) -> bool {
        self.operand_ends.contains(text)
    }
}

/// Where an embeddable closure sends its body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Embedding {
    /// Re-tokenize the body with the grammar registered under this id.
    Syntax(Box<str>),
    /// Emit the body as a single opaque text token.
    Opaque,
}

/// Picks an embedding from a tag name and its declared `type` attribute.
///
/// Returns `None` for tags whose body is ordinary markup.
pub type TagSelector = fn(tag: &str, type_attribute: Option<&str>) -> Option<Embedding>;

/// Picks an embedding from a fence info string.
pub type FenceSelector = fn(info: &str) -> Option<Embedding>;

#[derive(Copy, Clone, Debug)]
pub struct TagEmbedding {
    pub select: TagSelector,
}

#[derive(Copy, Clone, Debug)]
pub struct FenceEmbedding {
    pub select: FenceSelector,
}

/// Closure variants.
#[derive(Copy, Clone, Debug, Default)]
pub enum ClosureKind {
    /// Nests without changing the lexical goal.
    #[default]
    Plain,
    /// A markup tag; resolved when its closer is reached.
    EmbeddableTag(TagEmbedding),
    /// A code fence; resolved when it opens.
    EmbeddableFence(FenceEmbedding),
}

/// Descriptor for a paired closure.
#[derive(Clone, Debug)]
pub struct Closure {
    pub opener: Box<str>,
    pub closer: Box<str>,
    pub matcher: Option<Matcher>,
    pub kind: ClosureKind,
}

impl Closure {
    pub fn new(opener: impl Into<Box<str>>, closer: impl Into<Box<str>>) -> Self {
        Closure {
            opener: opener.into(),
            closer: closer.into(),
            matcher: None,
            kind: ClosureKind::Plain,
        }
    }

    #[must_use]
    pub fn with_matcher(mut self, matcher: Matcher) -> Self {
        self.matcher = Some(matcher);
        self
    }

    #[must_use]
    pub fn with_kind(mut self, kind: ClosureKind) -> Self {
        self.kind = kind;
        self
    }
}
