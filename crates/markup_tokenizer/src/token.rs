//! Token representation.
//!
//! Tokens borrow their text from the source and are never mutated once
//! emitted. Links to the previous token and to the enclosing construct's
//! opener are ordinals ([`TokenId`]) within one tokenize call, so a consumer
//! that keeps the tokens in a `Vec` can follow them by index.

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;
use markup_grammar::Punctuator;

/// Ordinal of a token within one tokenize call, delegated regions included.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(transparent)]
pub struct TokenId(usize);

impl TokenId {
    #[inline]
    pub const fn new(index: usize) -> Self {
        TokenId(index)
    }

    /// Position of the token in the emitted stream.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lexical type of a token.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TokenKind {
    Whitespace,
    Sequence,
    Word,
    Keyword,
    Identifier,
    Text,
}

impl TokenKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            TokenKind::Whitespace => "whitespace",
            TokenKind::Sequence => "sequence",
            TokenKind::Word => "word",
            TokenKind::Keyword => "keyword",
            TokenKind::Identifier => "identifier",
            TokenKind::Text => "text",
        }
    }

    /// Unmatched runs: everything a word test produced.
    #[inline]
    pub const fn is_word_like(self) -> bool {
        matches!(
            self,
            TokenKind::Word | TokenKind::Keyword | TokenKind::Identifier | TokenKind::Text
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    /// Per-token status bits.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize))]
    pub struct TokenFlags: u8 {
        /// Marks an unterminated or unresolved construct.
        const FAULT = 1 << 0;
        /// Produced by a grammar delegated to for an embedded region.
        const EMBEDDED = 1 << 1;
    }
}

/// A classified slice of the source.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Token<'src> {
    pub id: TokenId,
    pub text: &'src str,
    /// Absolute byte offset of `text` in the source.
    pub offset: usize,
    pub kind: TokenKind,
    pub punctuator: Option<Punctuator>,
    /// Line terminators inside a whitespace token; zero for other kinds.
    pub breaks: u32,
    /// Goal the token was scanned under: a syntax id, `comment` or `quote`.
    pub hint: Arc<str>,
    pub previous: Option<TokenId>,
    /// Opener of the enclosing construct.
    pub parent: Option<TokenId>,
    pub flags: TokenFlags,
}

impl Token<'_> {
    /// Byte offset just past the token.
    #[inline]
    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }

    #[inline]
    pub fn is_fault(&self) -> bool {
        self.flags.contains(TokenFlags::FAULT)
    }

    #[inline]
    pub fn is_embedded(&self) -> bool {
        self.flags.contains(TokenFlags::EMBEDDED)
    }
}

/// Count line terminators: `\n`, `\r\n` (once), a lone `\r`, U+2028 and
/// U+2029.
pub fn count_breaks(text: &str) -> u32 {
    let mut breaks = 0u32;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                breaks = breaks.saturating_add(1);
            }
            '\n' | '\u{2028}' | '\u{2029}' => breaks = breaks.saturating_add(1),
            _ => {}
        }
    }
    breaks
}

/// Whether `text` contains any line terminator.
#[inline]
pub(crate) fn has_line_break(text: &str) -> bool {
    text.contains(['\n', '\r', '\u{2028}', '\u{2029}'])
}
