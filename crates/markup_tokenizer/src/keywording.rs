//! Word classification for unmatched runs.

use markup_grammar::Grammar;

use crate::TokenKind;

/// Classify an unmatched run.
///
/// Order matters: a run right after a nonbreaker (member access) is never a
/// keyword, then the keyword set, then the identifier pattern, then the
/// keyword-shaped pattern, then plain text.
pub(crate) fn classify_word(grammar: &Grammar, text: &str, after_nonbreaker: bool) -> TokenKind {
    let word = text.trim();
    if !after_nonbreaker && grammar.is_keyword(word) {
        return TokenKind::Keyword;
    }
    let patterns = grammar.patterns();
    if patterns
        .maybe_identifier
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(word))
    {
        return TokenKind::Identifier;
    }
    if patterns
        .maybe_keyword
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(word))
    {
        return TokenKind::Word;
    }
    TokenKind::Text
}
