//! Embedded-grammar regions: tag and fence resolution.
//!
//! Resolution produces a [`Directive`]: re-scan `offset..index` with another
//! grammar, then resume the current one at `index`. Finding `index` is a
//! plain text search (a case-insensitive end tag, or a closing fence line),
//! since the body is not in the current grammar's language.

use markup_grammar::{Embedding, Punctuator};
use memchr::{memchr2, memmem};

use crate::grouping::Sibling;
use crate::{TokenId, TokenKind};

/// A region to hand to another grammar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Directive {
    pub offset: usize,
    pub index: usize,
    pub embedding: Embedding,
    /// Opener of the construct that owns the region.
    pub parent: TokenId,
}

/// What a start tag declared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TagHead<'src> {
    pub name: &'src str,
    pub type_attribute: Option<&'src str>,
    pub self_closing: bool,
}

/// Read the tag name, `type` attribute and self-closing marker from the
/// tokens seen between `<` and `>`.
pub(crate) fn read_tag<'src>(source: &'src str, siblings: &[Sibling]) -> Option<TagHead<'src>> {
    let significant: Vec<&Sibling> = siblings
        .iter()
        .filter(|sibling| sibling.kind != TokenKind::Whitespace)
        .collect();

    let first = significant.first()?;
    if !first.kind.is_word_like() {
        return None;
    }
    let self_closing = significant
        .last()
        .is_some_and(|last| last.kind == TokenKind::Sequence && slice(source, last) == "/");

    let mut type_attribute = None;
    for (at, sibling) in significant.iter().enumerate().skip(1) {
        if !(sibling.kind.is_word_like() && slice(source, sibling).eq_ignore_ascii_case("type")) {
            continue;
        }
        if significant.get(at + 1).map(|s| slice(source, s)) != Some("=") {
            continue;
        }
        let Some(value) = significant.get(at + 2) else {
            break;
        };
        if value.punctuator == Some(Punctuator::Quote) {
            // Quoted: everything up to the matching quote token.
            type_attribute = significant[at + 3..]
                .iter()
                .find(|s| s.punctuator == Some(Punctuator::Quote))
                .map(|close| &source[value.range.end..close.range.start]);
        } else {
            // Unquoted: runs to the next whitespace, across the `/` the tag
            // matcher splits on.
            let end = siblings
                .iter()
                .skip_while(|s| s.range.start < value.range.start)
                .take_while(|s| s.kind != TokenKind::Whitespace)
                .last()
                .map_or(value.range.end, |s| s.range.end);
            type_attribute = Some(&source[value.range.start..end]);
        }
        break;
    }

    Some(TagHead {
        name: slice(source, first),
        type_attribute,
        self_closing,
    })
}

fn slice<'src>(source: &'src str, sibling: &Sibling) -> &'src str {
    &source[sibling.range.clone()]
}

/// Find `</name` (ASCII case-insensitive) followed by whitespace, `/`, `>`
/// or the end of the window.
pub(crate) fn find_end_tag(source: &str, from: usize, limit: usize, name: &str) -> Option<usize> {
    let window = source.get(from..limit)?;
    memmem::find_iter(window.as_bytes(), b"</").find_map(|at| {
        let start = at + 2;
        let candidate = window.get(start..start + name.len())?;
        if !candidate.eq_ignore_ascii_case(name) {
            return None;
        }
        let ends_name = window[start + name.len()..]
            .chars()
            .next()
            .map_or(true, |c| c.is_whitespace() || c == '/' || c == '>');
        ends_name.then_some(from + at)
    })
}

/// End of the line starting at `from`: the offset of its terminator and the
/// offset just past it. Both equal `limit` on the last line.
pub(crate) fn line_end(source: &str, from: usize, limit: usize) -> (usize, usize) {
    let bytes = &source.as_bytes()[from..limit];
    match memchr2(b'\n', b'\r', bytes) {
        Some(at) => {
            let end = from + at;
            let next = if source.as_bytes()[end..limit].starts_with(b"\r\n") {
                end + 2
            } else {
                end + 1
            };
            (end, next)
        }
        None => (limit, limit),
    }
}

/// First line at or after `from` that is `fence` followed only by spaces or
/// tabs. Returns the line's start.
pub(crate) fn find_closing_fence(source: &str, from: usize, limit: usize, fence: &str) -> Option<usize> {
    let mut start = from;
    while start < limit {
        let (end, next) = line_end(source, start, limit);
        let closes = source[start..end]
            .strip_prefix(fence)
            .is_some_and(|rest| rest.trim_matches([' ', '\t']).is_empty());
        if closes {
            return Some(start);
        }
        if next == end {
            break;
        }
        start = next;
    }
    None
}

/// Offset of `closer` ending a regular-expression literal whose body starts
/// at `from`. Escapes and character classes hide the closer; a line break
/// first means there is no literal.
pub(crate) fn find_pattern_end(
    source: &str,
    from: usize,
    limit: usize,
    closer: &str,
) -> Option<usize> {
    let bytes = source.as_bytes();
    let mut at = from;
    let mut in_class = false;
    while at < limit {
        match bytes[at] {
            b'\\' => at += 1,
            b'\n' | b'\r' => return None,
            b'[' => in_class = true,
            b']' => in_class = false,
            _ if !in_class && bytes[at..limit].starts_with(closer.as_bytes()) => return Some(at),
            _ => {}
        }
        at += 1;
    }
    None
}

#[cfg(test)]
mod tests;
