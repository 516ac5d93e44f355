use pretty_assertions::assert_eq;

use super::*;

/// Siblings for a tag body split on single spaces, with `=`, `/` and `"`
/// as sequences. Enough structure for `read_tag`.
fn siblings(body: &str, base: usize) -> Vec<Sibling> {
    let mut out = Vec::new();
    let mut in_quote = false;
    let mut word_start = None;
    for (at, c) in body.char_indices() {
        let offset = base + at;
        let sequence = match c {
            '"' => Some(Punctuator::Quote),
            '=' | '/' | ' ' => None,
            _ => {
                word_start.get_or_insert(offset);
                continue;
            }
        };
        if let Some(start) = word_start.take() {
            out.push(Sibling {
                kind: TokenKind::Text,
                punctuator: None,
                range: start..offset,
            });
        }
        let kind = if c == ' ' {
            TokenKind::Whitespace
        } else {
            TokenKind::Sequence
        };
        if c == '"' {
            in_quote = !in_quote;
        }
        out.push(Sibling {
            kind,
            punctuator: sequence,
            range: offset..offset + 1,
        });
    }
    if let Some(start) = word_start {
        out.push(Sibling {
            kind: TokenKind::Text,
            punctuator: None,
            range: start..base + body.len(),
        });
    }
    assert!(!in_quote, "unbalanced test input");
    out
}

#[test]
fn reads_name_and_quoted_type() {
    let source = r#"<script type="text/plain">"#;
    let head = read_tag(source, &siblings(&source[1..source.len() - 1], 1));
    assert_eq!(
        head,
        Some(TagHead {
            name: "script",
            type_attribute: Some("text/plain"),
            self_closing: false,
        })
    );
}

#[test]
fn reads_unquoted_type_and_self_closing() {
    let source = "<script type=module />";
    let head = read_tag(source, &siblings(&source[1..source.len() - 1], 1));
    assert_eq!(
        head,
        Some(TagHead {
            name: "script",
            type_attribute: Some("module"),
            self_closing: true,
        })
    );
}

#[test]
fn unquoted_type_spans_slashes() {
    let source = "<script type=text/javascript defer>";
    let head = read_tag(source, &siblings(&source[1..source.len() - 1], 1));
    assert_eq!(head.and_then(|h| h.type_attribute), Some("text/javascript"));
}

#[test]
fn empty_quoted_type() {
    let source = r#"<script type="">"#;
    let head = read_tag(source, &siblings(&source[1..source.len() - 1], 1));
    assert_eq!(head.and_then(|h| h.type_attribute), Some(""));
}

#[test]
fn tag_without_name() {
    assert_eq!(read_tag("< >", &siblings(" ", 1)), None);
    assert_eq!(read_tag("<>", &[]), None);
}

#[test]
fn end_tag_search_is_case_insensitive_and_whole_name() {
    let source = "x</scripts></SCRIPT >";
    assert_eq!(find_end_tag(source, 0, source.len(), "script"), Some(11));
    assert_eq!(find_end_tag(source, 0, 11, "script"), None);
    assert_eq!(find_end_tag("</style", 0, 7, "style"), Some(0));
}

#[test]
fn line_end_handles_crlf() {
    assert_eq!(line_end("ab\r\ncd", 0, 6), (2, 4));
    assert_eq!(line_end("ab\ncd", 3, 5), (5, 5));
    assert_eq!(line_end("a\rb", 0, 3), (1, 2));
}

#[test]
fn closing_fence_must_stand_alone() {
    let source = "```js\nlet a;\n```x\n  ```\n``` \t\nrest";
    assert_eq!(find_closing_fence(source, 6, source.len(), "```"), Some(24));
    assert_eq!(find_closing_fence(source, 6, 24, "```"), None);
    assert_eq!(find_closing_fence("```", 0, 3, "```"), Some(0));
}

#[test]
fn pattern_end_skips_escapes_and_classes() {
    let source = r#"/a\/[/"]b/g"#;
    assert_eq!(find_pattern_end(source, 1, source.len(), "/"), Some(9));
    assert_eq!(find_pattern_end("/é/", 1, 4, "/"), Some(3));
    assert_eq!(find_pattern_end("/a\nb/", 1, 5, "/"), None);
    assert_eq!(find_pattern_end("/[/", 1, 3, "/"), None);
}
