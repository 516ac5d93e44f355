use markup_grammar::{Delimiter, GrammarBuilder, GrammarRegistry};
use pretty_assertions::assert_eq;

use super::*;
use crate::{default_registry, tokenize_with, TokenizerOptions};

use Punctuator as P;
use TokenKind as K;

type Summary<'t> = (&'t str, TokenKind, Option<Punctuator>, &'t str);

fn registry() -> &'static GrammarRegistry {
    match default_registry() {
        Ok(registry) => registry,
        Err(err) => panic!("{err}"),
    }
}

fn run<'a>(registry: &'a GrammarRegistry, syntax: &str, source: &'a str) -> Vec<Token<'a>> {
    let options = TokenizerOptions::default().with_source_type(syntax);
    match tokenize_with(registry, source, &options) {
        Ok(tokenizer) => tokenizer.collect(),
        Err(err) => panic!("{err}"),
    }
}

fn summary<'t>(tokens: &'t [Token<'_>]) -> Vec<Summary<'t>> {
    tokens
        .iter()
        .map(|t| (t.text, t.kind, t.punctuator, &*t.hint))
        .collect()
}

fn parents(tokens: &[Token<'_>]) -> Vec<Option<usize>> {
    tokens
        .iter()
        .map(|t| t.parent.map(TokenId::index))
        .collect()
}

#[test]
fn double_quoted_string() {
    let tokens = run(registry(), "es", r#""abc""#);
    assert_eq!(
        summary(&tokens),
        [
            ("\"", K::Sequence, Some(P::Quote), "quote"),
            ("abc", K::Text, None, "quote"),
            ("\"", K::Sequence, Some(P::Quote), "quote"),
        ]
    );
    assert_eq!(parents(&tokens), [None, Some(0), None]);
}

#[test]
fn unterminated_block_comment() {
    let tokens = run(registry(), "es", "/* unterminated");
    assert_eq!(
        summary(&tokens),
        [
            ("/*", K::Sequence, Some(P::Comment), "comment"),
            (" unterminated", K::Text, None, "comment"),
        ]
    );
    assert!(!tokens[0].is_fault());
    assert!(tokens[1].is_fault());
    assert_eq!(tokens[1].parent, Some(tokens[0].id));
}

#[test]
fn member_after_nonbreaker_is_never_a_keyword() {
    let tokens = run(registry(), "es", "a.default");
    assert_eq!(
        summary(&tokens),
        [
            ("a", K::Identifier, None, "es"),
            (".", K::Sequence, Some(P::Nonbreaker), "es"),
            ("default", K::Identifier, None, "es"),
        ]
    );
    let tokens = run(registry(), "es", "a. default");
    assert_eq!(tokens[3].kind, K::Identifier);
    let tokens = run(registry(), "es", "default");
    assert_eq!(tokens[0].kind, K::Keyword);
}

#[test]
fn empty_input_yields_nothing() {
    assert!(run(registry(), "es", "").is_empty());
    assert!(run(registry(), "html", "").is_empty());
}

#[test]
fn line_comment_pops_before_the_line_break() {
    let tokens = run(registry(), "es", "// c */\r\nx");
    assert_eq!(
        summary(&tokens),
        [
            ("//", K::Sequence, Some(P::Comment), "comment"),
            (" ", K::Whitespace, None, "comment"),
            ("c", K::Text, None, "comment"),
            (" ", K::Whitespace, None, "comment"),
            ("*/", K::Sequence, None, "comment"),
            ("\r\n", K::Whitespace, None, "es"),
            ("x", K::Identifier, None, "es"),
        ]
    );
    assert_eq!(tokens[5].breaks, 1);
}

#[test]
fn line_comment_at_end_of_input_is_not_a_fault() {
    let tokens = run(registry(), "es", "x // trailing");
    assert!(tokens.iter().all(|t| !t.is_fault()));
}

#[test]
fn template_span_restores_the_quote_goal() {
    let tokens = run(registry(), "es", "`a${b}c`");
    assert_eq!(
        summary(&tokens),
        [
            ("`", K::Sequence, Some(P::Quote), "quote"),
            ("a", K::Text, None, "quote"),
            ("${", K::Sequence, Some(P::Span), "es"),
            ("b", K::Identifier, None, "es"),
            ("}", K::Sequence, Some(P::Span), "es"),
            ("c", K::Text, None, "quote"),
            ("`", K::Sequence, Some(P::Quote), "quote"),
        ]
    );
    assert_eq!(
        parents(&tokens),
        [None, Some(0), Some(0), Some(2), Some(0), Some(0), None]
    );
}

#[test]
fn closure_inside_span_closes_first() {
    let tokens = run(registry(), "es", "`${ {} }`");
    let punctuators: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind == K::Sequence)
        .map(|t| (t.text, t.punctuator))
        .collect();
    assert_eq!(
        punctuators,
        [
            ("`", Some(P::Quote)),
            ("${", Some(P::Span)),
            ("{", Some(P::Opener)),
            ("}", Some(P::Closer)),
            ("}", Some(P::Span)),
            ("`", Some(P::Quote)),
        ]
    );
}

#[test]
fn closures_link_parents_and_previous() {
    let tokens = run(registry(), "es", "f(a)");
    assert_eq!(
        summary(&tokens),
        [
            ("f", K::Identifier, None, "es"),
            ("(", K::Sequence, Some(P::Opener), "es"),
            ("a", K::Identifier, None, "es"),
            (")", K::Sequence, Some(P::Closer), "es"),
        ]
    );
    assert_eq!(parents(&tokens), [None, None, Some(1), None]);
    let previous: Vec<_> = tokens.iter().map(|t| t.previous.map(TokenId::index)).collect();
    assert_eq!(previous, [None, Some(0), Some(1), Some(2)]);
}

#[test]
fn unclosed_closure_reports_a_zero_length_fault() {
    let tokens = run(registry(), "es", "f(a");
    let Some(fault) = tokens.last() else {
        panic!("tokens");
    };
    assert!(fault.is_fault());
    assert_eq!((fault.text, fault.offset), ("", 3));
    assert_eq!(fault.parent, Some(tokens[1].id));
    assert_eq!(tokens.iter().filter(|t| t.is_fault()).count(), 1);
}

#[test]
fn stray_closer_keeps_its_classification() {
    let tokens = run(registry(), "es", "a) b");
    assert_eq!(tokens[1].punctuator, Some(P::Breaker));
    assert!(tokens.iter().all(|t| !t.is_fault()));
}

#[test]
fn unterminated_quote_does_not_swallow_outer_frames() {
    let tokens = run(registry(), "es", "(')");
    assert_eq!(
        summary(&tokens),
        [
            ("(", K::Sequence, Some(P::Opener), "es"),
            ("'", K::Sequence, Some(P::Quote), "quote"),
            (")", K::Text, None, "quote"),
            ("", K::Text, None, "es"),
        ]
    );
    assert!(tokens[2].is_fault());
    assert!(tokens[3].is_fault());
}

fn toy_quotes() -> GrammarRegistry {
    let builder = GrammarBuilder::new("toy");
    let Ok(matcher) = builder.compile("matcher", r#"(?P<whitespace>\s+)|(?P<sequence>["'()])"#)
    else {
        panic!("toy matcher compiles");
    };
    let grammar = builder
        .quote(Delimiter::new("\"", "\""))
        .quote(Delimiter::new("'", "'"))
        .closure(markup_grammar::Closure::new("(", ")"))
        .matcher(matcher)
        .build();
    let mut registry = GrammarRegistry::new();
    match grammar.and_then(|grammar| registry.insert(grammar)) {
        Ok(_) => registry,
        Err(err) => panic!("{err}"),
    }
}

#[test]
fn quotes_do_not_nest() {
    let registry = toy_quotes();
    let tokens = run(&registry, "toy", r#""a'(b""#);
    assert_eq!(
        summary(&tokens),
        [
            ("\"", K::Sequence, Some(P::Quote), "quote"),
            ("a", K::Text, None, "quote"),
            ("'", K::Sequence, None, "quote"),
            ("(", K::Sequence, Some(P::Closure), "quote"),
            ("b", K::Text, None, "quote"),
            ("\"", K::Sequence, Some(P::Quote), "quote"),
        ]
    );
}

#[test]
fn script_body_is_delegated_to_es() {
    let tokens = run(registry(), "html", "<script>1</script>");
    assert_eq!(
        summary(&tokens),
        [
            ("<", K::Sequence, Some(P::Opener), "html"),
            ("script", K::Identifier, None, "html"),
            (">", K::Sequence, Some(P::Closer), "html"),
            ("1", K::Text, None, "es"),
            ("</", K::Sequence, Some(P::Opener), "html"),
            ("script", K::Identifier, None, "html"),
            (">", K::Sequence, Some(P::Closer), "html"),
        ]
    );
    assert!(tokens[3].is_embedded());
    assert_eq!(tokens[3].parent, Some(tokens[0].id));
    assert!(tokens.iter().enumerate().all(|(i, t)| (i == 3) == t.is_embedded()));
    let ids: Vec<_> = tokens.iter().map(|t| t.id.index()).collect();
    assert_eq!(ids, (0..7).collect::<Vec<_>>());
}

#[test]
fn end_tag_match_ignores_case() {
    let tokens = run(registry(), "html", "<Script>a</SCRIPT>");
    assert_eq!(tokens[3].text, "a");
    assert_eq!(&*tokens[3].hint, "es");
    assert_eq!(tokens[4].punctuator, Some(P::Opener));
    assert_eq!(tokens[5].text, "SCRIPT");
}

#[test]
fn non_javascript_script_type_is_opaque() {
    let tokens = run(
        registry(),
        "html",
        r#"<script type="text/template">{{ x }}</script>"#,
    );
    let Some(body) = tokens.iter().find(|t| t.text == "{{ x }}") else {
        panic!("opaque body is one token");
    };
    assert_eq!((body.kind, &*body.hint), (K::Text, "html"));
    assert!(!body.is_embedded());
    assert_eq!(body.parent, Some(tokens[0].id));
}

#[test]
fn style_body_is_css() {
    let tokens = run(registry(), "html", "<style>a{color:red}</style>");
    let css: Vec<_> = tokens
        .iter()
        .filter(|t| t.is_embedded())
        .map(|t| (t.text, t.punctuator, &*t.hint))
        .collect();
    assert_eq!(
        css,
        [
            ("a", None, "css"),
            ("{", Some(P::Opener), "css"),
            ("color", None, "css"),
            (":", Some(P::Operator), "css"),
            ("red", None, "css"),
            ("}", Some(P::Closer), "css"),
        ]
    );
}

#[test]
fn missing_end_tag_faults_the_rest() {
    let tokens = run(registry(), "html", "<script>let a");
    let Some(last) = tokens.last() else {
        panic!("tokens");
    };
    assert_eq!(last.text, "let a");
    assert!(last.is_fault());
    assert_eq!(tokens.iter().filter(|t| t.is_fault()).count(), 1);
}

#[test]
fn self_closing_script_is_not_delegated() {
    let tokens = run(registry(), "html", "<script src=x />text");
    assert!(tokens.iter().all(|t| !t.is_embedded()));
    let Some(last) = tokens.last() else {
        panic!("tokens");
    };
    assert_eq!((last.text, last.kind, &*last.hint), ("text", K::Text, "html"));
}

#[test]
fn attribute_quotes_inside_tags() {
    let tokens = run(registry(), "html", r#"<a href="x &amp; y">"#);
    let quoted: Vec<_> = tokens
        .iter()
        .filter(|t| &*t.hint == "quote")
        .map(|t| t.text)
        .collect();
    assert_eq!(quoted, ["\"", "x", " ", "&amp;", " ", "y", "\""]);
    assert_eq!(tokens.last().map(|t| t.punctuator), Some(Some(P::Closer)));
}

#[test]
fn unquoted_script_type_with_slash_is_delegated() {
    let tokens = run(registry(), "html", "<script type=text/javascript>let a</script>");
    let Some(body) = tokens.iter().find(|t| t.text == "let") else {
        panic!("script body is tokenized");
    };
    assert_eq!((body.kind, &*body.hint), (K::Keyword, "es"));
    assert!(body.is_embedded());
    assert!(tokens.iter().all(|t| !t.is_fault()));
}

#[test]
fn markdown_fence_is_delegated_by_info_string() {
    let source = "```js\nlet a;\n```\n";
    let tokens = run(registry(), "md", source);
    assert_eq!(
        summary(&tokens),
        [
            ("```", K::Sequence, Some(P::Opener), "md"),
            ("js", K::Text, None, "md"),
            ("\n", K::Whitespace, None, "md"),
            ("let", K::Keyword, None, "es"),
            (" ", K::Whitespace, None, "es"),
            ("a", K::Identifier, None, "es"),
            (";", K::Sequence, Some(P::Breaker), "es"),
            ("\n", K::Whitespace, None, "es"),
            ("```", K::Sequence, Some(P::Closer), "md"),
            ("\n", K::Whitespace, None, "md"),
        ]
    );
    assert_eq!(tokens[3].parent, Some(tokens[0].id));
}

#[test]
fn unknown_fence_language_is_opaque() {
    let tokens = run(registry(), "md", "```text\nhello world\n```");
    assert_eq!(tokens[3].text, "hello world\n");
    assert_eq!(tokens[3].kind, K::Text);
    assert_eq!(tokens.last().map(|t| t.punctuator), Some(Some(P::Closer)));
}

#[test]
fn missing_closing_fence_faults_the_rest() {
    let tokens = run(registry(), "md", "```js\nlet a");
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[1].text, "js\nlet a");
    assert!(tokens[1].is_fault());
}

#[test]
fn flat_variant_never_nests() {
    let options = TokenizerOptions::default().with_variant(Variant::Flat);
    let tokens: Vec<_> = match tokenize_with(registry(), "('a')", &options) {
        Ok(tokenizer) => tokenizer.collect(),
        Err(err) => panic!("{err}"),
    };
    assert_eq!(
        summary(&tokens),
        [
            ("(", K::Sequence, Some(P::Closure), "es"),
            ("'", K::Sequence, Some(P::Quote), "es"),
            ("a", K::Identifier, None, "es"),
            ("'", K::Sequence, Some(P::Quote), "es"),
            (")", K::Sequence, Some(P::Breaker), "es"),
        ]
    );
    assert!(tokens.iter().all(|t| t.parent.is_none()));
}

#[test]
fn depth_and_goal_follow_the_stream() {
    let options = TokenizerOptions::default();
    let Ok(mut tokenizer) = tokenize_with(registry(), "(`x`)", &options) else {
        panic!("es is registered");
    };
    assert_eq!((tokenizer.remaining_depth(), tokenizer.goal()), (0, "es"));
    tokenizer.next();
    assert_eq!((tokenizer.remaining_depth(), tokenizer.goal()), (1, "es"));
    tokenizer.next();
    assert_eq!((tokenizer.remaining_depth(), tokenizer.goal()), (2, "quote"));
    let rest: Vec<_> = tokenizer.by_ref().collect();
    assert_eq!(rest.len(), 3);
    assert_eq!((tokenizer.remaining_depth(), tokenizer.goal()), (0, "es"));
    assert!(tokenizer.next().is_none());
}

#[test]
fn consumers_may_stop_early() {
    let source = "a ".repeat(10_000);
    let options = TokenizerOptions::default();
    let Ok(tokenizer) = tokenize_with(registry(), &source, &options) else {
        panic!("es is registered");
    };
    let first: Vec<_> = tokenizer.take(3).map(|t| t.text).collect();
    assert_eq!(first, ["a", " ", "a"]);
}

#[test]
fn slash_after_operator_opens_a_regexp_literal() {
    let source = r#"s.replace(/"/g, 'x'); let y = 1;"#;
    let tokens = run(registry(), "es", source);
    assert!(tokens.iter().all(|t| !t.is_fault()));
    let Some(open) = tokens.iter().position(|t| t.text == "/") else {
        panic!("literal opener");
    };
    assert_eq!(tokens[open].punctuator, Some(P::Quote));
    let body = &tokens[open + 1];
    assert_eq!((body.text, &*body.hint), ("\"", "regexp"));
    assert!(body.is_embedded());
    assert_eq!(body.parent, Some(tokens[open].id));
    assert_eq!(
        summary(&tokens[open + 2..open + 4]),
        [
            ("/", K::Sequence, Some(P::Quote), "quote"),
            ("g", K::Identifier, None, "es"),
        ]
    );
    let Some(keyword) = tokens.iter().find(|t| t.text == "let") else {
        panic!("statement after the literal");
    };
    assert_eq!((keyword.kind, &*keyword.hint), (K::Keyword, "es"));
    assert!(!keyword.is_embedded());
}

#[test]
fn slash_after_operand_divides() {
    for source in ["a / b / c", "f(x) / 2 / y", "this / 2 /z"] {
        let tokens = run(registry(), "es", source);
        let slashes: Vec<_> = tokens
            .iter()
            .filter(|t| t.text == "/")
            .map(|t| t.punctuator)
            .collect();
        assert_eq!(slashes.len(), 2, "{source}");
        assert!(slashes.iter().all(|p| *p != Some(P::Quote)), "{source}");
        assert!(tokens.iter().all(|t| !t.is_embedded()), "{source}");
    }
}

#[test]
fn slash_without_closer_on_the_line_divides() {
    let tokens = run(registry(), "es", "x = /\n/ 2");
    assert!(tokens.iter().all(|t| !t.is_fault() && !t.is_embedded()));
}

#[test]
fn lone_backtick_before_a_fence_is_inert() {
    let source = "Type ` to quote.\n\n```js\nlet x\n```\n";
    let tokens = run(registry(), "md", source);
    assert!(tokens.iter().all(|t| !t.is_fault()));
    let Some(tick) = tokens.iter().find(|t| t.text == "`") else {
        panic!("backtick token");
    };
    assert_eq!((tick.kind, tick.punctuator, &*tick.hint), (K::Sequence, None, "md"));
    let Some(body) = tokens.iter().find(|t| t.text == "let") else {
        panic!("fence body");
    };
    assert_eq!((body.kind, &*body.hint), (K::Keyword, "es"));
    assert!(body.is_embedded());
}

#[test]
fn inline_code_within_a_paragraph_still_quotes() {
    let tokens = run(registry(), "md", "a `b\nc` d");
    let quotes: Vec<_> = tokens
        .iter()
        .filter(|t| t.punctuator == Some(P::Quote))
        .map(|t| t.text)
        .collect();
    assert_eq!(quotes, ["`", "`"]);
    assert!(tokens.iter().all(|t| !t.is_fault()));
}
