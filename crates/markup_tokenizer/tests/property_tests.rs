//! Property-based tests for the tokenizer.
//!
//! Arbitrary input, in every built-in grammar, must satisfy:
//! 1. Round trip: token texts concatenate back to the source
//! 2. Contiguity: each token starts where the previous one ends
//! 3. Linkage: ids count up from zero, `previous` is the prior id, and
//!    parents always precede their children
//!
//! Well-formed ECMAScript must additionally produce no faults, and every
//! token's hint must be the goal of its enclosing construct.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::doc_markdown,
    clippy::uninlined_format_args,
    reason = "Proptest macros generate code with these patterns"
)]

use markup_tokenizer::{
    count_breaks, default_registry, tokenize, Punctuator, Token, TokenId, TokenKind,
    TokenizerOptions,
};
use proptest::prelude::*;

const SYNTAXES: &[&str] = &["es", "typescript", "css", "html", "md", "regexp"];
const DELEGATING: &[&str] = &["html", "md"];
const ES_SEQUENCES: &[&str] = &["(", ")", "${", "`", "//", "/*", "=>", ".", ",", "x", ";"];

// -- Input Strategies --

/// Punctuation-heavy text that hits most sequences of every grammar.
fn noisy_source() -> impl Strategy<Value = String> {
    prop::string::string_regex(r#"[a-zA-Z0-9 \t\n\r'"`/*{}()\[\]<>$=;.,!#&?:@~^|%+\-\\]{0,80}"#)
        .expect("valid regex")
}

/// Fragments that open and close embedded regions, mixed with noise.
fn markup_source() -> impl Strategy<Value = String> {
    let fragment = prop_oneof![
        Just("<script>".to_owned()),
        Just("</script>".to_owned()),
        Just("<style>".to_owned()),
        Just("</style >".to_owned()),
        Just("<script type=\"text/plain\">".to_owned()),
        Just("<br/>".to_owned()),
        Just("<!--".to_owned()),
        Just("-->".to_owned()),
        Just("```js\n".to_owned()),
        Just("```\n".to_owned()),
        Just("~~~css\n".to_owned()),
        Just("${".to_owned()),
        Just("\r\n".to_owned()),
        Just("\u{2028}é".to_owned()),
        noisy_source(),
    ];
    prop::collection::vec(fragment, 0..12).prop_map(|parts| parts.concat())
}

/// Balanced ECMAScript: every construct that opens also closes.
fn balanced_es() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        prop::string::string_regex("[a-z]{1,6}").expect("valid regex"),
        prop::string::string_regex("[0-9]{1,3}").expect("valid regex"),
        prop::string::string_regex("'[a-z ]{0,5}'").expect("valid regex"),
        prop::string::string_regex("\"[a-z ]{0,5}\"").expect("valid regex"),
        prop::string::string_regex(r"/\*[a-z ]{0,5}\*/").expect("valid regex"),
        Just("a.if".to_owned()),
        Just(";".to_owned()),
        Just(" ".to_owned()),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        let body = prop::collection::vec(inner, 0..4).prop_map(|parts| parts.join(" "));
        prop_oneof![
            body.clone().prop_map(|s| format!("({s})")),
            body.clone().prop_map(|s| format!("[{s}]")),
            body.clone().prop_map(|s| format!("{{{s}}}")),
            body.clone().prop_map(|s| format!("`a${{{s}}}b`")),
            body.prop_map(|s| format!("f({s}) // note\n")),
        ]
    })
}

// -- Helpers --

fn run<'a>(syntax: &str, source: &'a str) -> Vec<Token<'a>> {
    let options = TokenizerOptions::default().with_source_type(syntax);
    tokenize(source, &options)
        .expect("built-in syntax")
        .collect()
}

fn check_stream(source: &str, tokens: &[Token<'_>]) -> Result<(), TestCaseError> {
    let joined: String = tokens.iter().map(|t| t.text).collect();
    prop_assert_eq!(&joined, source);

    let mut end = 0;
    for (index, token) in tokens.iter().enumerate() {
        prop_assert_eq!(token.offset, end, "gap before {:?}", token.text);
        prop_assert!(!token.text.is_empty() || token.is_fault());
        end = token.end();

        prop_assert_eq!(token.id, TokenId::new(index));
        let previous = index.checked_sub(1).map(TokenId::new);
        prop_assert_eq!(token.previous, previous);
        if let Some(parent) = token.parent {
            prop_assert!(parent.index() < index);
        }

        if token.kind == TokenKind::Whitespace {
            prop_assert_eq!(token.breaks, count_breaks(token.text));
        } else {
            prop_assert_eq!(token.breaks, 0);
        }
    }
    prop_assert_eq!(end, source.len());
    Ok(())
}

/// The goal a token should carry given its parent.
fn enclosing_goal<'t>(tokens: &'t [Token<'_>], token: &Token<'_>) -> &'t str {
    let Some(parent) = token.parent else {
        return "es";
    };
    match tokens[parent.index()].punctuator {
        Some(Punctuator::Quote) => "quote",
        Some(Punctuator::Comment) => "comment",
        _ => "es",
    }
}

// -- Property Tests --

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 1000,
        ..ProptestConfig::default()
    })]

    /// Any input in any grammar tokenizes to a contiguous, linked stream.
    #[test]
    fn prop_noisy_stream_is_lossless(
        source in noisy_source(),
        syntax in prop::sample::select(SYNTAXES),
    ) {
        let tokens = run(syntax, &source);
        check_stream(&source, &tokens)?;
    }

    /// Delegation boundaries keep the stream contiguous.
    #[test]
    fn prop_markup_stream_is_lossless(
        source in markup_source(),
        syntax in prop::sample::select(DELEGATING),
    ) {
        let tokens = run(syntax, &source);
        check_stream(&source, &tokens)?;
        for token in tokens.iter().filter(|t| t.is_embedded()) {
            prop_assert!(token.parent.is_some());
        }
    }

    /// Well-formed input closes every construct it opens.
    #[test]
    fn prop_balanced_es_has_no_faults(source in balanced_es()) {
        let options = TokenizerOptions::default();
        let mut tokenizer = tokenize(&source, &options).expect("es is registered");
        let tokens: Vec<_> = tokenizer.by_ref().collect();
        check_stream(&source, &tokens)?;
        prop_assert!(tokens.iter().all(|t| !t.is_fault()), "{:?}", source);
        prop_assert_eq!(tokenizer.remaining_depth(), 0);
    }

    /// After a construct closes, its parent's goal is back in force.
    #[test]
    fn prop_goal_follows_enclosing_construct(source in balanced_es()) {
        let tokens = run("es", &source);
        for token in &tokens {
            let delimiter = matches!(
                token.punctuator,
                Some(Punctuator::Quote | Punctuator::Comment | Punctuator::Span)
            );
            if !delimiter {
                prop_assert_eq!(&*token.hint, enclosing_goal(&tokens, token), "{:?}", token.text);
            }
        }
    }

    /// Classification does not depend on what was classified before.
    #[test]
    fn prop_classification_is_order_independent(
        texts in prop::collection::vec(prop::sample::select(ES_SEQUENCES), 1..24),
    ) {
        let registry = default_registry().expect("builtins build");
        let es = registry.get("es").expect("es is registered");
        let forward: Vec<_> = texts.iter().map(|t| es.classify(t)).collect();
        let backward: Vec<_> = texts.iter().rev().map(|t| es.classify(t)).collect();
        let reversed: Vec<_> = backward.into_iter().rev().collect();
        prop_assert_eq!(forward, reversed);
    }
}
