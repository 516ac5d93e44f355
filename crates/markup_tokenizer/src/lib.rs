//! Context-aware tokenizer for source text and markup.
//!
//! A single regex-driven scan loop tracks nested lexical constructs
//! (strings, comments, bracketed groups, template spans) on a context stack,
//! and hands embedded regions such as an HTML `<script>` body or a Markdown
//! code fence to another grammar. The result is a flat, lazy stream of
//! [`Token`]s whose texts concatenate back to the source.
//!
//! ```text
//! source ─► Scanner ─► Production ─► grouping transitions ─► Token
//!                ▲                          │
//!                └── matcher of top frame ◄─┘
//! ```
//!
//! Grammars are plain configuration from `markup_grammar`; the built-ins
//! live in `markup_syntaxes`. [`tokenize`] uses a process-wide registry of
//! the built-ins; [`tokenize_with`] takes an explicit one.
//!
//! Malformed input never fails: unterminated constructs come back as
//! [`TokenFlags::FAULT`] tokens.

use std::sync::{Arc, Once, OnceLock};

use markup_grammar::{GrammarError, GrammarRegistry};

mod embed;
mod error;
mod grouping;
mod keywording;
mod options;
mod parallel;
mod scanner;
mod token;
mod tokenizer;

pub use error::TokenizeError;
pub use markup_grammar::Punctuator;
pub use options::{TokenizerOptions, Variant};
pub use parallel::tokenize_documents;
pub use scanner::{Production, Scanner};
pub use token::{count_breaks, Token, TokenFlags, TokenId, TokenKind};
pub use tokenizer::Tokenizer;

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing unless `RUST_LOG` is set, and only ever runs once. The
/// tokenizer itself never installs a subscriber.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

static DEFAULT_REGISTRY: OnceLock<Result<GrammarRegistry, GrammarError>> = OnceLock::new();

/// The built-in grammars, built on first use.
pub fn default_registry() -> Result<&'static GrammarRegistry, GrammarError> {
    DEFAULT_REGISTRY
        .get_or_init(markup_syntaxes::builtin_registry)
        .as_ref()
        .map_err(Clone::clone)
}

/// Tokenize `source` with the built-in grammars.
pub fn tokenize<'src>(
    source: &'src str,
    options: &TokenizerOptions,
) -> Result<Tokenizer<'src>, TokenizeError> {
    tokenize_with(default_registry()?, source, options)
}

/// Tokenize `source` with grammars from `registry`.
pub fn tokenize_with<'src>(
    registry: &'src GrammarRegistry,
    source: &'src str,
    options: &TokenizerOptions,
) -> Result<Tokenizer<'src>, TokenizeError> {
    let Some(grammar) = registry.get(&options.source_type) else {
        return Err(TokenizeError::UnknownSyntax(options.source_type.clone()));
    };
    tracing::trace!(
        syntax = grammar.syntax(),
        len = source.len(),
        variant = options.variant.as_u8(),
        "tokenize"
    );
    Ok(Tokenizer::new(
        registry,
        Arc::clone(grammar),
        source,
        options.variant,
    ))
}
