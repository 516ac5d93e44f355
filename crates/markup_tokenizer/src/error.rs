//! Errors raised before the first token is produced.

use markup_grammar::GrammarError;

/// A tokenize call that could not start.
///
/// Malformed input never produces one of these; it produces
/// [`TokenFlags::FAULT`](crate::TokenFlags::FAULT) tokens instead.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TokenizeError {
    /// The source type names no registered syntax or alias.
    #[error("unknown source type `{0}`")]
    UnknownSyntax(String),

    #[error("unknown tokenizer variant {0}")]
    UnknownVariant(u8),

    /// The grammar registry failed to build.
    #[error(transparent)]
    Grammar(#[from] GrammarError),
}
