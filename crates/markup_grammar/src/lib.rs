//! Declarative grammar tables for the markup tokenizer.
//!
//! A [`Grammar`] is immutable configuration: a keyword set, punctuator
//! classes, delimiter descriptors for quotes, comments, spans and closures,
//! the primary [`Matcher`] and the auxiliary word patterns. The only state a
//! grammar mutates after construction is its punctuator classification
//! cache, which grows monotonically and is shared safely across threads.
//!
//! # Layers
//!
//! ```text
//! GrammarRegistry ──get(syntax)──▶ Arc<Grammar> ──classify(text)──▶ Punctuator
//!                                       │
//!                                       └── matcher / delimiters ──▶ tokenizer
//! ```
//!
//! This crate has no dependency on the tokenizer itself, so highlighters and
//! tools can inspect or build grammars without pulling in the scan loop.

mod classify;
mod delimiter;
mod error;
mod grammar;
mod matcher;
mod punctuator;
mod registry;

pub use classify::Classifications;
pub use delimiter::{
    Closer, Closure, ClosureKind, Delimiter, Embedding, FenceEmbedding, FenceSelector,
    PatternLiteral, TagEmbedding, TagSelector,
};
pub use error::GrammarError;
pub use grammar::{Grammar, GrammarBuilder, Patterns, Punctuators};
pub use matcher::{Matcher, MatcherHit, SEQUENCE_GROUP, WHITESPACE_GROUP};
pub use punctuator::Punctuator;
pub use registry::{GrammarDefinition, GrammarFactory, GrammarRegistry};
