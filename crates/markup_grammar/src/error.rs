//! Grammar configuration errors.
//!
//! Every variant is raised while a grammar is built or registered, before
//! any tokenize call runs. Malformed *input* is never an error: the
//! tokenizer reports it as fault tokens instead.

/// A grammar could not be built or registered.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GrammarError {
    /// A matcher or word pattern failed to compile.
    #[error("grammar `{syntax}`: pattern `{name}` is invalid: {source}")]
    InvalidPattern {
        syntax: String,
        name: String,
        #[source]
        source: regex::Error,
    },

    /// A matcher lacks one of the capture groups the scan loop reads.
    #[error("grammar `{syntax}`: matcher `{name}` has no `(?P<{group}>...)` capture group")]
    MissingCaptureGroup {
        syntax: String,
        name: String,
        group: &'static str,
    },

    /// A quote, comment, span or closure descriptor is unusable.
    #[error("grammar `{syntax}`: delimiter `{opener}` is malformed: {reason}")]
    MalformedClosure {
        syntax: String,
        opener: String,
        reason: &'static str,
    },

    /// A grammar requires another grammar that is not registered yet.
    #[error("grammar `{syntax}` requires `{requires}`, which is not registered")]
    MissingRequirement { syntax: String, requires: String },

    /// A syntax id or alias is already taken.
    #[error("syntax `{syntax}` is already registered")]
    DuplicateSyntax { syntax: String },

    /// A grammar was built without a primary matcher.
    #[error("grammar `{syntax}` has no primary matcher")]
    MissingMatcher { syntax: String },
}
