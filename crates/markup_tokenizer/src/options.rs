//! Tokenize options.

use crate::TokenizeError;

/// Which scanning strategy a tokenizer runs.
///
/// Selected by integer at the entry boundary: `1` (or `0`) is
/// [`Variant::Contextual`], `2` is [`Variant::Flat`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Variant {
    /// The grouping state machine with embedded-grammar delegation.
    #[default]
    Contextual,
    /// Primary matcher only. Every sequence is classified and every
    /// unmatched run is keyworded, but nothing nests.
    Flat,
}

impl Variant {
    pub const fn as_u8(self) -> u8 {
        match self {
            Variant::Contextual => 1,
            Variant::Flat => 2,
        }
    }
}

impl TryFrom<u8> for Variant {
    type Error = TokenizeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 | 1 => Ok(Variant::Contextual),
            2 => Ok(Variant::Flat),
            other => Err(TokenizeError::UnknownVariant(other)),
        }
    }
}

/// Options for [`tokenize`](crate::tokenize).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenizerOptions {
    /// Syntax id or alias, matched case-insensitively.
    pub source_type: String,
    pub variant: Variant,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        TokenizerOptions {
            source_type: "es".to_owned(),
            variant: Variant::default(),
        }
    }
}

impl TokenizerOptions {
    #[must_use]
    pub fn with_source_type(mut self, source_type: impl Into<String>) -> Self {
        self.source_type = source_type.into();
        self
    }

    #[must_use]
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }
}
