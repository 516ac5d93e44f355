//! Tokenizing many documents at once.

use markup_grammar::GrammarRegistry;
use rayon::prelude::*;

use crate::{tokenize_with, Token, TokenizeError, TokenizerOptions};

/// Tokenize every document on the rayon pool, one tokenizer per document.
///
/// Grammar instances and their classification caches are shared between
/// workers. Results come back in input order.
pub fn tokenize_documents<'src>(
    registry: &'src GrammarRegistry,
    documents: &[&'src str],
    options: &TokenizerOptions,
) -> Vec<Result<Vec<Token<'src>>, TokenizeError>> {
    documents
        .par_iter()
        .map(|&source| tokenize_with(registry, source, options).map(Iterator::collect))
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn results_keep_input_order() {
        let Ok(registry) = markup_syntaxes::builtin_registry() else {
            panic!("builtins build");
        };
        let documents = ["let a = 1;", "", "'x'", "if (b) {}"];
        let results = tokenize_documents(&registry, &documents, &TokenizerOptions::default());
        assert_eq!(results.len(), documents.len());
        for (result, source) in results.into_iter().zip(documents) {
            let Ok(tokens) = result else {
                panic!("es is registered");
            };
            let text: String = tokens.iter().map(|t| t.text).collect();
            assert_eq!(text, source);
        }
    }

    #[test]
    fn unknown_source_type_fails_per_document() {
        let Ok(registry) = markup_syntaxes::builtin_registry() else {
            panic!("builtins build");
        };
        let options = TokenizerOptions::default().with_source_type("cobol");
        let results = tokenize_documents(&registry, &["a", "b"], &options);
        assert!(results
            .iter()
            .all(|r| matches!(r, Err(TokenizeError::UnknownSyntax(s)) if s == "cobol")));
    }
}
