//! Grammar registry.
//!
//! Maps syntax ids and their aliases to shared grammar instances. Grammars
//! that require other grammars are only accepted once their requirements
//! are registered, so every grammar reachable through the registry is
//! complete before the first tokenize call.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::{Grammar, GrammarError};

/// Builds a grammar, optionally reading grammars it requires.
pub type GrammarFactory = fn(&GrammarRegistry) -> Result<Grammar, GrammarError>;

/// A grammar waiting to be registered.
#[derive(Copy, Clone, Debug)]
pub struct GrammarDefinition {
    pub syntax: &'static str,
    /// Syntax ids that must already be registered.
    pub requires: &'static [&'static str],
    pub build: GrammarFactory,
}

/// Registry of grammars keyed by syntax id and alias.
///
/// Lookups are ASCII case-insensitive.
#[derive(Debug, Default)]
pub struct GrammarRegistry {
    grammars: FxHashMap<Box<str>, Arc<Grammar>>,
    /// Lowercased id or alias → syntax id.
    names: FxHashMap<Box<str>, Box<str>>,
    /// Syntax ids in registration order.
    order: Vec<Box<str>>,
}

impl GrammarRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check requirements, build and register a grammar definition.
    pub fn register(&mut self, definition: GrammarDefinition) -> Result<Arc<Grammar>, GrammarError> {
        for &requires in definition.requires {
            if !self.contains(requires) {
                return Err(GrammarError::MissingRequirement {
                    syntax: definition.syntax.to_owned(),
                    requires: requires.to_owned(),
                });
            }
        }
        let grammar = (definition.build)(self)?;
        self.insert(grammar)
    }

    /// Register an already built grammar under its syntax id and aliases.
    pub fn insert(&mut self, grammar: Grammar) -> Result<Arc<Grammar>, GrammarError> {
        let syntax: Box<str> = grammar.syntax().into();
        let names: Vec<Box<str>> = std::iter::once(grammar.syntax())
            .chain(grammar.aliases())
            .map(|name| name.to_ascii_lowercase().into_boxed_str())
            .collect();
        for (i, name) in names.iter().enumerate() {
            if self.names.contains_key(name) || names[..i].contains(name) {
                return Err(GrammarError::DuplicateSyntax {
                    syntax: name.to_string(),
                });
            }
        }

        tracing::debug!(
            syntax = &*syntax,
            aliases = names.len() - 1,
            "registered grammar"
        );
        for name in names {
            self.names.insert(name, syntax.clone());
        }
        let grammar = Arc::new(grammar);
        self.grammars.insert(syntax.clone(), Arc::clone(&grammar));
        self.order.push(syntax);
        Ok(grammar)
    }

    /// Look up a grammar by syntax id or alias.
    pub fn get(&self, name: &str) -> Option<&Arc<Grammar>> {
        let syntax = match self.names.get(name) {
            Some(syntax) => syntax,
            None => self.names.get(name.to_ascii_lowercase().as_str())?,
        };
        self.grammars.get(syntax)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Syntax ids in registration order.
    pub fn syntaxes(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(AsRef::as_ref)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
