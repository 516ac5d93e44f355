//! Grammar tables and their builder.
//!
//! Grammars are built once, validated, and never mutated afterwards except
//! for their classification cache. Composition is by value: a grammar that
//! extends another copies the base configuration into a fresh builder and
//! adds to it, so the two instances share nothing at runtime.

use std::sync::Arc;

use regex::Regex;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::classify::Classifications;
use crate::{Closer, Closure, ClosureKind, Delimiter, GrammarError, Matcher, PatternLiteral};

/// Goal reported inside comments.
const COMMENT_GOAL: &str = "comment";
/// Goal reported inside quotes.
const QUOTE_GOAL: &str = "quote";

/// Literal punctuator classes that do not open constructs.
#[derive(Clone, Debug, Default)]
pub struct Punctuators {
    pub nonbreakers: FxHashSet<Box<str>>,
    pub operators: FxHashSet<Box<str>>,
    pub breakers: FxHashSet<Box<str>>,
    pub aggregators: FxHashSet<Box<str>>,
}

/// Word tests applied to unmatched runs.
#[derive(Clone, Debug, Default)]
pub struct Patterns {
    pub maybe_identifier: Option<Regex>,
    pub maybe_keyword: Option<Regex>,
}

/// Goal names handed out by reference-counted clone.
#[derive(Debug)]
struct Goals {
    syntax: Arc<str>,
    comment: Arc<str>,
    quote: Arc<str>,
}

/// An immutable, validated grammar.
#[derive(Debug)]
pub struct Grammar {
    goals: Goals,
    aliases: Vec<Box<str>>,
    keywords: FxHashSet<Box<str>>,
    punctuators: Punctuators,
    quotes: FxHashMap<Box<str>, Delimiter>,
    comments: FxHashMap<Box<str>, Delimiter>,
    spans: FxHashMap<Box<str>, Delimiter>,
    closures: FxHashMap<Box<str>, Closure>,
    pattern: Option<PatternLiteral>,
    matcher: Matcher,
    patterns: Patterns,
    prose: bool,
    classifications: Classifications,
}

impl Grammar {
    pub fn syntax(&self) -> &str {
        &self.goals.syntax
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.aliases.iter().map(AsRef::as_ref)
    }

    /// Goal reported for code: the syntax id.
    pub fn syntax_goal(&self) -> &Arc<str> {
        &self.goals.syntax
    }

    pub fn comment_goal(&self) -> &Arc<str> {
        &self.goals.comment
    }

    pub fn quote_goal(&self) -> &Arc<str> {
        &self.goals.quote
    }

    pub fn is_keyword(&self, text: &str) -> bool {
        self.keywords.contains(text)
    }

    pub fn keywords(&self) -> &FxHashSet<Box<str>> {
        &self.keywords
    }

    pub fn punctuators(&self) -> &Punctuators {
        &self.punctuators
    }

    pub fn quote(&self, opener: &str) -> Option<&Delimiter> {
        self.quotes.get(opener)
    }

    pub fn comment(&self, opener: &str) -> Option<&Delimiter> {
        self.comments.get(opener)
    }

    pub fn span(&self, opener: &str) -> Option<&Delimiter> {
        self.spans.get(opener)
    }

    pub fn closure(&self, opener: &str) -> Option<&Closure> {
        self.closures.get(opener)
    }

    /// The regular-expression literal form, if the grammar has one.
    pub fn pattern(&self) -> Option<&PatternLiteral> {
        self.pattern.as_ref()
    }

    /// The primary matcher, used while no construct is open.
    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub fn patterns(&self) -> &Patterns {
        &self.patterns
    }

    /// Prose grammars (markup, markdown) report top-level unmatched runs as
    /// plain text instead of testing them as words.
    pub fn is_prose(&self) -> bool {
        self.prose
    }

    pub(crate) fn classifications(&self) -> &Classifications {
        &self.classifications
    }
}

/// Builder for [`Grammar`].
#[derive(Clone, Debug)]
pub struct GrammarBuilder {
    syntax: String,
    aliases: Vec<Box<str>>,
    keywords: FxHashSet<Box<str>>,
    punctuators: Punctuators,
    quotes: FxHashMap<Box<str>, Delimiter>,
    comments: FxHashMap<Box<str>, Delimiter>,
    spans: FxHashMap<Box<str>, Delimiter>,
    closures: FxHashMap<Box<str>, Closure>,
    pattern: Option<PatternLiteral>,
    matcher: Option<Matcher>,
    maybe_identifier: Option<String>,
    maybe_keyword: Option<String>,
    patterns: Patterns,
    prose: bool,
}

impl GrammarBuilder {
    pub fn new(syntax: impl Into<String>) -> Self {
        GrammarBuilder {
            syntax: syntax.into(),
            aliases: Vec::new(),
            keywords: FxHashSet::default(),
            punctuators: Punctuators::default(),
            quotes: FxHashMap::default(),
            comments: FxHashMap::default(),
            spans: FxHashMap::default(),
            closures: FxHashMap::default(),
            pattern: None,
            matcher: None,
            maybe_identifier: None,
            maybe_keyword: None,
            patterns: Patterns::default(),
            prose: false,
        }
    }

    /// Start from a copy of `base`'s configuration under a new syntax id.
    ///
    /// Aliases are not inherited; the classification cache starts empty.
    pub fn extending(base: &Grammar, syntax: impl Into<String>) -> Self {
        GrammarBuilder {
            syntax: syntax.into(),
            aliases: Vec::new(),
            keywords: base.keywords.clone(),
            punctuators: base.punctuators.clone(),
            quotes: base.quotes.clone(),
            comments: base.comments.clone(),
            spans: base.spans.clone(),
            closures: base.closures.clone(),
            pattern: base.pattern.clone(),
            matcher: Some(base.matcher.clone()),
            maybe_identifier: None,
            maybe_keyword: None,
            patterns: base.patterns.clone(),
            prose: base.prose,
        }
    }

    pub fn syntax(&self) -> &str {
        &self.syntax
    }

    /// Compile a matcher named `name` for this grammar.
    pub fn compile(&self, name: &str, pattern: &str) -> Result<Matcher, GrammarError> {
        Matcher::new(&self.syntax, name, pattern)
    }

    /// Compile a look-ahead bound named `name` (see [`Delimiter::with_bound`]).
    pub fn compile_bound(&self, name: &str, pattern: &str) -> Result<Regex, GrammarError> {
        Regex::new(pattern).map_err(|source| GrammarError::InvalidPattern {
            syntax: self.syntax.clone(),
            name: name.to_owned(),
            source,
        })
    }

    #[must_use]
    pub fn aliases<'a>(mut self, aliases: impl IntoIterator<Item = &'a str>) -> Self {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Add whitespace-separated keywords.
    #[must_use]
    pub fn keywords(mut self, list: &str) -> Self {
        self.keywords.extend(words(list));
        self
    }

    #[must_use]
    pub fn nonbreakers(mut self, list: &str) -> Self {
        self.punctuators.nonbreakers.extend(words(list));
        self
    }

    #[must_use]
    pub fn operators(mut self, list: &str) -> Self {
        self.punctuators.operators.extend(words(list));
        self
    }

    #[must_use]
    pub fn breakers(mut self, list: &str) -> Self {
        self.punctuators.breakers.extend(words(list));
        self
    }

    #[must_use]
    pub fn aggregators(mut self, list: &str) -> Self {
        self.punctuators.aggregators.extend(words(list));
        self
    }

    #[must_use]
    pub fn quote(mut self, quote: Delimiter) -> Self {
        self.quotes.insert(quote.opener.clone(), quote);
        self
    }

    #[must_use]
    pub fn comment(mut self, comment: Delimiter) -> Self {
        self.comments.insert(comment.opener.clone(), comment);
        self
    }

    #[must_use]
    pub fn span(mut self, span: Delimiter) -> Self {
        self.spans.insert(span.opener.clone(), span);
        self
    }

    #[must_use]
    pub fn closure(mut self, closure: Closure) -> Self {
        self.closures.insert(closure.opener.clone(), closure);
        self
    }

    #[must_use]
    pub fn pattern(mut self, pattern: PatternLiteral) -> Self {
        self.pattern = Some(pattern);
        self
    }

    #[must_use]
    pub fn matcher(mut self, matcher: Matcher) -> Self {
        self.matcher = Some(matcher);
        self
    }

    #[must_use]
    pub fn maybe_identifier(mut self, pattern: &str) -> Self {
        self.maybe_identifier = Some(pattern.to_owned());
        self
    }

    #[must_use]
    pub fn maybe_keyword(mut self, pattern: &str) -> Self {
        self.maybe_keyword = Some(pattern.to_owned());
        self
    }

    #[must_use]
    pub fn prose(mut self, prose: bool) -> Self {
        self.prose = prose;
        self
    }

    /// Validate and freeze the grammar.
    pub fn build(self) -> Result<Grammar, GrammarError> {
        let syntax = self.syntax;
        let malformed = |opener: &str, reason: &'static str| GrammarError::MalformedClosure {
            syntax: syntax.clone(),
            opener: opener.to_owned(),
            reason,
        };

        for delimiter in self
            .quotes
            .values()
            .chain(self.comments.values())
            .chain(self.spans.values())
            .chain(self.pattern.iter().map(|pattern| &pattern.delimiter))
        {
            if delimiter.opener.is_empty() {
                return Err(malformed("", "empty opener"));
            }
            if let Closer::Literal(closer) = &delimiter.closer {
                if closer.is_empty() {
                    return Err(malformed(&delimiter.opener, "empty closer"));
                }
            }
        }
        for closure in self.closures.values() {
            if closure.opener.is_empty() {
                return Err(malformed("", "empty opener"));
            }
            if closure.closer.is_empty() {
                return Err(malformed(&closure.opener, "empty closer"));
            }
            // A fence closes on its own opener; every other pair must nest.
            let fence = matches!(closure.kind, ClosureKind::EmbeddableFence(_));
            if closure.opener == closure.closer && !fence {
                return Err(malformed(
                    &closure.opener,
                    "closure opener and closer must differ",
                ));
            }
        }

        let Some(matcher) = self.matcher else {
            return Err(GrammarError::MissingMatcher { syntax });
        };

        let compile = |name: &str, pattern: Option<String>| -> Result<Option<Regex>, GrammarError> {
            pattern
                .map(|pattern| {
                    Regex::new(&pattern).map_err(|source| GrammarError::InvalidPattern {
                        syntax: syntax.clone(),
                        name: name.to_owned(),
                        source,
                    })
                })
                .transpose()
        };
        let mut patterns = self.patterns;
        if let Some(regex) = compile("maybe_identifier", self.maybe_identifier)? {
            patterns.maybe_identifier = Some(regex);
        }
        if let Some(regex) = compile("maybe_keyword", self.maybe_keyword)? {
            patterns.maybe_keyword = Some(regex);
        }

        Ok(Grammar {
            goals: Goals {
                syntax: Arc::from(syntax),
                comment: Arc::from(COMMENT_GOAL),
                quote: Arc::from(QUOTE_GOAL),
            },
            aliases: self.aliases,
            keywords: self.keywords,
            punctuators: self.punctuators,
            quotes: self.quotes,
            comments: self.comments,
            spans: self.spans,
            closures: self.closures,
            pattern: self.pattern,
            matcher,
            patterns,
            prose: self.prose,
            classifications: Classifications::new(),
        })
    }
}

fn words(list: &str) -> impl Iterator<Item = Box<str>> + '_ {
    list.split_whitespace().map(Into::into)
}
