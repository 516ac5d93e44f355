//! The lazy token iterator.
//!
//! Each call to `next` drains the queue of already-built tokens, then the
//! active delegated region, and only then runs one step of the scan loop.
//! A step turns one [`Production`] into one or more tokens, applying the
//! grouping transitions for sequences. Consumers that stop early never pay
//! for the rest of the input.
//!
//! # Transitions for a sequence
//!
//! 1. The innermost frame's closer pops it.
//! 2. Inside a comment nothing opens.
//! 3. Inside a quote only spans open; a second quote opener is inert.
//! 4. Otherwise comment, quote, span and closure openers push a frame.
//!
//! Quotes and comments look ahead for their closer before pushing. When it is
//! missing the rest of the window becomes one fault token instead, so an
//! unterminated string never swallows the frames around it. A bounded
//! delimiter (Markdown inline code) with no closer before its bound is inert.
//!
//! A grammar's regular-expression literal opener is an operator text that
//! opens a literal only where an operand may start; the literal's body is
//! delegated like an embedded region.

use std::collections::VecDeque;
use std::iter::FusedIterator;
use std::ops::Range;
use std::sync::Arc;

use markup_grammar::{
    Closer, ClosureKind, Embedding, FenceEmbedding, Grammar, GrammarRegistry, Punctuator,
    TagEmbedding,
};

use crate::embed::{self, Directive};
use crate::grouping::{ContextStack, GrouperId, Sibling};
use crate::keywording::classify_word;
use crate::token::{count_breaks, has_line_break};
use crate::{Production, Scanner, Token, TokenFlags, TokenId, TokenKind, Variant};

/// A region being tokenized by another grammar.
struct Delegation<'src> {
    tokenizer: Box<Tokenizer<'src>>,
    /// Where the owning grammar picks up again.
    resume: usize,
}

/// Pull-based tokenizer over one source text.
///
/// Created by [`tokenize`](crate::tokenize) or
/// [`tokenize_with`](crate::tokenize_with). Finite for finite input and
/// not restartable.
pub struct Tokenizer<'src> {
    registry: &'src GrammarRegistry,
    grammar: Arc<Grammar>,
    source: &'src str,
    scanner: Scanner<'src>,
    stack: ContextStack,
    variant: Variant,
    queue: VecDeque<Token<'src>>,
    delegation: Option<Delegation<'src>>,
    directive: Option<Directive>,
    next_id: usize,
    previous: Option<TokenId>,
    after_nonbreaker: bool,
    /// The last significant token ends an operand, so a pattern opener
    /// divides instead.
    after_operand: bool,
    /// Parent of top-level tokens: the owning opener in a delegated region.
    root_parent: Option<TokenId>,
    /// Added to every token this tokenizer emits.
    flags: TokenFlags,
    finished: bool,
}

impl<'src> Tokenizer<'src> {
    pub(crate) fn new(
        registry: &'src GrammarRegistry,
        grammar: Arc<Grammar>,
        source: &'src str,
        variant: Variant,
    ) -> Self {
        Tokenizer::with_scanner(registry, grammar, Scanner::new(source), variant)
    }

    fn with_scanner(
        registry: &'src GrammarRegistry,
        grammar: Arc<Grammar>,
        scanner: Scanner<'src>,
        variant: Variant,
    ) -> Self {
        Tokenizer {
            registry,
            grammar,
            source: scanner.source(),
            scanner,
            stack: ContextStack::new(),
            variant,
            queue: VecDeque::new(),
            delegation: None,
            directive: None,
            next_id: 0,
            previous: None,
            after_nonbreaker: false,
            after_operand: false,
            root_parent: None,
            flags: TokenFlags::empty(),
            finished: false,
        }
    }

    /// A tokenizer for `directive`'s region that continues this one's ids.
    fn embedded(&self, grammar: Arc<Grammar>, directive: &Directive) -> Self {
        let scanner = Scanner::over(self.source, directive.offset..directive.index);
        let mut tokenizer = Tokenizer::with_scanner(self.registry, grammar, scanner, self.variant);
        tokenizer.next_id = self.next_id;
        tokenizer.previous = self.previous;
        tokenizer.root_parent = Some(directive.parent);
        tokenizer.flags = self.flags | TokenFlags::EMBEDDED;
        tokenizer
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// The goal the next token would be scanned under.
    pub fn goal(&self) -> &str {
        match &self.delegation {
            Some(delegation) => delegation.tokenizer.goal(),
            None => self.stack.goal(&self.grammar),
        }
    }

    /// Open constructs, counting those of an active delegated region.
    pub fn remaining_depth(&self) -> usize {
        self.stack.depth()
            + self
                .delegation
                .as_ref()
                .map_or(0, |delegation| delegation.tokenizer.remaining_depth())
    }

    fn limit(&self) -> usize {
        self.directive
            .as_ref()
            .map_or(self.scanner.boundary(), |directive| directive.offset)
    }

    fn parent(&self) -> Option<TokenId> {
        self.stack
            .top()
            .map(|frame| frame.opener)
            .or(self.root_parent)
    }

    fn current_goal(&self) -> Arc<str> {
        Arc::clone(self.stack.goal(&self.grammar))
    }

    fn emit(
        &mut self,
        kind: TokenKind,
        range: Range<usize>,
        punctuator: Option<Punctuator>,
        hint: Arc<str>,
        parent: Option<TokenId>,
        flags: TokenFlags,
    ) -> TokenId {
        let source = self.source;
        let text = &source[range.clone()];
        let id = TokenId::new(self.next_id);
        self.next_id += 1;
        if kind != TokenKind::Whitespace {
            self.after_nonbreaker = punctuator == Some(Punctuator::Nonbreaker);
            let in_comment = punctuator == Some(Punctuator::Comment)
                || self
                    .stack
                    .top_grouper()
                    .is_some_and(|grouper| grouper.punctuator == Punctuator::Comment);
            if !in_comment {
                self.after_operand = self.ends_operand(kind, punctuator, text);
            }
        }
        self.stack.record(Sibling {
            kind,
            punctuator,
            range: range.clone(),
        });
        self.queue.push_back(Token {
            id,
            text,
            offset: range.start,
            kind,
            punctuator,
            breaks: if kind == TokenKind::Whitespace {
                count_breaks(text)
            } else {
                0
            },
            hint,
            previous: self.previous,
            parent,
            flags: flags | self.flags,
        });
        self.previous = Some(id);
        id
    }

    fn ends_operand(&self, kind: TokenKind, punctuator: Option<Punctuator>, text: &str) -> bool {
        let listed = self
            .grammar
            .pattern()
            .is_some_and(|pattern| pattern.ends_operand(text));
        match kind {
            TokenKind::Identifier | TokenKind::Word | TokenKind::Text => true,
            TokenKind::Keyword => listed,
            TokenKind::Sequence | TokenKind::Whitespace => {
                listed || matches!(punctuator, Some(Punctuator::Closer | Punctuator::Quote))
            }
        }
    }

    fn plain(&mut self, range: Range<usize>, punctuator: Option<Punctuator>) {
        let hint = self.current_goal();
        let parent = self.parent();
        self.emit(
            TokenKind::Sequence,
            range,
            punctuator,
            hint,
            parent,
            TokenFlags::empty(),
        );
    }

    /// Turn everything from the cursor to the limit into one fault token.
    fn fault_rest(&mut self, hint: Arc<str>, parent: Option<TokenId>) {
        let start = self.scanner.cursor();
        let limit = self.limit();
        self.scanner.relocate(limit);
        tracing::debug!(goal = &*hint, offset = start, "unterminated construct");
        self.emit(
            TokenKind::Text,
            start..limit,
            None,
            hint,
            parent,
            TokenFlags::FAULT,
        );
    }

    fn step(&mut self) {
        if self
            .directive
            .as_ref()
            .is_some_and(|directive| self.scanner.cursor() >= directive.offset)
        {
            if let Some(directive) = self.directive.take() {
                self.delegate(directive);
            }
            return;
        }

        let grammar = Arc::clone(&self.grammar);
        let limit = self.limit();
        let production = self
            .scanner
            .next_production(self.stack.matcher(&grammar), limit);
        match production {
            Production::End => self.finish(),
            Production::Whitespace(range) => self.whitespace(range),
            Production::Pre(range) => self.pre(&grammar, range),
            Production::Sequence(range) => self.sequence(&grammar, range),
        }
    }

    fn step_flat(&mut self) {
        let grammar = Arc::clone(&self.grammar);
        let source = self.source;
        let limit = self.scanner.boundary();
        let production = self.scanner.next_production(grammar.matcher(), limit);
        let hint = Arc::clone(grammar.syntax_goal());
        let parent = self.root_parent;
        let none = TokenFlags::empty();
        match production {
            Production::End => self.finished = true,
            Production::Whitespace(range) => {
                self.emit(TokenKind::Whitespace, range, None, hint, parent, none);
            }
            Production::Sequence(range) => {
                let punctuator = grammar.classify(&source[range.clone()]);
                self.emit(TokenKind::Sequence, range, punctuator, hint, parent, none);
            }
            Production::Pre(range) => {
                let kind = classify_word(&grammar, &source[range.clone()], self.after_nonbreaker);
                self.emit(kind, range, None, hint, parent, none);
            }
        }
    }

    fn whitespace(&mut self, range: Range<usize>) {
        let source = self.source;
        let text = &source[range.clone()];
        let ends_line_frame = self
            .stack
            .top_grouper()
            .is_some_and(|grouper| grouper.closer == Closer::LineBreak);
        if ends_line_frame && has_line_break(text) {
            self.stack.pop();
        }
        let hint = self.current_goal();
        let parent = self.parent();
        self.emit(
            TokenKind::Whitespace,
            range,
            None,
            hint,
            parent,
            TokenFlags::empty(),
        );
    }

    fn pre(&mut self, grammar: &Grammar, range: Range<usize>) {
        let source = self.source;
        let text = &source[range.clone()];
        let kind = match self.stack.top_grouper().map(|grouper| grouper.punctuator) {
            Some(Punctuator::Comment | Punctuator::Quote) => TokenKind::Text,
            None if grammar.is_prose() => TokenKind::Text,
            _ => classify_word(grammar, text, self.after_nonbreaker),
        };
        let hint = self.current_goal();
        let parent = self.parent();
        self.emit(kind, range, None, hint, parent, TokenFlags::empty());
    }

    fn sequence(&mut self, grammar: &Grammar, range: Range<usize>) {
        let source = self.source;
        let text = &source[range.clone()];
        if self
            .stack
            .top_grouper()
            .is_some_and(|grouper| grouper.closer.is_closed_by(text))
        {
            self.close(range);
            return;
        }

        let classified = grammar.classify(text);
        let top = self.stack.top_grouper().map(|grouper| grouper.punctuator);
        let in_code = !matches!(top, Some(Punctuator::Comment | Punctuator::Quote));
        let opener = matches!(
            classified,
            Some(Punctuator::Comment | Punctuator::Quote | Punctuator::Span | Punctuator::Closure)
        );
        if in_code && !opener && !self.after_operand && self.open_pattern(grammar, range.clone()) {
            return;
        }
        let opens = match (top, classified) {
            (Some(Punctuator::Comment), _) => None,
            (Some(Punctuator::Quote), Some(Punctuator::Quote)) => {
                self.plain(range, None);
                return;
            }
            (Some(Punctuator::Quote), Some(Punctuator::Span)) => classified,
            (Some(Punctuator::Quote), _) => None,
            (
                _,
                Some(
                    punctuator @ (Punctuator::Comment
                    | Punctuator::Quote
                    | Punctuator::Span
                    | Punctuator::Closure),
                ),
            ) => Some(punctuator),
            _ => None,
        };
        match opens {
            Some(Punctuator::Closure) => self.open_closure(grammar, range),
            Some(punctuator) => self.open_delimited(grammar, punctuator, range),
            None => self.plain(range, classified),
        }
    }

    fn close(&mut self, range: Range<usize>) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        let grouper = self.stack.grouper(frame.grouper);
        let tag = match grouper.kind {
            ClosureKind::EmbeddableTag(tag) => Some(tag),
            _ => None,
        };
        // Closure closers report the enclosing goal, the others their own.
        let (punctuator, hint) = if grouper.punctuator == Punctuator::Closure {
            (Punctuator::Closer, self.current_goal())
        } else {
            (grouper.punctuator, Arc::clone(&grouper.goal))
        };
        let parent = self.parent();
        self.emit(
            TokenKind::Sequence,
            range,
            Some(punctuator),
            hint,
            parent,
            TokenFlags::empty(),
        );
        if let (Some(tag), Some(siblings)) = (tag, frame.siblings) {
            self.resolve_tag(tag, &siblings, frame.opener);
        }
    }

    fn open_delimited(&mut self, grammar: &Grammar, punctuator: Punctuator, range: Range<usize>) {
        let source = self.source;
        let text = &source[range.clone()];
        let Some(id) = self.stack.grouper_for(grammar, punctuator, text) else {
            self.plain(range, Some(punctuator));
            return;
        };
        let limit = self.limit();
        let grouper = self.stack.grouper(id);
        let hint = Arc::clone(&grouper.goal);
        let bound = grouper.bound.as_ref().map(|bound| {
            bound
                .find_at(&source[..limit], range.end)
                .map_or(limit, |hit| hit.start())
        });
        let closable = match &grouper.closer {
            Closer::Literal(closer) if punctuator != Punctuator::Span => self
                .scanner
                .find_sequence(&grouper.matcher, closer, bound.unwrap_or(limit))
                .is_some(),
            _ => true,
        };
        if !closable && bound.is_some() {
            self.plain(range, None);
            return;
        }
        let parent = self.parent();
        let opener = self.emit(
            TokenKind::Sequence,
            range,
            Some(punctuator),
            Arc::clone(&hint),
            parent,
            TokenFlags::empty(),
        );
        if closable {
            self.stack.push(id, opener);
        } else {
            self.fault_rest(hint, Some(opener));
        }
    }

    /// Open a regular-expression literal at `range` if the grammar has one
    /// with this opener and its closer is on the same line.
    fn open_pattern(&mut self, grammar: &Grammar, range: Range<usize>) -> bool {
        let source = self.source;
        let Some(pattern) = grammar.pattern() else {
            return false;
        };
        if *pattern.delimiter.opener != source[range.clone()] {
            return false;
        }
        let Some(index) = pattern
            .delimiter
            .closer
            .as_literal()
            .and_then(|closer| embed::find_pattern_end(source, range.end, self.limit(), closer))
        else {
            return false;
        };
        let Some(id) = self.stack.pattern_grouper(grammar) else {
            return false;
        };
        let hint = Arc::clone(grammar.quote_goal());
        let parent = self.parent();
        let opener = self.emit(
            TokenKind::Sequence,
            range.clone(),
            Some(Punctuator::Quote),
            hint,
            parent,
            TokenFlags::empty(),
        );
        self.stack.push(id, opener);
        self.directive = Some(Directive {
            offset: range.end,
            index,
            embedding: Embedding::Syntax(pattern.syntax.clone()),
            parent: opener,
        });
        true
    }

    fn open_closure(&mut self, grammar: &Grammar, range: Range<usize>) {
        let source = self.source;
        let text = &source[range.clone()];
        let Some(id) = self.stack.grouper_for(grammar, Punctuator::Closure, text) else {
            self.plain(range, Some(Punctuator::Closure));
            return;
        };
        let kind = self.stack.grouper(id).kind;
        let hint = self.current_goal();
        let parent = self.parent();
        let opener = self.emit(
            TokenKind::Sequence,
            range,
            Some(Punctuator::Opener),
            hint,
            parent,
            TokenFlags::empty(),
        );
        match kind {
            ClosureKind::EmbeddableFence(fence) => self.open_fence(fence, id, opener),
            ClosureKind::Plain | ClosureKind::EmbeddableTag(_) => self.stack.push(id, opener),
        }
    }

    /// Resolve a fence when it opens: the info string picks the grammar and
    /// the body runs up to the closing fence line.
    fn open_fence(&mut self, fence: FenceEmbedding, id: GrouperId, opener: TokenId) {
        let source = self.source;
        let start = self.scanner.cursor();
        let limit = self.limit();
        let (info_end, body_start) = embed::line_end(source, start, limit);
        let Some(embedding) = (fence.select)(&source[start..info_end]) else {
            self.stack.push(id, opener);
            return;
        };
        let closing = self
            .stack
            .grouper(id)
            .closer
            .as_literal()
            .and_then(|closer| embed::find_closing_fence(source, body_start, limit, closer));
        match closing {
            Some(index) => {
                self.stack.push(id, opener);
                self.directive = Some(Directive {
                    offset: body_start,
                    index,
                    embedding,
                    parent: opener,
                });
            }
            None => {
                let hint = self.current_goal();
                self.fault_rest(hint, Some(opener));
            }
        }
    }

    /// Resolve a start tag when its `>` is reached.
    fn resolve_tag(&mut self, tag: TagEmbedding, siblings: &[Sibling], opener: TokenId) {
        let source = self.source;
        let Some(head) = embed::read_tag(source, siblings) else {
            return;
        };
        if head.self_closing {
            return;
        }
        let Some(embedding) = (tag.select)(head.name, head.type_attribute) else {
            return;
        };
        let offset = self.scanner.cursor();
        match embed::find_end_tag(source, offset, self.limit(), head.name) {
            Some(index) => {
                self.directive = Some(Directive {
                    offset,
                    index,
                    embedding,
                    parent: opener,
                });
            }
            None => {
                let hint = self.current_goal();
                self.fault_rest(hint, Some(opener));
            }
        }
    }

    fn delegate(&mut self, directive: Directive) {
        let grammar = match &directive.embedding {
            Embedding::Syntax(syntax) => self.registry.get(syntax).cloned(),
            Embedding::Opaque => None,
        };
        let Some(grammar) = grammar else {
            if directive.index > directive.offset {
                let hint = self.current_goal();
                self.emit(
                    TokenKind::Text,
                    directive.offset..directive.index,
                    None,
                    hint,
                    Some(directive.parent),
                    TokenFlags::empty(),
                );
            }
            self.scanner.relocate(directive.index);
            return;
        };
        tracing::debug!(
            syntax = grammar.syntax(),
            offset = directive.offset,
            index = directive.index,
            "delegating embedded region"
        );
        let tokenizer = self.embedded(grammar, &directive);
        self.delegation = Some(Delegation {
            tokenizer: Box::new(tokenizer),
            resume: directive.index,
        });
    }

    /// Close every frame still open at the boundary.
    fn finish(&mut self) {
        let offset = self.scanner.cursor();
        while let Some(frame) = self.stack.pop() {
            let grouper = self.stack.grouper(frame.grouper);
            if grouper.closer == Closer::LineBreak {
                continue;
            }
            let hint = Arc::clone(&grouper.goal);
            tracing::debug!(goal = &*hint, offset, "unterminated construct");
            self.emit(
                TokenKind::Text,
                offset..offset,
                None,
                hint,
                Some(frame.opener),
                TokenFlags::FAULT,
            );
        }
        self.finished = true;
    }
}

impl<'src> Iterator for Tokenizer<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Token<'src>> {
        loop {
            if let Some(token) = self.queue.pop_front() {
                return Some(token);
            }
            if let Some(delegation) = &mut self.delegation {
                if let Some(token) = delegation.tokenizer.next() {
                    self.next_id = token.id.index() + 1;
                    self.previous = Some(token.id);
                    return Some(token);
                }
                let resume = delegation.resume;
                self.delegation = None;
                self.scanner.relocate(resume);
                continue;
            }
            if self.finished {
                return None;
            }
            match self.variant {
                Variant::Contextual => self.step(),
                Variant::Flat => self.step_flat(),
            }
        }
    }
}

impl FusedIterator for Tokenizer<'_> {}

#[cfg(test)]
mod tests;
