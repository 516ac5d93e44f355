//! Markdown, with fenced code blocks delegated by info string.

use markup_grammar::{
    Closure, ClosureKind, Delimiter, Embedding, FenceEmbedding, Grammar, GrammarBuilder,
    GrammarDefinition, GrammarError, GrammarRegistry,
};

pub const MARKDOWN: GrammarDefinition = GrammarDefinition {
    syntax: "md",
    requires: &[],
    build,
};

const MATCHER: &str = concat!(
    r"(?P<whitespace>\s+)",
    r"|(?P<sequence>",
    r"(?m:^)(?:```|~~~)",
    r"|(?m:^)#{1,6}",
    r"|(?m:^)>",
    r"|\*\*|__|~~",
    r"|\\[\s\S]",
    r"|[*_`\[\]()!]",
    r")",
);

const INLINE_CODE: &str = r"(?P<whitespace>\s+)|(?P<sequence>`)";
/// Inline code never spans a blank line or a fence line.
const INLINE_CODE_BOUND: &str = r"\r?\n[ \t]*(?:\r?\n|\z)|\n(?:```|~~~)";

/// Map a fence info string to the grammar of the fenced block.
///
/// The first word names the syntax (`js`, `{.css}` and `css title="x"` all
/// work); an empty info string leaves the block opaque.
pub fn select_fence(info: &str) -> Option<Embedding> {
    let word = info
        .split_whitespace()
        .next()
        .map(|word| word.trim_matches(|c| matches!(c, '{' | '}' | '.')))
        .unwrap_or_default();
    if word.is_empty() {
        Some(Embedding::Opaque)
    } else {
        Some(Embedding::Syntax(word.to_ascii_lowercase().into()))
    }
}

fn build(_: &GrammarRegistry) -> Result<Grammar, GrammarError> {
    let builder = GrammarBuilder::new("md");
    let matcher = builder.compile("matcher", MATCHER)?;
    let inline_code = builder.compile("quote `", INLINE_CODE)?;
    let inline_code_bound = builder.compile_bound("quote ` bound", INLINE_CODE_BOUND)?;
    let fence = ClosureKind::EmbeddableFence(FenceEmbedding {
        select: select_fence,
    });

    builder
        .aliases(["markdown"])
        .prose(true)
        .nonbreakers("!")
        .operators("* ** _ __ ~~")
        .breakers("# ## ### #### ##### ###### >")
        .aggregators("( )")
        .quote(
            Delimiter::new("`", "`")
                .with_matcher(inline_code)
                .with_bound(inline_code_bound),
        )
        .closure(Closure::new("```", "```").with_kind(fence))
        .closure(Closure::new("~~~", "~~~").with_kind(fence))
        .closure(Closure::new("[", "]"))
        .matcher(matcher)
        .build()
}
