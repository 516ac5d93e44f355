//! HTML markup, with `<script>` and `<style>` bodies delegated.

use markup_grammar::{
    Closure, ClosureKind, Delimiter, Embedding, Grammar, GrammarBuilder, GrammarDefinition,
    GrammarError, GrammarRegistry, TagEmbedding,
};

pub const HTML: GrammarDefinition = GrammarDefinition {
    syntax: "html",
    requires: &[],
    build,
};

const ENTITY: &str = r"&(?:#[0-9]+|#[xX][0-9A-Fa-f]+|[A-Za-z][A-Za-z0-9]*);";

/// Text content: only tag openers and entities are sequences.
const CONTENT: &str = concat!(
    r"(?P<whitespace>\s+)",
    r"|(?P<sequence><!--|<!|<\?|</|<",
    r"|&(?:#[0-9]+|#[xX][0-9A-Fa-f]+|[A-Za-z][A-Za-z0-9]*);)",
);

/// Inside a tag.
const TAG: &str = r#"(?P<whitespace>\s+)|(?P<sequence>\?>|[>=/"'])"#;

const COMMENT: &str = r"(?P<whitespace>\s+)|(?P<sequence>-->)";

const JAVASCRIPT_TYPES: &[&str] = &[
    "module",
    "text/javascript",
    "application/javascript",
    "text/ecmascript",
    "application/ecmascript",
    "text/jscript",
    "text/livescript",
];

/// Map a tag and its `type` attribute to the grammar its body belongs to.
///
/// `<script>` defaults to ECMAScript; any type other than a JavaScript MIME
/// type or `module` keeps the body opaque (JSON blobs, templates). `<style>`
/// is always CSS. Other tags are ordinary markup.
pub fn select_embedding(tag: &str, type_attribute: Option<&str>) -> Option<Embedding> {
    if tag.eq_ignore_ascii_case("style") {
        return Some(Embedding::Syntax("css".into()));
    }
    if !tag.eq_ignore_ascii_case("script") {
        return None;
    }
    let kind = type_attribute.map(str::trim).unwrap_or_default();
    if kind.is_empty() || JAVASCRIPT_TYPES.iter().any(|t| t.eq_ignore_ascii_case(kind)) {
        Some(Embedding::Syntax("es".into()))
    } else {
        Some(Embedding::Opaque)
    }
}

fn build(_: &GrammarRegistry) -> Result<Grammar, GrammarError> {
    let builder = GrammarBuilder::new("html");
    let content = builder.compile("matcher", CONTENT)?;
    let tag = builder.compile("tag", TAG)?;
    let comment = builder.compile("comment", COMMENT)?;
    let double = builder.compile(
        "quote \"",
        &format!(r#"(?P<whitespace>\s+)|(?P<sequence>"|{ENTITY})"#),
    )?;
    let single = builder.compile(
        "quote '",
        &format!(r"(?P<whitespace>\s+)|(?P<sequence>'|{ENTITY})"),
    )?;
    let element = ClosureKind::EmbeddableTag(TagEmbedding {
        select: select_embedding,
    });

    builder
        .aliases(["markup", "htm", "xhtml"])
        .prose(true)
        .operators("= /")
        .comment(Delimiter::new("<!--", "-->").with_matcher(comment))
        .quote(Delimiter::new("\"", "\"").with_matcher(double))
        .quote(Delimiter::new("'", "'").with_matcher(single))
        .closure(Closure::new("<", ">").with_matcher(tag.clone()).with_kind(element))
        .closure(Closure::new("</", ">").with_matcher(tag.clone()))
        .closure(Closure::new("<!", ">").with_matcher(tag.clone()))
        .closure(Closure::new("<?", "?>").with_matcher(tag))
        .matcher(content)
        .maybe_identifier(r"^[A-Za-z_:][-A-Za-z0-9_:.]*$")
        .build()
}
