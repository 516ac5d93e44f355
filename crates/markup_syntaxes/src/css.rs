//! Cascading style sheets.

use markup_grammar::{
    Closure, Delimiter, Grammar, GrammarBuilder, GrammarDefinition, GrammarError, GrammarRegistry,
};

pub const CSS: GrammarDefinition = GrammarDefinition {
    syntax: "css",
    requires: &[],
    build,
};

const KEYWORDS: &str = "
    auto inherit initial unset revert none important
    media import supports keyframes font-face page charset namespace layer container
    and not only or from to
";

const MATCHER: &str = concat!(
    r"(?P<whitespace>\s+)",
    r"|(?P<sequence>",
    r"/\*|\*/|::|~=|\|=|\^=|\$=|\*=",
    r"|[{}()\[\];:,.>+~*=!@#%/'\x22\\]",
    r")",
);

const SINGLE_QUOTE: &str = r"(?P<whitespace>\s+)|(?P<sequence>\\[\s\S]|')";
const DOUBLE_QUOTE: &str = r#"(?P<whitespace>\s+)|(?P<sequence>\\[\s\S]|")"#;
const COMMENT: &str = r"(?P<whitespace>\s+)|(?P<sequence>\*/)";

fn build(_: &GrammarRegistry) -> Result<Grammar, GrammarError> {
    let builder = GrammarBuilder::new("css");
    let matcher = builder.compile("matcher", MATCHER)?;
    let single = builder.compile("quote '", SINGLE_QUOTE)?;
    let double = builder.compile("quote \"", DOUBLE_QUOTE)?;
    let comment = builder.compile("comment", COMMENT)?;

    builder
        .keywords(KEYWORDS)
        .nonbreakers(". #")
        .operators(": :: > + ~ * = ~= |= ^= $= *= ! % / @")
        .breakers("; } ) ]")
        .aggregators(",")
        .comment(Delimiter::new("/*", "*/").with_matcher(comment))
        .quote(Delimiter::new("'", "'").with_matcher(single))
        .quote(Delimiter::new("\"", "\"").with_matcher(double))
        .closure(Closure::new("{", "}"))
        .closure(Closure::new("(", ")"))
        .closure(Closure::new("[", "]"))
        .matcher(matcher)
        .maybe_identifier(r"^-{0,2}[A-Za-z_][-A-Za-z0-9_]*$")
        .build()
}
