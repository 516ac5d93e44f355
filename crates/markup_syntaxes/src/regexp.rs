//! ECMAScript regular expression literals.

use markup_grammar::{
    Closure, Grammar, GrammarBuilder, GrammarDefinition, GrammarError, GrammarRegistry,
};

pub const REGEXP: GrammarDefinition = GrammarDefinition {
    syntax: "regexp",
    requires: &[],
    build,
};

/// Escapes are single sequences so an escaped `(` never opens a group.
const ESCAPE: &str = r"\\(?:[0-9]+|c[A-Za-z]|x[0-9A-Fa-f]{2}|u\{[0-9A-Fa-f]+\}|u[0-9A-Fa-f]{4}|[pPk]\{[^}]*\}|[\s\S])";

const GROUPS: &str = r"\(\?<=|\(\?<!|\(\?<|\(\?:|\(\?=|\(\?!";
const QUANTIFIERS: &str = r"[*+?]\?|\{[0-9]+(?:,[0-9]*)?\}\??";

fn build(_: &GrammarRegistry) -> Result<Grammar, GrammarError> {
    let builder = GrammarBuilder::new("regexp");
    let matcher = builder.compile(
        "matcher",
        &format!(
            r"(?P<whitespace>\s+)|(?P<sequence>{ESCAPE}|{GROUPS}|{QUANTIFIERS}|[()\[\]|^$.*+?/>])"
        ),
    )?;
    let class = builder.compile(
        "class",
        &format!(r"(?P<whitespace>\s+)|(?P<sequence>{ESCAPE}|\]|-)"),
    )?;

    let mut builder = builder
        .aliases(["regex"])
        .nonbreakers("^ $")
        .operators("| * + ? *? +? ?? . - >")
        .breakers("/")
        .closure(Closure::new("[", "]").with_matcher(class));
    for group in ["(", "(?:", "(?=", "(?!", "(?<=", "(?<!", "(?<"] {
        builder = builder.closure(Closure::new(group, ")"));
    }
    builder
        .matcher(matcher)
        .maybe_keyword(r"^[dgimsuvy]+$")
        .build()
}
