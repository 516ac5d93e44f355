//! TypeScript: ECMAScript plus the type-level keywords.

use markup_grammar::{Grammar, GrammarBuilder, GrammarDefinition, GrammarError, GrammarRegistry};

pub const TYPESCRIPT: GrammarDefinition = GrammarDefinition {
    syntax: "typescript",
    requires: &["es"],
    build,
};

const KEYWORDS: &str = "
    abstract any as asserts bigint boolean declare enum implements infer interface
    is keyof module namespace never number object override private protected public
    readonly satisfies string symbol type unique unknown
";

fn build(registry: &GrammarRegistry) -> Result<Grammar, GrammarError> {
    let Some(es) = registry.get("es") else {
        return Err(GrammarError::MissingRequirement {
            syntax: "typescript".to_owned(),
            requires: "es".to_owned(),
        });
    };
    GrammarBuilder::extending(es, "typescript")
        .aliases(["ts", "tsx"])
        .keywords(KEYWORDS)
        .build()
}
