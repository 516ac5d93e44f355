//! ECMAScript.

use markup_grammar::{
    Closure, Delimiter, Grammar, GrammarBuilder, GrammarDefinition, GrammarError, GrammarRegistry,
    PatternLiteral,
};

pub const ES: GrammarDefinition = GrammarDefinition {
    syntax: "es",
    requires: &[],
    build,
};

const KEYWORDS: &str = "
    async await break case catch class const continue debugger default delete do
    else export extends false finally for from function get if import in instanceof
    let new null of return set static super switch this throw true try typeof
    undefined var void while with yield
";

/// Longest alternatives first: the regex takes the leftmost alternative
/// that matches, not the longest.
const MATCHER: &str = concat!(
    r"(?P<whitespace>\s+)",
    r"|(?P<sequence>",
    r"//|/\*|\*/|\$\{",
    r"|>>>=|\.\.\.|===|!==|\*\*=|<<=|>>=|>>>|\?\?=|&&=|\|\|=",
    r"|=>|==|!=|<=|>=|&&|\|\||\?\?|\?\.|\+\+|--|\+=|-=|\*=|/=|%=|&=|\|=|\^=|<<|>>|\*\*",
    r"|[{}()\[\];,.<>+\-*/%&|^!~?:=@#'\x22`\\]",
    r")",
);

const SINGLE_QUOTE: &str = r"(?P<whitespace>\s+)|(?P<sequence>\\[\s\S]|')";
const DOUBLE_QUOTE: &str = r#"(?P<whitespace>\s+)|(?P<sequence>\\[\s\S]|")"#;
const TEMPLATE: &str = r"(?P<whitespace>\s+)|(?P<sequence>\\[\s\S]|\$\{|`)";
/// Regular-expression literals only scan for their closing slash: the body
/// goes to the `regexp` grammar.
const PATTERN: &str = r"(?P<whitespace>\s+)|(?P<sequence>/)";
/// Where `/` divides instead of opening a regular expression.
const OPERAND_ENDS: &str = "this super true false null undefined ) ] }";
/// Shared by both comment forms; inside a line comment `*/` is inert.
const COMMENT: &str = r"(?P<whitespace>\s+)|(?P<sequence>\*/)";

fn build(_: &GrammarRegistry) -> Result<Grammar, GrammarError> {
    let builder = GrammarBuilder::new("es");
    let matcher = builder.compile("matcher", MATCHER)?;
    let single = builder.compile("quote '", SINGLE_QUOTE)?;
    let double = builder.compile("quote \"", DOUBLE_QUOTE)?;
    let template = builder.compile("quote `", TEMPLATE)?;
    let comment = builder.compile("comment", COMMENT)?;
    let pattern = builder.compile("pattern", PATTERN)?;

    builder
        .aliases(["javascript", "js", "ecmascript", "mjs", "cjs"])
        .keywords(KEYWORDS)
        .nonbreakers(". ?. #")
        .operators(
            "= == === != !== + - * / % ** ++ -- < > <= >= << >> >>> & | ^ ! ~ && || ?? ? : \
             += -= *= /= %= **= <<= >>= >>>= &= |= ^= &&= ||= ??= => ... @",
        )
        .breakers("; ) ] }")
        .aggregators(",")
        .comment(Delimiter::line("//").with_matcher(comment.clone()))
        .comment(Delimiter::new("/*", "*/").with_matcher(comment))
        .quote(Delimiter::new("'", "'").with_matcher(single))
        .quote(Delimiter::new("\"", "\"").with_matcher(double))
        .quote(Delimiter::new("`", "`").with_matcher(template))
        .span(Delimiter::new("${", "}"))
        .pattern(
            PatternLiteral::new(Delimiter::new("/", "/").with_matcher(pattern), "regexp")
                .operand_ends(OPERAND_ENDS),
        )
        .closure(Closure::new("{", "}"))
        .closure(Closure::new("(", ")"))
        .closure(Closure::new("[", "]"))
        .matcher(matcher)
        .maybe_identifier(r"^[\p{XID_Start}$_][\p{XID_Continue}$\x{200C}\x{200D}]*$")
        .maybe_keyword(r"^[a-z]+$")
        .build()
}
