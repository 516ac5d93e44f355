//! Built-in grammar tables.
//!
//! Each module defines one [`GrammarDefinition`]. [`BUILTINS`] lists them in
//! dependency order, so registering them front to back always satisfies
//! every `requires` entry.
//!
//! | Syntax | Aliases | Requires |
//! |--------|---------|----------|
//! | `es` | `javascript`, `js`, `ecmascript`, `mjs`, `cjs` | |
//! | `typescript` | `ts`, `tsx` | `es` |
//! | `css` | | |
//! | `html` | `markup`, `htm`, `xhtml` | |
//! | `md` | `markdown` | |
//! | `regexp` | `regex` | |

use markup_grammar::{GrammarDefinition, GrammarError, GrammarRegistry};

mod css;
mod es;
mod html;
mod markdown;
mod regexp;
mod typescript;

pub use css::CSS;
pub use es::ES;
pub use html::{select_embedding as html_embedding, HTML};
pub use markdown::{select_fence as markdown_fence, MARKDOWN};
pub use regexp::REGEXP;
pub use typescript::TYPESCRIPT;

/// All built-in grammars, requirements first.
pub const BUILTINS: [GrammarDefinition; 6] = [ES, TYPESCRIPT, CSS, HTML, MARKDOWN, REGEXP];

/// A registry holding every built-in grammar.
pub fn builtin_registry() -> Result<GrammarRegistry, GrammarError> {
    let mut registry = GrammarRegistry::new();
    for definition in BUILTINS {
        registry.register(definition)?;
    }
    Ok(registry)
}
