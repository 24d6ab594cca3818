//! Built-in grammar tables.

mod de;
mod en;
mod es;

use crate::language::Language;
use crate::spec::GrammarSpec;

pub(crate) fn spec(language: Language) -> GrammarSpec {
    match language {
        Language::En => en::spec(),
        Language::De => de::spec(),
        Language::Es => es::spec(),
    }
}
