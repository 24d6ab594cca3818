use lexref_core::Span;
use lexref_grammar::GrammarError;
use thiserror::Error;

/// Construction-time failures. Nothing is scanned once one of these occurs.
#[derive(Debug, Error)]
pub enum ReflectError {
    #[error("unsupported language: {0:?}")]
    UnsupportedLanguage(String),

    #[error("unsupported output mode: {0:?} (expected markup or locators)")]
    UnsupportedMode(String),

    #[error("container {0:?} is not a citation")]
    InvalidContainer(String),

    #[error(transparent)]
    Grammar(#[from] GrammarError),
}

/// Per-citation failures. The span is left unlinked and processing goes on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("no earlier citation to resolve {text:?} against")]
    UnresolvedContext { text: String, span: Span },
}
