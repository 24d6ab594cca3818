use lexref_core::{ActKind, EnumeratorKind, UnitKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GrammarError {
    #[error("unsupported language: {0:?}")]
    UnsupportedLanguage(String),

    #[error("empty keyword in {0} rule")]
    EmptyKeyword(UnitKind),

    #[error("keyword {keyword:?} is claimed by two rules with {kind:?} enumerators")]
    AmbiguousRule {
        keyword: String,
        kind: EnumeratorKind,
    },

    #[error("ordinal rule for {0} has no ordinal words in the grammar")]
    MissingOrdinals(UnitKind),

    #[error("invalid {act:?} pattern: {source}")]
    InvalidPattern {
        act: ActKind,
        #[source]
        source: regex::Error,
    },

    #[error("{act:?} pattern has no `num` group")]
    MissingNumberGroup { act: ActKind },

    #[error("could not build keyword index: {0}")]
    KeywordIndex(#[source] regex::Error),

    #[error("grammar JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
