//! Raw tokens produced by the matcher.

use lexref_core::{Decoration, Enumerator, Span, UnitKind};
use serde::{Deserialize, Serialize};

/// Words and punctuation that join citation fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorKind {
    /// "and", "or", "und", "y"
    And,
    /// `,` between fragments
    Comma,
    /// "to", "bis", "a"
    Range,
    /// "of", "des", "del": the next fragment contains the previous ones
    Of,
    /// "thereof", "dessen", "su"
    Thereof,
    Respectively,
}

impl ConnectorKind {
    /// Connectors that bind a whole run to the previous citation.
    pub fn binds(self) -> bool {
        matches!(self, Self::Thereof | Self::Respectively)
    }
}

/// A keyword with its enumerator: "paragraph 2", "Article 5", "letra a)".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMatch {
    pub unit: UnitKind,
    pub enumerator: Enumerator,
    pub decoration: Decoration,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Unit(RawMatch),
    /// An enumerator without a keyword. `glued` is set when it follows the
    /// previous enumerator without space, as in `2(1)`.
    Bare {
        core: String,
        decoration: Decoration,
        span: Span,
        glued: bool,
    },
    Connector {
        kind: ConnectorKind,
        span: Span,
    },
    /// A cited act or treaty, already turned into a document reference.
    Document {
        document_ref: String,
        span: Span,
    },
}

impl Token {
    pub fn span(&self) -> Span {
        match self {
            Token::Unit(m) => m.span,
            Token::Bare { span, .. } | Token::Connector { span, .. } | Token::Document { span, .. } => {
                *span
            }
        }
    }

    pub fn connector(&self) -> Option<ConnectorKind> {
        match self {
            Token::Connector { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

/// Tokens of one contiguous citation phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub tokens: Vec<Token>,
    pub span: Span,
}

impl Run {
    /// "paragraph 2 thereof", "dessen Absatz 2"
    pub fn is_bound(&self) -> bool {
        self.tokens
            .iter()
            .any(|t| t.connector().is_some_and(ConnectorKind::binds))
    }
}
