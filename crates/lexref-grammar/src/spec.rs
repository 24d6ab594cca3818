//! Declarative grammar descriptions.
//!
//! The built-in tables are written as [`GrammarSpec`] values; a caller can
//! supply its own as JSON and compile it with the same validation.

use lexref_core::{ActKind, EnumeratorKind, UnitKind};
use serde::{Deserialize, Serialize};

use crate::error::GrammarError;
use crate::language::Language;
use crate::token::ConnectorKind;

/// One unit keyword family and the enumerator format that follows it.
///
/// Rules are tried in table order when several share a keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRule {
    pub unit: UnitKind,
    pub keywords: Vec<String>,
    pub enumerator: EnumeratorKind,
}

impl PatternRule {
    pub fn new(unit: UnitKind, keywords: &[&str], enumerator: EnumeratorKind) -> Self {
        Self {
            unit,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            enumerator,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorSpec {
    pub kind: ConnectorKind,
    pub words: Vec<String>,
    /// Written before the unit it refers to ("dessen Absatz 2", "su apartado 2").
    #[serde(default)]
    pub leading: bool,
}

impl ConnectorSpec {
    pub fn new(kind: ConnectorKind, words: &[&str]) -> Self {
        Self {
            kind,
            words: words.iter().map(|w| w.to_string()).collect(),
            leading: false,
        }
    }

    pub fn leading(mut self) -> Self {
        self.leading = true;
        self
    }
}

/// Spoken forms of one ordinal number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrdinalSpec {
    pub value: u32,
    pub words: Vec<String>,
}

/// A citation form for one kind of act. `pattern` starts with `head` and
/// captures the ordinate in `num` and, optionally, the issuing domain in
/// `dom` (`EU`/`UE` switch regulations to year-first numbering).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRule {
    pub act: ActKind,
    pub head: String,
    pub pattern: String,
}

/// A treaty cited by name, with the document reference it stands for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatySpec {
    pub key: String,
    pub names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarSpec {
    pub language: Language,
    pub rules: Vec<PatternRule>,
    #[serde(default)]
    pub connectors: Vec<ConnectorSpec>,
    #[serde(default)]
    pub ordinals: Vec<OrdinalSpec>,
    #[serde(default)]
    pub documents: Vec<DocumentRule>,
    #[serde(default)]
    pub treaties: Vec<TreatySpec>,
    /// A comma followed by a deeper unit continues the same citation
    /// ("artículo 2, apartado 1").
    #[serde(default)]
    pub comma_joins_chain: bool,
    /// Letters may be written with a closing bracket only ("letra a)").
    #[serde(default)]
    pub closing_brackets: bool,
}

impl GrammarSpec {
    pub fn from_json(json: &str) -> Result<Self, GrammarError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The grammar shipped for `language`.
    pub fn builtin(language: Language) -> Self {
        crate::tables::spec(language)
    }
}
