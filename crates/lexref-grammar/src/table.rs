//! Compiled grammar tables.

use std::collections::HashMap;
use std::sync::LazyLock;

use lexref_core::{ActKind, EnumeratorKind};
use regex::Regex;
use tracing::debug;

use crate::error::GrammarError;
use crate::language::Language;
use crate::spec::{GrammarSpec, PatternRule};
use crate::token::ConnectorKind;

/// A keyword and the rules that use it, in table order.
#[derive(Debug, Clone)]
pub(crate) struct Keyword {
    pub text: String,
    pub rules: Vec<usize>,
}

#[derive(Debug, Clone)]
pub(crate) struct Connector {
    pub text: String,
    pub kind: ConnectorKind,
    pub leading: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct DocumentPattern {
    pub act: ActKind,
    pub regex: Regex,
}

/// A validated grammar with its lookup tables. Immutable once compiled and
/// safe to share between threads.
#[derive(Debug, Clone)]
pub struct GrammarTable {
    language: Language,
    pub(crate) rules: Vec<PatternRule>,
    /// Longest first, so that "Articles" is tried before "Article".
    pub(crate) keywords: Vec<Keyword>,
    pub(crate) connectors: Vec<Connector>,
    pub(crate) ordinals: Vec<(String, u32)>,
    pub(crate) documents: Vec<DocumentPattern>,
    pub(crate) treaties: Vec<(String, String)>,
    /// Every word a citation can start with.
    pub(crate) starts: Regex,
    comma_joins_chain: bool,
    pub(crate) closing_brackets: bool,
}

static EN: LazyLock<GrammarTable> = LazyLock::new(|| compile_builtin(Language::En));
static DE: LazyLock<GrammarTable> = LazyLock::new(|| compile_builtin(Language::De));
static ES: LazyLock<GrammarTable> = LazyLock::new(|| compile_builtin(Language::Es));

fn compile_builtin(language: Language) -> GrammarTable {
    GrammarTable::compile(GrammarSpec::builtin(language))
        .expect("built-in grammar tables compile")
}

fn longest_first<T>(items: &mut [T], text: impl Fn(&T) -> &str) {
    items.sort_by(|a, b| {
        let (a, b) = (text(a), text(b));
        b.chars().count().cmp(&a.chars().count()).then_with(|| a.cmp(b))
    });
}

/// Group keywords with the rules that read them, rejecting empty keywords,
/// ordinal rules without ordinals and keywords read the same way twice.
fn index_keywords(spec: &GrammarSpec) -> Result<Vec<Keyword>, GrammarError> {
    let mut claimed: HashMap<(&str, EnumeratorKind), usize> = HashMap::new();
    let mut by_keyword: HashMap<&str, Vec<usize>> = HashMap::new();
    for (index, rule) in spec.rules.iter().enumerate() {
        if rule.enumerator == EnumeratorKind::Ordinal && spec.ordinals.is_empty() {
            return Err(GrammarError::MissingOrdinals(rule.unit));
        }
        for keyword in &rule.keywords {
            if keyword.trim().is_empty() {
                return Err(GrammarError::EmptyKeyword(rule.unit));
            }
            if claimed.insert((keyword.as_str(), rule.enumerator), index).is_some() {
                return Err(GrammarError::AmbiguousRule {
                    keyword: keyword.clone(),
                    kind: rule.enumerator,
                });
            }
            by_keyword.entry(keyword.as_str()).or_default().push(index);
        }
    }
    Ok(by_keyword
        .into_iter()
        .map(|(text, rules)| Keyword {
            text: text.to_string(),
            rules,
        })
        .collect())
}

impl GrammarTable {
    /// The shipped table for `language`, compiled on first use.
    pub fn builtin(language: Language) -> &'static GrammarTable {
        match language {
            Language::En => &EN,
            Language::De => &DE,
            Language::Es => &ES,
        }
    }

    /// Validate `spec` and build its lookup tables.
    pub fn compile(spec: GrammarSpec) -> Result<Self, GrammarError> {
        let mut keywords = index_keywords(&spec)?;
        longest_first(&mut keywords, |k| k.text.as_str());

        let mut connectors: Vec<Connector> = spec
            .connectors
            .iter()
            .flat_map(|c| {
                c.words.iter().filter(|w| !w.is_empty()).map(|w| Connector {
                    text: w.clone(),
                    kind: c.kind,
                    leading: c.leading,
                })
            })
            .collect();
        longest_first(&mut connectors, |c| c.text.as_str());

        let mut ordinals: Vec<(String, u32)> = spec
            .ordinals
            .iter()
            .flat_map(|o| o.words.iter().filter(|w| !w.is_empty()).map(|w| (w.clone(), o.value)))
            .collect();
        longest_first(&mut ordinals, |(w, _)| w.as_str());

        let mut treaties: Vec<(String, String)> = spec
            .treaties
            .iter()
            .flat_map(|t| {
                t.names
                    .iter()
                    .filter(|n| !n.is_empty())
                    .map(|n| (n.clone(), t.key.clone()))
            })
            .collect();
        longest_first(&mut treaties, |(n, _)| n.as_str());

        let documents = spec
            .documents
            .iter()
            .map(|rule| {
                let regex = Regex::new(&format!("^(?:{})", rule.pattern))
                    .map_err(|source| GrammarError::InvalidPattern { act: rule.act, source })?;
                if !regex.capture_names().any(|name| name == Some("num")) {
                    return Err(GrammarError::MissingNumberGroup { act: rule.act });
                }
                Ok(DocumentPattern { act: rule.act, regex })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let starts = {
            let mut heads: Vec<&str> = keywords.iter().map(|k| k.text.as_str()).collect();
            heads.extend(ordinals.iter().map(|(w, _)| w.as_str()));
            heads.extend(connectors.iter().filter(|c| c.leading).map(|c| c.text.as_str()));
            heads.extend(spec.documents.iter().map(|d| d.head.as_str()).filter(|h| !h.is_empty()));
            heads.extend(treaties.iter().map(|(n, _)| n.as_str()));
            longest_first(&mut heads, |h| *h);
            heads.dedup();
            let alternation = heads.iter().map(|h| regex::escape(h)).collect::<Vec<_>>().join("|");
            Regex::new(&format!(r"\b(?:{alternation})")).map_err(GrammarError::KeywordIndex)?
        };

        debug!(
            language = %spec.language,
            rules = spec.rules.len(),
            keywords = keywords.len(),
            documents = documents.len(),
            "compiled grammar table"
        );

        Ok(Self {
            language: spec.language,
            rules: spec.rules,
            keywords,
            connectors,
            ordinals,
            documents,
            treaties,
            starts,
            comma_joins_chain: spec.comma_joins_chain,
            closing_brackets: spec.closing_brackets,
        })
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    /// The connector `word` spells, if any: `connector_kind("of")` is `Of`.
    pub fn connector_kind(&self, word: &str) -> Option<ConnectorKind> {
        self.connectors.iter().find(|c| c.text == word).map(|c| c.kind)
    }

    pub fn comma_joins_chain(&self) -> bool {
        self.comma_joins_chain
    }
}

#[cfg(test)]
mod tests {
    use lexref_core::UnitKind;

    use super::*;

    #[test]
    fn builtin_tables_compile() {
        for lang in Language::ALL {
            let table = GrammarTable::builtin(lang);
            assert_eq!(table.language(), lang);
            assert!(!table.rules().is_empty());
        }
    }

    /// No keyword may be read with the same enumerator format by two rules:
    /// the first rule would always shadow the second.
    #[test]
    fn builtin_tables_have_no_ambiguous_rules() {
        for lang in Language::ALL {
            let spec = GrammarSpec::builtin(lang);
            let mut seen = HashMap::new();
            for (i, rule) in spec.rules.iter().enumerate() {
                for keyword in &rule.keywords {
                    if let Some(j) = seen.insert((keyword.clone(), rule.enumerator), i) {
                        panic!("{lang}: {keyword:?} in rules {j} and {i}");
                    }
                }
            }
        }
    }

    #[test]
    fn duplicate_rule_is_rejected() {
        let mut spec = GrammarSpec::builtin(Language::En);
        spec.rules.push(PatternRule::new(
            UnitKind::Paragraph,
            &["Article"],
            EnumeratorKind::Numeric,
        ));
        let err = GrammarTable::compile(spec).unwrap_err();
        assert!(matches!(err, GrammarError::AmbiguousRule { keyword, .. } if keyword == "Article"));
    }

    #[test]
    fn same_keyword_with_other_format_is_allowed() {
        let table = GrammarTable::builtin(Language::En);
        let point = table.keywords.iter().find(|k| k.text == "point").unwrap();
        assert_eq!(point.rules.len(), 2);
        assert_eq!(table.rules()[point.rules[0]].enumerator, EnumeratorKind::Alpha);
    }

    #[test]
    fn ordinal_rules_need_ordinals() {
        let mut spec = GrammarSpec::builtin(Language::En);
        spec.ordinals.clear();
        assert!(matches!(
            GrammarTable::compile(spec),
            Err(GrammarError::MissingOrdinals(UnitKind::Indent))
        ));
    }

    #[test]
    fn invalid_document_pattern() {
        let mut spec = GrammarSpec::builtin(Language::En);
        spec.documents[0].pattern = "Regulation (".into();
        assert!(matches!(
            GrammarTable::compile(spec),
            Err(GrammarError::InvalidPattern { act: ActKind::Regulation, .. })
        ));

        let mut spec = GrammarSpec::builtin(Language::En);
        spec.documents[0].pattern = r"Regulation \d+".into();
        assert!(matches!(
            GrammarTable::compile(spec),
            Err(GrammarError::MissingNumberGroup { .. })
        ));
    }

    #[test]
    fn keywords_are_tried_longest_first() {
        let table = GrammarTable::builtin(Language::En);
        let pos = |text: &str| table.keywords.iter().position(|k| k.text == text).unwrap();
        assert!(pos("Articles") < pos("Article"));
        assert!(pos("paragraphs") < pos("paragraph"));
        let of = table.connectors.iter().position(|c| c.text == "of").unwrap();
        let of_the = table.connectors.iter().position(|c| c.text == "of the").unwrap();
        assert!(of_the < of);
    }

    #[test]
    fn connector_words_are_looked_up() {
        let de = GrammarTable::builtin(Language::De);
        assert_eq!(de.connector_kind("des"), Some(ConnectorKind::Of));
        assert_eq!(de.connector_kind("bis"), Some(ConnectorKind::Range));
        assert_eq!(de.connector_kind("Absatz"), None);
    }
}
