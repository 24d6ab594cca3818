use lexref_core::{ActKind, EnumeratorKind::*, UnitKind::*};

use crate::language::Language;
use crate::spec::{ConnectorSpec, DocumentRule, GrammarSpec, OrdinalSpec, PatternRule, TreatySpec};
use crate::token::ConnectorKind;

const ORDINALS: [&str; 10] = [
    "first", "second", "third", "fourth", "fifth", "sixth", "seventh", "eighth", "ninth", "tenth",
];

pub(super) fn spec() -> GrammarSpec {
    GrammarSpec {
        language: Language::En,
        rules: vec![
            PatternRule::new(Article, &["Article", "Articles", "Art."], Numeric),
            PatternRule::new(Paragraph, &["paragraph", "paragraphs", "Paragraph", "Paragraphs"], Numeric),
            PatternRule::new(Point, &["point", "points", "Point", "Points"], Alpha),
            PatternRule::new(Point, &["point", "points", "Point", "Points"], Numeric),
            PatternRule::new(Subpoint, &["subpoint", "subpoints", "Subpoint", "Subpoints"], Roman),
            PatternRule::new(Indent, &["indent", "indents", "Indent", "Indents"], Ordinal),
            PatternRule::new(Indent, &["indent", "indents", "Indent", "Indents"], Numeric),
            PatternRule::new(Chapter, &["Chapter", "Chapters"], Roman),
            PatternRule::new(Chapter, &["Chapter", "Chapters"], Numeric),
            PatternRule::new(Annex, &["Annex", "Annexes"], Roman),
        ],
        connectors: vec![
            ConnectorSpec::new(ConnectorKind::And, &["and/or", "and", "or"]),
            ConnectorSpec::new(ConnectorKind::Range, &["to", "through"]),
            ConnectorSpec::new(ConnectorKind::Of, &["of the", "of"]),
            ConnectorSpec::new(ConnectorKind::Thereof, &["thereof"]),
            ConnectorSpec::new(ConnectorKind::Respectively, &["respectively"]),
        ],
        ordinals: ORDINALS
            .iter()
            .zip(1..)
            .map(|(word, value)| OrdinalSpec {
                value,
                words: vec![word.to_string()],
            })
            .collect(),
        documents: vec![
            DocumentRule {
                act: ActKind::Regulation,
                head: "Regulation".into(),
                pattern: r"Regulation\s+(?:\((?P<dom>EU|EC|EEC|Euratom)\)\s+)?(?:No\.?\s+)?(?P<num>\d{1,4}/\d{1,4})(?:/(?:EU|EC|EEC|Euratom))?\b".into(),
            },
            DocumentRule {
                act: ActKind::Directive,
                head: "Directive".into(),
                pattern: r"Directive\s+(?:\((?P<dom>EU|EC|EEC|Euratom)\)\s+)?(?:No\.?\s+)?(?P<num>\d{1,4}/\d{1,4})(?:/(?:EU|EC|EEC|Euratom|JHA))?\b".into(),
            },
            DocumentRule {
                act: ActKind::FrameworkDecision,
                head: "Framework".into(),
                pattern: r"Framework\s+Decision\s+(?P<num>\d{1,4}/\d{1,4})(?:/JHA)?\b".into(),
            },
            DocumentRule {
                act: ActKind::Decision,
                head: "Decision".into(),
                pattern: r"Decision\s+(?:\((?P<dom>EU|EC|EEC|Euratom|CFSP)\)\s+)?(?:No\.?\s+)?(?P<num>\d{1,4}/\d{1,4})(?:/(?:EU|EC|EEC|Euratom|CFSP|JHA))?\b".into(),
            },
        ],
        treaties: vec![
            TreatySpec {
                key: "TFEU".into(),
                names: vec!["TFEU".into(), "Treaty on the Functioning of the European Union".into()],
            },
            TreatySpec {
                key: "TEU".into(),
                names: vec!["TEU".into(), "Treaty on European Union".into()],
            },
        ],
        comma_joins_chain: false,
        closing_brackets: false,
    }
}
