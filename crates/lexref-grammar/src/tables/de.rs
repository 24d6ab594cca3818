use lexref_core::{ActKind, EnumeratorKind::*, UnitKind::*};

use crate::language::Language;
use crate::spec::{ConnectorSpec, DocumentRule, GrammarSpec, OrdinalSpec, PatternRule, TreatySpec};
use crate::token::ConnectorKind;

/// Ordinal stems, declined with the adjective endings below
/// ("erster", "zweiten", "dritte").
const ORDINAL_STEMS: [&str; 10] = [
    "erst", "zweit", "dritt", "viert", "fünft", "sechst", "siebt", "acht", "neunt", "zehnt",
];
const ORDINAL_ENDINGS: [&str; 5] = ["e", "er", "en", "es", "em"];

pub(super) fn spec() -> GrammarSpec {
    GrammarSpec {
        language: Language::De,
        rules: vec![
            PatternRule::new(Article, &["Artikel", "Artikels", "Artikeln", "Art."], Numeric),
            PatternRule::new(Paragraph, &["Absatz", "Absatzes", "Absätze", "Absätzen", "Abs."], Numeric),
            PatternRule::new(Point, &["Buchstabe", "Buchstaben", "Buchst."], Alpha),
            PatternRule::new(Point, &["Nummer", "Nummern", "Nr."], Numeric),
            PatternRule::new(Subpoint, &["Ziffer", "Ziffern"], Roman),
            PatternRule::new(Indent, &["Gedankenstrich", "Gedankenstrichs", "Gedankenstriche"], Ordinal),
            PatternRule::new(Indent, &["Gedankenstrich", "Gedankenstrichs", "Gedankenstriche"], Numeric),
            PatternRule::new(Chapter, &["Kapitel", "Kapitels"], Roman),
            PatternRule::new(Chapter, &["Kapitel", "Kapitels"], Numeric),
            PatternRule::new(Annex, &["Anhang", "Anhangs", "Anhänge", "Anhängen"], Roman),
        ],
        connectors: vec![
            ConnectorSpec::new(ConnectorKind::And, &["und/oder", "und", "oder", "sowie"]),
            ConnectorSpec::new(ConnectorKind::Range, &["bis"]),
            ConnectorSpec::new(ConnectorKind::Of, &["des", "der"]),
            ConnectorSpec::new(ConnectorKind::Thereof, &["dessen", "deren"]).leading(),
            ConnectorSpec::new(ConnectorKind::Respectively, &["jeweils"]),
        ],
        ordinals: ORDINAL_STEMS
            .iter()
            .zip(1..)
            .map(|(stem, value)| OrdinalSpec {
                value,
                words: ORDINAL_ENDINGS.iter().map(|end| format!("{stem}{end}")).collect(),
            })
            .collect(),
        documents: vec![
            DocumentRule {
                act: ActKind::Regulation,
                head: "Verordnung".into(),
                pattern: r"Verordnung\s+(?:\((?P<dom>EU|EG|EWG|Euratom)\)\s+)?(?:Nr\.\s+)?(?P<num>\d{1,4}/\d{1,4})(?:/(?:EU|EG|EWG|Euratom))?\b".into(),
            },
            DocumentRule {
                act: ActKind::Directive,
                head: "Richtlinie".into(),
                pattern: r"Richtlinie\s+(?:\((?P<dom>EU|EG|EWG|Euratom)\)\s+)?(?:Nr\.\s+)?(?P<num>\d{1,4}/\d{1,4})(?:/(?:EU|EG|EWG|Euratom|JI))?\b".into(),
            },
            DocumentRule {
                act: ActKind::FrameworkDecision,
                head: "Rahmenbeschluss".into(),
                pattern: r"Rahmenbeschluss\s+(?:des\s+Rates\s+)?(?P<num>\d{1,4}/\d{1,4})(?:/JI)?\b".into(),
            },
            DocumentRule {
                act: ActKind::Decision,
                head: "Beschluss".into(),
                pattern: r"Beschluss\s+(?:\((?P<dom>EU|EG|EWG|Euratom|GASP)\)\s+)?(?:Nr\.\s+)?(?P<num>\d{1,4}/\d{1,4})(?:/(?:EU|EG|EWG|Euratom|GASP|JI))?\b".into(),
            },
        ],
        treaties: vec![
            TreatySpec {
                key: "TFEU".into(),
                names: vec!["AEUV".into(), "Vertrag über die Arbeitsweise der Europäischen Union".into()],
            },
            TreatySpec {
                key: "TEU".into(),
                names: vec!["EUV".into(), "Vertrag über die Europäische Union".into()],
            },
        ],
        comma_joins_chain: false,
        closing_brackets: false,
    }
}
