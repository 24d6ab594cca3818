use lexref_core::{ActKind, EnumeratorKind::*, UnitKind::*};

use crate::language::Language;
use crate::spec::{ConnectorSpec, DocumentRule, GrammarSpec, OrdinalSpec, PatternRule, TreatySpec};
use crate::token::ConnectorKind;

const ORDINALS: [&[&str]; 10] = [
    &["primer", "primero", "primera"],
    &["segundo", "segunda"],
    &["tercer", "tercero", "tercera"],
    &["cuarto", "cuarta"],
    &["quinto", "quinta"],
    &["sexto", "sexta"],
    &["séptimo", "séptima"],
    &["octavo", "octava"],
    &["noveno", "novena"],
    &["décimo", "décima"],
];

pub(super) fn spec() -> GrammarSpec {
    GrammarSpec {
        language: Language::Es,
        rules: vec![
            PatternRule::new(Article, &["artículo", "artículos", "Artículo", "Artículos", "art."], Numeric),
            PatternRule::new(Paragraph, &["apartado", "apartados", "Apartado", "Apartados"], Numeric),
            PatternRule::new(Point, &["letra", "letras", "Letra", "Letras"], Alpha),
            PatternRule::new(Point, &["punto", "puntos", "Punto", "Puntos"], Numeric),
            PatternRule::new(Subpoint, &["inciso", "incisos"], Roman),
            PatternRule::new(Indent, &["guion", "guión", "guiones"], Ordinal),
            PatternRule::new(Indent, &["guion", "guión", "guiones"], Numeric),
            PatternRule::new(Chapter, &["capítulo", "capítulos", "Capítulo", "Capítulos"], Roman),
            PatternRule::new(Chapter, &["capítulo", "capítulos", "Capítulo", "Capítulos"], Numeric),
            PatternRule::new(Annex, &["anexo", "anexos", "Anexo", "Anexos"], Roman),
        ],
        connectors: vec![
            ConnectorSpec::new(ConnectorKind::And, &["y/o", "y", "e", "o", "u"]),
            ConnectorSpec::new(ConnectorKind::Range, &["a"]),
            ConnectorSpec::new(ConnectorKind::Of, &["de los", "de las", "de la", "del", "de"]),
            ConnectorSpec::new(ConnectorKind::Thereof, &["su", "sus"]).leading(),
            ConnectorSpec::new(ConnectorKind::Respectively, &["respectivamente"]),
        ],
        ordinals: ORDINALS
            .iter()
            .zip(1..)
            .map(|(words, value)| OrdinalSpec {
                value,
                words: words.iter().map(|w| w.to_string()).collect(),
            })
            .collect(),
        documents: vec![
            DocumentRule {
                act: ActKind::Regulation,
                head: "Reglamento".into(),
                pattern: r"Reglamento\s+(?:\((?P<dom>UE|CE|CEE|Euratom)\)\s+)?(?:n\.?\s?[oº°]\s+)?(?P<num>\d{1,4}/\d{1,4})(?:/(?:UE|CE|CEE|Euratom))?\b".into(),
            },
            DocumentRule {
                act: ActKind::FrameworkDecision,
                head: "Decisión".into(),
                pattern: r"Decisión\s+Marco\s+(?P<num>\d{1,4}/\d{1,4})(?:/JAI)?\b".into(),
            },
            DocumentRule {
                act: ActKind::Directive,
                head: "Directiva".into(),
                pattern: r"Directiva\s+(?:\((?P<dom>UE|CE|CEE|Euratom)\)\s+)?(?:n\.?\s?[oº°]\s+)?(?P<num>\d{1,4}/\d{1,4})(?:/(?:UE|CE|CEE|Euratom|JAI))?\b".into(),
            },
            DocumentRule {
                act: ActKind::Decision,
                head: "Decisión".into(),
                pattern: r"Decisión\s+(?:\((?P<dom>UE|CE|CEE|Euratom|PESC)\)\s+)?(?:n\.?\s?[oº°]\s+)?(?P<num>\d{1,4}/\d{1,4})(?:/(?:UE|CE|CEE|Euratom|PESC|JAI))?\b".into(),
            },
        ],
        treaties: vec![
            TreatySpec {
                key: "TFEU".into(),
                names: vec!["TFUE".into(), "Tratado de Funcionamiento de la Unión Europea".into()],
            },
            TreatySpec {
                key: "TEU".into(),
                names: vec!["TUE".into(), "Tratado de la Unión Europea".into()],
            },
        ],
        comma_joins_chain: true,
        closing_brackets: true,
    }
}
