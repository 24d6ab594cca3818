//! Hierarchical addresses of legislative provisions.
//!
//! A [`Locator`] names a provision by its position in the legislative
//! hierarchy: document, chapter, article (or annex), paragraph, point,
//! subpoint and indent. Units lower in the hierarchy only make sense inside an
//! article or an annex; [`Locator::is_well_formed`] checks that.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Byte offsets into a source text, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start after end: {start} > {end}");
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Move the span by `offset` bytes.
    pub fn shift(self, offset: usize) -> Self {
        Self::new(self.start + offset, self.end + offset)
    }

    /// Smallest span covering both `self` and `other`.
    pub fn cover(self, other: Span) -> Self {
        Self::new(self.start.min(other.start), self.end.max(other.end))
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }
}

/// One level of the legislative hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Chapter,
    Article,
    Annex,
    Paragraph,
    Point,
    Subpoint,
    Indent,
}

impl UnitKind {
    pub const ALL: [UnitKind; 7] = [
        UnitKind::Chapter,
        UnitKind::Article,
        UnitKind::Annex,
        UnitKind::Paragraph,
        UnitKind::Point,
        UnitKind::Subpoint,
        UnitKind::Indent,
    ];

    /// Nesting depth. Articles and annexes share a level.
    pub fn depth(self) -> u8 {
        match self {
            Self::Chapter => 1,
            Self::Article | Self::Annex => 2,
            Self::Paragraph => 3,
            Self::Point => 4,
            Self::Subpoint => 5,
            Self::Indent => 6,
        }
    }

    /// Articles and annexes: the units a document is routed by.
    pub fn is_leaf(self) -> bool {
        matches!(self, Self::Article | Self::Annex)
    }

    /// Units that cannot stand without an enclosing article or annex.
    pub fn needs_leaf(self) -> bool {
        self.depth() > 2
    }

    /// Fixed anchor prefix for units that start an anchor id.
    pub fn prefix(self) -> Option<&'static str> {
        match self {
            Self::Chapter => Some("CHP"),
            Self::Article => Some("ART"),
            Self::Annex => Some("ANX"),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Chapter => "chapter",
            Self::Article => "article",
            Self::Annex => "annex",
            Self::Paragraph => "paragraph",
            Self::Point => "point",
            Self::Subpoint => "subpoint",
            Self::Indent => "indent",
        }
    }

    /// Units a bracketed enumerator glued to this unit's enumerator can stand
    /// for, with the enumerator kinds each accepts, most likely first.
    ///
    /// `2(1)(a)(ii)`: after an article a number is a paragraph and a letter a
    /// point; after a point, a roman numeral is a subpoint.
    pub fn compact_children(self) -> &'static [(UnitKind, &'static [EnumeratorKind])] {
        use EnumeratorKind::*;
        match self {
            Self::Article | Self::Annex => &[
                (UnitKind::Paragraph, &[Numeric]),
                (UnitKind::Point, &[Alpha]),
            ],
            Self::Paragraph => &[(UnitKind::Point, &[Alpha, Numeric])],
            Self::Point => &[(UnitKind::Subpoint, &[Roman])],
            Self::Subpoint => &[(UnitKind::Indent, &[Numeric])],
            Self::Chapter | Self::Indent => &[],
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown unit: {0:?}")]
pub struct UnknownUnit(pub String);

impl FromStr for UnitKind {
    type Err = UnknownUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|unit| unit.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| UnknownUnit(s.to_string()))
    }
}

/// How an enumerator is written in a grammar table.
///
/// `Ordinal` is a spoken ordinal in front of the keyword ("second indent");
/// it yields a numeric [`Enumerator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnumeratorKind {
    Numeric,
    Alpha,
    Roman,
    Ordinal,
}

/// Brackets around an enumerator as written in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decoration {
    /// `2`, `a`
    #[default]
    Plain,
    /// `(2)`, `(a)`
    Bracketed,
    /// `a)`
    Closing,
}

/// Label of a unit within its parent, e.g. `2`, `4a`, `b`, `IV`, `ii`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Enumerator {
    value: String,
    kind: EnumeratorKind,
}

/// Range expansion refuses to go beyond this many members.
const MAX_ORDINAL: u32 = 3999;

impl Enumerator {
    /// Parse the undecorated core of an enumerator as `kind`.
    ///
    /// `bracketed` relaxes the alpha form to two letters, which would otherwise
    /// swallow short words ("points to").
    pub fn parse(core: &str, kind: EnumeratorKind, bracketed: bool) -> Option<Self> {
        let valid = match kind {
            EnumeratorKind::Numeric => is_numeric(core),
            EnumeratorKind::Alpha => {
                let max = if bracketed { 2 } else { 1 };
                !core.is_empty()
                    && core.len() <= max
                    && core.bytes().all(|b| b.is_ascii_lowercase())
            }
            EnumeratorKind::Roman => roman_value(core).is_some(),
            EnumeratorKind::Ordinal => false,
        };
        valid.then(|| Self {
            value: core.to_string(),
            kind,
        })
    }

    pub fn numeric(n: u32) -> Self {
        Self {
            value: n.to_string(),
            kind: EnumeratorKind::Numeric,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn kind(&self) -> EnumeratorKind {
        self.kind
    }

    /// Position in its counting system, if the enumerator is a plain member
    /// of one: `7` → 7, `c` → 3, `iv` → 4. Suffixed numbers (`4a`) and
    /// double letters have none.
    pub fn ordinal(&self) -> Option<u32> {
        match self.kind {
            EnumeratorKind::Numeric => self.value.parse().ok(),
            EnumeratorKind::Alpha => {
                let mut bytes = self.value.bytes();
                match (bytes.next(), bytes.next()) {
                    (Some(b), None) => Some(u32::from(b - b'a') + 1),
                    _ => None,
                }
            }
            EnumeratorKind::Roman => roman_value(&self.value),
            EnumeratorKind::Ordinal => None,
        }
    }

    /// The enumerator at position `n` of the same counting system, written in
    /// the same case.
    pub fn with_ordinal(&self, n: u32) -> Option<Self> {
        if n == 0 || n > MAX_ORDINAL {
            return None;
        }
        let value = match self.kind {
            EnumeratorKind::Numeric => n.to_string(),
            EnumeratorKind::Alpha => {
                if n > 26 {
                    return None;
                }
                char::from(b'a' + (n - 1) as u8).to_string()
            }
            EnumeratorKind::Roman => {
                let upper = self.value.bytes().all(|b| b.is_ascii_uppercase());
                to_roman(n, upper)
            }
            EnumeratorKind::Ordinal => return None,
        };
        Some(Self {
            value,
            kind: self.kind,
        })
    }
}

impl fmt::Display for Enumerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

fn is_numeric(core: &str) -> bool {
    let digits = core.bytes().take_while(u8::is_ascii_digit).count();
    let suffix = &core.as_bytes()[digits..];
    (1..=4).contains(&digits)
        && core.as_bytes()[0] != b'0'
        && suffix.len() <= 2
        && suffix.iter().all(u8::is_ascii_lowercase)
}

const ROMAN: &[(u32, &str)] = &[
    (1000, "m"),
    (900, "cm"),
    (500, "d"),
    (400, "cd"),
    (100, "c"),
    (90, "xc"),
    (50, "l"),
    (40, "xl"),
    (10, "x"),
    (9, "ix"),
    (5, "v"),
    (4, "iv"),
    (1, "i"),
];

fn to_roman(mut n: u32, upper: bool) -> String {
    let mut out = String::new();
    for &(value, digits) in ROMAN {
        while n >= value {
            out.push_str(digits);
            n -= value;
        }
    }
    if upper { out.to_ascii_uppercase() } else { out }
}

/// Value of a canonically written roman numeral in a single case.
pub fn roman_value(s: &str) -> Option<u32> {
    if s.is_empty() {
        return None;
    }
    let lower = s.bytes().all(|b| b.is_ascii_lowercase());
    let upper = s.bytes().all(|b| b.is_ascii_uppercase());
    if !lower && !upper {
        return None;
    }
    let folded = s.to_ascii_lowercase();
    let mut rest = folded.as_str();
    let mut total = 0;
    for &(value, digits) in ROMAN {
        while let Some(tail) = rest.strip_prefix(digits) {
            total += value;
            rest = tail;
        }
    }
    // Re-rendering rejects non-canonical forms such as "iiii" or "vx".
    (rest.is_empty() && total <= MAX_ORDINAL && to_roman(total, false) == folded).then_some(total)
}

/// A possibly partial address of a provision.
///
/// Fields follow the containment order document ⊇ chapter ⊇ article/annex ⊇
/// paragraph ⊇ point ⊇ subpoint ⊇ indent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter: Option<Enumerator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article: Option<Enumerator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annex: Option<Enumerator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph: Option<Enumerator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point: Option<Enumerator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subpoint: Option<Enumerator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indent: Option<Enumerator>,
}

impl Locator {
    pub fn document(document_ref: impl Into<String>) -> Self {
        Self {
            document_ref: Some(document_ref.into()),
            ..Self::default()
        }
    }

    pub fn get(&self, unit: UnitKind) -> Option<&Enumerator> {
        match unit {
            UnitKind::Chapter => self.chapter.as_ref(),
            UnitKind::Article => self.article.as_ref(),
            UnitKind::Annex => self.annex.as_ref(),
            UnitKind::Paragraph => self.paragraph.as_ref(),
            UnitKind::Point => self.point.as_ref(),
            UnitKind::Subpoint => self.subpoint.as_ref(),
            UnitKind::Indent => self.indent.as_ref(),
        }
    }

    fn slot(&mut self, unit: UnitKind) -> &mut Option<Enumerator> {
        match unit {
            UnitKind::Chapter => &mut self.chapter,
            UnitKind::Article => &mut self.article,
            UnitKind::Annex => &mut self.annex,
            UnitKind::Paragraph => &mut self.paragraph,
            UnitKind::Point => &mut self.point,
            UnitKind::Subpoint => &mut self.subpoint,
            UnitKind::Indent => &mut self.indent,
        }
    }

    /// Set one unit. Articles and annexes exclude each other.
    pub fn set(&mut self, unit: UnitKind, enumerator: Enumerator) {
        match unit {
            UnitKind::Article => self.annex = None,
            UnitKind::Annex => self.article = None,
            _ => {}
        }
        *self.slot(unit) = Some(enumerator);
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, unit: UnitKind, enumerator: Enumerator) -> Self {
        self.set(unit, enumerator);
        self
    }

    /// Units present, in containment order.
    pub fn units(&self) -> impl Iterator<Item = (UnitKind, &Enumerator)> {
        UnitKind::ALL
            .into_iter()
            .filter_map(|unit| self.get(unit).map(|e| (unit, e)))
    }

    pub fn has_units(&self) -> bool {
        self.units().next().is_some()
    }

    /// No document and no unit.
    pub fn is_empty(&self) -> bool {
        self.document_ref.is_none() && !self.has_units()
    }

    pub fn deepest(&self) -> Option<UnitKind> {
        self.units().last().map(|(unit, _)| unit)
    }

    pub fn leaf(&self) -> Option<(UnitKind, &Enumerator)> {
        self.units().find(|(unit, _)| unit.is_leaf())
    }

    /// The document and every unit strictly above `unit`.
    pub fn above(&self, unit: UnitKind) -> Locator {
        let mut out = Locator {
            document_ref: self.document_ref.clone(),
            ..Locator::default()
        };
        for (kind, e) in self.units() {
            if kind.depth() < unit.depth() {
                out.set(kind, e.clone());
            }
        }
        out
    }

    /// Replace the enumerator of the deepest unit.
    pub fn with_deepest(&self, enumerator: Enumerator) -> Locator {
        let mut out = self.clone();
        if let Some(unit) = self.deepest() {
            out.set(unit, enumerator);
        }
        out
    }

    /// Units below article level are only addressable inside an article or
    /// an annex, and a locator may not be empty.
    pub fn is_well_formed(&self) -> bool {
        if self.is_empty() || (self.article.is_some() && self.annex.is_some()) {
            return false;
        }
        let has_leaf = self.leaf().is_some();
        self.units().all(|(unit, _)| !unit.needs_leaf() || has_leaf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(v: &str) -> Enumerator {
        Enumerator::parse(v, EnumeratorKind::Numeric, false).unwrap()
    }

    fn alpha(v: &str) -> Enumerator {
        Enumerator::parse(v, EnumeratorKind::Alpha, true).unwrap()
    }

    #[test]
    fn unit_names_parse() {
        assert_eq!("Article".parse::<UnitKind>(), Ok(UnitKind::Article));
        assert_eq!(" paragraph ".parse::<UnitKind>(), Ok(UnitKind::Paragraph));
        assert_eq!("clause".parse::<UnitKind>(), Err(UnknownUnit("clause".into())));
    }

    #[test]
    fn numeric_enumerators() {
        assert!(Enumerator::parse("2", EnumeratorKind::Numeric, false).is_some());
        assert!(Enumerator::parse("4a", EnumeratorKind::Numeric, false).is_some());
        assert!(Enumerator::parse("1093", EnumeratorKind::Numeric, false).is_some());
        assert!(Enumerator::parse("X", EnumeratorKind::Numeric, false).is_none());
        assert!(Enumerator::parse("02", EnumeratorKind::Numeric, false).is_none());
        assert!(Enumerator::parse("12345", EnumeratorKind::Numeric, false).is_none());
        assert!(Enumerator::parse("", EnumeratorKind::Numeric, false).is_none());
    }

    #[test]
    fn alpha_enumerators_need_brackets_for_two_letters() {
        assert!(Enumerator::parse("a", EnumeratorKind::Alpha, false).is_some());
        assert!(Enumerator::parse("to", EnumeratorKind::Alpha, false).is_none());
        assert!(Enumerator::parse("aa", EnumeratorKind::Alpha, true).is_some());
        assert!(Enumerator::parse("B", EnumeratorKind::Alpha, true).is_none());
    }

    #[test]
    fn roman_enumerators() {
        assert_eq!(roman_value("iv"), Some(4));
        assert_eq!(roman_value("XIV"), Some(14));
        assert_eq!(roman_value("iiii"), None);
        assert_eq!(roman_value("Iv"), None);
        assert_eq!(roman_value("vx"), None);
        assert_eq!(roman_value(""), None);
    }

    #[test]
    fn ordinals_round_trip_through_counting_systems() {
        assert_eq!(alpha("c").ordinal(), Some(3));
        assert_eq!(alpha("c").with_ordinal(5), Some(alpha("e")));
        let upper = Enumerator::parse("IV", EnumeratorKind::Roman, false).unwrap();
        assert_eq!(upper.with_ordinal(6).unwrap().value(), "VI");
        assert_eq!(num("4a").ordinal(), None);
        assert_eq!(alpha("aa").ordinal(), None);
    }

    #[test]
    fn article_and_annex_exclude_each_other() {
        let loc = Locator::default()
            .with(UnitKind::Article, num("2"))
            .with(UnitKind::Annex, Enumerator::parse("II", EnumeratorKind::Roman, false).unwrap());
        assert!(loc.article.is_none());
        assert!(loc.annex.is_some());
    }

    #[test]
    fn above_keeps_document_and_upper_units() {
        let loc = Locator::document("32013R0575")
            .with(UnitKind::Article, num("5"))
            .with(UnitKind::Paragraph, num("1"))
            .with(UnitKind::Point, alpha("a"));
        let upper = loc.above(UnitKind::Point);
        assert_eq!(upper.document_ref.as_deref(), Some("32013R0575"));
        assert_eq!(upper.paragraph, Some(num("1")));
        assert!(upper.point.is_none());
        assert_eq!(loc.above(UnitKind::Article), Locator::document("32013R0575"));
    }

    #[test]
    fn well_formedness() {
        assert!(!Locator::default().is_well_formed());
        assert!(Locator::document("TFEU").is_well_formed());
        assert!(!Locator::default().with(UnitKind::Paragraph, num("2")).is_well_formed());
        assert!(
            Locator::default()
                .with(UnitKind::Article, num("5"))
                .with(UnitKind::Point, alpha("b"))
                .is_well_formed()
        );
    }

    #[test]
    fn units_come_in_containment_order() {
        let loc = Locator::default()
            .with(UnitKind::Point, alpha("a"))
            .with(UnitKind::Article, num("2"))
            .with(UnitKind::Chapter, Enumerator::parse("IV", EnumeratorKind::Roman, false).unwrap());
        let kinds: Vec<_> = loc.units().map(|(u, _)| u).collect();
        assert_eq!(kinds, vec![UnitKind::Chapter, UnitKind::Article, UnitKind::Point]);
        assert_eq!(loc.deepest(), Some(UnitKind::Point));
    }

    #[test]
    fn serializes_only_present_units() {
        let loc = Locator::default()
            .with(UnitKind::Article, num("2"))
            .with(UnitKind::Paragraph, num("1"));
        let json = serde_json::to_string(&loc).unwrap();
        assert_eq!(
            json,
            r#"{"article":{"value":"2","kind":"numeric"},"paragraph":{"value":"1","kind":"numeric"}}"#
        );
    }
}
