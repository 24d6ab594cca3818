//! CELEX identifiers for EU legislative acts.
//!
//! Citations name acts by type and a `number/year` or `year/number` pair
//! ("Regulation (EU) No 575/2013", "Directive 2004/39/EC"). The document model
//! addresses them by CELEX number: sector `3`, four-digit year, a type letter
//! and a four-digit number, e.g. `32013R0575`.

use serde::{Deserialize, Serialize};

/// Years outside this window are not taken for years when deciding which
/// half of an ordinate is the year.
const MIN_YEAR: u32 = 1944;
const MAX_YEAR: u32 = 2099;

/// From 2015 on, acts of the EU are numbered year-first ("(EU) 2016/679").
const YEAR_FIRST_SINCE: u32 = 2015;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActKind {
    Regulation,
    Directive,
    Decision,
    FrameworkDecision,
}

impl ActKind {
    fn letter(self) -> char {
        match self {
            Self::Regulation => 'R',
            Self::Directive => 'L',
            Self::Decision => 'D',
            Self::FrameworkDecision => 'F',
        }
    }

    fn from_letter(c: char) -> Option<Self> {
        match c {
            'R' => Some(Self::Regulation),
            'L' => Some(Self::Directive),
            'D' => Some(Self::Decision),
            'F' => Some(Self::FrameworkDecision),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Regulation => "Regulation",
            Self::Directive => "Directive",
            Self::Decision => "Decision",
            Self::FrameworkDecision => "Framework Decision",
        }
    }
}

fn plausible_year(n: u32) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&n)
}

fn build(kind: ActKind, mut year: u32, mut number: u32) -> String {
    if year < 100 {
        year += 1900;
    }
    if plausible_year(number) && !plausible_year(year) {
        std::mem::swap(&mut year, &mut number);
    }
    format!("3{year:04}{}{number:04}", kind.letter())
}

/// CELEX number of an act cited as `kind` with `ordinate` ("575/2013").
///
/// `eu_numbering` is set when the citation carries the "(EU)" marker, which
/// makes regulation ordinates from 2015 on read year-first.
pub fn celex(kind: ActKind, ordinate: &str, eu_numbering: bool) -> Option<String> {
    let mut parts = ordinate.trim().split('/');
    let first: u32 = parts.next()?.trim().parse().ok()?;
    let second: u32 = parts.next()?.trim().parse().ok()?;
    let (year, number) = match kind {
        ActKind::Regulation if eu_numbering && first >= YEAR_FIRST_SINCE => (first, second),
        ActKind::Regulation => (second, first),
        _ => (first, second),
    };
    Some(build(kind, year, number))
}

/// Human name of a document reference: "Regulation 575/2013" for
/// `32013R0575`. Other references (treaty keys) are returned unchanged.
pub fn describe(document_ref: &str) -> String {
    parse_celex(document_ref).unwrap_or_else(|| document_ref.to_string())
}

fn parse_celex(document_ref: &str) -> Option<String> {
    if document_ref.len() != 10 || !document_ref.is_ascii() || !document_ref.starts_with('3') {
        return None;
    }
    let year: u32 = document_ref[1..5].parse().ok()?;
    let kind = ActKind::from_letter(document_ref[5..6].chars().next()?)?;
    let number: u32 = document_ref[6..10].parse().ok()?;
    Some(match kind {
        ActKind::Regulation if year < YEAR_FIRST_SINCE => format!("{} {number}/{year}", kind.name()),
        _ => format!("{} {year}/{number}", kind.name()),
    })
}
