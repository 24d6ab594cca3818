//! Sort key normalisation for enumerators and locators.
//!
//! Converts enumerators ("3", "3a", "b", "IV", "ii") into lexicographically
//! sortable strings so that ordering keys recovers document order, and
//! composes them into locator keys in containment order.
//!
//! # Numbering conventions
//!
//! - Plain numeric: Art. 1, Art. 2, ..., Art. 10
//! - Letter suffix (amendment insertion): Art. 3a between Art. 3 and Art. 4
//! - Double suffix: Art. 3aa, Art. 3ab after Art. 3a
//! - Letters: point (a), (b), ..., (z), then (aa), (ab)
//! - Roman numerals: Chapter IV, subpoint (ii)

use crate::locator::{Enumerator, EnumeratorKind, Locator, roman_value};

/// Normalise an enumerator into a lexicographically-sortable string.
///
/// Output: "0003.000.000" for `3`, "0003.010.000" for `3a`,
/// "0003.010.020" for `3ab`, "0002.000.000" for `b`, "0004.000.000" for `IV`.
///
/// # Algorithm
///
/// 1. Base value: leading digits, the position of a single letter, or the
///    value of a roman numeral (zero-padded to 4 digits)
/// 2. Remaining letters become up to 2 suffix groups, A=010, B=020, ..., Z=260
///    (gaps of 10 leave room for insertions)
/// 3. Pad to exactly 3 segments with "000" and join with "."
pub fn enumerator_sort_key(e: &Enumerator) -> String {
    let value = e.value();
    let (base, suffix): (u32, &[u8]) = match e.kind() {
        EnumeratorKind::Numeric => {
            let digit_end = value
                .bytes()
                .position(|b| !b.is_ascii_digit())
                .unwrap_or(value.len());
            (
                value[..digit_end].parse().unwrap_or(0),
                &value.as_bytes()[digit_end..],
            )
        }
        EnumeratorKind::Alpha => match value.as_bytes() {
            [first, rest @ ..] => (letter_rank(*first), rest),
            [] => (0, &[]),
        },
        EnumeratorKind::Roman => (roman_value(value).unwrap_or(0), &[]),
        EnumeratorKind::Ordinal => (0, &[]),
    };

    let mut segments: Vec<u32> = vec![base];
    for &b in suffix.iter().take(2) {
        segments.push(letter_rank(b) * 10);
    }
    while segments.len() < 3 {
        segments.push(0);
    }

    format!("{:04}.{:03}.{:03}", segments[0], segments[1], segments[2])
}

fn letter_rank(b: u8) -> u32 {
    u32::from(b.to_ascii_lowercase().saturating_sub(b'a')) + 1
}

impl Locator {
    /// Sortable key in containment order: `<document>|<unit>:<key>|...`.
    ///
    /// A locator sorts directly before the locators it contains.
    pub fn sort_key(&self) -> String {
        let mut key = self.document_ref.clone().unwrap_or_default();
        for (unit, e) in self.units() {
            key.push('|');
            key.push_str(&unit.depth().to_string());
            key.push(':');
            key.push_str(&enumerator_sort_key(e));
        }
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::UnitKind;

    fn e(value: &str, kind: EnumeratorKind) -> Enumerator {
        Enumerator::parse(value, kind, true).unwrap()
    }

    /// Helper: assert a list of inputs produces sort keys in strictly ascending order.
    fn assert_sorted_order(inputs: &[&str], kind: EnumeratorKind) {
        let keys: Vec<String> = inputs
            .iter()
            .map(|s| enumerator_sort_key(&e(s, kind)))
            .collect();
        for i in 1..keys.len() {
            assert!(
                keys[i - 1] < keys[i],
                "Expected {:?} ({}) < {:?} ({}), got {:?} >= {:?}",
                inputs[i - 1],
                keys[i - 1],
                inputs[i],
                keys[i],
                keys[i - 1],
                keys[i],
            );
        }
    }

    #[test]
    fn plain_numeric_sequence() {
        assert_sorted_order(&["1", "2", "3", "4", "5", "10", "11", "100"], EnumeratorKind::Numeric);
    }

    #[test]
    fn letter_suffix_insertion() {
        assert_sorted_order(&["3", "3a", "3b", "4"], EnumeratorKind::Numeric);
    }

    #[test]
    fn double_letter() {
        assert_sorted_order(&["3a", "3aa", "3ab", "3b"], EnumeratorKind::Numeric);
        assert_sorted_order(&["a", "aa", "ab", "b", "z"], EnumeratorKind::Alpha);
    }

    #[test]
    fn roman_numerals() {
        assert_sorted_order(&["i", "ii", "iv", "v", "ix", "x", "xl"], EnumeratorKind::Roman);
        assert_sorted_order(&["I", "II", "IX", "XIV"], EnumeratorKind::Roman);
    }

    #[test]
    fn exact_values() {
        assert_eq!(enumerator_sort_key(&e("3", EnumeratorKind::Numeric)), "0003.000.000");
        assert_eq!(enumerator_sort_key(&e("3a", EnumeratorKind::Numeric)), "0003.010.000");
        assert_eq!(enumerator_sort_key(&e("3ab", EnumeratorKind::Numeric)), "0003.010.020");
        assert_eq!(enumerator_sort_key(&e("b", EnumeratorKind::Alpha)), "0002.000.000");
        assert_eq!(enumerator_sort_key(&e("IV", EnumeratorKind::Roman)), "0004.000.000");
    }

    #[test]
    fn containing_locator_sorts_first() {
        let art = Locator::default().with(UnitKind::Article, e("2", EnumeratorKind::Numeric));
        let par = art.clone().with(UnitKind::Paragraph, e("1", EnumeratorKind::Numeric));
        let next = Locator::default().with(UnitKind::Article, e("3", EnumeratorKind::Numeric));
        assert!(art.sort_key() < par.sort_key());
        assert!(par.sort_key() < next.sort_key());
    }

    #[test]
    fn document_prefixes_key() {
        let loc = Locator::document("32013R0575").with(UnitKind::Article, e("2", EnumeratorKind::Numeric));
        assert_eq!(loc.sort_key(), "32013R0575|2:0002.000.000");
    }
}
