//! Anchor ids and titles for locators.
//!
//! The anchor id is the link target inside a rendered document:
//! `ART_2-1-a` for article 2, paragraph 1, point (a). Article and annex
//! enumerators carry a prefix; the units below them follow as `-`-joined
//! enumerators. A chapter only shows up in the id when no article or annex
//! does (`CHP_IV`), and a bare document reference becomes `DOC_<ref>`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::celex;
use crate::locator::{Locator, UnitKind};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnchorError {
    #[error("locator names no document and no unit")]
    IncompleteLocator,
}

/// Link target and canonical description of one locator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorResult {
    pub anchor_id: String,
    pub title: String,
    /// Route into the document model, present when the locator names a document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_path: Option<String>,
}

impl AnchorResult {
    /// `domain` + external path for document-qualified locators, otherwise a
    /// fragment link to the anchor in the current document. Chapters are
    /// anchored in the table of contents (`#toc-CHP_IV`).
    pub fn href(&self, domain: &str) -> String {
        match &self.external_path {
            Some(path) => format!("{domain}{path}"),
            None if self.is_container() => format!("#toc-{}", self.anchor_id),
            None => format!("#{}", self.anchor_id),
        }
    }

    fn is_container(&self) -> bool {
        UnitKind::Chapter
            .prefix()
            .and_then(|prefix| self.anchor_id.strip_prefix(prefix))
            .is_some_and(|rest| rest.starts_with('_'))
    }
}

pub fn build_anchor(locator: &Locator) -> Result<AnchorResult, AnchorError> {
    if locator.is_empty() {
        return Err(AnchorError::IncompleteLocator);
    }
    Ok(AnchorResult {
        anchor_id: anchor_id(locator),
        title: title(locator),
        external_path: external_path(locator),
    })
}

fn lower_units(locator: &Locator) -> Vec<&str> {
    locator
        .units()
        .filter(|(unit, _)| unit.needs_leaf())
        .map(|(_, e)| e.value())
        .collect()
}

fn prefixed(unit: UnitKind, value: &str) -> String {
    format!("{}_{value}", unit.prefix().unwrap_or("DOC"))
}

fn anchor_id(locator: &Locator) -> String {
    let lower = lower_units(locator);
    let head = match (locator.leaf(), &locator.chapter) {
        (Some((unit, e)), _) => Some(prefixed(unit, e.value())),
        (None, Some(chapter)) => Some(prefixed(UnitKind::Chapter, chapter.value())),
        (None, None) => None,
    };
    match head {
        Some(head) => std::iter::once(head.as_str())
            .chain(lower.iter().copied())
            .collect::<Vec<_>>()
            .join("-"),
        None if !lower.is_empty() => lower.join("-"),
        None => format!("DOC_{}", locator.document_ref.as_deref().unwrap_or_default()),
    }
}

fn external_path(locator: &Locator) -> Option<String> {
    let doc = locator.document_ref.as_deref()?;
    let lower = lower_units(locator);
    let path = match (locator.leaf(), &locator.chapter) {
        (Some((unit, e)), _) if lower.is_empty() => {
            format!("/eu/{doc}/{}/", prefixed(unit, e.value()))
        }
        (Some((unit, e)), _) => {
            format!("/eu/{doc}/{}/#{}", prefixed(unit, e.value()), lower.join("-"))
        }
        (None, Some(chapter)) => {
            format!("/eu/{doc}/TOC/#toc-{}", prefixed(UnitKind::Chapter, chapter.value()))
        }
        (None, None) => format!("/eu/{doc}/"),
    };
    Some(path)
}

fn title(locator: &Locator) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(doc) = &locator.document_ref {
        parts.push(celex::describe(doc));
    }
    if let Some(chapter) = &locator.chapter {
        parts.push(format!("Chapter {chapter}"));
    }
    match locator.leaf() {
        Some((UnitKind::Article, article)) => {
            // Article 2(1)(a)(ii), indent 3
            let mut head = format!("Article {article}");
            for unit in [UnitKind::Paragraph, UnitKind::Point, UnitKind::Subpoint] {
                if let Some(e) = locator.get(unit) {
                    head.push_str(&format!("({e})"));
                }
            }
            parts.push(head);
            if let Some(indent) = &locator.indent {
                parts.push(format!("indent {indent}"));
            }
        }
        Some((_, annex)) => {
            parts.push(format!("Annex {annex}"));
            parts.extend(spelled_lower_units(locator));
        }
        None => parts.extend(spelled_lower_units(locator)),
    }
    parts.join(", ")
}

fn spelled_lower_units(locator: &Locator) -> impl Iterator<Item = String> + '_ {
    locator
        .units()
        .filter(|(unit, _)| unit.needs_leaf())
        .map(|(unit, e)| format!("{unit} {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::{Enumerator, EnumeratorKind};

    fn num(v: &str) -> Enumerator {
        Enumerator::parse(v, EnumeratorKind::Numeric, false).unwrap()
    }

    fn alpha(v: &str) -> Enumerator {
        Enumerator::parse(v, EnumeratorKind::Alpha, true).unwrap()
    }

    fn roman(v: &str) -> Enumerator {
        Enumerator::parse(v, EnumeratorKind::Roman, false).unwrap()
    }

    #[test]
    fn article_and_paragraph() {
        let loc = Locator::default()
            .with(UnitKind::Article, num("2"))
            .with(UnitKind::Paragraph, num("1"));
        let anchor = build_anchor(&loc).unwrap();
        assert_eq!(anchor.anchor_id, "ART_2-1");
        assert_eq!(anchor.title, "Article 2(1)");
        assert_eq!(anchor.external_path, None);
        assert_eq!(anchor.href("https://example.org"), "#ART_2-1");
    }

    #[test]
    fn full_chain_skips_chapter_in_id() {
        let loc = Locator::default()
            .with(UnitKind::Chapter, roman("IV"))
            .with(UnitKind::Article, num("2"))
            .with(UnitKind::Paragraph, num("1"))
            .with(UnitKind::Point, alpha("a"))
            .with(UnitKind::Subpoint, roman("ii"))
            .with(UnitKind::Indent, num("3"));
        let anchor = build_anchor(&loc).unwrap();
        assert_eq!(anchor.anchor_id, "ART_2-1-a-ii-3");
        assert_eq!(anchor.title, "Chapter IV, Article 2(1)(a)(ii), indent 3");
    }

    #[test]
    fn chapter_alone() {
        let loc = Locator::default().with(UnitKind::Chapter, roman("IV"));
        let anchor = build_anchor(&loc).unwrap();
        assert_eq!(anchor.anchor_id, "CHP_IV");
        assert_eq!(anchor.href(""), "#toc-CHP_IV");
    }

    #[test]
    fn annex_point() {
        let loc = Locator::default()
            .with(UnitKind::Annex, roman("II"))
            .with(UnitKind::Point, num("3"));
        let anchor = build_anchor(&loc).unwrap();
        assert_eq!(anchor.anchor_id, "ANX_II-3");
        assert_eq!(anchor.title, "Annex II, point 3");
    }

    #[test]
    fn document_only() {
        let anchor = build_anchor(&Locator::document("32013R0575")).unwrap();
        assert_eq!(anchor.anchor_id, "DOC_32013R0575");
        assert_eq!(anchor.title, "Regulation 575/2013");
        assert_eq!(anchor.external_path.as_deref(), Some("/eu/32013R0575/"));
    }

    #[test]
    fn empty_locator_is_incomplete() {
        assert_eq!(build_anchor(&Locator::default()), Err(AnchorError::IncompleteLocator));
    }

    #[test]
    fn external_paths_follow_document_routing() {
        let art = Locator::document("32013R0575").with(UnitKind::Article, num("2"));
        assert_eq!(
            build_anchor(&art).unwrap().external_path.as_deref(),
            Some("/eu/32013R0575/ART_2/")
        );

        let point = art
            .clone()
            .with(UnitKind::Paragraph, num("1"))
            .with(UnitKind::Point, alpha("a"));
        let anchor = build_anchor(&point).unwrap();
        assert_eq!(anchor.external_path.as_deref(), Some("/eu/32013R0575/ART_2/#1-a"));
        assert_eq!(
            anchor.href("https://lex.example"),
            "https://lex.example/eu/32013R0575/ART_2/#1-a"
        );
        assert_eq!(anchor.title, "Regulation 575/2013, Article 2(1)(a)");

        let chapter = Locator::document("TFEU").with(UnitKind::Chapter, roman("IV"));
        assert_eq!(
            build_anchor(&chapter).unwrap().external_path.as_deref(),
            Some("/eu/TFEU/TOC/#toc-CHP_IV")
        );
    }
}
