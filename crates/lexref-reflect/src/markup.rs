//! Splits marked-up input into the text between tags.
//!
//! Only text between tags is scanned for citations. Tags, attribute values
//! and comments are skipped. Text inside an `<a>` element is still reported,
//! flagged as already linked, so that it feeds the reference context without
//! being wrapped a second time.
//!
//! Input that does not read as markup ("if x<y and y>z") is plain text and
//! comes back as a single segment.

use lexref_core::Span;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::trace;

/// A stretch of text between tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub span: Span,
    /// Inside an `<a>` element.
    pub linked: bool,
}

fn is_anchor(name: &[u8]) -> bool {
    name.eq_ignore_ascii_case(b"a")
}

/// A tag that prose could not have produced: a proper name and well-formed
/// `key="value"` attributes.
fn plausible_tag(e: &BytesStart<'_>) -> bool {
    let name = e.name();
    let name = name.as_ref();
    let well_named = name.first().is_some_and(u8::is_ascii_alphabetic)
        && name
            .iter()
            .all(|&b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':' | b'.'));
    well_named && e.attributes().all(|attr| attr.is_ok())
}

/// Text segments of `text` in order. Plain text yields one segment covering
/// everything.
pub fn segments(text: &str) -> Vec<Segment> {
    match markup_segments(text) {
        Some(segments) => segments,
        None => {
            trace!(len = text.len(), "not markup, scanning as plain text");
            plain(text)
        }
    }
}

fn plain(text: &str) -> Vec<Segment> {
    if text.is_empty() {
        return Vec::new();
    }
    vec![Segment {
        span: Span::new(0, text.len()),
        linked: false,
    }]
}

fn markup_segments(text: &str) -> Option<Vec<Segment>> {
    let mut reader = Reader::from_str(text);
    let config = reader.config_mut();
    config.trim_text_start = false;
    config.trim_text_end = false;
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    let mut out = Vec::new();
    let mut anchors: usize = 0;
    loop {
        let start = reader.buffer_position() as usize;
        match reader.read_event().ok()? {
            Event::Text(_) => {
                let end = reader.buffer_position() as usize;
                if end > start {
                    out.push(Segment {
                        span: Span::new(start, end),
                        linked: anchors > 0,
                    });
                }
            }
            Event::Start(e) => {
                if !plausible_tag(&e) {
                    return None;
                }
                if is_anchor(e.name().as_ref()) {
                    anchors += 1;
                }
            }
            Event::Empty(e) => {
                if !plausible_tag(&e) {
                    return None;
                }
            }
            Event::End(e) => {
                if is_anchor(e.name().as_ref()) {
                    anchors = anchors.saturating_sub(1);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts<'a>(text: &'a str) -> Vec<(&'a str, bool)> {
        segments(text)
            .into_iter()
            .map(|s| (s.span.slice(text), s.linked))
            .collect()
    }

    #[test]
    fn plain_text_is_one_segment() {
        assert_eq!(texts("Article 2(1) applies"), vec![("Article 2(1) applies", false)]);
        assert!(segments("").is_empty());
    }

    #[test]
    fn tags_are_skipped() {
        assert_eq!(
            texts("<p class=\"x\">Article 5</p> and <br/>more"),
            vec![("Article 5", false), (" and ", false), ("more", false)]
        );
    }

    #[test]
    fn attribute_values_are_not_text() {
        assert_eq!(
            texts("<span title=\"a > b, Article 7\">x</span>"),
            vec![("x", false)]
        );
    }

    #[test]
    fn anchor_contents_are_flagged() {
        assert_eq!(
            texts("see <a title=\"Article 2\" href=\"#ART_2\">Article 2</a>, then <abbr>TEU</abbr>"),
            vec![
                ("see ", false),
                ("Article 2", true),
                (", then ", false),
                ("TEU", false),
            ]
        );
    }

    #[test]
    fn stray_angle_brackets_are_text() {
        assert_eq!(texts("a < b and c<3"), vec![("a < b and c<3", false)]);
    }

    #[test]
    fn comparisons_in_prose_are_text() {
        let text = "if x<y under Article 5 and y>z then";
        assert_eq!(texts(text), vec![(text, false)]);
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(texts("x<!-- Article 4 -->y"), vec![("x", false), ("y", false)]);
    }

    #[test]
    fn unmatched_and_mismatched_tags() {
        assert_eq!(
            texts("<p>Article 5<br></i> applies</p>"),
            vec![("Article 5", false), (" applies", false)]
        );
    }

    #[test]
    fn large_inputs() {
        let prose = "a<b ".repeat(20_000);
        assert_eq!(texts(&prose), vec![(prose.as_str(), false)]);

        let html = "<p>Article 5</p>".repeat(20_000);
        let found = segments(&html);
        assert_eq!(found.len(), 20_000);
        assert!(found.iter().all(|s| s.span.slice(&html) == "Article 5"));
    }
}
