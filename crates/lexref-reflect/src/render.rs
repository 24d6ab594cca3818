//! Wraps resolved spans in links.

use lexref_core::Span;
use tracing::error;

/// One link to place over the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub span: Span,
    pub href: String,
    /// Target of the last member when the link stands for a range.
    pub range_end: Option<String>,
}

/// Display text comes from the source and is markup already; only the
/// characters that would end the attribute or open a tag are escaped.
fn escape_attribute(value: &str) -> String {
    value
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_href(value: &str) -> String {
    escape_attribute(&value.replace('&', "&amp;"))
}

/// Replace each link's span with `<a title=".." href="..">..</a>`, keeping
/// the original text as both the visible content and the title. Everything
/// outside the spans is copied unchanged.
///
/// Links must be ordered and must not overlap; an overlapping link is a
/// resolver defect and is dropped.
pub fn render(text: &str, links: &[Link]) -> String {
    let mut out = String::with_capacity(text.len() + links.len() * 48);
    let mut pos = 0;
    for link in links {
        if link.span.start < pos || link.span.end > text.len() {
            error!(
                start = link.span.start,
                end = link.span.end,
                "overlapping or out-of-range link, left unrendered"
            );
            continue;
        }
        let display = link.span.slice(text);
        out.push_str(&text[pos..link.span.start]);
        out.push_str("<a title=\"");
        out.push_str(&escape_attribute(display));
        out.push_str("\" href=\"");
        out.push_str(&escape_href(&link.href));
        out.push('"');
        if let Some(end) = &link.range_end {
            out.push_str(" data-range-end=\"");
            out.push_str(&escape_href(end));
            out.push('"');
        }
        out.push('>');
        out.push_str(display);
        out.push_str("</a>");
        pos = link.span.end;
    }
    out.push_str(&text[pos..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(start: usize, end: usize, href: &str) -> Link {
        Link {
            span: Span::new(start, end),
            href: href.to_string(),
            range_end: None,
        }
    }

    #[test]
    fn wraps_spans_and_keeps_the_rest() {
        let text = "under Article 2(1), as amended";
        let out = render(text, &[link(6, 18, "#ART_2-1")]);
        assert_eq!(
            out,
            "under <a title=\"Article 2(1)\" href=\"#ART_2-1\">Article 2(1)</a>, as amended"
        );
    }

    #[test]
    fn no_links_is_identity() {
        let text = "nothing to see <b>here</b> &amp; there";
        assert_eq!(render(text, &[]), text);
    }

    #[test]
    fn range_carries_its_end() {
        let text = "Articles 2 to 4";
        let out = render(
            text,
            &[Link {
                range_end: Some("#ART_4".into()),
                ..link(0, 15, "#ART_2")
            }],
        );
        assert_eq!(
            out,
            "<a title=\"Articles 2 to 4\" href=\"#ART_2\" data-range-end=\"#ART_4\">Articles 2 to 4</a>"
        );
    }

    #[test]
    fn overlapping_link_is_dropped() {
        let text = "Article 2 and 3";
        let out = render(text, &[link(0, 9, "#ART_2"), link(5, 15, "#x")]);
        assert_eq!(out, "<a title=\"Article 2\" href=\"#ART_2\">Article 2</a> and 3");
    }

    #[test]
    fn hrefs_are_escaped() {
        let out = render("Art. 1", &[link(0, 6, "https://x.test/?a=1&b=\"2\"")]);
        assert!(out.contains("href=\"https://x.test/?a=1&amp;b=&quot;2&quot;\""));
    }

    #[test]
    fn multibyte_text_passes_through() {
        let text = "gemäß Artikel 107 AEUV.";
        let start = text.find("Artikel").unwrap();
        let out = render(text, &[link(start, start + "Artikel 107 AEUV".len(), "/eu/TFEU/ART_107/")]);
        assert!(out.starts_with("gemäß <a title=\"Artikel 107 AEUV\""));
        assert!(out.ends_with("</a>."));
    }
}
