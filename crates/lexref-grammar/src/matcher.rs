//! Left-to-right citation scanner.
//!
//! The compiled `starts` index finds positions where a citation could begin.
//! At each one the matcher tries to read a run head: a unit keyword with its
//! enumerator, an ordinal followed by a keyword, a leading connector with a
//! unit, or a document. A failed head moves the search one character on.
//! After a head, the run is extended for as long as connectors, enumerators,
//! further units or documents follow. Connectors that nothing follows are
//! dropped, so a run always ends on a unit, an enumerator, a document or a
//! trailing "thereof".

use lexref_core::celex;
use lexref_core::{Decoration, Enumerator, EnumeratorKind, Span};
use tracing::trace;

use crate::language::Language;
use crate::table::GrammarTable;
use crate::token::{ConnectorKind, RawMatch, Run, Token};

/// Scans text with one grammar table.
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'g> {
    table: &'g GrammarTable,
}

impl<'g> Matcher<'g> {
    pub fn new(table: &'g GrammarTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'g GrammarTable {
        self.table
    }

    /// Lazy sequence of runs in `text`, left to right.
    pub fn runs<'t>(&self, text: &'t str) -> Runs<'g, 't> {
        self.runs_from(text, 0)
    }

    /// Runs starting at or after byte `offset`.
    pub fn runs_from<'t>(&self, text: &'t str, offset: usize) -> Runs<'g, 't> {
        Runs {
            scanner: Scanner {
                table: self.table,
                text,
            },
            pos: offset.min(text.len()),
        }
    }
}

/// Iterator over the citation runs of one text.
#[derive(Debug, Clone)]
pub struct Runs<'g, 't> {
    scanner: Scanner<'g, 't>,
    pos: usize,
}

impl Iterator for Runs<'_, '_> {
    type Item = Run;

    fn next(&mut self) -> Option<Run> {
        let text = self.scanner.text;
        while self.pos <= text.len() {
            let start = self.scanner.table.starts.find_at(text, self.pos)?.start();
            if let Some(run) = self.scanner.run_at(start) {
                trace!(start = run.span.start, end = run.span.end, tokens = run.tokens.len(), "run");
                self.pos = run.span.end;
                return Some(run);
            }
            self.pos = start + text[start..].chars().next().map_or(1, char::len_utf8);
        }
        None
    }
}

struct Lexed<'t> {
    core: &'t str,
    decoration: Decoration,
    end: usize,
}

fn next_char(text: &str, pos: usize) -> Option<char> {
    text[pos..].chars().next()
}

fn skip_space(text: &str, pos: usize) -> usize {
    let rest = &text[pos..];
    pos + rest.len() - rest.trim_start().len()
}

fn word_ends(text: &str, end: usize) -> bool {
    !next_char(text, end).is_some_and(char::is_alphanumeric)
}

fn alnum_len(s: &str) -> usize {
    s.bytes().take_while(u8::is_ascii_alphanumeric).count()
}

/// Read `(x)`, `x)` or `x` at `pos`. The closing-only form is read for
/// letters only, and only when `closing` is set.
fn lex_enumerator(text: &str, pos: usize, closing: bool) -> Option<Lexed<'_>> {
    let rest = &text[pos..];
    let lexed = if let Some(inner) = rest.strip_prefix('(') {
        let len = alnum_len(inner);
        if len == 0 || !inner[len..].starts_with(')') {
            return None;
        }
        Lexed {
            core: &inner[..len],
            decoration: Decoration::Bracketed,
            end: pos + len + 2,
        }
    } else {
        let len = alnum_len(rest);
        if len == 0 {
            return None;
        }
        let core = &rest[..len];
        if closing && rest[len..].starts_with(')') && core.bytes().all(|b| b.is_ascii_alphabetic()) {
            Lexed {
                core,
                decoration: Decoration::Closing,
                end: pos + len + 1,
            }
        } else {
            Lexed {
                core,
                decoration: Decoration::Plain,
                end: pos + len,
            }
        }
    };
    word_ends(text, lexed.end).then_some(lexed)
}

/// Could `core` be read as an enumerator of any format?
fn is_enumerator(core: &str, bracketed: bool) -> bool {
    [EnumeratorKind::Numeric, EnumeratorKind::Alpha, EnumeratorKind::Roman]
        .into_iter()
        .any(|kind| Enumerator::parse(core, kind, bracketed).is_some())
}

#[derive(Debug, Clone, Copy)]
struct Scanner<'g, 't> {
    table: &'g GrammarTable,
    text: &'t str,
}

impl Scanner<'_, '_> {
    fn run_at(&self, start: usize) -> Option<Run> {
        let mut tokens = Vec::new();
        let pos = if let Some(m) = self.unit_at(start) {
            let end = m.span.end;
            tokens.push(Token::Unit(m));
            end
        } else if let Some((kind, end)) = self.connector_at(start, true) {
            let q = skip_space(self.text, end);
            let m = (q > end).then(|| self.unit_at(q)).flatten()?;
            let unit_end = m.span.end;
            tokens.push(Token::Connector {
                kind,
                span: Span::new(start, end),
            });
            tokens.push(Token::Unit(m));
            unit_end
        } else {
            let (document_ref, span) = self.document_at(start)?;
            tokens.push(Token::Document { document_ref, span });
            span.end
        };
        self.extend(&mut tokens, pos);
        let first = tokens.first()?.span();
        let last = tokens.last()?.span();
        Some(Run {
            span: first.cover(last),
            tokens,
        })
    }

    fn extend(&self, tokens: &mut Vec<Token>, mut pos: usize) {
        let text = self.text;
        let mut pending: Vec<Token> = Vec::new();
        loop {
            let after_enumerator =
                pending.is_empty() && matches!(tokens.last(), Some(Token::Unit(_) | Token::Bare { .. }));
            if after_enumerator && text[pos..].starts_with('(') {
                if let Some(lexed) = lex_enumerator(text, pos, false)
                    .filter(|l| l.decoration == Decoration::Bracketed && is_enumerator(l.core, true))
                {
                    tokens.push(Token::Bare {
                        core: lexed.core.to_string(),
                        decoration: lexed.decoration,
                        span: Span::new(pos, lexed.end),
                        glued: true,
                    });
                    pos = lexed.end;
                    continue;
                }
            }

            let q = skip_space(text, pos);
            if text[q..].starts_with(',') {
                pending.push(Token::Connector {
                    kind: ConnectorKind::Comma,
                    span: Span::new(q, q + 1),
                });
                pos = q + 1;
                continue;
            }
            if q == pos {
                break;
            }

            if let Some(m) = self.unit_at(q) {
                pos = m.span.end;
                tokens.append(&mut pending);
                tokens.push(Token::Unit(m));
                continue;
            }
            if let Some((document_ref, span)) = self.document_at(q) {
                pos = span.end;
                tokens.append(&mut pending);
                tokens.push(Token::Document { document_ref, span });
                continue;
            }
            if let Some((kind, leading, end)) = self.connector(q) {
                let token = Token::Connector {
                    kind,
                    span: Span::new(q, end),
                };
                if kind.binds() && !leading {
                    tokens.append(&mut pending);
                    tokens.push(token);
                } else {
                    pending.push(token);
                }
                pos = end;
                continue;
            }

            let after_list = matches!(
                pending.last().and_then(Token::connector),
                Some(ConnectorKind::And | ConnectorKind::Comma | ConnectorKind::Range)
            );
            if after_list {
                if let Some(lexed) = lex_enumerator(text, q, self.table.closing_brackets)
                    .filter(|l| is_enumerator(l.core, l.decoration != Decoration::Plain))
                    .filter(|l| l.decoration != Decoration::Plain || !self.pronoun_at(l.core, l.end))
                {
                    tokens.append(&mut pending);
                    tokens.push(Token::Bare {
                        core: lexed.core.to_string(),
                        decoration: lexed.decoration,
                        span: Span::new(q, lexed.end),
                        glued: false,
                    });
                    pos = lexed.end;
                    continue;
                }
            }
            break;
        }
    }

    /// English "I" read as a pronoun: "Annexes II and I think". It stays an
    /// enumerator when the next word can continue the citation.
    fn pronoun_at(&self, core: &str, end: usize) -> bool {
        if core != "I" || self.table.language() != Language::En {
            return false;
        }
        let r = skip_space(self.text, end);
        r > end
            && self.text[r..].starts_with(char::is_lowercase)
            && self.connector(r).is_none()
            && self.unit_at(r).is_none()
            && self.document_at(r).is_none()
    }

    /// A unit keyword and its enumerator, or a spoken ordinal and a keyword.
    fn unit_at(&self, q: usize) -> Option<RawMatch> {
        self.keyword_unit_at(q).or_else(|| self.ordinal_unit_at(q))
    }

    fn keyword_end(&self, q: usize, keyword: &str) -> Option<usize> {
        if !self.text[q..].starts_with(keyword) {
            return None;
        }
        let end = q + keyword.len();
        (keyword.ends_with('.') || word_ends(self.text, end)).then_some(end)
    }

    /// Keywords are tried longest first. For each, the rules reading it are
    /// tried in table order and the first enumerator format that fits wins.
    fn keyword_unit_at(&self, q: usize) -> Option<RawMatch> {
        let table = self.table;
        for keyword in &table.keywords {
            let Some(end) = self.keyword_end(q, &keyword.text) else {
                continue;
            };
            let r = skip_space(self.text, end);
            if r == end {
                continue;
            }
            let Some(lexed) = lex_enumerator(self.text, r, table.closing_brackets) else {
                continue;
            };
            let bracketed = lexed.decoration != Decoration::Plain;
            for &index in &keyword.rules {
                let rule = &table.rules[index];
                if rule.enumerator == EnumeratorKind::Ordinal {
                    continue;
                }
                if let Some(enumerator) = Enumerator::parse(lexed.core, rule.enumerator, bracketed) {
                    return Some(RawMatch {
                        unit: rule.unit,
                        enumerator,
                        decoration: lexed.decoration,
                        span: Span::new(q, lexed.end),
                    });
                }
            }
        }
        None
    }

    fn ordinal_unit_at(&self, q: usize) -> Option<RawMatch> {
        let table = self.table;
        for (word, value) in &table.ordinals {
            let Some(end) = self.keyword_end(q, word) else {
                continue;
            };
            let r = skip_space(self.text, end);
            if r == end {
                continue;
            }
            for keyword in &table.keywords {
                let Some(keyword_end) = self.keyword_end(r, &keyword.text) else {
                    continue;
                };
                let rule = keyword
                    .rules
                    .iter()
                    .map(|&i| &table.rules[i])
                    .find(|rule| rule.enumerator == EnumeratorKind::Ordinal);
                if let Some(rule) = rule {
                    return Some(RawMatch {
                        unit: rule.unit,
                        enumerator: Enumerator::numeric(*value),
                        decoration: Decoration::Plain,
                        span: Span::new(q, keyword_end),
                    });
                }
            }
        }
        None
    }

    /// An act citation turned into its CELEX number, or a treaty name.
    fn document_at(&self, q: usize) -> Option<(String, Span)> {
        let rest = &self.text[q..];
        for pattern in &self.table.documents {
            let Some(caps) = pattern.regex.captures(rest) else {
                continue;
            };
            let (Some(whole), Some(num)) = (caps.get(0), caps.name("num")) else {
                continue;
            };
            let eu = caps
                .name("dom")
                .is_some_and(|dom| matches!(dom.as_str(), "EU" | "UE"));
            match celex::celex(pattern.act, num.as_str(), eu) {
                Some(id) => return Some((id, Span::new(q, q + whole.end()))),
                None => trace!(act = ?pattern.act, ordinate = num.as_str(), "unreadable ordinate"),
            }
        }
        self.table.treaties.iter().find_map(|(name, key)| {
            self.keyword_end(q, name)
                .map(|end| (key.clone(), Span::new(q, end)))
        })
    }

    /// Any connector word at `q`. Binding words ("thereof") may end at
    /// punctuation; the others must be followed by whitespace.
    fn connector(&self, q: usize) -> Option<(ConnectorKind, bool, usize)> {
        self.table.connectors.iter().find_map(|c| {
            if !self.text[q..].starts_with(&c.text) {
                return None;
            }
            let end = q + c.text.len();
            let bounded = if c.kind.binds() {
                word_ends(self.text, end)
            } else {
                next_char(self.text, end).is_some_and(char::is_whitespace)
            };
            bounded.then_some((c.kind, c.leading, end))
        })
    }

    fn connector_at(&self, q: usize, leading_only: bool) -> Option<(ConnectorKind, usize)> {
        self.connector(q)
            .filter(|&(_, leading, _)| leading || !leading_only)
            .map(|(kind, _, end)| (kind, end))
    }
}

#[cfg(test)]
mod tests {
    use lexref_core::UnitKind;

    use super::*;

    fn runs(lang: Language, text: &str) -> Vec<Run> {
        Matcher::new(GrammarTable::builtin(lang)).runs(text).collect()
    }

    fn unit(token: &Token) -> (UnitKind, &str) {
        match token {
            Token::Unit(m) => (m.unit, m.enumerator.value()),
            other => panic!("expected unit, got {other:?}"),
        }
    }

    fn bare(token: &Token) -> (&str, Decoration, bool) {
        match token {
            Token::Bare {
                core,
                decoration,
                glued,
                ..
            } => (core.as_str(), *decoration, *glued),
            other => panic!("expected bare enumerator, got {other:?}"),
        }
    }

    #[test]
    fn compact_citation() {
        let text = "under Article 2(1) of";
        let found = runs(Language::En, text);
        assert_eq!(found.len(), 1);
        let run = &found[0];
        assert_eq!(run.span.slice(text), "Article 2(1)");
        assert_eq!(unit(&run.tokens[0]), (UnitKind::Article, "2"));
        assert_eq!(bare(&run.tokens[1]), ("1", Decoration::Bracketed, true));
        assert_eq!(run.tokens.len(), 2);
    }

    #[test]
    fn wrong_enumerator_format_is_no_match() {
        assert!(runs(Language::En, "see Article X(y) below").is_empty());
    }

    #[test]
    fn failed_head_backtracks_to_next_start() {
        let text = "the Article in Article 3 applies";
        let found = runs(Language::En, text);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].span.slice(text), "Article 3");
    }

    #[test]
    fn keywords_only_match_whole_words() {
        assert!(runs(Language::En, "subparagraph 2 and Articleship 4").is_empty());
    }

    #[test]
    fn range_run() {
        let text = "Articles 2 to 4 apply";
        let run = &runs(Language::En, text)[0];
        assert_eq!(run.span.slice(text), "Articles 2 to 4");
        assert_eq!(run.tokens[1].connector(), Some(ConnectorKind::Range));
        assert_eq!(bare(&run.tokens[2]), ("4", Decoration::Plain, false));
    }

    #[test]
    fn dangling_connectors_are_dropped() {
        let text = "Article 5 and the rest, to be sure";
        let run = &runs(Language::En, text)[0];
        assert_eq!(run.span.slice(text), "Article 5");
        assert_eq!(run.tokens.len(), 1);
    }

    #[test]
    fn list_with_commas() {
        let text = "points (a), (b) and (c)";
        let run = &runs(Language::En, text)[0];
        assert_eq!(run.span.slice(text), text);
        let kinds: Vec<_> = run.tokens.iter().filter_map(Token::connector).collect();
        assert_eq!(kinds, vec![ConnectorKind::Comma, ConnectorKind::And]);
        assert_eq!(bare(&run.tokens[4]), ("c", Decoration::Bracketed, false));
    }

    #[test]
    fn pronoun_is_not_an_annex() {
        let text = "Annexes II and I think otherwise";
        let run = &runs(Language::En, text)[0];
        assert_eq!(run.span.slice(text), "Annexes II");

        let text = "Annexes II and I to Directive 2004/39/EC";
        let run = &runs(Language::En, text)[0];
        assert_eq!(bare(&run.tokens[2]), ("I", Decoration::Plain, false));

        let text = "Annexes II and I.";
        assert_eq!(runs(Language::En, text)[0].span.slice(text), "Annexes II and I");
    }

    #[test]
    fn thereof_ends_a_run() {
        let text = "Paragraph 2 thereof.";
        let run = &runs(Language::En, text)[0];
        assert_eq!(run.span.slice(text), "Paragraph 2 thereof");
        assert!(run.is_bound());
    }

    #[test]
    fn of_chain_and_document() {
        let text = "point (a) of paragraph 1 of Article 2 of Regulation (EU) No 575/2013.";
        let run = &runs(Language::En, text)[0];
        assert_eq!(run.span.slice(text), &text[..text.len() - 1]);
        match run.tokens.last().unwrap() {
            Token::Document { document_ref, .. } => assert_eq!(document_ref, "32013R0575"),
            other => panic!("expected document, got {other:?}"),
        }
    }

    #[test]
    fn document_alone_is_a_run() {
        let text = "Directive 2004/39/EC is repealed";
        let run = &runs(Language::En, text)[0];
        assert_eq!(run.span.slice(text), "Directive 2004/39/EC");
        assert!(matches!(&run.tokens[0], Token::Document { document_ref, .. } if document_ref == "32004L0039"));
    }

    #[test]
    fn treaty_after_unit() {
        let text = "Article 3 TEU";
        let run = &runs(Language::En, text)[0];
        assert_eq!(run.span.slice(text), text);
        assert!(matches!(&run.tokens[1], Token::Document { document_ref, .. } if document_ref == "TEU"));
    }

    #[test]
    fn spoken_ordinal() {
        let text = "the second indent of point (b)";
        let run = &runs(Language::En, text)[0];
        assert_eq!(unit(&run.tokens[0]), (UnitKind::Indent, "2"));
        assert_eq!(run.span.slice(text), "second indent of point (b)");
    }

    #[test]
    fn german_chain() {
        let text = "nach Artikel 2 Absatz 1 Buchstabe a der";
        let run = &runs(Language::De, text)[0];
        assert_eq!(run.span.slice(text), "Artikel 2 Absatz 1 Buchstabe a");
        assert_eq!(unit(&run.tokens[1]), (UnitKind::Paragraph, "1"));
        assert_eq!(unit(&run.tokens[2]), (UnitKind::Point, "a"));
    }

    #[test]
    fn german_leading_thereof() {
        let text = "dessen Absatz 2 gilt";
        let run = &runs(Language::De, text)[0];
        assert_eq!(run.span.slice(text), "dessen Absatz 2");
        assert!(run.is_bound());
        assert!(runs(Language::De, "dessen Inhalt").is_empty());
    }

    #[test]
    fn german_ordinal_declension() {
        let text = "im zweiten Gedankenstrich";
        assert_eq!(unit(&runs(Language::De, text)[0].tokens[0]), (UnitKind::Indent, "2"));
    }

    #[test]
    fn spanish_closing_brackets() {
        let text = "las letras a) y b)";
        let run = &runs(Language::Es, text)[0];
        assert_eq!(run.span.slice(text), "letras a) y b)");
        assert_eq!(bare(&run.tokens[2]), ("b", Decoration::Closing, false));
    }

    #[test]
    fn spanish_comma_chain_and_range() {
        let text = "el artículo 2, apartado 1";
        let run = &runs(Language::Es, text)[0];
        assert_eq!(run.span.slice(text), "artículo 2, apartado 1");

        let text = "los artículos 2 a 4";
        let run = &runs(Language::Es, text)[0];
        assert_eq!(run.tokens[1].connector(), Some(ConnectorKind::Range));
    }

    #[test]
    fn spanish_documents() {
        let text = "Reglamento (UE) n.o 575/2013";
        assert!(matches!(
            &runs(Language::Es, text)[0].tokens[0],
            Token::Document { document_ref, .. } if document_ref == "32013R0575"
        ));
    }

    #[test]
    fn runs_restart_from_offset() {
        let text = "Article 1 and then Article 2";
        let matcher = Matcher::new(GrammarTable::builtin(Language::En));
        let all: Vec<_> = matcher.runs(text).collect();
        assert_eq!(all.len(), 2);
        let tail: Vec<_> = matcher.runs_from(text, all[0].span.end).collect();
        assert_eq!(tail, all[1..].to_vec());
    }
}
