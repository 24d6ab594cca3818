//! Turns matcher runs into resolved references.
//!
//! A run is first parsed into entries, one per citation that gets its own
//! link: "points (a) and (b)" gives two entries, "Article 2(1)(a)" one.
//! "of" chains then hand their upper units down to the entries before them.
//! Finally each entry is completed against the [`ReferenceContext`], in text
//! order, updating the context as it goes.

use lexref_core::{Decoration, Enumerator, Locator, Span, UnitKind};
use lexref_grammar::{ConnectorKind, GrammarTable, Run, Token};
use serde::Serialize;
use tracing::trace;

use crate::context::ReferenceContext;
use crate::error::ResolveError;

/// Ranges with more members than this keep only their endpoints.
pub const MAX_RANGE_MEMBERS: u32 = 500;

/// One citation found in the text, with its position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedReference {
    pub locator: Locator,
    /// Last member of a range; `locator` is the first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_end: Option<Locator>,
    pub span: Span,
    pub display_text: String,
    /// Highest unit the citation spells out itself, before context filled
    /// in the rest. `None` for a document on its own.
    #[serde(skip)]
    pub cited_unit: Option<UnitKind>,
}

impl ResolvedReference {
    /// Every locator the reference stands for. A range over plain numbers,
    /// single letters or roman numerals in one case lists each member in
    /// order; any other range lists its two endpoints.
    pub fn members(&self) -> Vec<Locator> {
        let Some(last) = &self.range_end else {
            return vec![self.locator.clone()];
        };
        let endpoints = || vec![self.locator.clone(), last.clone()];
        let Some(unit) = self.locator.deepest() else {
            return endpoints();
        };
        let (Some(first_e), Some(last_e)) = (self.locator.get(unit), last.get(unit)) else {
            return endpoints();
        };
        match (first_e.ordinal(), last_e.ordinal()) {
            (Some(from), Some(to))
                if from <= to
                    && self.locator.sort_key() <= last.sort_key()
                    && to - from < MAX_RANGE_MEMBERS
                    && first_e.with_ordinal(to).as_ref() == Some(last_e) =>
            {
                (from..=to)
                    .filter_map(|n| first_e.with_ordinal(n))
                    .map(|e| self.locator.with_deepest(e))
                    .collect()
            }
            _ => endpoints(),
        }
    }

    pub fn is_range(&self) -> bool {
        self.range_end.is_some()
    }
}

#[derive(Debug, Clone)]
struct Link {
    unit: UnitKind,
    enumerator: Enumerator,
    decoration: Decoration,
}

#[derive(Debug, Clone)]
struct Entry {
    links: Vec<Link>,
    /// Where a range over the deepest link ends.
    range_end: Option<Enumerator>,
    span: Span,
    document: Option<String>,
    /// Stands above earlier entries in an "of" chain.
    ancestor: bool,
    /// Governed by "thereof" or a leading "dessen": a missing document is
    /// taken from the context.
    bound: bool,
}

impl Entry {
    fn new(link: Link, span: Span) -> Self {
        Self {
            links: vec![link],
            range_end: None,
            span,
            document: None,
            ancestor: false,
            bound: false,
        }
    }

    fn document(document_ref: String, span: Span) -> Self {
        Self {
            links: Vec::new(),
            range_end: None,
            span,
            document: Some(document_ref),
            ancestor: false,
            bound: false,
        }
    }

    fn top(&self) -> Option<UnitKind> {
        self.links.first().map(|l| l.unit)
    }

    fn deepest(&self) -> Option<UnitKind> {
        self.links.last().map(|l| l.unit)
    }

    /// Can `unit` continue this entry's chain?
    fn takes(&self, unit: UnitKind) -> bool {
        self.range_end.is_none() && self.deepest().is_some_and(|d| unit.depth() > d.depth())
    }

    fn push(&mut self, link: Link, span: Span) {
        self.links.push(link);
        self.span = self.span.cover(span);
    }
}

/// The link a bare enumerator continues, and the enumerator read in that
/// link's format.
///
/// The deepest link written with the same brackets wins; failing that, the
/// deepest link whose format reads the enumerator at all.
fn sibling(links: &[Link], core: &str, decoration: Decoration) -> Option<(usize, Enumerator)> {
    let bracketed = decoration != Decoration::Plain;
    for same_decoration in [true, false] {
        for (index, link) in links.iter().enumerate().rev() {
            if same_decoration && link.decoration != decoration {
                continue;
            }
            if let Some(e) = Enumerator::parse(core, link.enumerator.kind(), bracketed) {
                return Some((index, e));
            }
        }
    }
    None
}

/// The unit a bracketed enumerator glued to `parent` stands for.
fn compact_child(parent: UnitKind, core: &str) -> Option<Link> {
    parent.compact_children().iter().find_map(|(unit, kinds)| {
        kinds.iter().find_map(|&kind| {
            Enumerator::parse(core, kind, true).map(|enumerator| Link {
                unit: *unit,
                enumerator,
                decoration: Decoration::Bracketed,
            })
        })
    })
}

/// Resolves runs produced with one grammar table.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'g> {
    table: &'g GrammarTable,
}

impl<'g> Resolver<'g> {
    pub fn new(table: &'g GrammarTable) -> Self {
        Self { table }
    }

    /// Resolve every citation of `run`, in text order. `text` is the text the
    /// run's spans point into.
    pub fn resolve_run(
        &self,
        text: &str,
        run: &Run,
        ctx: &mut ReferenceContext,
    ) -> Vec<Result<ResolvedReference, ResolveError>> {
        let entries = self.entries(run);
        trace!(entries = entries.len(), bound = run.is_bound(), "resolving run");
        entries
            .into_iter()
            .map(|entry| resolve_entry(text, entry, ctx))
            .collect()
    }

    fn entries(&self, run: &Run) -> Vec<Entry> {
        let mut entries: Vec<Entry> = Vec::new();
        let mut parents: Vec<usize> = Vec::new();
        let mut connector: Option<ConnectorKind> = None;
        // Entries from this index on follow a leading "dessen".
        let mut bound_from: Option<usize> = None;

        for (i, token) in run.tokens.iter().enumerate() {
            match token {
                Token::Connector { kind, span } if kind.binds() => {
                    if matches!(run.tokens.get(i + 1), Some(Token::Unit(_))) {
                        if bound_from.is_none() {
                            bound_from = Some(entries.len());
                        }
                        continue;
                    }
                    // "thereof" governs the citations before it, back to one
                    // that names its own document.
                    let from = entries
                        .iter()
                        .rposition(|e| e.document.is_some())
                        .map_or(0, |k| k + 1);
                    for entry in &mut entries[from..] {
                        entry.bound = true;
                    }
                    let trailing = run.tokens[i + 1..].iter().all(|t| t.connector().is_some());
                    if let Some(last) = entries.last_mut().filter(|_| trailing) {
                        last.span = last.span.cover(*span);
                    }
                }
                Token::Connector { kind, .. } => connector = Some(*kind),
                Token::Unit(m) => {
                    let link = Link {
                        unit: m.unit,
                        enumerator: m.enumerator.clone(),
                        decoration: m.decoration,
                    };
                    let joins = match connector.take() {
                        None => true,
                        Some(ConnectorKind::Comma) => self.table.comma_joins_chain(),
                        Some(ConnectorKind::Range) => {
                            let last = entries.last_mut().filter(|e| {
                                e.range_end.is_none() && e.deepest() == Some(m.unit)
                            });
                            if let Some(last) = last {
                                last.range_end = Some(link.enumerator);
                                last.span = last.span.cover(m.span);
                                continue;
                            }
                            false
                        }
                        Some(ConnectorKind::Of) if !entries.is_empty() => {
                            let mut entry = Entry::new(link, m.span);
                            entry.ancestor = true;
                            entries.push(entry);
                            parents.push(entries.len() - 1);
                            continue;
                        }
                        Some(_) => false,
                    };
                    match entries.last_mut() {
                        Some(last) if joins && last.takes(m.unit) => last.push(link, m.span),
                        _ => entries.push(Entry::new(link, m.span)),
                    }
                }
                Token::Bare {
                    core,
                    decoration,
                    span,
                    glued,
                } => {
                    let Some(last) = entries.last_mut() else {
                        continue;
                    };
                    if *glued {
                        let child = last
                            .deepest()
                            .filter(|_| last.range_end.is_none())
                            .and_then(|parent| compact_child(parent, core));
                        match child {
                            Some(child) => last.push(child, *span),
                            None => trace!(
                                core = core.as_str(),
                                range = last.range_end.is_some(),
                                "glued enumerator extends nothing"
                            ),
                        }
                        continue;
                    }
                    let Some((index, enumerator)) = sibling(&last.links, core, *decoration) else {
                        trace!(core = core.as_str(), "bare enumerator fits no link");
                        continue;
                    };
                    match connector.take() {
                        Some(ConnectorKind::Range) if last.range_end.is_none() => {
                            last.links.truncate(index + 1);
                            last.range_end = Some(enumerator);
                            last.span = last.span.cover(*span);
                        }
                        _ => {
                            let mut links = last.links[..index].to_vec();
                            links.push(Link {
                                unit: last.links[index].unit,
                                enumerator,
                                decoration: *decoration,
                            });
                            let bound = last.bound;
                            entries.push(Entry {
                                links,
                                range_end: None,
                                span: *span,
                                document: None,
                                ancestor: false,
                                bound,
                            });
                        }
                    }
                }
                Token::Document { document_ref, span } => {
                    let listed = matches!(
                        connector.take(),
                        Some(ConnectorKind::And | ConnectorKind::Comma)
                    );
                    match entries.last_mut() {
                        Some(last) if !listed => {
                            last.span = last.span.cover(*span);
                            for entry in entries.iter_mut().filter(|e| e.document.is_none()) {
                                entry.document = Some(document_ref.clone());
                            }
                        }
                        _ => entries.push(Entry::document(document_ref.clone(), *span)),
                    }
                }
            }
        }

        if let Some(from) = bound_from {
            for entry in entries.iter_mut().skip(from) {
                entry.bound = true;
            }
        }
        for parent in parents {
            let upper = entries[parent].links.clone();
            let Some(floor) = upper.last().map(|l| l.unit.depth()) else {
                continue;
            };
            for entry in &mut entries[..parent] {
                if entry.top().is_some_and(|top| top.depth() > floor) {
                    let mut links = upper.clone();
                    links.append(&mut entry.links);
                    entry.links = links;
                }
            }
        }
        entries
    }
}

fn resolve_entry(
    text: &str,
    entry: Entry,
    ctx: &mut ReferenceContext,
) -> Result<ResolvedReference, ResolveError> {
    let display_text = entry.span.slice(text).to_string();
    let unresolved = || ResolveError::UnresolvedContext {
        text: display_text.clone(),
        span: entry.span,
    };

    let mut locator = match entry.top() {
        Some(top) if top.needs_leaf() => ctx
            .last_full_locator
            .as_ref()
            .map(|last| last.above(top))
            .ok_or_else(unresolved)?,
        _ => Locator::default(),
    };
    if entry.bound && locator.document_ref.is_none() {
        locator.document_ref = ctx.current_document().map(str::to_string);
    }
    for link in &entry.links {
        locator.set(link.unit, link.enumerator.clone());
    }
    if let Some(doc) = &entry.document {
        locator.document_ref = Some(doc.clone());
    }
    if !locator.is_well_formed() {
        return Err(unresolved());
    }

    let range_end = entry
        .range_end
        .as_ref()
        .map(|enumerator| locator.with_deepest(enumerator.clone()));

    let explicit_document = entry.document.is_some();
    if !entry.ancestor {
        ctx.record(&locator, explicit_document);
    } else if explicit_document {
        ctx.last_document_ref = locator.document_ref.clone();
    }

    Ok(ResolvedReference {
        locator,
        range_end,
        span: entry.span,
        display_text,
        cited_unit: entry.top(),
    })
}
