use std::borrow::Cow;

use lexref_core::{AnchorError, AnchorResult, Locator, UnitKind, build_anchor};
use lexref_grammar::{ConnectorKind, GrammarSpec, GrammarTable, Language, Matcher};
use serde::Serialize;
use tracing::{debug, error, trace};

use crate::config::{OutputMode, ReflectorConfig};
use crate::context::ReferenceContext;
use crate::error::ReflectError;
use crate::markup;
use crate::render::{Link, render};
use crate::resolver::{ResolvedReference, Resolver};

/// A resolved citation with its anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnchoredReference {
    #[serde(flatten)]
    pub reference: ResolvedReference,
    pub anchor: AnchorResult,
    /// One anchor per member; a plain citation has one member, itself.
    #[serde(skip_serializing_if = "single")]
    pub members: Vec<AnchorResult>,
    /// Found inside an existing link, so never wrapped again.
    pub linked: bool,
}

fn single(members: &[AnchorResult]) -> bool {
    members.len() <= 1
}

impl AnchoredReference {
    fn new(reference: ResolvedReference, linked: bool) -> Result<Self, AnchorError> {
        let anchor = build_anchor(&reference.locator)?;
        let members = if reference.is_range() {
            reference
                .members()
                .iter()
                .map(build_anchor)
                .collect::<Result<Vec<_>, _>>()?
        } else {
            vec![anchor.clone()]
        };
        Ok(Self {
            reference,
            anchor,
            members,
            linked,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Reflection {
    Markup(String),
    Locators(Vec<AnchoredReference>),
}

impl Reflection {
    pub fn as_markup(&self) -> Option<&str> {
        match self {
            Self::Markup(text) => Some(text),
            Self::Locators(_) => None,
        }
    }

    pub fn as_locators(&self) -> Option<&[AnchoredReference]> {
        match self {
            Self::Markup(_) => None,
            Self::Locators(refs) => Some(refs),
        }
    }
}

/// Finds and links citations in one language.
///
/// A reflector holds no per-text state: every call starts from a fresh
/// [`ReferenceContext`], seeded with the container if one is set, so one
/// instance can serve any number of threads.
#[derive(Debug, Clone)]
pub struct Reflector {
    table: Cow<'static, GrammarTable>,
    mode: OutputMode,
    document: Option<String>,
    domain: String,
    container: Option<Locator>,
    min_unit: Option<UnitKind>,
    join_nested: bool,
}

impl Reflector {
    /// Build a reflector from a language code (`EN`, `DE`, `ES`) and an
    /// output mode (`markup`, `locators`).
    pub fn new(language_code: &str, output_mode: &str) -> Result<Self, ReflectError> {
        let language: Language = language_code
            .parse()
            .map_err(|_| ReflectError::UnsupportedLanguage(language_code.to_string()))?;
        Ok(Self::with_language(language, output_mode.parse()?))
    }

    pub fn with_language(language: Language, mode: OutputMode) -> Self {
        Self::with_table(Cow::Borrowed(GrammarTable::builtin(language)), mode)
    }

    /// Use a grammar supplied by the caller instead of a built-in one.
    pub fn with_grammar(spec: GrammarSpec, mode: OutputMode) -> Result<Self, ReflectError> {
        Ok(Self::with_table(Cow::Owned(GrammarTable::compile(spec)?), mode))
    }

    fn with_table(table: Cow<'static, GrammarTable>, mode: OutputMode) -> Self {
        Self {
            table,
            mode,
            document: None,
            domain: String::new(),
            container: None,
            min_unit: None,
            join_nested: false,
        }
    }

    pub fn from_config(config: &ReflectorConfig) -> Result<Self, ReflectError> {
        let mut reflector = Self::new(&config.language, &config.mode)?;
        reflector.document = config.document.clone();
        reflector.domain = config.domain.clone();
        reflector.min_unit = config.min_unit;
        reflector.join_nested = config.join_nested;
        match &config.container {
            Some(citation) => reflector.with_container_citation(citation),
            None => Ok(reflector),
        }
    }

    /// Document assumed for citations that name none.
    pub fn with_document(mut self, document_ref: impl Into<String>) -> Self {
        self.document = Some(document_ref.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// The provision the text sits in. Elliptical citations resolve against
    /// it until the text cites something else.
    pub fn with_container(mut self, container: Locator) -> Self {
        self.container = Some(container);
        self
    }

    /// [`Reflector::with_container`], with the container given as a citation
    /// in this reflector's language ("Article 5", "Artikel 5 Absatz 2").
    pub fn with_container_citation(self, citation: &str) -> Result<Self, ReflectError> {
        let container = self
            .analyse(citation, &mut ReferenceContext::new())
            .into_iter()
            .next()
            .map(|r| r.reference.locator)
            .ok_or_else(|| ReflectError::InvalidContainer(citation.to_string()))?;
        Ok(self.with_container(container))
    }

    /// Drop citations that spell out nothing at or above `unit`: with
    /// `Article`, "Article 5(2)" is kept and a later "paragraph 3" is not.
    /// Dropped citations still feed the context.
    pub fn with_min_unit(mut self, unit: UnitKind) -> Self {
        self.min_unit = Some(unit);
        self
    }

    /// Merge neighbouring citations where one contains the other, so that
    /// "point (a) of paragraph 1 of Article 2" becomes a single link to the
    /// innermost provision.
    pub fn with_join_nested(mut self, join: bool) -> Self {
        self.join_nested = join;
        self
    }

    pub fn language(&self) -> Language {
        self.table.language()
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Process one text in the configured mode.
    pub fn reflect(&self, text: &str) -> Reflection {
        let mut ctx = self.context();
        self.reflect_with(text, &mut ctx)
    }

    /// Process consecutive passages of one text. Citations in a passage may
    /// refer back to citations in earlier ones.
    pub fn reflect_passages<S: AsRef<str>>(&self, passages: &[S]) -> Vec<Reflection> {
        let mut ctx = self.context();
        passages
            .iter()
            .map(|passage| self.reflect_with(passage.as_ref(), &mut ctx))
            .collect()
    }

    /// Resolved citations of `text`, whatever the configured mode.
    pub fn locators(&self, text: &str) -> Vec<AnchoredReference> {
        let refs = self.analyse(text, &mut self.context());
        self.refine(text, refs)
    }

    /// `text` with its citations linked, whatever the configured mode.
    pub fn markup(&self, text: &str) -> String {
        let refs = self.locators(text);
        self.render(text, &refs)
    }

    fn context(&self) -> ReferenceContext {
        self.container
            .clone()
            .map_or_else(ReferenceContext::new, ReferenceContext::within)
    }

    fn reflect_with(&self, text: &str, ctx: &mut ReferenceContext) -> Reflection {
        let refs = self.analyse(text, ctx);
        let refs = self.refine(text, refs);
        match self.mode {
            OutputMode::Markup => Reflection::Markup(self.render(text, &refs)),
            OutputMode::Locators => Reflection::Locators(refs),
        }
    }

    fn analyse(&self, text: &str, ctx: &mut ReferenceContext) -> Vec<AnchoredReference> {
        let matcher = Matcher::new(&self.table);
        let resolver = Resolver::new(&self.table);
        let mut out = Vec::new();
        for segment in markup::segments(text) {
            let slice = segment.span.slice(text);
            for run in matcher.runs(slice) {
                for result in resolver.resolve_run(slice, &run, ctx) {
                    let mut reference = match result {
                        Ok(reference) => reference,
                        Err(err) => {
                            debug!(%err, "citation left unlinked");
                            continue;
                        }
                    };
                    reference.span = reference.span.shift(segment.span.start);
                    self.assume_document(&mut reference);
                    match AnchoredReference::new(reference, segment.linked) {
                        Ok(anchored) => {
                            trace!(anchor = %anchored.anchor.anchor_id, text = %anchored.reference.display_text, "resolved");
                            out.push(anchored);
                        }
                        Err(err) => error!(%err, "resolver produced an unusable locator"),
                    }
                }
            }
        }
        out
    }

    /// Apply the unit filter, then join nested neighbours.
    fn refine(&self, text: &str, refs: Vec<AnchoredReference>) -> Vec<AnchoredReference> {
        let kept = refs.into_iter().filter(|r| {
            self.min_unit.is_none_or(|min| {
                r.reference.cited_unit.is_none_or(|unit| unit.depth() <= min.depth())
            })
        });
        if !self.join_nested {
            return kept.collect();
        }
        let mut out: Vec<AnchoredReference> = Vec::new();
        for next in kept {
            match out.last_mut() {
                Some(prev) if self.nested_neighbours(text, prev, &next) => join(text, prev, next),
                _ => out.push(next),
            }
        }
        out
    }

    /// Separated by nothing but space or an "of" word, not ranges, and one
    /// containing the other.
    fn nested_neighbours(&self, text: &str, a: &AnchoredReference, b: &AnchoredReference) -> bool {
        if a.linked != b.linked || a.reference.is_range() || b.reference.is_range() {
            return false;
        }
        let Some(gap) = text.get(a.reference.span.end..b.reference.span.start) else {
            return false;
        };
        let gap = gap.trim();
        let adjacent = gap.is_empty() || self.table.connector_kind(gap) == Some(ConnectorKind::Of);
        let (x, y) = (&a.reference.locator, &b.reference.locator);
        adjacent && (encloses(x, y) || encloses(y, x))
    }

    fn assume_document(&self, reference: &mut ResolvedReference) {
        let Some(doc) = &self.document else {
            return;
        };
        let locators = std::iter::once(&mut reference.locator).chain(reference.range_end.as_mut());
        for locator in locators {
            if locator.document_ref.is_none() {
                locator.document_ref = Some(doc.clone());
            }
        }
    }

    fn render(&self, text: &str, refs: &[AnchoredReference]) -> String {
        let links: Vec<Link> = refs
            .iter()
            .filter(|r| !r.linked)
            .map(|r| Link {
                span: r.reference.span,
                href: r.anchor.href(&self.domain),
                range_end: r
                    .reference
                    .is_range()
                    .then(|| r.members.last())
                    .flatten()
                    .map(|last| last.href(&self.domain)),
            })
            .collect();
        render(text, &links)
    }
}

fn encloses(outer: &Locator, inner: &Locator) -> bool {
    outer.units().all(|(unit, e)| inner.get(unit) == Some(e))
        && (outer.document_ref.is_none() || outer.document_ref == inner.document_ref)
}

/// Merge `next` into `prev`: the span covers both and the innermost
/// provision is the target.
fn join(text: &str, prev: &mut AnchoredReference, next: AnchoredReference) {
    let span = prev.reference.span.cover(next.reference.span);
    let cited_unit = match (prev.reference.cited_unit, next.reference.cited_unit) {
        (Some(a), Some(b)) => Some(if a.depth() <= b.depth() { a } else { b }),
        (a, b) => a.or(b),
    };
    if encloses(&prev.reference.locator, &next.reference.locator) {
        *prev = next;
    }
    prev.reference.span = span;
    prev.reference.display_text = span.slice(text).to_string();
    prev.reference.cited_unit = cited_unit;
}
