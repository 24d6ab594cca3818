use lexref_core::Locator;

/// State carried from one citation to the next within a single reflector
/// call. Elliptical citations ("paragraph 2", "Article 12 thereof") borrow
/// their missing upper units from it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceContext {
    pub last_document_ref: Option<String>,
    pub last_full_locator: Option<Locator>,
}

impl ReferenceContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context for text known to sit inside `container`, e.g. the body of
    /// Article 5, where "paragraph 2" means Article 5(2) from the start.
    pub fn within(container: Locator) -> Self {
        Self {
            last_document_ref: container.document_ref.clone(),
            last_full_locator: container.has_units().then_some(container),
        }
    }

    /// Record a resolved citation. Units replace the last locator; an
    /// explicitly named document replaces the last document.
    pub fn record(&mut self, locator: &Locator, explicit_document: bool) {
        if locator.has_units() {
            self.last_full_locator = Some(locator.clone());
        }
        if explicit_document {
            if let Some(doc) = &locator.document_ref {
                self.last_document_ref = Some(doc.clone());
            }
        }
    }

    /// Document for a citation bound to earlier text: the one of the last
    /// locator, else the last document named on its own.
    pub fn current_document(&self) -> Option<&str> {
        self.last_full_locator
            .as_ref()
            .and_then(|l| l.document_ref.as_deref())
            .or(self.last_document_ref.as_deref())
    }
}
