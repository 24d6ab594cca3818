pub mod anchor;
pub mod celex;
pub mod locator;
pub mod sort_key;

pub use anchor::{AnchorError, AnchorResult, build_anchor};
pub use celex::ActKind;
pub use locator::{Decoration, Enumerator, EnumeratorKind, Locator, Span, UnitKind, UnknownUnit};
pub use sort_key::enumerator_sort_key;
