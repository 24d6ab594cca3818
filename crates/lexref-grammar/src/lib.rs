//! Citation grammars and the pattern matcher.
//!
//! A [`GrammarSpec`] is the declarative description of how one language
//! writes citations: unit keywords with their enumerator formats, connector
//! words, spoken ordinals and document names. [`GrammarTable::compile`]
//! validates a spec and builds the match tables once; [`Matcher`] scans text
//! with a compiled table and yields [`Run`]s of raw tokens.

pub mod error;
pub mod language;
pub mod matcher;
pub mod spec;
pub mod table;
mod tables;
pub mod token;

pub use error::GrammarError;
pub use language::Language;
pub use matcher::{Matcher, Runs};
pub use spec::{ConnectorSpec, DocumentRule, GrammarSpec, OrdinalSpec, PatternRule, TreatySpec};
pub use table::GrammarTable;
pub use token::{ConnectorKind, RawMatch, Run, Token};
