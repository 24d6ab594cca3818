//! Citation resolution and rendering.
//!
//! [`Reflector`] drives the pipeline over one text: markup segmentation,
//! matching with a language's grammar table, resolution of each run against
//! a call-scoped [`ReferenceContext`], anchoring and, in markup mode,
//! rendering of links around the resolved spans.

pub mod config;
pub mod context;
pub mod error;
pub mod markup;
pub mod reflector;
pub mod render;
pub mod resolver;

pub use config::{OutputMode, ReflectorConfig};
pub use context::ReferenceContext;
pub use error::{ReflectError, ResolveError};
pub use reflector::{AnchoredReference, Reflection, Reflector};
pub use resolver::{ResolvedReference, Resolver};
