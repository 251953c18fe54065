//! anonyx-common — Shared types, errors, and the placeholder table used across all anonyx crates.

pub mod error;
pub mod casing;
pub mod entities;
pub mod replacement;

// Re-export commonly used types
pub use casing::CasingShape;
pub use entities::{AnonymizationResult, Category, EntitySpan, ReportedEntity, SpanSource};
pub use error::{AnonyxError, Result};
pub use replacement::ReplacementTable;
