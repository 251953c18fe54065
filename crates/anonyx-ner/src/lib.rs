//! Text anonymization: entity detection, disambiguation, and rewriting.
//!
//! Pipeline: normalize → {local pattern detectors, remote classifier} →
//! resolve & rewrite. [`Anonymizer`] wires the stages together and exposes
//! the two entry points, [`Anonymizer::detect_entities`] and
//! [`Anonymizer::anonymize`].
//!
//! # Example
//!
//! ```rust,no_run
//! use anonyx_config::AnonyxConfig;
//! use anonyx_ner::Anonymizer;
//!
//! fn main() -> anyhow::Result<()> {
//!     let anonymizer = Anonymizer::from_config(&AnonyxConfig::load()?)?;
//!     let result = anonymizer.anonymize("John Smith, john@example.com")?;
//!     println!("{}", result.text);
//!     Ok(())
//! }
//! ```

pub mod anonymizer;
pub mod classifier;
pub mod heuristics;
pub mod normalize;
pub mod offsets;
pub mod patterns;
pub mod resolver;

pub use anonymizer::Anonymizer;
pub use classifier::{ClassifierAdapter, HfInferenceBackend, InferenceBackend};
pub use normalize::{normalize, preprocess};
pub use patterns::{EmailDetector, LocalDetector, PhoneDetector};
pub use resolver::{Resolver, ResolverConfig};

pub use anonyx_common::{
    casing, AnonymizationResult, AnonyxError, CasingShape, Category, EntitySpan, ReportedEntity,
    Result, SpanSource,
};
