//! The anonymization pipeline: normalize → detect → resolve → rewrite.

use std::time::Instant;

use tracing::{debug, info, instrument};

use anonyx_common::{AnonymizationResult, EntitySpan, Result};
use anonyx_config::AnonyxConfig;

use crate::classifier::{ClassifierAdapter, HfInferenceBackend, InferenceBackend};
use crate::normalize::normalize;
use crate::patterns::{EmailDetector, LocalDetector, PhoneDetector};
use crate::resolver::{Resolver, ResolverConfig};

/// Entry point for detection and anonymization.
///
/// Holds no per-request state; one instance can serve concurrent callers.
pub struct Anonymizer {
    adapter: ClassifierAdapter<Box<dyn InferenceBackend>>,
    detectors: Vec<Box<dyn LocalDetector>>,
    resolver: Resolver,
}

impl Anonymizer {
    /// Build the full pipeline from config.
    ///
    /// Fails with a configuration error if the classifier credential is
    /// missing; no request is made in that case.
    pub fn from_config(config: &AnonyxConfig) -> Result<Self> {
        let backend = HfInferenceBackend::from_config(&config.classifier)?;
        info!(model = %config.classifier.model_id, endpoint = backend.endpoint(), "Classifier configured");

        let mut detectors: Vec<Box<dyn LocalDetector>> = Vec::new();
        if config.detectors.email {
            detectors.push(Box::new(EmailDetector));
        }
        if config.detectors.phone {
            detectors.push(Box::new(PhoneDetector));
        }

        Ok(Self::with_backend(backend)
            .with_detectors(detectors)
            .with_resolver(Resolver::new(ResolverConfig::from(&config.resolver))))
    }

    /// Pipeline over an arbitrary backend, with the default detectors and resolver.
    pub fn with_backend(backend: impl InferenceBackend + 'static) -> Self {
        let backend: Box<dyn InferenceBackend> = Box::new(backend);
        Self {
            adapter: ClassifierAdapter::new(backend),
            detectors: crate::patterns::default_detectors(),
            resolver: Resolver::default(),
        }
    }

    pub fn with_detectors(mut self, detectors: Vec<Box<dyn LocalDetector>>) -> Self {
        self.detectors = detectors;
        self
    }

    pub fn with_resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn detector_names(&self) -> Vec<&'static str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    /// Every detected span with its resolved replacement, ascending by
    /// start offset. Offsets index the normalized text. Spans are reported
    /// as detected: whole-word widening and the overlap check only happen
    /// in [`Anonymizer::anonymize`].
    pub fn detect_entities(&self, text: &str) -> Result<Vec<EntitySpan>> {
        if text.trim().is_empty() {
            debug!("Blank input, nothing to detect");
            return Ok(Vec::new());
        }
        let normalized = normalize(text);
        let (classified, local) = self.collect(&normalized)?;
        let mut spans = self.resolver.prepare(classified, local);
        spans.sort_by_key(|s| (s.start(), s.end()));
        Ok(spans)
    }

    /// Replace every detected entity in `text` with its placeholder.
    ///
    /// Blank input returns the text untouched with `empty_input` set and
    /// never reaches the classifier. Any classifier failure aborts the
    /// request; partially anonymized text is never returned.
    #[instrument(skip_all, fields(len = text.len()))]
    pub fn anonymize(&self, text: &str) -> Result<AnonymizationResult> {
        if text.trim().is_empty() {
            debug!("Blank input, nothing to anonymize");
            return Ok(AnonymizationResult::empty(text));
        }

        let start = Instant::now();
        let normalized = normalize(text);
        let (classified, local) = self.collect(&normalized)?;
        let result = self.resolver.resolve(&normalized, classified, local);

        info!(
            n_applied = result.applied_spans().count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Anonymization complete"
        );
        Ok(result)
    }

    fn collect(&self, normalized: &str) -> Result<(Vec<EntitySpan>, Vec<EntitySpan>)> {
        let classified = self.adapter.classify(normalized)?;
        let local: Vec<EntitySpan> = self
            .detectors
            .iter()
            .flat_map(|d| {
                let spans = d.detect(normalized);
                debug!(detector = d.name(), n = spans.len(), "Local detector ran");
                spans
            })
            .collect();
        Ok((classified, local))
    }
}
