//! Entity resolution and rewriting.
//!
//! Classifier spans get a placeholder from [`placeholder_for`], are split
//! into one span per word, and each word is widened to the whole token;
//! pattern spans are applied exactly as matched and take precedence over
//! any classifier word they overlap.
//! Rewriting runs right to left over the text so every pending span's
//! offsets stay valid, and a span is applied only if it ends at or before
//! the start of the previously applied one.

use std::cmp::Ordering;

use tracing::{debug, info};

use anonyx_common::casing::is_alnum;
use anonyx_common::replacement::UNKNOWN_PLACEHOLDER;
use anonyx_common::{AnonymizationResult, Category, EntitySpan, ReportedEntity, SpanSource};
use anonyx_config::ResolverSection;

use crate::classifier::is_fragment;
use crate::heuristics::placeholder_for;

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Drop PHONE spans that repeat or sit inside another PHONE span.
    pub dedupe_phone_spans: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self { dedupe_phone_spans: true }
    }
}

impl From<&ResolverSection> for ResolverConfig {
    fn from(section: &ResolverSection) -> Self {
        Self { dedupe_phone_spans: section.dedupe_phone_spans }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Resolver {
    config: ResolverConfig,
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig { &self.config }

    /// Merge both span sources into one list with replacements assigned.
    ///
    /// The placeholder is chosen from the full classifier surface
    /// ("JOHN SMITH"), then the span is split into words that each carry
    /// it. Fragment words and words overlapping a pattern span are dropped.
    /// Pattern spans keep the placeholder their detector gave them.
    pub fn prepare(&self, classifier: Vec<EntitySpan>, local: Vec<EntitySpan>) -> Vec<EntitySpan> {
        let local = if self.config.dedupe_phone_spans { dedupe_phones(local) } else { local };
        let detected: Vec<EntitySpan> = local
            .into_iter()
            .map(|span| match span.replacement() {
                Some(_) => span,
                None => {
                    let placeholder = placeholder_for(span.category(), span.surface());
                    span.with_replacement(placeholder)
                }
            })
            .collect();

        let classified = classifier
            .into_iter()
            .flat_map(|span| {
                let placeholder = placeholder_for(span.category(), span.surface());
                span.with_replacement(placeholder).words()
            })
            .filter(|word| !is_fragment(word.surface()))
            .filter(|word| match detected.iter().find(|p| p.overlaps(word)) {
                Some(pattern) => {
                    debug!(
                        surface = word.surface(),
                        pattern = pattern.surface(),
                        "Classifier word inside a pattern match, dropped"
                    );
                    false
                }
                None => true,
            });
        let mut merged: Vec<EntitySpan> = classified.collect();
        merged.extend(detected);
        merged
    }

    /// Rewrite `text`, replacing every accepted span with its placeholder.
    pub fn resolve(
        &self,
        text: &str,
        classifier: Vec<EntitySpan>,
        local: Vec<EntitySpan>,
    ) -> AnonymizationResult {
        let mut spans = self.prepare(classifier, local);
        spans.sort_by(rewrite_order);

        let mut output = text.to_string();
        let mut floor = text.len();
        let mut entities = Vec::with_capacity(spans.len());

        for span in spans {
            let target = match span.source() {
                SpanSource::Classifier => whole_word(text, &span),
                SpanSource::Pattern => Some(span.clone()),
            };
            let Some(target) = target else {
                debug!(surface = span.surface(), "Span does not cover a whole word, left in place");
                entities.push(ReportedEntity { span, applied: false });
                continue;
            };
            if target.end() > floor {
                debug!(
                    surface = target.surface(),
                    start = target.start(),
                    end = target.end(),
                    "Span overlaps an applied replacement, left in place"
                );
                entities.push(ReportedEntity { span: target, applied: false });
                continue;
            }
            output.replace_range(
                target.start()..target.end(),
                target.replacement().unwrap_or(UNKNOWN_PLACEHOLDER),
            );
            floor = target.start();
            entities.push(ReportedEntity { span: target, applied: true });
        }

        entities.sort_by_key(|e| (e.span.start(), e.span.end()));
        info!(
            n_entities = entities.len(),
            n_applied = entities.iter().filter(|e| e.applied).count(),
            "Resolved entities"
        );
        AnonymizationResult { text: output, entities, empty_input: false }
    }
}

/// Start descending, then wider first.
fn rewrite_order(a: &EntitySpan, b: &EntitySpan) -> Ordering {
    b.start().cmp(&a.start()).then(b.end().cmp(&a.end()))
}

/// Widen `span` to the maximal alphanumeric run around it.
///
/// `None` if the widened slice is not a single alphanumeric word of at
/// least two characters.
fn whole_word(text: &str, span: &EntitySpan) -> Option<EntitySpan> {
    let start = text[..span.start()]
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_alphanumeric())
        .last()
        .map_or(span.start(), |(i, _)| i);
    let end = span.end()
        + text[span.end()..]
            .chars()
            .take_while(|c| c.is_alphanumeric())
            .map(char::len_utf8)
            .sum::<usize>();

    let word = &text[start..end];
    if word.chars().count() < 2 || !is_alnum(word) {
        return None;
    }
    span.rebound(text, start, end)
}

fn dedupe_phones(spans: Vec<EntitySpan>) -> Vec<EntitySpan> {
    let (mut phones, mut kept): (Vec<_>, Vec<_>) =
        spans.into_iter().partition(|s| s.category() == Category::Phone);
    // containers sort ahead of anything they contain
    phones.sort_by(|a, b| a.start().cmp(&b.start()).then(b.end().cmp(&a.end())));

    let before = phones.len();
    let mut unique: Vec<EntitySpan> = Vec::with_capacity(phones.len());
    for phone in phones {
        if !unique.iter().any(|u| u.contains(&phone)) {
            unique.push(phone);
        }
    }
    if unique.len() < before {
        debug!(dropped = before - unique.len(), "Dropped nested phone spans");
    }
    kept.extend(unique);
    kept
}
