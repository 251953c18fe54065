//! Local regex detectors for emails and phone numbers.
//!
//! These run independently of the remote classifier. Their spans come back
//! with the category's base placeholder already assigned; no further
//! disambiguation applies to them.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use anonyx_common::{Category, EntitySpan, ReplacementTable, SpanSource};

/// Minimum digits (separators stripped) for a phone match to count.
pub const MIN_PHONE_DIGITS: usize = 6;

/// A deterministic detector over raw text.
pub trait LocalDetector: Send + Sync {
    fn name(&self) -> &'static str;
    fn detect(&self, text: &str) -> Vec<EntitySpan>;
}

fn pattern_span(category: Category, text: &str, start: usize, end: usize) -> Option<EntitySpan> {
    EntitySpan::detect(category, category.as_str(), text, start, end, SpanSource::Pattern)
        .map(|span| span.with_replacement(ReplacementTable::global().base(category)))
}

// ── Email ────────────────────────────────────────────────────────────────────

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")
            .expect("email pattern is valid")
    })
}

/// `local@domain.tld` addresses.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmailDetector;

impl LocalDetector for EmailDetector {
    fn name(&self) -> &'static str { "email" }

    fn detect(&self, text: &str) -> Vec<EntitySpan> {
        email_regex()
            .find_iter(text)
            .filter_map(|m| pattern_span(Category::Email, text, m.start(), m.end()))
            .collect()
    }
}

// ── Phone ────────────────────────────────────────────────────────────────────

/// Strictest first: grouped North American, then progressively looser
/// international groupings down to 1–2 digit groups.
const PHONE_PATTERNS: &[&str] = &[
    r"\b(?:\+?\d{1,3}[-.]?)?\(?\d{3}\)?[-.]?\d{3}[-.]?\d{4}\b",
    r"\b(?:\+?\d{1,3}[-.]?)?\d{2,4}[-.]?\d{2,4}[-.]?\d{2,4}\b",
    r"\b(?:\+?\d{1,3}[-.]?)?\d{1,4}[-.]?\d{1,4}[-.]?\d{1,4}\b",
    r"\b(?:\+?\d{1,3}[-.]?)?\d{1,3}[-.]?\d{1,3}[-.]?\d{1,3}\b",
    r"\b(?:\+?\d{1,3}[-.]?)?\d{1,2}[-.]?\d{1,2}[-.]?\d{1,2}\b",
];

fn phone_regexes() -> &'static [Regex] {
    static RES: OnceLock<Vec<Regex>> = OnceLock::new();
    RES.get_or_init(|| {
        PHONE_PATTERNS
            .iter()
            .map(|p| Regex::new(p).expect("phone pattern is valid"))
            .collect()
    })
}

/// Digits left once `-`, `.`, and parentheses are stripped.
pub fn phone_digit_count(candidate: &str) -> usize {
    candidate
        .chars()
        .filter(|c| !matches!(c, '-' | '.' | '(' | ')'))
        .filter(|c| c.is_numeric())
        .count()
}

/// International phone numbers via a cascade of grouping patterns.
///
/// Every pattern runs over the whole text, so one number may be reported
/// several times by patterns of different looseness. Overlaps are settled
/// by the resolver.
#[derive(Debug, Default, Clone, Copy)]
pub struct PhoneDetector;

impl LocalDetector for PhoneDetector {
    fn name(&self) -> &'static str { "phone" }

    fn detect(&self, text: &str) -> Vec<EntitySpan> {
        let mut spans = Vec::new();
        for re in phone_regexes() {
            for m in re.find_iter(text) {
                if phone_digit_count(m.as_str()) < MIN_PHONE_DIGITS {
                    debug!(candidate = m.as_str(), "Phone candidate below minimum digit count");
                    continue;
                }
                if let Some(span) = pattern_span(Category::Phone, text, m.start(), m.end()) {
                    spans.push(span);
                }
            }
        }
        spans
    }
}

/// The detectors enabled by default.
pub fn default_detectors() -> Vec<Box<dyn LocalDetector>> {
    vec![Box::new(EmailDetector), Box::new(PhoneDetector)]
}
