//! Entity spans and the per-request anonymization result.
//! Offsets are byte offsets into the (normalized) input text.

use serde::{Deserialize, Serialize};

use crate::casing::CasingShape;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Person,
    Organization,
    Location,
    Misc,
    Email,
    Phone,
    Unknown,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Person       => "PERSON",
            Category::Organization => "ORGANIZATION",
            Category::Location     => "LOCATION",
            Category::Misc         => "MISC",
            Category::Email        => "EMAIL",
            Category::Phone        => "PHONE",
            Category::Unknown      => "UNKNOWN",
        }
    }

    /// Map a bare classifier label (BIO prefix already stripped) to a category.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "PER" | "PERSON"       => Category::Person,
            "ORG" | "ORGANIZATION" => Category::Organization,
            "LOC" | "LOCATION"     => Category::Location,
            "MISC"                 => Category::Misc,
            "EMAIL"                => Category::Email,
            "PHONE"                => Category::Phone,
            _                      => Category::Unknown,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntitySpan
// ---------------------------------------------------------------------------

/// Where a span came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanSource {
    /// The remote named-entity classifier.
    Classifier,
    /// A local regex detector (email, phone).
    Pattern,
}

/// A detected entity. Spans are never edited in place: moving the bounds or
/// assigning a replacement yields a new span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpan {
    category: Category,
    label: String,
    start: usize,
    end: usize,
    surface: String,
    replacement: Option<String>,
    score: Option<f32>,
    source: SpanSource,
}

impl EntitySpan {
    /// Build a span over `text[start..end]`.
    ///
    /// Returns `None` unless `start < end <= text.len()` and both offsets
    /// sit on UTF-8 character boundaries.
    pub fn detect(
        category: Category,
        label: impl Into<String>,
        text: &str,
        start: usize,
        end: usize,
        source: SpanSource,
    ) -> Option<Self> {
        let surface = text.get(start..end).filter(|s| !s.is_empty())?;
        Some(Self {
            category,
            label: label.into(),
            start,
            end,
            surface: surface.to_string(),
            replacement: None,
            score: None,
            source,
        })
    }

    pub fn with_score(self, score: Option<f32>) -> Self {
        Self { score, ..self }
    }

    pub fn with_replacement(self, replacement: impl Into<String>) -> Self {
        Self { replacement: Some(replacement.into()), ..self }
    }

    /// A copy of this span moved to `text[start..end]`, surface re-sliced.
    pub fn rebound(&self, text: &str, start: usize, end: usize) -> Option<Self> {
        let surface = text.get(start..end).filter(|s| !s.is_empty())?;
        Some(Self {
            start,
            end,
            surface: surface.to_string(),
            ..self.clone()
        })
    }

    pub fn category(&self) -> Category { self.category }
    pub fn label(&self) -> &str { &self.label }
    pub fn start(&self) -> usize { self.start }
    pub fn end(&self) -> usize { self.end }
    pub fn surface(&self) -> &str { &self.surface }
    pub fn replacement(&self) -> Option<&str> { self.replacement.as_deref() }
    pub fn score(&self) -> Option<f32> { self.score }
    pub fn source(&self) -> SpanSource { self.source }

    /// One child span per whitespace-separated word of the surface, each
    /// keeping this span's category, label, score, and replacement.
    pub fn words(&self) -> Vec<EntitySpan> {
        let mut words = Vec::new();
        let mut word_start: Option<usize> = None;
        let boundaries = self.surface.char_indices().chain(std::iter::once((self.surface.len(), ' ')));
        for (idx, ch) in boundaries {
            match (ch.is_whitespace(), word_start) {
                (true, Some(from)) => {
                    words.push(Self {
                        start: self.start + from,
                        end: self.start + idx,
                        surface: self.surface[from..idx].to_string(),
                        ..self.clone()
                    });
                    word_start = None;
                }
                (false, None) => word_start = Some(idx),
                _ => {}
            }
        }
        words
    }

    /// Surface length in characters.
    pub fn char_len(&self) -> usize {
        self.surface.chars().count()
    }

    /// Whether `other` lies entirely within this span.
    pub fn contains(&self, other: &EntitySpan) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Half-open overlap test.
    pub fn overlaps(&self, other: &EntitySpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// A span in the final report, flagged with whether it was rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportedEntity {
    pub span: EntitySpan,
    pub applied: bool,
}

impl ReportedEntity {
    /// One human-readable report line, with a casing note for person spans.
    pub fn describe(&self) -> String {
        let span = &self.span;
        let case_info = match span.category() {
            Category::Person => CasingShape::of(span.surface())
                .annotation()
                .map(|a| format!(" ({a})"))
                .unwrap_or_default(),
            _ => String::new(),
        };
        format!(
            "Text: '{}' -> Label: {}{} -> Replacement: {}",
            span.surface(),
            span.category(),
            case_info,
            span.replacement().unwrap_or("[UNKNOWN]"),
        )
    }
}

/// Output of one anonymization request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnonymizationResult {
    /// The rewritten text.
    pub text: String,
    /// Every resolved span, ascending by start offset.
    pub entities: Vec<ReportedEntity>,
    /// Set when the input was empty or whitespace-only and nothing ran.
    pub empty_input: bool,
}

impl AnonymizationResult {
    /// The "nothing to do" result for blank input.
    pub fn empty(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            entities: Vec::new(),
            empty_input: true,
        }
    }

    pub fn applied_spans(&self) -> impl Iterator<Item = &EntitySpan> {
        self.entities.iter().filter(|e| e.applied).map(|e| &e.span)
    }
}
