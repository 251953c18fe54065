//! Remote named-entity classifier adapter.
//!
//! The classifier itself is a black box reachable through [`InferenceBackend`].
//! [`ClassifierAdapter`] recases the text for the model, calls the backend,
//! accepts any of the three response shapes the service produces, and turns
//! raw records into [`EntitySpan`]s over the *original* text.

use std::time::{Duration, Instant};

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, info, warn};

use anonyx_common::casing::is_alnum;
use anonyx_common::{AnonyxError, Category, EntitySpan, Result, SpanSource};
use anonyx_config::ClassifierConfig;

use crate::normalize::preprocess;
use crate::offsets::CharOffsets;

// ── Backend ──────────────────────────────────────────────────────────────────

/// Raw classifier boundary: text in, service JSON out.
pub trait InferenceBackend: Send + Sync {
    fn infer(&self, text: &str) -> Result<Value>;
    fn model_id(&self) -> &str;
}

impl<B: InferenceBackend + ?Sized> InferenceBackend for Box<B> {
    fn infer(&self, text: &str) -> Result<Value> { (**self).infer(text) }
    fn model_id(&self) -> &str { (**self).model_id() }
}

/// Hugging Face style token-classification endpoint.
///
/// POSTs `{"inputs": <text>}` with a bearer token. Blocks until the response
/// arrives or the timeout elapses. Never retries.
pub struct HfInferenceBackend {
    endpoint: String,
    model_id: String,
    token: SecretString,
    client: reqwest::blocking::Client,
}

impl HfInferenceBackend {
    pub fn new(
        endpoint: impl Into<String>,
        model_id: impl Into<String>,
        token: SecretString,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AnonyxError::Config(format!("HTTP client: {e}")))?;
        Ok(Self {
            endpoint: endpoint.into(),
            model_id: model_id.into(),
            token,
            client,
        })
    }

    /// Build from config; fails with a configuration error if the token is missing.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self> {
        let token = config.resolve_token()?;
        Self::new(
            config.endpoint(),
            config.model_id.clone(),
            token,
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn endpoint(&self) -> &str { &self.endpoint }
}

impl InferenceBackend for HfInferenceBackend {
    fn infer(&self, text: &str) -> Result<Value> {
        let resp = self.client
            .post(&self.endpoint)
            .bearer_auth(self.token.expose_secret())
            .json(&serde_json::json!({ "inputs": text }))
            .send()?;

        let status = resp.status();
        let body = resp.text()?;
        if !status.is_success() {
            return Err(AnonyxError::ServiceStatus {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }
        serde_json::from_str(&body)
            .map_err(|e| AnonyxError::Adapter(format!("response body is not JSON: {e}")))
    }

    fn model_id(&self) -> &str { &self.model_id }
}

/// The service's error text if the body carries one, else the (truncated) body.
fn error_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let from_json = parsed.as_ref().and_then(|json| {
        json["error"].as_str()
            .or_else(|| json["error"]["message"].as_str())
            .or_else(|| json["message"].as_str())
            .map(str::to_string)
    });
    from_json.unwrap_or_else(|| body.chars().take(200).collect())
}

// ── Response shapes ──────────────────────────────────────────────────────────

/// Flatten any accepted response shape into its list of entity records.
///
/// Accepted: a flat list of records, a list whose first element is itself
/// the record list, or an object with an `entities` list.
pub fn response_records(response: Value) -> Result<Vec<Value>> {
    match response {
        Value::Array(mut items) => {
            if matches!(items.first(), Some(Value::Array(_))) {
                if let Value::Array(inner) = items.swap_remove(0) {
                    return Ok(inner);
                }
            }
            Ok(items)
        }
        Value::Object(mut map) => match map.remove("entities") {
            Some(Value::Array(entities)) => Ok(entities),
            Some(other) => Err(AnonyxError::Adapter(format!(
                "`entities` is {}, expected a list",
                json_type(&other)
            ))),
            None => Err(AnonyxError::Adapter("object response without an `entities` field".to_string())),
        },
        other => Err(AnonyxError::Adapter(format!(
            "expected a list or an object, got {}",
            json_type(&other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Strip a BIO-style prefix: `B-PER` → `PER`, `I-LOC` → `LOC`, `ORG` → `ORG`.
pub fn bare_label(label: &str) -> &str {
    label.rsplit('-').next().unwrap_or(label)
}

/// Words that are too short or carry punctuation are fragments.
pub fn is_fragment(surface: &str) -> bool {
    surface.chars().count() < 2 || !is_alnum(&surface.replace('-', ""))
}

// ── Adapter ──────────────────────────────────────────────────────────────────

/// Turns classifier output into spans over the original text.
pub struct ClassifierAdapter<B> {
    backend: B,
}

impl<B: InferenceBackend> ClassifierAdapter<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B { &self.backend }

    /// Classify `text`. Spans carry no replacement yet.
    pub fn classify(&self, text: &str) -> Result<Vec<EntitySpan>> {
        let start = Instant::now();
        let prepared = preprocess(text);
        let response = self.backend.infer(&prepared)?;
        let records = response_records(response)?;

        let offsets = CharOffsets::new(text);
        let spans: Vec<EntitySpan> = records
            .iter()
            .filter_map(|record| to_span(record, text, &offsets))
            .collect();

        info!(
            model = self.backend.model_id(),
            n_records = records.len(),
            n_entities = spans.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Classifier call complete"
        );
        Ok(spans)
    }
}

fn to_span(record: &Value, text: &str, offsets: &CharOffsets) -> Option<EntitySpan> {
    let Some(fields) = record.as_object() else {
        debug!("Skipping non-object classifier record");
        return None;
    };

    let label = ["entity_group", "label", "entity"]
        .iter()
        .find_map(|key| fields.get(*key).and_then(Value::as_str))
        .unwrap_or_default();
    let label = bare_label(label);
    let category = match Category::from_label(label) {
        c @ (Category::Person | Category::Organization | Category::Location | Category::Misc) => c,
        _ => Category::Unknown,
    };

    let bound = |key: &str| fields.get(key).and_then(Value::as_u64).map(|v| v as usize);
    let (Some(char_start), Some(char_end)) = (bound("start"), bound("end")) else {
        warn!(label, "Classifier record without start/end offsets, discarded");
        return None;
    };
    let Some((start, end)) = offsets.byte_span(char_start, char_end) else {
        warn!(label, char_start, char_end, "Classifier span outside the text, discarded");
        return None;
    };

    let span = EntitySpan::detect(category, label, text, start, end, SpanSource::Classifier)?
        .with_score(fields.get("score").and_then(Value::as_f64).map(|s| s as f32));

    // multi-word surfaces are split per word by the resolver
    if span.surface().split_whitespace().all(is_fragment) {
        debug!(surface = span.surface(), label, "Fragment span discarded");
        return None;
    }
    Some(span)
}
