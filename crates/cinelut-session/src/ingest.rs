//! Turning service output into validated values.
//!
//! Service responses are untrusted JSON. Grades are parsed into
//! [`GradeParams`] (every numeric field required), then clamped; suggestion
//! lists are parsed into plain strings. Failures are recovered into a
//! neutral fallback grade or the fixed suggestion list, never surfaced raw.

use crate::service::ServiceError;
use crate::Language;
use cinelut_color::GradeParams;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

/// Why a response could not be used.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Not JSON, or JSON of the wrong shape.
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The service reported an error payload.
    #[error("{0}")]
    Service(String),
}

/// Parses and clamps a grade response.
///
/// `{"error": "..."}` payloads come back as [`IngestError::Service`].
pub fn parse_grade(json: &str) -> Result<GradeParams, IngestError> {
    let value: Value = serde_json::from_str(unfence(json))?;
    if let Some(msg) = error_message(&value) {
        return Err(IngestError::Service(msg));
    }

    let params: GradeParams = serde_json::from_value(value)?;
    let clamped = params.out_of_range_fields();
    if !clamped.is_empty() {
        warn!(fields = ?clamped, "clamped out-of-range grade values");
    }
    Ok(params.sanitized())
}

#[derive(Deserialize)]
struct Suggestions {
    suggestions: Vec<String>,
}

/// Parses a suggestion response, dropping blank entries.
pub fn parse_suggestions(json: &str) -> Result<Vec<String>, IngestError> {
    let value: Value = serde_json::from_str(unfence(json))?;
    if let Some(msg) = error_message(&value) {
        return Err(IngestError::Service(msg));
    }
    let parsed: Suggestions = serde_json::from_value(value)?;
    Ok(parsed
        .suggestions
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

/// Neutral grade whose description explains the failure.
pub fn fallback_params(language: Language, reason: &str) -> GradeParams {
    GradeParams::neutral_with_description(language.generation_failed(reason))
}

/// The fixed suggestion list for `language`.
pub fn fallback_suggestions(language: Language) -> Vec<String> {
    language
        .fallback_suggestions()
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// User-facing reason for a failed service call.
pub fn service_failure_reason(error: &ServiceError, language: Language) -> String {
    match error {
        ServiceError::Network(_) => language.network_error().to_string(),
        ServiceError::Status { status, body } => serde_json::from_str::<Value>(body)
            .ok()
            .as_ref()
            .and_then(error_message)
            .unwrap_or_else(|| format!("HTTP {status}")),
        ServiceError::Other(msg) if msg.trim().is_empty() => language.unknown_error().to_string(),
        ServiceError::Other(msg) => msg.clone(),
    }
}

/// Resolves a grading outcome to params, falling back on any failure.
///
/// Returns the params and whether they are a fallback.
pub fn resolve_grade(outcome: Result<String, ServiceError>, language: Language) -> (GradeParams, bool) {
    let reason = match outcome {
        Ok(body) => match parse_grade(&body) {
            Ok(params) => return (params, false),
            Err(e) => e.to_string(),
        },
        Err(e) => service_failure_reason(&e, language),
    };
    warn!(%reason, "grade generation failed; using neutral fallback");
    (fallback_params(language, &reason), true)
}

/// Resolves a suggestion outcome, falling back on any failure.
pub fn resolve_suggestions(outcome: Result<String, ServiceError>, language: Language) -> Vec<String> {
    let parsed = match outcome {
        Ok(body) => parse_suggestions(&body).map_err(|e| e.to_string()),
        Err(e) => Err(service_failure_reason(&e, language)),
    };
    parsed.unwrap_or_else(|reason| {
        warn!(%reason, "style suggestions failed; using defaults");
        fallback_suggestions(language)
    })
}

/// Drops a Markdown code fence (with optional language tag) around a reply.
fn unfence(text: &str) -> &str {
    let text = text.trim();
    let Some(body) = text.strip_prefix("```") else {
        return text;
    };
    let body = body.split_once('\n').map_or("", |(_, rest)| rest);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn error_message(value: &Value) -> Option<String> {
    let obj = value.as_object()?;
    if obj.contains_key("contrast") || obj.contains_key("suggestions") {
        return None;
    }
    obj.get("error")?.as_str().map(str::to_string)
}
