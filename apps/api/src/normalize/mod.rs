//! Response Normalizer: turns unreliable model text into a contract-checked JSON value.
//!
//! Pipeline: presence check → fence strip → comment removal → trailing-comma
//! repair → parse → shape validation. Every agent that expects JSON from the
//! model goes through `normalize`; no agent parses model output on its own.
//!
//! The normalizer is pure. It never logs, never retries and never fills in
//! missing data: callers get exactly what the model produced, or a typed failure.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

pub mod clean;
pub mod shape;

pub use shape::ShapeContract;

use shape::ShapeViolation;

/// Classification of a normalization failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    EmptyResponse,
    MalformedJson,
    ShapeMismatch,
    MissingField,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FailureKind::EmptyResponse => "empty response",
            FailureKind::MalformedJson => "malformed JSON",
            FailureKind::ShapeMismatch => "shape mismatch",
            FailureKind::MissingField => "missing field",
        };
        f.write_str(name)
    }
}

/// A failed normalization. Carries the untouched model text for diagnostics,
/// plus the cleaned text when the failure happened after cleanup.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("{kind}: {detail}")]
pub struct NormalizationFailure {
    pub kind: FailureKind,
    pub detail: String,
    pub raw_text: String,
    pub cleaned_text: Option<String>,
    /// First offending array element, for array contracts.
    pub element_index: Option<usize>,
    pub missing_keys: Vec<String>,
}

impl NormalizationFailure {
    fn new(kind: FailureKind, detail: String, raw_text: &str) -> Self {
        Self {
            kind,
            detail,
            raw_text: raw_text.to_string(),
            cleaned_text: None,
            element_index: None,
            missing_keys: Vec::new(),
        }
    }

    fn with_cleaned(mut self, cleaned: String) -> Self {
        self.cleaned_text = Some(cleaned);
        self
    }

    fn from_violation(violation: ShapeViolation, raw_text: &str, cleaned: String) -> Self {
        match violation {
            ShapeViolation::WrongKind {
                index,
                expected,
                found,
            } => {
                let detail = match index {
                    Some(i) => format!("element {i}: expected {expected}, found {found}"),
                    None => format!("expected {expected}, found {found}"),
                };
                let mut failure = Self::new(FailureKind::ShapeMismatch, detail, raw_text);
                failure.element_index = index;
                failure.with_cleaned(cleaned)
            }
            ShapeViolation::MissingKeys { index, keys } => {
                let detail = match index {
                    Some(i) => format!("element {i} is missing: {}", keys.join(", ")),
                    None => format!("missing: {}", keys.join(", ")),
                };
                let mut failure = Self::new(FailureKind::MissingField, detail, raw_text);
                failure.element_index = index;
                failure.missing_keys = keys;
                failure.with_cleaned(cleaned)
            }
        }
    }
}

/// Either a contract-satisfying value or a classified failure. Never partial.
pub type NormalizedResult = Result<Value, NormalizationFailure>;

/// Runs the text-repair stages without parsing. Exposed so callers can log
/// what was actually handed to the parser.
pub fn clean_text(raw: &str) -> String {
    let unfenced = clean::strip_fences(raw);
    let uncommented = clean::strip_line_comments(unfenced);
    clean::repair_trailing_commas(&uncommented).trim().to_string()
}

/// Normalizes raw model output against `contract`.
pub fn normalize(raw: Option<&str>, contract: &ShapeContract) -> NormalizedResult {
    let raw = match raw {
        Some(text) if !text.trim().is_empty() => text,
        other => {
            return Err(NormalizationFailure::new(
                FailureKind::EmptyResponse,
                "model returned no text".to_string(),
                other.unwrap_or_default(),
            ))
        }
    };

    let cleaned = clean_text(raw);

    let value: Value = match serde_json::from_str(&cleaned) {
        Ok(value) => value,
        Err(e) => {
            return Err(
                NormalizationFailure::new(FailureKind::MalformedJson, e.to_string(), raw)
                    .with_cleaned(cleaned),
            )
        }
    };

    match shape::validate(&value, contract) {
        Ok(()) => Ok(value),
        Err(violation) => Err(NormalizationFailure::from_violation(violation, raw, cleaned)),
    }
}
