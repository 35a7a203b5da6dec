// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of GridCast.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Locate a JSON candidate inside free-form model output.
//!
//! Strategies are tried in [`ExtractionStrategy::ORDER`]; the first one yielding an object or an
//! array wins. Finding nothing is an ordinary outcome and leads to a synthetic forecast.

use serde_json::Value;
use std::fmt;
use tracing::debug;

const FENCE: &str = "```";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// The whole text is JSON
    WholeText,
    /// JSON once markdown code fences are removed
    FenceStripped,
    /// Span from the first `{` to the last `}`
    ObjectSpan,
    /// Span from the first `[` to the last `]`
    ArraySpan,
}

impl ExtractionStrategy {
    pub const ORDER: [Self; 4] = [
        Self::WholeText,
        Self::FenceStripped,
        Self::ObjectSpan,
        Self::ArraySpan,
    ];

    pub fn apply(self, text: &str) -> Option<Value> {
        match self {
            Self::WholeText => parse_structured(text),
            Self::FenceStripped => {
                if text.contains(FENCE) {
                    parse_structured(&strip_fences(text))
                } else {
                    None
                }
            }
            Self::ObjectSpan => span(text, '{', '}')
                .and_then(parse_structured)
                .filter(Value::is_object),
            Self::ArraySpan => span(text, '[', ']')
                .and_then(parse_structured)
                .filter(Value::is_array),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::WholeText => "whole_text",
            Self::FenceStripped => "fence_stripped",
            Self::ObjectSpan => "object_span",
            Self::ArraySpan => "array_span",
        }
    }
}

impl fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of scanning one response text.
#[derive(Debug, Clone, PartialEq)]
pub struct RawExtraction {
    pub source_text: String,
    /// `None` when no parseable object or array was found
    pub candidate: Option<Value>,
    /// Strategy that produced the candidate
    pub strategy: Option<ExtractionStrategy>,
    /// The candidate came out of a provider envelope's embedded text
    pub from_envelope: bool,
}

impl RawExtraction {
    fn empty(text: &str) -> Self {
        Self {
            source_text: text.to_owned(),
            candidate: None,
            strategy: None,
            from_envelope: false,
        }
    }
}

/// Only objects and arrays count as candidates.
fn parse_structured(text: &str) -> Option<Value> {
    serde_json::from_str::<Value>(text.trim())
        .ok()
        .filter(|v| v.is_object() || v.is_array())
}

fn span(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| text.get(start..=end)).flatten()
}

/// Remove every code-fence marker along with a `json` language tag directly after it.
pub fn strip_fences(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, segment) in text.split(FENCE).enumerate() {
        let segment = match (i, segment.get(..4), segment.get(4..)) {
            (1.., Some(tag), Some(rest)) if tag.eq_ignore_ascii_case("json") => rest,
            _ => segment,
        };
        out.push_str(segment);
    }
    out
}

fn first_candidate(text: &str) -> Option<(ExtractionStrategy, Value)> {
    ExtractionStrategy::ORDER
        .iter()
        .find_map(|strategy| strategy.apply(text).map(|value| (*strategy, value)))
}

/// Text embedded in a known generative-service envelope.
///
/// Recognized: `candidates[].content.parts[].text`, `output_text`, `results[0].output_text`.
/// An object that already carries a `generated` payload is not an envelope.
pub fn envelope_text(candidate: &Value) -> Option<String> {
    let obj = candidate.as_object()?;
    if obj.contains_key("generated") {
        return None;
    }

    if let Some(candidates) = obj.get("candidates").and_then(Value::as_array) {
        let texts: Vec<&str> = candidates
            .iter()
            .filter_map(|c| c.pointer("/content/parts").and_then(Value::as_array))
            .flatten()
            .filter_map(|part| part.get("text").and_then(Value::as_str))
            .filter(|t| !t.is_empty())
            .collect();
        return Some(texts.join("\n").trim().to_owned());
    }

    if let Some(text) = obj.get("output_text") {
        return Some(crate::value::to_display_string(text).trim().to_owned());
    }

    obj.get("results")
        .and_then(|r| r.get(0))
        .and_then(|r| r.get("output_text"))
        .map(|text| crate::value::to_display_string(text).trim().to_owned())
}

/// Find the structured payload in `text`, looking through one level of provider envelope.
pub fn extract(text: &str) -> RawExtraction {
    let Some((strategy, candidate)) = first_candidate(text) else {
        debug!(len = text.len(), "no JSON candidate in response text");
        return RawExtraction::empty(text);
    };

    let Some(inner) = envelope_text(&candidate) else {
        debug!(%strategy, "extracted JSON candidate");
        return RawExtraction {
            source_text: text.to_owned(),
            candidate: Some(candidate),
            strategy: Some(strategy),
            from_envelope: false,
        };
    };

    match first_candidate(&inner) {
        Some((strategy, candidate)) => {
            debug!(%strategy, "extracted JSON candidate from provider envelope");
            RawExtraction {
                source_text: text.to_owned(),
                candidate: Some(candidate),
                strategy: Some(strategy),
                from_envelope: true,
            }
        }
        None => {
            debug!(
                len = inner.len(),
                "provider envelope text holds no JSON candidate"
            );
            RawExtraction::empty(text)
        }
    }
}
