//! Turns raw model output into a well-shaped [`AnalysisRecord`].
//!
//! Decoding is strict (serde into the record type) and reported as a tagged
//! [`Decoded`] value; [`normalize`] folds the failure case into the fixed
//! fallback record so callers never see an error for unparseable output.

use legalyze_core::AnalysisRecord;
use tracing::{debug, warn};

/// Outcome of decoding one model response.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Parsed(AnalysisRecord),
    Malformed { reason: String },
}

/// Remove a surrounding markdown code fence (```json ... ``` or ``` ... ```).
pub fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();

    // Bare JSON is returned untouched even if a string inside contains backticks.
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return trimmed;
    }

    if let Some(start) = trimmed.find("```") {
        let after_tick = &trimmed[start + 3..];
        // Skip any language identifier (`json`, `JSON`, ...) directly after the fence.
        let lang_len = after_tick
            .bytes()
            .take_while(|b| b.is_ascii_alphanumeric())
            .count();
        let body = &after_tick[lang_len..];
        let end = body.find("```").unwrap_or(body.len());
        return body[..end].trim();
    }

    trimmed
}

/// Narrow prose-wrapped output ("Sure! Here it is: {...}") to the outer object.
fn outer_object(text: &str) -> &str {
    if text.starts_with('{') {
        return text;
    }
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

/// Strictly decode model output into an analysis record.
pub fn decode(raw: &str) -> Decoded {
    let json = outer_object(strip_code_fence(raw));
    match serde_json::from_str::<AnalysisRecord>(json) {
        Ok(record) if record.summary.trim().is_empty() => Decoded::Malformed {
            reason: "summary is empty".to_string(),
        },
        Ok(record) => Decoded::Parsed(record),
        Err(e) => Decoded::Malformed { reason: e.to_string() },
    }
}

/// Decode, substituting the fallback record for malformed output.
pub fn normalize(raw: &str) -> AnalysisRecord {
    match decode(raw) {
        Decoded::Parsed(record) => record,
        Decoded::Malformed { reason } => {
            warn!("Model response was not a usable analysis: {}", reason);
            debug!("Unparseable model response: {}", raw);
            AnalysisRecord::fallback()
        }
    }
}
