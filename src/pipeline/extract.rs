//! Recover a MongoDB aggregation pipeline from free-text LLM output.
//!
//! Generators reliably wrap structured output in prose or Markdown fences
//! even when told not to. Recovery is two-tier: try a clean parse of the
//! fence-stripped text first, then fall back to the widest plausible
//! bracketed span (first `[` to last `]`, so nested arrays inside stage
//! objects stay inside the capture). Malformed JSON content itself is a
//! terminal failure — no repair, no retries.

use serde_json::Value;

use super::ExtractError;

/// Extract an aggregation pipeline (a JSON array of stage objects) from a
/// raw generator response.
pub fn extract_pipeline(raw: &str) -> Result<Vec<Value>, ExtractError> {
    let trimmed = raw.trim();
    let cleaned = strip_code_fences(trimmed);

    // Tier 1: the whole cleaned response is valid JSON.
    // A successful parse to a non-array falls through to bracket recovery
    // on the same text: the array may be nested inside a wrapper object.
    let parsed_non_array = match serde_json::from_str::<Value>(cleaned) {
        Ok(Value::Array(stages)) => return Ok(stages),
        Ok(_) => true,
        Err(_) => false,
    };

    // Tier 2: widest bracketed span.
    if let (Some(start), Some(end)) = (cleaned.find('['), cleaned.rfind(']')) {
        if end > start {
            let extracted = &cleaned[start..=end];
            return match serde_json::from_str::<Value>(extracted) {
                Ok(Value::Array(stages)) => Ok(stages),
                Ok(_) => Err(ExtractError::NotAnArray {
                    response: trimmed.to_string(),
                    extracted: extracted.to_string(),
                }),
                Err(err) => Err(ExtractError::Decode {
                    response: trimmed.to_string(),
                    extracted: extracted.to_string(),
                    message: err.to_string(),
                }),
            };
        }
    }

    // No bracketed span. If the response was well-formed JSON of the wrong
    // shape, report that rather than "nothing found".
    if parsed_non_array {
        return Err(ExtractError::NotAnArray {
            response: trimmed.to_string(),
            extracted: cleaned.to_string(),
        });
    }

    Err(ExtractError::NoArrayFound {
        response: trimmed.to_string(),
    })
}

/// Strip a single leading and/or trailing Markdown code fence, optionally
/// tagged `json` (case-insensitive), tolerating surrounding whitespace.
/// Unfenced input passes through untouched.
fn strip_code_fences(text: &str) -> &str {
    let mut s = text.trim();
    if let Some(rest) = s.strip_prefix("```") {
        let rest = match rest.get(..4) {
            Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
            _ => rest,
        };
        s = rest.trim_start();
    }
    if let Some(rest) = s.strip_suffix("```") {
        s = rest.trim_end();
    }
    s
}
