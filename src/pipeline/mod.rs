pub mod extract;

pub use extract::*;

use thiserror::Error;

/// Failure kinds for recovering an aggregation pipeline from generator text.
///
/// Every variant carries the trimmed generator response so callers can
/// surface it for manual recovery or re-prompting.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("No pipeline array found in LLM response")]
    NoArrayFound { response: String },

    #[error("Parsed JSON is not an array")]
    NotAnArray { response: String, extracted: String },

    #[error("JSON decode error: {message}")]
    Decode {
        response: String,
        extracted: String,
        message: String,
    },
}
