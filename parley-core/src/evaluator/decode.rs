//! Turning a generation response into a validated evaluation.
//!
//! The structured payload wins when the provider produced one. Otherwise
//! the raw text is decoded, tolerating prose or code fences before the
//! JSON object.

use parley_models::providers::GenerateResponse;
use serde_json::Value;
use tracing::debug;

use crate::error::{EvaluateError, GenerationError};
use crate::rubric::{SpeakingEvaluation, ValidationError, validate};

pub(crate) fn decode_response(
    response: &GenerateResponse,
) -> Result<SpeakingEvaluation, EvaluateError> {
    if let Some(parsed) = response.parsed.as_ref().filter(|v| !is_blank(v)) {
        debug!(model = %response.model, "Decoding structured payload");
        return Ok(validate(parsed)?);
    }

    let Some(text) = response.text.as_deref().filter(|t| !t.trim().is_empty()) else {
        return Err(GenerationError::NoPayload.into());
    };

    debug!(model = %response.model, chars = text.len(), "Decoding evaluation from raw text");
    let value = extract_json(text)?;
    Ok(validate(&value)?)
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Read the first JSON object in `text`.
///
/// Each `{` is tried in turn, so braces or brackets in leading prose do not
/// hide the payload. When nothing decodes, the error from the first attempt
/// is reported.
fn extract_json(text: &str) -> Result<Value, ValidationError> {
    let mut first_error = None;
    for (start, _) in text.match_indices('{') {
        let mut values = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
        match values.next() {
            Some(Ok(value)) => return Ok(value),
            Some(Err(e)) => {
                first_error.get_or_insert_with(|| e.to_string());
            }
            None => {}
        }
    }
    Err(ValidationError::malformed(
        first_error.unwrap_or_else(|| "no JSON object found in model output".to_string()),
    ))
}
