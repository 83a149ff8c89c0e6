use serde_json::{Map, Value};

use super::result::{AnalysisResult, Section};
use crate::error::ExtractError;

/// Slice from the first `{` to the last `}` of `text`, if both exist in that order.
///
/// Greedy on purpose: prose around a single object is stripped, but text with
/// several objects yields a span that will not parse.
pub fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Recover the five-section critique from raw completion text.
///
/// Either failure (no span, malformed JSON) fails the whole extraction;
/// there is no partial result.
pub fn extract_analysis(text: &str) -> Result<AnalysisResult, ExtractError> {
    let span = brace_span(text).ok_or(ExtractError::NoJsonSpan)?;

    // The span opens with `{`, so anything that parses is an object.
    let object: Map<String, Value> =
        serde_json::from_str(span).map_err(|e| ExtractError::Malformed {
            message: e.to_string(),
        })?;

    let mut result = AnalysisResult::default();
    for section in Section::ALL {
        *result.section_mut(section) = coerce_field(object.get(section.key()));
    }

    Ok(result)
}

/// Normalize one field: arrays keep their truthy elements as text, a lone
/// non-empty string becomes a one-element list, anything else is empty.
fn coerce_field(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(coerce_item).collect(),
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

fn coerce_item(item: &Value) -> Option<String> {
    let text = match item {
        Value::Null | Value::Bool(false) => return None,
        Value::Bool(true) => "true".to_string(),
        Value::Number(n) => {
            if n.as_f64() == Some(0.0) {
                return None;
            }
            n.to_string()
        }
        Value::String(s) => s.clone(),
        nested @ (Value::Array(_) | Value::Object(_)) => nested.to_string(),
    };

    (!text.is_empty()).then_some(text)
}
