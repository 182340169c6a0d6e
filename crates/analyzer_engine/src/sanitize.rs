use analyzer_core::{AnalysisKind, AnalysisResult};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::schema::{schema_for, FieldSpec, FieldType};
use crate::SchemaViolation;

const FENCE: &str = "```";
const CLOSING_FENCE: &str = "\n```";

/// Strip formatting the model wraps around its JSON: control characters
/// (other than `\n`, `\r`, `\t`) and surrounding whitespace. When the text
/// does not open with the JSON itself, the first triple-backtick block is
/// taken (with or without a `json` tag), falling back to the span from the
/// first `{` to the last `}`.
pub fn sanitize(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\r' | '\t'))
        .collect();

    let text = cleaned.trim();
    if text.starts_with('{') || text.starts_with('[') {
        return text.to_string();
    }
    if let Some(block) = fenced_block(text) {
        return block.trim().to_string();
    }
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => text[start..=end].to_string(),
        _ => text.to_string(),
    }
}

/// Body of the first fenced block. The block closes at the first fence that
/// opens a line (a raw newline never occurs inside a JSON string), else at
/// the last fence on the same line. An unclosed fence runs to the end.
fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find(FENCE)?;
    let body = strip_language_tag(&text[start + FENCE.len()..]);
    let close = body.find(CLOSING_FENCE).or_else(|| body.rfind(FENCE));
    Some(match close {
        Some(end) => &body[..end],
        None => body,
    })
}

fn strip_language_tag(after_fence: &str) -> &str {
    let tagged = after_fence.trim_start();
    match tagged.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &tagged[4..],
        _ => after_fence,
    }
}

/// Parse `json_text` and check it against the schema for `kind`.
///
/// All-or-nothing: the first missing field, wrong type or out-of-range number
/// rejects the whole response. Unknown extra fields are ignored.
pub fn validate(json_text: &str, kind: AnalysisKind) -> Result<AnalysisResult, SchemaViolation> {
    let value: Value =
        serde_json::from_str(json_text).map_err(|err| SchemaViolation::Parse(err.to_string()))?;
    let object = value.as_object().ok_or(SchemaViolation::NotAnObject)?;

    for field in schema_for(kind) {
        check_field(object, field)?;
    }

    Ok(match kind {
        AnalysisKind::Conflict => AnalysisResult::Conflict(decode(value)?),
        AnalysisKind::FactCheck => AnalysisResult::FactCheck(decode(value)?),
        AnalysisKind::PeaceImpact => AnalysisResult::PeaceImpact(decode(value)?),
    })
}

fn check_field(object: &Map<String, Value>, field: &FieldSpec) -> Result<(), SchemaViolation> {
    let value = object
        .get(field.name)
        .ok_or(SchemaViolation::MissingField(field.name))?;
    let wrong_type = || SchemaViolation::WrongType {
        field: field.name,
        expected: field.field_type.expected(),
    };

    match field.field_type {
        FieldType::Boolean if value.is_boolean() => Ok(()),
        FieldType::Text if value.is_string() => Ok(()),
        FieldType::TextList => {
            let items = value.as_array().ok_or_else(wrong_type)?;
            if items.iter().all(Value::is_string) {
                Ok(())
            } else {
                Err(wrong_type())
            }
        }
        FieldType::Number { min, max } => {
            let number = value.as_f64().ok_or_else(wrong_type)?;
            if (min..=max).contains(&number) {
                Ok(())
            } else {
                Err(SchemaViolation::OutOfRange {
                    field: field.name,
                    value: number,
                    min,
                    max,
                })
            }
        }
        _ => Err(wrong_type()),
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, SchemaViolation> {
    serde_json::from_value(value).map_err(|err| SchemaViolation::Decode(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::sanitize;

    #[test]
    fn strips_json_fence_and_whitespace() {
        assert_eq!(sanitize("  \n```json\n{\"a\":1}\n```\n "), "{\"a\":1}");
    }

    #[test]
    fn strips_bare_and_uppercase_fences() {
        assert_eq!(sanitize("```\n{}\n```"), "{}");
        assert_eq!(sanitize("```JSON {\"a\":true}```"), "{\"a\":true}");
    }

    #[test]
    fn removes_control_characters_but_keeps_newlines() {
        assert_eq!(sanitize("{\u{0}\"a\":\u{7}1,\n\"b\":2}"), "{\"a\":1,\n\"b\":2}");
    }

    #[test]
    fn takes_first_fence_after_lead_in() {
        assert_eq!(
            sanitize("Here is the analysis:\n```json\n{\"a\":1}\n```\nLet me know."),
            "{\"a\":1}"
        );
        assert_eq!(sanitize("``` json\n{\"b\":2}\n```"), "{\"b\":2}");
        assert_eq!(sanitize("Result:\n```\n[1]\n```\n```\n[2]\n```"), "[1]");
    }

    #[test]
    fn unclosed_fence_runs_to_end() {
        assert_eq!(sanitize("```json\n{\"a\":1}"), "{\"a\":1}");
    }

    #[test]
    fn lead_in_before_bare_object_is_dropped() {
        assert_eq!(
            sanitize("Sure! {\"a\": {\"b\": 1}} Hope this helps."),
            "{\"a\": {\"b\": 1}}"
        );
        assert_eq!(sanitize("no json here"), "no json here");
    }

    #[test]
    fn unfenced_text_is_only_trimmed() {
        assert_eq!(sanitize("\t{\"x\": [1]}  "), "{\"x\": [1]}");
    }
}
