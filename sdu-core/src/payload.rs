//! Schema checks for the backend's JSON bodies.
//!
//! The server's payloads are loosely typed. Each decoder returns a typed value
//! or a `PayloadError`; what to do with a malformed body is decided by the
//! caller, not silently here.

use serde_json::Value;
use thiserror::Error;

use crate::domain::ExamRecord;

/// Field holding the exam array in search responses.
pub const EXAMS_FIELD: &str = "exames";
/// Field holding the signed link in download responses.
pub const URL_FIELD: &str = "url";
/// Human-readable message in login/check responses.
pub const MESSAGE_FIELD: &str = "message";
/// Error text in upload responses.
pub const ERROR_FIELD: &str = "Error";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("response body is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("response has no `{0}` field")]
    MissingField(&'static str),

    #[error("field `{field}` has an unexpected shape: {detail}")]
    UnexpectedShape { field: &'static str, detail: String },
}

fn parse(body: &[u8]) -> Result<Value, PayloadError> {
    serde_json::from_slice(body).map_err(|e| PayloadError::InvalidJson(e.to_string()))
}

/// Decode `{"exames": [...]}` into exam records.
pub fn decode_exam_list(body: &[u8]) -> Result<Vec<ExamRecord>, PayloadError> {
    let mut value = parse(body)?;
    let exams = value
        .get_mut(EXAMS_FIELD)
        .map(Value::take)
        .ok_or(PayloadError::MissingField(EXAMS_FIELD))?;
    if !exams.is_array() {
        return Err(PayloadError::UnexpectedShape {
            field: EXAMS_FIELD,
            detail: format!("expected an array, got {}", kind_of(&exams)),
        });
    }
    serde_json::from_value(exams).map_err(|e| PayloadError::UnexpectedShape {
        field: EXAMS_FIELD,
        detail: e.to_string(),
    })
}

/// Decode `{"url": "..."}`. Empty strings count as missing.
pub fn decode_download_url(body: &[u8]) -> Result<String, PayloadError> {
    let value = parse(body)?;
    match value.get(URL_FIELD) {
        None | Some(Value::Null) => Err(PayloadError::MissingField(URL_FIELD)),
        Some(Value::String(url)) if url.trim().is_empty() => {
            Err(PayloadError::MissingField(URL_FIELD))
        }
        Some(Value::String(url)) => Ok(url.clone()),
        Some(other) => Err(PayloadError::UnexpectedShape {
            field: URL_FIELD,
            detail: format!("expected a string, got {}", kind_of(other)),
        }),
    }
}

/// Best-effort string field extraction for error messages. Never fails.
pub fn string_field(body: &[u8], field: &str) -> Option<String> {
    let value = parse(body).ok()?;
    value
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bytes(v: Value) -> Vec<u8> {
        v.to_string().into_bytes()
    }

    #[test]
    fn well_formed_exam_list() {
        let body = bytes(json!({
            "exames": [
                {"id": 1, "cpf": "12345678900", "tipo": "Hemograma", "data": "2024-01-15"},
                {"id": 2, "cpf": "12345678900", "tipo": "Raio-X", "data": "2024-01-12"}
            ]
        }));
        let exams = decode_exam_list(&body).unwrap();
        assert_eq!(exams.len(), 2);
        assert_eq!(exams[0].id, 1);
        assert_eq!(exams[1].kind, "Raio-X");
    }

    #[test]
    fn empty_exam_list_is_valid() {
        assert_eq!(decode_exam_list(&bytes(json!({"exames": []}))).unwrap(), vec![]);
    }

    #[test]
    fn missing_or_wrong_exam_field() {
        assert_eq!(
            decode_exam_list(&bytes(json!({"results": []}))),
            Err(PayloadError::MissingField(EXAMS_FIELD))
        );
        assert!(matches!(
            decode_exam_list(&bytes(json!({"exames": {"id": 1}}))),
            Err(PayloadError::UnexpectedShape { .. })
        ));
        assert!(matches!(
            decode_exam_list(&bytes(json!({"exames": [{"id": "x"}]}))),
            Err(PayloadError::UnexpectedShape { .. })
        ));
        assert!(matches!(
            decode_exam_list(b"<html>oops</html>"),
            Err(PayloadError::InvalidJson(_))
        ));
    }

    #[test]
    fn download_url() {
        assert_eq!(
            decode_download_url(&bytes(json!({"url": "https://s3/x.pdf"}))).unwrap(),
            "https://s3/x.pdf"
        );
        assert_eq!(
            decode_download_url(&bytes(json!({"url": ""}))),
            Err(PayloadError::MissingField(URL_FIELD))
        );
        assert_eq!(
            decode_download_url(&bytes(json!({"link": "x"}))),
            Err(PayloadError::MissingField(URL_FIELD))
        );
        assert!(matches!(
            decode_download_url(&bytes(json!({"url": 3}))),
            Err(PayloadError::UnexpectedShape { .. })
        ));
    }

    #[test]
    fn string_field_is_lenient() {
        let body = bytes(json!({"status": "error", "message": " wrong credentials "}));
        assert_eq!(string_field(&body, MESSAGE_FIELD).as_deref(), Some("wrong credentials"));
        assert_eq!(string_field(&body, "missing"), None);
        assert_eq!(string_field(b"not json", MESSAGE_FIELD), None);
        assert_eq!(string_field(&bytes(json!({"message": ""})), MESSAGE_FIELD), None);
    }
}
