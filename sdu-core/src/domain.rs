//! Domain types shared by the API client and the front ends.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One exam row as returned by the search endpoint.
///
/// Never constructed or mutated client-side; order is whatever the server sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamRecord {
    pub id: u64,
    #[serde(rename = "cpf")]
    pub taxpayer_id: String,
    #[serde(rename = "tipo")]
    pub kind: String,
    #[serde(rename = "data")]
    pub date: String,
}

impl ExamRecord {
    /// Date in `dd/mm/yyyy`, or the raw server string when it cannot be parsed.
    pub fn display_date(&self) -> String {
        parse_server_date(&self.date)
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| self.date.clone())
    }
}

/// The backend serialises `DateTimeField`s as RFC 3339, fixtures use plain dates.
fn parse_server_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Kind of document attached to an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    Exam,
    Diagnostic,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 2] = [DocumentKind::Exam, DocumentKind::Diagnostic];

    /// Value sent in the `tipo` form field.
    pub fn wire_name(self) -> &'static str {
        match self {
            DocumentKind::Exam => "exame",
            DocumentKind::Diagnostic => "diagnostico",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DocumentKind::Exam => "Exam",
            DocumentKind::Diagnostic => "Diagnostic",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "exame" | "exam" => Some(DocumentKind::Exam),
            "diagnostico" | "diagnostic" => Some(DocumentKind::Diagnostic),
            _ => None,
        }
    }

    /// Diagnostics must carry a result text; exams may omit it.
    pub fn requires_result(self) -> bool {
        matches!(self, DocumentKind::Diagnostic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str) -> ExamRecord {
        ExamRecord {
            id: 1,
            taxpayer_id: "12345678900".into(),
            kind: "Hemograma".into(),
            date: date.into(),
        }
    }

    #[test]
    fn deserializes_wire_names() {
        let json = r#"{"id": 7, "cpf": "12345678900", "tipo": "Raio-X", "data": "2024-01-12"}"#;
        let rec: ExamRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.id, 7);
        assert_eq!(rec.taxpayer_id, "12345678900");
        assert_eq!(rec.kind, "Raio-X");
    }

    #[test]
    fn display_date_formats() {
        assert_eq!(record("2024-01-15").display_date(), "15/01/2024");
        assert_eq!(record("2024-01-15T10:30:00Z").display_date(), "15/01/2024");
        assert_eq!(record("2024-01-15T10:30:00.123456").display_date(), "15/01/2024");
        assert_eq!(record("yesterday").display_date(), "yesterday");
    }

    #[test]
    fn document_kind_wire_roundtrip() {
        for kind in DocumentKind::ALL {
            assert_eq!(DocumentKind::from_wire(kind.wire_name()), Some(kind));
        }
        assert_eq!(DocumentKind::from_wire("Diagnostic"), Some(DocumentKind::Diagnostic));
        assert_eq!(DocumentKind::from_wire("laudo"), None);
        assert!(DocumentKind::Diagnostic.requires_result());
        assert!(!DocumentKind::Exam.requires_result());
    }
}
