//! Upload form model and its synchronous validation.

use std::path::Path;

use thiserror::Error;

use crate::cpf;
use crate::domain::DocumentKind;
use crate::transport::{FilePart, HttpRequest, RequestBody};

/// File types the backend accepts, detected from content rather than extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Png,
    Jpeg,
    Pdf,
}

impl MediaType {
    pub fn mime(self) -> &'static str {
        match self {
            MediaType::Png => "image/png",
            MediaType::Jpeg => "image/jpeg",
            MediaType::Pdf => "application/pdf",
        }
    }

    /// Magic-byte sniffing.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(MediaType::Png)
        } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(MediaType::Jpeg)
        } else if bytes.starts_with(b"%PDF-") {
            Some(MediaType::Pdf)
        } else {
            None
        }
    }
}

/// A file picked for upload, read fully into memory.
#[derive(Clone, PartialEq, Eq)]
pub struct AttachedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl AttachedFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self { file_name, bytes })
    }

    pub fn media_type(&self) -> Option<MediaType> {
        MediaType::sniff(&self.bytes)
    }
}

impl std::fmt::Debug for AttachedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttachedFile")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Validation failures, in the order the rules are checked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("patient name is required")]
    MissingName,

    #[error("CPF is required")]
    MissingTaxpayerId,

    #[error("CPF must have 11 digits (got {digits})")]
    InvalidTaxpayerId { digits: usize },

    #[error("document type is required")]
    MissingKind,

    #[error("description is required")]
    MissingDescription,

    #[error("result is required for diagnostics")]
    MissingResult,

    #[error("a file must be attached")]
    MissingFile,

    #[error("file '{file_name}' is not a PNG, JPEG or PDF")]
    UnsupportedFileType { file_name: String },
}

/// The upload form as the user fills it in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadForm {
    pub patient_name: String,
    pub taxpayer_id: String,
    pub document_kind: Option<DocumentKind>,
    pub description: String,
    pub result_text: String,
    pub attached_file: Option<AttachedFile>,
}

impl UploadForm {
    /// Run every rule in order; the first failure wins.
    pub fn validate(&self) -> Result<ValidatedUpload, UploadError> {
        if self.patient_name.trim().is_empty() {
            return Err(UploadError::MissingName);
        }
        if self.taxpayer_id.trim().is_empty() {
            return Err(UploadError::MissingTaxpayerId);
        }
        let digits = cpf::digits_only(&self.taxpayer_id);
        if digits.len() != cpf::CPF_DIGITS {
            return Err(UploadError::InvalidTaxpayerId {
                digits: digits.len(),
            });
        }
        let kind = self.document_kind.ok_or(UploadError::MissingKind)?;
        if self.description.trim().is_empty() {
            return Err(UploadError::MissingDescription);
        }
        if kind.requires_result() && self.result_text.trim().is_empty() {
            return Err(UploadError::MissingResult);
        }
        let file = self.attached_file.clone().ok_or(UploadError::MissingFile)?;
        let media_type = file
            .media_type()
            .ok_or_else(|| UploadError::UnsupportedFileType {
                file_name: file.file_name.clone(),
            })?;

        Ok(ValidatedUpload {
            patient_name: self.patient_name.trim().to_string(),
            taxpayer_digits: digits,
            kind,
            description: self.description.trim().to_string(),
            result_text: self.result_text.trim().to_string(),
            file,
            media_type,
        })
    }
}

/// A form that passed validation, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUpload {
    pub patient_name: String,
    pub taxpayer_digits: String,
    pub kind: DocumentKind,
    pub description: String,
    pub result_text: String,
    pub file: AttachedFile,
    pub media_type: MediaType,
}

impl ValidatedUpload {
    pub fn endpoint(&self) -> &'static str {
        match self.kind {
            DocumentKind::Exam => crate::api::endpoints::UPLOAD_EXAM,
            DocumentKind::Diagnostic => crate::api::endpoints::UPLOAD_DIAGNOSIS,
        }
    }

    /// Multipart request: text fields plus the `file` part.
    pub fn to_request(&self) -> HttpRequest {
        let fields = vec![
            ("cpf".to_string(), self.taxpayer_digits.clone()),
            ("tipo".to_string(), self.kind.wire_name().to_string()),
            ("nome".to_string(), self.patient_name.clone()),
            ("descricao".to_string(), self.description.clone()),
            ("resultado".to_string(), self.result_text.clone()),
        ];
        let file = FilePart {
            field: "file".to_string(),
            file_name: self.file.file_name.clone(),
            mime: self.media_type.mime().to_string(),
            bytes: self.file.bytes.clone(),
        };
        HttpRequest::post(self.endpoint(), RequestBody::Multipart { fields, file })
    }
}
