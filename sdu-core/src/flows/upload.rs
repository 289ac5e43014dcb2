//! Upload screen flow: field editing, validation, submission, reset.

use crate::api::{ApiClient, UploadOutcome};
use crate::cpf;
use crate::domain::DocumentKind;
use crate::transport::{Transport, TransportError};
use crate::upload::{AttachedFile, UploadForm, ValidatedUpload};

/// Shown when the upload never reached the server.
pub const UNREACHABLE_MESSAGE: &str = "could not reach the server, try again";

/// Editable fields, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadField {
    #[default]
    PatientName,
    TaxpayerId,
    DocumentKind,
    Description,
    ResultText,
    File,
}

impl UploadField {
    pub const ALL: [UploadField; 6] = [
        UploadField::PatientName,
        UploadField::TaxpayerId,
        UploadField::DocumentKind,
        UploadField::Description,
        UploadField::ResultText,
        UploadField::File,
    ];

    pub fn label(self) -> &'static str {
        match self {
            UploadField::PatientName => "Patient name",
            UploadField::TaxpayerId => "CPF",
            UploadField::DocumentKind => "Type",
            UploadField::Description => "Description",
            UploadField::ResultText => "Result",
            UploadField::File => "File",
        }
    }

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let n = Self::ALL.len();
        let i = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(i + n - 1) % n]
    }
}

#[derive(Debug, Default)]
pub struct UploadFlow {
    form: UploadForm,
    pub focus: UploadField,
    /// Path typed into the file field; read when the user attaches it.
    pub file_path: String,
    error: Option<String>,
    success: bool,
    busy: bool,
}

impl UploadFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &UploadForm {
        &self.form
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn succeeded(&self) -> bool {
        self.success
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    fn touched(&mut self) {
        self.error = None;
        self.success = false;
    }

    pub fn set_patient_name(&mut self, value: impl Into<String>) {
        self.form.patient_name = value.into();
        self.touched();
    }

    /// Stores the masked form of whatever was typed.
    pub fn set_taxpayer_id(&mut self, raw: &str) {
        self.form.taxpayer_id = cpf::format_cpf(raw);
        self.touched();
    }

    pub fn set_document_kind(&mut self, kind: Option<DocumentKind>) {
        self.form.document_kind = kind;
        self.touched();
    }

    /// None → Exam → Diagnostic → None.
    pub fn cycle_document_kind(&mut self) {
        let next = match self.form.document_kind {
            None => Some(DocumentKind::Exam),
            Some(DocumentKind::Exam) => Some(DocumentKind::Diagnostic),
            Some(DocumentKind::Diagnostic) => None,
        };
        self.set_document_kind(next);
    }

    pub fn set_description(&mut self, value: impl Into<String>) {
        self.form.description = value.into();
        self.touched();
    }

    pub fn set_result_text(&mut self, value: impl Into<String>) {
        self.form.result_text = value.into();
        self.touched();
    }

    pub fn attach(&mut self, file: Option<AttachedFile>) {
        self.form.attached_file = file;
        self.touched();
    }

    /// Read `file_path` from disk and attach it. I/O errors become the
    /// inline error and detach any previous file.
    pub fn attach_from_path(&mut self) {
        let path = self.file_path.trim().to_string();
        if path.is_empty() {
            self.attach(None);
            return;
        }
        match AttachedFile::from_path(std::path::Path::new(&path)) {
            Ok(file) => self.attach(Some(file)),
            Err(e) => {
                self.attach(None);
                self.error = Some(format!("cannot read '{path}': {e}"));
            }
        }
    }

    /// Current text of a text field; `None` for the kind and file pickers.
    pub fn text(&self, field: UploadField) -> Option<&str> {
        match field {
            UploadField::PatientName => Some(&self.form.patient_name),
            UploadField::TaxpayerId => Some(&self.form.taxpayer_id),
            UploadField::Description => Some(&self.form.description),
            UploadField::ResultText => Some(&self.form.result_text),
            UploadField::File => Some(&self.file_path),
            UploadField::DocumentKind => None,
        }
    }

    /// Append a character to the focused text field.
    pub fn push_char(&mut self, c: char) {
        self.edit_focused(|s| s.push(c));
    }

    /// Remove the last character of the focused text field.
    pub fn pop_char(&mut self) {
        self.edit_focused(|s| {
            s.pop();
        });
    }

    fn edit_focused(&mut self, edit: impl FnOnce(&mut String)) {
        match self.focus {
            UploadField::PatientName => {
                let mut v = self.form.patient_name.clone();
                edit(&mut v);
                self.set_patient_name(v);
            }
            UploadField::TaxpayerId => {
                let mut v = self.form.taxpayer_id.clone();
                edit(&mut v);
                self.set_taxpayer_id(&v);
            }
            UploadField::Description => {
                let mut v = self.form.description.clone();
                edit(&mut v);
                self.set_description(v);
            }
            UploadField::ResultText => {
                let mut v = self.form.result_text.clone();
                edit(&mut v);
                self.set_result_text(v);
            }
            UploadField::File => {
                edit(&mut self.file_path);
                self.touched();
            }
            UploadField::DocumentKind => {}
        }
    }

    /// Validate and start a submission. Validation errors are shown inline.
    pub fn begin_submit(&mut self) -> Option<ValidatedUpload> {
        if self.busy {
            return None;
        }
        match self.form.validate() {
            Ok(upload) => {
                self.error = None;
                self.success = false;
                self.busy = true;
                Some(upload)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        }
    }

    /// Apply the server's answer; a stored upload resets the form.
    pub fn finish_submit(&mut self, result: Result<UploadOutcome, TransportError>) {
        self.busy = false;
        match result {
            Ok(UploadOutcome::Stored) => {
                self.form = UploadForm::default();
                self.file_path.clear();
                self.focus = UploadField::default();
                self.error = None;
                self.success = true;
            }
            Ok(UploadOutcome::Rejected { message, .. }) => {
                self.error = Some(message);
            }
            Err(e) => {
                tracing::error!(error = %e, "upload request failed");
                self.error = Some(UNREACHABLE_MESSAGE.to_string());
            }
        }
    }

    /// Validate, send and apply in one call.
    pub fn submit<T: Transport>(&mut self, client: &ApiClient<T>) {
        if let Some(upload) = self.begin_submit() {
            let result = client.upload(&upload);
            self.finish_submit(result);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
