//! Upload form.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use sdu_core::flows::UploadField;

use crate::app::AppState;
use crate::ui::field_line;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = &app.theme;
    let upload = &app.upload;
    let mut lines: Vec<Line> = Vec::new();

    for field in UploadField::ALL {
        let focused = upload.focus == field;
        let value = match field {
            UploadField::DocumentKind => match upload.form().document_kind {
                Some(kind) => format!("< {} >", kind.label()),
                None => "< select >".to_string(),
            },
            _ => upload.text(field).unwrap_or_default().to_string(),
        };
        lines.push(field_line(theme, field.label(), &value, focused));
    }

    let attached = match &upload.form().attached_file {
        Some(file) => Span::styled(
            format!("  attached: {} ({} bytes)", file.file_name, file.bytes.len()),
            theme.positive(),
        ),
        None => Span::styled("  no file attached (Enter on File reads the path)", theme.muted()),
    };
    lines.push(Line::from(attached));
    lines.push(Line::from(""));

    if upload.is_busy() {
        lines.push(Line::from(Span::styled("Uploading...", theme.warning())));
    } else if let Some(err) = upload.error() {
        lines.push(Line::from(Span::styled(err.to_string(), theme.negative())));
    } else if upload.succeeded() {
        lines.push(Line::from(Span::styled(
            "File uploaded successfully.",
            theme.positive(),
        )));
    }

    lines.push(Line::from(Span::styled(
        "Up/Down:field  Space:type  Enter/^S:submit  Esc:back",
        theme.muted(),
    )));
    f.render_widget(Paragraph::new(lines), area);
}
