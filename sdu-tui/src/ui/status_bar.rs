//! Bottom status bar: key hints, busy marker, last status message.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use sdu_core::Screen;

use crate::app::{AppState, StatusLevel};

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = &app.theme;
    let mut spans: Vec<Span> = Vec::new();

    let hints = match app.screen() {
        Screen::Login => " Enter:login Tab:field Esc:quit F1:help",
        _ => " Tab:screen ^L:logout ^T:theme ^E:errors F1:help",
    };
    spans.push(Span::styled(hints, theme.muted()));

    if busy(app) {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled("working...", theme.warning()));
    }

    if let Some((msg, level)) = &app.status_message {
        spans.push(Span::raw(" | "));
        let style = match level {
            StatusLevel::Info => theme.accent(),
            StatusLevel::Warning => theme.warning(),
            StatusLevel::Error => theme.negative(),
        };
        spans.push(Span::styled(msg.as_str(), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn busy(app: &AppState) -> bool {
    app.session.check_pending()
        || app.login.is_busy()
        || app.search.is_busy()
        || app.search.is_download_busy()
        || app.upload.is_busy()
}
