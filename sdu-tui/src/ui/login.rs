//! Login screen.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph};
use ratatui::Frame;

use sdu_core::flows::LoginField;

use crate::app::AppState;
use crate::ui::{centered_rect, field_line};

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = &app.theme;
    let form = centered_rect(60, 60, area);
    f.render_widget(Clear, form);

    let mut lines = vec![
        Line::from(Span::styled("Sign in to SDU", theme.accent_bold())),
        Line::from(Span::styled(
            "Unified Health Data System",
            theme.muted(),
        )),
        Line::from(""),
    ];

    let login = &app.login;
    let masked = "*".repeat(login.password.chars().count());
    lines.push(field_line(
        theme,
        "Username",
        &login.username,
        login.focus == LoginField::Username,
    ));
    lines.push(field_line(
        theme,
        "Password",
        &masked,
        login.focus == LoginField::Password,
    ));
    lines.push(Line::from(""));

    if app.session.check_pending() {
        lines.push(Line::from(Span::styled(
            "Checking for an existing session...",
            theme.muted(),
        )));
    }
    if login.is_busy() {
        lines.push(Line::from(Span::styled("Signing in...", theme.warning())));
    } else if let Some(err) = login.error() {
        lines.push(Line::from(Span::styled(err.to_string(), theme.negative())));
    } else {
        lines.push(Line::from(Span::styled("Press Enter to sign in", theme.muted())));
    }

    f.render_widget(Paragraph::new(lines), form);
}
