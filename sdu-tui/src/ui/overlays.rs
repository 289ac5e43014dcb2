//! Overlay widgets: help and error history.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme::Theme;
use crate::ui::centered_rect;

/// Keyboard reference.
pub fn render_help(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = &app.theme;
    let popup = centered_rect(70, 80, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.accent())
        .title(" Keys [any key closes] ")
        .title_style(theme.accent_bold());

    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, theme, "Global");
    key(&mut lines, theme, "Tab / Shift+Tab", "Next / previous screen");
    key(&mut lines, theme, "Ctrl+L", "Log out");
    key(&mut lines, theme, "Ctrl+T", "Toggle dark / light theme");
    key(&mut lines, theme, "Ctrl+E", "Error history");
    key(&mut lines, theme, "Ctrl+C / Ctrl+Q", "Quit");
    lines.push(Line::from(""));

    section(&mut lines, theme, "Dashboard");
    key(&mut lines, theme, "s / u / c", "Search, upload, CID lookup");
    lines.push(Line::from(""));

    section(&mut lines, theme, "Search");
    key(&mut lines, theme, "Enter", "Search by CPF");
    key(&mut lines, theme, "Up / Down", "Select a record");
    key(&mut lines, theme, "Ctrl+D", "Get the download link");
    lines.push(Line::from(""));

    section(&mut lines, theme, "Upload");
    key(&mut lines, theme, "Up / Down", "Move between fields");
    key(&mut lines, theme, "Space / Left / Right", "Change document type");
    key(&mut lines, theme, "Enter on File", "Read and attach the typed path");
    key(&mut lines, theme, "Enter / Ctrl+S", "Submit");
    lines.push(Line::from(""));

    section(&mut lines, theme, "CID");
    key(&mut lines, theme, "Enter", "Look up the typed code");

    f.render_widget(Paragraph::new(lines).block(block), popup);
}

/// Error history overlay.
pub fn render_error_history(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = &app.theme;
    let popup = centered_rect(80, 70, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.negative())
        .title(format!(
            " Error History ({}) [Esc]close [j/k]scroll ",
            app.error_history.len()
        ))
        .title_style(theme.negative());

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    if app.error_history.is_empty() {
        let text = Paragraph::new(Span::styled("No errors recorded.", theme.muted()));
        f.render_widget(text, inner);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    for (i, err) in app
        .error_history
        .iter()
        .enumerate()
        .skip(app.error_scroll)
        .take(inner.height as usize)
    {
        let style = if i == app.error_scroll {
            theme.negative().add_modifier(Modifier::BOLD)
        } else {
            theme.muted()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("[{}] ", err.timestamp.format("%H:%M:%S")), theme.muted()),
            Span::styled(format!("[{}] ", err.category.label()), theme.warning()),
            Span::styled(err.message.as_str(), style),
        ]));
        if !err.context.is_empty() {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(err.context.as_str(), theme.muted()),
            ]));
        }
    }

    f.render_widget(Paragraph::new(lines), inner);
}

fn section<'a>(lines: &mut Vec<Line<'a>>, theme: &Theme, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme.accent_bold())));
}

fn key<'a>(lines: &mut Vec<Line<'a>>, theme: &Theme, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {:>20}  ", keys), theme.accent()),
        Span::styled(desc.to_string(), theme.muted()),
    ]));
}
