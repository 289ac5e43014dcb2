//! Top-level UI layout: navigation tabs, active screen, status bar.

pub mod dashboard;
pub mod login;
pub mod overlays;
pub mod reference;
pub mod search;
pub mod status_bar;
pub mod upload;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs};
use ratatui::Frame;

use sdu_core::Screen;

use crate::app::{AppState, Overlay};

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    f.render_widget(Block::default().style(app.theme.base()), f.area());

    // Split: nav bar + main area + 1-line status bar.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_nav(f, chunks[0], app);
    draw_screen(f, chunks[1], app);
    status_bar::render(f, chunks[2], app);

    match app.overlay {
        Overlay::Help => overlays::render_help(f, chunks[1], app),
        Overlay::ErrorHistory => overlays::render_error_history(f, chunks[1], app),
        Overlay::None => {}
    }
}

/// Screen tabs. The login screen only shows the product name.
fn draw_nav(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = &app.theme;
    if !app.session.is_authenticated() {
        let title = Line::from(vec![
            Span::styled(" SDU ", theme.accent_bold()),
            Span::styled("Unified Health Data System", theme.muted()),
        ]);
        f.render_widget(Paragraph::new(title), area);
        return;
    }

    let titles: Vec<Line> = Screen::NAVIGABLE
        .iter()
        .map(|s| Line::from(format!(" {} ", s.label())))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.screen().index().unwrap_or(0))
        .style(theme.muted())
        .highlight_style(theme.accent_bold())
        .divider("|");
    f.render_widget(tabs, area);
}

fn draw_screen(f: &mut Frame, area: Rect, app: &AppState) {
    let screen = app.screen();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.panel_border(true))
        .title(format!(" {} ", screen.label()))
        .title_style(app.theme.accent_bold());

    let inner = block.inner(area);
    f.render_widget(block, area);

    match screen {
        Screen::Login => login::render(f, inner, app),
        Screen::Dashboard => dashboard::render(f, inner, app),
        Screen::Search => search::render(f, inner, app),
        Screen::Upload => upload::render(f, inner, app),
        Screen::Reference => reference::render(f, inner, app),
    }
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Single-line labelled input, reversed when focused.
pub(crate) fn field_line<'a>(
    theme: &crate::theme::Theme,
    label: &str,
    value: &str,
    focused: bool,
) -> Line<'a> {
    let marker = if focused { "> " } else { "  " };
    Line::from(vec![
        Span::styled(format!("{marker}{label:<14}"), theme.muted()),
        Span::styled(format!(" {value} "), theme.focused(focused)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::sync::mpsc;

    fn app() -> AppState {
        let (tx, _rx) = mpsc::channel();
        let (_tx2, rx2) = mpsc::channel();
        AppState::new(tx, rx2, "http://localhost:8000".into())
    }

    fn rendered(app: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn centered_rect_is_inside() {
        let area = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(60, 40, area);
        assert!(popup.x >= area.x && popup.right() <= area.right());
        assert!(popup.y >= area.y && popup.bottom() <= area.bottom());
        assert_eq!(popup.width, 60);
    }

    #[test]
    fn every_screen_renders() {
        let mut app = app();
        assert!(rendered(&app).contains("Login"));

        app.session.login();
        for screen in Screen::NAVIGABLE {
            app.navigate(screen);
            let text = rendered(&app);
            assert!(text.contains(screen.label()), "missing {:?}", screen);
        }
    }

    #[test]
    fn overlays_render() {
        let mut app = app();
        app.overlay = Overlay::Help;
        assert!(rendered(&app).contains("Keys"));
        app.overlay = Overlay::ErrorHistory;
        assert!(rendered(&app).contains("No errors recorded."));
    }
}
