//! Dashboard: counter cards and quick actions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use sdu_core::reference::{group_thousands, DASHBOARD_STATS};

use crate::app::AppState;

const QUICK_ACTIONS: [(&str, &str, &str); 3] = [
    ("s", "Search records", "Find exams by patient CPF"),
    ("u", "Upload file", "Send a new exam or diagnosis"),
    ("c", "CID lookup", "Browse the ICD-10 reference"),
];

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(3)])
        .split(area);

    render_cards(f, rows[0], app);
    render_actions(f, rows[1], app);
}

fn render_cards(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = &app.theme;
    let constraints = vec![Constraint::Ratio(1, DASHBOARD_STATS.len() as u32); DASHBOARD_STATS.len()];
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (stat, cell) in DASHBOARD_STATS.iter().zip(cells.iter()) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.muted())
            .title(format!(" {} ", stat.title));
        let text = vec![
            Line::from(Span::styled(group_thousands(stat.value), theme.accent_bold())),
            Line::from(Span::styled(stat.description, theme.muted())),
        ];
        let para = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
        f.render_widget(para, *cell);
    }
}

fn render_actions(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = &app.theme;
    let mut lines = vec![
        Line::from(Span::styled("Quick actions", theme.accent_bold())),
        Line::from(""),
    ];
    for (key, title, desc) in QUICK_ACTIONS {
        lines.push(Line::from(vec![
            Span::styled(format!("  [{key}] "), theme.accent()),
            Span::styled(format!("{title:<16}"), theme.text()),
            Span::styled(desc, theme.muted()),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Connected to {}", app.base_url),
        theme.muted(),
    )));
    f.render_widget(Paragraph::new(lines), area);
}
