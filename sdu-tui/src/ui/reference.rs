//! CID lookup with the monthly cases chart, category split and top codes.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph};
use ratatui::Frame;

use sdu_core::reference::{self, CATEGORY_SHARES, MONTHLY_CASES};

use crate::app::AppState;
use crate::ui::field_line;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(6)])
        .split(area);
    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ])
        .split(rows[1]);

    render_lookup(f, rows[0], app);
    render_monthly(f, charts[0], app);
    render_categories(f, charts[1], app);
    render_top_codes(f, charts[2], app);
}

fn render_lookup(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = &app.theme;
    let state = &app.reference;
    let mut lines = vec![field_line(theme, "CID code", &state.input, true)];

    if let Some(entry) = state.selected {
        lines.push(Line::from(vec![
            Span::styled(format!("  {} ", entry.code), theme.accent_bold()),
            Span::styled(entry.description, theme.text()),
        ]));
        lines.push(Line::from(Span::styled(format!("  {}", entry.category), theme.muted())));
        lines.push(Line::from(vec![
            Span::styled("  Cases: ", theme.muted()),
            Span::styled(entry.case_count_label(), theme.positive()),
            Span::styled("  Prevalence: ", theme.muted()),
            Span::styled(entry.prevalence_label(), theme.positive()),
        ]));
    } else if state.not_found() {
        lines.push(Line::from(Span::styled(
            format!(
                "  Code not found. Try: {}",
                reference::known_codes()
            ),
            theme.warning(),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "  Type a code (e.g. I10) and press Enter.",
            theme.muted(),
        )));
    }
    f.render_widget(Paragraph::new(lines), area);
}

fn render_monthly(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = &app.theme;
    let bars: Vec<Bar> = MONTHLY_CASES
        .iter()
        .map(|(month, value)| Bar::default().label(Line::from(*month)).value(*value))
        .collect();
    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.muted())
                .title(" Cases per month "),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(4)
        .bar_gap(1)
        .bar_style(theme.accent())
        .value_style(theme.accent().add_modifier(ratatui::style::Modifier::REVERSED));
    f.render_widget(chart, area);
}

fn render_categories(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.muted())
        .title(" By category ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let bar_room = inner.width.saturating_sub(20) as usize;
    let lines: Vec<Line> = CATEGORY_SHARES
        .iter()
        .map(|share| {
            let (r, g, b) = share.color;
            let filled = bar_room * usize::from(share.percent) / 100;
            Line::from(vec![
                Span::styled(format!("{:<14}", share.name), theme.text()),
                Span::styled("█".repeat(filled.max(1)), Style::default().fg(Color::Rgb(r, g, b))),
                Span::styled(format!(" {}%", share.percent), theme.muted()),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

fn render_top_codes(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = &app.theme;
    let lines: Vec<Line> = reference::entries()
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            Line::from(vec![
                Span::styled(format!("{}. {} ", i + 1, entry.code), theme.accent()),
                Span::styled(format!("{} cases ", entry.case_count_label()), theme.text()),
                Span::styled(entry.prevalence_label(), theme.muted()),
            ])
        })
        .collect();
    let para = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.muted())
            .title(" Most frequent "),
    );
    f.render_widget(para, area);
}
