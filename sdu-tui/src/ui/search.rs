//! Record search: CPF query line, results table, download link.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use sdu_core::cpf;

use crate::app::AppState;
use crate::ui::field_line;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = &app.theme;
    let search = &app.search;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(3),
            Constraint::Length(2),
        ])
        .split(area);

    let query = vec![
        field_line(theme, "Patient CPF", &search.query, true),
        Line::from(Span::styled(
            "Enter:search  Up/Down:select  ^D:download link  Esc:back",
            theme.muted(),
        )),
    ];
    f.render_widget(Paragraph::new(query), chunks[0]);

    if search.is_busy() {
        f.render_widget(
            Paragraph::new(Span::styled("Searching...", theme.warning())),
            chunks[1],
        );
    } else if search.results().is_empty() {
        let msg = if search.has_searched() {
            "No records found."
        } else {
            "Type a CPF and press Enter."
        };
        f.render_widget(Paragraph::new(Span::styled(msg, theme.muted())), chunks[1]);
    } else {
        render_table(f, chunks[1], app);
    }

    let footer = if search.is_download_busy() {
        Line::from(Span::styled("Resolving download link...", theme.warning()))
    } else if let Some(url) = search.download_url() {
        Line::from(vec![
            Span::styled("Download: ", theme.muted()),
            Span::styled(url.to_string(), theme.positive()),
        ])
    } else {
        Line::from("")
    };
    f.render_widget(Paragraph::new(footer), chunks[2]);
}

fn render_table(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = &app.theme;
    let search = &app.search;
    let header = Row::new(["ID", "CPF", "Type", "Date"].map(|h| Cell::from(h).style(theme.accent_bold())));

    let rows = search.results().iter().enumerate().map(|(i, exam)| {
        let style = if i == search.cursor() {
            theme.accent().add_modifier(Modifier::REVERSED)
        } else {
            theme.text()
        };
        Row::new(vec![
            Cell::from(exam.id.to_string()),
            Cell::from(cpf::format_cpf(&exam.taxpayer_id)),
            Cell::from(exam.kind.clone()),
            Cell::from(exam.display_date()),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(8),
        Constraint::Length(16),
        Constraint::Min(20),
        Constraint::Length(12),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(theme.muted())
                .title(format!(" {} record(s) ", search.results().len())),
        )
        .column_spacing(1);
    f.render_widget(table, area);
}
