use ratatui::{
    layout::{Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::{score_color, truncate};
use crate::tui::App;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let title = match &app.filter_category {
        Some(category) => format!(" Lessons (category: {}) ", category),
        None => " Lessons ".to_string(),
    };

    let items: Vec<ListItem> = app
        .lessons
        .items
        .iter()
        .map(|status| {
            let lesson = &status.lesson;
            let (state_text, state_color) = match (&status.record, status.unlocked) {
                (Some(_), _) => ("✓ Done", Color::Green),
                (None, true) => ("○ Open", Color::White),
                (None, false) => ("🔒 Locked", Color::DarkGray),
            };
            let (score_text, score_style) = match &status.record {
                Some(r) => (
                    format!("{}%", r.score),
                    Style::default().fg(score_color(r.score)),
                ),
                None => ("-".to_string(), Style::default().fg(Color::DarkGray)),
            };
            let name_color = if status.unlocked {
                Color::White
            } else {
                Color::DarkGray
            };

            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<36}", truncate(lesson.title, 34)),
                    Style::default().fg(name_color),
                ),
                Span::styled(
                    format!("{:<22}", truncate(lesson.category, 20)),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(
                    format!("{:<14}", lesson.difficulty.label()),
                    Style::default().fg(Color::Yellow),
                ),
                Span::styled(format!("{:<11}", state_text), Style::default().fg(state_color)),
                Span::styled(score_text, score_style),
            ]))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_style(Style::default().fg(Color::Cyan));

    let header_style = Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::BOLD);
    let header = Line::from(vec![
        Span::styled(format!("{:<36}", "Title"), header_style),
        Span::styled(format!("{:<22}", "Category"), header_style),
        Span::styled(format!("{:<14}", "Level"), header_style),
        Span::styled(format!("{:<11}", "Status"), header_style),
        Span::styled("Score", header_style),
    ]);

    let inner = block.inner(area);
    f.render_widget(block, area);

    let list = List::new(items)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(app.lessons.selected);

    let (header_area, list_area) = header_and_rows(inner);
    // Offset by the highlight symbol so columns line up with the rows
    f.render_widget(Paragraph::new(header), header_area.inner(Margin::new(2, 0)));
    f.render_stateful_widget(list, list_area, &mut state);
}

// Split the bordered interior into a one-row column header and the list
fn header_and_rows(inner: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);
    (chunks[0], chunks[1])
}
