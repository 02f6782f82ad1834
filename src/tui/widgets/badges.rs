use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::tui::App;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let earned = app.badges.items.iter().filter(|b| b.earned).count();

    let items: Vec<ListItem> = app
        .badges
        .items
        .iter()
        .map(|badge| {
            let def = &badge.definition;
            let (name_style, when) = match badge.earned_at {
                Some(at) => (
                    Style::default().fg(Color::Yellow),
                    at.format("%b %d, %Y").to_string(),
                ),
                None => (Style::default().fg(Color::DarkGray), "Locked".to_string()),
            };

            ListItem::new(Line::from(vec![
                Span::raw(format!("{} ", def.icon)),
                Span::styled(format!("{:<18}", def.name), name_style),
                Span::styled(format!("{:<14}", when), Style::default().fg(Color::Gray)),
                Span::styled(def.description, Style::default().fg(Color::White)),
            ]))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Badges ({}/{}) ", earned, app.badges.items.len()))
        .title_style(Style::default().fg(Color::Cyan));

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(app.badges.selected);

    f.render_stateful_widget(list, area, &mut state);
}
