use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use super::percent_bar;
use crate::catalog;
use crate::tui::App;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9), // Stats + score distribution
            Constraint::Min(0),    // Recent achievements
        ])
        .split(area);

    let top_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[0]);

    draw_stats(f, app, top_chunks[0]);
    draw_distribution(f, app, top_chunks[1]);
    draw_recent_achievements(f, app, chunks[1]);
}

fn draw_stats(f: &mut Frame, app: &App, area: Rect) {
    let s = &app.summary;

    let text = vec![
        Line::from(vec![
            Span::styled("Lessons: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}/{}", s.lessons_completed, s.lessons_total),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Complete: ", Style::default().fg(Color::Gray)),
            Span::styled(
                percent_bar(s.completion_percentage),
                Style::default().fg(Color::Green),
            ),
            Span::styled(
                format!(" {}%", s.completion_percentage),
                Style::default().fg(Color::White),
            ),
        ]),
        Line::from(vec![
            Span::styled("Avg Score: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}%", s.average_score),
                Style::default().fg(super::score_color(s.average_score)),
            ),
        ]),
        Line::from(vec![
            Span::styled("This Week: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}", s.weekly_activity),
                Style::default().fg(Color::White),
            ),
        ]),
        Line::from(vec![
            Span::styled("Streak: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{} days", s.current_streak),
                Style::default().fg(if s.current_streak > 0 {
                    Color::Yellow
                } else {
                    Color::White
                }),
            ),
            Span::styled(
                format!(" (best {})", s.longest_streak),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Progress ")
        .title_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(text).block(block);
    f.render_widget(paragraph, area);
}

fn draw_distribution(f: &mut Frame, app: &App, area: Rect) {
    let d = &app.summary.distribution;
    let rows = [
        ("90-100%", d.excellent, Color::Green),
        ("70-89% ", d.good, Color::Cyan),
        ("50-69% ", d.fair, Color::Yellow),
        ("0-49%  ", d.needs_work, Color::Red),
    ];

    let text: Vec<Line> = rows
        .iter()
        .map(|(label, count, color)| {
            Line::from(vec![
                Span::styled(format!("{} ", label), Style::default().fg(Color::Gray)),
                Span::styled("■".repeat(*count), Style::default().fg(*color)),
                Span::styled(format!(" {}", count), Style::default().fg(Color::White)),
            ])
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Scores ")
        .title_style(Style::default().fg(Color::Yellow));

    f.render_widget(Paragraph::new(text).block(block), area);
}

fn draw_recent_achievements(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Recent Achievements ")
        .title_style(Style::default().fg(Color::Magenta));

    if app.recent.is_empty() {
        let paragraph = Paragraph::new("No badges yet. Complete a lesson to earn one!")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = app
        .recent
        .iter()
        .map(|state| {
            let def = catalog::badge_definition(state.id);
            let date = state
                .earned_at
                .map(|t| t.format("%b %d").to_string())
                .unwrap_or_default();

            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<8}", date),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(format!("{} ", def.icon)),
                Span::styled(
                    format!("{:<16}", def.name),
                    Style::default().fg(Color::White),
                ),
                Span::styled(def.description, Style::default().fg(Color::Gray)),
            ]))
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}
