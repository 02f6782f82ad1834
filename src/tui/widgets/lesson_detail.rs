use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::models::LessonStatus;
use crate::tui::App;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let Some(status) = &app.selected_lesson else {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Lesson Detail ");
        let paragraph = Paragraph::new("No lesson selected").block(block);
        f.render_widget(paragraph, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Header info
            Constraint::Length(4), // Status
            Constraint::Min(0),    // Quiz
        ])
        .split(area);

    draw_header(f, status, chunks[0]);
    draw_status(f, status, chunks[1]);
    draw_quiz(f, status, chunks[2]);
}

fn draw_header(f: &mut Frame, status: &LessonStatus, area: Rect) {
    let lesson = &status.lesson;
    let prerequisites = if lesson.has_prerequisites() {
        lesson.prerequisites.join(", ")
    } else {
        "None".to_string()
    };

    let text = vec![
        Line::from(Span::styled(
            lesson.description,
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Category: ", Style::default().fg(Color::Gray)),
            Span::styled(lesson.category, Style::default().fg(Color::Cyan)),
            Span::raw("  "),
            Span::styled("Level: ", Style::default().fg(Color::Gray)),
            Span::styled(lesson.difficulty.label(), Style::default().fg(Color::Yellow)),
            Span::raw("  "),
            Span::styled("Duration: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{} min", lesson.duration_minutes),
                Style::default().fg(Color::White),
            ),
        ]),
        Line::from(vec![
            Span::styled("Prerequisites: ", Style::default().fg(Color::Gray)),
            Span::styled(prerequisites, Style::default().fg(Color::White)),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", lesson.title))
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn draw_status(f: &mut Frame, status: &LessonStatus, area: Rect) {
    let line = match (&status.record, status.unlocked) {
        (Some(r), _) => Line::from(vec![
            Span::styled("Completed ", Style::default().fg(Color::Green)),
            Span::styled(
                r.completed_at.format("%b %d, %Y").to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("  "),
            Span::styled("Score: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}%", r.score),
                Style::default().fg(super::score_color(r.score)),
            ),
        ]),
        (None, true) => Line::from(Span::styled(
            format!("Ready. Run: empower complete {} --answers ...", status.lesson.id),
            Style::default().fg(Color::White),
        )),
        (None, false) => Line::from(vec![
            Span::styled("Locked. Complete first: ", Style::default().fg(Color::Red)),
            Span::styled(
                status.missing_prerequisites.join(", "),
                Style::default().fg(Color::White),
            ),
        ]),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Status ")
        .title_style(Style::default().fg(Color::Cyan));

    f.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_quiz(f: &mut Frame, status: &LessonStatus, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Quiz ({} questions) ", status.lesson.quiz.len()))
        .title_style(Style::default().fg(Color::Magenta));

    // Questions stay hidden until the prerequisites are done
    if !status.unlocked {
        let paragraph = Paragraph::new("Unlock this lesson to see the quiz.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let mut text = Vec::new();
    for (i, q) in status.lesson.quiz.iter().enumerate() {
        text.push(Line::from(Span::styled(
            format!("{}. {}", i + 1, q.question),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )));
        for (j, option) in q.options.iter().enumerate() {
            text.push(Line::from(vec![
                Span::styled(format!("   [{}] ", j), Style::default().fg(Color::Cyan)),
                Span::styled(*option, Style::default().fg(Color::Gray)),
            ]));
        }
        text.push(Line::from(""));
    }

    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}
