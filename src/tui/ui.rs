use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use super::widgets::{badges, dashboard, lesson_detail, lessons};
use super::{App, View};

const TAB_TITLES: [&str; 3] = ["Dashboard", "Lessons", "Badges"];

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Help bar
        ])
        .split(f.area());

    draw_tabs(f, app, chunks[0]);

    match app.view {
        View::Dashboard => dashboard::draw(f, app, chunks[1]),
        View::Lessons => lessons::draw(f, app, chunks[1]),
        View::LessonDetail => lesson_detail::draw(f, app, chunks[1]),
        View::Badges => badges::draw(f, app, chunks[1]),
    }

    let help = if app.filter_mode {
        filter_prompt(app)
    } else {
        key_hints(app)
    };
    f.render_widget(
        Paragraph::new(help).style(Style::default().bg(Color::DarkGray)),
        chunks[2],
    );
}

fn draw_tabs(f: &mut Frame, app: &App, area: Rect) {
    let selected = match app.view {
        View::Dashboard => 0,
        View::Lessons | View::LessonDetail => 1,
        View::Badges => 2,
    };

    let tabs = Tabs::new(TAB_TITLES.to_vec())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Empower · {} ", app.user_name())),
        )
        .select(selected)
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    f.render_widget(tabs, area);
}

fn filter_prompt(app: &App) -> Line<'_> {
    let mut spans = vec![
        Span::styled("category /", Style::default().fg(Color::Yellow)),
        Span::raw(app.filter_input.as_str()),
        Span::styled("█", Style::default().fg(Color::Yellow)),
        Span::raw(" | "),
    ];
    spans.extend(hint("<CR>", "Apply"));
    spans.extend(hint("<Esc>", "Cancel"));
    Line::from(spans)
}

fn key_hints(app: &App) -> Line<'static> {
    let mut pairs: Vec<(&str, &str)> = vec![("h/l", "Views")];

    match app.view {
        View::Dashboard => pairs.push(("^r", "Refresh")),
        View::Lessons => {
            pairs.extend([
                ("j/k", "Nav"),
                ("g/G", "Top/Bot"),
                ("l/<CR>", "Open"),
                ("/", "Category"),
            ]);
            if app.filter_category.is_some() {
                pairs.push(("<Esc>", "Clear"));
            }
        }
        View::LessonDetail => pairs.extend([("h/<Esc>", "Back"), ("^r", "Refresh")]),
        View::Badges => pairs.extend([("j/k", "Nav"), ("g/G", "Top/Bot"), ("^r", "Refresh")]),
    }
    pairs.push(("q", "Quit"));

    Line::from(
        pairs
            .into_iter()
            .flat_map(|(key, label)| hint(key, label))
            .collect::<Vec<_>>(),
    )
}

fn hint<'a>(key: &'a str, label: &'a str) -> [Span<'a>; 2] {
    [
        Span::styled(key, Style::default().fg(Color::Cyan)),
        Span::raw(format!(" {}  ", label)),
    ]
}
