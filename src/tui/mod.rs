mod ui;
mod widgets;

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::db::Database;
use crate::journey::{BadgeView, Journey};
use crate::models::{BadgeState, LessonStatus};
use crate::progress::ProgressSummary;

const RECENT_ACHIEVEMENTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Lessons,
    LessonDetail,
    Badges,
}

impl View {
    fn next(&self) -> Self {
        match self {
            View::Dashboard => View::Lessons,
            View::Lessons => View::Badges,
            View::LessonDetail => View::Lessons,
            View::Badges => View::Dashboard,
        }
    }

    fn prev(&self) -> Self {
        match self {
            View::Dashboard => View::Badges,
            View::Lessons => View::Dashboard,
            View::LessonDetail => View::Lessons,
            View::Badges => View::Lessons,
        }
    }
}

pub struct StatefulList<T> {
    pub items: Vec<T>,
    pub selected: Option<usize>,
}

impl<T> StatefulList<T> {
    fn with_items(items: Vec<T>) -> Self {
        let selected = if items.is_empty() { None } else { Some(0) };
        Self { items, selected }
    }

    fn next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.selected {
            Some(i) if i + 1 < self.items.len() => i + 1,
            _ => 0,
        };
        self.selected = Some(i);
    }

    fn previous(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.selected {
            Some(0) | None => self.items.len() - 1,
            Some(i) => i - 1,
        };
        self.selected = Some(i);
    }

    fn first(&mut self) {
        if !self.items.is_empty() {
            self.selected = Some(0);
        }
    }

    fn last(&mut self) {
        if !self.items.is_empty() {
            self.selected = Some(self.items.len() - 1);
        }
    }

    fn selected_item(&self) -> Option<&T> {
        self.selected.and_then(|i| self.items.get(i))
    }
}

pub struct App {
    journey: Journey<Database>,
    pub view: View,
    pub lessons: StatefulList<LessonStatus>,
    pub badges: StatefulList<BadgeView>,
    pub selected_lesson: Option<LessonStatus>,
    pub summary: ProgressSummary,
    pub recent: Vec<BadgeState>,
    pub filter_category: Option<String>,
    pub filter_input: String,
    pub filter_mode: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(journey: Journey<Database>) -> Self {
        let lessons = journey.lesson_statuses(None);
        let badges = journey.badge_collection();
        let summary = journey.summary();
        let recent = journey.recent_achievements(RECENT_ACHIEVEMENTS);

        Self {
            journey,
            view: View::Dashboard,
            lessons: StatefulList::with_items(lessons),
            badges: StatefulList::with_items(badges),
            selected_lesson: None,
            summary,
            recent,
            filter_category: None,
            filter_input: String::new(),
            filter_mode: false,
            should_quit: false,
        }
    }

    pub fn user_name(&self) -> &str {
        &self.journey.profile().user.name
    }

    pub fn refresh_data(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.journey.reload()?;
        self.summary = self.journey.summary();
        self.recent = self.journey.recent_achievements(RECENT_ACHIEVEMENTS);
        self.badges = StatefulList::with_items(self.journey.badge_collection());
        self.lessons =
            StatefulList::with_items(self.journey.lesson_statuses(self.filter_category.as_deref()));
        if let Some(current) = &self.selected_lesson {
            self.selected_lesson = Some(self.journey.lesson_status(current.lesson.id)?);
        }
        Ok(())
    }

    fn apply_filter(&mut self) {
        let input = self.filter_input.trim();
        self.filter_category = if input.is_empty() {
            None
        } else {
            Some(input.to_string())
        };
        self.lessons =
            StatefulList::with_items(self.journey.lesson_statuses(self.filter_category.as_deref()));
    }

    fn select_lesson(&mut self) {
        if let Some(status) = self.lessons.selected_item() {
            self.selected_lesson = Some(status.clone());
            self.view = View::LessonDetail;
        }
    }

    fn handle_key(
        &mut self,
        key: KeyCode,
        modifiers: KeyModifiers,
    ) -> Result<(), Box<dyn std::error::Error>> {
        // Category filter input after /
        if self.filter_mode {
            match key {
                KeyCode::Esc => {
                    self.filter_mode = false;
                    self.filter_input.clear();
                }
                KeyCode::Enter => {
                    self.filter_mode = false;
                    self.apply_filter();
                }
                KeyCode::Backspace => {
                    self.filter_input.pop();
                }
                KeyCode::Char(c) => {
                    self.filter_input.push(c);
                }
                _ => {}
            }
            return Ok(());
        }

        match key {
            KeyCode::Char('q') => self.should_quit = true,

            KeyCode::Char('r') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.refresh_data()?;
            }

            KeyCode::Char('/') if self.view == View::Lessons => {
                self.filter_mode = true;
                self.filter_input.clear();
            }

            KeyCode::Esc => match self.view {
                View::LessonDetail => {
                    self.view = View::Lessons;
                    self.selected_lesson = None;
                }
                View::Lessons if self.filter_category.is_some() => {
                    self.filter_input.clear();
                    self.apply_filter();
                }
                View::Dashboard | View::Lessons | View::Badges => {}
            },

            // h/l move between views like vim
            KeyCode::Char('h') | KeyCode::Left => match self.view {
                View::LessonDetail => {
                    self.view = View::Lessons;
                    self.selected_lesson = None;
                }
                _ => self.view = self.view.prev(),
            },
            KeyCode::Char('l') | KeyCode::Right => match self.view {
                View::Lessons => self.select_lesson(),
                _ => self.view = self.view.next(),
            },

            KeyCode::Tab => {
                if modifiers.contains(KeyModifiers::SHIFT) {
                    self.view = self.view.prev();
                } else {
                    self.view = self.view.next();
                }
            }
            KeyCode::BackTab => {
                self.view = self.view.prev();
            }

            KeyCode::Char('j') | KeyCode::Down => match self.view {
                View::Lessons => self.lessons.next(),
                View::Badges => self.badges.next(),
                _ => {}
            },
            KeyCode::Char('k') | KeyCode::Up => match self.view {
                View::Lessons => self.lessons.previous(),
                View::Badges => self.badges.previous(),
                _ => {}
            },

            KeyCode::Char('g') => match self.view {
                View::Lessons => self.lessons.first(),
                View::Badges => self.badges.first(),
                _ => {}
            },
            KeyCode::Char('G') => match self.view {
                View::Lessons => self.lessons.last(),
                View::Badges => self.badges.last(),
                _ => {}
            },

            KeyCode::Enter => {
                if self.view == View::Lessons {
                    self.select_lesson();
                }
            }

            _ => {}
        }
        Ok(())
    }
}

pub fn run(journey: Journey<Database>) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(journey);

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal even when the loop failed
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key.code, key.modifiers)?;
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod stateful_list_tests {
        use super::*;

        #[test]
        fn empty_list_has_no_selection() {
            let mut list: StatefulList<u8> = StatefulList::with_items(vec![]);
            list.next();
            list.previous();
            list.last();
            assert_eq!(list.selected, None);
            assert!(list.selected_item().is_none());
        }

        #[test]
        fn next_and_previous_wrap() {
            let mut list = StatefulList::with_items(vec!['a', 'b', 'c']);
            assert_eq!(list.selected_item(), Some(&'a'));
            list.previous();
            assert_eq!(list.selected_item(), Some(&'c'));
            list.next();
            assert_eq!(list.selected_item(), Some(&'a'));
            list.next();
            assert_eq!(list.selected_item(), Some(&'b'));
        }

        #[test]
        fn first_and_last() {
            let mut list = StatefulList::with_items(vec![1, 2, 3, 4]);
            list.last();
            assert_eq!(list.selected, Some(3));
            list.first();
            assert_eq!(list.selected, Some(0));
        }
    }

    mod view_tests {
        use super::*;

        #[test]
        fn tabs_cycle_both_ways() {
            let mut view = View::Dashboard;
            for _ in 0..3 {
                view = view.next();
            }
            assert_eq!(view, View::Dashboard);
            assert_eq!(View::Dashboard.prev(), View::Badges);
        }

        #[test]
        fn detail_returns_to_lessons() {
            assert_eq!(View::LessonDetail.next(), View::Lessons);
            assert_eq!(View::LessonDetail.prev(), View::Lessons);
        }
    }
}
