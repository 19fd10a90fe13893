use std::time::Duration;

use crossterm::event::{Event, KeyCode};
use gridfall_engine::{GameSession, SessionState, SnapshotStore};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Text,
};

use crate::{tui, view::widgets::SessionDisplay};

#[derive(Debug)]
pub struct PlayApp {
    session: GameSession,
    initial_cols: usize,
    initial_rows: usize,
    is_exiting: bool,
}

impl PlayApp {
    pub fn new(cols: usize, rows: usize, fresh: bool, store: Box<dyn SnapshotStore>) -> Self {
        let session = if fresh {
            GameSession::new(cols, rows, store)
        } else {
            GameSession::resume_or_new(cols, rows, store)
        };
        Self {
            session,
            initial_cols: cols,
            initial_rows: rows,
            is_exiting: false,
        }
    }
}

impl tui::App for PlayApp {
    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, event: &Event) {
        let is_running = self.session.session_state().is_running();

        if let Some(event) = event.as_key_event() {
            match event.code {
                KeyCode::Left if is_running => _ = self.session.try_move_left(),
                KeyCode::Right if is_running => _ = self.session.try_move_right(),
                KeyCode::Up if is_running => _ = self.session.try_rotate(),
                KeyCode::Down if is_running => self.session.soft_drop(),
                KeyCode::Char(' ') if is_running => self.session.hard_drop(),
                KeyCode::Char('p') => self.session.toggle_pause(),
                KeyCode::Char('n') => {
                    self.session.start_new_game(self.initial_cols, self.initial_rows);
                }
                KeyCode::Char('q') => self.is_exiting = true,
                _ => {}
            }
        }
    }

    fn update(&mut self, dt: Duration) {
        self.session.tick(dt);
    }

    fn draw(&self, frame: &mut Frame<'_>) {
        let session_display = SessionDisplay::new(&self.session, true);
        let help_text = match self.session.session_state() {
            SessionState::Running => {
                "Controls: ← → (Move) | ↑ (Rotate) | ↓ (Soft Drop) | Space (Hard Drop) | P (Pause) | Q (Quit)"
            }
            SessionState::Paused => "Controls: P (Resume) | N (New Game) | Q (Quit)",
            SessionState::GameOver => "Controls: N (New Game) | Q (Quit)",
        };
        let help_text = Text::from(help_text)
            .style(Style::default().fg(Color::DarkGray))
            .centered();

        let [main_area, help_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)])
                .areas::<2>(frame.area());
        frame.render_widget(session_display, main_area);
        frame.render_widget(help_text, help_area);
    }
}
