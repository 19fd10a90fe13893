use gridfall_engine::{GameSession, SessionState};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    text::Line,
    widgets::{Block, Paragraph, Widget},
};

use crate::view::widgets::{BoardDisplay, CellDisplay, PiecePreview, color, style};

/// The whole game screen: board on the left, next piece and score panel on
/// the right. The border color follows the session state.
#[derive(Debug)]
pub struct SessionDisplay<'a> {
    session: &'a GameSession,
    show_ghost: bool,
}

impl<'a> SessionDisplay<'a> {
    const SIDE_PANEL_WIDTH: u16 = 18;
    const SPACING: u16 = 1;
    const STATS_LINES: u16 = 5;

    pub fn new(session: &'a GameSession, show_ghost: bool) -> Self {
        Self {
            session,
            show_ghost,
        }
    }

    /// Terminal size needed to draw a `cols × rows` board with its side
    /// panel.
    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn required_size(cols: usize, rows: usize) -> (u16, u16) {
        let board_width = cols as u16 * CellDisplay::width() + 2;
        let board_height = rows as u16 * CellDisplay::height() + 2;
        let panel_height = 4 * CellDisplay::height() + 2 + Self::SPACING + Self::STATS_LINES + 2;
        (
            board_width + Self::SPACING + Self::SIDE_PANEL_WIDTH,
            // One extra row for the help line under the board
            board_height.max(panel_height) + 1,
        )
    }

    /// Largest board that fits a terminal of the given size, floored at
    /// zero.
    #[must_use]
    pub fn max_board_size(term_cols: u16, term_rows: u16) -> (usize, usize) {
        let cols = term_cols
            .saturating_sub(2 + Self::SPACING + Self::SIDE_PANEL_WIDTH)
            / CellDisplay::width();
        let rows = term_rows.saturating_sub(2 + 1) / CellDisplay::height();
        (usize::from(cols), usize::from(rows))
    }
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let border_style = match self.session.session_state() {
            SessionState::Running => color::WHITE,
            SessionState::Paused => color::YELLOW,
            SessionState::GameOver => color::RED,
        };

        let game_board = {
            let widget = BoardDisplay::new(self.session.board())
                .falling_piece(self.session.current_piece())
                .block(
                    Block::bordered()
                        .border_style(border_style)
                        .style(style::DEFAULT),
                );
            if self.show_ghost && self.session.session_state().is_running() {
                widget.ghost(self.session.drop_preview())
            } else {
                widget
            }
        };
        let next_panel = PiecePreview::new().piece(self.session.next_piece()).block(
            Block::bordered()
                .title(Line::from("NEXT").centered())
                .border_style(border_style)
                .style(style::DEFAULT),
        );

        let status = match self.session.session_state() {
            SessionState::Running => "",
            SessionState::Paused => "PAUSED",
            SessionState::GameOver => "GAME OVER",
        };
        let stats = self.session.stats();
        let stats_text = vec![
            Line::from(format!("Score  {}", stats.score())),
            Line::from(format!("Lines  {}", stats.total_cleared_lines())),
            Line::from(format!("Pieces {}", stats.locked_pieces())),
            Line::from(format!(
                "Clear  {}",
                self.session.last_cleared_lines().len()
            )),
            Line::from(status).centered(),
        ];
        let stats_panel = Paragraph::new(stats_text).block(
            Block::bordered()
                .title(Line::from("SCORE").centered())
                .border_style(border_style)
                .style(style::DEFAULT),
        );

        let [board_column, panel_column] = Layout::horizontal([
            Constraint::Length(game_board.width()),
            Constraint::Length(SessionDisplay::SIDE_PANEL_WIDTH),
        ])
        .flex(Flex::Center)
        .spacing(SessionDisplay::SPACING)
        .areas::<2>(area);

        let [board_area] = Layout::vertical([Constraint::Length(game_board.height())])
            .areas::<1>(board_column);
        game_board.render(board_area, buf);

        let [next_area, stats_area] = Layout::vertical([
            Constraint::Length(next_panel.height()),
            Constraint::Length(SessionDisplay::STATS_LINES + 2),
        ])
        .spacing(SessionDisplay::SPACING)
        .areas::<2>(panel_column);
        next_panel.render(next_area, buf);
        stats_panel.render(stats_area, buf);
    }
}
