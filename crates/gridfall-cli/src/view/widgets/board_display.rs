use gridfall_engine::{Board, Piece};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::view::widgets::CellDisplay;

/// The playing grid with the falling piece and optional ghost overlaid.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    falling_piece: Option<&'a Piece>,
    ghost: Option<Piece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            falling_piece: None,
            ghost: None,
            block: None,
        }
    }

    pub fn falling_piece(self, piece: &'a Piece) -> Self {
        Self {
            falling_piece: Some(piece),
            ..self
        }
    }

    pub fn ghost(self, piece: Piece) -> Self {
        Self {
            ghost: Some(piece),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn width(&self) -> u16 {
        self.board.cols() as u16 * CellDisplay::width()
            + super::block_horizontal_margin(self.block.as_ref())
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn height(&self) -> u16 {
        self.board.rows() as u16 * CellDisplay::height()
            + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    #[expect(clippy::cast_possible_truncation)]
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let ghost_cells: Vec<(i32, i32)> = self
            .ghost
            .as_ref()
            .map(|piece| piece.occupied_cells().collect())
            .unwrap_or_default();
        let falling_cells: Vec<(i32, i32)> = self
            .falling_piece
            .map(|piece| piece.occupied_cells().collect())
            .unwrap_or_default();

        for (y, row) in self.board.rows_iter().enumerate() {
            for (x, &cell) in row.iter().enumerate() {
                let cell_area = Rect::new(
                    area.x + x as u16 * CellDisplay::width(),
                    area.y + y as u16 * CellDisplay::height(),
                    CellDisplay::width(),
                    CellDisplay::height(),
                )
                .intersection(area);
                if cell_area.is_empty() {
                    continue;
                }

                let position = (x as i32, y as i32);
                let display = match self.falling_piece {
                    Some(piece) if falling_cells.contains(&position) => {
                        CellDisplay::piece(piece.kind())
                    }
                    _ if ghost_cells.contains(&position) => CellDisplay::ghost(),
                    _ => CellDisplay::from_cell(cell, true),
                };
                display.render(cell_area, buf);
            }
        }
    }
}
