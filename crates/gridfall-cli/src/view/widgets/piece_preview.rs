use gridfall_engine::Piece;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::view::widgets::CellDisplay;

/// The lookahead piece, centered in a 4×4-cell box.
#[derive(Debug)]
pub struct PiecePreview<'a> {
    piece: Option<&'a Piece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PiecePreview<'a> {
    pub fn new() -> Self {
        Self {
            piece: None,
            block: None,
        }
    }

    pub fn piece(self, piece: &'a Piece) -> Self {
        Self {
            piece: Some(piece),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        4 * CellDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        4 * CellDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Default for PiecePreview<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for PiecePreview<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PiecePreview<'_> {
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let Some(piece) = self.piece else {
            return;
        };

        let shape = piece.shape();
        let offset_x = (4 - shape.width() as u16) / 2 * CellDisplay::width();
        let offset_y = (4 - shape.height() as u16) / 2 * CellDisplay::height();

        for (dx, dy) in shape.occupied_offsets() {
            let cell_area = Rect::new(
                area.x + offset_x + dx as u16 * CellDisplay::width(),
                area.y + offset_y + dy as u16 * CellDisplay::height(),
                CellDisplay::width(),
                CellDisplay::height(),
            )
            .intersection(area);
            if cell_area.is_empty() {
                continue;
            }
            CellDisplay::piece(piece.kind()).render(cell_area, buf);
        }
    }
}
