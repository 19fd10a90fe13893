use gridfall_engine::{Cell, PieceKind};
use ratatui::{
    prelude::{Buffer, Rect},
    style::Style,
    widgets::{Paragraph, Widget},
};

use crate::view::widgets::style;

/// One board cell, drawn as a 2×1 block of terminal cells.
#[derive(Debug)]
pub struct CellDisplay {
    style: Style,
    symbol: &'static str,
}

impl CellDisplay {
    pub const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }

    pub fn width() -> u16 {
        2
    }

    pub fn height() -> u16 {
        1
    }

    pub fn from_cell(cell: Cell, show_dots: bool) -> Self {
        match cell {
            None if show_dots => Self::new(style::EMPTY_DOT, "."),
            None => Self::new(style::EMPTY, ""),
            Some(kind) => Self::piece(kind),
        }
    }

    pub fn piece(kind: PieceKind) -> Self {
        let style = match kind {
            PieceKind::I => style::I_BLOCK,
            PieceKind::O => style::O_BLOCK,
            PieceKind::T => style::T_BLOCK,
            PieceKind::S => style::S_BLOCK,
            PieceKind::Z => style::Z_BLOCK,
            PieceKind::J => style::J_BLOCK,
            PieceKind::L => style::L_BLOCK,
        };
        Self::new(style, "")
    }

    pub fn ghost() -> Self {
        Self::new(style::GHOST, "[]")
    }
}

impl Widget for CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        // A Paragraph fills the whole area, not just the symbol's cells
        Paragraph::new(self.symbol)
            .style(self.style)
            .centered()
            .render(area, buf);
    }
}
