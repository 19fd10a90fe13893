use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{
    board_display::*, cell_display::*, piece_preview::*, session_display::*,
};

mod board_display;
mod cell_display;
mod piece_preview;
mod session_display;

mod color {
    use ratatui::style::Color;

    // Piece colors match the classic palette, one per kind
    pub const I_RED: Color = Color::Rgb(0xFF, 0x0D, 0x72);
    pub const O_BLUE: Color = Color::Rgb(0x0D, 0xC2, 0xFF);
    pub const T_GREEN: Color = Color::Rgb(0x0D, 0xFF, 0x72);
    pub const S_PURPLE: Color = Color::Rgb(0xF5, 0x38, 0xFF);
    pub const Z_ORANGE: Color = Color::Rgb(0xFF, 0x8E, 0x0D);
    pub const J_YELLOW: Color = Color::Rgb(0xFF, 0xE1, 0x38);
    pub const L_INDIGO: Color = Color::Rgb(0x38, 0x77, 0xFF);

    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
    pub const YELLOW: Color = Color::Rgb(255, 255, 0);
    pub const RED: Color = Color::Rgb(255, 0, 0);
}

pub mod style {
    use ratatui::style::{Color, Style};

    use crate::view::widgets::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    const fn bg_only(color: Color) -> Style {
        Style::new().fg(color).bg(color)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const EMPTY: Style = bg_only(color::BLACK);
    pub const EMPTY_DOT: Style = fg_bg(color::GRAY, color::BLACK);
    pub const GHOST: Style = fg_bg(color::WHITE, color::BLACK);

    pub const I_BLOCK: Style = bg_only(color::I_RED);
    pub const O_BLOCK: Style = bg_only(color::O_BLUE);
    pub const T_BLOCK: Style = bg_only(color::T_GREEN);
    pub const S_BLOCK: Style = bg_only(color::S_PURPLE);
    pub const Z_BLOCK: Style = bg_only(color::Z_ORANGE);
    pub const J_BLOCK: Style = bg_only(color::J_YELLOW);
    pub const L_BLOCK: Style = bg_only(color::L_INDIGO);
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.width - inner_rect.width
}
