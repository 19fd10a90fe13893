use std::path::PathBuf;

use anyhow::{Context as _, bail};

use crate::{store::FileStore, tui, view::widgets::SessionDisplay};

use self::app::PlayApp;

mod app;

const DEFAULT_SAVE_FILE: &str = "./data/gridfall_save_v1.json";

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Board width in columns
    #[clap(long, default_value_t = 10)]
    cols: usize,
    /// Board height in rows
    #[clap(long, default_value_t = 20)]
    rows: usize,
    /// Discard any saved game and start fresh
    #[clap(long)]
    fresh: bool,
    /// File the game is saved to after every command
    #[clap(long, default_value = DEFAULT_SAVE_FILE)]
    save_file: PathBuf,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            cols: 10,
            rows: 20,
            fresh: false,
            save_file: PathBuf::from(DEFAULT_SAVE_FILE),
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        cols,
        rows,
        fresh,
        save_file,
    } = arg;

    validate_dimensions(*cols, *rows)?;

    let store = FileStore::new(save_file.clone());
    let mut app = PlayApp::new(*cols, *rows, *fresh, Box::new(store));
    tui::run(&mut app)?;
    Ok(())
}

/// Rejects board sizes the terminal cannot draw, before any game state is
/// created. Saved games are not affected; a restored session keeps its own
/// dimensions.
fn validate_dimensions(cols: usize, rows: usize) -> anyhow::Result<()> {
    // The I-piece is 4 cells long; anything smaller is unplayable.
    if cols < 4 || rows < 4 {
        bail!("the board must be at least 4x4, got {cols}x{rows}");
    }

    let (term_cols, term_rows) =
        crossterm::terminal::size().context("failed to query the terminal size")?;
    let (needed_cols, needed_rows) = SessionDisplay::required_size(cols, rows);
    if needed_cols > term_cols || needed_rows > term_rows {
        let (max_cols, max_rows) = SessionDisplay::max_board_size(term_cols, term_rows);
        bail!(
            "a {cols}x{rows} board does not fit this terminal; \
             the largest board that fits is {max_cols}x{max_rows}"
        );
    }
    Ok(())
}
