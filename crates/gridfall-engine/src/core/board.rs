use serde::{Deserialize, Deserializer, Serialize, Serializer, ser::SerializeSeq as _};

use super::piece::{Piece, PieceKind};

/// A single board cell: empty or locked by a piece of some kind.
pub type Cell = Option<PieceKind>;

/// A full row removed by [`Board::clear_full_lines`], captured before removal
/// so view layers can drive clear effects from the original cell colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearedLine {
    /// Row index at the moment the row was removed.
    pub y: usize,
    /// The row's cells as they were before removal.
    pub cells: Vec<Cell>,
}

/// The playing grid: a `cols × rows` matrix of cells in row-major order.
///
/// Dimensions are chosen at session start and never change for the life of
/// the board. Storage is a flat `Vec` indexed `y * cols + x`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Grid of color indices, e.g. [[0,0,3],[1,1,1]]
        let mut seq = serializer.serialize_seq(Some(self.rows))?;
        for y in 0..self.rows {
            let row: Vec<u8> = self
                .row_cells(y)
                .iter()
                .map(|cell| cell.map_or(0, PieceKind::color_index))
                .collect();
            seq.serialize_element(&row)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let grid = Vec::<Vec<u8>>::deserialize(deserializer)?;
        let rows = grid.len();
        if rows == 0 {
            return Err(serde::de::Error::custom("board must have at least one row"));
        }
        let cols = grid[0].len();
        if cols == 0 {
            return Err(serde::de::Error::custom(
                "board must have at least one column",
            ));
        }

        let mut cells = Vec::with_capacity(cols * rows);
        for row in &grid {
            if row.len() != cols {
                return Err(serde::de::Error::custom(format!(
                    "board rows must all have {cols} cells, got {}",
                    row.len()
                )));
            }
            for &value in row {
                let cell = match value {
                    0 => None,
                    _ => Some(PieceKind::from_color_index(value).ok_or_else(|| {
                        serde::de::Error::custom(format!("invalid board cell value: {value}"))
                    })?),
                };
                cells.push(cell);
            }
        }

        Ok(Board { cols, rows, cells })
    }
}

impl Board {
    /// Creates an empty board.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    #[must_use]
    pub fn new(cols: usize, rows: usize) -> Self {
        assert!(cols > 0 && rows > 0);
        Self {
            cols,
            rows,
            cells: vec![None; cols * rows],
        }
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns one row of cells.
    #[must_use]
    pub fn row_cells(&self, y: usize) -> &[Cell] {
        &self.cells[y * self.cols..][..self.cols]
    }

    /// Returns an iterator over all rows, top to bottom.
    pub fn rows_iter(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks_exact(self.cols)
    }

    /// Tests whether the piece overlaps the walls, the floor, or a locked
    /// cell.
    ///
    /// An occupied piece cell collides when its x-coordinate leaves
    /// `[0, cols)`, its y-coordinate reaches `rows`, or it lands on a
    /// nonempty board cell at `y >= 0`. Cells above the board (`y < 0`)
    /// never collide, which lets pieces sit partially above the visible
    /// grid during spawn and kick probing.
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn collides(&self, piece: &Piece) -> bool {
        piece.occupied_cells().any(|(x, y)| {
            if x < 0 || x >= self.cols as i32 || y >= self.rows as i32 {
                return true;
            }
            y >= 0 && self.cells[y as usize * self.cols + x as usize].is_some()
        })
    }

    /// Writes the piece's occupied cells into the grid.
    ///
    /// The caller must have verified the position is collision-free; locking
    /// an unverified piece silently corrupts the grid.
    #[expect(clippy::cast_sign_loss)]
    pub fn lock_piece(&mut self, piece: &Piece) {
        let kind = piece.kind();
        for (x, y) in piece.occupied_cells() {
            debug_assert!(x >= 0 && y >= 0);
            self.cells[y as usize * self.cols + x as usize] = Some(kind);
        }
    }

    /// Removes every full row and returns them bottom-to-top in removal
    /// order.
    ///
    /// Scans from the bottom; removing a row shifts everything above it down
    /// one, so the same index is examined again before the cursor advances.
    /// Cascading full rows therefore all clear in a single pass.
    pub fn clear_full_lines(&mut self) -> Vec<ClearedLine> {
        let mut cleared = Vec::new();
        let mut y = self.rows;
        while y > 0 {
            let row = y - 1;
            if self.row_is_full(row) {
                cleared.push(ClearedLine {
                    y: row,
                    cells: self.row_cells(row).to_vec(),
                });
                self.remove_row(row);
            } else {
                y -= 1;
            }
        }
        cleared
    }

    fn row_is_full(&self, y: usize) -> bool {
        self.row_cells(y).iter().all(Cell::is_some)
    }

    /// Removes row `y` and inserts a fresh empty row at the top.
    fn remove_row(&mut self, y: usize) {
        self.cells.copy_within(..y * self.cols, self.cols);
        self.cells[..self.cols].fill(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_from_grid(grid: &[&[u8]]) -> Board {
        serde_json::to_value(grid)
            .and_then(serde_json::from_value)
            .unwrap()
    }

    fn grid_of(board: &Board) -> Vec<Vec<u8>> {
        serde_json::to_value(board)
            .and_then(serde_json::from_value)
            .unwrap()
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(4, 3);
        assert_eq!(board.cols(), 4);
        assert_eq!(board.rows(), 3);
        assert!(board.rows_iter().flatten().all(Cell::is_none));
    }

    #[test]
    fn test_collision_against_bounds() {
        let board = Board::new(10, 20);
        let piece = Piece::new(PieceKind::O);

        assert!(!board.collides(&piece));
        assert!(board.collides(&piece.translated(-1, 0)));
        assert!(board.collides(&piece.translated(9, 0)));
        assert!(!board.collides(&piece.translated(8, 0)));
        assert!(board.collides(&piece.translated(0, 19)));
        assert!(!board.collides(&piece.translated(0, 18)));
    }

    #[test]
    fn test_no_collision_above_the_board() {
        let board = Board::new(10, 20);
        let piece = Piece::new(PieceKind::O).translated(4, -2);
        assert!(!board.collides(&piece));
        // Sideways bounds still apply above the top edge
        assert!(board.collides(&Piece::new(PieceKind::O).translated(-1, -2)));
    }

    #[test]
    fn test_collision_against_locked_cells() {
        let mut board = Board::new(10, 20);
        board.lock_piece(&Piece::new(PieceKind::T).translated(3, 18));

        assert!(board.collides(&Piece::new(PieceKind::O).translated(3, 17)));
        assert!(!board.collides(&Piece::new(PieceKind::O).translated(6, 17)));
    }

    #[test]
    fn test_lock_piece_writes_color_indices() {
        let mut board = Board::new(4, 3);
        board.lock_piece(&Piece::new(PieceKind::S).translated(0, 1));

        // S: [[1,1,0],[0,1,1]] with color index 4
        assert_eq!(
            grid_of(&board),
            vec![vec![0, 0, 0, 0], vec![4, 4, 0, 0], vec![0, 4, 4, 0]]
        );
    }

    #[test]
    fn test_clear_full_lines_cascades() {
        let mut board = board_from_grid(&[&[1, 1, 1], &[2, 2, 2], &[0, 1, 0]]);

        let cleared = board.clear_full_lines();
        assert_eq!(cleared.len(), 2);
        assert_eq!(
            cleared[0].cells,
            vec![Some(PieceKind::O), Some(PieceKind::O), Some(PieceKind::O)]
        );
        assert_eq!(
            cleared[1].cells,
            vec![Some(PieceKind::I), Some(PieceKind::I), Some(PieceKind::I)]
        );
        assert_eq!(
            grid_of(&board),
            vec![vec![0, 0, 0], vec![0, 0, 0], vec![0, 1, 0]]
        );
    }

    #[test]
    fn test_clear_full_lines_without_full_rows() {
        let mut board = board_from_grid(&[&[1, 0, 1], &[2, 2, 0], &[0, 1, 0]]);
        assert!(board.clear_full_lines().is_empty());
        assert_eq!(
            grid_of(&board),
            vec![vec![1, 0, 1], vec![2, 2, 0], vec![0, 1, 0]]
        );
    }

    #[test]
    fn test_clear_bottom_row_shifts_stack_down() {
        let mut board = board_from_grid(&[&[3, 0], &[0, 5], &[6, 6]]);

        let cleared = board.clear_full_lines();
        assert_eq!(cleared.len(), 1);
        assert_eq!(cleared[0].y, 2);
        assert_eq!(
            grid_of(&board),
            vec![vec![0, 0], vec![3, 0], vec![0, 5]]
        );
    }

    #[test]
    fn test_board_serialization_roundtrip() {
        let mut board = Board::new(5, 4);
        board.lock_piece(&Piece::new(PieceKind::L).translated(1, 2));

        let json = serde_json::to_string(&board).unwrap();
        let restored: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, board);
    }

    #[test]
    fn test_board_deserialization_rejects_bad_grids() {
        // Empty, ragged, and out-of-range grids
        assert!(serde_json::from_str::<Board>("[]").is_err());
        assert!(serde_json::from_str::<Board>("[[]]").is_err());
        assert!(serde_json::from_str::<Board>("[[0,0],[0]]").is_err());
        assert!(serde_json::from_str::<Board>("[[0,8]]").is_err());
    }
}
