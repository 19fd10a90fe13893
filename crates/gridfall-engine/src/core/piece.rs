use arrayvec::ArrayVec;
use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Deserializer, Serialize, Serializer, ser::SerializeSeq as _};

use super::board::Board;

/// Enum representing the type of piece.
///
/// The discriminant doubles as the color index written into board cells and
/// the persisted record (`1..=7`; `0` marks an empty cell).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 1,
    /// O-piece.
    O = 2,
    /// T-piece.
    T = 3,
    /// S-piece.
    S = 4,
    /// Z-piece.
    Z = 5,
    /// J-piece.
    J = 6,
    /// L-piece.
    L = 7,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        match rng.random_range(0..PieceKind::LEN) {
            0 => PieceKind::I,
            1 => PieceKind::O,
            2 => PieceKind::T,
            3 => PieceKind::S,
            4 => PieceKind::Z,
            5 => PieceKind::J,
            _ => PieceKind::L,
        }
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// Returns the color index stored in board cells and persisted records.
    #[must_use]
    pub const fn color_index(self) -> u8 {
        self as u8
    }

    /// Parses a piece kind from its color index.
    ///
    /// # Examples
    ///
    /// ```
    /// use gridfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_color_index(1), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_color_index(7), Some(PieceKind::L));
    /// assert_eq!(PieceKind::from_color_index(0), None);
    /// assert_eq!(PieceKind::from_color_index(8), None);
    /// ```
    #[must_use]
    pub const fn from_color_index(value: u8) -> Option<Self> {
        match value {
            1 => Some(PieceKind::I),
            2 => Some(PieceKind::O),
            3 => Some(PieceKind::T),
            4 => Some(PieceKind::S),
            5 => Some(PieceKind::Z),
            6 => Some(PieceKind::J),
            7 => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Returns the canonical (unrotated) shape matrix of this piece kind.
    #[must_use]
    pub fn base_shape(self) -> Shape {
        const C: bool = true;
        const E: bool = false;
        let rows: &[&[bool]] = match self {
            PieceKind::I => &[&[C, C, C, C]],
            PieceKind::O => &[&[C, C], &[C, C]],
            PieceKind::T => &[&[E, C, E], &[C, C, C]],
            PieceKind::S => &[&[C, C, E], &[E, C, C]],
            PieceKind::Z => &[&[E, C, C], &[C, C, E]],
            PieceKind::J => &[&[C, E, E], &[C, C, C]],
            PieceKind::L => &[&[E, E, C], &[C, C, C]],
        };
        Shape::from_rows(rows)
    }
}

/// Rectangular occupancy matrix of a piece, at most 4×4.
///
/// Canonical shapes are trimmed to their bounding box (the I-piece is 1×4,
/// the O-piece 2×2, the rest 2×3), so a shape's dimensions change when it
/// rotates. Rotated shapes are first-class values: they serialize as the
/// literal matrix, not as a canonical-shape index, so a restore reproduces
/// in-progress rotation exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    rows: ArrayVec<ArrayVec<bool, 4>, 4>,
}

impl Serialize for Shape {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Matrix of 0/1 cells, e.g. [[0,1,0],[1,1,1]]
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            let cells: ArrayVec<u8, 4> = row.iter().map(|&cell| u8::from(cell)).collect();
            seq.serialize_element(cells.as_slice())?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Shape {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let matrix = Vec::<Vec<u8>>::deserialize(deserializer)?;
        let height = matrix.len();
        if !(1..=4).contains(&height) {
            return Err(serde::de::Error::custom(format!(
                "shape must have 1-4 rows, got {height}"
            )));
        }
        let width = matrix[0].len();
        if !(1..=4).contains(&width) {
            return Err(serde::de::Error::custom(format!(
                "shape must have 1-4 columns, got {width}"
            )));
        }

        let mut rows = ArrayVec::new();
        for cells in &matrix {
            if cells.len() != width {
                return Err(serde::de::Error::custom(format!(
                    "shape rows must all have {width} cells, got {}",
                    cells.len()
                )));
            }
            let mut row = ArrayVec::new();
            for &cell in cells {
                match cell {
                    0 => row.push(false),
                    1 => row.push(true),
                    other => {
                        return Err(serde::de::Error::custom(format!(
                            "shape cells must be 0 or 1, got {other}"
                        )));
                    }
                }
            }
            rows.push(row);
        }

        let shape = Shape { rows };
        if shape.occupied_offsets().next().is_none() {
            return Err(serde::de::Error::custom("shape has no occupied cells"));
        }
        Ok(shape)
    }
}

impl Shape {
    /// Builds a shape from literal rows.
    ///
    /// # Panics
    ///
    /// Panics if the matrix exceeds 4×4 or the rows are ragged.
    pub(crate) fn from_rows(rows: &[&[bool]]) -> Self {
        let width = rows[0].len();
        let rows = rows
            .iter()
            .map(|row| {
                assert_eq!(row.len(), width);
                row.iter().copied().collect()
            })
            .collect();
        Self { rows }
    }

    /// Width of the bounding matrix in cells.
    #[must_use]
    pub fn width(&self) -> usize {
        self.rows[0].len()
    }

    /// Height of the bounding matrix in cells.
    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Returns an iterator of the occupied `(dx, dy)` offsets within the matrix.
    #[expect(clippy::cast_possible_truncation)]
    pub fn occupied_offsets(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.rows.iter().enumerate().flat_map(|(dy, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(dx, &cell)| cell.then_some((dx as i32, dy as i32)))
        })
    }

    /// Returns the 90° clockwise rotation: transpose, then reverse each
    /// resulting row. A `w×h` matrix becomes `h×w`.
    #[must_use]
    pub fn rotated_clockwise(&self) -> Self {
        let mut rows = ArrayVec::new();
        for x in 0..self.width() {
            let mut row = ArrayVec::new();
            for y in (0..self.height()).rev() {
                row.push(self.rows[y][x]);
            }
            rows.push(row);
        }
        Self { rows }
    }
}

/// A falling piece: kind, current shape matrix, and top-left anchor position.
///
/// The shape travels with the piece so rotation state is self-contained.
/// `y` only goes negative while probing candidate positions; committed
/// positions keep every occupied cell at `y >= 0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    shape: Shape,
    x: i32,
    y: i32,
}

impl Piece {
    /// Creates a piece of the given kind in its canonical shape at the origin.
    #[must_use]
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            shape: kind.base_shape(),
            x: 0,
            y: 0,
        }
    }

    /// Reassembles a piece from persisted parts, shape matrix taken verbatim.
    #[must_use]
    pub fn restored(kind: PieceKind, shape: Shape, x: i32, y: i32) -> Self {
        Self { kind, shape, x, y }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[must_use]
    pub fn x(&self) -> i32 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> i32 {
        self.y
    }

    /// Returns an iterator of occupied cells in absolute board coordinates.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .occupied_offsets()
            .map(move |(dx, dy)| (self.x + dx, self.y + dy))
    }

    /// Returns a copy shifted by `(dx, dy)`.
    #[must_use]
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self.clone()
        }
    }

    /// Returns a copy moved to the spawn position: horizontally centered at
    /// the top of a board `cols` columns wide.
    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn at_spawn(mut self, cols: usize) -> Self {
        self.x = (cols / 2) as i32 - (self.shape.width() / 2) as i32;
        self.y = 0;
        self
    }

    /// Rotates 90° clockwise, searching for a legal position with wall kicks.
    ///
    /// The rotated shape is tried at the current `x` first, then nudged by the
    /// cumulative offsets `+1, -2, +3, -4, …` until it no longer collides.
    /// The search gives up once the next positive offset exceeds the rotated
    /// shape's width; `None` leaves the caller's piece untouched.
    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn rotated_with_kicks(&self, board: &Board) -> Option<Self> {
        let mut candidate = Self {
            shape: self.shape.rotated_clockwise(),
            ..self.clone()
        };
        let width = candidate.shape.width() as i32;
        let mut kick = 1;
        while board.collides(&candidate) {
            candidate.x += kick;
            kick = -(kick + kick.signum());
            if kick > width {
                return None;
            }
        }
        Some(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape_matrix(shape: &Shape) -> Vec<Vec<u8>> {
        serde_json::to_value(shape)
            .and_then(serde_json::from_value)
            .unwrap()
    }

    #[test]
    fn test_color_index_roundtrip() {
        for kind in [
            PieceKind::I,
            PieceKind::O,
            PieceKind::T,
            PieceKind::S,
            PieceKind::Z,
            PieceKind::J,
            PieceKind::L,
        ] {
            assert_eq!(PieceKind::from_color_index(kind.color_index()), Some(kind));
        }
    }

    #[test]
    fn test_base_shape_dimensions() {
        assert_eq!(PieceKind::I.base_shape().width(), 4);
        assert_eq!(PieceKind::I.base_shape().height(), 1);
        assert_eq!(PieceKind::O.base_shape().width(), 2);
        assert_eq!(PieceKind::O.base_shape().height(), 2);
        for kind in [
            PieceKind::T,
            PieceKind::S,
            PieceKind::Z,
            PieceKind::J,
            PieceKind::L,
        ] {
            assert_eq!(kind.base_shape().width(), 3);
            assert_eq!(kind.base_shape().height(), 2);
        }
    }

    #[test]
    fn test_every_shape_has_four_cells() {
        for kind in [
            PieceKind::I,
            PieceKind::O,
            PieceKind::T,
            PieceKind::S,
            PieceKind::Z,
            PieceKind::J,
            PieceKind::L,
        ] {
            assert_eq!(kind.base_shape().occupied_offsets().count(), 4);
        }
    }

    #[test]
    fn test_rotation_transposes_and_reverses() {
        // T: [[0,1,0],[1,1,1]] rotated clockwise -> [[1,0],[1,1],[1,0]]
        let rotated = PieceKind::T.base_shape().rotated_clockwise();
        assert_eq!(
            shape_matrix(&rotated),
            vec![vec![1, 0], vec![1, 1], vec![1, 0]]
        );
    }

    #[test]
    fn test_square_rotation_is_identity() {
        let square = PieceKind::O.base_shape();
        assert_eq!(square.rotated_clockwise(), square);
    }

    #[test]
    fn test_four_rotations_restore_shape() {
        for kind in [
            PieceKind::I,
            PieceKind::T,
            PieceKind::S,
            PieceKind::Z,
            PieceKind::J,
            PieceKind::L,
        ] {
            let shape = kind.base_shape();
            let full_turn = shape
                .rotated_clockwise()
                .rotated_clockwise()
                .rotated_clockwise()
                .rotated_clockwise();
            assert_eq!(full_turn, shape, "{kind:?}");
        }
    }

    #[test]
    fn test_shape_serialization_roundtrip() {
        let rotated = PieceKind::J.base_shape().rotated_clockwise();
        let json = serde_json::to_string(&rotated).unwrap();
        let restored: Shape = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, rotated);
    }

    #[test]
    fn test_shape_serialization_format() {
        let json = serde_json::to_string(&PieceKind::T.base_shape()).unwrap();
        assert_eq!(json, "[[0,1,0],[1,1,1]]");
    }

    #[test]
    fn test_shape_deserialization_rejects_bad_matrices() {
        // Empty, oversized, ragged, out-of-range, and all-zero matrices
        assert!(serde_json::from_str::<Shape>("[]").is_err());
        assert!(serde_json::from_str::<Shape>("[[1,1,1,1,1]]").is_err());
        assert!(serde_json::from_str::<Shape>("[[1,1],[1]]").is_err());
        assert!(serde_json::from_str::<Shape>("[[1,2]]").is_err());
        assert!(serde_json::from_str::<Shape>("[[0,0],[0,0]]").is_err());
    }

    #[test]
    fn test_spawn_position_is_centered() {
        let piece = Piece::new(PieceKind::I).at_spawn(10);
        assert_eq!((piece.x(), piece.y()), (3, 0));

        let piece = Piece::new(PieceKind::O).at_spawn(10);
        assert_eq!((piece.x(), piece.y()), (4, 0));

        let piece = Piece::new(PieceKind::T).at_spawn(9);
        assert_eq!((piece.x(), piece.y()), (3, 0));
    }

    #[test]
    fn test_occupied_cells_are_translated() {
        let piece = Piece::new(PieceKind::O).translated(3, 5);
        let cells: Vec<_> = piece.occupied_cells().collect();
        assert_eq!(cells, vec![(3, 5), (4, 5), (3, 6), (4, 6)]);
    }

    #[test]
    fn test_rotation_without_obstruction_keeps_position() {
        let board = Board::new(10, 20);
        let piece = Piece::new(PieceKind::T).at_spawn(10).translated(0, 5);
        let rotated = piece.rotated_with_kicks(&board).unwrap();
        assert_eq!(rotated.x(), piece.x());
        assert_eq!(rotated.y(), piece.y());
        assert_eq!(rotated.shape(), &piece.shape().rotated_clockwise());
    }

    #[test]
    fn test_rotation_kicks_around_an_obstruction() {
        // Vertical I at x=3; a locked cell at (6, 5) blocks the rotated
        // horizontal span at offsets 0 and +1, so the search settles at -1.
        let mut board = Board::new(10, 20);
        board.lock_piece(&Piece::new(PieceKind::O).translated(6, 4));

        let piece = Piece::restored(
            PieceKind::I,
            PieceKind::I.base_shape().rotated_clockwise(),
            3,
            5,
        );
        assert!(!board.collides(&piece));

        let rotated = piece.rotated_with_kicks(&board).unwrap();
        assert_eq!(rotated.shape().height(), 1);
        assert_eq!(rotated.x(), 2);
        assert_eq!(rotated.y(), 5);
        assert!(!board.collides(&rotated));
    }

    #[test]
    fn test_rotation_rejected_when_no_kick_fits() {
        // A 3-wide board cannot host the horizontal I at any kick offset.
        let board = Board::new(3, 20);
        let piece = Piece::restored(
            PieceKind::I,
            PieceKind::I.base_shape().rotated_clockwise(),
            1,
            5,
        );
        assert!(!board.collides(&piece));
        assert!(piece.rotated_with_kicks(&board).is_none());
    }
}
