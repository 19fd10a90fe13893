use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{
    board::Board,
    piece::{Piece, PieceKind, Shape},
};

/// Persisted form of a whole game, sufficient for exact restoration.
///
/// Shapes are stored as literal matrices (see [`Shape`]'s serde format), so a
/// piece restored mid-rotation comes back in the same orientation. The kind
/// travels separately as its color index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub board: Board,
    pub score: usize,
    pub current_piece: CurrentPieceRecord,
    pub next_piece: NextPieceRecord,
    pub cols: usize,
    pub rows: usize,
    pub paused: bool,
    pub game_over: bool,
}

/// The falling piece's persisted fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentPieceRecord {
    pub shape_ref: Shape,
    pub x: i32,
    pub y: i32,
    pub color_index: u8,
}

/// The lookahead piece's persisted fields. It has no position yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextPieceRecord {
    pub shape_ref: Shape,
    pub color_index: u8,
}

impl Snapshot {
    /// Captures the persisted fields of a running game.
    #[must_use]
    pub(crate) fn capture(
        board: &Board,
        score: usize,
        current: &Piece,
        next: &Piece,
        paused: bool,
        game_over: bool,
    ) -> Self {
        Self {
            board: board.clone(),
            score,
            current_piece: CurrentPieceRecord {
                shape_ref: current.shape().clone(),
                x: current.x(),
                y: current.y(),
                color_index: current.kind().color_index(),
            },
            next_piece: NextPieceRecord {
                shape_ref: next.shape().clone(),
                color_index: next.kind().color_index(),
            },
            cols: board.cols(),
            rows: board.rows(),
            paused,
            game_over,
        }
    }

    /// Screens out records that cannot restore a playable game: finished
    /// games, dimension fields that disagree with the stored grid, and color
    /// indices that name no piece kind.
    ///
    /// Store implementations apply this to every loaded record, so a
    /// rejected save behaves exactly like a missing one.
    #[must_use]
    pub fn validated(self) -> Option<Self> {
        if self.game_over {
            return None;
        }
        if self.board.cols() != self.cols || self.board.rows() != self.rows {
            return None;
        }
        PieceKind::from_color_index(self.current_piece.color_index)?;
        PieceKind::from_color_index(self.next_piece.color_index)?;
        Some(self)
    }
}

/// Error raised by a [`SnapshotStore`] when a record cannot be written.
///
/// The session swallows these: a failed write costs durability for that
/// step, never gameplay.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("failed to persist snapshot: {source}")]
pub struct StoreError {
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl StoreError {
    #[must_use]
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

/// Storage for a single game record.
///
/// One record exists at a time; `save` overwrites it. `load` must hand back
/// `None` for records that are absent, undecodable, or rejected by
/// [`Snapshot::validated`], so callers never see a stale finished game.
pub trait SnapshotStore: fmt::Debug {
    fn save(&mut self, snapshot: &Snapshot) -> Result<(), StoreError>;
    fn load(&mut self) -> Option<Snapshot>;
    fn clear(&mut self);
}

/// In-memory store: keeps the record for the life of the process.
///
/// Used by tests and headless embeddings; durable storage lives with the
/// front end, which knows where files belong.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    record: Option<Snapshot>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The raw record, unvalidated. Lets tests inspect what was written.
    #[must_use]
    pub fn record(&self) -> Option<&Snapshot> {
        self.record.as_ref()
    }
}

impl SnapshotStore for MemoryStore {
    fn save(&mut self, snapshot: &Snapshot) -> Result<(), StoreError> {
        self.record = Some(snapshot.clone());
        Ok(())
    }

    fn load(&mut self) -> Option<Snapshot> {
        self.record.clone().and_then(Snapshot::validated)
    }

    fn clear(&mut self) {
        self.record = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_snapshot() -> Snapshot {
        let board = Board::new(6, 8);
        let current = Piece::new(PieceKind::T).at_spawn(6);
        let next = Piece::new(PieceKind::J);
        Snapshot::capture(&board, 42, &current, &next, false, false)
    }

    #[test]
    fn test_snapshot_json_layout() {
        let json = serde_json::to_value(sample_snapshot()).unwrap();
        assert_eq!(json["score"], 42);
        assert_eq!(json["cols"], 6);
        assert_eq!(json["rows"], 8);
        assert_eq!(json["paused"], false);
        assert_eq!(json["gameOver"], false);
        assert_eq!(json["currentPiece"]["colorIndex"], 3);
        assert_eq!(
            json["currentPiece"]["shapeRef"],
            serde_json::json!([[0, 1, 0], [1, 1, 1]])
        );
        assert_eq!(json["nextPiece"]["colorIndex"], 6);
        assert_eq!(json["board"][0], serde_json::json!([0, 0, 0, 0, 0, 0]));
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let snapshot = sample_snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, snapshot);
    }

    #[test]
    fn test_validated_rejects_finished_games() {
        let mut snapshot = sample_snapshot();
        snapshot.game_over = true;
        assert!(snapshot.validated().is_none());
    }

    #[test]
    fn test_validated_rejects_dimension_mismatch() {
        let mut snapshot = sample_snapshot();
        snapshot.cols += 1;
        assert!(snapshot.validated().is_none());
    }

    #[test]
    fn test_validated_rejects_unknown_color_index() {
        let mut snapshot = sample_snapshot();
        snapshot.next_piece.color_index = 9;
        assert!(snapshot.validated().is_none());
    }

    #[test]
    fn test_memory_store_save_load_clear() {
        let mut store = MemoryStore::new();
        assert!(store.load().is_none());

        let snapshot = sample_snapshot();
        store.save(&snapshot).unwrap();
        assert_eq!(store.load(), Some(snapshot.clone()));

        store.clear();
        assert!(store.load().is_none());

        // A finished game loads as "no saved game" even if written
        let mut finished = snapshot;
        finished.game_over = true;
        store.save(&finished).unwrap();
        assert!(store.load().is_none());
        assert!(store.record().is_some());
    }
}
