use std::{mem, time::Duration};

use crate::{
    PieceCollisionError, RotationRejectedError,
    core::{
        board::{Board, ClearedLine},
        piece::{Piece, PieceKind},
    },
};

use super::{
    piece_generator::PieceGenerator,
    score::ScoreTracker,
    snapshot::{Snapshot, SnapshotStore},
};

/// Time a piece rests on each row before gravity pulls it down one more.
pub const DEFAULT_DROP_INTERVAL: Duration = Duration::from_millis(1000);

/// Where the session is in its lifecycle.
///
/// `GameOver` is terminal: every command except [`GameSession::start_new_game`]
/// becomes a no-op there.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Running,
    Paused,
    GameOver,
}

/// The game itself: owns all mutable state and is its sole mutator.
///
/// One externally driven clock feeds [`tick`](Self::tick); discrete input
/// events arrive as synchronous command calls. Every mutating command writes
/// a snapshot to the attached [`SnapshotStore`] before returning, so an
/// interrupted session resumes from its last command. Writes are
/// best-effort: a failing store never interrupts play.
///
/// # Example
///
/// ```
/// use gridfall_engine::{GameSession, MemoryStore};
///
/// let mut session = GameSession::new(10, 20, Box::new(MemoryStore::new()));
/// session.try_move_left().ok();
/// session.soft_drop();
/// assert_eq!(session.score(), 1);
/// ```
#[derive(Debug)]
pub struct GameSession {
    board: Board,
    score: ScoreTracker,
    generator: PieceGenerator,
    current: Piece,
    next: Piece,
    state: SessionState,
    drop_interval: Duration,
    drop_accumulator: Duration,
    last_clear: Vec<ClearedLine>,
    store: Box<dyn SnapshotStore>,
}

impl GameSession {
    /// Starts a fresh game on an empty `cols × rows` board.
    #[must_use]
    pub fn new(cols: usize, rows: usize, store: Box<dyn SnapshotStore>) -> Self {
        Self::with_generator(cols, rows, PieceGenerator::new(), store)
    }

    /// Like [`Self::new`], but with a caller-supplied piece source for
    /// deterministic sequences.
    #[must_use]
    pub fn with_generator(
        cols: usize,
        rows: usize,
        generator: PieceGenerator,
        store: Box<dyn SnapshotStore>,
    ) -> Self {
        let mut session = Self {
            board: Board::new(cols, rows),
            score: ScoreTracker::new(),
            generator,
            current: Piece::new(PieceKind::I),
            next: Piece::new(PieceKind::I),
            state: SessionState::Running,
            drop_interval: DEFAULT_DROP_INTERVAL,
            drop_accumulator: Duration::ZERO,
            last_clear: Vec::new(),
            store,
        };
        session.reset(cols, rows);
        session
    }

    /// Restores the game persisted in `store`, or starts a fresh
    /// `cols × rows` game when no usable record exists.
    ///
    /// A restored game keeps its own dimensions; `cols`/`rows` only shape
    /// the fallback. Corrupt or finished records are discarded silently.
    #[must_use]
    pub fn resume_or_new(cols: usize, rows: usize, mut store: Box<dyn SnapshotStore>) -> Self {
        let restored = store.load().and_then(|snapshot| {
            let current_kind = PieceKind::from_color_index(snapshot.current_piece.color_index)?;
            let next_kind = PieceKind::from_color_index(snapshot.next_piece.color_index)?;
            let current = Piece::restored(
                current_kind,
                snapshot.current_piece.shape_ref,
                snapshot.current_piece.x,
                snapshot.current_piece.y,
            );
            let next = Piece::restored(next_kind, snapshot.next_piece.shape_ref, 0, 0);
            let state = if snapshot.paused {
                SessionState::Paused
            } else {
                SessionState::Running
            };
            Some((snapshot.board, snapshot.score, current, next, state))
        });

        match restored {
            Some((board, score, current, next, state)) => Self {
                board,
                score: ScoreTracker::with_score(score),
                generator: PieceGenerator::new(),
                current,
                next,
                state,
                drop_interval: DEFAULT_DROP_INTERVAL,
                drop_accumulator: Duration::ZERO,
                last_clear: Vec::new(),
                store,
            },
            None => Self::new(cols, rows, store),
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn current_piece(&self) -> &Piece {
        &self.current
    }

    #[must_use]
    pub fn next_piece(&self) -> &Piece {
        &self.next
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score.score()
    }

    #[must_use]
    pub fn stats(&self) -> &ScoreTracker {
        &self.score
    }

    #[must_use]
    pub fn session_state(&self) -> &SessionState {
        &self.state
    }

    /// Rows removed by the most recent lock, for clear effects in the view.
    #[must_use]
    pub fn last_cleared_lines(&self) -> &[ClearedLine] {
        &self.last_clear
    }

    /// Overrides the gravity interval. Mainly for tests and turbo modes.
    pub fn set_drop_interval(&mut self, interval: Duration) {
        self.drop_interval = interval;
    }

    /// Where the current piece would land on a hard drop.
    ///
    /// Recomputed on demand from the piece's shape and position; nothing is
    /// cloned beyond the preview itself.
    #[must_use]
    pub fn drop_preview(&self) -> Piece {
        let mut preview = self.current.clone();
        loop {
            let below = preview.translated(0, 1);
            if self.board.collides(&below) {
                return preview;
            }
            preview = below;
        }
    }

    /// Captures the current persisted form of the session.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(
            &self.board,
            self.score.score(),
            &self.current,
            &self.next,
            self.state.is_paused(),
            self.state.is_game_over(),
        )
    }

    /// Advances the gravity clock by `dt`.
    ///
    /// Once the accumulated time exceeds the drop interval the piece
    /// descends one row (locking on contact) and the accumulator resets.
    /// Does nothing while paused or after game over, so paused time never
    /// counts toward the next drop.
    pub fn tick(&mut self, dt: Duration) {
        if !self.state.is_running() {
            return;
        }
        self.drop_accumulator += dt;
        if self.drop_accumulator > self.drop_interval {
            self.gravity_step();
            self.persist();
        }
    }

    /// Moves the current piece one column left. No-op outside `Running`;
    /// `Err` when the move would collide, leaving the piece in place.
    pub fn try_move_left(&mut self) -> Result<(), PieceCollisionError> {
        self.try_shift(-1)
    }

    /// Moves the current piece one column right. No-op outside `Running`;
    /// `Err` when the move would collide, leaving the piece in place.
    pub fn try_move_right(&mut self) -> Result<(), PieceCollisionError> {
        self.try_shift(1)
    }

    fn try_shift(&mut self, dx: i32) -> Result<(), PieceCollisionError> {
        if !self.state.is_running() {
            return Ok(());
        }
        let moved = self.current.translated(dx, 0);
        let result = if self.board.collides(&moved) {
            Err(PieceCollisionError)
        } else {
            self.current = moved;
            Ok(())
        };
        self.persist();
        result
    }

    /// Rotates the current piece clockwise, kicking sideways if needed.
    ///
    /// No-op outside `Running`. On `Err` the shape and position are exactly
    /// as before the call.
    pub fn try_rotate(&mut self) -> Result<(), RotationRejectedError> {
        if !self.state.is_running() {
            return Ok(());
        }
        let rotated = self
            .current
            .rotated_with_kicks(&self.board)
            .ok_or(RotationRejectedError)?;
        self.current = rotated;
        self.persist();
        Ok(())
    }

    /// Drops the current piece one row, locking it on contact.
    ///
    /// Worth one point either way. Locking clears lines, updates the score,
    /// and spawns the next piece, which may end the game. No-op outside
    /// `Running`.
    pub fn soft_drop(&mut self) {
        if !self.state.is_running() {
            return;
        }
        self.gravity_step();
        self.persist();
    }

    /// Drops the current piece to the lowest collision-free row and locks it
    /// there.
    ///
    /// Scores as a single gravity step regardless of distance (one +1, plus
    /// any line-clear points), so hard drops and soft drops follow the same
    /// per-tick policy. No-op outside `Running`.
    pub fn hard_drop(&mut self) {
        if !self.state.is_running() {
            return;
        }
        self.drop_accumulator = Duration::ZERO;
        self.current = self.drop_preview();
        self.lock_current();
        self.score.gravity_step();
        self.persist();
    }

    /// Switches between `Running` and `Paused`. Does nothing after game
    /// over.
    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            SessionState::Running => SessionState::Paused,
            SessionState::Paused => SessionState::Running,
            SessionState::GameOver => return,
        };
        self.persist();
    }

    /// Abandons the current game and starts over on a fresh `cols × rows`
    /// board. This is the only way out of `GameOver`.
    pub fn start_new_game(&mut self, cols: usize, rows: usize) {
        self.store.clear();
        self.reset(cols, rows);
    }

    fn reset(&mut self, cols: usize, rows: usize) {
        self.board = Board::new(cols, rows);
        self.score = ScoreTracker::new();
        self.next = Piece::new(self.generator.next_kind());
        self.state = SessionState::Running;
        self.drop_accumulator = Duration::ZERO;
        self.last_clear.clear();
        self.spawn_next();
        self.persist();
    }

    /// One single-row descent, shared by the gravity clock and manual soft
    /// drops. Resets the accumulator so a manual drop also restarts the
    /// gravity countdown.
    fn gravity_step(&mut self) {
        self.drop_accumulator = Duration::ZERO;
        let dropped = self.current.translated(0, 1);
        if self.board.collides(&dropped) {
            self.lock_current();
        } else {
            self.current = dropped;
        }
        self.score.gravity_step();
    }

    fn lock_current(&mut self) {
        self.board.lock_piece(&self.current);
        self.last_clear = self.board.clear_full_lines();
        self.score.piece_locked(self.last_clear.len());
        self.spawn_next();
    }

    /// Promotes the lookahead piece to the falling piece, centered at the
    /// top, and draws a fresh lookahead. A spawn that immediately collides
    /// ends the game and drops the persisted record.
    fn spawn_next(&mut self) {
        let upcoming = mem::replace(&mut self.next, Piece::new(self.generator.next_kind()));
        self.current = upcoming.at_spawn(self.board.cols());
        if self.board.collides(&self.current) {
            self.state = SessionState::GameOver;
            self.store.clear();
        }
    }

    fn persist(&mut self) {
        // Best-effort: losing a write costs durability, not the game.
        let _ = self.store.save(&self.snapshot());
    }
}
