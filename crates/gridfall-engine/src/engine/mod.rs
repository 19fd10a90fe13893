//! Game logic and state management.
//!
//! This module provides the stateful layer that drives the core data
//! structures through actual play:
//!
//! - [`GameSession`] - The session state machine: commands, gravity clock,
//!   pause/resume, game over
//! - [`PieceGenerator`] / [`GeneratorSeed`] - Seedable random piece source
//! - [`ScoreTracker`] - Score accumulation rules
//! - [`Snapshot`] / [`SnapshotStore`] / [`MemoryStore`] - Session recovery
//!
//! # Game Flow
//!
//! 1. Build a [`GameSession`] (fresh, or [`GameSession::resume_or_new`] to
//!    pick up a saved game)
//! 2. Feed elapsed time into [`GameSession::tick`] from a frame loop
//! 3. Translate input events into commands (move, rotate, drop, pause)
//! 4. Render from the read-only queries after each change
//!
//! Every mutating command writes a recovery snapshot through the attached
//! store before it returns, so the game survives being closed mid-session.

pub use self::{piece_generator::*, score::*, session::*, snapshot::*};

mod piece_generator;
mod score;
mod session;
mod snapshot;
