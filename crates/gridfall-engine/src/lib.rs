pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("piece colliding after the attempted move")]
pub struct PieceCollisionError;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("no kick offset fits the rotated piece")]
pub struct RotationRejectedError;
