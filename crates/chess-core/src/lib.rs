//! Core logic for the single-session chess server
//!
//! The transport layer hands move strings and commands to [`Session`] and
//! renders the outcomes; everything stateful lives here. Chess rules come
//! from `shakmaty` behind [`Board`]; engine strength comes from an optional
//! UCI subprocess behind [`MoveSource`], with the heuristic fallback
//! selector covering for it whenever it misbehaves.

pub mod board;
pub mod difficulty;
pub mod engine;
pub mod error;
pub mod select;
pub mod session;

pub use board::{Board, GameResult};
pub use difficulty::{Difficulty, MAX_BACKEND_DEPTH};
pub use engine::{MoveSource, UciConfig, UciEngine};
pub use error::{SessionError, SessionResult};
pub use session::{parse_color, MoveOutcome, ResetOutcome, Session};
