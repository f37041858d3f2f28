//! Error types for session operations
//!
//! Every validation failure a caller can trigger is represented here; the
//! Display strings double as the `error` field of the HTTP response body.

use thiserror::Error;

/// Errors that can occur while operating on the session
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// Move string could not be parsed as coordinate notation
    #[error("Invalid move format")]
    InvalidFormat,

    /// Move parsed but is not in the current legal-move set
    #[error("Illegal move")]
    IllegalMove,

    /// Move submitted while it is the engine's turn
    #[error("Not your turn")]
    WrongTurn,

    /// Difficulty name outside easy/medium/hard
    #[error("Invalid difficulty")]
    InvalidDifficulty,

    /// Color name outside white/black
    #[error("Invalid color")]
    InvalidColor,

    /// Takeback requested with fewer than two applied moves
    #[error("Not enough moves to take back")]
    InsufficientHistory,

    /// Neither the backend nor the fallback selector produced a move
    #[error("AI could not find a valid move")]
    EngineFailure,
}

/// Result type alias for session operations
pub type SessionResult<T> = Result<T, SessionError>;
