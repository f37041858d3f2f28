//! Session state machine
//!
//! One [`Session`] per process: the authoritative board, the player's color,
//! the difficulty setting, and the engine-move pipeline. The transport layer
//! serializes all calls (single-writer), so every operation takes `&mut
//! self` and completes fully before the next begins.
//!
//! The turn cycle for a player move: validate → apply → terminal check →
//! engine reply (backend first, fallback on any trouble) → apply → terminal
//! check. An engine proposal is validated against the legal-move set before
//! it is committed, so a misbehaving backend can never corrupt the board.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use shakmaty::{CastlingMode, Color, Move};
use tracing::{error, info, warn};

use crate::board::{Board, GameResult};
use crate::difficulty::Difficulty;
use crate::engine::MoveSource;
use crate::error::SessionError;
use crate::select;

/// Parse a player color name from the API surface
pub fn parse_color(name: &str) -> Result<Color, SessionError> {
    match name {
        "white" => Ok(Color::White),
        "black" => Ok(Color::Black),
        _ => Err(SessionError::InvalidColor),
    }
}

/// Result of a successful `submit_move`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub fen: String,
    /// The engine's reply in coordinate notation; absent when the player's
    /// move already ended the game.
    pub engine_move: Option<String>,
    /// Present exactly when the game is over.
    pub result: Option<GameResult>,
}

/// Result of `reset` or `set_color`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetOutcome {
    pub fen: String,
    /// The engine's opening move when the player takes the second-moving
    /// side.
    pub engine_move: Option<String>,
}

/// The single process-wide game session
pub struct Session {
    board: Board,
    player_color: Color,
    difficulty: Difficulty,
    backend: Option<Box<dyn MoveSource>>,
    rng: StdRng,
}

impl Session {
    /// Fresh session: start position, player plays White, medium strength
    pub fn new(backend: Option<Box<dyn MoveSource>>) -> Self {
        Self::with_rng(backend, StdRng::from_os_rng())
    }

    /// Like [`Session::new`] but with a caller-supplied randomness source,
    /// for deterministic tests.
    pub fn with_rng(backend: Option<Box<dyn MoveSource>>, rng: StdRng) -> Self {
        Self {
            board: Board::new(),
            player_color: Color::White,
            difficulty: Difficulty::default(),
            backend,
            rng,
        }
    }

    pub fn fen(&self) -> String {
        self.board.fen()
    }

    pub fn turn(&self) -> Color {
        self.board.turn()
    }

    pub fn player_color(&self) -> Color {
        self.player_color
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn history_len(&self) -> usize {
        self.board.history_len()
    }

    /// Validate and apply the player's move, then answer with the engine's.
    pub async fn submit_move(&mut self, uci: &str) -> Result<MoveOutcome, SessionError> {
        info!(
            "[SESSION] received move {uci} ({:?} to play, player is {:?})",
            self.board.turn(),
            self.player_color
        );

        if self.board.turn() != self.player_color {
            return Err(SessionError::WrongTurn);
        }
        let mv = self.board.parse_move(uci)?;
        self.board.push(mv)?;

        if let Some(result) = self.board.result() {
            info!("[SESSION] game over after player move: {result}");
            return Ok(MoveOutcome {
                fen: self.board.fen(),
                engine_move: None,
                result: Some(result),
            });
        }

        let Some(reply) = self.engine_reply().await else {
            // Only reachable with an empty legal set, which the terminal
            // check above should have intercepted.
            error!("[SESSION] no engine move available in a live position");
            return Err(SessionError::EngineFailure);
        };
        let engine_uci = reply.to_uci(CastlingMode::Standard).to_string();
        self.board.push(reply)?;

        let result = self.board.result();
        if let Some(result) = &result {
            info!("[SESSION] game over after engine move {engine_uci}: {result}");
        }
        Ok(MoveOutcome {
            fen: self.board.fen(),
            engine_move: Some(engine_uci),
            result,
        })
    }

    /// Update the strength setting; the board is untouched.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        info!("[SESSION] difficulty set to {difficulty}");
        self.difficulty = difficulty;
    }

    /// Assign the player a side and start over. The engine opens when the
    /// player no longer holds the first move.
    pub async fn set_color(&mut self, color: Color) -> ResetOutcome {
        info!("[SESSION] player color set to {color:?}");
        self.player_color = color;
        self.start_new_game().await
    }

    /// Start over with color and difficulty preserved.
    pub async fn reset(&mut self) -> ResetOutcome {
        info!("[SESSION] board reset");
        self.start_new_game().await
    }

    /// Undo the last exchange: the engine's reply and the player's move.
    pub fn takeback(&mut self) -> Result<String, SessionError> {
        if self.board.history_len() < 2 {
            return Err(SessionError::InsufficientHistory);
        }
        self.board.pop();
        self.board.pop();
        info!("[SESSION] last exchange taken back");
        Ok(self.board.fen())
    }

    async fn start_new_game(&mut self) -> ResetOutcome {
        self.board = Board::new();
        let mut engine_move = None;
        if self.board.turn() != self.player_color {
            if let Some(mv) = self.engine_reply().await {
                let uci = mv.to_uci(CastlingMode::Standard).to_string();
                match self.board.push(mv) {
                    Ok(()) => engine_move = Some(uci),
                    Err(e) => error!("[SESSION] engine opening move rejected: {e}"),
                }
            }
        }
        ResetOutcome {
            fen: self.board.fen(),
            engine_move,
        }
    }

    /// Choose the engine's move: backend proposal when one is attached and
    /// survives re-validation, the fallback selector otherwise. `None` only
    /// when there is no legal move at all.
    async fn engine_reply(&mut self) -> Option<Move> {
        let legal = self.board.legal_moves();
        if legal.is_empty() {
            return None;
        }
        let param = self.difficulty.search_param();

        if let Some(backend) = self.backend.as_mut() {
            // At easy strength the backend is bypassed 30% of the time in
            // favor of an outright random move, once the position offers
            // more than a handful of options.
            if param <= 1 && legal.len() > 3 && self.rng.random_bool(0.3) {
                return legal.choose(&mut self.rng).cloned();
            }

            match backend
                .best_move(&self.board.fen(), self.difficulty.backend_depth())
                .await
            {
                Ok(Some(uci)) => match self.board.parse_move(&uci) {
                    Ok(mv) => return Some(mv),
                    Err(_) => {
                        warn!("[SESSION] backend proposed unusable move {uci}, falling back")
                    }
                },
                Ok(None) => warn!("[SESSION] backend returned no move, falling back"),
                Err(e) => warn!("[SESSION] backend failed ({e:#}), falling back"),
            }
        }

        select::fallback_move(&self.board, param, &mut self.rng)
    }
}
