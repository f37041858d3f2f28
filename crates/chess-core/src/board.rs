//! Rules adapter wrapping the `shakmaty` position
//!
//! [`Board`] owns the authoritative position together with the applied-move
//! stack (shakmaty positions are immutable values, so undo restores the
//! stored predecessor) and a Zobrist occurrence table for repetition draws,
//! which the rules crate does not track on its own.

use std::collections::HashMap;
use std::fmt;

use anyhow::Context;
use shakmaty::fen::Fen;
use shakmaty::uci::UciMove;
use shakmaty::zobrist::Zobrist64;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Move, MoveList, Position};

use crate::error::SessionError;

/// Halfmove clock threshold for the forced 75-move draw.
const SEVENTY_FIVE_MOVE_CLOCK: u32 = 150;

/// How a finished game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    Checkmate { winner: Color },
    Stalemate,
    InsufficientMaterial,
    SeventyFiveMoves,
    FivefoldRepetition,
    Other,
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::Checkmate {
                winner: Color::White,
            } => f.write_str("White wins by checkmate!"),
            GameResult::Checkmate {
                winner: Color::Black,
            } => f.write_str("Black wins by checkmate!"),
            GameResult::Stalemate => f.write_str("Draw by stalemate"),
            GameResult::InsufficientMaterial => f.write_str("Draw by insufficient material"),
            GameResult::SeventyFiveMoves => f.write_str("Draw by 75-move rule"),
            GameResult::FivefoldRepetition => f.write_str("Draw by fivefold repetition"),
            GameResult::Other => f.write_str("Game over"),
        }
    }
}

/// Board state plus the bookkeeping needed for undo and repetition draws
pub struct Board {
    pos: Chess,
    /// Predecessor position and the move that left it, newest last.
    history: Vec<(Chess, Move)>,
    /// Occurrence count per position key, current position included.
    seen: HashMap<Zobrist64, u32>,
}

impl Board {
    /// Standard start position with empty history
    pub fn new() -> Self {
        let pos = Chess::default();
        let mut seen = HashMap::new();
        seen.insert(pos.zobrist_hash(EnPassantMode::Legal), 1);
        Self {
            pos,
            history: Vec::new(),
            seen,
        }
    }

    /// Arbitrary position, mainly for tests and tooling
    pub fn from_fen(fen: &str) -> anyhow::Result<Self> {
        let pos: Chess = fen
            .parse::<Fen>()
            .context("unparsable FEN")?
            .into_position(CastlingMode::Standard)
            .context("FEN is not a playable position")?;
        let mut seen = HashMap::new();
        seen.insert(pos.zobrist_hash(EnPassantMode::Legal), 1);
        Ok(Self {
            pos,
            history: Vec::new(),
            seen,
        })
    }

    pub fn fen(&self) -> String {
        Fen::from_position(&self.pos, EnPassantMode::Legal).to_string()
    }

    pub fn turn(&self) -> Color {
        self.pos.turn()
    }

    pub fn legal_moves(&self) -> MoveList {
        self.pos.legal_moves()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Moves applied since the last reset, oldest first
    pub fn moves(&self) -> impl Iterator<Item = &Move> {
        self.history.iter().map(|(_, m)| m)
    }

    /// Parse coordinate notation and resolve it against the current
    /// legal-move set. Distinguishes a malformed string from a well-formed
    /// but illegal move.
    pub fn parse_move(&self, uci: &str) -> Result<Move, SessionError> {
        let uci = uci
            .parse::<UciMove>()
            .map_err(|_| SessionError::InvalidFormat)?;
        uci.to_move(&self.pos).map_err(|_| SessionError::IllegalMove)
    }

    /// Apply a move that is already known to be legal
    pub fn push(&mut self, m: Move) -> Result<(), SessionError> {
        let next = self
            .pos
            .clone()
            .play(m.clone())
            .map_err(|_| SessionError::IllegalMove)?;
        self.history.push((std::mem::replace(&mut self.pos, next), m));
        *self.seen.entry(self.key()).or_insert(0) += 1;
        Ok(())
    }

    /// Undo the most recent move, returning it
    pub fn pop(&mut self) -> Option<Move> {
        let (prev, m) = self.history.pop()?;
        let key = self.key();
        if let Some(count) = self.seen.get_mut(&key) {
            *count -= 1;
            if *count == 0 {
                self.seen.remove(&key);
            }
        }
        self.pos = prev;
        Some(m)
    }

    /// Whether the move would leave the opponent in check
    pub fn gives_check(&self, m: &Move) -> bool {
        self.pos
            .clone()
            .play(m.clone())
            .map(|next| next.is_check())
            .unwrap_or(false)
    }

    /// Terminal classification for the current position, `None` while the
    /// game is still on. Checked in the same order the draw rules shadow
    /// each other: mate and stalemate before the material and clock draws.
    pub fn result(&self) -> Option<GameResult> {
        if self.pos.is_checkmate() {
            Some(GameResult::Checkmate {
                winner: self.pos.turn().other(),
            })
        } else if self.pos.is_stalemate() {
            Some(GameResult::Stalemate)
        } else if self.pos.is_insufficient_material() {
            Some(GameResult::InsufficientMaterial)
        } else if self.pos.halfmoves() >= SEVENTY_FIVE_MOVE_CLOCK {
            Some(GameResult::SeventyFiveMoves)
        } else if self.repetitions() >= 5 {
            Some(GameResult::FivefoldRepetition)
        } else if self.pos.legal_moves().is_empty() {
            Some(GameResult::Other)
        } else {
            None
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.result().is_some()
    }

    fn key(&self) -> Zobrist64 {
        self.pos.zobrist_hash(EnPassantMode::Legal)
    }

    /// Times the current position has occurred, itself included
    fn repetitions(&self) -> u32 {
        self.seen.get(&self.key()).copied().unwrap_or(1)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
