//! Fallback move selection
//!
//! Heuristic move chooser used whenever the UCI backend is absent, errors
//! out, or proposes a move that fails re-validation. Tiered by the search
//! parameter: uniform random at easy, a capture/check preference cascade at
//! medium, and a scored top-3 pick at hard. The randomness source is passed
//! in so tests can pin the outcome.

use rand::seq::IndexedRandom;
use rand::Rng;
use shakmaty::{Move, Square};

use crate::board::Board;

/// The four central squares rewarded by the hard-tier scorer.
const CENTER: [Square; 4] = [Square::D4, Square::D5, Square::E4, Square::E5];

/// Pick one legal move for the side to play, or `None` if there is none.
pub fn fallback_move<R: Rng + ?Sized>(board: &Board, param: u32, rng: &mut R) -> Option<Move> {
    let legal = board.legal_moves();
    if legal.is_empty() {
        return None;
    }

    if param <= 1 {
        return legal.choose(rng).cloned();
    }

    if param <= 3 {
        // Exclusive cascade: a failed capture gate falls through to the
        // check gate, not straight to uniform.
        let captures: Vec<Move> = legal.iter().filter(|m| m.is_capture()).cloned().collect();
        let checks: Vec<Move> = legal.iter().filter(|m| board.gives_check(m)).cloned().collect();
        if !captures.is_empty() && rng.random_bool(0.7) {
            return captures.choose(rng).cloned();
        }
        if !checks.is_empty() && rng.random_bool(0.5) {
            return checks.choose(rng).cloned();
        }
        return legal.choose(rng).cloned();
    }

    let mut scored: Vec<(Move, i32)> = legal
        .iter()
        .map(|m| (m.clone(), score_move(board, m)))
        .collect();
    // Stable sort keeps enumeration order among equal scores.
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    let top: Vec<Move> = scored.into_iter().take(3).map(|(m, _)| m).collect();
    top.choose(rng).cloned()
}

/// Hard-tier move score: captures over checks over center control.
fn score_move(board: &Board, m: &Move) -> i32 {
    let mut score = 0;
    if m.is_capture() {
        score += 10;
    }
    if board.gives_check(m) {
        score += 5;
    }
    if CENTER.contains(&m.to()) {
        score += 3;
    }
    score
}
