//! Difficulty levels and their search parameters
//!
//! Difficulty is a named knob mapped to a single numeric search parameter.
//! The parameter doubles as the search depth requested from the UCI backend
//! (capped at [`MAX_BACKEND_DEPTH`]) and as the tier selector for the
//! fallback move chooser.
//!
//! | Difficulty | Parameter | Backend depth | Fallback tier        |
//! |------------|-----------|---------------|----------------------|
//! | Easy       | 1         | 1             | uniform random       |
//! | Medium     | 3         | 3             | captures/checks bias |
//! | Hard       | 5         | 5             | scored top-3         |

use std::fmt;
use std::str::FromStr;

use crate::error::SessionError;

/// Depth ceiling for the UCI backend, keeps worst-case think time bounded.
pub const MAX_BACKEND_DEPTH: u32 = 8;

/// Engine strength setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Numeric search parameter for this level
    pub fn search_param(self) -> u32 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 3,
            Difficulty::Hard => 5,
        }
    }

    /// Depth actually requested from the UCI backend
    pub fn backend_depth(self) -> u32 {
        self.search_param().min(MAX_BACKEND_DEPTH)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(SessionError::InvalidDifficulty),
        }
    }
}
