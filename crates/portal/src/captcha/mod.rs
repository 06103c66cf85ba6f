//! Month-picker CAPTCHA gating the admin login.

mod generator;
mod verifier;

pub use generator::{MonthPuzzle, PuzzleGenerator};
pub use verifier::{PieceSelection, PuzzleVerifier};

use serde::{Deserialize, Serialize};

/// Challenge data kept in the session until it is checked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPuzzle {
    /// The month the user was asked to spell
    pub correct_month: String,
    /// Expected piece per column
    pub correct_pieces: [String; 3],
    /// Creation timestamp
    pub created_at: i64,
    /// Expiry timestamp
    pub expires_at: i64,
}
