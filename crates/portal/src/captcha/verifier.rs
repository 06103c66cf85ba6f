//! CAPTCHA verification logic.

use serde::Deserialize;

use super::StoredPuzzle;

/// One pick per column, as submitted by the admin login form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PieceSelection {
    pub column1: Option<String>,
    pub column2: Option<String>,
    pub column3: Option<String>,
}

impl PieceSelection {
    fn as_array(&self) -> Option<[&str; 3]> {
        Some([
            self.column1.as_deref()?,
            self.column2.as_deref()?,
            self.column3.as_deref()?,
        ])
    }
}

/// Result of checking a submitted selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzleOutcome {
    Passed,
    /// Wrong pieces, or a column left empty
    Incorrect,
    /// No challenge was pending for this session
    Missing,
    Expired,
}

impl PuzzleOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

/// Ordered, case-sensitive comparison of all three positions
pub fn pieces_match(submitted: [&str; 3], expected: &[String; 3]) -> bool {
    submitted.iter().zip(expected.iter()).all(|(s, e)| *s == e.as_str())
}

/// CAPTCHA verifier service
#[derive(Debug, Default)]
pub struct PuzzleVerifier;

impl PuzzleVerifier {
    pub fn new() -> Self {
        Self
    }

    /// Check a selection against the challenge taken out of the session.
    ///
    /// The caller must already have removed `stored` from the session: a
    /// challenge is checked at most once, whatever the outcome.
    pub fn verify(&self, stored: Option<StoredPuzzle>, selection: &PieceSelection) -> PuzzleOutcome {
        self.verify_at(stored, selection, chrono::Utc::now().timestamp())
    }

    pub fn verify_at(
        &self,
        stored: Option<StoredPuzzle>,
        selection: &PieceSelection,
        now: i64,
    ) -> PuzzleOutcome {
        let Some(stored) = stored else {
            return PuzzleOutcome::Missing;
        };

        if now > stored.expires_at {
            tracing::debug!(month = %stored.correct_month, "Puzzle expired");
            return PuzzleOutcome::Expired;
        }

        match selection.as_array() {
            Some(submitted) if pieces_match(submitted, &stored.correct_pieces) => {
                PuzzleOutcome::Passed
            }
            _ => {
                tracing::debug!(selection = ?selection, "Puzzle answer incorrect");
                PuzzleOutcome::Incorrect
            }
        }
    }
}
