//! Month-picker challenge generation.
//!
//! Every month name is pre-split into three pieces. The challenge shows three
//! columns (all first pieces, all second pieces, all third pieces), each
//! deduplicated and shuffled, and the user has to pick the pieces that spell
//! the requested month.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use super::StoredPuzzle;

/// A month and its fixed three-way split
#[derive(Debug, Clone, Copy)]
pub struct MonthPieces {
    pub name: &'static str,
    pub pieces: [&'static str; 3],
}

const fn month(name: &'static str, pieces: [&'static str; 3]) -> MonthPieces {
    MonthPieces { name, pieces }
}

/// Split points are data; several months share pieces (`u`, `ary`, `ember`, ...)
pub const MONTHS: [MonthPieces; 12] = [
    month("january", ["jan", "u", "ary"]),
    month("february", ["febr", "u", "ary"]),
    month("march", ["m", "ar", "ch"]),
    month("april", ["a", "pr", "il"]),
    month("may", ["m", "a", "y"]),
    month("june", ["j", "un", "e"]),
    month("july", ["j", "ul", "y"]),
    month("august", ["au", "gu", "st"]),
    month("september", ["sep", "t", "ember"]),
    month("october", ["oct", "o", "ber"]),
    month("november", ["n", "ov", "ember"]),
    month("december", ["dec", "em", "ber"]),
];

/// Shuffled, deduplicated piece columns shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PuzzleColumns {
    pub first: Vec<String>,
    pub second: Vec<String>,
    pub third: Vec<String>,
}

impl PuzzleColumns {
    pub fn get(&self, position: usize) -> &[String] {
        match position {
            0 => &self.first,
            1 => &self.second,
            _ => &self.third,
        }
    }
}

/// A generated challenge
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthPuzzle {
    /// The month to spell (server-side only, not sent to client)
    #[serde(skip_serializing)]
    pub correct_month: String,

    /// Expected selections (server-side only, not sent to client)
    #[serde(skip_serializing)]
    pub correct_pieces: [String; 3],

    pub columns: PuzzleColumns,

    /// Decorative day of month, 1-28. Never checked.
    pub day: u8,

    /// Decorative year, 1970-2019. Never checked.
    pub year: u16,
}

/// CAPTCHA generator service
pub struct PuzzleGenerator {
    /// Challenge TTL in seconds
    pub challenge_ttl: u64,
}

impl PuzzleGenerator {
    pub fn new(challenge_ttl: u64) -> Self {
        Self { challenge_ttl }
    }

    /// Generate a new challenge from the thread-local RNG
    pub fn generate(&self) -> MonthPuzzle {
        self.generate_with(&mut rand::rng())
    }

    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R) -> MonthPuzzle {
        let correct = MONTHS[rng.random_range(0..MONTHS.len())];

        let [first, second, third]: [Vec<String>; 3] =
            std::array::from_fn(|position| build_column(rng, position, correct.pieces[position]));

        let puzzle = MonthPuzzle {
            correct_month: correct.name.to_string(),
            correct_pieces: correct.pieces.map(str::to_string),
            columns: PuzzleColumns {
                first,
                second,
                third,
            },
            day: rng.random_range(1..=28),
            year: rng.random_range(1970..=2019),
        };

        tracing::debug!(
            first = puzzle.columns.first.len(),
            second = puzzle.columns.second.len(),
            third = puzzle.columns.third.len(),
            "Generated month puzzle"
        );

        puzzle
    }

    /// The server-side half of a challenge, to be kept in the session
    pub fn to_stored(&self, puzzle: &MonthPuzzle) -> StoredPuzzle {
        let now = chrono::Utc::now().timestamp();
        StoredPuzzle {
            correct_month: puzzle.correct_month.clone(),
            correct_pieces: puzzle.correct_pieces.clone(),
            created_at: now,
            expires_at: now + self.challenge_ttl as i64,
        }
    }

    pub fn instructions(&self, puzzle: &MonthPuzzle) -> String {
        format!(
            "Select the three pieces that spell \"{}\"",
            puzzle.correct_month
        )
    }
}

/// Collect the pieces at `position` from every month, dedup, shuffle, and
/// make sure `correct_piece` is present.
fn build_column<R: Rng + ?Sized>(rng: &mut R, position: usize, correct_piece: &str) -> Vec<String> {
    let mut column: Vec<String> = Vec::with_capacity(MONTHS.len());
    for month in &MONTHS {
        let piece = month.pieces[position];
        if !column.iter().any(|p| p == piece) {
            column.push(piece.to_string());
        }
    }
    column.shuffle(rng);

    if !column.iter().any(|p| p == correct_piece) {
        column.push(correct_piece.to_string());
    }
    column.shuffle(rng);

    column
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn test_correct_pieces_are_in_their_columns() {
        let generator = PuzzleGenerator::new(300);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let puzzle = generator.generate_with(&mut rng);
            for (position, piece) in puzzle.correct_pieces.iter().enumerate() {
                assert!(
                    puzzle.columns.get(position).contains(piece),
                    "{piece} missing from column {position}"
                );
            }
        }
    }

    #[test]
    fn test_columns_are_deduplicated() {
        let puzzle = PuzzleGenerator::new(300).generate();

        for position in 0..3 {
            let column = puzzle.columns.get(position);
            let unique: HashSet<_> = column.iter().collect();
            assert_eq!(unique.len(), column.len());

            let expected: HashSet<&str> = MONTHS.iter().map(|m| m.pieces[position]).collect();
            let actual: HashSet<&str> = column.iter().map(String::as_str).collect();
            assert_eq!(actual, expected);
        }
        // "m" and "j" start two months each
        assert_eq!(puzzle.columns.first.len(), 10);
    }

    #[test]
    fn test_decorative_fields_in_range() {
        let generator = PuzzleGenerator::new(300);
        let mut rng = StdRng::seed_from_u64(99);

        for _ in 0..500 {
            let puzzle = generator.generate_with(&mut rng);
            assert!((1..=28).contains(&puzzle.day));
            assert!((1970..=2019).contains(&puzzle.year));
        }
    }

    #[test]
    fn test_pieces_spell_the_month() {
        for month in &MONTHS {
            assert_eq!(month.pieces.concat(), month.name);
        }
    }

    #[test]
    fn test_answer_not_serialized() {
        let puzzle = PuzzleGenerator::new(300).generate();
        let json = serde_json::to_value(&puzzle).unwrap();
        assert!(json.get("correctPieces").is_none());
        assert!(json.get("correctMonth").is_none());
        assert!(json["columns"]["first"].is_array());
    }

    #[test]
    fn test_stored_expiry() {
        let generator = PuzzleGenerator::new(300);
        let puzzle = generator.generate();
        let stored = generator.to_stored(&puzzle);
        assert_eq!(stored.expires_at - stored.created_at, 300);
        assert_eq!(stored.correct_pieces, puzzle.correct_pieces);
    }
}
