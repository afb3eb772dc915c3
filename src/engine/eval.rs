//! Function to evaluate a position.
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;
use std::ops;
use crate::chess::{Board, Color, PieceKind, RuleEngine};

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Score in hundredths of a pawn
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Score(i32);

impl Score {
    /// Returns the bonus for leaving the opponent checkmated
    pub fn mate() -> Self {
        Score(MATE)
    }
    /// Returns the score for a position with nothing to choose between the sides
    pub fn draw() -> Self {
        Score(0)
    }
}

impl ops::Neg for Score {
    type Output = Score;

    fn neg(self) -> Self {
        Score(-self.0)
    }
}

impl ops::Add for Score {
    type Output = Score;

    fn add(self, rhs: Score) -> Self {
        Score(self.0 + rhs.0)
    }
}

impl ops::Sub for Score {
    type Output = Score;

    fn sub(self, rhs: Score) -> Self {
        Score(self.0 - rhs.0)
    }
}

impl ops::AddAssign for Score {
    fn add_assign(&mut self, rhs: Score) {
        self.0 += rhs.0;
    }
}

impl From<i32> for Score {
    fn from(val: i32) -> Self {
        Score(val)
    }
}

impl From<Score> for i32 {
    fn from(val: Score) -> Self {
        val.0
    }
}

impl fmt::Display for Score {
    /// Writes the score in pawns (eg `-3.20`)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();

        format!("{}{}.{:02}", sign, abs / 100, abs % 100).fmt(f)
    }
}

const PIECE_VAL: [i32; PieceKind::COUNT] = [ 100, 320, 330, 500, 900, 20_000 ];

const MOBILITY: [i32; PieceKind::COUNT] = [ 10, 32, 33, 50, 90, 0 ];

const CHECK_BONUS: i32 = 150;

const MATE: i32 = 100_000;

/// Returns the value of a piece.
pub fn piece_val(kind: PieceKind) -> i32 {
    PIECE_VAL[kind as usize]
}

/// Returns the score of `color`'s side of the board alone.
///
/// Each piece is worth its material value, plus twice its mobility factor for each legal move and
/// once more for each of those moves that captures. Each check `color` is giving earns a bonus.
pub fn evaluate(board: &Board, color: Color) -> Score {
    let engine = RuleEngine::new(board);
    let mut val = 0;

    for (sq, piece) in board.pieces(color) {
        let factor = MOBILITY[piece.kind() as usize];
        val += piece_val(piece.kind());

        if factor > 0 {
            let moves = engine.moves_for(sq).expect("INFALLIBLE");
            let captures = moves.iter()
                .filter(|mv| board.piece_at(mv.to()).map_or(false, |t| t.color() != color))
                .count() as i32;

            val += moves.len() as i32 * factor * 2 + captures * factor;
        }
    }

    let checks = board.checks()
        .iter()
        .filter(|c| board.piece_at(c.attacker).map_or(false, |p| p.color() == color))
        .count() as i32;

    Score(val + checks * CHECK_BONUS)
}

/// Returns white's score less black's score.
pub fn evaluate_relative(board: &Board) -> Score {
    evaluate(board, Color::White) - evaluate(board, Color::Black)
}

/// Returns `evaluate_relative` from `color`'s point of view.
pub fn evaluate_for(board: &Board, color: Color) -> Score {
    match color {
        Color::White => evaluate_relative(board),
        Color::Black => -evaluate_relative(board),
    }
}

#[cfg(test)]
mod eval_test {
    use crate::chess::Board;
    use super::*;

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    #[test]
    fn kings_are_worth_material_only() {
        let b = board("k7/8/8/8/8/8/8/K7");

        assert_eq!(evaluate(&b, Color::White), Score::from(20_000));
        assert_eq!(evaluate(&b, Color::Black), Score::from(20_000));
        assert_eq!(evaluate_relative(&b), Score::from(0));
    }

    #[test]
    fn starting_position_is_balanced() {
        let b = Board::new();

        assert_eq!(evaluate_relative(&b), Score::draw());
        // 8 pawns with 2 moves each, 2 knights with 2 moves each
        assert_eq!(evaluate(&b, Color::White), Score::from(
            8 * 100 + 2 * 320 + 2 * 330 + 2 * 500 + 900 + 20_000 + 16 * 20 + 4 * 64
        ));
    }

    #[test]
    fn mobility_counts_moves_and_captures() {
        // rook on a1: 13 quiet squares, plus a capture on a8
        let b = board("r7/8/8/8/8/8/8/R7");

        assert_eq!(evaluate(&b, Color::White), Score::from(500 + 14 * 100 + 50));
    }

    #[test]
    fn checks_earn_a_bonus() {
        let b = board("4k3/8/8/8/8/8/8/4R2K");
        let quiet = board("3k4/8/8/8/8/8/8/4R2K");

        // same 13 rook moves, but one of them now captures
        assert_eq!(evaluate(&b, Color::White) - evaluate(&quiet, Color::White),
                   Score::from(50 + CHECK_BONUS));
        assert_eq!(evaluate(&b, Color::Black), evaluate(&quiet, Color::Black));
    }

    #[test]
    fn evaluation_is_signed_for_the_side() {
        let b = board("k7/8/8/8/8/8/8/KQ6");

        assert!(evaluate_relative(&b) > Score::from(900));
        assert_eq!(evaluate_for(&b, Color::White), evaluate_relative(&b));
        assert_eq!(evaluate_for(&b, Color::Black), -evaluate_relative(&b));
    }

    #[test]
    fn display_in_pawns() {
        assert_eq!(Score::from(-320).to_string(), "-3.20");
        assert_eq!(Score::from(5).to_string(), "0.05");
        assert_eq!(Score::from(100_000).to_string(), "1000.00");
    }
}
