//! Rays and steps across the board, shared by move generation and check detection
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::iter::FusedIterator;
use super::{Board, Move, Square};

/// A unit direction as `(file delta, rank delta)`
pub type Direction = (i8, i8);

/// The four diagonal directions
pub const DIAGONALS: [Direction; 4] = [ (1, 1), (1, -1), (-1, -1), (-1, 1) ];

/// The four orthogonal directions
pub const STRAIGHTS: [Direction; 4] = [ (0, 1), (1, 0), (0, -1), (-1, 0) ];

/// Knight jumps
pub const KNIGHT_JUMPS: [Direction; 8] = [
    (1, 2), (2, 1), (2, -1), (1, -2), (-1, -2), (-2, -1), (-2, 1), (-1, 2),
];

/// Single king steps, straight and diagonal
pub const KING_STEPS: [Direction; 8] = [
    (0, 1), (1, 1), (1, 0), (1, -1), (0, -1), (-1, -1), (-1, 0), (-1, 1),
];

/// Returns the move one step in direction `(df, dr)` from `origin`, or `None` if it would leave
/// the board.
pub fn step(origin: Square, df: i8, dr: i8) -> Option<Move> {
    origin.offset(df, dr).map(|to| Move::new(origin, to))
}

/// Returns the squares from `origin` (exclusive) in direction `(df, dr)`, up to and including the
/// first occupied square or the edge of the board.
pub fn ray(origin: Square, df: i8, dr: i8, board: &Board) -> Ray<'_> {
    Ray { board, next: origin.offset(df, dr), dir: (df, dr), end: None }
}

/// Same as `ray`, but yields moves from `origin` to each square.
pub fn walk(origin: Square, df: i8, dr: i8, board: &Board)
-> impl Iterator<Item=Move> + Clone + '_ {
    ray(origin, df, dr, board).map(move |to| Move::new(origin, to))
}

/// Returns the squares from `a` (exclusive) toward `b`, ending at `b` or at the first occupied
/// square, whichever comes first. The iterator is empty if `a` and `b` are not on a common file
/// or rank.
pub fn between_straight(a: Square, b: Square, board: &Board) -> Ray<'_> {
    let (df, dr) = (b.file() as i8 - a.file() as i8, b.rank() as i8 - a.rank() as i8);

    if a != b && (df == 0 || dr == 0) {
        bounded(a, b, df.signum(), dr.signum(), board)
    } else {
        Ray::empty(board)
    }
}

/// Returns the squares from `a` (exclusive) toward `b`, ending at `b` or at the first occupied
/// square, whichever comes first. The iterator is empty if `a` and `b` are not on a common
/// diagonal.
pub fn between_diagonal(a: Square, b: Square, board: &Board) -> Ray<'_> {
    let (df, dr) = (b.file() as i8 - a.file() as i8, b.rank() as i8 - a.rank() as i8);

    if df != 0 && df.abs() == dr.abs() {
        bounded(a, b, df.signum(), dr.signum(), board)
    } else {
        Ray::empty(board)
    }
}

fn bounded(a: Square, b: Square, df: i8, dr: i8, board: &Board) -> Ray<'_> {
    Ray { end: Some(b), ..ray(a, df, dr, board) }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Iterator over the squares of a ray. Cloning it restarts from the same point.
#[derive(Debug, Clone)]
pub struct Ray<'a> {
    board: &'a Board,
    next: Option<Square>,
    dir: (i8, i8),
    end: Option<Square>,
}

impl<'a> Ray<'a> {
    fn empty(board: &'a Board) -> Self {
        Ray { board, next: None, dir: (0, 0), end: None }
    }
}

impl Iterator for Ray<'_> {
    type Item = Square;

    fn next(&mut self) -> Option<Square> {
        let sq = self.next?;

        self.next = if self.board.piece_at(sq).is_some() || Some(sq) == self.end {
            None
        } else {
            sq.offset(self.dir.0, self.dir.1)
        };

        Some(sq)
    }
}

impl FusedIterator for Ray<'_> { }

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;
    use super::*;

    #[test]
    fn step_stops_at_the_edge() {
        assert_eq!(step(Square::E4, 0, 1), Some(Move::new(Square::E4, Square::E5)));
        assert_eq!(step(Square::H4, 1, 0), None);
        assert_eq!(step(Square::A1, -1, -1), None);
    }

    #[test]
    fn ray_includes_the_blocking_square() {
        let board = "8/8/8/8/8/8/8/R2p4".parse::<Board>().unwrap();
        let squares: Vec<_> = ray(Square::A1, 1, 0, &board).collect();

        assert_eq!(squares, vec![Square::B1, Square::C1, Square::D1]);
    }

    #[test]
    fn ray_runs_to_the_edge_on_an_open_board() {
        let board = Board::empty();

        assert_eq!(ray(Square::A1, 0, 1, &board).count(), 7);
        assert_eq!(ray(Square::D4, 1, 1, &board).last(), Some(Square::H8));
        assert_eq!(walk(Square::D4, -1, -1, &board).count(), 3);
    }

    #[test]
    fn walk_is_restartable() {
        let board = Board::new();
        let moves = walk(Square::D1, 0, 1, &board);

        assert_eq!(moves.clone().count(), 1);
        assert_eq!(moves.count(), 1);
    }

    #[test]
    fn between_stops_at_the_target() {
        let board = Board::empty();

        assert_eq!(between_straight(Square::A1, Square::A4, &board).collect::<Vec<_>>(),
                   vec![Square::A2, Square::A3, Square::A4]);
        assert_eq!(between_diagonal(Square::C1, Square::F4, &board).last(), Some(Square::F4));
    }

    #[test]
    fn between_stops_at_a_blocker() {
        let board = "8/8/8/8/8/8/P7/R7".parse::<Board>().unwrap();

        assert_eq!(between_straight(Square::A1, Square::A4, &board).collect::<Vec<_>>(),
                   vec![Square::A2]);
    }

    #[test]
    fn between_is_empty_off_line() {
        let board = Board::empty();

        assert_eq!(between_straight(Square::A1, Square::B3, &board).count(), 0);
        assert_eq!(between_diagonal(Square::A1, Square::A3, &board).count(), 0);
        assert_eq!(between_diagonal(Square::A1, Square::A1, &board).count(), 0);
    }

    quickcheck! {
        fn between_reaches_targets_on_a_shared_line(a: Square, b: Square) -> bool {
            let board = Board::empty();
            let squares = between_straight(a, b, &board);

            if a != b && (a.file() == b.file() || a.rank() == b.rank()) {
                squares.last() == Some(b)
            } else {
                squares.count() == 0
            }
        }

        fn open_rays_end_on_an_edge(origin: Square, dir: u8) -> bool {
            let board = Board::empty();
            let (df, dr) = KING_STEPS[(dir % 8) as usize];

            match ray(origin, df, dr, &board).last() {
                Some(sq) => sq.offset(df, dr).is_none(),
                None => origin.offset(df, dr).is_none(),
            }
        }
    }
}
