//! Contains the `Board` structure which holds the pieces and answers questions about attacks
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;
use std::str::FromStr;
use std::convert::TryFrom;
use sha2::{Digest, Sha256};
use super::*;
use super::geometry::{self, DIAGONALS, STRAIGHTS, KNIGHT_JUMPS};
use super::rules::Rule;
use PieceKind::*;

mod builder;
pub use builder::BoardBuilder;

const BACK_RANK: [PieceKind; File::COUNT] = [
    Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook,
];

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A check: the king on `king` is attacked by the piece on `attacker`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct CheckRecord {
    /// Square of the attacking piece
    pub attacker: Square,
    /// Square of the attacked king
    pub king: Square,
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Digest of a board's occupancy, used as a memoization key.
///
/// Two boards with the same pieces of the same colors on the same squares have the same hash.
/// The side to move and castling history do not take part.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0.iter() {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// The pieces on the board, plus the last move made on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: [ Option<Piece>; Square::COUNT ],
    last_move: Option<Move>,
    last_mover: Option<Color>,
}

impl Board {
    /// Returns a board set up in the standard starting position
    pub fn new() -> Self {
        let mut board = Board::empty();

        for (file, kind) in File::ALL.iter().copied().zip(BACK_RANK.iter().copied()) {
            for color in [Color::White, Color::Black].iter().copied() {
                board.place(Piece::new(kind, color), Square::from_coord(file, color.back_rank()));
                board.place(Piece::new(Pawn, color), Square::from_coord(file, color.pawn_rank()));
            }
        }

        board
    }

    /// Returns a board with no pieces
    pub fn empty() -> Self {
        Board {
            squares: [ None; Square::COUNT ],
            last_move: None,
            last_mover: None,
        }
    }

    /// Returns the piece on `square`, if any
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[usize::from(square)]
    }

    /// Puts `piece` on `square`, replacing whatever was there
    pub fn place(&mut self, piece: Piece, square: Square) {
        self.squares[usize::from(square)] = Some(piece);
    }

    /// Removes and returns the piece on `square`
    pub fn clear(&mut self, square: Square) -> Option<Piece> {
        self.squares[usize::from(square)].take()
    }

    /// Moves the piece on `mv.from()` to `mv.to()`, capturing anything already there.
    ///
    /// This does not check legality. Use the [`rules`](super::rules) module for that.
    ///
    /// # Errors
    ///
    /// Returns `NoPieceAtOrigin` if there is no piece on the origin square.
    pub fn apply_move(&mut self, mv: Move) -> Result<()> {
        let piece = self.clear(mv.from()).ok_or(Error::NoPieceAtOrigin(mv.from()))?;

        self.place(piece, mv.to());
        self.set_last_move(mv, piece.color());

        Ok(())
    }

    /// Returns a copy of the board with each of `moves` applied in order.
    pub fn clone_with_moves(&self, moves: &[Move]) -> Result<Board> {
        let mut board = self.clone();

        for mv in moves {
            board.apply_move(*mv)?;
        }

        Ok(board)
    }

    pub(crate) fn set_last_move(&mut self, mv: Move, color: Color) {
        self.last_move = Some(mv);
        self.last_mover = Some(color);
    }

    /// The last move applied to the board
    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    /// The color of the last piece moved
    pub fn last_mover(&self) -> Option<Color> {
        self.last_mover
    }

    /// The side to move: the opposite of the last mover, or white if nothing has moved.
    pub fn turn(&self) -> Color {
        self.last_mover.map_or(Color::White, |c| !c)
    }

    /// Returns `color`'s pieces with their squares, in board-scan order
    pub fn pieces(&self, color: Color) -> impl Iterator<Item=(Square, Piece)> + '_ {
        self.occupied().filter(move |(_, p)| p.color() == color)
    }

    /// Returns every piece with its square, in board-scan order
    pub fn occupied(&self) -> impl Iterator<Item=(Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.piece_at(sq).map(|p| (sq, p)))
    }

    /// Returns the square of `color`'s king
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces(color).find(|(_, p)| p.kind() == King).map(|(sq, _)| sq)
    }

    /// Returns the squares of `color`'s pieces that attack `target`.
    ///
    /// Pieces are found by walking outward from `target`: diagonal rays for bishops and queens,
    /// straight rays for rooks and queens, jumps for knights, and single steps for pawns and kings.
    pub fn attackers(&self, target: Square, color: Color) -> Vec<Square> {
        let mut found = Vec::new();

        for &(df, dr) in DIAGONALS.iter() {
            if let Some((sq, piece)) = self.first_piece(target, df, dr, color) {
                let adjacent = target.offset(df, dr) == Some(sq);

                match piece.kind() {
                    Bishop | Queen => found.push(sq),
                    King if adjacent => found.push(sq),
                    Pawn if adjacent && self.pawn_attacks(sq, target) => found.push(sq),
                    _ => { },
                }
            }
        }

        for &(df, dr) in STRAIGHTS.iter() {
            if let Some((sq, piece)) = self.first_piece(target, df, dr, color) {
                match piece.kind() {
                    Rook | Queen => found.push(sq),
                    King if target.offset(df, dr) == Some(sq) => found.push(sq),
                    _ => { },
                }
            }
        }

        for &(df, dr) in KNIGHT_JUMPS.iter() {
            if let Some(sq) = target.offset(df, dr) {
                match self.piece_at(sq) {
                    Some(p) if p.is(Knight, color) => found.push(sq),
                    _ => { },
                }
            }
        }

        found
    }

    /// Returns `true` if any of `color`'s pieces attack `target`
    pub fn is_attacked(&self, target: Square, color: Color) -> bool {
        !self.attackers(target, color).is_empty()
    }

    fn first_piece(&self, target: Square, df: i8, dr: i8, color: Color) -> Option<(Square, Piece)> {
        let sq = geometry::ray(target, df, dr, self).last()?;

        self.piece_at(sq).filter(|p| p.color() == color).map(|p| (sq, p))
    }

    fn pawn_attacks(&self, pawn: Square, target: Square) -> bool {
        if self.piece_at(target).is_some() {
            Rule::DiagonalStepCapture.accepts(Move::new(pawn, target), self)
        } else {
            let color = self.piece_at(pawn).map_or(Color::White, |p| p.color());
            target.rank() as i8 - pawn.rank() as i8 == color.forward()
        }
    }

    /// Returns every check on the board, for every king on the board.
    pub fn checks(&self) -> Vec<CheckRecord> {
        self.occupied()
            .filter(|(_, p)| p.kind() == King)
            .flat_map(|(sq, _)| self.checks_against(sq))
            .collect()
    }

    /// Returns the checks against the king on `king`.
    ///
    /// # Panics
    ///
    /// Panics if there is no king on `king`.
    pub fn checks_against(&self, king: Square) -> Vec<CheckRecord> {
        let color = match self.piece_at(king) {
            Some(p) if p.kind() == King => p.color(),
            _ => panic!("no king at {}", king),
        };

        self.attackers(king, !color)
            .into_iter()
            .map(|attacker| CheckRecord { attacker, king })
            .collect()
    }

    /// Returns `true` if `color`'s king is attacked. A side without a king is never in check.
    pub fn in_check(&self, color: Color) -> bool {
        self.king_square(color).map_or(false, |k| self.is_attacked(k, !color))
    }

    /// Returns one entry per square in board-scan order: the piece letter (uppercase for white,
    /// lowercase for black) or `"0"` for an empty square.
    pub fn serialize(&self) -> Vec<String> {
        Square::all()
            .map(|sq| self.piece_at(sq).map_or_else(|| "0".to_owned(), |p| p.letter().to_string()))
            .collect()
    }

    /// Returns the SHA-256 digest of the JSON form of `serialize()`.
    pub fn content_hash(&self) -> ContentHash {
        let json = serde_json::to_string(&self.serialize()).expect("INFALLIBLE");
        let mut bytes = [0; 32];

        bytes.copy_from_slice(&Sha256::digest(json.as_bytes()));
        ContentHash(bytes)
    }

    /// Returns a value which displays the board as a grid for terminal output
    pub fn diagram(&self) -> Diagram<'_> {
        Diagram(self)
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl fmt::Display for Board {
    /// Writes out the piece placement field of FEN
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = String::new();

        for rank in Rank::ALL.iter().rev().copied() {
            let mut count = 0;
            for file in File::ALL.iter().copied() {
                if let Some(piece) = self.piece_at(Square::from_coord(file, rank)) {
                    if count > 0 {
                        s += &count.to_string();
                        count = 0;
                    }
                    s.push(piece.letter());
                } else {
                    count += 1;
                }
            }
            if count > 0 {
                s += &count.to_string();
            }
            if rank != Rank::R1 {
                s.push('/');
            }
        }

        s.fmt(f)
    }
}

impl FromStr for Board {
    type Err = Error;

    /// Parses the piece placement field of FEN, optionally followed by the side to move
    fn from_str(s: &str) -> Result<Self> {
        BoardBuilder::from_str(s)?.validate()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Terminal grid view of a board, as returned by `Board::diagram`
#[derive(Debug, Copy, Clone)]
pub struct Diagram<'a>(&'a Board);

impl fmt::Display for Diagram<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "   a   b   c   d   e   f   g   h")?;
        for rank in Rank::ALL.iter().rev().copied() {
            write!(f, "{} ", rank)?;
            for file in File::ALL.iter().copied() {
                match self.0.piece_at(Square::from_coord(file, rank)) {
                    Some(p) => write!(f, "[{}{}]", p.kind(), p.color())?,
                    None => write!(f, "[  ]")?,
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "   a   b   c   d   e   f   g   h")
    }
}
