//! The `chess` module implements the rules of chess as enforced by the engine.
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::ops;
use std::fmt;
use std::str::FromStr;
use std::convert::TryFrom;
use error::*;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Which side a piece or player is on, based on the color of the pieces for that side.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// The number of colors
    pub const COUNT: usize = 2;

    /// Rank direction in which this color's pawns advance: `1` for white, `-1` for black.
    pub fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// The rank this color's pawns start on, and the only rank they can double step from.
    pub fn pawn_rank(self) -> Rank {
        match self {
            Color::White => Rank::R2,
            Color::Black => Rank::R7,
        }
    }

    /// The rank this color's pieces start on.
    pub fn back_rank(self) -> Rank {
        match self {
            Color::White => Rank::R1,
            Color::Black => Rank::R8,
        }
    }

    /// Returns `true` for white.
    pub fn is_white(self) -> bool {
        self == Color::White
    }
}

impl ops::Not for Color {
    type Output = Color;

    /// Returns the opposite color
    ///
    /// # Example
    /// ```
    /// use timfish::chess::Color;
    /// assert_eq!(!Color::White, Color::Black);
    /// assert_eq!(!Color::Black, Color::White);
    /// ```
    fn not(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl From<bool> for Color {
    /// `true` is white, `false` is black.
    fn from(white: bool) -> Self {
        if white { Color::White } else { Color::Black }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => 'w'.fmt(f),
            Color::Black => 'b'.fmt(f),
        }
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "w"|"white" => Ok(Color::White),
            "b"|"black" => Ok(Color::Black),
            _   => Err(Error::ParseError),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::White
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// The type of a chess piece
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceKind {
    /// The number of piece types
    pub const COUNT: usize = PieceKind::King as usize + 1;

    /// Every piece type, in discriminant order
    pub const ALL: [PieceKind; PieceKind::COUNT] = [
        PieceKind::Pawn, PieceKind::Knight, PieceKind::Bishop,
        PieceKind::Rook, PieceKind::Queen, PieceKind::King,
    ];

    /// Returns the piece letter, uppercase for white and lowercase for black.
    pub fn letter(self, color: Color) -> char {
        let c = match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        };

        if color.is_white() { c } else { c.to_ascii_lowercase() }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.letter(Color::White).fmt(f)
    }
}

impl FromStr for PieceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "P"|"p" => Ok(PieceKind::Pawn),
            "N"|"n" => Ok(PieceKind::Knight),
            "B"|"b" => Ok(PieceKind::Bishop),
            "R"|"r" => Ok(PieceKind::Rook),
            "Q"|"q" => Ok(PieceKind::Queen),
            "K"|"k" => Ok(PieceKind::King),
            _       => Err(Error::ParseError),
        }
    }
}

impl TryFrom<usize> for PieceKind {
    type Error = Error;

    fn try_from(value: usize) -> Result<Self> {
        PieceKind::ALL.get(value).copied().ok_or(Error::TryFromIntError)
    }
}

impl From<PieceKind> for usize {
    fn from(value: PieceKind) -> Self {
        value as Self
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Opaque identity of a piece. It is assigned when the piece is created and stays with the piece
/// as it moves, but plays no part in the rules.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PieceId(u64);

impl PieceId {
    /// Generates a new random identity
    pub fn new() -> Self {
        PieceId(rand::random())
    }
}

impl Default for PieceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A piece on the board
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    id: PieceId,
    kind: PieceKind,
    color: Color,
}

impl Piece {
    /// Creates a piece with a fresh identity
    pub fn new(kind: PieceKind, color: Color) -> Self {
        Piece { id: PieceId::new(), kind, color }
    }

    /// Returns the piece's identity
    pub fn id(&self) -> PieceId {
        self.id
    }

    /// Returns the piece's type
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Returns the piece's color
    pub fn color(&self) -> Color {
        self.color
    }

    /// Returns true if the piece is of the given `kind` and `color`
    pub fn is(&self, kind: PieceKind, color: Color) -> bool {
        self.kind == kind && self.color == color
    }

    /// Returns the piece's letter, uppercase for white and lowercase for black.
    pub fn letter(&self) -> char {
        self.kind.letter(self.color)
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.letter().fmt(f)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Vertical column of the board, labeled from left to right from `White`'s perspective as
/// `A` through `H`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum File {
    A = 0, B = 1, C = 2, D = 3, E = 4, F = 5, G = 6, H = 7,
}

impl File {
    /// The number of files
    pub const COUNT: usize = File::H as usize + 1;

    /// Every file from `A` to `H`
    pub const ALL: [File; File::COUNT] = [
        File::A, File::B, File::C, File::D, File::E, File::F, File::G, File::H,
    ];

    /// Returns the file's letter in lowercase
    pub fn letter(self) -> char {
        (b'a' + self as u8) as char
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.letter().fmt(f)
    }
}

impl FromStr for File {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();

        match (chars.next(), chars.next()) {
            (Some(c @ 'a'..='h'), None) => File::try_from(c as usize - 'a' as usize),
            (Some(c @ 'A'..='H'), None) => File::try_from(c as usize - 'A' as usize),
            _ => Err(Error::ParseError),
        }
    }
}

impl Default for File {
    fn default() -> Self {
        File::A
    }
}

impl TryFrom<usize> for File {
    type Error = Error;

    fn try_from(value: usize) -> Result<Self> {
        File::ALL.get(value).copied().ok_or(Error::TryFromIntError)
    }
}

impl From<File> for usize {
    fn from(value: File) -> Self {
        value as Self
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Horizontal row of the board, labeled from nearest to farthest from `White`'s perspective
/// as `R1` through `R8`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum Rank {
    R1 = 0, R2 = 1, R3 = 2, R4 = 3, R5 = 4, R6 = 5, R7 = 6, R8 = 7,
}

impl Rank {
    /// The number of ranks
    pub const COUNT: usize = Rank::R8 as usize + 1;

    /// Every rank from `R1` to `R8`
    pub const ALL: [Rank; Rank::COUNT] = [
        Rank::R1, Rank::R2, Rank::R3, Rank::R4, Rank::R5, Rank::R6, Rank::R7, Rank::R8,
    ];

    /// Returns the rank's number, from 1 to 8
    pub fn number(self) -> u8 {
        self as u8 + 1
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.number().fmt(f)
    }
}

impl FromStr for Rank {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.parse::<usize>() {
            Ok(n @ 1..=8) if s.len() == 1 => Rank::try_from(n - 1),
            _ => Err(Error::ParseError),
        }
    }
}

impl Default for Rank {
    fn default() -> Self {
        Rank::R1
    }
}

impl TryFrom<usize> for Rank {
    type Error = Error;

    fn try_from(value: usize) -> Result<Self> {
        Rank::ALL.get(value).copied().ok_or(Error::TryFromIntError)
    }
}

impl From<Rank> for usize {
    fn from(value: Rank) -> Self {
        value as Self
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A specific square on the board, labeled using the `File` and `Rank` as coordinates.
///
/// Squares are indexed file by file (`a1`, `a2`, ..., `a8`, `b1`, ...), which is also the order
/// the board is scanned in.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square(u8);

macro_rules! squares {
    ($($name:ident = $index:expr),* $(,)?) => {
        #[allow(missing_docs)]
        impl Square {
            $(pub const $name: Square = Square($index);)*
        }
    }
}

squares! {
    A1 = 0o00, A2 = 0o01, A3 = 0o02, A4 = 0o03, A5 = 0o04, A6 = 0o05, A7 = 0o06, A8 = 0o07,
    B1 = 0o10, B2 = 0o11, B3 = 0o12, B4 = 0o13, B5 = 0o14, B6 = 0o15, B7 = 0o16, B8 = 0o17,
    C1 = 0o20, C2 = 0o21, C3 = 0o22, C4 = 0o23, C5 = 0o24, C6 = 0o25, C7 = 0o26, C8 = 0o27,
    D1 = 0o30, D2 = 0o31, D3 = 0o32, D4 = 0o33, D5 = 0o34, D6 = 0o35, D7 = 0o36, D8 = 0o37,
    E1 = 0o40, E2 = 0o41, E3 = 0o42, E4 = 0o43, E5 = 0o44, E6 = 0o45, E7 = 0o46, E8 = 0o47,
    F1 = 0o50, F2 = 0o51, F3 = 0o52, F4 = 0o53, F5 = 0o54, F6 = 0o55, F7 = 0o56, F8 = 0o57,
    G1 = 0o60, G2 = 0o61, G3 = 0o62, G4 = 0o63, G5 = 0o64, G6 = 0o65, G7 = 0o66, G8 = 0o67,
    H1 = 0o70, H2 = 0o71, H3 = 0o72, H4 = 0o73, H5 = 0o74, H6 = 0o75, H7 = 0o76, H8 = 0o77,
}

impl Square {
    /// The number of squares
    pub const COUNT: usize = 64;

    /// Returns a square from its file and rank
    pub fn from_coord(file: File, rank: Rank) -> Square {
        Square(((file as u8) << 3) | rank as u8)
    }

    /// Returns the square's file
    pub fn file(self) -> File {
        File::ALL[(self.0 >> 3) as usize]
    }

    /// Returns the square's rank
    pub fn rank(self) -> Rank {
        Rank::ALL[(self.0 & 7) as usize]
    }

    /// Returns the square `df` files and `dr` ranks away, or `None` if that is off the board.
    pub fn offset(self, df: i8, dr: i8) -> Option<Square> {
        let file = self.file() as i8 + df;
        let rank = self.rank() as i8 + dr;

        if (0..8).contains(&file) && (0..8).contains(&rank) {
            Some(Square(((file as u8) << 3) | rank as u8))
        } else {
            None
        }
    }

    /// Returns an iterator over all 64 squares in board-scan order
    pub fn all() -> impl DoubleEndedIterator<Item=Square> + ExactSizeIterator + Clone {
        (0..Self::COUNT as u8).map(Square)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({})", self)
    }
}

impl FromStr for Square {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() == 2 && s.is_char_boundary(1) {
            Ok(Square::from_coord(s[..1].parse()?, s[1..].parse()?))
        } else {
            Err(Error::ParseError)
        }
    }
}

impl Default for Square {
    fn default() -> Self {
        Square::A1
    }
}

impl TryFrom<usize> for Square {
    type Error = Error;

    fn try_from(value: usize) -> Result<Self> {
        if value < Self::COUNT {
            Ok(Square(value as u8))
        } else {
            Err(Error::TryFromIntError)
        }
    }
}

impl From<Square> for usize {
    fn from(value: Square) -> Self {
        value.0 as Self
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
pub mod error;
pub mod geometry;
pub mod notation;
mod board;
pub use board::{Board, BoardBuilder, CheckRecord, ContentHash, Diagram};
pub use notation::Move;
pub mod rules;
pub use rules::{MoveType, Rule, RuleEngine};

pub mod game;
pub mod variations;
