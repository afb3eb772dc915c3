//! Move legality and move generation
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::iter;
use super::*;
use super::geometry::{self, Direction, DIAGONALS, STRAIGHTS, KNIGHT_JUMPS, KING_STEPS};
use PieceKind::*;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A single movement rule. Each piece type has an ordered list of rules, and a move is accepted
/// if any of them accepts it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Rule {
    /// King onto a rook of its own color, which relocates both pieces
    Castle,
    /// One diagonal square onto an empty square
    DiagonalStep,
    /// One orthogonal square onto an empty square
    StraightStep,
    /// One diagonal square onto an opponent's piece. Pawns may only capture forward.
    DiagonalStepCapture,
    /// One orthogonal square onto an opponent's piece
    StraightStepCapture,
    /// Any distance along an open diagonal onto an empty square
    DiagonalSlide,
    /// Any distance along an open file or rank onto an empty square
    StraightSlide,
    /// Along an open diagonal onto an opponent's piece
    DiagonalSlideCapture,
    /// Along an open file or rank onto an opponent's piece
    StraightSlideCapture,
    /// Knight jump onto an empty square
    KnightStep,
    /// Knight jump onto an opponent's piece
    KnightStepCapture,
    /// Pawn one square forward onto an empty square
    PawnStep,
    /// Pawn two squares forward from its starting rank, across and onto empty squares
    PawnDoubleStep,
}

const KING_RULES: [Rule; 5] = [
    Rule::Castle, Rule::DiagonalStep, Rule::StraightStep,
    Rule::DiagonalStepCapture, Rule::StraightStepCapture,
];
const QUEEN_RULES: [Rule; 4] = [
    Rule::DiagonalSlide, Rule::StraightSlide,
    Rule::DiagonalSlideCapture, Rule::StraightSlideCapture,
];
const ROOK_RULES: [Rule; 2] = [ Rule::StraightSlide, Rule::StraightSlideCapture ];
const BISHOP_RULES: [Rule; 2] = [ Rule::DiagonalSlide, Rule::DiagonalSlideCapture ];
const KNIGHT_RULES: [Rule; 2] = [ Rule::KnightStep, Rule::KnightStepCapture ];
const PAWN_RULES: [Rule; 3] = [ Rule::PawnStep, Rule::PawnDoubleStep, Rule::DiagonalStepCapture ];

impl Rule {
    /// Returns the rules for `kind`, in the order they are tried
    pub fn for_kind(kind: PieceKind) -> &'static [Rule] {
        match kind {
            King => &KING_RULES,
            Queen => &QUEEN_RULES,
            Rook => &ROOK_RULES,
            Bishop => &BISHOP_RULES,
            Knight => &KNIGHT_RULES,
            Pawn => &PAWN_RULES,
        }
    }

    /// Returns `true` if this rule alone allows the piece on `mv.from()` to make `mv`.
    ///
    /// This looks at geometry and occupancy only. Whether the move leaves a king in check, and
    /// whether a castling king crosses an attacked square, is up to `RuleEngine`.
    pub fn accepts(self, mv: Move, board: &Board) -> bool {
        use Rule::*;

        let piece = match board.piece_at(mv.from()) {
            Some(piece) => piece,
            None => return false,
        };
        let target = board.piece_at(mv.to());
        let empty = target.is_none();
        let enemy = target.map_or(false, |t| t.color() != piece.color());
        let (df, dr) = mv.offset();
        let diagonal_step = df.abs() == 1 && dr.abs() == 1;
        let straight_step = df.abs() + dr.abs() == 1;
        let knight_jump = KNIGHT_JUMPS.contains(&(df, dr));
        let diagonal = geometry::between_diagonal(mv.from(), mv.to(), board);
        let straight = geometry::between_straight(mv.from(), mv.to(), board);

        match self {
            Castle => castle_geometry(mv, piece, board),
            DiagonalStep => diagonal_step && empty,
            StraightStep => straight_step && empty,
            DiagonalStepCapture => {
                diagonal_step && enemy && (piece.kind() != Pawn || dr == piece.color().forward())
            },
            StraightStepCapture => straight_step && enemy,
            DiagonalSlide => empty && reaches(diagonal, mv),
            StraightSlide => empty && reaches(straight, mv),
            DiagonalSlideCapture => enemy && reaches(diagonal, mv),
            StraightSlideCapture => enemy && reaches(straight, mv),
            KnightStep => knight_jump && empty,
            KnightStepCapture => knight_jump && enemy,
            PawnStep => piece.kind() == Pawn && df == 0 && dr == piece.color().forward() && empty,
            PawnDoubleStep => {
                let forward = piece.color().forward();

                piece.kind() == Pawn && df == 0 && dr == 2 * forward && empty
                    && mv.from().rank() == piece.color().pawn_rank()
                    && mv.from()
                        .offset(0, forward)
                        .map_or(false, |sq| board.piece_at(sq).is_none())
            },
        }
    }
}

/// The path ends at the destination, so nothing stands strictly between.
fn reaches(path: geometry::Ray<'_>, mv: Move) -> bool {
    path.last() == Some(mv.to())
}

/// The king moves onto its own rook: 3 files kingside (e1-h1) and 4 queenside (e1-a1) on a
/// standard board.
fn castle_geometry(mv: Move, king: Piece, board: &Board) -> bool {
    let (df, dr) = mv.offset();

    king.kind() == King
        && board.piece_at(mv.to()).map_or(false, |t| t.is(Rook, king.color()))
        && dr == 0
        && (df.abs() == 3 || df.abs() == 4)
        && reaches(geometry::between_straight(mv.from(), mv.to(), board), mv)
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// How a legal move is carried out on the board
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MoveType {
    /// The piece moves from the origin to the destination, capturing anything there
    Standard,
    /// The king and rook both move
    Castling {
        /// Where the king goes: two files toward the rook
        king: Move,
        /// Where the rook goes: the square the king crosses
        rook: Move,
    },
}

impl Default for MoveType {
    fn default() -> Self {
        MoveType::Standard
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Answers legality questions about one board.
///
/// The checks standing on the board are found once, when the `RuleEngine` is created, so it is
/// cheaper to reuse one engine for many questions about the same board.
#[derive(Debug, Clone)]
pub struct RuleEngine<'a> {
    board: &'a Board,
    checks: Vec<CheckRecord>,
}

impl<'a> RuleEngine<'a> {
    /// Creates a rule engine for `board`
    pub fn new(board: &'a Board) -> Self {
        RuleEngine { board, checks: board.checks() }
    }

    /// The board the engine answers for
    pub fn board(&self) -> &'a Board {
        self.board
    }

    /// Returns how `mv` would be made if the piece's rules allow it, ignoring checks.
    ///
    /// A move from an empty square, a move to the same square, and a capture of a piece of the
    /// same color are never allowed. The one exception to the last is a king moving onto its own
    /// rook, which only castling can accept.
    pub fn classify(&self, mv: Move) -> Option<MoveType> {
        let piece = self.board.piece_at(mv.from())?;

        if mv.is_null() {
            return None;
        }
        if let Some(target) = self.board.piece_at(mv.to()) {
            let castling = piece.kind() == King && target.kind() == Rook;
            if target.color() == piece.color() && !castling {
                return None;
            }
        }

        for rule in Rule::for_kind(piece.kind()) {
            match rule {
                Rule::Castle => {
                    if let Some(castling) = self.castling(mv, piece.color()) {
                        return Some(castling);
                    }
                },
                rule if rule.accepts(mv, self.board) => return Some(MoveType::Standard),
                _ => { },
            }
        }

        None
    }

    fn castling(&self, mv: Move, color: Color) -> Option<MoveType> {
        if !Rule::Castle.accepts(mv, self.board) {
            return None;
        }

        let dir = mv.offset().0.signum();
        let transit = iter::once(mv.from())
            .chain(geometry::between_straight(mv.from(), mv.to(), self.board))
            .filter(|sq| *sq != mv.to());

        for sq in transit {
            if self.board.is_attacked(sq, !color) {
                return None;
            }
        }

        let crossed = mv.from().offset(dir, 0)?;
        let king_to = mv.from().offset(2 * dir, 0)?;

        Some(MoveType::Castling {
            king: Move::new(mv.from(), king_to),
            rook: Move::new(mv.to(), crossed),
        })
    }

    /// Returns how `mv` would be made if it is fully legal.
    ///
    /// On top of `classify`, the move must not leave the mover's king in check, and it must
    /// resolve every check already on the board.
    pub fn legal_move(&self, mv: Move) -> Option<MoveType> {
        let kind = self.classify(mv)?;
        let color = self.board.piece_at(mv.from())?.color();
        let after = self.play(mv, kind, color);
        let checks = after.checks();

        let self_check = checks.iter()
            .any(|c| after.piece_at(c.king).map_or(false, |k| k.color() == color));
        let unresolved = self.checks.iter().any(|c| checks.contains(c));

        if self_check || unresolved {
            None
        } else {
            Some(kind)
        }
    }

    /// Returns `true` if `mv` is legal on the board
    pub fn is_legal(&self, mv: Move) -> bool {
        self.legal_move(mv).is_some()
    }

    /// Makes `mv` on a copy of the board and returns it, relocating both pieces when castling.
    ///
    /// # Errors
    ///
    /// Returns `NoPieceAtOrigin` if the origin is empty and `IllegalMove` if the move is illegal.
    pub fn make(&self, mv: Move) -> Result<Board> {
        let color = self.board
            .piece_at(mv.from())
            .ok_or(Error::NoPieceAtOrigin(mv.from()))?
            .color();
        let kind = self.legal_move(mv).ok_or(Error::IllegalMove)?;

        Ok(self.play(mv, kind, color))
    }

    fn play(&self, mv: Move, kind: MoveType, color: Color) -> Board {
        let mut board = self.board.clone();

        match kind {
            MoveType::Standard => {
                board.apply_move(mv).expect("INFALLIBLE");
            },
            MoveType::Castling { king, rook } => {
                board.apply_move(rook).expect("INFALLIBLE");
                board.apply_move(king).expect("INFALLIBLE");
                board.set_last_move(mv, color);
            },
        }

        board
    }

    /// Returns the legal moves of the piece on `square`, in generation order.
    ///
    /// # Errors
    ///
    /// Returns `NoPieceAtSquare` if `square` is empty.
    pub fn moves_for(&self, square: Square) -> Result<Vec<Move>> {
        let piece = self.board.piece_at(square).ok_or(Error::NoPieceAtSquare(square))?;

        Ok(self.candidates(square, piece).filter(|mv| self.is_legal(*mv)).collect())
    }

    /// Returns the legal moves of the piece on `square` that capture an opponent's piece.
    pub fn captures_for(&self, square: Square) -> Result<Vec<Move>> {
        let color = self.board.piece_at(square).ok_or(Error::NoPieceAtSquare(square))?.color();
        let mut moves = self.moves_for(square)?;

        moves.retain(|mv| self.board.piece_at(mv.to()).map_or(false, |t| t.color() != color));
        Ok(moves)
    }

    /// Returns every legal move for `color`, pieces in board-scan order.
    pub fn all_moves(&self, color: Color) -> Vec<Move> {
        self.board
            .pieces(color)
            .flat_map(|(sq, piece)| self.candidates(sq, piece).filter(move |mv| self.is_legal(*mv)))
            .collect()
    }

    /// Returns `true` if `color` has at least one legal move.
    pub fn has_moves(&self, color: Color) -> bool {
        self.board
            .pieces(color)
            .any(|(sq, piece)| self.candidates(sq, piece).any(|mv| self.is_legal(mv)))
    }

    /// Moves worth testing for the piece: the squares its rules could possibly accept.
    fn candidates(&self, sq: Square, piece: Piece) -> Box<dyn Iterator<Item=Move> + 'a> {
        let board = self.board;

        match piece.kind() {
            King => {
                // castling is offered onto the first piece along the rank, if it's our rook
                let castle = move |df| {
                    geometry::ray(sq, df, 0, board)
                        .last()
                        .filter(|to| {
                            board.piece_at(*to).map_or(false, |t| t.is(Rook, piece.color()))
                        })
                        .map(|to| Move::new(sq, to))
                };

                Box::new(steps(sq, &KING_STEPS).chain(castle(1)).chain(castle(-1)))
            },
            Knight => Box::new(steps(sq, &KNIGHT_JUMPS)),
            Bishop => Box::new(walks(sq, &DIAGONALS, board)),
            Rook => Box::new(walks(sq, &STRAIGHTS, board)),
            Queen => Box::new(walks(sq, &DIAGONALS, board).chain(walks(sq, &STRAIGHTS, board))),
            Pawn => {
                let forward = piece.color().forward();

                Box::new(
                    [(0, forward), (0, 2 * forward), (-1, forward), (1, forward)]
                        .iter()
                        .copied()
                        .filter_map(move |(df, dr)| geometry::step(sq, df, dr))
                        .collect::<Vec<_>>()
                        .into_iter()
                )
            },
        }
    }
}

fn steps(sq: Square, dirs: &'static [Direction]) -> impl Iterator<Item=Move> {
    dirs.iter().filter_map(move |&(df, dr)| geometry::step(sq, df, dr))
}

fn walks<'a>(sq: Square, dirs: &'static [Direction], board: &'a Board)
-> impl Iterator<Item=Move> + 'a {
    dirs.iter().flat_map(move |&(df, dr)| geometry::walk(sq, df, dr, board))
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Returns `true` if `mv` is legal on `board`.
///
/// Whose turn it is plays no part; see [`Game`](super::game::Game) for that.
pub fn is_legal(mv: Move, board: &Board) -> bool {
    RuleEngine::new(board).is_legal(mv)
}

/// Returns the legal moves of the piece on `square`.
pub fn moves_for(board: &Board, square: Square) -> Result<Vec<Move>> {
    RuleEngine::new(board).moves_for(square)
}

/// Returns the board after `mv`, or an error if `mv` is not legal.
pub fn make_move(board: &Board, mv: Move) -> Result<Board> {
    RuleEngine::new(board).make(mv)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    fn mv(s: &str) -> Move {
        s.parse().unwrap()
    }

    fn destinations(board: &Board, sq: Square) -> Vec<Square> {
        let mut squares: Vec<_> = moves_for(board, sq).unwrap().iter().map(|m| m.to()).collect();
        squares.sort();
        squares
    }

    #[test]
    fn every_kind_has_rules() {
        for kind in PieceKind::ALL.iter().copied() {
            assert!(!Rule::for_kind(kind).is_empty());
        }
        assert_eq!(Rule::for_kind(King)[0], Rule::Castle);
    }

    #[test]
    fn step_rules_accept_exactly_one_square() {
        let b = board("8/8/8/8/3K4/8/8/8");

        assert!(Rule::StraightStep.accepts(mv("d4-d5"), &b));
        assert!(Rule::StraightStep.accepts(mv("d4-c4"), &b));
        assert!(!Rule::StraightStep.accepts(mv("d4-e5"), &b));
        assert!(!Rule::StraightStep.accepts(mv("d4-d6"), &b));
        assert!(Rule::DiagonalStep.accepts(mv("d4-e5"), &b));
        assert!(!Rule::DiagonalStep.accepts(mv("d4-d5"), &b));
        assert!(!Rule::DiagonalStep.accepts(mv("d4-f6"), &b));
    }

    #[test]
    fn capture_rules_need_an_opponent() {
        let b = board("8/8/8/3pP3/3K4/8/8/8");

        assert!(Rule::StraightStepCapture.accepts(mv("d4-d5"), &b));
        assert!(!Rule::StraightStep.accepts(mv("d4-d5"), &b));
        assert!(!Rule::DiagonalStepCapture.accepts(mv("d4-e5"), &b));
        assert!(!Rule::DiagonalStepCapture.accepts(mv("d4-c5"), &b));
    }

    #[test]
    fn pawns_capture_forward_only() {
        let b = board("8/8/8/8/3p4/4P3/8/8");

        assert!(Rule::DiagonalStepCapture.accepts(mv("e3-d4"), &b));
        assert!(Rule::DiagonalStepCapture.accepts(mv("d4-e3"), &b));

        let b = board("8/8/8/8/3P4/4p3/8/8");

        assert!(!Rule::DiagonalStepCapture.accepts(mv("d4-e3"), &b));
        assert!(!Rule::DiagonalStepCapture.accepts(mv("e3-d4"), &b));
    }

    #[test]
    fn double_step_needs_the_starting_rank_and_a_clear_path() {
        let b = Board::new();
        assert!(Rule::PawnDoubleStep.accepts(mv("e2-e4"), &b));
        assert!(Rule::PawnDoubleStep.accepts(mv("d7-d5"), &b));
        assert!(!Rule::PawnDoubleStep.accepts(mv("d7-d6"), &b));
        assert!(!Rule::PawnDoubleStep.accepts(mv("e2-e5"), &b));

        let b = board("8/8/8/8/8/4P3/8/8");
        assert!(!Rule::PawnDoubleStep.accepts(mv("e3-e5"), &b));

        let b = board("8/8/8/8/8/4n3/4P3/8");
        assert!(!Rule::PawnDoubleStep.accepts(mv("e2-e4"), &b));
        assert!(!Rule::PawnStep.accepts(mv("e2-e3"), &b));
    }

    #[test]
    fn slides_stop_at_blockers() {
        let b = board("8/8/8/8/p7/8/8/R7");

        assert!(Rule::StraightSlide.accepts(mv("a1-a3"), &b));
        assert!(Rule::StraightSlideCapture.accepts(mv("a1-a4"), &b));
        assert!(!Rule::StraightSlide.accepts(mv("a1-a5"), &b));
        assert!(!Rule::StraightSlideCapture.accepts(mv("a1-a5"), &b));
        assert!(Rule::StraightSlide.accepts(mv("a1-h1"), &b));
        assert!(!Rule::DiagonalSlide.accepts(mv("a1-a3"), &b));
    }

    #[test]
    fn null_moves_and_empty_squares_are_rejected() {
        let b = Board::new();

        assert!(!is_legal(mv("e2-e2"), &b));
        assert!(!is_legal(mv("e4-e5"), &b));
        assert_eq!(moves_for(&b, Square::E4), Err(Error::NoPieceAtSquare(Square::E4)));
        assert_eq!(make_move(&b, mv("e4-e5")), Err(Error::NoPieceAtOrigin(Square::E4)));
    }

    #[test]
    fn same_color_captures_are_rejected() {
        let b = Board::new();

        assert!(!is_legal(mv("a1-a2"), &b));
        assert!(!is_legal(mv("d1-e1"), &b));
        assert!(!is_legal(mv("e1-h1"), &b));
        assert_eq!(make_move(&b, mv("a1-a2")), Err(Error::IllegalMove));
    }

    #[test]
    fn starting_moves() {
        let b = Board::new();
        let engine = RuleEngine::new(&b);

        assert_eq!(engine.all_moves(Color::White).len(), 20);
        assert_eq!(engine.all_moves(Color::Black).len(), 20);
        assert_eq!(destinations(&b, Square::G1), vec![Square::F3, Square::H3]);
        assert!(engine.moves_for(Square::A1).unwrap().is_empty());
    }

    #[test]
    fn knights_jump_over_pieces() {
        let b = board("8/8/8/2PPP3/2PNP3/2PPP3/8/8");

        assert_eq!(destinations(&b, Square::D4), vec![
            Square::B3, Square::B5, Square::C2, Square::C6,
            Square::E2, Square::E6, Square::F3, Square::F5,
        ]);
    }

    #[test]
    fn pinned_pieces_cannot_move() {
        let b = board("4k3/4r3/8/8/8/8/4N3/4K3");

        assert!(moves_for(&b, Square::E2).unwrap().is_empty());
        assert!(is_legal(mv("e1-f1"), &b));
        assert!(is_legal(mv("e1-d1"), &b));
    }

    #[test]
    fn kings_cannot_step_into_attack() {
        let b = board("8/8/8/3k4/8/3K4/8/8");

        assert!(!is_legal(mv("d3-d4"), &b));
        assert!(!is_legal(mv("d3-c4"), &b));
        assert!(is_legal(mv("d3-d2"), &b));
    }

    #[test]
    fn a_check_must_be_resolved() {
        let b = Board::new()
            .clone_with_moves(&[mv("e2-e4"), mv("f7-f5"), mv("d1-h5")])
            .unwrap();

        assert_eq!(RuleEngine::new(&b).all_moves(Color::Black), vec![mv("g7-g6")]);
    }

    #[test]
    fn castling_relocates_king_and_rook() {
        let b = board("4k3/8/8/8/8/8/8/4K2R");
        let after = make_move(&b, mv("e1-h1")).unwrap();

        assert_eq!(after.to_string(), "4k3/8/8/8/8/8/8/5RK1");
        assert_eq!(after.last_move(), Some(mv("e1-h1")));
        assert_eq!(after.last_mover(), Some(Color::White));

        let b = board("4k3/8/8/8/8/8/8/R3K3");
        let after = make_move(&b, mv("e1-a1")).unwrap();

        assert_eq!(after.to_string(), "4k3/8/8/8/8/8/8/2KR4");
    }

    #[test]
    fn castling_is_generated_as_a_king_move() {
        let b = board("4k3/8/8/8/8/8/8/R3K2R");

        assert!(moves_for(&b, Square::E1).unwrap().contains(&mv("e1-h1")));
        assert!(moves_for(&b, Square::E1).unwrap().contains(&mv("e1-a1")));
        assert!(RuleEngine::new(&b).captures_for(Square::E1).unwrap().is_empty());
    }

    #[test]
    fn castling_needs_an_empty_path() {
        let b = board("4k3/8/8/8/8/8/8/4KB1R");

        assert!(!is_legal(mv("e1-h1"), &b));
    }

    #[test]
    fn castling_through_an_attacked_square_is_rejected() {
        assert!(!is_legal(mv("e1-h1"), &board("4kr2/8/8/8/8/8/8/4K2R")));
        assert!(!is_legal(mv("e1-h1"), &board("4k1r1/8/8/8/8/8/8/4K2R")));
        assert!(!is_legal(mv("e1-a1"), &board("1r2k3/8/8/8/8/8/8/R3K3")));
        assert!(!is_legal(mv("e1-a1"), &board("3rk3/8/8/8/8/8/8/R3K3")));
    }

    #[test]
    fn castling_out_of_check_is_rejected() {
        assert!(!is_legal(mv("e1-h1"), &board("4r1k1/8/8/8/8/8/8/4K2R")));
    }

    #[test]
    fn castling_needs_a_rook_three_or_four_files_away() {
        assert!(!is_legal(mv("e1-g1"), &board("4k3/8/8/8/8/8/8/4K1R1")));
        assert!(!is_legal(mv("b1-a1"), &board("4k3/8/8/8/8/8/8/RK6")));
        assert!(is_legal(mv("d1-h1"), &board("4k3/8/8/8/8/8/8/3K3R")));
    }
}
