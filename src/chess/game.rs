//! Module to implement a chess game
//
//  Copyright 2019 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::str::FromStr;
use log::debug;
use super::*;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A chess game: a board plus the moves that led to it, with strict alternation of turns.
///
/// The rule engine answers whether a piece may make a move regardless of whose turn it is. `Game`
/// is where turns are enforced: the side to move is the opposite of whoever moved last, and white
/// moves first.
#[derive(Debug, Clone)]
pub struct Game {
    initial: Board,
    board: Board,
    history: Vec<Move>,
}

impl Game {
    /// Creates a new game from the standard starting position
    pub fn new() -> Self {
        Game::starting_at(Board::new())
    }

    /// Creates a new game using `board` as the starting position
    pub fn starting_at(board: Board) -> Self {
        Game {
            initial: board.clone(),
            board,
            history: Vec::new(),
        }
    }

    /// Returns the current board
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the moves played so far
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Returns the side to move
    pub fn turn(&self) -> Color {
        self.board.turn()
    }

    /// Returns `true` if the side to move is in check
    pub fn in_check(&self) -> bool {
        self.board.in_check(self.turn())
    }

    /// Returns `true` if the side to move has any legal move
    pub fn can_move(&self) -> bool {
        RuleEngine::new(&self.board).has_moves(self.turn())
    }

    /// Make the given move
    ///
    /// # Errors
    ///
    /// Returns `NoPieceAtOrigin` if the origin is empty, `WrongTurn` if the piece belongs to the
    /// side that just moved, and `IllegalMove` if the rules don't allow the move.
    pub fn play(&mut self, mv: Move) -> Result<&mut Self> {
        let piece = self.board.piece_at(mv.from()).ok_or(Error::NoPieceAtOrigin(mv.from()))?;

        if piece.color() != self.turn() {
            return Err(Error::WrongTurn);
        }

        self.board = RuleEngine::new(&self.board).make(mv)?;
        self.history.push(mv);
        debug!("played {} ({} moves)", mv, self.history.len());

        Ok(self)
    }

    /// Parses and makes the given move
    pub fn play_str(&mut self, mv: &str) -> Result<&mut Self> {
        let mv = self.parse_move(mv)?;

        self.play(mv)
    }

    /// Parses a move for the side to move.
    ///
    /// Accepts coordinate notation (`e2-e4`, `e2e4`) and castling as `O-O` or `O-O-O` (also with
    /// zeros, in any case). Castling is written as the king moving onto its rook.
    pub fn parse_move(&self, s: &str) -> Result<Move> {
        let file = match s.trim().to_ascii_lowercase().as_str() {
            "o-o" | "0-0" => File::H,
            "o-o-o" | "0-0-0" => File::A,
            _ => return s.parse(),
        };
        let king = self.board.king_square(self.turn()).ok_or(Error::IllegalMove)?;

        Ok(Move::new(king, Square::from_coord(file, king.rank())))
    }

    /// Undoes the last move. Returns false if there are no moves to undo.
    pub fn undo(&mut self) -> bool {
        if self.history.pop().is_none() {
            return false;
        }

        let mut board = self.initial.clone();
        for mv in self.history.iter() {
            board = RuleEngine::new(&board).make(*mv).expect("INFALLIBLE");
        }
        self.board = board;

        true
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

impl FromStr for Game {
    type Err = Error;

    /// Plays a whitespace separated list of moves from the starting position
    fn from_str(s: &str) -> Result<Self> {
        let mut game = Game::new();

        for mv in s.split_whitespace() {
            game.play_str(mv)?;
        }

        Ok(game)
    }
}
