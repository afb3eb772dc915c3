//! Contains a builder for `Board`
//
//  Copyright 2019 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use super::*;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A builder for `Board`
#[derive(Debug, Clone)]
pub struct BoardBuilder {
    board: [ Option<(Color, PieceKind)>; Square::COUNT ],
    turn: Option<Color>,
}

impl BoardBuilder {
    /// Creates a new, empty `BoardBuilder`
    pub fn new() -> Self {
        BoardBuilder {
            board: [ None; Square::COUNT ],
            turn: None,
        }
    }

    /// Sets the piece at `square`
    pub fn piece(&mut self, color: Color, kind: PieceKind, square: Square) -> &mut Self {
        self.board[usize::from(square)] = Some((color, kind));
        self
    }

    /// Clears the piece at `square`
    pub fn clear(&mut self, square: Square) -> &mut Self {
        self.board[usize::from(square)] = None;
        self
    }

    /// Sets the side to move. Without this, the board has no last mover and white moves first.
    pub fn turn(&mut self, color: Color) -> &mut Self {
        self.turn = Some(color);
        self
    }

    /// Validates the piece placement and returns a `Board`
    ///
    /// # Errors
    ///
    /// Returns `InvalidKingCount` if either side has more than one king. A side with no king is
    /// accepted, which is handy for testing individual pieces.
    pub fn validate(&self) -> Result<Board> {
        let mut board = Board::empty();

        for (sq, entry) in Square::all().zip(self.board.iter()) {
            if let Some((color, kind)) = *entry {
                board.place(Piece::new(kind, color), sq);
            }
        }

        for color in [Color::White, Color::Black].iter().copied() {
            if board.pieces(color).filter(|(_, p)| p.kind() == PieceKind::King).count() > 1 {
                return Err(Error::InvalidKingCount);
            }
        }

        board.last_mover = self.turn.map(|turn| !turn);

        Ok(board)
    }
}

impl Default for BoardBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for BoardBuilder {
    type Err = Error;

    /// Parses the piece placement field of a FEN string, optionally followed by the side to move.
    /// Any further FEN fields are ignored.
    fn from_str(s: &str) -> Result<Self> {
        let mut builder = BoardBuilder::new();
        let mut fields = s.split_whitespace();
        let placement = fields.next().ok_or(Error::ParseError)?;

        let mut r = Rank::COUNT;
        for row in placement.split('/') {
            if r == 0 {
                return Err(Error::ParseError);
            }
            r -= 1;

            let mut f = 0;
            for c in row.chars() {
                match c {
                    '1'..='8' => f += c as usize - '0' as usize,
                    _ => {
                        let kind: PieceKind = c.to_string().parse()?;
                        let file = File::try_from(f).map_err(|_| Error::ParseError)?;
                        let sq = Square::from_coord(file, Rank::try_from(r)?);

                        builder.piece(Color::from(c.is_ascii_uppercase()), kind, sq);
                        f += 1;
                    }
                }
                if f > File::COUNT {
                    return Err(Error::ParseError);
                }
            }
            if f != File::COUNT {
                return Err(Error::ParseError);
            }
        }
        if r != 0 {
            return Err(Error::ParseError);
        }

        if let Some(turn) = fields.next() {
            builder.turn(turn.parse()?);
        }

        Ok(builder)
    }
}
