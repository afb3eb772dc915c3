//! Defines the error types needed by the chess module
//
//  Copyright 2019 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;
use super::Square;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Error type used by methods in the `chess` module
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Error {
    /// Cannot parse string
    ParseError,
    /// Failed to convert an integer to an another type
    TryFromIntError,
    /// A move was applied from an empty square
    NoPieceAtOrigin(Square),
    /// Moves were requested for an empty square
    NoPieceAtSquare(Square),
    /// Illegal move
    IllegalMove,
    /// The piece being moved does not belong to the side to move
    WrongTurn,
    /// Multiple kings of the same color
    InvalidKingCount,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Error::*;

        match self {
            ParseError => "cannot parse string".fmt(f),
            TryFromIntError => "integer out of range".fmt(f),
            NoPieceAtOrigin(sq) => write!(f, "no piece to move at {}", sq),
            NoPieceAtSquare(sq) => write!(f, "no piece at {}", sq),
            IllegalMove => "illegal move".fmt(f),
            WrongTurn => "not that side's turn to move".fmt(f),
            InvalidKingCount => "multiple kings of the same color".fmt(f),
        }
    }
}

impl std::error::Error for Error { }

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Result type used by methods in the `chess` module
pub type Result<T> = std::result::Result<T, Error>;
