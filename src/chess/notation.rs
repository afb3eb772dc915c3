//! Coordinate move notation (`e2-e4`)
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
use lazy_static::lazy_static;
use regex::Regex;
use super::*;

lazy_static! {
    static ref MOVE_RE: Regex = Regex::new(r"(?i)^([a-h][1-8])-?([a-h][1-8])$")
        .expect("INFALLIBLE");
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A move from one square to another.
///
/// The move says nothing about which piece moves or whether it is legal; that is decided against
/// a board by the [`rules`](super::rules) module.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
}

impl Move {
    /// Creates a move from `from` to `to`
    pub fn new(from: Square, to: Square) -> Self {
        Move { from, to }
    }

    /// The origin square
    pub fn from(self) -> Square {
        self.from
    }

    /// The destination square
    pub fn to(self) -> Square {
        self.to
    }

    /// Returns the file and rank distances travelled, in that order
    pub fn offset(self) -> (i8, i8) {
        (self.to.file() as i8 - self.from.file() as i8,
         self.to.rank() as i8 - self.from.rank() as i8)
    }

    /// Returns `true` if the move goes nowhere
    pub fn is_null(self) -> bool {
        self.from == self.to
    }
}

impl fmt::Display for Move {
    /// Formats the move as lowercase coordinates separated by a dash (eg `e2-e4`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format!("{}-{}", self.from, self.to).fmt(f)
    }
}

impl FromStr for Move {
    type Err = Error;

    /// Parses `e2-e4` or `e2e4`, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self> {
        let caps = MOVE_RE.captures(s.trim()).ok_or(Error::ParseError)?;

        Ok(Move::new(caps[1].parse()?, caps[2].parse()?))
    }
}
