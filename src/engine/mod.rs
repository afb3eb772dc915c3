//! The engine
//
//  Copyright 2019 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;
use std::str::FromStr;
use log::trace;
use serde::{Deserialize, Serialize};
use crate::cache::{Cache, MemoryCache};
use crate::chess::{Board, Color};
use crate::chess::error::{Error, Result};

pub mod eval;
mod search;
pub use eval::{Score, evaluate, evaluate_for, evaluate_relative};

////////////////////////////////////////////////////////////////////////////////////////////////////
/// How the engine scores the opponent's replies
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Each candidate is scored for the mover after the candidate, plus once more after the
    /// opponent's best reply, found the same way. Scores are never negated, so the opponent's
    /// reply is the one that is best for the opponent on the opponent's own terms.
    Lookahead,
    /// True negamax: each side maximizes the negation of the other side's best score.
    Negamax,
}

impl Default for SearchMode {
    fn default() -> Self {
        SearchMode::Lookahead
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchMode::Lookahead => "lookahead",
            SearchMode::Negamax => "negamax",
        };

        name.fmt(f)
    }
}

impl FromStr for SearchMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lookahead" => Ok(SearchMode::Lookahead),
            "negamax" => Ok(SearchMode::Negamax),
            _ => Err(Error::ParseError),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// The engine: searches for the best move, memoizing its results in a cache
#[derive(Debug)]
pub struct Engine<C> where C: Cache {
    cache: C,
    mode: SearchMode,
    nodes: u64,
}

impl Engine<MemoryCache> {
    /// Creates an engine with an empty in-memory cache
    pub fn in_memory() -> Self {
        Engine::new(MemoryCache::new())
    }
}

impl<C> Engine<C> where C: Cache {
    /// Creates a new Engine using `cache`.
    pub fn new(cache: C) -> Self {
        Engine {
            cache,
            mode: SearchMode::default(),
            nodes: 0,
        }
    }

    /// Sets the search mode.
    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Returns the search mode.
    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    /// Returns the cache.
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Returns the cache for modification.
    pub fn cache_mut(&mut self) -> &mut C {
        &mut self.cache
    }

    /// Consumes the engine, returning its cache.
    pub fn into_cache(self) -> C {
        self.cache
    }

    /// Returns the number of positions evaluated, including cache hits.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Returns white's score less black's score, memoized by the board's content hash.
    pub fn evaluate(&mut self, board: &Board) -> Score {
        let key = format!("eval_{}", board.content_hash());
        self.nodes += 1;

        if let Some(val) = self.cache.get(&key).and_then(|v| v.parse::<i32>().ok()) {
            trace!("cache hit: {}", key);
            return Score::from(val);
        }

        let score = evaluate_relative(board);
        self.cache.set(&key, &i32::from(score).to_string());

        score
    }

    /// Returns the memoized evaluation from `color`'s point of view.
    pub fn evaluate_for(&mut self, board: &Board, color: Color) -> Score {
        match color {
            Color::White => self.evaluate(board),
            Color::Black => -self.evaluate(board),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluation_is_memoized() {
        let mut engine = Engine::in_memory();
        let board: Board = "k7/8/8/8/8/8/8/KQ6".parse().unwrap();
        let key = format!("eval_{}", board.content_hash());

        let score = engine.evaluate(&board);
        assert_eq!(score, evaluate_relative(&board));
        assert_eq!(engine.cache().get(&key), Some(i32::from(score).to_string()));

        engine.cache_mut().set(&key, "42");
        assert_eq!(engine.evaluate(&board), Score::from(42));
        assert_eq!(engine.evaluate_for(&board, Color::Black), Score::from(-42));
        assert_eq!(engine.nodes(), 3);
    }

    #[test]
    fn unreadable_evaluation_is_recomputed() {
        let mut engine = Engine::in_memory();
        let board = Board::new();

        engine.cache_mut().set(&format!("eval_{}", board.content_hash()), "garbage");
        assert_eq!(engine.evaluate(&board), Score::draw());
    }

    #[test]
    fn search_mode_names() {
        assert_eq!(SearchMode::default(), SearchMode::Lookahead);
        assert_eq!("Negamax".parse::<SearchMode>(), Ok(SearchMode::Negamax));
        assert_eq!(SearchMode::Lookahead.to_string(), "lookahead");
        assert!("minimax".parse::<SearchMode>().is_err());
    }
}
