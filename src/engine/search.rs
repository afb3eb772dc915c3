//! Search for the best move
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::convert::TryFrom;
use std::time::{Duration, Instant};
use log::{debug, trace, warn};
use crate::cache::Cache;
use crate::chess::{Board, Color, Move, RuleEngine};
use super::{Engine, Score, SearchMode};

const NO_MOVE: &str = "none";

impl<C> Engine<C> where C: Cache {
    /// Searches `board` for `color`'s best move, looking `depth` replies ahead.
    ///
    /// Pieces are tried in board-scan order and each piece's moves in generation order; the first
    /// of several equally good moves wins. Before each piece, the time spent so far is compared
    /// with `budget / (depth + 1)`, and once it is exceeded the best move found so far is
    /// returned. The search never stops before it has a move, so `None` means `color` has no
    /// legal move.
    ///
    /// Results are memoized by content hash, color, depth and search mode.
    pub fn best_move(&mut self, board: &Board, color: Color, depth: usize, budget: Duration)
    -> Option<Move> {
        let key = format!("bestMove_{}_{}_{}_{}", board.content_hash(), color, depth, self.mode);

        match self.cache.get(&key) {
            Some(ref val) if val == NO_MOVE => {
                trace!("cache hit: {} = {}", key, val);
                return None;
            },
            Some(val) => match val.parse() {
                Ok(mv) => {
                    trace!("cache hit: {} = {}", key, val);
                    return Some(mv);
                },
                Err(_) => warn!("ignoring malformed cache value: {} = {:?}", key, val),
            },
            None => { },
        }

        let best = self.search(board, color, depth, budget);

        let val = best.map_or(NO_MOVE.to_owned(), |mv| mv.to_string());
        self.cache.set(&key, &val);

        best
    }

    fn search(&mut self, board: &Board, color: Color, depth: usize, budget: Duration)
    -> Option<Move> {
        let start = Instant::now();
        let limit = budget / u32::try_from(depth).unwrap_or(u32::MAX).saturating_add(1);
        let rules = RuleEngine::new(board);
        let mut best: Option<(Score, Move)> = None;

        for (square, _) in board.pieces(color) {
            if best.is_some() && start.elapsed() > limit {
                debug!("time is up for {} at depth {} after {:?}", color, depth, start.elapsed());
                break;
            }

            for mv in rules.moves_for(square).expect("INFALLIBLE") {
                let after = rules.make(mv).expect("INFALLIBLE");
                let score = match self.mode {
                    SearchMode::Lookahead => self.lookahead(&after, color, depth, budget),
                    SearchMode::Negamax => -self.negamax(&after, !color, depth),
                };

                if best.map_or(true, |(val, _)| score > val) {
                    debug!("best move for {} at depth {}: {} ({})", color, depth, mv, score);
                    best = Some((score, mv));
                }
            }
        }

        best.map(|(_, mv)| mv)
    }

    /// Scores `after` for `color`, then adds the score of the position after the opponent's best
    /// reply.
    fn lookahead(&mut self, after: &Board, color: Color, depth: usize, budget: Duration)
    -> Score {
        let mut score = self.evaluate_for(after, color);

        if depth > 0 {
            match self.best_move(after, !color, depth - 1, budget) {
                Some(reply) => {
                    let replied = RuleEngine::new(after).make(reply).expect("INFALLIBLE");
                    score += self.evaluate_for(&replied, color);
                },
                None if after.in_check(!color) => score += Score::mate(),
                None => score += self.evaluate_for(after, color),
            }
        }

        score
    }

    /// Returns the negamax score of `board` for `color` to move.
    fn negamax(&mut self, board: &Board, color: Color, depth: usize) -> Score {
        if depth == 0 {
            return self.evaluate_for(board, color);
        }

        let key = format!("negamax_{}_{}_{}", board.content_hash(), color, depth);
        if let Some(val) = self.cache.get(&key).and_then(|v| v.parse::<i32>().ok()) {
            trace!("cache hit: {}", key);
            return Score::from(val);
        }

        let rules = RuleEngine::new(board);
        let mut best: Option<Score> = None;

        for mv in rules.all_moves(color) {
            let after = rules.make(mv).expect("INFALLIBLE");
            let score = -self.negamax(&after, !color, depth - 1);

            if best.map_or(true, |val| score > val) {
                best = Some(score);
            }
        }

        let score = match best {
            Some(score) => score,
            None if board.in_check(color) => -Score::mate(),
            None => Score::draw(),
        };
        self.cache.set(&key, &i32::from(score).to_string());

        score
    }
}

#[cfg(test)]
mod tests {
    use crate::cache::Cache;
    use crate::chess::{Board, Color, Move, Square};
    use crate::engine::{Engine, SearchMode};
    use std::time::Duration;

    const BUDGET: Duration = Duration::from_secs(60);

    #[test]
    fn cache_key_includes_color_depth_and_mode() {
        let mut engine = Engine::in_memory();
        let board = Board::new();

        let mv = engine.best_move(&board, Color::White, 0, BUDGET).unwrap();
        let key = format!("bestMove_{}_w_0_lookahead", board.content_hash());
        assert_eq!(engine.cache().get(&key), Some(mv.to_string()));

        let mut engine = Engine::new(engine.into_cache()).with_mode(SearchMode::Negamax);
        let mv = engine.best_move(&board, Color::White, 0, BUDGET).unwrap();
        let key = format!("bestMove_{}_w_0_negamax", board.content_hash());
        assert_eq!(engine.cache().get(&key), Some(mv.to_string()));
    }

    #[test]
    fn cached_moves_are_returned() {
        let mut engine = Engine::in_memory();
        let board = Board::new();
        let key = format!("bestMove_{}_w_2_lookahead", board.content_hash());

        engine.cache_mut().set(&key, "a2-a3");
        assert_eq!(
            engine.best_move(&board, Color::White, 2, BUDGET),
            Some(Move::new(Square::A2, Square::A3))
        );
        assert_eq!(engine.nodes(), 0);
    }

    #[test]
    fn cached_none_is_returned() {
        let mut engine = Engine::in_memory();
        let board = Board::new();

        engine.cache_mut().set(&format!("bestMove_{}_b_0_lookahead", board.content_hash()), "none");
        assert_eq!(engine.best_move(&board, Color::Black, 0, BUDGET), None);
    }

    #[test]
    fn malformed_cache_value_is_a_miss() {
        let mut engine = Engine::in_memory();
        let board = Board::new();
        let key = format!("bestMove_{}_w_0_lookahead", board.content_hash());

        engine.cache_mut().set(&key, "e2-e9");
        let mv = engine.best_move(&board, Color::White, 0, BUDGET).unwrap();
        assert_eq!(engine.cache().get(&key), Some(mv.to_string()));
    }

    #[test]
    fn stalemate_and_checkmate_have_no_move() {
        let stalemate: Board = "7k/5Q2/6K1/8/8/8/8/8".parse().unwrap();
        let mate: Board = "7k/6Q1/6K1/8/8/8/8/8".parse().unwrap();

        for &mode in &[SearchMode::Lookahead, SearchMode::Negamax] {
            let mut engine = Engine::in_memory().with_mode(mode);

            assert_eq!(engine.best_move(&stalemate, Color::Black, 1, BUDGET), None);
            assert_eq!(engine.best_move(&mate, Color::Black, 1, BUDGET), None);
        }
    }

    #[test]
    fn huge_depth_does_not_overflow_the_time_limit() {
        let stalemate: Board = "7k/5Q2/6K1/8/8/8/8/8".parse().unwrap();
        let mut engine = Engine::in_memory();

        assert_eq!(engine.best_move(&stalemate, Color::Black, usize::MAX, BUDGET), None);
        assert_eq!(engine.best_move(&stalemate, Color::Black, u32::MAX as usize, BUDGET), None);
    }

    #[test]
    fn negamax_finds_mate_in_one() {
        let board: Board = "7k/8/6K1/8/8/8/8/1Q6".parse().unwrap();
        let mut engine = Engine::in_memory().with_mode(SearchMode::Negamax);

        assert_eq!(
            engine.best_move(&board, Color::White, 1, BUDGET),
            Some(Move::new(Square::B1, Square::B8))
        );
    }
}
