//! Tests the engine's move search
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::sync::{Arc, Mutex};
use std::time::Duration;
use timfish::cache::MemoryCache;
use timfish::chess::{Board, Color, Move, Square};
use timfish::chess::rules::{is_legal, moves_for};
use timfish::engine::{Engine, SearchMode};

const BUDGET: Duration = Duration::from_secs(60);
const MODES: [SearchMode; 2] = [SearchMode::Lookahead, SearchMode::Negamax];

fn board(s: &str) -> Board {
    s.parse().unwrap()
}

#[test]
fn default_search_mode_is_single_line_lookahead() {
    // the opponent's reply is scored on its own terms, not negated
    assert_eq!(Engine::in_memory().mode(), SearchMode::Lookahead);
}

#[test]
fn modes_disagree_with_one_reply() {
    let board = board("4k3/8/8/3p4/4P3/8/8/4K2R");
    let lookahead = Engine::in_memory().best_move(&board, Color::White, 1, BUDGET);
    let negamax = Engine::in_memory()
        .with_mode(SearchMode::Negamax)
        .best_move(&board, Color::White, 1, BUDGET);

    assert_eq!(lookahead, Some(Move::new(Square::E1, Square::E2)));
    assert_eq!(negamax, Some(Move::new(Square::H1, Square::H8)));
}

#[test]
fn modes_agree_without_lookahead() {
    let board = Board::new();
    let lookahead = Engine::in_memory().best_move(&board, Color::White, 0, BUDGET);
    let negamax = Engine::in_memory()
        .with_mode(SearchMode::Negamax)
        .best_move(&board, Color::White, 0, BUDGET);

    assert!(lookahead.is_some());
    assert_eq!(lookahead, negamax);
}

#[test]
fn depth_zero_moves_are_legal() {
    let positions = [
        Board::new(),
        board("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b"),
        board("r3k2r/8/8/8/8/8/8/R3K2R"),
        board("r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR"),
    ];

    for board in positions.iter() {
        for &color in &[Color::White, Color::Black] {
            let mv = Engine::in_memory().best_move(board, color, 0, BUDGET).unwrap();

            assert!(is_legal(mv, board), "{} is illegal on {}", mv, board);
            assert_eq!(board.piece_at(mv.from()).map(|p| p.color()), Some(color));
        }
    }
}

#[test]
fn no_move_only_without_legal_moves() {
    let stalemate = board("7k/5Q2/6K1/8/8/8/8/8");

    for &mode in MODES.iter() {
        let mut engine = Engine::in_memory().with_mode(mode);

        assert_eq!(engine.best_move(&stalemate, Color::Black, 0, BUDGET), None);
        assert!(engine.best_move(&stalemate, Color::White, 0, BUDGET).is_some());
    }
}

#[test]
fn captures_a_hanging_queen() {
    let board = board("q6k/8/8/8/8/8/7K/R7");

    for &mode in MODES.iter() {
        for depth in 0 ..= 1 {
            let mut engine = Engine::in_memory().with_mode(mode);

            assert_eq!(
                engine.best_move(&board, Color::White, depth, BUDGET),
                Some(Move::new(Square::A1, Square::A8)),
                "{} at depth {}", mode, depth
            );
        }
    }
}

#[test]
fn zero_budget_still_finds_a_move() {
    let board = Board::new();
    let mut engine = Engine::in_memory();
    let mv = engine.best_move(&board, Color::White, 2, Duration::from_secs(0)).unwrap();

    assert!(is_legal(mv, &board));
}

#[test]
fn zero_budget_stops_after_the_first_piece() {
    let board = Board::new();
    let hurried = Engine::in_memory().best_move(&board, Color::White, 0, Duration::from_secs(0));
    let full = Engine::in_memory().best_move(&board, Color::White, 0, BUDGET);

    // a1 has no moves, so a2 is the only piece searched
    assert_eq!(hurried, Some(Move::new(Square::A2, Square::A4)));
    assert_eq!(full, Some(Move::new(Square::E2, Square::E3)));
}

#[test]
fn ties_keep_the_first_move() {
    // kings have no mobility, so every king move scores the same
    let board = board("7k/8/8/8/8/8/8/K7");
    let moves = moves_for(&board, Square::A1).unwrap();
    assert_eq!(moves.len(), 3);

    for &mode in MODES.iter() {
        let mut engine = Engine::in_memory().with_mode(mode);

        assert_eq!(engine.best_move(&board, Color::White, 0, BUDGET), Some(moves[0]), "{}", mode);
    }
}

#[test]
fn shared_cache_answers_the_second_engine() {
    let cache = Arc::new(Mutex::new(MemoryCache::new()));
    let board = Board::new();

    let mut first = Engine::new(Arc::clone(&cache));
    let mv = first.best_move(&board, Color::White, 1, BUDGET);
    assert!(first.nodes() > 0);

    let mut second = Engine::new(Arc::clone(&cache));
    assert_eq!(second.best_move(&board, Color::White, 1, BUDGET), mv);
    assert_eq!(second.nodes(), 0);
}

#[test]
fn shared_cache_keeps_modes_apart() {
    let cache = Arc::new(Mutex::new(MemoryCache::new()));
    let board = board("4k3/8/8/3p4/4P3/8/8/4K2R");

    let mut lookahead = Engine::new(Arc::clone(&cache));
    assert_eq!(
        lookahead.best_move(&board, Color::White, 1, BUDGET),
        Some(Move::new(Square::E1, Square::E2))
    );

    let mut negamax = Engine::new(Arc::clone(&cache)).with_mode(SearchMode::Negamax);
    assert_eq!(
        negamax.best_move(&board, Color::White, 1, BUDGET),
        Some(Move::new(Square::H1, Square::H8))
    );
}
