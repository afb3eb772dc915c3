//! Module for counting and printing the number of variations from a given board
//
//  Copyright 2019 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use crate::chess::*;

/// Print the number of variations of the given `depth` for each legal move of `color` on `board`
pub fn print(board: &Board, color: Color, depth: usize) -> usize {
    if depth < 1 {
        return 1;
    }

    let mut total = 0;

    let engine = RuleEngine::new(board);
    for m in engine.all_moves(color) {
        if let Ok(board) = engine.make(m) {
            let count = count(&board, !color, depth - 1);
            total += count;
            println!("\t{:7}\t{:12}\t{}", m, count, board);
        }
    }

    total
}

/// Count the number of variations of the given `depth` for `color` to move on `board`
pub fn count(board: &Board, color: Color, depth: usize) -> usize {
    if depth < 1 {
        return 1;
    }

    let engine = RuleEngine::new(board);
    let moves = engine.all_moves(color);
    if depth == 1 {
        return moves.len();
    }

    let mut total = 0;

    for m in moves {
        if let Ok(board) = engine.make(m) {
            total += count(&board, !color, depth - 1);
        }
    }

    total
}
