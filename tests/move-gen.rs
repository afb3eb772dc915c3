//! Tests the move generator (chess module)
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////

mod move_gen {
    use timfish::chess::{variations, Board, Color};

    mod starting_position {
        use super::*;

        #[test]
        fn depth_1() {
            assert_eq!(variations::count(&Board::new(), Color::White, 1), 20);
        }

        #[test]
        fn depth_2() {
            assert_eq!(variations::count(&Board::new(), Color::White, 2), 400);
        }

        #[test]
        fn depth_3() {
            assert_eq!(variations::count(&Board::new(), Color::White, 3), 8902);
        }
    }

    #[test]
    fn black_to_move_after_e4() {
        let board: Board = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b".parse().unwrap();

        assert_eq!(variations::count(&board, board.turn(), 1), 20);
    }

    #[test]
    fn kings_and_rooks() {
        // 5 king steps, both castling moves, then 10 and 9 rook moves
        let board: Board = "r3k2r/8/8/8/8/8/8/R3K2R".parse().unwrap();

        assert_eq!(variations::count(&board, Color::White, 1), 26);
    }
}
