use crate::board::{
    Board, LONG_CASTLE_KING, LONG_CASTLE_ROOK, PIECE_KING, PIECE_NONE, PIECE_PAWN, PIECE_ROOK,
    SHORT_CASTLE_KING, SHORT_CASTLE_ROOK,
};
use crate::direction::Pos;

impl Board {
    /// Legality-gated move application. Rejects promotion targets that no
    /// pawn may become; `promote_to` is ignored for non-promoting moves.
    pub fn make_move(&mut self, from: Pos, to: Pos, promote_to: u8) -> bool {
        if matches!(promote_to, PIECE_NONE | PIECE_PAWN | PIECE_KING) {
            return false;
        }
        if !self.is_legal(from, to) {
            return false;
        }
        self.apply_move(from, to, promote_to);
        true
    }

    /// Applies a move that `is_legal` has already admitted. Castling rights
    /// are downgraded before any square changes; the en-passant column and
    /// the side to move are updated last.
    pub fn apply_move(&mut self, from: Pos, to: Pos, promote_to: u8) {
        let kind = self.kind_at(from);
        let white = self.color_at(from);
        let target_kind = self.kind_at(to);
        let target_white = self.color_at(to);

        let base = Board::cast_base(white);
        if kind == PIECE_KING {
            self.castling[base] = None;
            self.castling[base + 1] = None;
        } else if kind == PIECE_ROOK {
            for i in base..base + 2 {
                if self.cast_pos(i) == Some(from) {
                    self.castling[i] = None;
                }
            }
        }
        // capturing a rook on its home square spends the right it carried
        if target_kind == PIECE_ROOK && target_white != white {
            let enemy_base = Board::cast_base(!white);
            for i in enemy_base..enemy_base + 2 {
                if self.cast_pos(i) == Some(to) {
                    self.castling[i] = None;
                }
            }
        }

        let castling = kind == PIECE_KING && target_kind == PIECE_ROOK && target_white == white;
        let ep_capture = kind == PIECE_PAWN && self.is_en_passant_square(to);
        if castling {
            self.clear_square(from);
            self.clear_square(to);
            let (king_col, rook_col) = if to.col < from.col {
                (LONG_CASTLE_KING, LONG_CASTLE_ROOK)
            } else {
                (SHORT_CASTLE_KING, SHORT_CASTLE_ROOK)
            };
            self.set(Pos::new(from.row, king_col), white, PIECE_KING);
            self.set(Pos::new(from.row, rook_col), white, PIECE_ROOK);
        } else {
            let promoting = kind == PIECE_PAWN && to.row == Board::home_row(!white);
            self.clear_square(from);
            self.set(to, white, if promoting { promote_to } else { kind });
            if ep_capture {
                self.clear_square(to.toward_center());
            }
        }

        if kind == PIECE_PAWN || (target_kind != PIECE_NONE && !castling) {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if !self.white_to_move {
            self.fullmove_counter += 1;
        }
        self.white_to_move = !self.white_to_move;
        self.en_passant = if kind == PIECE_PAWN && (to.row - from.row).abs() == 2 {
            Some(to.col)
        } else {
            None
        };
    }
}

#[cfg(test)]
mod moves_tests {
    use super::*;
    use crate::board::{PIECE_QUEEN, WHITE};

    fn pos(name: &str) -> Pos {
        let bytes = name.as_bytes();
        Pos::new((bytes[1] - b'1') as i8, (bytes[0] - b'a') as i8)
    }

    #[test]
    pub fn double_step_sets_en_passant_column() {
        let mut board = Board::initial();
        assert!(board.make_move(pos("e2"), pos("e4"), PIECE_QUEEN));
        assert!(board.valid());
        assert_eq!(board.en_passant, Some(4));
        assert!(!board.white_to_move);
        assert_eq!(board.fullmove_counter, 1);
        assert_eq!(board.halfmove_clock, 0);

        assert!(board.make_move(pos("g8"), pos("f6"), PIECE_QUEEN));
        assert_eq!(board.en_passant, None);
        assert_eq!(board.fullmove_counter, 2);
        assert_eq!(board.halfmove_clock, 1);
    }

    #[test]
    pub fn capture_resets_halfmove_clock() {
        let mut board =
            Board::from_fen("rnbqkbnr/pppp1ppp/8/4p3/3P4/8/PPP1PPPP/RNBQKBNR w AHah e 5 3").unwrap();
        assert!(board.make_move(pos("d4"), pos("e5"), PIECE_QUEEN));
        assert_eq!(board.halfmove_clock, 0);
        assert_eq!(board.kind_at(pos("e5")), PIECE_PAWN);
        assert!(board.color_at(pos("e5")));
    }

    #[test]
    pub fn quiet_piece_move_increments_clock() {
        let mut board = Board::initial();
        assert!(board.make_move(pos("g1"), pos("f3"), PIECE_QUEEN));
        assert_eq!(board.halfmove_clock, 1);
        assert_eq!(board.en_passant, None);
    }

    #[test]
    pub fn en_passant_capture_removes_passed_pawn() {
        let mut board =
            Board::from_fen("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w AHah d6 0 3").unwrap();
        assert!(board.make_move(pos("e5"), pos("d6"), PIECE_QUEEN));
        assert!(board.valid());
        assert_eq!(board.kind_at(pos("d6")), PIECE_PAWN);
        assert!(board.color_at(pos("d6")));
        assert!(board.is_empty(pos("d5")));
        assert!(board.is_empty(pos("e5")));
        assert_eq!(board.en_passant, None);
        assert_eq!(board.halfmove_clock, 0);
    }

    #[test]
    pub fn short_castle_places_king_and_rook() {
        let mut board =
            Board::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w AHah - 0 1").unwrap();
        assert!(board.make_move(pos("e1"), pos("h1"), PIECE_QUEEN));
        assert!(board.valid());
        assert_eq!(board.kind_at(pos("g1")), PIECE_KING);
        assert_eq!(board.kind_at(pos("f1")), PIECE_ROOK);
        assert!(board.is_empty(pos("e1")));
        assert!(board.is_empty(pos("h1")));
        assert_eq!(board.king(WHITE), pos("g1"));
        assert_eq!(board.castling, [None, None, Some(0), Some(7)]);
        // castling captures nothing, the clock keeps counting
        assert_eq!(board.halfmove_clock, 1);
    }

    #[test]
    pub fn long_castle_places_king_and_rook() {
        let mut board =
            Board::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R b AHah - 0 1").unwrap();
        assert!(board.make_move(pos("e8"), pos("a8"), PIECE_QUEEN));
        assert!(board.valid());
        assert_eq!(board.kind_at(pos("c8")), PIECE_KING);
        assert_eq!(board.kind_at(pos("d8")), PIECE_ROOK);
        assert!(board.is_empty(pos("e8")));
        assert!(board.is_empty(pos("a8")));
        assert_eq!(board.castling, [Some(0), Some(7), None, None]);
        assert_eq!(board.fullmove_counter, 2);
    }

    #[test]
    pub fn king_move_spends_both_rights() {
        let mut board =
            Board::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w AHah - 0 1").unwrap();
        assert!(board.make_move(pos("e1"), pos("f1"), PIECE_QUEEN));
        assert_eq!(board.castling, [None, None, Some(0), Some(7)]);
    }

    #[test]
    pub fn rook_move_spends_its_own_right() {
        let mut board =
            Board::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w AHah - 0 1").unwrap();
        assert!(board.make_move(pos("a1"), pos("b1"), PIECE_QUEEN));
        assert_eq!(board.castling, [None, Some(7), Some(0), Some(7)]);
    }

    #[test]
    pub fn capturing_a_castling_rook_spends_the_victims_right() {
        let mut board =
            Board::from_fen("r3k2r/pppppppp/1N6/8/8/8/PPPPPPPP/R3K2R w AHah - 0 1").unwrap();
        assert!(board.make_move(pos("b6"), pos("a8"), PIECE_QUEEN));
        assert!(board.valid());
        assert_eq!(board.castling, [Some(0), Some(7), None, Some(7)]);
    }

    #[test]
    pub fn promotion_rewrites_the_pawn() {
        let mut board = Board::from_fen("4k3/1P6/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(board.make_move(pos("b7"), pos("b8"), PIECE_QUEEN));
        assert!(board.valid());
        assert_eq!(board.kind_at(pos("b8")), PIECE_QUEEN);
        assert!(board.color_at(pos("b8")));

        let mut board = Board::from_fen("4k3/1P6/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(board.make_move(pos("b7"), pos("b8"), PIECE_ROOK));
        assert_eq!(board.kind_at(pos("b8")), PIECE_ROOK);
    }

    #[test]
    pub fn promotion_to_pawn_or_king_is_rejected() {
        let mut board = Board::from_fen("4k3/1P6/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(!board.make_move(pos("b7"), pos("b8"), PIECE_PAWN));
        assert!(!board.make_move(pos("b7"), pos("b8"), PIECE_KING));
        assert!(!board.make_move(pos("b7"), pos("b8"), PIECE_NONE));
        assert!(board.is_empty(pos("b8")));
    }

    #[test]
    pub fn illegal_moves_leave_the_board_untouched() {
        let mut board = Board::initial();
        let before = board.clone();
        assert!(!board.make_move(pos("e2"), pos("e5"), PIECE_QUEEN));
        assert!(!board.make_move(pos("b1"), pos("b3"), PIECE_QUEEN));
        assert_eq!(board, before);
    }

    #[test]
    pub fn legal_moves_always_yield_valid_flipped_positions() {
        let fens = [
            crate::STARTING_FEN,
            "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w AHah - 0 1",
            "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R b AHah - 0 1",
            "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w AHah d6 0 3",
            "4k3/1P6/8/8/8/8/8/4K3 w - - 0 1",
            "r1bqkbnr/pppp1ppp/2n5/1B2p3/4P3/5N2/PPPP1PPP/RNBQK2R b AHah - 3 3",
            "4k3/8/8/8/r6K/8/4P3/8 w - - 0 1",
            "r3k2r/pppppppp/1N6/8/8/8/PPPPPPPP/R3K2R w AHah - 0 1",
        ];
        for fen in fens {
            let board = Board::from_fen(fen).unwrap();
            for from_row in 0..8 {
                for from_col in 0..8 {
                    for to_row in 0..8 {
                        for to_col in 0..8 {
                            let from = Pos::new(from_row, from_col);
                            let to = Pos::new(to_row, to_col);
                            if !board.is_legal(from, to) {
                                continue;
                            }
                            let mut next = board.clone();
                            next.apply_move(from, to, PIECE_QUEEN);
                            assert!(next.valid(), "{fen}: {from} -> {to}");
                            assert_ne!(next.white_to_move, board.white_to_move);
                        }
                    }
                }
            }
        }
    }

    #[test]
    pub fn legal_moves_preserve_validity() {
        let mut board = Board::initial();
        for (from, to) in [("e2", "e4"), ("e7", "e5"), ("g1", "f3"), ("b8", "c6"), ("f1", "b5"), ("a7", "a6")] {
            assert!(board.make_move(pos(from), pos(to), PIECE_QUEEN), "{from}{to}");
            assert!(board.valid(), "after {from}{to}");
        }
        assert!(board.white_to_move);
        assert_eq!(board.fullmove_counter, 4);
        assert_eq!(board.castling, [Some(0), Some(7), Some(0), Some(7)]);
        assert_eq!(board.en_passant, None);
        // a6 is a pawn move, the clock restarts with it
        assert_eq!(board.halfmove_clock, 0);
    }
}
