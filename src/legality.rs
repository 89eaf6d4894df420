use crate::board::{
    Board, FIRST_PAWN_ROW, LAST_PAWN_ROW, LONG_CASTLE_KING, LONG_CASTLE_ROOK, PIECE_BISHOP,
    PIECE_KING, PIECE_KNIGHT, PIECE_NONE, PIECE_PAWN, PIECE_QUEEN, PIECE_ROOK, SHORT_CASTLE_KING,
    SHORT_CASTLE_ROOK,
};
use crate::direction::Pos;

impl Board {
    /// Full legality of a single move for the side to move. Castling is
    /// expressed as the king moving onto its own rook's square.
    pub fn is_legal(&self, from: Pos, to: Pos) -> bool {
        if !from.valid() || !to.valid() || from == to {
            return false;
        }
        let kind = self.kind_at(from);
        if kind == PIECE_NONE || self.color_at(from) != self.white_to_move {
            return false;
        }
        let white = self.white_to_move;
        let king = self.king(white);

        // a pinned piece may only move out along the pin ray
        if kind != PIECE_KING
            && self.is_pinned(from)
            && !from.diff(king).unit().contains_ray(to.diff(from))
        {
            return false;
        }

        let target_kind = self.kind_at(to);
        if target_kind != PIECE_NONE && self.color_at(to) == white {
            return kind == PIECE_KING && target_kind == PIECE_ROOK && self.castle_valid(from, to);
        }

        if !self.step_valid(from, to, kind, target_kind) {
            return false;
        }
        kind == PIECE_KING || self.count_attackers(!white, king, 1, to) == 0
    }

    fn step_valid(&self, from: Pos, to: Pos, kind: u8, target_kind: u8) -> bool {
        match kind {
            PIECE_PAWN => {
                let forward: i8 = if self.white_to_move { 1 } else { -1 };
                if from.col != to.col {
                    (to.col - from.col).abs() == 1
                        && to.row - from.row == forward
                        && (target_kind != PIECE_NONE || self.is_en_passant_square(to))
                } else {
                    let start_row = if self.white_to_move { FIRST_PAWN_ROW } else { LAST_PAWN_ROW };
                    target_kind == PIECE_NONE
                        && (to.row - from.row == forward
                            || (from.row == start_row
                                && to.row - from.row == 2 * forward
                                && self.is_empty(Pos::new(from.row + forward, from.col))))
                }
            }
            PIECE_KNIGHT => (to.row - from.row).abs() * (to.col - from.col).abs() == 2,
            PIECE_BISHOP | PIECE_ROOK | PIECE_QUEEN => {
                let dir = to.diff(from).unit();
                if dir.is_null() || (kind != PIECE_QUEEN && kind != dir.minor_slider_kind()) {
                    return false;
                }
                let mut acc = from.offset(dir);
                while acc != to {
                    if self.kind_at(acc) != PIECE_NONE {
                        return false;
                    }
                    acc = acc.offset(dir);
                }
                true
            }
            PIECE_KING => {
                // besides the target being safe, the king must not step
                // away along the line of a slider already bearing on it
                (to.row - from.row).abs() <= 1
                    && (to.col - from.col).abs() <= 1
                    && self.count_attackers(!self.white_to_move, to, 1, Pos::INVALID) == 0
                    && !self
                        .first_attacker_on_ray(!self.white_to_move, from, from.diff(to))
                        .valid()
            }
            _ => false,
        }
    }

    /// Castling with `from` the king and `to` its own rook. The rook's file
    /// must match a live castling right; the king's path to its target
    /// column must be vacant and unattacked, the rook's path vacant.
    fn castle_valid(&self, from: Pos, to: Pos) -> bool {
        let white = self.white_to_move;
        let row = Board::home_row(white);
        if from.row != row || to.row != row || self.kind_at(from) != PIECE_KING {
            return false;
        }
        let base = Board::cast_base(white);
        if self.castling[base] != Some(to.col) && self.castling[base + 1] != Some(to.col) {
            return false;
        }
        let (king_target, rook_target) = if to.col < from.col {
            (LONG_CASTLE_KING, LONG_CASTLE_ROOK)
        } else {
            (SHORT_CASTLE_KING, SHORT_CASTLE_ROOK)
        };
        self.castle_walk(from, to, row, from.col, king_target, true)
            && self.castle_walk(from, to, row, to.col, rook_target, false)
    }

    fn castle_walk(&self, from: Pos, to: Pos, row: i8, source: i8, target: i8, king: bool) -> bool {
        for col in source.min(target)..=source.max(target) {
            let pos = Pos::new(row, col);
            if pos != from && pos != to && self.kind_at(pos) != PIECE_NONE {
                return false;
            }
            if king && self.count_attackers(!self.white_to_move, pos, 1, Pos::INVALID) > 0 {
                return false;
            }
        }
        true
    }
}
