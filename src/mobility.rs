use arrayvec::ArrayVec;

use crate::board::{
    Board, PIECE_BISHOP, PIECE_KING, PIECE_KNIGHT, PIECE_NONE, PIECE_PAWN, PIECE_QUEEN, PIECE_ROOK,
};
use crate::direction::{Dir, Pos, DIRS, KNIGHT_STEP};

pub const MAX_MOBILE_PAWNS: usize = 8;
pub const MAX_MOBILE_PIECES: usize = 16;

/// Squares of the side to move holding a piece with at least one legal
/// reply, pawns kept apart from the rest. Bounded and heap-free; a full
/// list stops accepting entries.
#[derive(Default, Debug, PartialEq, Eq)]
pub struct MobilityList {
    pub pawns: ArrayVec<Pos, MAX_MOBILE_PAWNS>,
    pub pieces: ArrayVec<Pos, MAX_MOBILE_PIECES>,
}

pub fn format_positions(list: &[Pos]) -> String {
    let mut out = String::from("{");
    for (i, pos) in list.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&pos.to_string());
    }
    out.push('}');
    out
}

impl Board {
    /// Enumerates the mobile pieces of the side to move. A position failing
    /// the heavy validity check yields empty lists. Under double check only
    /// the king is examined; under single check the per-piece tests shrink
    /// to capturing the checker or blocking its line.
    pub fn mobile_pieces(&self) -> MobilityList {
        let mut list = MobilityList::default();
        if !self.valid() {
            return list;
        }
        let white = self.white_to_move;
        let (checks, checker) = self.find_checkers(white);

        if checks >= 2 {
            // only the king can answer a double check
            let king = self.king(white);
            if self.is_mobile(king, PIECE_KING, checks, checker) {
                list.pieces.push(king);
            }
            return list;
        }

        for row in 0..8 {
            for col in 0..8 {
                let pos = Pos::new(row, col);
                let kind = self.kind_at(pos);
                if kind == PIECE_NONE || self.color_at(pos) != white {
                    continue;
                }
                if !self.is_mobile(pos, kind, checks, checker) {
                    continue;
                }
                if kind == PIECE_PAWN {
                    if !list.pawns.is_full() {
                        list.pawns.push(pos);
                    }
                } else if !list.pieces.is_full() {
                    list.pieces.push(pos);
                }
            }
        }
        list
    }

    /// Whether the piece of the side to move on `pos` has any legal reply,
    /// given the precomputed check multiplicity and checker square.
    fn is_mobile(&self, pos: Pos, kind: u8, checks: u8, checker: Pos) -> bool {
        let white = self.white_to_move;
        match kind {
            PIECE_PAWN => {
                let forward: i8 = if white { 1 } else { -1 };
                // the double step is tried too: under check it can be the
                // only interposition a pawn has
                let candidates = [
                    Dir::new(forward, -1),
                    Dir::new(forward, 1),
                    Dir::new(forward, 0),
                    Dir::new(2 * forward, 0),
                ];
                for dir in candidates {
                    if self.is_legal(pos, pos.offset(dir)) {
                        return true;
                    }
                }
                false
            }
            PIECE_KNIGHT => {
                if self.is_pinned(pos) {
                    // a knight can never stay on its pin ray
                    return false;
                }
                let mut dir = KNIGHT_STEP;
                for _ in 0..8 {
                    if self.is_legal(pos, pos.offset(dir)) {
                        return true;
                    }
                    dir = dir.knight_rotate();
                }
                false
            }
            PIECE_KING => {
                for dir in DIRS {
                    if self.is_legal(pos, pos.offset(dir)) {
                        return true;
                    }
                }
                if checks == 0 {
                    let base = Board::cast_base(white);
                    for i in base..base + 2 {
                        if let Some(rook) = self.cast_pos(i) {
                            if self.is_legal(pos, rook) {
                                return true;
                            }
                        }
                    }
                }
                false
            }
            PIECE_BISHOP | PIECE_ROOK | PIECE_QUEEN => {
                if checks == 0 {
                    // a slider with any move at all can make a single step
                    // in one of its directions
                    for dir in DIRS {
                        if kind != PIECE_QUEEN && kind != dir.minor_slider_kind() {
                            continue;
                        }
                        if self.is_legal(pos, pos.offset(dir)) {
                            return true;
                        }
                    }
                    return false;
                }
                if self.is_legal(pos, checker) {
                    return true;
                }
                let king = self.king(white);
                for dir in DIRS {
                    if kind != PIECE_QUEEN && kind != dir.minor_slider_kind() {
                        continue;
                    }
                    if let Some(to) = block_square(pos, dir, king, checker) {
                        if self.is_legal(pos, to) {
                            return true;
                        }
                    }
                }
                false
            }
            _ => false,
        }
    }
}

/// The square where a piece stepping `dir` from `pos` crosses the line
/// between `king` and a checking slider: the single destination along this
/// direction that can block the check. Solved as a 2x2 integer system; a
/// zero determinant means the lines are parallel and no block exists.
fn block_square(pos: Pos, dir: Dir, king: Pos, checker: Pos) -> Option<Pos> {
    let check_ray = checker.diff(king);
    let check_dir = check_ray.unit();
    if check_dir.is_null() {
        // knight checks have no line to block
        return None;
    }
    let steps = check_ray.row.abs().max(check_ray.col.abs()) as i32;
    let det = check_dir.row as i32 * dir.col as i32 - check_dir.col as i32 * dir.row as i32;
    if det == 0 {
        return None;
    }
    let b_row = (king.row - pos.row) as i32;
    let b_col = (king.col - pos.col) as i32;
    let k_num = check_dir.row as i32 * b_col - check_dir.col as i32 * b_row;
    let m_num = dir.row as i32 * b_col - dir.col as i32 * b_row;
    if k_num % det != 0 || m_num % det != 0 {
        return None;
    }
    let k = k_num / det;
    let m = m_num / det;
    // at least one step out, and strictly between king and checker
    if k < 1 || m < 1 || m >= steps {
        return None;
    }
    let to = Pos::new(
        pos.row + (k * dir.row as i32) as i8,
        pos.col + (k * dir.col as i32) as i8,
    );
    if to.valid() { Some(to) } else { None }
}
