use log::debug;

use crate::board::{char_to_piece, Board, PIECE_NONE, PIECE_PAWN, PIECE_QUEEN};
use crate::direction::Pos;

/// Parsed form of a move token: `e4`, `Nf3`, `exd6`, `Ng8f6`, `e8=Q`,
/// `O-O`, `o-o-o` and the like.
#[derive(Debug, PartialEq, Eq)]
pub struct Descriptor {
    /// Kind of the moving piece, pawn when none was written.
    pub kind: u8,
    /// Promotion target, `PIECE_NONE` when unspecified.
    pub promote: u8,
    /// Disambiguators, -1 when not given.
    pub from_row: i8,
    pub from_col: i8,
    pub to_row: i8,
    pub to_col: i8,
    /// Number of castling glyphs; nonzero makes this a castling descriptor.
    pub castles: u8,
}

/// Lowercase `b` always reads as a file letter, every other figure letter
/// works in either case.
fn is_piece_letter(c: char) -> bool {
    matches!(c, 'p' | 'n' | 'r' | 'q' | 'k' | 'P' | 'N' | 'B' | 'R' | 'Q' | 'K')
}

impl Descriptor {
    pub fn parse(desc: &str) -> Result<Descriptor, String> {
        let mut kind = PIECE_NONE;
        let mut promote = PIECE_NONE;
        let mut from_row: i8 = -1;
        let mut from_col: i8 = -1;
        let mut to_row: i8 = -1;
        let mut to_col: i8 = -1;
        let mut castles = 0u8;

        for c in desc.chars() {
            if is_piece_letter(c) {
                if kind == PIECE_NONE {
                    kind = char_to_piece(c);
                } else if promote == PIECE_NONE {
                    promote = char_to_piece(c);
                } else {
                    return Err(format!("Third piece letter in '{desc}'"));
                }
            } else if c == '9' {
                return Err(format!("Rank digit 9 in '{desc}'"));
            } else if ('1'..='8').contains(&c) {
                let digit = c as i8 - '1' as i8;
                if to_row < 0 {
                    to_row = digit;
                } else if from_row < 0 {
                    from_row = to_row;
                    to_row = digit;
                } else {
                    return Err(format!("Third rank digit in '{desc}'"));
                }
            } else if ('a'..='h').contains(&c) {
                let file = c as i8 - 'a' as i8;
                if to_col < 0 {
                    to_col = file;
                } else if from_col < 0 {
                    from_col = to_col;
                    to_col = file;
                } else {
                    return Err(format!("Third file letter in '{desc}'"));
                }
            } else if c == '=' {
                // marks the mover as a pawn so the next letter lands in the
                // promotion slot
                if kind == PIECE_NONE {
                    kind = PIECE_PAWN;
                }
            } else if c == 'O' || c == 'o' {
                castles += 1;
            }
            // x, +, !, ?, - and similar marks carry no information
        }

        if castles > 0 {
            if kind != PIECE_NONE
                || promote != PIECE_NONE
                || from_row >= 0
                || from_col >= 0
                || to_row >= 0
                || to_col >= 0
            {
                return Err(format!("Castling descriptor '{desc}' mixed with move characters"));
            }
            if castles == 1 {
                return Err(format!("Lone castling glyph in '{desc}'"));
            }
        } else {
            if to_row < 0 || to_col < 0 {
                return Err(format!("Missing destination in '{desc}'"));
            }
            if kind == PIECE_NONE {
                kind = PIECE_PAWN;
            }
        }

        Ok(Descriptor {
            kind,
            promote,
            from_row,
            from_col,
            to_row,
            to_col,
            castles,
        })
    }

    /// Two glyphs castle short, three or more castle long.
    pub fn queen_side(&self) -> bool {
        self.castles >= 3
    }
}

impl Board {
    /// Parses and plays one move token for the side to move. The board must
    /// be in a heavy-valid state; returns false on any parse, resolution or
    /// legality failure, leaving the position untouched.
    pub fn make_descriptor_move(&mut self, desc: &str) -> bool {
        if !self.valid() {
            return false;
        }
        let d = match Descriptor::parse(desc) {
            Ok(d) => d,
            Err(reason) => {
                debug!("Rejected move descriptor '{desc}': {reason}");
                return false;
            }
        };
        let white = self.white_to_move;

        if d.castles > 0 {
            let king = self.king(white);
            let side = if d.queen_side() { 0 } else { 1 };
            let Some(rook) = self.cast_pos(Board::cast_base(white) + side) else {
                return false;
            };
            return self.make_move(king, rook, PIECE_QUEEN);
        }

        let target = Pos::new(d.to_row, d.to_col);
        let promote = if d.promote == PIECE_NONE { PIECE_QUEEN } else { d.promote };
        if d.from_row >= 0 && d.from_col >= 0 {
            return self.make_move(Pos::new(d.from_row, d.from_col), target, promote);
        }

        // scan for the first matching piece with a legal move to the target
        for row in 0..8 {
            if d.from_row >= 0 && d.from_row != row {
                continue;
            }
            for col in 0..8 {
                if d.from_col >= 0 && d.from_col != col {
                    continue;
                }
                let source = Pos::new(row, col);
                if self.kind_at(source) != d.kind || self.color_at(source) != white {
                    continue;
                }
                if self.is_legal(source, target) {
                    return self.make_move(source, target, promote);
                }
            }
        }
        false
    }
}
