use crate::board::{Board, PIECE_KING, PIECE_KNIGHT, PIECE_NONE, PIECE_PAWN, PIECE_QUEEN};
use crate::direction::{Dir, Pos, DIRS, KNIGHT_STEP};

impl Board {
    /// First occupied square from `pos` along `dir`, or INVALID when the ray
    /// runs off the board first.
    pub fn first_piece_on_ray(&self, pos: Pos, dir: Dir) -> Pos {
        let mut acc = pos.offset(dir);
        while acc.valid() && self.kind_at(acc) == PIECE_NONE {
            acc = acc.offset(dir);
        }
        if acc.valid() { acc } else { Pos::INVALID }
    }

    /// Square of the piece attacking `pos` from the `attacker` side along
    /// the unit direction `dir`, or INVALID. A king or a pawn only counts
    /// one step out (and the pawn only on its capture diagonals); farther
    /// pieces count when they slide along this line.
    pub fn first_attacker_on_ray(&self, attacker: bool, pos: Pos, dir: Dir) -> Pos {
        let step = pos.offset(dir);
        if step.valid() && !self.is_empty(step) && self.color_at(step) == attacker {
            let kind = self.kind_at(step);
            if kind == PIECE_KING || (kind == PIECE_PAWN && dir.neg().is_pawn_attack_for(attacker)) {
                return step;
            }
        }

        let first = self.first_piece_on_ray(pos, dir);
        if first.valid() && self.color_at(first) == attacker {
            let kind = self.kind_at(first);
            if kind == PIECE_QUEEN || kind == dir.minor_slider_kind() {
                return first;
            }
        }
        Pos::INVALID
    }

    /// Number of `attacker` pieces bearing on `pos`, capped at `max`. A
    /// valid `blocker` square is treated as additionally occupied: a ray
    /// attack it would intercept is discounted, as is an attacker standing
    /// on the blocker square itself (it would be captured by the move the
    /// blocker stands for).
    pub fn count_attackers(&self, attacker: bool, pos: Pos, max: u8, blocker: Pos) -> u8 {
        if !pos.valid() {
            return 0;
        }
        let mut found = 0;

        let mut kdir = KNIGHT_STEP;
        for _ in 0..8 {
            let target = pos.offset(kdir);
            kdir = kdir.knight_rotate();
            if blocker.valid() && target == blocker {
                continue;
            }
            if target.valid() && self.kind_at(target) == PIECE_KNIGHT && self.color_at(target) == attacker {
                found += 1;
                if found >= max {
                    return found;
                }
            }
        }

        for dir in DIRS {
            let watcher = self.first_attacker_on_ray(attacker, pos, dir);
            if !watcher.valid() {
                continue;
            }
            if blocker.valid()
                && (watcher == blocker
                    || (dir.contains_ray(blocker.diff(pos)) && dir.contains_ray(watcher.diff(blocker))))
            {
                continue;
            }
            found += 1;
            if found >= max {
                return found;
            }
        }
        found
    }

    /// Check multiplicity against `white`'s own king, capped at two, plus
    /// the square of the first checker found (INVALID when none).
    pub fn find_checkers(&self, white: bool) -> (u8, Pos) {
        let pos = self.king(white);
        if !pos.valid() {
            return (0, Pos::INVALID);
        }
        let mut found = 0;
        let mut checker = Pos::INVALID;

        let mut kdir = KNIGHT_STEP;
        for _ in 0..8 {
            let target = pos.offset(kdir);
            kdir = kdir.knight_rotate();
            if target.valid() && self.kind_at(target) == PIECE_KNIGHT && self.color_at(target) == !white {
                if !checker.valid() {
                    checker = target;
                }
                found += 1;
                if found >= 2 {
                    return (found, checker);
                }
            }
        }

        for dir in DIRS {
            let watcher = self.first_attacker_on_ray(!white, pos, dir);
            if watcher.valid() {
                if !checker.valid() {
                    checker = watcher;
                }
                found += 1;
                if found >= 2 {
                    return (found, checker);
                }
            }
        }
        (found, checker)
    }

    pub fn in_check(&self, white: bool) -> bool {
        self.count_attackers(!white, self.king(white), 1, Pos::INVALID) > 0
    }

    /// Whether the piece on `pos` shields its own king from an enemy slider
    /// along the king-to-piece ray.
    pub fn is_pinned(&self, pos: Pos) -> bool {
        if self.kind_at(pos) == PIECE_NONE {
            return false;
        }
        let white = self.color_at(pos);
        let king = self.king(white);
        if !king.valid() {
            return false;
        }
        let dir = pos.diff(king).unit();
        if dir.is_null() {
            return false;
        }
        if self.first_piece_on_ray(king, dir) != pos {
            return false;
        }
        let watcher = self.first_piece_on_ray(pos, dir);
        if !watcher.valid() || self.color_at(watcher) == white {
            return false;
        }
        let kind = self.kind_at(watcher);
        kind == PIECE_QUEEN || kind == dir.minor_slider_kind()
    }
}
