use std::collections::BTreeMap;

use log::debug;
use regex::Regex;

use crate::board::Board;

#[derive(Clone, Copy)]
enum Mode {
    Scan,
    Tag,
    Fen,
    Num,
    Tok,
}

/// Variant stream processor. Tags open named variants from the starting
/// position, braces re-seat the board on a FEN, numeric tokens are move
/// numbers, everything else is a move descriptor. The first failure of a
/// variant prints one diagnostic line and mutes the rest of it.
struct InputDriver {
    boards: BTreeMap<String, Board>,
    board: Board,
    tag: String,
    valid: bool,
    moves_played: usize,
    buf: String,
    mode: Mode,
    token_shape: Regex,
}

/// Runs the variant stream in `text` and returns the final board of every
/// variant that played out cleanly, keyed (and therefore sorted) by tag.
/// Diagnostic lines for failed variants go to stdout.
pub fn process_input(text: &str) -> BTreeMap<String, Board> {
    let mut driver = InputDriver {
        boards: BTreeMap::new(),
        // moves before any tag run against the uninitialized board and fail
        board: Board::default(),
        tag: String::new(),
        valid: true,
        moves_played: 0,
        buf: String::new(),
        mode: Mode::Scan,
        token_shape: Regex::new(r"^[a-hx1-9=+!?NBRQKPOonrqkp-]+$").unwrap(),
    };

    for line in text.lines() {
        let line = match line.find('#') {
            Some(cut) => &line[..cut],
            None => line,
        };
        for c in line.chars() {
            driver.feed(c);
        }
        // line ends terminate numbers and move tokens, nothing else
        match driver.mode {
            Mode::Scan | Mode::Num | Mode::Tok => driver.feed(' '),
            Mode::Tag | Mode::Fen => {}
        }
    }
    driver.commit_variant();
    driver.boards
}

impl InputDriver {
    fn feed(&mut self, c: char) {
        match self.mode {
            Mode::Tag => {
                if c == ')' {
                    self.tag = std::mem::take(&mut self.buf);
                    self.board = Board::initial();
                    self.valid = true;
                    self.moves_played = 0;
                    self.mode = Mode::Scan;
                } else {
                    self.buf.push(c);
                }
            }
            Mode::Fen => {
                if c == '}' {
                    self.mode = Mode::Scan;
                    self.finish_fen();
                } else {
                    self.buf.push(c);
                }
            }
            Mode::Num => {
                if c.is_ascii_digit() {
                    self.buf.push(c);
                } else {
                    // the terminating character is consumed with the number
                    self.mode = Mode::Scan;
                    self.finish_number();
                }
            }
            Mode::Tok => {
                if c.is_whitespace() {
                    self.mode = Mode::Scan;
                    self.finish_token();
                } else {
                    self.buf.push(c);
                }
            }
            Mode::Scan => {
                if c.is_whitespace() {
                } else if c == '(' {
                    self.commit_variant();
                    self.buf.clear();
                    self.mode = Mode::Tag;
                } else if c == '{' {
                    self.buf.clear();
                    self.mode = Mode::Fen;
                } else if c.is_ascii_digit() {
                    self.buf.clear();
                    self.buf.push(c);
                    self.mode = Mode::Num;
                } else {
                    self.buf.clear();
                    self.buf.push(c);
                    self.mode = Mode::Tok;
                }
            }
        }
    }

    fn finish_fen(&mut self) {
        let fen = std::mem::take(&mut self.buf);
        if !self.valid {
            return;
        }
        match Board::from_fen(&fen) {
            Ok(board) => self.board = board,
            Err(reason) => {
                println!("ERROR: {} cannot load position {{{}}}", self.tag, fen);
                debug!("FEN rejected: {reason}");
                self.valid = false;
            }
        }
    }

    fn finish_number(&mut self) {
        let text = std::mem::take(&mut self.buf);
        if !self.valid {
            return;
        }
        let expected = self.moves_played as u64 / 2 + 1;
        if text.parse::<u64>() != Ok(expected) {
            println!("ERROR: {} bad number {} vs. {}", self.tag, text, self.moves_played);
            self.valid = false;
        }
    }

    fn finish_token(&mut self) {
        let tok = std::mem::take(&mut self.buf);
        if !self.valid {
            return;
        }
        self.moves_played += 1;
        if !self.token_shape.is_match(&tok) || !self.board.make_descriptor_move(&tok) {
            println!("ERROR: {} cannot apply move {}", self.tag, tok);
            self.valid = false;
        } else if !self.board.valid() {
            // a legal move may never break the invariants
            println!("ERROR: {} move {} led to failure", self.tag, tok);
            self.valid = false;
        }
    }

    fn commit_variant(&mut self) {
        if !self.tag.is_empty() && self.valid {
            self.boards.insert(self.tag.clone(), self.board.clone());
        }
    }
}
