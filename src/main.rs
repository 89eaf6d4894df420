use std::{env, fs};

use log::error;

mod attack;
mod board;
mod descriptor;
mod direction;
mod driver;
mod legality;
mod mobility;
mod moves;

pub static STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w AHah - 0 1";

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() >= 3 && args[1] == "input" {
        match fs::read_to_string(&args[2]) {
            Ok(text) => {
                for (tag, board) in driver::process_input(&text) {
                    println!("=== {tag}");
                    println!("{board}");
                    println!();
                }
            }
            Err(e) => error!("Failed to read input file '{}': {e}", args[2]),
        }
    }
}
