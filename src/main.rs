use colored::Colorize;
use std::process;

fn main() {
    if let Err(err) = scoremerge::run() {
        eprintln!("{}: {}", env!("CARGO_PKG_NAME").red(), err);
        process::exit(1);
    }
}
