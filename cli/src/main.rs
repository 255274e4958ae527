use std::env;
use std::fs::File;
use std::io::{self, BufReader, Write};

use anyhow::Context;
use log::debug;
use solver::{decode, find_path, MazeInput, Point};

/// Reads a maze description from stdin (or a file given as the only
/// argument), prints the least-cost route one `row col` line at a time and a
/// closing `.` line. Any failure goes to stderr with a non-zero exit status;
/// no path lines are emitted in that case.
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let input = read_input()?;
    debug!("maze:\n{}", input.grid);

    let result = find_path(&input.grid, input.start, input.goal)?;
    debug!("total cost: {}", result.total_cost);

    write_path(io::stdout().lock(), &result.path)?;
    Ok(())
}

fn read_input() -> anyhow::Result<MazeInput> {
    let input = match env::args().nth(1) {
        Some(path) => {
            let file = File::open(&path).with_context(|| format!("cannot open {}", path))?;
            decode(BufReader::new(file))
        }
        None => decode(io::stdin().lock()),
    };
    input.context("invalid maze description")
}

/// Coordinates are emitted row first, then column, matching the order the
/// endpoint line uses on the way in.
fn write_path(mut out: impl Write, path: &[Point]) -> io::Result<()> {
    for point in path {
        writeln!(out, "{} {}", point.row, point.col)?;
    }
    writeln!(out, ".")
}
