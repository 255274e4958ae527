//! Decoder for the line-oriented textual maze description.
//!
//! The format is:
//! - line 1: `rows cols`
//! - lines 2..=rows+1: the cost matrix, one row per line, 0 marking a wall
//! - last line: `startRow startCol endRow endCol`
//!
//! Blank lines are skipped. Every token must be a plain run of ASCII digits,
//! so signs (and with them negative costs) are rejected outright.

use std::io::BufRead;

use log::debug;

use crate::error::DecodeError;
use crate::grid::{Grid, Point};

/// A decoded maze together with the requested endpoints.
///
/// The endpoints are *not* validated against the grid here; bounds and
/// passability are checked by [`crate::find_path`] before any search runs.
#[derive(Debug)]
pub struct MazeInput {
    pub grid: Grid,
    pub start: Point,
    pub goal: Point,
}

/// Reads and decodes a maze description from `reader`.
pub fn decode(reader: impl BufRead) -> Result<MazeInput, DecodeError> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if !line.trim().is_empty() {
            lines.push(line);
        }
    }
    decode_lines(&lines)
}

/// Decodes a maze description from already-collected non-blank lines.
pub fn decode_lines(lines: &[String]) -> Result<MazeInput, DecodeError> {
    if lines.len() < 3 {
        return Err(DecodeError::TooShort {
            found: lines.len(),
        });
    }

    let size: Vec<usize> = parse_fields(&lines[0]).ok_or_else(|| DecodeError::BadSizeLine {
        line: lines[0].clone(),
    })?;
    if size.len() != 2 {
        return Err(DecodeError::BadSizeLine {
            line: lines[0].clone(),
        });
    }
    let (rows, columns) = (size[0], size[1]);

    let mut costs = Vec::with_capacity(rows);
    for row in 0..rows {
        let line = lines
            .get(row + 1)
            .ok_or(DecodeError::MissingRow { row })?;
        let parsed = parse_fields(line).ok_or(DecodeError::BadRow {
            row,
            expected: columns,
        })?;
        if parsed.len() != columns {
            return Err(DecodeError::BadRow {
                row,
                expected: columns,
            });
        }
        costs.push(parsed);
    }

    let line = lines.get(rows + 1).ok_or(DecodeError::TooShort {
        found: lines.len(),
    })?;
    let endpoints: Vec<usize> = parse_fields(line).ok_or_else(|| DecodeError::BadEndpoints {
        line: line.clone(),
    })?;
    if endpoints.len() != 4 {
        return Err(DecodeError::BadEndpoints { line: line.clone() });
    }

    let grid = Grid::from_costs(rows, columns, costs)?;
    debug!("decoded {}x{} maze", grid.rows(), grid.columns());

    Ok(MazeInput {
        grid,
        start: Point {
            row: endpoints[0],
            col: endpoints[1],
        },
        goal: Point {
            row: endpoints[2],
            col: endpoints[3],
        },
    })
}

/// Splits a line on whitespace and parses every token as a non-negative
/// integer. Any token with a non-digit character fails the whole line.
fn parse_fields(line: &str) -> Option<Vec<usize>> {
    line.split_whitespace()
        .map(|token| {
            if token.bytes().all(|b| b.is_ascii_digit()) {
                token.parse().ok()
            } else {
                None
            }
        })
        .collect()
}
