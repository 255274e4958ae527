//! Least-cost routing through weighted rectangular mazes.
//!
//! A maze is decoded from a textual description (or imported from a bitmap)
//! into a [`Grid`], searched with a uniform-cost [`PathFinder`], and the
//! resulting route handed back as an ordered sequence of [`Point`]s.

pub mod error;
pub mod find;
pub mod grid;
pub mod input;
pub mod util;

pub use error::{DecodeError, GridError, SearchError};
pub use find::{find_path, reconstruct, Map, MapStorage, PathFinder, PathResult, Reached, SearchState};
pub use grid::{Cell, CellStorage, Grid, Point};
pub use input::{decode, decode_lines, MazeInput};
